use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn naturaldocs() -> Command {
    Command::new(env!("CARGO_BIN_EXE_naturaldocs"))
}

#[test]
fn shows_help() {
    naturaldocs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("annotate"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn generates_function_block() {
    let temp = assert_fs::TempDir::new().unwrap();

    naturaldocs()
        .current_dir(temp.path())
        .args(["generate", "--syntax", "c", "int add(int a, int b) {"])
        .assert()
        .success()
        .stdout(concat!(
            "/*\n",
            " * Function: add\n",
            " * \tDescription\n",
            " *\n",
            " * Parameters:\n",
            " * \ta - Description\n",
            " * \tb - Description\n",
            " *\n",
            " * Returns:\n",
            " * \tint\n",
            " */\n",
        ));
}

#[test]
fn generates_raw_skeleton_from_stdin() {
    let temp = assert_fs::TempDir::new().unwrap();

    naturaldocs()
        .current_dir(temp.path())
        .args(["generate", "--raw"])
        .write_stdin("class Widget:\n")
        .assert()
        .success()
        .stdout("Class: Widget\n\tDescription\n");
}

#[test]
fn unrecognized_line_prints_nothing() {
    let temp = assert_fs::TempDir::new().unwrap();

    naturaldocs()
        .current_dir(temp.path())
        .args(["generate", "}"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn classifies_as_json() {
    let temp = assert_fs::TempDir::new().unwrap();

    naturaldocs()
        .current_dir(temp.path())
        .args(["classify", "--json", "private static final int LIMIT = 10;"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"variable\""))
        .stdout(predicate::str::contains("\"name\": \"LIMIT\""));
}

#[test]
fn annotates_file_in_place() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("counter.py");
    source
        .write_str("class Counter:\n    def step(self, amount):\n        pass\n")
        .unwrap();

    naturaldocs()
        .current_dir(temp.path())
        .args(["annotate", "counter.py", "--line", "1,2"])
        .assert()
        .success();

    source.assert(concat!(
        "#\n",
        "#   Class: Counter\n",
        "#   \tDescription\n",
        "#\n",
        "class Counter:\n",
        "    #\n",
        "    #   Function: step\n",
        "    #   \tDescription\n",
        "    #\n",
        "    #   Parameters:\n",
        "    #   \tself - Description\n",
        "    #   \tamount - Description\n",
        "    #\n",
        "    def step(self, amount):\n",
        "        pass\n",
    ));
}

#[test]
fn dry_run_leaves_file_untouched() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("main.rs");
    source.write_str("pub struct Config {\n}\n").unwrap();

    naturaldocs()
        .current_dir(temp.path())
        .args(["annotate", "main.rs", "-l", "1", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("/*\n * Struct: Config\n"));

    source.assert("pub struct Config {\n}\n");
}

#[test]
fn rejects_line_past_end() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("a.c").write_str("int x;\n").unwrap();

    naturaldocs()
        .current_dir(temp.path())
        .args(["annotate", "a.c", "--line", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn custom_config_changes_delimiters() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("naturaldocs.toml")
        .write_str(
            r###"
[formatting.python]
start = ""
line = "## "
end = ""
"###,
        )
        .unwrap();

    naturaldocs()
        .current_dir(temp.path())
        .args(["generate", "--syntax", "python", "int size = 0"])
        .assert()
        .success()
        .stdout("## Variable: size\n## \tDescription\n");
}

#[test]
fn init_writes_default_config() {
    let temp = assert_fs::TempDir::new().unwrap();

    naturaldocs()
        .current_dir(temp.path())
        .args(["init"])
        .assert()
        .success();

    temp.child("naturaldocs.toml")
        .assert(predicate::str::contains("[formatting.python]"));

    naturaldocs()
        .current_dir(temp.path())
        .args(["init"])
        .assert()
        .failure();
}
