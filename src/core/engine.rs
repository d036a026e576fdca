use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::NaturalDocsError;
use super::{extract_indentation, CommentFormatter, DocGenerator, LineClassifier, SourceBuffer};

/// Main orchestration engine: classify a line, render its skeleton, wrap it and insert it
pub struct Engine {
    config: Config,
    classifier: LineClassifier,
    generator: DocGenerator,
    formatter: CommentFormatter,
}

impl Engine {
    /// Create a new engine instance
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config);

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let classifier = LineClassifier::new()?;
        let generator = DocGenerator::new(&config.templates)?;
        let formatter = CommentFormatter::new(&config);

        Ok(Self {
            config,
            classifier,
            generator,
            formatter,
        })
    }

    /// Build the comment block for one line, or `None` when the line declares nothing we recognize
    pub fn document_line(&self, line: &str, scope: &str) -> crate::error::Result<Option<String>> {
        let Some(declaration) = self.classifier.classify(line) else {
            debug!("No block matched line {:?}", line);
            return Ok(None);
        };

        debug!("Classified {} {:?}", declaration.kind, declaration.name);

        let doc = self.generator.render(&declaration)?;
        let format = self.formatter.resolve(scope);
        let indentation = extract_indentation(line);

        Ok(Some(self.formatter.wrap(&doc.body, indentation, format)))
    }

    /// Scope string for a file, from an explicit syntax or from the file extension
    pub fn scope_for(&self, file: Option<&Path>, syntax: Option<&str>) -> String {
        let syntax = syntax.or_else(|| file.and_then(|f| self.config.syntax_for_path(f)));

        match syntax {
            Some(s) if s.contains("source.") => s.to_string(),
            Some(s) => format!("source.{}", s),
            None => String::new(),
        }
    }

    /// Insert documentation skeletons above the given lines of a file
    pub async fn annotate(
        &self,
        file: PathBuf,
        lines: Vec<usize>,
        syntax: Option<String>,
        dry_run: bool,
    ) -> Result<()> {
        let content = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let mut buffer = SourceBuffer::parse(&content);
        let scope = self.scope_for(Some(&file), syntax.as_deref());

        info!("Annotating {} ({} lines, scope {:?})", file.display(), buffer.len(), scope);

        // Bottom-up so earlier line numbers stay valid after each insertion
        let targets: BTreeSet<usize> = lines.into_iter().collect();
        let mut inserted = 0;

        for number in targets.into_iter().rev() {
            let text = buffer.line(number)?.to_string();

            match self.document_line(&text, &scope)? {
                Some(block) => {
                    buffer.insert_above(number, &block)?;
                    inserted += 1;
                }
                None => warn!("Line {} is not a recognized declaration, skipping", number),
            }
        }

        if dry_run {
            print!("{}", buffer);
            info!("Dry run: {} block(s) would be inserted", inserted);
            return Ok(());
        }

        if inserted > 0 {
            tokio::fs::write(&file, buffer.to_string())
                .await
                .with_context(|| format!("Failed to write {}", file.display()))?;
        }

        info!("✅ Inserted {} block(s) into {}", inserted, file.display());
        Ok(())
    }

    /// Print the comment block for a single line of text
    pub async fn generate(&self, text: Option<String>, syntax: Option<String>, raw: bool) -> Result<()> {
        let line = read_line(text).await?;

        if raw {
            match self.classifier.classify(&line) {
                Some(declaration) => println!("{}", self.generator.render(&declaration)?.body),
                None => warn!("Line is not a recognized declaration"),
            }
            return Ok(());
        }

        let scope = self.scope_for(None, syntax.as_deref());
        match self.document_line(&line, &scope)? {
            Some(block) => print!("{}", block),
            None => warn!("Line is not a recognized declaration"),
        }

        Ok(())
    }

    /// Print what a line classifies as
    pub async fn classify(&self, text: Option<String>, json: bool) -> Result<()> {
        let line = read_line(text).await?;
        let declaration = self.classifier.classify(&line);

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&declaration).map_err(NaturalDocsError::from)?
            );
            return Ok(());
        }

        match declaration {
            Some(d) => {
                println!("kind: {}", d.kind);
                println!("keyword: {}", d.keyword);
                println!("name: {}", d.name);
                if !d.parameters.is_empty() {
                    println!("parameters: {}", d.parameters.join(", "));
                }
                if let Some(returns) = d.returns {
                    println!("returns: {}", returns);
                }
            }
            None => println!("none"),
        }

        Ok(())
    }

    /// Write the default configuration file
    pub async fn init(&self, path: Option<PathBuf>, force: bool) -> Result<()> {
        let path = path.unwrap_or_else(|| PathBuf::from("naturaldocs.toml"));

        if path.exists() && !force {
            return Err(NaturalDocsError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ))
            .into());
        }

        Config::default().save(&path)?;
        info!("✅ Wrote default configuration to {}", path.display());
        Ok(())
    }

    /// List configured syntaxes and their delimiters
    pub fn formats(&self) -> Result<()> {
        for (syntax, format) in &self.config.formatting {
            println!(
                "{:<10} start={:?} line={:?} end={:?}",
                syntax, format.start, format.line, format.end
            );
        }
        let fallback = &self.config.fallback;
        println!(
            "{:<10} start={:?} line={:?} end={:?}",
            "(fallback)", fallback.start, fallback.line, fallback.end
        );
        Ok(())
    }
}

/// Use the given text, or the first line of stdin when none was passed
async fn read_line(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read stdin")?;

    Ok(input.lines().next().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::from_config(Config::default()).unwrap()
    }

    #[test]
    fn test_document_python_class() {
        let block = engine()
            .document_line("    class Foo(Base):", "source.python")
            .unwrap()
            .unwrap();
        assert_eq!(block, "    #\n    #   Class: Foo\n    #   \tDescription\n    #\n");
    }

    #[test]
    fn test_document_java_method() {
        let block = engine()
            .document_line("  public int add(int a, int b) {", "source.java")
            .unwrap()
            .unwrap();
        assert_eq!(
            block,
            concat!(
                "  /*\n",
                "   * Function: add\n",
                "   * \tDescription\n",
                "   *\n",
                "   * Parameters:\n",
                "   * \ta - Description\n",
                "   * \tb - Description\n",
                "   *\n",
                "   * Returns:\n",
                "   * \tint\n",
                "   */\n",
            )
        );
    }

    #[test]
    fn test_document_with_fallback_delimiters() {
        let block = engine().document_line("int total;", "").unwrap().unwrap();
        assert_eq!(block, "--\n--Variable: total\n--\tDescription\n--\n");
    }

    #[test]
    fn test_document_unrecognized_line() {
        assert_eq!(engine().document_line("}", "source.c").unwrap(), None);
    }

    #[test]
    fn test_scope_for() {
        let engine = engine();
        assert_eq!(engine.scope_for(Some(Path::new("a.py")), None), "source.python");
        assert_eq!(engine.scope_for(Some(Path::new("a.py")), Some("lua")), "source.lua");
        assert_eq!(engine.scope_for(None, Some("source.c++ meta.x")), "source.c++ meta.x");
        assert_eq!(engine.scope_for(Some(Path::new("README")), None), "");
    }

    #[tokio::test]
    async fn test_annotate_multiple_lines() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("shapes.py");
        std::fs::write(&file, "class Shape:\n    def area(self):\n        return 0\n").unwrap();

        engine()
            .annotate(file.clone(), vec![2, 1, 2, 3], None, false)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&file).unwrap();
        assert_eq!(
            content,
            concat!(
                "#\n",
                "#   Class: Shape\n",
                "#   \tDescription\n",
                "#\n",
                "class Shape:\n",
                "    #\n",
                "    #   Function: area\n",
                "    #   \tDescription\n",
                "    #\n",
                "    #   Parameters:\n",
                "    #   \tself - Description\n",
                "    #\n",
                "    def area(self):\n",
                "        return 0\n",
            )
        );
    }

    #[tokio::test]
    async fn test_annotate_rejects_out_of_range_line() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.c");
        std::fs::write(&file, "int x;\n").unwrap();

        let result = engine().annotate(file.clone(), vec![5], None, false).await;
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "int x;\n");
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("naturaldocs.toml");
        let engine = engine();

        engine.init(Some(path.clone()), false).await.unwrap();
        assert!(engine.init(Some(path.clone()), false).await.is_err());
        engine.init(Some(path.clone()), true).await.unwrap();

        let loaded = Config::load(&path).unwrap();
        assert!(loaded.formatting.contains_key("python"));
    }
}
