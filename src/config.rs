use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{NaturalDocsError, Result};

/// Comment delimiters for one syntax. An empty string means the part is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentFormat {
    /// Line opening the comment block
    pub start: String,

    /// Prefix for every line of the generated body
    pub line: String,

    /// Line closing the comment block
    pub end: String,
}

impl CommentFormat {
    pub fn new(start: &str, line: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            line: line.to_string(),
            end: end.to_string(),
        }
    }
}

impl Default for CommentFormat {
    fn default() -> Self {
        Self::new("--", "--", "--")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding `class.ndoc`, `function.ndoc` and `variable.ndoc` overrides
    pub template_dir: Option<PathBuf>,

    /// Indentation of the lines under a topic header
    pub body_indent: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            body_indent: "\t".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delimiters used when no syntax matches the scope
    pub fallback: CommentFormat,

    /// Delimiters keyed by syntax name, matched against `source.<syntax>` scopes
    pub formatting: BTreeMap<String, CommentFormat>,

    /// File extension to syntax name
    pub extensions: BTreeMap<String, String>,

    /// Skeleton templates
    pub templates: TemplateConfig,
}

impl Default for Config {
    fn default() -> Self {
        let c_style = CommentFormat::new("/*", " * ", " */");
        let hash_style = CommentFormat::new("#", "#   ", "#");
        let dash_style = CommentFormat::new("--", "--  ", "--");

        let mut formatting = BTreeMap::new();
        for syntax in ["c", "c++", "cs", "java", "js", "ts", "go", "rust", "php", "swift", "kotlin", "scala"] {
            formatting.insert(syntax.to_string(), c_style.clone());
        }
        for syntax in ["python", "shell", "ruby", "perl"] {
            formatting.insert(syntax.to_string(), hash_style.clone());
        }
        for syntax in ["lua", "sql"] {
            formatting.insert(syntax.to_string(), dash_style.clone());
        }

        let extensions = [
            ("c", "c"),
            ("h", "c"),
            ("cc", "c++"),
            ("cpp", "c++"),
            ("cxx", "c++"),
            ("hpp", "c++"),
            ("cs", "cs"),
            ("java", "java"),
            ("js", "js"),
            ("mjs", "js"),
            ("ts", "ts"),
            ("go", "go"),
            ("rs", "rust"),
            ("php", "php"),
            ("swift", "swift"),
            ("kt", "kotlin"),
            ("scala", "scala"),
            ("py", "python"),
            ("sh", "shell"),
            ("bash", "shell"),
            ("rb", "ruby"),
            ("pl", "perl"),
            ("pm", "perl"),
            ("lua", "lua"),
            ("sql", "sql"),
        ]
        .into_iter()
        .map(|(ext, syntax)| (ext.to_string(), syntax.to_string()))
        .collect();

        Self {
            fallback: CommentFormat::default(),
            formatting,
            extensions,
            templates: TemplateConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| NaturalDocsError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NaturalDocsError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                let candidates = [
                    "NaturalDocs.toml",
                    "naturaldocs.toml",
                    ".naturaldocs.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    /// Syntax name for a file, looked up by extension
    pub fn syntax_for_path(&self, path: &Path) -> Option<&str> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        self.extensions.get(&extension).map(String::as_str)
    }
}
