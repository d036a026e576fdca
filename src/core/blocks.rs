//! Line classifiers
//!
//! Each block pairs a cheap "does this line look like X" test with an
//! extraction step that pulls the declaration's name, parameters and return
//! type out of the line. Blocks are tried in order and the first one that
//! both tests and extracts successfully wins.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Kind of construct a line declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Class,
    Function,
    Variable,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Class => "class",
            BlockKind::Function => "function",
            BlockKind::Variable => "variable",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declaration recognized on a single line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: BlockKind,

    /// NaturalDocs topic keyword (`Class`, `Struct`, `Function`, ...)
    pub keyword: String,

    pub name: String,

    /// Parameter names, in declaration order
    pub parameters: Vec<String>,

    /// Return type, when one could be found
    pub returns: Option<String>,
}

/// Trait implemented by every line classifier
pub trait DocBlock {
    fn kind(&self) -> BlockKind;

    /// Quick check whether the line looks like this kind of declaration
    fn test(&self, line: &str) -> bool;

    /// Extract the declaration, or `None` when the line only looked like one
    fn extract(&self, line: &str) -> Option<Declaration>;
}

/// Words that start statements rather than declarations
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "throw", "raise", "yield", "await", "delete", "del", "goto", "else", "case",
    "import", "using", "package", "from", "include", "namespace", "new", "print", "echo",
    "except", "export", "pass", "break", "continue", "do", "try", "finally", "defer", "go",
    "not", "lambda", "match", "when", "loop",
];

/// Words that look like a call name but head a control-flow construct
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "elif", "for", "foreach", "while", "switch", "catch", "with", "until", "unless",
    "sizeof", "typeof", "return", "assert",
];

/// Words that introduce a function without naming its return type
const DECLARATION_KEYWORDS: &[&str] = &["def", "fn", "function", "func", "fun", "sub", "proc"];

/// Modifiers allowed in front of a class-like keyword
const CLASS_MODIFIERS: &str = r"(?:(?:public|private|protected|internal|static|abstract|final|sealed|partial|export|default|declare|typedef|data|open|inner|value|case|unsafe|pub(?:\([a-z_: ]+\))?)\s+)*";

fn is_statement_head(word: &str) -> bool {
    STATEMENT_KEYWORDS.contains(&word) || CONTROL_KEYWORDS.contains(&word)
}

/// Leading whitespace of a line
pub fn extract_indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Class-like declarations: `class`, `struct`, `interface`, `trait`, `enum`
pub struct ClassBlock {
    test_re: Regex,
    name_re: Regex,
}

impl ClassBlock {
    pub fn new() -> Result<Self> {
        Ok(Self {
            test_re: Regex::new(&format!(
                r"^\s*{}(?:class|struct|interface|trait|enum)\b",
                CLASS_MODIFIERS
            ))?,
            name_re: Regex::new(&format!(
                r"^\s*{}(enum\s+class|class|struct|interface|trait|enum)\s+([A-Za-z0-9_]+)",
                CLASS_MODIFIERS
            ))?,
        })
    }
}

impl DocBlock for ClassBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Class
    }

    fn test(&self, line: &str) -> bool {
        self.test_re.is_match(line)
    }

    fn extract(&self, line: &str) -> Option<Declaration> {
        let caps = self.name_re.captures(line)?;
        let keyword = match caps[1].split_whitespace().next()? {
            "struct" => "Struct",
            "interface" => "Interface",
            "enum" => "Enum",
            _ => "Class",
        };

        Some(Declaration {
            kind: BlockKind::Class,
            keyword: keyword.to_string(),
            name: caps[2].to_string(),
            parameters: vec![],
            returns: None,
        })
    }
}

/// Function declarations: `[ret] name(params) [-> ret]`
pub struct FunctionBlock {
    test_re: Regex,
    name_re: Regex,
    binding_re: Regex,
    trailing_return_re: Regex,
    named_parameter_re: Regex,
}

impl FunctionBlock {
    pub fn new() -> Result<Self> {
        Ok(Self {
            test_re: Regex::new(r"\(.*\)")?,
            name_re: Regex::new(r"(?:([A-Za-z0-9_]+)\s+)?([A-Za-z0-9_]+)\s*\(")?,
            binding_re: Regex::new(r"([A-Za-z0-9_$]+)\s*[:=]\s*(?:async\s+)?$")?,
            trailing_return_re: Regex::new(r"^\s*(?:->|:)\s*([^{;=]+)")?,
            named_parameter_re: Regex::new(r"^(?:mut\s+)?[*&.]*([A-Za-z0-9_$]+)\s*\??\s*:(?:[^:]|$)")?,
        })
    }

    /// Name of a single parameter, or `None` when it carries no name
    fn parameter_name(&self, parameter: &str) -> Option<String> {
        let parameter = parameter.split('=').next().unwrap_or_default().trim();

        let name = match self.named_parameter_re.captures(parameter) {
            Some(caps) => caps[1].to_string(),
            None => parameter
                .split_whitespace()
                .last()
                .unwrap_or_default()
                .trim_start_matches(['*', '&', '.'])
                .trim_end_matches(['[', ']'])
                .to_string(),
        };

        if name.is_empty() || name == "void" {
            None
        } else {
            Some(name)
        }
    }

    fn parse_parameters(&self, parameters: &str) -> Vec<String> {
        split_top_level(parameters)
            .into_iter()
            .filter_map(|p| self.parameter_name(p))
            .collect()
    }

    /// Return type written after the parameter list (`-> T`, `: T`)
    fn trailing_return(&self, rest: &str) -> Option<String> {
        let caps = self.trailing_return_re.captures(rest)?;
        let returns = caps[1].trim().trim_end_matches(':').trim_end();
        let first_word = returns.split_whitespace().next()?;
        if is_statement_head(first_word) {
            return None;
        }
        Some(returns.to_string())
    }
}

impl DocBlock for FunctionBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Function
    }

    fn test(&self, line: &str) -> bool {
        self.test_re.is_match(line)
    }

    fn extract(&self, line: &str) -> Option<Declaration> {
        for caps in self.name_re.captures_iter(line) {
            let name_match = caps.get(2)?;
            let mut name = name_match.as_str();
            if CONTROL_KEYWORDS.contains(&name) {
                return None;
            }

            let mut leading = caps.get(1).map(|m| m.as_str());
            if leading.is_some_and(is_statement_head) {
                return None;
            }

            // `function (a)` or `func (r *T) Name(...)`: the keyword is not the name
            if DECLARATION_KEYWORDS.contains(&name) {
                match self.binding_re.captures(&line[..name_match.start()]) {
                    Some(binding) => {
                        name = binding.get(1)?.as_str();
                        leading = None;
                    }
                    None => continue,
                }
            }

            let open = caps.get(0)?.end() - 1;
            let (parameters, rest) = balanced_group(line, open);

            let returns = self.trailing_return(rest).or_else(|| {
                leading
                    .filter(|word| !DECLARATION_KEYWORDS.contains(word))
                    .map(str::to_string)
            });

            return Some(Declaration {
                kind: BlockKind::Function,
                keyword: "Function".to_string(),
                name: name.to_string(),
                parameters: self.parse_parameters(parameters),
                returns,
            });
        }

        None
    }
}

/// Variable declarations: one or more type/modifier words followed by a name
pub struct VariableBlock {
    name_re: Regex,
}

impl VariableBlock {
    pub fn new() -> Result<Self> {
        Ok(Self {
            name_re: Regex::new(
                r"^\s*((?:[A-Za-z0-9_<>,\[\]*&]+\s+)+)[*&]*(\$?[A-Za-z0-9_]+)\s*(?:[=;:,\[]|$)",
            )?,
        })
    }
}

impl DocBlock for VariableBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Variable
    }

    fn test(&self, line: &str) -> bool {
        self.name_re.is_match(line)
    }

    fn extract(&self, line: &str) -> Option<Declaration> {
        let caps = self.name_re.captures(line)?;
        let first_word = caps[1].split_whitespace().next()?;
        if is_statement_head(first_word) {
            return None;
        }

        Some(Declaration {
            kind: BlockKind::Variable,
            keyword: "Variable".to_string(),
            name: caps[2].to_string(),
            parameters: vec![],
            returns: None,
        })
    }
}

/// Ordered set of classifiers: class, function, variable
pub struct LineClassifier {
    blocks: Vec<Box<dyn DocBlock>>,
}

impl LineClassifier {
    pub fn new() -> Result<Self> {
        let blocks: Vec<Box<dyn DocBlock>> = vec![
            Box::new(ClassBlock::new()?),
            Box::new(FunctionBlock::new()?),
            Box::new(VariableBlock::new()?),
        ];

        Ok(Self { blocks })
    }

    /// Classify a line, trying each block in order
    pub fn classify(&self, line: &str) -> Option<Declaration> {
        self.blocks
            .iter()
            .filter(|block| block.test(line))
            .find_map(|block| {
                let declaration = block.extract(line);
                if declaration.is_none() {
                    tracing::trace!("{} test matched but extraction failed", block.kind());
                }
                declaration
            })
    }
}

/// Split on commas that are not nested inside `<>`, `()` or `[]`
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut previous = ' ';

    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            // `->` is an arrow, not a closing bracket
            '>' if previous == '-' => {}
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        previous = c;
    }
    parts.push(&text[start..]);

    parts
}

/// Text inside the parentheses opening at byte `open`, and the text after the matching `)`.
/// An unclosed group runs to the end of the line.
fn balanced_group(line: &str, open: usize) -> (&str, &str) {
    let mut depth = 0usize;

    for (i, c) in line[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let close = open + i;
                    return (&line[open + 1..close], &line[close + 1..]);
                }
            }
            _ => {}
        }
    }

    (&line[open + 1..], "")
}
