use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{CommentFormat, Config};

/// Resolves comment delimiters for a scope and wraps generated text in them
pub struct CommentFormatter {
    formats: BTreeMap<String, CommentFormat>,
    fallback: CommentFormat,
}

impl CommentFormatter {
    pub fn new(config: &Config) -> Self {
        Self {
            formats: config.formatting.clone(),
            fallback: config.fallback.clone(),
        }
    }

    /// Find the delimiters for a scope such as `source.python meta.function`.
    ///
    /// Scope tokens are checked innermost first; a syntax `S` matches a token
    /// that is exactly `source.S` or starts with `source.S.`.
    pub fn resolve(&self, scope: &str) -> &CommentFormat {
        for token in scope.split_whitespace().rev() {
            let Some(syntax) = token.strip_prefix("source.") else {
                continue;
            };

            for (name, format) in &self.formats {
                let matches = syntax == name
                    || syntax
                        .strip_prefix(name.as_str())
                        .is_some_and(|rest| rest.starts_with('.'));
                if matches {
                    debug!("Scope token {} matched syntax {}", token, name);
                    return format;
                }
            }
        }

        debug!("No formatting for scope {:?}, using fallback", scope);
        &self.fallback
    }

    /// Wrap a generated body with delimiters and the source line's indentation
    pub fn wrap(&self, body: &str, indentation: &str, format: &CommentFormat) -> String {
        let mut lines = Vec::new();

        if !format.start.is_empty() {
            lines.push(format!("{}{}", indentation, format.start));
        }

        for line in body.lines() {
            let prefixed = format!("{}{}{}", indentation, format.line, line);
            lines.push(prefixed.trim_end().to_string());
        }

        if !format.end.is_empty() {
            lines.push(format!("{}{}", indentation, format.end));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}
