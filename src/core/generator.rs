use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tracing::debug;

use crate::config::TemplateConfig;
use crate::error::Result;
use super::blocks::{BlockKind, Declaration};

const CLASS_TEMPLATE: &str = "{{ keyword }}: {{ name }}\n{{ indent }}Description";

const VARIABLE_TEMPLATE: &str = "{{ keyword }}: {{ name }}\n{{ indent }}Description";

const FUNCTION_TEMPLATE: &str = concat!(
    "{{ keyword }}: {{ name }}\n",
    "{{ indent }}Description\n",
    "{%- if parameters %}\n",
    "\n",
    "Parameters:\n",
    "{%- for param in parameters %}\n",
    "{{ indent }}{{ param }} - Description\n",
    "{%- endfor %}\n",
    "{%- endif %}\n",
    "{%- if returns %}\n",
    "\n",
    "Returns:\n",
    "{{ indent }}{{ returns }}\n",
    "{%- endif %}",
);

/// Documentation skeleton rendered for one declaration, before comment wrapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDoc {
    pub kind: BlockKind,
    pub name: String,
    pub body: String,
}

/// Renders declarations into NaturalDocs topic text
pub struct DocGenerator {
    tera: Tera,
    body_indent: String,
}

impl DocGenerator {
    pub fn new(config: &TemplateConfig) -> Result<Self> {
        let mut tera = Tera::default();

        for kind in [BlockKind::Class, BlockKind::Function, BlockKind::Variable] {
            let builtin = match kind {
                BlockKind::Class => CLASS_TEMPLATE,
                BlockKind::Function => FUNCTION_TEMPLATE,
                BlockKind::Variable => VARIABLE_TEMPLATE,
            };

            let custom = match &config.template_dir {
                Some(dir) => {
                    let path = dir.join(format!("{}.ndoc", kind));
                    if path.is_file() {
                        debug!("Using custom {} template from {}", kind, path.display());
                        Some(std::fs::read_to_string(&path)?)
                    } else {
                        None
                    }
                }
                None => None,
            };

            tera.add_raw_template(kind.as_str(), custom.as_deref().unwrap_or(builtin))?;
        }

        Ok(Self {
            tera,
            body_indent: config.body_indent.clone(),
        })
    }

    /// Render the skeleton for a declaration
    pub fn render(&self, declaration: &Declaration) -> Result<GeneratedDoc> {
        let mut context = Context::new();
        context.insert("keyword", &declaration.keyword);
        context.insert("name", &declaration.name);
        context.insert("parameters", &declaration.parameters);
        context.insert("returns", &declaration.returns);
        context.insert("indent", &self.body_indent);

        let body = self.tera.render(declaration.kind.as_str(), &context)?;

        Ok(GeneratedDoc {
            kind: declaration.kind,
            name: declaration.name.clone(),
            body,
        })
    }
}
