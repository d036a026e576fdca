use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "naturaldocs")]
#[command(about = "Inserts NaturalDocs comment skeletons above declarations")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Insert documentation skeletons above lines of a file
    Annotate {
        /// File to edit
        file: PathBuf,

        /// 1-based line numbers to document (repeat or comma-separate)
        #[arg(short, long = "line", value_delimiter = ',', required = true)]
        lines: Vec<usize>,

        /// Syntax name or scope (defaults to the one mapped from the file extension)
        #[arg(short, long)]
        syntax: Option<String>,

        /// Print the result instead of writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the comment block for a single line (reads stdin when no text is given)
    Generate {
        /// Source line to document
        text: Option<String>,

        /// Syntax name or scope used to pick comment delimiters
        #[arg(short, long)]
        syntax: Option<String>,

        /// Print the skeleton without comment delimiters
        #[arg(long)]
        raw: bool,
    },

    /// Show what a line is recognized as (reads stdin when no text is given)
    Classify {
        /// Source line to classify
        text: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Target file (defaults to naturaldocs.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List configured syntaxes and their comment delimiters
    Formats,
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Annotate { file, lines, syntax, dry_run } => {
                engine.annotate(file, lines, syntax, dry_run).await
            }
            Commands::Generate { text, syntax, raw } => {
                engine.generate(text, syntax, raw).await
            }
            Commands::Classify { text, json } => {
                engine.classify(text, json).await
            }
            Commands::Init { path, force } => {
                engine.init(path, force).await
            }
            Commands::Formats => engine.formats(),
        }
    }
}
