//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - ask: answer one question and exit
//! - tools: list the research tools and their result caps

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// askr - ask a question, let the model search arXiv, Wikipedia, or the web
#[derive(Parser, Debug)]
#[command(name = "askr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a single question and print the result
    Ask {
        /// The question to ask
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// List the registered research tools
    Tools,
}

impl Commands {
    /// The question words joined back into one string
    pub fn question(&self) -> Option<String> {
        match self {
            Commands::Ask { question } => Some(question.join(" ")),
            Commands::Tools => None,
        }
    }
}
