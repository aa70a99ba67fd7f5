//! Argument definitions for the `syb` binary

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "syb",
    version,
    about = "Ask questions of your database in natural language"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "sibyl.toml")]
    pub config: PathBuf,

    /// Verbose logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate SQL for a question, run it and print the result
    Ask {
        /// The question, in any language your model understands
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },

    /// Maintain the context index the generator draws on
    Train {
        #[command(subcommand)]
        action: TrainAction,
    },
}

#[derive(Subcommand)]
pub enum TrainAction {
    /// Index one CREATE statement
    Ddl {
        /// The statement, verbatim
        ddl: String,
    },

    /// Index one documentation / business-rule snippet
    Doc {
        /// The snippet text
        text: String,
    },

    /// Index one worked question and its known-good SQL
    Pair {
        /// The example question
        question: String,
        /// The SQL that answers it
        sql: String,
    },

    /// Extract the live database catalog and index its DDL
    Auto,

    /// Delete indexed context
    Reset {
        /// Restrict to one collection (ddl | documentation | sql_examples)
        #[arg(long)]
        collection: Option<String>,
    },

    /// Show per-collection record counts
    Show,
}
