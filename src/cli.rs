use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate a JSON array of {key, text, comment} sources
    Translate {
        /// Input sources file
        #[arg(short, long)]
        input: PathBuf,

        /// Source language tag
        #[arg(short, long, default_value = "en")]
        from: String,

        /// Target language tags (comma-separated)
        #[arg(short, long)]
        to: String,

        /// Provider override (microsoft, deepl, openai)
        #[arg(short, long)]
        provider: Option<String>,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported languages and their provider spellings
    Languages,

    /// Write a default configuration file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "lingosync.toml")]
        output: PathBuf,
    },
}
