use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "keyword-scout")]
#[command(about = "Checks which keywords appear on the internal pages of a website")]
#[command(version)]
pub struct Args {
    /// Website to scan (must start with http:// or https://)
    pub website: String,

    /// File with one keyword per line (only the first comma/tab separated column is read)
    #[arg(short = 'f', long)]
    pub keywords_file: Option<PathBuf>,

    /// Keyword to look for; may be repeated
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of internal links to check
    #[arg(long)]
    pub max_links: Option<usize>,

    /// Number of concurrent fetches
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Total timeout in seconds (maximum runtime)
    #[arg(long)]
    pub total_timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
