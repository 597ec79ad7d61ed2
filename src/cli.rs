use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "facetnav",
    version,
    about = "Faceted navigation analysis for category pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Catalog the input exports in a directory.
    Inventory(InventoryArgs),
    /// Run the full analysis and write the report plus CSV exports.
    Analyze(AnalyzeArgs),
    /// Classify a single URL or query and print the result as JSON.
    Classify(ClassifyArgs),
    /// Show the state of previous runs.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    /// Directory holding the raw exports.
    #[arg(long, default_value = "data")]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Category keyword the URLs hang under, e.g. `televisores`.
    #[arg(long)]
    pub category: String,

    /// Filter-usage export covering all traffic.
    #[arg(long)]
    pub filter_usage_all: Option<PathBuf>,

    /// Filter-usage export restricted to organic search sessions.
    #[arg(long)]
    pub filter_usage_seo: Option<PathBuf>,

    /// Search-console URL performance export.
    #[arg(long)]
    pub top_query: Option<PathBuf>,

    /// Keyword-research export.
    #[arg(long)]
    pub keywords: Option<PathBuf>,

    #[arg(long, default_value = "out")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(long)]
    pub category: String,

    /// URL to classify. Exactly one of --url and --query is required.
    #[arg(long, conflicts_with = "query")]
    pub url: Option<String>,

    /// Search query to classify.
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "out")]
    pub out_dir: PathBuf,
}
