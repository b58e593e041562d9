use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "kitab-structure",
    version,
    about = "Structure discovery and passage slicing for digitized Arabic books"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Discover(DiscoverArgs),
    CheckCatalog(CheckCatalogArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    /// Page records, one JSON object per line.
    #[arg(long)]
    pub pages_path: PathBuf,

    /// Raw book markup the page records were cleaned from.
    #[arg(long)]
    pub markup_path: PathBuf,

    #[arg(long, default_value = "config/pattern_catalog.json")]
    pub catalog_path: PathBuf,

    #[arg(long)]
    pub science_id: String,

    #[arg(long, default_value = ".cache/kitab")]
    pub output_root: PathBuf,

    #[arg(long)]
    pub passages_path: Option<PathBuf>,

    #[arg(long)]
    pub divisions_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = 80)]
    pub max_heading_line_chars: usize,

    #[arg(long, default_value_t = 20)]
    pub long_passage_pages: usize,
}

#[derive(Args, Debug, Clone)]
pub struct CheckCatalogArgs {
    #[arg(long, default_value = "config/pattern_catalog.json")]
    pub catalog_path: PathBuf,
}
