// ABOUTME: Command-line interface definitions using clap
// ABOUTME: Every option falls back to the matching environment variable

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qiita-export")]
#[command(about = "Export your Qiita Team posts and their images to Markdown", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Qiita Team name (the <team> in <team>.qiita.com)
    #[arg(long, env = "QIITA_TEAM")]
    pub team: Option<String>,

    /// Personal access token
    #[arg(long, env = "QIITA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output directory (relative paths sit next to the executable)
    #[arg(long, env = "OUTDIR", default_value = "export")]
    pub out_dir: PathBuf,

    /// Markdown filename written inside each post directory
    #[arg(long, env = "MDFILE", default_value = "index.md")]
    pub md_file: String,

    /// API base URL (defaults to https://<team>.qiita.com/api/v2)
    #[arg(long, env = "QIITA_API_BASE")]
    pub api_base: Option<String>,

    /// Stop after this many pages of 100 items
    #[arg(long, default_value_t = crate::api::DEFAULT_MAX_PAGES, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: u32,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}
