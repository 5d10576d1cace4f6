// ABOUTME: Resolves CLI/env input into a validated export configuration
// ABOUTME: Missing credentials fail here, before any request is made

use crate::api::team_base_url;
use crate::cli::Cli;
use crate::storage::ExportPaths;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub token: String,
    pub base_url: String,
    pub paths: ExportPaths,
    pub max_pages: u32,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Directory holding the running executable.
fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::Config(format!("Cannot locate directory of {}", exe.display())))
}

impl ExportConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let token = non_empty(cli.token.as_deref()).ok_or_else(|| {
            Error::Config("No access token found. Provide via --token or QIITA_TOKEN".into())
        })?;

        let base_url = match (non_empty(cli.api_base.as_deref()), non_empty(cli.team.as_deref())) {
            (Some(base), _) => base.to_string(),
            (None, Some(team)) => team_base_url(team),
            (None, None) => {
                return Err(Error::Config(
                    "No team found. Provide via --team or QIITA_TEAM".into(),
                ))
            }
        };

        // Relative output roots are anchored at the program's directory.
        let out_dir = if cli.out_dir.is_absolute() {
            cli.out_dir.clone()
        } else {
            program_dir()?.join(&cli.out_dir)
        };
        let paths = ExportPaths::new(out_dir, Some(cli.md_file.clone()))?;

        Ok(ExportConfig {
            token: token.to_string(),
            base_url,
            paths,
            max_pages: cli.max_pages,
        })
    }
}
