// ABOUTME: Top-level export run: fetch, snapshot, then one post at a time
// ABOUTME: Any post-level error stops the run; progress is shown per post

use crate::{
    api::ApiClient,
    export::save_post_to_markdown,
    storage::{write_atomic, ExportPaths},
    Result,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub posts: usize,
    pub images_saved: usize,
    pub images_failed: usize,
    pub snapshot_path: PathBuf,
}

pub fn run_export(client: &ApiClient, paths: &ExportPaths) -> Result<ExportSummary> {
    info!("fetching items");
    let items = client.fetch_all_items()?;

    paths.ensure_root()?;

    let snapshot_path = paths.snapshot_path();
    let snapshot = serde_json::to_string_pretty(&items)?;
    write_atomic(&snapshot_path, snapshot.as_bytes())?;
    info!(path = %snapshot_path.display(), items = items.len(), "snapshot written");

    let pb = ProgressBar::new(items.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} posts")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let mut summary = ExportSummary {
        posts: 0,
        images_saved: 0,
        images_failed: 0,
        snapshot_path,
    };

    for item in &items {
        // Bar stays hidden while the post logs.
        let result = pb.suspend(|| save_post_to_markdown(client, &item.post, paths));
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };

        summary.posts += 1;
        summary.images_saved += report.images_saved;
        summary.images_failed += report.images_failed;
        pb.inc(1);
    }

    pb.finish_with_message(format!("exported {} posts", summary.posts));
    info!(
        posts = summary.posts,
        images_saved = summary.images_saved,
        images_failed = summary.images_failed,
        "export finished"
    );

    Ok(summary)
}
