// ABOUTME: Writes one post as a Markdown file with its images alongside
// ABOUTME: Image failures are logged and skipped; filesystem failures abort

use crate::frontmatter::{build_front_matter, compose_markdown};
use crate::images::{extract_image_urls, local_image_name, ImageFetcher};
use crate::storage::{write_atomic, ExportPaths, PostPaths, IMAGES_DIR};
use crate::{Post, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct PostReport {
    pub id: String,
    pub title: String,
    pub markdown_path: PathBuf,
    pub images_saved: usize,
    pub images_failed: usize,
}

pub fn save_post_to_markdown<F: ImageFetcher + ?Sized>(
    fetcher: &F,
    post: &Post,
    paths: &ExportPaths,
) -> Result<PostReport> {
    let post_paths = PostPaths::new(paths, &post.id)?;
    post_paths.ensure_dirs()?;

    let mut body = post.body.clone();
    let mut rewritten: HashSet<String> = HashSet::new();
    let mut images_saved = 0;
    let mut images_failed = 0;

    for url in extract_image_urls(&post.body) {
        // The first successful download already replaced every occurrence.
        if rewritten.contains(&url) {
            debug!(url = %url, "image already saved for this post");
            continue;
        }

        let Some(filename) = local_image_name(&url) else {
            warn!(url = %url, "image URL has no usable filename, leaving it remote");
            images_failed += 1;
            continue;
        };
        let local_path = format!("{}/{}", IMAGES_DIR, filename);
        let save_path = post_paths.images_dir.join(&filename);

        match fetcher.download_image(&url, &save_path) {
            Ok(()) => {
                body = body.replace(url.as_str(), &local_path);
                rewritten.insert(url);
                images_saved += 1;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "image download failed, leaving it remote");
                images_failed += 1;
            }
        }
    }

    let markdown = compose_markdown(&build_front_matter(post), &body);
    write_atomic(&post_paths.markdown_path, markdown.as_bytes())?;

    info!(
        title = %post.title,
        path = %post_paths.markdown_path.display(),
        "post saved"
    );

    Ok(PostReport {
        id: post.id.clone(),
        title: post.title.clone(),
        markdown_path: post_paths.markdown_path,
        images_saved,
        images_failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;
    use crate::Error;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Serves canned bytes per URL; anything else fails like a 404.
    #[derive(Default)]
    struct FakeFetcher {
        images: HashMap<String, Vec<u8>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn with(mut self, url: &str, bytes: &[u8]) -> Self {
            self.images.insert(url.to_string(), bytes.to_vec());
            self
        }
    }

    impl ImageFetcher for FakeFetcher {
        fn download_image(&self, url: &str, dest: &Path) -> Result<()> {
            self.calls.borrow_mut().push(url.to_string());
            match self.images.get(url) {
                Some(bytes) => write_atomic(dest, bytes),
                None => Err(Error::Api {
                    endpoint: url.to_string(),
                    status: 404,
                    message: "Not Found".into(),
                }),
            }
        }
    }

    fn post_with_body(id: &str, body: &str) -> Post {
        Post {
            id: id.into(),
            title: "Images".into(),
            body: body.into(),
            private: false,
            created_at: "2024-01-15T10:00:00+09:00".into(),
            updated_at: "2024-01-16T10:00:00+09:00".into(),
            tags: vec![Tag { name: "Rust".into() }],
        }
    }

    fn export_paths(temp: &TempDir) -> ExportPaths {
        ExportPaths::new(temp.path().join("export"), None).unwrap()
    }

    #[test]
    fn test_duplicate_url_rewritten_everywhere() {
        let temp = TempDir::new().unwrap();
        let paths = export_paths(&temp);
        let url = "https://x/a.png?v=2";
        let body = format!("![a]({url})\n<img src=\"{url}\">\n");
        let fetcher = FakeFetcher::default().with(url, b"PNG");

        let report = save_post_to_markdown(&fetcher, &post_with_body("p1", &body), &paths).unwrap();

        let md = fs::read_to_string(&report.markdown_path).unwrap();
        assert!(md.contains("![a](images/a.png)"));
        assert!(md.contains("<img src=\"images/a.png\">"));
        assert!(!md.contains("https://x/a.png"));

        let images_dir = temp.path().join("export/p1/images");
        let files: Vec<_> = fs::read_dir(&images_dir).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert_eq!(fs::read(images_dir.join("a.png")).unwrap(), b"PNG");
        assert_eq!(fetcher.calls.borrow().len(), 1);
        assert_eq!(report.images_saved, 1);
    }

    #[test]
    fn test_failed_image_stays_remote() {
        let temp = TempDir::new().unwrap();
        let paths = export_paths(&temp);
        let body = "![ok](https://x/ok.png)\n![broken](https://x/broken.png)\n";
        let fetcher = FakeFetcher::default().with("https://x/ok.png", b"OK");

        let report = save_post_to_markdown(&fetcher, &post_with_body("p2", body), &paths).unwrap();

        let md = fs::read_to_string(&report.markdown_path).unwrap();
        assert!(md.contains("![ok](images/ok.png)"));
        assert!(md.contains("![broken](https://x/broken.png)"));
        assert!(!temp.path().join("export/p2/images/broken.png").exists());
        assert_eq!((report.images_saved, report.images_failed), (1, 1));
    }

    #[test]
    fn test_markdown_layout() {
        let temp = TempDir::new().unwrap();
        let paths = export_paths(&temp);
        let fetcher = FakeFetcher::default();

        let report =
            save_post_to_markdown(&fetcher, &post_with_body("p3", "# Title\n本文"), &paths).unwrap();

        assert_eq!(report.markdown_path, temp.path().join("export/p3/index.md"));
        assert!(temp.path().join("export/p3/images").is_dir());

        let md = fs::read_to_string(&report.markdown_path).unwrap();
        assert!(md.starts_with("---\ntitle: Images\n"));
        assert!(md.ends_with("   - Rust\n---\n# Title\n本文"));
        assert!(fetcher.calls.borrow().is_empty());
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let paths = export_paths(&temp);
        let body = "![a](https://x/a.png)\n![b](https://x/missing.png)";
        let fetcher = FakeFetcher::default().with("https://x/a.png", b"A");
        let post = post_with_body("p4", body);

        let first = save_post_to_markdown(&fetcher, &post, &paths).unwrap();
        let md_first = fs::read(&first.markdown_path).unwrap();
        let second = save_post_to_markdown(&fetcher, &post, &paths).unwrap();
        let md_second = fs::read(&second.markdown_path).unwrap();

        assert_eq!(md_first, md_second);
        assert_eq!(fs::read(temp.path().join("export/p4/images/a.png")).unwrap(), b"A");
    }

    #[test]
    fn test_url_without_filename_is_left_alone() {
        let temp = TempDir::new().unwrap();
        let paths = export_paths(&temp);
        let body = "![dir](https://x/images/)";
        let fetcher = FakeFetcher::default().with("https://x/images/", b"?");

        let report = save_post_to_markdown(&fetcher, &post_with_body("p5", body), &paths).unwrap();

        let md = fs::read_to_string(&report.markdown_path).unwrap();
        assert!(md.contains("![dir](https://x/images/)"));
        assert!(fetcher.calls.borrow().is_empty());
        assert_eq!(report.images_failed, 1);
    }

    #[test]
    fn test_unsafe_post_id_is_fatal() {
        let temp = TempDir::new().unwrap();
        let paths = export_paths(&temp);
        let fetcher = FakeFetcher::default();

        let result = save_post_to_markdown(&fetcher, &post_with_body("../escape", "x"), &paths);
        assert!(matches!(result, Err(Error::UnsafePath(_))));
        assert!(!temp.path().join("escape").exists());
    }

    #[test]
    fn test_markdown_write_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let paths = export_paths(&temp);
        let blocked = temp.path().join("export/p6/index.md");
        fs::create_dir_all(&blocked).unwrap();
        let fetcher = FakeFetcher::default().with("https://x/a.png", b"A");

        let result =
            save_post_to_markdown(&fetcher, &post_with_body("p6", "![a](https://x/a.png)"), &paths);

        assert!(matches!(result, Err(Error::Filesystem(_))));
        assert!(blocked.is_dir());
    }
}
