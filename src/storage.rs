// ABOUTME: Export directory layout with atomic writes
// ABOUTME: Maps post ids to directories and rejects unsafe path components

use crate::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILE: &str = "export.json";
pub const IMAGES_DIR: &str = "images";
pub const DEFAULT_MARKDOWN_FILE: &str = "index.md";

#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub out_dir: PathBuf,
    pub markdown_file: String,
}

impl ExportPaths {
    pub fn new(out_dir: PathBuf, markdown_file: Option<String>) -> Result<Self> {
        let markdown_file = markdown_file.unwrap_or_else(|| DEFAULT_MARKDOWN_FILE.into());
        ensure_safe_component(&markdown_file)?;

        Ok(ExportPaths {
            out_dir,
            markdown_file,
        })
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.out_dir.join(SNAPSHOT_FILE)
    }

    /// `<out>/<id>`; the id is the only input to the directory name.
    pub fn post_dir(&self, post_id: &str) -> Result<PathBuf> {
        ensure_safe_component(post_id)?;
        Ok(self.out_dir.join(post_id))
    }

    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        Ok(())
    }
}

/// Directories and files belonging to a single exported post.
#[derive(Debug, Clone)]
pub struct PostPaths {
    pub post_dir: PathBuf,
    pub images_dir: PathBuf,
    pub markdown_path: PathBuf,
}

impl PostPaths {
    pub fn new(paths: &ExportPaths, post_id: &str) -> Result<Self> {
        let post_dir = paths.post_dir(post_id)?;
        Ok(PostPaths {
            images_dir: post_dir.join(IMAGES_DIR),
            markdown_path: post_dir.join(&paths.markdown_file),
            post_dir,
        })
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.images_dir)?;
        Ok(())
    }
}

fn ensure_safe_component(name: &str) -> Result<()> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if unsafe_name {
        return Err(Error::UnsafePath(name.to_string()));
    }
    Ok(())
}

/// Replace `path` with `content`, via a temp file in the same directory.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".qiita-export")
        .suffix(".part")
        .tempfile_in(dir)?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| Error::Filesystem(e.error))?;

    Ok(())
}


#[cfg(test)]
mod write_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("test.txt");
        write_atomic(&target, b"hello").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
    }

    #[test]
    fn test_write_atomic_overwrites_and_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("index.md");
        write_atomic(&target, "first version, longer".as_bytes()).unwrap();
        write_atomic(&target, "日本語".as_bytes()).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "日本語");
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
