use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::extract::extract_code_blocks;

/// Writes extracted blocks underneath a single base directory.
#[derive(Debug)]
pub struct FileManager {
    base_dir: PathBuf,
}

impl FileManager {
    /// Create the manager, making `base_dir` (and its parents) if it does not exist yet.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("Failed to create base directory {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Write `content` to `rel_path` under the base directory, replacing any existing file.
    ///
    /// Failures are logged with the relative path and reported as `false`; they never
    /// propagate, so one bad path does not stop the rest of a batch.
    pub fn write_file(&self, rel_path: &str, content: &str) -> bool {
        match self.try_write(rel_path, content) {
            Ok(()) => {
                info!("Successfully wrote to {}", rel_path);
                true
            }
            Err(e) => {
                error!("Error writing to {}: {:#}", rel_path, e);
                false
            }
        }
    }

    fn try_write(&self, rel_path: &str, content: &str) -> Result<()> {
        let full_path = self.base_dir.join(rel_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&full_path, content.as_bytes())
            .with_context(|| format!("Failed to write file {}", full_path.display()))?;
        Ok(())
    }

    /// Extract every block from `message` and write each one, in order.
    pub fn process_message(&self, message: &str) {
        for block in extract_code_blocks(message) {
            self.write_file(&block.rel_path, &block.content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use walkdir::WalkDir;

    fn files_under(dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .collect()
    }

    #[test]
    fn new_creates_missing_base_dir() {
        let tmp = tempdir().unwrap();
        let base = tmp.path().join("out/nested");
        let manager = FileManager::new(&base).unwrap();
        assert!(base.is_dir());
        assert_eq!(manager.base_dir(), base.as_path());
    }

    #[test]
    fn new_fails_when_base_is_a_file() {
        let tmp = tempdir().unwrap();
        let base = tmp.path().join("taken");
        fs::write(&base, "x").unwrap();
        assert!(FileManager::new(&base).is_err());
    }

    #[test]
    fn write_creates_intermediate_directories() {
        let tmp = tempdir().unwrap();
        let manager = FileManager::new(tmp.path()).unwrap();

        assert!(manager.write_file("a/b/c/deep.txt", "deep\n"));
        let written = fs::read_to_string(tmp.path().join("a/b/c/deep.txt")).unwrap();
        assert_eq!(written, "deep\n");
    }

    #[test]
    fn second_write_overwrites() {
        let tmp = tempdir().unwrap();
        let manager = FileManager::new(tmp.path()).unwrap();

        assert!(manager.write_file("dir/f.txt", "a much longer first version\n"));
        assert!(manager.write_file("dir/f.txt", "short\n"));
        let written = fs::read_to_string(tmp.path().join("dir/f.txt")).unwrap();
        assert_eq!(written, "short\n");
    }

    #[test]
    fn round_trip_is_exact() {
        let tmp = tempdir().unwrap();
        let manager = FileManager::new(tmp.path()).unwrap();
        let content = "  leading\r\nunicode: héllo ✓\n\ttrailing  ";

        assert!(manager.write_file("r.txt", content));
        assert_eq!(fs::read_to_string(tmp.path().join("r.txt")).unwrap(), content);
    }

    #[test]
    fn write_failure_returns_false() {
        let tmp = tempdir().unwrap();
        let manager = FileManager::new(tmp.path()).unwrap();
        fs::write(tmp.path().join("blocker"), "not a dir").unwrap();

        assert!(!manager.write_file("blocker/child.txt", "nope"));
        assert!(!tmp.path().join("blocker/child.txt").exists());
        assert_eq!(fs::read_to_string(tmp.path().join("blocker")).unwrap(), "not a dir");
    }

    #[test]
    fn process_writes_sidebar_example() {
        let tmp = tempdir().unwrap();
        let manager = FileManager::new(tmp.path()).unwrap();

        manager.process_message("````html:sidebar.html\n<!DOCTYPE html><html></html>\n````");
        let written = fs::read_to_string(tmp.path().join("sidebar.html")).unwrap();
        assert_eq!(written, "<!DOCTYPE html><html></html>\n");
    }

    #[test]
    fn process_without_blocks_writes_nothing() {
        let tmp = tempdir().unwrap();
        let manager = FileManager::new(tmp.path()).unwrap();

        manager.process_message("no fenced blocks in this message at all");
        assert!(files_under(tmp.path()).is_empty());
    }

    #[test]
    fn process_continues_after_failed_write() {
        let tmp = tempdir().unwrap();
        let manager = FileManager::new(tmp.path()).unwrap();
        fs::write(tmp.path().join("blocker"), "").unwrap();

        let msg = "````first.txt\none\n````\n\
                   ````blocker/bad.txt\nlost\n````\n\
                   ````sub/last.txt\nthree\n````\n";
        manager.process_message(msg);

        assert_eq!(fs::read_to_string(tmp.path().join("first.txt")).unwrap(), "one\n");
        assert_eq!(fs::read_to_string(tmp.path().join("sub/last.txt")).unwrap(), "three\n");
        assert!(!tmp.path().join("blocker/bad.txt").exists());
        assert_eq!(files_under(tmp.path()).len(), 3);
    }
}
