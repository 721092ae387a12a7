//! Run artifact management.
//!
//! Each scenario run gets its own timestamped directory under the
//! configured screenshot base; screenshot steps write into it and the
//! run report records the paths.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Utc;

/// Artifact directory for a single scenario run
#[derive(Debug, Clone)]
pub struct RunDir {
    dir: PathBuf,
}

impl RunDir {
    /// Create a fresh run directory under `base` for the named scenario
    pub fn create(base: impl AsRef<Path>, scenario: &str) -> std::io::Result<Self> {
        let id = format!("{}_{}", sanitize_name(scenario), generate_timestamp());
        let dir = base.as_ref().join(id);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Reuse an existing directory as the run directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the run directory
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Path for a screenshot artifact named after its step
    pub fn screenshot_path(&self, step_name: &str) -> PathBuf {
        let filename = format!("{}_{}.png", sanitize_name(step_name), generate_timestamp());
        self.dir.join(filename)
    }

    /// List all PNG files in the run directory
    pub fn list_screenshots(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut captures = Vec::new();
        if self.dir.exists() {
            for entry in fs::read_dir(&self.dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().map(|e| e == "png").unwrap_or(false) {
                    captures.push(path);
                }
            }
        }
        captures.sort();
        Ok(captures)
    }
}

/// Remove run directories under `base` older than the given age
pub fn cleanup_old_runs(base: impl AsRef<Path>, max_age: std::time::Duration) -> std::io::Result<usize> {
    let base = base.as_ref();
    if !base.exists() {
        return Ok(0);
    }

    let now = SystemTime::now();
    let mut cleaned = 0;

    for entry in fs::read_dir(base)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            if let Ok(metadata) = entry.metadata() {
                if let Ok(modified) = metadata.modified() {
                    if let Ok(age) = now.duration_since(modified) {
                        if age > max_age && fs::remove_dir_all(&path).is_ok() {
                            cleaned += 1;
                        }
                    }
                }
            }
        }
    }

    Ok(cleaned)
}

/// Generate a timestamp string in YYYYMMDD_HHMMSS format
pub fn generate_timestamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Sanitize a name for use in filenames
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("hello world"), "hello_world");
        assert_eq!(sanitize_name("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_name("screenshot_final"), "screenshot_final");
    }

    #[test]
    fn test_run_dir_screenshot_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let run = RunDir::create(tmp.path(), "base_establishment_flow").unwrap();
        assert!(run.path().exists());

        let path = run.screenshot_path("screenshot final");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("screenshot_final_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_list_screenshots_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let run = RunDir::in_dir(tmp.path().join("run")).unwrap();
        fs::write(run.path().join("b.png"), b"x").unwrap();
        fs::write(run.path().join("a.png"), b"x").unwrap();
        fs::write(run.path().join("notes.txt"), b"x").unwrap();

        let shots = run.list_screenshots().unwrap();
        assert_eq!(shots.len(), 2);
        assert!(shots[0].ends_with("a.png"));
    }

    #[test]
    fn test_cleanup_missing_base_is_noop() {
        let cleaned =
            cleanup_old_runs("/nonexistent/qa-pilot-base", std::time::Duration::from_secs(1))
                .unwrap();
        assert_eq!(cleaned, 0);
    }
}
