//! Markdown front-matter tagger.
//!
//! Applies a YAML front-matter block with project metadata to untagged
//! Markdown files and validates already-tagged ones. Files that open
//! with a front-matter block are left byte-identical and reported as
//! already tagged.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result type for tagger operations
pub type TagResult<T> = Result<T, TagError>;

/// Errors raised while tagging or validating documents
#[derive(Debug)]
pub enum TagError {
    /// I/O error
    Io(std::io::Error),

    /// YAML front-matter error
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for TagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagError::Io(err) => write!(f, "I/O error: {}", err),
            TagError::Yaml(err) => write!(f, "YAML error: {}", err),
        }
    }
}

impl std::error::Error for TagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TagError::Io(err) => Some(err),
            TagError::Yaml(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TagError {
    fn from(err: std::io::Error) -> Self {
        TagError::Io(err)
    }
}

impl From<serde_yaml::Error> for TagError {
    fn from(err: serde_yaml::Error) -> Self {
        TagError::Yaml(err)
    }
}

/// Keys every front-matter block must carry
pub const REQUIRED_KEYS: [&str; 6] = ["id", "title", "owner", "status", "version", "last_updated"];

/// Document category detected from filename and content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Architecture,
    Implementation,
    Testing,
    Automation,
    Community,
    Documentation,
}

impl DocCategory {
    fn owner(self) -> &'static str {
        match self {
            DocCategory::Architecture => "platform",
            DocCategory::Implementation => "dev",
            DocCategory::Testing => "qa",
            DocCategory::Automation => "automation",
            DocCategory::Community => "community",
            DocCategory::Documentation => "docs",
        }
    }

    fn default_number(self) -> &'static str {
        match self {
            DocCategory::Architecture => "100",
            DocCategory::Implementation => "200",
            DocCategory::Testing => "300",
            DocCategory::Documentation => "400",
            DocCategory::Automation => "600",
            DocCategory::Community => "800",
        }
    }

    fn tags(self) -> Vec<String> {
        let tags: &[&str] = match self {
            DocCategory::Architecture => &["architecture", "system-design"],
            DocCategory::Implementation => &["implementation", "development"],
            DocCategory::Testing => &["testing", "quality-assurance"],
            DocCategory::Automation => &["automation", "tooling"],
            DocCategory::Community => &["community", "features"],
            DocCategory::Documentation => &["documentation", "knowledge"],
        };
        tags.iter().map(|s| s.to_string()).collect()
    }
}

/// Front-matter metadata applied to a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub status: String,
    pub version: String,
    pub last_updated: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Per-file tagging outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// A front-matter block was written
    Tagged,

    /// The file already opens with a front-matter block; left unmodified
    AlreadyTagged,
}

/// Validation verdict for a document's front matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatterStatus {
    /// All required keys present
    Valid,

    /// Front matter present but missing required keys
    Missing(Vec<String>),

    /// No front-matter block at all
    Absent,
}

/// Totals for a directory pass
#[derive(Debug, Clone, Default)]
pub struct TagStats {
    pub tagged: usize,
    pub already_tagged: usize,
    pub errors: usize,
}

/// Check whether content opens with a `---` front-matter block
pub fn has_front_matter(content: &str) -> bool {
    front_matter_block(content).is_some()
}

/// Extract the YAML text between the opening and closing `---` lines
fn front_matter_block(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---\n").or_else(|| content.strip_prefix("---\r\n"))?;
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

/// Apply front matter to a single file
pub fn tag_file(path: &Path) -> TagResult<TagOutcome> {
    let content = std::fs::read_to_string(path)?;

    if has_front_matter(&content) {
        return Ok(TagOutcome::AlreadyTagged);
    }

    let meta = build_metadata(path, &content);
    let yaml = serde_yaml::to_string(&meta)?;
    let tagged = format!("---\n{}---\n\n{}", yaml, content);
    std::fs::write(path, tagged)?;

    Ok(TagOutcome::Tagged)
}

/// Tag every Markdown file under a directory, skipping dotfiles
pub fn tag_directory(dir: &Path) -> TagResult<TagStats> {
    let mut stats = TagStats::default();
    for path in markdown_files(dir)? {
        match tag_file(&path) {
            Ok(TagOutcome::Tagged) => {
                println!("Tagged {}", path.display());
                stats.tagged += 1;
            }
            Ok(TagOutcome::AlreadyTagged) => {
                println!("Already tagged: {}", path.display());
                stats.already_tagged += 1;
            }
            Err(e) => {
                eprintln!("Error processing {}: {}", path.display(), e);
                stats.errors += 1;
            }
        }
    }
    Ok(stats)
}

/// Validate the front matter of a single file
pub fn validate_file(path: &Path) -> TagResult<FrontMatterStatus> {
    let content = std::fs::read_to_string(path)?;
    let Some(block) = front_matter_block(&content) else {
        return Ok(FrontMatterStatus::Absent);
    };

    let value: serde_yaml::Value = serde_yaml::from_str(block)?;
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| value.get(*key).is_none())
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(FrontMatterStatus::Valid)
    } else {
        Ok(FrontMatterStatus::Missing(missing))
    }
}

/// Markdown files under a directory, dotfiles skipped, sorted
pub fn markdown_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_markdown(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_markdown(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            walk_markdown(&path, out)?;
        } else if path.extension().map(|e| e == "md").unwrap_or(false) {
            out.push(path);
        }
    }
    Ok(())
}

fn build_metadata(path: &Path, content: &str) -> DocMeta {
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let category = detect_category(content, &filename);

    DocMeta {
        id: generate_id(category, &filename),
        title: extract_title(content),
        owner: category.owner().to_string(),
        status: detect_status(&filename),
        version: "1.0.0".to_string(),
        last_updated: Utc::now().format("%Y-%m-%d").to_string(),
        tags: category.tags(),
    }
}

fn detect_category(content: &str, filename: &str) -> DocCategory {
    let filename_lower = filename.to_lowercase();
    let content_lower = content.to_lowercase();

    let filename_has = |words: &[&str]| words.iter().any(|w| filename_lower.contains(w));

    if filename_has(&["architecture", "system", "design", "blueprint"]) {
        DocCategory::Architecture
    } else if filename_has(&["implementation", "plan", "guide", "roadmap"]) {
        DocCategory::Implementation
    } else if filename_has(&["test", "quality", "validation"]) {
        DocCategory::Testing
    } else if filename_has(&["factory", "automation", "pipeline"]) {
        DocCategory::Automation
    } else if ["community", "multiplayer", "healing"]
        .iter()
        .any(|w| content_lower.contains(w))
    {
        DocCategory::Community
    } else {
        DocCategory::Documentation
    }
}

fn generate_id(category: DocCategory, filename: &str) -> String {
    let digits: String = filename.chars().filter(|c| c.is_ascii_digit()).collect();
    let number = if digits.is_empty() {
        category.default_number().to_string()
    } else {
        format!("{:0>3}", &digits[..digits.len().min(3)])
    };
    format!("DOC-{}", number)
}

fn extract_title(content: &str) -> String {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .unwrap_or_else(|| "Untitled Document".to_string())
}

fn detect_status(filename: &str) -> String {
    let lower = filename.to_lowercase();
    if lower.contains("template") {
        "canonical"
    } else if lower.contains("draft") || lower.contains("temp") {
        "draft"
    } else if lower.contains("archive") || lower.contains("old") {
        "archived"
    } else {
        "canonical"
    }
    .to_string()
}
