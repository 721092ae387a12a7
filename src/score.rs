//! Keyword-density scoring.
//!
//! Pure, stateless text statistics: count occurrences of fixed keyword
//! lists per category, normalize by a length-based divisor, clamp to
//! [0, 1], and average. The scores gate nothing by themselves; thresholds
//! live in configuration as policy constants.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A named keyword list
#[derive(Debug, Clone)]
pub struct KeywordCategory {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordCategory {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A set of scoring categories plus an impact keyword list
#[derive(Debug, Clone)]
pub struct ScoringProfile {
    pub categories: Vec<KeywordCategory>,
    pub impact_keywords: Vec<String>,
}

impl Default for ScoringProfile {
    /// Default profile for the project under test: a location-based
    /// multiplayer web application
    fn default() -> Self {
        Self {
            categories: vec![
                KeywordCategory::new("awareness", &["consciousness", "aware", "sacred", "wisdom"]),
                KeywordCategory::new(
                    "community",
                    &["community", "healing", "collective", "together"],
                ),
                KeywordCategory::new(
                    "spatial",
                    &["spatial", "location", "map", "explore", "territory"],
                ),
                KeywordCategory::new(
                    "collaboration",
                    &["infinite", "eternal", "collaboration", "united"],
                ),
            ],
            impact_keywords: [
                "healing",
                "community",
                "together",
                "collective",
                "wisdom",
                "consciousness",
                "sacred",
                "spatial",
                "exploration",
                "connection",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl ScoringProfile {
    /// Score content against every category and average the results
    pub fn score(&self, content: &str) -> ContentScores {
        let lower = content.to_lowercase();
        let per_category: Vec<CategoryScore> = self
            .categories
            .iter()
            .map(|cat| CategoryScore {
                name: cat.name.clone(),
                score: category_score(&lower, &cat.keywords),
            })
            .collect();

        let overall = if per_category.is_empty() {
            0.0
        } else {
            per_category.iter().map(|c| c.score).sum::<f64>() / per_category.len() as f64
        };

        let impact = impact_score(&lower, &self.impact_keywords);

        ContentScores {
            per_category,
            overall,
            impact,
        }
    }
}

/// Score for a single category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub name: String,
    pub score: f64,
}

/// Scores computed for one piece of content
#[derive(Debug, Clone, Serialize)]
pub struct ContentScores {
    pub per_category: Vec<CategoryScore>,
    /// Average over categories, in [0, 1]
    pub overall: f64,
    /// Impact-keyword density, in [0, 1]
    pub impact: f64,
}

/// Normalized keyword density for one category
///
/// `min(matches / max(len / 100, 1), 1.0)` — the divisor grows with
/// content length so long files need proportionally more matches.
pub fn category_score(content_lower: &str, keywords: &[String]) -> f64 {
    density(content_lower, keywords, 100.0)
}

/// Normalized density over the impact keyword list (divisor len / 50)
pub fn impact_score(content_lower: &str, keywords: &[String]) -> f64 {
    density(content_lower, keywords, 50.0)
}

fn density(content_lower: &str, keywords: &[String], unit: f64) -> f64 {
    let matches: usize = keywords
        .iter()
        .map(|kw| content_lower.matches(kw.as_str()).count())
        .sum();
    let divisor = (content_lower.len() as f64 / unit).max(1.0);
    (matches as f64 / divisor).min(1.0)
}

/// Score attached to a source file
#[derive(Debug, Clone, Serialize)]
pub struct FileScore {
    pub path: PathBuf,
    pub overall: f64,
    pub impact: f64,
    /// Read/decode failure detail; such files contribute zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Score a list of files, treating unreadable files as zero contribution
pub fn score_files(profile: &ScoringProfile, paths: &[PathBuf]) -> Vec<FileScore> {
    paths
        .iter()
        .map(|path| match std::fs::read_to_string(path) {
            Ok(content) => {
                let scores = profile.score(&content);
                FileScore {
                    path: path.clone(),
                    overall: scores.overall,
                    impact: scores.impact,
                    error: None,
                }
            }
            Err(e) => FileScore {
                path: path.clone(),
                overall: 0.0,
                impact: 0.0,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

/// Average of per-file overall scores; 0.0 for an empty set
pub fn average_score(scores: &[FileScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|s| s.overall).sum::<f64>() / scores.len() as f64
}

/// Recursively collect files with the given extension, sorted for
/// deterministic analysis order
pub fn collect_files(root: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_into(root, extension, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_into(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            collect_into(&path, extension, out)?;
        } else if path.extension().map(|e| e == extension).unwrap_or(false) {
            out.push(path);
        }
    }
    Ok(())
}

// ============================================================================
// Post-run alignment validation
// ============================================================================

/// Per-aspect scores for a completed scenario run
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentMetrics {
    pub user_experience: f64,
    pub community_impact: f64,
    pub spatial_alignment: f64,
    pub collaboration: f64,
}

impl AlignmentMetrics {
    fn mean(&self) -> f64 {
        (self.user_experience + self.community_impact + self.spatial_alignment + self.collaboration)
            / 4.0
    }
}

/// Post-run validation verdict for a scenario
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    pub overall_score: f64,
    pub metrics: AlignmentMetrics,
    pub aligned: bool,
    pub recommendations: Vec<String>,
}

/// Derive the post-run alignment report from the run outcome
///
/// Base scores are fixed policy values awarded on success, with a small
/// bonus when the run beat 80% of its expected duration.
pub fn post_run_alignment(success: bool, efficiency_ratio: f64, threshold: f64) -> AlignmentReport {
    let mut metrics = if success {
        AlignmentMetrics {
            user_experience: 0.9,
            community_impact: 0.8,
            spatial_alignment: 0.85,
            collaboration: 0.75,
        }
    } else {
        AlignmentMetrics {
            user_experience: 0.0,
            community_impact: 0.0,
            spatial_alignment: 0.0,
            collaboration: 0.0,
        }
    };

    if efficiency_ratio > 0.8 {
        metrics.user_experience += 0.1;
    }

    let overall_score = metrics.mean();
    let recommendations = alignment_recommendations(&metrics);

    AlignmentReport {
        overall_score,
        aligned: overall_score >= threshold,
        metrics,
        recommendations,
    }
}

fn alignment_recommendations(metrics: &AlignmentMetrics) -> Vec<String> {
    let mut recommendations = Vec::new();

    if metrics.user_experience < 0.8 {
        recommendations.push("Improve user experience flows in the tested screens".to_string());
    }
    if metrics.community_impact < 0.8 {
        recommendations.push("Strengthen community features and interactions".to_string());
    }
    if metrics.spatial_alignment < 0.8 {
        recommendations.push("Tighten map and location integration in the UI".to_string());
    }
    if metrics.collaboration < 0.8 {
        recommendations.push("Expand multiplayer collaboration capabilities".to_string());
    }

    recommendations
}
