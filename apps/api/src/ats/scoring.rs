//! ATS scoring — pluggable scorer that rates a resume against a job description.
//!
//! Default: `HeuristicScorer` (keyword/skill overlap plus structural checks,
//! deterministic, no I/O).
//!
//! `AppState` holds an `Arc<dyn ResumeScorer>`, chosen at startup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ats::keywords::KeywordExtractor;
use crate::ats::sections::{
    score_completeness, score_formatting, score_keyword_match, score_skills_match,
    score_structure, ScoreSection,
};
use crate::models::resume::{JobApplication, ResumeRecord};

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Keywords,
    Skills,
    Completeness,
    Formatting,
    MissingSkills,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub priority: Priority,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl Rating {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Rating::Excellent,
            60..=79 => Rating::Good,
            40..=59 => Rating::Fair,
            _ => Rating::NeedsWork,
        }
    }
}

/// Full compatibility report returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub overall_score: u32, // 0 – 100
    pub rating: Rating,
    /// Keyword match, skills match, completeness, formatting, structure.
    pub sections: Vec<ScoreSection>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub matched_skills: Vec<String>,
    /// Job skills with no counterpart on the resume ("consider adding").
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub scorer_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers.
///
/// Scoring is total: every resume/job pair yields an `Analysis`.
pub trait ResumeScorer: Send + Sync {
    fn analyze(&self, resume: &ResumeRecord, job: &JobApplication) -> Analysis;
}

/// Default scorer built on a shared `KeywordExtractor`.
pub struct HeuristicScorer {
    extractor: Arc<KeywordExtractor>,
}

impl HeuristicScorer {
    pub fn new(extractor: Arc<KeywordExtractor>) -> Self {
        Self { extractor }
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new(Arc::new(KeywordExtractor::new()))
    }
}

impl ResumeScorer for HeuristicScorer {
    fn analyze(&self, resume: &ResumeRecord, job: &JobApplication) -> Analysis {
        compute_analysis(&self.extractor, resume, job)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

const KEYWORD_SUGGESTION_BELOW: f64 = 60.0;
const SKILLS_SUGGESTION_BELOW: f64 = 50.0;
const COMPLETENESS_SUGGESTION_BELOW: f64 = 80.0;
const LISTED_IN_SUGGESTION: usize = 5;

pub fn compute_analysis(
    extractor: &KeywordExtractor,
    resume: &ResumeRecord,
    job: &JobApplication,
) -> Analysis {
    let keywords = score_keyword_match(extractor, resume, job);
    let skills = score_skills_match(extractor, resume, job);
    let completeness = score_completeness(resume);
    let formatting = score_formatting(resume);
    let structure = score_structure(resume);

    let total: f64 = [
        &keywords.section,
        &skills.section,
        &completeness,
        &formatting,
        &structure,
    ]
    .iter()
    .map(|s| s.score)
    .sum();
    let overall_score = total.round().clamp(0.0, 100.0) as u32;

    let suggestions = build_suggestions(
        &keywords.section,
        &keywords.missing,
        &skills.section,
        &completeness,
        &formatting,
        &skills.missing,
    );

    debug!(
        overall_score,
        keyword = keywords.section.score,
        skills = skills.section.score,
        completeness = completeness.score,
        formatting = formatting.score,
        structure = structure.score,
        "Computed ATS analysis"
    );

    Analysis {
        overall_score,
        rating: Rating::from_score(overall_score),
        sections: vec![keywords.section, skills.section, completeness, formatting, structure],
        matched_keywords: keywords.matched,
        missing_keywords: keywords.missing,
        matched_skills: skills.matched,
        missing_skills: skills.missing,
        suggestions,
        scorer_backend: "heuristic".to_string(),
    }
}

/// Suggestions in fixed order: keywords, skills, completeness, formatting,
/// missing skills.
fn build_suggestions(
    keywords: &ScoreSection,
    missing_keywords: &[String],
    skills: &ScoreSection,
    completeness: &ScoreSection,
    formatting: &ScoreSection,
    missing_skills: &[String],
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if keywords.percentage < KEYWORD_SUGGESTION_BELOW {
        let message = if keywords.message.is_some() {
            "Add the job description to measure how well your resume matches it.".to_string()
        } else if missing_keywords.is_empty() {
            "Mirror more of the job description's wording in your experience.".to_string()
        } else {
            format!(
                "Add more keywords from the job description, such as: {}.",
                top(missing_keywords)
            )
        };
        suggestions.push(Suggestion {
            category: SuggestionCategory::Keywords,
            priority: Priority::High,
            message,
        });
    }

    if skills.percentage < SKILLS_SUGGESTION_BELOW {
        suggestions.push(Suggestion {
            category: SuggestionCategory::Skills,
            priority: Priority::High,
            message: "Highlight more of the technical skills the job asks for in your skills section."
                .to_string(),
        });
    }

    if completeness.percentage < COMPLETENESS_SUGGESTION_BELOW {
        let message = match completeness.issues.first() {
            Some(first) => format!("Complete your resume. Start with: {first}."),
            None => "Add certifications, languages and profile links to complete your resume."
                .to_string(),
        };
        suggestions.push(Suggestion {
            category: SuggestionCategory::Completeness,
            priority: Priority::Medium,
            message,
        });
    }

    if !formatting.issues.is_empty() {
        suggestions.push(Suggestion {
            category: SuggestionCategory::Formatting,
            priority: Priority::Medium,
            message: format!("Fix formatting issues: {}.", formatting.issues.join("; ")),
        });
    }

    if !missing_skills.is_empty() {
        suggestions.push(Suggestion {
            category: SuggestionCategory::MissingSkills,
            priority: Priority::Medium,
            message: format!("Consider adding these skills if you have them: {}.", top(missing_skills)),
        });
    }

    suggestions
}

fn top(items: &[String]) -> String {
    items
        .iter()
        .take(LISTED_IN_SUGGESTION)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
