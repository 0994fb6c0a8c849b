//! The five weighted sections of an ATS compatibility score.
//!
//! Every section is clamped to `[0, max_score]`; the maxima sum to 100.

use serde::{Deserialize, Serialize};

use crate::ats::keywords::KeywordExtractor;
use crate::models::resume::{is_filled, JobApplication, ResumeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    KeywordMatch,
    SkillsMatch,
    Completeness,
    Formatting,
    Structure,
}

pub const SECTION_WEIGHTS: &[(SectionKind, f64)] = &[
    (SectionKind::KeywordMatch, 30.0),
    (SectionKind::SkillsMatch, 25.0),
    (SectionKind::Completeness, 20.0),
    (SectionKind::Formatting, 15.0),
    (SectionKind::Structure, 10.0),
];

impl SectionKind {
    pub fn max_score(self) -> f64 {
        SECTION_WEIGHTS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, weight)| *weight)
            .unwrap_or(0.0)
    }

    pub fn label(self) -> &'static str {
        match self {
            SectionKind::KeywordMatch => "Keyword Match",
            SectionKind::SkillsMatch => "Skills Match",
            SectionKind::Completeness => "Completeness",
            SectionKind::Formatting => "Formatting",
            SectionKind::Structure => "Structure",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSection {
    pub section: SectionKind,
    pub name: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    /// Set when the section short-circuited (nothing to compare against).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub issues: Vec<String>,
}

impl ScoreSection {
    pub fn new(section: SectionKind, raw_score: f64) -> Self {
        let max_score = section.max_score();
        let score = if raw_score.is_finite() {
            raw_score.clamp(0.0, max_score)
        } else {
            0.0
        };
        let percentage = if max_score > 0.0 {
            score / max_score * 100.0
        } else {
            0.0
        };
        Self {
            section,
            name: section.label().to_string(),
            score,
            max_score,
            percentage,
            message: None,
            issues: Vec::new(),
        }
    }

    fn empty(section: SectionKind, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(section, 0.0)
        }
    }
}

/// Keyword section plus the keyword lists it was computed from.
#[derive(Debug, Clone)]
pub struct KeywordMatch {
    pub section: ScoreSection,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Skills section plus the job skills that were and were not covered.
#[derive(Debug, Clone)]
pub struct SkillsMatch {
    pub section: ScoreSection,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// `min(30, 30 × matched / job keywords)`, comparing repeated terms of the
/// job description with repeated terms of the resume body.
pub fn score_keyword_match(
    extractor: &KeywordExtractor,
    resume: &ResumeRecord,
    job: &JobApplication,
) -> KeywordMatch {
    let kind = SectionKind::KeywordMatch;
    if !job.has_description() {
        return KeywordMatch {
            section: ScoreSection::empty(kind, "No job description provided"),
            matched: Vec::new(),
            missing: Vec::new(),
        };
    }

    let job_keywords = extractor.extract_keywords(&job.job_description);
    if job_keywords.is_empty() {
        return KeywordMatch {
            section: ScoreSection::empty(kind, "No recurring keywords found in job description"),
            matched: Vec::new(),
            missing: Vec::new(),
        };
    }

    let resume_keywords = extractor.extract_keywords(&resume.keyword_corpus());
    let (matched, missing): (Vec<String>, Vec<String>) = job_keywords
        .iter()
        .cloned()
        .partition(|kw| resume_keywords.contains(kw));

    let max = kind.max_score();
    let raw = (max * matched.len() as f64 / job_keywords.len() as f64).min(max);

    KeywordMatch {
        section: ScoreSection::new(kind, raw),
        matched,
        missing,
    }
}

/// `min(25, 25 × matched / job skills)`. A job skill is covered when a
/// declared skill contains it or is contained by it, ignoring case.
pub fn score_skills_match(
    extractor: &KeywordExtractor,
    resume: &ResumeRecord,
    job: &JobApplication,
) -> SkillsMatch {
    let kind = SectionKind::SkillsMatch;
    if !job.has_description() {
        return SkillsMatch {
            section: ScoreSection::empty(kind, "No job description provided"),
            matched: Vec::new(),
            missing: Vec::new(),
        };
    }

    let job_skills = extractor.extract_technical_skills(&job.job_description);
    if job_skills.is_empty() {
        return SkillsMatch {
            section: ScoreSection::empty(kind, "No technical skills detected in job description"),
            matched: Vec::new(),
            missing: Vec::new(),
        };
    }

    let declared: Vec<String> = resume
        .skills
        .iter()
        .filter(|s| is_filled(s))
        .map(|s| s.trim().to_lowercase())
        .collect();

    if declared.is_empty() {
        return SkillsMatch {
            section: ScoreSection::empty(kind, "No skills listed on resume"),
            matched: Vec::new(),
            missing: job_skills.into_iter().collect(),
        };
    }

    let (matched, missing): (Vec<String>, Vec<String>) =
        job_skills.iter().cloned().partition(|job_skill| {
            declared
                .iter()
                .any(|s| s.contains(job_skill.as_str()) || job_skill.contains(s.as_str()))
        });

    let max = kind.max_score();
    let raw = (max * matched.len() as f64 / job_skills.len() as f64).min(max);

    SkillsMatch {
        section: ScoreSection::new(kind, raw),
        matched,
        missing,
    }
}

/// Fixed point allocation for filled-in content, capped at 20.
pub fn score_completeness(resume: &ResumeRecord) -> ScoreSection {
    let mut points = 0.0;
    let mut issues = Vec::new();
    let info = &resume.personal_info;

    if is_filled(&info.full_name) {
        points += 1.0;
    } else {
        issues.push("Name is missing".to_string());
    }
    if is_filled(&info.email) {
        points += 1.0;
    } else {
        issues.push("Email is missing".to_string());
    }

    if resume
        .work_experience
        .iter()
        .any(|w| w.value.is_fully_described())
    {
        points += 5.0;
    } else if !resume.work_experience.is_empty() {
        points += 2.0;
        issues.push("Work experience lacks company, position or responsibilities".to_string());
    } else {
        issues.push("No work experience".to_string());
    }

    if resume
        .education
        .iter()
        .any(|e| is_filled(&e.value.institution) && is_filled(&e.value.degree))
    {
        points += 3.0;
    } else if !resume.education.is_empty() {
        points += 1.0;
        issues.push("Education lacks institution or degree".to_string());
    } else {
        issues.push("No education".to_string());
    }

    let skill_count = resume.skills.iter().filter(|s| is_filled(s)).count();
    if skill_count >= 5 {
        points += 3.0;
    } else if skill_count > 0 {
        points += 1.0;
        issues.push(format!("Only {skill_count} skills listed, aim for at least 5"));
    } else {
        issues.push("No skills listed".to_string());
    }

    if !resume.certifications.is_empty() {
        points += 1.0;
    }
    if !resume.languages.is_empty() {
        points += 1.0;
    }
    if info.has_any_link() {
        points += 1.0;
    }

    ScoreSection {
        issues,
        ..ScoreSection::new(SectionKind::Completeness, points)
    }
}

/// Starts at 15 and deducts for layout problems an ATS trips over.
pub fn score_formatting(resume: &ResumeRecord) -> ScoreSection {
    let kind = SectionKind::Formatting;
    let mut score = kind.max_score();
    let mut issues = Vec::new();

    if resume.work_experience.is_empty() {
        score -= 3.0;
        issues.push("No work experience entries".to_string());
    } else if resume
        .work_experience
        .iter()
        .any(|w| !is_filled(&w.value.start_date))
    {
        score -= 2.0;
        issues.push("Some work experience entries are missing dates".to_string());
    }

    if resume
        .work_experience
        .iter()
        .any(|w| w.value.responsibilities.chars().count() > 500)
    {
        score -= 1.0;
        issues.push("Some responsibilities are longer than 500 characters".to_string());
    }

    ScoreSection {
        issues,
        ..ScoreSection::new(kind, score)
    }
}

/// Starts at 10 and deducts for each core section that is absent.
pub fn score_structure(resume: &ResumeRecord) -> ScoreSection {
    let kind = SectionKind::Structure;
    let mut score = kind.max_score();
    let mut issues = Vec::new();

    if resume.work_experience.is_empty() {
        score -= 3.0;
        issues.push("Missing work experience section".to_string());
    }
    if resume.education.is_empty() {
        score -= 2.0;
        issues.push("Missing education section".to_string());
    }
    if !resume.skills.iter().any(|s| is_filled(s)) {
        score -= 2.0;
        issues.push("Missing skills section".to_string());
    }

    ScoreSection {
        issues,
        ..ScoreSection::new(kind, score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::identity::Identified;
    use crate::models::resume::{Education, WorkExperience};

    fn full_work() -> Identified<WorkExperience> {
        Identified::anonymous(WorkExperience {
            company: "Acme".into(),
            position: "Engineer".into(),
            start_date: "2020-01".into(),
            responsibilities: "Built things".into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_section_weights_sum_to_100() {
        let total: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_score_section_clamps() {
        assert_eq!(ScoreSection::new(SectionKind::Structure, 14.0).score, 10.0);
        assert_eq!(ScoreSection::new(SectionKind::Structure, -4.0).score, 0.0);
        assert_eq!(ScoreSection::new(SectionKind::Structure, f64::NAN).score, 0.0);
        assert_eq!(ScoreSection::new(SectionKind::Formatting, 7.5).percentage, 50.0);
    }

    #[test]
    fn test_completeness_name_email_and_full_work_is_seven() {
        let mut resume = ResumeRecord::default();
        resume.personal_info.full_name = "Ada".into();
        resume.personal_info.email = "ada@example.com".into();
        resume.work_experience.push(full_work());

        let section = score_completeness(&resume);
        assert_eq!(section.score, 7.0);
        assert_eq!(section.max_score, 20.0);
    }

    #[test]
    fn test_completeness_partial_entries() {
        let mut resume = ResumeRecord::default();
        resume
            .work_experience
            .push(Identified::anonymous(WorkExperience {
                company: "Acme".into(),
                ..Default::default()
            }));
        resume.education.push(Identified::anonymous(Education {
            institution: "MIT".into(),
            ..Default::default()
        }));
        resume.skills = vec!["Rust".into()];

        // work 2 + education 1 + skills 1
        assert_eq!(score_completeness(&resume).score, 4.0);
    }

    #[test]
    fn test_completeness_everything_filled() {
        let value = serde_json::json!({
            "personalInfo": {"fullName": "Ada", "email": "a@b.c", "github": "gh/ada"},
            "workExperience": [{"company": "A", "position": "B", "responsibilities": "C"}],
            "education": [{"institution": "MIT", "degree": "BSc"}],
            "skills": ["a", "b", "c", "d", "e"],
            "certifications": [{"name": "CKA"}],
            "languages": [{"language": "French"}]
        });
        let section = score_completeness(&ResumeRecord::from_value(&value));
        assert_eq!(section.score, 16.0);
        assert!(section.issues.is_empty());
    }

    #[test]
    fn test_formatting_without_work_experience_is_twelve() {
        let section = score_formatting(&ResumeRecord::default());
        assert_eq!(section.score, 12.0);
        assert_eq!(section.issues.len(), 1);
    }

    #[test]
    fn test_formatting_missing_dates_and_long_text() {
        let mut resume = ResumeRecord::default();
        resume
            .work_experience
            .push(Identified::anonymous(WorkExperience {
                responsibilities: "x".repeat(501),
                ..Default::default()
            }));
        let section = score_formatting(&resume);
        assert_eq!(section.score, 12.0);
        assert_eq!(section.issues.len(), 2);
    }

    #[test]
    fn test_formatting_clean_resume_keeps_full_score() {
        let mut resume = ResumeRecord::default();
        resume.work_experience.push(full_work());
        assert_eq!(score_formatting(&resume).score, 15.0);
    }

    #[test]
    fn test_structure_deductions() {
        assert_eq!(score_structure(&ResumeRecord::default()).score, 3.0);

        let mut resume = ResumeRecord::default();
        resume.work_experience.push(full_work());
        resume.skills = vec!["Rust".into()];
        assert_eq!(score_structure(&resume).score, 8.0);
    }

    #[test]
    fn test_keyword_match_without_description() {
        let extractor = KeywordExtractor::new();
        let result =
            score_keyword_match(&extractor, &ResumeRecord::default(), &JobApplication::default());
        assert_eq!(result.section.score, 0.0);
        assert!(result.section.message.is_some());
    }

    #[test]
    fn test_keyword_match_ratio() {
        let extractor = KeywordExtractor::new();
        let job = JobApplication::new(
            "Engineer",
            "Rust services. Rust tooling. Kafka pipelines. Kafka clusters.",
        );
        let mut resume = ResumeRecord::default();
        resume.work_experience.push(Identified::anonymous(WorkExperience {
            position: "Rust engineer".into(),
            responsibilities: "Wrote Rust services".into(),
            ..Default::default()
        }));

        let result = score_keyword_match(&extractor, &resume, &job);
        assert_eq!(result.matched, vec!["rust"]);
        assert_eq!(result.missing, vec!["kafka"]);
        assert_eq!(result.section.score, 15.0);
    }

    #[test]
    fn test_skills_match_substring_either_direction() {
        let extractor = KeywordExtractor::new();
        let job = JobApplication::new("Dev", "we need postgresql and docker and kafka");
        let mut resume = ResumeRecord::default();
        resume.skills = vec!["PostgreSQL 15".into(), "docker".into()];

        let result = score_skills_match(&extractor, &resume, &job);
        assert_eq!(result.matched, vec!["docker", "postgresql"]);
        assert_eq!(result.missing, vec!["kafka"]);
        assert!((result.section.score - 25.0 * 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_skills_match_without_declared_skills_reports_all_missing() {
        let extractor = KeywordExtractor::new();
        let job = JobApplication::new("Dev", "rust and redis");
        let result = score_skills_match(&extractor, &ResumeRecord::default(), &job);
        assert_eq!(result.section.score, 0.0);
        assert_eq!(result.missing, vec!["redis", "rust"]);
        assert!(result.section.message.is_some());
    }

    #[test]
    fn test_keyword_match_without_recurring_terms() {
        let extractor = KeywordExtractor::new();
        let job = JobApplication::new("Engineer", "rust and postgres engineer wanted");
        let result = score_keyword_match(&extractor, &ResumeRecord::default(), &job);
        assert_eq!(result.section.score, 0.0);
        assert!(result.section.message.is_some());
        assert!(result.matched.is_empty());
    }

    #[test]
    fn test_skills_match_without_detected_job_skills() {
        let extractor = KeywordExtractor::new();
        let job = JobApplication::new("Support", "patient people person who enjoys helping customers every day");
        let mut resume = ResumeRecord::default();
        resume.skills = vec!["Rust".into()];

        let result = score_skills_match(&extractor, &resume, &job);
        assert_eq!(result.section.score, 0.0);
        assert!(result.section.message.is_some());
        assert!(result.missing.is_empty());
    }
}
