use serde::{Deserialize, Serialize};

use crate::compare::diff::{ChangeKind, ChangeSet};

/// Top-level resume sections, in display order.
pub const RESUME_SECTIONS: &[&str] = &[
    "personalInfo",
    "workExperience",
    "education",
    "skills",
    "certifications",
    "languages",
    "jobApplication",
];

pub const OTHER_SECTION: &str = "other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionChanges {
    pub section: String,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl SectionChanges {
    fn new(section: &str) -> Self {
        Self {
            section: section.to_string(),
            added: 0,
            removed: 0,
            modified: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub total_changes: usize,
    pub has_changes: bool,
    /// Only sections with at least one change; `other` comes last.
    pub sections: Vec<SectionChanges>,
}

/// Name of the section a change path belongs to: everything before the
/// first `.` or `[`, or `other` when that is not a resume section.
pub fn section_of(path: &str) -> &str {
    let end = path.find(|c: char| c == '.' || c == '[').unwrap_or(path.len());
    let head = &path[..end];
    if RESUME_SECTIONS.contains(&head) {
        head
    } else {
        OTHER_SECTION
    }
}

/// Per-section change counts for a comparison view.
pub fn summarize(changes: &ChangeSet) -> ChangeSummary {
    let mut sections: Vec<SectionChanges> = RESUME_SECTIONS
        .iter()
        .chain(std::iter::once(&OTHER_SECTION))
        .map(|name| SectionChanges::new(name))
        .collect();

    for entry in changes.iter() {
        let name = section_of(entry.path());
        if let Some(bucket) = sections.iter_mut().find(|s| s.section == name) {
            match entry.kind() {
                ChangeKind::Added => bucket.added += 1,
                ChangeKind::Removed => bucket.removed += 1,
                ChangeKind::Modified => bucket.modified += 1,
            }
        }
    }

    sections.retain(|s| s.total() > 0);
    let total_changes = changes.len();

    ChangeSummary {
        total_changes,
        has_changes: total_changes > 0,
        sections,
    }
}
