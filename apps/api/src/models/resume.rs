use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::identity::{EntryId, Identified, KeySource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(alias = "name")]
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: String,
    pub github: String,
    #[serde(alias = "website")]
    pub portfolio: String,
    pub summary: String,
}

impl PersonalInfo {
    /// True when at least one social or portfolio link is filled in.
    pub fn has_any_link(&self) -> bool {
        [&self.linkedin, &self.github, &self.portfolio]
            .iter()
            .any(|link| !link.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    /// `None` for the current position.
    pub end_date: Option<String>,
    pub current: bool,
    pub responsibilities: String,
}

impl WorkExperience {
    pub fn is_fully_described(&self) -> bool {
        is_filled(&self.company) && is_filled(&self.position) && is_filled(&self.responsibilities)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub language: String,
    pub proficiency: String,
}

/// The target job a resume is tailored to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobApplication {
    pub job_title: String,
    pub job_description: String,
}

impl JobApplication {
    pub fn new(job_title: impl Into<String>, job_description: impl Into<String>) -> Self {
        Self {
            job_title: job_title.into(),
            job_description: job_description.into(),
        }
    }

    pub fn has_description(&self) -> bool {
        is_filled(&self.job_description)
    }
}

/// Everything the user entered for one resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub work_experience: Vec<Identified<WorkExperience>>,
    pub education: Vec<Identified<Education>>,
    pub skills: Vec<String>,
    pub certifications: Vec<Identified<Certification>>,
    pub languages: Vec<Identified<Language>>,
    pub job_application: JobApplication,
}

impl ResumeRecord {
    /// Builds a record from loosely shaped JSON. Never fails: missing or
    /// wrong-typed fields come back empty, since partially filled forms are
    /// the normal case.
    pub fn from_value(value: &Value) -> Self {
        let root = value.as_object().unwrap_or_else(|| empty_map());
        let personal = object_field(root, "personalInfo");
        let job = object_field(root, "jobApplication");

        ResumeRecord {
            personal_info: PersonalInfo {
                full_name: first_str(personal, &["fullName", "name"]),
                email: str_field(personal, "email"),
                phone: str_field(personal, "phone"),
                address: str_field(personal, "address"),
                linkedin: str_field(personal, "linkedin"),
                github: str_field(personal, "github"),
                portfolio: first_str(personal, &["portfolio", "website"]),
                summary: str_field(personal, "summary"),
            },
            work_experience: identified_list(root, "workExperience", |item| WorkExperience {
                company: str_field(item, "company"),
                position: str_field(item, "position"),
                start_date: str_field(item, "startDate"),
                end_date: opt_str_field(item, "endDate"),
                current: item.get("current").and_then(Value::as_bool).unwrap_or(false),
                responsibilities: str_field(item, "responsibilities"),
            }),
            education: identified_list(root, "education", |item| Education {
                institution: str_field(item, "institution"),
                degree: str_field(item, "degree"),
                field_of_study: str_field(item, "fieldOfStudy"),
                start_date: str_field(item, "startDate"),
                end_date: opt_str_field(item, "endDate"),
                gpa: opt_str_field(item, "gpa"),
            }),
            skills: skill_list(root),
            certifications: identified_list(root, "certifications", |item| Certification {
                name: str_field(item, "name"),
                issuer: str_field(item, "issuer"),
                date: str_field(item, "date"),
            }),
            languages: identified_list(root, "languages", |item| Language {
                language: str_field(item, "language"),
                proficiency: str_field(item, "proficiency"),
            }),
            job_application: JobApplication {
                job_title: str_field(job, "jobTitle"),
                job_description: str_field(job, "jobDescription"),
            },
        }
    }

    /// Text the keyword matcher scans on the resume side: positions,
    /// companies and responsibilities of every job, then the skills.
    pub fn keyword_corpus(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for entry in &self.work_experience {
            parts.push(&entry.value.position);
            parts.push(&entry.value.company);
            parts.push(&entry.value.responsibilities);
        }
        parts.extend(self.skills.iter().map(String::as_str));
        parts.retain(|p| !p.trim().is_empty());
        parts.join(" ")
    }
}

pub fn is_filled(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Resume sections whose entries carry ids.
pub const IDENTIFIED_SECTIONS: &[&str] = &["workExperience", "education", "certifications", "languages"];

/// Gives every object entry of the identified sections that lacks a usable id
/// a key from `keys`. Works on the raw tree, so fields `ResumeRecord` does
/// not model are left as they are. Keys already used in the resume are
/// skipped. Returns how many ids were assigned.
pub fn assign_missing_ids(resume: &mut Value, keys: &mut dyn KeySource) -> usize {
    let Some(root) = resume.as_object_mut() else {
        return 0;
    };

    let mut taken: HashSet<EntryId> = IDENTIFIED_SECTIONS
        .iter()
        .filter_map(|section| root.get(*section).and_then(Value::as_array))
        .flatten()
        .filter_map(EntryId::of_item)
        .collect();

    let mut assigned = 0;
    for section in IDENTIFIED_SECTIONS {
        let Some(items) = root.get_mut(*section).and_then(Value::as_array_mut) else {
            continue;
        };
        for item in items.iter_mut() {
            if EntryId::of_item(item).is_some() {
                continue;
            }
            let Some(entry) = item.as_object_mut() else {
                continue;
            };
            let key = loop {
                let key = keys.next_key();
                if taken.insert(key.clone()) {
                    break key;
                }
            };
            entry.insert("id".to_string(), Value::from(key));
            assigned += 1;
        }
    }
    assigned
}

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

fn object_field<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a Map<String, Value> {
    obj.get(key)
        .and_then(Value::as_object)
        .unwrap_or_else(|| empty_map())
}

fn str_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn first_str(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| str_field(obj, k))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn opt_str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn identified_list<T>(
    root: &Map<String, Value>,
    key: &str,
    build: impl Fn(&Map<String, Value>) -> T,
) -> Vec<Identified<T>> {
    root.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|item| {
                    let id = item.get("id").and_then(EntryId::from_value);
                    Identified::new(id, build(item))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Skills are a set: blanks are dropped and case-insensitive duplicates
/// collapse onto the first spelling.
fn skill_list(root: &Map<String, Value>) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    let Some(items) = root.get("skills").and_then(Value::as_array) else {
        return skills;
    };
    for skill in items.iter().filter_map(Value::as_str).map(str::trim) {
        if skill.is_empty() || skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            continue;
        }
        skills.push(skill.to_string());
    }
    skills
}
