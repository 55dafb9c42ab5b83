//! Portfolio data - loading, validation and read-only queries
//!
//! The data file is JSON (or YAML) with camelCase keys. Every field has a
//! default so partially filled files still load; `validate` enforces the
//! handful of fields the portfolio cannot do without.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::error::{FolioError, Result};

/// Shown when the data file has no tech facts
pub const FALLBACK_TECH_FACT: &str = "Loading awesome tech facts...";

// ─────────────────────────────────────────────────────────────────────────────
// Data Model
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub nickname: String,
    pub title: String,
    pub location: String,
    pub timezone: String,
    pub about: About,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct About {
    pub intro: String,
    #[serde(rename = "whatIDo")]
    pub what_i_do: String,
    pub background: Vec<String>,
    pub philosophy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub portfolio: String,
    pub preferred_contact: String,
    pub response_time: String,
    pub available_for: Vec<String>,
    pub specializations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub period: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub current: bool,
    pub details: Vec<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub name: String,
    pub percentage: i32,
    pub experience: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AsciiArt {
    pub logo: String,
    pub contact: String,
}

/// Skill categories in the order they appear in the data file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillCategories(pub Vec<(String, Vec<Skill>)>);

impl<'de> Deserialize<'de> for SkillCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = SkillCategories;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to skill list")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut categories = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, skills)) = map.next_entry::<String, Vec<Skill>>()? {
                    categories.push((name, skills));
                }
                Ok(SkillCategories(categories))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioData {
    pub personal: PersonalInfo,
    pub experiences: Vec<Experience>,
    pub skills: SkillCategories,
    pub projects: Vec<Project>,
    pub tech_facts: Vec<String>,
    pub ascii_art: AsciiArt,
}

impl PortfolioData {
    /// Parse portfolio data, picking the format from the file extension
    pub fn parse(source: &str, path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(serde_json::from_str(source)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(source)?),
            _ => Err(FolioError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Check the fields every portfolio needs
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| {
            Err(FolioError::Validation {
                reason: reason.to_string(),
            })
        };

        if self.personal.name.trim().is_empty() {
            return fail("personal name is required");
        }
        if self.personal.contact.email.trim().is_empty() {
            return fail("contact email is required");
        }
        if self.experiences.is_empty() {
            return fail("at least one experience is required");
        }
        if self.skills.0.is_empty() {
            return fail("at least one skill category is required");
        }
        for (category, skills) in &self.skills.0 {
            if let Some(skill) = skills.iter().find(|s| !(0..=100).contains(&s.percentage)) {
                return fail(&format!(
                    "skill '{}' in '{}' has percentage {}, expected 0..=100",
                    skill.name, category, skill.percentage
                ));
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loader
// ─────────────────────────────────────────────────────────────────────────────

/// Loads portfolio data once and answers read-only queries.
///
/// Every query returns `None` or an empty slice when nothing is loaded, so
/// content rendering can fall back to placeholder text.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    path: PathBuf,
    data: Option<PortfolioData>,
}

impl DataLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: None,
        }
    }

    /// Loader pre-filled with in-memory data
    pub fn from_data(data: PortfolioData) -> Self {
        Self {
            path: PathBuf::new(),
            data: Some(data),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the data file
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Err(FolioError::DataNotFound {
                path: self.path.clone(),
            });
        }

        let source = fs::read_to_string(&self.path)?;
        let data = PortfolioData::parse(&source, &self.path)?;
        debug!(
            experiences = data.experiences.len(),
            skill_categories = data.skills.0.len(),
            projects = data.projects.len(),
            "Parsed portfolio data"
        );
        info!(path = %self.path.display(), "Loaded portfolio data");

        self.data = Some(data);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        match &self.data {
            Some(data) => data.validate(),
            None => Err(FolioError::Validation {
                reason: "no data loaded".to_string(),
            }),
        }
    }

    pub fn data(&self) -> Option<&PortfolioData> {
        self.data.as_ref()
    }

    pub fn personal(&self) -> Option<&PersonalInfo> {
        self.data.as_ref().map(|d| &d.personal)
    }

    pub fn contact(&self) -> Option<&Contact> {
        self.data.as_ref().map(|d| &d.personal.contact)
    }

    pub fn experiences(&self) -> &[Experience] {
        self.data.as_ref().map_or(&[], |d| &d.experiences)
    }

    /// First experience flagged as current
    pub fn current_experience(&self) -> Option<&Experience> {
        self.experiences().iter().find(|e| e.current)
    }

    pub fn skills(&self) -> &[(String, Vec<Skill>)] {
        self.data.as_ref().map_or(&[], |d| &d.skills.0)
    }

    pub fn skills_in(&self, category: &str) -> Option<&[Skill]> {
        self.skills()
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, skills)| skills.as_slice())
    }

    pub fn projects(&self) -> &[Project] {
        self.data.as_ref().map_or(&[], |d| &d.projects)
    }

    pub fn tech_facts(&self) -> &[String] {
        self.data.as_ref().map_or(&[], |d| &d.tech_facts)
    }

    /// Tech fact rotating with `index`
    pub fn tech_fact(&self, index: u64) -> &str {
        let facts = self.tech_facts();
        if facts.is_empty() {
            return FALLBACK_TECH_FACT;
        }
        &facts[(index % facts.len() as u64) as usize]
    }

    pub fn ascii_art(&self) -> Option<&AsciiArt> {
        self.data.as_ref().map(|d| &d.ascii_art)
    }
}
