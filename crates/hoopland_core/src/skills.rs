//! Skill id → name/category table.
//!
//! The built-in assignments were reverse engineered from save files and several
//! are uncertain (LOC, SOF, CHE, LIM and TEA in particular), so the table can be
//! replaced or patched from a TOML file:
//!
//! ```toml
//! fallback_category = "finishing"
//! extend_builtin = true
//!
//! [[skills]]
//! id = "LOC"
//! name = "Lockdown"
//! category = "defense"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core_api::{CoreError, CoreErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Finishing,
    Shooting,
    Creating,
    Defense,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Finishing,
        SkillCategory::Shooting,
        SkillCategory::Creating,
        SkillCategory::Defense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finishing => "finishing",
            Self::Shooting => "shooting",
            Self::Creating => "creating",
            Self::Defense => "defense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Finishing => "Finishing",
            Self::Shooting => "Shooting",
            Self::Creating => "Creating",
            Self::Defense => "Defense",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "invalid skill category '{s}', expected one of: finishing, shooting, creating, defense"
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
}

#[rustfmt::skip]
const BUILTIN_SKILLS: &[(&str, &str, SkillCategory)] = &[
    ("DUN", "Dunk",          SkillCategory::Finishing),
    ("FOO", "Floater",       SkillCategory::Finishing),
    ("HIG", "High Flyer",    SkillCategory::Finishing),

    ("SPA", "Space Creator", SkillCategory::Shooting),
    ("SPO", "Spot Up",       SkillCategory::Shooting),
    ("HOT", "Hot Hand",      SkillCategory::Shooting),
    ("MAG", "Magician",      SkillCategory::Shooting),
    ("TWO", "Two-Way",       SkillCategory::Shooting),

    ("CLA", "Clutch",        SkillCategory::Creating),
    ("CRA", "Crafty",        SkillCategory::Creating),
    ("DIM", "Diminutive",    SkillCategory::Creating),
    ("LOC", "Lockdown",      SkillCategory::Creating),
    ("CLE", "Clever",        SkillCategory::Creating),
    ("CLU", "Clutch Passer", SkillCategory::Creating),
    ("VOL", "Volatile",      SkillCategory::Creating),

    ("STE", "Steal",         SkillCategory::Defense),
    ("SNA", "Snatch",        SkillCategory::Defense),
    ("SOF", "Soft Touch",    SkillCategory::Defense),
    ("BAL", "Balance",       SkillCategory::Defense),
    ("BUL", "Bully",         SkillCategory::Defense),
    ("CHE", "Chef",          SkillCategory::Defense),
    ("LIM", "Limitless",     SkillCategory::Defense),
    ("TEA", "Teammate",      SkillCategory::Defense),
    ("UNF", "Unfazed",       SkillCategory::Defense),
];

#[derive(Debug, Error)]
pub enum SkillTableError {
    #[error("failed to read skill table {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse skill table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid skill table entry `{id}`: {message}")]
    Validation { id: String, message: String },
}

impl From<SkillTableError> for CoreError {
    fn from(err: SkillTableError) -> Self {
        let code = match err {
            SkillTableError::Read { .. } => CoreErrorCode::Io,
            SkillTableError::Parse(_) | SkillTableError::Validation { .. } => CoreErrorCode::Parse,
        };
        CoreError::new(code, err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct SkillTableFile {
    #[serde(default)]
    fallback_category: Option<SkillCategory>,
    #[serde(default)]
    extend_builtin: bool,
    #[serde(default)]
    skills: Vec<SkillDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCatalog {
    entries: Vec<SkillDefinition>,
    fallback_category: SkillCategory,
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillCatalog {
    pub fn builtin() -> Self {
        let entries = BUILTIN_SKILLS
            .iter()
            .map(|(id, name, category)| SkillDefinition {
                id: (*id).to_string(),
                name: (*name).to_string(),
                category: *category,
            })
            .collect();
        Self {
            entries,
            fallback_category: SkillCategory::Finishing,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SkillTableError> {
        let file: SkillTableFile = toml::from_str(text)?;

        for definition in &file.skills {
            if definition.id.trim().is_empty() {
                return Err(SkillTableError::Validation {
                    id: definition.id.clone(),
                    message: "skill id must not be empty".to_string(),
                });
            }
            if definition.name.trim().is_empty() {
                return Err(SkillTableError::Validation {
                    id: definition.id.clone(),
                    message: "skill name must not be empty".to_string(),
                });
            }
        }

        let mut catalog = if file.extend_builtin {
            Self::builtin()
        } else {
            Self {
                entries: Vec::new(),
                fallback_category: SkillCategory::Finishing,
            }
        };
        if let Some(fallback) = file.fallback_category {
            catalog.fallback_category = fallback;
        }

        let mut seen = Vec::with_capacity(file.skills.len());
        for definition in file.skills {
            if seen.contains(&definition.id) {
                warn!("duplicate skill table entry '{}', using latest value", definition.id);
            }
            seen.push(definition.id.clone());
            catalog.upsert(definition);
        }

        debug!(skills = catalog.len(), "loaded skill table");
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, SkillTableError> {
        let text = fs::read_to_string(path).map_err(|source| SkillTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn upsert(&mut self, definition: SkillDefinition) {
        match self.entries.iter_mut().find(|e| e.id == definition.id) {
            Some(existing) => *existing = definition,
            None => self.entries.push(definition),
        }
    }

    pub fn fallback_category(&self) -> SkillCategory {
        self.fallback_category
    }

    pub fn get(&self, id: &str) -> Option<&SkillDefinition> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Definition for `id`, synthesizing an `Unknown (ID)` entry in the
    /// fallback category for ids the table does not list.
    pub fn definition(&self, id: &str) -> SkillDefinition {
        self.get(id).cloned().unwrap_or_else(|| SkillDefinition {
            id: id.to_string(),
            name: format!("Unknown ({id})"),
            category: self.fallback_category,
        })
    }

    pub fn category_of(&self, id: &str) -> SkillCategory {
        self.get(id)
            .map(|e| e.category)
            .unwrap_or(self.fallback_category)
    }

    pub fn name_of(&self, id: &str) -> String {
        self.definition(id).name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{SkillCatalog, SkillCategory, SkillTableError};

    #[test]
    fn builtin_table_lists_all_known_ids() {
        let catalog = SkillCatalog::builtin();
        assert_eq!(catalog.len(), 24);
        assert_eq!(catalog.category_of("DUN"), SkillCategory::Finishing);
        assert_eq!(catalog.category_of("SPO"), SkillCategory::Shooting);
        assert_eq!(catalog.category_of("CLA"), SkillCategory::Creating);
        assert_eq!(catalog.category_of("STE"), SkillCategory::Defense);
        assert_eq!(catalog.name_of("HIG"), "High Flyer");
    }

    #[test]
    fn unknown_ids_use_fallback_category() {
        let catalog = SkillCatalog::builtin();
        let definition = catalog.definition("ZZZ");
        assert_eq!(definition.name, "Unknown (ZZZ)");
        assert_eq!(definition.category, SkillCategory::Finishing);
    }

    #[test]
    fn toml_table_can_patch_builtin_entries() {
        let text = r#"
            fallback_category = "defense"
            extend_builtin = true

            [[skills]]
            id = "LOC"
            name = "Lockdown"
            category = "defense"
        "#;
        let catalog = SkillCatalog::from_toml_str(text).expect("table should parse");
        assert_eq!(catalog.len(), 24);
        assert_eq!(catalog.category_of("LOC"), SkillCategory::Defense);
        assert_eq!(catalog.category_of("ZZZ"), SkillCategory::Defense);
        assert_eq!(catalog.category_of("DUN"), SkillCategory::Finishing);
    }

    #[test]
    fn toml_table_can_replace_builtin_entries() {
        let text = r#"
            [[skills]]
            id = "DUN"
            name = "Slam"
            category = "shooting"
        "#;
        let catalog = SkillCatalog::from_toml_str(text).expect("table should parse");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.name_of("DUN"), "Slam");
        assert!(catalog.get("SPO").is_none());
    }

    #[test]
    fn toml_table_rejects_empty_ids() {
        let text = r#"
            [[skills]]
            id = " "
            name = "Blank"
            category = "shooting"
        "#;
        let err = SkillCatalog::from_toml_str(text).expect_err("empty id should fail");
        assert!(matches!(err, SkillTableError::Validation { .. }));
    }

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!("Defense".parse::<SkillCategory>(), Ok(SkillCategory::Defense));
        assert!("rebounding".parse::<SkillCategory>().is_err());
    }
}
