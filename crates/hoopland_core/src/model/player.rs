use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::attribute::{AttributeCode, AttributeValue};
use crate::core_api::{CoreError, CoreErrorCode};
use crate::position::{PositionCode, position_abbr, position_name};
use crate::skills::{SkillCatalog, SkillCategory};

use super::fields::{RecordFields, clear_raw};
use super::slot::Slot;

pub const MAX_SKILLS_PER_CATEGORY: usize = 4;

const STATS_KEY: &str = "stats";

/// A player record. Only `id` is required; a typed field holding a value of
/// the wrong JSON type reads as `None` and keeps its raw value in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: i64,
    #[serde(rename = "fn", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "ln", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "tid", skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(rename = "pos", skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionCode>,
    #[serde(rename = "num", skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Slot<PlayerSkill>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Player {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = RecordFields::new(Map::deserialize(deserializer)?);
        let id = fields
            .typed("id")
            .ok_or_else(|| D::Error::custom("player record has no integer `id`"))?;
        Ok(Self {
            id,
            first_name: fields.typed("fn"),
            last_name: fields.typed("ln"),
            team_id: fields.typed("tid"),
            position: fields.typed("pos"),
            number: fields.typed("num"),
            rating: fields.typed("rating"),
            attributes: fields.typed("attributes"),
            skills: fields.typed("skills"),
            extra: fields.into_extra(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSkill {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipped: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for PlayerSkill {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = RecordFields::new(Map::deserialize(deserializer)?);
        let id = fields
            .typed("id")
            .ok_or_else(|| D::Error::custom("skill record has no string `id`"))?;
        Ok(Self {
            id,
            xp: fields.typed("xp"),
            level: fields.typed("level"),
            equipped: fields.typed("equipped"),
            extra: fields.into_extra(),
        })
    }
}

impl PlayerSkill {
    /// A freshly granted skill: no xp, level 1, equipped.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            xp: Some(0),
            level: Some(1),
            equipped: Some(true),
            extra: Map::new(),
        }
    }
}

/// Draft bookkeeping carried by draft-class prospects under `draft`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftInfo {
    pub round: Option<i64>,
    pub pick: Option<i64>,
    pub year: Option<i64>,
    pub tid: Option<i64>,
    pub original_tid: Option<i64>,
}

/// Named overrides applied by [`Player::patched`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub team_id: Option<i64>,
    pub position: Option<PositionCode>,
    pub number: Option<i64>,
    pub rating: Option<Number>,
    pub attributes: Vec<(AttributeCode, AttributeValue)>,
    /// Entries written into the player's `stats` object.
    pub stats: Vec<(String, Value)>,
}

impl PlayerPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.team_id.is_none()
            && self.position.is_none()
            && self.number.is_none()
            && self.rating.is_none()
            && self.attributes.is_empty()
            && self.stats.is_empty()
    }
}

impl Player {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            team_id: None,
            position: None,
            number: None,
            rating: None,
            attributes: None,
            skills: None,
            extra: Map::new(),
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }

    pub fn to_value(&self) -> Result<Value, CoreError> {
        serde_json::to_value(self).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Parse,
                format!("failed to serialize player {}: {e}", self.id),
            )
        })
    }

    /// First and last name joined by a space, as matched by text search.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
    }

    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{first} {last}")
            }
            _ => format!("Player {}", self.id),
        }
    }

    /// Rating used for comparisons; an absent rating counts as 0.
    pub fn rating_value(&self) -> f64 {
        self.rating
            .as_ref()
            .and_then(Number::as_f64)
            .unwrap_or(0.0)
    }

    pub fn position_abbr(&self) -> String {
        position_abbr(self.position.as_ref())
    }

    pub fn position_name(&self) -> String {
        position_name(self.position.as_ref())
    }

    pub fn attribute(&self, code: AttributeCode) -> AttributeValue {
        self.attributes
            .as_ref()
            .and_then(|attrs| attrs.get(code.code()))
            .map(AttributeValue::from_json)
            .unwrap_or_default()
    }

    pub fn with_attribute(&self, code: AttributeCode, value: AttributeValue) -> Self {
        let mut out = self.clone();
        let mut attributes = out.attributes.take().unwrap_or_default();
        attributes.insert(code.code().to_string(), value.to_json());
        out.attributes = Some(attributes);
        clear_raw(&mut out.extra, "attributes");
        out
    }

    pub fn stat(&self, key: &str) -> Option<&Value> {
        self.extra.get(STATS_KEY).and_then(|stats| stats.get(key))
    }

    /// Reads `text` the way the stat it replaces is stored: numeric stats
    /// parse as numbers (unparseable input becomes 0), text stats stay text,
    /// and a new stat is a number when the text is one.
    pub fn stat_input(&self, key: &str, text: &str) -> Value {
        let number = text.trim().parse::<f64>().ok().and_then(json_number);
        match self.stat(key) {
            Some(Value::Number(_)) => Value::Number(number.unwrap_or_else(|| 0.into())),
            Some(Value::String(_)) => Value::String(text.to_string()),
            _ => number
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(text.to_string())),
        }
    }

    pub fn with_stat(&self, key: impl Into<String>, value: Value) -> Self {
        let mut out = self.clone();
        let mut stats = out
            .extra
            .get(STATS_KEY)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        stats.insert(key.into(), value);
        out.extra.insert(STATS_KEY.to_string(), Value::Object(stats));
        out
    }

    pub fn skill_list(&self) -> Vec<&PlayerSkill> {
        self.skills
            .iter()
            .flatten()
            .filter_map(Slot::record)
            .collect()
    }

    pub fn has_skill_in(&self, category: SkillCategory, catalog: &SkillCatalog) -> bool {
        self.skill_list()
            .iter()
            .any(|skill| !skill.id.is_empty() && catalog.category_of(&skill.id) == category)
    }

    pub fn skills_by_category<'a>(
        &'a self,
        catalog: &SkillCatalog,
    ) -> Vec<(SkillCategory, Vec<&'a PlayerSkill>)> {
        let skills = self.skill_list();
        SkillCategory::ALL
            .iter()
            .map(|category| {
                let members = skills
                    .iter()
                    .copied()
                    .filter(|skill| catalog.category_of(&skill.id) == *category)
                    .collect::<Vec<_>>();
                (*category, members)
            })
            .collect()
    }

    /// Replaces the skills of one category with `ids`, keeping the stored
    /// object for ids the player already has and leaving other categories
    /// (and unreadable entries) where they were.
    pub fn with_category_skills(
        &self,
        category: SkillCategory,
        ids: &[&str],
        catalog: &SkillCatalog,
    ) -> Result<Self, CoreError> {
        if ids.len() > MAX_SKILLS_PER_CATEGORY {
            return Err(CoreError::new(
                CoreErrorCode::UnsupportedOperation,
                format!(
                    "a player can hold at most {MAX_SKILLS_PER_CATEGORY} {category} skills, got {}",
                    ids.len()
                ),
            ));
        }

        let existing = self.skills.clone().unwrap_or_default();
        let (in_category, mut kept): (Vec<_>, Vec<_>) =
            existing.into_iter().partition(|slot| {
                slot.record()
                    .is_some_and(|skill| catalog.category_of(&skill.id) == category)
            });

        for id in ids {
            let skill = in_category
                .iter()
                .filter_map(Slot::record)
                .find(|skill| skill.id == *id)
                .cloned()
                .unwrap_or_else(|| PlayerSkill::new(*id));
            kept.push(Slot::Record(skill));
        }

        let mut out = self.clone();
        out.skills = Some(kept);
        clear_raw(&mut out.extra, "skills");
        Ok(out)
    }

    pub fn draft_info(&self) -> Option<DraftInfo> {
        self.extra
            .get("draft")
            .and_then(|value| DraftInfo::deserialize(value).ok())
    }

    pub fn patched(&self, patch: &PlayerPatch) -> Self {
        let mut out = self.clone();
        if let Some(first_name) = &patch.first_name {
            out.first_name = Some(first_name.clone());
            clear_raw(&mut out.extra, "fn");
        }
        if let Some(last_name) = &patch.last_name {
            out.last_name = Some(last_name.clone());
            clear_raw(&mut out.extra, "ln");
        }
        if let Some(team_id) = patch.team_id {
            out.team_id = Some(team_id);
            clear_raw(&mut out.extra, "tid");
        }
        if let Some(position) = &patch.position {
            out.position = Some(position.clone());
            clear_raw(&mut out.extra, "pos");
        }
        if let Some(number) = patch.number {
            out.number = Some(number);
            clear_raw(&mut out.extra, "num");
        }
        if let Some(rating) = &patch.rating {
            out.rating = Some(rating.clone());
            clear_raw(&mut out.extra, "rating");
        }
        for (code, value) in &patch.attributes {
            out = out.with_attribute(*code, *value);
        }
        for (key, value) in &patch.stats {
            out = out.with_stat(key.clone(), value.clone());
        }
        out
    }
}

/// Whole numbers stay integers so an edited `80` is not written as `80.0`.
pub fn json_number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Player, PlayerPatch, Slot};
    use crate::attribute::{AttributeCode, AttributeValue};
    use crate::position::PositionCode;
    use crate::skills::{SkillCatalog, SkillCategory};

    fn sample() -> Player {
        Player::from_value(&json!({
            "id": 7,
            "fn": "Jon",
            "ln": "Doe",
            "pos": 0,
            "num": 23,
            "rating": 80,
            "age": 24,
            "attributes": {"LAY": [70, 85]},
            "skills": [
                {"id": "DUN", "xp": 120, "level": 2, "equipped": true},
                {"id": "STE", "xp": 0, "level": 1, "equipped": false},
                "corrupt"
            ],
            "draft": {"round": 1, "pick": 3}
        }))
        .expect("sample player should parse")
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let player = sample();
        assert_eq!(player.extra.get("age"), Some(&json!(24)));
        let value = player.to_value().expect("player should serialize");
        assert_eq!(value["age"], json!(24));
        assert_eq!(value["skills"][2], json!("corrupt"));
        assert_eq!(value["rating"], json!(80));
    }

    #[test]
    fn wrong_typed_fields_read_as_absent_and_write_back_unchanged() {
        let raw = json!({
            "id": 12,
            "fn": "Jon",
            "ln": "Doe",
            "num": "23",
            "rating": "80",
            "skills": [{"id": "DUN", "xp": "lots", "level": 2}]
        });
        let player = Player::from_value(&raw).expect("only the id is required");
        assert_eq!(player.number, None);
        assert_eq!(player.rating_value(), 0.0);
        assert_eq!(player.display_name(), "Jon Doe");
        assert_eq!(player.skill_list()[0].xp, None);
        assert_eq!(player.skill_list()[0].level, Some(2));
        assert_eq!(player.to_value().expect("player should serialize"), raw);
    }

    #[test]
    fn setting_a_wrong_typed_field_replaces_the_raw_value() {
        let player = Player::from_value(&json!({"id": 12, "rating": "80", "fn": null}))
            .expect("only the id is required");
        let patch = PlayerPatch {
            first_name: Some("Jon".into()),
            rating: Some(81.into()),
            ..PlayerPatch::default()
        };
        let value = player.patched(&patch).to_value().expect("player should serialize");
        assert_eq!(value, json!({"id": 12, "fn": "Jon", "rating": 81}));
    }

    #[test]
    fn stat_edits_follow_the_stored_type() {
        let player = Player::from_value(&json!({
            "id": 5,
            "stats": {"pts": 1502, "award": "MVP"}
        }))
        .expect("player should parse");

        assert_eq!(player.stat_input("pts", "1600"), json!(1600));
        assert_eq!(player.stat_input("pts", "12.5"), json!(12.5));
        assert_eq!(player.stat_input("pts", "lots"), json!(0));
        assert_eq!(player.stat_input("award", "42"), json!("42"));
        assert_eq!(player.stat_input("reb", "7"), json!(7));
        assert_eq!(player.stat_input("note", "rookie"), json!("rookie"));

        let patch = PlayerPatch {
            stats: vec![("pts".into(), json!(1600)), ("reb".into(), json!(7))],
            ..PlayerPatch::default()
        };
        let edited = player.patched(&patch);
        assert_eq!(
            edited.extra["stats"],
            json!({"pts": 1600, "award": "MVP", "reb": 7})
        );
        assert_eq!(Player::new(1).with_stat("pts", json!(3)).stat("pts"), Some(&json!(3)));
    }

    #[test]
    fn records_without_numeric_id_do_not_parse() {
        assert!(Player::from_value(&json!({"fn": "No", "ln": "Id"})).is_none());
        assert!(Player::from_value(&json!(null)).is_none());
        assert!(Player::from_value(&json!({"id": "10"})).is_none());
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(sample().display_name(), "Jon Doe");
        assert_eq!(Player::new(9).display_name(), "Player 9");
        assert_eq!(Player::new(9).rating_value(), 0.0);
    }

    #[test]
    fn attribute_edits_keep_other_attributes() {
        let player = sample().with_attribute(AttributeCode::Dunk, AttributeValue::new(50, 60));
        assert_eq!(
            player.attribute(AttributeCode::Layup),
            AttributeValue::new(70, 85)
        );
        assert_eq!(player.attribute(AttributeCode::Dunk), AttributeValue::new(50, 60));
        assert_eq!(player.attribute(AttributeCode::Stamina), AttributeValue::default());
    }

    #[test]
    fn category_skill_edit_leaves_other_categories() {
        let catalog = SkillCatalog::builtin();
        let player = sample()
            .with_category_skills(SkillCategory::Finishing, &["DUN", "HIG"], &catalog)
            .expect("two skills fit");
        let ids: Vec<&str> = player.skill_list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["STE", "DUN", "HIG"]);

        let dunk = player.skill_list()[1];
        assert_eq!(dunk.xp, Some(120));
        let flyer = player.skill_list()[2];
        assert_eq!(flyer.level, Some(1));
        assert_eq!(flyer.equipped, Some(true));

        let skills = player.skills.as_ref().expect("skills present");
        assert!(skills.iter().any(|slot| matches!(slot, Slot::Opaque(_))));
    }

    #[test]
    fn category_skill_edit_rejects_fifth_skill() {
        let catalog = SkillCatalog::builtin();
        let err = sample()
            .with_category_skills(
                SkillCategory::Creating,
                &["CLA", "CRA", "DIM", "CLE", "VOL"],
                &catalog,
            )
            .expect_err("five skills should not fit");
        assert!(err.message.contains("at most 4"));
    }

    #[test]
    fn patch_overrides_only_named_fields() {
        let patch = PlayerPatch {
            last_name: Some("Dough".into()),
            position: Some(PositionCode::Numeric(4)),
            ..PlayerPatch::default()
        };
        let player = sample().patched(&patch);
        assert_eq!(player.first_name.as_deref(), Some("Jon"));
        assert_eq!(player.last_name.as_deref(), Some("Dough"));
        assert_eq!(player.position_abbr(), "C");
        assert_eq!(player.extra, sample().extra);
    }

    #[test]
    fn draft_info_reads_nested_object() {
        let info = sample().draft_info().expect("draft info present");
        assert_eq!(info.round, Some(1));
        assert_eq!(info.pick, Some(3));
        assert_eq!(info.year, None);
    }
}
