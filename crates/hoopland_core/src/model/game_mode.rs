use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameModeSection {
    Season,
    Draft,
    Settings,
    Other,
}

#[rustfmt::skip]
const SECTION_KEYS: &[(GameModeSection, &[&str])] = &[
    (GameModeSection::Season,   &["mode", "currentYear", "currentDay", "currentRound", "phase", "startingYear", "totalGames"]),
    (GameModeSection::Draft,    &["draftRounds", "lotteryTeams", "lotteryOdds", "fantasyDraft", "expansionDraft", "customDraftClass"]),
    (GameModeSection::Settings, &["salaryCap", "playoffTeams", "seriesLength", "playInTournament", "simulationPace"]),
];

impl GameModeSection {
    pub const ALL: [GameModeSection; 4] = [
        GameModeSection::Season,
        GameModeSection::Draft,
        GameModeSection::Settings,
        GameModeSection::Other,
    ];

    pub fn for_key(key: &str) -> Self {
        SECTION_KEYS
            .iter()
            .find(|(_, keys)| keys.contains(&key))
            .map(|(section, _)| *section)
            .unwrap_or(Self::Other)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Season => "Season",
            Self::Draft => "Draft",
            Self::Settings => "Settings",
            Self::Other => "Other",
        }
    }
}

/// One `gameModes` entry. Modes have no fixed schema, so the whole record is
/// kept as an ordered map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameMode {
    fields: Map<String, Value>,
}

impl GameMode {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Self::from_fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn mode_type(&self) -> Option<&str> {
        self.fields.get("type").and_then(Value::as_str)
    }

    /// Season-settings entries carry a `mode` key; other entries are listed
    /// by position.
    pub fn title(&self, index: usize) -> String {
        if self.fields.contains_key("mode") {
            "Season Settings".to_string()
        } else {
            format!("Game Mode #{}", index + 1)
        }
    }

    pub fn with_field(&self, key: impl Into<String>, value: Value) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(key.into(), value);
        Self { fields }
    }

    /// Fields grouped by section, in section order, keeping the stored order
    /// within each section. Empty sections are left out.
    pub fn grouped(&self) -> Vec<(GameModeSection, Vec<(&str, &Value)>)> {
        GameModeSection::ALL
            .iter()
            .filter_map(|section| {
                let members = self
                    .fields
                    .iter()
                    .filter(|(key, _)| GameModeSection::for_key(key) == *section)
                    .map(|(key, value)| (key.as_str(), value))
                    .collect::<Vec<_>>();
                (!members.is_empty()).then_some((*section, members))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{GameMode, GameModeSection};

    #[test]
    fn fields_group_by_known_keys() {
        let mode = GameMode::from_value(&json!({
            "type": "season",
            "salaryCap": 120,
            "mode": 1,
            "draftRounds": 2,
            "currentYear": 2031
        }))
        .expect("object should parse");

        let grouped = mode.grouped();
        let sections: Vec<GameModeSection> = grouped.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            sections,
            vec![
                GameModeSection::Season,
                GameModeSection::Draft,
                GameModeSection::Settings,
                GameModeSection::Other
            ]
        );
        let season_keys: Vec<&str> = grouped[0].1.iter().map(|(k, _)| *k).collect();
        assert_eq!(season_keys, vec!["mode", "currentYear"]);
        assert_eq!(mode.title(0), "Season Settings");
        assert_eq!(mode.mode_type(), Some("season"));
    }

    #[test]
    fn with_field_keeps_position_of_existing_keys() {
        let mode = GameMode::from_value(&json!({"a": 1, "playoffTeams": 8, "b": 2}))
            .expect("object should parse");
        let edited = mode.with_field("playoffTeams", json!(16));
        let keys: Vec<&String> = edited.fields().keys().collect();
        assert_eq!(keys, vec!["a", "playoffTeams", "b"]);
        assert_eq!(edited.title(2), "Game Mode #3");
        assert!(GameMode::from_value(&json!([1, 2])).is_none());
    }
}
