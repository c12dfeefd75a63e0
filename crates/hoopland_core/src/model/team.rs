use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::core_api::{CoreError, CoreErrorCode};

use super::fields::{RecordFields, clear_raw};
use super::player::Player;
use super::slot::Slot;

const ARENA_NAME_KEY: &str = "arenaName";
const LOGO_URL_KEY: &str = "logoURL";
const LOGO_SIZE_KEY: &str = "logoSize";

/// A team record. The roster is read on its own, so a malformed name or
/// short name never hides the players.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "shortName", skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<Slot<Player>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Team {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = RecordFields::new(Map::deserialize(deserializer)?);
        let id = fields
            .typed("id")
            .ok_or_else(|| D::Error::custom("team record has no integer `id`"))?;
        Ok(Self {
            id,
            name: fields.typed("name"),
            city: fields.typed("city"),
            short_name: fields.typed("shortName"),
            roster: fields.typed("roster"),
            extra: fields.into_extra(),
        })
    }
}

/// One `startingLineup` entry; `pid` refers to a roster player's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub pid: i64,
    #[serde(rename = "linePos", default, skip_serializing_if = "Option::is_none")]
    pub line_pos: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A lineup entry joined against the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct LineupSlot<'a> {
    pub line_pos: i64,
    pub player_id: i64,
    pub player: Option<&'a Player>,
    pub minutes: Option<&'a Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub short_name: Option<String>,
    pub arena_name: Option<String>,
    /// Logo image URL or data URL; an empty string removes the logo.
    pub logo_url: Option<String>,
    pub logo_size: Option<Number>,
}

impl TeamPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.city.is_none()
            && self.short_name.is_none()
            && self.arena_name.is_none()
            && self.logo_url.is_none()
            && self.logo_size.is_none()
    }
}

impl Team {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: None,
            city: None,
            short_name: None,
            roster: None,
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
                format!("failed to serialize team {}: {e}", self.id),
            )
        })
    }

    pub fn display_name(&self) -> String {
        match (self.city.as_deref(), self.name.as_deref()) {
            (Some(city), Some(name)) if !city.is_empty() => format!("{city} {name}"),
            (_, Some(name)) if !name.is_empty() => name.to_string(),
            _ => format!("Team {}", self.id),
        }
    }

    pub fn arena_name(&self) -> Option<&str> {
        self.extra.get(ARENA_NAME_KEY).and_then(Value::as_str)
    }

    pub fn logo_url(&self) -> Option<&str> {
        self.extra
            .get(LOGO_URL_KEY)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn logo_size(&self) -> Option<&Number> {
        match self.extra.get(LOGO_SIZE_KEY) {
            Some(Value::Number(size)) => Some(size),
            _ => None,
        }
    }

    pub fn players(&self) -> Vec<&Player> {
        self.roster
            .iter()
            .flatten()
            .filter_map(Slot::record)
            .collect()
    }

    pub fn starting_lineup(&self) -> Vec<LineupEntry> {
        Slot::<LineupEntry>::list_from(self.extra.get("startingLineup"))
            .into_iter()
            .filter_map(Slot::into_record)
            .collect()
    }

    /// Resolves lineup entries to roster players; an entry without `linePos`
    /// takes its index in the lineup.
    pub fn resolve_lineup(&self) -> Vec<LineupSlot<'_>> {
        let players = self.players();
        let Some(entries) = self.extra.get("startingLineup").and_then(Value::as_array) else {
            return Vec::new();
        };

        entries
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                let entry = LineupEntry::deserialize(raw).ok()?;
                Some(LineupSlot {
                    line_pos: entry.line_pos.unwrap_or(index as i64),
                    player_id: entry.pid,
                    player: players.iter().copied().find(|p| p.id == entry.pid),
                    minutes: raw.get("minutes"),
                })
            })
            .collect()
    }

    pub fn patched(&self, patch: &TeamPatch) -> Self {
        let mut out = self.clone();
        if let Some(name) = &patch.name {
            out.name = Some(name.clone());
            clear_raw(&mut out.extra, "name");
        }
        if let Some(city) = &patch.city {
            out.city = Some(city.clone());
            clear_raw(&mut out.extra, "city");
        }
        if let Some(short_name) = &patch.short_name {
            out.short_name = Some(short_name.clone());
            clear_raw(&mut out.extra, "shortName");
        }
        if let Some(arena_name) = &patch.arena_name {
            out.extra
                .insert(ARENA_NAME_KEY.to_string(), Value::String(arena_name.clone()));
        }
        if let Some(logo_url) = &patch.logo_url {
            out.extra
                .insert(LOGO_URL_KEY.to_string(), Value::String(logo_url.clone()));
        }
        if let Some(logo_size) = &patch.logo_size {
            out.extra
                .insert(LOGO_SIZE_KEY.to_string(), Value::Number(logo_size.clone()));
        }
        out
    }
}
