//! Conversion between the two on-disk save shapes and one editable league.
//!
//! Desktop saves keep the league fields at the top level of the document.
//! Mobile saves wrap one or more leagues in a `seasonLeagues` array, and a
//! mobile league may carry the career-mode `player`. [`normalize`] and
//! [`switch_league`] lift one league out of either shape, [`denormalize`]
//! puts it back.

use serde_json::{Map, Value};
use tracing::debug;

use crate::core_api::{CoreError, CoreErrorCode, LeagueSummary, SaveShape};
use crate::model::League;

pub const SEASON_LEAGUES_KEY: &str = "seasonLeagues";

/// Bookkeeping keys of the normalized view. They never belong in a save.
pub const PROVENANCE_KEYS: [&str; 4] = [
    "isMobile",
    "originalData",
    "allLeagues",
    "currentLeagueIndex",
];

const UNKNOWN_LEAGUE_NAME: &str = "Unknown";

/// One league lifted out of a save, plus what is needed to write it back.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocument {
    league: League,
    shape: SaveShape,
    original: Value,
    current_league_index: usize,
}

impl NormalizedDocument {
    pub fn league(&self) -> &League {
        &self.league
    }

    pub fn shape(&self) -> SaveShape {
        self.shape
    }

    pub fn is_mobile(&self) -> bool {
        self.shape == SaveShape::Mobile
    }

    /// The document exactly as it was parsed.
    pub fn original_data(&self) -> &Value {
        &self.original
    }

    /// The `seasonLeagues` array as loaded; `None` for desktop saves.
    pub fn all_leagues(&self) -> Option<&[Value]> {
        if !self.is_mobile() {
            return None;
        }
        self.original
            .get(SEASON_LEAGUES_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub fn current_league_index(&self) -> usize {
        self.current_league_index
    }

    /// A copy of this document with `league` as its league fields.
    pub fn with_league(&self, league: League) -> Self {
        Self {
            league,
            shape: self.shape,
            original: self.original.clone(),
            current_league_index: self.current_league_index,
        }
    }
}

pub fn detect_shape(raw: &Value) -> Result<SaveShape, CoreError> {
    let Some(object) = raw.as_object() else {
        return Err(CoreError::new(
            CoreErrorCode::UnsupportedShape,
            format!("save must be a JSON object, found {}", json_kind(raw)),
        ));
    };

    match object.get(SEASON_LEAGUES_KEY).and_then(Value::as_array) {
        Some(leagues) if leagues.is_empty() => Err(CoreError::new(
            CoreErrorCode::EmptyLeagueList,
            "mobile save has an empty seasonLeagues list",
        )),
        Some(_) => Ok(SaveShape::Mobile),
        None => Ok(SaveShape::Desktop),
    }
}

pub fn normalize(raw: Value) -> Result<NormalizedDocument, CoreError> {
    normalize_at(raw, 0)
}

/// Re-derives the view of league `index` from the raw document. No earlier
/// view is consulted, so switching is order independent.
pub fn switch_league(raw: &Value, index: usize) -> Result<NormalizedDocument, CoreError> {
    if detect_shape(raw)? != SaveShape::Mobile {
        return Err(CoreError::new(
            CoreErrorCode::InvalidLeagueIndex,
            format!("league index {index} requested on a single-league save"),
        ));
    }
    normalize_at(raw.clone(), index)
}

fn normalize_at(raw: Value, index: usize) -> Result<NormalizedDocument, CoreError> {
    let shape = detect_shape(&raw)?;
    let fields = match shape {
        SaveShape::Desktop => object_fields(&raw),
        SaveShape::Mobile => {
            let leagues = raw
                .get(SEASON_LEAGUES_KEY)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let league = leagues.get(index).ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::InvalidLeagueIndex,
                    format!(
                        "league index {index} is out of range for {} leagues",
                        leagues.len()
                    ),
                )
            })?;
            if !league.is_object() {
                return Err(CoreError::new(
                    CoreErrorCode::InvalidLeagueIndex,
                    format!("league {index} is not an object"),
                ));
            }
            object_fields(league)
        }
    };

    debug!(?shape, index, fields = fields.len(), "normalized save");

    Ok(NormalizedDocument {
        league: League::from_fields(fields),
        shape,
        original: raw,
        current_league_index: index,
    })
}

/// The save document to write back. Desktop saves are the league fields;
/// mobile saves are the loaded document with only the current league entry
/// replaced.
pub fn denormalize(doc: &NormalizedDocument) -> Value {
    let fields = without_provenance(doc.league.fields());

    match doc.shape {
        SaveShape::Desktop => Value::Object(fields),
        SaveShape::Mobile => {
            let mut out = doc.original.clone();
            if let Some(slot) = out
                .get_mut(SEASON_LEAGUES_KEY)
                .and_then(Value::as_array_mut)
                .and_then(|leagues| leagues.get_mut(doc.current_league_index))
            {
                *slot = Value::Object(fields);
            }
            out
        }
    }
}

/// Name, type and index of every `seasonLeagues` entry; `None` when the
/// document has no league list.
pub fn league_summaries(raw: &Value) -> Option<Vec<LeagueSummary>> {
    let leagues = raw.get(SEASON_LEAGUES_KEY)?.as_array()?;
    Some(
        leagues
            .iter()
            .enumerate()
            .map(|(index, league)| LeagueSummary {
                name: league
                    .get("leagueName")
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_LEAGUE_NAME)
                    .to_string(),
                league_type: league
                    .get("leagueType")
                    .filter(|value| !value.is_null())
                    .cloned()
                    .unwrap_or_else(|| Value::from(0)),
                index,
            })
            .collect(),
    )
}

fn object_fields(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn without_provenance(fields: &Map<String, Value>) -> Map<String, Value> {
    let mut out = fields.clone();
    out.retain(|key, _| !PROVENANCE_KEYS.contains(&key.as_str()));
    out
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
