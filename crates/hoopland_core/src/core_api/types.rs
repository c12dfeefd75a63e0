use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveShape {
    /// Single league, league fields at the top level.
    Desktop,
    /// One or more leagues under `seasonLeagues`.
    Mobile,
}

impl SaveShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for SaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeagueKind {
    Nba,
    College,
}

impl LeagueKind {
    /// `leagueType` 0 (numeric or `"0"`) is the pro league; anything else is
    /// treated as college.
    pub fn from_league_type(value: &Value) -> Self {
        let is_pro = match value {
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.trim() == "0",
            _ => false,
        };
        if is_pro { Self::Nba } else { Self::College }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Nba => "NBA",
            Self::College => "COLLEGE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSummary {
    pub name: String,
    pub league_type: Value,
    pub index: usize,
}

impl LeagueSummary {
    pub fn kind(&self) -> LeagueKind {
        LeagueKind::from_league_type(&self.league_type)
    }
}
