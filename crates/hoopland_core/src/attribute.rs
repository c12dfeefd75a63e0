//! Player attribute codes. Each attribute is stored as a `[current, max]` pair
//! under its three-letter code in the player's `attributes` object.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeGroup {
    Finishing,
    Shooting,
    Creating,
    Defense,
    Physicals,
}

impl AttributeGroup {
    pub const ALL: [AttributeGroup; 5] = [
        AttributeGroup::Finishing,
        AttributeGroup::Shooting,
        AttributeGroup::Creating,
        AttributeGroup::Defense,
        AttributeGroup::Physicals,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Finishing => "Finishing",
            Self::Shooting => "Shooting",
            Self::Creating => "Creating",
            Self::Defense => "Defense",
            Self::Physicals => "Physicals",
        }
    }

    pub fn members(&self) -> Vec<AttributeCode> {
        AttributeCode::ALL
            .iter()
            .copied()
            .filter(|code| code.group() == *self)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeCode {
    Layup,
    Dunk,
    Inside,
    MidRange,
    ThreePoint,
    FreeThrow,
    Dribbling,
    Passing,
    OffensiveRebound,
    DefensiveRebound,
    Steal,
    Block,
    Speed,
    Strength,
    Stamina,
}

impl AttributeCode {
    pub const ALL: [AttributeCode; 15] = [
        AttributeCode::Layup,
        AttributeCode::Dunk,
        AttributeCode::Inside,
        AttributeCode::MidRange,
        AttributeCode::ThreePoint,
        AttributeCode::FreeThrow,
        AttributeCode::Dribbling,
        AttributeCode::Passing,
        AttributeCode::OffensiveRebound,
        AttributeCode::DefensiveRebound,
        AttributeCode::Steal,
        AttributeCode::Block,
        AttributeCode::Speed,
        AttributeCode::Strength,
        AttributeCode::Stamina,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Layup => "LAY",
            Self::Dunk => "DNK",
            Self::Inside => "INS",
            Self::MidRange => "MID",
            Self::ThreePoint => "TPT",
            Self::FreeThrow => "FTS",
            Self::Dribbling => "DRB",
            Self::Passing => "PAS",
            Self::OffensiveRebound => "ORE",
            Self::DefensiveRebound => "DRE",
            Self::Steal => "STL",
            Self::Block => "BLK",
            Self::Speed => "SPD",
            Self::Strength => "STR",
            Self::Stamina => "STM",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|known| known.code().eq_ignore_ascii_case(code))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Layup => "Layup",
            Self::Dunk => "Dunk",
            Self::Inside => "Inside Scoring",
            Self::MidRange => "Mid-range",
            Self::ThreePoint => "3-point",
            Self::FreeThrow => "Free Throw",
            Self::Dribbling => "Dribbling",
            Self::Passing => "Passing",
            Self::OffensiveRebound => "Offensive Rebound",
            Self::DefensiveRebound => "Defensive Rebound",
            Self::Steal => "Steal",
            Self::Block => "Block",
            Self::Speed => "Speed",
            Self::Strength => "Strength",
            Self::Stamina => "Stamina",
        }
    }

    pub fn group(&self) -> AttributeGroup {
        match self {
            Self::Layup | Self::Dunk | Self::Inside => AttributeGroup::Finishing,
            Self::MidRange | Self::ThreePoint | Self::FreeThrow => AttributeGroup::Shooting,
            Self::Dribbling | Self::Passing | Self::OffensiveRebound | Self::DefensiveRebound => {
                AttributeGroup::Creating
            }
            Self::Steal | Self::Block => AttributeGroup::Defense,
            Self::Speed | Self::Strength | Self::Stamina => AttributeGroup::Physicals,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeValue {
    pub current: i64,
    pub max: i64,
}

impl AttributeValue {
    pub fn new(current: i64, max: i64) -> Self {
        Self { current, max }
    }

    /// Reads a stored pair; missing or non-numeric halves read as 0.
    pub fn from_json(value: &Value) -> Self {
        let half = |index: usize| {
            value
                .get(index)
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
                .unwrap_or(0)
        };
        Self {
            current: half(0),
            max: half(1),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Array(vec![Value::from(self.current), Value::from(self.max)])
    }

    pub fn with_current(self, current: i64) -> Self {
        Self { current, ..self }
    }

    pub fn with_max(self, max: i64) -> Self {
        Self { max, ..self }
    }
}

/// Parses `CUR/MAX` (or a bare `CUR`, which keeps `fallback.max`).
pub fn parse_attribute_pair(text: &str, fallback: AttributeValue) -> Option<AttributeValue> {
    let text = text.trim();
    match text.split_once('/') {
        Some((current, max)) => Some(AttributeValue::new(
            current.trim().parse().ok()?,
            max.trim().parse().ok()?,
        )),
        None => text.parse().ok().map(|current| fallback.with_current(current)),
    }
}
