//! Basketball position codes.
//!
//! Saves store positions as small integers (`0` = point guard). Some community
//! edited saves carry them as strings instead, either the digit (`"3"`) or the
//! abbreviation (`"PF"`), so [`PositionCode`] accepts both.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
    Guard,
    Forward,
    ForwardCenter,
    GuardForward,
    Unknown(i64),
}

#[rustfmt::skip]
const POSITION_TABLE: &[(Position, i64, &str, &str)] = &[
    (Position::PointGuard,    0, "PG", "Point Guard"),
    (Position::ShootingGuard, 1, "SG", "Shooting Guard"),
    (Position::SmallForward,  2, "SF", "Small Forward"),
    (Position::PowerForward,  3, "PF", "Power Forward"),
    (Position::Center,        4, "C",  "Center"),
    (Position::Guard,         5, "G",  "Guard"),
    (Position::Forward,       6, "F",  "Forward"),
    (Position::ForwardCenter, 7, "FC", "Forward-Center"),
    (Position::GuardForward,  8, "GF", "Guard-Forward"),
];

impl Position {
    pub const ALL: [Position; 9] = [
        Position::PointGuard,
        Position::ShootingGuard,
        Position::SmallForward,
        Position::PowerForward,
        Position::Center,
        Position::Guard,
        Position::Forward,
        Position::ForwardCenter,
        Position::GuardForward,
    ];

    pub fn from_raw(raw: i64) -> Self {
        POSITION_TABLE
            .iter()
            .find(|(_, code, _, _)| *code == raw)
            .map(|(position, _, _, _)| *position)
            .unwrap_or(Self::Unknown(raw))
    }

    pub fn from_abbr(abbr: &str) -> Option<Self> {
        let abbr = abbr.trim();
        POSITION_TABLE
            .iter()
            .find(|(_, _, known, _)| known.eq_ignore_ascii_case(abbr))
            .map(|(position, _, _, _)| *position)
    }

    pub fn raw(&self) -> i64 {
        match *self {
            Self::Unknown(raw) => raw,
            known => POSITION_TABLE
                .iter()
                .find(|(position, _, _, _)| *position == known)
                .map(|(_, code, _, _)| *code)
                .unwrap_or_default(),
        }
    }

    fn entry(&self) -> Option<&'static (Position, i64, &'static str, &'static str)> {
        POSITION_TABLE
            .iter()
            .find(|(position, _, _, _)| position == self)
    }

    pub fn abbr(&self) -> String {
        match self.entry() {
            Some((_, _, abbr, _)) => (*abbr).to_string(),
            None => format!("POS{}", self.raw()),
        }
    }

    pub fn name(&self) -> String {
        match self.entry() {
            Some((_, _, _, name)) => (*name).to_string(),
            None => format!("Position {}", self.raw()),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.abbr())
    }
}

/// A position value as stored in the save, numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionCode {
    Numeric(i64),
    Text(String),
}

impl PositionCode {
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Numeric(raw) => Some(Position::from_raw(*raw)),
            Self::Text(text) => parse_leading_int(text)
                .map(Position::from_raw)
                .or_else(|| Position::from_abbr(text)),
        }
    }

    pub fn abbr(&self) -> String {
        match (self.position(), self) {
            (Some(position), _) => position.abbr(),
            (None, Self::Text(text)) => text.clone(),
            (None, Self::Numeric(raw)) => format!("POS{raw}"),
        }
    }

    pub fn name(&self) -> String {
        match (self.position(), self) {
            (Some(position), _) => position.name(),
            (None, Self::Text(text)) => text.clone(),
            (None, Self::Numeric(raw)) => format!("Position {raw}"),
        }
    }
}

impl fmt::Display for PositionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(raw) => write!(f, "{raw}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<Position> for PositionCode {
    fn from(position: Position) -> Self {
        Self::Numeric(position.raw())
    }
}

pub fn position_abbr(code: Option<&PositionCode>) -> String {
    code.map(PositionCode::abbr)
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn position_name(code: Option<&PositionCode>) -> String {
    code.map(PositionCode::name)
        .unwrap_or_else(|| "Unknown".to_string())
}

// Leading-digits integer parse: "3", " 3", "3rd" and "-1" parse, "PF" does not.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}
