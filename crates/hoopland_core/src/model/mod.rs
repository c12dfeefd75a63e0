//! Typed views over save records.
//!
//! Records type the fields the editor reads and keep every other key in an
//! ordered `extra` map, so a record can be edited and written back without
//! dropping data the editor does not understand.

mod fields;
mod game_mode;
mod league;
mod player;
mod slot;
mod team;

pub use game_mode::{GameMode, GameModeSection};
pub use league::{DraftProspects, League};
pub use player::{DraftInfo, MAX_SKILLS_PER_CATEGORY, Player, PlayerPatch, PlayerSkill, json_number};
pub use slot::Slot;
pub use team::{LineupEntry, LineupSlot, Team, TeamPatch};
