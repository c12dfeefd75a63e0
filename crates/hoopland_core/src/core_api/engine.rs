use serde_json::Value;
use tracing::{debug, warn};

use crate::model::{DraftProspects, GameMode, League, Player, PlayerPatch, Slot, Team, TeamPatch};
use crate::query::{self, PlayerFilters};
use crate::save::{self, NormalizedDocument};
use crate::skills::SkillCatalog;

use super::error::{CoreError, CoreErrorCode};
use super::types::LeagueSummary;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Default, Clone)]
pub struct Engine {
    skills: SkillCatalog,
}

/// One loaded save. Edits replace the held document with a new value; a
/// failed edit or league switch leaves it as it was.
#[derive(Debug, Clone)]
pub struct Session {
    document: NormalizedDocument,
    skills: SkillCatalog,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill_catalog(skills: SkillCatalog) -> Self {
        Self { skills }
    }

    pub fn skill_catalog(&self) -> &SkillCatalog {
        &self.skills
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let bytes = bytes.as_ref();
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let raw: Value = serde_json::from_slice(bytes).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Parse,
                format!("failed to parse save as JSON: {e}"),
            )
        })?;
        self.open_value(raw)
    }

    pub fn open_str(&self, text: &str) -> Result<Session, CoreError> {
        self.open_bytes(text.as_bytes())
    }

    pub fn open_value(&self, raw: Value) -> Result<Session, CoreError> {
        let document = save::normalize(raw)?;
        debug!(
            shape = %document.shape(),
            league = document.league().name().unwrap_or_default(),
            "opened save"
        );
        Ok(Session {
            document,
            skills: self.skills.clone(),
        })
    }
}

impl Session {
    pub fn document(&self) -> &NormalizedDocument {
        &self.document
    }

    pub fn league(&self) -> &League {
        self.document.league()
    }

    pub fn is_mobile(&self) -> bool {
        self.document.is_mobile()
    }

    pub fn current_league_index(&self) -> usize {
        self.document.current_league_index()
    }

    /// League menu entries for mobile saves; `None` for desktop saves.
    pub fn leagues(&self) -> Option<Vec<LeagueSummary>> {
        save::league_summaries(self.document.original_data())
    }

    pub fn skill_catalog(&self) -> &SkillCatalog {
        &self.skills
    }

    pub fn all_players(&self) -> Vec<Player> {
        self.league().all_players()
    }

    /// Looks a player up among the roster players, the career player, the
    /// draft class and the free agents.
    pub fn find_player(&self, id: i64) -> Option<Player> {
        let league = self.league();
        league
            .all_players()
            .into_iter()
            .chain(league.draft_class().into_iter().filter_map(Slot::into_record))
            .chain(league.free_agents().into_iter().filter_map(Slot::into_record))
            .find(|player| player.id == id)
    }

    pub fn teams(&self) -> Vec<Team> {
        self.league()
            .teams()
            .into_iter()
            .filter_map(Slot::into_record)
            .collect()
    }

    pub fn game_modes(&self) -> Vec<Slot<GameMode>> {
        self.league().game_modes()
    }

    pub fn search_players(&self, query: &str, filters: &PlayerFilters) -> Vec<Player> {
        let players = self.all_players();
        let refs: Vec<Option<&Player>> = players.iter().map(Some).collect();
        query::search_players(&refs, query, filters, &self.skills)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn search_teams(&self, query: &str) -> Vec<Team> {
        let teams = self.league().teams();
        let refs: Vec<Option<&Team>> = teams.iter().map(Slot::record).collect();
        query::search_teams(&refs, query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn draft_prospects(&self) -> DraftProspects {
        self.league().draft_prospects()
    }

    pub fn update_player(&mut self, player: &Player) -> Result<(), CoreError> {
        let league = self.league().with_player(player)?;
        self.document = self.document.with_league(league);
        Ok(())
    }

    pub fn edit_player(&mut self, id: i64, patch: &PlayerPatch) -> Result<Player, CoreError> {
        let player = self.find_player(id).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::RecordNotFound,
                format!("no player with id {id} in this league"),
            )
        })?;
        let updated = player.patched(patch);
        self.update_player(&updated)?;
        Ok(updated)
    }

    pub fn update_team(&mut self, team: &Team) -> Result<(), CoreError> {
        let league = self.league().with_team(team)?;
        self.document = self.document.with_league(league);
        Ok(())
    }

    pub fn edit_team(&mut self, id: i64, patch: &TeamPatch) -> Result<Team, CoreError> {
        let team = self.league().find_team(id).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::RecordNotFound,
                format!("no team with id {id} in this league"),
            )
        })?;
        let updated = team.patched(patch);
        self.update_team(&updated)?;
        Ok(updated)
    }

    pub fn update_game_mode(&mut self, index: usize, mode: &GameMode) -> Result<(), CoreError> {
        let league = self.league().with_game_mode(index, mode)?;
        self.document = self.document.with_league(league);
        Ok(())
    }

    pub fn set_league_field(&mut self, key: &str, value: Value) -> Result<(), CoreError> {
        if save::PROVENANCE_KEYS.contains(&key) {
            return Err(CoreError::new(
                CoreErrorCode::UnsupportedOperation,
                format!("'{key}' is reserved and cannot be set on a league"),
            ));
        }
        let league = self.league().with_field(key, value);
        self.document = self.document.with_league(league);
        Ok(())
    }

    /// Re-reads league `index` from the loaded save. Unsaved edits to the
    /// current league are discarded.
    pub fn switch_league(&mut self, index: usize) -> Result<(), CoreError> {
        match save::switch_league(self.document.original_data(), index) {
            Ok(document) => {
                debug!(index, "switched league");
                self.document = document;
                Ok(())
            }
            Err(err) => {
                warn!(index, error = %err, "league switch rejected");
                Err(err)
            }
        }
    }

    pub fn to_value(&self) -> Value {
        save::denormalize(&self.document)
    }

    /// The save as pretty-printed JSON with two-space indentation.
    pub fn to_bytes_modified(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec_pretty(&self.to_value()).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to emit modified save: {e}"),
            )
        })
    }
}
