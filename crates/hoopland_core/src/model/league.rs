use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core_api::{CoreError, CoreErrorCode};

use super::game_mode::GameMode;
use super::player::Player;
use super::slot::Slot;
use super::team::Team;

const TEAMS_KEY: &str = "teams";
const ROSTER_KEY: &str = "roster";
const CAREER_PLAYER_KEY: &str = "player";
const DRAFT_CLASS_KEY: &str = "draftClass";
const FREE_AGENTS_KEY: &str = "freeAgents";
const GAME_MODES_KEY: &str = "gameModes";

/// League-level fields of one league record.
///
/// The fields stay an ordered JSON map and typed records are read out of it
/// on demand. Edits replace the raw value of the one record they touch, so
/// everything else is written back exactly as it was loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct League {
    fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftProspects {
    /// The league's own `draftClass`.
    Class(Vec<Player>),
    /// No draft class: the career player followed by the free agents.
    Synthesized(Vec<Player>),
    Empty,
}

impl DraftProspects {
    pub fn players(&self) -> &[Player] {
        match self {
            Self::Class(players) | Self::Synthesized(players) => players,
            Self::Empty => &[],
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, Self::Synthesized(_))
    }
}

impl League {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Self::from_fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("leagueName").and_then(Value::as_str)
    }

    pub fn short_name(&self) -> Option<&str> {
        self.fields.get("shortName").and_then(Value::as_str)
    }

    pub fn league_type(&self) -> Option<&Value> {
        self.fields.get("leagueType")
    }

    pub fn conferences(&self) -> &[Value] {
        self.array("conferences")
    }

    pub fn divisions(&self) -> &[Value] {
        self.array("divisions")
    }

    fn array(&self, key: &str) -> &[Value] {
        self.fields
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn teams(&self) -> Vec<Slot<Team>> {
        Slot::list_from(self.fields.get(TEAMS_KEY))
    }

    pub fn find_team(&self, id: i64) -> Option<Team> {
        self.teams()
            .into_iter()
            .filter_map(Slot::into_record)
            .find(|team| team.id == id)
    }

    /// The embedded career-mode player, present only in mobile leagues.
    pub fn career_player(&self) -> Option<Player> {
        self.fields
            .get(CAREER_PLAYER_KEY)
            .and_then(Player::from_value)
    }

    pub fn draft_class(&self) -> Vec<Slot<Player>> {
        Slot::list_from(self.fields.get(DRAFT_CLASS_KEY))
    }

    pub fn free_agents(&self) -> Vec<Slot<Player>> {
        Slot::list_from(self.fields.get(FREE_AGENTS_KEY))
    }

    pub fn game_modes(&self) -> Vec<Slot<GameMode>> {
        Slot::list_from(self.fields.get(GAME_MODES_KEY))
    }

    /// Career player first, then every readable roster player in team order.
    pub fn all_players(&self) -> Vec<Player> {
        let mut players: Vec<Player> = self.career_player().into_iter().collect();
        for team in self.teams().into_iter().filter_map(Slot::into_record) {
            players.extend(
                team.roster
                    .into_iter()
                    .flatten()
                    .filter_map(Slot::into_record),
            );
        }
        players
    }

    pub fn draft_prospects(&self) -> DraftProspects {
        let class: Vec<Player> = self
            .draft_class()
            .into_iter()
            .filter_map(Slot::into_record)
            .collect();
        if !class.is_empty() {
            return DraftProspects::Class(class);
        }

        let mut synthesized: Vec<Player> = self.career_player().into_iter().collect();
        synthesized.extend(
            self.free_agents()
                .into_iter()
                .filter_map(Slot::into_record),
        );
        if synthesized.is_empty() {
            DraftProspects::Empty
        } else {
            DraftProspects::Synthesized(synthesized)
        }
    }

    pub fn with_field(&self, key: impl Into<String>, value: Value) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(key.into(), value);
        Self { fields }
    }

    /// Replaces every record carrying `player.id`: the career player, roster
    /// entries, draft class entries and free agents.
    pub fn with_player(&self, player: &Player) -> Result<Self, CoreError> {
        let replacement = player.to_value()?;
        let mut fields = self.fields.clone();
        let mut replaced = 0usize;

        if let Some(slot) = fields.get_mut(CAREER_PLAYER_KEY) {
            replaced += replace_if_id(slot, player.id, &replacement);
        }
        if let Some(teams) = fields.get_mut(TEAMS_KEY).and_then(Value::as_array_mut) {
            for team in teams.iter_mut() {
                if let Some(roster) = team.get_mut(ROSTER_KEY) {
                    replaced += replace_in_list(roster, player.id, &replacement);
                }
            }
        }
        for key in [DRAFT_CLASS_KEY, FREE_AGENTS_KEY] {
            if let Some(list) = fields.get_mut(key) {
                replaced += replace_in_list(list, player.id, &replacement);
            }
        }

        if replaced == 0 {
            return Err(CoreError::new(
                CoreErrorCode::RecordNotFound,
                format!("no player with id {} in this league", player.id),
            ));
        }
        Ok(Self { fields })
    }

    pub fn with_team(&self, team: &Team) -> Result<Self, CoreError> {
        let replacement = team.to_value()?;
        let mut fields = self.fields.clone();
        let replaced = fields
            .get_mut(TEAMS_KEY)
            .map(|teams| replace_in_list(teams, team.id, &replacement))
            .unwrap_or(0);

        if replaced == 0 {
            return Err(CoreError::new(
                CoreErrorCode::RecordNotFound,
                format!("no team with id {} in this league", team.id),
            ));
        }
        Ok(Self { fields })
    }

    pub fn with_game_mode(&self, index: usize, mode: &GameMode) -> Result<Self, CoreError> {
        let mut fields = self.fields.clone();
        let slot = fields
            .get_mut(GAME_MODES_KEY)
            .and_then(Value::as_array_mut)
            .and_then(|modes| modes.get_mut(index))
            .ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::InvalidGameModeIndex,
                    format!("game mode index {index} is out of range"),
                )
            })?;
        *slot = mode.clone().into_value();
        Ok(Self { fields })
    }
}

fn replace_if_id(slot: &mut Value, id: i64, replacement: &Value) -> usize {
    if slot.get("id").and_then(Value::as_i64) == Some(id) {
        *slot = replacement.clone();
        1
    } else {
        0
    }
}

fn replace_in_list(list: &mut Value, id: i64, replacement: &Value) -> usize {
    list.as_array_mut()
        .map(|items| {
            items
                .iter_mut()
                .map(|item| replace_if_id(item, id, replacement))
                .sum()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{DraftProspects, League};
    use crate::core_api::CoreErrorCode;
    use crate::model::{GameMode, Player, Team};

    fn league() -> League {
        League::from_value(&json!({
            "leagueName": "Pro League",
            "leagueType": 0,
            "player": {"id": 500, "fn": "Career", "ln": "Guy", "rating": 55},
            "teams": [
                {
                    "id": 1,
                    "name": "Bulls",
                    "roster": [
                        {"id": 10, "fn": "Jon", "ln": "Doe", "jersey": "home"},
                        null
                    ]
                },
                "not a team",
                {"id": 2, "name": "Lakers", "roster": [{"id": 20, "fn": "Max", "ln": "Power"}]}
            ],
            "draftClass": [],
            "freeAgents": [{"id": 200, "fn": "Free", "ln": "Agent"}],
            "gameModes": [{"mode": 1, "currentYear": 2030}]
        }))
        .expect("league should parse")
    }

    #[test]
    fn all_players_lists_career_player_first() {
        let ids: Vec<i64> = league().all_players().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![500, 10, 20]);
    }

    #[test]
    fn empty_draft_class_synthesizes_prospects() {
        let prospects = league().draft_prospects();
        assert!(prospects.is_synthesized());
        let ids: Vec<i64> = prospects.players().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![500, 200]);

        let bare = League::from_value(&json!({"teams": []})).expect("league should parse");
        assert_eq!(bare.draft_prospects(), DraftProspects::Empty);
    }

    #[test]
    fn player_edit_touches_only_matching_record() {
        let original = league();
        let mut jon = original
            .all_players()
            .into_iter()
            .find(|p| p.id == 10)
            .expect("roster player present");
        jon.first_name = Some("John".into());

        let edited = original.with_player(&jon).expect("player exists");
        let roster = &edited.get("teams").expect("teams")[0]["roster"];
        assert_eq!(roster[0]["fn"], json!("John"));
        assert_eq!(roster[0]["jersey"], json!("home"));
        assert_eq!(roster[1], Value::Null);
        assert_eq!(edited.get("teams").expect("teams")[1], json!("not a team"));
        assert_eq!(edited.get("player"), original.get("player"));
        assert_eq!(original.get("teams").expect("teams")[0]["roster"][0]["fn"], json!("Jon"));
    }

    #[test]
    fn career_player_edit_routes_to_player_slot() {
        let mut career = league().career_player().expect("career player");
        career.rating = Some(70.into());
        let edited = league().with_player(&career).expect("career player exists");
        assert_eq!(edited.get("player").expect("player")["rating"], json!(70));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let err = league()
            .with_player(&Player::new(999))
            .expect_err("no such player");
        assert_eq!(err.code, CoreErrorCode::RecordNotFound);

        let err = league().with_team(&Team::new(42)).expect_err("no such team");
        assert_eq!(err.code, CoreErrorCode::RecordNotFound);
    }

    #[test]
    fn game_mode_index_is_checked() {
        let mode = GameMode::default().with_field("mode", json!(2));
        let edited = league().with_game_mode(0, &mode).expect("index 0 exists");
        assert_eq!(edited.get("gameModes").expect("modes")[0], json!({"mode": 2}));

        let err = league().with_game_mode(3, &mode).expect_err("index 3 is missing");
        assert_eq!(err.code, CoreErrorCode::InvalidGameModeIndex);
    }
}
