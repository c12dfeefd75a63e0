//! Player and team search.
//!
//! Searching never fails: missing fields read as empty text or a zero rating
//! and the record still takes part. Entries that are `None` (null slots in a
//! roster) are skipped. Results keep input order.

use serde::{Deserialize, Serialize};

use crate::model::{Player, Team};
use crate::skills::{SkillCatalog, SkillCategory};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerFilters {
    /// Position abbreviation (`"C"`) or stored position value (`"4"`).
    pub position: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub skill_category: Option<SkillCategory>,
    pub team_id: Option<i64>,
}

impl PlayerFilters {
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    pub fn active_count(&self) -> usize {
        [
            self.position.as_deref().is_some_and(|p| !p.is_empty()),
            self.min_rating.is_some(),
            self.max_rating.is_some(),
            self.skill_category.is_some(),
            self.team_id.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn accepts(&self, player: &Player, catalog: &SkillCatalog) -> bool {
        if let Some(position) = self.position.as_deref().filter(|p| !p.is_empty()) {
            let stored = player.position.as_ref().map(ToString::to_string);
            if player.position_abbr() != position && stored.as_deref() != Some(position) {
                return false;
            }
        }

        let rating = player.rating_value();
        if self.min_rating.is_some_and(|min| rating < min) {
            return false;
        }
        if self.max_rating.is_some_and(|max| rating > max) {
            return false;
        }

        if let Some(category) = self.skill_category {
            if !player.has_skill_in(category, catalog) {
                return false;
            }
        }

        match self.team_id {
            Some(team_id) => player.team_id == Some(team_id),
            None => true,
        }
    }
}

fn matches_text(player: &Player, lower: &str, raw: &str) -> bool {
    let number = player.number.map(|n| n.to_string()).unwrap_or_default();

    player.full_name().to_lowercase().contains(lower)
        || player.id.to_string().contains(raw)
        || player.position_abbr().to_lowercase().contains(lower)
        || player.position_name().to_lowercase().contains(lower)
        || number.contains(raw)
        || format!("#{number}").contains(raw)
}

/// Players matching `query` (name, id, position, jersey number) and every
/// active filter. A blank query matches everyone.
pub fn search_players<'a>(
    players: &[Option<&'a Player>],
    query: &str,
    filters: &PlayerFilters,
    catalog: &SkillCatalog,
) -> Vec<&'a Player> {
    let raw = query.trim();
    let lower = raw.to_lowercase();

    players
        .iter()
        .flatten()
        .copied()
        .filter(|player| raw.is_empty() || matches_text(player, &lower, raw))
        .filter(|player| filters.accepts(player, catalog))
        .collect()
}

/// Teams whose name, city, short name or id contains `query`,
/// case-insensitively. A blank query matches every team.
pub fn search_teams<'a>(teams: &[Option<&'a Team>], query: &str) -> Vec<&'a Team> {
    let lower = query.trim().to_lowercase();

    teams
        .iter()
        .flatten()
        .copied()
        .filter(|team| {
            if lower.is_empty() {
                return true;
            }
            [
                team.name.as_deref(),
                team.city.as_deref(),
                team.short_name.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&lower))
                || team.id.to_string().contains(&lower)
        })
        .collect()
}
