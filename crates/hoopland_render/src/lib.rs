use std::fmt::Write as _;

use hoopland_core::attribute::AttributeGroup;
use hoopland_core::core_api::{LeagueKind, LeagueSummary, Session};
use hoopland_core::model::{DraftProspects, GameMode, Player, Slot, Team};
use hoopland_core::skills::SkillCatalog;
use serde_json::{Map as JsonMap, Value as JsonValue};

const NAME_COL_WIDTH: usize = 24;
const TEAM_COL_WIDTH: usize = 28;
const SKILL_COL_WIDTH: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Adds per-player attribute and skill blocks and game mode fields.
    pub verbose: bool,
}

pub fn render_json_overview(session: &Session, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(overview_json(session)),
    }
}

fn overview_json(session: &Session) -> JsonMap<String, JsonValue> {
    let league = session.league();
    let mut out = JsonMap::new();

    out.insert(
        "format".to_string(),
        JsonValue::String(session.document().shape().to_string()),
    );
    out.insert("league_name".to_string(), optional_str(league.name()));
    out.insert("short_name".to_string(), optional_str(league.short_name()));
    out.insert(
        "league_type".to_string(),
        league.league_type().cloned().unwrap_or(JsonValue::Null),
    );
    out.insert(
        "league_index".to_string(),
        JsonValue::from(session.current_league_index()),
    );
    out.insert(
        "leagues".to_string(),
        match session.leagues() {
            Some(leagues) => render_leagues_json(&leagues),
            None => JsonValue::Null,
        },
    );
    out.insert("teams".to_string(), render_teams_json(&session.teams()));
    out.insert(
        "players".to_string(),
        render_players_json(&session.all_players(), session.skill_catalog()),
    );
    out.insert(
        "prospects".to_string(),
        render_prospects_json(&session.draft_prospects()),
    );
    out.insert(
        "game_mode_count".to_string(),
        JsonValue::from(session.game_modes().len()),
    );

    out
}

pub fn render_players_json(players: &[Player], catalog: &SkillCatalog) -> JsonValue {
    JsonValue::Array(
        players
            .iter()
            .map(|player| player_to_json(player, catalog))
            .collect(),
    )
}

fn player_to_json(player: &Player, catalog: &SkillCatalog) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("id".to_string(), JsonValue::from(player.id));
    m.insert("name".to_string(), JsonValue::String(player.display_name()));
    m.insert("team_id".to_string(), optional_int(player.team_id));
    m.insert(
        "position".to_string(),
        JsonValue::String(player.position_abbr()),
    );
    m.insert("number".to_string(), optional_int(player.number));
    m.insert(
        "rating".to_string(),
        player
            .rating
            .clone()
            .map_or(JsonValue::Null, JsonValue::Number),
    );
    m.insert(
        "skills".to_string(),
        JsonValue::Array(
            player
                .skill_list()
                .iter()
                .map(|skill| {
                    let definition = catalog.definition(&skill.id);
                    let mut s = JsonMap::new();
                    s.insert("id".to_string(), JsonValue::String(skill.id.clone()));
                    s.insert("name".to_string(), JsonValue::String(definition.name));
                    s.insert(
                        "category".to_string(),
                        JsonValue::String(definition.category.to_string()),
                    );
                    s.insert("level".to_string(), optional_int(skill.level));
                    JsonValue::Object(s)
                })
                .collect(),
        ),
    );
    JsonValue::Object(m)
}

pub fn render_teams_json(teams: &[Team]) -> JsonValue {
    JsonValue::Array(
        teams
            .iter()
            .map(|team| {
                let mut m = JsonMap::new();
                m.insert("id".to_string(), JsonValue::from(team.id));
                m.insert("name".to_string(), optional_str(team.name.as_deref()));
                m.insert("city".to_string(), optional_str(team.city.as_deref()));
                m.insert(
                    "short_name".to_string(),
                    optional_str(team.short_name.as_deref()),
                );
                m.insert(
                    "roster_size".to_string(),
                    JsonValue::from(team.players().len()),
                );
                JsonValue::Object(m)
            })
            .collect(),
    )
}

pub fn render_leagues_json(leagues: &[LeagueSummary]) -> JsonValue {
    JsonValue::Array(
        leagues
            .iter()
            .map(|league| {
                let mut m = JsonMap::new();
                m.insert("index".to_string(), JsonValue::from(league.index));
                m.insert("name".to_string(), JsonValue::String(league.name.clone()));
                m.insert("type".to_string(), league.league_type.clone());
                m.insert(
                    "kind".to_string(),
                    JsonValue::String(league.kind().label().to_string()),
                );
                JsonValue::Object(m)
            })
            .collect(),
    )
}

pub fn render_prospects_json(prospects: &DraftProspects) -> JsonValue {
    let source = match prospects {
        DraftProspects::Class(_) => "draft_class",
        DraftProspects::Synthesized(_) => "career_and_free_agents",
        DraftProspects::Empty => "none",
    };

    let mut out = JsonMap::new();
    out.insert("source".to_string(), JsonValue::String(source.to_string()));
    out.insert(
        "players".to_string(),
        JsonValue::Array(
            prospects
                .players()
                .iter()
                .map(|player| {
                    let mut m = JsonMap::new();
                    m.insert("id".to_string(), JsonValue::from(player.id));
                    m.insert("name".to_string(), JsonValue::String(player.display_name()));
                    m.insert(
                        "position".to_string(),
                        JsonValue::String(player.position_abbr()),
                    );
                    if let Some(draft) = player.draft_info() {
                        m.insert("round".to_string(), optional_int(draft.round));
                        m.insert("pick".to_string(), optional_int(draft.pick));
                        m.insert("year".to_string(), optional_int(draft.year));
                    }
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    JsonValue::Object(out)
}

pub fn render_overview_text(session: &Session, options: TextRenderOptions) -> String {
    let league = session.league();
    let mut out = String::new();

    let title = league.name().unwrap_or("Unnamed League");
    let kind = league
        .league_type()
        .map(LeagueKind::from_league_type)
        .unwrap_or(LeagueKind::Nba);
    writeln!(&mut out, "{title} ({})", kind.label()).expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "Format: {}  League: {}",
        session.document().shape(),
        session.current_league_index()
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    if let Some(leagues) = session.leagues() {
        out.push_str(&render_league_list_text(
            &leagues,
            session.current_league_index(),
        ));
        writeln!(&mut out).expect("writing to String cannot fail");
    }

    out.push_str(&render_teams_text(&session.teams()));
    writeln!(&mut out).expect("writing to String cannot fail");

    if let Some(career) = league.career_player() {
        writeln!(&mut out, " ::: Career Player :::").expect("writing to String cannot fail");
        writeln!(&mut out, "  {}", player_row(&career)).expect("writing to String cannot fail");
        writeln!(&mut out).expect("writing to String cannot fail");
    }

    out.push_str(&render_prospects_text(&session.draft_prospects()));

    if options.verbose {
        let modes = session.game_modes();
        if !modes.is_empty() {
            writeln!(&mut out).expect("writing to String cannot fail");
            write_game_modes(&mut out, &modes);
        }
    }

    out
}

pub fn render_league_list_text(leagues: &[LeagueSummary], current: usize) -> String {
    let mut out = String::new();
    writeln!(&mut out, " ::: Leagues :::").expect("writing to String cannot fail");
    for league in leagues {
        let marker = if league.index == current { '*' } else { ' ' };
        writeln!(
            &mut out,
            " {marker}{:>2}  {} ({})",
            league.index,
            league.name,
            league.kind().label()
        )
        .expect("writing to String cannot fail");
    }
    out
}

pub fn render_teams_text(teams: &[Team]) -> String {
    let mut out = String::new();
    writeln!(&mut out, " ::: Teams :::").expect("writing to String cannot fail");
    if teams.is_empty() {
        writeln!(&mut out, "  none").expect("writing to String cannot fail");
        return out;
    }
    for team in teams {
        let line = format!(
            "  {:>4}  {:<5}{:<w$}{} players",
            team.id,
            team.short_name.as_deref().unwrap_or("-"),
            fit_column(&team.display_name(), TEAM_COL_WIDTH),
            team.players().len(),
            w = TEAM_COL_WIDTH + 2
        );
        writeln!(&mut out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
    out
}

pub fn render_players_text(
    players: &[Player],
    catalog: &SkillCatalog,
    options: TextRenderOptions,
) -> String {
    let mut out = String::new();
    writeln!(&mut out, " ::: Players :::").expect("writing to String cannot fail");
    if players.is_empty() {
        writeln!(&mut out, "  none").expect("writing to String cannot fail");
        return out;
    }
    for player in players {
        writeln!(&mut out, "  {}", player_row(player)).expect("writing to String cannot fail");
        if options.verbose {
            write_player_detail(&mut out, player, catalog);
        }
    }
    out
}

pub fn render_prospects_text(prospects: &DraftProspects) -> String {
    let mut out = String::new();
    let heading = if prospects.is_synthesized() {
        " ::: Draft Prospects (career player and free agents) :::"
    } else {
        " ::: Draft Prospects :::"
    };
    writeln!(&mut out, "{heading}").expect("writing to String cannot fail");

    if prospects.players().is_empty() {
        writeln!(&mut out, "  none").expect("writing to String cannot fail");
        return out;
    }
    for player in prospects.players() {
        let mut line = format!("  {}", player_row(player));
        if let Some(draft) = player.draft_info() {
            match (draft.round, draft.pick) {
                (Some(round), Some(pick)) => {
                    write!(line, "  R{round} P{pick}").expect("writing to String cannot fail");
                }
                (Some(round), None) => {
                    write!(line, "  R{round}").expect("writing to String cannot fail");
                }
                _ => {}
            }
        }
        writeln!(&mut out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
    out
}

fn player_row(player: &Player) -> String {
    let number = player
        .number
        .map(|n| format!("#{n}"))
        .unwrap_or_else(|| "-".to_string());
    let rating = player
        .rating
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    let line = format!(
        "{:>5}  {:<w$}{:<5}{:<5}{}",
        player.id,
        fit_column(&player.display_name(), NAME_COL_WIDTH),
        player.position_abbr(),
        number,
        rating,
        w = NAME_COL_WIDTH + 2
    );
    line.trim_end().to_string()
}

fn write_player_detail(out: &mut String, player: &Player, catalog: &SkillCatalog) {
    for group in AttributeGroup::ALL {
        let values: Vec<String> = group
            .members()
            .iter()
            .map(|code| {
                let value = player.attribute(*code);
                format!("{} {}/{}", code.code(), value.current, value.max)
            })
            .collect();
        writeln!(out, "         {:<10}{}", group.label(), values.join("  "))
            .expect("writing to String cannot fail");
    }

    for (category, skills) in player.skills_by_category(catalog) {
        if skills.is_empty() {
            continue;
        }
        let names: Vec<String> = skills
            .iter()
            .map(|skill| {
                let name = fit_column(&catalog.name_of(&skill.id), SKILL_COL_WIDTH);
                match skill.level {
                    Some(level) => format!("{name} L{level}"),
                    None => name,
                }
            })
            .collect();
        writeln!(out, "         {:<10}{}", category.label(), names.join(", "))
            .expect("writing to String cannot fail");
    }
}

fn write_game_modes(out: &mut String, modes: &[Slot<GameMode>]) {
    writeln!(out, " ::: Game Modes :::").expect("writing to String cannot fail");
    for (index, slot) in modes.iter().enumerate() {
        let Some(mode) = slot.record() else {
            writeln!(out, "  Game Mode #{}: unreadable", index + 1)
                .expect("writing to String cannot fail");
            continue;
        };
        writeln!(out, "  {}", mode.title(index)).expect("writing to String cannot fail");
        for (section, fields) in mode.grouped() {
            let pairs: Vec<String> = fields
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            writeln!(out, "    {:<10}{}", section.label(), pairs.join("  "))
                .expect("writing to String cannot fail");
        }
    }
}

fn optional_int(value: Option<i64>) -> JsonValue {
    value.map_or(JsonValue::Null, JsonValue::from)
}

fn optional_str(value: Option<&str>) -> JsonValue {
    value.map_or(JsonValue::Null, |s| JsonValue::String(s.to_string()))
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out: String = value.chars().take(width - 3).collect();
    out.push_str("...");
    out
}
