use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use hoopland_core::attribute::{AttributeCode, AttributeValue, parse_attribute_pair};
use hoopland_core::core_api::{CoreError, CoreErrorCode, Engine, Session};
use hoopland_core::model::{PlayerPatch, TeamPatch, json_number};
use hoopland_core::position::{Position, PositionCode};
use hoopland_core::query::PlayerFilters;
use hoopland_core::remote;
use hoopland_core::skills::{SkillCatalog, SkillCategory};
use hoopland_render::{
    JsonStyle, TextRenderOptions, render_json_overview, render_league_list_text,
    render_leagues_json, render_overview_text, render_players_json, render_players_text,
    render_prospects_json, render_prospects_text, render_teams_json, render_teams_text,
};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.json", conflicts_with = "url")]
    path: Option<PathBuf>,
    /// Load the save from an http:// or https:// URL instead of a file.
    #[arg(long, value_name = "URL")]
    url: Option<String>,
    /// Work on the league at this index of a mobile save.
    #[arg(long, value_name = "N")]
    league: Option<usize>,
    #[arg(long)]
    leagues: bool,
    #[arg(long)]
    players: bool,
    #[arg(long)]
    teams: bool,
    #[arg(long)]
    prospects: bool,
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,
    #[arg(long, value_name = "PG|SG|SF|PF|C|G|F|FC|GF|N")]
    position: Option<String>,
    #[arg(long = "min-rating", value_name = "N")]
    min_rating: Option<f64>,
    #[arg(long = "max-rating", value_name = "N")]
    max_rating: Option<f64>,
    #[arg(
        long = "skill-category",
        value_name = "finishing|shooting|creating|defense",
        value_parser = parse_skill_category
    )]
    skill_category: Option<SkillCategory>,
    #[arg(long = "team-id", value_name = "ID", allow_hyphen_values = true)]
    team_id: Option<i64>,
    /// TOML file replacing or patching the built-in skill table.
    #[arg(long = "skill-table", value_name = "FILE")]
    skill_table: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    verbose: bool,
    /// Player to edit with the --set-* player flags.
    #[arg(long = "player", value_name = "ID")]
    player_id: Option<i64>,
    #[arg(long = "set-first-name")]
    set_first_name: Option<String>,
    #[arg(long = "set-last-name")]
    set_last_name: Option<String>,
    #[arg(long = "set-position", value_parser = parse_position)]
    set_position: Option<PositionCode>,
    #[arg(long = "set-number")]
    set_number: Option<i64>,
    #[arg(long = "set-rating")]
    set_rating: Option<f64>,
    #[arg(long = "set-team-id", allow_hyphen_values = true)]
    set_team_id: Option<i64>,
    /// Attribute edit as CODE=CUR/MAX (or CODE=CUR to keep the max).
    #[arg(long = "set-attr", value_name = "CODE=CUR/MAX")]
    set_attr: Vec<String>,
    /// Replaces one category's skills, e.g. finishing=DUN,HIG.
    #[arg(long = "set-skills", value_name = "CATEGORY=ID,ID")]
    set_skills: Vec<String>,
    /// Stat edit as KEY=VALUE; numeric stats stay numeric.
    #[arg(long = "set-stat", value_name = "KEY=VALUE")]
    set_stat: Vec<String>,
    /// Team to edit with the --set-* team flags.
    #[arg(long = "team", value_name = "ID")]
    team: Option<i64>,
    #[arg(long = "set-team-name")]
    set_team_name: Option<String>,
    #[arg(long = "set-city")]
    set_city: Option<String>,
    #[arg(long = "set-short-name")]
    set_short_name: Option<String>,
    #[arg(long = "set-arena-name")]
    set_arena_name: Option<String>,
    /// Logo image URL; an empty value removes the logo.
    #[arg(long = "set-logo-url", value_name = "URL")]
    set_logo_url: Option<String>,
    #[arg(long = "set-logo-size", value_name = "N")]
    set_logo_size: Option<f64>,
    /// Game mode (by index) to edit with --set-mode-field.
    #[arg(long = "game-mode", value_name = "N")]
    game_mode: Option<usize>,
    /// Game mode field as KEY=JSON; text that is not JSON is stored as a string.
    #[arg(long = "set-mode-field", value_name = "KEY=JSON")]
    set_mode_field: Vec<String>,
    /// League-level field as KEY=JSON; text that is not JSON is stored as a string.
    #[arg(long = "set-league-field", value_name = "KEY=JSON")]
    set_league_field: Vec<String>,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy)]
struct ListSelection {
    leagues: bool,
    teams: bool,
    players: bool,
    prospects: bool,
}

impl ListSelection {
    fn from_cli(cli: &Cli, filters: &PlayerFilters) -> Self {
        let player_query = cli.search.is_some() && !cli.teams;
        Self {
            leagues: cli.leagues,
            teams: cli.teams,
            players: cli.players || player_query || !filters.is_empty(),
            prospects: cli.prospects,
        }
    }

    fn is_list_mode(&self) -> bool {
        self.leagues || self.teams || self.players || self.prospects
    }
}

fn parse_skill_category(value: &str) -> Result<SkillCategory, String> {
    value.parse()
}

fn parse_position(value: &str) -> Result<PositionCode, String> {
    let trimmed = value.trim();
    if let Ok(raw) = trimmed.parse::<i64>() {
        return Ok(PositionCode::Numeric(raw));
    }
    Position::from_abbr(trimmed)
        .map(PositionCode::from)
        .ok_or_else(|| {
            let known: Vec<String> = Position::ALL.iter().map(Position::abbr).collect();
            format!(
                "invalid position '{value}', expected a number or one of: {}",
                known.join(", ")
            )
        })
}

fn parse_key_value<'a>(text: &'a str, flag: &str) -> Result<(&'a str, &'a str), String> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(format!("invalid {flag} '{text}', expected KEY=VALUE")),
    }
}

fn json_or_text(text: &str) -> JsonValue {
    serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()))
}

fn parse_field_edits(texts: &[String], flag: &str) -> Vec<(String, JsonValue)> {
    texts
        .iter()
        .map(|text| parse_key_value(text, flag))
        .map(|pair| pair.map(|(key, value)| (key.to_string(), json_or_text(value))))
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(2);
        })
}

fn parse_attr_edit(
    text: &str,
    current: &dyn Fn(AttributeCode) -> AttributeValue,
) -> Result<(AttributeCode, AttributeValue), String> {
    let (code, pair) = text
        .split_once('=')
        .ok_or_else(|| format!("invalid --set-attr '{text}', expected CODE=CUR/MAX"))?;
    let code = AttributeCode::from_code(code)
        .ok_or_else(|| format!("unknown attribute code '{}'", code.trim()))?;
    let value = parse_attribute_pair(pair, current(code))
        .ok_or_else(|| format!("invalid attribute value '{}', expected CUR/MAX", pair.trim()))?;
    Ok((code, value))
}

fn parse_skill_edit(text: &str) -> Result<(SkillCategory, Vec<String>), String> {
    let (category, ids) = text
        .split_once('=')
        .ok_or_else(|| format!("invalid --set-skills '{text}', expected CATEGORY=ID,ID"))?;
    let category = category.parse::<SkillCategory>()?;
    let ids = ids
        .split(',')
        .map(|id| id.trim().to_ascii_uppercase())
        .filter(|id| !id.is_empty())
        .collect();
    Ok((category, ids))
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hoopland_se=warn,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error installing log subscriber: {e}");
    }
}

fn fetch_remote(url: &str) -> Result<String, CoreError> {
    let url = remote::validate_url(url)?;
    let client = reqwest::blocking::Client::builder()
        .timeout(remote::FETCH_TIMEOUT)
        .build()
        .map_err(|e| {
            CoreError::new(
                CoreErrorCode::Network,
                format!("failed to build HTTP client: {e}"),
            )
        })?;

    debug!(url = %url, "fetching remote save");
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, remote::ACCEPT_HEADER)
        .send()
        .map_err(fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(CoreError::new(
            CoreErrorCode::Network,
            format!("failed to load: {status}"),
        ));
    }
    response.text().map_err(fetch_error)
}

fn fetch_error(e: reqwest::Error) -> CoreError {
    if e.is_timeout() {
        CoreError::new(
            CoreErrorCode::Timeout,
            "request timed out, please try again",
        )
    } else {
        CoreError::new(CoreErrorCode::Network, format!("failed to load from URL: {e}"))
    }
}

fn load_session(cli: &Cli, engine: &Engine) -> Result<(String, Session), CoreError> {
    match (&cli.path, &cli.url) {
        (Some(path), None) => {
            let bytes = fs::read(path).map_err(|e| {
                CoreError::new(
                    CoreErrorCode::Io,
                    format!("failed to read {}: {e}", path.display()),
                )
            })?;
            Ok((path.display().to_string(), engine.open_bytes(bytes)?))
        }
        (None, Some(url)) => {
            let body = fetch_remote(url)?;
            let raw = remote::parse_body(&body)?;
            Ok((remote::DEFAULT_REMOTE_NAME.to_string(), engine.open_value(raw)?))
        }
        _ => Err(CoreError::new(
            CoreErrorCode::UnsupportedOperation,
            "expected exactly one of SAVE.json or --url",
        )),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let filters = PlayerFilters {
        position: cli.position.clone(),
        min_rating: cli.min_rating,
        max_rating: cli.max_rating,
        skill_category: cli.skill_category,
        team_id: cli.team_id,
    };
    let selection = ListSelection::from_cli(&cli, &filters);

    let player_patch_requested = cli.set_first_name.is_some()
        || cli.set_last_name.is_some()
        || cli.set_position.is_some()
        || cli.set_number.is_some()
        || cli.set_rating.is_some()
        || cli.set_team_id.is_some()
        || !cli.set_attr.is_empty()
        || !cli.set_skills.is_empty()
        || !cli.set_stat.is_empty();
    let logo_size = cli.set_logo_size.map(|value| {
        json_number(value).unwrap_or_else(|| {
            eprintln!("invalid --set-logo-size value {value}");
            process::exit(2);
        })
    });
    let team_patch = TeamPatch {
        name: cli.set_team_name.clone(),
        city: cli.set_city.clone(),
        short_name: cli.set_short_name.clone(),
        arena_name: cli.set_arena_name.clone(),
        logo_url: cli.set_logo_url.clone(),
        logo_size,
    };
    let mode_edits = parse_field_edits(&cli.set_mode_field, "--set-mode-field");
    let league_edits = parse_field_edits(&cli.set_league_field, "--set-league-field");
    let has_edits = player_patch_requested
        || !team_patch.is_empty()
        || !mode_edits.is_empty()
        || !league_edits.is_empty();

    if cli.path.is_none() && cli.url.is_none() {
        eprintln!("a SAVE.json path or --url <URL> is required");
        process::exit(2);
    }
    if player_patch_requested && cli.player_id.is_none() {
        eprintln!("player --set-* flags require --player <ID>");
        process::exit(2);
    }
    if !team_patch.is_empty() && cli.team.is_none() {
        eprintln!("team --set-* flags require --team <ID>");
        process::exit(2);
    }
    if !mode_edits.is_empty() && cli.game_mode.is_none() {
        eprintln!("--set-mode-field requires --game-mode <N>");
        process::exit(2);
    }
    if has_edits && cli.output.is_none() {
        eprintln!("--set-* flags require --output <PATH>");
        process::exit(2);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one --set-* flag");
        process::exit(2);
    }
    let skill_edits: Vec<(SkillCategory, Vec<String>)> = cli
        .set_skills
        .iter()
        .map(|text| parse_skill_edit(text))
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(2);
        });
    let stat_edits: Vec<(&str, &str)> = cli
        .set_stat
        .iter()
        .map(|text| parse_key_value(text, "--set-stat"))
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(2);
        });
    let rating = cli.set_rating.map(|value| {
        json_number(value).unwrap_or_else(|| {
            eprintln!("invalid --set-rating value {value}");
            process::exit(2);
        })
    });

    let catalog = match &cli.skill_table {
        Some(path) => SkillCatalog::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading skill table {}: {e}", path.display());
            process::exit(1);
        }),
        None => SkillCatalog::builtin(),
    };
    let engine = Engine::with_skill_catalog(catalog);

    let (source, mut session) = load_session(&cli, &engine).unwrap_or_else(|e| {
        match e.code {
            CoreErrorCode::Timeout => eprintln!("Error loading save: request timed out"),
            _ => eprintln!("Error loading save"),
        }
        eprintln!("  {e}");
        process::exit(1);
    });
    debug!(source = %source, "loaded save");

    if let Some(index) = cli.league {
        session.switch_league(index).unwrap_or_else(|e| {
            eprintln!("Error switching to league {index}: {e}");
            process::exit(1);
        });
    }

    if let Some(player_id) = cli.player_id.filter(|_| player_patch_requested) {
        let player = session.find_player(player_id).unwrap_or_else(|| {
            eprintln!("Error applying player edit: no player with id {player_id}");
            process::exit(1);
        });

        let attributes = cli
            .set_attr
            .iter()
            .map(|text| parse_attr_edit(text, &|code| player.attribute(code)))
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_else(|e| {
                eprintln!("{e}");
                process::exit(2);
            });
        let patch = PlayerPatch {
            first_name: cli.set_first_name.clone(),
            last_name: cli.set_last_name.clone(),
            team_id: cli.set_team_id,
            position: cli.set_position.clone(),
            number: cli.set_number,
            rating: rating.clone(),
            attributes,
            stats: stat_edits
                .iter()
                .map(|(key, text)| (key.to_string(), player.stat_input(key, text)))
                .collect(),
        };

        let mut updated = player.patched(&patch);
        for (category, ids) in &skill_edits {
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            updated = updated
                .with_category_skills(*category, &ids, session.skill_catalog())
                .unwrap_or_else(|e| {
                    eprintln!("Error applying skill edit: {e}");
                    process::exit(1);
                });
        }
        session.update_player(&updated).unwrap_or_else(|e| {
            eprintln!("Error applying player edit: {e}");
            process::exit(1);
        });
    }

    if let Some(team_id) = cli.team.filter(|_| !team_patch.is_empty()) {
        session.edit_team(team_id, &team_patch).unwrap_or_else(|e| {
            eprintln!("Error applying team edit: {e}");
            process::exit(1);
        });
    }

    if let Some(index) = cli.game_mode.filter(|_| !mode_edits.is_empty()) {
        let mode = session
            .game_modes()
            .get(index)
            .map(|slot| slot.record().cloned())
            .unwrap_or_else(|| {
                eprintln!("Error applying game mode edit: no game mode at index {index}");
                process::exit(1);
            })
            .unwrap_or_else(|| {
                eprintln!("Error applying game mode edit: game mode {index} is not an object");
                process::exit(1);
            });
        let mode = mode_edits
            .iter()
            .fold(mode, |mode, (key, value)| mode.with_field(key.clone(), value.clone()));
        session.update_game_mode(index, &mode).unwrap_or_else(|e| {
            eprintln!("Error applying game mode edit: {e}");
            process::exit(1);
        });
    }

    for (key, value) in &league_edits {
        session.set_league_field(key, value.clone()).unwrap_or_else(|e| {
            eprintln!("Error setting league field {key}: {e}");
            process::exit(1);
        });
    }

    if let Some(out_path) = cli.output.as_ref().filter(|_| has_edits) {
        let edited_bytes = session.to_bytes_modified().unwrap_or_else(|e| {
            eprintln!("Error creating modified save: {e}");
            process::exit(1);
        });
        fs::write(out_path, edited_bytes).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
    }

    let query = cli.search.as_deref().unwrap_or("");
    let options = TextRenderOptions {
        verbose: cli.verbose,
    };

    if cli.json {
        let json = if selection.is_list_mode() {
            JsonValue::Object(selected_json(&session, &selection, query, &filters))
        } else {
            render_json_overview(&session, JsonStyle::CanonicalV1)
        };
        let rendered = serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
        return;
    }

    if !selection.is_list_mode() {
        print!("{}", render_overview_text(&session, options));
        return;
    }

    let mut sections = Vec::new();
    if selection.leagues {
        sections.push(match session.leagues() {
            Some(leagues) => render_league_list_text(&leagues, session.current_league_index()),
            None => " ::: Leagues :::\n  single-league save\n".to_string(),
        });
    }
    if selection.teams {
        sections.push(render_teams_text(&session.search_teams(query)));
    }
    if selection.players {
        let players = session.search_players(query, &filters);
        sections.push(render_players_text(&players, session.skill_catalog(), options));
    }
    if selection.prospects {
        sections.push(render_prospects_text(&session.draft_prospects()));
    }
    print!("{}", sections.join("\n"));
}

fn selected_json(
    session: &Session,
    selection: &ListSelection,
    query: &str,
    filters: &PlayerFilters,
) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();

    if selection.leagues {
        out.insert(
            "leagues".to_string(),
            match session.leagues() {
                Some(leagues) => render_leagues_json(&leagues),
                None => JsonValue::Null,
            },
        );
    }
    if selection.teams {
        out.insert(
            "teams".to_string(),
            render_teams_json(&session.search_teams(query)),
        );
    }
    if selection.players {
        out.insert(
            "players".to_string(),
            render_players_json(
                &session.search_players(query, filters),
                session.skill_catalog(),
            ),
        );
    }
    if selection.prospects {
        out.insert(
            "prospects".to_string(),
            render_prospects_json(&session.draft_prospects()),
        );
    }

    out
}
