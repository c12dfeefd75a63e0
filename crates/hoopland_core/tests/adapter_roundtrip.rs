use std::fs;
use std::path::PathBuf;

use hoopland_core::core_api::{CoreErrorCode, LeagueKind, SaveShape};
use hoopland_core::model::Team;
use hoopland_core::save::{
    PROVENANCE_KEYS, denormalize, league_summaries, normalize, switch_league,
};
use serde_json::{Value, json};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn load_fixture(name: &str) -> Value {
    let path = workspace_root().join("tests/fixtures").join(name);
    let text =
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {}", path, e));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", path, e))
}

fn assert_no_provenance_keys(value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                assert!(
                    !PROVENANCE_KEYS.contains(&key.as_str()),
                    "provenance key {key} leaked into output"
                );
                assert_no_provenance_keys(child);
            }
        }
        Value::Array(items) => items.iter().for_each(assert_no_provenance_keys),
        _ => {}
    }
}

#[test]
fn desktop_save_round_trips_unchanged() {
    let raw = load_fixture("desktop_save.json");
    let doc = normalize(raw.clone()).expect("desktop save should normalize");

    assert_eq!(doc.shape(), SaveShape::Desktop);
    assert_eq!(doc.current_league_index(), 0);
    assert!(doc.all_leagues().is_none());
    assert_eq!(doc.original_data(), &raw);
    assert_eq!(denormalize(&doc), raw);
}

#[test]
fn single_league_mobile_save_round_trips_unchanged() {
    let league = json!({
        "leagueName": "Only",
        "leagueType": 0,
        "teams": [{"id": 1, "name": "Solo", "roster": [null, {"id": 4}]}],
        "player": {"id": 9, "fn": "Me"}
    });
    let raw = json!({"seasonLeagues": [league]});

    let doc = normalize(raw.clone()).expect("mobile save should normalize");
    assert!(doc.is_mobile());
    assert_eq!(doc.all_leagues().map(<[Value]>::len), Some(1));
    assert_eq!(denormalize(&doc), raw);
}

#[test]
fn fixture_mobile_save_round_trips_unchanged() {
    let raw = load_fixture("mobile_save.json");
    let doc = normalize(raw.clone()).expect("mobile save should normalize");
    assert_eq!(denormalize(&doc), raw);
}

#[test]
fn mobile_edit_stays_in_current_league() {
    let raw = load_fixture("mobile_save.json");
    let doc = normalize(raw.clone()).expect("mobile save should normalize");

    let mut bulls = doc
        .league()
        .find_team(1)
        .expect("first league has team 1");
    bulls.name = Some("Bears".to_string());
    let league = doc.league().with_team(&bulls).expect("team 1 exists");
    let edited = doc.with_league(league);

    let out = denormalize(&edited);
    assert_eq!(out["seasonLeagues"][0]["teams"][0]["name"], json!("Bears"));
    assert_eq!(out["seasonLeagues"][0]["player"], raw["seasonLeagues"][0]["player"]);
    assert_eq!(out["seasonLeagues"][1], raw["seasonLeagues"][1]);
    assert_eq!(out["seasonLeagues"][2], raw["seasonLeagues"][2]);
    assert_eq!(out["version"], raw["version"]);
    assert_eq!(out["settings"], raw["settings"]);
    assert_no_provenance_keys(&out);

    assert_eq!(doc.original_data(), &raw);
    assert_eq!(edited.original_data(), &raw);
}

#[test]
fn desktop_edit_keeps_unknown_fields() {
    let raw = load_fixture("desktop_save.json");
    let doc = normalize(raw.clone()).expect("desktop save should normalize");

    let mut lakers = Team::from_value(&raw["teams"][1]).expect("lakers should parse");
    lakers.city = Some("LA".to_string());
    let edited = doc.with_league(doc.league().with_team(&lakers).expect("team 2 exists"));

    let out = denormalize(&edited);
    assert_eq!(out["teams"][1]["city"], json!("LA"));
    assert_eq!(out["teams"][1]["arenaName"], json!("Sunset Court"));
    assert_eq!(out["teams"][0], raw["teams"][0]);
    assert_eq!(out["unknownBlob"], raw["unknownBlob"]);
    assert_no_provenance_keys(&out);
}

#[test]
fn switch_league_mirrors_target_entry() {
    let raw = load_fixture("mobile_save.json");
    let doc = switch_league(&raw, 1).expect("league 1 exists");

    assert_eq!(doc.current_league_index(), 1);
    assert_eq!(
        &Value::Object(doc.league().fields().clone()),
        &raw["seasonLeagues"][1]
    );
    assert_eq!(doc.league().name(), Some("College League"));

    let again = switch_league(&raw, 1).expect("league 1 exists");
    assert_eq!(doc, again);

    let first = switch_league(&raw, 0).expect("league 0 exists");
    let normalized = normalize(raw.clone()).expect("mobile save should normalize");
    assert_eq!(first, normalized);
}

#[test]
fn switch_league_rejects_out_of_range_index() {
    let raw = load_fixture("mobile_save.json");
    let before = raw.clone();

    let err = switch_league(&raw, 5).expect_err("only three leagues exist");
    assert_eq!(err.code, CoreErrorCode::InvalidLeagueIndex);
    assert_eq!(raw, before);
}

#[test]
fn empty_league_list_fails_at_load() {
    let err = normalize(json!({"seasonLeagues": [], "version": 1}))
        .expect_err("empty league list is not a save");
    assert_eq!(err.code, CoreErrorCode::EmptyLeagueList);
}

#[test]
fn league_summaries_default_missing_fields() {
    let raw = load_fixture("mobile_save.json");
    let summaries = league_summaries(&raw).expect("mobile save lists leagues");

    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Pro League", "College League", "Unknown"]);
    assert_eq!(summaries[2].league_type, json!(0));
    assert_eq!(summaries[0].kind(), LeagueKind::Nba);
    assert_eq!(summaries[1].kind(), LeagueKind::College);
    assert_eq!(
        summaries.iter().map(|s| s.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    assert_eq!(league_summaries(&raw), Some(summaries));
    assert_eq!(league_summaries(&load_fixture("desktop_save.json")), None);
    assert_eq!(league_summaries(&json!({"seasonLeagues": {"a": 1}})), None);
}
