use hoopland_core::model::{Player, Team};
use hoopland_core::query::{PlayerFilters, search_players, search_teams};
use hoopland_core::skills::SkillCatalog;
use serde_json::json;

fn parse_player(value: serde_json::Value) -> Player {
    Player::from_value(&value).expect("test player should parse")
}

fn jon_and_amy() -> Vec<Player> {
    vec![
        parse_player(json!({"id": 1, "fn": "Jon", "ln": "Doe", "pos": 0, "num": 23, "rating": 80})),
        parse_player(json!({"id": 2, "fn": "Amy", "ln": "Smith", "pos": 4, "num": 5, "rating": 60})),
    ]
}

fn ids(found: &[&Player]) -> Vec<i64> {
    found.iter().map(|p| p.id).collect()
}

#[test]
fn literal_search_scenario() {
    let players = jon_and_amy();
    let refs: Vec<Option<&Player>> = players.iter().map(Some).collect();
    let catalog = SkillCatalog::builtin();

    let found = search_players(&refs, "doe", &PlayerFilters::default(), &catalog);
    assert_eq!(ids(&found), vec![1]);
    assert_eq!(found[0], &players[0]);

    let min_rating = PlayerFilters {
        min_rating: Some(70.0),
        ..PlayerFilters::default()
    };
    assert_eq!(ids(&search_players(&refs, "", &min_rating, &catalog)), vec![1]);

    let center = PlayerFilters {
        position: Some("C".to_string()),
        ..PlayerFilters::default()
    };
    assert_eq!(ids(&search_players(&refs, "", &center, &catalog)), vec![2]);
}

#[test]
fn null_entries_are_skipped() {
    let bare = parse_player(json!({"id": 3}));
    let refs = [None, Some(&bare)];
    let catalog = SkillCatalog::builtin();

    let found = search_players(&refs, "", &PlayerFilters::default(), &catalog);
    assert_eq!(ids(&found), vec![3]);

    let found = search_players(&refs, "3", &PlayerFilters::default(), &catalog);
    assert_eq!(ids(&found), vec![3]);

    let rated = PlayerFilters {
        max_rating: Some(0.0),
        ..PlayerFilters::default()
    };
    assert_eq!(ids(&search_players(&refs, "", &rated, &catalog)), vec![3]);
    assert!(search_players(&refs, "zzz", &PlayerFilters::default(), &catalog).is_empty());
}

#[test]
fn team_search_scenario() {
    let teams = [
        Team::from_value(&json!({"id": 1, "name": "Bulls", "city": "Chicago"}))
            .expect("bulls should parse"),
        Team::from_value(&json!({"id": 2, "name": "Lakers", "city": "LA"}))
            .expect("lakers should parse"),
    ];
    let refs: Vec<Option<&Team>> = teams.iter().map(Some).collect();

    let found = search_teams(&refs, "chi");
    assert_eq!(found, vec![&teams[0]]);
    assert_eq!(search_teams(&refs, "").len(), 2);
    assert_eq!(search_teams(&[None, Some(&teams[1])], "la").len(), 1);
}

#[test]
fn search_leaves_inputs_untouched() {
    let players = jon_and_amy();
    let before = players.clone();
    let refs: Vec<Option<&Player>> = players.iter().map(Some).collect();

    let _ = search_players(&refs, "smith", &PlayerFilters::default(), &SkillCatalog::builtin());
    assert_eq!(players, before);
}
