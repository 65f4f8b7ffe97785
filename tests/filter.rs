use proptest::prelude::*;

use teams_terminal::browser::filter_teams;
use teams_terminal::state::{TeamId, TeamRecord};

fn team(id: u32, name: &str) -> TeamRecord {
    TeamRecord {
        id: TeamId(id),
        name: name.to_string(),
        logo_url: format!("https://media.api-sports.io/football/teams/{id}.png"),
    }
}

fn sample() -> Vec<TeamRecord> {
    vec![team(42, "Arsenal"), team(49, "Chelsea"), team(541, "Real Madrid")]
}

fn names(teams: &[&TeamRecord]) -> Vec<String> {
    teams.iter().map(|t| t.name.clone()).collect()
}

#[test]
fn single_letter_matches_any_case() {
    let teams = sample();
    assert_eq!(
        names(&filter_teams(&teams, "a")),
        ["Arsenal", "Chelsea", "Real Madrid"]
    );
}

#[test]
fn prefix_query_picks_one_team() {
    let teams = sample();
    assert_eq!(names(&filter_teams(&teams, "che")), ["Chelsea"]);
    assert_eq!(names(&filter_teams(&teams, "CHE")), ["Chelsea"]);
}

#[test]
fn unmatched_query_is_empty() {
    let teams = sample();
    assert!(filter_teams(&teams, "zz").is_empty());
}

#[test]
fn empty_query_is_identity() {
    let teams = sample();
    let all: Vec<TeamRecord> = filter_teams(&teams, "").into_iter().cloned().collect();
    assert_eq!(all, teams);
}

#[test]
fn query_matches_inside_words() {
    let teams = sample();
    assert_eq!(names(&filter_teams(&teams, "l mad")), ["Real Madrid"]);
}

#[test]
fn non_ascii_names_fold_case() {
    let teams = vec![team(1, "Atlético Madrid"), team(2, "Bayern München")];
    assert_eq!(names(&filter_teams(&teams, "MÜNCHEN")), ["Bayern München"]);
    assert_eq!(names(&filter_teams(&teams, "tlético")), ["Atlético Madrid"]);
}

fn arb_teams() -> impl Strategy<Value = Vec<TeamRecord>> {
    prop::collection::vec("[a-zA-Z ]{0,12}", 0..20).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| team(i as u32, &name))
            .collect()
    })
}

proptest! {
    #[test]
    fn result_is_exactly_the_matching_subset(teams in arb_teams(), query in "[a-zA-Z]{0,3}") {
        let filtered = filter_teams(&teams, &query);
        let expected: Vec<&TeamRecord> = teams
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&query.to_lowercase()))
            .collect();
        prop_assert_eq!(filtered, expected);
    }

    #[test]
    fn filter_preserves_order(teams in arb_teams(), query in "[a-zA-Z]{0,2}") {
        let ids: Vec<u32> = filter_teams(&teams, &query).iter().map(|t| t.id.0).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ids, sorted);
    }

    #[test]
    fn filter_is_idempotent(teams in arb_teams(), query in "[a-zA-Z]{0,3}") {
        let once: Vec<TeamRecord> = filter_teams(&teams, &query).into_iter().cloned().collect();
        let twice: Vec<TeamRecord> = filter_teams(&once, &query).into_iter().cloned().collect();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn empty_collection_stays_empty(query in ".{0,8}") {
        prop_assert!(filter_teams(&[], &query).is_empty());
    }
}
