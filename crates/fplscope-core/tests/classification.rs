// Integration tests for cohort classification.
//
// Load the fixture snapshot through the public API, then check cohort
// membership, ordering, caps and the cross-call properties (position filter
// restriction, idempotence, threshold monotonicity) against known data.
//
// Fixture layout: current gameweek 10 (900 available minutes). Upcoming
// five-match difficulty per team: BRE 2.2, ARS 2.4, LIV 2.8, AVL 3.2,
// CHE 3.4, BOU 4.2. Element 13 has an unknown position and is skipped.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::PathBuf;

use fplscope_core::classify::{
    Classifier, CohortKind, DifferentialParams, PriceRange, TeamCohortKind, DIFFERENTIALS_CAP,
    TEAM_COHORT_CAP,
};
use fplscope_core::config::ClassifierConfig;
use fplscope_core::metrics::{has_positive_momentum, momentum_or_zero, transfer_momentum};
use fplscope_core::model::{Player, Position, PositionFilter, Team};
use fplscope_core::providers::{
    FixtureCalendar, FixtureService, GameweekContext, SeasonClock,
};
use fplscope_core::snapshot::Snapshot;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

const GW: u32 = 10;

fn load_snapshot() -> Snapshot {
    let bootstrap = PathBuf::from(format!("{}/bootstrap.json", FIXTURES));
    let fixtures = PathBuf::from(format!("{}/fixtures.json", FIXTURES));
    Snapshot::load(&bootstrap, &fixtures).expect("fixture snapshot should load")
}

/// Run `f` with the fixture snapshot and a classifier built from it.
fn with_classifier<R>(f: impl FnOnce(&Snapshot, &Classifier<'_>) -> R) -> R {
    let snapshot = load_snapshot();
    let clock = SeasonClock::fixed(GW);
    let calendar = snapshot.fixture_calendar(GW);
    let classifier = Classifier::new(&calendar, &clock, ClassifierConfig::default());
    f(&snapshot, &classifier)
}

fn ids(players: &[&Player]) -> Vec<u32> {
    players.iter().map(|p| p.id).collect()
}

fn id_set(players: &[&Player]) -> BTreeSet<u32> {
    players.iter().map(|p| p.id).collect()
}

fn team_ids(teams: &[&Team]) -> Vec<u32> {
    teams.iter().map(|t| t.id).collect()
}

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn differentials(threshold: u8) -> DifferentialParams {
    DifferentialParams::new(threshold).expect("threshold in range")
}

// ===========================================================================
// Snapshot and providers
// ===========================================================================

#[test]
fn fixture_snapshot_loads() {
    let snapshot = load_snapshot();
    assert_eq!(snapshot.players.len(), 15);
    assert!(snapshot.players.iter().all(|p| p.id != 13));
    assert_eq!(snapshot.teams.len(), 6);
    assert_eq!(snapshot.season_clock().current_gw(), GW);
}

#[test]
fn fixture_difficulty_ignores_finished_and_unscheduled() {
    let snapshot = load_snapshot();
    let calendar = snapshot.fixture_calendar(GW);
    let expected = [(1, 2.4), (2, 3.2), (3, 4.2), (4, 2.2), (5, 3.4), (6, 2.8)];
    for (team, fdr) in expected {
        assert!(
            approx_eq(calendar.fixture_difficulty(team, 5), fdr, 1e-9),
            "team {team}: expected {fdr}, got {}",
            calendar.fixture_difficulty(team, 5)
        );
    }
    assert!(approx_eq(calendar.fixture_difficulty(2, 3), 3.0, 1e-9));
    // unknown team has no fixtures
    assert_eq!(calendar.fixture_difficulty(99, 5), 3.0);
}

// ===========================================================================
// Cohort membership and ordering
// ===========================================================================

#[test]
fn every_member_satisfies_its_rule_and_order() {
    with_classifier(|snapshot, classifier| {
        let clock = SeasonClock::fixed(GW);
        let report = classifier.classify_players(&snapshot.players, GW, PositionFilter::All);
        for cohort in &report.cohorts {
            let rule = classifier.rule(cohort.kind, GW);
            assert!(cohort.players.len() <= cohort.kind.cap(), "{} over cap", cohort.kind);
            for p in &cohort.players {
                assert!(rule.matches(p), "{} admitted {}", cohort.kind, p.web_name);
                if let Some(min) = rule.min_minutes_pct {
                    assert!(clock.minutes_percentage(p, GW) > min);
                }
            }
            for pair in cohort.players.windows(2) {
                assert_ne!(
                    rule.ranking().compare(pair[0], pair[1]),
                    Ordering::Greater,
                    "{} out of order: {} before {}",
                    cohort.kind,
                    pair[0].web_name,
                    pair[1].web_name
                );
            }
        }
    });
}

#[test]
fn xg_over_and_underperformers() {
    with_classifier(|snapshot, classifier| {
        let report = classifier.classify_players(&snapshot.players, GW, PositionFilter::All);
        // player 1: 5 goals from 2.0 xG; player 2: 1 goal from 4.0 xG
        assert_eq!(ids(report.get(CohortKind::XgOverperformers)), vec![1]);
        assert_eq!(ids(report.get(CohortKind::XgUnderperformers)), vec![2]);
    });
}

#[test]
fn fixed_cohort_contents() {
    with_classifier(|snapshot, classifier| {
        let report = classifier.classify_players(&snapshot.players, GW, PositionFilter::All);
        assert_eq!(
            ids(report.get(CohortKind::TopPerformers)),
            vec![1, 11, 6, 8, 4, 10, 3, 14, 2, 5, 7, 15, 16, 9, 12]
        );
        assert_eq!(ids(report.get(CohortKind::PenaltyTakers)), vec![6, 11]);
        assert_eq!(ids(report.get(CohortKind::DefensiveStandouts)), vec![14, 5]);
        assert_eq!(ids(report.get(CohortKind::BonusMagnets)), vec![11, 6, 1, 8, 2]);
        assert_eq!(ids(report.get(CohortKind::HiddenGems)), vec![8, 10, 14, 5]);
        assert_eq!(
            ids(report.get(CohortKind::FixtureTurnarounds)),
            vec![3, 5, 1, 4, 10, 6, 2, 15]
        );
        assert_eq!(
            id_set(report.get(CohortKind::RisingStars)),
            BTreeSet::from([1, 3, 4, 5, 6, 8, 10, 11])
        );
        assert_eq!(ids(report.get(CohortKind::SellCandidates)), vec![16, 7, 2, 15]);
    });
}

#[test]
fn missing_ownership_counts_as_zero() {
    with_classifier(|snapshot, classifier| {
        let ghost = snapshot.players.iter().find(|p| p.id == 3).expect("player 3");
        assert_eq!(ghost.ownership(), 0.0);

        // passes "< threshold" ...
        let picks = classifier.filter_differentials(
            &snapshot.players,
            GW,
            &differentials(5),
            PositionFilter::All,
        );
        assert!(ids(&picks).contains(&3));

        // ... and fails "> 0"
        let gems = classifier.classify_cohort(
            &snapshot.players,
            GW,
            PositionFilter::All,
            CohortKind::HiddenGems,
        );
        assert!(!ids(&gems).contains(&3));
    });
}

#[test]
fn no_transfer_data_is_neutral_momentum() {
    let snapshot = load_snapshot();
    let ghost = snapshot.players.iter().find(|p| p.id == 3).expect("player 3");
    assert_eq!(transfer_momentum(ghost), None);
    assert_eq!(momentum_or_zero(ghost), 0.0);
    assert!(!has_positive_momentum(ghost));

    let slumper = snapshot.players.iter().find(|p| p.id == 7).expect("player 7");
    assert_eq!(transfer_momentum(slumper), Some(-14_500));

    // the positive-momentum toggle does not drop players without data
    with_classifier(|snapshot, classifier| {
        let params = differentials(10).with_positive_momentum_only(true);
        let picks =
            classifier.filter_differentials(&snapshot.players, GW, &params, PositionFilter::All);
        assert!(ids(&picks).contains(&3));
    });
}

#[test]
fn empty_position_gives_empty_cohorts() {
    with_classifier(|_, classifier| {
        let keepers: Vec<Player> = Vec::new();
        let report =
            classifier.classify_players(&keepers, GW, PositionFilter::Only(Position::Goalkeeper));
        assert!(report.is_empty());
    });
}

// ===========================================================================
// Cross-call properties
// ===========================================================================

#[test]
fn position_filter_restricts_all_results() {
    with_classifier(|snapshot, classifier| {
        let all = classifier.classify_players(&snapshot.players, GW, PositionFilter::All);
        for position in [
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Forward,
        ] {
            let only =
                classifier.classify_players(&snapshot.players, GW, PositionFilter::Only(position));
            for kind in CohortKind::ALL {
                // the fixture stays under every cap, so no `all` list is truncated
                assert!(all.get(kind).len() < kind.cap(), "{kind} hit its cap");
                let restricted: BTreeSet<u32> = all
                    .get(kind)
                    .iter()
                    .filter(|p| p.position == position)
                    .map(|p| p.id)
                    .collect();
                assert_eq!(
                    id_set(only.get(kind)),
                    restricted,
                    "{kind} for {position}"
                );
            }
        }
    });
}

#[test]
fn position_filter_runs_before_the_cap() {
    // 20 forwards outscore 5 midfielders, filling the `all` Top Performers cap
    let mut players: Vec<Player> = (1..=20)
        .map(|id| {
            let mut p = Player::new(id, 1, Position::Forward);
            p.total_points = 200 - id as i32;
            p
        })
        .collect();
    players.extend((21..=25).map(|id| {
        let mut p = Player::new(id, 2, Position::Midfielder);
        p.total_points = 50 - id as i32;
        p
    }));

    with_classifier(|_, classifier| {
        let kind = CohortKind::TopPerformers;
        let all = classifier.classify_cohort(&players, GW, PositionFilter::All, kind);
        assert_eq!(all.len(), kind.cap());
        assert!(all.iter().all(|p| p.position == Position::Forward));

        let mids = classifier.classify_cohort(
            &players,
            GW,
            PositionFilter::Only(Position::Midfielder),
            kind,
        );
        assert_eq!(ids(&mids), vec![21, 22, 23, 24, 25]);
    });
}

#[test]
fn classification_is_idempotent() {
    with_classifier(|snapshot, classifier| {
        let first = classifier.classify_players(&snapshot.players, GW, PositionFilter::All);
        let second = classifier.classify_players(&snapshot.players, GW, PositionFilter::All);
        for kind in CohortKind::ALL {
            assert_eq!(ids(first.get(kind)), ids(second.get(kind)));
        }

        let teams_a = classifier.classify_teams(&snapshot.teams);
        let teams_b = classifier.classify_teams(&snapshot.teams);
        for kind in TeamCohortKind::ALL {
            assert_eq!(team_ids(teams_a.get(kind)), team_ids(teams_b.get(kind)));
        }
    });
}

#[test]
fn raising_threshold_never_removes_a_differential() {
    with_classifier(|snapshot, classifier| {
        let variants: [fn(DifferentialParams) -> DifferentialParams; 4] = [
            |p| p,
            |p| p.with_price_range(PriceRange::Budget),
            |p| p.with_good_fixtures_only(true),
            |p| p.with_positive_momentum_only(true),
        ];
        for tune in variants {
            let mut previous = BTreeSet::new();
            for threshold in 1..=10 {
                let params = tune(differentials(threshold));
                let picks = classifier.filter_differentials(
                    &snapshot.players,
                    GW,
                    &params,
                    PositionFilter::All,
                );
                assert!(picks.len() <= DIFFERENTIALS_CAP);
                let current = id_set(&picks);
                assert!(
                    previous.is_subset(&current),
                    "threshold {threshold} dropped {:?}",
                    previous.difference(&current).collect::<Vec<_>>()
                );
                previous = current;
            }
        }
    });
}

#[test]
fn differentials_contents() {
    with_classifier(|snapshot, classifier| {
        let run = |params: DifferentialParams| {
            ids(&classifier.filter_differentials(
                &snapshot.players,
                GW,
                &params,
                PositionFilter::All,
            ))
        };
        assert_eq!(run(differentials(5)), vec![8, 3, 5]);
        assert_eq!(run(differentials(10)), vec![8, 10, 3, 14, 5]);
        assert_eq!(
            run(differentials(10).with_good_fixtures_only(true)),
            vec![10, 3, 5]
        );
        assert_eq!(
            run(differentials(10).with_price_range(PriceRange::Budget)),
            vec![8, 3, 14, 5]
        );
    });
}

// ===========================================================================
// Team cohorts
// ===========================================================================

#[test]
fn team_cohorts_from_fixtures() {
    with_classifier(|snapshot, classifier| {
        let report = classifier.classify_teams(&snapshot.teams);
        assert_eq!(team_ids(&report.best_fixtures), vec![4, 1, 6, 2, 5, 3]);
        let mut worst = team_ids(&report.worst_fixtures);
        worst.reverse();
        assert_eq!(worst, team_ids(&report.best_fixtures));
        assert_eq!(team_ids(&report.best_attack), vec![6, 1, 5, 2, 4, 3]);
        assert_eq!(team_ids(&report.best_defence), vec![1, 6, 5, 2, 4, 3]);
    });
}

#[test]
fn team_ties_keep_input_order() {
    let snapshot = load_snapshot();
    // no fixtures: every team sits at the neutral rating
    let calendar = FixtureCalendar::new(Vec::new(), GW);
    let clock = SeasonClock::fixed(GW);
    let classifier = Classifier::new(&calendar, &clock, ClassifierConfig::default());

    let mut teams = snapshot.teams.clone();
    teams.reverse();
    let report = classifier.classify_teams(&teams);
    let input: Vec<u32> = teams.iter().map(|t| t.id).collect();
    assert_eq!(team_ids(&report.best_fixtures), input);
    assert_eq!(team_ids(&report.worst_fixtures), input);
    assert!(report.best_fixtures.len() <= TEAM_COHORT_CAP);
}
