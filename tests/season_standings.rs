//! Season ingestion and championship tables from result files

use pitwall_standings::scoring::PointsSchedule;
use pitwall_standings::standings::TieBreakPosition;
use pitwall_standings::types::{CarClassId, CustId, Points, SessionId, SplitNum, SubsessionId};
use pitwall_standings::{ChampionshipConfig, RaceResult, Season, StandingsError, load_results};

const GTP: CarClassId = CarClassId(84);
const GTO: CarClassId = CarClassId(83);

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn config() -> ChampionshipConfig {
    ChampionshipConfig::load(fixture("championship.yaml")).expect("championship config")
}

fn results() -> Vec<RaceResult> {
    load_results(fixture("season_results.json")).expect("season results")
}

fn season() -> Season {
    let mut season = Season::new(&config());
    season.load_race_data(&results());
    season
}

#[test]
fn config_fixture_loads() {
    let config = config();
    assert_eq!(config.count_best_of, 2);
    assert_eq!(config.points_per_split.award(SplitNum(1), 0), Points::Awarded(14));
    assert_eq!(config.points_per_split.award(SplitNum(0), 4), Points::Awarded(0));
    assert_eq!(config.points_per_split.award(SplitNum(2), 0), Points::NotCounted);
    assert!(config.validate().is_ok());
}

#[test]
fn ingests_events_in_chronological_order() {
    let season = season();
    let sessions: Vec<SessionId> = season.events().iter().map(|e| e.session_id).collect();

    // 1002 ran at an excluded track
    assert_eq!(sessions, vec![SessionId(1001), SessionId(1003), SessionId(1004)]);

    // 5012 has no RACE block; the unscheduled third split keeps its declared number
    let sebring = season.event(SessionId(1003)).unwrap();
    let splits: Vec<(SplitNum, SubsessionId)> =
        sebring.splits().map(|s| (s.split_num, s.subsession_id)).collect();
    assert_eq!(splits, vec![(SplitNum(0), SubsessionId(5011)), (SplitNum(2), SubsessionId(5013))]);
}

#[test]
fn gtp_table_applies_drop_rule_and_classification() {
    let standings = season().standings(GTP);
    assert_eq!(standings.car_class_name, "GTP");

    let order: Vec<(i64, usize, u32, u32)> = standings
        .table
        .iter()
        .map(|r| (r.cust_id.0, r.rank, r.dropped_round_points, r.all_rounds_points))
        .collect();
    assert_eq!(
        order,
        vec![
            (1, 1, 50, 72),
            (2, 2, 47, 47),
            (4, 3, 42, 56),
            (3, 4, 18, 18),
            (5, 5, 12, 12),
            (6, 6, 0, 0),
        ]
    );

    let leader = standings.row(CustId(1)).unwrap();
    assert_eq!(leader.driver_name, "Alice One");
    assert_eq!(leader.i_rating, 3400);
    assert_eq!(leader.races_counted, 2);
    assert_eq!(leader.total_laps, 30);
    assert_eq!(
        leader.tie_break_positions,
        vec![
            TieBreakPosition { subsession_id: SubsessionId(5001), position: 0 },
            TieBreakPosition { subsession_id: SubsessionId(5021), position: 0 },
        ]
    );

    let switcher = standings.row(CustId(4)).unwrap();
    assert_eq!(switcher.car_names, vec!["Nissan GTP ZX-T", "Porsche 962C"]);

    // Only result was in the unscheduled split
    let unscored = standings.row(CustId(6)).unwrap();
    assert_eq!(unscored.races_counted, 0);
}

#[test]
fn gto_table_is_independent() {
    let standings = season().standings(GTO);
    let order: Vec<(i64, u32)> =
        standings.table.iter().map(|r| (r.cust_id.0, r.dropped_round_points)).collect();
    assert_eq!(order, vec![(10, 50), (11, 22)]);
}

#[test]
fn wider_drop_window_counts_more_rounds() {
    let season = season();
    let all = season.standings_best_of(GTP, 10);
    assert_eq!(all.row(CustId(1)).unwrap().dropped_round_points, 72);
    assert_eq!(all.row(CustId(4)).unwrap().dropped_round_points, 56);
    assert_eq!(all.table[0].cust_id, CustId(1));
}

#[test]
fn reingest_yields_identical_tables() {
    let results = results();
    let mut season = Season::new(&config());
    season.load_race_data(&results);
    let gtp = season.standings(GTP);
    let gto = season.standings(GTO);

    season.load_race_data(&results);
    assert_eq!(season.standings(GTP), gtp);
    assert_eq!(season.standings(GTO), gto);
}

#[test]
fn unknown_class_and_driver_degrade_to_empty() {
    let season = season();
    let standings = season.standings(CarClassId(4029));
    assert!(standings.is_empty());
    assert_eq!(standings.car_class_name, "");
    assert!(season.driver(CustId(424242)).is_none());
}

#[test]
fn default_schedule_matches_three_split_series() {
    let schedule = PointsSchedule::default();
    assert_eq!(schedule.award(SplitNum(0), 0), Points::Awarded(25));
    assert_eq!(schedule.award(SplitNum(1), 0), Points::Awarded(14));
    assert_eq!(schedule.award(SplitNum(2), 0), Points::Awarded(9));
    assert_eq!(schedule.award(SplitNum(3), 0), Points::NotCounted);
}

#[test]
fn malformed_payloads_are_rejected() {
    let err = pitwall_standings::parse_results("[{\"session_id\": \"soon\"}]").unwrap_err();
    assert!(matches!(err, StandingsError::Parse { .. }));

    let err = load_results(fixture("missing.json")).unwrap_err();
    assert!(matches!(err, StandingsError::File { .. }));
}
