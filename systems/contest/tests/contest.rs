use serde::Deserialize;
use silk_road_core::{Position, RobotId, RobotKind};
use silk_road_system_contest::{
    daily_profits, random_days, run, ContestError, DayAction, GeneratorConfig,
};
use silk_road_world::RoadConfig;

fn script(rows: &[&[i64]]) -> Vec<DayAction> {
    rows.iter()
        .map(|row| DayAction::from_row(row).expect("valid day"))
        .collect()
}

#[test]
fn profits_accumulate_day_by_day() {
    let days = script(&[&[1, 0], &[2, 5, 20], &[1, 10], &[2, 12, 3]]);

    assert_eq!(daily_profits(&days), vec![0, 15, 15, 16]);
}

#[test]
fn reports_name_the_richest_robot() {
    let days = script(&[&[1, 0], &[2, 5, 20], &[1, 10], &[2, 12, 3]]);

    let reports = run(&RoadConfig::default(), &days);

    assert_eq!(reports.len(), 4);
    assert!(reports[0].leader.is_some());
    let leader = reports[3].leader.expect("robots were placed");
    assert_eq!(leader.id, RobotId::new(0));
    assert_eq!(leader.position, Position::new(5));
    assert_eq!(leader.earnings, 15);
    assert_eq!(
        reports.iter().map(|report| report.day).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn days_without_robots_report_no_leader() {
    let days = script(&[&[2, 3, 50], &[2, 8, 10]]);

    let reports = run(&RoadConfig::default(), &days);

    assert!(reports.iter().all(|report| report.leader.is_none()));
    assert!(reports.iter().all(|report| report.profit == 0));
}

#[test]
fn robot_kinds_follow_their_codes() {
    let days = script(&[&[3, 1], &[4, 2], &[2, 30, 40]]);

    let reports = run(&RoadConfig { initial_length: 5 }, &days);

    // Gains are 40 - 29 = 11 for the tender robot and 40 - 28 = 12 for the neverback robot.
    let leader = reports[2].leader.expect("robots were placed");
    assert_eq!(leader.kind, RobotKind::NeverBack);
    assert_eq!(leader.earnings, 12);
    assert_eq!(reports[2].profit, 12);
}

#[derive(Deserialize)]
struct Script {
    days: Vec<DayAction>,
}

#[test]
fn scripts_load_from_toml_rows() {
    let parsed: Script = toml::from_str("days = [[1, 0], [2, 5, 20]]").expect("valid script");

    assert_eq!(
        parsed.days,
        vec![
            DayAction::PlaceRobot {
                position: Position::START
            },
            DayAction::PlaceStore {
                position: Position::new(5),
                funds: 20
            },
        ]
    );
}

#[test]
fn unknown_codes_fail_while_parsing() {
    let error = toml::from_str::<Script>("days = [[1, 0], [9, 1]]")
        .err()
        .expect("code 9 is not a day action");

    assert!(error
        .to_string()
        .contains(&ContestError::UnknownAction { code: 9 }.to_string()));
}

#[test]
fn generated_scripts_replay_identically() {
    let config = GeneratorConfig {
        days: 30,
        ..GeneratorConfig::default()
    };
    let days = random_days(2024, &config);

    assert_eq!(days.len(), 30);
    assert_eq!(
        run(&RoadConfig::default(), &days),
        run(&RoadConfig::default(), &days)
    );
}
