//! Tests for trip evaluation, end to end through the public builder.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};

use super::*;
use crate::domain::{DataError, Direction, DriveWindow, Money, RecordKind};
use crate::planner::fixtures::{base, car, ferry, loc};
use crate::records::{CarRecord, DurationField, FerryRecord, Vehicle};
use crate::repository::LegRepository;

fn hours(h: i64) -> NaiveDateTime {
    base() + Duration::hours(h)
}

/// Origin -> PortA -> PortB -> Dest and the mirror image back.
fn scenario_cars() -> Vec<crate::domain::CarLeg> {
    vec![
        car("Origin", "PortA", 60, 1_000),
        car("PortB", "Dest", 30, 500),
        car("Dest", "PortB", 30, 500),
        car("PortA", "Origin", 60, 1_000),
    ]
}

fn scenario_ferries() -> Vec<crate::domain::FerryCrossing> {
    vec![
        ferry("PortA", "PortB", hours(10), 90, 10_000, "DFDS", Direction::Outbound),
        ferry("PortB", "PortA", hours(7 * 24 + 10), 90, 10_000, "DFDS", Direction::Return),
    ]
}

#[test]
fn scenario_single_itinerary() {
    let trip = Trip::new(
        loc("Origin"),
        loc("Dest"),
        scenario_ferries(),
        scenario_cars(),
    )
    .unwrap();

    let result = trip.evaluate().unwrap();

    assert_eq!(result.assembled, 1);
    assert_eq!(result.survived, 1);
    assert_eq!(result.itineraries.len(), 1);

    let it = &result.itineraries[0];
    let sum: Money = it.legs().iter().map(|leg| leg.cost()).sum();
    assert_eq!(it.total_cost(), sum);
    assert_eq!(it.total_cost(), Money::from_pence(23_000));
}

#[test]
fn scenario_budget_excludes_everything() {
    let trip = Trip::builder(loc("Origin"), loc("Dest"))
        .cars(scenario_cars())
        .ferries(scenario_ferries())
        .constraint(Constraint::MaxTotalCost(Money::from_pence(5_000)))
        .build()
        .unwrap();

    let result = trip.evaluate().unwrap();

    assert_eq!(result.assembled, 1);
    assert_eq!(result.survived, 0);
    assert!(result.itineraries.is_empty());
}

#[test]
fn scenario_cheaper_crossing_first() {
    let mut ferries = scenario_ferries();
    ferries.push(ferry(
        "PortA",
        "PortB",
        hours(14),
        90,
        6_000,
        "P&O",
        Direction::Outbound,
    ));

    let trip = Trip::builder(loc("Origin"), loc("Dest"))
        .cars(scenario_cars())
        .ferries(ferries)
        .criterion(RankingCriterion::ascending(RankField::TotalCost))
        .build()
        .unwrap();

    let result = trip.evaluate().unwrap();

    assert_eq!(result.itineraries.len(), 2);
    assert_eq!(result.itineraries[0].outbound_crossing().operator(), "P&O");
    assert_eq!(result.itineraries[0].total_cost(), Money::from_pence(19_000));
    assert!(result.itineraries[0].total_cost() < result.itineraries[1].total_cost());
}

#[test]
fn scenario_negative_duration_record_fails() {
    let good = CarRecord {
        from: "Origin".into(),
        to: "PortA".into(),
        distance_km: None,
        duration: DurationField::Text("1:00".into()),
        cost: Some(10.0),
        note: None,
        windows: vec![],
        bidirectional: true,
    };
    let bad = CarRecord {
        from: "PortB".into(),
        to: "Dest".into(),
        duration: DurationField::Minutes(-30),
        ..good.clone()
    };

    let result = Trip::builder(loc("Origin"), loc("Dest"))
        .car_records(vec![good, bad])
        .ferries(scenario_ferries())
        .build();

    match result {
        Err(TripError::Data(DataError::Record { kind, index, source })) => {
            assert_eq!(kind, RecordKind::Car);
            assert_eq!(index, 1);
            assert!(matches!(*source, DataError::NegativeDuration { .. }));
        }
        other => panic!("expected a record error, got {other:?}"),
    }
}

#[test]
fn records_and_domain_values_combine() {
    let ferries = vec![
        FerryRecord {
            from: "PortA".into(),
            to: "PortB".into(),
            operator: "Brittany".into(),
            departs: "2024-07-01 22:00".into(),
            arrives: "2024-07-02 07:00".into(),
            cost: 150.0,
            cabin_cost: Some(60.0),
            direction: Direction::Outbound,
            note: None,
        },
        FerryRecord {
            from: "PortB".into(),
            to: "PortA".into(),
            operator: "Brittany".into(),
            departs: "2024-07-08 22:00".into(),
            arrives: "2024-07-09 07:00".into(),
            cost: 150.0,
            cabin_cost: None,
            direction: Direction::Return,
            note: None,
        },
    ];

    let trip = Trip::builder(loc("Origin"), loc("Dest"))
        .cars(scenario_cars())
        .ferry_records(ferries)
        .vehicle(Vehicle::default())
        .build()
        .unwrap();

    let result = trip.evaluate().unwrap();

    // Plain and cabin outbound, one return
    assert_eq!(result.assembled, 2);
    assert!(!result.itineraries[0].outbound_crossing().has_cabin());
    assert!(result.itineraries[1].outbound_crossing().has_cabin());
}

#[test]
fn every_result_is_contiguous_and_directed() {
    let mut cars = scenario_cars();
    cars.push(car("Origin", "PortC", 120, 2_000));
    cars.push(car("PortC", "Origin", 120, 2_000));
    cars.push(car("PortD", "Dest", 45, 700));
    cars.push(car("Dest", "PortD", 45, 700));

    let mut ferries = scenario_ferries();
    ferries.push(ferry("PortC", "PortD", hours(9), 300, 14_000, "Brittany", Direction::Outbound));
    ferries.push(ferry("PortD", "PortC", hours(180), 300, 14_000, "Brittany", Direction::Return));

    let trip = Trip::new(loc("Origin"), loc("Dest"), ferries, cars).unwrap();
    let result = trip.evaluate().unwrap();

    assert_eq!(result.assembled, 4);
    for it in &result.itineraries {
        let legs = it.legs();
        for pair in legs.windows(2) {
            assert_eq!(pair[0].destination(), pair[1].origin());
        }
        assert_eq!(legs[0].origin(), trip.origin());
        assert_eq!(legs[5].destination(), trip.origin());
        assert_eq!(it.destination(), trip.destination());
        assert_eq!(it.outbound_crossing().direction(), Direction::Outbound);
        assert_eq!(it.return_crossing().direction(), Direction::Return);
    }
}

#[test]
fn evaluation_is_deterministic() {
    let mut ferries = scenario_ferries();
    ferries.push(ferry("PortA", "PortB", hours(14), 90, 10_000, "P&O", Direction::Outbound));
    ferries.push(ferry("PortB", "PortA", hours(7 * 24 + 14), 90, 8_000, "P&O", Direction::Return));

    let trip = Trip::new(loc("Origin"), loc("Dest"), ferries, scenario_cars()).unwrap();

    let ids = |e: &Evaluation| -> Vec<_> {
        e.itineraries
            .iter()
            .map(|it| (it.outbound_id(), it.return_id()))
            .collect()
    };

    let first = trip.evaluate().unwrap();
    let second = trip.evaluate().unwrap();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.itineraries.len(), 4);
}

#[test]
fn infeasible_itineraries_dropped_by_default() {
    // A host who only takes arrivals before 09:00: unreachable from a 10:00 sailing
    let windowed = car("PortB", "Dest", 30, 500).with_windows(vec![
        DriveWindow::new(hours(6), hours(9)).unwrap(),
    ]);
    let cars = vec![
        car("Origin", "PortA", 60, 1_000),
        windowed,
        car("Dest", "PortB", 30, 500),
        car("PortA", "Origin", 60, 1_000),
    ];

    let strict = Trip::new(loc("Origin"), loc("Dest"), scenario_ferries(), cars.clone()).unwrap();
    assert!(strict.constraints().contains(&Constraint::Feasible));
    let result = strict.evaluate().unwrap();
    assert_eq!(result.assembled, 1);
    assert_eq!(result.survived, 0);

    let lenient = Trip::builder(loc("Origin"), loc("Dest"))
        .cars(cars)
        .ferries(scenario_ferries())
        .config(PlannerConfig {
            feasible_only: false,
            ..PlannerConfig::default()
        })
        .build()
        .unwrap();
    let result = lenient.evaluate().unwrap();
    assert_eq!(result.itineraries.len(), 1);
    assert!(!result.itineraries[0].is_feasible());
}

#[test]
fn ceiling_fails_without_results() {
    let mut ferries = scenario_ferries();
    for h in 0..4 {
        ferries.push(ferry("PortA", "PortB", hours(12 + h), 90, 9_000, "P&O", Direction::Outbound));
    }

    let trip = Trip::builder(loc("Origin"), loc("Dest"))
        .cars(scenario_cars())
        .ferries(ferries)
        .config(PlannerConfig {
            max_itineraries: 3,
            ..PlannerConfig::default()
        })
        .build()
        .unwrap();

    match trip.evaluate() {
        Err(TripError::Assembly(AssemblyError::TooManyCombinations { count, limit })) => {
            assert_eq!(count, 5);
            assert_eq!(limit, 3);
        }
        other => panic!("expected TooManyCombinations, got {other:?}"),
    }
}

#[test]
fn max_results_truncates_after_dedup() {
    let mut ferries = scenario_ferries();
    for h in 0..5 {
        ferries.push(ferry(
            "PortA",
            "PortB",
            hours(12 + h),
            90,
            11_000 + h * 100,
            "P&O",
            Direction::Outbound,
        ));
    }

    let trip = Trip::builder(loc("Origin"), loc("Dest"))
        .cars(scenario_cars())
        .ferries(ferries)
        .max_results(3)
        .build()
        .unwrap();

    let result = trip.evaluate().unwrap();
    assert_eq!(result.survived, 6);
    assert_eq!(result.itineraries.len(), 3);
    // The cheapest is the original DFDS sailing
    assert_eq!(result.itineraries[0].outbound_crossing().operator(), "DFDS");
}

#[test]
fn trips_sharing_a_repository_are_independent() {
    let repo = Arc::new(LegRepository::new(scenario_cars(), scenario_ferries()).unwrap());

    let open = Trip::builder(loc("Origin"), loc("Dest"))
        .repository(repo.clone())
        .build()
        .unwrap();
    let tight = Trip::builder(loc("Origin"), loc("Dest"))
        .repository(repo.clone())
        .constraint(Constraint::MaxTotalCost(Money::ZERO))
        .party_size(4)
        .build()
        .unwrap();

    assert_eq!(tight.evaluate().unwrap().itineraries.len(), 0);
    let result = open.evaluate().unwrap();
    assert_eq!(result.itineraries.len(), 1);
    assert_eq!(result.itineraries[0].cost_per_person(), Money::from_pence(23_000));
    assert!(Arc::ptr_eq(open.repository(), tight.repository()));
}

#[test]
fn unconnected_trip_is_empty_not_error() {
    let trip = Trip::new(loc("Origin"), loc("Elsewhere"), scenario_ferries(), scenario_cars()).unwrap();
    let result = trip.evaluate().unwrap();

    assert_eq!(result.assembled, 0);
    assert!(result.itineraries.is_empty());
}

#[test]
fn empty_party_rejected() {
    let result = Trip::builder(loc("Origin"), loc("Dest"))
        .cars(scenario_cars())
        .party_size(0)
        .build();
    assert!(matches!(result, Err(TripError::Itinerary(_))));
}

#[test]
fn default_ranking_is_cost_then_duration() {
    let trip = Trip::new(loc("Origin"), loc("Dest"), scenario_ferries(), scenario_cars()).unwrap();
    assert_eq!(trip.criteria(), default_criteria().as_slice());
}

#[test]
fn negative_check_in_rejected() {
    let result = Trip::builder(loc("Origin"), loc("Dest"))
        .cars(scenario_cars())
        .ferries(scenario_ferries())
        .config(PlannerConfig {
            check_in_mins: -120,
            ..PlannerConfig::default()
        })
        .build();

    assert!(matches!(
        result,
        Err(TripError::Config(ConfigError::InvalidBuffer { name: "check_in_mins", .. }))
    ));
}

#[test]
fn oversized_records_fail_as_data_errors() {
    let long_drive = CarRecord {
        from: "Origin".into(),
        to: "PortA".into(),
        distance_km: None,
        duration: DurationField::Minutes(200_000_000_000),
        cost: Some(10.0),
        note: None,
        windows: vec![],
        bidirectional: true,
    };
    let far_drive = CarRecord {
        duration: DurationField::Minutes(60),
        cost: None,
        distance_km: Some(1e20),
        ..long_drive.clone()
    };

    for record in [long_drive, far_drive] {
        let result = Trip::builder(loc("Origin"), loc("Dest"))
            .car_records(vec![record])
            .ferries(scenario_ferries())
            .party_size(2)
            .build();
        assert!(matches!(result, Err(TripError::Data(DataError::Record { index: 0, .. }))));
    }
}

#[test]
fn week_long_drives_still_evaluate() {
    let mut cars = scenario_cars();
    cars[0] = car("Origin", "PortA", crate::domain::MAX_DRIVE_MINUTES, 1_000);

    let trip = Trip::builder(loc("Origin"), loc("Dest"))
        .cars(cars)
        .ferries(scenario_ferries())
        .party_size(3)
        .build()
        .unwrap();

    let result = trip.evaluate().unwrap();
    assert_eq!(result.assembled, 1);
    assert_eq!(result.itineraries[0].cost_per_person(), Money::from_pence(7_667));
}
