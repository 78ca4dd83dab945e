//! Tests for bottleneck alerts under a saturated cleaning station
//!
//! Cars arrive every 10 minutes but cleaning takes 25, so the cleaning queue
//! builds up while primer and painting have spare machines.

use paint_shop_simulator::*;

fn bottleneck_config() -> SimulationConfig {
    SimulationConfig {
        arrival_interval: TimeRange::fixed(10.0),
        arrival_cutoff: 100.0,
        cleaning: StationConfig::new(1, TimeRange::fixed(25.0)),
        primer: StationConfig::new(5, TimeRange::fixed(1.0)),
        painting: StationConfig::new(5, TimeRange::fixed(1.0)),
        bottleneck_threshold: 0,
        verbose_logging: false,
        seed: Some(5),
        ..Default::default()
    }
}

fn run(config: SimulationConfig) -> (SimulationResults, MemoryEventLog) {
    let events = MemoryEventLog::new();
    let results = PaintShopSimulation::new(config, Box::new(events.clone()))
        .unwrap()
        .run()
        .unwrap();
    (results, events)
}

/// Test that arrivals before the cutoff are all admitted and drained
#[test]
fn test_all_cars_complete() {
    let (results, _events) = run(bottleneck_config());

    assert_eq!(results.cars_generated, 9);
    assert_eq!(results.total_cars, 9);
    assert_eq!(results.cars_in_system, 0);
}

/// Test that the saturated station keeps raising alerts
#[test]
fn test_alert_count_tracks_backlog() {
    let (results, _events) = run(bottleneck_config());

    assert!(results.alert_count as u64 >= results.cars_generated - 1);
    assert_eq!(results.alerts.len(), results.alert_count);
    assert!(results.alerts.iter().all(|alert| alert.station == StationKind::Cleaning));
    assert!(results.alerts.iter().all(|alert| alert.queue_length > 0));
}

/// Test that every car that had to wait was preceded by an alert
#[test]
fn test_waiting_cars_were_flagged_in_advance() {
    let (results, events) = run(bottleneck_config());

    let alert_times: Vec<SimTime> = events
        .events()
        .into_iter()
        .filter(|e| e.kind == ShopEventKind::Alert)
        .map(|e| e.time)
        .collect();
    assert!(!alert_times.is_empty());

    for car in results.completed_cars.iter().filter(|car| car.id.0 >= 2) {
        let start = car.start(StationKind::Cleaning).unwrap();
        assert!(
            alert_times.iter().any(|&alert| alert >= car.arrival_time && alert <= start),
            "{} waited from {} to {} with no alert in between",
            car.id,
            car.arrival_time,
            start
        );
    }
}

/// Test the alert message format
#[test]
fn test_alert_messages() {
    let (results, events) = run(bottleneck_config());

    let alerts: Vec<String> = events
        .messages()
        .into_iter()
        .filter(|m| m.starts_with("ALERT"))
        .collect();
    assert_eq!(alerts.len(), results.alert_count);
    assert!(alerts
        .iter()
        .all(|m| m.starts_with("ALERT: Queue at Cleaning has ") && m.ends_with(" cars waiting")));
}

/// Test queue statistics of the bottleneck station
#[test]
fn test_cleaning_queue_statistics() {
    let (results, _events) = run(bottleneck_config());
    let cleaning = results.station(StationKind::Cleaning);

    assert!(cleaning.max_queue_length >= 3);
    assert_eq!(results.station(StationKind::Primer).max_queue_length, 0);
    assert_eq!(results.station(StationKind::Painting).max_queue_length, 0);

    // 9 cars x 25 minutes over the 480 minute shift
    assert_eq!(cleaning.total_busy_time, 225.0);
    assert!((results.utilization(StationKind::Cleaning) - 46.875).abs() < 1e-9);
    assert_eq!(results.most_utilized().0, StationKind::Cleaning);
}

/// Test that a threshold above the backlog suppresses alerts entirely
#[test]
fn test_high_threshold_raises_no_alerts() {
    let mut config = bottleneck_config();
    config.bottleneck_threshold = 100;
    let (results, events) = run(config);

    assert_eq!(results.alert_count, 0);
    assert!(results.alerts.is_empty());
    assert!(events.events().iter().all(|e| e.kind != ShopEventKind::Alert));
}
