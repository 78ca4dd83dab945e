//! Tests for the simulation event log
//!
//! Every event reaches the sink regardless of detail level or verbosity; the
//! level only decides what is echoed to the console.

use paint_shop_simulator::*;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing::Level;

fn small_shop(seed: u64) -> SimulationConfig {
    SimulationConfig {
        arrival_cutoff: 60.0,
        log_detail_level: LogDetailLevel::Detailed,
        verbose_logging: false,
        seed: Some(seed),
        ..Default::default()
    }
}

fn run_in_memory(config: SimulationConfig) -> (SimulationResults, MemoryEventLog) {
    let events = MemoryEventLog::new();
    let results = PaintShopSimulation::new(config, Box::new(events.clone()))
        .unwrap()
        .run()
        .unwrap();
    (results, events)
}

fn backlog_shop() -> SimulationConfig {
    SimulationConfig {
        arrival_interval: TimeRange::fixed(10.0),
        arrival_cutoff: 100.0,
        cleaning: StationConfig::new(1, TimeRange::fixed(25.0)),
        bottleneck_threshold: 0,
        seed: Some(5),
        ..Default::default()
    }
}

/// Console output captured from a scoped subscriber
#[derive(Debug, Clone, Default)]
struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_console(level: Level, config: SimulationConfig) -> (SimulationResults, String) {
    let output = CapturedOutput::default();
    let writer = output.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let results = tracing::subscriber::with_default(subscriber, || {
        PaintShopSimulation::new(config, Box::new(MemoryEventLog::new())).unwrap().run().unwrap()
    });
    let text = String::from_utf8(output.0.lock().unwrap().clone()).unwrap();
    (results, text)
}

/// Sink that counts events and fails after a limit
#[derive(Debug, Default)]
struct LimitedSink {
    limit: usize,
    seen: usize,
}

impl EventSink for LimitedSink {
    fn record(&mut self, _event: &ShopEvent) -> SimulationResult<()> {
        if self.seen >= self.limit {
            return Err(SimulationError::scheduling_error("sink is full"));
        }
        self.seen += 1;
        Ok(())
    }
}

/// Test the lifecycle messages of the first car
#[test]
fn test_first_car_lifecycle_is_logged() {
    let (_results, events) = run_in_memory(small_shop(11));
    let messages = events.messages();

    let expected = [
        "Car 1 ARRIVED",
        "Car 1 entering Cleaning queue",
        "Car 1 STARTED Cleaning",
        "Car 1 FINISHED Cleaning",
        "Car 1 entering Primer queue",
        "Car 1 STARTED Primer",
        "Car 1 FINISHED Primer",
        "Car 1 entering Painting queue",
        "Car 1 STARTED Painting",
        "Car 1 FINISHED Painting",
    ];
    let mut cursor = 0;
    for message in expected {
        let found = messages[cursor..]
            .iter()
            .position(|m| m == message)
            .unwrap_or_else(|| panic!("missing or out of order: {}", message));
        cursor += found + 1;
    }
    assert!(messages[cursor..].iter().any(|m| m.starts_with("Car 1 EXITED SYSTEM (Total time: ")));
}

/// Test that the log opens and closes with the run banners
#[test]
fn test_run_banners() {
    let (_results, events) = run_in_memory(small_shop(11));
    let messages = events.messages();
    let rule = "=".repeat(80);

    assert_eq!(messages[0], rule);
    assert_eq!(messages[1], "PAINT SHOP CONVEYOR SYSTEM SIMULATION STARTED");
    assert_eq!(messages[2], rule);

    let n = messages.len();
    assert_eq!(messages[n - 3], rule);
    assert_eq!(messages[n - 2], "SIMULATION COMPLETE");
    assert_eq!(messages[n - 1], rule);
}

/// Test that event times never go backwards
#[test]
fn test_event_times_are_non_decreasing() {
    let (_results, events) = run_in_memory(small_shop(23));
    let times: Vec<SimTime> = events.events().iter().map(|e| e.time).collect();
    assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
}

/// Test that events carry the car and station they describe
#[test]
fn test_events_are_tagged() {
    let (_results, events) = run_in_memory(small_shop(5));

    for event in events.events() {
        match event.kind {
            ShopEventKind::Arrival | ShopEventKind::Exit => {
                assert!(event.car_id.is_some());
                assert!(event.station.is_none());
            }
            ShopEventKind::QueueEntry | ShopEventKind::ServiceStart | ShopEventKind::ServiceFinish => {
                assert!(event.car_id.is_some());
                assert!(event.station.is_some());
            }
            ShopEventKind::Alert => assert!(event.station.is_some()),
            ShopEventKind::RunBoundary | ShopEventKind::Separator | ShopEventKind::ArrivalsStopped => {
                assert!(event.car_id.is_none());
            }
        }
    }
}

/// Test that the detail level and verbosity never filter the persisted log
#[test]
fn test_console_settings_do_not_filter_the_log() {
    let (_results, detailed) = run_in_memory(small_shop(31));

    let mut minimal = small_shop(31);
    minimal.log_detail_level = LogDetailLevel::Minimal;
    minimal.verbose_logging = true;
    let (_results, quiet) = run_in_memory(minimal);

    assert_eq!(detailed.lines(), quiet.lines());
}

/// Test the file sink writes the same lines as the memory sink
#[test]
fn test_file_log_matches_memory_log() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("runs").join("events.txt");

    let mut config = small_shop(47);
    config.log_file_path = log_path.to_string_lossy().into_owned();
    PaintShopSimulation::with_log_file(config.clone()).unwrap().run().unwrap();

    let contents = fs::read_to_string(&log_path).unwrap();
    let file_lines: Vec<String> = contents.lines().map(str::to_string).collect();
    assert!(!file_lines.is_empty());
    assert!(file_lines.iter().all(|line| line.starts_with('[')));
    assert!(file_lines.contains(&"[0.0] PAINT SHOP CONVEYOR SYSTEM SIMULATION STARTED".to_string()));

    let (_results, events) = run_in_memory(config);
    assert_eq!(file_lines, events.lines());
}

/// Test that a failing sink aborts the run
#[test]
fn test_sink_errors_propagate() {
    let sink = LimitedSink { limit: 5, ..Default::default() };
    let result = PaintShopSimulation::new(small_shop(3), Box::new(sink)).unwrap().run();
    assert!(result.is_err());
}

/// Test that banner rules are separators and titles are run boundaries
#[test]
fn test_banner_lines_have_distinct_kinds() {
    let (_results, events) = run_in_memory(small_shop(11));
    let rule = "=".repeat(80);

    for event in events.events() {
        if event.message == rule {
            assert_eq!(event.kind, ShopEventKind::Separator);
        } else if event.message.contains("SIMULATION") {
            assert_eq!(event.kind, ShopEventKind::RunBoundary);
        }
    }
}

/// Test that the summary console shows banner titles without the rules
#[test]
fn test_summary_console_omits_banner_rules() {
    let mut config = small_shop(11);
    config.log_detail_level = LogDetailLevel::Summary;
    config.verbose_logging = true;
    let (_results, console) = capture_console(Level::INFO, config);

    assert!(console.contains("PAINT SHOP CONVEYOR SYSTEM SIMULATION STARTED"));
    assert!(console.contains("SIMULATION COMPLETE"));
    assert!(console.contains("Car 1 ARRIVED"));
    assert!(!console.contains(&"=".repeat(80)));
    assert!(!console.contains("entering Cleaning queue"));
}

/// Test that each alert reaches the console once, and only when echo is on
#[test]
fn test_alerts_echo_once_through_the_event_log() {
    let mut config = backlog_shop();
    config.log_detail_level = LogDetailLevel::Minimal;
    config.verbose_logging = true;
    let (results, console) = capture_console(Level::INFO, config);

    assert!(results.alert_count > 0);
    assert_eq!(console.matches("ALERT: Queue at Cleaning").count(), results.alert_count);
    assert!(!console.contains("bottleneck detected"));
}

/// Test that a quiet run prints nothing at the default warning level
#[test]
fn test_quiet_run_prints_no_alerts() {
    let mut config = backlog_shop();
    config.verbose_logging = false;
    let (results, console) = capture_console(Level::WARN, config);

    assert!(results.alert_count > 0);
    assert!(console.is_empty(), "unexpected console output: {}", console);
}
