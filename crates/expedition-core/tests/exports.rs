use anyhow::Result;
use serde_json::Value;

use expedition_core::config::DepositConfig;
use expedition_core::{export, Explorer, RunConfig, TurnEngine, UniformCostPolicy};

struct Stopper;

impl Explorer for Stopper {
    fn initialize(&mut self, _context: &str) -> Result<()> {
        Ok(())
    }

    fn take_decision(&mut self) -> Result<String> {
        Ok(r#"{"action": "stop"}"#.to_string())
    }

    fn acknowledge_results(&mut self, _results: &str) -> Result<()> {
        Ok(())
    }
}

fn stop_first_report() -> expedition_core::RunReport {
    let mut config = RunConfig::default();
    config.contract.insert("WOOD".to_string(), 1000);
    config.map.deposits.push(DepositConfig {
        resource: "WOOD".to_string(),
        x: 1,
        y: 1,
    });
    let island = config.build_island().unwrap();
    let policy = UniformCostPolicy;
    TurnEngine::new(&island, &policy, &config)
        .run(Box::new(Stopper))
        .unwrap()
}

#[test]
fn event_log_export_writes_one_line_per_event_plus_a_sentinel() {
    let report = stop_first_report();
    let dir = tempfile::tempdir().unwrap();

    let path = export::write_event_log(dir.path(), &report).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), report.events.len() + 1);

    // Every event line is a standalone JSON object in turn order.
    for (index, line) in lines[..lines.len() - 1].iter().enumerate() {
        let event: Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["turn"], Value::from(index as u64 + 1));
    }

    let sentinel: Value = serde_json::from_str(lines.last().unwrap()).unwrap();
    assert_eq!(sentinel["turns"], Value::from(report.events.len()));
    assert!(sentinel.get("outcome").is_some());
}

#[test]
fn visibility_export_contains_the_start_tile() {
    let report = stop_first_report();
    let dir = tempfile::tempdir().unwrap();

    let path = export::write_visibility(dir.path(), &report).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let payload: Value = serde_json::from_str(&content).unwrap();

    let visited = payload["visited"].as_array().unwrap();
    assert!(visited.iter().any(|c| c["x"] == 1 && c["y"] == 1));
    assert!(payload["scanned"].as_array().unwrap().is_empty());
}

#[test]
fn exports_overwrite_previous_runs() {
    let report = stop_first_report();
    let dir = tempfile::tempdir().unwrap();

    let first = export::write_event_log(dir.path(), &report).unwrap();
    let second = export::write_event_log(dir.path(), &report).unwrap();
    assert_eq!(first, second);

    let content = std::fs::read_to_string(&second).unwrap();
    assert_eq!(content.lines().count(), report.events.len() + 1);
}
