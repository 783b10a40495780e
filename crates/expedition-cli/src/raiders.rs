//! Built-in demo raiders.

use anyhow::{anyhow, Result};
use serde_json::Value;

use expedition_core::Explorer;

/// Stops on its first decision, whatever the contract says.
#[derive(Debug, Default)]
pub struct Stopper;

impl Explorer for Stopper {
    fn initialize(&mut self, _context: &str) -> Result<()> {
        Ok(())
    }

    fn take_decision(&mut self) -> Result<String> {
        Ok(r#"{ "action": "stop" }"#.to_string())
    }

    fn acknowledge_results(&mut self, _results: &str) -> Result<()> {
        Ok(())
    }

    fn deliver_final_report(&mut self) -> Result<Option<String>> {
        Ok(Some("Nothing to report, we never left the beach.".to_string()))
    }
}

/// Collects the first contract resource until the required amount is
/// gathered, then stops. Assumes it starts on a matching deposit.
#[derive(Debug, Default)]
pub struct Forager {
    resource: String,
    required: u64,
    gathered: u64,
}

impl Explorer for Forager {
    fn initialize(&mut self, context: &str) -> Result<()> {
        let context: Value = serde_json::from_str(context)?;
        let entry = context
            .get("contract")
            .and_then(Value::as_array)
            .and_then(|entries| entries.first())
            .ok_or_else(|| anyhow!("context has no contract"))?;
        self.resource = entry
            .get("resource")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("contract entry has no resource"))?
            .to_string();
        self.required = entry.get("amount").and_then(Value::as_u64).unwrap_or(0);
        Ok(())
    }

    fn take_decision(&mut self) -> Result<String> {
        if self.gathered >= self.required {
            Ok(r#"{ "action": "stop" }"#.to_string())
        } else {
            Ok(format!(
                r#"{{ "action": "collect", "parameters": {{ "resource": "{}" }} }}"#,
                self.resource
            ))
        }
    }

    fn acknowledge_results(&mut self, results: &str) -> Result<()> {
        let results: Value = serde_json::from_str(results)?;
        if let Some(total) = results
            .get("extras")
            .and_then(|extras| extras.get("total"))
            .and_then(Value::as_u64)
        {
            self.gathered = total;
        }
        Ok(())
    }

    fn deliver_final_report(&mut self) -> Result<Option<String>> {
        Ok(Some(format!(
            "Contract fulfilled: {} x{}",
            self.resource, self.gathered
        )))
    }
}

/// Look up a built-in raider by name.
pub fn by_name(name: &str) -> Option<Box<dyn Explorer + Send>> {
    match name.to_lowercase().as_str() {
        "stopper" => Some(Box::new(Stopper)),
        "forager" => Some(Box::new(Forager::default())),
        _ => None,
    }
}
