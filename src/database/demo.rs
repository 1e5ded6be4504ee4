//! Sample monitoring data for local sessions and demo servers

use super::error::DatabaseError;
use super::memory::MemoryDatabase;
use super::models::{Model, Monitor, Namespace, Value, Variable};
use chrono::Utc;
use rand::Rng;
use serde_json::json;

/// Samples generated per variable.
pub const SAMPLES_PER_VARIABLE: usize = 30;

const MONITORS: [(&str, &[(&str, &[&str])]); 2] = [
    (
        "load-balancer",
        &[("dispatch", &["requests", "latency"]), ("health", &["errors"])],
    ),
    ("storage", &[("disk", &["usage"])]),
];

/// Fills the model tables of `db` with a few monitors, their namespaces,
/// variables and a minute of samples per variable. The tables must exist.
pub fn seed(db: &MemoryDatabase) -> Result<usize, DatabaseError> {
    let mut rng = rand::thread_rng();
    let now = Utc::now().timestamp_millis() as f64;
    let mut rows = 0;

    for (monitor, namespaces) in MONITORS {
        let monitor_id = db.insert(Monitor::TABLE, json!({ "name": monitor }))?;
        rows += 1;
        for (namespace, variables) in namespaces {
            let namespace_id = db.insert(
                Namespace::TABLE,
                json!({ "name": namespace, "monitorId": monitor_id }),
            )?;
            rows += 1;
            for variable in variables.iter() {
                let variable_id = db.insert(
                    Variable::TABLE,
                    json!({ "name": variable, "namespace": namespace_id }),
                )?;
                rows += 1;
                let mut level: f64 = rng.gen_range(10.0..50.0);
                for i in 0..SAMPLES_PER_VARIABLE {
                    level = (level + rng.gen_range(-5.0..5.0)).max(0.0);
                    let timestamp = now - ((SAMPLES_PER_VARIABLE - i) as f64) * 2000.0;
                    db.insert(
                        Value::TABLE,
                        json!({
                            "name": variable,
                            "variable": variable_id,
                            "value": level,
                            "timestamp": timestamp,
                        }),
                    )?;
                    rows += 1;
                }
            }
        }
    }

    log::debug!("Seeded {} demo rows into {}", rows, db.name());
    Ok(rows)
}
