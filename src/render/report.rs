//! Machine-readable JSON report.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::domain::REPORT_SCHEMA_VERSION;
use crate::render::RepoSection;

/// Write the classification maps and totals for every section as pretty
/// JSON. `percent` is `null` when a repository tracked nothing, keeping
/// "no data" distinct from zero percent.
pub fn write_json(
    out: &mut dyn Write,
    sections: &[RepoSection<'_>],
    include_timestamp: bool,
) -> Result<()> {
    let mut report = Map::new();
    report.insert(
        "schema_version".to_string(),
        Value::String(REPORT_SCHEMA_VERSION.to_string()),
    );
    if include_timestamp {
        report.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }

    let mut repos = Map::new();
    for section in sections {
        let outcome = section.outcome;
        let reconstructed: Map<String, Value> = outcome
            .reconstructed
            .iter()
            .map(|(path, mapped)| (path.clone(), json!(mapped.to_string_lossy())))
            .collect();
        let missing: Map<String, Value> = outcome
            .missing
            .iter()
            .map(|(path, size)| (path.clone(), json!(*size)))
            .collect();
        repos.insert(
            section.name.to_string(),
            json!({
                "reconstructed": reconstructed,
                "missing": missing,
                "totals": {
                    "reconstructed": outcome.completed(),
                    "missing": outcome.missing.len(),
                    "total": outcome.total(),
                    "percent": outcome.percent(),
                },
            }),
        );
    }
    report.insert("repos".to_string(), Value::Object(repos));

    writeln!(out, "{}", serde_json::to_string_pretty(&Value::Object(report))?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::domain::RepoSpec;
    use crate::reconcile::Reconciliation;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn report_for(outcome: &Reconciliation) -> Value {
        let tree = aggregate(outcome);
        let spec = RepoSpec {
            github: "example/Widget".to_string(),
            strip_prefix: None,
            branch: "main".to_string(),
        };
        let section = RepoSection {
            name: "Widget",
            spec: &spec,
            outcome,
            tree: &tree,
            mesh_extension: "stl",
            design_extension: "f3d",
        };
        let mut buffer = Vec::new();
        write_json(&mut buffer, &[section], false).expect("write json");
        serde_json::from_slice(&buffer).expect("valid json")
    }

    #[test]
    fn totals_and_maps_round_trip() {
        let outcome = Reconciliation {
            reconstructed: BTreeMap::from([("a.stl".to_string(), PathBuf::from("t/a.f3d"))]),
            missing: BTreeMap::from([("b.stl".to_string(), 20)]),
        };
        let report = report_for(&outcome);

        assert_eq!(report["schema_version"], json!(REPORT_SCHEMA_VERSION));
        assert!(report.get("generated_at").is_none());
        let widget = &report["repos"]["Widget"];
        assert_eq!(widget["reconstructed"]["a.stl"], json!("t/a.f3d"));
        assert_eq!(widget["missing"]["b.stl"], json!(20));
        assert_eq!(widget["totals"]["total"], json!(2));
        assert_eq!(widget["totals"]["percent"], json!(50.0));
    }

    #[test]
    fn empty_repo_reports_null_percent() {
        let report = report_for(&Reconciliation::default());
        assert_eq!(report["repos"]["Widget"]["totals"]["percent"], Value::Null);
    }
}
