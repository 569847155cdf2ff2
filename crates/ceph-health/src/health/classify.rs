//! Pure classification of Ceph health and placement-group states.

use crate::report::{Finding, Severity};
use crate::status::{HealthStatus, PgStateEntry};

/// The only placement-group state that counts as fully healthy.
pub const HEALTHY_PG_STATE: &str = "active+clean";

/// Substrings that make a placement-group state an error.
pub const ERROR_PG_MARKERS: &[&str] = &["down", "incomplete", "snaptrim_error"];

/// Severity of the overall cluster health.
pub fn health_severity(status: &HealthStatus) -> Severity {
    match status {
        HealthStatus::Ok => Severity::Info,
        HealthStatus::Warn | HealthStatus::Unrecognized(_) => Severity::Warning,
        HealthStatus::Err => Severity::Error,
    }
}

/// Finding for the overall cluster health.
pub fn classify_health(status: &HealthStatus) -> Finding {
    let severity = health_severity(status);
    match status {
        HealthStatus::Unrecognized(value) => {
            Finding::new(severity, format!("Unrecognized ceph health status: {value}"))
        }
        known => Finding::new(severity, known.to_string()),
    }
}

/// Severity of a composite placement-group state name.
///
/// Exact `active+clean` is Info; any name containing an error marker is
/// Error; everything else is Warning.
pub fn pg_state_severity(state_name: &str) -> Severity {
    if state_name == HEALTHY_PG_STATE {
        Severity::Info
    } else if ERROR_PG_MARKERS
        .iter()
        .any(|marker| state_name.contains(marker))
    {
        Severity::Error
    } else {
        Severity::Warning
    }
}

/// One finding per placement-group state, in input order.
pub fn classify_pg_states(entries: &[PgStateEntry]) -> Vec<Finding> {
    entries
        .iter()
        .map(|entry| {
            Finding::new(
                pg_state_severity(&entry.state_name),
                format!("PgState: {}, PgCount: {}", entry.state_name, entry.count),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, count: u64) -> PgStateEntry {
        PgStateEntry {
            state_name: name.to_string(),
            count,
        }
    }

    #[test]
    fn test_health_classification() {
        assert_eq!(
            classify_health(&HealthStatus::Ok),
            Finding::info("HEALTH_OK")
        );
        assert_eq!(
            classify_health(&HealthStatus::Warn),
            Finding::warning("HEALTH_WARN")
        );
        assert_eq!(
            classify_health(&HealthStatus::Err),
            Finding::error("HEALTH_ERR")
        );
    }

    #[test]
    fn test_unrecognized_health_is_tagged_warning() {
        let finding = classify_health(&HealthStatus::Unrecognized("HEALTH_MAYBE".to_string()));
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.message, "Unrecognized ceph health status: HEALTH_MAYBE");
    }

    #[test]
    fn test_active_clean_is_info() {
        assert_eq!(pg_state_severity("active+clean"), Severity::Info);
    }

    #[test]
    fn test_error_markers_match_as_substrings() {
        for name in [
            "down",
            "active+undersized+degraded+down",
            "incomplete",
            "peering+incomplete",
            "active+clean+snaptrim_error",
        ] {
            assert_eq!(pg_state_severity(name), Severity::Error, "{name}");
        }
    }

    #[test]
    fn test_everything_else_is_warning() {
        for name in [
            "active+clean+scrubbing",
            "active+remapped+backfilling",
            "peering",
            "active+undersized+degraded",
            "unknown",
        ] {
            assert_eq!(pg_state_severity(name), Severity::Warning, "{name}");
        }
    }

    #[test]
    fn test_pg_findings_keep_order_and_counts() {
        let findings = classify_pg_states(&[
            entry("active+clean", 10),
            entry("remapped", 2),
            entry("stale+down", 1),
        ]);
        assert_eq!(
            findings,
            vec![
                Finding::info("PgState: active+clean, PgCount: 10"),
                Finding::warning("PgState: remapped, PgCount: 2"),
                Finding::error("PgState: stale+down, PgCount: 1"),
            ]
        );
    }

    #[test]
    fn test_empty_pg_list() {
        assert!(classify_pg_states(&[]).is_empty());
    }
}
