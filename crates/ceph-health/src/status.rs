//! Decoding of `ceph status --format json` output.
//!
//! Only `health.status` and `pgmap.pgs_by_state` are read. Every other field
//! of the payload is ignored so newer Ceph releases keep decoding.

use serde::{Deserialize, Serialize};

use crate::error::HealthError;

/// Overall cluster health as reported by the monitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Ok,
    Warn,
    Err,
    /// A value this tool does not know how to rank.
    Unrecognized(String),
}

impl From<String> for HealthStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "HEALTH_OK" => Self::Ok,
            "HEALTH_WARN" => Self::Warn,
            "HEALTH_ERR" => Self::Err,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<HealthStatus> for String {
    fn from(value: HealthStatus) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "HEALTH_OK"),
            Self::Warn => write!(f, "HEALTH_WARN"),
            Self::Err => write!(f, "HEALTH_ERR"),
            Self::Unrecognized(s) => write!(f, "{s}"),
        }
    }
}

/// Number of placement groups in one composite state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgStateEntry {
    pub state_name: String,
    pub count: u64,
}

#[derive(Deserialize)]
struct RawStatus {
    health: RawHealth,
    pgmap: RawPgMap,
}

#[derive(Deserialize)]
struct RawHealth {
    status: HealthStatus,
}

#[derive(Deserialize)]
struct RawPgMap {
    pgs_by_state: Vec<PgStateEntry>,
}

/// Decoded result of one status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterStatusSnapshot {
    pub health: HealthStatus,
    pub pgs_by_state: Vec<PgStateEntry>,
}

impl ClusterStatusSnapshot {
    /// Decode the JSON printed by `ceph -s --format json`.
    pub fn decode(raw: &str) -> Result<Self, HealthError> {
        let status: RawStatus = serde_json::from_str(raw.trim())?;
        Ok(Self {
            health: status.health.status,
            pgs_by_state: status.pgmap.pgs_by_state,
        })
    }

    /// Total placement groups across all states.
    pub fn total_pgs(&self) -> u64 {
        self.pgs_by_state.iter().map(|e| e.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    {
        "fsid": "a7f64266-0894-4f1e-a635-d0aeaca0e993",
        "health": {
            "status": "HEALTH_WARN",
            "checks": {"OSD_DOWN": {"severity": "HEALTH_WARN"}},
            "mutes": []
        },
        "election_epoch": 12,
        "quorum_names": ["a", "b", "c"],
        "pgmap": {
            "pgs_by_state": [
                {"state_name": "active+clean", "count": 10},
                {"state_name": "remapped", "count": 2}
            ],
            "num_pgs": 12,
            "bytes_used": 123456
        }
    }
    "#;

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let snapshot = ClusterStatusSnapshot::decode(SAMPLE).unwrap();
        assert_eq!(snapshot.health, HealthStatus::Warn);
        assert_eq!(
            snapshot.pgs_by_state,
            vec![
                PgStateEntry {
                    state_name: "active+clean".to_string(),
                    count: 10
                },
                PgStateEntry {
                    state_name: "remapped".to_string(),
                    count: 2
                },
            ]
        );
        assert_eq!(snapshot.total_pgs(), 12);
    }

    #[test]
    fn test_health_status_values() {
        assert_eq!(HealthStatus::from("HEALTH_OK".to_string()), HealthStatus::Ok);
        assert_eq!(HealthStatus::from("HEALTH_ERR".to_string()), HealthStatus::Err);
        assert_eq!(
            HealthStatus::from("HEALTH_UNKNOWN".to_string()),
            HealthStatus::Unrecognized("HEALTH_UNKNOWN".to_string())
        );
        assert_eq!(HealthStatus::Warn.to_string(), "HEALTH_WARN");
    }

    #[test]
    fn test_decode_empty_pg_list() {
        let raw = r#"{"health":{"status":"HEALTH_OK"},"pgmap":{"pgs_by_state":[]}}"#;
        let snapshot = ClusterStatusSnapshot::decode(raw).unwrap();
        assert_eq!(snapshot.health, HealthStatus::Ok);
        assert!(snapshot.pgs_by_state.is_empty());
    }

    #[test]
    fn test_missing_health_status_is_error() {
        let raw = r#"{"health":{"checks":{}},"pgmap":{"pgs_by_state":[]}}"#;
        let err = ClusterStatusSnapshot::decode(raw).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_missing_pgmap_is_error() {
        let raw = r#"{"health":{"status":"HEALTH_OK"}}"#;
        assert!(ClusterStatusSnapshot::decode(raw).unwrap_err().is_decode());
    }

    #[test]
    fn test_malformed_pg_list_is_error() {
        for raw in [
            r#"{"health":{"status":"HEALTH_OK"},"pgmap":{"pgs_by_state":{"active+clean":1}}}"#,
            r#"{"health":{"status":"HEALTH_OK"},"pgmap":{"pgs_by_state":[{"count":1}]}}"#,
            r#"{"health":{"status":"HEALTH_OK"},"pgmap":{"pgs_by_state":[{"state_name":"x","count":-1}]}}"#,
        ] {
            assert!(
                ClusterStatusSnapshot::decode(raw).unwrap_err().is_decode(),
                "expected decode error for {raw}"
            );
        }
    }

    #[test]
    fn test_non_json_is_error() {
        let err = ClusterStatusSnapshot::decode("Error initializing cluster client").unwrap_err();
        assert!(err.is_decode());
    }
}
