//! JSON snapshot of store contents.
//!
//! Written at process shutdown and read back at startup so the in-memory
//! store survives restarts.

use std::path::Path;

use coastwatch_database_models::{Alert, Principal, Report};
use serde::{Deserialize, Serialize};

use crate::DbError;

/// Serialized store contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All reports.
    #[serde(default)]
    pub reports: Vec<Report>,
    /// All alerts, in insertion order.
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl Snapshot {
    /// Reads a snapshot file. A missing file yields an empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file exists but cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, DbError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No snapshot at {}, starting empty", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the snapshot, replacing any existing file.
    ///
    /// The file is written next to its destination and renamed into place
    /// so a crash never leaves a truncated snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if serialization or any file operation fails.
    pub async fn save(&self, path: &Path) -> Result<(), DbError> {
        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Reads a JSON array of principals.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be read or parsed.
pub async fn load_principals(path: &Path) -> Result<Vec<Principal>, DbError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use coastwatch_database_models::{Coordinates, NewReport};
    use coastwatch_hazard_models::{HazardType, ReportStatus, Role};

    use super::*;

    #[tokio::test]
    async fn save_then_load_restores_reports() {
        let dir = std::env::temp_dir().join(format!("coastwatch_snapshot_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("store.json");

        let report = NewReport {
            reporter_id: "citizen-7".to_string(),
            role_at_submission: Role::Citizen,
            hazard_type: HazardType::RipCurrent,
            description: Some("Strong pull near the pier".to_string()),
            coordinates: Some(Coordinates::new(15.49, 73.82)),
            location_name: Some("Calangute".to_string()),
            media_ref: None,
            status: ReportStatus::Submitted,
            created_at: Utc::now(),
        }
        .into_report("r-1".to_string());

        let snapshot = Snapshot {
            reports: vec![report],
            alerts: Vec::new(),
        };
        snapshot.save(&path).await.unwrap();

        let loaded = Snapshot::load(&path).await.unwrap();
        assert_eq!(loaded, snapshot);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_snapshot_is_empty() {
        let path = std::env::temp_dir().join(format!("coastwatch_absent_{}.json", uuid::Uuid::new_v4()));
        let loaded = Snapshot::load(&path).await.unwrap();
        assert!(loaded.reports.is_empty());
        assert!(loaded.alerts.is_empty());
    }
}
