use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Backend Resources ---
//
// The job status, statistics and configuration payloads are forwarded to the rendering
// layer untouched, so they stay opaque JSON here. Only the audit report is destructured.

/// Job status collection as returned by the backend.
pub type JobsStatus = Value;

/// Server statistics as returned by the backend.
pub type ServerStats = Value;

/// Full server configuration as returned by the backend.
pub type SystemConfig = Value;

/// UserInfo
///
/// The backend's view of the user behind a session token. Only the fields the gate
/// needs are decoded; anything else the backend sends is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// FileReportItem
///
/// A file the backend database knows about but which is missing on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FileReportItem {
    pub entity_id: Uuid,
    // "asset", "person" or "user".
    pub entity_type: String,
    // Which path column of the entity is affected (e.g. "original", "thumbnail").
    pub path_type: String,
    pub path_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub checksum: Option<String>,
}

/// AuditFiles
///
/// The backend's file integrity report: database rows without a file (`orphans`) and
/// files on disk without a database row (`extras`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuditFiles {
    pub orphans: Vec<FileReportItem>,
    pub extras: Vec<String>,
}

// --- Page Data (Route-Specific Keys) ---

/// JobsStatusPage
///
/// Data for `/admin/jobs-status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct JobsStatusPage {
    #[ts(type = "unknown")]
    #[schema(value_type = Object)]
    pub jobs: JobsStatus,
}

/// RepairPage
///
/// Data for `/admin/repair`. The audit report is spread into two top-level keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RepairPage {
    pub orphans: Vec<FileReportItem>,
    pub extras: Vec<String>,
}

impl From<AuditFiles> for RepairPage {
    fn from(AuditFiles { orphans, extras }: AuditFiles) -> Self {
        Self { orphans, extras }
    }
}

/// ServerStatusPage
///
/// Data for `/admin/server-status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ServerStatusPage {
    #[ts(type = "unknown")]
    #[schema(value_type = Object)]
    pub stats: ServerStats,
}

/// SystemSettingsPage
///
/// Data for `/admin/system-settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SystemSettingsPage {
    #[ts(type = "unknown")]
    #[schema(value_type = Object)]
    pub configs: SystemConfig,
}
