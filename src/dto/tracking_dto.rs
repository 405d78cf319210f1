use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartViewRequest {
    pub material_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartViewResponse {
    pub tracking: bool,
    pub already_tracking: bool,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub records_view: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopViewRequest {
    pub material_id: Uuid,
    /// What triggered the stop: "manual", "hidden" (tab became invisible)
    /// or "unmount" (viewer teardown). Logged only.
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopViewResponse {
    pub stopped: bool,
    pub time_spent_seconds: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewStatusResponse {
    pub tracking: bool,
    pub elapsed_seconds: Option<i64>,
}
