use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::entries::analytics::WeightSummary;

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Defaults to today when omitted.
    pub entry_date: Option<Date>,
    pub weight_kg: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

fn default_limit() -> i64 {
    30
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub goal_id: Option<Uuid>,
    #[serde(flatten)]
    pub summary: Option<WeightSummary>,
    pub progress_percent: Option<f64>,
    pub bmi: Option<f64>,
}
