use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::{RabStatus, ReviewStatus};

/// One scored answer inside a supervision. Indicators the supervisor left
/// unscored simply have no item row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisionItem {
    pub category_number: i32,
    pub indicator_number: i32,
    pub score: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SupervisionRecord {
    pub id: Uuid,
    pub teacher_name: String,
    pub teacher_email: String,
    pub unit: String,
    pub period: String,
    pub supervisor: String,
    pub status: ReviewStatus,
    pub supervised_at: NaiveDate,
    pub items: Vec<SupervisionItem>,
}

#[derive(Debug, Clone)]
pub struct ActivityReport {
    pub id: Uuid,
    pub title: String,
    pub period: String,
    pub description: String,
    pub status: ReviewStatus,
}

#[derive(Debug, Clone)]
pub struct RabProposal {
    pub id: Uuid,
    pub title: String,
    pub period: String,
    pub amount: i64,
    pub justification: String,
    pub status: RabStatus,
    pub foundation_note: Option<String>,
}
