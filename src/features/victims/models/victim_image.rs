use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for an evidence image owned by a victim
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct VictimImage {
    pub id: i64,
    pub url: String,
    pub victim_id: Uuid,
    pub created_at: DateTime<Utc>,
}
