//! # Category Model
//!
//! User-scoped label a task can optionally belong to. Maps to the
//! `categories` table; names are unique per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New category for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub user_id: i64,
    pub name: String,
}
