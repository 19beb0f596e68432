//! Task data structure.
//!
//! This module defines the `Task` record exactly as it is persisted, using the
//! hyphenated timestamp keys of the store file.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::fields::Status;

/// Identifier assigned from the store's `next_id` counter.
pub type TaskId = i64;

/// Format of `created-at` and `updated-at`, in local time.
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M:%S";

/// A single unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub status: Status,
    #[serde(rename = "created-at")]
    pub created_at: String,
    #[serde(rename = "updated-at")]
    pub updated_at: String,
}

impl Task {
    /// A fresh `Todo` task whose timestamps are both `now`.
    pub fn new(id: TaskId, description: String, now: &str) -> Self {
        Task {
            id,
            description,
            status: Status::Todo,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

/// Current local time rendered with [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
