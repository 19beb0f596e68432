//! Enumerations and field types for task management.
//!
//! `Status` is the in-memory form of a task's progress. On disk it is an
//! integer (`-1` todo, `0` in progress, `1` done); the mapping lives here and
//! nowhere else.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task completion status.
///
/// Integers outside the known encoding are kept as `Unknown` so that a store
/// written by another tool survives a load/save cycle unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
    Unknown(i64),
}

impl Status {
    /// Human label used in the task table.
    pub fn label(self) -> &'static str {
        match self {
            Status::Done => "Done",
            Status::InProgress => "In Progress",
            Status::Todo => "Todo",
            Status::Unknown(_) => "Undefined",
        }
    }
}

impl From<i64> for Status {
    fn from(code: i64) -> Self {
        match code {
            -1 => Status::Todo,
            0 => Status::InProgress,
            1 => Status::Done,
            other => Status::Unknown(other),
        }
    }
}

impl From<Status> for i64 {
    fn from(status: Status) -> Self {
        match status {
            Status::Todo => -1,
            Status::InProgress => 0,
            Status::Done => 1,
            Status::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status filter accepted by `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFilter {
    Done,
    Todo,
    InProgress,
}

impl ListFilter {
    /// Heading printed above a non-empty filtered table.
    pub fn title(self) -> &'static str {
        match self {
            ListFilter::Done => "TASKS DONE",
            ListFilter::Todo => "TASKS TO DO",
            ListFilter::InProgress => "TASKS IN PROGRESS",
        }
    }

    /// Message printed when no task matches.
    pub fn empty_message(self) -> &'static str {
        match self {
            ListFilter::Done => "No task done.",
            ListFilter::Todo => "No task to do.",
            ListFilter::InProgress => "No task in progress.",
        }
    }
}

impl From<ListFilter> for Status {
    fn from(filter: ListFilter) -> Self {
        match filter {
            ListFilter::Done => Status::Done,
            ListFilter::Todo => Status::Todo,
            ListFilter::InProgress => Status::InProgress,
        }
    }
}
