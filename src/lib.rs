//! # task-cli - Single-user task tracker
//!
//! Keeps a list of tasks in a local JSON file and lets you add, update,
//! delete, mark and list them from the command line.
//!
//! ## Quick Start
//!
//! ```bash
//! task-cli add "Buy groceries"
//! task-cli mark-in-progress 0
//! task-cli mark-done 0
//! task-cli list done
//! ```
//!
//! ## Storage
//!
//! The store defaults to `tasks.json` in the working directory (override with
//! `--db <path>`). It holds two keys:
//!
//! - `tasks`: the tasks in insertion order, each with `id`, `description`,
//!   `status` (`-1` todo, `0` in progress, `1` done), `created-at` and
//!   `updated-at`.
//! - `next_id`: the id the next added task receives. Ids are never reused.
//!
//! A missing or unreadable store is treated as empty. Each command loads the
//! whole file and, if it changed anything, rewrites the whole file.

pub mod cli;
pub mod cmd;
pub mod db;
pub mod error;
pub mod fields;
pub mod task;
