//! Task store persistence and the operations built on it.
//!
//! The `Database` is the whole store: every command loads it in full, mutates
//! it in memory and, when something changed, writes it back in full. There is
//! no incremental persistence and no locking; concurrent writers race and the
//! last full rewrite wins.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::Builder;
use tracing::{debug, warn};

use crate::error::Error;
use crate::fields::Status;
use crate::task::{Task, TaskId};

/// Default store location, relative to the working directory.
pub const DEFAULT_DB: &str = "tasks.json";

/// Column widths of the task table: ID, Description, Status, Created At, Updated At.
pub const COL_WIDTHS: [usize; 5] = [5, 40, 15, 25, 25];

/// The persisted task collection plus its id counter.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub next_id: TaskId,
}

impl Database {
    /// Load the store from `path`.
    ///
    /// A missing file and unparseable contents both give an empty store. Only
    /// a failure to read an existing file is an error.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no task store yet");
                return Ok(Database::default());
            }
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let db = Self::from_json(&bytes);
        debug!(path = %path.display(), tasks = db.tasks.len(), next_id = db.next_id, "loaded task store");
        Ok(db)
    }

    /// Parse store contents, falling back to an empty store on any parse failure.
    pub fn from_json(bytes: &[u8]) -> Self {
        let mut db: Database = match serde_json::from_slice(bytes) {
            Ok(db) => db,
            Err(e) => {
                warn!("task store is unreadable, starting fresh: {e}");
                return Database::default();
            }
        };
        // A counter behind the highest id would hand out duplicates.
        if let Some(max) = db.tasks.iter().map(|t| t.id).max() {
            if db.next_id <= max {
                let Some(next_id) = max.checked_add(1) else {
                    warn!(max_id = max, "task ids out of range, starting fresh");
                    return Database::default();
                };
                warn!(next_id = db.next_id, max_id = max, "next_id behind existing ids, raising it");
                db.next_id = next_id;
            }
        }
        db
    }

    /// Serialize the store as 4-space indented JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Save the store to `path`, replacing the previous contents.
    ///
    /// Writes a temp file next to `path` and renames it into place. An existing
    /// store keeps its permissions.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let data = self.to_json()?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let write_err = |source: io::Error| Error::Write {
            path: path.to_path_buf(),
            source,
        };
        let existing = fs::metadata(path).ok().map(|m| m.permissions());
        let mut builder = Builder::new();
        #[cfg(unix)]
        if existing.is_none() {
            use std::os::unix::fs::PermissionsExt;
            // Same mode a plain create would get once the umask applies.
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;
        tmp.write_all(&data).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        if let Some(perms) = existing {
            tmp.as_file().set_permissions(perms).map_err(write_err)?;
        }
        tmp.persist(path).map_err(|e| write_err(e.error))?;
        debug!(path = %path.display(), tasks = self.tasks.len(), next_id = self.next_id, "saved task store");
        Ok(())
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Append a new `Todo` task and return its id.
    pub fn add(&mut self, description: String, now: &str) -> Result<TaskId, Error> {
        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(Error::IdsExhausted)?;
        self.tasks.push(Task::new(id, description, now));
        self.next_id = next_id;
        Ok(id)
    }

    /// Replace a task's description and refresh `updated_at`.
    /// Returns `false` when no task has `id`.
    pub fn update_description(&mut self, id: TaskId, description: String, now: &str) -> bool {
        let Some(t) = self.get_mut(id) else {
            return false;
        };
        t.description = description;
        t.updated_at = now.to_string();
        true
    }

    /// Set a task's status. `updated_at` is left as it was.
    /// Returns `false` when no task has `id`.
    pub fn set_status(&mut self, id: TaskId, status: Status) -> bool {
        let Some(t) = self.get_mut(id) else {
            return false;
        };
        t.status = status;
        true
    }

    /// Remove every task with `id` and return how many were removed.
    /// `next_id` is untouched, so removed ids are never handed out again.
    pub fn remove(&mut self, id: TaskId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        before - self.tasks.len()
    }

    /// Tasks in stored order, optionally restricted to one status.
    pub fn matching(&self, status: Option<Status>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .collect()
    }
}

fn format_row(cells: [&str; 5]) -> String {
    let [id, description, status, created, updated] = cells;
    let [w_id, w_desc, w_status, w_created, w_updated] = COL_WIDTHS;
    format!(
        "{id:<w_id$}{description:<w_desc$}{status:<w_status$}{created:<w_created$}{updated:>w_updated$}"
    )
}

/// Write tasks as a fixed-width table: header, dashed rule, one row per task.
pub fn write_table(out: &mut impl Write, tasks: &[&Task]) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format_row(["ID", "Description", "Status", "Created At", "Updated At"])
    )?;
    writeln!(out, "{}", "-".repeat(COL_WIDTHS.iter().sum()))?;
    for t in tasks {
        let id = t.id.to_string();
        writeln!(
            out,
            "{}",
            format_row([
                &id,
                &t.description,
                t.status.label(),
                &t.created_at,
                &t.updated_at,
            ])
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const T0: &str = "01 Jan 2026 10:00:00";
    const T1: &str = "02 Jan 2026 11:30:00";

    fn sample() -> Database {
        let mut db = Database::default();
        db.add("buy milk".to_string(), T0).unwrap();
        db.add("write report".to_string(), T0).unwrap();
        db.add("call bob".to_string(), T0).unwrap();
        db
    }

    #[test]
    fn ids_start_at_zero_and_increase() {
        let mut db = Database::default();
        assert_eq!(db.add("a".into(), T0).unwrap(), 0);
        assert_eq!(db.add("b".into(), T0).unwrap(), 1);
        assert_eq!(db.add("c".into(), T0).unwrap(), 2);
        assert_eq!(db.next_id, 3);
        assert_eq!(db.get(0).unwrap().status, Status::Todo);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut db = sample();
        assert_eq!(db.remove(2), 1);
        assert_eq!(db.remove(1), 1);
        assert_eq!(db.next_id, 3);
        assert_eq!(db.add("d".into(), T0).unwrap(), 3);
    }

    #[test]
    fn remove_missing_id_is_a_no_op() {
        let mut db = sample();
        assert_eq!(db.remove(42), 0);
        assert_eq!(db, sample());
    }

    #[test]
    fn update_changes_only_description_and_updated_at() {
        let mut db = sample();
        let before = db.get(1).unwrap().clone();
        assert!(db.update_description(1, "write summary".into(), T1));
        let after = db.get(1).unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.status, before.status);
        assert_eq!(after.description, "write summary");
        assert_eq!(after.updated_at, T1);
    }

    #[test]
    fn update_missing_id_reports_false() {
        let mut db = sample();
        assert!(!db.update_description(9, "x".into(), T1));
        assert_eq!(db, sample());
    }

    #[test]
    fn set_status_keeps_updated_at() {
        let mut db = sample();
        assert!(db.set_status(0, Status::InProgress));
        assert!(db.set_status(0, Status::Done));
        let t = db.get(0).unwrap();
        assert_eq!(t.status, Status::Done);
        assert_eq!(t.updated_at, T0);
        assert!(!db.set_status(7, Status::Done));
    }

    #[test]
    fn matching_keeps_insertion_order() {
        let mut db = sample();
        db.set_status(2, Status::Done);
        db.set_status(0, Status::Done);
        db.set_status(1, Status::InProgress);
        let done: Vec<TaskId> = db.matching(Some(Status::Done)).iter().map(|t| t.id).collect();
        assert_eq!(done, vec![0, 2]);
        let all: Vec<TaskId> = db.matching(None).iter().map(|t| t.id).collect();
        assert_eq!(all, vec![0, 1, 2]);
        assert!(db.matching(Some(Status::Todo)).is_empty());
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let mut db = sample();
        db.set_status(1, Status::Unknown(5));
        db.remove(0);
        let json = db.to_json().unwrap();
        assert_eq!(Database::from_json(&json), db);
    }

    #[test]
    fn json_uses_store_field_names() {
        let mut db = Database::default();
        db.add("buy milk".into(), T0).unwrap();
        let json = String::from_utf8(db.to_json().unwrap()).unwrap();
        let expected = r#"{
    "tasks": [
        {
            "id": 0,
            "description": "buy milk",
            "status": -1,
            "created-at": "01 Jan 2026 10:00:00",
            "updated-at": "01 Jan 2026 10:00:00"
        }
    ],
    "next_id": 1
}
"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn corrupt_contents_load_as_empty() {
        let bad_inputs: [&[u8]; 5] = [b"not json", b"[1, 2]", b"{\"tasks\": 3}", b"\xff\xfe", b""];
        for bad in bad_inputs {
            assert_eq!(Database::from_json(bad), Database::default());
        }
    }

    #[test]
    fn missing_keys_default() {
        assert_eq!(Database::from_json(b"{}"), Database::default());
        let db = Database::from_json(b"{\"next_id\": 4}");
        assert!(db.tasks.is_empty());
        assert_eq!(db.next_id, 4);
    }

    #[test]
    fn lagging_next_id_is_raised() {
        let json = br#"{"tasks": [{"id": 3, "description": "x", "status": 1,
            "created-at": "a", "updated-at": "b"}]}"#;
        let db = Database::from_json(json);
        assert_eq!(db.next_id, 4);
    }

    #[test]
    fn highest_possible_id_loads_as_empty() {
        let json = br#"{"tasks": [{"id": 9223372036854775807, "description": "x", "status": -1,
            "created-at": "a", "updated-at": "b"}], "next_id": 0}"#;
        assert_eq!(Database::from_json(json), Database::default());
    }

    #[test]
    fn add_refuses_when_ids_run_out() {
        let mut db = Database::from_json(b"{\"tasks\": [], \"next_id\": 9223372036854775807}");
        assert!(matches!(db.add("x".into(), T0), Err(Error::IdsExhausted)));
        assert!(db.tasks.is_empty());
        assert_eq!(db.next_id, TaskId::MAX);
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        Database::default().save(&path).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        sample().save(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let db = Database::load(&dir.path().join("tasks.json")).unwrap();
        assert_eq!(db, Database::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let db = sample();
        db.save(&path).unwrap();
        assert_eq!(Database::load(&path).unwrap(), db);

        let mut smaller = Database::default();
        smaller.next_id = 9;
        smaller.save(&path).unwrap();
        assert_eq!(Database::load(&path).unwrap(), smaller);
    }

    #[test]
    fn table_layout() {
        let mut db = Database::default();
        db.add("buy milk".into(), T0).unwrap();
        db.set_status(0, Status::Done);
        let mut out = Vec::new();
        write_table(&mut out, &db.matching(None)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            format!(
                "{:<5}{:<40}{:<15}{:<25}{:>25}",
                "ID", "Description", "Status", "Created At", "Updated At"
            )
        );
        assert_eq!(lines[1], "-".repeat(110));
        assert_eq!(
            lines[2],
            format!("{:<5}{:<40}{:<15}{:<25}{:>25}", "0", "buy milk", "Done", T0, T0)
        );
    }
}
