use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::{
    error::StorageError,
    icons::{IconCache, IconLoader, PlaceholderIconLoader},
    models::{ApplicationRecord, ResultItem},
    ranking::{rank, RankedMatch, DEFAULT_LIMIT, DEFAULT_MIN_SCORE},
    results::build_result,
    search_name,
};

const MEMORY_MARKER: &str = ":memory:";

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS app_db (
    name TEXT NOT NULL COLLATE NOCASE,
    desktop_file TEXT NOT NULL UNIQUE COLLATE NOCASE,
    description TEXT NOT NULL DEFAULT '',
    search_name TEXT NOT NULL COLLATE NOCASE
);
";

const RECORD_COLUMNS: &str = "name, desktop_file, description, search_name";

/// Anything the index can register: a launch descriptor path plus the
/// metadata read from it.
pub trait AppDescriptor {
    fn filename(&self) -> &str;
    fn display_name(&self) -> &str;
    fn description(&self) -> &str;
    /// Raw `Exec` line, if the descriptor has one.
    fn launch_command(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    Memory,
    File(PathBuf),
}

impl From<&str> for DbLocation {
    fn from(value: &str) -> Self {
        if value == MEMORY_MARKER {
            Self::Memory
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl From<PathBuf> for DbLocation {
    fn from(value: PathBuf) -> Self {
        if value.as_os_str() == MEMORY_MARKER {
            Self::Memory
        } else {
            Self::File(value)
        }
    }
}

impl From<&Path> for DbLocation {
    fn from(value: &Path) -> Self {
        Self::from(value.to_path_buf())
    }
}

impl DbLocation {
    fn describe(&self) -> String {
        match self {
            Self::Memory => MEMORY_MARKER.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Persistent table of installed applications, plus the icons resolved for
/// them during this run.
pub struct AppDb {
    conn: Connection,
    icons: IconCache,
    icon_loader: Box<dyn IconLoader>,
    limit: usize,
    min_score: i64,
}

impl AppDb {
    /// Open or create the table at `location`.
    pub fn open(location: impl Into<DbLocation>) -> Result<Self, StorageError> {
        let location = location.into();
        let conn = match &location {
            DbLocation::Memory => Connection::open_in_memory(),
            DbLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Connection::open(path)
            }
        }
        .map_err(|source| StorageError::Open {
            location: location.describe(),
            source,
        })?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(StorageError::Schema)?;
        debug!("opened app database at {}", location.describe());

        Ok(Self {
            conn,
            icons: IconCache::new(),
            icon_loader: Box::new(PlaceholderIconLoader),
            limit: DEFAULT_LIMIT,
            min_score: DEFAULT_MIN_SCORE,
        })
    }

    pub fn with_icon_loader(mut self, loader: impl IconLoader + 'static) -> Self {
        self.icon_loader = Box::new(loader);
        self
    }

    /// Bound on results per query and the score a match must reach.
    pub fn with_ranking(mut self, limit: usize, min_score: i64) -> Self {
        self.limit = limit;
        self.min_score = min_score;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn min_score(&self) -> i64 {
        self.min_score
    }

    /// Insert or fully overwrite the record keyed by the descriptor's filename.
    pub fn put(&mut self, app: &dyn AppDescriptor) -> Result<(), StorageError> {
        let record = ApplicationRecord {
            name: app.display_name().to_string(),
            description: app.description().to_string(),
            desktop_file: app.filename().to_string(),
            search_name: search_name::derive(app.display_name(), app.launch_command()),
        };
        self.put_record(&record)
    }

    pub fn put_record(&mut self, record: &ApplicationRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO app_db (name, desktop_file, description, search_name)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(desktop_file) DO UPDATE SET
                name = excluded.name,
                desktop_file = excluded.desktop_file,
                description = excluded.description,
                search_name = excluded.search_name",
            params![
                record.name,
                record.desktop_file,
                record.description,
                record.search_name
            ],
        )?;
        debug!("stored {} as {:?}", record.desktop_file, record.search_name);
        Ok(())
    }

    pub fn get_by_path(&self, desktop_file: &str) -> Result<Option<ApplicationRecord>, StorageError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM app_db WHERE desktop_file = ?1");
        let record = self
            .conn
            .query_row(&sql, params![desktop_file], record_from_row)
            .optional()?;
        Ok(record)
    }

    /// First record (in enumeration order) whose name matches.
    pub fn get_by_name(&self, name: &str) -> Result<Option<ApplicationRecord>, StorageError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM app_db WHERE name = ?1 ORDER BY rowid LIMIT 1"
        );
        let record = self
            .conn
            .query_row(&sql, params![name], record_from_row)
            .optional()?;
        Ok(record)
    }

    /// Removing a key that is not stored is a no-op.
    pub fn remove_by_path(&mut self, desktop_file: &str) -> Result<(), StorageError> {
        let removed = self.conn.execute(
            "DELETE FROM app_db WHERE desktop_file = ?1",
            params![desktop_file],
        )?;
        debug!("removed {removed} record(s) for {desktop_file}");
        Ok(())
    }

    pub fn get_records(&self) -> Result<Vec<ApplicationRecord>, StorageError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM app_db ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn get_icons(&mut self) -> &mut IconCache {
        &mut self.icons
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM app_db", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM app_db", [])?;
        Ok(())
    }

    /// Scored matches for `query` over `records`, best first.
    pub fn find_ranked<'a>(
        &self,
        records: &'a [ApplicationRecord],
        query: &str,
    ) -> Vec<RankedMatch<'a>> {
        rank(records, query, self.min_score, self.limit)
    }

    /// Ranked results for one keystroke's worth of query text.
    pub fn find(&mut self, query: &str) -> Result<Vec<ResultItem>, StorageError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.get_records()?;
        let ranked = rank(&records, query, self.min_score, self.limit);
        debug!(
            "query {query:?}: {} of {} records matched",
            ranked.len(),
            records.len()
        );

        let loader = self.icon_loader.as_ref();
        let icons = &mut self.icons;
        Ok(ranked
            .iter()
            .map(|matched| build_result(matched.record, icons, loader))
            .collect())
    }

    /// Release the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<(), StorageError> {
        self.conn.close().map_err(|(_, err)| StorageError::Query(err))
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ApplicationRecord> {
    Ok(ApplicationRecord {
        name: row.get(0)?,
        desktop_file: row.get(1)?,
        description: row.get(2)?,
        search_name: row.get(3)?,
    })
}
