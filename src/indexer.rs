use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    app_db::AppDb,
    desktop::{self, DesktopEntry},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub added_or_updated: usize,
    pub removed: usize,
}

/// Read every listed `*.desktop` file directly inside `dirs`.
pub fn scan_desktop_entries(dirs: &[PathBuf]) -> Vec<DesktopEntry> {
    let mut entries = Vec::with_capacity(200);
    for dir in dirs {
        if !dir.is_dir() {
            debug!("skipping application dir {}: not a directory", dir.display());
            continue;
        }

        for entry in WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            let path = entry.path();
            if !is_desktop_file(path) {
                continue;
            }
            match desktop::read_entry(path) {
                Ok(entry) if entry.is_listed() => entries.push(entry),
                Ok(_) => debug!("{} is not listed", path.display()),
                Err(err) => warn!("{err:#}"),
            }
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    entries.retain(|entry| seen.insert(entry.path.to_ascii_lowercase()));
    debug!("scanned {} desktop entries", entries.len());
    entries
}

/// Make the store hold exactly `entries`: put each one and drop records
/// whose desktop file is no longer among them.
pub fn sync_index(db: &mut AppDb, entries: &[DesktopEntry]) -> Result<IndexSummary> {
    let mut summary = IndexSummary::default();
    let mut current: HashSet<String> = HashSet::with_capacity(entries.len());
    for entry in entries {
        db.put(entry)?;
        current.insert(entry.path.to_ascii_lowercase());
        summary.added_or_updated += 1;
    }

    for record in db.get_records()? {
        if !current.contains(&record.desktop_file.to_ascii_lowercase()) {
            db.remove_by_path(&record.desktop_file)?;
            summary.removed += 1;
        }
    }

    info!(
        "indexed {} applications, removed {} stale",
        summary.added_or_updated, summary.removed
    );
    Ok(summary)
}

pub fn index_applications(db: &mut AppDb, dirs: &[PathBuf]) -> Result<IndexSummary> {
    let entries = scan_desktop_entries(dirs);
    sync_index(db, &entries)
}

/// Scan `dirs` off the async runtime, then sync the store with the result.
pub async fn reindex(db: &mut AppDb, dirs: Vec<PathBuf>) -> Result<IndexSummary> {
    reindex_with(db, move || scan_desktop_entries(&dirs)).await
}

/// A scan that fails to complete leaves the store untouched; syncing against
/// an empty list would drop every record.
pub async fn reindex_with<F>(db: &mut AppDb, scan: F) -> Result<IndexSummary>
where
    F: FnOnce() -> Vec<DesktopEntry> + Send + 'static,
{
    let entries = tokio::task::spawn_blocking(scan)
        .await
        .context("desktop entry scan failed")?;
    sync_index(db, &entries)
}

fn is_desktop_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("desktop")
}
