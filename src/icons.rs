use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

use crate::{desktop, models::IconHandle};

/// Resolves the icon for a launch descriptor. Implemented outside the core
/// (theme lookup, rasterization); the store only caches what it returns.
pub trait IconLoader {
    fn load_icon(&self, desktop_file: &str) -> Result<IconHandle>;
}

/// Loader used when the host installs none.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderIconLoader;

impl IconLoader for PlaceholderIconLoader {
    fn load_icon(&self, _desktop_file: &str) -> Result<IconHandle> {
        Ok(IconHandle::Placeholder)
    }
}

/// Reads the `Icon` key of the desktop entry the record points at.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopIconLoader;

impl IconLoader for DesktopIconLoader {
    fn load_icon(&self, desktop_file: &str) -> Result<IconHandle> {
        let entry = desktop::read_entry(Path::new(desktop_file))?;
        let icon = entry
            .icon
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("{desktop_file} declares no icon"))?;
        if icon.starts_with('/') {
            Ok(IconHandle::File(PathBuf::from(icon)))
        } else {
            Ok(IconHandle::Themed(icon))
        }
    }
}

/// Icons resolved during this run, keyed by desktop file with the same ASCII
/// case folding the store uses. Filled lazily and never evicted.
#[derive(Debug, Default)]
pub struct IconCache {
    entries: HashMap<String, IconHandle>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, desktop_file: &str) -> Option<&IconHandle> {
        self.entries.get(&desktop_file.to_ascii_lowercase())
    }

    pub fn insert(&mut self, desktop_file: impl AsRef<str>, icon: IconHandle) {
        self.entries
            .insert(desktop_file.as_ref().to_ascii_lowercase(), icon);
    }

    pub fn contains(&self, desktop_file: &str) -> bool {
        self.entries.contains_key(&desktop_file.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
