use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One indexed application, as stored in the `app_db` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationRecord {
    pub name: String,
    pub description: String,
    /// Path of the launch descriptor. Unique, compared case-insensitively.
    pub desktop_file: String,
    /// `name`, optionally extended with the executable name from the launch command.
    pub search_name: String,
}

/// Opaque icon handed to the UI. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IconHandle {
    Themed(String),
    File(PathBuf),
    Placeholder,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResultItem {
    pub name: String,
    pub description: String,
    pub desktop_file: String,
    pub icon: IconHandle,
}
