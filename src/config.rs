use std::{fs, path::PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    app_db::DbLocation,
    ranking::{DEFAULT_LIMIT, DEFAULT_MIN_SCORE},
};

const CONFIG_FILE: &str = "config.json";
const MIN_RESULT_LIMIT: usize = 1;
const MAX_RESULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: Option<PathBuf>,
    pub application_dirs: Vec<PathBuf>,
    pub max_results: usize,
    pub min_score: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut application_dirs = vec![
            PathBuf::from("/usr/share/applications"),
            PathBuf::from("/usr/local/share/applications"),
        ];
        if let Some(data_dir) = dirs::data_dir() {
            application_dirs.push(data_dir.join("applications"));
        }
        Self {
            database_path: None,
            application_dirs,
            max_results: DEFAULT_LIMIT,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("appdb").join(CONFIG_FILE))
    }

    /// Read the user's config, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };
        Self::from_json(&content).unwrap_or_else(|err| {
            warn!("failed to parse config {:?}: {err}", path);
            Self::default()
        })
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn result_limit(&self) -> usize {
        self.max_results.clamp(MIN_RESULT_LIMIT, MAX_RESULT_LIMIT)
    }

    pub fn db_location(&self) -> DbLocation {
        match &self.database_path {
            Some(path) => DbLocation::from(path.clone()),
            None => dirs::cache_dir()
                .map(|dir| DbLocation::File(dir.join("appdb").join("apps.db")))
                .unwrap_or(DbLocation::Memory),
        }
    }
}
