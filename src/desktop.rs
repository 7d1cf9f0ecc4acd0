use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result};

use crate::app_db::AppDescriptor;

/// The handful of `[Desktop Entry]` keys the index cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub path: String,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub exec: Option<String>,
    pub icon: Option<String>,
    pub no_display: bool,
    pub hidden: bool,
}

impl DesktopEntry {
    /// Entries without a name, or flagged `NoDisplay`/`Hidden`, stay out of the index.
    pub fn is_listed(&self) -> bool {
        !self.no_display && !self.hidden && self.name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

impl AppDescriptor for DesktopEntry {
    fn filename(&self) -> &str {
        &self.path
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    fn description(&self) -> &str {
        self.comment.as_deref().unwrap_or_default()
    }

    fn launch_command(&self) -> Option<&str> {
        self.exec.as_deref()
    }
}

pub fn read_entry(path: &Path) -> Result<DesktopEntry> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read desktop entry {}", path.display()))?;
    Ok(parse_entry(&path.to_string_lossy(), &content))
}

pub fn parse_entry(path: &str, content: &str) -> DesktopEntry {
    let section = desktop_entry_section(content);
    let flag = |key: &str| section.get(key).is_some_and(|value| value == "true");

    DesktopEntry {
        path: path.to_string(),
        name: section.get("Name").cloned(),
        comment: section.get("Comment").cloned(),
        exec: section.get("Exec").cloned(),
        icon: section.get("Icon").cloned(),
        no_display: flag("NoDisplay"),
        hidden: flag("Hidden"),
    }
}

fn desktop_entry_section(content: &str) -> HashMap<&str, String> {
    let mut section = HashMap::with_capacity(16);
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_desktop_entry = line == "[Desktop Entry]";
            continue;
        }
        if !in_desktop_entry {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            // Localized variants such as `Name[de]` are ignored.
            if key.contains('[') {
                continue;
            }
            section.entry(key).or_insert_with(|| value.trim().to_string());
        }
    }
    section
}
