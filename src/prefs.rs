//! Preferences that survive across sessions: the best score and the
//! preferred speed. Both live in one small JSON file that is read once at
//! startup and rewritten on every change.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SPEED: u16 = 7;
pub const MIN_SPEED: u16 = 1;
pub const MAX_SPEED: u16 = 15;

/// The persisted values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Highest score ever reached; only increases
    pub best_score: u32,
    /// Simulation speed in ticks per second
    pub speed: u16,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            best_score: 0,
            speed: DEFAULT_SPEED,
        }
    }
}

/// Disk-backed preference store. A missing or malformed file silently
/// falls back to the defaults; failed writes are logged and the in-memory
/// values stay authoritative for the rest of the session.
pub struct PrefsStore {
    path: PathBuf,
    prefs: Preferences,
}

impl PrefsStore {
    pub fn load(path: &Path) -> Self {
        let mut prefs = match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Preferences>(&raw) {
                Ok(prefs) => prefs,
                Err(err) => {
                    warn!(
                        "ignoring malformed preferences in {}: {err}",
                        path.display()
                    );
                    Preferences::default()
                }
            },
            Err(_) => Preferences::default(),
        };
        prefs.speed = prefs.speed.clamp(MIN_SPEED, MAX_SPEED);

        Self {
            path: path.to_path_buf(),
            prefs,
        }
    }

    pub fn best_score(&self) -> u32 {
        self.prefs.best_score
    }

    pub fn speed(&self) -> u16 {
        self.prefs.speed
    }

    /// Raise the best score if `score` beats it. Returns whether it changed.
    pub fn record_score(&mut self, score: u32) -> bool {
        if score <= self.prefs.best_score {
            return false;
        }
        self.prefs.best_score = score;
        self.persist();
        true
    }

    /// Set the preferred speed, clamped to the supported range. Returns
    /// the speed actually in effect.
    pub fn set_speed(&mut self, speed: u16) -> u16 {
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        if speed != self.prefs.speed {
            self.prefs.speed = speed;
            self.persist();
        }
        speed
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            error!("failed to save preferences: {err:#}");
        }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&self.prefs).context("serializing preferences")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing preferences to {}", self.path.display()))
    }
}
