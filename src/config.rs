// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Series, non_blank};

/// Server-wide display and metadata settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfiguration {
    /// Show specials inside the season they aired in
    pub display_specials_within_seasons: bool,
    pub preferred_metadata_language: Option<String>,
}

/// Settings of the library a series lives in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryOptions {
    /// Merge the same series found under several library roots
    pub enable_automatic_series_grouping: bool,
    pub preferred_metadata_language: Option<String>,
}

/// Per-user display settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfiguration {
    pub display_missing_episodes: bool,
}

/// Read access to configuration, handed to components that need it
pub trait ConfigurationService: Send + Sync {
    fn server(&self) -> ServerConfiguration;

    fn library_options(&self, series: &Series) -> LibraryOptions;

    /// Series override, then library, then server default
    fn preferred_metadata_language(&self, series: &Series) -> Option<String> {
        if let Some(lang) = non_blank(series.preferred_metadata_language.as_deref()) {
            return Some(lang.to_string());
        }

        let library = self.library_options(series);
        if let Some(lang) = non_blank(library.preferred_metadata_language.as_deref()) {
            return Some(lang.to_string());
        }

        let server = self.server();
        non_blank(server.preferred_metadata_language.as_deref()).map(String::from)
    }
}

/// Settings file contents. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfiguration,
    pub library: LibraryOptions,
    pub user: UserConfiguration,
}

impl Settings {
    /// Load settings from a JSON file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration backed by fixed values, one library for every series
#[derive(Debug, Clone, Default)]
pub struct StaticConfiguration {
    pub server: ServerConfiguration,
    pub library: LibraryOptions,
}

impl From<&Settings> for StaticConfiguration {
    fn from(settings: &Settings) -> Self {
        Self {
            server: settings.server.clone(),
            library: settings.library.clone(),
        }
    }
}

impl ConfigurationService for StaticConfiguration {
    fn server(&self) -> ServerConfiguration {
        self.server.clone()
    }

    fn library_options(&self, _series: &Series) -> LibraryOptions {
        self.library.clone()
    }
}
