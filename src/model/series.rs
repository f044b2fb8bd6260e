// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::ids::{ItemId, ProviderIds};
use super::item::Item;

/// How the episodes of a series are numbered for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayOrder {
    #[default]
    Aired,
    Dvd,
    Absolute,
}

/// Broadcast status of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStatus {
    Continuing,
    Ended,
}

/// A link to an external site describing the series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalUrl {
    pub name: String,
    pub url: String,
}

/// A TV series, the root of a Series -> Season -> Episode tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub id: ItemId,
    pub name: String,
    /// Default presentation key assigned by the catalog
    pub presentation_key: String,
    #[serde(default)]
    pub provider_ids: ProviderIds,
    #[serde(default)]
    pub display_order: DisplayOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SeriesStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub air_days: Vec<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_year: Option<i32>,
    /// Per-series override of the library's metadata language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_metadata_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_last_media_added: Option<DateTime<Utc>>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        let id = ItemId::new();
        Self {
            id,
            name: name.into(),
            presentation_key: id.simple(),
            provider_ids: ProviderIds::default(),
            display_order: DisplayOrder::default(),
            status: None,
            air_days: Vec::new(),
            air_time: None,
            production_year: None,
            preferred_metadata_language: None,
            date_last_media_added: None,
        }
    }

    pub fn date_last_episode_added(&self) -> DateTime<Utc> {
        self.date_last_media_added.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// True when videos sit directly under the series instead of in season folders
    pub fn contains_episodes_without_season_folders(&self, children: &[Item]) -> bool {
        children
            .iter()
            .filter(|child| child.parent_id() == Some(self.id))
            .any(Item::is_video)
    }

    pub fn related_urls(&self) -> Vec<ExternalUrl> {
        let mut urls = Vec::new();

        if let Some(imdb) = self.provider_ids.imdb() {
            urls.push(ExternalUrl {
                name: "Trakt".to_string(),
                url: format!("https://trakt.tv/shows/{}", imdb),
            });
        }

        urls
    }

    /// Adopt a trailing "(YYYY)" from the name as the production year.
    ///
    /// Runs before a metadata refresh. Returns whether the series changed.
    pub fn fill_production_year_from_name(&mut self) -> bool {
        if self.production_year.is_some() {
            return false;
        }

        match year_in_name(&self.name) {
            Some(year) => {
                self.production_year = Some(year);
                true
            }
            None => false,
        }
    }
}

fn year_in_name(name: &str) -> Option<i32> {
    let inner = name.trim_end().strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let candidate = inner[open + 1..].trim();

    if candidate.len() != 4 || !candidate.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    candidate.parse().ok()
}
