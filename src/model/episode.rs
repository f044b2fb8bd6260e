use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ItemId;
use super::season::{LocationType, Season};
use super::series::Series;

/// A single episode.
///
/// `parent_index_number` is the physical season (where the file is filed),
/// `aired_season_number` the season it was broadcast under. The two differ
/// for specials shown within a regular season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: ItemId,
    pub name: String,
    pub series_id: ItemId,
    /// Lookup-only reference to the season folder holding this episode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_index_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aired_season_number: Option<u32>,
    /// For specials: the regular episode of the aired season this one precedes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airs_before_episode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premiere_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_missing: bool,
    #[serde(default)]
    pub location_type: LocationType,
}

impl Episode {
    pub fn new(
        series: &Series,
        season: Option<&Season>,
        season_number: Option<u32>,
        index_number: Option<u32>,
    ) -> Self {
        let name = match (season_number, index_number) {
            (Some(s), Some(e)) => format!("S{:02}E{:02}", s, e),
            (None, Some(e)) => format!("Episode {}", e),
            _ => "Episode".to_string(),
        };

        Self {
            id: ItemId::new(),
            name,
            series_id: series.id,
            season_id: season.map(|s| s.id),
            index_number,
            parent_index_number: season_number,
            aired_season_number: season_number,
            airs_before_episode: None,
            premiere_date: None,
            is_missing: false,
            location_type: LocationType::FileSystem,
        }
    }

    /// The catalog's folder parent: the season if filed in one, else the series
    pub fn parent_id(&self) -> ItemId {
        self.season_id.unwrap_or(self.series_id)
    }

    pub fn is_virtual(&self) -> bool {
        self.location_type == LocationType::Virtual
    }

    /// A placeholder for an announced episode that is not on disk
    pub fn is_missing_placeholder(&self) -> bool {
        self.is_missing && self.is_virtual()
    }

    pub fn is_special(&self) -> bool {
        self.parent_index_number == Some(0)
    }
}
