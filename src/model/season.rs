use serde::{Deserialize, Serialize};

use super::ids::ItemId;
use super::series::Series;

/// Whether an item is backed by content on disk or is a placeholder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    #[default]
    FileSystem,
    Virtual,
}

/// A season of a series. An absent index means specials/unassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: ItemId,
    pub name: String,
    pub series_id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_number: Option<u32>,
    #[serde(default)]
    pub location_type: LocationType,
    /// Presentation key assigned by the catalog, compared case-insensitively
    pub presentation_key: String,
    #[serde(default)]
    pub is_missing: bool,
}

impl Season {
    pub fn new(series: &Series, index_number: Option<u32>) -> Self {
        let (name, suffix) = match index_number {
            Some(0) => ("Specials".to_string(), "000".to_string()),
            Some(n) => (format!("Season {}", n), format!("{:03}", n)),
            None => ("Season Unknown".to_string(), "unknown".to_string()),
        };

        Self {
            id: ItemId::new(),
            name,
            series_id: series.id,
            index_number,
            location_type: LocationType::FileSystem,
            presentation_key: format!("{}-{}", series.presentation_key, suffix),
            is_missing: false,
        }
    }

    /// The placeholder season that collects episodes with no season number
    pub fn virtual_unknown(series: &Series) -> Self {
        Self {
            location_type: LocationType::Virtual,
            ..Self::new(series, None)
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.location_type == LocationType::Virtual
    }
}
