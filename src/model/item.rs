use std::fmt;

use serde::{Deserialize, Serialize};

use super::episode::Episode;
use super::ids::ItemId;
use super::season::{LocationType, Season};
use super::series::Series;

/// A descendant that is neither a season nor an episode (extras, loose videos)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherItem {
    pub id: ItemId,
    pub name: String,
    pub parent_id: ItemId,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub location_type: LocationType,
}

impl OtherItem {
    pub fn new(parent_id: ItemId, name: impl Into<String>, is_video: bool) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            parent_id,
            is_video,
            location_type: LocationType::FileSystem,
        }
    }
}

/// Type tag used in catalog queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Series,
    Season,
    Episode,
    Other,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Series => write!(f, "Series"),
            ItemKind::Season => write!(f, "Season"),
            ItemKind::Episode => write!(f, "Episode"),
            ItemKind::Other => write!(f, "Item"),
        }
    }
}

/// Any entity the catalog can return
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Series(Series),
    Season(Season),
    Episode(Episode),
    Other(OtherItem),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Item::Series(s) => s.id,
            Item::Season(s) => s.id,
            Item::Episode(e) => e.id,
            Item::Other(o) => o.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Series(s) => &s.name,
            Item::Season(s) => &s.name,
            Item::Episode(e) => &e.name,
            Item::Other(o) => &o.name,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Series(_) => ItemKind::Series,
            Item::Season(_) => ItemKind::Season,
            Item::Episode(_) => ItemKind::Episode,
            Item::Other(_) => ItemKind::Other,
        }
    }

    /// Folder parent within the tree; series are roots
    pub fn parent_id(&self) -> Option<ItemId> {
        match self {
            Item::Series(_) => None,
            Item::Season(s) => Some(s.series_id),
            Item::Episode(e) => Some(e.parent_id()),
            Item::Other(o) => Some(o.parent_id),
        }
    }

    pub fn location_type(&self) -> LocationType {
        match self {
            Item::Series(_) => LocationType::FileSystem,
            Item::Season(s) => s.location_type,
            Item::Episode(e) => e.location_type,
            Item::Other(o) => o.location_type,
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.location_type() == LocationType::Virtual
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Item::Season(s) => s.is_missing,
            Item::Episode(e) => e.is_missing,
            _ => false,
        }
    }

    pub fn is_video(&self) -> bool {
        match self {
            Item::Episode(_) => true,
            Item::Other(o) => o.is_video,
            _ => false,
        }
    }

    pub fn as_season(&self) -> Option<&Season> {
        match self {
            Item::Season(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_episode(&self) -> Option<&Episode> {
        match self {
            Item::Episode(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_season(self) -> Option<Season> {
        match self {
            Item::Season(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_episode(self) -> Option<Episode> {
        match self {
            Item::Episode(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_parent_falls_back_to_series() {
        let series = Series::new("Firefly");
        let season = Season::new(&series, Some(1));

        let filed = Item::Episode(Episode::new(&series, Some(&season), Some(1), Some(1)));
        let loose = Item::Episode(Episode::new(&series, None, None, Some(2)));

        assert_eq!(filed.parent_id(), Some(season.id));
        assert_eq!(loose.parent_id(), Some(series.id));
        assert_eq!(Item::Series(series).parent_id(), None);
    }

    #[test]
    fn deserializes_tagged_items() {
        let json = r#"{
            "type": "episode",
            "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "name": "Pilot",
            "series_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "parent_index_number": 0,
            "aired_season_number": 5,
            "is_missing": true,
            "location_type": "virtual"
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.kind(), ItemKind::Episode);
        assert!(item.is_virtual());
        assert!(item.is_missing());
        let episode = item.as_episode().unwrap();
        assert_eq!(episode.parent_index_number, Some(0));
        assert_eq!(episode.aired_season_number, Some(5));
        assert_eq!(episode.season_id, None);
    }
}
