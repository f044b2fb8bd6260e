// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::grouping::GroupingKeyBuilder;
use crate::model::{Item, ItemId, ItemKind, Series};
use crate::order::{SortKey, sort_items};

/// Filter, sort and paging for a catalog listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Only items below an ancestor with this presentation key
    pub ancestor_presentation_key: Option<String>,
    /// Only items belonging to the series with this presentation key
    pub series_presentation_key: Option<String>,
    /// Empty means every kind
    pub include_item_types: Vec<ItemKind>,
    pub sort_by: Vec<SortKey>,
    pub is_virtual_item: Option<bool>,
    pub is_missing: Option<bool>,
    /// Ignored by counts
    pub limit: Option<usize>,
}

/// Read-only access to stored items
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Every item below the series, in catalog order
    async fn recursive_descendants(&self, series_id: ItemId) -> Result<Vec<Item>, CatalogError>;

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<Item>, CatalogError>;

    async fn count_items(&self, query: &ItemQuery) -> Result<usize, CatalogError>;

    /// Library roots that currently contain the series
    async fn collection_folders(&self, series: &Series) -> Result<Vec<ItemId>, CatalogError>;
}

/// A library root folder and the series found under it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryRoot {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub series: Vec<ItemId>,
}

/// Serialized catalog contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub libraries: Vec<LibraryRoot>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl CatalogSnapshot {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::SnapshotReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        serde_json::from_str(&content).map_err(|e| CatalogError::SnapshotParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Catalog held entirely in memory, listing items in snapshot order
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    libraries: Vec<LibraryRoot>,
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
    series_keys: HashMap<ItemId, String>,
}

impl InMemoryCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let index = snapshot
            .items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id(), pos))
            .collect();

        let series_keys = snapshot
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Series(series) => Some((series.id, series.presentation_key.clone())),
                _ => None,
            })
            .collect();

        Self {
            libraries: snapshot.libraries,
            items: snapshot.items,
            index,
            series_keys,
        }
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self::new(CatalogSnapshot {
            libraries: Vec::new(),
            items,
        })
    }

    /// Re-key every series with the grouping key, as the catalog does when
    /// cross-library grouping settings change
    pub fn apply_grouping<F>(&mut self, builder_for: F)
    where
        F: Fn(&Series) -> GroupingKeyBuilder,
    {
        let keys: Vec<(ItemId, String)> = self
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Series(series) => {
                    let roots = self.root_ids(series.id);
                    Some((series.id, builder_for(series).build_key(series, &roots)))
                }
                _ => None,
            })
            .collect();

        self.series_keys.extend(keys);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    /// Find a series by id or case-insensitive name
    pub fn find_series(&self, needle: &str) -> Option<&Series> {
        let by_id = needle.parse::<ItemId>().ok();

        self.items.iter().find_map(|item| match item {
            Item::Series(series)
                if Some(series.id) == by_id || series.name.eq_ignore_ascii_case(needle) =>
            {
                Some(series)
            }
            _ => None,
        })
    }

    fn root_ids(&self, series_id: ItemId) -> Vec<String> {
        self.libraries
            .iter()
            .filter(|root| root.series.contains(&series_id))
            .map(|root| root.id.simple())
            .collect()
    }

    /// Parent chain from the direct parent upwards
    fn ancestors(&self, item: &Item) -> Vec<&Item> {
        let mut chain = Vec::new();
        let mut next = item.parent_id();

        while let Some(id) = next {
            let Some(parent) = self.get(id) else { break };
            if chain.len() > self.items.len() {
                break;
            }
            chain.push(parent);
            next = parent.parent_id();
        }

        chain
    }

    fn key_of<'i>(&'i self, item: &'i Item) -> Option<&'i str> {
        match item {
            Item::Series(series) => self.series_keys.get(&series.id).map(String::as_str),
            Item::Season(season) => Some(&season.presentation_key),
            _ => None,
        }
    }

    fn series_key_of(&self, item: &Item) -> Option<&str> {
        let series_id = match item {
            Item::Series(_) => return None,
            Item::Season(season) => season.series_id,
            Item::Episode(episode) => episode.series_id,
            Item::Other(_) => self
                .ancestors(item)
                .into_iter()
                .find(|a| a.kind() == ItemKind::Series)?
                .id(),
        };
        self.series_keys.get(&series_id).map(String::as_str)
    }

    fn matches(&self, item: &Item, query: &ItemQuery) -> bool {
        if !query.include_item_types.is_empty() && !query.include_item_types.contains(&item.kind())
        {
            return false;
        }

        if query.is_virtual_item.is_some_and(|v| v != item.is_virtual()) {
            return false;
        }

        if query.is_missing.is_some_and(|m| m != item.is_missing()) {
            return false;
        }

        if let Some(wanted) = &query.series_presentation_key
            && !self
                .series_key_of(item)
                .is_some_and(|key| key.eq_ignore_ascii_case(wanted))
        {
            return false;
        }

        if let Some(wanted) = &query.ancestor_presentation_key
            && !self.ancestors(item).into_iter().any(|ancestor| {
                self.key_of(ancestor)
                    .is_some_and(|key| key.eq_ignore_ascii_case(wanted))
            })
        {
            return false;
        }

        true
    }

    fn query(&self, query: &ItemQuery) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| self.matches(item, query))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn recursive_descendants(&self, series_id: ItemId) -> Result<Vec<Item>, CatalogError> {
        if self.get(series_id).is_none() {
            return Err(CatalogError::ItemNotFound(series_id));
        }

        Ok(self
            .items
            .iter()
            .filter(|item| self.ancestors(item).iter().any(|a| a.id() == series_id))
            .cloned()
            .collect())
    }

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<Item>, CatalogError> {
        let mut items = self.query(query);
        sort_items(&mut items, &query.sort_by);
        if let Some(limit) = query.limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    async fn count_items(&self, query: &ItemQuery) -> Result<usize, CatalogError> {
        Ok(self.items.iter().filter(|item| self.matches(item, query)).count())
    }

    async fn collection_folders(&self, series: &Series) -> Result<Vec<ItemId>, CatalogError> {
        Ok(self
            .libraries
            .iter()
            .filter(|root| root.series.contains(&series.id))
            .map(|root| root.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Episode, LocationType, OtherItem, Season};
    use tempfile::tempdir;

    struct Tree {
        series: Series,
        season1: Season,
        catalog: InMemoryCatalog,
    }

    fn tree() -> Tree {
        let series = Series::new("Firefly");
        let other_series = Series::new("Serenity");
        let season1 = Season::new(&series, Some(1));
        let mut missing = Episode::new(&series, Some(&season1), Some(1), Some(3));
        missing.is_missing = true;
        missing.location_type = LocationType::Virtual;

        let items = vec![
            Item::Series(series.clone()),
            Item::Season(season1.clone()),
            Item::Episode(Episode::new(&series, Some(&season1), Some(1), Some(2))),
            Item::Episode(Episode::new(&series, Some(&season1), Some(1), Some(1))),
            Item::Episode(missing),
            Item::Other(OtherItem::new(series.id, "Trailer", true)),
            Item::Series(other_series.clone()),
            Item::Episode(Episode::new(&other_series, None, Some(1), Some(1))),
        ];

        Tree {
            series,
            season1,
            catalog: InMemoryCatalog::from_items(items),
        }
    }

    #[tokio::test]
    async fn descendants_keep_catalog_order() {
        let t = tree();
        let descendants = t.catalog.recursive_descendants(t.series.id).await.unwrap();

        let kinds: Vec<_> = descendants.iter().map(Item::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ItemKind::Season,
                ItemKind::Episode,
                ItemKind::Episode,
                ItemKind::Episode,
                ItemKind::Other
            ]
        );
    }

    #[tokio::test]
    async fn descendants_of_unknown_series_fail() {
        let t = tree();
        let err = t.catalog.recursive_descendants(ItemId::new()).await.unwrap_err();
        assert!(matches!(err, CatalogError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_sorts_and_limits() {
        let t = tree();
        let query = ItemQuery {
            series_presentation_key: Some(t.series.presentation_key.clone()),
            include_item_types: vec![ItemKind::Episode],
            sort_by: vec![SortKey::SortName],
            is_missing: Some(false),
            ..Default::default()
        };

        let episodes = t.catalog.list_items(&query).await.unwrap();
        let numbers: Vec<_> = episodes
            .iter()
            .filter_map(Item::as_episode)
            .map(|e| e.index_number)
            .collect();
        assert_eq!(numbers, vec![Some(1), Some(2)]);

        let limited = t
            .catalog
            .list_items(&ItemQuery {
                limit: Some(1),
                ..query.clone()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);

        let count = t
            .catalog
            .count_items(&ItemQuery {
                limit: Some(0),
                ..query
            })
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn ancestor_filter_uses_season_key() {
        let t = tree();
        let query = ItemQuery {
            ancestor_presentation_key: Some(t.season1.presentation_key.to_uppercase()),
            ..Default::default()
        };

        assert_eq!(t.catalog.count_items(&query).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn ancestor_filter_uses_series_key() {
        let t = tree();
        let query = ItemQuery {
            ancestor_presentation_key: Some(t.series.presentation_key.clone()),
            include_item_types: vec![ItemKind::Episode, ItemKind::Other],
            ..Default::default()
        };

        let items = t.catalog.list_items(&query).await.unwrap();
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|item| item.id() != t.season1.id));
    }

    #[tokio::test]
    async fn grouping_rekeys_series() {
        let mut t = tree();
        let mut series = t.series.clone();
        series.provider_ids.tvdb = Some("78874".to_string());

        let mut items = t.catalog.items().to_vec();
        items[0] = Item::Series(series.clone());
        let root = LibraryRoot {
            id: ItemId::new(),
            name: "TV".to_string(),
            series: vec![series.id],
        };
        t.catalog = InMemoryCatalog::new(CatalogSnapshot {
            libraries: vec![root.clone()],
            items,
        });
        t.catalog
            .apply_grouping(|_| GroupingKeyBuilder::new(true, Some("en".to_string())));

        let key = format!("78874-en-{}", root.id.simple());
        let query = ItemQuery {
            series_presentation_key: Some(key),
            include_item_types: vec![ItemKind::Season],
            ..Default::default()
        };
        assert_eq!(t.catalog.count_items(&query).await.unwrap(), 1);
        assert_eq!(t.catalog.collection_folders(&series).await.unwrap(), vec![root.id]);
    }

    #[test]
    fn finds_series_by_name_or_id() {
        let t = tree();
        assert_eq!(t.catalog.find_series("firefly").map(|s| s.id), Some(t.series.id));
        assert_eq!(
            t.catalog.find_series(&t.series.id.to_string()).map(|s| s.id),
            Some(t.series.id)
        );
        assert!(t.catalog.find_series("Dollhouse").is_none());
    }

    #[tokio::test]
    async fn demo_snapshot_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/catalog.json");
        let catalog = InMemoryCatalog::new(CatalogSnapshot::load(&path).unwrap());

        let series = catalog.find_series("Sherlock (2010)").unwrap().clone();
        let descendants = catalog.recursive_descendants(series.id).await.unwrap();
        assert_eq!(descendants.len(), 7);
        assert_eq!(catalog.collection_folders(&series).await.unwrap().len(), 1);
    }

    #[test]
    fn snapshot_loads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let t = tree();
        let snapshot = CatalogSnapshot {
            libraries: Vec::new(),
            items: t.catalog.items().to_vec(),
        };
        std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let loaded = CatalogSnapshot::load(&path).unwrap();
        assert_eq!(loaded.items.len(), 8);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            CatalogSnapshot::load(&path),
            Err(CatalogError::SnapshotParseFailed { .. })
        ));
    }
}
