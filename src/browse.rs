// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::aggregate::aggregate_series_episodes;
use crate::catalog::{CatalogService, ItemQuery};
use crate::config::{ConfigurationService, UserConfiguration};
use crate::error::CatalogError;
use crate::grouping::GroupingKeyBuilder;
use crate::model::{Episode, Item, ItemKind, Season, Series};
use crate::order::{SortKey, season_sort_key, sort_episodes};
use crate::resolve::{EpisodeSeasonResolver, SeasonLookup};

/// Season and episode views of one series, read through the catalog
pub struct SeriesBrowser<'a, C: ?Sized, G: ?Sized> {
    catalog: &'a C,
    config: &'a G,
}

impl<'a, C, G> SeriesBrowser<'a, C, G>
where
    C: CatalogService + ?Sized,
    G: ConfigurationService + ?Sized,
{
    pub fn new(catalog: &'a C, config: &'a G) -> Self {
        Self { catalog, config }
    }

    /// The key the catalog groups this series under
    pub async fn presentation_key(&self, series: &Series) -> Result<String, CatalogError> {
        let library = self.config.library_options(series);
        if !library.enable_automatic_series_grouping {
            return Ok(series.presentation_key.clone());
        }

        let roots: Vec<String> = self
            .catalog
            .collection_folders(series)
            .await?
            .iter()
            .map(|id| id.simple())
            .collect();

        let builder = GroupingKeyBuilder::new(true, self.config.preferred_metadata_language(series));
        Ok(builder.build_key(series, &roots))
    }

    pub async fn get_seasons(
        &self,
        series: &Series,
        user: &UserConfiguration,
    ) -> Result<Vec<Season>, CatalogError> {
        let query = ItemQuery {
            series_presentation_key: Some(self.presentation_key(series).await?),
            include_item_types: vec![ItemKind::Season],
            sort_by: vec![SortKey::SortName],
            is_missing: missing_filter(user),
            ..Default::default()
        };

        Ok(self
            .catalog
            .list_items(&query)
            .await?
            .into_iter()
            .filter_map(Item::into_season)
            .collect())
    }

    /// Every episode of the series, season by season, each listed once
    pub async fn get_episodes(
        &self,
        series: &Series,
        user: &UserConfiguration,
    ) -> Result<Vec<Episode>, CatalogError> {
        let query = ItemQuery {
            series_presentation_key: Some(self.presentation_key(series).await?),
            include_item_types: vec![ItemKind::Episode, ItemKind::Season],
            sort_by: vec![SortKey::SortName],
            is_missing: missing_filter(user),
            ..Default::default()
        };

        let mut seasons = Vec::new();
        let mut episodes = Vec::new();
        for item in self.catalog.list_items(&query).await? {
            match item {
                Item::Season(season) => seasons.push(season),
                Item::Episode(episode) => episodes.push(episode),
                _ => {}
            }
        }

        let include_specials = self.include_specials();
        let views = seasons
            .iter()
            .map(|season| season_view(&episodes, season, &seasons, include_specials));

        Ok(aggregate_series_episodes(views)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Episodes shown under one season, sorted for display
    pub async fn get_season_episodes(
        &self,
        series: &Series,
        season: &Season,
        user: &UserConfiguration,
    ) -> Result<Vec<Episode>, CatalogError> {
        let include_specials = self.include_specials();

        // Specials filed under season 0 are only candidates when querying the whole series
        let mut query = ItemQuery {
            include_item_types: vec![ItemKind::Episode],
            sort_by: vec![SortKey::SortName],
            is_missing: missing_filter(user),
            ..Default::default()
        };
        if include_specials {
            query.series_presentation_key = Some(self.presentation_key(series).await?);
        } else {
            query.ancestor_presentation_key = Some(season.presentation_key.clone());
        }

        let episodes: Vec<Episode> = self
            .catalog
            .list_items(&query)
            .await?
            .into_iter()
            .filter_map(Item::into_episode)
            .collect();

        Ok(self.season_episodes_from(season, &episodes))
    }

    /// Season view over an already fetched episode list
    pub fn season_episodes_from(&self, season: &Season, episodes: &[Episode]) -> Vec<Episode> {
        // Only the target season can satisfy the parent-folder fallback
        season_view(episodes, season, std::slice::from_ref(season), self.include_specials())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of seasons on disk
    pub async fn child_count(&self, series: &Series) -> Result<usize, CatalogError> {
        self.count_non_virtual(series, ItemKind::Season).await
    }

    /// Number of episodes on disk
    pub async fn recursive_child_count(&self, series: &Series) -> Result<usize, CatalogError> {
        self.count_non_virtual(series, ItemKind::Episode).await
    }

    async fn count_non_virtual(&self, series: &Series, kind: ItemKind) -> Result<usize, CatalogError> {
        let query = ItemQuery {
            series_presentation_key: Some(self.presentation_key(series).await?),
            include_item_types: vec![kind],
            is_virtual_item: Some(false),
            limit: Some(0),
            ..Default::default()
        };

        self.catalog.count_items(&query).await
    }

    fn include_specials(&self) -> bool {
        self.config.server().display_specials_within_seasons
    }
}

fn missing_filter(user: &UserConfiguration) -> Option<bool> {
    if user.display_missing_episodes {
        None
    } else {
        Some(false)
    }
}

fn season_view<'e, L: SeasonLookup + ?Sized>(
    episodes: &'e [Episode],
    season: &Season,
    seasons: &L,
    include_specials: bool,
) -> Vec<&'e Episode> {
    let resolver = EpisodeSeasonResolver::new(seasons, include_specials);
    let mut view = resolver.filter_by_season(episodes, season);
    sort_episodes(&mut view, season_sort_key(season.index_number));
    view
}
