use std::borrow::Borrow;
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Episode, Item};

/// Sort orders understood by catalog queries and season views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Numeric season/episode order, then name
    SortName,
    /// Broadcast order with specials placed where they aired
    AiredEpisodeOrder,
}

/// The sort key a season view uses: specials by number, everything else by airing
pub fn season_sort_key(season_index: Option<u32>) -> SortKey {
    if season_index == Some(0) {
        SortKey::SortName
    } else {
        SortKey::AiredEpisodeOrder
    }
}

pub fn sort_episodes<E: Borrow<Episode>>(episodes: &mut [E], key: SortKey) {
    episodes.sort_by(|a, b| compare_episodes(a.borrow(), b.borrow(), key));
}

pub fn sort_items(items: &mut [Item], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }

    items.sort_by(|a, b| {
        keys.iter()
            .map(|key| compare_items(a, b, *key))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

pub fn compare_episodes(a: &Episode, b: &Episode, key: SortKey) -> Ordering {
    match key {
        SortKey::SortName => episode_name_key(a).cmp(&episode_name_key(b)),
        SortKey::AiredEpisodeOrder => aired_key(a).cmp(&aired_key(b)),
    }
}

fn compare_items(a: &Item, b: &Item, key: SortKey) -> Ordering {
    match (a, b, key) {
        (Item::Episode(a), Item::Episode(b), _) => compare_episodes(a, b, key),
        _ => item_name_key(a).cmp(&item_name_key(b)),
    }
}

fn episode_name_key(episode: &Episode) -> (u32, u32, String) {
    (
        episode.parent_index_number.unwrap_or(u32::MAX),
        episode.index_number.unwrap_or(u32::MAX),
        episode.name.to_lowercase(),
    )
}

fn item_name_key(item: &Item) -> (u32, u32, String) {
    match item {
        Item::Season(season) => (
            season.index_number.unwrap_or(u32::MAX),
            0,
            season.name.to_lowercase(),
        ),
        Item::Episode(episode) => episode_name_key(episode),
        other => (u32::MAX, u32::MAX, other.name().to_lowercase()),
    }
}

fn aired_key(episode: &Episode) -> (u32, u32, u8, u32, String) {
    let season = episode
        .aired_season_number
        .or(episode.parent_index_number)
        .unwrap_or(u32::MAX);
    let index = episode.index_number.unwrap_or(u32::MAX);

    // 0 sorts a special ahead of the regular episode sharing its position
    let (position, rank) = if episode.is_special() && season != 0 {
        (episode.airs_before_episode.unwrap_or(u32::MAX), 0)
    } else {
        (index, 1)
    };

    (season, position, rank, index, episode.name.to_lowercase())
}
