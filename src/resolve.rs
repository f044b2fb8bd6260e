// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use crate::model::{Episode, ItemId, Season};

/// Resolves an episode's weak season back-reference
pub trait SeasonLookup {
    fn season(&self, id: ItemId) -> Option<&Season>;
}

impl SeasonLookup for [Season] {
    fn season(&self, id: ItemId) -> Option<&Season> {
        self.iter().find(|s| s.id == id)
    }
}

impl SeasonLookup for Vec<Season> {
    fn season(&self, id: ItemId) -> Option<&Season> {
        self.as_slice().season(id)
    }
}

impl SeasonLookup for HashMap<ItemId, Season> {
    fn season(&self, id: ItemId) -> Option<&Season> {
        self.get(&id)
    }
}

/// Decides which episodes belong to a season.
///
/// With specials-in-season enabled, a numbered non-zero season collects
/// episodes by their aired season number; otherwise by physical season.
pub struct EpisodeSeasonResolver<'a, L: SeasonLookup + ?Sized> {
    seasons: &'a L,
    include_specials: bool,
}

impl<'a, L: SeasonLookup + ?Sized> EpisodeSeasonResolver<'a, L> {
    pub fn new(seasons: &'a L, include_specials: bool) -> Self {
        Self {
            seasons,
            include_specials,
        }
    }

    pub fn matches(&self, episode: &Episode, target: &Season) -> bool {
        let support_specials =
            self.include_specials && target.index_number.is_some_and(|n| n != 0);

        let effective = if support_specials {
            episode.aired_season_number
        } else {
            episode.parent_index_number
        };

        match (effective, target.index_number) {
            (Some(current), Some(wanted)) if current == wanted => return true,
            (None, None) if target.is_virtual() => return true,
            _ => {}
        }

        // Season numbers may have been cleared while the file still sits in the target folder
        episode
            .season_id
            .and_then(|id| self.seasons.season(id))
            .is_some_and(|parent| {
                parent
                    .presentation_key
                    .eq_ignore_ascii_case(&target.presentation_key)
            })
    }

    pub fn filter_by_season<'e, I>(&self, episodes: I, target: &Season) -> Vec<&'e Episode>
    where
        I: IntoIterator<Item = &'e Episode>,
    {
        episodes
            .into_iter()
            .filter(|episode| self.matches(episode, target))
            .collect()
    }
}

/// Match against a bare season number when no season entity is at hand.
///
/// No placeholder or parent-folder fallback applies here.
pub fn matches_season_number(episode: &Episode, season_number: u32, include_specials: bool) -> bool {
    if !include_specials || season_number < 1 {
        episode.parent_index_number == Some(season_number)
    } else {
        episode.aired_season_number == Some(season_number)
    }
}

pub fn filter_by_season_number<'e, I>(
    episodes: I,
    season_number: u32,
    include_specials: bool,
) -> Vec<&'e Episode>
where
    I: IntoIterator<Item = &'e Episode>,
{
    episodes
        .into_iter()
        .filter(|episode| matches_season_number(episode, season_number, include_specials))
        .collect()
}
