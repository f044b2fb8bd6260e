use std::borrow::Borrow;
use std::collections::HashSet;

use crate::model::Episode;

/// Flatten per-season episode views into one series-wide list.
///
/// A special can show up twice: once under season 0 and once under the
/// season it aired in. Walking the concatenation backwards and keeping the
/// first occurrence of each id retains the later (aired-season) copy, then
/// the result is reversed back into ascending order.
pub fn aggregate_series_episodes<S, E>(season_views: S) -> Vec<E>
where
    S: IntoIterator,
    S::Item: IntoIterator<Item = E>,
    E: Borrow<Episode>,
{
    let combined: Vec<E> = season_views.into_iter().flatten().collect();

    let mut seen = HashSet::with_capacity(combined.len());
    let mut kept: Vec<E> = combined
        .into_iter()
        .rev()
        .filter(|episode| seen.insert(episode.borrow().id))
        .collect();

    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Season, Series};
    use crate::order::{season_sort_key, sort_episodes};
    use crate::resolve::EpisodeSeasonResolver;

    #[test]
    fn special_kept_once_under_aired_season() {
        let series = Series::new("Doctor Who");
        let specials = Season::new(&series, Some(0));
        let season5 = Season::new(&series, Some(5));
        let seasons = vec![specials.clone(), season5.clone()];

        let mut special = Episode::new(&series, Some(&specials), Some(0), Some(1));
        special.aired_season_number = Some(5);
        special.airs_before_episode = Some(2);
        let e1 = Episode::new(&series, Some(&season5), Some(5), Some(1));
        let e2 = Episode::new(&series, Some(&season5), Some(5), Some(2));
        let all = vec![e2.clone(), special.clone(), e1.clone()];

        let resolver = EpisodeSeasonResolver::new(&seasons, true);
        let views: Vec<Vec<&Episode>> = seasons
            .iter()
            .map(|season| {
                let mut view = resolver.filter_by_season(&all, season);
                sort_episodes(&mut view, season_sort_key(season.index_number));
                view
            })
            .collect();

        assert_eq!(views[0].len(), 1);
        assert_eq!(views[1].len(), 3);

        let ids: Vec<_> = aggregate_series_episodes(views)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![e1.id, special.id, e2.id]);
    }

    #[test]
    fn duplicates_detected_by_identity_not_content() {
        let series = Series::new("Twins");
        let a = Episode::new(&series, None, Some(1), Some(1));
        let mut b = a.clone();
        b.id = crate::model::ItemId::new();

        let result = aggregate_series_episodes(vec![vec![a.clone()], vec![b.clone(), a.clone()]]);

        let ids: Vec<_> = result.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn preserves_order_without_duplicates() {
        let series = Series::new("Plain");
        let episodes: Vec<_> = (1..=4)
            .map(|n| Episode::new(&series, None, Some(1), Some(n)))
            .collect();

        let views = vec![episodes[..2].to_vec(), episodes[2..].to_vec()];
        let result = aggregate_series_episodes(views);

        let ids: Vec<_> = result.iter().map(|e| e.id).collect();
        let expected: Vec<_> = episodes.iter().map(|e| e.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let views: Vec<Vec<Episode>> = Vec::new();
        assert!(aggregate_series_episodes(views).is_empty());
    }
}
