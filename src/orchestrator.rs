// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, TimeDelta, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::catalog::CatalogService;
use crate::clock::Clock;
use crate::error::RefreshError;
use crate::model::{Item, ItemKind, Series};
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::refresh::{RefreshMode, RefreshOptions, RefreshService};

/// Missing placeholders that premiered longer ago than this are not
/// refreshed by incremental passes
pub const STALE_MISSING_EPISODE_DAYS: i64 = 30;

/// Result of a completed series refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Descendants handed to the refresh service
    pub refreshed: usize,
    /// Descendants passed over by the staleness check
    pub skipped: usize,
    /// Descendants walked (seasons and everything else)
    pub total: usize,
}

/// Walks a series tree bottom-up: the series, its seasons, every other
/// descendant, then one post-recursive pass over the series.
///
/// Items are refreshed one at a time; the first provider error ends the walk.
pub struct RefreshOrchestrator<'a, C: ?Sized, R: ?Sized, K: ?Sized> {
    catalog: &'a C,
    refresher: &'a R,
    clock: &'a K,
}

impl<'a, C, R, K> RefreshOrchestrator<'a, C, R, K>
where
    C: CatalogService + ?Sized,
    R: RefreshService + ?Sized,
    K: Clock + ?Sized,
{
    pub fn new(catalog: &'a C, refresher: &'a R, clock: &'a K) -> Self {
        Self {
            catalog,
            refresher,
            clock,
        }
    }

    /// Refresh the series and all of its descendants.
    ///
    /// Returns `RefreshError::Cancelled` when `cancel` fires; the
    /// post-recursive pass does not run in that case.
    #[tracing::instrument(skip_all, fields(series = %series.name, mode = ?options.mode))]
    pub async fn refresh_all_metadata(
        &self,
        series: &Series,
        options: &RefreshOptions,
        reporter: &SharedProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<RefreshSummary, RefreshError> {
        let series_item = Item::Series(series.clone());

        ensure_not_cancelled(cancel)?;
        reporter.report(ProgressEvent::RefreshStarting {
            series_name: series.name.clone(),
        });
        self.refresher
            .refresh_item(&series_item, options, cancel)
            .await?;

        ensure_not_cancelled(cancel)?;
        let descendants = self.catalog.recursive_descendants(series.id).await?;

        let (seasons, others): (Vec<&Item>, Vec<&Item>) = descendants
            .iter()
            .filter(|item| item.kind() != ItemKind::Series)
            .partition(|item| item.kind() == ItemKind::Season);

        let mut tally = Tally {
            total: seasons.len() + others.len(),
            ..Default::default()
        };

        reporter.report(ProgressEvent::DescendantsListed {
            seasons: seasons.len(),
            others: others.len(),
            total: tally.total,
        });
        info!(
            seasons = seasons.len(),
            others = others.len(),
            "refreshing descendants"
        );

        for season in seasons {
            ensure_not_cancelled(cancel)?;
            self.refresher.refresh_item(season, options, cancel).await?;
            tally.complete(season, false, reporter);
        }

        for item in others {
            ensure_not_cancelled(cancel)?;

            let skip = is_stale_missing_episode(item, options, self.clock.now());
            if skip {
                debug!(item = item.name(), "skipping long-missing episode");
            } else {
                self.refresher.refresh_item(item, options, cancel).await?;
            }

            tally.complete(item, skip, reporter);
        }

        ensure_not_cancelled(cancel)?;
        reporter.report(ProgressEvent::PostRecursiveRefresh {
            series_name: series.name.clone(),
        });
        self.refresher
            .refresh_item(&series_item, &options.post_recursive(), cancel)
            .await?;

        let summary = RefreshSummary {
            refreshed: tally.refreshed,
            skipped: tally.skipped,
            total: tally.total,
        };

        reporter.report(ProgressEvent::RefreshCompleted {
            refreshed: summary.refreshed,
            skipped: summary.skipped,
        });
        info!(
            refreshed = summary.refreshed,
            skipped = summary.skipped,
            "series refresh complete"
        );

        Ok(summary)
    }
}

/// True for a virtual missing episode that premiered more than
/// `STALE_MISSING_EPISODE_DAYS` ago, unless a full or replace-all refresh
/// was requested
pub fn is_stale_missing_episode(item: &Item, options: &RefreshOptions, now: DateTime<Utc>) -> bool {
    if options.mode == RefreshMode::Full || options.replace_all_metadata {
        return false;
    }

    let Item::Episode(episode) = item else {
        return false;
    };

    episode.is_missing_placeholder()
        && episode.premiere_date.is_some_and(|premiered| {
            now.signed_duration_since(premiered) > TimeDelta::days(STALE_MISSING_EPISODE_DAYS)
        })
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), RefreshError> {
    if cancel.is_cancelled() {
        debug!("refresh cancelled");
        return Err(RefreshError::Cancelled);
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Tally {
    completed: usize,
    refreshed: usize,
    skipped: usize,
    total: usize,
}

impl Tally {
    fn complete(&mut self, item: &Item, skipped: bool, reporter: &SharedProgressReporter) {
        self.completed += 1;
        if skipped {
            self.skipped += 1;
        } else {
            self.refreshed += 1;
        }

        let percent = self.completed as f64 / self.total as f64 * 100.0;

        reporter.report(ProgressEvent::ItemCompleted {
            kind: item.kind(),
            item_name: item.name().to_string(),
            skipped,
            completed: self.completed,
            total: self.total,
            percent,
        });
    }
}
