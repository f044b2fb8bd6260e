// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::model::Item;

/// How thoroughly metadata should be refreshed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Only fill in what is missing or stale
    #[default]
    Incremental,
    /// Fetch everything again
    Full,
}

/// Options passed to every per-item refresh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshOptions {
    pub mode: RefreshMode,
    /// Overwrite existing metadata instead of merging
    pub replace_all_metadata: bool,
    /// Set on the final series pass, after all children were refreshed
    pub is_post_recursive_refresh: bool,
}

impl RefreshOptions {
    pub fn full() -> Self {
        Self {
            mode: RefreshMode::Full,
            ..Default::default()
        }
    }

    /// Copy of these options marked as the post-recursive pass
    pub fn post_recursive(&self) -> Self {
        Self {
            is_post_recursive_refresh: true,
            ..self.clone()
        }
    }
}

/// Fetches and applies metadata for a single item
#[async_trait]
pub trait RefreshService: Send + Sync {
    async fn refresh_item(
        &self,
        item: &Item,
        options: &RefreshOptions,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError>;
}

/// Refresh service that only logs what it would refresh
#[derive(Debug, Default)]
pub struct DryRunRefresher {
    refreshed: AtomicUsize,
}

impl DryRunRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of refresh calls received so far
    pub fn refreshed(&self) -> usize {
        self.refreshed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshService for DryRunRefresher {
    async fn refresh_item(
        &self,
        item: &Item,
        options: &RefreshOptions,
        _cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        tracing::info!(
            kind = %item.kind(),
            item = item.name(),
            mode = ?options.mode,
            post_recursive = options.is_post_recursive_refresh,
            "would refresh"
        );
        self.refreshed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Series;

    #[test]
    fn post_recursive_copies_other_fields() {
        let options = RefreshOptions {
            mode: RefreshMode::Full,
            replace_all_metadata: true,
            is_post_recursive_refresh: false,
        };

        let derived = options.post_recursive();

        assert!(derived.is_post_recursive_refresh);
        assert_eq!(derived.mode, RefreshMode::Full);
        assert!(derived.replace_all_metadata);
        assert!(!options.is_post_recursive_refresh);
    }

    #[tokio::test]
    async fn dry_run_counts_calls() {
        let refresher = DryRunRefresher::new();
        let item = Item::Series(Series::new("Firefly"));
        let cancel = CancellationToken::new();

        refresher
            .refresh_item(&item, &RefreshOptions::default(), &cancel)
            .await
            .unwrap();
        refresher
            .refresh_item(&item, &RefreshOptions::full(), &cancel)
            .await
            .unwrap();

        assert_eq!(refresher.refreshed(), 2);
    }
}
