pub mod aggregate;
pub mod browse;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod grouping;
pub mod model;
pub mod orchestrator;
pub mod order;
pub mod progress;
pub mod refresh;
pub mod resolve;

// Re-export main types for convenience
pub use aggregate::aggregate_series_episodes;
pub use browse::SeriesBrowser;
pub use catalog::{CatalogService, CatalogSnapshot, InMemoryCatalog, ItemQuery, LibraryRoot};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    ConfigurationService, LibraryOptions, ServerConfiguration, Settings, StaticConfiguration,
    UserConfiguration,
};
pub use error::{CatalogError, ConfigError, ProviderError, RefreshError};
pub use grouping::{GroupingKeyBuilder, identity_keys};
pub use model::{
    DisplayOrder, Episode, Item, ItemId, ItemKind, LocationType, OtherItem, ProviderIds, Season,
    Series, SeriesStatus,
};
pub use orchestrator::{RefreshOrchestrator, RefreshSummary, is_stale_missing_episode};
pub use order::SortKey;
pub use progress::{
    NoopReporter, PercentReporter, ProgressEvent, ProgressReporter, SharedProgressReporter,
};
pub use refresh::{DryRunRefresher, RefreshMode, RefreshOptions, RefreshService};
pub use resolve::{EpisodeSeasonResolver, SeasonLookup, matches_season_number};
