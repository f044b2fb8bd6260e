mod episode;
mod ids;
mod item;
mod season;
mod series;

pub use episode::Episode;
pub use ids::{ItemId, ProviderIds};
pub(crate) use ids::non_blank;
pub use item::{Item, ItemKind, OtherItem};
pub use season::{LocationType, Season};
pub use series::{DisplayOrder, ExternalUrl, Series, SeriesStatus};
