pub mod cache;
pub mod connectors;
pub mod provider;

pub use cache::{CacheKey, PriceCache};
pub use connectors::{CsvConnector, DataValidator, DatasetMetadata, RequiredColumn};
pub use provider::{CachedPriceProvider, CsvDirectoryProvider, PriceProvider};
