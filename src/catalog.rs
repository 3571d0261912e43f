//! Remote catalogs (language models, project templates) and the caching that
//! shields IPC handlers from repeated network calls.

pub mod cache;
pub mod fetcher;
pub mod templates;

pub use cache::{CacheLookup, CacheSource, TtlResourceCache, DEFAULT_CATALOG_TTL};
pub use fetcher::{DisabledCatalogFetcher, HttpCatalogFetcher, RemoteCatalogFetcher};
pub use templates::{builtin_templates, TemplateAggregator};
