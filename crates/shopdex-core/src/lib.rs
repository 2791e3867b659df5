mod app_config;
mod config;
pub mod criteria;
pub mod geo;
pub mod page;

pub use app_config::{AppConfig, Environment, PlacesConfig};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use criteria::{
    SearchCriteria, SearchResult, SortDirection, StoreFilters, StoreSort, MAX_LIMIT,
};
pub use page::{OffsetLimit, PageError};
