pub mod app_config;
pub mod event_cache;
pub mod reporting;
pub mod upstream;

pub use app_config::Config;
pub use event_cache::InMemoryEventCache;
pub use reporting::{init_bridge, SentryReporter};
pub use upstream::HttpUpstreamClient;
