pub mod cache_config;
pub mod response_cache;
pub mod timed_cache;

pub use cache_config::*;
pub use response_cache::ResponseCache;
pub use timed_cache::{CacheStats, Clock, SystemClock, TimedCache};
