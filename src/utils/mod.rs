pub mod notifier;
pub mod stats_cache;
