//! Live-data caching and incremental-update core for the ADS-B radar scope.
//!
//! A slow sweep cadence fetches and wholesale-replaces the authoritative
//! contact set while a fast render cadence reads it through caches that keep
//! per-frame work proportional to the visible contacts.

pub mod cache;
pub mod config;
pub mod feed;
pub mod geo;
pub mod prelude;
pub mod telemetry;
pub mod view;

pub use prelude::{FeedError, FeedResult, FeedSource, TrackerStatus};
