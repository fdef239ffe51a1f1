use std::future::Future;

use crate::feed::record::FeedDocument;

/// Lifecycle of the background sweep loop as observed by the render cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    Initializing,
    Scanning,
    Active,
    NoContacts,
}

impl TrackerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TrackerStatus::Initializing => "INITIALIZING",
            TrackerStatus::Scanning => "SCANNING",
            TrackerStatus::Active => "ACTIVE",
            TrackerStatus::NoContacts => "NO CONTACTS",
        }
    }
}

/// Errors surfaced by a feed source. Every variant is recovered inside the
/// sweep loop and reported as `NoContacts`; none of them terminate it.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("decode failure: {0}")]
    Decode(String),
    #[error("upstream status {0}")]
    Status(u16),
}

pub type FeedResult<T> = Result<T, FeedError>;

/// Upstream snapshot provider polled by the sweep loop once per tick.
///
/// Implementations are responsible for bounding the request with a timeout so
/// a single poll can never stall the loop indefinitely.
pub trait FeedSource {
    fn poll(&mut self) -> impl Future<Output = FeedResult<FeedDocument>> + Send;
}
