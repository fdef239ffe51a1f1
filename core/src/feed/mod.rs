pub mod parser;
pub mod record;
pub mod tracker;

pub use parser::{parse_document, parse_record, ParseContext};
pub use record::{FeedDocument, RawAircraft, TrackRecord};
pub use tracker::{Tracker, TrackerSnapshot};
