pub mod source;
pub mod content;
pub mod collector;

pub use source::{FeedSource, HttpFeedSource};
pub use content::{ContentFetcher, HttpContentFetcher};
pub use collector::{apply_cap, FeedCollector};
