pub mod transport;
pub mod client;
pub mod facets;
pub mod publisher;

pub use transport::PostingTransport;
pub use client::BlueskyClient;
pub use publisher::ThreadPublisher;
