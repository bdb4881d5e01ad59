mod cache;
mod client;
mod error;

pub use cache::{KeySegment, QueryCache, QueryKey};
pub use client::FedhubClient;
pub use error::{ClientError, ClientResult};
