pub mod api;
mod messages;

pub use api::{ClientError, ClientResult, FedhubClient, QueryCache, QueryKey};
pub use messages::*;
