//! Client trait and object storage providers.

mod azure;
mod connection_string;
mod provider;

pub use azure::{AzureCredentials, AzureProvider};
pub use connection_string::ConnectionString;
pub use provider::Client;
