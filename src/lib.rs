//! Resolve tagged cloud instances into deployment targets.
//!
//! A query names a region, a tag set, and a role; the matching provider
//! backend ([`aws`] or [`rackspace`]) lists its instances, filters them,
//! and yields one `(address, role)` target per match. Matches that
//! cannot produce the requested address kind are reported on the
//! selection rather than dropped.

pub mod aws;
pub mod config;
pub mod error;
pub mod matching;
pub mod provider;
pub mod rackspace;
pub mod tags;

use log::info;
use serde::Serialize;

pub use config::Config;
pub use error::Error;
pub use provider::Provider;
pub use tags::{parse_tags, TagSet};

/// Role assigned when the caller does not name one.
pub const DEFAULT_ROLE: &str = "web";

/// One selection request.
#[derive(Debug, Clone)]
pub struct Query {
    pub region: String,
    pub role: Option<String>,
    pub tags: TagSet,
    pub use_private: bool,
    /// Explicit provider choice. When `None` the provider is inferred
    /// from the region string shape.
    pub provider: Option<Provider>,
}

impl Query {
    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or(DEFAULT_ROLE)
    }
}

/// A deployment target ready to hand to the host tool's server list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub address: String,
    pub role: String,
}

/// A matched server that could not yield the requested address kind.
#[derive(Debug, Clone, Serialize)]
pub struct Skipped {
    pub server: String,
    pub reason: String,
}

/// Result of a selection: the targets to register, plus every match
/// that had to be passed over.
#[derive(Debug, Default, Serialize)]
pub struct Selection {
    pub targets: Vec<Target>,
    pub skipped: Vec<Skipped>,
}

/// Run a selection against the provider named by the query, or the one
/// inferred from the region string.
pub async fn select_servers(query: &Query, config: &Config) -> Result<Selection, Error> {
    let provider = query
        .provider
        .unwrap_or_else(|| Provider::infer(&query.region));
    info!(
        "selecting {:?} servers in {} as role {}",
        provider,
        query.region,
        query.role()
    );

    match provider {
        Provider::Aws => aws::select(query).await,
        Provider::Rackspace => {
            let creds = config.rackspace_credentials()?;
            rackspace::select(query, &creds).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_web() {
        let query = Query {
            region: "us-east-1".to_string(),
            role: None,
            tags: TagSet::new(),
            use_private: false,
            provider: None,
        };
        assert_eq!(query.role(), "web");

        let query = Query {
            role: Some("db".to_string()),
            ..query
        };
        assert_eq!(query.role(), "db");
    }
}
