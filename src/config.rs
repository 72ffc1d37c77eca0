use std::env;

use crate::error::Error;

/// Runtime configuration, resolved from the process environment once at
/// startup and handed to the selector explicitly.
///
/// AWS credentials are not held here: the SDK's default provider chain
/// resolves `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` (and shared
/// config files) on its own when the client is built.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub rackspace_username: Option<String>,
    pub rackspace_api_key: Option<String>,
    /// `USE_PRIVATE` with any non-empty value requests private
    /// addresses.
    pub use_private: bool,
}

/// Credentials for the Rackspace identity API.
#[derive(Debug, Clone)]
pub struct RackspaceCredentials {
    pub username: String,
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            rackspace_username: env::var("RACKSPACE_USERNAME").ok(),
            rackspace_api_key: env::var("RACKSPACE_API_KEY").ok(),
            use_private: env::var("USE_PRIVATE").map_or(false, |v| !v.is_empty()),
        }
    }

    /// Rackspace credentials, or an error naming the first missing
    /// variable. Only called on the Rackspace path, so an AWS-only
    /// environment never trips over it.
    pub fn rackspace_credentials(&self) -> Result<RackspaceCredentials, Error> {
        let username = self
            .rackspace_username
            .clone()
            .ok_or(Error::MissingCredentials("RACKSPACE_USERNAME"))?;
        let api_key = self
            .rackspace_api_key
            .clone()
            .ok_or(Error::MissingCredentials("RACKSPACE_API_KEY"))?;
        Ok(RackspaceCredentials { username, api_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rackspace_credentials_name_the_variable() {
        let config = Config {
            rackspace_username: None,
            rackspace_api_key: Some("key".into()),
            use_private: false,
        };
        let err = config.rackspace_credentials().unwrap_err();
        assert!(matches!(err, Error::MissingCredentials("RACKSPACE_USERNAME")));

        let config = Config {
            rackspace_username: Some("user".into()),
            rackspace_api_key: None,
            use_private: false,
        };
        let err = config.rackspace_credentials().unwrap_err();
        assert!(matches!(err, Error::MissingCredentials("RACKSPACE_API_KEY")));
    }

    #[test]
    fn complete_credentials_resolve() {
        let config = Config {
            rackspace_username: Some("user".into()),
            rackspace_api_key: Some("key".into()),
            use_private: false,
        };
        let creds = config.rackspace_credentials().unwrap();
        assert_eq!(creds.username, "user");
        assert_eq!(creds.api_key, "key");
    }
}
