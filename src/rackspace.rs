//! Rackspace Cloud Servers backend.
//!
//! Authenticates against the identity API v2.0 with an API key, looks
//! up the `cloudServersOpenStack` compute endpoint for the requested
//! region in the returned service catalog, then lists servers from
//! `GET /servers/detail`.
//!
//! Note the match semantics: servers are selected when any query tag
//! VALUE appears in the server name. This is not the tag-equality check
//! the EC2 path performs; see [`crate::matching`].

use std::collections::HashMap;

use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::config::RackspaceCredentials;
use crate::error::Error;
use crate::matching::name_substring_match;
use crate::tags::TagSet;
use crate::{Query, Selection, Skipped, Target};

const IDENTITY_ENDPOINT: &str = "https://identity.api.rackspacecloud.com/v2.0/tokens";

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access: Access,
}

#[derive(Debug, Deserialize)]
struct Access {
    token: Token,
    #[serde(rename = "serviceCatalog", default)]
    service_catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct Token {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Deserialize)]
struct CatalogEndpoint {
    #[serde(default)]
    region: Option<String>,
    #[serde(rename = "publicURL")]
    public_url: String,
}

#[derive(Debug, Deserialize)]
struct ServersResponse {
    #[serde(default)]
    servers: Vec<Server>,
}

#[derive(Debug, Deserialize)]
struct Server {
    name: String,
    #[serde(rename = "accessIPv4", default)]
    access_ipv4: String,
    #[serde(default)]
    addresses: HashMap<String, Vec<ServerAddress>>,
}

#[derive(Debug, Deserialize)]
struct ServerAddress {
    addr: String,
}

/// List servers in the query's region and keep the ones whose name
/// contains any of the query tag values.
pub async fn select(query: &Query, creds: &RackspaceCredentials) -> Result<Selection, Error> {
    let client = Client::new();

    let access = authenticate(&client, creds).await?;
    let endpoint = compute_endpoint(&access.service_catalog, &query.region)?;
    info!("using compute endpoint {}", endpoint);

    let servers = list_servers(&client, &endpoint, &access.token.id).await?;
    info!(
        "rackspace returned {} servers in {}",
        servers.len(),
        query.region
    );

    Ok(filter_servers(
        &servers,
        &query.tags,
        query.role(),
        query.use_private,
    ))
}

async fn authenticate(client: &Client, creds: &RackspaceCredentials) -> Result<Access, Error> {
    let body = json!({
        "auth": {
            "RAX-KSKEY:apiKeyCredentials": {
                "username": creds.username,
                "apiKey": creds.api_key,
            }
        }
    });

    let resp = client
        .post(IDENTITY_ENDPOINT)
        .json(&body)
        .send()
        .await
        .map_err(network)?;

    if resp.status() == StatusCode::UNAUTHORIZED {
        return Err(Error::Auth(format!(
            "identity API rejected the credentials for {}",
            creds.username
        )));
    }

    let auth: AuthResponse = resp
        .error_for_status()
        .map_err(network)?
        .json()
        .await
        .map_err(network)?;
    Ok(auth.access)
}

fn compute_endpoint(catalog: &[CatalogEntry], region: &str) -> Result<String, Error> {
    catalog
        .iter()
        .filter(|entry| entry.service_type == "compute" && entry.name == "cloudServersOpenStack")
        .flat_map(|entry| entry.endpoints.iter())
        .find(|endpoint| {
            endpoint
                .region
                .as_deref()
                .map_or(false, |r| r.eq_ignore_ascii_case(region))
        })
        .map(|endpoint| endpoint.public_url.clone())
        .ok_or_else(|| Error::UnknownRegion(region.to_string()))
}

async fn list_servers(client: &Client, endpoint: &str, token: &str) -> Result<Vec<Server>, Error> {
    let url = format!("{}/servers/detail", endpoint.trim_end_matches('/'));

    let resp = client
        .get(&url)
        .header("X-Auth-Token", token)
        .send()
        .await
        .map_err(network)?;

    if resp.status() == StatusCode::UNAUTHORIZED {
        return Err(Error::Auth("compute API rejected the auth token".to_string()));
    }

    let body: ServersResponse = resp
        .error_for_status()
        .map_err(network)?
        .json()
        .await
        .map_err(network)?;
    Ok(body.servers)
}

fn filter_servers(
    servers: &[Server],
    query_tags: &TagSet,
    role: &str,
    use_private: bool,
) -> Selection {
    let mut selection = Selection::default();

    for server in servers {
        if !name_substring_match(&server.name, query_tags) {
            debug!("{} does not match any tag value", server.name);
            continue;
        }
        let address = if use_private {
            // First entry of the private address list.
            server
                .addresses
                .get("private")
                .and_then(|list| list.first())
                .map(|entry| entry.addr.clone())
        } else {
            (!server.access_ipv4.is_empty()).then(|| server.access_ipv4.clone())
        };
        match address {
            Some(address) => selection.targets.push(Target {
                address,
                role: role.to_string(),
            }),
            None => selection.skipped.push(Skipped {
                server: server.name.clone(),
                reason: if use_private {
                    "matched but has no private address".to_string()
                } else {
                    "matched but has no public address".to_string()
                },
            }),
        }
    }

    selection
}

fn network(err: reqwest::Error) -> Error {
    Error::Network(err.to_string())
}
