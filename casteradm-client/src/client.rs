use crate::config::ClientConfig;
use crate::endpoint::{Endpoint, Method};
use crate::error::{ApiError, Result};
use casteradm_core::CredentialStore;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Fixed path every admin call lives under
pub const API_PREFIX: &str = "/adm/api/v1/";

/// Client for the caster's admin API.
///
/// The stored credentials are read at send time and go out with every
/// request, in the query string for GET and in the form body for POST.
#[derive(Clone)]
pub struct AdminClient {
    client: Client,
    base_url: Url,
    credentials: CredentialStore,
}

impl AdminClient {
    pub fn new(server: &str, credentials: CredentialStore) -> Result<Self> {
        Self::with_config(&ClientConfig::new(server), credentials)
    }

    pub fn with_config(config: &ClientConfig, credentials: CredentialStore) -> Result<Self> {
        let base_url = Url::parse(&config.server)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.server, e)))?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Full URL of an endpoint, without parameters
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(&format!("{}{}", API_PREFIX, endpoint))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", endpoint, e)))
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        let mut url = self.endpoint_url(endpoint)?;
        url.query_pairs_mut()
            .extend_pairs(self.credentials.get().form_pairs());

        debug!("GET {}{}", API_PREFIX, endpoint);
        let response = self.client.get(url).send().await?;
        Self::parse_response(endpoint, response).await
    }

    /// POST a form made of the credentials plus `extra`. A key in `extra`
    /// replaces the credential field of the same name.
    pub async fn post<K, V>(&self, endpoint: &str, extra: &[(K, V)]) -> Result<Value>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.endpoint_url(endpoint)?;
        let params = merge_params(self.credentials.get().form_pairs(), extra);

        debug!("POST {}{} ({} fields)", API_PREFIX, endpoint, params.len());
        let response = self.client.post(url).form(&params).send().await?;
        Self::parse_response(endpoint, response).await
    }

    /// Issue a catalogue call with the method it expects. `extra` is only
    /// sent for POST calls.
    pub async fn call<K, V>(&self, endpoint: Endpoint, extra: &[(K, V)]) -> Result<Value>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        match endpoint.method() {
            Method::Get => self.get(endpoint.path()).await,
            Method::Post => self.post(endpoint.path(), extra).await,
        }
    }

    async fn parse_response(endpoint: &str, response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            debug!("{} answered {}", endpoint, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Append `extra` to `params`, replacing the value of keys already present
/// while keeping their original position.
pub fn merge_params<K, V>(mut params: Vec<(String, String)>, extra: &[(K, V)]) -> Vec<(String, String)>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (key, value) in extra {
        let (key, value) = (key.as_ref(), value.as_ref());
        match params.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => params.push((key.to_string(), value.to_string())),
        }
    }
    params
}

/// Split a `key=value` form field. The value may be empty or contain `=`.
pub fn parse_field(field: &str) -> Option<(String, String)> {
    let (key, value) = field.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}
