//! reqwest-backed TruePLM REST client.

use super::{
    AggregatedProperty, AggregatedPropertyQuery, LoginResult, NodeSearch, NodeSearchResult,
    PlmBackend, SessionToken, UserProjectInfo,
};
use crate::config::BackendSettings;
use crate::error::PlmError;
use crate::observability::TracedRequestExt;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const TOKEN_PATH: &[&str] = &["api", "admin", "token"];
const USER_PROJECTS_PATH: &[&str] = &["api", "admin", "user", "projects"];
const ADVANCED_SEARCH_PATH: &[&str] = &["api", "bkd", "adv_search"];
const AGGREGATED_PROPERTY_PATH: &[&str] = &["api", "bkd", "aggr"];

pub struct HttpPlmBackend {
    client: Client,
    base_url: Url,
    request_id: String,
}

impl HttpPlmBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, PlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            PlmError::config(format!("invalid backend base_url '{}': {}", settings.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PlmError::config(format!(
                "backend base_url '{}' cannot carry a path",
                settings.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            request_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    /// Correlation id sent as `x-request-id` with every call of this client.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Append `path` and then `params` to the base URL, percent-encoding
    /// each segment so ids containing `/`, `?` or `#` stay one segment.
    fn url(&self, path: &[&str], params: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path).extend(params);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, PlmError> {
        let response = request.traced(&self.request_id).send().await.map_err(|e| {
            let err = PlmError::from(e);
            tracing::error!(error = %err, "Failed to reach PLM backend");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, body = %body, "PLM backend returned an error status");
        Err(PlmError::BadGateway {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, PlmError> {
        let body = self.send(request).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to decode PLM backend response");
            PlmError::MalformedResponse(anyhow::anyhow!("{}: {}", e, body))
        })
    }
}

#[async_trait]
impl PlmBackend for HttpPlmBackend {
    async fn authenticate(
        &self,
        user: &str,
        group: &str,
        password: &str,
        server: &str,
        port: u16,
    ) -> Result<LoginResult, PlmError> {
        let port = port.to_string();
        let request = self.client.post(self.url(TOKEN_PATH, &[])).query(&[
            ("user", user),
            ("group", group),
            ("pass", password),
            ("server", server),
            ("port", port.as_str()),
        ]);

        self.decode(request).await
    }

    async fn deauthenticate(&self, token: &SessionToken) -> Result<(), PlmError> {
        let request = self
            .client
            .delete(self.url(TOKEN_PATH, &[]))
            .query(&[("token", token.as_str())]);

        self.send(request).await?;
        Ok(())
    }

    async fn list_user_projects(
        &self,
        token: &SessionToken,
    ) -> Result<Vec<UserProjectInfo>, PlmError> {
        let request = self
            .client
            .get(self.url(USER_PROJECTS_PATH, &[]))
            .query(&[("token", token.as_str())]);

        self.decode(request).await
    }

    async fn search_nodes(
        &self,
        token: &SessionToken,
        search: &NodeSearch,
    ) -> Result<Vec<NodeSearchResult>, PlmError> {
        let url = self.url(
            ADVANCED_SEARCH_PATH,
            &[search.repository.as_str(), search.model.as_str()],
        );

        let limit = search.limit.to_string();
        let mut request = self.client.get(url).query(&[
            ("token", token.as_str()),
            ("type", search.user_type.as_str()),
            ("pattern", search.pattern.as_str()),
            ("descr", search.description.as_str()),
            ("limit", limit.as_str()),
        ]);
        for name in &search.prop_names {
            request = request.query(&[("prop_name", name)]);
        }
        for value in &search.prop_values {
            request = request.query(&[("prop_val", value)]);
        }

        self.decode(request).await
    }

    async fn get_aggregated_property(
        &self,
        token: &SessionToken,
        query: &AggregatedPropertyQuery,
    ) -> Result<AggregatedProperty, PlmError> {
        let url = self.url(
            AGGREGATED_PROPERTY_PATH,
            &[
                query.repository.as_str(),
                query.model.as_str(),
                query.node.as_str(),
            ],
        );

        let page = query.page.to_string();
        let size = query.page_size.to_string();
        let mut request = self.client.get(url).query(&[
            ("token", token.as_str()),
            ("prop", query.property_uri.as_str()),
            ("page", page.as_str()),
            ("size", size.as_str()),
        ]);
        if let Some(from) = &query.from {
            request = request.query(&[("from", from)]);
        }
        if let Some(to) = &query.to {
            request = request.query(&[("to", to)]);
        }

        self.decode(request).await
    }
}
