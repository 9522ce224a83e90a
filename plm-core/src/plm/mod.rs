//! TruePLM backend capability set.
//!
//! The workflow only needs five remote operations. They are modelled as the
//! [`PlmBackend`] trait so the orchestration can run against the HTTP client
//! in production and against [`MockPlmBackend`] in tests.

pub mod http;
pub mod mock;

use crate::error::PlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use http::HttpPlmBackend;
pub use mock::{BackendCall, MockPlmBackend};

/// Opaque session token issued by the backend at login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Response from the login endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    #[serde(default)]
    pub token: Option<String>,
    /// Present when the backend refused the login. The payload is not inspected.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// PLCS model name, used as the project identifier everywhere else.
    pub project_model_id: String,
    pub name: String,
}

/// One project the caller can access, with the roles held on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjectInfo {
    pub in_project: ProjectInfo,
    #[serde(default)]
    pub user_registered_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownElementInfo {
    pub instance_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSearchResult {
    pub bkdn_elem_info: BreakdownElementInfo,
}

/// Parameters of an advanced breakdown search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSearch {
    pub repository: String,
    pub model: String,
    /// Role the caller searches as.
    pub user_type: String,
    pub pattern: String,
    pub description: String,
    pub limit: u32,
    pub prop_names: Vec<String>,
    pub prop_values: Vec<String>,
}

/// Parameters for one page of an aggregated (time-series) property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedPropertyQuery {
    pub repository: String,
    pub model: String,
    pub node: String,
    pub property_uri: String,
    /// Lower bound as Unix epoch seconds.
    pub from: Option<String>,
    /// Upper bound; `None` leaves the window open.
    pub to: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedProperty {
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

#[async_trait]
pub trait PlmBackend: Send + Sync {
    async fn authenticate(
        &self,
        user: &str,
        group: &str,
        password: &str,
        server: &str,
        port: u16,
    ) -> Result<LoginResult, PlmError>;

    async fn deauthenticate(&self, token: &SessionToken) -> Result<(), PlmError>;

    async fn list_user_projects(
        &self,
        token: &SessionToken,
    ) -> Result<Vec<UserProjectInfo>, PlmError>;

    async fn search_nodes(
        &self,
        token: &SessionToken,
        search: &NodeSearch,
    ) -> Result<Vec<NodeSearchResult>, PlmError>;

    async fn get_aggregated_property(
        &self,
        token: &SessionToken,
        query: &AggregatedPropertyQuery,
    ) -> Result<AggregatedProperty, PlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_is_masked() {
        let token = SessionToken::new("secret-token");
        assert_eq!(token.to_string(), "***");
        assert!(!format!("{:?}", token).contains("secret-token"));
        assert_eq!(token.as_str(), "secret-token");
    }

    #[test]
    fn decodes_camel_case_project_listing() {
        let json = r#"[{
            "inProject": {"projectModelId": "PLCS1", "name": "Bike", "extra": 1},
            "userRegisteredAs": ["urn:rdl:epm-std:project_admin"]
        }]"#;
        let projects: Vec<UserProjectInfo> = serde_json::from_str(json).unwrap();

        assert_eq!(projects[0].in_project.project_model_id, "PLCS1");
        assert_eq!(projects[0].in_project.name, "Bike");
        assert_eq!(
            projects[0].user_registered_as,
            vec!["urn:rdl:epm-std:project_admin".to_string()]
        );
    }

    #[test]
    fn login_error_is_detected_by_presence_only() {
        let ok: LoginResult = serde_json::from_str(r#"{"token": "T1", "error": null}"#).unwrap();
        assert!(ok.error.is_none());

        let failed: LoginResult =
            serde_json::from_str(r#"{"error": {"code": 17, "message": "bad password"}}"#).unwrap();
        assert!(failed.error.is_some());
        assert!(failed.token.is_none());
    }
}
