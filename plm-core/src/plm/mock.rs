use super::{
    AggregatedProperty, AggregatedPropertyQuery, LoginResult, NodeSearch, NodeSearchResult,
    PlmBackend, ProjectInfo, SessionToken, UserProjectInfo,
};
use crate::error::PlmError;
use async_trait::async_trait;
use std::sync::Mutex;

/// A backend call as recorded by [`MockPlmBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Authenticate { user: String, server: String, port: u16 },
    Deauthenticate { token: String },
    ListUserProjects { token: String },
    SearchNodes {
        token: String,
        search: NodeSearch,
    },
    GetAggregatedProperty {
        token: String,
        query: AggregatedPropertyQuery,
    },
}

/// In-memory backend with canned responses, for testing
pub struct MockPlmBackend {
    login: LoginResult,
    projects: Vec<UserProjectInfo>,
    search_results: Vec<NodeSearchResult>,
    values: Vec<serde_json::Value>,
    fail_search: bool,
    fail_logout: bool,
    calls: Mutex<Vec<BackendCall>>,
}

impl MockPlmBackend {
    /// A backend that accepts any login and issues `token`.
    pub fn new(token: &str) -> Self {
        Self {
            login: LoginResult {
                token: Some(token.to_string()),
                error: None,
            },
            projects: Vec::new(),
            search_results: Vec::new(),
            values: Vec::new(),
            fail_search: false,
            fail_logout: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend whose login response carries an error payload.
    pub fn rejecting_login(error: serde_json::Value) -> Self {
        Self {
            login: LoginResult {
                token: None,
                error: Some(error),
            },
            ..Self::new("")
        }
    }

    pub fn with_project(mut self, id: &str, name: &str, roles: &[&str]) -> Self {
        self.projects.push(UserProjectInfo {
            in_project: ProjectInfo {
                project_model_id: id.to_string(),
                name: name.to_string(),
            },
            user_registered_as: roles.iter().map(|r| r.to_string()).collect(),
        });
        self
    }

    pub fn with_search_results(mut self, instance_ids: &[&str]) -> Self {
        self.search_results = instance_ids
            .iter()
            .map(|id| NodeSearchResult {
                bkdn_elem_info: super::BreakdownElementInfo {
                    instance_id: id.to_string(),
                    name: None,
                },
            })
            .collect();
        self
    }

    pub fn with_values(mut self, values: Vec<serde_json::Value>) -> Self {
        self.values = values;
        self
    }

    /// Make `search_nodes` fail as if the backend answered 500.
    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_logout(mut self) -> Self {
        self.fail_logout = true;
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().clone()
    }

    pub fn logout_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|c| matches!(c, BackendCall::Deauthenticate { .. }))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<BackendCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: BackendCall) {
        tracing::debug!(?call, "[MOCK] PLM backend call");
        self.lock().push(call);
    }
}

#[async_trait]
impl PlmBackend for MockPlmBackend {
    async fn authenticate(
        &self,
        user: &str,
        _group: &str,
        _password: &str,
        server: &str,
        port: u16,
    ) -> Result<LoginResult, PlmError> {
        self.record(BackendCall::Authenticate {
            user: user.to_string(),
            server: server.to_string(),
            port,
        });
        Ok(self.login.clone())
    }

    async fn deauthenticate(&self, token: &SessionToken) -> Result<(), PlmError> {
        self.record(BackendCall::Deauthenticate {
            token: token.as_str().to_string(),
        });
        if self.fail_logout {
            return Err(PlmError::BadGateway {
                status: 500,
                body: "logout failed".to_string(),
            });
        }
        Ok(())
    }

    async fn list_user_projects(
        &self,
        token: &SessionToken,
    ) -> Result<Vec<UserProjectInfo>, PlmError> {
        self.record(BackendCall::ListUserProjects {
            token: token.as_str().to_string(),
        });
        Ok(self.projects.clone())
    }

    async fn search_nodes(
        &self,
        token: &SessionToken,
        search: &NodeSearch,
    ) -> Result<Vec<NodeSearchResult>, PlmError> {
        self.record(BackendCall::SearchNodes {
            token: token.as_str().to_string(),
            search: search.clone(),
        });
        if self.fail_search {
            return Err(PlmError::BadGateway {
                status: 500,
                body: "search failed".to_string(),
            });
        }
        Ok(self.search_results.clone())
    }

    async fn get_aggregated_property(
        &self,
        token: &SessionToken,
        query: &AggregatedPropertyQuery,
    ) -> Result<AggregatedProperty, PlmError> {
        self.record(BackendCall::GetAggregatedProperty {
            token: token.as_str().to_string(),
            query: query.clone(),
        });
        Ok(AggregatedProperty {
            values: self.values.clone(),
        })
    }
}
