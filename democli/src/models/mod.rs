use plm_core::plm::{ProjectInfo, UserProjectInfo};
use serde::Serialize;

/// The breakdown element found by the property search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerReference {
    pub instance_id: String,
    pub name: Option<String>,
}

/// One page of an aggregated property, in backend order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSamplePage {
    pub property_uri: String,
    pub page: u32,
    pub page_size: u32,
    pub values: Vec<serde_json::Value>,
}

/// Everything one workflow run derived, stage by stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowReport {
    pub projects: Vec<UserProjectInfo>,
    pub project: ProjectInfo,
    pub role: String,
    pub container: ContainerReference,
    pub samples: SensorSamplePage,
}
