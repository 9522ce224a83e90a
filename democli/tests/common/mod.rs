#![allow(dead_code)]

use democli::config::WorkflowSettings;
use plm_core::config::{parse_properties, BackendSettings, Credentials};
use std::io::Write;
use tempfile::NamedTempFile;

pub const TEST_TOKEN: &str = "T";
pub const TEST_PROJECT_ID: &str = "PLCS1";
pub const TEST_PROJECT_NAME: &str = "Bike demo";
pub const TEST_ROLE: &str = "project_admin";

pub fn credentials() -> Credentials {
    Credentials::from_properties(&parse_properties("login_name=u\ngroup_name=g\npassword=p\n"))
        .expect("Failed to build test credentials")
}

pub fn backend_settings() -> BackendSettings {
    BackendSettings::default()
}

pub fn workflow_settings() -> WorkflowSettings {
    WorkflowSettings::default()
}

/// Write `contents` to a temporary properties file kept alive by the handle.
pub fn properties_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp properties file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp properties file");
    file
}
