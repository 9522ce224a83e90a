pub mod properties;

use crate::error::PlmError;
use secrecy::Secret;
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

pub use properties::{load_properties, parse_properties};

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct BackendSettings {
    /// Root URL of the TruePLM REST application (e.g. http://localhost:8080/EDMtruePLM).
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,
    /// EDM server the REST application should open the session against.
    #[serde(default = "default_edm_server")]
    #[validate(length(min = 1))]
    pub edm_server: String,
    #[serde(default = "default_edm_port")]
    pub edm_port: u16,
    /// Per-request timeout for backend calls.
    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1))]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/EDMtruePLM".to_string()
}

// The REST application and the EDM server normally share a host.
fn default_edm_server() -> String {
    "localhost".to_string()
}

fn default_edm_port() -> u16 {
    9090
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            edm_server: default_edm_server(),
            edm_port: default_edm_port(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Login credentials read from the properties file.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login_name: String,
    /// TruePLM has a single group, normally `sdai-group`.
    pub group_name: String,
    pub password: Secret<String>,
}

impl Credentials {
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, PlmError> {
        Ok(Self {
            login_name: required(props, "login_name")?,
            group_name: required(props, "group_name")?,
            password: Secret::new(required(props, "password")?),
        })
    }
}

fn required(props: &HashMap<String, String>, key: &str) -> Result<String, PlmError> {
    props
        .get(key)
        .cloned()
        .ok_or_else(|| PlmError::config(format!("missing required property '{}'", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn credentials_from_complete_properties() {
        let props = parse_properties("login_name=u\ngroup_name=g\npassword=\"p=1\"\n");
        let creds = Credentials::from_properties(&props).unwrap();

        assert_eq!(creds.login_name, "u");
        assert_eq!(creds.group_name, "g");
        assert_eq!(creds.password.expose_secret(), "p=1");
    }

    #[test]
    fn missing_key_names_the_key() {
        let props = parse_properties("login_name=u\npassword=p\n");
        let err = Credentials::from_properties(&props).unwrap_err();

        assert!(matches!(err, PlmError::ConfigError(_)));
        assert!(err.to_string().contains("group_name"));
    }

    #[test]
    fn password_is_not_debug_printed() {
        let props = parse_properties("login_name=u\ngroup_name=g\npassword=hunter2\n");
        let creds = Credentials::from_properties(&props).unwrap();

        assert!(!format!("{:?}", creds).contains("hunter2"));
    }

    #[test]
    fn backend_defaults_are_valid() {
        let settings = BackendSettings::default();
        assert_eq!(settings.edm_port, 9090);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn backend_rejects_bad_url() {
        let settings = BackendSettings {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
