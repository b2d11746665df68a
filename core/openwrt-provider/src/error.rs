//! Error types for the provider.
//!
//! Nothing here is ever returned to the host as a hard failure: every error
//! is turned into a [`Diagnostic`] and appended to the stage's report.

use crate::config::ConfigField;
use openwrt_client::ClientError;
use openwrt_model::{AttributePath, Diagnostic};
use thiserror::Error;

/// Errors raised while configuring the provider or reading a data source.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Attribute value rejected after decoding.
    #[error("invalid value for {path}: {message}")]
    Validation { path: AttributePath, message: String },

    /// Credential not known yet.
    #[error("{} is unknown", .0.label())]
    UnresolvedConfig(ConfigField),

    /// Credential absent from config and environment.
    #[error("{} is missing", .0.label())]
    MissingConfig(ConfigField),

    /// Device client could not be created.
    #[error("authentication failed: {0}")]
    Authentication(#[source] ClientError),

    /// Device query failed during a read.
    #[error("unable to read {entity} {key:?}: {source}")]
    BackendQuery {
        entity: &'static str,
        key: String,
        #[source]
        source: ClientError,
    },

    /// Provider data is not a device client.
    #[error("expected {expected}, got: {actual}")]
    CapabilityType {
        expected: &'static str,
        actual: &'static str,
    },

    /// Read before the provider was configured.
    #[error("{0} data source is not configured")]
    Unconfigured(&'static str),

    /// No data source registered under that name.
    #[error("unknown data source type {0:?}")]
    UnknownDataSource(String),
}

impl ProviderError {
    /// Short, title-cased summary shown to the user.
    pub fn summary(&self) -> String {
        match self {
            ProviderError::Validation { .. } => "Invalid Attribute Value".to_string(),
            ProviderError::UnresolvedConfig(field) => format!("Unknown {}", field.label()),
            ProviderError::MissingConfig(field) => format!("Missing {}", field.label()),
            ProviderError::Authentication(_) => "Unable to Create OpenWrt API Client".to_string(),
            ProviderError::BackendQuery { .. } => "Client Error".to_string(),
            ProviderError::CapabilityType { .. } => "Unexpected Data Source Configure Type".to_string(),
            ProviderError::Unconfigured(_) => "Unconfigured Data Source".to_string(),
            ProviderError::UnknownDataSource(_) => "Unknown Data Source Type".to_string(),
        }
    }

    /// Longer explanation, enough for the user to fix the problem.
    pub fn detail(&self) -> String {
        match self {
            ProviderError::Validation { path, message } => {
                format!("The value of {path} is invalid: {message}.")
            }
            ProviderError::UnresolvedConfig(field) => format!(
                "The provider cannot create the OpenWrt API client as there is an unknown \
                 configuration value for the {label}. Either apply the source of the value \
                 first, set the value statically in the configuration, or use the {env} \
                 environment variable.",
                label = field.label(),
                env = field.env_var(),
            ),
            ProviderError::MissingConfig(field) => format!(
                "The provider cannot create the OpenWrt API client as there is a missing or \
                 empty value for the {label}. Set the {attr} value in the configuration or use \
                 the {env} environment variable. If either is already set, ensure the value \
                 is not empty.",
                label = field.label(),
                attr = field.attribute(),
                env = field.env_var(),
            ),
            ProviderError::Authentication(source) => format!(
                "An unexpected error occurred when creating the OpenWrt API client. If the \
                 error is not clear, please contact the provider developers.\n\n\
                 OpenWrt Client Error: {source}"
            ),
            ProviderError::BackendQuery { entity, key, source } => {
                format!("Unable to read {entity} {key:?}: {source}")
            }
            ProviderError::CapabilityType { expected, actual } => format!(
                "Expected {expected}, got: {actual}. Please report this issue to the provider developers."
            ),
            ProviderError::Unconfigured(entity) => format!(
                "The {entity} data source was read before the provider was configured. \
                 Check the provider configuration diagnostics for the underlying cause."
            ),
            ProviderError::UnknownDataSource(name) => {
                format!("The provider does not implement a data source named {name:?}.")
            }
        }
    }

    /// The attribute the error is attributable to, if any.
    pub fn attribute(&self) -> Option<AttributePath> {
        match self {
            ProviderError::Validation { path, .. } => Some(path.clone()),
            ProviderError::UnresolvedConfig(field) | ProviderError::MissingConfig(field) => {
                Some(AttributePath::root(field.attribute()))
            }
            _ => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.summary(), self.detail());
        match self.attribute() {
            Some(path) => diagnostic.with_attribute(path),
            None => diagnostic,
        }
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(error: ProviderError) -> Self {
        error.to_diagnostic()
    }
}
