//! The provider: configuration stage and data source registry.

use crate::board_info::BoardInfoDataSource;
use crate::config::{ProviderConfig, provider_schema};
use crate::data_source::{DataSource, DataSourceFactory};
use crate::error::ProviderError;
use crate::network_interface::NetworkInterfaceDataSource;
use crate::provider_data::ProviderData;
use openwrt_client::{DeviceConnector, SharedClient, UbusConnector};
use openwrt_model::{Diagnostics, EntitySchema, ObjectValue, decode};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Type name prefix of every entity this provider exposes.
pub const PROVIDER_TYPE_NAME: &str = "openwrt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub type_name: String,
    pub version: String,
}

/// Result of the configuration stage. `provider_data` is only set when no
/// error was reported.
#[derive(Debug, Default)]
pub struct ConfigureResponse {
    pub provider_data: Option<ProviderData>,
    pub diagnostics: Diagnostics,
}

pub struct OpenWrtProvider {
    version: String,
    connector: Arc<dyn DeviceConnector>,
}

impl OpenWrtProvider {
    /// A provider that talks to devices over ubus.
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_connector(version, Arc::new(UbusConnector))
    }

    pub fn with_connector(version: impl Into<String>, connector: Arc<dyn DeviceConnector>) -> Self {
        Self {
            version: version.into(),
            connector,
        }
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            version: self.version.clone(),
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        provider_schema()
    }

    /// Resolves the provider block and opens an authenticated device session.
    pub async fn configure(&self, config: &ObjectValue) -> ConfigureResponse {
        let mut diags = Diagnostics::new();

        let Some(provider_config) = decode::<ProviderConfig>(provider_schema(), config, &mut diags)
        else {
            return ConfigureResponse::failed(diags);
        };
        let Some(settings) = provider_config.resolve(&mut diags) else {
            return ConfigureResponse::failed(diags);
        };

        if settings.insecure_tls {
            diags.add_attribute_warning(
                "insecure_tls",
                "TLS Verification Disabled",
                format!(
                    "Certificates presented by {} will not be verified. Only use this on a \
                     trusted network.",
                    settings.host
                ),
            );
        }

        debug!(host = %settings.host, user = %settings.username, "connecting to device");
        match self.connector.connect(&settings).await {
            Ok(client) => {
                info!(host = %settings.host, "provider configured");
                ConfigureResponse {
                    provider_data: Some(ProviderData::new::<SharedClient>(client)),
                    diagnostics: diags,
                }
            }
            Err(e) => {
                warn!(host = %settings.host, error = %e, "unable to connect to device");
                diags.push(ProviderError::Authentication(e).to_diagnostic());
                ConfigureResponse::failed(diags)
            }
        }
    }

    /// Constructors of every data source, in registration order.
    pub fn data_sources(&self) -> Vec<DataSourceFactory> {
        vec![BoardInfoDataSource::boxed, NetworkInterfaceDataSource::boxed]
    }

    /// Constructors of every managed resource. This provider is read-only.
    pub fn resources(&self) -> Vec<DataSourceFactory> {
        Vec::new()
    }

    /// Schema of the data source registered under `type_name`.
    pub fn describe(&self, type_name: &str) -> Option<&'static EntitySchema> {
        instantiate(&self.data_sources(), type_name).map(|source| source.schema())
    }
}

impl ConfigureResponse {
    fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            provider_data: None,
            diagnostics,
        }
    }
}

impl fmt::Debug for OpenWrtProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWrtProvider")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Registry lookup helper shared with the session.
pub(crate) fn instantiate(
    factories: &[DataSourceFactory],
    type_name: &str,
) -> Option<Box<dyn DataSource>> {
    factories
        .iter()
        .map(|factory| factory())
        .find(|source| source.metadata(PROVIDER_TYPE_NAME) == type_name)
}
