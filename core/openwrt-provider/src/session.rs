//! Drives one provider session the way a host engine does: configure once,
//! then read any number of data sources, possibly concurrently.

use crate::data_source::{DataSource, DataSourceFactory, ReadResponse};
use crate::error::ProviderError;
use crate::provider::{OpenWrtProvider, PROVIDER_TYPE_NAME, instantiate};
use crate::provider_data::ProviderData;
use openwrt_model::{Diagnostics, EntitySchema, ObjectValue};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub struct ProviderSession {
    provider: OpenWrtProvider,
    factories: Vec<DataSourceFactory>,
    provider_data: RwLock<Option<ProviderData>>,
    data_sources: RwLock<HashMap<String, Arc<dyn DataSource>>>,
}

impl ProviderSession {
    pub fn new(provider: OpenWrtProvider) -> Self {
        let factories = provider.data_sources();
        Self {
            provider,
            factories,
            provider_data: RwLock::new(None),
            data_sources: RwLock::new(HashMap::new()),
        }
    }

    pub fn provider(&self) -> &OpenWrtProvider {
        &self.provider
    }

    /// Runs the provider configuration stage. Data sources created before a
    /// successful configuration are dropped so they pick up the new client.
    pub async fn configure(&self, config: &ObjectValue) -> Diagnostics {
        let response = self.provider.configure(config).await;
        if let Some(data) = response.provider_data {
            *self.provider_data.write().await = Some(data);
            self.data_sources.write().await.clear();
        }
        response.diagnostics
    }

    pub async fn is_configured(&self) -> bool {
        self.provider_data.read().await.is_some()
    }

    /// Full type names of every registered data source.
    pub fn data_source_type_names(&self) -> Vec<String> {
        self.factories
            .iter()
            .map(|factory| factory().metadata(PROVIDER_TYPE_NAME))
            .collect()
    }

    pub fn describe(&self, type_name: &str) -> Option<&'static EntitySchema> {
        instantiate(&self.factories, type_name).map(|source| source.schema())
    }

    /// Reads the data source registered under `type_name`.
    pub async fn read_data_source(&self, type_name: &str, config: &ObjectValue) -> ReadResponse {
        let mut diags = Diagnostics::new();
        let Some(source) = self.data_source(type_name, &mut diags).await else {
            return ReadResponse::failed(diags);
        };

        let mut response = source.read(config).await;
        diags.append(response.diagnostics);
        response.diagnostics = diags;
        response
    }

    async fn data_source(
        &self,
        type_name: &str,
        diags: &mut Diagnostics,
    ) -> Option<Arc<dyn DataSource>> {
        if let Some(source) = self.data_sources.read().await.get(type_name) {
            return Some(Arc::clone(source));
        }

        let mut sources = self.data_sources.write().await;
        if let Some(source) = sources.get(type_name) {
            return Some(Arc::clone(source));
        }

        let Some(mut source) = instantiate(&self.factories, type_name) else {
            diags.push(ProviderError::UnknownDataSource(type_name.to_string()).to_diagnostic());
            return None;
        };

        let errors_before = diags.error_count();
        let provider_data = self.provider_data.read().await;
        source.configure(provider_data.as_ref(), diags);
        if diags.error_count() > errors_before {
            return None;
        }

        // An unconfigured instance is not cached so a later configure takes effect.
        let source: Arc<dyn DataSource> = Arc::from(source);
        if provider_data.is_some() {
            debug!(data_source = %type_name, "data source configured");
            sources.insert(type_name.to_string(), Arc::clone(&source));
        }
        Some(source)
    }
}
