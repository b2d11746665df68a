//! The data source contract and the state shared by every implementation.

use crate::error::ProviderError;
use crate::provider_data::ProviderData;
use async_trait::async_trait;
use openwrt_client::SharedClient;
use openwrt_model::{Diagnostics, EntitySchema, ObjectValue, State};
use std::any::type_name;
use std::sync::atomic::{AtomicBool, Ordering};

/// Where a data source instance is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, no capability yet.
    Unconfigured,
    /// Holds a device client.
    Configured,
    /// Has completed at least one read.
    Ready,
}

/// Result of a read: the full state on success, plus everything reported
/// along the way.
#[derive(Debug, Default)]
pub struct ReadResponse {
    pub state: Option<State>,
    pub diagnostics: Diagnostics,
}

impl ReadResponse {
    pub fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }
}

/// A read-only entity type exposed by the provider.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Full type name, derived from the provider's type name.
    fn metadata(&self, provider_type_name: &str) -> String;

    fn schema(&self) -> &'static EntitySchema;

    /// Accepts the provider's configured capability. `None` means the
    /// provider has not been configured yet and is ignored.
    fn configure(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics);

    /// Reads the entity described by `config` from the device.
    async fn read(&self, config: &ObjectValue) -> ReadResponse;

    fn lifecycle(&self) -> Lifecycle;
}

/// Constructor registered for each data source type.
pub type DataSourceFactory = fn() -> Box<dyn DataSource>;

/// Device client slot embedded in every data source.
#[derive(Default)]
pub(crate) struct ClientSlot {
    client: Option<SharedClient>,
    ready: AtomicBool,
}

impl ClientSlot {
    pub(crate) fn configure(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics) {
        let Some(data) = provider_data else {
            return;
        };
        match data.downcast::<SharedClient>() {
            Some(client) => self.client = Some(client.clone()),
            None => diags.push(
                ProviderError::CapabilityType {
                    expected: type_name::<SharedClient>(),
                    actual: data.type_name(),
                }
                .to_diagnostic(),
            ),
        }
    }

    pub(crate) fn client(&self, entity: &'static str) -> Result<&SharedClient, ProviderError> {
        self.client.as_ref().ok_or(ProviderError::Unconfigured(entity))
    }

    pub(crate) fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub(crate) fn lifecycle(&self) -> Lifecycle {
        match (&self.client, self.ready.load(Ordering::Acquire)) {
            (None, _) => Lifecycle::Unconfigured,
            (Some(_), false) => Lifecycle::Configured,
            (Some(_), true) => Lifecycle::Ready,
        }
    }
}
