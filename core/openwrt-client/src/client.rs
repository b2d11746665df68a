//! Device client abstraction.
//!
//! The provider only ever talks to a device through these traits, so tests
//! can substitute a fake per test case.

use crate::error::ClientResult;
use crate::secret::Secret;
use crate::types::{BoardInfo, InterfaceConfig};
use crate::ubus::UbusClient;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An authenticated handle to one device.
///
/// Implementations own their thread-safety: a single handle is shared by
/// every data source and may be queried concurrently.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Reads the board description.
    async fn board_info(&self) -> ClientResult<BoardInfo>;

    /// Reads the network interface section called `name`.
    async fn interface_configuration(&self, name: &str) -> ClientResult<InterfaceConfig>;
}

/// Shared, read-only device handle.
pub type SharedClient = Arc<dyn DeviceClient>;

/// Everything needed to open an authenticated session.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Host name or URL of the device. A bare host is reached over HTTPS.
    pub host: String,
    pub username: String,
    pub password: Secret,
    /// Skips TLS certificate verification.
    pub insecure_tls: bool,
    /// Deadline for every request sent to the device.
    pub timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: "root".to_string(),
            password: Secret::default(),
            insecure_tls: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Creates device clients: binds a client to a host and authenticates it.
#[async_trait]
pub trait DeviceConnector: Send + Sync {
    async fn connect(&self, settings: &ConnectionSettings) -> ClientResult<SharedClient>;
}

/// Connects to devices over ubus JSON-RPC.
#[derive(Debug, Clone, Copy, Default)]
pub struct UbusConnector;

#[async_trait]
impl DeviceConnector for UbusConnector {
    async fn connect(&self, settings: &ConnectionSettings) -> ClientResult<SharedClient> {
        let client = UbusClient::login(settings).await?;
        Ok(Arc::new(client))
    }
}
