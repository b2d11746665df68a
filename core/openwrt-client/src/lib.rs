//! Device client for the OpenWrt provider.
//!
//! - [`DeviceClient`]: the capability every data source reads through
//! - [`DeviceConnector`]: binds a client to a host and authenticates it
//! - [`UbusClient`] / [`UbusConnector`]: implementation over ubus JSON-RPC (`/ubus`)
//!
//! Credentials are carried as [`Secret`] and never appear in `Debug` output
//! or logs.

mod client;
mod error;
mod secret;
mod types;
pub mod ubus;

pub use client::{
    ConnectionSettings, DEFAULT_TIMEOUT, DeviceClient, DeviceConnector, SharedClient, UbusConnector,
};
pub use error::{ClientError, ClientResult};
pub use secret::Secret;
pub use types::{BoardInfo, BoardModel, InterfaceConfig};
pub use ubus::UbusClient;
