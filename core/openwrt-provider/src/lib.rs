//! OpenWrt provider for a declarative infrastructure engine.
//!
//! The provider is configured once per session with the device address and
//! credentials; it authenticates and hands the resulting device client to
//! every data source. Data sources are read-only:
//!
//! - `openwrt_board_info`: model id and name from `/etc/board.json`
//! - `openwrt_network_interface`: one interface section of the network config
//!
//! Every stage reports through [`Diagnostics`](openwrt_model::Diagnostics)
//! instead of failing; the host decides what to show.

mod board_info;
mod config;
mod data_source;
mod error;
pub mod logging;
mod network_interface;
mod provider;
mod provider_data;
mod session;

pub use board_info::{BOARD_INFO_ID, BoardInfoDataSource, BoardInfoModel};
pub use config::{
    ConfigField, ENV_HOST, ENV_INSECURE, ENV_PASSWORD, ENV_USERNAME, ProviderConfig,
    provider_schema,
};
pub use data_source::{DataSource, DataSourceFactory, Lifecycle, ReadResponse};
pub use error::ProviderError;
pub use network_interface::{NetworkInterfaceDataSource, NetworkInterfaceModel};
pub use provider::{ConfigureResponse, OpenWrtProvider, PROVIDER_TYPE_NAME, ProviderMetadata};
pub use provider_data::ProviderData;
pub use session::ProviderSession;
