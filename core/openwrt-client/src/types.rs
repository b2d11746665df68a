//! Responses returned by the device.

use serde::{Deserialize, Serialize};

/// Contents of `/etc/board.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    pub model: BoardModel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardModel {
    /// Board identifier, e.g. `glinet,gl-mt6000`.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
}

/// A `config interface` section of `/etc/config/network`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Position of the section within the network config.
    pub index: i64,
    pub name: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub proto: String,
    /// PPP login, empty for most protocols.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for InterfaceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceConfig")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("device", &self.device)
            .field("proto", &self.proto)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
