#![allow(dead_code)]

use async_trait::async_trait;
use openwrt_client::{
    BoardInfo, BoardModel, ClientError, ClientResult, ConnectionSettings, DeviceClient,
    DeviceConnector, InterfaceConfig, SharedClient,
};
use openwrt_model::{AttrValue, ObjectValue};
use openwrt_provider::{OpenWrtProvider, ProviderData};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const VERSION: &str = "test";

/// In-memory device: one board, a fixed set of interfaces.
#[derive(Default)]
pub struct FakeClient {
    pub board: Option<BoardInfo>,
    pub interfaces: HashMap<String, InterfaceConfig>,
    pub queries: AtomicUsize,
}

impl FakeClient {
    pub fn router() -> Self {
        let lan = InterfaceConfig {
            index: 0,
            name: "lan".to_string(),
            device: "eth0".to_string(),
            proto: "static".to_string(),
            username: String::new(),
            password: String::new(),
        };
        let wan = InterfaceConfig {
            index: 1,
            name: "wan".to_string(),
            device: "eth1".to_string(),
            proto: "pppoe".to_string(),
            username: "isp-user".to_string(),
            password: "isp-pass".to_string(),
        };
        Self {
            board: Some(BoardInfo {
                model: BoardModel {
                    id: "x1".to_string(),
                    name: "Router One".to_string(),
                },
            }),
            interfaces: HashMap::from([("lan".to_string(), lan), ("wan".to_string(), wan)]),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceClient for FakeClient {
    async fn board_info(&self) -> ClientResult<BoardInfo> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.board
            .clone()
            .ok_or_else(|| ClientError::NotFound("/etc/board.json".to_string()))
    }

    async fn interface_configuration(&self, name: &str) -> ClientResult<InterfaceConfig> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.interfaces
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("network interface {name:?}")))
    }
}

/// Hands out a fixed client, or fails authentication.
pub struct FakeConnector {
    client: Arc<FakeClient>,
    reject: bool,
    attempts: AtomicUsize,
    last_settings: Mutex<Option<ConnectionSettings>>,
}

impl FakeConnector {
    pub fn new(client: Arc<FakeClient>) -> Self {
        Self {
            client,
            reject: false,
            attempts: AtomicUsize::new(0),
            last_settings: Mutex::new(None),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::new(Arc::new(FakeClient::default()))
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn last_settings(&self) -> Option<ConnectionSettings> {
        self.last_settings.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceConnector for FakeConnector {
    async fn connect(&self, settings: &ConnectionSettings) -> ClientResult<SharedClient> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        *self.last_settings.lock().unwrap() = Some(settings.clone());
        if self.reject {
            return Err(ClientError::AuthenticationFailed(format!(
                "invalid credentials for user {:?}",
                settings.username
            )));
        }
        let client: SharedClient = self.client.clone();
        Ok(client)
    }
}

pub fn provider(connector: Arc<FakeConnector>) -> OpenWrtProvider {
    OpenWrtProvider::with_connector(VERSION, connector)
}

/// Capability as the configuration stage would produce it.
pub fn client_data(client: Arc<FakeClient>) -> ProviderData {
    let client: SharedClient = client;
    ProviderData::new(client)
}

pub fn object<const N: usize>(pairs: [(&str, AttrValue); N]) -> ObjectValue {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub fn string(value: &str) -> AttrValue {
    AttrValue::String(value.to_string())
}

/// A complete, static provider block.
pub fn provider_config() -> ObjectValue {
    object([
        ("host", string("192.168.1.1")),
        ("username", string("root")),
        ("password", string("s3cret")),
    ])
}
