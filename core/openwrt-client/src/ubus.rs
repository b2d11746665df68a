//! ubus JSON-RPC transport.
//!
//! OpenWrt exposes its micro bus over HTTP at `/ubus` (`uhttpd-mod-ubus`).
//! Every request is a JSON-RPC `call` of `[session, object, method, args]`;
//! the result is `[status]` or `[status, data]`.

use crate::client::{ConnectionSettings, DeviceClient};
use crate::error::{ClientError, ClientResult};
use crate::types::{BoardInfo, InterfaceConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, trace};

/// Session id used before login.
pub const NULL_SESSION: &str = "00000000000000000000000000000000";

/// Inactivity timeout, in seconds, requested for the rpcd session.
pub const SESSION_TIMEOUT: u64 = 3600;

const BOARD_JSON_PATH: &str = "/etc/board.json";

// ubus status codes (libubus `enum ubus_msg_status`)
const STATUS_OK: i64 = 0;
const STATUS_NOT_FOUND: i64 = 4;
const STATUS_PERMISSION_DENIED: i64 = 6;
const STATUS_TIMEOUT: i64 = 7;

// rpcd JSON-RPC error for a missing or expired session
const RPC_ACCESS_DENIED: i64 = -32002;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (&'a str, &'a str, &'a str, &'a Value),
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct LoginResult {
    ubus_rpc_session: String,
}

#[derive(Deserialize)]
struct FileRead {
    data: String,
}

#[derive(Deserialize)]
struct UciSection {
    values: BTreeMap<String, Value>,
}

/// A device session over ubus JSON-RPC.
pub struct UbusClient {
    http: Client,
    endpoint: String,
    session: String,
    next_id: AtomicU64,
}

impl UbusClient {
    /// Creates an unauthenticated client bound to `settings.host`.
    pub fn new(settings: &ConnectionSettings) -> ClientResult<Self> {
        let endpoint = endpoint_url(&settings.host)?;
        let http = Client::builder()
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.insecure_tls)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            session: NULL_SESSION.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Creates a client and logs in with the configured credentials.
    ///
    /// The session is requested for [`SESSION_TIMEOUT`] seconds of
    /// inactivity; there is no re-login once rpcd expires it.
    pub async fn login(settings: &ConnectionSettings) -> ClientResult<Self> {
        let mut client = Self::new(settings)?;
        let args = json!({
            "username": settings.username,
            "password": settings.password.expose(),
            "timeout": SESSION_TIMEOUT,
        });

        let result: LoginResult = match client.request("session", "login", &args).await {
            Ok(result) => result,
            Err(ClientError::PermissionDenied(_)) => {
                return Err(ClientError::AuthenticationFailed(format!(
                    "invalid credentials for user {:?}",
                    settings.username
                )));
            }
            Err(ClientError::Rpc { code, message }) if code == RPC_ACCESS_DENIED => {
                return Err(ClientError::AuthenticationFailed(message));
            }
            Err(e) => return Err(e),
        };

        client.session = result.ubus_rpc_session;
        info!(endpoint = %client.endpoint, user = %settings.username, "ubus session established");
        Ok(client)
    }

    /// The `/ubus` URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_authenticated(&self) -> bool {
        self.session != NULL_SESSION
    }

    /// Calls `object.method` and decodes the data part of the result.
    ///
    /// A rejected or expired session is reported as
    /// [`ClientError::PermissionDenied`].
    pub async fn call<T: DeserializeOwned>(
        &self,
        object: &str,
        method: &str,
        args: &Value,
    ) -> ClientResult<T> {
        self.request(object, method, args).await.map_err(|e| match e {
            ClientError::Rpc { code, message } if code == RPC_ACCESS_DENIED => {
                ClientError::PermissionDenied(message)
            }
            other => other,
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        object: &str,
        method: &str,
        args: &Value,
    ) -> ClientResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method: "call",
            params: (&self.session, object, method, args),
        };
        debug!(id, object, method, "ubus call");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(ClientError::InvalidResponse(format!(
                "HTTP {} from {}",
                response.status(),
                self.endpoint
            )));
        }

        let body: RpcResponse = response.json().await.map_err(map_transport_error)?;
        let data = unpack(object, method, body)?;
        trace!(id, object, method, "ubus call succeeded");
        serde_json::from_value(data).map_err(ClientError::from)
    }
}

#[async_trait]
impl DeviceClient for UbusClient {
    async fn board_info(&self) -> ClientResult<BoardInfo> {
        let file: FileRead = self
            .call("file", "read", &json!({ "path": BOARD_JSON_PATH }))
            .await
            .map_err(|e| match e {
                ClientError::NotFound(_) => ClientError::NotFound(BOARD_JSON_PATH.to_string()),
                other => other,
            })?;
        serde_json::from_str(&file.data).map_err(|e| {
            ClientError::InvalidResponse(format!("{BOARD_JSON_PATH} is not valid board JSON: {e}"))
        })
    }

    async fn interface_configuration(&self, name: &str) -> ClientResult<InterfaceConfig> {
        let not_found = || ClientError::NotFound(format!("network interface {name:?}"));

        let section: UciSection = self
            .call("uci", "get", &json!({ "config": "network", "section": name }))
            .await
            .map_err(|e| match e {
                ClientError::NotFound(_) => not_found(),
                other => other,
            })?;

        let values = section.values;
        if values.get(".type").and_then(Value::as_str) != Some("interface") {
            return Err(not_found());
        }

        let text = |key: &str| {
            values
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let index = values
            .get(".index")
            .and_then(Value::as_i64)
            .ok_or_else(|| ClientError::InvalidResponse(format!("section {name:?} has no .index")))?;
        let section_name = match text(".name") {
            n if n.is_empty() => name.to_string(),
            n => n,
        };

        Ok(InterfaceConfig {
            index,
            name: section_name,
            device: text("device"),
            proto: text("proto"),
            username: text("username"),
            password: text("password"),
        })
    }
}

/// Turns a host or URL into the `/ubus` endpoint. Bare hosts use HTTPS.
pub fn endpoint_url(host: &str) -> ClientResult<String> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ClientError::Config("host must not be empty".to_string()));
    }
    let base = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    let base = base.trim_end_matches('/');
    if base.ends_with("/ubus") {
        Ok(base.to_string())
    } else {
        Ok(format!("{base}/ubus"))
    }
}

fn map_transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Http(e)
    }
}

/// Extracts the data part of a ubus result, mapping status codes to errors.
fn unpack(object: &str, method: &str, body: RpcResponse) -> ClientResult<Value> {
    if let Some(error) = body.error {
        return Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    let mut result = body
        .result
        .ok_or_else(|| ClientError::InvalidResponse("missing result".to_string()))?
        .into_iter();
    let status = result
        .next()
        .and_then(|s| s.as_i64())
        .ok_or_else(|| ClientError::InvalidResponse("missing ubus status".to_string()))?;

    match status {
        STATUS_OK => Ok(result.next().unwrap_or(Value::Null)),
        STATUS_NOT_FOUND => Err(ClientError::NotFound(format!("{object}.{method}"))),
        STATUS_PERMISSION_DENIED => Err(ClientError::PermissionDenied(format!("{object}.{method}"))),
        STATUS_TIMEOUT => Err(ClientError::Timeout),
        code => Err(ClientError::Status {
            object: object.to_string(),
            method: method.to_string(),
            code,
        }),
    }
}
