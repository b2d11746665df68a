//! Provider-level configuration.
//!
//! Values come from the provider block and, when left null there, from
//! `OPENWRT_*` environment variables.

use crate::error::ProviderError;
use openwrt_client::{ConnectionSettings, DEFAULT_TIMEOUT, Secret};
use openwrt_model::{
    AttributePath, AttributeSchema, Diagnostics, EntitySchema, FromObject, ObjectReader, Value,
};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;

pub const ENV_HOST: &str = "OPENWRT_HOST";
pub const ENV_USERNAME: &str = "OPENWRT_USERNAME";
pub const ENV_PASSWORD: &str = "OPENWRT_PASSWORD";
pub const ENV_INSECURE: &str = "OPENWRT_INSECURE";

static PROVIDER_SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("Interact with an OpenWrt device over its ubus JSON-RPC API.")
        .with_attribute(
            AttributeSchema::optional_string("host")
                .describe("Host name or URL of the device. May also be set with OPENWRT_HOST."),
        )
        .with_attribute(
            AttributeSchema::optional_string("username")
                .describe("Login user. May also be set with OPENWRT_USERNAME."),
        )
        .with_attribute(
            AttributeSchema::optional_string("password")
                .sensitive()
                .describe("Login password. May also be set with OPENWRT_PASSWORD."),
        )
        .with_attribute(AttributeSchema::optional_bool("insecure_tls").describe(
            "Skip TLS certificate verification. Only use this for devices with self-signed \
             certificates on a trusted network. May also be set with OPENWRT_INSECURE.",
        ))
        .with_attribute(
            AttributeSchema::optional_int64("timeout")
                .describe("Per-request timeout in seconds. Defaults to 30."),
        )
});

/// Schema of the provider block.
pub fn provider_schema() -> &'static EntitySchema {
    &PROVIDER_SCHEMA
}

/// Provider settings that must resolve to a concrete, non-empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Host,
    Username,
    Password,
}

impl ConfigField {
    pub const ALL: [ConfigField; 3] = [ConfigField::Host, ConfigField::Username, ConfigField::Password];

    pub fn attribute(self) -> &'static str {
        match self {
            ConfigField::Host => "host",
            ConfigField::Username => "username",
            ConfigField::Password => "password",
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            ConfigField::Host => ENV_HOST,
            ConfigField::Username => ENV_USERNAME,
            ConfigField::Password => ENV_PASSWORD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::Host => "OpenWrt API Host",
            ConfigField::Username => "OpenWrt API Username",
            ConfigField::Password => "OpenWrt API Password",
        }
    }
}

/// The provider block as supplied by the caller; any field may be unknown.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub host: Value<String>,
    pub username: Value<String>,
    pub password: Value<Secret>,
    pub insecure_tls: Value<bool>,
    pub timeout: Value<i64>,
}

impl FromObject for ProviderConfig {
    fn from_object(reader: &ObjectReader<'_>, diags: &mut Diagnostics) -> Self {
        Self {
            host: reader.string("host", diags),
            username: reader.string("username", diags),
            password: reader.string("password", diags).map(Secret::from),
            insecure_tls: reader.bool("insecure_tls", diags),
            timeout: reader.int64("timeout", diags),
        }
    }
}

impl ProviderConfig {
    fn is_unknown(&self, field: ConfigField) -> bool {
        match field {
            ConfigField::Host => self.host.is_unknown(),
            ConfigField::Username => self.username.is_unknown(),
            ConfigField::Password => self.password.is_unknown(),
        }
    }

    /// Resolves the configuration into connection settings.
    ///
    /// Unknown credentials are reported together, one diagnostic per field,
    /// before anything else is looked at. Null values then fall back to the
    /// environment; values that are still empty are reported together too.
    pub fn resolve(self, diags: &mut Diagnostics) -> Option<ConnectionSettings> {
        let errors_before = diags.error_count();

        for field in ConfigField::ALL {
            if self.is_unknown(field) {
                diags.push(ProviderError::UnresolvedConfig(field).to_diagnostic());
            }
        }
        if diags.error_count() > errors_before {
            return None;
        }

        let host = self.host.or_else(|| env_value(ENV_HOST)).into_known().unwrap_or_default();
        let username = self
            .username
            .or_else(|| env_value(ENV_USERNAME))
            .into_known()
            .unwrap_or_default();
        let password = self
            .password
            .or_else(|| env_value(ENV_PASSWORD).map(Secret::from))
            .into_known()
            .unwrap_or_default();

        let missing = [
            (ConfigField::Host, host.trim().is_empty()),
            (ConfigField::Username, username.is_empty()),
            (ConfigField::Password, password.is_empty()),
        ];
        for (field, is_missing) in missing {
            if is_missing {
                diags.push(ProviderError::MissingConfig(field).to_diagnostic());
            }
        }

        let insecure_tls = match self.insecure_tls {
            Value::Known(v) => v,
            Value::Null => env_value(ENV_INSECURE).is_some_and(|v| parse_flag(&v)),
            Value::Unknown => {
                diags.add_attribute_warning(
                    "insecure_tls",
                    "Unknown TLS Verification Setting",
                    "insecure_tls is not known yet; certificates will be verified.",
                );
                false
            }
        };

        let timeout = match self.timeout {
            Value::Known(secs) if secs > 0 => Duration::from_secs(secs.unsigned_abs()),
            Value::Known(secs) => {
                diags.push(
                    ProviderError::Validation {
                        path: AttributePath::root("timeout"),
                        message: format!("timeout must be a positive number of seconds, got {secs}"),
                    }
                    .to_diagnostic(),
                );
                DEFAULT_TIMEOUT
            }
            Value::Null => DEFAULT_TIMEOUT,
            Value::Unknown => {
                diags.add_attribute_warning(
                    "timeout",
                    "Unknown Timeout",
                    format!("timeout is not known yet; using {}s.", DEFAULT_TIMEOUT.as_secs()),
                );
                DEFAULT_TIMEOUT
            }
        };

        if diags.error_count() > errors_before {
            return None;
        }

        if insecure_tls {
            warn!(host = %host, "TLS certificate verification disabled");
        }

        Some(ConnectionSettings {
            host,
            username,
            password,
            insecure_tls,
            timeout,
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
