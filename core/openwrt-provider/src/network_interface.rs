//! `<provider>_network_interface`: one `interface` section of the network
//! configuration.

use crate::data_source::{ClientSlot, DataSource, Lifecycle, ReadResponse};
use crate::error::ProviderError;
use crate::provider_data::ProviderData;
use async_trait::async_trait;
use openwrt_model::{
    AttributePath, AttributeSchema, Diagnostics, EntitySchema, FromObject, IntoObject,
    ObjectReader, ObjectValue, State, Value, decode,
};
use std::sync::LazyLock;
use tracing::{debug, trace};

const ENTITY: &str = "network interface";

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("Network Configuration data source")
        .with_attribute(
            AttributeSchema::computed_int64("id").describe("Position of the section in the network configuration."),
        )
        .with_attribute(AttributeSchema::required_string("name").describe("Interface Name"))
        .with_attribute(AttributeSchema::optional_string("device").describe("Device"))
        .with_attribute(AttributeSchema::optional_string("proto").describe("Protocol"))
        .with_attribute(AttributeSchema::optional_string("username").describe("Username"))
        .with_attribute(
            AttributeSchema::optional_string("password")
                .sensitive()
                .describe("Password"),
        )
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkInterfaceModel {
    pub id: Value<i64>,
    pub name: Value<String>,
    pub device: Value<String>,
    pub proto: Value<String>,
    pub username: Value<String>,
    pub password: Value<String>,
}

impl FromObject for NetworkInterfaceModel {
    fn from_object(reader: &ObjectReader<'_>, diags: &mut Diagnostics) -> Self {
        let model = Self {
            id: reader.int64("id", diags),
            name: reader.string("name", diags),
            device: reader.string("device", diags),
            proto: reader.string("proto", diags),
            username: reader.string("username", diags),
            password: reader.string("password", diags),
        };

        // name is the lookup key, so it has to be concrete before a query.
        let invalid_name = match &model.name {
            Value::Unknown => Some("the interface name is not known yet"),
            Value::Known(name) if name.is_empty() => Some("the interface name must not be empty"),
            _ => None,
        };
        if let Some(message) = invalid_name {
            diags.push(
                ProviderError::Validation {
                    path: AttributePath::root("name"),
                    message: message.to_string(),
                }
                .to_diagnostic(),
            );
        }
        model
    }
}

impl IntoObject for NetworkInterfaceModel {
    fn into_object(self) -> ObjectValue {
        ObjectValue::from([
            ("id".to_string(), self.id.into()),
            ("name".to_string(), self.name.into()),
            ("device".to_string(), self.device.into()),
            ("proto".to_string(), self.proto.into()),
            ("username".to_string(), self.username.into()),
            ("password".to_string(), self.password.into()),
        ])
    }
}

#[derive(Default)]
pub struct NetworkInterfaceDataSource {
    slot: ClientSlot,
}

impl NetworkInterfaceDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn DataSource> {
        Box::new(Self::new())
    }
}

#[async_trait]
impl DataSource for NetworkInterfaceDataSource {
    fn metadata(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_network_interface")
    }

    fn schema(&self) -> &'static EntitySchema {
        &SCHEMA
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics) {
        self.slot.configure(provider_data, diags);
    }

    async fn read(&self, config: &ObjectValue) -> ReadResponse {
        let mut diags = Diagnostics::new();

        let Some(mut model) = decode::<NetworkInterfaceModel>(&SCHEMA, config, &mut diags) else {
            return ReadResponse::failed(diags);
        };
        let Some(name) = model.name.as_known().cloned() else {
            return ReadResponse::failed(diags);
        };

        let client = match self.slot.client(ENTITY) {
            Ok(client) => client,
            Err(e) => {
                diags.push(e.to_diagnostic());
                return ReadResponse::failed(diags);
            }
        };

        debug!(interface = %name, "reading network interface");
        let interface = match client.interface_configuration(&name).await {
            Ok(interface) => interface,
            Err(source) => {
                diags.push(
                    ProviderError::BackendQuery {
                        entity: ENTITY,
                        key: name,
                        source,
                    }
                    .to_diagnostic(),
                );
                return ReadResponse::failed(diags);
            }
        };
        trace!(interface = %name, index = interface.index, device = %interface.device, "network interface read");

        model.id = Value::known(interface.index);
        model.name = Value::known(interface.name);
        model.device = Value::known(interface.device);
        model.proto = Value::known(interface.proto);
        model.username = Value::known(interface.username);
        model.password = Value::known(interface.password);

        let state = State::encode(&SCHEMA, model, &mut diags);
        if state.is_some() {
            self.slot.mark_ready();
        }
        ReadResponse {
            state,
            diagnostics: diags,
        }
    }

    fn lifecycle(&self) -> Lifecycle {
        self.slot.lifecycle()
    }
}
