//! `<provider>_board_info`: the device's board description.

use crate::data_source::{ClientSlot, DataSource, Lifecycle, ReadResponse};
use crate::error::ProviderError;
use crate::provider_data::ProviderData;
use async_trait::async_trait;
use openwrt_model::{
    AttributeSchema, Diagnostics, EntitySchema, FromObject, IntoObject, ObjectReader, ObjectValue,
    State, Value, decode,
};
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Identity of the board. There is exactly one per device.
pub const BOARD_INFO_ID: &str = "board-info";

const ENTITY: &str = "board info";

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("Board Information data source")
        .with_attribute(AttributeSchema::computed_string("id").describe("Placeholder identifier."))
        .with_attribute(AttributeSchema::optional_string("model_id").describe("Model ID"))
        .with_attribute(AttributeSchema::optional_string("model_name").describe("Model Name"))
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardInfoModel {
    pub id: Value<String>,
    pub model_id: Value<String>,
    pub model_name: Value<String>,
}

impl FromObject for BoardInfoModel {
    fn from_object(reader: &ObjectReader<'_>, diags: &mut Diagnostics) -> Self {
        Self {
            id: reader.string("id", diags),
            model_id: reader.string("model_id", diags),
            model_name: reader.string("model_name", diags),
        }
    }
}

impl IntoObject for BoardInfoModel {
    fn into_object(self) -> ObjectValue {
        ObjectValue::from([
            ("id".to_string(), self.id.into()),
            ("model_id".to_string(), self.model_id.into()),
            ("model_name".to_string(), self.model_name.into()),
        ])
    }
}

#[derive(Default)]
pub struct BoardInfoDataSource {
    slot: ClientSlot,
}

impl BoardInfoDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn DataSource> {
        Box::new(Self::new())
    }
}

#[async_trait]
impl DataSource for BoardInfoDataSource {
    fn metadata(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_board_info")
    }

    fn schema(&self) -> &'static EntitySchema {
        &SCHEMA
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics) {
        self.slot.configure(provider_data, diags);
    }

    async fn read(&self, config: &ObjectValue) -> ReadResponse {
        let mut diags = Diagnostics::new();

        let Some(mut model) = decode::<BoardInfoModel>(&SCHEMA, config, &mut diags) else {
            return ReadResponse::failed(diags);
        };

        let client = match self.slot.client(ENTITY) {
            Ok(client) => client,
            Err(e) => {
                diags.push(e.to_diagnostic());
                return ReadResponse::failed(diags);
            }
        };

        debug!("reading board info");
        let board = match client.board_info().await {
            Ok(board) => board,
            Err(source) => {
                diags.push(
                    ProviderError::BackendQuery {
                        entity: ENTITY,
                        key: BOARD_INFO_ID.to_string(),
                        source,
                    }
                    .to_diagnostic(),
                );
                return ReadResponse::failed(diags);
            }
        };
        trace!(model_id = %board.model.id, model_name = %board.model.name, "board info read");

        model.id = Value::known(BOARD_INFO_ID);
        model.model_id = Value::known(board.model.id);
        model.model_name = Value::known(board.model.name);

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
