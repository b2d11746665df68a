mod common;

use common::{FakeClient, client_data, object, string};
use openwrt_model::{AttrValue, AttributePath, Diagnostics};
use openwrt_provider::{
    BOARD_INFO_ID, BoardInfoDataSource, DataSource, Lifecycle, NetworkInterfaceDataSource,
    ProviderData,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::sync::Arc;

fn configured<D: DataSource>(mut source: D, client: Arc<FakeClient>) -> D {
    let mut diags = Diagnostics::new();
    source.configure(Some(&client_data(client)), &mut diags);
    assert!(diags.is_empty(), "{diags}");
    source
}

fn interface(name: &str) -> openwrt_model::ObjectValue {
    object([("name", string(name))])
}

// ── Metadata & configure ────────────────────────────────────────

#[test]
fn metadata_is_derived_from_provider_name() {
    assert_eq!(BoardInfoDataSource::new().metadata("openwrt"), "openwrt_board_info");
    assert_eq!(
        NetworkInterfaceDataSource::new().metadata("openwrt"),
        "openwrt_network_interface"
    );
}

#[test]
fn schema_is_available_before_configure() {
    let source = NetworkInterfaceDataSource::new();
    assert_eq!(source.lifecycle(), Lifecycle::Unconfigured);
    let schema = source.schema();
    assert!(schema.attribute("name").unwrap().required());
    assert!(schema.attribute("id").unwrap().computed());
    assert!(schema.is_sensitive("password"));
}

#[test]
fn configure_without_provider_data_is_a_no_op() {
    let mut source = BoardInfoDataSource::new();
    let mut diags = Diagnostics::new();
    source.configure(None, &mut diags);
    assert!(diags.is_empty());
    assert_eq!(source.lifecycle(), Lifecycle::Unconfigured);
}

#[test]
fn configure_with_client_moves_to_configured() {
    let source = configured(BoardInfoDataSource::new(), Arc::new(FakeClient::router()));
    assert_eq!(source.lifecycle(), Lifecycle::Configured);
}

#[test]
fn configure_with_wrong_type_names_both_types() {
    let mut source = NetworkInterfaceDataSource::new();
    let mut diags = Diagnostics::new();
    source.configure(Some(&ProviderData::new(42u32)), &mut diags);

    assert_eq!(diags.error_count(), 1);
    let error = diags.errors().next().unwrap();
    assert_eq!(error.summary, "Unexpected Data Source Configure Type");
    assert!(error.detail.contains("u32"));
    assert!(error.detail.contains("DeviceClient"));
    assert_eq!(source.lifecycle(), Lifecycle::Unconfigured);
}

#[tokio::test]
async fn read_before_configure_is_an_error() {
    let source = BoardInfoDataSource::new();
    let response = source.read(&BTreeMap::new()).await;
    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.error_count(), 1);
    assert_eq!(
        response.diagnostics.errors().next().unwrap().summary,
        "Unconfigured Data Source"
    );
}

#[tokio::test]
async fn unconfigured_read_still_reports_validation_errors() {
    let source = NetworkInterfaceDataSource::new();
    let config = object([("name", string("lan")), ("mtu", AttrValue::Int64(1500))]);

    let response = source.read(&config).await;
    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.error_count(), 1);
    let error = response.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Unsupported Attribute");
    assert_eq!(error.attribute, Some(AttributePath::root("mtu")));
}

// ── Board info ──────────────────────────────────────────────────

#[tokio::test]
async fn board_info_read_maps_model() {
    let client = Arc::new(FakeClient::router());
    let source = configured(BoardInfoDataSource::new(), client.clone());

    let response = source.read(&BTreeMap::new()).await;
    assert!(response.diagnostics.is_empty(), "{}", response.diagnostics);

    let state = response.state.unwrap();
    assert_eq!(
        state.values().clone(),
        BTreeMap::from([
            ("id".to_string(), AttrValue::from(BOARD_INFO_ID)),
            ("model_id".to_string(), AttrValue::from("x1")),
            ("model_name".to_string(), AttrValue::from("Router One")),
        ])
    );
    assert_eq!(client.query_count(), 1);
    assert_eq!(source.lifecycle(), Lifecycle::Ready);
}

#[tokio::test]
async fn board_info_overwrites_echoed_values() {
    let source = configured(BoardInfoDataSource::new(), Arc::new(FakeClient::router()));
    let response = source.read(&object([("model_id", string("stale"))])).await;
    assert_eq!(response.state.unwrap().get_str("model_id"), Some("x1"));
}

#[tokio::test]
async fn board_info_rejects_supplied_id() {
    let client = Arc::new(FakeClient::router());
    let source = configured(BoardInfoDataSource::new(), client.clone());

    let response = source.read(&object([("id", string("mine"))])).await;
    assert!(response.state.is_none());
    assert_eq!(
        response.diagnostics.errors().next().unwrap().attribute,
        Some(AttributePath::root("id"))
    );
    assert_eq!(client.query_count(), 0);
}

#[tokio::test]
async fn board_info_backend_failure_is_one_client_error() {
    let client = Arc::new(FakeClient::default());
    let source = configured(BoardInfoDataSource::new(), client);

    let response = source.read(&BTreeMap::new()).await;
    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.error_count(), 1);
    let error = response.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Client Error");
    assert!(error.detail.starts_with("Unable to read board info \"board-info\""));
    assert_eq!(source.lifecycle(), Lifecycle::Configured);
}

// ── Network interface ───────────────────────────────────────────

#[tokio::test]
async fn interface_read_maps_every_field() {
    let client = Arc::new(FakeClient::router());
    let source = configured(NetworkInterfaceDataSource::new(), client.clone());

    let response = source.read(&interface("lan")).await;
    assert!(response.diagnostics.is_empty(), "{}", response.diagnostics);

    let state = response.state.unwrap();
    assert_eq!(state.get_i64("id"), Some(0));
    assert_eq!(state.get_str("name"), Some("lan"));
    assert_eq!(state.get_str("device"), Some("eth0"));
    assert_eq!(state.get_str("proto"), Some("static"));
    assert_eq!(state.get_str("username"), Some(""));
    assert_eq!(state.get_str("password"), Some(""));
    assert_eq!(client.query_count(), 1);
}

#[tokio::test]
async fn interface_password_is_stored_but_redacted() {
    let source = configured(NetworkInterfaceDataSource::new(), Arc::new(FakeClient::router()));
    let state = source.read(&interface("wan")).await.state.unwrap();

    assert_eq!(state.get_i64("id"), Some(1));
    assert_eq!(state.get_str("password"), Some("isp-pass"));
    assert!(state.is_sensitive("password"));
    assert!(!format!("{state:?}").contains("isp-pass"));
    assert_ne!(state.redacted().get("password"), Some(&AttrValue::from("isp-pass")));
}

#[tokio::test]
async fn interface_not_found_references_the_name() {
    let client = Arc::new(FakeClient::router());
    let source = configured(NetworkInterfaceDataSource::new(), client.clone());

    let response = source.read(&interface("guest")).await;
    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.error_count(), 1);
    let error = response.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Client Error");
    assert!(error.detail.contains("\"guest\""));
    assert_eq!(client.query_count(), 1);
}

#[tokio::test]
async fn interface_missing_name_is_rejected_without_query() {
    let client = Arc::new(FakeClient::router());
    let source = configured(NetworkInterfaceDataSource::new(), client.clone());

    let response = source.read(&BTreeMap::new()).await;
    assert!(response.state.is_none());
    assert_eq!(
        response.diagnostics.errors().next().unwrap().attribute,
        Some(AttributePath::root("name"))
    );
    assert_eq!(client.query_count(), 0);
}

#[tokio::test]
async fn interface_unknown_or_empty_name_is_rejected_without_query() {
    let client = Arc::new(FakeClient::router());
    let source = configured(NetworkInterfaceDataSource::new(), client.clone());

    for name in [AttrValue::Unknown, string("")] {
        let response = source.read(&object([("name", name)])).await;
        assert!(response.state.is_none());
        assert_eq!(response.diagnostics.error_count(), 1);
        assert_eq!(
            response.diagnostics.errors().next().unwrap().attribute,
            Some(AttributePath::root("name"))
        );
    }
    assert_eq!(client.query_count(), 0);
}

#[tokio::test]
async fn interface_unsupported_attribute_is_rejected_without_query() {
    let client = Arc::new(FakeClient::router());
    let source = configured(NetworkInterfaceDataSource::new(), client.clone());

    let config = object([("name", string("lan")), ("mtu", AttrValue::Int64(1500))]);
    let response = source.read(&config).await;
    assert!(response.state.is_none());
    assert!(response.diagnostics.has_error());
    assert_eq!(client.query_count(), 0);
}

#[tokio::test]
async fn interface_float_name_is_rejected_without_query() {
    let client = Arc::new(FakeClient::router());
    let source = configured(NetworkInterfaceDataSource::new(), client.clone());

    let config = AttrValue::from(serde_json::json!({"name": 1.5}))
        .into_object()
        .unwrap();
    let response = source.read(&config).await;

    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.error_count(), 1);
    let error = response.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Incorrect Attribute Value Type");
    assert_eq!(error.attribute, Some(AttributePath::root("name")));
    assert_eq!(client.query_count(), 0);
}

#[tokio::test]
async fn repeated_reads_produce_identical_state() {
    let source = configured(NetworkInterfaceDataSource::new(), Arc::new(FakeClient::router()));

    let first = source.read(&interface("wan")).await.state.unwrap();
    let second = source.read(&interface("wan")).await.state.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn failed_read_leaves_instance_reusable() {
    let source = configured(NetworkInterfaceDataSource::new(), Arc::new(FakeClient::router()));

    assert!(source.read(&interface("guest")).await.state.is_none());
    assert!(source.read(&interface("lan")).await.state.is_some());
    assert_eq!(source.lifecycle(), Lifecycle::Ready);
}
