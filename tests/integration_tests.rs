//! Integration tests using a mock HTTP endpoint
//!
//! Tests the full flow: settings → database handle → collection group →
//! partition stream → bounded sub-queries, over an HTTP datastore.

use std::sync::Arc;

use futures::{StreamExt, TryStreamExt};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docstore_cdk::decode::FieldValue;
use docstore_cdk::query::{Cursor, StructuredQuery};
use docstore_cdk::transport::{Datastore, HttpDatastore, HttpDatastoreConfig, PartitionQueryRequest};
use docstore_cdk::{Database, Error, QueryPartition, Settings};

const PARENT: &str = "projects/p1/databases/(default)/documents";
const PARTITION_PATH: &str = "/v1/projects/p1/databases/(default)/documents:partitionQuery";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn message_name(id: &str) -> serde_json::Value {
    json!({
        "referenceValue": format!("{PARENT}/rooms/r1/messages/{id}")
    })
}

fn split_cursor(id: &str) -> serde_json::Value {
    json!({"values": [message_name(id)]})
}

fn partition_request(partition_count: u32) -> PartitionQueryRequest {
    PartitionQueryRequest::new(
        PARENT,
        StructuredQuery::collection_group("messages"),
        partition_count,
    )
}

// ============================================================================
// HTTP Datastore Integration Tests
// ============================================================================

#[tokio::test]
async fn test_partition_query_single_page() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PARTITION_PATH))
        .and(body_partial_json(json!({"partitionCount": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "partitions": [split_cursor("m1"), split_cursor("m2")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let datastore = HttpDatastore::new(mock_server.uri()).unwrap();
    let cursors: Vec<Cursor> = datastore
        .partition_query_stream(partition_request(3))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(cursors.len(), 2);
    assert_eq!(cursors[0].values, vec![message_name("m1")]);
    assert_eq!(cursors[1].values, vec![message_name("m2")]);
}

#[tokio::test]
async fn test_partition_query_follows_next_page_token() {
    init_tracing();
    let mock_server = MockServer::start().await;

    // First request gets page one; the follow-up carries the page token.
    Mock::given(method("POST"))
        .and(path(PARTITION_PATH))
        .and(body_partial_json(json!({"partitionCount": 9, "pageSize": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "partitions": [split_cursor("m1"), split_cursor("m2")],
            "nextPageToken": "page-2"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(PARTITION_PATH))
        .and(body_partial_json(json!({"pageToken": "page-2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "partitions": [split_cursor("m3")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let datastore = HttpDatastore::with_config(
        HttpDatastoreConfig::builder()
            .endpoint(mock_server.uri())
            .page_size(2)
            .build(),
    )
    .unwrap();

    let cursors: Vec<Cursor> = datastore
        .partition_query_stream(partition_request(9))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(cursors.len(), 3);
    assert_eq!(cursors[2].values, vec![message_name("m3")]);
}

#[tokio::test]
async fn test_partition_query_http_error() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PARTITION_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "permission denied"
        })))
        .mount(&mock_server)
        .await;

    let datastore = HttpDatastore::new(mock_server.uri()).unwrap();
    let result: Result<Vec<Cursor>, Error> = datastore
        .partition_query_stream(partition_request(3))
        .await
        .unwrap()
        .try_collect()
        .await;

    match result.unwrap_err() {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("permission denied"));
        }
        err => panic!("Expected HttpStatus error, got {err:?}"),
    }
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PARTITION_PATH))
        .and(header("authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"partitions": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let datastore = HttpDatastore::with_config(
        HttpDatastoreConfig::builder()
            .endpoint(mock_server.uri())
            .header("authorization", "Bearer integration-token")
            .build(),
    )
    .unwrap();

    let cursors: Vec<Cursor> = datastore
        .partition_query_stream(partition_request(3))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert!(cursors.is_empty());
}

// ============================================================================
// End-to-End Partitioning Tests
// ============================================================================

#[tokio::test]
async fn test_end_to_end_partitioned_queries() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PARTITION_PATH))
        .and(body_partial_json(json!({
            "structuredQuery": {
                "from": [{"collectionId": "messages", "allDescendants": true}],
                "orderBy": [{"field": {"fieldPath": "__name__"}}],
            },
            "partitionCount": 3,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "partitions": [split_cursor("m1"), split_cursor("m2")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = Settings::new("p1").with_endpoint(mock_server.uri());
    let datastore = Arc::new(HttpDatastore::new(settings.endpoint.clone().unwrap()).unwrap());
    let database = Database::from_settings(&settings, datastore).unwrap();

    let partitions: Vec<QueryPartition> = database
        .collection_group("messages")
        .unwrap()
        .get_partitions(4)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    // Two split points pair into three contiguous partitions.
    assert_eq!(partitions.len(), 3);
    assert_eq!(partitions[0].start_at_raw(), None);
    assert_eq!(partitions[0].end_before_raw(), partitions[1].start_at_raw());
    assert_eq!(partitions[1].end_before_raw(), partitions[2].start_at_raw());
    assert_eq!(partitions[2].end_before_raw(), None);

    // Bounds decode to the references the server issued.
    let start = partitions[1].start_at().unwrap().unwrap();
    assert_eq!(start.len(), 1);
    match &start[0] {
        FieldValue::Reference(path) => {
            assert_eq!(path.formatted_name(), format!("{PARENT}/rooms/r1/messages/m1"));
        }
        other => panic!("Expected a reference bound, got {other:?}"),
    }

    // Each partition reconstructs a bounded sub-query under the root.
    let query = partitions[1].to_query();
    assert_eq!(query.parent().formatted_name(), PARENT);
    let body = serde_json::to_value(query.structured_query()).unwrap();
    assert_eq!(body["startAt"], json!({"values": [message_name("m1")], "before": true}));
    assert_eq!(body["endAt"], json!({"values": [message_name("m2")], "before": true}));
}

#[tokio::test]
async fn test_single_partition_needs_no_http_call() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let datastore = Arc::new(HttpDatastore::new(mock_server.uri()).unwrap());
    let database = Database::new("p1", "(default)", datastore);

    let partitions: Vec<QueryPartition> = database
        .collection_group("messages")
        .unwrap()
        .get_partitions(1)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(partitions.len(), 1);
    assert_eq!(partitions[0].start_at_raw(), None);
    assert_eq!(partitions[0].end_before_raw(), None);
}

#[tokio::test]
async fn test_dropping_the_partition_stream_abandons_remaining_pages() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PARTITION_PATH))
        .and(body_partial_json(json!({"partitionCount": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "partitions": [split_cursor("m1"), split_cursor("m2")],
            "nextPageToken": "page-2"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    // The second page must never be requested.
    Mock::given(method("POST"))
        .and(path(PARTITION_PATH))
        .and(body_partial_json(json!({"pageToken": "page-2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"partitions": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let datastore = Arc::new(HttpDatastore::new(mock_server.uri()).unwrap());
    let database = Database::new("p1", "(default)", datastore);

    let mut partitions = database
        .collection_group("messages")
        .unwrap()
        .get_partitions(6)
        .await
        .unwrap();

    let first = partitions.next().await.unwrap().unwrap();
    assert_eq!(first.start_at_raw(), None);
    drop(partitions);
}
