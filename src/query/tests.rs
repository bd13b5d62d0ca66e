//! Tests for the query model and partition generation

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::decode::WireValueDecoder;
use crate::error::{Error, Result};
use crate::partition::QueryPartition;
use crate::path::QualifiedResourcePath;
use crate::transport::{CursorStream, Datastore, PartitionQueryRequest};
use crate::types::JsonValue;

/// Datastore double that replays a scripted cursor sequence and records the
/// requests it receives.
struct ScriptedDatastore {
    cursors: Vec<Cursor>,
    fail_after: Option<usize>,
    requests: Mutex<Vec<PartitionQueryRequest>>,
}

impl ScriptedDatastore {
    fn new(cursors: Vec<Cursor>) -> Self {
        Self {
            cursors,
            fail_after: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing_after(cursors: Vec<Cursor>, after: usize) -> Self {
        Self {
            cursors,
            fail_after: Some(after),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<PartitionQueryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Datastore for ScriptedDatastore {
    async fn partition_query_stream(
        &self,
        request: PartitionQueryRequest,
    ) -> Result<CursorStream> {
        self.requests.lock().unwrap().push(request);
        let mut items: Vec<Result<Cursor>> = self.cursors.iter().cloned().map(Ok).collect();
        if let Some(after) = self.fail_after {
            items.truncate(after);
            items.push(Err(Error::stream("scripted failure")));
        }
        Ok(Box::pin(stream::iter(items)))
    }
}

fn root() -> QualifiedResourcePath {
    QualifiedResourcePath::new("proj", "db")
}

fn group(datastore: &Arc<ScriptedDatastore>) -> CollectionGroup {
    let datastore: Arc<dyn Datastore> = datastore.clone();
    CollectionGroup::new(root(), "messages", datastore, Arc::new(WireValueDecoder::new()))
}

fn name_value(id: &str) -> JsonValue {
    json!({
        "referenceValue": format!("projects/proj/databases/db/documents/rooms/r1/messages/{id}")
    })
}

fn name_cursor(id: &str) -> Cursor {
    Cursor::new(vec![name_value(id)])
}

// ============================================================================
// Wire Shape Tests
// ============================================================================

#[test]
fn test_collection_group_query_shape() {
    let query = StructuredQuery::collection_group("messages");

    let value = serde_json::to_value(&query).unwrap();
    assert_eq!(
        value,
        json!({
            "from": [{"collectionId": "messages", "allDescendants": true}],
            "orderBy": [{"field": {"fieldPath": "__name__"}, "direction": "ASCENDING"}],
        })
    );
}

#[test]
fn test_cursor_serialization() {
    let cursor = Cursor::before(vec![json!({"stringValue": "a"})]);
    assert_eq!(
        serde_json::to_value(&cursor).unwrap(),
        json!({"values": [{"stringValue": "a"}], "before": true})
    );

    // Defaults are omitted on the wire.
    assert_eq!(serde_json::to_value(Cursor::default()).unwrap(), json!({}));
}

#[test]
fn test_cursor_deserialization_defaults() {
    let cursor: Cursor = serde_json::from_value(json!({
        "values": [{"stringValue": "a"}]
    }))
    .unwrap();

    assert_eq!(cursor.values, vec![json!({"stringValue": "a"})]);
    assert!(!cursor.before);

    let empty: Cursor = serde_json::from_str("{}").unwrap();
    assert!(empty.values.is_empty());
}

#[test]
fn test_direction_uses_wire_names() {
    assert_eq!(
        serde_json::to_value(Direction::Ascending).unwrap(),
        json!("ASCENDING")
    );
    assert_eq!(
        serde_json::to_value(Direction::Descending).unwrap(),
        json!("DESCENDING")
    );
}

// ============================================================================
// CollectionGroup Tests
// ============================================================================

#[test]
fn test_to_query_covers_the_whole_group() {
    let datastore = Arc::new(ScriptedDatastore::new(vec![]));
    let query = group(&datastore).to_query();

    assert_eq!(query.parent(), &root());
    assert_eq!(
        query.structured_query(),
        &StructuredQuery::collection_group("messages")
    );
}

#[tokio::test]
async fn test_zero_partition_count_fails_before_any_call() {
    let datastore = Arc::new(ScriptedDatastore::new(vec![name_cursor("m1")]));

    let err = group(&datastore).get_partitions(0).await.unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(datastore.requests().is_empty());
}

#[tokio::test]
async fn test_single_partition_skips_the_datastore() {
    let datastore = Arc::new(ScriptedDatastore::new(vec![name_cursor("m1")]));

    let partitions: Vec<QueryPartition> = group(&datastore)
        .get_partitions(1)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert!(datastore.requests().is_empty());
    assert_eq!(partitions.len(), 1);
    assert_eq!(partitions[0].start_at_raw(), None);
    assert_eq!(partitions[0].end_before_raw(), None);
}

#[tokio::test]
async fn test_get_partitions_requests_one_less_split_point() {
    let datastore = Arc::new(ScriptedDatastore::new(vec![
        name_cursor("m1"),
        name_cursor("m2"),
    ]));

    let partitions: Vec<QueryPartition> = group(&datastore)
        .get_partitions(4)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let requests = datastore.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].parent, "projects/proj/databases/db/documents");
    assert_eq!(requests[0].partition_count, 3);
    assert_eq!(
        requests[0].structured_query,
        StructuredQuery::collection_group("messages")
    );

    // Two split points make three contiguous partitions.
    assert_eq!(partitions.len(), 3);
    assert_eq!(partitions[0].start_at_raw(), None);
    assert_eq!(partitions[0].end_before_raw(), partitions[1].start_at_raw());
    assert_eq!(partitions[1].end_before_raw(), partitions[2].start_at_raw());
    assert_eq!(partitions[2].end_before_raw(), None);
}

#[tokio::test]
async fn test_fewer_split_points_than_asked_still_cover_the_group() {
    // The server found only one natural split for a request of up to 9.
    let datastore = Arc::new(ScriptedDatastore::new(vec![name_cursor("m1")]));

    let partitions: Vec<QueryPartition> = group(&datastore)
        .get_partitions(10)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(datastore.requests()[0].partition_count, 9);
    assert_eq!(partitions.len(), 2);
    assert_eq!(partitions[0].start_at_raw(), None);
    assert_eq!(partitions[1].end_before_raw(), None);
}

#[tokio::test]
async fn test_transport_failure_surfaces_through_the_stream() {
    let datastore = Arc::new(ScriptedDatastore::failing_after(
        vec![name_cursor("m1"), name_cursor("m2")],
        1,
    ));

    let mut stream = group(&datastore).get_partitions(4).await.unwrap();

    assert!(stream.next().await.unwrap().is_ok());
    assert!(stream.next().await.unwrap().is_err());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_partition_queries_run_under_the_group_root() {
    let datastore = Arc::new(ScriptedDatastore::new(vec![name_cursor("m1")]));

    let partitions: Vec<QueryPartition> = group(&datastore)
        .get_partitions(2)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    for partition in &partitions {
        let query = partition.to_query();
        assert_eq!(query.parent(), &root());
        assert_eq!(query.structured_query().from.len(), 1);
        assert_eq!(query.structured_query().from[0].collection_id, "messages");
    }
}
