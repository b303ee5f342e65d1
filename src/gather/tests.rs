//! Tests for gather module

use super::*;
use crate::config::HarvesterConfig;
use crate::error::{Error, Result};
use crate::http::{PageSource, RawResponse};
use crate::pagination::OffsetPaginator;
use crate::path::PathExpression;
use crate::schema::{FieldDefinition, SynthesisOptions};
use crate::types::SchemaFormat;
use crate::window::{HarvestWindow, WindowRouter};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;

// ============================================================================
// Fixed Source
// ============================================================================

/// Serves a fixed record list per month, ignoring the year
struct FixedSource {
    paginator: OffsetPaginator,
    by_month: HashMap<u32, Vec<Value>>,
}

impl FixedSource {
    fn new(page_size: u32) -> Self {
        Self {
            paginator: OffsetPaginator::new("startIndex", "resultsPerPage", page_size),
            by_month: HashMap::new(),
        }
    }

    fn with_month(mut self, month: u32, records: Vec<Value>) -> Self {
        self.by_month.insert(month, records);
        self
    }
}

#[async_trait]
impl PageSource for FixedSource {
    async fn fetch(&self, window: &HarvestWindow, offset: u64) -> Result<RawResponse> {
        let records = self.by_month.get(&window.month).cloned().unwrap_or_default();
        let total = records.len();
        let page: Vec<Value> = records
            .into_iter()
            .skip(offset as usize)
            .take(self.paginator.page_size as usize)
            .collect();
        Ok(RawResponse::ok(
            json!({"totalResults": total, "vulnerabilities": page}).to_string(),
        ))
    }

    fn paginator(&self) -> &OffsetPaginator {
        &self.paginator
    }
}

fn router() -> WindowRouter {
    WindowRouter::new(2020, 2020).unwrap()
}

fn cve(id: &str, score: f64) -> Value {
    json!({"cve": {"id": id, "metrics": [{"baseScore": score}]}})
}

// ============================================================================
// Project Mode Tests
// ============================================================================

#[tokio::test]
async fn test_project_writes_header_then_rows() {
    let source = FixedSource::new(2)
        .with_month(1, vec![cve("CVE-1", 9.0), cve("CVE-2", 4.5), cve("CVE-3", 7.0)])
        .with_month(7, vec![json!({"cve": {"id": "CVE-4"}})]);
    let schema = Schema::from_fields(vec![
        FieldDefinition::counter("#"),
        FieldDefinition::new("id", PathExpression::parse(["cve", "id"]).unwrap()),
        FieldDefinition::new(
            "score",
            PathExpression::parse(["cve", "metrics", "0", "baseScore"]).unwrap(),
        ),
    ])
    .unwrap();

    let mut sink: Vec<String> = Vec::new();
    let mut status: Vec<String> = Vec::new();
    let stats = Gatherer::new(&source, HarvesterConfig::immediate())
        .project(&router(), &schema, &mut sink, &mut status)
        .await
        .unwrap();

    assert_eq!(
        sink,
        vec![
            "#,id,score\n",
            "1,\"CVE-1\",9\n",
            "2,\"CVE-2\",4.5\n",
            "3,\"CVE-3\",7\n",
            "4,\"CVE-4\",\n",
        ]
    );
    assert_eq!(stats.lines_written, 5);
    assert_eq!(stats.harvest.records, 4);
    assert_eq!(stats.harvest.windows, 12);
    // January needs two pages
    assert_eq!(stats.harvest.pages, 13);
}

#[tokio::test]
async fn test_project_counter_ignores_record_content() {
    let source = FixedSource::new(2000).with_month(
        3,
        vec![json!({}), json!([1, 2]), json!("scalar"), json!({"x": null})],
    );
    let schema = Schema::from_fields(vec![
        FieldDefinition::counter("row"),
        FieldDefinition::new("x", PathExpression::parse(["x"]).unwrap()),
    ])
    .unwrap();

    let mut sink: Vec<String> = Vec::new();
    let mut status: Vec<String> = Vec::new();
    Gatherer::new(&source, HarvesterConfig::immediate())
        .project(&router(), &schema, &mut sink, &mut status)
        .await
        .unwrap();

    assert_eq!(sink, vec!["row,x\n", "1,\n", "2,\n", "3,\n", "4,\n"]);
}

#[tokio::test]
async fn test_project_scenario_row() {
    let source = FixedSource::new(2000).with_month(1, vec![json!({"a": [{"b": 1}, {"b": 2}]})]);
    let schema = Schema::from_fields(vec![
        FieldDefinition::new("b", PathExpression::parse(["a", "0", "b"]).unwrap()),
        FieldDefinition::new("b_2", PathExpression::parse(["a", "1", "b"]).unwrap()),
    ])
    .unwrap();

    let mut sink: Vec<String> = Vec::new();
    let mut status: Vec<String> = Vec::new();
    Gatherer::new(&source, HarvesterConfig::immediate())
        .project(&router(), &schema, &mut sink, &mut status)
        .await
        .unwrap();

    assert_eq!(sink, vec!["b,b_2\n", "1,2\n"]);
}

#[tokio::test]
async fn test_project_sink_failure_is_fatal() {
    struct FailingSink;
    impl LineSink for FailingSink {
        fn write_line(&mut self, _line: &str) -> Result<()> {
            Err(Error::output("disk full"))
        }
    }

    let source = FixedSource::new(2000);
    let schema = Schema::from_fields(vec![FieldDefinition::counter("#")]).unwrap();
    let mut status: Vec<String> = Vec::new();

    let err = Gatherer::new(&source, HarvesterConfig::immediate())
        .project(&router(), &schema, &mut FailingSink, &mut status)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Output { .. }));
    assert!(status.is_empty());
}

// ============================================================================
// Discover Mode Tests
// ============================================================================

#[tokio::test]
async fn test_discover_uses_richest_record() {
    let source = FixedSource::new(1)
        .with_month(2, vec![json!({"cve": {"id": "CVE-1"}})])
        .with_month(
            5,
            vec![
                json!({"cve": {"id": "CVE-2", "tags": ["a", "b"]}}),
                json!({"cve": {"id": "CVE-3", "refs": ["x", "y"]}}),
            ],
        );

    let mut sink: Vec<String> = Vec::new();
    let mut status: Vec<String> = Vec::new();
    let (schema, stats) = Gatherer::new(&source, HarvesterConfig::immediate())
        .discover(&router(), &DiscoverOptions::new(), &mut sink, &mut status)
        .await
        .unwrap();

    // CVE-2 and CVE-3 tie at three leaves; the earlier record wins
    assert_eq!(stats.sample_leaves, Some(3));
    assert_eq!(schema.headers(), vec!["id", "tags", "tags_2"]);
    assert_eq!(sink, vec!["id:cve,id\n", "tags:cve,tags,0\n", "tags_2:cve,tags,1\n"]);
    assert_eq!(stats.lines_written, 3);
}

#[tokio::test]
async fn test_discover_structured_with_limit() {
    let source = FixedSource::new(2000).with_month(1, vec![json!({"a": [{"b": 1}, {"b": 2}]})]);
    let options = DiscoverOptions::new()
        .with_format(SchemaFormat::Structured)
        .with_synthesis(SynthesisOptions::new().with_max_header_parts(2).with_limit(1));

    let mut sink: Vec<String> = Vec::new();
    let mut status: Vec<String> = Vec::new();
    let (schema, _) = Gatherer::new(&source, HarvesterConfig::immediate())
        .discover(&router(), &options, &mut sink, &mut status)
        .await
        .unwrap();

    assert_eq!(schema.len(), 1);
    assert_eq!(sink.concat(), "{\n\t\"b\":[\"a\",0,\"b\"]\n}\n");
}

#[tokio::test]
async fn test_discover_without_records_writes_empty_schema() {
    let source = FixedSource::new(2000);
    let mut sink: Vec<String> = Vec::new();
    let mut status: Vec<String> = Vec::new();

    let (schema, stats) = Gatherer::new(&source, HarvesterConfig::immediate())
        .discover(&router(), &DiscoverOptions::new(), &mut sink, &mut status)
        .await
        .unwrap();

    assert!(schema.is_empty());
    assert!(sink.is_empty());
    assert_eq!(stats.sample_leaves, None);
}

#[test]
fn test_write_schema_structured_empty() {
    let mut sink: Vec<String> = Vec::new();
    let lines = write_schema(&Schema::new(), SchemaFormat::Structured, &mut sink).unwrap();
    assert_eq!(lines, 1);
    assert_eq!(sink, vec!["{}\n"]);
}

// ============================================================================
// RichestSample Tests
// ============================================================================

#[test]
fn test_richest_sample_strictly_greater_replaces() {
    let mut sample = RichestSample::new();
    assert!(sample.is_empty());

    assert!(sample.offer(json!({})));
    assert_eq!(sample.leaf_count(), Some(0));
    assert!(sample.offer(json!({"a": 1})));
    assert!(!sample.offer(json!({"b": 2})));
    assert!(sample.offer(json!({"c": [1, 2]})));
    assert!(!sample.offer(json!({"d": 1})));

    assert_eq!(sample.record(), Some(&json!({"c": [1, 2]})));
    assert_eq!(sample.into_record(), Some(json!({"c": [1, 2]})));
}

#[test]
fn test_richest_sample_merge_is_associative() {
    let sample = |record: Value| {
        let mut s = RichestSample::new();
        s.offer(record);
        s
    };
    let a = || sample(json!({"a": 1, "b": 2}));
    let b = || sample(json!({"c": 1, "d": 2}));
    let c = || sample(json!({"e": 1}));

    let left = a().merge(b()).merge(c());
    let right = a().merge(b().merge(c()));
    assert_eq!(left, right);
    // Tie between a and b keeps a
    assert_eq!(left.record(), Some(&json!({"a": 1, "b": 2})));

    assert_eq!(RichestSample::new().merge(c()), c());
    assert_eq!(c().merge(RichestSample::new()), c());
}
