//! Tests for logging initialization

use idealayout::core::logging::{init_logging, LogFormat, FORMAT_ENV, LEVEL_ENV};
use idealayout::prelude::*;
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("invalid").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert_eq!(variants, &["compact", "pretty", "json"]);
}

#[test]
fn test_env_var_names() {
    assert_eq!(LEVEL_ENV, "IDEALAYOUT_LOG_LEVEL");
    assert_eq!(FORMAT_ENV, "IDEALAYOUT_LOG_FORMAT");
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_layout_runs_under_subscriber() {
    // Only the first initialization in this process can succeed
    let _ = init_logging(Some("trace"), Some("compact"));
    let _ = init_logging(Some("debug"), Some("json"));

    let nodes = vec![GraphNode::new("A", ()), GraphNode::new("B", ()), GraphNode::new("C", ())];
    let edges: Vec<GraphEdge<()>> = vec![
        GraphEdge::between("A", "B"),
        GraphEdge::between("B", "C"),
        GraphEdge::between("C", "A"),
    ];
    let layout = LayoutEngine::new().relayout_all(nodes, &edges);
    assert!(layout.is_degraded());
}
