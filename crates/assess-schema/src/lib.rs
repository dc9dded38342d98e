//! Assessment schema definitions for migmap.
//!
//! This crate defines the shared data model: the migration pattern
//! catalog, classification results, scanned application records, scan
//! runs, findings records, integration models, graphs, and bundles.

pub mod application;
pub mod bundle;
pub mod classify;
pub mod findings;
pub mod graph;
pub mod integration;
pub mod pattern;
pub mod scan;

pub use application::Application;
pub use bundle::MigrationBundle;
pub use classify::{ClassificationResult, Complexity};
pub use findings::Finding;
pub use graph::{AssessmentGraph, EdgeKind, GraphEdge, GraphNode, NodeKind, RiskBand};
pub use integration::{AppLink, Coupling, DbLink, IntegrationModel};
pub use pattern::{pattern, Pattern, PatternId};
pub use scan::{ScanRun, ScanStatus, ScanSummary};
