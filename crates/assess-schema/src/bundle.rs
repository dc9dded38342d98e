//! Migration bundle - a connected group of applications recommended to
//! migrate together.

use crate::integration::Coupling;
use crate::pattern::PatternId;
use serde::{Deserialize, Serialize};

/// One migration-wave bundle: a connected component of the coupling
/// graph with aggregate scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationBundle {
    /// `BUNDLE-NNN`, assigned by descending component size.
    pub bundle_id: String,
    /// Dominant pattern by member majority.
    pub pattern_id: PatternId,
    /// Member application ids; bundles partition the run's applications.
    pub app_ids: Vec<String>,
    /// Mean member risk score, 2 decimals.
    pub avg_risk: f64,
    /// Tight iff affinity_score >= max(4, 2 x member count).
    pub coupling: Coupling,
    /// Sum of pairwise affinity over internal pairs.
    pub affinity_score: u32,
    /// Fixed explanatory string keyed by the coupling label.
    pub bundle_reason: String,
}

impl MigrationBundle {
    /// Explanation attached to each bundle for its coupling label.
    pub fn reason_for(coupling: Coupling) -> &'static str {
        match coupling {
            Coupling::Tight => "Tightly coupled via shared DB/integration",
            Coupling::Loose => "Loosely coupled; can migrate in silos",
        }
    }
}
