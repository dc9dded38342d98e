//! Migration pattern catalog.
//!
//! Five fixed target-architecture categories:
//!   P1 — GCE Replatform        : app server → GCE VM (Terraform + GitHub Actions)
//!   P2 — Load Balancer         : Azure LB → GCP Cloud Load Balancing
//!   P3 — Database Rebuild      : Azure SQL / managed DB → Cloud SQL + DMS
//!   P4 — PCF → GKE             : Pivotal Cloud Foundry → Google Kubernetes Engine
//!   P5 — Messaging Rebuild     : Azure Service Bus / Event Hub → Pub/Sub

use serde::{Deserialize, Serialize};

/// Identifier for one of the five migration patterns.
///
/// Declaration order (P1 → P5) is load-bearing: arg-max selections over
/// pattern scores resolve ties to the first-declared pattern.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PatternId {
    P1,
    P2,
    P3,
    P4,
    P5,
}

impl PatternId {
    /// All patterns in declaration order.
    pub const ALL: [PatternId; 5] = [
        PatternId::P1,
        PatternId::P2,
        PatternId::P3,
        PatternId::P4,
        PatternId::P5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternId::P1 => "P1",
            PatternId::P2 => "P2",
            PatternId::P3 => "P3",
            PatternId::P4 => "P4",
            PatternId::P5 => "P5",
        }
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PatternId {
    type Err = migmap_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P1" => Ok(PatternId::P1),
            "P2" => Ok(PatternId::P2),
            "P3" => Ok(PatternId::P3),
            "P4" => Ok(PatternId::P4),
            "P5" => Ok(PatternId::P5),
            other => Err(migmap_common::Error::Config(format!(
                "unknown pattern id: {other} (expected P1..P5)"
            ))),
        }
    }
}

/// Static description of a migration pattern.
#[derive(Debug, Clone, Serialize)]
pub struct Pattern {
    pub id: PatternId,
    pub name: &'static str,
    pub short: &'static str,
    pub target_platform: &'static str,
    pub description: &'static str,
}

const CATALOG: [Pattern; 5] = [
    Pattern {
        id: PatternId::P1,
        name: "GCE Replatform",
        short: "gce",
        target_platform: "GCE",
        description: "Redeploy app server to GCE - update Terraform & GitHub Actions",
    },
    Pattern {
        id: PatternId::P2,
        name: "Load Balancer Migration",
        short: "lb",
        target_platform: "Cloud Load Balancing",
        description: "Migrate Azure Load Balancer to GCP Cloud Load Balancing",
    },
    Pattern {
        id: PatternId::P3,
        name: "Database Rebuild",
        short: "db",
        target_platform: "Cloud SQL",
        description: "Rebuild database on Cloud SQL + DMS data replication",
    },
    Pattern {
        id: PatternId::P4,
        name: "PCF to GKE",
        short: "gke",
        target_platform: "GKE",
        description: "Migrate Pivotal Cloud Foundry apps to Google Kubernetes Engine",
    },
    Pattern {
        id: PatternId::P5,
        name: "Messaging Rebuild",
        short: "pubsub",
        target_platform: "Pub/Sub",
        description: "Rebuild messaging platform - Azure Service Bus / Event Hub to Pub/Sub",
    },
];

/// Look up the catalog entry for a pattern.
pub fn pattern(id: PatternId) -> &'static Pattern {
    &CATALOG[id as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_catalog_order_matches_ids() {
        for id in PatternId::ALL {
            assert_eq!(pattern(id).id, id);
        }
    }

    #[test]
    fn test_pattern_id_round_trip() {
        for id in PatternId::ALL {
            assert_eq!(PatternId::from_str(id.as_str()).unwrap(), id);
        }
        assert_eq!(PatternId::from_str("p4").unwrap(), PatternId::P4);
        assert!(PatternId::from_str("P9").is_err());
    }

    #[test]
    fn test_serde_uses_bare_id() {
        assert_eq!(serde_json::to_string(&PatternId::P3).unwrap(), "\"P3\"");
    }
}
