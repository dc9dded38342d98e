//! Terraform snippet generation per migration pattern.

use migmap_assess_schema::PatternId;

/// Lowercased app name with underscores and spaces turned into dashes.
pub fn safe_name(app_name: &str) -> String {
    app_name.to_lowercase().replace(['_', ' '], "-")
}

/// Generate the Terraform starting point for an application.
///
/// The snippets are review-and-adjust scaffolding, not a complete
/// deployment.
pub fn generate_terraform(app_name: &str, pattern_id: PatternId) -> String {
    let safe = safe_name(app_name);
    match pattern_id {
        PatternId::P1 => format!(
            r#"resource "google_compute_global_address" "{safe}_lb_ip" {{
  name = "{safe}-lb-ip"
}}

resource "google_compute_security_policy" "{safe}_armor" {{
  name = "{safe}-armor"
  rule {{
    action   = "allow"
    priority = "1000"
    match {{
      versioned_expr = "SRC_IPS_V1"
      config {{ src_ip_ranges = ["0.0.0.0/0"] }}
    }}
  }}
}}

resource "google_compute_region_instance_group_manager" "{safe}_svc_mig" {{
  name               = "{safe}-svc-mig"
  region             = "us-central1"
  base_instance_name = "{safe}-svc"
  target_size        = 3
}}
"#
        ),
        PatternId::P2 => format!(
            r#"resource "google_compute_url_map" "{safe}_urlmap" {{
  name            = "{safe}-global-url-map"
  default_service = google_compute_backend_service.{safe}_backend.id
}}

resource "google_compute_backend_service" "{safe}_backend" {{
  name                            = "{safe}-backend"
  load_balancing_scheme           = "EXTERNAL_MANAGED"
  protocol                        = "HTTP"
  timeout_sec                     = 30
  connection_draining_timeout_sec = 30
  locality_lb_policy              = "ROUND_ROBIN"
}}

resource "google_compute_target_https_proxy" "{safe}_proxy" {{
  name    = "{safe}-https-proxy"
  url_map = google_compute_url_map.{safe}_urlmap.id
}}
"#
        ),
        PatternId::P3 => format!(
            r#"resource "google_sql_database_instance" "{safe}_sql" {{
  name             = "{safe}-sql"
  database_version = "POSTGRES_15"
  region           = "us-central1"
  settings {{ tier = "db-custom-2-7680" availability_type = "REGIONAL" }}
}}

resource "google_database_migration_service_connection_profile" "{safe}_src" {{
  location              = "us-central1"
  connection_profile_id = "{safe}-src-profile"
}}

resource "google_database_migration_service_migration_job" "{safe}_job" {{
  location          = "us-central1"
  migration_job_id  = "{safe}-dms-job"
  type              = "CONTINUOUS"
}}
"#
        ),
        PatternId::P4 => format!(
            r#"resource "google_container_cluster" "{safe}" {{
  name     = "{safe}-gke"
  location = "us-central1"
  remove_default_node_pool = true
  initial_node_count = 1
}}

resource "google_container_node_pool" "{safe}_np" {{
  name       = "{safe}-np"
  location   = "us-central1"
  cluster    = google_container_cluster.{safe}.name
  node_count = 2
}}
"#
        ),
        PatternId::P5 => format!(
            r#"resource "google_pubsub_topic" "{safe}_topic" {{
  name = "{safe}-events"
}}

resource "google_pubsub_subscription" "{safe}_sub" {{
  name  = "{safe}-events-sub"
  topic = google_pubsub_topic.{safe}_topic.name
  dead_letter_policy {{
    dead_letter_topic     = google_pubsub_topic.{safe}_dlq.id
    max_delivery_attempts = 10
  }}
}}

resource "google_pubsub_topic" "{safe}_dlq" {{
  name = "{safe}-events-dlq"
}}
"#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_name_normalizes() {
        assert_eq!(safe_name("Billing_Service v2"), "billing-service-v2");
    }

    #[test]
    fn test_p3_provisions_cloud_sql_and_dms() {
        let tf = generate_terraform("orders", PatternId::P3);
        assert!(tf.contains("google_sql_database_instance"));
        assert!(tf.contains("google_database_migration_service_migration_job"));
        assert!(tf.contains("\"orders-sql\""));
    }

    #[test]
    fn test_p5_wires_dead_letter_topic() {
        let tf = generate_terraform("events", PatternId::P5);
        assert!(tf.contains("dead_letter_policy"));
        assert!(tf.contains("events-events-dlq"));
    }

    #[test]
    fn test_each_pattern_yields_distinct_resources() {
        let kinds = [
            (PatternId::P1, "google_compute_security_policy"),
            (PatternId::P2, "google_compute_url_map"),
            (PatternId::P3, "google_sql_database_instance"),
            (PatternId::P4, "google_container_cluster"),
            (PatternId::P5, "google_pubsub_topic"),
        ];
        for (id, resource) in kinds {
            assert!(generate_terraform("app", id).contains(resource));
        }
    }
}
