//! Migmap planner - generate migration scaffolding per application.

pub mod architecture;
pub mod pipeline;
pub mod terraform;

use anyhow::Result;
use migmap_assess_schema::{Application, PatternId};
use serde::Serialize;
use tracing::info;

/// Everything the planner produces for one application.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationPlan {
    pub app_id: String,
    pub app_name: String,
    pub pattern_id: PatternId,
    pub architecture: architecture::TargetArchitecture,
    pub terraform: String,
    pub jenkinsfile: String,
    pub pipeline_yaml: String,
    pub diff: architecture::DiffPayload,
}

/// Build the migration plan for an application.
pub fn build_plan(app: &Application) -> MigrationPlan {
    MigrationPlan {
        app_id: app.id.clone(),
        app_name: app.name.clone(),
        pattern_id: app.pattern_id,
        architecture: architecture::architecture_for(app.pattern_id),
        terraform: terraform::generate_terraform(&app.name, app.pattern_id),
        jenkinsfile: pipeline::generate_jenkinsfile(&app.name, app.pattern_id),
        pipeline_yaml: pipeline::generate_pipeline_yaml(&app.name, app.pattern_id),
        diff: architecture::diff_payload(app.pattern_id),
    }
}

/// Write plan artifacts into a per-application directory.
pub fn generate_artifacts(plan: &MigrationPlan, output_dir: &std::path::Path) -> Result<()> {
    let app_dir = output_dir.join(&plan.app_id);
    std::fs::create_dir_all(&app_dir)?;

    std::fs::write(app_dir.join("main.tf"), &plan.terraform)?;
    std::fs::write(app_dir.join("Jenkinsfile"), &plan.jenkinsfile)?;
    std::fs::write(app_dir.join("pipeline.yaml"), &plan.pipeline_yaml)?;
    std::fs::write(
        app_dir.join("architecture.json"),
        serde_json::to_string_pretty(&plan.architecture)?,
    )?;
    std::fs::write(
        app_dir.join("changed-files.json"),
        serde_json::to_string_pretty(&plan.diff)?,
    )?;

    info!("Generated migration artifacts for app: {}", plan.app_id);
    Ok(())
}
