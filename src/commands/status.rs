use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::{AnalysisReport, AnalysisRunManifest};

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_path = args.out_dir.join("manifests").join("analysis_run.json");
    let report_path = args.out_dir.join("report.json");

    info!(out_dir = %args.out_dir.display(), "status requested");

    if manifest_path.exists() {
        let raw = fs::read(&manifest_path)
            .with_context(|| format!("failed to read {}", manifest_path.display()))?;
        let manifest: AnalysisRunManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

        info!(
            run_id = %manifest.run_id,
            status = %manifest.status,
            category = %manifest.category,
            started_at = %manifest.started_at,
            finished_at = %manifest.finished_at,
            filter_rows_all = manifest.counts.filter_rows_all,
            filter_rows_seo = manifest.counts.filter_rows_seo,
            urls_loaded = manifest.counts.urls_loaded,
            keywords_loaded = manifest.counts.keywords_loaded,
            cannibalization_cases = manifest.counts.cannibalization_cases,
            demand_gaps = manifest.counts.demand_gaps,
            recommendations = manifest.counts.recommendations,
            warnings = manifest.warnings.len(),
            "loaded run manifest"
        );
        for warning in &manifest.warnings {
            warn!(warning = %warning, "run warning");
        }
    } else {
        warn!(path = %manifest_path.display(), "run manifest missing");
    }

    if report_path.exists() {
        let raw = fs::read(&report_path)
            .with_context(|| format!("failed to read {}", report_path.display()))?;
        let report: AnalysisReport = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", report_path.display()))?;

        info!(
            generated_at = %report.generated_at,
            category = %report.category,
            total_urls = report.summary.total_urls,
            cannibalization_rate = report.summary.cannibalization_rate,
            gaps_found = report.summary.gaps_found,
            top_facet = %report.summary.top_facet.unwrap_or_default(),
            "loaded analysis report"
        );
    } else {
        warn!(path = %report_path.display(), "analysis report missing");
    }

    Ok(())
}
