use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::AnalyzeArgs;
use crate::model::{
    AnalysisCounts, AnalysisPaths, AnalysisReport, AnalysisRunManifest, FilterInteraction,
    KeywordRecord, UrlRecord,
};
use crate::recommend::RecommendationInputs;
use crate::util::{ensure_directory, now_utc_string, utc_compact_string, write_json_pretty};
use crate::{export, indexation, loader, recommend, reconcile, usage};

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let started = Utc::now();
    let run_id = format!("analyze-{}", utc_compact_string(started));
    let category = args.category.trim().to_lowercase();

    ensure_directory(&args.out_dir)?;
    info!(run_id = %run_id, category = %category, "analysis started");

    let mut warnings = Vec::new();

    let filter_all = load_source(
        args.filter_usage_all.as_deref(),
        "filter-usage-all",
        loader::load_filter_usage,
        &mut warnings,
    )?;
    let filter_seo = load_source(
        args.filter_usage_seo.as_deref(),
        "filter-usage-seo",
        loader::load_filter_usage,
        &mut warnings,
    )?;
    let urls = load_source(
        args.top_query.as_deref(),
        "top-query",
        loader::load_url_records,
        &mut warnings,
    )?;
    let keywords = load_source(
        args.keywords.as_deref(),
        "keywords",
        loader::load_keywords,
        &mut warnings,
    )?;

    let report = build_report(&category, &filter_all, &filter_seo, &urls, &keywords);

    info!(
        total_urls = report.summary.total_urls,
        filters = report.summary.filters_count,
        articles = report.summary.articles_count,
        cannibalization_rate = report.summary.cannibalization_rate,
        gaps = report.summary.gaps_found,
        recommendations = report.recommendations.len(),
        "analysis finished"
    );
    if let Some(top_facet) = &report.summary.top_facet {
        info!(
            top_facet = %top_facet,
            pct = report.summary.top_facet_pct,
            "dominant facet"
        );
    }

    let report_path = args.out_dir.join("report.json");
    write_json_pretty(&report_path, &report)?;
    info!(path = %report_path.display(), "wrote analysis report");

    let exported = export::export_all(&report, &args.out_dir)?;
    info!(files = exported.len(), dir = %args.out_dir.display(), "wrote CSV exports");

    let manifest = AnalysisRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_owned(),
        started_at: started.to_rfc3339(),
        finished_at: now_utc_string(),
        category,
        counts: AnalysisCounts {
            filter_rows_all: filter_all.len(),
            filter_rows_seo: filter_seo.len(),
            urls_loaded: urls.len(),
            keywords_loaded: keywords.len(),
            cannibalization_cases: report.cannibalization.len(),
            demand_gaps: report.demand_gaps.len(),
            recommendations: report.recommendations.len(),
        },
        paths: AnalysisPaths {
            out_dir: args.out_dir.display().to_string(),
            report_path: report_path.display().to_string(),
        },
        warnings,
    };

    let manifest_dir = args.out_dir.join("manifests");
    ensure_directory(&manifest_dir)?;
    let manifest_path = manifest_dir.join("analysis_run.json");
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    Ok(())
}

/// Load one optional input source. A missing source is recorded as a
/// warning and contributes nothing; the analysis still runs on whatever
/// sources are present.
fn load_source<T>(
    path: Option<&Path>,
    label: &str,
    load: fn(&Path) -> Result<Vec<T>>,
    warnings: &mut Vec<String>,
) -> Result<Vec<T>> {
    let Some(path) = path else {
        warn!(source = label, "input source not provided, skipping");
        warnings.push(format!("{label}: not provided"));
        return Ok(Vec::new());
    };

    let rows = load(path)?;
    info!(source = label, rows = rows.len(), path = %path.display(), "loaded input source");
    Ok(rows)
}

/// Run the full pipeline over already-loaded inputs. Kept separate from
/// the command wrapper so tests can drive it without touching the
/// filesystem.
pub fn build_report(
    category: &str,
    filter_all: &[FilterInteraction],
    filter_seo: &[FilterInteraction],
    urls: &[UrlRecord],
    keywords: &[KeywordRecord],
) -> AnalysisReport {
    let facet_usage = usage::summarize_usage(filter_all);
    let facet_priority_order = usage::facet_priority_order(&facet_usage);
    let facet_cross = usage::cross_source(filter_all, filter_seo);
    let noindex_facets = usage::noindex_facets(filter_all);

    let url_classification = reconcile::classify_records(urls, category);
    let cannibalization = reconcile::detect_cannibalization(&url_classification, category);
    let demand_gaps = reconcile::detect_demand_gaps(keywords, &url_classification, category);
    let facet_performance = reconcile::facet_performance(&url_classification);
    let ux_seo_matrix = reconcile::ux_seo_matrix(&facet_usage, &facet_performance);
    let value_alignment = reconcile::value_alignment(filter_all, &facet_performance);
    let indexation_audit = indexation::audit_urls(&url_classification);

    let recommendations = recommend::synthesize(&RecommendationInputs {
        facet_priority_order: &facet_priority_order,
        cannibalization: &cannibalization,
        demand_gaps: &demand_gaps,
        ux_seo_matrix: &ux_seo_matrix,
        noindex_facets: &noindex_facets,
    });
    let summary = recommend::summarize(
        &url_classification,
        &cannibalization,
        &demand_gaps,
        &facet_usage,
        &facet_priority_order,
    );

    AnalysisReport {
        report_version: 1,
        generated_at: now_utc_string(),
        category: category.to_owned(),
        facet_usage,
        facet_cross,
        facet_priority_order,
        noindex_facets,
        url_classification,
        facet_performance,
        ux_seo_matrix,
        value_alignment,
        cannibalization,
        demand_gaps,
        indexation_audit,
        recommendations,
        summary,
    }
}
