//! CSV exports of the analysis findings, one file per finding family.
//! Enum cells reuse the same tags as the JSON report so the two outputs
//! stay joinable.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;
use serde::Serialize;
use tracing::debug;

use crate::model::{
    AnalysisReport, CannibalizationCase, ClassifiedUrl, DemandGap, FacetUsageSummary, Impact,
    IndexationVerdict, Recommendation,
};

/// Serde tag of a unit enum variant, e.g. `GapPriority::High` -> `HIGH`.
fn tag<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

fn impact_cell(impact: &Impact) -> String {
    match impact {
        Impact::Count(count) => count.to_string(),
        Impact::Severity(severity) => tag(severity),
    }
}

fn writer(path: &Path) -> Result<Writer<File>> {
    let file = File::create(path)
        .with_context(|| format!("creating export file {}", path.display()))?;
    Ok(Writer::from_writer(file))
}

pub fn export_recommendations(rows: &[Recommendation], path: &Path) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record(["priority_rank", "type", "action", "reason", "impact"])?;
    for row in rows {
        wtr.write_record([
            row.priority_rank.to_string(),
            tag(&row.rec_type),
            row.action.clone(),
            row.reason.clone(),
            impact_cell(&row.impact),
        ])?;
    }
    wtr.flush()?;
    debug!(rows = rows.len(), file = %path.display(), "exported recommendations");
    Ok(())
}

pub fn export_cannibalization(rows: &[CannibalizationCase], path: &Path) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record(["query", "ranking_url", "suggested_target_url", "impact_score"])?;
    for row in rows {
        wtr.write_record([
            row.query.clone(),
            row.ranking_url.clone(),
            row.suggested_target_url.clone(),
            row.impact_score.to_string(),
        ])?;
    }
    wtr.flush()?;
    debug!(rows = rows.len(), file = %path.display(), "exported cannibalization cases");
    Ok(())
}

pub fn export_demand_gaps(rows: &[DemandGap], path: &Path) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record(["keyword", "volume", "intent", "suggested_filter_url", "priority"])?;
    for row in rows {
        wtr.write_record([
            row.keyword.clone(),
            row.volume.to_string(),
            tag(&row.intent),
            row.suggested_filter_url.clone(),
            tag(&row.priority),
        ])?;
    }
    wtr.flush()?;
    debug!(rows = rows.len(), file = %path.display(), "exported demand gaps");
    Ok(())
}

pub fn export_facet_usage(rows: &[FacetUsageSummary], path: &Path) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record(["facet_type", "total_sessions", "num_values", "pct_usage"])?;
    for row in rows {
        wtr.write_record([
            row.facet_type.clone(),
            row.total_sessions.to_string(),
            row.num_values.to_string(),
            row.pct_usage.to_string(),
        ])?;
    }
    wtr.flush()?;
    debug!(rows = rows.len(), file = %path.display(), "exported facet usage");
    Ok(())
}

pub fn export_indexation_audit(rows: &[IndexationVerdict], path: &Path) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record(["url", "should_index", "reason", "current_clicks", "action"])?;
    for row in rows {
        wtr.write_record([
            row.url.clone(),
            row.should_index.to_string(),
            row.reason.clone(),
            row.current_clicks.to_string(),
            row.action.clone(),
        ])?;
    }
    wtr.flush()?;
    debug!(rows = rows.len(), file = %path.display(), "exported indexation audit");
    Ok(())
}

pub fn export_url_classification(rows: &[ClassifiedUrl], path: &Path) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record([
        "url",
        "type",
        "content_type",
        "funnel_stage",
        "num_facets",
        "clean_combination",
        "clicks",
        "top_query",
        "query_intent",
    ])?;
    for row in rows {
        wtr.write_record([
            row.record.url.clone(),
            tag(&row.classification.url_type),
            tag(&row.classification.content_type),
            tag(&row.classification.funnel_stage),
            row.classification.num_facets.to_string(),
            row.classification.clean_combination.to_string(),
            row.record.clicks.to_string(),
            row.record.top_query.clone().unwrap_or_default(),
            tag(&row.query_intent),
        ])?;
    }
    wtr.flush()?;
    debug!(rows = rows.len(), file = %path.display(), "exported URL classification");
    Ok(())
}

/// Write every CSV export for a finished report into `out_dir`, returning
/// the file names written.
pub fn export_all(report: &AnalysisReport, out_dir: &Path) -> Result<Vec<String>> {
    let exports: &[(&str, &dyn Fn(&Path) -> Result<()>)] = &[
        ("recommendations.csv", &|p| {
            export_recommendations(&report.recommendations, p)
        }),
        ("cannibalization.csv", &|p| {
            export_cannibalization(&report.cannibalization, p)
        }),
        ("demand_gaps.csv", &|p| export_demand_gaps(&report.demand_gaps, p)),
        ("facet_usage.csv", &|p| export_facet_usage(&report.facet_usage, p)),
        ("indexation_audit.csv", &|p| {
            export_indexation_audit(&report.indexation_audit, p)
        }),
        ("url_classification.csv", &|p| {
            export_url_classification(&report.url_classification, p)
        }),
    ];

    let mut written = Vec::new();
    for (name, export) in exports {
        export(&out_dir.join(name))?;
        written.push((*name).to_owned());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GapPriority, QueryIntent, RecommendationType, Severity};

    #[test]
    fn enum_cells_match_json_tags() {
        assert_eq!(tag(&GapPriority::High), "HIGH");
        assert_eq!(tag(&QueryIntent::Transactional), "TRANSACTIONAL");
        assert_eq!(tag(&RecommendationType::UxSeoGap), "UX_SEO_GAP");
    }

    #[test]
    fn impact_cell_prefers_counts() {
        assert_eq!(impact_cell(&Impact::Count(900)), "900");
        assert_eq!(impact_cell(&Impact::Severity(Severity::Medium)), "MEDIUM");
    }

    #[test]
    fn recommendations_export_round_trips_through_csv() {
        let rows = vec![Recommendation {
            priority_rank: 2,
            rec_type: RecommendationType::DemandGap,
            action: "Crear filtro: /televisores/samsung".to_owned(),
            reason: "Keyword 'televisor samsung' sin filtro (900 búsquedas/mes)".to_owned(),
            impact: Impact::Count(900),
        }];
        let path = std::env::temp_dir().join("facetnav_recommendations.csv");

        export_recommendations(&rows, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        assert!(contents.starts_with("priority_rank,type,action,reason,impact"));
        assert!(contents.contains("DEMAND_GAP"));
        assert!(contents.contains("/televisores/samsung"));
        assert!(contents.contains(",900"));
    }
}
