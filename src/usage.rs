//! Facet usage aggregation over internal filter-interaction telemetry.
//!
//! System facet types (total, sorting, other) never enter the share
//! denominators used for ranking, but stay in the raw rows so the
//! indexation recommendations can still see them.

use std::collections::BTreeMap;

use crate::lexicon;
use crate::model::{FacetUsageCross, FacetUsageSummary, FilterInteraction, NoindexFacet};
use crate::util::round2;

fn is_system_type(facet_type: &str) -> bool {
    lexicon::SYSTEM_FACET_TYPES.contains(&facet_type)
}

fn group_sessions(rows: &[FilterInteraction]) -> BTreeMap<String, (u64, usize)> {
    let mut grouped: BTreeMap<String, (u64, usize)> = BTreeMap::new();
    for row in rows {
        if is_system_type(&row.facet_type) {
            continue;
        }
        let entry = grouped.entry(row.facet_type.clone()).or_default();
        entry.0 += row.sessions;
        entry.1 += 1;
    }
    grouped
}

/// Per-facet-type totals and share of all navigable facet sessions,
/// sorted descending by sessions. The resulting order is the canonical
/// facet priority order.
pub fn summarize_usage(rows: &[FilterInteraction]) -> Vec<FacetUsageSummary> {
    let grouped = group_sessions(rows);
    let total: u64 = grouped.values().map(|(sessions, _)| sessions).sum();

    let mut summary: Vec<FacetUsageSummary> = grouped
        .into_iter()
        .map(|(facet_type, (total_sessions, num_values))| FacetUsageSummary {
            facet_type,
            total_sessions,
            num_values,
            pct_usage: if total > 0 {
                round2(total_sessions as f64 / total as f64 * 100.0)
            } else {
                0.0
            },
        })
        .collect();

    summary.sort_by(|a, b| b.total_sessions.cmp(&a.total_sessions));
    summary
}

pub fn facet_priority_order(summary: &[FacetUsageSummary]) -> Vec<String> {
    summary.iter().map(|row| row.facet_type.clone()).collect()
}

/// Join "all traffic" usage against "SEO-only" usage per facet type.
/// Types absent from the SEO source count as zero; a zero "all" total
/// yields a zero ratio rather than a division error.
pub fn cross_source(
    all_rows: &[FilterInteraction],
    seo_rows: &[FilterInteraction],
) -> Vec<FacetUsageCross> {
    let all = group_sessions(all_rows);
    let seo = group_sessions(seo_rows);

    let all_total: u64 = all.values().map(|(sessions, _)| sessions).sum();
    let seo_total: u64 = seo.values().map(|(sessions, _)| sessions).sum();

    let mut cross: Vec<FacetUsageCross> = all
        .into_iter()
        .map(|(facet_type, (all_sessions, _))| {
            let seo_sessions = seo.get(&facet_type).map(|(s, _)| *s).unwrap_or(0);
            FacetUsageCross {
                seo_ratio: if all_sessions > 0 {
                    round2(seo_sessions as f64 / all_sessions as f64 * 100.0)
                } else {
                    0.0
                },
                pct_all: if all_total > 0 {
                    round2(all_sessions as f64 / all_total as f64 * 100.0)
                } else {
                    0.0
                },
                pct_seo: if seo_total > 0 {
                    round2(seo_sessions as f64 / seo_total as f64 * 100.0)
                } else {
                    0.0
                },
                facet_type,
                all_sessions,
                seo_sessions,
            }
        })
        .collect();

    cross.sort_by(|a, b| b.all_sessions.cmp(&a.all_sessions));
    cross
}

/// Filter interactions whose facet type must never produce indexable URLs.
pub fn noindex_facets(rows: &[FilterInteraction]) -> Vec<NoindexFacet> {
    rows.iter()
        .filter(|row| lexicon::NOINDEX_FACET_TYPES.contains(&row.facet_type.as_str()))
        .map(|row| NoindexFacet {
            facet_type: row.facet_type.clone(),
            facet_value: row.facet_value.clone(),
            sessions: row.sessions,
            reason: if row.facet_type == "sorting" {
                "Ordenación - no genera URL única".to_owned()
            } else {
                "Precio - usar AJAX sin URL".to_owned()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(facet_type: &str, facet_value: &str, sessions: u64) -> FilterInteraction {
        FilterInteraction {
            facet_type: facet_type.to_owned(),
            facet_value: facet_value.to_owned(),
            sessions,
        }
    }

    fn sample_rows() -> Vec<FilterInteraction> {
        vec![
            row("tamano", "55", 6000),
            row("tamano", "65", 2000),
            row("marca", "samsung", 1500),
            row("tecnologia", "oled", 500),
            row("total", "search filters", 12000),
            row("sorting", "price asc", 900),
            row("other", "ver todo", 100),
        ]
    }

    #[test]
    fn summary_excludes_system_types_and_sorts_by_sessions() {
        let summary = summarize_usage(&sample_rows());
        let types: Vec<&str> = summary.iter().map(|s| s.facet_type.as_str()).collect();
        assert_eq!(types, vec!["tamano", "marca", "tecnologia"]);
        assert_eq!(summary[0].total_sessions, 8000);
        assert_eq!(summary[0].num_values, 2);
    }

    #[test]
    fn usage_shares_sum_to_one_hundred() {
        let summary = summarize_usage(&sample_rows());
        let total_pct: f64 = summary.iter().map(|s| s.pct_usage).sum();
        assert!((total_pct - 100.0).abs() < 0.1, "sum was {total_pct}");
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        assert!(summarize_usage(&[]).is_empty());
        assert!(cross_source(&[], &[]).is_empty());
        assert!(noindex_facets(&[]).is_empty());
    }

    #[test]
    fn priority_order_follows_summary_order() {
        let summary = summarize_usage(&sample_rows());
        assert_eq!(
            facet_priority_order(&summary),
            vec!["tamano", "marca", "tecnologia"]
        );
    }

    #[test]
    fn cross_source_defaults_missing_seo_to_zero() {
        let all = sample_rows();
        let seo = vec![row("tamano", "55", 2000), row("marca", "samsung", 750)];

        let cross = cross_source(&all, &seo);
        assert_eq!(cross[0].facet_type, "tamano");
        assert_eq!(cross[0].seo_sessions, 2000);
        assert_eq!(cross[0].seo_ratio, 25.0);

        let tech = cross.iter().find(|c| c.facet_type == "tecnologia").unwrap();
        assert_eq!(tech.seo_sessions, 0);
        assert_eq!(tech.seo_ratio, 0.0);
    }

    #[test]
    fn cross_source_shares_use_each_sources_own_total() {
        let all = vec![row("tamano", "55", 800), row("marca", "lg", 200)];
        let seo = vec![row("tamano", "55", 100), row("marca", "lg", 100)];

        let cross = cross_source(&all, &seo);
        let tamano = cross.iter().find(|c| c.facet_type == "tamano").unwrap();
        assert_eq!(tamano.pct_all, 80.0);
        assert_eq!(tamano.pct_seo, 50.0);
    }

    #[test]
    fn noindex_detects_sorting_and_price_rows() {
        let rows = vec![
            row("sorting", "price asc", 900),
            row("precio", "200-500", 400),
            row("marca", "lg", 100),
        ];

        let noindex = noindex_facets(&rows);
        assert_eq!(noindex.len(), 2);
        assert!(noindex.iter().any(|n| n.facet_type == "sorting"));
        assert!(noindex.iter().any(|n| n.facet_type == "precio"));
    }
}
