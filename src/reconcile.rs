//! Cross-source reconciliation: joins URL classification output with
//! facet usage and query classification to surface cannibalization,
//! demand gaps and UX-vs-SEO misalignment.
//!
//! Every function here degrades to an empty result when an input dataset
//! is empty or missing; optional sources never halt downstream stages.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    CannibalizationCase, ClassifiedUrl, DemandGap, FacetPerformance, FacetUsageSummary,
    FilterInteraction, GapPriority, KeywordRecord, OpportunityBucket, QueryIntent, UrlRecord,
    UrlType, UxSeoCell, ValueAlignment, ValueStatus,
};
use crate::normalize::normalize;
use crate::query_classifier::classify_intent;
use crate::url_classifier::{classify_url, resolve_segment, suggest_filter_url};
use crate::util::round2;

const UX_SHARE_HIGH: f64 = 10.0;
const SHARE_LOW: f64 = 5.0;
const GAP_MIN_VOLUME: u64 = 50;
const GAP_HIGH_VOLUME: u64 = 500;
const GAP_MEDIUM_VOLUME: u64 = 200;

/// Annotate every record with its URL classification and the intent of
/// its top query.
pub fn classify_records(records: &[UrlRecord], category: &str) -> Vec<ClassifiedUrl> {
    records
        .iter()
        .map(|record| ClassifiedUrl {
            classification: classify_url(&record.url, category),
            query_intent: record
                .top_query
                .as_deref()
                .map(classify_intent)
                .unwrap_or(QueryIntent::Other),
            record: record.clone(),
        })
        .collect()
}

/// Articles ranking for transactional queries. Impact is the top query's
/// click count, falling back to the URL's total clicks when the query
/// column is absent. The suggested target is always the category root;
/// no per-value target is inferred from current data.
pub fn detect_cannibalization(
    classified: &[ClassifiedUrl],
    category: &str,
) -> Vec<CannibalizationCase> {
    let target = format!("/{}", category.trim().to_lowercase());

    let mut cases: Vec<CannibalizationCase> = classified
        .iter()
        .filter(|c| {
            c.classification.url_type == UrlType::Article
                && c.query_intent == QueryIntent::Transactional
        })
        .map(|c| CannibalizationCase {
            query: c.record.top_query.clone().unwrap_or_default(),
            ranking_url: c.record.url.clone(),
            suggested_target_url: target.clone(),
            impact_score: c.record.top_query_clicks.unwrap_or(c.record.clicks),
        })
        .collect();

    cases.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));
    cases
}

/// Transactional keywords above the volume floor whose suggested filter
/// URL matches no observed FILTER url.
pub fn detect_demand_gaps(
    keywords: &[KeywordRecord],
    classified: &[ClassifiedUrl],
    category: &str,
) -> Vec<DemandGap> {
    let existing: BTreeSet<String> = classified
        .iter()
        .filter(|c| c.classification.url_type == UrlType::Filter)
        .map(|c| c.record.url.to_lowercase())
        .collect();

    let mut gaps = Vec::new();
    for keyword in keywords {
        let intent = classify_intent(&keyword.keyword);
        if intent != QueryIntent::Transactional || keyword.volume <= GAP_MIN_VOLUME {
            continue;
        }

        let suggested = suggest_filter_url(&keyword.keyword, category);
        let covered = existing
            .iter()
            .any(|url| url.contains(&suggested) || url.ends_with(&suggested));
        if covered {
            continue;
        }

        gaps.push(DemandGap {
            keyword: keyword.keyword.clone(),
            volume: keyword.volume,
            intent,
            suggested_filter_url: suggested,
            priority: if keyword.volume > GAP_HIGH_VOLUME {
                GapPriority::High
            } else if keyword.volume > GAP_MEDIUM_VOLUME {
                GapPriority::Medium
            } else {
                GapPriority::Low
            },
        });
    }

    gaps.sort_by(|a, b| b.volume.cmp(&a.volume));
    gaps
}

/// SEO performance of FILTER urls grouped by resolved facet type/value.
pub fn facet_performance(classified: &[ClassifiedUrl]) -> Vec<FacetPerformance> {
    let mut grouped: BTreeMap<(String, String), (u64, f64, usize)> = BTreeMap::new();

    for c in classified {
        if c.classification.url_type != UrlType::Filter {
            continue;
        }
        for segment in &c.classification.facets {
            let Some((facet_type, facet_value)) = resolve_segment(segment) else {
                continue;
            };
            let entry = grouped.entry((facet_type, facet_value)).or_insert((0, 0.0, 0));
            entry.0 += c.record.clicks;
            entry.1 += c.record.position;
            entry.2 += 1;
        }
    }

    let mut performance: Vec<FacetPerformance> = grouped
        .into_iter()
        .map(
            |((facet_type, facet_value), (total_clicks, position_sum, num_urls))| {
                FacetPerformance {
                    facet_type,
                    facet_value,
                    total_clicks,
                    avg_position: round2(position_sum / num_urls as f64),
                    num_urls,
                }
            },
        )
        .collect();

    performance.sort_by(|a, b| b.total_clicks.cmp(&a.total_clicks));
    performance
}

/// Outer-join internal usage shares against SEO click shares per facet
/// type and bucket each facet by the 10%/5% dual threshold.
pub fn ux_seo_matrix(
    usage: &[FacetUsageSummary],
    performance: &[FacetPerformance],
) -> Vec<UxSeoCell> {
    if usage.is_empty() || performance.is_empty() {
        return Vec::new();
    }

    let mut seo_by_type: BTreeMap<String, (u64, f64, usize, usize)> = BTreeMap::new();
    for perf in performance {
        let entry = seo_by_type.entry(perf.facet_type.clone()).or_default();
        entry.0 += perf.total_clicks;
        entry.1 += perf.avg_position;
        entry.2 += perf.num_urls;
        entry.3 += 1;
    }

    let mut types: BTreeSet<String> = usage.iter().map(|u| u.facet_type.clone()).collect();
    types.extend(seo_by_type.keys().cloned());

    let usage_by_type: BTreeMap<&str, &FacetUsageSummary> =
        usage.iter().map(|u| (u.facet_type.as_str(), u)).collect();

    let total_ux: u64 = usage.iter().map(|u| u.total_sessions).sum();
    let total_seo: u64 = seo_by_type.values().map(|(clicks, ..)| clicks).sum();

    let mut matrix: Vec<UxSeoCell> = types
        .into_iter()
        .map(|facet_type| {
            let total_sessions = usage_by_type
                .get(facet_type.as_str())
                .map(|u| u.total_sessions)
                .unwrap_or(0);
            let (seo_clicks, position_sum, seo_urls, value_count) = seo_by_type
                .get(&facet_type)
                .copied()
                .unwrap_or((0, 0.0, 0, 0));

            let ux_share = if total_ux > 0 {
                round2(total_sessions as f64 / total_ux as f64 * 100.0)
            } else {
                0.0
            };
            let seo_share = if total_seo > 0 {
                round2(seo_clicks as f64 / total_seo as f64 * 100.0)
            } else {
                0.0
            };

            UxSeoCell {
                facet_type,
                total_sessions,
                seo_clicks,
                seo_avg_position: if value_count > 0 {
                    round2(position_sum / value_count as f64)
                } else {
                    0.0
                },
                seo_urls,
                ux_share,
                seo_share,
                ux_seo_gap: round2(ux_share - seo_share),
                opportunity: classify_opportunity(ux_share, seo_share),
            }
        })
        .collect();

    matrix.sort_by(|a, b| {
        b.total_sessions
            .cmp(&a.total_sessions)
            .then_with(|| a.facet_type.cmp(&b.facet_type))
    });
    matrix
}

fn classify_opportunity(ux_share: f64, seo_share: f64) -> OpportunityBucket {
    if ux_share > UX_SHARE_HIGH && seo_share < SHARE_LOW {
        OpportunityBucket::VisibilityOpportunity
    } else if seo_share > UX_SHARE_HIGH && ux_share < SHARE_LOW {
        OpportunityBucket::ReviewNavigation
    } else if ux_share > UX_SHARE_HIGH && seo_share > UX_SHARE_HIGH {
        OpportunityBucket::Balanced
    } else {
        OpportunityBucket::LowImpact
    }
}

/// Granular per-value join: navigation sessions against search clicks for
/// each facet value observed in either source.
pub fn value_alignment(
    rows: &[FilterInteraction],
    performance: &[FacetPerformance],
) -> Vec<ValueAlignment> {
    if rows.is_empty() || performance.is_empty() {
        return Vec::new();
    }

    let mut ux_by_key: BTreeMap<(String, String), u64> = BTreeMap::new();
    for row in rows {
        let excluded = crate::lexicon::SYSTEM_FACET_TYPES.contains(&row.facet_type.as_str())
            || row.facet_type == "precio";
        if excluded {
            continue;
        }
        *ux_by_key
            .entry((row.facet_type.clone(), normalize(&row.facet_value)))
            .or_default() += row.sessions;
    }

    let mut keys: BTreeSet<(String, String)> = ux_by_key.keys().cloned().collect();
    let perf_by_key: BTreeMap<(String, String), &FacetPerformance> = performance
        .iter()
        .map(|p| ((p.facet_type.clone(), normalize(&p.facet_value)), p))
        .collect();
    keys.extend(perf_by_key.keys().cloned());

    let mut alignment: Vec<ValueAlignment> = keys
        .into_iter()
        .map(|key| {
            let ux_sessions = ux_by_key.get(&key).copied().unwrap_or(0);
            let perf = perf_by_key.get(&key);
            let seo_clicks = perf.map(|p| p.total_clicks).unwrap_or(0);

            ValueAlignment {
                facet_type: key.0,
                facet_value: key.1,
                ux_sessions,
                seo_clicks,
                avg_position: perf.map(|p| p.avg_position).unwrap_or(0.0),
                seo_ux_ratio: if ux_sessions > 0 {
                    round2(seo_clicks as f64 / ux_sessions as f64)
                } else {
                    0.0
                },
                status: classify_value_status(ux_sessions, seo_clicks),
            }
        })
        .collect();

    alignment.sort_by(|a, b| b.ux_sessions.cmp(&a.ux_sessions));
    alignment
}

fn classify_value_status(ux_sessions: u64, seo_clicks: u64) -> ValueStatus {
    if ux_sessions > 1000 && seo_clicks < 100 {
        ValueStatus::CriticalSeoGap
    } else if seo_clicks > 500 && ux_sessions < 100 {
        ValueStatus::NoUxSupport
    } else if ux_sessions > 500 && seo_clicks > 200 {
        ValueStatus::Aligned
    } else {
        ValueStatus::LowVolume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORY: &str = "televisores";

    fn record(url: &str, clicks: u64, top_query: Option<&str>, top_query_clicks: Option<u64>) -> UrlRecord {
        UrlRecord {
            url: url.to_owned(),
            clicks,
            impressions: 0,
            position: 8.0,
            top_query: top_query.map(ToOwned::to_owned),
            top_query_clicks,
            top_query_position: None,
        }
    }

    #[test]
    fn article_with_transactional_query_is_cannibalization() {
        let records = vec![
            record(
                "/mejores-televisores-2025",
                120,
                Some("televisor samsung 55"),
                Some(80),
            ),
            record("/televisores/samsung", 300, Some("televisores samsung"), None),
        ];

        let classified = classify_records(&records, CATEGORY);
        let cases = detect_cannibalization(&classified, CATEGORY);

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].ranking_url, "/mejores-televisores-2025");
        assert_eq!(cases[0].suggested_target_url, "/televisores");
        assert_eq!(cases[0].impact_score, 80);
    }

    #[test]
    fn impact_falls_back_to_url_clicks() {
        let records = vec![record(
            "/guia-televisores",
            45,
            Some("comprar televisor barato"),
            None,
        )];

        let classified = classify_records(&records, CATEGORY);
        let cases = detect_cannibalization(&classified, CATEGORY);
        assert_eq!(cases[0].impact_score, 45);
    }

    #[test]
    fn informational_queries_never_count_as_cannibalization() {
        let records = vec![record(
            "/mejores-televisores-2025",
            500,
            Some("mejores televisores 2025"),
            Some(400),
        )];

        let classified = classify_records(&records, CATEGORY);
        assert!(detect_cannibalization(&classified, CATEGORY).is_empty());
    }

    #[test]
    fn cannibalization_sorted_by_impact_descending() {
        let records = vec![
            record("/guia-televisores", 10, Some("televisor lg 65"), Some(10)),
            record("/mejores-televisores", 10, Some("televisor oled 55"), Some(90)),
        ];

        let classified = classify_records(&records, CATEGORY);
        let cases = detect_cannibalization(&classified, CATEGORY);
        assert_eq!(cases[0].impact_score, 90);
        assert_eq!(cases[1].impact_score, 10);
    }

    #[test]
    fn demand_gap_emitted_for_uncovered_transactional_keyword() {
        let keywords = vec![KeywordRecord {
            keyword: "comprar televisor barato".to_owned(),
            volume: 600,
        }];

        let gaps = detect_demand_gaps(&keywords, &[], CATEGORY);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].priority, GapPriority::High);
        assert_eq!(gaps[0].suggested_filter_url, "/televisores");
    }

    #[test]
    fn demand_gap_skips_covered_keywords() {
        let records = vec![record("/televisores/samsung", 100, None, None)];
        let classified = classify_records(&records, CATEGORY);

        let keywords = vec![KeywordRecord {
            keyword: "televisor samsung".to_owned(),
            volume: 900,
        }];

        assert!(detect_demand_gaps(&keywords, &classified, CATEGORY).is_empty());
    }

    #[test]
    fn demand_gap_respects_volume_floor_and_intent() {
        let keywords = vec![
            KeywordRecord {
                keyword: "televisor hisense".to_owned(),
                volume: 50,
            },
            KeywordRecord {
                keyword: "mejores televisores 2025".to_owned(),
                volume: 5000,
            },
        ];

        assert!(detect_demand_gaps(&keywords, &[], CATEGORY).is_empty());
    }

    #[test]
    fn demand_gap_priority_bands() {
        let keywords = vec![
            KeywordRecord { keyword: "televisor philips".to_owned(), volume: 501 },
            KeywordRecord { keyword: "televisor hisense".to_owned(), volume: 201 },
            KeywordRecord { keyword: "televisor nilait".to_owned(), volume: 51 },
        ];

        let gaps = detect_demand_gaps(&keywords, &[], CATEGORY);
        assert_eq!(gaps[0].priority, GapPriority::High);
        assert_eq!(gaps[1].priority, GapPriority::Medium);
        assert_eq!(gaps[2].priority, GapPriority::Low);
    }

    #[test]
    fn facet_performance_groups_by_resolved_type_and_value() {
        let records = vec![
            record("/televisores/samsung", 100, None, None),
            record("/televisores/samsung/55-pulgadas", 40, None, None),
            record("/televisores/oled", 60, None, None),
            record("/mejores-televisores", 999, None, None),
        ];

        let classified = classify_records(&records, CATEGORY);
        let performance = facet_performance(&classified);

        let samsung = performance
            .iter()
            .find(|p| p.facet_type == "marca" && p.facet_value == "samsung")
            .unwrap();
        assert_eq!(samsung.total_clicks, 140);
        assert_eq!(samsung.num_urls, 2);

        let size = performance
            .iter()
            .find(|p| p.facet_type == "tamano" && p.facet_value == "55")
            .unwrap();
        assert_eq!(size.total_clicks, 40);

        // The article never contributes.
        assert!(performance.iter().all(|p| p.total_clicks <= 140));
    }

    #[test]
    fn matrix_buckets_follow_dual_threshold() {
        let usage = vec![
            FacetUsageSummary {
                facet_type: "tamano".to_owned(),
                total_sessions: 9600,
                num_values: 5,
                pct_usage: 96.0,
            },
            FacetUsageSummary {
                facet_type: "marca".to_owned(),
                total_sessions: 400,
                num_values: 4,
                pct_usage: 4.0,
            },
        ];
        let performance = vec![FacetPerformance {
            facet_type: "marca".to_owned(),
            facet_value: "samsung".to_owned(),
            total_clicks: 500,
            avg_position: 4.0,
            num_urls: 3,
        }];

        let matrix = ux_seo_matrix(&usage, &performance);
        let tamano = matrix.iter().find(|c| c.facet_type == "tamano").unwrap();
        // All SEO clicks belong to marca, so tamano is high-UX/low-SEO.
        assert_eq!(tamano.opportunity, OpportunityBucket::VisibilityOpportunity);

        let marca = matrix.iter().find(|c| c.facet_type == "marca").unwrap();
        assert_eq!(marca.opportunity, OpportunityBucket::ReviewNavigation);
    }

    #[test]
    fn matrix_requires_both_sources() {
        let usage = vec![FacetUsageSummary {
            facet_type: "tamano".to_owned(),
            total_sessions: 100,
            num_values: 1,
            pct_usage: 100.0,
        }];
        assert!(ux_seo_matrix(&usage, &[]).is_empty());
        assert!(ux_seo_matrix(&[], &[]).is_empty());
    }

    #[test]
    fn value_alignment_joins_on_type_and_value() {
        let rows = vec![
            FilterInteraction {
                facet_type: "tamano".to_owned(),
                facet_value: "55".to_owned(),
                sessions: 2000,
            },
            FilterInteraction {
                facet_type: "marca".to_owned(),
                facet_value: "samsung".to_owned(),
                sessions: 50,
            },
        ];
        let performance = vec![
            FacetPerformance {
                facet_type: "tamano".to_owned(),
                facet_value: "55".to_owned(),
                total_clicks: 30,
                avg_position: 6.0,
                num_urls: 1,
            },
            FacetPerformance {
                facet_type: "marca".to_owned(),
                facet_value: "samsung".to_owned(),
                total_clicks: 900,
                avg_position: 3.0,
                num_urls: 2,
            },
        ];

        let alignment = value_alignment(&rows, &performance);
        assert_eq!(alignment[0].facet_value, "55");
        assert_eq!(alignment[0].status, ValueStatus::CriticalSeoGap);

        let samsung = alignment.iter().find(|a| a.facet_value == "samsung").unwrap();
        assert_eq!(samsung.status, ValueStatus::NoUxSupport);
        assert_eq!(samsung.seo_ux_ratio, 18.0);
    }

    #[test]
    fn value_alignment_join_survives_label_slug_mismatch() {
        // Analytics labels say "Mini LED", URL slugs say "mini-led"; both
        // normalize to the same key.
        let rows = vec![FilterInteraction {
            facet_type: "tecnologia".to_owned(),
            facet_value: "Mini LED".to_owned(),
            sessions: 700,
        }];
        let performance = vec![FacetPerformance {
            facet_type: "tecnologia".to_owned(),
            facet_value: "mini-led".to_owned(),
            total_clicks: 300,
            avg_position: 5.0,
            num_urls: 1,
        }];

        let alignment = value_alignment(&rows, &performance);
        assert_eq!(alignment.len(), 1);
        assert_eq!(alignment[0].facet_value, "mini_led");
        assert_eq!(alignment[0].ux_sessions, 700);
        assert_eq!(alignment[0].seo_clicks, 300);
        assert_eq!(alignment[0].status, ValueStatus::Aligned);
    }
}
