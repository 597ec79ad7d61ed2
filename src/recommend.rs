//! Turns reconciled findings into ranked, typed action items and an
//! executive summary. Output ordering is stable: items are generated in
//! ascending rank and the final sort is stable, so ties keep generation
//! order.

use crate::model::{
    AnalysisSummary, CannibalizationCase, ClassifiedUrl, DemandGap, FacetUsageSummary,
    GapPriority, Impact, NoindexFacet, OpportunityBucket, Recommendation, RecommendationType,
    Severity, UrlType, UxSeoCell,
};
use crate::util::round2;

const MAX_CANNIBALIZATION_ITEMS: usize = 5;
const MIN_CANNIBALIZATION_IMPACT: u64 = 10;
const MAX_GAP_ITEMS: usize = 5;
const FACET_ORDER_DISPLAY: usize = 4;

pub struct RecommendationInputs<'a> {
    pub facet_priority_order: &'a [String],
    pub cannibalization: &'a [CannibalizationCase],
    pub demand_gaps: &'a [DemandGap],
    pub ux_seo_matrix: &'a [UxSeoCell],
    pub noindex_facets: &'a [NoindexFacet],
}

pub fn synthesize(inputs: &RecommendationInputs) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if !inputs.facet_priority_order.is_empty() {
        let order = inputs
            .facet_priority_order
            .iter()
            .take(FACET_ORDER_DISPLAY)
            .cloned()
            .collect::<Vec<String>>()
            .join(" > ");
        recommendations.push(Recommendation {
            priority_rank: 0,
            rec_type: RecommendationType::UxArchitecture,
            action: format!("Orden óptimo de facetas en UI: {order}"),
            reason: "Basado en comportamiento real de usuarios".to_owned(),
            impact: Impact::Severity(Severity::High),
        });
    }

    for case in inputs
        .cannibalization
        .iter()
        .take(MAX_CANNIBALIZATION_ITEMS)
        .filter(|case| case.impact_score > MIN_CANNIBALIZATION_IMPACT)
    {
        recommendations.push(Recommendation {
            priority_rank: 1,
            rec_type: RecommendationType::Cannibalization,
            action: format!("Crear filtro: {}", case.suggested_target_url),
            reason: format!(
                "Artículo canibalizando '{}' ({} clics)",
                case.query, case.impact_score
            ),
            impact: Impact::Count(case.impact_score),
        });
    }

    for gap in inputs
        .demand_gaps
        .iter()
        .filter(|gap| gap.priority == GapPriority::High)
        .take(MAX_GAP_ITEMS)
    {
        recommendations.push(Recommendation {
            priority_rank: 2,
            rec_type: RecommendationType::DemandGap,
            action: format!("Crear filtro: {}", gap.suggested_filter_url),
            reason: format!(
                "Keyword '{}' sin filtro ({} búsquedas/mes)",
                gap.keyword, gap.volume
            ),
            impact: Impact::Count(gap.volume),
        });
    }

    for cell in inputs
        .ux_seo_matrix
        .iter()
        .filter(|cell| cell.opportunity == OpportunityBucket::VisibilityOpportunity)
    {
        recommendations.push(Recommendation {
            priority_rank: 3,
            rec_type: RecommendationType::UxSeoGap,
            action: format!("Mejorar SEO de faceta: {}", cell.facet_type),
            reason: format!(
                "Alta navegación interna ({:.1}%) pero baja visibilidad SEO ({:.1}%)",
                cell.ux_share, cell.seo_share
            ),
            impact: Impact::Count(cell.total_sessions),
        });
    }

    let mut noindex_types: Vec<&str> = Vec::new();
    for facet in inputs.noindex_facets {
        if !noindex_types.contains(&facet.facet_type.as_str()) {
            noindex_types.push(&facet.facet_type);
        }
    }
    for facet_type in noindex_types {
        recommendations.push(Recommendation {
            priority_rank: 4,
            rec_type: RecommendationType::Indexation,
            action: format!("NOINDEX filtros de {facet_type}"),
            reason: "Ordenación/Precio no deben indexarse".to_owned(),
            impact: Impact::Severity(Severity::Medium),
        });
    }

    recommendations.sort_by_key(|rec| rec.priority_rank);
    recommendations
}

pub fn summarize(
    classified: &[ClassifiedUrl],
    cannibalization: &[CannibalizationCase],
    demand_gaps: &[DemandGap],
    facet_usage: &[FacetUsageSummary],
    facet_priority_order: &[String],
) -> AnalysisSummary {
    let mut summary = AnalysisSummary {
        total_urls: classified.len(),
        filters_count: classified
            .iter()
            .filter(|c| c.classification.url_type == UrlType::Filter)
            .count(),
        articles_count: classified
            .iter()
            .filter(|c| c.classification.url_type == UrlType::Article)
            .count(),
        total_clicks: classified.iter().map(|c| c.record.clicks).sum(),
        cannibalized_clicks: cannibalization.iter().map(|c| c.impact_score).sum(),
        gaps_found: demand_gaps.len(),
        high_priority_gaps: demand_gaps
            .iter()
            .filter(|gap| gap.priority == GapPriority::High)
            .count(),
        facet_order: facet_priority_order
            .iter()
            .take(FACET_ORDER_DISPLAY)
            .cloned()
            .collect(),
        ..AnalysisSummary::default()
    };

    if summary.total_clicks > 0 {
        summary.cannibalization_rate = round2(
            summary.cannibalized_clicks as f64 / summary.total_clicks as f64 * 100.0,
        );
    }

    if let Some(top) = facet_usage.first() {
        summary.top_facet = Some(top.facet_type.clone());
        summary.top_facet_pct = top.pct_usage;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(query: &str, impact: u64) -> CannibalizationCase {
        CannibalizationCase {
            query: query.to_owned(),
            ranking_url: format!("/blog/{query}"),
            suggested_target_url: "/televisores".to_owned(),
            impact_score: impact,
        }
    }

    fn gap(keyword: &str, volume: u64, priority: GapPriority) -> DemandGap {
        DemandGap {
            keyword: keyword.to_owned(),
            volume,
            intent: crate::model::QueryIntent::Transactional,
            suggested_filter_url: "/televisores/samsung".to_owned(),
            priority,
        }
    }

    fn empty_inputs() -> RecommendationInputs<'static> {
        RecommendationInputs {
            facet_priority_order: &[],
            cannibalization: &[],
            demand_gaps: &[],
            ux_seo_matrix: &[],
            noindex_facets: &[],
        }
    }

    #[test]
    fn no_findings_yield_no_recommendations() {
        assert!(synthesize(&empty_inputs()).is_empty());
    }

    #[test]
    fn facet_order_item_always_ranks_first() {
        let order = vec![
            "tamano".to_owned(),
            "marca".to_owned(),
            "tecnologia".to_owned(),
            "conectividad".to_owned(),
            "uso".to_owned(),
        ];
        let cases = vec![case("televisor samsung", 100)];

        let recs = synthesize(&RecommendationInputs {
            facet_priority_order: &order,
            cannibalization: &cases,
            ..empty_inputs()
        });

        assert_eq!(recs[0].priority_rank, 0);
        assert_eq!(recs[0].rec_type, RecommendationType::UxArchitecture);
        // Only the top four facets appear in the action text.
        assert!(recs[0].action.contains("tamano > marca > tecnologia > conectividad"));
        assert!(!recs[0].action.contains("uso"));
        assert_eq!(recs[1].priority_rank, 1);
    }

    #[test]
    fn cannibalization_keeps_top_five_above_impact_floor() {
        let cases: Vec<CannibalizationCase> = (0..8)
            .map(|i: u64| case(&format!("query {i}"), 100u64.saturating_sub(i * 20)))
            .collect();
        // impacts: 100, 80, 60, 40, 20, 0, ... -> first five pass, then
        // the floor drops the zero.
        let recs = synthesize(&RecommendationInputs {
            cannibalization: &cases,
            ..empty_inputs()
        });

        assert_eq!(recs.len(), 5);
        assert!(recs.iter().all(|r| r.priority_rank == 1));
    }

    #[test]
    fn only_high_priority_gaps_become_recommendations() {
        let gaps = vec![
            gap("televisor samsung", 900, GapPriority::High),
            gap("televisor hisense", 300, GapPriority::Medium),
        ];

        let recs = synthesize(&RecommendationInputs {
            demand_gaps: &gaps,
            ..empty_inputs()
        });

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].rec_type, RecommendationType::DemandGap);
        assert_eq!(recs[0].impact, Impact::Count(900));
    }

    #[test]
    fn ranks_are_ascending() {
        let order = vec!["tamano".to_owned()];
        let cases = vec![case("televisor lg", 50)];
        let gaps = vec![gap("televisor samsung", 900, GapPriority::High)];
        let noindex = vec![NoindexFacet {
            facet_type: "sorting".to_owned(),
            facet_value: "price asc".to_owned(),
            sessions: 10,
            reason: String::new(),
        }];

        let recs = synthesize(&RecommendationInputs {
            facet_priority_order: &order,
            cannibalization: &cases,
            demand_gaps: &gaps,
            noindex_facets: &noindex,
            ..empty_inputs()
        });

        let ranks: Vec<u8> = recs.iter().map(|r| r.priority_rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
        assert_eq!(*ranks.last().unwrap(), 4);
    }

    #[test]
    fn noindex_types_deduplicated() {
        let noindex = vec![
            NoindexFacet {
                facet_type: "sorting".to_owned(),
                facet_value: "price asc".to_owned(),
                sessions: 10,
                reason: String::new(),
            },
            NoindexFacet {
                facet_type: "sorting".to_owned(),
                facet_value: "price desc".to_owned(),
                sessions: 5,
                reason: String::new(),
            },
        ];

        let recs = synthesize(&RecommendationInputs {
            noindex_facets: &noindex,
            ..empty_inputs()
        });
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].rec_type, RecommendationType::Indexation);
    }

    #[test]
    fn summary_computes_cannibalization_rate() {
        let classified = crate::reconcile::classify_records(
            &[crate::model::UrlRecord {
                url: "/mejores-televisores".to_owned(),
                clicks: 200,
                impressions: 0,
                position: 5.0,
                top_query: Some("televisor samsung".to_owned()),
                top_query_clicks: Some(50),
                top_query_position: None,
            }],
            "televisores",
        );
        let cases = crate::reconcile::detect_cannibalization(&classified, "televisores");

        let summary = summarize(&classified, &cases, &[], &[], &[]);
        assert_eq!(summary.total_urls, 1);
        assert_eq!(summary.articles_count, 1);
        assert_eq!(summary.cannibalized_clicks, 50);
        assert_eq!(summary.cannibalization_rate, 25.0);
    }
}
