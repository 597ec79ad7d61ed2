use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrlType {
    Category,
    Filter,
    FilterNoindex,
    Product,
    Article,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Transactional,
    Informational,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunnelStage {
    Tofu,
    Mofu,
    Bofu,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryIntent {
    Transactional,
    Informational,
    Navigational,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationType {
    UxArchitecture,
    Cannibalization,
    DemandGap,
    UxSeoGap,
    Indexation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    Medium,
}

/// Impact of a recommendation: a measured count (clicks, sessions, monthly
/// searches) or a severity tag when no number is available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Impact {
    Count(u64),
    Severity(Severity),
}

/// One row of internal filter-usage telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterInteraction {
    pub facet_type: String,
    pub facet_value: String,
    pub sessions: u64,
}

/// One row of query/URL performance data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub url: String,
    pub clicks: u64,
    pub impressions: u64,
    pub position: f64,
    pub top_query: Option<String>,
    pub top_query_clicks: Option<u64>,
    pub top_query_position: Option<f64>,
}

/// One row of a keyword-research export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub volume: u64,
}

/// Structural classification of a URL relative to one category keyword.
/// Pure derivation of `(url, category)`; see `url_classifier`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlClassification {
    #[serde(rename = "type")]
    pub url_type: UrlType,
    pub content_type: ContentType,
    pub funnel_stage: FunnelStage,
    /// Raw path segments after the category root, in path order.
    pub facets: Vec<String>,
    pub num_facets: usize,
    /// False when two segments resolve to the same facet type.
    pub clean_combination: bool,
    pub has_sorting: bool,
    pub has_pagination: bool,
    pub has_price: bool,
}

impl Default for UrlClassification {
    fn default() -> Self {
        Self {
            url_type: UrlType::Other,
            content_type: ContentType::Other,
            funnel_stage: FunnelStage::Other,
            facets: Vec::new(),
            num_facets: 0,
            clean_combination: true,
            has_sorting: false,
            has_pagination: false,
            has_price: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClassification {
    pub intent: QueryIntent,
    pub funnel_stage: FunnelStage,
    pub drivers: BTreeSet<String>,
    pub content_type: Option<String>,
}

/// A UrlRecord joined with its derived classifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedUrl {
    #[serde(flatten)]
    pub record: UrlRecord,
    #[serde(flatten)]
    pub classification: UrlClassification,
    pub query_intent: QueryIntent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetUsageSummary {
    pub facet_type: String,
    pub total_sessions: u64,
    pub num_values: usize,
    pub pct_usage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetUsageCross {
    pub facet_type: String,
    pub all_sessions: u64,
    pub seo_sessions: u64,
    pub seo_ratio: f64,
    pub pct_all: f64,
    pub pct_seo: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoindexFacet {
    pub facet_type: String,
    pub facet_value: String,
    pub sessions: u64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetPerformance {
    pub facet_type: String,
    pub facet_value: String,
    pub total_clicks: u64,
    pub avg_position: f64,
    pub num_urls: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityBucket {
    VisibilityOpportunity,
    ReviewNavigation,
    Balanced,
    LowImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UxSeoCell {
    pub facet_type: String,
    pub total_sessions: u64,
    pub seo_clicks: u64,
    pub seo_avg_position: f64,
    pub seo_urls: usize,
    pub ux_share: f64,
    pub seo_share: f64,
    pub ux_seo_gap: f64,
    pub opportunity: OpportunityBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueStatus {
    CriticalSeoGap,
    NoUxSupport,
    Aligned,
    LowVolume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueAlignment {
    pub facet_type: String,
    pub facet_value: String,
    pub ux_sessions: u64,
    pub seo_clicks: u64,
    pub avg_position: f64,
    pub seo_ux_ratio: f64,
    pub status: ValueStatus,
}

/// An informational page ranking for a transactional query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CannibalizationCase {
    pub query: String,
    pub ranking_url: String,
    pub suggested_target_url: String,
    pub impact_score: u64,
}

/// Search demand with no matching filter URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandGap {
    pub keyword: String,
    pub volume: u64,
    pub intent: QueryIntent,
    pub suggested_filter_url: String,
    pub priority: GapPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority_rank: u8,
    #[serde(rename = "type")]
    pub rec_type: RecommendationType,
    pub action: String,
    pub reason: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexationVerdict {
    pub url: String,
    pub should_index: bool,
    pub reason: String,
    pub current_clicks: u64,
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_urls: usize,
    pub filters_count: usize,
    pub articles_count: usize,
    pub total_clicks: u64,
    pub cannibalized_clicks: u64,
    pub cannibalization_rate: f64,
    pub gaps_found: usize,
    pub high_priority_gaps: usize,
    pub facet_order: Vec<String>,
    pub top_facet: Option<String>,
    pub top_facet_pct: f64,
}

/// Full result container for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report_version: u32,
    pub generated_at: String,
    pub category: String,
    pub facet_usage: Vec<FacetUsageSummary>,
    pub facet_cross: Vec<FacetUsageCross>,
    pub facet_priority_order: Vec<String>,
    pub noindex_facets: Vec<NoindexFacet>,
    pub url_classification: Vec<ClassifiedUrl>,
    pub facet_performance: Vec<FacetPerformance>,
    pub ux_seo_matrix: Vec<UxSeoCell>,
    pub value_alignment: Vec<ValueAlignment>,
    pub cannibalization: Vec<CannibalizationCase>,
    pub demand_gaps: Vec<DemandGap>,
    pub indexation_audit: Vec<IndexationVerdict>,
    pub recommendations: Vec<Recommendation>,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    FilterUsageAll,
    FilterUsageSeo,
    TopQuery,
    KeywordResearch,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEntry {
    pub filename: String,
    pub kind: ExportKind,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub file_count: usize,
    pub files: Vec<InputEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisCounts {
    pub filter_rows_all: usize,
    pub filter_rows_seo: usize,
    pub urls_loaded: usize,
    pub keywords_loaded: usize,
    pub cannibalization_cases: usize,
    pub demand_gaps: usize,
    pub recommendations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPaths {
    pub out_dir: String,
    pub report_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub finished_at: String,
    pub category: String,
    pub counts: AnalysisCounts,
    pub paths: AnalysisPaths,
    pub warnings: Vec<String>,
}
