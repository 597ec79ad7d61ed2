//! URL structure classification.
//!
//! `classify_url` is a pure function of `(url, category)`. The priority
//! order of the rules is deliberate and encoded as the `RULES` slice:
//! system parameters short-circuit everything, then the category root,
//! then product/filter paths under it, then editorial articles, then the
//! catch-all. First matching rule wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon;
use crate::model::{ContentType, FunnelStage, UrlClassification, UrlType};
use crate::normalize::{fold_accents, keyword_variations};

/// Slug text followed by a long numeric id, e.g. `/qled-q80c-55-138552`.
static PRODUCT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/[a-z0-9-]+-\d{5,}").expect("valid product id pattern"));

/// Size facet path segment, e.g. `55-pulgadas`.
static SIZE_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2,3})-pulgadas$").expect("valid size segment pattern"));

/// Leading size mention in a query, e.g. `55 pulgadas` or bare `65`.
static SIZE_QUERY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\d{2,3})\s*(pulgadas|")?"#).expect("valid size query pattern"));

struct UrlContext<'a> {
    url: &'a str,
    path: &'a str,
    category: &'a str,
    has_sorting: bool,
    has_pagination: bool,
    has_price: bool,
}

type Rule = (&'static str, fn(&UrlContext) -> Option<UrlClassification>);

/// Ordered rule chain; evaluation stops at the first `Some`.
const RULES: &[Rule] = &[
    ("system_parameters", rule_system_parameters),
    ("category_root", rule_category_root),
    ("product_detail", rule_product_detail),
    ("facet_filter", rule_facet_filter),
    ("editorial_article", rule_editorial_article),
];

pub fn classify_url(url: &str, category: &str) -> UrlClassification {
    let url = url.trim().to_lowercase();
    if url.is_empty() {
        return UrlClassification::default();
    }

    let category = category.trim().to_lowercase();
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let ctx = UrlContext {
        url: &url,
        path,
        category: &category,
        has_sorting: url.contains("?order=") || url.contains("&order="),
        has_pagination: url.contains("?page=") || url.contains("&page="),
        has_price: url.contains("precio=") || url.contains("price="),
    };

    for (_, rule) in RULES {
        if let Some(classification) = rule(&ctx) {
            return classification;
        }
    }

    UrlClassification {
        has_sorting: ctx.has_sorting,
        has_pagination: ctx.has_pagination,
        has_price: ctx.has_price,
        ..UrlClassification::default()
    }
}

fn rule_system_parameters(ctx: &UrlContext) -> Option<UrlClassification> {
    if !(ctx.has_sorting || ctx.has_pagination || ctx.has_price) {
        return None;
    }

    Some(UrlClassification {
        url_type: UrlType::FilterNoindex,
        content_type: ContentType::Transactional,
        funnel_stage: FunnelStage::Bofu,
        has_sorting: ctx.has_sorting,
        has_pagination: ctx.has_pagination,
        has_price: ctx.has_price,
        ..UrlClassification::default()
    })
}

fn rule_category_root(ctx: &UrlContext) -> Option<UrlClassification> {
    let root = format!("/{}", ctx.category);
    if !(ctx.path.ends_with(&root) || ctx.path.ends_with(&format!("{root}/"))) {
        return None;
    }

    Some(UrlClassification {
        url_type: UrlType::Category,
        content_type: ContentType::Transactional,
        funnel_stage: FunnelStage::Bofu,
        ..UrlClassification::default()
    })
}

fn rule_product_detail(ctx: &UrlContext) -> Option<UrlClassification> {
    if !under_category(ctx) || !PRODUCT_ID_RE.is_match(ctx.path) {
        return None;
    }

    Some(UrlClassification {
        url_type: UrlType::Product,
        content_type: ContentType::Transactional,
        funnel_stage: FunnelStage::Bofu,
        ..UrlClassification::default()
    })
}

fn rule_facet_filter(ctx: &UrlContext) -> Option<UrlClassification> {
    if !under_category(ctx) {
        return None;
    }

    let facets = facet_segments(ctx.path, ctx.category);
    let num_facets = facets.len();
    let clean_combination = combination_is_clean(&facets);

    Some(UrlClassification {
        url_type: UrlType::Filter,
        content_type: ContentType::Transactional,
        funnel_stage: FunnelStage::Bofu,
        facets,
        num_facets,
        clean_combination,
        ..UrlClassification::default()
    })
}

fn rule_editorial_article(ctx: &UrlContext) -> Option<UrlClassification> {
    let mentions_category = keyword_variations(ctx.category)
        .iter()
        .any(|variation| ctx.url.contains(variation.as_str()));
    let spaced = space_folded(ctx.url);
    let editorial = lexicon::EDITORIAL_MARKERS
        .iter()
        .any(|marker| spaced.contains(marker));

    if !(mentions_category || editorial) {
        return None;
    }

    Some(UrlClassification {
        url_type: UrlType::Article,
        content_type: ContentType::Informational,
        funnel_stage: article_funnel_stage(&spaced),
        ..UrlClassification::default()
    })
}

fn under_category(ctx: &UrlContext) -> bool {
    ctx.path.contains(&format!("/{}/", ctx.category))
}

fn facet_segments(path: &str, category: &str) -> Vec<String> {
    let root = format!("/{category}/");
    let Some(idx) = path.find(&root) else {
        return Vec::new();
    };

    path[idx + root.len()..]
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// A combination is clean when no two segments resolve to the same facet
/// type; duplicated types signal dirty crawl paths.
fn combination_is_clean(segments: &[String]) -> bool {
    let mut seen = Vec::new();
    for segment in segments {
        if let Some((facet_type, _)) = resolve_segment(segment) {
            if seen.contains(&facet_type) {
                return false;
            }
            seen.push(facet_type);
        }
    }
    true
}

/// Resolve a raw path segment to a `(facet_type, value)` pair via the
/// lexicon tables. Unrecognized segments resolve to None.
pub fn resolve_segment(segment: &str) -> Option<(String, String)> {
    if let Some(captures) = SIZE_SEGMENT_RE.captures(segment) {
        return Some(("tamano".to_owned(), captures[1].to_owned()));
    }

    if lexicon::BRAND_SLUGS.contains(&segment) {
        return Some(("marca".to_owned(), segment.to_owned()));
    }

    for (slug, canonical) in lexicon::TECHNOLOGY_SLUGS {
        if segment == *slug {
            return Some(("tecnologia".to_owned(), (*canonical).to_owned()));
        }
    }

    if lexicon::CONNECTIVITY_SLUGS.contains(&segment) {
        return Some(("conectividad".to_owned(), segment.to_owned()));
    }

    if lexicon::CONDITION_SLUGS.contains(&segment) {
        let facet_type = if segment == "ofertas" { "oferta" } else { "estado" };
        return Some((facet_type.to_owned(), segment.to_owned()));
    }

    if lexicon::USE_CASE_SLUGS.contains(&segment) {
        return Some(("uso".to_owned(), segment.to_owned()));
    }

    match segment {
        "120-hz" | "120hz" => return Some(("caracteristica".to_owned(), "120hz".to_owned())),
        "hdmi-2-1" => return Some(("caracteristica".to_owned(), "hdmi-2.1".to_owned())),
        _ => {}
    }

    None
}

/// Funnel stage of an article URL: first matching bucket wins, checked
/// TOFU then MOFU then BOFU; articles with no marker default to MOFU.
fn article_funnel_stage(spaced: &str) -> FunnelStage {
    let buckets: [(&[&str], FunnelStage); 3] = [
        (lexicon::TOFU_MARKERS, FunnelStage::Tofu),
        (lexicon::MOFU_MARKERS, FunnelStage::Mofu),
        (lexicon::BOFU_MARKERS, FunnelStage::Bofu),
    ];

    for (markers, stage) in buckets {
        if markers.iter().any(|marker| spaced.contains(marker)) {
            return stage;
        }
    }

    FunnelStage::Mofu
}

fn space_folded(text: &str) -> String {
    fold_accents(text)
        .chars()
        .map(|c| if c == '-' || c == '_' || c == '/' { ' ' } else { c })
        .collect()
}

/// Build the filter URL a transactional query should land on, composing
/// size, technology, brand, feature and use-case parts in that order.
pub fn suggest_filter_url(query: &str, category: &str) -> String {
    let category = category.trim().to_lowercase();
    let root = format!("/{category}");
    if query.trim().is_empty() {
        return root;
    }

    let query = fold_accents(query);
    let mut parts = vec![root];

    if let Some(captures) = SIZE_QUERY_RE.captures(&query) {
        parts.push(format!("{}-pulgadas", &captures[1]));
    }

    let tech_map: &[(&str, &str)] = &[
        ("oled", "oled"),
        ("qled", "qled"),
        ("mini led", "mini-led"),
        ("smart tv", "smart-tv"),
        ("android tv", "android-tv"),
    ];
    for (pattern, slug) in tech_map {
        if query.contains(pattern) {
            parts.push((*slug).to_owned());
            break;
        }
    }

    for brand in lexicon::BRAND_SLUGS {
        if query.contains(brand) {
            parts.push((*brand).to_owned());
            break;
        }
    }

    if query.contains("120hz") || query.contains("120 hz") {
        parts.push("120-hz".to_owned());
    }

    if ["gaming", "ps5", "xbox", "jugar"]
        .iter()
        .any(|token| query.contains(token))
        && !parts.iter().any(|part| part == "gaming")
    {
        parts.push("gaming".to_owned());
    }

    parts.join("/")
}
