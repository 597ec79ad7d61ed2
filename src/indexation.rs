//! Index/noindex policy for filter URLs.
//!
//! Rules run in priority order: structural disqualifiers first (sorting,
//! pagination, price, deep facet combinations), then depth-based rules
//! where two-facet URLs must earn indexation with traffic or search
//! demand.

use crate::model::{IndexationVerdict, UrlClassification, UrlType};

pub const N2_CLICKS_THRESHOLD: u64 = 500;
pub const N2_DEMAND_THRESHOLD: u64 = 200;

/// Decide whether a classified URL should be indexable. `demand` is the
/// monthly search volume known for the URL's facet combination, zero when
/// no keyword data covers it.
pub fn should_index(
    classification: &UrlClassification,
    clicks: u64,
    demand: u64,
) -> (bool, String) {
    if classification.has_sorting {
        return (false, "Ordenación - canonical sin parámetro".to_owned());
    }
    if classification.has_pagination {
        return (false, "Paginación - canonical a página 1".to_owned());
    }
    if classification.has_price {
        return (false, "Filtro de precio - usar AJAX".to_owned());
    }
    if classification.num_facets >= 3 {
        return (false, "3+ facetas - canonical al padre N2".to_owned());
    }
    if classification.num_facets == 2 {
        if clicks >= N2_CLICKS_THRESHOLD {
            return (true, format!("N2 con tráfico ({clicks} clics)"));
        }
        if demand >= N2_DEMAND_THRESHOLD {
            return (true, format!("N2 con demanda ({demand} búsquedas/mes)"));
        }
        return (false, "N2 sin tráfico ni demanda".to_owned());
    }
    if classification.num_facets == 1 {
        return (true, "N1 - indexar con contenido".to_owned());
    }

    match classification.url_type {
        UrlType::Category => (true, "Categoría principal".to_owned()),
        UrlType::Article => (true, "Artículo/guía".to_owned()),
        _ => (true, "Default: indexar".to_owned()),
    }
}

/// Audit every observed URL against the indexation policy. Keyword
/// demand is not joined here; the audit runs on observed clicks alone.
pub fn audit_urls(classified: &[crate::model::ClassifiedUrl]) -> Vec<IndexationVerdict> {
    classified
        .iter()
        .map(|c| {
            let (index, reason) = should_index(&c.classification, c.record.clicks, 0);
            IndexationVerdict {
                url: c.record.url.clone(),
                should_index: index,
                reason,
                current_clicks: c.record.clicks,
                action: if index {
                    "INDEX".to_owned()
                } else {
                    "NOINDEX + CANONICAL".to_owned()
                },
            }
        })
        .collect()
}
