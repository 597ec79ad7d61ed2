//! Keyword and label normalization shared by every classifier.
//!
//! All matching downstream runs on accent-folded lowercase text, so the
//! dictionaries only need to carry unaccented forms. These are heuristics
//! over Spanish commerce vocabulary, not a linguistic stemmer; false
//! positives and negatives are accepted.

use std::collections::BTreeSet;

/// Per-domain synonym table used when expanding a category keyword.
const CATEGORY_SYNONYMS: &[(&str, &[&str])] = &[
    ("movil", &["telefono", "celular", "smartphone"]),
    ("telefono", &["movil", "celular", "smartphone"]),
    ("celular", &["movil", "telefono", "smartphone"]),
    ("televisor", &["television", "tele"]),
    ("television", &["televisor", "tele"]),
    ("portatil", &["laptop", "ordenador", "notebook"]),
    ("ordenador", &["portatil", "laptop"]),
    ("auricular", &["cascos", "audifonos"]),
    ("frigorifico", &["nevera", "refrigerador"]),
    ("nevera", &["frigorifico", "refrigerador"]),
];

/// Lowercase and fold the fixed accent table, keeping separators intact.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ã' => 'a',
            'é' | 'è' => 'e',
            'í' | 'ì' => 'i',
            'ó' | 'ò' | 'õ' => 'o',
            'ú' | 'ù' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Canonical key form: accent-folded lowercase with spaces and hyphens
/// collapsed to underscores. Total over any input.
pub fn normalize(text: &str) -> String {
    fold_accents(text)
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Expand a category keyword into the token variants a URL or query could
/// plausibly mention: the keyword itself, its `-`/`_` tokens, naive
/// singular stems (trailing "es"/"s" stripped) and known synonyms.
/// Tokens of length <= 2 are dropped.
pub fn keyword_variations(keyword: &str) -> BTreeSet<String> {
    let mut variations = BTreeSet::new();

    let folded = fold_accents(keyword.trim());
    if folded.is_empty() {
        return variations;
    }

    let mut candidates: Vec<String> = vec![folded.clone()];
    candidates.extend(
        folded
            .split(['-', '_'])
            .filter(|token| !token.is_empty())
            .map(ToOwned::to_owned),
    );

    let mut stems = Vec::new();
    for token in &candidates {
        if let Some(stem) = token.strip_suffix("es") {
            stems.push(stem.to_owned());
        }
        if let Some(stem) = token.strip_suffix('s') {
            stems.push(stem.to_owned());
        }
    }
    candidates.extend(stems);

    let mut synonyms = Vec::new();
    for candidate in &candidates {
        for (base, expansions) in CATEGORY_SYNONYMS {
            if candidate == base {
                synonyms.extend(expansions.iter().map(|s| (*s).to_owned()));
            }
        }
    }
    candidates.extend(synonyms);

    for candidate in candidates {
        if candidate.chars().count() > 2 {
            variations.insert(candidate);
        }
    }

    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_accents_and_separators() {
        assert_eq!(normalize("Televisión OLED"), "television_oled");
        assert_eq!(normalize("mini-led"), "mini_led");
        assert_eq!(normalize("cámara año"), "camara_ano");
        assert_eq!(normalize("français"), "francais");
    }

    #[test]
    fn normalize_is_total_over_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn fold_accents_keeps_spaces() {
        assert_eq!(fold_accents("Qué es ñoño"), "que es nono");
    }

    #[test]
    fn variations_contain_the_keyword_itself() {
        let v = keyword_variations("televisores");
        assert!(v.contains("televisores"));
    }

    #[test]
    fn variations_include_singular_stems() {
        let v = keyword_variations("televisores");
        assert!(v.contains("televisor"));
        // "es" stripped as well as "s"
        assert!(v.contains("televisores".strip_suffix("es").unwrap()));
    }

    #[test]
    fn variations_expand_synonyms() {
        let v = keyword_variations("moviles");
        assert!(v.contains("movil"));
        assert!(v.contains("telefono"));
        assert!(v.contains("smartphone"));
    }

    #[test]
    fn variations_split_compound_keywords() {
        let v = keyword_variations("smart-tv-samsung");
        assert!(v.contains("smart"));
        assert!(v.contains("samsung"));
        // "tv" has length 2 and must be excluded
        assert!(!v.contains("tv"));
    }

    #[test]
    fn variations_never_contain_short_or_empty_tokens() {
        for keyword in ["televisores", "moviles", "smart-tv", "a-b-cdef"] {
            for token in keyword_variations(keyword) {
                assert!(token.chars().count() > 2, "short token from {keyword}: {token}");
            }
        }
    }

    #[test]
    fn variations_of_empty_keyword_are_empty() {
        assert!(keyword_variations("").is_empty());
        assert!(keyword_variations("  ").is_empty());
    }
}
