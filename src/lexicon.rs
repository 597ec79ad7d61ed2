//! Fixed keyword dictionaries driving URL and query classification.
//!
//! Everything here is a curated constant table; no external taxonomy is
//! consulted. Entries are stored accent-folded because all matching runs
//! on `normalize::fold_accents` output.

/// Facet types that come from the platform itself rather than a navigable
/// product attribute. Excluded from share-of-usage denominators.
pub const SYSTEM_FACET_TYPES: &[&str] = &["total", "sorting", "other"];

/// Facet types that must never produce indexable URLs.
pub const NOINDEX_FACET_TYPES: &[&str] = &["sorting", "precio"];

/// Raw analytics filter labels mapped to canonical facet-type keys.
const FACET_TYPE_ALIASES: &[(&str, &str)] = &[
    ("pulgadas", "tamano"),
    ("tamano", "tamano"),
    ("marca", "marca"),
    ("marcas", "marca"),
    ("tecnologia", "tecnologia"),
    ("panel", "tecnologia"),
    ("conectividad", "conectividad"),
    ("precio", "precio"),
    ("order", "sorting"),
    ("ordenar", "sorting"),
    ("resolucion", "resolucion"),
    ("frecuencia", "frecuencia"),
    ("hz", "frecuencia"),
    ("uso", "uso"),
    ("hdr", "caracteristica"),
    ("hdmi", "caracteristica"),
    ("oferta", "oferta"),
    ("ofertas", "oferta"),
    ("reacondicionado", "estado"),
    ("estado", "estado"),
    ("search filters", "total"),
];

/// Canonicalize a raw facet-type label. Unknown labels pass through
/// unchanged so new facets surface in reports instead of vanishing.
pub fn canonical_facet_type(raw: &str) -> String {
    for (alias, canonical) in FACET_TYPE_ALIASES {
        if raw == *alias {
            return (*canonical).to_owned();
        }
    }
    raw.to_owned()
}

/// Brand slugs recognized as URL path segments and query tokens.
pub const BRAND_SLUGS: &[&str] = &[
    "samsung", "lg", "sony", "philips", "tcl", "hisense", "xiaomi", "nilait", "tesla",
    "panasonic", "sharp", "toshiba",
];

/// Panel-technology slugs. The second element is the canonical value.
pub const TECHNOLOGY_SLUGS: &[(&str, &str)] = &[
    ("oled", "oled"),
    ("qled", "qled"),
    ("qned", "qned"),
    ("mini-led", "mini-led"),
    ("miniled", "mini-led"),
    ("nanocell", "nanocell"),
    ("neo-qled", "neo-qled"),
    ("ambilight", "ambilight"),
];

pub const CONNECTIVITY_SLUGS: &[&str] = &["smart-tv", "android-tv", "google-tv"];

pub const CONDITION_SLUGS: &[&str] = &["reacondicionado", "ofertas"];

pub const USE_CASE_SLUGS: &[&str] = &["gaming"];

/// Competitor/brand-site tokens that mark a query as navigational.
pub const COMPETITOR_TOKENS: &[&str] = &[
    "pccomponentes",
    "pcc",
    "mediamarkt",
    "amazon",
    "el corte ingles",
    "worten",
    "fnac",
    "carrefour",
];

/// Substrings that mark a query as informational rather than transactional.
pub const INFORMATIONAL_MARKERS: &[&str] = &[
    "mejor",
    "mejores",
    "top",
    "ranking",
    "cual",
    "que es",
    "diferencia",
    "vs",
    "versus",
    "comparativa",
    "guia",
    "como",
    "elegir",
    "recomend",
    "opinion",
    "review",
    "analisis",
    "vale la pena",
    "calidad precio",
    "medidas",
    "dimensiones",
    "pulgadas a cm",
    "2024",
    "2025",
    "2026",
];

/// Editorial markers that flag a non-category URL as an article even when
/// it never mentions the category keyword.
pub const EDITORIAL_MARKERS: &[&str] = &[
    "mejor",
    "guia",
    "comparativa",
    "review",
    "analisis",
    "top ",
    "ranking",
    "vs",
    "como ",
];

/// Awareness-stage markers (matched against space-folded text).
pub const TOFU_MARKERS: &[&str] = &[
    "que es",
    "tipos de",
    "como funciona",
    "ventajas",
    "desventajas",
    "para que sirve",
    "significado",
];

/// Consideration-stage markers.
pub const MOFU_MARKERS: &[&str] = &[
    "mejor",
    "comparativa",
    "vs",
    "versus",
    "guia",
    "como elegir",
    "cual",
    "top",
    "ranking",
    "recomend",
    "alternativa",
];

/// Decision-stage markers.
pub const BOFU_MARKERS: &[&str] = &[
    "review",
    "opinion",
    "unboxing",
    "test",
    "analisis",
    "vale la pena",
    "merece la pena",
];

/// Purchase-driver categories and the query tokens that activate them.
/// Tokens of length <= 3 only match on word boundaries; longer tokens
/// match by plain containment (see `query_classifier::detect_drivers`).
pub const DRIVER_LEXICON: &[(&str, &[&str])] = &[
    (
        "precio",
        &[
            "precio", "barato", "barata", "economico", "oferta", "descuento", "rebaja", "chollo",
            "calidad precio",
        ],
    ),
    (
        "marca",
        &[
            "samsung", "lg", "sony", "philips", "tcl", "hisense", "xiaomi", "nilait", "apple",
            "oppo", "realme", "huawei", "motorola",
        ],
    ),
    (
        "rendimiento",
        &["rendimiento", "potente", "rapido", "procesador", "fluido", "ram", "gaming"],
    ),
    (
        "tamano",
        &["pulgadas", "tamano", "grande", "pequeno", "compacto", "mini"],
    ),
    (
        "imagen",
        &[
            "4k", "8k", "uhd", "hdr", "oled", "qled", "resolucion", "imagen", "pantalla", "nits",
            "brillo",
        ],
    ),
    ("bateria", &["bateria", "autonomia", "mah", "carga rapida"]),
    ("camara", &["camara", "foto", "selfie", "megapixel", "mpx", "zoom"]),
    (
        "almacenamiento",
        &["almacenamiento", "memoria", "capacidad", "gb", "tb"],
    ),
    (
        "conectividad",
        &[
            "5g", "wifi", "bluetooth", "nfc", "hdmi", "usb", "smart tv", "android tv", "google tv",
        ],
    ),
    (
        "diseno",
        &["diseno", "color", "delgado", "ligero", "elegante", "marco"],
    ),
    (
        "durabilidad",
        &["resistente", "duradero", "agua", "ip68", "gorilla", "garantia"],
    ),
    (
        "ecosistema",
        &["android", "ios", "alexa", "google assistant", "compatible", "ecosistema"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_aliases_map_to_canonical_keys() {
        assert_eq!(canonical_facet_type("pulgadas"), "tamano");
        assert_eq!(canonical_facet_type("marcas"), "marca");
        assert_eq!(canonical_facet_type("order"), "sorting");
        assert_eq!(canonical_facet_type("search filters"), "total");
    }

    #[test]
    fn unknown_facet_labels_pass_through() {
        assert_eq!(canonical_facet_type("soporte_pared"), "soporte_pared");
    }

    #[test]
    fn system_and_noindex_types_are_canonical() {
        for t in SYSTEM_FACET_TYPES.iter().chain(NOINDEX_FACET_TYPES) {
            assert_eq!(canonical_facet_type(t), *t, "not canonical: {t}");
        }
    }

    #[test]
    fn driver_lexicon_covers_twelve_categories() {
        assert_eq!(DRIVER_LEXICON.len(), 12);
        for (category, tokens) in DRIVER_LEXICON {
            assert!(!tokens.is_empty(), "empty driver list: {category}");
        }
    }
}
