//! Input parsing for the three export formats the analysis consumes:
//! analytics filter-usage exports, search-console URL performance CSVs
//! and keyword-research exports.
//!
//! Real exports are messy. Filter-usage files carry comment banners and
//! metadata rows before the data block; keyword exports arrive as UTF-16
//! TSV as often as UTF-8 CSV; column headers vary by export locale.
//! Every loader here skips what it cannot parse with a warning instead
//! of failing the run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::lexicon;
use crate::model::{FilterInteraction, KeywordRecord, UrlRecord};
use crate::normalize::fold_accents;

const URL_COLUMNS: &[&str] = &["url", "page", "pagina", "landing page"];
const CLICKS_COLUMNS: &[&str] = &["url_total_clicks", "clics", "clicks"];
const IMPRESSIONS_COLUMNS: &[&str] = &["impressions", "impresiones"];
const POSITION_COLUMNS: &[&str] = &["position", "posicion", "avg_position", "posicion media"];
const TOP_QUERY_COLUMNS: &[&str] = &["top_query", "top query", "consulta", "query"];
const TOP_QUERY_CLICKS_COLUMNS: &[&str] = &["top_query_clicks", "top query clicks"];
const TOP_QUERY_POSITION_COLUMNS: &[&str] = &["top_query_position", "top query position"];
const KEYWORD_COLUMNS: &[&str] = &["keyword", "palabra clave", "consulta", "query"];
const VOLUME_COLUMNS: &[&str] = &[
    "volume",
    "volumen",
    "avg. monthly searches",
    "busquedas mensuales",
    "search_volume",
];

/// Parse an analytics filter-usage export. The data block starts at the
/// first `label,count` row; everything before it (comment banners, date
/// metadata) is skipped.
pub fn load_filter_usage(path: &Path) -> Result<Vec<FilterInteraction>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading filter usage export {}", path.display()))?;

    let mut rows = Vec::new();
    let mut in_data = false;

    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(',') {
            continue;
        }

        let Some((name, sessions)) = split_data_row(line) else {
            if in_data {
                warn!(
                    line = line_no + 1,
                    file = %path.display(),
                    "skipping malformed filter usage row"
                );
            }
            continue;
        };
        in_data = true;

        let (facet_type, facet_value) = parse_filter_name(name);
        rows.push(FilterInteraction {
            facet_type,
            facet_value,
            sessions,
        });
    }

    debug!(rows = rows.len(), file = %path.display(), "loaded filter usage export");
    Ok(rows)
}

/// Split a candidate data row into `(label, sessions)`. Rows whose last
/// comma-separated field is not a count are not data rows.
fn split_data_row(line: &str) -> Option<(&str, u64)> {
    let (name, count) = line.rsplit_once(',')?;
    let count = count.trim().trim_matches('"').replace(['.', ','], "");
    let sessions = count.parse::<u64>().ok()?;
    let name = name.trim().trim_matches('"');
    if name.is_empty() {
        return None;
    }
    Some((name, sessions))
}

/// Resolve a raw filter label like `Pulgadas:55''` into a canonical
/// `(facet_type, facet_value)` pair. Labels without a `type:value` shape
/// canonicalize as a whole (`Search Filters` becomes the `total` row).
pub fn parse_filter_name(name: &str) -> (String, String) {
    let (raw_type, raw_value) = match name.split_once(':') {
        Some((facet_type, value)) => (facet_type, value),
        None => (name, name),
    };

    let facet_type = lexicon::canonical_facet_type(fold_accents(raw_type).trim());
    let mut facet_value = fold_accents(raw_value).trim().to_owned();

    // Size values come in as `55''`, `55"` or `55 pulgadas`.
    if facet_type == "tamano" {
        let digits: String = facet_value.chars().filter(char::is_ascii_digit).collect();
        if !digits.is_empty() {
            facet_value = digits;
        }
    }

    (facet_type, facet_value)
}

/// Parse a search-console URL performance CSV. Column positions are
/// resolved from header names; locale variants of each header are
/// accepted. Rows without a URL are dropped.
pub fn load_url_records(path: &Path) -> Result<Vec<UrlRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("reading URL performance export {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("reading headers of {}", path.display()))?
        .clone();

    let url_idx = find_column(&headers, URL_COLUMNS)
        .with_context(|| format!("no URL column in {}", path.display()))?;
    let clicks_idx = find_column(&headers, CLICKS_COLUMNS);
    let impressions_idx = find_column(&headers, IMPRESSIONS_COLUMNS);
    let position_idx = find_column(&headers, POSITION_COLUMNS);
    let top_query_idx = find_column(&headers, TOP_QUERY_COLUMNS);
    let top_query_clicks_idx = find_column(&headers, TOP_QUERY_CLICKS_COLUMNS);
    let top_query_position_idx = find_column(&headers, TOP_QUERY_POSITION_COLUMNS);

    let mut records = Vec::new();
    for (row_no, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(row = row_no + 2, file = %path.display(), error = %err, "skipping unreadable CSV row");
                continue;
            }
        };

        let url = field(&row, Some(url_idx));
        if url.is_empty() {
            continue;
        }

        records.push(UrlRecord {
            url,
            clicks: parse_count(&field(&row, clicks_idx)),
            impressions: parse_count(&field(&row, impressions_idx)),
            position: parse_decimal(&field(&row, position_idx)),
            top_query: non_empty(field(&row, top_query_idx)),
            top_query_clicks: non_empty(field(&row, top_query_clicks_idx))
                .map(|v| parse_count(&v)),
            top_query_position: non_empty(field(&row, top_query_position_idx))
                .map(|v| parse_decimal(&v)),
        });
    }

    debug!(rows = records.len(), file = %path.display(), "loaded URL performance export");
    Ok(records)
}

/// Parse a keyword-research export. Handles UTF-16 exports (both byte
/// orders, detected via BOM) and tries tab-separated before
/// comma-separated, which is the order keyword planners actually emit.
pub fn load_keywords(path: &Path) -> Result<Vec<KeywordRecord>> {
    let bytes = fs::read(path)
        .with_context(|| format!("reading keyword export {}", path.display()))?;
    let text = decode_export(&bytes);

    let records = parse_keyword_table(&text, b'\t');
    let records = if records.is_empty() {
        parse_keyword_table(&text, b',')
    } else {
        records
    };

    debug!(rows = records.len(), file = %path.display(), "loaded keyword export");
    Ok(records)
}

fn decode_export(bytes: &[u8]) -> String {
    match bytes {
        [0xff, 0xfe, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        [0xfe, 0xff, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn parse_keyword_table(text: &str, delimiter: u8) -> Vec<KeywordRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let Ok(headers) = reader.headers().cloned() else {
        return Vec::new();
    };
    let Some(keyword_idx) = find_column(&headers, KEYWORD_COLUMNS) else {
        return Vec::new();
    };
    let volume_idx = find_column(&headers, VOLUME_COLUMNS);

    let mut records = Vec::new();
    for row in reader.records().flatten() {
        let keyword = field(&row, Some(keyword_idx));
        if keyword.is_empty() {
            continue;
        }
        records.push(KeywordRecord {
            keyword,
            volume: parse_volume(&field(&row, volume_idx)),
        });
    }
    records
}

/// Match a header against the candidate list, ignoring case, accents and
/// surrounding whitespace.
fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    for candidate in candidates {
        for (idx, header) in headers.iter().enumerate() {
            if fold_accents(header).trim() == *candidate {
                return Some(idx);
            }
        }
    }
    None
}

fn field(row: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|idx| row.get(idx))
        .map(str::trim)
        .unwrap_or_default()
        .to_owned()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn parse_count(value: &str) -> u64 {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    cleaned.parse().unwrap_or(0)
}

fn parse_decimal(value: &str) -> f64 {
    value.trim().replace(',', ".").parse().unwrap_or(0.0)
}

/// Parse a search volume that may use planner shorthand: `10K`, `1,5M`,
/// `12.500` or a plain count. Unparseable volumes fall back to zero.
pub fn parse_volume(value: &str) -> u64 {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return 0;
    }

    for (suffix, multiplier) in [("k", 1_000.0), ("m", 1_000_000.0)] {
        if let Some(number) = value.strip_suffix(suffix) {
            let number = number.trim().replace(',', ".");
            if let Ok(parsed) = number.parse::<f64>() {
                return (parsed * multiplier) as u64;
            }
        }
    }

    parse_count(&value)
}
