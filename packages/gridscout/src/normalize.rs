//! Label normalization for region matching.
//!
//! Region names arrive from boundary files with inconsistent casing,
//! accents, and the occasional encoding casualty. Every lookup in this
//! crate goes through [`normalize_key`]; raw string equality is never used
//! to resolve a region.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::types::region::Region;

/// Canonicalize a free-text label into a comparable key.
///
/// Strips diacritics via canonical decomposition, drops any non-ASCII
/// remnants, lowercases, collapses whitespace runs to single spaces, and
/// trims the ends. Total: empty input yields an empty key.
///
/// The load-bearing property is that accent/case/whitespace variants of
/// the same label collapse to one key: `"ASUNCIÓN"`, `"Asuncion"`, and
/// `" asunción "` all normalize to `"asuncion"`.
pub fn normalize_key(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    ascii
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scrub extracted display text: compatibility-normalize, replace
/// non-breaking spaces, and drop control characters.
///
/// Provided for [`ItemExtractor`](crate::traits::ItemExtractor)
/// implementations; region matching uses [`normalize_key`] instead.
pub fn clean_text(text: &str) -> String {
    text.nfkc()
        .map(|c| if c == '\u{a0}' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Apply a raw-label -> corrected-label table to a set of regions.
///
/// Lookups go through [`normalize_key`] on both sides, so a table keyed by
/// mojibake or differently-cased labels still reconciles against the raw
/// boundary names. A label without a correction keeps its raw name as the
/// cleaned name.
pub fn apply_corrections(regions: &mut [Region], corrections: &HashMap<String, String>) {
    let normalized: HashMap<String, &str> = corrections
        .iter()
        .map(|(raw, fixed)| (normalize_key(raw), fixed.as_str()))
        .collect();

    for region in regions {
        let cleaned = normalized
            .get(&normalize_key(&region.name))
            .map(|fixed| (*fixed).to_string())
            .unwrap_or_else(|| region.name.clone());
        region.cleaned_name = Some(cleaned);
    }
}
