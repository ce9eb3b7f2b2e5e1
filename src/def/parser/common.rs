// SPDX-License-Identifier: MIT

//! Token helpers shared by the per-section record parsers.

/// `( x y )` at `parts[i..i + 4]`, coordinates in DBU.
pub fn parse_coordinate_pair(parts: &[&str], i: usize) -> Option<(i64, i64)> {
    if i + 3 < parts.len() && parts[i] == "(" && parts[i + 3] == ")" {
        if let (Ok(x), Ok(y)) = (parts[i + 1].parse::<i64>(), parts[i + 2].parse::<i64>()) {
            return Some((x, y));
        }
    }
    None
}

/// All `( x y )` pairs in the token list, in order.
pub fn collect_coordinate_pairs(parts: &[&str]) -> Vec<(i64, i64)> {
    let mut pairs = Vec::new();
    let mut i = 0;
    while i < parts.len() {
        if let Some(pair) = parse_coordinate_pair(parts, i) {
            pairs.push(pair);
            i += 4;
        } else {
            i += 1;
        }
    }
    pairs
}

/// Value token following `keyword`, with any trailing semicolon
/// removed.
pub fn keyword_value<'a>(parts: &[&'a str], keyword: &str) -> Option<&'a str> {
    parts
        .iter()
        .position(|&p| p == keyword)
        .and_then(|i| parts.get(i + 1))
        .map(|v| clean_semicolon(v))
        .filter(|v| !v.is_empty() && *v != "+")
}

pub fn clean_semicolon(s: &str) -> &str {
    s.trim_end_matches(';')
}

/// Record lines inside a section start with `- `.
pub fn is_item_header(parts: &[&str]) -> bool {
    parts.first() == Some(&"-") && parts.len() > 1
}
