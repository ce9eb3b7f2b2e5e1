// SPDX-License-Identifier: MIT

//! Chunked parallel DEF parsing.
//!
//! The file is preprocessed into logical lines once, sequentially, so
//! no statement ever straddles a chunk boundary. The lines are then
//! cut into roughly equal chunks parsed in parallel. A chunk that
//! starts inside a repeated section cannot see that section's header,
//! so a backward scan finds the open section (if any) and the header
//! line is replayed at the front of the chunk. Merging is
//! deterministic in chunk order, which makes the result identical to
//! a single-chunk parse regardless of worker scheduling.

use log::debug;
use rayon::prelude::*;

use super::parser::parse_logical_lines;
use super::preprocessor::{preprocess, LogicalLine};
use super::DefData;
use crate::interner::NameInterner;

const SECTION_KEYWORDS: [&str; 8] = [
    "COMPONENTS",
    "PINS",
    "NETS",
    "SPECIALNETS",
    "VIAS",
    "REGIONS",
    "BLOCKAGES",
    "PROPERTYDEFINITIONS",
];

/// Parse `content` split into `chunks` pieces. With `chunks <= 1` (or
/// a file too small to split) this is an ordinary sequential parse.
pub fn parse_def_chunked(content: &str, chunks: usize, names: &NameInterner) -> DefData {
    let lines = preprocess(content);
    if chunks <= 1 || lines.len() < chunks * 2 {
        return parse_logical_lines(lines.iter(), names);
    }

    let chunk_len = lines.len().div_ceil(chunks);
    let jobs: Vec<(Option<&LogicalLine>, &[LogicalLine])> = lines
        .chunks(chunk_len)
        .scan(0usize, |offset, slice| {
            let start = *offset;
            *offset += slice.len();
            Some((open_section_at(&lines, start), slice))
        })
        .collect();
    debug!("DEF: parsing {} logical lines in {} chunks", lines.len(), jobs.len());

    let parsed: Vec<DefData> = jobs
        .par_iter()
        .map(|(header, slice)| parse_logical_lines(header.iter().copied().chain(slice.iter()), names))
        .collect();

    merge(parsed)
}

/// Header of the section still open at logical line `start`, found by
/// scanning backward: the nearest preceding section header wins unless
/// a matching `END` is seen first.
fn open_section_at(lines: &[LogicalLine], start: usize) -> Option<&LogicalLine> {
    for line in lines[..start].iter().rev() {
        let mut t = line.text.split_whitespace();
        match t.next() {
            Some("END") => {
                if t.next().is_some_and(|kw| SECTION_KEYWORDS.contains(&kw)) {
                    return None;
                }
            }
            Some(first) if SECTION_KEYWORDS.contains(&first) => return Some(line),
            _ => {}
        }
    }
    None
}

/// Combine per-chunk results: list sections concatenate in chunk
/// order, scalars take the first non-empty value.
fn merge(parts: Vec<DefData>) -> DefData {
    let mut out = DefData::default();
    for part in parts {
        if out.version.is_none() {
            out.version = part.version;
        }
        if out.design.is_none() {
            out.design = part.design;
        }
        if out.units.is_none() {
            out.units = part.units;
        }
        if out.die_area.is_none() {
            out.die_area = part.die_area;
        }
        out.rows.extend(part.rows);
        out.tracks.extend(part.tracks);
        out.components.extend(part.components);
        out.pins.extend(part.pins);
        out.nets.extend(part.nets);
        out.special_nets.extend(part.special_nets);
        out.vias.extend(part.vias);
        out.regions.extend(part.regions);
        out.blockages.extend(part.blockages);
        out.property_definitions.extend(part.property_definitions);
    }
    out
}
