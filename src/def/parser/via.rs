// SPDX-License-Identifier: MIT

//! VIAS section records.

use super::common::{clean_semicolon, is_item_header};
use crate::def::DefVia;
use crate::interner::NameInterner;

/// `- name + VIARULE rule + CUTSIZE x y + LAYERS l1 l2 l3
///  + CUTSPACING x y + ENCLOSURE a b c d + ROWCOL r c ;`
///
/// Clauses may appear in any order; unknown clauses are ignored.
pub fn parse_via(parts: &[&str], names: &NameInterner) -> Option<DefVia> {
    if !is_item_header(parts) {
        return None;
    }
    let name = clean_semicolon(parts[1]);
    if name.is_empty() {
        return None;
    }

    let mut via = DefVia {
        name: names.intern(name),
        via_rule: None,
        cut_size: None,
        layers: Vec::new(),
        cut_spacing: None,
        enclosure: None,
        row_col: None,
    };

    for (keyword, args) in clauses(parts) {
        match keyword {
            "VIARULE" => via.via_rule = args.first().map(|r| r.to_string()),
            "CUTSIZE" => via.cut_size = int_pair(&args),
            "CUTSPACING" => via.cut_spacing = int_pair(&args),
            "LAYERS" => via.layers = args.iter().map(|l| l.to_string()).collect(),
            "ENCLOSURE" => {
                let v: Vec<i64> = args.iter().filter_map(|a| a.parse().ok()).collect();
                if v.len() >= 4 {
                    via.enclosure = Some((v[0], v[1], v[2], v[3]));
                }
            }
            "ROWCOL" => via.row_col = int_pair(&args),
            _ => {}
        }
    }

    Some(via)
}

/// Split the tail of the record into `+ KEYWORD args...` clauses.
fn clauses<'a>(parts: &[&'a str]) -> Vec<(&'a str, Vec<&'a str>)> {
    let mut out: Vec<(&'a str, Vec<&'a str>)> = Vec::new();
    let mut iter = parts.iter().peekable();
    while let Some(&p) = iter.next() {
        if p != "+" {
            continue;
        }
        let Some(&keyword) = iter.next() else { break };
        let mut args = Vec::new();
        while let Some(&&next) = iter.peek() {
            if next == "+" || next == ";" {
                break;
            }
            args.push(clean_semicolon(next));
            iter.next();
        }
        out.push((keyword, args));
    }
    out
}

fn int_pair(args: &[&str]) -> Option<(i64, i64)> {
    if args.len() >= 2 {
        if let (Ok(a), Ok(b)) = (args[0].parse(), args[1].parse()) {
            return Some((a, b));
        }
    }
    None
}
