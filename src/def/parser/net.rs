// SPDX-License-Identifier: MIT

//! NETS section records.

use super::common::{clean_semicolon, is_item_header};
use crate::def::{DefNet, DefNetConn};
use crate::interner::NameInterner;

/// `- name ( inst pin ) ( PIN extpin ) ... ;`
///
/// Routing clauses after the connection list are tolerated and
/// ignored.
pub fn parse_net(parts: &[&str], names: &NameInterner) -> Option<DefNet> {
    if !is_item_header(parts) {
        return None;
    }
    let name = clean_semicolon(parts[1]);
    if name.is_empty() {
        return None;
    }

    Some(DefNet {
        name: names.intern(name),
        connections: collect_connections(parts, names),
    })
}

/// All `( a b )` tuples on the line; `( PIN name )` marks an external
/// pin connection with no instance.
pub fn collect_connections(parts: &[&str], names: &NameInterner) -> Vec<DefNetConn> {
    let mut conns = Vec::new();
    let mut i = 0;
    while i + 3 < parts.len() {
        if parts[i] == "(" && parts[i + 3] == ")" {
            let a = parts[i + 1];
            let b = parts[i + 2];
            // Routing points look the same but hold numbers (or the
            // `*` same-coordinate shorthand); skip them.
            if a.parse::<i64>().is_err() && a != "*" {
                let conn = if a == "PIN" {
                    DefNetConn {
                        inst: None,
                        pin: names.intern(b),
                    }
                } else {
                    DefNetConn {
                        inst: Some(names.intern(a)),
                        pin: names.intern(b),
                    }
                };
                conns.push(conn);
            }
            i += 4;
        } else {
            i += 1;
        }
    }
    conns
}
