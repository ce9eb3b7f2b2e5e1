// SPDX-License-Identifier: MIT

//! SPECIALNETS section records: power/ground and other pre-routed
//! nets. Connection syntax matches regular nets; the (often huge)
//! routing clauses are ignored.

use super::common::{clean_semicolon, is_item_header};
use super::net::collect_connections;
use crate::def::DefSpecialNet;
use crate::interner::NameInterner;

/// `- name ( inst pin ) ... [+ ROUTED ...] ;`
pub fn parse_special_net(parts: &[&str], names: &NameInterner) -> Option<DefSpecialNet> {
    if !is_item_header(parts) {
        return None;
    }
    let name = clean_semicolon(parts[1]);
    if name.is_empty() {
        return None;
    }

    Some(DefSpecialNet {
        name: names.intern(name),
        connections: collect_connections(parts, names),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn test_power_net() {
        let names = NameInterner::new();
        let n = parse_special_net(
            &parts("- VDD ( * VDD ) + USE POWER + ROUTED M4 2000 ( 0 100 ) ( 500000 100 ) ;"),
            &names,
        )
        .unwrap();
        assert_eq!(names.resolve(n.name).unwrap(), "VDD");
        // The ( * VDD ) wildcard tuple is routing shorthand, not a
        // concrete instance connection.
        assert!(n.connections.is_empty());
    }

    #[test]
    fn test_explicit_connections() {
        let names = NameInterner::new();
        let n = parse_special_net(&parts("- VSS ( pad0 VSS ) ( pad1 VSS ) ;"), &names).unwrap();
        assert_eq!(n.connections.len(), 2);
    }
}
