// SPDX-License-Identifier: MIT

//! PINS section records.

use super::common::{clean_semicolon, is_item_header, keyword_value};
use crate::def::DefPin;
use crate::interner::NameInterner;

/// `- name [+ NET net] [+ DIRECTION d] [+ USE u] ... ;`
pub fn parse_pin(parts: &[&str], names: &NameInterner) -> Option<DefPin> {
    if !is_item_header(parts) {
        return None;
    }
    let name = clean_semicolon(parts[1]);
    if name.is_empty() {
        return None;
    }

    Some(DefPin {
        name: names.intern(name),
        net: keyword_value(parts, "NET").map(|n| names.intern(n)),
        direction: keyword_value(parts, "DIRECTION").map(str::to_string),
        use_type: keyword_value(parts, "USE").map(str::to_string),
    })
}
