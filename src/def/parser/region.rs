// SPDX-License-Identifier: MIT

//! REGIONS section records.

use super::common::{clean_semicolon, collect_coordinate_pairs, is_item_header};
use crate::def::DefRegion;

/// `- name ( x1 y1 ) ( x2 y2 ) ... [+ TYPE t] ;`
pub fn parse_region(parts: &[&str]) -> Option<DefRegion> {
    if !is_item_header(parts) {
        return None;
    }
    let name = clean_semicolon(parts[1]);
    if name.is_empty() {
        return None;
    }
    let points = collect_coordinate_pairs(parts);
    if points.is_empty() {
        return None;
    }

    Some(DefRegion {
        name: name.to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn test_region_with_two_corners() {
        let r = parse_region(&parts("- core_region ( 0 0 ) ( 500000 400000 ) + TYPE FENCE ;"))
            .unwrap();
        assert_eq!(r.name, "core_region");
        assert_eq!(r.points, vec![(0, 0), (500000, 400000)]);
    }

    #[test]
    fn test_region_without_points_rejected() {
        assert!(parse_region(&parts("- empty_region ;")).is_none());
    }
}
