// SPDX-License-Identifier: MIT

//! COMPONENTS section records.

use super::common::{clean_semicolon, is_item_header, parse_coordinate_pair};
use crate::def::{DefComponent, DefPlacement, PlacementStatus};
use crate::interner::NameInterner;

/// `- inst cell [+ PLACED|FIXED|COVER ( x y ) orient] [+ UNPLACED] ... ;`
///
/// Returns `None` for lines that are not a well-formed component
/// record; the section loop logs and skips those.
pub fn parse_component(parts: &[&str], names: &NameInterner) -> Option<DefComponent> {
    if !is_item_header(parts) || parts.len() < 3 {
        return None;
    }
    let inst = clean_semicolon(parts[1]);
    let cell = clean_semicolon(parts[2]);
    if inst.is_empty() || cell.is_empty() || cell == "+" {
        return None;
    }

    // An UNPLACED component simply has no placement clause, but a
    // PLACED/FIXED/COVER keyword whose coordinates don't parse makes
    // the whole record malformed.
    let placement = match parts
        .iter()
        .position(|p| PlacementStatus::from_keyword(p).is_some())
    {
        Some(i) => Some(parse_placement(parts, i)?),
        None => None,
    };

    Some(DefComponent {
        inst: names.intern(inst),
        cell: names.intern(cell),
        placement,
    })
}

/// Placement clause starting at the status keyword `parts[i]`.
fn parse_placement(parts: &[&str], i: usize) -> Option<DefPlacement> {
    let status = PlacementStatus::from_keyword(parts[i])?;
    let (x, y) = parse_coordinate_pair(parts, i + 1)?;
    let orient = parts
        .get(i + 5)
        .map(|o| clean_semicolon(o))
        .filter(|o| !o.is_empty() && *o != "+" && *o != "(")
        .unwrap_or("N");
    Some(DefPlacement {
        status,
        x,
        y,
        orient: orient.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn test_placed_component() {
        let names = NameInterner::new();
        let c = parse_component(&parts("- u1/inv_0 INV_X1 + PLACED ( 2000 3000 ) N ;"), &names)
            .unwrap();
        assert_eq!(names.resolve(c.inst).unwrap(), "u1/inv_0");
        assert_eq!(names.resolve(c.cell).unwrap(), "INV_X1");
        let p = c.placement.unwrap();
        assert_eq!(p.status, PlacementStatus::Placed);
        assert_eq!((p.x, p.y), (2000, 3000));
        assert_eq!(p.orient, "N");
    }

    #[test]
    fn test_fixed_with_orientation() {
        let names = NameInterner::new();
        let c = parse_component(&parts("- pad0 PAD_H + FIXED ( 0 4735000 ) FS ;"), &names).unwrap();
        let p = c.placement.unwrap();
        assert_eq!(p.status, PlacementStatus::Fixed);
        assert_eq!(p.orient, "FS");
    }

    #[test]
    fn test_unplaced_component() {
        let names = NameInterner::new();
        let c = parse_component(&parts("- u2 NAND2_X1 + UNPLACED ;"), &names).unwrap();
        assert!(c.placement.is_none());
    }

    #[test]
    fn test_missing_cell_rejected() {
        let names = NameInterner::new();
        assert!(parse_component(&parts("- broken_line_without_cell"), &names).is_none());
        assert!(parse_component(&parts("END COMPONENTS"), &names).is_none());
    }

    #[test]
    fn test_malformed_placement_rejects_record() {
        let names = NameInterner::new();
        // A placement keyword with unparsable coordinates must not
        // degrade into an unplaced component.
        assert!(parse_component(&parts("- u3 INV_X1 + PLACED ( abc def ) N ;"), &names).is_none());
        assert!(parse_component(&parts("- u4 INV_X1 + FIXED ( 100 ) N ;"), &names).is_none());
    }
}
