// SPDX-License-Identifier: MIT

//! DEF statement parsing over preprocessed logical lines.
//!
//! The file walks through at most one open section at a time. Each
//! repeated section is a [`Section`] variant accumulating its records;
//! scalar statements (VERSION, DESIGN, UNITS, DIEAREA, ROW, TRACKS)
//! are handled directly. A malformed record inside a section is logged
//! with its original line number and skipped; parsing always produces
//! a `DefData`.

pub mod common;
pub mod component;
pub mod net;
pub mod pin;
pub mod region;
pub mod specialnet;
pub mod via;

use std::collections::HashMap;

use log::warn;

use self::common::{clean_semicolon, collect_coordinate_pairs};
use super::preprocessor::{preprocess, LogicalLine};
use super::{DefBlockage, DefComponent, DefData, DefNet, DefPin, DefRegion, DefRow, DefSpecialNet, DefTrack, DefVia};
use crate::interner::NameInterner;

/// Parse a complete DEF text.
pub fn parse_def(content: &str, names: &NameInterner) -> DefData {
    let lines = preprocess(content);
    parse_logical_lines(lines.iter(), names)
}

/// Parse a run of logical lines. Used both for whole files and for
/// the chunks of a parallel parse; a section left open at the end of
/// the run is closed as if its `END` had been seen.
pub fn parse_logical_lines<'a, I>(lines: I, names: &NameInterner) -> DefData
where
    I: Iterator<Item = &'a LogicalLine>,
{
    let mut data = DefData::default();
    let mut section: Option<Section> = None;

    for line in lines {
        let parts: Vec<&str> = line.text.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        if let Some(open) = section.take() {
            if parts[0] == "END" && parts.get(1) == Some(&open.keyword()) {
                open.close(&mut data);
            } else {
                let mut open = open;
                open.consume(&parts, line, names);
                section = Some(open);
            }
            continue;
        }

        match parts[0] {
            "VERSION" if parts.len() > 1 => {
                data.version = Some(clean_semicolon(parts[1]).to_string());
            }
            "DESIGN" if parts.len() > 1 => {
                data.design = Some(names.intern(clean_semicolon(parts[1])));
            }
            "UNITS" => parse_units(&parts, line, &mut data),
            "DIEAREA" => {
                let points = collect_coordinate_pairs(&parts);
                if points.len() >= 2 {
                    data.die_area = Some(points);
                } else {
                    warn!("DEF line {}: malformed DIEAREA: {}", line.line, line.text);
                }
            }
            "ROW" => match parse_row(&parts) {
                Some(row) => data.rows.push(row),
                None => warn!("DEF line {}: malformed ROW: {}", line.line, line.text),
            },
            "TRACKS" => match parse_track(&parts) {
                Some(track) => data.tracks.push(track),
                None => warn!("DEF line {}: malformed TRACKS: {}", line.line, line.text),
            },
            "END" => {}
            keyword => {
                if let Some(open) = Section::open(keyword) {
                    section = Some(open);
                }
                // Anything else (HISTORY, GCELLGRID, ...) is ignored.
            }
        }
    }

    // A chunk may end inside a section whose END lives in the next
    // chunk.
    if let Some(open) = section {
        open.close(&mut data);
    }

    data
}

/// One repeated section and the records accumulated so far.
enum Section {
    Components(Vec<DefComponent>),
    Pins(Vec<DefPin>),
    Nets(Vec<DefNet>),
    SpecialNets(Vec<DefSpecialNet>),
    Vias(Vec<DefVia>),
    Regions(Vec<DefRegion>),
    Blockages(Vec<DefBlockage>),
    PropertyDefinitions(HashMap<String, String>),
}

impl Section {
    fn open(keyword: &str) -> Option<Self> {
        match keyword {
            "COMPONENTS" => Some(Self::Components(Vec::new())),
            "PINS" => Some(Self::Pins(Vec::new())),
            "NETS" => Some(Self::Nets(Vec::new())),
            "SPECIALNETS" => Some(Self::SpecialNets(Vec::new())),
            "VIAS" => Some(Self::Vias(Vec::new())),
            "REGIONS" => Some(Self::Regions(Vec::new())),
            "BLOCKAGES" => Some(Self::Blockages(Vec::new())),
            "PROPERTYDEFINITIONS" => Some(Self::PropertyDefinitions(HashMap::new())),
            _ => None,
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            Self::Components(_) => "COMPONENTS",
            Self::Pins(_) => "PINS",
            Self::Nets(_) => "NETS",
            Self::SpecialNets(_) => "SPECIALNETS",
            Self::Vias(_) => "VIAS",
            Self::Regions(_) => "REGIONS",
            Self::Blockages(_) => "BLOCKAGES",
            Self::PropertyDefinitions(_) => "PROPERTYDEFINITIONS",
        }
    }

    fn consume(&mut self, parts: &[&str], line: &LogicalLine, names: &NameInterner) {
        let ok = match self {
            Self::Components(items) => push(items, component::parse_component(parts, names)),
            Self::Pins(items) => push(items, pin::parse_pin(parts, names)),
            Self::Nets(items) => push(items, net::parse_net(parts, names)),
            Self::SpecialNets(items) => push(items, specialnet::parse_special_net(parts, names)),
            Self::Vias(items) => push(items, via::parse_via(parts, names)),
            Self::Regions(items) => push(items, region::parse_region(parts)),
            Self::Blockages(items) => {
                let before = items.len();
                items.extend(parse_blockages(parts));
                items.len() > before
            }
            Self::PropertyDefinitions(map) => {
                if parts.len() >= 3 {
                    let key = format!("{} {}", parts[0], parts[1]);
                    let value = clean_semicolon(parts[2..].join(" ").as_str()).trim().to_string();
                    map.insert(key, value);
                    true
                } else {
                    false
                }
            }
        };
        if !ok {
            warn!(
                "DEF line {}: skipping malformed {} record: {}",
                line.line,
                self.keyword(),
                line.text
            );
        }
    }

    fn close(self, data: &mut DefData) {
        match self {
            Self::Components(items) => data.components.extend(items),
            Self::Pins(items) => data.pins.extend(items),
            Self::Nets(items) => data.nets.extend(items),
            Self::SpecialNets(items) => data.special_nets.extend(items),
            Self::Vias(items) => data.vias.extend(items),
            Self::Regions(items) => data.regions.extend(items),
            Self::Blockages(items) => data.blockages.extend(items),
            Self::PropertyDefinitions(map) => data.property_definitions.extend(map),
        }
    }
}

fn push<T>(items: &mut Vec<T>, parsed: Option<T>) -> bool {
    match parsed {
        Some(item) => {
            items.push(item);
            true
        }
        None => false,
    }
}

/// `UNITS DISTANCE MICRONS n ;` with `n > 0`.
fn parse_units(parts: &[&str], line: &LogicalLine, data: &mut DefData) {
    if parts.len() >= 4 && parts[1] == "DISTANCE" && parts[2] == "MICRONS" {
        if let Ok(units) = clean_semicolon(parts[3]).parse::<i32>() {
            if units > 0 {
                data.units = Some(units);
                return;
            }
        }
    }
    warn!("DEF line {}: malformed UNITS: {}", line.line, line.text);
}

/// `ROW name site x y orient DO nx BY ny [STEP sx sy] ;`
fn parse_row(parts: &[&str]) -> Option<DefRow> {
    if parts.len() < 10 || parts[6] != "DO" || parts[8] != "BY" {
        return None;
    }
    let (step_x, step_y) = if parts.len() >= 13 && parts[10] == "STEP" {
        (
            parts[11].parse().ok()?,
            clean_semicolon(parts[12]).parse().ok()?,
        )
    } else {
        (0, 0)
    };
    Some(DefRow {
        name: parts[1].to_string(),
        site: parts[2].to_string(),
        x: parts[3].parse().ok()?,
        y: parts[4].parse().ok()?,
        orient: parts[5].to_string(),
        num_x: parts[7].parse().ok()?,
        num_y: clean_semicolon(parts[9]).parse().ok()?,
        step_x,
        step_y,
    })
}

/// `TRACKS X|Y start DO num STEP step LAYER layer ;`
fn parse_track(parts: &[&str]) -> Option<DefTrack> {
    if parts.len() < 8 || parts[3] != "DO" || parts[5] != "STEP" {
        return None;
    }
    let axis = parts[1];
    if axis != "X" && axis != "Y" {
        return None;
    }
    let layer = parts
        .iter()
        .position(|&p| p == "LAYER")
        .and_then(|i| parts.get(i + 1))
        .map(|l| clean_semicolon(l))?;
    Some(DefTrack {
        axis: axis.to_string(),
        start: parts[2].parse().ok()?,
        num: parts[4].parse().ok()?,
        step: clean_semicolon(parts[6]).parse().ok()?,
        layer: layer.to_string(),
    })
}

/// `- LAYER l RECT ( x y ) ( x y ) ...` or `- PLACEMENT RECT ...`:
/// every pair of coordinate pairs is one rectangle.
fn parse_blockages(parts: &[&str]) -> Vec<DefBlockage> {
    collect_coordinate_pairs(parts)
        .chunks(2)
        .filter(|c| c.len() == 2)
        .map(|c| DefBlockage {
            xl: c[0].0.min(c[1].0),
            yl: c[0].1.min(c[1].1),
            xh: c[0].0.max(c[1].0),
            yh: c[0].1.max(c[1].1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::PlacementStatus;

    const SMALL_DEF: &str = r#"VERSION 5.8 ;
DESIGN gcd ;
UNITS DISTANCE MICRONS 1000 ;
DIEAREA ( 0 0 ) ( 100000 100000 ) ;
ROW core_0 unit 0 0 N DO 100 BY 1 STEP 460 0 ;
TRACKS X 190 DO 200 STEP 380 LAYER M1 ;
COMPONENTS 2 ;
- u1 INV_X1 + PLACED ( 2000 3000 ) N ;
- u2 NAND2_X1 + FIXED ( 5000 6000 ) FS ;
END COMPONENTS
PINS 1 ;
- clk + NET clk + DIRECTION INPUT + USE SIGNAL ;
END PINS
NETS 1 ;
- n1 ( PIN clk ) ( u1 A ) ;
END NETS
END DESIGN
"#;

    #[test]
    fn test_small_design() {
        let names = NameInterner::new();
        let data = parse_def(SMALL_DEF, &names);
        assert_eq!(data.version.as_deref(), Some("5.8"));
        assert_eq!(data.design, Some(names.get("gcd").unwrap()));
        assert_eq!(data.units, Some(1000));
        assert_eq!(data.die_area, Some(vec![(0, 0), (100000, 100000)]));
        assert_eq!(data.rows.len(), 1);
        assert_eq!(data.tracks.len(), 1);
        assert_eq!(data.components.len(), 2);
        assert_eq!(data.pins.len(), 1);
        assert_eq!(data.nets.len(), 1);
        assert_eq!(
            data.components[1].placement.as_ref().unwrap().status,
            PlacementStatus::Fixed
        );
    }

    #[test]
    fn test_malformed_record_skipped() {
        let names = NameInterner::new();
        let text = "COMPONENTS 2 ;\n- broken_line_without_cell\n- u1 INV_X1 + PLACED ( 0 0 ) N ;\nEND COMPONENTS\n";
        let data = parse_def(text, &names);
        assert_eq!(data.components.len(), 1);
        assert_eq!(names.resolve(data.components[0].inst).unwrap(), "u1");
    }

    #[test]
    fn test_units_must_be_positive() {
        let names = NameInterner::new();
        let data = parse_def("UNITS DISTANCE MICRONS 0 ;\n", &names);
        assert_eq!(data.units, None);
        let data = parse_def("UNITS DISTANCE MICRONS -100 ;\n", &names);
        assert_eq!(data.units, None);
    }

    #[test]
    fn test_row_without_step() {
        let names = NameInterner::new();
        let data = parse_def("ROW r0 unit 10 20 FS DO 4 BY 2 ;\n", &names);
        assert_eq!(data.rows.len(), 1);
        assert_eq!(data.rows[0].step_x, 0);
        assert_eq!(data.rows[0].num_y, 2);
    }

    #[test]
    fn test_track_axis_validated() {
        let names = NameInterner::new();
        let data = parse_def("TRACKS Z 190 DO 200 STEP 380 LAYER M1 ;\n", &names);
        assert!(data.tracks.is_empty());
    }

    #[test]
    fn test_unknown_section_ignored() {
        let names = NameInterner::new();
        let text = "HISTORY some tool note ;\nCOMPONENTS 1 ;\n- u1 INV_X1 + UNPLACED ;\nEND COMPONENTS\n";
        let data = parse_def(text, &names);
        assert_eq!(data.components.len(), 1);
    }

    #[test]
    fn test_blockages_and_regions() {
        let names = NameInterner::new();
        let text = "\
BLOCKAGES 1 ;
- LAYER M1 RECT ( 0 0 ) ( 100 200 ) ;
END BLOCKAGES
REGIONS 1 ;
- r1 ( 0 0 ) ( 5000 5000 ) ;
END REGIONS
";
        let data = parse_def(text, &names);
        assert_eq!(
            data.blockages,
            vec![DefBlockage {
                xl: 0,
                yl: 0,
                xh: 100,
                yh: 200
            }]
        );
        assert_eq!(data.regions.len(), 1);
    }

    #[test]
    fn test_property_definitions() {
        let names = NameInterner::new();
        let text = "\
PROPERTYDEFINITIONS
COMPONENT maskShift STRING ;
DESIGN totalRoute INTEGER ;
END PROPERTYDEFINITIONS
";
        let data = parse_def(text, &names);
        assert_eq!(
            data.property_definitions.get("COMPONENT maskShift").map(String::as_str),
            Some("STRING")
        );
        assert_eq!(data.property_definitions.len(), 2);
    }

    #[test]
    fn test_open_section_closed_at_eof() {
        let names = NameInterner::new();
        let text = "COMPONENTS 1 ;\n- u1 INV_X1 + PLACED ( 0 0 ) N ;\n";
        let data = parse_def(text, &names);
        assert_eq!(data.components.len(), 1);
    }
}
