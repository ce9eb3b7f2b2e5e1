// SPDX-License-Identifier: MIT

//! DEF design model: the placed instances, pins, nets and supporting
//! geometry of one design. Coordinates are integer database units
//! (DBU); `units` gives DBU per micron.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::interner::NameId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStatus {
    Placed,
    Fixed,
    Cover,
}

impl PlacementStatus {
    pub fn from_keyword(kw: &str) -> Option<Self> {
        match kw {
            "PLACED" => Some(Self::Placed),
            "FIXED" => Some(Self::Fixed),
            "COVER" => Some(Self::Cover),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Fixed => "FIXED",
            Self::Cover => "COVER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefPlacement {
    pub status: PlacementStatus,
    pub x: i64,
    pub y: i64,
    pub orient: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefComponent {
    pub inst: NameId,
    pub cell: NameId,
    /// `None` for UNPLACED components.
    pub placement: Option<DefPlacement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefRow {
    pub name: String,
    pub site: String,
    pub x: i64,
    pub y: i64,
    pub orient: String,
    pub num_x: i64,
    pub num_y: i64,
    pub step_x: i64,
    pub step_y: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefTrack {
    /// `X` or `Y`.
    pub axis: String,
    pub start: i64,
    pub num: i64,
    pub step: i64,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefPin {
    pub name: NameId,
    pub net: Option<NameId>,
    pub direction: Option<String>,
    pub use_type: Option<String>,
}

/// One `( inst pin )` tuple; `inst` is `None` for `( PIN name )`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefNetConn {
    pub inst: Option<NameId>,
    pub pin: NameId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefNet {
    pub name: NameId,
    pub connections: Vec<DefNetConn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefSpecialNet {
    pub name: NameId,
    pub connections: Vec<DefNetConn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefVia {
    pub name: NameId,
    pub via_rule: Option<String>,
    pub cut_size: Option<(i64, i64)>,
    pub layers: Vec<String>,
    pub cut_spacing: Option<(i64, i64)>,
    pub enclosure: Option<(i64, i64, i64, i64)>,
    pub row_col: Option<(i64, i64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefRegion {
    pub name: String,
    pub points: Vec<(i64, i64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefBlockage {
    pub xl: i64,
    pub yl: i64,
    pub xh: i64,
    pub yh: i64,
}

/// One parsed design file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefData {
    pub version: Option<String>,
    pub design: Option<NameId>,
    /// DBU per micron (`UNITS DISTANCE MICRONS n`), always positive.
    pub units: Option<i32>,
    pub die_area: Option<Vec<(i64, i64)>>,
    pub rows: Vec<DefRow>,
    pub tracks: Vec<DefTrack>,
    pub components: Vec<DefComponent>,
    pub pins: Vec<DefPin>,
    pub nets: Vec<DefNet>,
    pub special_nets: Vec<DefSpecialNet>,
    pub vias: Vec<DefVia>,
    pub regions: Vec<DefRegion>,
    pub blockages: Vec<DefBlockage>,
    pub property_definitions: HashMap<String, String>,
}

pub mod chunk;
pub mod parser;
pub mod preprocessor;
pub mod reader;

pub use chunk::parse_def_chunked;
pub use parser::parse_def;
