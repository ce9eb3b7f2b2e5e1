// SPDX-License-Identifier: MIT

//! LEF library model: reusable cell templates (macros) with pin and
//! obstruction geometry, plus the site/layer/via definitions the
//! library carries alongside them. All coordinates are microns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::interner::NameId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LefRect {
    pub xl: f64,
    pub yl: f64,
    pub xh: f64,
    pub yh: f64,
}

/// Rectangles grouped by the layer they sit on.
pub type LayerShapes = HashMap<String, Vec<LefRect>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LefPort {
    pub shapes: LayerShapes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LefAntenna {
    pub kind: String,
    pub value: f64,
    pub layer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LefPin {
    pub direction: Option<String>,
    pub use_type: Option<String>,
    pub ground_sensitivity: Option<String>,
    pub supply_sensitivity: Option<String>,
    pub antennas: Vec<LefAntenna>,
    pub ports: Vec<LefPort>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LefForeign {
    pub cell: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LefMacro {
    pub name: NameId,
    pub class: Option<String>,
    pub origin: (f64, f64),
    pub foreign: Option<LefForeign>,
    /// `SIZE w BY h`. Required before any instance of this macro can
    /// be resolved to a bounding box.
    pub size: Option<(f64, f64)>,
    pub symmetry: Vec<String>,
    pub site: Option<String>,
    pub pins: HashMap<NameId, LefPin>,
    pub obs: LayerShapes,
}

impl LefMacro {
    pub fn new(name: NameId) -> Self {
        Self {
            name,
            class: None,
            origin: (0.0, 0.0),
            foreign: None,
            size: None,
            symmetry: Vec::new(),
            site: None,
            pins: HashMap::new(),
            obs: LayerShapes::new(),
        }
    }
}

/// Opaque named block (SITE, LAYER, VIARULE) kept as its raw span for
/// textual lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LefBlock {
    pub name: String,
    pub source: String,
}

/// Library VIA: raw span plus the layer geometry parsed out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LefVia {
    pub name: String,
    pub shapes: LayerShapes,
    pub source: String,
}

/// One parsed library file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lef {
    pub sites: HashMap<String, LefBlock>,
    pub layers: HashMap<String, LefBlock>,
    pub vias: HashMap<String, LefVia>,
    pub via_rules: HashMap<String, LefBlock>,
    pub macros: HashMap<NameId, LefMacro>,
    pub property_definitions: HashMap<String, String>,
}

pub mod parser;
pub mod reader;
