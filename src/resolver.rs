// SPDX-License-Identifier: MIT

//! Joining placed components against library macros.
//!
//! Each placed component is matched to its macro, its DBU placement
//! is converted to microns with the design's UNITS factor, and the
//! macro SIZE gives the instance bounding box. Resolved instances go
//! into a name-keyed map and a spatial index for window queries.

use std::collections::HashMap;

use log::warn;

use crate::def::reader::DefReader;
use crate::geom::BBox;
use crate::interner::{NameId, NameInterner};
use crate::lef::reader::LefReader;
use crate::spatial::RTree;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedInstance {
    pub cell: NameId,
    /// Interned placement status keyword (`PLACED`, `FIXED`, `COVER`).
    pub status: NameId,
    /// `[x, y, x + w, y + h]` in microns.
    pub bbox: BBox,
}

/// The queryable geometric model of the loaded designs.
pub struct ResolvedDesign {
    instances: HashMap<NameId, ResolvedInstance>,
    index: RTree,
}

impl ResolvedDesign {
    pub fn get(&self, inst: NameId) -> Option<&ResolvedInstance> {
        self.instances.get(&inst)
    }

    pub fn instances(&self) -> &HashMap<NameId, ResolvedInstance> {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance names whose boxes intersect `window`; boundary touches
    /// count.
    pub fn query(&self, window: &BBox) -> Vec<NameId> {
        self.index.query(window)
    }

    /// Minimal box covering every resolved instance.
    pub fn bounds(&self) -> Option<BBox> {
        self.index.bounds()
    }
}

/// Join every placed component in `defs` against the macros in `lefs`.
///
/// Skipped with a warning: components whose design file has no valid
/// UNITS, whose macro is missing or has no SIZE, and duplicates of an
/// already-resolved instance name (first wins). Unplaced components
/// are skipped silently.
pub fn resolve(lefs: &LefReader, defs: &DefReader, names: &NameInterner) -> ResolvedDesign {
    let mut instances: HashMap<NameId, ResolvedInstance> = HashMap::new();
    let mut items: Vec<(NameId, BBox)> = Vec::new();

    for (path, data) in defs.files() {
        let Some(units) = data.units else {
            warn!(
                "resolve: {} has no valid UNITS, skipping its components",
                path.display()
            );
            continue;
        };
        let units = units as f64;

        for component in &data.components {
            let Some(placement) = &component.placement else {
                continue;
            };
            let Some(mac) = lefs.find_macro(component.cell) else {
                warn!(
                    "resolve: no macro {} for instance {}",
                    display(names, component.cell),
                    display(names, component.inst),
                );
                continue;
            };
            let Some((w, h)) = mac.size else {
                warn!(
                    "resolve: macro {} has no SIZE, skipping instance {}",
                    display(names, component.cell),
                    display(names, component.inst),
                );
                continue;
            };
            if instances.contains_key(&component.inst) {
                warn!(
                    "resolve: duplicate instance {}, keeping the first",
                    display(names, component.inst),
                );
                continue;
            }

            let x = placement.x as f64 / units;
            let y = placement.y as f64 / units;
            let bbox = BBox::new(x, y, x + w, y + h);
            instances.insert(
                component.inst,
                ResolvedInstance {
                    cell: component.cell,
                    status: names.intern(placement.status.as_str()),
                    bbox,
                },
            );
            items.push((component.inst, bbox));
        }
    }

    ResolvedDesign {
        instances,
        index: RTree::build(&items),
    }
}

fn display(names: &NameInterner, id: NameId) -> String {
    names.resolve(id).unwrap_or_else(|_| format!("{id:?}"))
}
