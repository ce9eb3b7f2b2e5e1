// SPDX-License-Identifier: MIT

//! In-memory geometric model for LEF/DEF design data.
//!
//! LEF library files and DEF design files are parsed tolerantly into
//! plain data structures, placed components are joined against their
//! library macros, and the resolved instances land in a spatial index
//! for window queries. Identifier strings are interned once and passed
//! around as small ids.

pub mod def;
pub mod error;
pub mod geom;
pub mod interner;
pub mod lef;
pub mod resolver;
pub mod spatial;

pub use def::reader::DefReader;
pub use def::{DefComponent, DefData, DefNet, DefPin, DefVia, PlacementStatus};
pub use error::{Error, Result};
pub use geom::BBox;
pub use interner::{NameId, NameInterner};
pub use lef::reader::LefReader;
pub use lef::{Lef, LefMacro, LefPin, LefPort, LefRect};
pub use resolver::{resolve, ResolvedDesign, ResolvedInstance};
pub use spatial::RTree;
