// SPDX-License-Identifier: MIT

//! Library file loading and macro lookup across multiple files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use rayon::prelude::*;

use super::parser::parse_lef;
use super::{Lef, LefMacro};
use crate::error::{Error, Result};
use crate::interner::{NameId, NameInterner};

/// Holds every loaded library file in load order. Lookups walk the
/// files in that order, so when two libraries define the same macro
/// the earlier file wins.
pub struct LefReader {
    names: Arc<NameInterner>,
    files: Vec<(PathBuf, Lef)>,
}

impl LefReader {
    pub fn new(names: Arc<NameInterner>) -> Self {
        Self {
            names,
            files: Vec::new(),
        }
    }

    pub fn names(&self) -> &Arc<NameInterner> {
        &self.names
    }

    /// Load one library file. Re-reading a path replaces its previous
    /// contents wholesale.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lef = parse_lef(&text, &self.names);
        info!("LEF: loaded {} ({} macros)", path.display(), lef.macros.len());
        self.store(path.to_path_buf(), lef);
        Ok(())
    }

    /// Load several library files, parsing in parallel. Results are
    /// stored in the order given regardless of which finishes first.
    /// Returns the per-file failures; successfully read files are kept
    /// even when siblings fail.
    pub fn read_files(&mut self, paths: &[PathBuf]) -> Vec<(PathBuf, Error)> {
        let names = &self.names;
        let parsed: Vec<(PathBuf, Result<Lef>)> = paths
            .par_iter()
            .map(|path| {
                let result = fs::read_to_string(path)
                    .map(|text| parse_lef(&text, names))
                    .map_err(|source| Error::Io {
                        path: path.clone(),
                        source,
                    });
                (path.clone(), result)
            })
            .collect();

        let mut failures = Vec::new();
        for (path, result) in parsed {
            match result {
                Ok(lef) => {
                    info!("LEF: loaded {} ({} macros)", path.display(), lef.macros.len());
                    self.store(path, lef);
                }
                Err(err) => failures.push((path, err)),
            }
        }
        failures
    }

    /// Parse already-read text under a synthetic path. Useful for
    /// in-memory libraries.
    pub fn read_str(&mut self, path: impl Into<PathBuf>, text: &str) {
        let lef = parse_lef(text, &self.names);
        self.store(path.into(), lef);
    }

    /// First definition of `cell` across the loaded files, in load
    /// order.
    pub fn find_macro(&self, cell: NameId) -> Option<&LefMacro> {
        self.files.iter().find_map(|(_, lef)| lef.macros.get(&cell))
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Lef> {
        let path = path.as_ref();
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, lef)| lef)
    }

    pub fn files(&self) -> &[(PathBuf, Lef)] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn store(&mut self, path: PathBuf, lef: Lef) {
        if let Some(slot) = self.files.iter_mut().find(|(p, _)| *p == path) {
            slot.1 = lef;
        } else {
            self.files.push((path, lef));
        }
    }
}
