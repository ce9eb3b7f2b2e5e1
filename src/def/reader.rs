// SPDX-License-Identifier: MIT

//! Design file loading and cross-file queries.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use rayon::prelude::*;

use super::chunk::parse_def_chunked;
use super::parser::parse_def;
use super::{DefComponent, DefData};
use crate::error::{Error, Result};
use crate::interner::NameInterner;

/// Holds every loaded design file in load order.
pub struct DefReader {
    names: Arc<NameInterner>,
    files: Vec<(PathBuf, DefData)>,
}

impl DefReader {
    pub fn new(names: Arc<NameInterner>) -> Self {
        Self {
            names,
            files: Vec::new(),
        }
    }

    pub fn names(&self) -> &Arc<NameInterner> {
        &self.names
    }

    /// Load one design file sequentially. Re-reading a path replaces
    /// its previous contents wholesale.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.read_chunked(path, 1)
    }

    /// Load one design file, parsing its sections in `chunks` parallel
    /// pieces. The result is identical to a sequential parse.
    pub fn read_chunked(&mut self, path: impl AsRef<Path>, chunks: usize) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = parse_def_chunked(&text, chunks, &self.names);
        info!(
            "DEF: loaded {} ({} components, {} nets)",
            path.display(),
            data.components.len(),
            data.nets.len()
        );
        self.store(path.to_path_buf(), data);
        Ok(())
    }

    /// Load several design files, one parse task per file. Results
    /// are stored in the order given regardless of which finishes
    /// first. Returns the per-file failures; successfully read files
    /// are kept even when siblings fail.
    pub fn read_files(&mut self, paths: &[PathBuf]) -> Vec<(PathBuf, Error)> {
        let names = &self.names;
        let parsed: Vec<(PathBuf, Result<DefData>)> = paths
            .par_iter()
            .map(|path| {
                let result = fs::read_to_string(path)
                    .map(|text| parse_def(&text, names))
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
                Ok(data) => {
                    info!(
                        "DEF: loaded {} ({} components, {} nets)",
                        path.display(),
                        data.components.len(),
                        data.nets.len()
                    );
                    self.store(path, data);
                }
                Err(err) => failures.push((path, err)),
            }
        }
        failures
    }

    /// Parse already-read text under a synthetic path. Useful for
    /// in-memory designs.
    pub fn read_str(&mut self, path: impl Into<PathBuf>, text: &str) {
        self.store(path.into(), parse_def(text, &self.names));
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&DefData> {
        let path = path.as_ref();
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, data)| data)
    }

    pub fn files(&self) -> &[(PathBuf, DefData)] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All components across the loaded designs, in load order.
    pub fn components(&self) -> impl Iterator<Item = &DefComponent> {
        self.files.iter().flat_map(|(_, data)| &data.components)
    }

    /// Names of design vias that involve `layer`, across all loaded
    /// files.
    pub fn vias_on_layer(&self, layer: &str) -> Vec<String> {
        self.files
            .iter()
            .flat_map(|(_, data)| &data.vias)
            .filter(|via| via.layers.iter().any(|l| l == layer))
            .filter_map(|via| self.names.resolve(via.name).ok())
            .collect()
    }

    fn store(&mut self, path: PathBuf, data: DefData) {
        if let Some(slot) = self.files.iter_mut().find(|(p, _)| *p == path) {
            slot.1 = data;
        } else {
            self.files.push((path, data));
        }
    }
}
