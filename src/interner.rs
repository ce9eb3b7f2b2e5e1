// SPDX-License-Identifier: MIT

//! Name interning.
//!
//! Designs repeat the same identifier strings millions of times
//! (instance names, cell names, net names). The interner maps each
//! distinct string to a small integer id so the rest of the model can
//! store and compare `NameId`s instead of owned strings.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque identifier for an interned name.
///
/// Two ids are equal if and only if the strings they were issued for
/// are byte-identical. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameId(u32);

impl NameId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Tables {
    ids: HashMap<Arc<str>, NameId>,
    names: Vec<Arc<str>>,
}

/// Thread-safe string-to-id table, shared by every parser.
///
/// All parse workers intern through the same instance, so the check
/// and the insert happen atomically under the write lock: concurrent
/// interns of the same string always observe a single id.
#[derive(Debug, Default)]
pub struct NameInterner {
    tables: RwLock<Tables>,
}

impl NameInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning its id. Idempotent: the same string
    /// always yields the same id, no matter which thread asks first.
    pub fn intern(&self, name: &str) -> NameId {
        // Fast path: already present, shared read lock only.
        {
            let tables = self.tables.read().expect("interner lock poisoned");
            if let Some(&id) = tables.ids.get(name) {
                return id;
            }
        }

        let mut tables = self.tables.write().expect("interner lock poisoned");
        // Re-check under the write lock: another thread may have
        // inserted between our read and write acquisition.
        if let Some(&id) = tables.ids.get(name) {
            return id;
        }
        let id = NameId(tables.names.len() as u32);
        let stored: Arc<str> = Arc::from(name);
        tables.names.push(stored.clone());
        tables.ids.insert(stored, id);
        id
    }

    /// Look up the string for an id issued earlier.
    pub fn resolve(&self, id: NameId) -> Result<String> {
        let tables = self.tables.read().expect("interner lock poisoned");
        tables
            .names
            .get(id.0 as usize)
            .map(|s| s.to_string())
            .ok_or(Error::NameNotFound(id))
    }

    /// Id for `name` if it has been interned, without inserting.
    pub fn get(&self, name: &str) -> Option<NameId> {
        let tables = self.tables.read().expect("interner lock poisoned");
        tables.ids.get(name).copied()
    }

    /// Number of distinct names interned so far.
    pub fn len(&self) -> usize {
        let tables = self.tables.read().expect("interner lock poisoned");
        tables.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_intern_is_idempotent() {
        let interner = NameInterner::new();
        let a = interner.intern("u_core/u_alu/inst_42");
        let b = interner.intern("u_core/u_alu/inst_42");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_distinct_strings_distinct_ids() {
        let interner = NameInterner::new();
        let a = interner.intern("NET_A");
        let b = interner.intern("NET_B");
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_round_trip() {
        let interner = NameInterner::new();
        let id = interner.intern("sky130_fd_sc_hd__inv_1");
        assert_eq!(interner.resolve(id).unwrap(), "sky130_fd_sc_hd__inv_1");
    }

    #[test]
    fn test_resolve_unissued_id_fails() {
        let interner = NameInterner::new();
        let id = interner.intern("only");
        drop(id);
        let bogus: NameId = NameId(999);
        assert!(matches!(
            interner.resolve(bogus),
            Err(Error::NameNotFound(_))
        ));
    }

    #[test]
    fn test_get_does_not_insert() {
        let interner = NameInterner::new();
        assert_eq!(interner.get("missing"), None);
        assert!(interner.is_empty());
    }

    #[test]
    fn test_concurrent_intern_single_id() {
        let interner = Arc::new(NameInterner::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let interner = Arc::clone(&interner);
            handles.push(thread::spawn(move || {
                let mut ids = Vec::new();
                for i in 0..200 {
                    ids.push(interner.intern(&format!("inst_{}", i % 50)));
                }
                ids
            }));
        }
        let results: Vec<Vec<NameId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        // Only 50 distinct strings were ever interned.
        assert_eq!(interner.len(), 50);
        // Every thread saw the same id for the same string.
        for ids in &results {
            assert_eq!(ids[0], results[0][0]);
        }
    }
}
