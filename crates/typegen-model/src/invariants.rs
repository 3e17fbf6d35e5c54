//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::declare::{Builder, DeclId, Declaration, InterfaceDeclaration};

impl Builder {
    pub(crate) fn ensure_interface_mut(&mut self, id: DeclId) -> &mut InterfaceDeclaration {
        match self.declaration_mut(id) {
            Some(Declaration::Interface(d)) => d,
            Some(Declaration::TypeAlias(d)) => panic!(
                "Builder: declaration `{}` is an alias \
                 (only struct types are registered as interfaces)",
                d.identifier
            ),
            None => panic!(
                "Builder: declaration #{} not found (ids must come from the same builder)",
                id.index()
            ),
        }
    }
}
