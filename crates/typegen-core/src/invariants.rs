//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{TypeDescriptor, TypeId, TypeTable};

impl TypeTable {
    pub(crate) fn ensure_descriptor(&self, id: TypeId) -> &TypeDescriptor {
        self.get(id).unwrap_or_else(|| {
            panic!(
                "TypeTable: type id {} not found \
                 (ids must come from the table they are used with)",
                id.as_u32()
            )
        })
    }

    pub(crate) fn ensure_named_slot(&mut self, id: TypeId) -> &mut TypeDescriptor {
        let descriptor = self.get_mut(id).unwrap_or_else(|| {
            panic!(
                "TypeTable: type id {} not found \
                 (ids must come from the table they are used with)",
                id.as_u32()
            )
        });
        assert!(
            descriptor.named.is_some(),
            "TypeTable: type id {} is unnamed and cannot be redefined",
            id.as_u32()
        );
        descriptor
    }
}
