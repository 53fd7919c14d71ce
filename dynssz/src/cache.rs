use crate::{Error, SizeHint, TypeSize};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Whether the fixed-layout codec of a type may be used under the active spec values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCapability {
    /// Not classified yet.
    Unknown,
    /// No part of the layout depends on a spec value; the fixed codec produces the same bytes.
    FixedLayout,
    /// Some field is sized from a spec value; only the generic path is correct.
    SpecDependent,
    /// The fixed codec declares a different layout than the field annotations describe.
    CodecMismatch,
}

/// Per-context memo of work that only depends on the type and the spec values.
///
/// Entries are computed outside of the locks (classification recurses into nested types) and
/// inserted with first-writer-wins, so a cached entry never changes.
#[derive(Debug, Default)]
pub(crate) struct TypeCache {
    capabilities: RwLock<HashMap<TypeId, TypeCapability>>,
    field_hints: RwLock<HashMap<TypeId, Arc<[Vec<SizeHint>]>>>,
    static_sizes: RwLock<HashMap<TypeId, TypeSize>>,
}

impl TypeCache {
    pub fn capability(&self, id: TypeId) -> TypeCapability {
        self.capabilities
            .read()
            .get(&id)
            .copied()
            .unwrap_or(TypeCapability::Unknown)
    }

    pub fn capability_or_classify<F>(&self, id: TypeId, classify: F) -> Result<TypeCapability, Error>
    where
        F: FnOnce() -> Result<TypeCapability, Error>,
    {
        let cached = self.capabilities.read().get(&id).copied();
        if let Some(capability) = cached {
            return Ok(capability);
        }
        let capability = classify()?;
        Ok(*self.capabilities.write().entry(id).or_insert(capability))
    }

    pub fn field_hints_or_parse<F>(&self, id: TypeId, parse: F) -> Result<Arc<[Vec<SizeHint>]>, Error>
    where
        F: FnOnce() -> Result<Vec<Vec<SizeHint>>, Error>,
    {
        let cached = self.field_hints.read().get(&id).cloned();
        if let Some(hints) = cached {
            return Ok(hints);
        }
        let hints: Arc<[Vec<SizeHint>]> = parse()?.into();
        Ok(self
            .field_hints
            .write()
            .entry(id)
            .or_insert(hints)
            .clone())
    }

    pub fn static_size_or_compute<F>(&self, id: TypeId, compute: F) -> Result<TypeSize, Error>
    where
        F: FnOnce() -> Result<TypeSize, Error>,
    {
        let cached = self.static_sizes.read().get(&id).copied();
        if let Some(size) = cached {
            return Ok(size);
        }
        let size = compute()?;
        Ok(*self.static_sizes.write().entry(id).or_insert(size))
    }
}
