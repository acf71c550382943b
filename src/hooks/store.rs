//! Type-identity keyed registry store.

use super::registry::HookRegistry;
use crate::command::Command;
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Map from command type to its shared [`HookRegistry`].
///
/// This is the explicit class-identity keyed store: build registries at
/// startup, insert them here, and hand dispatchers read-only `Arc`
/// views instead of relying on an ambient global mutable map.
#[derive(Default)]
pub struct RegistryStore {
    registries: HashMap<TypeId, std::sync::Arc<dyn Any + Send + Sync>>,
}

impl RegistryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the registry for command type `C`.
    pub fn insert<C: Command>(&mut self, registry: std::sync::Arc<HookRegistry<C>>) {
        self.registries.insert(TypeId::of::<C>(), registry);
    }

    /// Fetch the registry for command type `C`, if one was inserted.
    pub fn get<C: Command>(&self) -> Option<std::sync::Arc<HookRegistry<C>>> {
        self.registries
            .get(&TypeId::of::<C>())
            .and_then(|any| std::sync::Arc::clone(any).downcast::<HookRegistry<C>>().ok())
    }

    /// Whether a registry for command type `C` is present.
    pub fn contains<C: Command>(&self) -> bool {
        self.registries.contains_key(&TypeId::of::<C>())
    }

    /// Number of stored registries.
    pub fn len(&self) -> usize {
        self.registries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}

impl std::fmt::Debug for RegistryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryStore")
            .field("registries", &self.registries.len())
            .finish()
    }
}
