//! Filter registry: the fixed table of named filters.

use crate::core::error::{FilterError, FilterResult};
use crate::core::filter::{Category, FilterDescriptor};
use indexmap::IndexMap;

/// Registry of available filters, keyed by display name.
///
/// Iteration order is registration order, which is also the order a
/// selection surface lists the filters in.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    /// Filters indexed by their display name.
    filters: IndexMap<String, FilterDescriptor>,
    /// Display names indexed by stable id.
    ids: IndexMap<String, String>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
            ids: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in filters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// The process-wide built-in registry, built on first use and never
    /// mutated afterwards.
    pub fn global() -> &'static Self {
        static REGISTRY: std::sync::OnceLock<FilterRegistry> = std::sync::OnceLock::new();
        REGISTRY.get_or_init(Self::with_builtins)
    }

    /// Register a filter. A later registration under the same name replaces
    /// the earlier one but keeps its position.
    pub fn register(&mut self, descriptor: FilterDescriptor) {
        let name = descriptor.metadata.name.clone();
        let id = descriptor.metadata.id.clone();
        self.ids.insert(id, name.clone());
        self.filters.insert(name, descriptor);
    }

    /// Look up a filter by display name, falling back to its id.
    pub fn lookup(&self, name: &str) -> FilterResult<&FilterDescriptor> {
        self.filters
            .get(name)
            .or_else(|| self.ids.get(name).and_then(|n| self.filters.get(n)))
            .ok_or_else(|| FilterError::UnknownFilter {
                name: name.to_string(),
            })
    }

    /// Check if a filter is registered under this name or id.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Display names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.filters.keys().map(|s| s.as_str()).collect()
    }

    /// The filter a selection surface starts on.
    pub fn default_name(&self) -> Option<&str> {
        self.filters.keys().next().map(|s| s.as_str())
    }

    /// All descriptors in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.filters.values()
    }

    /// Display names of the filters in a category.
    pub fn filters_by_category(&self, category: Category) -> Vec<&str> {
        self.filters
            .values()
            .filter(|d| d.metadata.category == category)
            .map(|d| d.name())
            .collect()
    }

    /// Search filters by id, name or description (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.filters
            .values()
            .filter(|d| {
                let metadata = &d.metadata;
                metadata.name.to_lowercase().contains(&query)
                    || metadata.id.to_lowercase().contains(&query)
                    || metadata.description.to_lowercase().contains(&query)
            })
            .map(|d| d.name())
            .collect()
    }

    /// Get filters grouped by category for listings.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterDescriptor>> {
        let mut grouped: IndexMap<Category, Vec<&FilterDescriptor>> = IndexMap::new();
        for descriptor in self.filters.values() {
            grouped
                .entry(descriptor.metadata.category)
                .or_default()
                .push(descriptor);
        }
        grouped
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
