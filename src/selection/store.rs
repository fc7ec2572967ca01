use crate::dom::ElementRef;
use crate::identity::ElementId;
use indexmap::IndexMap;

/// One selected element
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEntry {
    pub id: ElementId,

    /// Live handle; may have gone stale since selection
    pub element: ElementRef,

    /// Canonical serialization captured when the element was selected
    pub serialization: String,
}

/// Map of identifiers to selected elements
/// Uses IndexMap so reports list entries in selection order
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    entries: IndexMap<ElementId, SelectionEntry>,
}

impl SelectionStore {
    /// Create a new empty SelectionStore
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert an entry, returning the one it replaced
    pub fn add(&mut self, id: ElementId, element: ElementRef, serialization: String) -> Option<SelectionEntry> {
        let entry = SelectionEntry {
            id: id.clone(),
            element,
            serialization,
        };
        self.entries.insert(id, entry)
    }

    /// Remove an entry; absent ids are ignored.
    /// Linear in the selection size, so remaining entries keep selection order.
    pub fn remove(&mut self, id: &ElementId) -> Option<SelectionEntry> {
        self.entries.shift_remove(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: &ElementId) -> Option<&SelectionEntry> {
        self.entries.get(id)
    }

    pub fn has(&self, id: &ElementId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry and hand them back
    pub fn drain(&mut self) -> Vec<SelectionEntry> {
        self.entries.drain(..).map(|(_, entry)| entry).collect()
    }
}
