use shared::ShapeId;

/// Shape selection state (supports multi-select)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Selected shape IDs (in order of selection, no duplicates)
    selected: Vec<ShapeId>,
}

impl SelectionState {
    /// Primary (first) selected shape
    pub fn primary(&self) -> Option<&ShapeId> {
        self.selected.first()
    }

    /// All selected shapes
    pub fn all(&self) -> &[ShapeId] {
        &self.selected
    }

    /// Check if a shape is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Select a single shape (clears previous selection)
    pub fn select(&mut self, id: ShapeId) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Toggle selection (Ctrl+click behavior)
    pub fn toggle(&mut self, id: ShapeId) {
        if let Some(pos) = self.selected.iter().position(|s| s == &id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// Click behavior: multi toggles membership, plain click collapses to `id`
    pub fn click(&mut self, id: ShapeId, multi: bool) {
        if multi {
            self.toggle(id);
        } else {
            self.select(id);
        }
    }

    /// Replace the selection, keeping first occurrence order
    pub fn set<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ShapeId>,
    {
        self.selected.clear();
        for id in ids {
            if !self.is_selected(&id) {
                self.selected.push(id);
            }
        }
    }

    /// Clear all selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Number of selected shapes
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
