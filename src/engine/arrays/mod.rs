//! Parallel Arrays
//!
//! All component state lives in these parallel arrays.
//! Each array index corresponds to one component.
//!
//! Cells hold either a plain value or a getter. Getters are evaluated on
//! read, so a prop bound to a signal stays connected: reading it from the
//! painter tracks the signal like any other reactive read.
//!
//! # Array Categories
//!
//! - **core**: Component type, parent, visibility, class list, mount time
//! - **visual**: Colors, attributes, border, opacity
//! - **text**: Text content
//! - **sizing**: Width, height, padding, gap, direction

pub mod core;
pub mod sizing;
pub mod text;
pub mod visual;

use std::cell::RefCell;
use std::rc::Rc;

use self::core as core_arrays;
use self::sizing as sizing_arrays;
use self::text as text_arrays;
use self::visual as visual_arrays;

// =============================================================================
// Column - one array of cells
// =============================================================================

enum Cell<T> {
    Value(T),
    Getter(Rc<dyn Fn() -> T>),
}

/// One parallel array. Unset and cleared cells read as the default.
pub struct Column<T: Clone + 'static> {
    default: T,
    cells: RefCell<Vec<Option<Cell<T>>>>,
}

impl<T: Clone + 'static> Column<T> {
    pub fn new(default: T) -> Self {
        Self {
            default,
            cells: RefCell::new(Vec::new()),
        }
    }

    /// Grow so that `index` is addressable.
    pub fn ensure(&self, index: usize) {
        let mut cells = self.cells.borrow_mut();
        if cells.len() <= index {
            cells.resize_with(index + 1, || None);
        }
    }

    /// Read the value at `index`, evaluating getters.
    pub fn get(&self, index: usize) -> T {
        // Clone the getter out so it runs without the borrow held;
        // getters may read other cells of the same column.
        let getter = {
            let cells = self.cells.borrow();
            match cells.get(index) {
                Some(Some(Cell::Value(v))) => return v.clone(),
                Some(Some(Cell::Getter(g))) => g.clone(),
                _ => return self.default.clone(),
            }
        };
        getter()
    }

    pub fn set_value(&self, index: usize, value: T) {
        self.ensure(index);
        self.cells.borrow_mut()[index] = Some(Cell::Value(value));
    }

    pub fn set_getter(&self, index: usize, getter: impl Fn() -> T + 'static) {
        self.ensure(index);
        self.cells.borrow_mut()[index] = Some(Cell::Getter(Rc::new(getter)));
    }

    pub fn clear(&self, index: usize) {
        if let Some(cell) = self.cells.borrow_mut().get_mut(index) {
            *cell = None;
        }
    }

    pub fn clear_all(&self) {
        self.cells.borrow_mut().clear();
    }
}

/// Ensure all arrays have capacity for the given index.
///
/// Called by registry when allocating.
pub fn ensure_all_capacity(index: usize) {
    core_arrays::ensure_capacity(index);
    visual_arrays::ensure_capacity(index);
    text_arrays::ensure_capacity(index);
    sizing_arrays::ensure_capacity(index);
}

/// Clear all array values at an index.
///
/// Called by registry when releasing.
pub fn clear_all_at_index(index: usize) {
    core_arrays::clear_at_index(index);
    visual_arrays::clear_at_index(index);
    text_arrays::clear_at_index(index);
    sizing_arrays::clear_at_index(index);
}

/// Reset all parallel arrays to release memory.
///
/// Called automatically when all components are destroyed.
pub fn reset_all_arrays() {
    core_arrays::reset();
    visual_arrays::reset();
    text_arrays::reset();
    sizing_arrays::reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;

    #[test]
    fn test_column_default_and_set() {
        let col: Column<u16> = Column::new(7);
        assert_eq!(col.get(3), 7);

        col.set_value(3, 42);
        assert_eq!(col.get(3), 42);
        assert_eq!(col.get(2), 7);

        col.clear(3);
        assert_eq!(col.get(3), 7);
    }

    #[test]
    fn test_column_getter_evaluates_on_read() {
        let source = Rc::new(StdCell::new(1u16));
        let source_clone = source.clone();

        let col: Column<u16> = Column::new(0);
        col.set_getter(0, move || source_clone.get() * 10);
        assert_eq!(col.get(0), 10);

        source.set(5);
        assert_eq!(col.get(0), 50);
    }
}
