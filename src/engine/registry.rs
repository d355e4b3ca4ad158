//! Component Registry - Index allocation for parallel arrays.
//!
//! Manages the lifecycle of component indices:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - Creation order, which is sibling order for layout and paint
//! - Parent context stack for nested component creation
//! - Destroy callbacks, the hook lazy gates, canvases and sections use
//!   for teardown
//!
//! Callbacks run with no registry borrow held, so they may release or
//! allocate other components.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::arrays;

type DestroyCallback = Box<dyn FnOnce()>;

// =============================================================================
// Registry State
// =============================================================================

#[derive(Default)]
struct Registry {
    id_to_index: HashMap<String, usize>,
    index_to_id: HashMap<usize, String>,
    /// Allocated indices, ascending.
    allocated: BTreeSet<usize>,
    free: Vec<usize>,
    next_index: usize,
    /// Creation sequence per index.
    created: HashMap<usize, u64>,
    next_seq: u64,
    /// Counter for generated ids (`c0`, `c1`, ...).
    next_id: usize,
    parents: Vec<usize>,
    on_destroy: HashMap<usize, Vec<DestroyCallback>>,
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

fn with_registry<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    REGISTRY.with(|registry| f(&mut registry.borrow_mut()))
}

// =============================================================================
// Parent Context Stack
// =============================================================================

/// Index new components attach to, None at the document root.
pub fn get_current_parent_index() -> Option<usize> {
    with_registry(|r| r.parents.last().copied())
}

pub fn push_parent_context(index: usize) {
    with_registry(|r| r.parents.push(index));
}

pub fn pop_parent_context() {
    with_registry(|r| {
        r.parents.pop();
    });
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new component.
///
/// An `id` that is already allocated returns its existing index; without
/// one, a `c<N>` id is generated.
pub fn allocate_index(id: Option<&str>) -> usize {
    let (index, fresh) = with_registry(|r| {
        let id = match id {
            Some(id) => id.to_string(),
            None => {
                let generated = format!("c{}", r.next_id);
                r.next_id += 1;
                generated
            }
        };
        if let Some(&existing) = r.id_to_index.get(&id) {
            return (existing, false);
        }

        let index = r.free.pop().unwrap_or_else(|| {
            r.next_index += 1;
            r.next_index - 1
        });
        r.id_to_index.insert(id.clone(), index);
        r.index_to_id.insert(index, id);
        r.allocated.insert(index);
        r.created.insert(index, r.next_seq);
        r.next_seq += 1;
        (index, true)
    });

    if fresh {
        arrays::ensure_all_capacity(index);
    }
    index
}

/// Release an index and, first, every component parented to it.
///
/// Children are released depth-first, then the index's destroy callbacks
/// run, then its array slots are cleared. Releasing an index that is not
/// allocated does nothing.
pub fn release_index(index: usize) {
    if !is_allocated(index) {
        return;
    }

    for child in get_children(index) {
        release_index(child);
    }

    let callbacks = with_registry(|r| r.on_destroy.remove(&index));
    for callback in callbacks.into_iter().flatten() {
        callback();
    }

    // A callback may have released this index already
    let emptied = with_registry(|r| {
        if !r.allocated.remove(&index) {
            return None;
        }
        if let Some(id) = r.index_to_id.remove(&index) {
            r.id_to_index.remove(&id);
        }
        r.created.remove(&index);
        r.free.push(index);
        Some(r.allocated.is_empty())
    });
    let Some(emptied) = emptied else { return };

    arrays::clear_all_at_index(index);

    // Last component gone: start over with compact arrays
    if emptied {
        arrays::reset_all_arrays();
        with_registry(|r| {
            r.free.clear();
            r.next_index = 0;
        });
    }
}

/// `base` when no component holds it, otherwise the first free `base-N`
/// (N from 2). Gives repeated instances of a component their own index.
pub fn unique_id(base: &str) -> String {
    with_registry(|r| {
        if !r.id_to_index.contains_key(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|id| !r.id_to_index.contains_key(id))
            .unwrap_or_else(|| base.to_string())
    })
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the component at `index` is released,
/// directly or together with an ancestor.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    with_registry(|r| r.on_destroy.entry(index).or_default().push(Box::new(callback)));
}

// =============================================================================
// Lookups
// =============================================================================

pub fn get_index(id: &str) -> Option<usize> {
    with_registry(|r| r.id_to_index.get(id).copied())
}

pub fn get_id(index: usize) -> Option<String> {
    with_registry(|r| r.index_to_id.get(&index).cloned())
}

/// All allocated indices, ascending.
pub fn get_allocated_indices() -> Vec<usize> {
    with_registry(|r| r.allocated.iter().copied().collect())
}

/// All allocated indices, oldest first.
pub fn get_indices_in_creation_order() -> Vec<usize> {
    with_registry(|r| {
        let by_seq: BTreeMap<u64, usize> = r
            .allocated
            .iter()
            .filter_map(|&index| r.created.get(&index).map(|&seq| (seq, index)))
            .collect();
        by_seq.into_values().collect()
    })
}

pub fn is_allocated(index: usize) -> bool {
    with_registry(|r| r.allocated.contains(&index))
}

/// Allocated components whose parent is `index`, ascending.
pub fn get_children(index: usize) -> Vec<usize> {
    let allocated = get_allocated_indices();
    allocated
        .into_iter()
        .filter(|&child| arrays::core::get_parent_index(child) == Some(index))
        .collect()
}

pub fn get_allocated_count() -> usize {
    with_registry(|r| r.allocated.len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Forget every component without running destroy callbacks.
pub fn reset_registry() {
    let dropped = REGISTRY.with(|registry| std::mem::take(&mut *registry.borrow_mut()));
    // Dropping callbacks may release style guards; do it unborrowed
    drop(dropped);
    arrays::reset_all_arrays();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_allocate_index() {
        reset_registry();

        let section = allocate_index(Some("section-about"));
        let title = allocate_index(None);
        let body = allocate_index(None);

        assert_eq!((section, title, body), (0, 1, 2));
        assert!(is_allocated(title));
        assert!(!is_allocated(3));
        assert_eq!(get_id(title).as_deref(), Some("c0"));
        assert_eq!(get_allocated_count(), 3);
    }

    #[test]
    fn test_same_id_returns_same_index() {
        reset_registry();

        let first = allocate_index(Some("hero"));
        let again = allocate_index(Some("hero"));
        assert_eq!(first, again);
        assert_eq!(get_allocated_count(), 1);
        assert_eq!(get_index("hero"), Some(first));
    }

    #[test]
    fn test_unique_id_skips_taken_ids() {
        reset_registry();

        assert_eq!(unique_id("section-skills"), "section-skills");
        allocate_index(Some("section-skills"));
        assert_eq!(unique_id("section-skills"), "section-skills-2");
        let second = allocate_index(Some("section-skills-2"));
        assert_eq!(unique_id("section-skills"), "section-skills-3");

        release_index(second);
        assert_eq!(unique_id("section-skills"), "section-skills-2");
    }

    #[test]
    fn test_release_and_reuse() {
        reset_registry();

        let a = allocate_index(None);
        let b = allocate_index(None);

        release_index(a);
        assert!(!is_allocated(a));
        assert!(is_allocated(b));
        assert_eq!(allocate_index(None), a);
    }

    #[test]
    fn test_parent_context() {
        reset_registry();

        assert_eq!(get_current_parent_index(), None);
        push_parent_context(5);
        push_parent_context(10);
        assert_eq!(get_current_parent_index(), Some(10));
        pop_parent_context();
        assert_eq!(get_current_parent_index(), Some(5));
        pop_parent_context();
        assert_eq!(get_current_parent_index(), None);
    }

    #[test]
    fn test_release_parent_releases_children_first() {
        reset_registry();

        let order: Rc<std::cell::RefCell<Vec<&'static str>>> = Rc::default();

        let placeholder = allocate_index(None);
        let section = allocate_index(None);
        arrays::core::set_parent_index(section, Some(placeholder));

        let sink = order.clone();
        on_destroy(section, move || sink.borrow_mut().push("section"));
        let sink = order.clone();
        on_destroy(placeholder, move || sink.borrow_mut().push("placeholder"));

        assert_eq!(get_children(placeholder), vec![section]);

        release_index(placeholder);
        assert_eq!(order.borrow().as_slice(), &["section", "placeholder"]);
        assert_eq!(get_allocated_count(), 0);
    }

    #[test]
    fn test_callback_may_release_its_own_index() {
        reset_registry();

        let keep = allocate_index(None);
        let target = allocate_index(None);
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        on_destroy(target, move || {
            seen.set(seen.get() + 1);
            release_index(target);
        });

        release_index(target);
        assert_eq!(calls.get(), 1);
        assert!(is_allocated(keep));

        // Freed once: two new components get two distinct indices
        let a = allocate_index(None);
        let b = allocate_index(None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_creation_order_survives_index_reuse() {
        reset_registry();

        let a = allocate_index(None);
        let b = allocate_index(None);
        release_index(a);
        let c = allocate_index(None); // reuses a's slot

        assert_eq!(c, a);
        assert_eq!(get_indices_in_creation_order(), vec![b, c]);
    }

    #[test]
    fn test_release_unknown_index_is_noop() {
        reset_registry();

        let idx = allocate_index(None);
        release_index(idx);
        release_index(idx);
        assert_eq!(get_allocated_count(), 0);
    }
}
