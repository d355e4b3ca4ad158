//! Core Arrays
//!
//! - componentType: What kind of component lives at the index
//! - parentIndex: Parent component (None = root)
//! - visible: Whether the component takes part in layout and paint
//! - classList: Space-separated style hooks, matched against active style sheets
//! - mountedAt: Frame clock time at creation, the zero point of its animations

use std::time::Duration;

use super::Column;
use crate::types::ComponentType;

thread_local! {
    static COMPONENT_TYPE: Column<ComponentType> = Column::new(ComponentType::None);
    static PARENT_INDEX: Column<Option<usize>> = Column::new(None);
    static VISIBLE: Column<bool> = Column::new(true);
    static CLASS_LIST: Column<String> = Column::new(String::new());
    static MOUNTED_AT: Column<Duration> = Column::new(Duration::ZERO);
}

pub fn ensure_capacity(index: usize) {
    COMPONENT_TYPE.with(|arr| arr.ensure(index));
    PARENT_INDEX.with(|arr| arr.ensure(index));
    VISIBLE.with(|arr| arr.ensure(index));
    CLASS_LIST.with(|arr| arr.ensure(index));
    MOUNTED_AT.with(|arr| arr.ensure(index));
}

pub fn clear_at_index(index: usize) {
    COMPONENT_TYPE.with(|arr| arr.clear(index));
    PARENT_INDEX.with(|arr| arr.clear(index));
    VISIBLE.with(|arr| arr.clear(index));
    CLASS_LIST.with(|arr| arr.clear(index));
    MOUNTED_AT.with(|arr| arr.clear(index));
}

pub fn reset() {
    COMPONENT_TYPE.with(|arr| arr.clear_all());
    PARENT_INDEX.with(|arr| arr.clear_all());
    VISIBLE.with(|arr| arr.clear_all());
    CLASS_LIST.with(|arr| arr.clear_all());
    MOUNTED_AT.with(|arr| arr.clear_all());
}

// =============================================================================
// Accessors
// =============================================================================

pub fn get_component_type(index: usize) -> ComponentType {
    COMPONENT_TYPE.with(|arr| arr.get(index))
}

pub fn set_component_type(index: usize, value: ComponentType) {
    COMPONENT_TYPE.with(|arr| arr.set_value(index, value));
}

pub fn get_parent_index(index: usize) -> Option<usize> {
    PARENT_INDEX.with(|arr| arr.get(index))
}

pub fn set_parent_index(index: usize, parent: Option<usize>) {
    PARENT_INDEX.with(|arr| arr.set_value(index, parent));
}

pub fn get_visible(index: usize) -> bool {
    VISIBLE.with(|arr| arr.get(index))
}

pub fn set_visible(index: usize, value: bool) {
    VISIBLE.with(|arr| arr.set_value(index, value));
}

pub fn set_visible_getter(index: usize, getter: impl Fn() -> bool + 'static) {
    VISIBLE.with(|arr| arr.set_getter(index, getter));
}

pub fn get_class_list(index: usize) -> String {
    CLASS_LIST.with(|arr| arr.get(index))
}

pub fn set_class_list(index: usize, classes: String) {
    CLASS_LIST.with(|arr| arr.set_value(index, classes));
}

pub fn set_class_list_getter(index: usize, getter: impl Fn() -> String + 'static) {
    CLASS_LIST.with(|arr| arr.set_getter(index, getter));
}

pub fn get_mounted_at(index: usize) -> Duration {
    MOUNTED_AT.with(|arr| arr.get(index))
}

pub fn set_mounted_at(index: usize, at: Duration) {
    MOUNTED_AT.with(|arr| arr.set_value(index, at));
}
