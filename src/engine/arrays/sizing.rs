//! Sizing Arrays
//!
//! Layout inputs read by the Taffy bridge: explicit width/height, minimum
//! height, padding, gap between children and main axis direction.

use super::Column;
use crate::types::{Dimension, FlexDirection};

thread_local! {
    static WIDTH: Column<Dimension> = Column::new(Dimension::Auto);
    static HEIGHT: Column<Dimension> = Column::new(Dimension::Auto);
    static MIN_HEIGHT: Column<Dimension> = Column::new(Dimension::Auto);
    static PADDING: Column<u16> = Column::new(0);
    static GAP: Column<u16> = Column::new(0);
    static DIRECTION: Column<FlexDirection> = Column::new(FlexDirection::Column);
}

pub fn ensure_capacity(index: usize) {
    WIDTH.with(|arr| arr.ensure(index));
    HEIGHT.with(|arr| arr.ensure(index));
    MIN_HEIGHT.with(|arr| arr.ensure(index));
    PADDING.with(|arr| arr.ensure(index));
    GAP.with(|arr| arr.ensure(index));
    DIRECTION.with(|arr| arr.ensure(index));
}

pub fn clear_at_index(index: usize) {
    WIDTH.with(|arr| arr.clear(index));
    HEIGHT.with(|arr| arr.clear(index));
    MIN_HEIGHT.with(|arr| arr.clear(index));
    PADDING.with(|arr| arr.clear(index));
    GAP.with(|arr| arr.clear(index));
    DIRECTION.with(|arr| arr.clear(index));
}

pub fn reset() {
    WIDTH.with(|arr| arr.clear_all());
    HEIGHT.with(|arr| arr.clear_all());
    MIN_HEIGHT.with(|arr| arr.clear_all());
    PADDING.with(|arr| arr.clear_all());
    GAP.with(|arr| arr.clear_all());
    DIRECTION.with(|arr| arr.clear_all());
}

pub fn get_width(index: usize) -> Dimension {
    WIDTH.with(|arr| arr.get(index))
}

pub fn set_width(index: usize, value: Dimension) {
    WIDTH.with(|arr| arr.set_value(index, value));
}

pub fn set_width_getter(index: usize, getter: impl Fn() -> Dimension + 'static) {
    WIDTH.with(|arr| arr.set_getter(index, getter));
}

pub fn get_height(index: usize) -> Dimension {
    HEIGHT.with(|arr| arr.get(index))
}

pub fn set_height(index: usize, value: Dimension) {
    HEIGHT.with(|arr| arr.set_value(index, value));
}

pub fn set_height_getter(index: usize, getter: impl Fn() -> Dimension + 'static) {
    HEIGHT.with(|arr| arr.set_getter(index, getter));
}

pub fn get_min_height(index: usize) -> Dimension {
    MIN_HEIGHT.with(|arr| arr.get(index))
}

pub fn set_min_height(index: usize, value: Dimension) {
    MIN_HEIGHT.with(|arr| arr.set_value(index, value));
}

pub fn set_min_height_getter(index: usize, getter: impl Fn() -> Dimension + 'static) {
    MIN_HEIGHT.with(|arr| arr.set_getter(index, getter));
}

pub fn get_padding(index: usize) -> u16 {
    PADDING.with(|arr| arr.get(index))
}

pub fn set_padding(index: usize, value: u16) {
    PADDING.with(|arr| arr.set_value(index, value));
}

pub fn get_gap(index: usize) -> u16 {
    GAP.with(|arr| arr.get(index))
}

pub fn set_gap(index: usize, value: u16) {
    GAP.with(|arr| arr.set_value(index, value));
}

pub fn get_direction(index: usize) -> FlexDirection {
    DIRECTION.with(|arr| arr.get(index))
}

pub fn set_direction(index: usize, value: FlexDirection) {
    DIRECTION.with(|arr| arr.set_value(index, value));
}
