//! Visual Arrays
//!
//! Colors, text attributes, borders and opacity. Opacity multiplies down the
//! tree at paint time; lazy gates drive theirs through the reveal transition.

use super::Column;
use crate::types::{Attr, BorderStyle, Rgba};

thread_local! {
    static FG_COLOR: Column<Rgba> = Column::new(Rgba::TERMINAL_DEFAULT);
    static BG_COLOR: Column<Rgba> = Column::new(Rgba::TERMINAL_DEFAULT);
    static ATTRS: Column<Attr> = Column::new(Attr::NONE);
    static BORDER: Column<BorderStyle> = Column::new(BorderStyle::None);
    static BORDER_COLOR: Column<Rgba> = Column::new(Rgba::TERMINAL_DEFAULT);
    static OPACITY: Column<f32> = Column::new(1.0);
}

pub fn ensure_capacity(index: usize) {
    FG_COLOR.with(|arr| arr.ensure(index));
    BG_COLOR.with(|arr| arr.ensure(index));
    ATTRS.with(|arr| arr.ensure(index));
    BORDER.with(|arr| arr.ensure(index));
    BORDER_COLOR.with(|arr| arr.ensure(index));
    OPACITY.with(|arr| arr.ensure(index));
}

pub fn clear_at_index(index: usize) {
    FG_COLOR.with(|arr| arr.clear(index));
    BG_COLOR.with(|arr| arr.clear(index));
    ATTRS.with(|arr| arr.clear(index));
    BORDER.with(|arr| arr.clear(index));
    BORDER_COLOR.with(|arr| arr.clear(index));
    OPACITY.with(|arr| arr.clear(index));
}

pub fn reset() {
    FG_COLOR.with(|arr| arr.clear_all());
    BG_COLOR.with(|arr| arr.clear_all());
    ATTRS.with(|arr| arr.clear_all());
    BORDER.with(|arr| arr.clear_all());
    BORDER_COLOR.with(|arr| arr.clear_all());
    OPACITY.with(|arr| arr.clear_all());
}

pub fn get_fg_color(index: usize) -> Rgba {
    FG_COLOR.with(|arr| arr.get(index))
}

pub fn set_fg_color(index: usize, color: Rgba) {
    FG_COLOR.with(|arr| arr.set_value(index, color));
}

pub fn set_fg_color_getter(index: usize, getter: impl Fn() -> Rgba + 'static) {
    FG_COLOR.with(|arr| arr.set_getter(index, getter));
}

pub fn get_bg_color(index: usize) -> Rgba {
    BG_COLOR.with(|arr| arr.get(index))
}

pub fn set_bg_color(index: usize, color: Rgba) {
    BG_COLOR.with(|arr| arr.set_value(index, color));
}

pub fn set_bg_color_getter(index: usize, getter: impl Fn() -> Rgba + 'static) {
    BG_COLOR.with(|arr| arr.set_getter(index, getter));
}

pub fn get_attrs(index: usize) -> Attr {
    ATTRS.with(|arr| arr.get(index))
}

pub fn set_attrs(index: usize, attrs: Attr) {
    ATTRS.with(|arr| arr.set_value(index, attrs));
}

pub fn get_border(index: usize) -> BorderStyle {
    BORDER.with(|arr| arr.get(index))
}

pub fn set_border(index: usize, border: BorderStyle) {
    BORDER.with(|arr| arr.set_value(index, border));
}

pub fn get_border_color(index: usize) -> Rgba {
    BORDER_COLOR.with(|arr| arr.get(index))
}

pub fn set_border_color(index: usize, color: Rgba) {
    BORDER_COLOR.with(|arr| arr.set_value(index, color));
}

pub fn get_opacity(index: usize) -> f32 {
    OPACITY.with(|arr| arr.get(index))
}

pub fn set_opacity(index: usize, opacity: f32) {
    OPACITY.with(|arr| arr.set_value(index, opacity.clamp(0.0, 1.0)));
}
