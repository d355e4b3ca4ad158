//! Text Arrays
//!
//! What a text component says and how its wrapped lines sit in its box.
//! Content is usually a getter over a signal (form fields, status line),
//! so it is re-read on every layout and paint.

use super::Column;
use crate::types::TextAlign;

thread_local! {
    static CONTENT: Column<String> = Column::new(String::new());
    static ALIGN: Column<TextAlign> = Column::new(TextAlign::Left);
}

pub fn ensure_capacity(index: usize) {
    CONTENT.with(|arr| arr.ensure(index));
    ALIGN.with(|arr| arr.ensure(index));
}

pub fn clear_at_index(index: usize) {
    CONTENT.with(|arr| arr.clear(index));
    ALIGN.with(|arr| arr.clear(index));
}

pub fn reset() {
    CONTENT.with(|arr| arr.clear_all());
    ALIGN.with(|arr| arr.clear_all());
}

pub fn get_text_content(index: usize) -> String {
    CONTENT.with(|arr| arr.get(index))
}

pub fn set_text_content(index: usize, content: String) {
    CONTENT.with(|arr| arr.set_value(index, content));
}

pub fn set_text_content_getter(index: usize, getter: impl Fn() -> String + 'static) {
    CONTENT.with(|arr| arr.set_getter(index, getter));
}

pub fn get_text_align(index: usize) -> TextAlign {
    ALIGN.with(|arr| arr.get(index))
}

pub fn set_text_align(index: usize, align: TextAlign) {
    ALIGN.with(|arr| arr.set_value(index, align));
}
