//! Text Primitive - Display text with styling and wrapping.
//!
//! A pure display component for text content. Cannot have children.
//! Text wraps at word boundaries to the width its parent gives it.
//!
//! # Example
//!
//! ```ignore
//! use folio_tui::primitives::{text, PropValue, TextProps};
//! use spark_signals::signal;
//!
//! let status = signal(String::from("Send Message"));
//! let status_for_text = status.clone();
//! text(TextProps {
//!     content: PropValue::Getter(Rc::new(move || format!("[ {} ]", status_for_text.get()))),
//!     attrs: Some(Attr::BOLD),
//!     ..Default::default()
//! });
//!
//! status.set("Sending...".into());
//! ```

use crate::engine::arrays::{core, text as text_arrays, visual};
use crate::engine::{allocate_index, get_current_parent_index, release_index};
use crate::pipeline::clock;
use crate::types::ComponentType;

use super::types::{Cleanup, TextProps};

/// Create a text display component.
///
/// Returns a cleanup function that releases resources when called.
pub fn text(props: TextProps) -> Cleanup {
    let index = allocate_index(props.id.as_deref());

    core::set_component_type(index, ComponentType::Text);
    if let Some(parent) = get_current_parent_index() {
        core::set_parent_index(index, Some(parent));
    }
    core::set_mounted_at(index, clock::now());

    if let Some(visible) = props.visible {
        visible.bind(index, core::set_visible, |i, g| {
            core::set_visible_getter(i, move || g())
        });
    }
    if let Some(class) = props.class {
        class.bind(index, core::set_class_list, |i, g| {
            core::set_class_list_getter(i, move || g())
        });
    }

    props.content.bind(index, text_arrays::set_text_content, |i, g| {
        text_arrays::set_text_content_getter(i, move || g())
    });

    if let Some(fg) = props.fg {
        fg.bind(index, visual::set_fg_color, |i, g| {
            visual::set_fg_color_getter(i, move || g())
        });
    }
    if let Some(attrs) = props.attrs {
        visual::set_attrs(index, attrs);
    }
    if let Some(align) = props.align {
        text_arrays::set_text_align(index, align);
    }

    Box::new(move || {
        release_index(index);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::primitives::PropValue;
    use crate::types::{Attr, Rgba, TextAlign};
    use spark_signals::signal;
    use std::rc::Rc;

    fn setup() {
        reset_registry();
    }

    #[test]
    fn test_text_creation() {
        setup();

        let cleanup = text(TextProps {
            content: "Hello, World!".into(),
            attrs: Some(Attr::BOLD),
            fg: Some(Rgba::ORCHID.into()),
            ..Default::default()
        });

        assert_eq!(core::get_component_type(0), ComponentType::Text);
        assert_eq!(text_arrays::get_text_content(0), "Hello, World!");
        assert_eq!(visual::get_attrs(0), Attr::BOLD);
        assert_eq!(visual::get_fg_color(0), Rgba::ORCHID);

        cleanup();
        assert_eq!(text_arrays::get_text_content(0), "");
    }

    #[test]
    fn test_text_alignment() {
        setup();

        let _cleanup = text(TextProps {
            content: "Skills".into(),
            align: Some(TextAlign::Center),
            ..Default::default()
        });
        assert_eq!(text_arrays::get_text_align(0), TextAlign::Center);
    }

    #[test]
    fn test_text_reactive_content() {
        setup();

        let count = signal(0);
        let count_for_text = count.clone();
        let _cleanup = text(TextProps {
            content: PropValue::Getter(Rc::new(move || format!("Count: {}", count_for_text.get()))),
            ..Default::default()
        });

        assert_eq!(text_arrays::get_text_content(0), "Count: 0");
        count.set(42);
        assert_eq!(text_arrays::get_text_content(0), "Count: 42");
    }

    #[test]
    fn test_text_signal_content() {
        setup();

        let content = signal(String::from("before"));
        let _cleanup = text(TextProps {
            content: content.clone().into(),
            ..Default::default()
        });

        content.set("after".into());
        assert_eq!(text_arrays::get_text_content(0), "after");
    }
}
