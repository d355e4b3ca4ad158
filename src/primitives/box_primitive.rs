//! Box Primitive - Container component with flexbox layout.
//!
//! The fundamental container component. Can have children, borders and
//! backgrounds, and takes part in style-sheet animations through its classes.
//!
//! # Example
//!
//! ```ignore
//! use folio_tui::primitives::{box_primitive, text, BoxProps, TextProps};
//! use spark_signals::signal;
//!
//! let height = signal(Dimension::Cells(4));
//!
//! let cleanup = box_primitive(BoxProps {
//!     height: Some(height.clone().into()),
//!     border: Some(BorderStyle::Single),
//!     children: Some(Box::new(|| {
//!         text(TextProps {
//!             content: "Hello!".into(),
//!             ..Default::default()
//!         });
//!     })),
//!     ..Default::default()
//! });
//!
//! // Update height - the next layout pass picks it up
//! height.set(Dimension::Cells(8));
//! ```

use crate::engine::arrays::{core, sizing, visual};
use crate::engine::{
    allocate_index, get_current_parent_index, pop_parent_context, push_parent_context,
    release_index,
};
use crate::pipeline::clock;
use crate::types::ComponentType;

use super::types::{BoxProps, Cleanup};

/// Create a box container component.
///
/// Returns a cleanup function that releases the box and its whole subtree.
pub fn box_primitive(props: BoxProps) -> Cleanup {
    // 1. ALLOCATE INDEX
    let index = allocate_index(props.id.as_deref());

    // 2. CORE SETUP - Type, parent, mount time
    core::set_component_type(index, ComponentType::Box);
    if let Some(parent) = get_current_parent_index() {
        core::set_parent_index(index, Some(parent));
    }
    core::set_mounted_at(index, clock::now());

    // 3. BIND VISIBILITY AND CLASSES
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

    // 4. BIND SIZING
    if let Some(direction) = props.direction {
        sizing::set_direction(index, direction);
    }
    if let Some(width) = props.width {
        width.bind(index, sizing::set_width, |i, g| {
            sizing::set_width_getter(i, move || g())
        });
    }
    if let Some(height) = props.height {
        height.bind(index, sizing::set_height, |i, g| {
            sizing::set_height_getter(i, move || g())
        });
    }
    if let Some(min_height) = props.min_height {
        min_height.bind(index, sizing::set_min_height, |i, g| {
            sizing::set_min_height_getter(i, move || g())
        });
    }
    if let Some(padding) = props.padding {
        sizing::set_padding(index, padding);
    }
    if let Some(gap) = props.gap {
        sizing::set_gap(index, gap);
    }

    // 5. BIND VISUAL ARRAYS
    if let Some(border) = props.border {
        visual::set_border(index, border);
    }
    if let Some(border_color) = props.border_color {
        visual::set_border_color(index, border_color);
    }
    if let Some(fg) = props.fg {
        fg.bind(index, visual::set_fg_color, |i, g| {
            visual::set_fg_color_getter(i, move || g())
        });
    }
    if let Some(bg) = props.bg {
        bg.bind(index, visual::set_bg_color, |i, g| {
            visual::set_bg_color_getter(i, move || g())
        });
    }
    if let Some(opacity) = props.opacity {
        visual::set_opacity(index, opacity);
    }

    // 6. RENDER CHILDREN
    if let Some(children) = props.children {
        push_parent_context(index);
        children();
        pop_parent_context();
    }

    // 7. RETURN CLEANUP
    Box::new(move || {
        release_index(index);
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{is_allocated, reset_registry};
    use crate::primitives::PropValue;
    use crate::types::{BorderStyle, Dimension};
    use spark_signals::signal;

    fn setup() {
        reset_registry();
    }

    #[test]
    fn test_box_creation() {
        setup();

        let cleanup = box_primitive(BoxProps {
            width: Some(PropValue::Static(Dimension::Cells(50))),
            height: Some(PropValue::Static(Dimension::Cells(20))),
            ..Default::default()
        });

        assert_eq!(core::get_component_type(0), ComponentType::Box);
        assert_eq!(sizing::get_width(0), Dimension::Cells(50));

        cleanup();
        assert_eq!(core::get_component_type(0), ComponentType::None);
    }

    #[test]
    fn test_box_with_children() {
        setup();

        let cleanup = box_primitive(BoxProps {
            children: Some(Box::new(|| {
                box_primitive(BoxProps::default());
            })),
            ..Default::default()
        });

        // Parent should be index 0, child should be index 1
        assert_eq!(core::get_component_type(1), ComponentType::Box);
        assert_eq!(core::get_parent_index(1), Some(0));

        // Releasing the parent takes the child with it
        cleanup();
        assert!(!is_allocated(1));
    }

    #[test]
    fn test_box_reactive_height() {
        setup();

        let height = signal(Dimension::Cells(4));
        let _cleanup = box_primitive(BoxProps {
            height: Some(height.clone().into()),
            ..Default::default()
        });

        assert_eq!(sizing::get_height(0), Dimension::Cells(4));
        height.set(Dimension::Cells(9));
        assert_eq!(sizing::get_height(0), Dimension::Cells(9));
    }

    #[test]
    fn test_box_border_and_class() {
        setup();

        let _cleanup = box_primitive(BoxProps {
            border: Some(BorderStyle::Rounded),
            class: Some("hero-title fade-in".into()),
            ..Default::default()
        });

        assert_eq!(visual::get_border(0), BorderStyle::Rounded);
        assert_eq!(core::get_class_list(0), "hero-title fade-in");
    }

    #[test]
    fn test_box_records_mount_time() {
        setup();
        clock::set_now(std::time::Duration::from_millis(1500));

        let _cleanup = box_primitive(BoxProps::default());
        assert_eq!(core::get_mounted_at(0), std::time::Duration::from_millis(1500));

        clock::set_now(std::time::Duration::ZERO);
    }
}
