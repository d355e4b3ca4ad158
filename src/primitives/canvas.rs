//! Canvas Primitive - fixed-height host for an animated scene.
//!
//! The scene is handed to the scene registry under the canvas index; the
//! pipeline steps and rasterizes it every frame while the canvas exists, and
//! it is dropped when the canvas is released (directly or with its parent).

use crate::engine::arrays::{core, sizing};
use crate::engine::{allocate_index, get_current_parent_index, on_destroy, release_index};
use crate::pipeline::clock;
use crate::scene;
use crate::types::{ComponentType, Dimension};

use super::types::{CanvasProps, Cleanup};

/// Create a canvas component.
pub fn canvas(props: CanvasProps) -> Cleanup {
    let index = allocate_index(props.id.as_deref());

    core::set_component_type(index, ComponentType::Canvas);
    if let Some(parent) = get_current_parent_index() {
        core::set_parent_index(index, Some(parent));
    }
    core::set_mounted_at(index, clock::now());
    if let Some(class) = props.class {
        class.bind(index, core::set_class_list, |i, g| {
            core::set_class_list_getter(i, move || g())
        });
    }
    sizing::set_height(index, Dimension::from(props.height));

    if let Some(scene) = props.scene {
        scene::register_scene(index, scene);
        on_destroy(index, move || scene::unregister_scene(index));
    }

    Box::new(move || {
        release_index(index);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::scene::{has_scene, presets, reset_scenes};

    fn setup() {
        reset_registry();
        reset_scenes();
    }

    #[test]
    fn test_canvas_registers_and_drops_scene() {
        setup();

        let cleanup = canvas(CanvasProps {
            height: 8,
            scene: Some(presets::about(7)),
            ..Default::default()
        });

        assert_eq!(core::get_component_type(0), ComponentType::Canvas);
        assert_eq!(sizing::get_height(0), Dimension::Cells(8));
        assert!(has_scene(0));

        cleanup();
        assert!(!has_scene(0));
    }

    #[test]
    fn test_canvas_without_scene() {
        setup();

        let _cleanup = canvas(CanvasProps {
            height: 3,
            ..Default::default()
        });
        assert!(!has_scene(0));
    }
}
