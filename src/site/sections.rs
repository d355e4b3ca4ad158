//! Section builders.
//!
//! Every section is a box holding its title, body lines and scene canvas.
//! Once the box is built, the section's style block is acquired and its
//! release tied to the box's destroy callback, so it goes away however the
//! box is released: its own cleanup, a lazy gate teardown, or a parent.
//!
//! Each call builds its own box. A second instance of a section gets a
//! numbered id (`section-skills-2`) and holds its own style reference.

use crate::config::{SectionContent, SiteContent};
use crate::engine::{get_index, on_destroy, unique_id};
use crate::primitives::{BoxProps, CanvasProps, Cleanup, TextProps, box_primitive, canvas, text};
use crate::scene::presets;
use crate::style::scoped_style;
use crate::types::{Attr, BorderStyle, FlexDirection, Rgba, TextAlign};

use super::contact::{FormController, form_body};
use super::styles::section_style;

/// Rows given to each section's scene.
pub const SCENE_HEIGHT: u16 = 8;
/// Rows given to the hero scene.
pub const HERO_SCENE_HEIGHT: u16 = 12;

/// Id of the first box built for `key`.
pub fn section_id(key: &str) -> String {
    format!("section-{key}")
}

/// Acquire the block for `key` and tie its release to the box `id`.
fn bind_style(key: &str, id: &str) {
    let Some((style_id, css)) = section_style(key) else {
        return;
    };
    let guard = scoped_style(&style_id, css);
    match get_index(id) {
        Some(index) => on_destroy(index, move || drop(guard)),
        // Box already gone: the guard releases right here
        None => drop(guard),
    }
}

/// The landing section. Built eagerly.
pub fn hero(content: &SiteContent, seed: u64) -> Cleanup {
    let id = unique_id(&section_id("hero"));
    let greeting = format!("Hei, I'm {}", content.name);
    let role = content.role.clone();
    let tagline = content.tagline.clone();

    let cleanup = box_primitive(BoxProps {
        id: Some(id.clone()),
        class: Some("hero".into()),
        padding: Some(1),
        gap: Some(1),
        children: Some(Box::new(move || {
            text(TextProps {
                class: Some("text-animate hero-line-1".into()),
                content: greeting.into(),
                fg: Some(Rgba::LAVENDER.into()),
                attrs: Some(Attr::BOLD),
                ..Default::default()
            });
            box_primitive(BoxProps {
                class: Some("text-animate hero-line-2".into()),
                direction: Some(FlexDirection::Row),
                children: Some(Box::new(move || {
                    text(TextProps {
                        content: role.into(),
                        fg: Some(Rgba::ORCHID.into()),
                        attrs: Some(Attr::BOLD),
                        ..Default::default()
                    });
                    text(TextProps {
                        class: Some("cursor".into()),
                        content: "|".into(),
                        fg: Some(Rgba::LAVENDER.into()),
                        ..Default::default()
                    });
                })),
                ..Default::default()
            });
            text(TextProps {
                class: Some("text-animate hero-line-3".into()),
                content: tagline.into(),
                ..Default::default()
            });
            canvas(CanvasProps {
                class: Some("profile-image".into()),
                height: HERO_SCENE_HEIGHT,
                scene: Some(presets::hero(seed)),
                ..Default::default()
            });
        })),
        ..Default::default()
    });

    bind_style("hero", &id);
    cleanup
}

/// A titled section with its body, scene and (for contact) the form.
pub fn section(key: &'static str, body: &SectionContent, seed: u64, form: Option<&FormController>) -> Cleanup {
    let id = unique_id(&section_id(key));
    let title = body.title.clone();
    let lines = body.lines.clone();
    let scene = presets::by_name(key, seed);
    let form = form.cloned();

    let cleanup = box_primitive(BoxProps {
        id: Some(id.clone()),
        class: Some(format!("section {key}-container").into()),
        border: Some(BorderStyle::Rounded),
        border_color: Some(Rgba::PLUM),
        padding: Some(1),
        gap: Some(1),
        children: Some(Box::new(move || {
            text(TextProps {
                class: Some(format!("{key}-title").into()),
                content: title.into(),
                fg: Some(Rgba::VIOLET.into()),
                attrs: Some(Attr::BOLD | Attr::UNDERLINE),
                align: Some(TextAlign::Center),
                ..Default::default()
            });
            for line in lines {
                text(TextProps {
                    class: Some(format!("{key}-text").into()),
                    content: line.into(),
                    ..Default::default()
                });
            }
            if let Some(form) = &form {
                form_body(form);
            }
            canvas(CanvasProps {
                class: Some(format!("{key}-scene").into()),
                height: SCENE_HEIGHT,
                scene,
                ..Default::default()
            });
        })),
        ..Default::default()
    });

    bind_style(key, &id);
    cleanup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{get_allocated_count, get_children, is_allocated, reset_registry};
    use crate::scene::{has_scene, reset_scenes, scene_count};
    use crate::style::{is_style_active, reset_styles, style_ref_count};

    fn setup() {
        reset_registry();
        reset_styles();
        reset_scenes();
    }

    #[test]
    fn test_hero_holds_its_style_until_released() {
        setup();
        let cleanup = hero(&SiteContent::default(), 1);

        assert!(is_style_active("hero-animations"));
        assert_eq!(style_ref_count("hero-animations"), 1);
        assert_eq!(scene_count(), 1);

        cleanup();
        assert!(!is_style_active("hero-animations"));
        assert_eq!(scene_count(), 0);
        assert_eq!(get_allocated_count(), 0);
    }

    #[test]
    fn test_section_builds_scene_and_lines() {
        setup();
        let content = SiteContent::default();
        let cleanup = section("skills", &content.skills, 3, None);

        let index = get_index("section-skills").unwrap();
        let canvas_index = get_children(index).into_iter().max().unwrap();
        assert!(has_scene(canvas_index));
        assert_eq!(get_children(index).len(), content.skills.lines.len() + 2);
        assert!(is_style_active("skills-animations"));

        cleanup();
        assert!(!is_style_active("skills-animations"));
    }

    #[test]
    fn test_overlapping_instances_keep_their_own_style_reference() {
        setup();
        let content = SiteContent::default();
        let first = section("skills", &content.skills, 3, None);
        let second = section("skills", &content.skills, 4, None);

        let first_index = get_index("section-skills").unwrap();
        let second_index = get_index("section-skills-2").unwrap();
        assert_ne!(first_index, second_index);
        assert_eq!(get_children(first_index).len(), get_children(second_index).len());
        assert_eq!(style_ref_count("skills-animations"), 2);
        assert_eq!(scene_count(), 2);

        first();
        assert!(is_style_active("skills-animations"));
        assert_eq!(style_ref_count("skills-animations"), 1);
        assert!(is_allocated(second_index));
        assert_eq!(get_children(second_index).len(), content.skills.lines.len() + 2);
        assert_eq!(scene_count(), 1);

        second();
        assert!(!is_style_active("skills-animations"));
        assert_eq!(get_allocated_count(), 0);
    }

    #[test]
    fn test_contact_section_hosts_form() {
        setup();
        let content = SiteContent::default();
        let controller = FormController::simulated();
        let cleanup = section("contact", &content.contact, 3, Some(&controller));

        assert!(get_index("contact-form").is_some());
        cleanup();
        assert!(get_index("contact-form").is_none());
        assert!(!is_style_active("contact-animations"));
    }
}
