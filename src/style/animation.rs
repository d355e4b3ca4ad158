//! Animation resolution - what the active style blocks do to an element now.
//!
//! The painter calls [`resolve_animation`] with an element's classes and the
//! time since it mounted. Rules cascade in block insertion order, then
//! document order; a later matching rule replaces the animation list of an
//! earlier one, and a later `@keyframes` of the same name wins.

use std::rc::Rc;
use std::time::Duration;

use super::css::{AnimationSpec, Keyframes, StopProps, StyleSheet};
use super::easing::Easing;
use super::registry::active_sheets;
use crate::observe::{CELL_HEIGHT_PX, CELL_WIDTH_PX};

/// Animated presentation of one element. Offsets are in cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedStyle {
    pub opacity: f32,
    pub dx: f32,
    pub dy: f32,
    pub scale: f32,
}

impl AnimatedStyle {
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        dx: 0.0,
        dy: 0.0,
        scale: 1.0,
    };

    /// Whole-cell offset for painting.
    pub fn cell_offset(&self) -> (i32, i32) {
        (self.dx.round() as i32, self.dy.round() as i32)
    }
}

impl Default for AnimatedStyle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Resolve the animated style of an element with `classes` (space
/// separated), `elapsed` after it mounted, in a viewport `viewport_px_width`
/// pixels wide, against the document's active style blocks.
pub fn resolve_animation(classes: &str, elapsed: Duration, viewport_px_width: f32) -> AnimatedStyle {
    if classes.trim().is_empty() {
        return AnimatedStyle::IDENTITY;
    }
    resolve_with_sheets(&active_sheets(), classes, elapsed, viewport_px_width)
}

/// Resolve against an explicit list of sheets, in cascade order.
pub fn resolve_with_sheets(
    sheets: &[Rc<StyleSheet>],
    classes: &str,
    elapsed: Duration,
    viewport_px_width: f32,
) -> AnimatedStyle {
    let animations = cascade(sheets, classes, viewport_px_width);
    let mut props = StopProps::default();

    for spec in &animations {
        let Some(frames) = find_keyframes(sheets, &spec.name) else {
            continue;
        };
        let Some(progress) = progress(spec, elapsed) else {
            continue;
        };
        // Later animations in the list override earlier ones per property
        let sampled = sample(frames, progress, spec.easing);
        props.opacity = sampled.opacity.or(props.opacity);
        props.translate_x = sampled.translate_x.or(props.translate_x);
        props.translate_y = sampled.translate_y.or(props.translate_y);
        props.scale = sampled.scale.or(props.scale);
    }

    AnimatedStyle {
        opacity: props.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
        dx: props.translate_x.unwrap_or(0.0) / CELL_WIDTH_PX,
        dy: props.translate_y.unwrap_or(0.0) / CELL_HEIGHT_PX,
        scale: props.scale.unwrap_or(1.0).max(0.0),
    }
}

/// Effective animation list for an element.
fn cascade(sheets: &[Rc<StyleSheet>], classes: &str, viewport_px_width: f32) -> Vec<AnimationSpec> {
    let element: Vec<&str> = classes.split_whitespace().collect();
    let mut list: Vec<AnimationSpec> = Vec::new();

    for sheet in sheets {
        for rule in &sheet.rules {
            if rule.media.is_some_and(|m| !m.matches(viewport_px_width)) {
                continue;
            }
            if !rule.classes.iter().any(|c| element.contains(&c.as_str())) {
                continue;
            }

            if let Some(animations) = &rule.animations {
                list = animations.clone();
            }
            if let Some(name) = &rule.name {
                if list.is_empty() {
                    list.push(AnimationSpec {
                        name: name.clone(),
                        ..Default::default()
                    });
                } else {
                    list.iter_mut().for_each(|spec| spec.name = name.clone());
                }
            }
            if let Some(duration) = rule.duration {
                list.iter_mut().for_each(|spec| spec.duration = duration);
            }
            if let Some(delay) = rule.delay {
                list.iter_mut().for_each(|spec| spec.delay = delay);
            }
        }
    }
    list
}

fn find_keyframes<'a>(sheets: &'a [Rc<StyleSheet>], name: &str) -> Option<&'a Keyframes> {
    sheets.iter().rev().find_map(|sheet| sheet.keyframes.get(name))
}

/// Position within the keyframes at `elapsed`, or None when the animation
/// has no effect right now (outside its active interval without fill).
fn progress(spec: &AnimationSpec, elapsed: Duration) -> Option<f32> {
    let Some(local) = elapsed.checked_sub(spec.delay) else {
        return spec.fill.fills_backwards().then_some(0.0);
    };

    let duration = spec.duration.as_secs_f32();
    let local = local.as_secs_f32();

    if duration <= 0.0 {
        return spec.fill.fills_forwards().then_some(1.0);
    }

    match spec.iterations.count() {
        Some(count) if local >= duration * count => {
            if !spec.fill.fills_forwards() {
                return None;
            }
            let fraction = count.fract();
            Some(if fraction == 0.0 { 1.0 } else { fraction })
        }
        _ => Some((local % duration) / duration),
    }
}

/// Interpolate every property the keyframes mention at `progress`.
fn sample(frames: &Keyframes, progress: f32, easing: Easing) -> StopProps {
    StopProps {
        opacity: property_at(frames, progress, easing, |p| p.opacity, 1.0),
        translate_x: property_at(frames, progress, easing, |p| p.translate_x, 0.0),
        translate_y: property_at(frames, progress, easing, |p| p.translate_y, 0.0),
        scale: property_at(frames, progress, easing, |p| p.scale, 1.0),
    }
}

/// One property along the stops that declare it. Missing end stops take the
/// element's own value; the timing function applies per segment.
fn property_at(
    frames: &Keyframes,
    progress: f32,
    easing: Easing,
    get: fn(&StopProps) -> Option<f32>,
    base: f32,
) -> Option<f32> {
    let mut points: Vec<(f32, f32)> = frames
        .stops
        .iter()
        .filter_map(|stop| get(&stop.props).map(|value| (stop.offset, value)))
        .collect();

    let (first, last) = (points.first()?.0, points.last()?.0);
    if first > 0.0 {
        points.insert(0, (0.0, base));
    }
    if last < 1.0 {
        points.push((1.0, base));
    }

    let p = progress.clamp(0.0, 1.0);
    let segment = points
        .windows(2)
        .find(|pair| p >= pair[0].0 && p <= pair[1].0)
        .map(|pair| (pair[0], pair[1]));

    let ((o0, v0), (o1, v1)) = segment?;
    if o1 <= o0 {
        return Some(v1);
    }
    let t = easing.apply((p - o0) / (o1 - o0));
    Some(v0 + (v1 - v0) * t)
}
