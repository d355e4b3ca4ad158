//! CSS subset - the part of a style block the terminal can act on.
//!
//! Understood:
//! - `@keyframes name { from {..} 50% {..} to {..} }` with `opacity`,
//!   `scale`, and `transform: translateX() translateY() translate() scale()`
//! - class rules (`.a, .b { .. }`) with the `animation` shorthand,
//!   `animation-name`, `animation-duration` and `animation-delay`
//! - `@media (max-width: Npx)` / `(min-width: Npx)` around class rules
//!
//! Everything else (descendant and pseudo-class selectors, unknown
//! properties, other at-rules) is skipped without failing the parse.

use std::collections::HashMap;
use std::time::Duration;

use super::easing::Easing;

// =============================================================================
// Types
// =============================================================================

/// Animatable properties at one keyframe stop. Lengths are CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StopProps {
    pub opacity: Option<f32>,
    pub translate_x: Option<f32>,
    pub translate_y: Option<f32>,
    pub scale: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeStop {
    /// Position in [0, 1].
    pub offset: f32,
    pub props: StopProps,
}

/// Stops sorted by offset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keyframes {
    pub stops: Vec<KeyframeStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    #[default]
    None,
    Forwards,
    Backwards,
    Both,
}

impl FillMode {
    pub fn fills_backwards(self) -> bool {
        matches!(self, FillMode::Backwards | FillMode::Both)
    }

    pub fn fills_forwards(self) -> bool {
        matches!(self, FillMode::Forwards | FillMode::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Iterations {
    Count(f32),
    #[default]
    Once,
    Infinite,
}

impl Iterations {
    pub fn count(self) -> Option<f32> {
        match self {
            Iterations::Count(n) => Some(n),
            Iterations::Once => Some(1.0),
            Iterations::Infinite => None,
        }
    }
}

/// One entry of an `animation` list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationSpec {
    pub name: String,
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
    pub iterations: Iterations,
    pub fill: FillMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaQuery {
    /// Applies while the viewport is at most this many pixels wide.
    MaxWidth(f32),
    /// Applies while the viewport is at least this many pixels wide.
    MinWidth(f32),
}

impl MediaQuery {
    pub fn matches(&self, viewport_px_width: f32) -> bool {
        match *self {
            MediaQuery::MaxWidth(w) => viewport_px_width <= w,
            MediaQuery::MinWidth(w) => viewport_px_width >= w,
        }
    }
}

/// A class rule. Only the declarations that were present are `Some`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassRule {
    pub classes: Vec<String>,
    pub media: Option<MediaQuery>,
    /// `Some(vec![])` for `animation: none`.
    pub animations: Option<Vec<AnimationSpec>>,
    pub name: Option<String>,
    pub duration: Option<Duration>,
    pub delay: Option<Duration>,
}

/// Parsed style block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleSheet {
    pub keyframes: HashMap<String, Keyframes>,
    /// Document order.
    pub rules: Vec<ClassRule>,
}

impl StyleSheet {
    /// Parse a style block. Never fails; what is not understood is dropped.
    pub fn parse(css: &str) -> Self {
        let mut sheet = StyleSheet::default();
        let source = strip_comments(css);
        for (prelude, body) in blocks(&source) {
            sheet.add_block(prelude, body, None);
        }
        sheet
    }

    fn add_block(&mut self, prelude: &str, body: &str, media: Option<MediaQuery>) {
        if let Some(name) = prelude.strip_prefix("@keyframes") {
            let name = name.trim();
            if !name.is_empty() {
                self.keyframes.insert(name.to_string(), parse_keyframes(body));
            }
        } else if let Some(condition) = prelude.strip_prefix("@media") {
            // Nested media is not a thing in the blocks we get
            if media.is_some() {
                return;
            }
            let Some(query) = parse_media(condition) else {
                return;
            };
            for (inner_prelude, inner_body) in blocks(body) {
                self.add_block(inner_prelude, inner_body, Some(query));
            }
        } else if !prelude.starts_with('@') {
            let classes = parse_selectors(prelude);
            if classes.is_empty() {
                return;
            }
            let mut rule = ClassRule {
                classes,
                media,
                ..Default::default()
            };
            for (property, value) in declarations(body) {
                match property {
                    "animation" => rule.animations = Some(parse_animation_list(value)),
                    "animation-name" => rule.name = Some(value.to_string()),
                    "animation-duration" => rule.duration = parse_time(value),
                    "animation-delay" => rule.delay = parse_time(value),
                    _ => {}
                }
            }
            if rule.animations.is_some()
                || rule.name.is_some()
                || rule.duration.is_some()
                || rule.delay.is_some()
            {
                self.rules.push(rule);
            }
        }
    }

    /// Whether the sheet contributes nothing animatable.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty() && self.rules.is_empty()
    }
}

// =============================================================================
// Structure
// =============================================================================

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Top-level `prelude { body }` pairs. Unbalanced trailing input is dropped.
fn blocks(source: &str) -> Vec<(&str, &str)> {
    let mut result = Vec::new();
    let mut depth = 0usize;
    let mut prelude_start = 0;
    let mut body_start = 0;

    for (i, ch) in source.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    body_start = i + 1;
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    // Stray close brace: resync after it
                    prelude_start = i + 1;
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    let prelude = source[prelude_start..body_start - 1].trim();
                    let body = &source[body_start..i];
                    result.push((prelude, body));
                    prelude_start = i + 1;
                }
            }
            ';' if depth == 0 => {
                // Statement at-rules such as @import
                prelude_start = i + 1;
            }
            _ => {}
        }
    }
    result
}

/// `property: value` pairs; `!important` is dropped.
fn declarations(body: &str) -> impl Iterator<Item = (&str, &str)> {
    body.split(';').filter_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        let value = value.trim();
        let value = value.strip_suffix("!important").unwrap_or(value).trim();
        Some((property.trim(), value))
    })
}

/// Class names from a selector list. Only bare `.class` selectors count.
fn parse_selectors(prelude: &str) -> Vec<String> {
    prelude
        .split(',')
        .filter_map(|selector| {
            let name = selector.trim().strip_prefix('.')?;
            let simple = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            simple.then(|| name.to_string())
        })
        .collect()
}

fn parse_media(condition: &str) -> Option<MediaQuery> {
    let inner = condition.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (feature, value) = inner.split_once(':')?;
    let px = parse_px(value.trim())?;
    match feature.trim() {
        "max-width" => Some(MediaQuery::MaxWidth(px)),
        "min-width" => Some(MediaQuery::MinWidth(px)),
        _ => None,
    }
}

// =============================================================================
// Keyframes
// =============================================================================

fn parse_keyframes(body: &str) -> Keyframes {
    let mut stops = Vec::new();
    for (selector, declarations_body) in blocks(body) {
        let props = parse_stop_props(declarations_body);
        for offset in selector.split(',').filter_map(parse_offset) {
            stops.push(KeyframeStop { offset, props });
        }
    }
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    Keyframes { stops }
}

fn parse_offset(selector: &str) -> Option<f32> {
    match selector.trim() {
        "from" => Some(0.0),
        "to" => Some(1.0),
        other => {
            let percent: f32 = other.strip_suffix('%')?.trim().parse().ok()?;
            (0.0..=100.0).contains(&percent).then_some(percent / 100.0)
        }
    }
}

fn parse_stop_props(body: &str) -> StopProps {
    let mut props = StopProps::default();
    for (property, value) in declarations(body) {
        match property {
            "opacity" => props.opacity = value.parse().ok(),
            "scale" => props.scale = value.parse().ok(),
            "transform" => apply_transform(&mut props, value),
            _ => {}
        }
    }
    props
}

fn apply_transform(props: &mut StopProps, value: &str) {
    if value == "none" {
        props.translate_x = Some(0.0);
        props.translate_y = Some(0.0);
        props.scale = Some(1.0);
        return;
    }

    let mut rest = value;
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            return;
        };
        let function = rest[..open].trim();
        let args: Vec<&str> = rest[open + 1..open + close].split(',').map(str::trim).collect();
        match (function, args.as_slice()) {
            ("translateX", [x]) => props.translate_x = parse_px(x),
            ("translateY", [y]) => props.translate_y = parse_px(y),
            ("translate", [x]) => {
                props.translate_x = parse_px(x);
                props.translate_y = Some(0.0);
            }
            ("translate", [x, y]) => {
                props.translate_x = parse_px(x);
                props.translate_y = parse_px(y);
            }
            ("scale", [s]) | ("scale", [s, _]) => props.scale = s.parse().ok(),
            _ => {}
        }
        rest = &rest[open + close + 1..];
    }
}

// =============================================================================
// Animation shorthand
// =============================================================================

fn parse_animation_list(value: &str) -> Vec<AnimationSpec> {
    if value.trim() == "none" {
        return Vec::new();
    }
    value.split(',').filter_map(parse_animation).collect()
}

/// One shorthand entry: the first time is the duration, the second the
/// delay; keywords are recognised in any order, the leftover identifier is
/// the name.
fn parse_animation(entry: &str) -> Option<AnimationSpec> {
    let mut spec = AnimationSpec::default();
    let mut seen_duration = false;
    let mut name = None;

    for token in entry.split_whitespace() {
        if let Some(time) = parse_time(token) {
            if seen_duration {
                spec.delay = time;
            } else {
                spec.duration = time;
                seen_duration = true;
            }
        } else if let Some(easing) = Easing::from_keyword(token) {
            spec.easing = easing;
        } else if token == "infinite" {
            spec.iterations = Iterations::Infinite;
        } else if let Ok(count) = token.parse::<f32>() {
            spec.iterations = Iterations::Count(count.max(0.0));
        } else {
            match token {
                "forwards" => spec.fill = FillMode::Forwards,
                "backwards" => spec.fill = FillMode::Backwards,
                "both" => spec.fill = FillMode::Both,
                "none" => spec.fill = FillMode::None,
                // Direction and play state do not change what we draw
                "normal" | "reverse" | "alternate" | "alternate-reverse" | "running"
                | "paused" => {}
                _ => name = Some(token.to_string()),
            }
        }
    }

    spec.name = name?;
    Some(spec)
}

/// `0.8s`, `300ms`, bare `0`.
pub fn parse_time(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value == "0" {
        return Some(Duration::ZERO);
    }
    let (number, nanos_per_unit) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1e6)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1e9)
    } else {
        return None;
    };
    // Rounded to whole nanoseconds so "0.6s" is exactly 600ms
    let nanos = (number.parse::<f64>().ok()? * nanos_per_unit).round();
    (nanos.is_finite() && nanos >= 0.0).then(|| Duration::from_nanos(nanos as u64))
}

/// `30px`, `-50px`, bare `0`. Percentages of the element are not supported.
fn parse_px(value: &str) -> Option<f32> {
    let value = value.trim();
    if value == "0" {
        return Some(0.0);
    }
    value.strip_suffix("px")?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECTS: &str = r#"
      @keyframes fadeInUp {
        from {
          opacity: 0;
          transform: translateY(30px);
        }
        to {
          opacity: 1;
          transform: translateY(0);
        }
      }

      .featured-card {
        animation: fadeInUp 0.6s ease-out both;
      }

      /* Add section style animations on narrow screens */
      @media (max-width: 768px) {
        .featured-card,
        .project-card {
          animation: fadeInUp 0.8s ease-out 0.5s both;
        }
      }
    "#;

    #[test]
    fn test_parse_keyframes() {
        let sheet = StyleSheet::parse(PROJECTS);
        let frames = &sheet.keyframes["fadeInUp"];
        assert_eq!(frames.stops.len(), 2);
        assert_eq!(frames.stops[0].offset, 0.0);
        assert_eq!(frames.stops[0].props.opacity, Some(0.0));
        assert_eq!(frames.stops[0].props.translate_y, Some(30.0));
        assert_eq!(frames.stops[1].props.translate_y, Some(0.0));
    }

    #[test]
    fn test_parse_rules_and_media() {
        let sheet = StyleSheet::parse(PROJECTS);
        assert_eq!(sheet.rules.len(), 2);

        let base = &sheet.rules[0];
        assert_eq!(base.classes, vec!["featured-card"]);
        assert_eq!(base.media, None);
        let animation = &base.animations.as_ref().unwrap()[0];
        assert_eq!(animation.name, "fadeInUp");
        assert_eq!(animation.duration, Duration::from_millis(600));
        assert_eq!(animation.easing, Easing::EaseOut);
        assert_eq!(animation.fill, FillMode::Both);

        let narrow = &sheet.rules[1];
        assert_eq!(narrow.classes, vec!["featured-card", "project-card"]);
        assert_eq!(narrow.media, Some(MediaQuery::MaxWidth(768.0)));
        assert_eq!(
            narrow.animations.as_ref().unwrap()[0].delay,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_multi_stop_selectors() {
        let sheet = StyleSheet::parse(
            "@keyframes blink { 0%, 50% { opacity: 1; } 51%, 100% { opacity: 0; } }",
        );
        let offsets: Vec<f32> = sheet.keyframes["blink"].stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 0.51, 1.0]);
    }

    #[test]
    fn test_animation_none_and_important() {
        let sheet = StyleSheet::parse(".card { animation: none !important; }");
        assert_eq!(sheet.rules[0].animations, Some(Vec::new()));
    }

    #[test]
    fn test_multiple_animations_and_infinite() {
        let sheet = StyleSheet::parse(
            ".bar { animation: fadeInUp 0.8s ease-out 0.5s both, skillBarFill 1s ease-out both; }
             .cursor { animation: blink 1s infinite; }",
        );
        let bar = sheet.rules[0].animations.as_ref().unwrap();
        assert_eq!(bar.len(), 2);
        assert_eq!(bar[1].name, "skillBarFill");
        let cursor = &sheet.rules[1].animations.as_ref().unwrap()[0];
        assert_eq!(cursor.iterations, Iterations::Infinite);
    }

    #[test]
    fn test_skips_complex_selectors_and_unknown_properties() {
        let sheet = StyleSheet::parse(
            ".email-hover .email-text { opacity: 0; }
             .text-animate:nth-child(1) { animation-delay: 0.1s; }
             .text-animate { animation: fadeInUp 0.8s ease-out forwards; will-change: opacity; }",
        );
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].classes, vec!["text-animate"]);
    }

    #[test]
    fn test_transform_functions() {
        let sheet = StyleSheet::parse(
            "@keyframes k { from { transform: translate(-20px, 10px) scale(0.8); } to { transform: none; } }",
        );
        let from = sheet.keyframes["k"].stops[0].props;
        assert_eq!(from.translate_x, Some(-20.0));
        assert_eq!(from.translate_y, Some(10.0));
        assert_eq!(from.scale, Some(0.8));
        let to = sheet.keyframes["k"].stops[1].props;
        assert_eq!(to.scale, Some(1.0));
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("0.8s"), Some(Duration::from_millis(800)));
        assert_eq!(parse_time("300ms"), Some(Duration::from_millis(300)));
        assert_eq!(parse_time("0"), Some(Duration::ZERO));
        assert_eq!(parse_time("fast"), None);
        assert_eq!(parse_time("-1s"), None);
    }

    #[test]
    fn test_garbage_does_not_panic() {
        let sheet = StyleSheet::parse("}}} @media { .a { animation: x 1s } /* open");
        assert!(sheet.rules.is_empty());
        assert!(StyleSheet::parse("").is_empty());
    }
}
