//! Scoped Style Lifecycle - reference-counted style blocks.
//!
//! Several mounted components may need the same style block. Each one
//! acquires the block by id when it mounts and releases it on cleanup; the
//! block is inserted on the first acquire and removed on the last release,
//! so unmounting one instance never strips rules another instance relies on.
//!
//! # Pattern
//!
//! - First acquire of an id inserts the block (ref count 0 → 1)
//! - Later acquires only bump the count
//! - Release decrements; the block goes away when the count reaches 0
//!
//! # Example
//!
//! ```ignore
//! use folio_tui::style::scoped_style;
//!
//! let guard = scoped_style("hero-animations", HERO_CSS);
//! // ... hero is mounted, its animations resolve ...
//! drop(guard); // released on every exit path
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::css::StyleSheet;
use crate::diagnostics::{self, Diagnostic};

struct StyleEntry {
    css_text: String,
    ref_count: usize,
    sheet: Rc<StyleSheet>,
}

/// Map from style id to its block, with insertion order kept for the cascade.
#[derive(Default)]
pub struct StyleRegistry {
    entries: HashMap<String, StyleEntry>,
    order: Vec<String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a reference to the block `id`, inserting `css` if it is not
    /// active yet. Returns true when the block was inserted.
    pub fn acquire(&mut self, id: &str, css: &str) -> bool {
        let mut reports = Vec::new();
        let inserted = self.acquire_inner(id, css, &mut reports);
        reports.into_iter().for_each(diagnostics::emit);
        inserted
    }

    /// Drop a reference to `id`. Returns true when the block was removed.
    pub fn release(&mut self, id: &str) -> bool {
        let mut reports = Vec::new();
        let removed = self.release_inner(id, &mut reports);
        reports.into_iter().for_each(diagnostics::emit);
        removed
    }

    fn acquire_inner(&mut self, id: &str, css: &str, reports: &mut Vec<Diagnostic>) -> bool {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.ref_count += 1;
            reports.push(Diagnostic::DuplicateStyleInjection {
                id: id.to_string(),
                ref_count: entry.ref_count,
            });
            if entry.css_text != css {
                reports.push(Diagnostic::ConflictingStyleText { id: id.to_string() });
            }
            return false;
        }

        let sheet = Rc::new(StyleSheet::parse(css));
        tracing::debug!(
            id,
            keyframes = sheet.keyframes.len(),
            rules = sheet.rules.len(),
            "style block inserted"
        );
        self.entries.insert(
            id.to_string(),
            StyleEntry {
                css_text: css.to_string(),
                ref_count: 1,
                sheet,
            },
        );
        self.order.push(id.to_string());
        true
    }

    fn release_inner(&mut self, id: &str, reports: &mut Vec<Diagnostic>) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            reports.push(Diagnostic::UnbalancedStyleRelease { id: id.to_string() });
            return false;
        };

        entry.ref_count -= 1;
        if entry.ref_count > 0 {
            return false;
        }

        self.entries.remove(id);
        self.order.retain(|active| active != id);
        tracing::debug!(id, "style block removed");
        true
    }

    pub fn ref_count(&self, id: &str) -> usize {
        self.entries.get(id).map_or(0, |entry| entry.ref_count)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Rules text of an active block (the text of its first acquire).
    pub fn css_text(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|entry| entry.css_text.as_str())
    }

    /// Active ids in insertion order.
    pub fn active_ids(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Parsed blocks in insertion order (later blocks win the cascade).
    pub fn sheets(&self) -> Vec<Rc<StyleSheet>> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|entry| entry.sheet.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

// =============================================================================
// Document registry
// =============================================================================

thread_local! {
    /// The document's style blocks.
    static DOCUMENT: RefCell<StyleRegistry> = RefCell::new(StyleRegistry::new());
}

/// Acquire a block in the document. See [`StyleRegistry::acquire`].
pub fn acquire_style(id: &str, css: &str) -> bool {
    let mut reports = Vec::new();
    let inserted = DOCUMENT.with(|doc| doc.borrow_mut().acquire_inner(id, css, &mut reports));
    // Emitted after the borrow ends: a hook may query the registry
    reports.into_iter().for_each(diagnostics::emit);
    inserted
}

/// Release a block in the document. See [`StyleRegistry::release`].
pub fn release_style(id: &str) -> bool {
    let mut reports = Vec::new();
    let removed = DOCUMENT.with(|doc| doc.borrow_mut().release_inner(id, &mut reports));
    reports.into_iter().for_each(diagnostics::emit);
    removed
}

pub fn style_ref_count(id: &str) -> usize {
    DOCUMENT.with(|doc| doc.borrow().ref_count(id))
}

pub fn is_style_active(id: &str) -> bool {
    DOCUMENT.with(|doc| doc.borrow().is_active(id))
}

pub fn style_css_text(id: &str) -> Option<String> {
    DOCUMENT.with(|doc| doc.borrow().css_text(id).map(str::to_string))
}

pub fn active_style_ids() -> Vec<String> {
    DOCUMENT.with(|doc| doc.borrow().active_ids().into_iter().map(str::to_string).collect())
}

/// Parsed document blocks in cascade order.
pub fn active_sheets() -> Vec<Rc<StyleSheet>> {
    DOCUMENT.with(|doc| doc.borrow().sheets())
}

/// Remove every block (for testing).
pub fn reset_styles() {
    DOCUMENT.with(|doc| doc.borrow_mut().clear());
}

// =============================================================================
// Guard
// =============================================================================

/// Holds one reference to a document style block; releases it on drop.
#[must_use = "dropping the guard releases the style block immediately"]
pub struct StyleGuard {
    id: String,
}

impl StyleGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for StyleGuard {
    fn drop(&mut self) {
        release_style(&self.id);
    }
}

impl std::fmt::Debug for StyleGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StyleGuard").field(&self.id).finish()
    }
}

/// Acquire `id` in the document for as long as the guard lives.
pub fn scoped_style(id: &str, css: &str) -> StyleGuard {
    acquire_style(id, css);
    StyleGuard { id: id.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{clear_diagnostic_hook, set_diagnostic_hook};

    const FADE: &str = "@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }";

    fn setup() {
        reset_styles();
        clear_diagnostic_hook();
    }

    fn capture() -> Rc<RefCell<Vec<Diagnostic>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        set_diagnostic_hook(move |d| sink.borrow_mut().push(d.clone()));
        seen
    }

    #[test]
    fn test_first_acquire_inserts_last_release_removes() {
        let mut registry = StyleRegistry::new();

        assert!(registry.acquire("about", FADE));
        assert!(!registry.acquire("about", FADE));
        assert_eq!(registry.ref_count("about"), 2);

        assert!(!registry.release("about"));
        assert!(registry.is_active("about"));
        assert!(registry.release("about"));
        assert!(!registry.is_active("about"));
        assert_eq!(registry.ref_count("about"), 0);
    }

    #[test]
    fn test_two_instances_unmount_one() {
        setup();
        let first = scoped_style("hero-animations", FADE);
        let second = scoped_style("hero-animations", FADE);
        assert_eq!(style_ref_count("hero-animations"), 2);

        drop(first);
        // The remaining instance keeps its rules
        assert!(is_style_active("hero-animations"));
        assert_eq!(style_ref_count("hero-animations"), 1);

        drop(second);
        assert!(!is_style_active("hero-animations"));
        assert!(active_sheets().is_empty());
    }

    #[test]
    fn test_many_instances_balance_to_zero() {
        setup();
        let mut guards: Vec<Option<StyleGuard>> =
            (0..5).map(|_| Some(scoped_style("projects-animations", FADE))).collect();
        assert_eq!(style_ref_count("projects-animations"), 5);

        for (released, slot) in [3, 0, 4, 1, 2].into_iter().enumerate() {
            drop(guards[slot].take());
            let left = 4 - released;
            assert_eq!(style_ref_count("projects-animations"), left);
            assert_eq!(is_style_active("projects-animations"), left > 0);
        }
        assert!(active_style_ids().is_empty());

        // Balanced again after a second round
        let again: Vec<StyleGuard> = (0..3).map(|_| scoped_style("projects-animations", FADE)).collect();
        assert_eq!(style_ref_count("projects-animations"), 3);
        drop(again);
        assert_eq!(style_ref_count("projects-animations"), 0);
    }

    #[test]
    fn test_release_unknown_is_noop_with_diagnostic() {
        setup();
        let seen = capture();

        assert!(!release_style("never-acquired"));
        assert_eq!(
            seen.borrow().as_slice(),
            &[Diagnostic::UnbalancedStyleRelease {
                id: "never-acquired".into()
            }]
        );
        clear_diagnostic_hook();
    }

    #[test]
    fn test_conflicting_text_keeps_first() {
        setup();
        let seen = capture();

        let _a = scoped_style("skills", FADE);
        let _b = scoped_style("skills", ".x { animation: y 1s; }");

        assert_eq!(style_css_text("skills").as_deref(), Some(FADE));
        assert!(seen.borrow().contains(&Diagnostic::ConflictingStyleText { id: "skills".into() }));
        assert!(seen.borrow().contains(&Diagnostic::DuplicateStyleInjection {
            id: "skills".into(),
            ref_count: 2
        }));
        clear_diagnostic_hook();
    }

    #[test]
    fn test_insertion_order_survives_removal() {
        setup();
        let a = scoped_style("a", FADE);
        let _b = scoped_style("b", FADE);
        let _c = scoped_style("c", FADE);
        drop(a);
        let _a_again = scoped_style("a", FADE);
        assert_eq!(active_style_ids(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_hook_may_query_registry() {
        setup();
        let counts = Rc::new(RefCell::new(Vec::new()));
        let sink = counts.clone();
        set_diagnostic_hook(move |d| {
            if let Diagnostic::DuplicateStyleInjection { id, .. } = d {
                sink.borrow_mut().push(style_ref_count(id));
            }
        });

        let _a = scoped_style("contact", FADE);
        let _b = scoped_style("contact", FADE);
        assert_eq!(counts.borrow().as_slice(), &[2]);
        clear_diagnostic_hook();
    }
}
