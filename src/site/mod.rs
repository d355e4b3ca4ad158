//! The portfolio page.
//!
//! - [`sections`]: hero and titled section builders
//! - [`contact`]: contact form body and key routing
//! - [`styles`]: one style block per section
//!
//! [`build_site`] mounts the hero eagerly and wraps every other section in
//! a lazy gate configured from [`SiteConfig`], so a section's scene, text
//! and style block only exist once it has scrolled near the viewport.

pub mod contact;
pub mod sections;
pub mod styles;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::{SECTION_KEYS, SiteConfig};
use crate::engine::unique_id;
use crate::error::Result;
use crate::observe::ObservationConfig;
use crate::primitives::{
    BoxProps, Cleanup, GateState, LazyGate, LazyProps, PropValue, box_primitive, lazy_section,
};
use crate::types::{Dimension, FlexDirection};

pub use contact::FormController;
pub use sections::{HERO_SCENE_HEIGHT, SCENE_HEIGHT, section_id};
pub use styles::{HERO_STYLE_ID, section_style};

/// Id of the page root.
pub const SITE_ROOT_ID: &str = "site";

struct GatePlan {
    key: &'static str,
    config: ObservationConfig,
    placeholder_height: u16,
    transition: Duration,
}

/// Everything [`build_site`] mounted.
pub struct SiteHandle {
    cleanup: Option<Cleanup>,
    gates: Vec<(&'static str, LazyGate)>,
    controller: FormController,
}

impl SiteHandle {
    /// Gate of a lazy section.
    pub fn gate(&self, key: &str) -> Option<&LazyGate> {
        self.gates.iter().find(|(k, _)| *k == key).map(|(_, gate)| gate)
    }

    /// Lazy sections in page order.
    pub fn gates(&self) -> impl Iterator<Item = (&'static str, &LazyGate)> {
        self.gates.iter().map(|(key, gate)| (*key, gate))
    }

    /// Keys of the sections revealed so far.
    pub fn revealed(&self) -> Vec<&'static str> {
        self.gates
            .iter()
            .filter(|(_, gate)| gate.state() == GateState::Revealed)
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn controller(&self) -> FormController {
        self.controller.clone()
    }

    /// Unmount the whole page. Idempotent.
    pub fn teardown(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
            tracing::debug!("site torn down");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.cleanup.is_some()
    }
}

impl std::fmt::Debug for SiteHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteHandle")
            .field("mounted", &self.is_mounted())
            .field("revealed", &self.revealed())
            .finish()
    }
}

/// Mount the portfolio under the current parent context.
///
/// Fails only on a gate configuration that does not parse.
pub fn build_site(config: &SiteConfig) -> Result<SiteHandle> {
    let plans = SECTION_KEYS[1..]
        .iter()
        .map(|&key| {
            let gate = config.gate_for(key);
            Ok(GatePlan {
                key,
                config: gate.observation()?,
                placeholder_height: gate.placeholder_height,
                transition: gate.transition(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let controller = FormController::simulated();
    let gates: Rc<RefCell<Vec<(&'static str, LazyGate)>>> = Rc::new(RefCell::new(Vec::new()));

    let content = config.content.clone();
    let seed = config.scene_seed;
    let built = gates.clone();
    let form = controller.clone();

    let cleanup = box_primitive(BoxProps {
        id: Some(unique_id(SITE_ROOT_ID)),
        direction: Some(FlexDirection::Column),
        gap: Some(1),
        children: Some(Box::new(move || {
            sections::hero(&content, seed);

            for plan in plans {
                let key = plan.key;
                let body = content.section(key).cloned().unwrap_or_default();
                let form = (key == "contact").then(|| form.clone());
                let gate = lazy_section(LazyProps {
                    id: Some(unique_id(&format!("lazy-{key}"))),
                    config: PropValue::Static(plan.config),
                    visual_class: format!("{key}-shimmer"),
                    placeholder_height: Dimension::Cells(plan.placeholder_height),
                    transition: plan.transition,
                    children: Box::new(move || sections::section(key, &body, seed, form.as_ref())),
                });
                built.borrow_mut().push((key, gate));
            }
        })),
        ..Default::default()
    });

    let gates = std::mem::take(&mut *gates.borrow_mut());
    tracing::debug!(sections = gates.len() + 1, "site built");

    Ok(SiteHandle {
        cleanup: Some(cleanup),
        gates,
        controller,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{get_allocated_count, get_index, reset_registry};
    use crate::observe::reset_monitor;
    use crate::primitives::lazy::{gate_count, reset_gates};
    use crate::scene::{reset_scenes, scene_count};
    use crate::style::{active_style_ids, reset_styles};

    fn setup() {
        reset_gates();
        reset_registry();
        reset_monitor();
        reset_styles();
        reset_scenes();
    }

    #[test]
    fn test_only_hero_is_built_eagerly() {
        setup();
        let mut site = build_site(&SiteConfig::default()).unwrap();

        assert_eq!(gate_count(), 8);
        assert!(get_index("section-hero").is_some());
        assert!(get_index("section-about").is_none());
        assert_eq!(active_style_ids(), vec![HERO_STYLE_ID.to_string()]);
        assert_eq!(scene_count(), 1);
        assert!(site.revealed().is_empty());

        site.teardown();
        assert_eq!(gate_count(), 0);
        assert_eq!(get_allocated_count(), 0);
        assert!(active_style_ids().is_empty());
        assert!(!site.is_mounted());
    }

    #[test]
    fn test_section_overrides_reach_their_gate() {
        setup();
        let config = SiteConfig::from_json(
            r#"{ "sections": { "contact": { "threshold": 0.5, "root_margin": "200px" } } }"#,
        )
        .unwrap();
        let mut site = build_site(&config).unwrap();

        assert_eq!(site.gate("contact").unwrap().config().threshold(), 0.5);
        assert_eq!(site.gate("about").unwrap().config().threshold(), 0.1);
        assert!(site.gate("hero").is_none());

        let order: Vec<&str> = site.gates().map(|(key, _)| key).collect();
        assert_eq!(order, SECTION_KEYS[1..].to_vec());
        site.teardown();
    }

    #[test]
    fn test_invalid_gate_config_fails_before_mounting() {
        setup();
        let mut config = SiteConfig::default();
        config.gate.root_margin = "wide".into();
        assert!(build_site(&config).is_err());
        assert_eq!(get_allocated_count(), 0);
    }
}
