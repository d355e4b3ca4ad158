//! Site configuration.
//!
//! Loaded from a JSON file; every field has a default, so a file only needs
//! the values it changes. Gate settings can be overridden per section.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::observe::{DEFAULT_ROOT_MARGIN, DEFAULT_THRESHOLD, ObservationConfig};
use crate::primitives::{DEFAULT_PLACEHOLDER_HEIGHT, DEFAULT_TRANSITION};

/// Sections in page order.
pub const SECTION_KEYS: [&str; 9] = [
    "hero",
    "about",
    "skills",
    "experience",
    "projects",
    "resume",
    "achievements",
    "testimonials",
    "contact",
];

// =============================================================================
// Gate settings
// =============================================================================

/// Lazy gate settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// CSS margin shorthand, e.g. `"50px"` or `"10% 0px"`.
    #[serde(default = "default_root_margin")]
    pub root_margin: String,

    /// Rows reserved before the section reveals.
    #[serde(default = "default_placeholder_height")]
    pub placeholder_height: u16,

    /// Fade-in length after reveal, in milliseconds.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_root_margin() -> String {
    DEFAULT_ROOT_MARGIN.to_string()
}

fn default_placeholder_height() -> u16 {
    DEFAULT_PLACEHOLDER_HEIGHT
}

fn default_transition_ms() -> u64 {
    DEFAULT_TRANSITION.as_millis() as u64
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            root_margin: default_root_margin(),
            placeholder_height: default_placeholder_height(),
            transition_ms: default_transition_ms(),
        }
    }
}

impl GateConfig {
    /// Parsed observation settings.
    pub fn observation(&self) -> Result<ObservationConfig> {
        ObservationConfig::new(self.threshold, &self.root_margin)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

/// Per-section changes to the gate defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_margin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_height: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_ms: Option<u64>,
}

// =============================================================================
// Site
// =============================================================================

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Frames per second.
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Rows per arrow-key scroll.
    #[serde(default = "default_scroll_step")]
    pub scroll_step: u16,

    /// Seed for the scene particle fields.
    #[serde(default = "default_scene_seed")]
    pub scene_seed: u64,

    /// Gate defaults for every lazy section.
    #[serde(default)]
    pub gate: GateConfig,

    /// Overrides keyed by section (`"skills"`, `"contact"`, ...).
    #[serde(default)]
    pub sections: BTreeMap<String, GateOverride>,

    #[serde(default)]
    pub content: SiteContent,
}

fn default_fps() -> u32 {
    30
}

fn default_scroll_step() -> u16 {
    1
}

fn default_scene_seed() -> u64 {
    7
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            scroll_step: default_scroll_step(),
            scene_seed: default_scene_seed(),
            gate: GateConfig::default(),
            sections: BTreeMap::new(),
            content: SiteContent::default(),
        }
    }
}

impl SiteConfig {
    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value the runtime would otherwise reject later.
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 || self.fps > 240 {
            return Err(Error::Config(format!("fps must be within 1..=240, got {}", self.fps)));
        }
        for key in self.sections.keys() {
            if !SECTION_KEYS.contains(&key.as_str()) {
                return Err(Error::Config(format!("unknown section '{key}'")));
            }
        }
        self.gate.observation()?;
        for key in SECTION_KEYS {
            self.gate_for(key).observation()?;
        }
        Ok(())
    }

    /// Gate settings for `section`: defaults with its override applied.
    pub fn gate_for(&self, section: &str) -> GateConfig {
        let mut gate = self.gate.clone();
        if let Some(over) = self.sections.get(section) {
            if let Some(threshold) = over.threshold {
                gate.threshold = threshold;
            }
            if let Some(root_margin) = &over.root_margin {
                gate.root_margin = root_margin.clone();
            }
            if let Some(height) = over.placeholder_height {
                gate.placeholder_height = height;
            }
            if let Some(ms) = over.transition_ms {
                gate.transition_ms = ms;
            }
        }
        gate
    }
}

// =============================================================================
// Content
// =============================================================================

/// Title and body of one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionContent {
    pub title: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

impl SectionContent {
    fn new(title: &str, lines: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }
    }
}

/// Everything the page says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteContent {
    pub name: String,
    pub role: String,
    pub tagline: String,
    pub about: SectionContent,
    pub skills: SectionContent,
    pub experience: SectionContent,
    pub projects: SectionContent,
    pub resume: SectionContent,
    pub achievements: SectionContent,
    pub testimonials: SectionContent,
    pub contact: SectionContent,
}

impl SiteContent {
    /// Content of a lazy section by key.
    pub fn section(&self, key: &str) -> Option<&SectionContent> {
        match key {
            "about" => Some(&self.about),
            "skills" => Some(&self.skills),
            "experience" => Some(&self.experience),
            "projects" => Some(&self.projects),
            "resume" => Some(&self.resume),
            "achievements" => Some(&self.achievements),
            "testimonials" => Some(&self.testimonials),
            "contact" => Some(&self.contact),
            _ => None,
        }
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            name: "Alex Doe".into(),
            role: "Full-Stack Developer".into(),
            tagline: "I build full-stack applications that feel fast, premium, and impossible to ignore.".into(),
            about: SectionContent::new(
                "About",
                &[
                    "Full-stack developer focused on modern web experiences from frontend to backend.",
                    "Responsive interfaces with React and Next.js; services in Node.js and Express.",
                    "Comfortable taking an idea from concept to deployment.",
                ],
            ),
            skills: SectionContent::new(
                "Skills",
                &[
                    "Frontend: React, Next.js, TypeScript, Tailwind CSS, Three.js",
                    "Backend: Node.js, Express, REST APIs",
                    "Data: MongoDB, MySQL",
                    "Tooling: Git, Docker, Vercel",
                ],
            ),
            experience: SectionContent::new(
                "Experience",
                &[
                    "Full-Stack Developer, freelance - client dashboards and storefronts",
                    "Frontend Intern, product studio - component library and animations",
                ],
            ),
            projects: SectionContent::new(
                "Projects",
                &[
                    "Portfolio - 3D scenes, lazy sections, scroll animations",
                    "Task board - realtime collaboration with websockets",
                    "Shop API - catalog, carts and payments over REST",
                ],
            ),
            resume: SectionContent::new(
                "Resume",
                &["Download the full resume from the contact links below."],
            ),
            achievements: SectionContent::new(
                "Achievements",
                &[
                    "Hackathon finalist - regional web track",
                    "100+ merged open-source pull requests",
                ],
            ),
            testimonials: SectionContent::new(
                "Testimonials",
                &[
                    "\"Shipped ahead of schedule and polished every detail.\" - product lead",
                    "\"Clear communication from first sketch to launch.\" - client",
                ],
            ),
            contact: SectionContent::new(
                "Contact",
                &["Tab to the form, type, Enter to send. Esc leaves the form."],
            ),
        }
    }
}
