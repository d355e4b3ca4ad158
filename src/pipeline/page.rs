//! Page runtime - one scrolling document, one frame at a time.
//!
//! [`Page::frame`] is the whole per-frame pipeline, in a fixed order:
//!
//! 1. deliver observation records queued by the previous frame
//! 2. gate frame work (retries, reveal fades) and frame hooks
//! 3. step scenes
//! 4. layout
//! 5. paint
//! 6. evaluate observations against the new layout
//!
//! Callbacks therefore never run inside the evaluation pass: a reveal
//! triggered by frame N's layout builds its children at the start of
//! frame N+1, and they are laid out and painted in that same frame.

use std::time::Duration;

use crate::layout::{Bounds, ComputedLayout, compute_layout};
use crate::observe::{deliver_pending, run_observations};
use crate::primitives::lazy;
use crate::scene;

use super::clock;
use super::frame::{FrameBuffer, paint};
use super::terminal::{terminal_height, terminal_width};

/// Called every frame with the clock time, before layout.
pub type FrameHook = Box<dyn FnMut(Duration)>;

/// The scrolling document and its viewport.
pub struct Page {
    scroll: u16,
    scroll_step: u16,
    layout: ComputedLayout,
    hooks: Vec<FrameHook>,
    frames: u64,
}

impl Page {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            scroll_step: 1,
            layout: ComputedLayout::new(),
            hooks: Vec::new(),
            frames: 0,
        }
    }

    /// Rows moved per scroll step.
    pub fn with_scroll_step(mut self, step: u16) -> Self {
        self.scroll_step = step.max(1);
        self
    }

    pub fn add_frame_hook(&mut self, hook: impl FnMut(Duration) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Top row of the viewport.
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Highest valid scroll offset for the last layout.
    pub fn max_scroll(&self) -> u16 {
        self.layout.content_height.saturating_sub(terminal_height())
    }

    /// Scroll to `row`, clamped to the document.
    pub fn scroll_to(&mut self, row: u16) {
        self.scroll = row.min(self.max_scroll());
    }

    /// Scroll by `steps` scroll steps (negative is up).
    pub fn scroll_by(&mut self, steps: i32) {
        let target = self.scroll as i32 + steps * self.scroll_step as i32;
        self.scroll_to(target.clamp(0, u16::MAX as i32) as u16);
    }

    /// Scroll by one viewport height, keeping one row of context.
    pub fn page_by(&mut self, pages: i32) {
        let rows = terminal_height().saturating_sub(1).max(1) as i32;
        let target = self.scroll as i32 + pages * rows;
        self.scroll_to(target.clamp(0, u16::MAX as i32) as u16);
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll = self.max_scroll();
    }

    /// Visible region in document cells.
    pub fn viewport(&self) -> Bounds {
        Bounds::new(
            0.0,
            self.scroll as f32,
            terminal_width() as f32,
            terminal_height() as f32,
        )
    }

    /// Layout of the last frame.
    pub fn layout(&self) -> &ComputedLayout {
        &self.layout
    }

    /// Number of frames produced.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Produce the frame for clock time `now`.
    pub fn frame(&mut self, now: Duration) -> FrameBuffer {
        clock::set_now(now);

        let delivered = deliver_pending();
        lazy::on_frame(now);
        for hook in &mut self.hooks {
            hook(now);
        }
        scene::step_scenes(now.as_secs_f32());

        self.layout = compute_layout(terminal_width());
        // Content may have shrunk (resize) since the last scroll
        self.scroll = self.scroll.min(self.max_scroll());

        let viewport = self.viewport();
        let buffer = paint(&self.layout, viewport, now);
        run_observations(&self.layout, viewport);

        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            delivered,
            scroll = self.scroll,
            content_height = self.layout.content_height,
            "frame"
        );
        buffer
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
