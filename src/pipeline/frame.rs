//! Frame buffer and painter.
//!
//! [`paint`] walks the component tree from the roots and draws every
//! visible component that overlaps the viewport into a [`FrameBuffer`].
//! Opacity multiplies down the tree and animation offsets carry over to
//! children, so a fading section fades its whole subtree.

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::time::Duration;

use crate::engine::arrays::{core, text, visual};
use crate::engine::get_allocated_indices;
use crate::layout::{Bounds, ComputedLayout, char_width, string_width, wrap_text};
use crate::primitives::lazy::is_pending_placeholder;
use crate::scene;
use crate::style::resolve_animation;
use crate::types::{Attr, BorderStyle, Cell, ComponentType, Rgba};

use super::terminal::viewport_px_width;

/// Marker stored in the cell after a wide character.
pub const CONTINUATION: u32 = 0;

/// Pulse period of pending placeholders.
const SHIMMER_PERIOD: Duration = Duration::from_secs(2);

/// Foreground assumed for the terminal default color when it must be faded.
const DEFAULT_FG: Rgba = Rgba::rgb(220, 220, 220);

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Check if coordinates are in bounds.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x as i32, y as i32).then(|| &self.cells[self.index(x, y)])
    }

    /// Mutable cell at signed coordinates, None when clipped.
    #[inline]
    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = self.index(x as u16, y as u16);
        Some(&mut self.cells[idx])
    }

    /// Write a character, keeping the cell background.
    pub fn put_char(&mut self, x: i32, y: i32, ch: char, fg: Rgba, attrs: Attr) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.char = ch as u32;
            cell.fg = fg;
            cell.attrs = attrs;
        }
    }

    /// Fill a rectangle's background.
    pub fn fill_bg(&mut self, x: i32, y: i32, width: u16, height: u16, bg: Rgba) {
        for row in y..y + height as i32 {
            for col in x..x + width as i32 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.bg = bg;
                }
            }
        }
    }

    /// Draw a border around a rectangle.
    pub fn draw_border(&mut self, x: i32, y: i32, width: u16, height: u16, style: BorderStyle, fg: Rgba) {
        let Some((h, v, tl, tr, bl, br)) = style.glyphs() else {
            return;
        };
        if width < 2 || height < 2 {
            return;
        }
        let (right, bottom) = (x + width as i32 - 1, y + height as i32 - 1);

        for col in x + 1..right {
            self.put_char(col, y, h, fg, Attr::NONE);
            self.put_char(col, bottom, h, fg, Attr::NONE);
        }
        for row in y + 1..bottom {
            self.put_char(x, row, v, fg, Attr::NONE);
            self.put_char(right, row, v, fg, Attr::NONE);
        }
        self.put_char(x, y, tl, fg, Attr::NONE);
        self.put_char(right, y, tr, fg, Attr::NONE);
        self.put_char(x, bottom, bl, fg, Attr::NONE);
        self.put_char(right, bottom, br, fg, Attr::NONE);
    }

    /// Draw one line of text starting at `(x, y)`, at most `max_width` cells.
    pub fn draw_text(&mut self, x: i32, y: i32, line: &str, max_width: u16, fg: Rgba, attrs: Attr) {
        let mut col = x;
        let end = x + max_width as i32;
        for ch in line.chars() {
            let w = char_width(ch) as i32;
            if w == 0 {
                continue;
            }
            if col + w > end {
                break;
            }
            self.put_char(col, y, ch, fg, attrs);
            if w == 2 {
                if let Some(cell) = self.cell_mut(col + 1, y) {
                    cell.char = CONTINUATION;
                }
            }
            col += w;
        }
    }

    /// Text of one row, continuation cells skipped (for tests and dumps).
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| cell.char != CONTINUATION)
            .filter_map(|cell| char::from_u32(cell.char))
            .collect()
    }
}

// =============================================================================
// Painter
// =============================================================================

/// Inherited paint state.
#[derive(Clone, Copy)]
struct Inherited {
    opacity: f32,
    dx: i32,
    dy: i32,
    fg: Rgba,
}

/// Paint the components laid out in `layout` into a buffer the size of
/// `viewport` (in cells, document coordinates), at clock time `now`.
pub fn paint(layout: &ComputedLayout, viewport: Bounds, now: Duration) -> FrameBuffer {
    let mut buffer = FrameBuffer::new(viewport.width.max(0.0) as u16, viewport.height.max(0.0) as u16);

    let mut indices = get_allocated_indices();
    indices.sort_unstable();

    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for &idx in &indices {
        match core::get_parent_index(idx) {
            Some(parent) => children.entry(parent).or_default().push(idx),
            None => roots.push(idx),
        }
    }

    let painter = Painter {
        layout,
        children: &children,
        scroll_x: viewport.x.round() as i32,
        scroll_y: viewport.y.round() as i32,
        now,
        viewport_px: viewport_px_width(),
    };
    let root_state = Inherited {
        opacity: 1.0,
        dx: 0,
        dy: 0,
        fg: Rgba::TERMINAL_DEFAULT,
    };
    for root in roots {
        painter.component(&mut buffer, root, root_state);
    }
    buffer
}

struct Painter<'a> {
    layout: &'a ComputedLayout,
    children: &'a HashMap<usize, Vec<usize>>,
    scroll_x: i32,
    scroll_y: i32,
    now: Duration,
    viewport_px: f32,
}

impl Painter<'_> {
    fn component(&self, buffer: &mut FrameBuffer, index: usize, parent: Inherited) {
        if !core::get_visible(index) {
            return;
        }
        let Some(bounds) = self.layout.bounds(index) else {
            return;
        };

        let classes = core::get_class_list(index);
        let elapsed = self.now.saturating_sub(core::get_mounted_at(index));
        let animated = resolve_animation(&classes, elapsed, self.viewport_px);
        let (adx, ady) = animated.cell_offset();

        let kind = core::get_component_type(index);
        let pending = kind == ComponentType::Placeholder && is_pending_placeholder(index);

        let own_fg = visual::get_fg_color(index);
        let state = Inherited {
            opacity: parent.opacity * visual::get_opacity(index) * animated.opacity,
            dx: parent.dx + adx,
            dy: parent.dy + ady,
            fg: if own_fg.is_terminal_default() { parent.fg } else { own_fg },
        };

        let x = bounds.x as i32 - self.scroll_x + state.dx;
        let y = bounds.y as i32 - self.scroll_y + state.dy;
        let (w, h) = (bounds.width as u16, bounds.height as u16);

        if pending {
            // Skeleton ignores the placeholder's own (zero) opacity
            paint_shimmer(buffer, x, y, w, h, self.now);
            return;
        }
        if state.opacity <= 0.0 {
            return;
        }
        if !self.overlaps(buffer, x, y, w, h) {
            return;
        }

        let bg = visual::get_bg_color(index);
        if !bg.is_terminal_default() {
            buffer.fill_bg(x, y, w, h, fade(bg, state.opacity));
        }

        match kind {
            ComponentType::Box | ComponentType::Placeholder => {
                let border = visual::get_border(index);
                let color = visual::get_border_color(index);
                let color = if color.is_terminal_default() { state.fg } else { color };
                buffer.draw_border(x, y, w, h, border, fade(color, state.opacity));
            }
            ComponentType::Text => {
                let fg = fade(state.fg, state.opacity);
                let attrs = visual::get_attrs(index);
                let align = text::get_text_align(index);
                for (row, line) in wrap_text(&text::get_text_content(index), w).iter().enumerate() {
                    let indent = align.offset(string_width(line), w);
                    buffer.draw_text(x + indent as i32, y + row as i32, line, w - indent, fg, attrs);
                }
            }
            ComponentType::Canvas => {
                let raster = scene::with_scene(index, |s| scene::rasterize(s, w, h, animated.scale));
                for (i, cell) in raster.iter().flatten().enumerate() {
                    let Some(cell) = cell else { continue };
                    let (col, row) = ((i % w as usize) as i32, (i / w as usize) as i32);
                    buffer.put_char(x + col, y + row, cell.ch, fade(cell.fg, state.opacity), Attr::NONE);
                }
            }
            ComponentType::None => {}
        }

        if let Some(kids) = self.children.get(&index) {
            for &child in kids {
                self.component(buffer, child, state);
            }
        }
    }

    fn overlaps(&self, buffer: &FrameBuffer, x: i32, y: i32, w: u16, h: u16) -> bool {
        x < buffer.width() as i32 && y < buffer.height() as i32 && x + w as i32 > 0 && y + h as i32 > 0
    }
}

/// Apply `opacity` to a foreground color over the terminal background.
fn fade(color: Rgba, opacity: f32) -> Rgba {
    if opacity >= 1.0 {
        return color;
    }
    let base = if color.is_terminal_default() { DEFAULT_FG } else { color };
    base.dim(opacity.clamp(0.0, 1.0))
}

/// Pulsing skeleton bars for a section that has not revealed yet.
fn paint_shimmer(buffer: &mut FrameBuffer, x: i32, y: i32, w: u16, h: u16, now: Duration) {
    let phase = (now.as_secs_f32() / SHIMMER_PERIOD.as_secs_f32()) * TAU;
    // 1.0 → 0.5 → 1.0 over one period
    let pulse = 0.75 + 0.25 * phase.cos();
    let color = Rgba::SHIMMER.dim(0.6 + 0.4 * pulse);

    for row in 0..h as i32 {
        // Title bar, then body bars of varying length, blank every third row
        let len = match row {
            0 => w / 3,
            r if r % 3 == 2 => 0,
            r if r % 2 == 0 => w.saturating_mul(2) / 3,
            _ => w.saturating_sub(4),
        };
        for col in 0..len as i32 {
            buffer.put_char(x + col, y + row, '▒', color, Attr::NONE);
        }
    }
}
