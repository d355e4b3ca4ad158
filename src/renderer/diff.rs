//! Differential renderer for fullscreen mode.
//!
//! The DiffRenderer compares the current frame to the previous frame and only
//! outputs cells that have changed, as crossterm commands.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each cell in the new frame:
//!    - If previous frame exists, has the same size, and the cell is unchanged: skip
//!    - Otherwise: move (only when not already there), set changed style, print
//! 3. Flush once
//! 4. Store current frame as previous for next comparison

use std::io::{self, Write};

use crossterm::{
    QueueableCommand,
    cursor::{Hide, MoveTo, Show},
    style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::pipeline::frame::{CONTINUATION, FrameBuffer};
use crate::types::{Attr, Cell, Rgba};

/// Convert a color to crossterm, terminal default as `Reset`.
fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r.clamp(0, 255) as u8,
            g: color.g.clamp(0, 255) as u8,
            b: color.b.clamp(0, 255) as u8,
        }
    }
}

const ATTRIBUTES: [(Attr, Attribute); 8] = [
    (Attr::BOLD, Attribute::Bold),
    (Attr::DIM, Attribute::Dim),
    (Attr::ITALIC, Attribute::Italic),
    (Attr::UNDERLINE, Attribute::Underlined),
    (Attr::BLINK, Attribute::SlowBlink),
    (Attr::INVERSE, Attribute::Reverse),
    (Attr::HIDDEN, Attribute::Hidden),
    (Attr::STRIKETHROUGH, Attribute::CrossedOut),
];

/// Terminal style state, so unchanged colors and attributes are not re-sent.
#[derive(Default)]
struct PenState {
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Option<Attr>,
    /// Where the terminal cursor is after the last print.
    cursor: Option<(u16, u16)>,
}

/// Differential renderer for fullscreen mode.
///
/// Keeps track of the previous frame to enable diff-based rendering.
/// Only cells that have changed since the last frame are output.
#[derive(Default)]
pub struct DiffRenderer {
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a frame to stdout, outputting only changed cells.
    ///
    /// Returns true if any cells were changed.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        let written = self.write_frame(&mut stdout, buffer)?;
        Ok(written > 0)
    }

    /// Write the changed cells of `buffer` to `out`; returns how many cells
    /// were written.
    pub fn write_frame<W: Write>(&mut self, out: &mut W, buffer: &FrameBuffer) -> io::Result<usize> {
        let (width, height) = (buffer.width(), buffer.height());
        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);

        out.queue(BeginSynchronizedUpdate)?;
        if previous.is_none() {
            // Size changed or first frame: start from a clean screen
            out.queue(SetAttribute(Attribute::Reset))?;
            out.queue(Clear(ClearType::All))?;
        }

        let mut pen = PenState::default();
        let mut written = 0;
        for y in 0..height {
            for x in 0..width {
                let Some(cell) = buffer.get(x, y) else { continue };
                if cell.char == CONTINUATION {
                    continue;
                }
                let unchanged = previous.and_then(|prev| prev.get(x, y)).is_some_and(|prev| prev == cell);
                if unchanged {
                    continue;
                }
                write_cell(out, &mut pen, x, y, cell)?;
                written += 1;
            }
        }

        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(EndSynchronizedUpdate)?;
        out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(written)
    }

    /// Invalidate the previous frame.
    ///
    /// Next render will be a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Check if we have a previous frame to diff against.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Enter fullscreen mode (alternate screen buffer).
    pub fn enter_fullscreen(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.queue(EnterAlternateScreen)?;
        stdout.queue(Hide)?;
        stdout.queue(Clear(ClearType::All))?;
        stdout.flush()?;
        self.invalidate();
        Ok(())
    }

    /// Exit fullscreen mode.
    pub fn exit_fullscreen(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.queue(SetAttribute(Attribute::Reset))?;
        stdout.queue(Show)?;
        stdout.queue(LeaveAlternateScreen)?;
        stdout.flush()
    }
}

fn write_cell<W: Write>(out: &mut W, pen: &mut PenState, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
    if pen.cursor != Some((x, y)) {
        out.queue(MoveTo(x, y))?;
    }

    if pen.attrs != Some(cell.attrs) {
        // Reset clears colors too
        out.queue(SetAttribute(Attribute::Reset))?;
        for (flag, attribute) in ATTRIBUTES {
            if cell.attrs.contains(flag) {
                out.queue(SetAttribute(attribute))?;
            }
        }
        pen.attrs = Some(cell.attrs);
        pen.fg = None;
        pen.bg = None;
    }
    if pen.fg != Some(cell.fg) {
        out.queue(SetForegroundColor(to_color(cell.fg)))?;
        pen.fg = Some(cell.fg);
    }
    if pen.bg != Some(cell.bg) {
        out.queue(SetBackgroundColor(to_color(cell.bg)))?;
        pen.bg = Some(cell.bg);
    }

    let ch = char::from_u32(cell.char).unwrap_or(' ');
    out.queue(Print(ch))?;
    let advance = crate::layout::char_width(ch).max(1);
    pen.cursor = Some((x.saturating_add(advance), y));
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(text: &str) -> FrameBuffer {
        let mut buffer = FrameBuffer::new(10, 2);
        buffer.draw_text(0, 0, text, 10, Rgba::WHITE, Attr::NONE);
        buffer
    }

    #[test]
    fn test_first_frame_writes_everything() {
        let mut renderer = DiffRenderer::new();
        let mut out = Vec::new();
        let written = renderer.write_frame(&mut out, &frame_with("hi")).unwrap();
        assert_eq!(written, 20);
        assert!(renderer.has_previous());
        assert!(String::from_utf8_lossy(&out).contains("hi"));
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let mut renderer = DiffRenderer::new();
        let mut out = Vec::new();
        renderer.write_frame(&mut out, &frame_with("hi")).unwrap();
        let written = renderer.write_frame(&mut out, &frame_with("hi")).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn test_only_changed_cells_written() {
        let mut renderer = DiffRenderer::new();
        let mut out = Vec::new();
        renderer.write_frame(&mut out, &frame_with("hello")).unwrap();

        let mut out = Vec::new();
        let written = renderer.write_frame(&mut out, &frame_with("help")).unwrap();
        // 'p' replaces 'l', 'o' becomes blank
        assert_eq!(written, 2);
    }

    #[test]
    fn test_resize_forces_full_redraw() {
        let mut renderer = DiffRenderer::new();
        let mut out = Vec::new();
        renderer.write_frame(&mut out, &frame_with("hi")).unwrap();

        let written = renderer.write_frame(&mut out, &FrameBuffer::new(4, 1)).unwrap();
        assert_eq!(written, 4);
    }

    #[test]
    fn test_invalidate() {
        let mut renderer = DiffRenderer::new();
        let mut out = Vec::new();
        renderer.write_frame(&mut out, &frame_with("x")).unwrap();
        renderer.invalidate();
        assert!(!renderer.has_previous());
    }

    #[test]
    fn test_terminal_default_is_reset() {
        assert_eq!(to_color(Rgba::TERMINAL_DEFAULT), Color::Reset);
        assert_eq!(to_color(Rgba::rgb(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }
}
