//! Mount API - terminal lifecycle, event loop and render effect.
//!
//! Each tick produces one frame from the [`Page`] and publishes it through
//! a signal; the one render effect watches that signal and hands the frame
//! to the diff renderer.
//!
//! # Example
//!
//! ```ignore
//! use folio_tui::pipeline::{mount, run, Page};
//!
//! let mut handle = mount(Page::new(), 30)?;
//! run(&mut handle)?;  // Blocks until q / Ctrl+C
//! handle.unmount()?;
//! ```

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use spark_signals::{Signal, effect, signal};

use crate::renderer::DiffRenderer;

use super::frame::FrameBuffer;
use super::page::Page;
use super::terminal::{detect_terminal_size, set_terminal_size};

/// Application key handler; returns true when it consumed the key.
pub type KeyHandler = Box<dyn FnMut(&KeyEvent, &mut Page) -> bool>;

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by mount() that owns the page and the terminal state.
pub struct MountHandle {
    stop_effect: Option<Box<dyn FnOnce()>>,
    running: Arc<AtomicBool>,
    page: Page,
    frame: Signal<FrameBuffer>,
    renderer: Rc<RefCell<DiffRenderer>>,
    started: Instant,
    frame_interval: Duration,
    key_handler: Option<KeyHandler>,
    restored: bool,
}

impl MountHandle {
    /// Stop rendering and restore the terminal.
    pub fn unmount(mut self) -> io::Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.running.store(false, Ordering::SeqCst);

        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
        self.renderer.borrow_mut().exit_fullscreen()?;
        disable_raw_mode()?;
        tracing::debug!(frames = self.page.frames(), "unmounted");
        Ok(())
    }

    /// Check if still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the application (sets running to false).
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Route keys to `handler` before the built-in scrolling keys.
    pub fn set_key_handler(&mut self, handler: impl FnMut(&KeyEvent, &mut Page) -> bool + 'static) {
        self.key_handler = Some(Box::new(handler));
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        // Best effort; unmount() reports errors
        let _ = self.restore();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount `page` fullscreen, drawing at most `fps` frames per second.
///
/// This sets up:
/// 1. Terminal size detection and raw mode
/// 2. The alternate screen
/// 3. The render effect watching the frame signal
pub fn mount(mut page: Page, fps: u32) -> io::Result<MountHandle> {
    detect_terminal_size();
    enable_raw_mode()?;

    let renderer = Rc::new(RefCell::new(DiffRenderer::new()));
    if let Err(error) = renderer.borrow_mut().enter_fullscreen() {
        let _ = disable_raw_mode();
        return Err(error);
    }

    let running = Arc::new(AtomicBool::new(true));
    let frame = signal(page.frame(Duration::ZERO));

    // The ONE render effect
    let stop_fn = {
        let frame = frame.clone();
        let renderer = renderer.clone();
        let running = running.clone();
        effect(move || {
            let buffer = frame.get();
            if !running.load(Ordering::SeqCst) {
                return;
            }
            if let Err(error) = renderer.borrow_mut().render(&buffer) {
                tracing::warn!(%error, "render failed");
            }
        })
    };

    tracing::debug!(fps, "mounted");
    Ok(MountHandle {
        stop_effect: Some(Box::new(stop_fn)),
        running,
        page,
        frame,
        renderer,
        started: Instant::now(),
        frame_interval: Duration::from_secs(1) / fps.max(1),
        key_handler: None,
        restored: false,
    })
}

// =============================================================================
// Event Loop
// =============================================================================

/// Handle pending input, then produce and publish one frame.
///
/// Returns `Ok(false)` once the application should stop.
pub fn tick(handle: &mut MountHandle) -> io::Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    if event::poll(handle.frame_interval)? {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(handle, &key),
            Event::Resize(width, height) => {
                set_terminal_size(width, height);
                handle.renderer.borrow_mut().invalidate();
            }
            _ => {}
        }
    }
    if !handle.is_running() {
        return Ok(false);
    }

    let now = handle.started.elapsed();
    let buffer = handle.page.frame(now);
    handle.frame.set(buffer);
    Ok(handle.is_running())
}

/// Run the event loop (blocking until stopped).
pub fn run(handle: &mut MountHandle) -> io::Result<()> {
    while tick(handle)? {}
    Ok(())
}

fn handle_key(handle: &mut MountHandle, key: &KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        handle.stop();
        return;
    }
    if let Some(handler) = handle.key_handler.as_mut() {
        if handler(key, &mut handle.page) {
            return;
        }
    }
    if !apply_default_key(&mut handle.page, key) && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
        handle.stop();
    }
}

/// Built-in scrolling keys. Returns true when the key scrolled.
pub fn apply_default_key(page: &mut Page, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => page.scroll_by(-1),
        KeyCode::Down | KeyCode::Char('j') => page.scroll_by(1),
        KeyCode::PageUp => page.page_by(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => page.page_by(1),
        KeyCode::Home | KeyCode::Char('g') => page.scroll_to(0),
        KeyCode::End | KeyCode::Char('G') => page.scroll_to_end(),
        _ => return false,
    }
    true
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::arrays::{core, sizing};
    use crate::engine::{allocate_index, reset_registry};
    use crate::pipeline::terminal::set_terminal_size;
    use crate::types::{ComponentType, Dimension};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_keys_scroll() {
        reset_registry();
        set_terminal_size(40, 10);
        let root = allocate_index(None);
        core::set_component_type(root, ComponentType::Box);
        sizing::set_height(root, Dimension::Cells(50));

        let mut page = Page::new();
        page.frame(Duration::ZERO);

        assert!(apply_default_key(&mut page, &press(KeyCode::Down)));
        assert_eq!(page.scroll(), 1);
        assert!(apply_default_key(&mut page, &press(KeyCode::PageDown)));
        assert_eq!(page.scroll(), 10);
        assert!(apply_default_key(&mut page, &press(KeyCode::End)));
        assert_eq!(page.scroll(), 40);
        assert!(apply_default_key(&mut page, &press(KeyCode::Char('g'))));
        assert_eq!(page.scroll(), 0);
        assert!(!apply_default_key(&mut page, &press(KeyCode::Char('x'))));
    }
}
