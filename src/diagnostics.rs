//! Diagnostics - optional hook for absorbed failure modes.
//!
//! Nothing in the visibility or style core raises. Conditions that a caller
//! might still want to know about (an environment without observation, a
//! gate observing a detached region, a late callback, a duplicate style
//! acquire) are reported here. Without a hook installed they only reach
//! `tracing` at trace level, which is off by default.

use std::cell::RefCell;
use std::rc::Rc;

/// An absorbed condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Observation is unavailable; the session will never report intersection.
    UnsupportedEnvironment { target: usize },
    /// Target region was not attached when observation began.
    InvalidTarget { target: usize },
    /// A change record arrived for a session or gate that was already torn down.
    PrematureCallback { target: usize },
    /// A style id was acquired while already active.
    DuplicateStyleInjection { id: String, ref_count: usize },
    /// A style id was acquired again with different rules; the first rules stay.
    ConflictingStyleText { id: String },
    /// A style id was released more times than it was acquired.
    UnbalancedStyleRelease { id: String },
}

/// Hook type (Rc for cheap cloning out of the thread-local slot).
pub type DiagnosticHook = Rc<dyn Fn(&Diagnostic)>;

thread_local! {
    static HOOK: RefCell<Option<DiagnosticHook>> = const { RefCell::new(None) };
}

/// Install a hook receiving every diagnostic on this thread.
pub fn set_diagnostic_hook(hook: impl Fn(&Diagnostic) + 'static) {
    HOOK.with(|slot| {
        *slot.borrow_mut() = Some(Rc::new(hook));
    });
}

/// Remove the installed hook.
pub fn clear_diagnostic_hook() {
    HOOK.with(|slot| {
        slot.borrow_mut().take();
    });
}

/// Report a diagnostic.
///
/// The hook is cloned out before it runs so it may itself emit or reinstall.
pub fn emit(diagnostic: Diagnostic) {
    tracing::trace!(?diagnostic, "absorbed");

    let hook = HOOK.with(|slot| slot.borrow().clone());
    if let Some(hook) = hook {
        hook(&diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_hook_receives_diagnostics() {
        let seen: Rc<RefCell<Vec<Diagnostic>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        set_diagnostic_hook(move |d| seen_clone.borrow_mut().push(d.clone()));

        emit(Diagnostic::InvalidTarget { target: 3 });
        assert_eq!(seen.borrow().as_slice(), &[Diagnostic::InvalidTarget { target: 3 }]);

        clear_diagnostic_hook();
        emit(Diagnostic::InvalidTarget { target: 4 });
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_emit_without_hook_is_silent() {
        clear_diagnostic_hook();
        emit(Diagnostic::UnsupportedEnvironment { target: 0 });
    }
}
