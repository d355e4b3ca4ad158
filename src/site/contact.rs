//! Contact section body: the form fields, status line and key routing.

use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use spark_signals::{Signal, signal};

use crate::engine::unique_id;
use crate::form::{ContactForm, Field, FormError, SimulatedSubmitter, SubmitStatus};
use crate::primitives::{BoxProps, Cleanup, PropValue, TextProps, box_primitive, text};
use crate::types::{Attr, BorderStyle, Rgba};

/// Shared handle to the contact form and its keyboard engagement.
///
/// Keys only reach the form while it is engaged: Tab engages it (and
/// then cycles fields), Esc leaves it.
#[derive(Clone)]
pub struct FormController {
    form: Rc<ContactForm>,
    engaged: Signal<bool>,
    notice: Signal<String>,
}

impl FormController {
    pub fn new(form: ContactForm) -> Self {
        Self {
            form: Rc::new(form),
            engaged: signal(false),
            notice: signal(String::new()),
        }
    }

    pub fn simulated() -> Self {
        Self::new(ContactForm::new(SimulatedSubmitter::default()))
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.get()
    }

    /// Validation message of the last rejected submit, empty otherwise.
    pub fn notice(&self) -> String {
        self.notice.get()
    }

    /// Advance the form's submission clock.
    pub fn tick(&self, now: Duration) {
        self.form.tick(now);
    }

    pub fn submit(&self, now: Duration) -> Result<(), FormError> {
        let outcome = self.form.submit(now);
        match &outcome {
            Ok(()) => {
                self.notice.set(String::new());
            }
            Err(error) => {
                self.notice.set(error.to_string());
            }
        }
        outcome
    }

    /// Route a key to the form. Returns true when the key was consumed.
    pub fn handle_key(&self, key: &KeyEvent, now: Duration) -> bool {
        if !self.engaged.get() {
            if key.code == KeyCode::Tab {
                self.engaged.set(true);
                return true;
            }
            return false;
        }

        match key.code {
            KeyCode::Esc => {
                self.engaged.set(false);
            }
            KeyCode::Tab => self.form.focus_next(),
            KeyCode::BackTab => self.form.focus_previous(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => {
                if let Err(error) = self.submit(now) {
                    tracing::debug!(%error, "form rejected");
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.type_char(ch)
            }
            _ => return false,
        }
        true
    }
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("engaged", &self.engaged.get())
            .field("status", &self.form.status())
            .finish()
    }
}

fn status_label(status: SubmitStatus) -> &'static str {
    match status {
        SubmitStatus::Idle => "[ Send Message ]",
        SubmitStatus::Submitting => "[ Sending... ]",
        SubmitStatus::Success => "Message sent! I'll get back to you soon.",
        SubmitStatus::Error => "Something went wrong. Please try again.",
    }
}

/// Build the form under the current parent.
pub(super) fn form_body(controller: &FormController) -> Cleanup {
    let controller = controller.clone();
    box_primitive(BoxProps {
        id: Some(unique_id("contact-form")),
        class: Some("contact-form".into()),
        border: Some(BorderStyle::Single),
        border_color: Some(Rgba::PLUM),
        padding: Some(1),
        children: Some(Box::new(move || {
            for field in Field::ALL {
                let value = controller.form.field(field);
                let focus = controller.form.focus_signal();
                let engaged = controller.engaged.clone();
                text(TextProps {
                    content: PropValue::Getter(Rc::new(move || {
                        let active = engaged.get() && focus.get() == field;
                        let marker = if active { '›' } else { ' ' };
                        let caret = if active { "▏" } else { "" };
                        format!("{marker} {:<8}{}{caret}", format!("{field}:"), value.get())
                    })),
                    ..Default::default()
                });
            }

            let status = controller.form.status_signal();
            let status_for_fg = status.clone();
            text(TextProps {
                content: PropValue::Getter(Rc::new(move || status_label(status.get()).to_string())),
                fg: Some(PropValue::Getter(Rc::new(move || match status_for_fg.get() {
                    SubmitStatus::Success => Rgba::LAVENDER,
                    SubmitStatus::Error => Rgba::ORCHID,
                    _ => Rgba::TERMINAL_DEFAULT,
                }))),
                attrs: Some(Attr::BOLD),
                ..Default::default()
            });

            let notice = controller.notice.clone();
            text(TextProps {
                content: notice.into(),
                fg: Some(Rgba::ORCHID.into()),
                attrs: Some(Attr::ITALIC),
                ..Default::default()
            });
        })),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_keys_ignored_until_engaged() {
        let controller = FormController::simulated();
        assert!(!controller.handle_key(&press(KeyCode::Char('a')), Duration::ZERO));
        assert_eq!(controller.form().value(Field::Name), "");

        assert!(controller.handle_key(&press(KeyCode::Tab), Duration::ZERO));
        assert!(controller.is_engaged());
        assert!(controller.handle_key(&press(KeyCode::Char('a')), Duration::ZERO));
        assert_eq!(controller.form().value(Field::Name), "a");
    }

    #[test]
    fn test_tab_cycles_and_esc_leaves() {
        let controller = FormController::simulated();
        controller.handle_key(&press(KeyCode::Tab), Duration::ZERO);
        controller.handle_key(&press(KeyCode::Tab), Duration::ZERO);
        assert_eq!(controller.form().focused(), Field::Email);
        controller.handle_key(&press(KeyCode::BackTab), Duration::ZERO);
        assert_eq!(controller.form().focused(), Field::Name);

        assert!(controller.handle_key(&press(KeyCode::Esc), Duration::ZERO));
        assert!(!controller.is_engaged());
        assert!(!controller.handle_key(&press(KeyCode::Esc), Duration::ZERO));
    }

    #[test]
    fn test_rejected_submit_sets_notice() {
        let controller = FormController::simulated();
        controller.handle_key(&press(KeyCode::Tab), Duration::ZERO);
        controller.handle_key(&press(KeyCode::Enter), Duration::ZERO);
        assert_eq!(controller.notice(), "Name is required");
        assert_eq!(controller.form().status(), SubmitStatus::Idle);
    }

    #[test]
    fn test_accepted_submit_clears_notice() {
        let controller = FormController::simulated();
        controller.handle_key(&press(KeyCode::Tab), Duration::ZERO);
        controller.form().type_str("Ada");
        controller.form().focus(Field::Email);
        controller.form().type_str("ada@example.com");
        controller.form().focus(Field::Message);
        controller.form().type_str("Hello");

        controller.handle_key(&press(KeyCode::Enter), Duration::from_secs(1));
        assert_eq!(controller.notice(), "");
        assert_eq!(controller.form().status(), SubmitStatus::Submitting);

        controller.tick(Duration::from_secs(3));
        assert_eq!(controller.form().status(), SubmitStatus::Success);
    }
}
