//! Contact form - fields, focus, and a simulated submission.
//!
//! Field values, focus and status are signals, so the contact section binds
//! them straight into text components. Submission is driven by the frame
//! clock: [`ContactForm::submit`] validates and enters `Submitting`,
//! [`ContactForm::tick`] hands the message to the [`Submitter`] once the
//! simulated delay has passed and later returns the status to `Idle`.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use spark_signals::{Signal, signal};
use thiserror::Error;

/// Simulated network delay before the submitter runs.
pub const SUBMIT_DELAY: Duration = Duration::from_secs(2);

/// How long a success or error status stays up.
pub const STATUS_HOLD: Duration = Duration::from_secs(5);

/// Form fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Message => "Message",
        }
    }

    fn next(self) -> Self {
        match self {
            Field::Name => Field::Email,
            Field::Email => Field::Message,
            Field::Message => Field::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::Name => Field::Message,
            Field::Email => Field::Name,
            Field::Message => Field::Email,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Why a submission was not accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(Field),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("a submission is already in progress")]
    Busy,

    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// Snapshot of the fields handed to a [`Submitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Destination of accepted submissions.
pub trait Submitter {
    fn deliver(&mut self, submission: &Submission) -> Result<(), FormError>;
}

/// Logs the submission and reports success.
#[derive(Debug, Default)]
pub struct SimulatedSubmitter {
    delivered: usize,
}

impl SimulatedSubmitter {
    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl Submitter for SimulatedSubmitter {
    fn deliver(&mut self, submission: &Submission) -> Result<(), FormError> {
        self.delivered += 1;
        tracing::info!(
            name = %submission.name,
            email = %submission.email,
            message_len = submission.message.len(),
            "form submitted"
        );
        Ok(())
    }
}

/// The contact form.
pub struct ContactForm {
    name: Signal<String>,
    email: Signal<String>,
    message: Signal<String>,
    focus: Signal<Field>,
    status: Signal<SubmitStatus>,
    /// Clock time the current status was entered.
    status_since: Cell<Duration>,
    pending: RefCell<Option<Submission>>,
    submitter: RefCell<Box<dyn Submitter>>,
}

impl ContactForm {
    pub fn new(submitter: impl Submitter + 'static) -> Self {
        Self {
            name: signal(String::new()),
            email: signal(String::new()),
            message: signal(String::new()),
            focus: signal(Field::Name),
            status: signal(SubmitStatus::Idle),
            status_since: Cell::new(Duration::ZERO),
            pending: RefCell::new(None),
            submitter: RefCell::new(Box::new(submitter)),
        }
    }

    fn field_signal(&self, field: Field) -> &Signal<String> {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    /// Live value of `field` (clone of the signal, for binding).
    pub fn field(&self, field: Field) -> Signal<String> {
        self.field_signal(field).clone()
    }

    pub fn value(&self, field: Field) -> String {
        self.field_signal(field).get()
    }

    pub fn focus_signal(&self) -> Signal<Field> {
        self.focus.clone()
    }

    pub fn focused(&self) -> Field {
        self.focus.get()
    }

    pub fn status_signal(&self) -> Signal<SubmitStatus> {
        self.status.clone()
    }

    pub fn status(&self) -> SubmitStatus {
        self.status.get()
    }

    pub fn focus(&self, field: Field) {
        self.focus.set(field);
    }

    pub fn focus_next(&self) {
        self.focus.set(self.focus.get().next());
    }

    pub fn focus_previous(&self) {
        self.focus.set(self.focus.get().previous());
    }

    fn editable(&self) -> bool {
        self.status.get() != SubmitStatus::Submitting
    }

    /// Append `ch` to the focused field. Ignored while submitting.
    pub fn type_char(&self, ch: char) {
        if !self.editable() || ch.is_control() {
            return;
        }
        let field = self.field_signal(self.focus.get());
        let mut value = field.get();
        value.push(ch);
        field.set(value);
    }

    pub fn type_str(&self, text: &str) {
        text.chars().for_each(|ch| self.type_char(ch));
    }

    /// Remove the last character of the focused field.
    pub fn backspace(&self) {
        if !self.editable() {
            return;
        }
        let field = self.field_signal(self.focus.get());
        let mut value = field.get();
        if value.pop().is_some() {
            field.set(value);
        }
    }

    /// Validate and start a submission at clock time `now`.
    pub fn submit(&self, now: Duration) -> Result<(), FormError> {
        if self.status.get() == SubmitStatus::Submitting {
            return Err(FormError::Busy);
        }
        let submission = self.validate()?;

        tracing::debug!("form submitting");
        *self.pending.borrow_mut() = Some(submission);
        self.enter(SubmitStatus::Submitting, now);
        Ok(())
    }

    fn validate(&self) -> Result<Submission, FormError> {
        for field in Field::ALL {
            if self.value(field).trim().is_empty() {
                return Err(FormError::Missing(field));
            }
        }
        let email = self.value(Field::Email).trim().to_string();
        if !looks_like_email(&email) {
            return Err(FormError::InvalidEmail(email));
        }
        Ok(Submission {
            name: self.value(Field::Name).trim().to_string(),
            email,
            message: self.value(Field::Message),
        })
    }

    /// Advance the submission to clock time `now`.
    pub fn tick(&self, now: Duration) {
        let since = now.saturating_sub(self.status_since.get());
        match self.status.get() {
            SubmitStatus::Submitting if since >= SUBMIT_DELAY => self.finish(now),
            SubmitStatus::Success | SubmitStatus::Error if since >= STATUS_HOLD => {
                self.enter(SubmitStatus::Idle, now);
            }
            _ => {}
        }
    }

    fn finish(&self, now: Duration) {
        let Some(submission) = self.pending.borrow_mut().take() else {
            self.enter(SubmitStatus::Idle, now);
            return;
        };

        let outcome = self.submitter.borrow_mut().deliver(&submission);
        match outcome {
            Ok(()) => {
                for field in Field::ALL {
                    self.field_signal(field).set(String::new());
                }
                self.enter(SubmitStatus::Success, now);
            }
            Err(error) => {
                tracing::warn!(%error, "form submission failed");
                self.enter(SubmitStatus::Error, now);
            }
        }
    }

    fn enter(&self, status: SubmitStatus, now: Duration) {
        self.status_since.set(now);
        self.status.set(status);
    }
}

impl std::fmt::Debug for ContactForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactForm")
            .field("focus", &self.focus.get())
            .field("status", &self.status.get())
            .finish_non_exhaustive()
    }
}

/// `local@domain.tld` with no spaces.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
