//! Fire-and-forget user-visible notifications. Anything that needs to
//! notify takes a `Notifier` explicitly; there is no ambient global sink.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub title: Option<String>,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);

    fn info(&self, message: impl Into<String>) {
        self.notify(Notice::new(Severity::Info, message));
    }

    fn success(&self, message: impl Into<String>) {
        self.notify(Notice::new(Severity::Success, message));
    }

    fn warning(&self, message: impl Into<String>) {
        self.notify(Notice::new(Severity::Warning, message));
    }

    fn error(&self, message: impl Into<String>) {
        self.notify(Notice::new(Severity::Error, message));
    }
}

/// Sink that drops everything; handy in tests and headless paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notice: Notice) {}
}
