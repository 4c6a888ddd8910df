use dioxus::prelude::*;

use crate::notify::{Notice, Notifier, Severity};

const TOAST_DISMISS_SECS: u64 = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// Signal-backed implementation of [`Notifier`]: toasts land in a list the
/// host component renders, and fade out on a timer.
#[derive(Clone, Copy, PartialEq)]
pub struct ToastSink {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl ToastSink {
    pub fn new(toasts: Signal<Vec<Toast>>, next_id: Signal<u64>) -> Self {
        Self { toasts, next_id }
    }

    pub fn dismiss(&self, id: u64) {
        let mut toasts = self.toasts;
        toasts.with_mut(|list| list.retain(|toast| toast.id != id));
    }
}

impl Notifier for ToastSink {
    fn notify(&self, notice: Notice) {
        let mut toasts = self.toasts;
        let mut next_id = self.next_id;

        let id = *next_id.peek();
        next_id.set(id + 1);
        toasts.with_mut(|list| list.push(Toast { id, notice }));

        spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(TOAST_DISMISS_SECS)).await;
            toasts.with_mut(|list| list.retain(|toast| toast.id != id));
        });
    }
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "toast-info",
        Severity::Success => "toast-success",
        Severity::Warning => "toast-warning",
        Severity::Error => "toast-error",
    }
}

#[component]
pub fn ToastHost(toasts: Signal<Vec<Toast>>, sink: ToastSink) -> Element {
    rsx! {
        div { class: "toast-host",
            for toast in toasts.read().iter().cloned() {
                div {
                    class: "toast {severity_class(toast.notice.severity)}",
                    key: "{toast.id}",
                    if let Some(title) = toast.notice.title.as_ref() {
                        strong { class: "toast-title", "{title}" }
                    }
                    span { class: "toast-message", "{toast.notice.message}" }
                    button {
                        class: "toast-dismiss",
                        onclick: move |_| sink.dismiss(toast.id),
                        "\u{2715}"
                    }
                }
            }
        }
    }
}
