//! Toast notifications
//!
//! `ToastService` is provided once by `App`; pages push messages and
//! `ToastHost` renders them in a corner stack. Each toast dismisses itself
//! after [`TOAST_TTL_MS`].

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub const TOAST_TTL_MS: u32 = 4_000;
const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast--success",
            ToastKind::Error => "toast toast--error",
            ToastKind::Warning => "toast toast--warning",
            ToastKind::Info => "toast toast--info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Ordered toasts, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    items: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    /// Returns the new toast's id. Identical back-to-back messages collapse
    /// into the visible one.
    pub fn push(&mut self, kind: ToastKind, message: String) -> u64 {
        if let Some(last) = self.items.last() {
            if last.kind == kind && last.message == message {
                return last.id;
            }
        }
        self.next_id += 1;
        self.items.push(Toast {
            id: self.next_id,
            kind,
            message,
        });
        if self.items.len() > MAX_VISIBLE {
            self.items.remove(0);
        }
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

#[derive(Clone, Copy)]
pub struct ToastService {
    queue: RwSignal<ToastQueue>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::default()),
        }
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            ToastKind::Error => log::error!("toast: {}", message),
            ToastKind::Warning => log::warn!("toast: {}", message),
            _ => log::info!("toast: {}", message),
        }
        let Some(id) = self.queue.try_update(|q| q.push(kind, message)) else {
            return;
        };
        let svc = *self;
        spawn_local(async move {
            TimeoutFuture::new(TOAST_TTL_MS).await;
            svc.dismiss(id);
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(ToastKind::Warning, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(ToastKind::Info, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.try_update(|q| q.dismiss(id));
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_toasts() -> ToastService {
    use_context::<ToastService>().expect("ToastService not provided in context")
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let svc = use_toasts();

    view! {
        <div class="toast-stack">
            <For
                each=move || svc.queue.with(|q| q.items().to_vec())
                key=|t| t.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() role="status">
                            <span class="toast__message">{toast.message}</span>
                            <button class="toast__close" on:click=move |_| svc.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_dismiss() {
        let mut q = ToastQueue::default();
        let a = q.push(ToastKind::Success, "Saved".into());
        let b = q.push(ToastKind::Error, "Failed".into());
        assert_ne!(a, b);
        q.dismiss(a);
        assert_eq!(q.items().len(), 1);
        assert_eq!(q.items()[0].message, "Failed");
        q.dismiss(999);
        assert_eq!(q.items().len(), 1);
    }

    #[test]
    fn repeated_message_collapses() {
        let mut q = ToastQueue::default();
        let a = q.push(ToastKind::Warning, "No rows selected".into());
        let b = q.push(ToastKind::Warning, "No rows selected".into());
        assert_eq!(a, b);
        assert_eq!(q.items().len(), 1);
        q.push(ToastKind::Error, "No rows selected".into());
        assert_eq!(q.items().len(), 2);
    }

    #[test]
    fn oldest_toast_drops_when_full() {
        let mut q = ToastQueue::default();
        for i in 0..7 {
            q.push(ToastKind::Info, format!("m{i}"));
        }
        assert_eq!(q.items().len(), MAX_VISIBLE);
        assert_eq!(q.items()[0].message, "m2");
    }
}
