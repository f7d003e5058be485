//! Blocking browser dialogs for confirmations and one-line inputs.

/// `window.confirm`; false when there is no window.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// `window.prompt`; `None` when cancelled. The text is trimmed.
pub fn prompt(message: &str) -> Option<String> {
    web_sys::window()
        .and_then(|w| w.prompt_with_message(message).ok().flatten())
        .map(|text| text.trim().to_string())
}

/// `window.alert`.
pub fn alert(message: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(message);
    }
}
