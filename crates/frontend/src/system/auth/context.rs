use contracts::system::access::{resolve_visibility, ActionId, Visibility};
use contracts::system::auth::Session;
use leptos::prelude::*;

use super::{api, storage};

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

/// Auth context provider component
///
/// Restores the stored session synchronously so the first render already
/// knows whether to show the login page, and derives the visibility once for
/// the whole tree.
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let session = RwSignal::new(storage::load_session());
    let visibility = Memo::new(move |_| session.with(resolve_visibility));

    log::info!(
        "session restored: {}",
        session.with_untracked(|s| s.role.map(|r| r.as_str()).unwrap_or("anonymous"))
    );

    provide_context(session);
    provide_context(visibility);

    children()
}

/// Hook to access the session signal
pub fn use_session() -> RwSignal<Session> {
    use_context::<RwSignal<Session>>().expect("AuthProvider not found in component tree")
}

/// Hook to access the resolved sections and actions
pub fn use_visibility() -> Memo<Visibility> {
    use_context::<Memo<Visibility>>().expect("AuthProvider not found in component tree")
}

/// Reactive check of one action for the current session
pub fn can(action: ActionId) -> Signal<bool> {
    let visibility = use_visibility();
    Signal::derive(move || visibility.with(|v| v.allows(action)))
}

/// Rejects blank credentials before any request goes out.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Email and password are required");
    }
    Ok(())
}

/// Helper: Perform login
pub async fn do_login(session: RwSignal<Session>, email: String, password: String) -> Result<(), String> {
    validate_credentials(&email, &password)?;
    let data = api::login(email.trim().to_string(), password)
        .await
        .map_err(|e| e.user_message(LOGIN_FAILED))?;

    let restored = Session::from_login(&data);
    if !restored.is_authenticated() {
        return Err(LOGIN_FAILED.to_string());
    }
    storage::save_session(&restored);
    log::info!("logged in as {}", restored.role.map(|r| r.as_str()).unwrap_or("?"));
    session.set(restored);
    Ok(())
}

/// Helper: Perform logout
pub fn do_logout(session: RwSignal<Session>) {
    storage::clear_session();
    session.set(Session::anonymous());
    log::info!("logged out");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credentials_are_rejected() {
        assert!(validate_credentials("", "secret").is_err());
        assert!(validate_credentials("   ", "secret").is_err());
        assert!(validate_credentials("a@b.c", "").is_err());
        assert!(validate_credentials("a@b.c", "secret").is_ok());
    }
}
