//! Top bar: sidebar toggle, application title, signed-in user and logout.

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::{do_logout, use_session};
use contracts::system::auth::Session;
use leptos::prelude::*;

/// Name shown in the header: display name, else role, else the admin id.
fn user_caption(session: &Session) -> String {
    session
        .display_name
        .clone()
        .or_else(|| session.role.map(|r| r.as_str().to_string()))
        .or_else(|| session.admin_id.clone())
        .unwrap_or_else(|| "Guest".to_string())
}

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let session = use_session();
    let toasts = use_toasts();

    let is_sidebar_visible = move || ctx.left_open.get();

    let logout = move |_| {
        ctx.reset();
        do_logout(session);
        toasts.info("Signed out");
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if is_sidebar_visible() { "Hide navigation" } else { "Show navigation" }
                >
                    {move || if is_sidebar_visible() {
                        icon("panel-left-close")
                    } else {
                        icon("panel-left-open")
                    }}
                </button>
                <span class="top-header__title">"Office Admin"</span>
            </div>

            <div class="top-header__actions">
                <div class="top-header__user">
                    {icon("user")}
                    <span>{move || session.with(user_caption)}</span>
                </div>

                <button class="top-header__icon-btn" on:click=logout title="Sign out">
                    {icon("log-out")}
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::auth::Role;

    #[test]
    fn caption_prefers_display_name() {
        let mut session = Session {
            role: Some(Role::Subadmin),
            display_name: Some("Asha".into()),
            ..Session::anonymous()
        };
        assert_eq!(user_caption(&session), "Asha");
        session.display_name = None;
        assert_eq!(user_caption(&session), "subadmin");
        assert_eq!(user_caption(&Session::anonymous()), "Guest");
    }
}
