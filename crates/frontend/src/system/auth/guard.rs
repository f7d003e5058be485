use contracts::system::access::{ActionId, NavSection};
use leptos::prelude::*;

use super::context::use_visibility;

/// Renders children only if the session may see the section
#[component]
pub fn RequireSection(section: NavSection, children: ChildrenFn) -> impl IntoView {
    let visibility = use_visibility();

    view! {
        <Show
            when=move || visibility.with(|v| v.shows(section))
            fallback=|| view! { <div class="alert alert--error">"You do not have access to this page."</div> }
        >
            {children()}
        </Show>
    }
}

/// Renders children only if the session may perform the action; nothing otherwise
#[component]
pub fn RequireAction(action: ActionId, children: ChildrenFn) -> impl IntoView {
    let visibility = use_visibility();

    view! {
        <Show when=move || visibility.with(|v| v.allows(action))>
            {children()}
        </Show>
    }
}
