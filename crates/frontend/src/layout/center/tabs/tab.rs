use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

/// One entry of the tab bar.
#[component]
pub fn Tab(tab: TabData) -> impl IntoView {
    let tabs_store = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    let title = tab.title;
    let key = StoredValue::new(tab.key);
    let is_active = Memo::new(move |_| {
        let active = tabs_store.active.get();
        key.with_value(|k| active.as_deref() == Some(k.as_str()))
    });

    let on_click = move |_| key.with_value(|k| tabs_store.activate_tab(k));
    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        key.with_value(|k| tabs_store.close_tab(k));
    };

    view! {
        <div class="tab" class:active=is_active on:click=on_click title=title.clone()>
            <span>{title.clone()}</span>
            <button class="tab-close" on:click=on_close aria-label="Close tab">
                {icon("x")}
            </button>
        </div>
    }
}
