use crate::shared::icons::icon;
use leptos::prelude::*;

/// Collapsible filter panel; the header keeps the pagination visible while
/// the filter body is folded away.
#[component]
pub fn FilterPanel(
    #[prop(into)] is_expanded: RwSignal<bool>,

    /// Shown as a badge next to the title when non-zero.
    #[prop(into)]
    active_filters_count: Signal<usize>,

    #[prop(into)] pagination_controls: ChildrenFn,

    #[prop(into)] filter_content: ChildrenFn,

    /// Chips of the active filters.
    #[prop(optional, into)]
    filter_tags: Option<ChildrenFn>,
) -> impl IntoView {
    let toggle_expanded = move |_| is_expanded.update(|e| *e = !*e);

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div class="filter-panel-header__left" on:click=toggle_expanded>
                    <span
                        class="filter-panel__chevron"
                        class:filter-panel__chevron--expanded=move || is_expanded.get()
                    >
                        {icon("chevron-down")}
                    </span>
                    {icon("filter")}
                    <span class="filter-panel__title">"Filters"</span>
                    {move || {
                        let count = active_filters_count.get();
                        (count > 0).then(|| view! { <span class="badge badge--primary">{count}</span> })
                    }}
                </div>
                <div class="filter-panel-header__center">{pagination_controls()}</div>
            </div>

            <div
                class="filter-panel__collapsible"
                class:filter-panel__collapsible--expanded=move || is_expanded.get()
                class:filter-panel__collapsible--collapsed=move || !is_expanded.get()
            >
                <div class="filter-panel-content">
                    {filter_content()}
                    {filter_tags.as_ref().map(|tags| view! { <div class="filter-panel__tags">{tags()}</div> })}
                </div>
            </div>
        </div>
    }
}

/// One active filter chip.
#[component]
pub fn FilterTag(#[prop(into)] label: String, on_remove: Callback<()>) -> impl IntoView {
    view! {
        <div class="filter-tag">
            <span>{label}</span>
            <span
                class="filter-tag__remove"
                on:click=move |e| {
                    e.stop_propagation();
                    on_remove.run(());
                }
            >
                {icon("x")}
            </span>
        </div>
    }
}
