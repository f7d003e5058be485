pub mod center;
pub mod global_context;
pub mod left;
pub mod tabs;
pub mod top_header;

use global_context::AppGlobalContext;
use leptos::prelude::*;
use top_header::TopHeader;

/// Signed-in application frame.
///
/// ```text
/// +--------------------------+
/// |        TopHeader         |
/// +--------------------------+
/// |  Sidebar  |  Tab pages   |
/// |  (left)   |  (center)    |
/// +--------------------------+
/// ```
///
/// The left zone collapses with the header toggle; the center zone scrolls.
#[component]
pub fn Shell<L, C>(left: L, center: C) -> impl IntoView
where
    L: Fn() -> AnyView + 'static + Send,
    C: Fn() -> AnyView + 'static + Send,
{
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <div class="app-layout">
            <TopHeader />
            <div class="app-body">
                <nav data-zone="left" class="left" class:hidden=move || !ctx.left_open.get()>
                    {left()}
                </nav>
                <main data-zone="center" class="app-main app-tabs" style="flex: 1; overflow: auto;">
                    {center()}
                </main>
            </div>
        </div>
    }
}
