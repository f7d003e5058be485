//! Subadmin accounts and the capabilities each one holds.

use contracts::shared::list::ListQuery;
use contracts::system::subadmins::Subadmin;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use thaw::*;

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::layout::tabs::tab_labels::SUBADMIN_REGISTER;
use crate::shared::components::PaginationControls;
use crate::shared::dialogs::confirm;
use crate::shared::icons::icon;
use crate::shared::list_controller::{use_list, ServerPaged};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::system::subadmins::api::{self, SubadminSource};

const STORAGE_KEY: &str = "subadmin_list_state_v1";
const PAGE_SIZE: usize = 5;

#[component]
pub fn SubadminList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let list = use_list(
        STORAGE_KEY,
        ListQuery::new("", true, PAGE_SIZE),
        Rc::new(ServerPaged::new(Rc::new(SubadminSource))),
    );
    let controller = list.controller;
    let toasts = list.toasts;
    let loading = list.is_loading();
    let search_signal = RwSignal::new(controller.with_untracked(|c| c.query().search.clone()));

    let delete = move |row: Subadmin| {
        if !confirm(&format!("Remove access for \"{}\"?", row.username)) {
            return;
        }
        spawn_local(async move {
            match api::delete_subadmin(&row.subadmin_id).await {
                Ok(()) => {
                    toasts.success("Subadmin removed");
                    list.refresh();
                }
                Err(e) => toasts.error(e.user_message("Failed to remove subadmin")),
            }
        });
    };

    view! {
        <PageFrame page_id="subadmin--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"User access"</h1>
                    <Badge>
                        {move || controller.with(|c| c.result().total_count.to_string())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| ctx.open_tab(SUBADMIN_REGISTER, &tab_label_for_key(SUBADMIN_REGISTER))
                    >
                        {icon("plus")}
                        " Add subadmin"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| list.refresh()
                        disabled=loading
                    >
                        {icon("refresh")}
                        " Refresh"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <Flex gap=FlexGap::Small align=FlexAlign::Center justify=FlexJustify::SpaceBetween>
                    <Flex gap=FlexGap::Small align=FlexAlign::Center>
                        <div style="flex: 1; max-width: 320px;">
                            <Input value=search_signal placeholder="Search user..." />
                        </div>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| list.search(&search_signal.get_untracked())
                            disabled=loading
                        >
                            {icon("search")}
                            " Search"
                        </Button>
                    </Flex>
                    <PaginationControls
                        current_page=Signal::derive(move || controller.with(|c| c.query().page))
                        total_pages=Signal::derive(move || controller.with(|c| c.result().total_pages))
                        total_count=Signal::derive(move || controller.with(|c| c.result().total_count))
                        page_size=Signal::derive(move || controller.with(|c| c.query().page_size))
                        on_page_change=Callback::new(move |page| list.go_to_page(page))
                        on_page_size_change=Callback::new(move |size| list.set_page_size(size))
                        page_size_options=vec![5, 10, 25]
                        disabled=loading
                    />
                </Flex>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=false min_width=140.0>"Name"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>"Username"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=100.0>"Employee"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=240.0>"Permissions"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=60.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.rows()
                                key=|s| s.subadmin_id.clone()
                                children=move |row| {
                                    let granted = row.granted();
                                    let name = row.name.clone();
                                    let username = row.username.clone();
                                    let employee_id = row.employee_id.clone();
                                    let stored = StoredValue::new(row);
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{name}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{username}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{employee_id}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <div class="permission-chips">
                                                    {granted
                                                        .into_iter()
                                                        .map(|name| view! { <Badge appearance=BadgeAppearance::Tint>{name}</Badge> })
                                                        .collect_view()}
                                                </div>
                                            </TableCell>
                                            <TableCell>
                                                <Button
                                                    size=ButtonSize::Small
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| delete(stored.get_value())
                                                >
                                                    {icon("trash")}
                                                </Button>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || controller.with(|c| c.is_loaded() && c.rows().is_empty())>
                        <div class="table__empty">"No subadmins yet"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}
