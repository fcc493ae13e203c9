//! Devices table. Its search, filter, sort and paging state lives in the
//! URL query string, so every view can be bookmarked and survives a reload.

use std::rc::Rc;

use chrono::Local;
use common::{
    paginate,
    req::{Device, DeviceType},
    search_params::PAGE_SIZES,
    table::{cell_text, page_items, TableColumn, COLUMNS},
    PageItem, TablePage, TableParams,
};
use log::{debug, error};
use yew::prelude::*;
use yew_router::prelude::*;

use super::{
    delete_device::DeleteDeviceModal,
    device_form::{DeviceFormModal, FormMode},
    export::ExportRecordsModal,
};
use crate::{auth::use_auth, config::AppConfig, hooks::use_devices, utils, Route};

#[derive(Clone, PartialEq)]
enum Dialog {
    Add,
    Edit(Device),
    Export(Device),
    Delete(Device),
}

fn sort_marker(params: &TableParams, column: &TableColumn) -> &'static str {
    if !column.allows_sorting {
        ""
    } else if params.order_by != column.key {
        " ⇅"
    } else if params.order.is_desc() {
        " ▼"
    } else {
        " ▲"
    }
}

#[function_component(DeviceTable)]
pub fn device_table() -> Html {
    let config = use_context::<Rc<AppConfig>>().expect("no app config");
    let auth = use_auth();
    let location = use_location();
    let navigator = use_navigator();
    let devices = use_devices();
    let dialog = use_state(|| None::<Dialog>);

    let params = TableParams::decode(location.as_ref().map_or("", |l| l.query_str()));
    let search_input = use_state(|| params.q.clone());
    {
        // back/forward navigation changes the criteria under the input
        let search_input = search_input.clone();
        use_effect_with(params.q.clone(), move |q| {
            search_input.set(q.clone());
            || ()
        });
    }

    let set_params = Callback::from(move |next: TableParams| {
        let Some(navigator) = &navigator else {
            error!("device table rendered outside of a router");
            return;
        };
        debug!("table params: {}", next.encode());
        if let Err(e) = navigator.push_with_query(&Route::Devices, &next.to_pairs()) {
            error!("cannot update URL: {e:?}");
        }
    });

    let on_search = {
        let params = params.clone();
        let search_input = search_input.clone();
        let set_params = set_params.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            set_params.emit(params.clone().with_search(search_input.trim()));
        })
    };
    let on_search_input = {
        let search_input = search_input.clone();
        Callback::from(move |e: InputEvent| search_input.set(utils::input_value(e)))
    };
    let on_search_clear = {
        let search_input = search_input.clone();
        Callback::from(move |_: MouseEvent| search_input.set(String::new()))
    };

    let on_page_size = {
        let params = params.clone();
        let set_params = set_params.clone();
        Callback::from(move |e: Event| match utils::select_value(e).parse::<usize>() {
            Ok(size) => set_params.emit(params.clone().with_size(size)),
            Err(err) => error!("invalid page size: {err}"),
        })
    };

    let type_toggle = |ty: DeviceType| {
        let params = params.clone();
        let set_params = set_params.clone();
        Callback::from(move |_: Event| {
            let types = params.types.clone().toggle(ty);
            set_params.emit(params.clone().with_types(types));
        })
    };

    let go_to_page = |page: usize| {
        let params = params.clone();
        let set_params = set_params.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            set_params.emit(params.clone().with_page(page));
        })
    };

    let open = |next: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: MouseEvent| dialog.set(Some(next.clone())))
    };
    let close = {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(None))
    };
    let changed = {
        let dialog = dialog.clone();
        let devices = devices.clone();
        Callback::from(move |_: ()| {
            dialog.set(None);
            devices.run();
        })
    };

    let header = COLUMNS
        .iter()
        .map(|column| {
            if column.allows_sorting {
                let onclick = {
                    let params = params.clone();
                    let set_params = set_params.clone();
                    let key = column.key;
                    Callback::from(move |_: MouseEvent| set_params.emit(params.clone().with_sort_toggled(key)))
                };
                html! {
                    <th class="text-center sortable" {onclick}>
                        {column.label}{sort_marker(&params, column)}
                    </th>
                }
            } else {
                html! { <th class="text-center">{column.label}</th> }
            }
        })
        .collect::<Html>();

    let render_row = |device: &Device| {
        let cells = COLUMNS
            .iter()
            .map(|column| match column.key {
                "actions" => html! {
                    <td class="text-center actions">
                        <Link<Route> to={Route::Device { id: device.id.clone() }} classes={classes!("btn", "btn-link", "btn-xs")}>
                            {"View"}
                        </Link<Route>>
                        <button class="btn btn-link btn-xs" onclick={open(Dialog::Edit(device.clone()))}>{"Edit"}</button>
                        <button class="btn btn-link btn-xs" onclick={open(Dialog::Export(device.clone()))}>{"Export"}</button>
                        <button class="btn btn-link btn-xs text-danger" onclick={open(Dialog::Delete(device.clone()))}>{"Delete"}</button>
                    </td>
                },
                "last_record" => html! {
                    <td class="text-center" title={device.last_record.as_ref().map(utils::ago)}>
                        {cell_text(device, column.key, &Local)}
                    </td>
                },
                key => html! { <td class="text-center">{cell_text(device, key, &Local)}</td> },
            })
            .collect::<Html>();
        html! { <tr key={device.id.clone()}>{cells}</tr> }
    };

    let message_row = |message: String| {
        html! { <tr><td class="text-center" colspan={COLUMNS.len().to_string()}>{message}</td></tr> }
    };

    let mut page: Option<TablePage> = None;
    let body = if !auth.is_authenticated() {
        message_row("Sign in to see your devices.".to_owned())
    } else if let Some(e) = &devices.error {
        message_row(format!("Cannot load devices: {e}"))
    } else if let Some(all) = &devices.data {
        match paginate(all, &params, config.string_order) {
            Ok(table) if table.items.is_empty() => {
                page = Some(table);
                message_row("No devices found.".to_owned())
            }
            Ok(table) => {
                let rows = table.items.iter().map(render_row).collect::<Html>();
                page = Some(table);
                rows
            }
            Err(e) => {
                error!("{e}");
                message_row(e.to_string())
            }
        }
    } else {
        message_row("Loading...".to_owned())
    };

    let total = devices.data.as_ref().map_or(0, Vec::len);
    let pagination = match &page {
        Some(table) if table.total_pages > 0 => {
            let current = params.page;
            let items = page_items(current, table.total_pages, 1)
                .into_iter()
                .map(|item| match item {
                    PageItem::Page(n) => html! {
                        <li class={classes!((n == current).then_some("active"))}>
                            <a href="#" onclick={go_to_page(n)}>
                                {n}
                            </a>
                        </li>
                    },
                    PageItem::Gap => html! { <li class="disabled"><span>{"…"}</span></li> },
                })
                .collect::<Html>();
            let prev = current.saturating_sub(1).max(1);
            let next = (current + 1).min(table.total_pages);
            html! {
                <nav class="text-center">
                    <ul class="pagination">
                        <li class={classes!((current <= 1).then_some("disabled"))}>
                            <a href="#" onclick={go_to_page(prev)}>{"«"}</a>
                        </li>
                        { items }
                        <li class={classes!((current >= table.total_pages).then_some("disabled"))}>
                            <a href="#" onclick={go_to_page(next)}>{"»"}</a>
                        </li>
                    </ul>
                </nav>
            }
        }
        _ => html! {},
    };

    let dialog_view = match (*dialog).clone() {
        Some(Dialog::Add) => html! {
            <DeviceFormModal key="add" mode={FormMode::Add} on_close={close} on_saved={changed} />
        },
        Some(Dialog::Edit(device)) => {
            let key = format!("edit-{}", device.id);
            html! {
                <DeviceFormModal {key} mode={FormMode::Edit(device)}
                    on_close={close} on_saved={changed} />
            }
        }
        Some(Dialog::Export(device)) => html! { <ExportRecordsModal {device} on_close={close} /> },
        Some(Dialog::Delete(device)) => html! {
            <DeleteDeviceModal {device} on_close={close} on_deleted={changed} />
        },
        None => html! {},
    };

    html! {
        <div class="device-table">
            <div class="row table-toolbar">
                <form class="col-md-6 form-inline" onsubmit={on_search}>
                    <div class="input-group">
                        <input class="form-control" placeholder="Search by id or name..."
                            value={(*search_input).clone()} oninput={on_search_input} />
                        <span class="input-group-btn">
                            <button type="button" class="btn btn-default" onclick={on_search_clear}>{"×"}</button>
                            <button type="submit" class="btn btn-default">{"Search"}</button>
                        </span>
                    </div>
                </form>
                <div class="col-md-6 text-right">
                    <button class="btn btn-primary" disabled={!auth.is_authenticated()} onclick={open(Dialog::Add)}>
                        {"Add Device"}
                    </button>
                    <span class="device-types">
                        { for DeviceType::ALL.iter().map(|ty| html! {
                            <label class="checkbox-inline">
                                <input type="checkbox" checked={params.types.contains(*ty)}
                                    onchange={type_toggle(*ty)} />
                                {ty.label()}
                            </label>
                        }) }
                    </span>
                </div>
            </div>
            <div class="row table-summary">
                <span class="col-xs-6 text-muted">{format!("Total {total} devices")}</span>
                <label class="col-xs-6 text-right text-muted">
                    {"Rows per page: "}
                    <select onchange={on_page_size}>
                        { for PAGE_SIZES.iter().map(|size| html! {
                            <option value={size.to_string()} selected={*size == params.size}>{size.to_string()}</option>
                        }) }
                    </select>
                </label>
            </div>
            <table class="table table-hover table-striped">
                <thead><tr>{header}</tr></thead>
                <tbody>{body}</tbody>
            </table>
            { pagination }
            { dialog_view }
        </div>
    }
}
