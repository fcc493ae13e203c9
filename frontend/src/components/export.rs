use chrono::NaiveDate;
use common::req::Device;
use log::warn;
use yew::prelude::*;

use super::modal::Modal;
use crate::{auth::use_auth, utils};

#[derive(Properties, PartialEq)]
pub struct Props {
    pub device: Device,
    pub on_close: Callback<()>,
}

#[function_component(ExportRecordsModal)]
pub fn export_records_modal(props: &Props) -> Html {
    let client = use_auth().client;
    let initial = props
        .device
        .last_record
        .as_ref()
        .map(utils::local_date)
        .unwrap_or_else(utils::today);
    let start = use_state(|| initial);
    let end = use_state(|| initial);

    let date_input = |handle: UseStateHandle<NaiveDate>| {
        Callback::from(move |e: InputEvent| match utils::input_value(e).parse::<NaiveDate>() {
            Ok(date) => handle.set(date),
            Err(err) => warn!("ignoring export date: {err}"),
        })
    };

    let (first, last) = if *start <= *end { (*start, *end) } else { (*end, *start) };
    let href = client
        .csv_export_url(&props.device.id, first, last)
        .map_err(|e| warn!("export unavailable: {e}"))
        .ok();
    let close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <Modal title="Download Device Records" on_close={props.on_close.clone()}>
            <div class="modal-body form-inline">
                <div class="form-group">
                    <label for="export-start">{"From"}</label>
                    <input id="export-start" type="date" class="form-control"
                        value={start.to_string()} oninput={date_input(start.clone())} />
                </div>
                <div class="form-group">
                    <label for="export-end">{"To"}</label>
                    <input id="export-end" type="date" class="form-control"
                        value={end.to_string()} oninput={date_input(end.clone())} />
                </div>
            </div>
            <div class="modal-footer">
                <button type="button" class="btn btn-default" onclick={close.clone()}>{"Close"}</button>
                if let Some(href) = href {
                    <a class="btn btn-primary" {href} download="" onclick={close}>{"Download"}</a>
                } else {
                    <button type="button" class="btn btn-primary" disabled=true>{"Download"}</button>
                }
            </div>
        </Modal>
    }
}
