use common::{
    req::{Device, DeviceType},
    validate::{validate_new_device, validate_update, DeviceForm},
    ValidationErrors,
};
use log::{error, info};
use yew::prelude::*;

use super::modal::Modal;
use crate::{auth::use_auth, utils};

#[derive(Clone, PartialEq)]
pub enum FormMode {
    Add,
    Edit(Device),
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub mode: FormMode,
    pub on_close: Callback<()>,
    /// Fired once the service accepted the device.
    pub on_saved: Callback<()>,
}

fn field_error(errors: &ValidationErrors, field: &str) -> Html {
    match errors.get(field) {
        Some(message) => html! { <span class="help-block">{message.to_owned()}</span> },
        None => html! {},
    }
}

fn group_class(errors: &ValidationErrors, field: &str) -> Classes {
    classes!("form-group", errors.get(field).map(|_| "has-error"))
}

#[function_component(DeviceFormModal)]
pub fn device_form_modal(props: &Props) -> Html {
    let client = use_auth().client;
    let form = use_state(|| match &props.mode {
        FormMode::Add => DeviceForm::default(),
        FormMode::Edit(device) => DeviceForm::from_device(device),
    });
    let errors = use_state(ValidationErrors::default);
    let submit_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let text_field = |apply: fn(&mut DeviceForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let mut next = (*form).clone();
            apply(&mut next, utils::input_value(e));
            form.set(next);
        })
    };

    let on_type = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let mut next = (*form).clone();
            next.device_type = utils::select_value(e).parse().ok();
            form.set(next);
        })
    };

    let onsubmit = {
        let mode = props.mode.clone();
        let form = form.clone();
        let errors = errors.clone();
        let submit_error = submit_error.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let validated = match &mode {
                FormMode::Add => validate_new_device(&form),
                FormMode::Edit(device) => validate_update(device, &form),
            };
            let device = match validated {
                Ok(device) => device,
                Err(invalid) => {
                    errors.set(invalid);
                    return;
                }
            };
            errors.set(ValidationErrors::default());
            saving.set(true);

            let adding = mode == FormMode::Add;
            let client = client.clone();
            let submit_error = submit_error.clone();
            let saving = saving.clone();
            let on_saved = on_saved.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let res = if adding {
                    client.add_device(&device).await
                } else {
                    client.update_device(&device).await
                };
                saving.set(false);
                match res {
                    Ok(()) => {
                        info!("saved device {}", device.id);
                        on_saved.emit(());
                    }
                    Err(e) => {
                        error!("cannot save device {}: {e}", device.id);
                        submit_error.set(Some(e.to_string()));
                    }
                }
            });
        })
    };

    let (title, submit_label) = match &props.mode {
        FormMode::Add => ("Add Device", "Add"),
        FormMode::Edit(_) => ("Update Device", "Update"),
    };
    let editing = matches!(props.mode, FormMode::Edit(_));
    let cancel = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <Modal title={title} on_close={props.on_close.clone()}>
            <form {onsubmit} novalidate=true>
                <div class="modal-body">
                    if !editing {
                        <div class={group_class(&errors, "id")}>
                            <label for="device-id">{"Device ID"}</label>
                            <input id="device-id" class="form-control" value={form.id.clone()}
                                oninput={text_field(|f, v| f.id = v)} />
                            { field_error(&errors, "id") }
                        </div>
                    }
                    <div class={group_class(&errors, "name")}>
                        <label for="device-name">{"Name"}</label>
                        <input id="device-name" class="form-control" value={form.name.clone()}
                            oninput={text_field(|f, v| f.name = v)} />
                        { field_error(&errors, "name") }
                    </div>
                    if !editing {
                        <div class={group_class(&errors, "device_type")}>
                            <label for="device-type">{"Type"}</label>
                            <select id="device-type" class="form-control" onchange={on_type}>
                                <option value="" selected={form.device_type.is_none()}>{"Select a type"}</option>
                                { for DeviceType::ALL.iter().map(|ty| html! {
                                    <option value={ty.as_str()} selected={form.device_type == Some(*ty)}>
                                        {ty.label()}
                                    </option>
                                }) }
                            </select>
                            { field_error(&errors, "device_type") }
                        </div>
                    }
                    <div class={group_class(&errors, "latitude")}>
                        <label for="device-latitude">{"Latitude"}</label>
                        <input id="device-latitude" class="form-control" inputmode="decimal"
                            value={form.latitude.clone()} oninput={text_field(|f, v| f.latitude = v)} />
                        { field_error(&errors, "latitude") }
                    </div>
                    <div class={group_class(&errors, "longitude")}>
                        <label for="device-longitude">{"Longitude"}</label>
                        <input id="device-longitude" class="form-control" inputmode="decimal"
                            value={form.longitude.clone()} oninput={text_field(|f, v| f.longitude = v)} />
                        { field_error(&errors, "longitude") }
                    </div>
                    if let Some(message) = (*submit_error).clone() {
                        <div class="alert alert-danger">{message}</div>
                    }
                </div>
                <div class="modal-footer">
                    <button type="button" class="btn btn-default" onclick={cancel}>{"Cancel"}</button>
                    <button type="submit" class="btn btn-primary" disabled={*saving}>{submit_label}</button>
                </div>
            </form>
        </Modal>
    }
}
