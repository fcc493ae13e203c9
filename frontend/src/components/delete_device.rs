use common::req::Device;
use log::{error, info};
use yew::prelude::*;

use super::modal::Modal;
use crate::auth::use_auth;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub device: Device,
    pub on_close: Callback<()>,
    pub on_deleted: Callback<()>,
}

#[function_component(DeleteDeviceModal)]
pub fn delete_device_modal(props: &Props) -> Html {
    let client = use_auth().client;
    let failure = use_state(|| None::<String>);
    let deleting = use_state(|| false);

    let confirm = {
        let device_id = props.device.id.clone();
        let failure = failure.clone();
        let deleting = deleting.clone();
        let on_deleted = props.on_deleted.clone();
        Callback::from(move |_: MouseEvent| {
            let client = client.clone();
            let device_id = device_id.clone();
            let failure = failure.clone();
            let deleting = deleting.clone();
            let on_deleted = on_deleted.clone();
            deleting.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                let res = client.remove_device(&device_id).await;
                deleting.set(false);
                match res {
                    Ok(()) => {
                        info!("deleted device {device_id}");
                        on_deleted.emit(());
                    }
                    Err(e) => {
                        error!("cannot delete device {device_id}: {e}");
                        failure.set(Some(e.to_string()));
                    }
                }
            });
        })
    };
    let cancel = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <Modal title="Delete Device" on_close={props.on_close.clone()}>
            <div class="modal-body">
                <p>
                    {"Delete "}<strong>{props.device.name.clone()}</strong>
                    {format!(" ({})? This cannot be undone.", props.device.id)}
                </p>
                if let Some(message) = (*failure).clone() {
                    <div class="alert alert-danger">{message}</div>
                }
            </div>
            <div class="modal-footer">
                <button type="button" class="btn btn-default" onclick={cancel}>{"Cancel"}</button>
                <button type="button" class="btn btn-danger" disabled={*deleting} onclick={confirm}>
                    {"Delete"}
                </button>
            </div>
        </Modal>
    }
}
