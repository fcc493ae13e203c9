//! Data hooks over the device service. Each returns a `yew_hooks` async
//! handle: `loading`, `data` and `error` for rendering, `run()` to refetch.

use std::rc::Rc;

use common::{
    req::{Device, DeviceWithSensors, Measure, MeasureQuery},
    ApiError,
};
use log::error;
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::auth::use_auth;

pub type Fetch<T> = UseAsyncHandle<T, Rc<ApiError>>;

fn logged(e: ApiError) -> Rc<ApiError> {
    error!("{e}");
    Rc::new(e)
}

/// All devices of the signed-in user.
#[hook]
pub fn use_devices() -> Fetch<Vec<Device>> {
    let client = use_auth().client;
    let devices = {
        let client = client.clone();
        use_async(async move { client.devices().await.map_err(logged) })
    };

    {
        let devices = devices.clone();
        // refetch when the token changes
        use_effect_with(client, move |client| {
            if client.is_authenticated() {
                devices.run();
            }
            || ()
        });
    }

    devices
}

#[hook]
pub fn use_device(device_id: String) -> Fetch<DeviceWithSensors> {
    let client = use_auth().client;
    let device = {
        let client = client.clone();
        let device_id = device_id.clone();
        use_async(async move { client.device(&device_id).await.map_err(logged) })
    };

    {
        let device = device.clone();
        use_effect_with((client, device_id), move |(client, _)| {
            if client.is_authenticated() {
                device.run();
            }
            || ()
        });
    }

    device
}

#[hook]
pub fn use_measures(query: MeasureQuery) -> Fetch<Vec<Measure>> {
    let client = use_auth().client;
    let measures = {
        let client = client.clone();
        let query = query.clone();
        use_async(async move { client.measures(&query).await.map_err(logged) })
    };

    {
        let measures = measures.clone();
        use_effect_with((client, query), move |(client, _)| {
            if client.is_authenticated() {
                measures.run();
            }
            || ()
        });
    }

    measures
}
