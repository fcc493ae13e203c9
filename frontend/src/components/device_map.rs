use common::{
    map::{pins, Viewport},
    req::Device,
};
use yew::prelude::*;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 420.0;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub devices: Vec<Device>,
    #[prop_or_default]
    pub selected: Option<String>,
    pub on_select: Callback<Device>,
}

/// Pin board of the devices that have a position and have reported data.
#[function_component(DeviceMap)]
pub fn device_map(props: &Props) -> Html {
    let view = use_state_eq(Viewport::default);

    let zoom = |delta: f64| {
        let view = view.clone();
        Callback::from(move |_: MouseEvent| view.set(view.zoomed(delta)))
    };
    let reset = {
        let view = view.clone();
        Callback::from(move |_: MouseEvent| view.set(Viewport::default()))
    };

    let markers = pins(&props.devices, &view, WIDTH, HEIGHT)
        .into_iter()
        .filter_map(|pin| {
            let device = props.devices.iter().find(|d| d.id == pin.device_id)?.clone();
            let selected = props.selected.as_deref() == Some(device.id.as_str());
            let onclick = {
                let on_select = props.on_select.clone();
                let view = view.clone();
                let device = device.clone();
                Callback::from(move |_: MouseEvent| {
                    if let (Some(lat), Some(lon)) = (device.latitude, device.longitude) {
                        view.set(view.centered_on(lat, lon));
                    }
                    on_select.emit(device.clone());
                })
            };
            Some(html! {
                <circle key={pin.device_id.clone()}
                    class={classes!("map-pin", selected.then_some("selected"))}
                    cx={format!("{:.1}", pin.x)} cy={format!("{:.1}", pin.y)} r="8"
                    {onclick}>
                    <title>{format!("{} ({})", device.name, device.id)}</title>
                </circle>
            })
        })
        .collect::<Html>();

    html! {
        <div class="device-map">
            <svg viewBox={format!("0 0 {WIDTH} {HEIGHT}")} preserveAspectRatio="xMidYMid meet">
                <rect class="map-background" width={WIDTH.to_string()} height={HEIGHT.to_string()} />
                { markers }
            </svg>
            <div class="map-controls btn-group-vertical">
                <button class="btn btn-default" onclick={zoom(1.0)}>{"+"}</button>
                <button class="btn btn-default" onclick={zoom(-1.0)}>{"-"}</button>
                <button class="btn btn-default" onclick={reset}>{"⌂"}</button>
            </div>
        </div>
    }
}
