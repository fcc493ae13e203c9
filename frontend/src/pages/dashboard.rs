use chrono::NaiveDate;
use common::{
    metric::{select_metric, sensor_identifier},
    req::{Device, MeasureQuery, Order},
};
use log::warn;
use yew::prelude::*;

use crate::{
    components::{device_map::DeviceMap, measure_chart::MeasureChart},
    hooks::{use_device, use_devices},
    utils,
};

#[function_component(PageDashboard)]
pub fn page_dashboard() -> Html {
    let devices = use_devices();
    let selected = use_state(|| None::<Device>);

    let all = devices.data.clone().unwrap_or_default();
    let mappable: Vec<Device> = all.iter().filter(|d| d.is_mappable()).cloned().collect();

    let on_select = {
        let selected = selected.clone();
        Callback::from(move |device: Device| selected.set(Some(device)))
    };

    let map = if devices.loading && devices.data.is_none() {
        html! { <div class="map-placeholder">{"Loading..."}</div> }
    } else {
        html! {
            <DeviceMap devices={mappable.clone()}
                selected={(*selected).as_ref().map(|d| d.id.clone())} {on_select} />
        }
    };

    html! {
        <section class="dashboard">
            <h2 class="sub-header">{"Live Sensor Metrics"}</h2>
            <div class="row text-muted">
                <span class="col-xs-8">{"Click on pins to view sensor metrics."}</span>
                <span class="col-xs-4 text-right">{format!("{}/{} displayed", mappable.len(), all.len())}</span>
            </div>
            if let Some(e) = &devices.error {
                <div class="alert alert-danger">{e.to_string()}</div>
            }
            <div class={classes!("panel", "panel-default", selected.is_some().then_some("map-compact"))}>
                <div class="panel-body">{map}</div>
            </div>
            if let Some(device) = (*selected).as_ref() {
                // keyed so the selections reset with the device
                <DeviceCard key={device.id.clone()} device_id={device.id.clone()} />
            }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct DeviceCardProps {
    device_id: String,
}

#[function_component(DeviceCard)]
fn device_card(props: &DeviceCardProps) -> Html {
    let device = use_device(props.device_id.clone());
    let scroll = use_state(|| false);
    let sensor_id = use_state(|| None::<String>);
    let metric_name = use_state(|| None::<String>);
    let picked_date = use_state(|| None::<NaiveDate>);

    let Some(device) = device.data.clone() else {
        return match &device.error {
            Some(e) => html! { <div class="alert alert-danger">{e.to_string()}</div> },
            None => html! {},
        };
    };

    let sensor = (*sensor_id)
        .as_deref()
        .and_then(|id| device.sensors.iter().find(|s| s.id == id));
    let metrics = sensor.map(|s| s.metrics.as_slice()).unwrap_or_default();
    let metric = select_metric(metrics, (*metric_name).as_deref());
    let date = (*picked_date).or_else(|| sensor.and_then(|s| s.last_record.as_ref()).map(utils::local_date));

    let on_scroll = {
        let scroll = scroll.clone();
        Callback::from(move |_: Event| scroll.set(!*scroll))
    };
    let on_sensor = {
        let sensor_id = sensor_id.clone();
        let metric_name = metric_name.clone();
        Callback::from(move |e: Event| {
            let id = utils::select_value(e);
            metric_name.set(None);
            sensor_id.set((!id.is_empty()).then_some(id));
        })
    };
    let on_metric = {
        let metric_name = metric_name.clone();
        Callback::from(move |e: Event| {
            let name = utils::select_value(e);
            metric_name.set((!name.is_empty()).then_some(name));
        })
    };
    let on_date = {
        let picked_date = picked_date.clone();
        Callback::from(move |e: InputEvent| match utils::input_value(e).parse::<NaiveDate>() {
            Ok(date) => picked_date.set(Some(date)),
            Err(err) => warn!("ignoring date: {err}"),
        })
    };

    let no_sensors = device.sensors.is_empty();
    let chart = match (sensor, metric, date) {
        (Some(sensor), Some(meta), Some(date)) => {
            let mut query = MeasureQuery::new(sensor, &meta.name, date);
            query.order = Order::Asc;
            html! {
                <MeasureChart key={format!("{}-{}", sensor.id, meta.name)}
                    {query} meta={meta.clone()} scroll={*scroll} />
            }
        }
        _ => html! {
            <div class="chart-placeholder">
                <p class="text-muted">{"Sensor metrics by date"}</p>
                if no_sensors {
                    <p class="text-muted">{"Device has no sensors"}</p>
                }
            </div>
        },
    };

    html! {
        <div class="device-card">
            <div class="row form-inline">
                <div class="col-md-4">
                    <strong class="device-card-title">{device.device.name.clone()}</strong>
                    <label class="checkbox-inline">
                        <input type="checkbox" checked={*scroll} onchange={on_scroll} />{"Scroll"}
                    </label>
                </div>
                <div class="col-md-8 text-right">
                    <select class="form-control" disabled={no_sensors} onchange={on_sensor}>
                        <option value="" selected={sensor.is_none()}>{"Select Sensor"}</option>
                        { for device.sensors.iter().map(|s| {
                            let metrics = s.metrics.iter().map(|m| m.label()).collect::<Vec<_>>().join(", ");
                            html! {
                                <option value={s.id.clone()} title={metrics}
                                    selected={sensor.is_some_and(|cur| cur.id == s.id)}>
                                    {sensor_identifier(s)}
                                </option>
                            }
                        }) }
                    </select>
                    <select class="form-control" disabled={metrics.is_empty()} onchange={on_metric}>
                        <option value="" selected={metric.is_none()}>{"Select Metric"}</option>
                        { for metrics.iter().map(|m| html! {
                            <option value={m.name.clone()}
                                selected={metric.is_some_and(|cur| cur.name == m.name)}>
                                {m.label().to_owned()}
                            </option>
                        }) }
                    </select>
                    <input type="date" class="form-control" disabled={no_sensors}
                        value={date.map(|d| d.to_string()).unwrap_or_default()} oninput={on_date} />
                </div>
            </div>
            <div class="panel panel-default">
                <div class="panel-body chart-body">{chart}</div>
            </div>
        </div>
    }
}
