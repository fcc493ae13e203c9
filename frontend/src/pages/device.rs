use chrono::NaiveDate;
use common::{
    datetime::format_date,
    metric::latest_sample_count,
    req::{MeasureQuery, MetricMeta, Order, Sensor},
    ApiError,
};
use log::warn;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    components::{measure_chart::MeasureChart, modal::Modal},
    hooks::use_device,
    utils, Route,
};

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: String,
}

#[function_component(PageDevice)]
pub fn page_device(props: &Props) -> Html {
    let device = use_device(props.id.clone());

    if device.loading && device.data.is_none() {
        return html! { <div class="text-center">{"Loading..."}</div> };
    }
    let Some(device) = device.data.clone() else {
        return match device.error.as_deref() {
            Some(ApiError::NotFound(_)) | None => html! { <section>{"Device Not Found"}</section> },
            Some(e) => html! { <div class="alert alert-danger">{e.to_string()}</div> },
        };
    };

    let cards = device
        .sensors
        .iter()
        .flat_map(|sensor| {
            sensor.metrics.iter().map(move |meta| {
                html! {
                    <SensorLatestMetrics key={format!("{}-{}", sensor.id, meta.name)}
                        sensor={sensor.clone()} meta={meta.clone()} />
                }
            })
        })
        .collect::<Html>();

    let title = if device.device.name.is_empty() {
        &device.device.id
    } else {
        &device.device.name
    };

    html! {
        <section>
            <ol class="breadcrumb">
                <li><Link<Route> to={Route::Devices}>{"Devices"}</Link<Route>></li>
                <li class="active">{device.device.id.clone()}</li>
            </ol>
            <h2 class="sub-header">{format!("Device {title}")}</h2>
            <p class="text-muted">{"Click on cards to view all metrics of sensors"}</p>
            if device.sensors.is_empty() {
                <div class="empty-state">{"No sensor"}</div>
            } else {
                <div class="row sensor-cards">{cards}</div>
            }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct CardProps {
    sensor: Sensor,
    meta: MetricMeta,
}

/// Latest readings of one metric; opens a day view on click.
#[function_component(SensorLatestMetrics)]
fn sensor_latest_metrics(props: &CardProps) -> Html {
    let open = use_state(|| false);
    let day = use_state(|| props.sensor.last_record.as_ref().map(utils::local_date));

    let sensor = &props.sensor;
    let meta = &props.meta;

    let latest = sensor.last_record.as_ref().map(|last| {
        let mut query = MeasureQuery::new(sensor, &meta.name, utils::local_date(last));
        query.order = Order::Desc;
        query.count = Some(latest_sample_count(meta));
        query
    });

    let on_open = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(true))
    };
    let on_close = {
        let open = open.clone();
        Callback::from(move |_: ()| open.set(false))
    };
    let on_day = {
        let day = day.clone();
        Callback::from(move |e: InputEvent| match utils::input_value(e).parse::<NaiveDate>() {
            Ok(date) => day.set(Some(date)),
            Err(err) => warn!("ignoring date: {err}"),
        })
    };

    let last_seen = format_date(sensor.last_record.map(|ts| utils::local(&ts)).as_ref());
    let heading = match sensor.name.as_deref() {
        Some(name) if !name.is_empty() => format!("{} ({name})", meta.name),
        _ => meta.name.clone(),
    };

    html! {
        <div class="col-lg-4 col-md-6 col-sm-12">
            <div class="panel panel-default sensor-card" onclick={on_open}>
                <div class="panel-heading">
                    <div class="sensor-card-title">
                        <span>{heading}</span>
                        <span class="pull-right">{if last_seen.is_empty() { "NA".to_owned() } else { last_seen }}</span>
                    </div>
                    <div class="text-muted small">{format!("Sensor Id: {}", sensor.id)}</div>
                </div>
                <div class="panel-body chart-body">
                    if let Some(query) = latest {
                        <MeasureChart {query} meta={meta.clone()} />
                    } else {
                        <div class="chart-placeholder text-muted">{"No Data"}</div>
                    }
                </div>
            </div>
            if *open {
                <Modal title={sensor.name.clone().unwrap_or_else(|| sensor.id.clone())} {on_close} wide=true>
                    <div class="modal-body">
                        <div class="row form-inline">
                            <div class="col-md-4">
                                <label>{"Sensor Id"}</label>
                                <input class="form-control" readonly=true value={sensor.id.clone()} />
                            </div>
                            <div class="col-md-4">
                                <label>{"Metric"}</label>
                                <input class="form-control" readonly=true value={meta.name.clone()} />
                            </div>
                            <div class="col-md-4">
                                <label>{"Date"}</label>
                                <input type="date" class="form-control"
                                    value={day.map(|d| d.to_string()).unwrap_or_default()} oninput={on_day} />
                            </div>
                        </div>
                        if let Some(date) = *day {
                            <MeasureChart query={MeasureQuery::new(sensor, &meta.name, date)}
                                meta={meta.clone()} scroll=true />
                        } else {
                            <div class="text-muted">{"Sensor metrics by date"}</div>
                        }
                    </div>
                </Modal>
            }
        </div>
    }
}
