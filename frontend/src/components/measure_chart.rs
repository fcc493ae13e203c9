use common::{
    metric::{chronological, scroll_width_px},
    req::{MeasureQuery, MetricMeta},
};
use yew::prelude::*;

use super::chart_plotly::ChartPlotly;
use crate::hooks::use_measures;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub query: MeasureQuery,
    pub meta: MetricMeta,
    /// Give every sample a fixed width and scroll horizontally.
    #[prop_or_default]
    pub scroll: bool,
}

#[function_component(MeasureChart)]
pub fn measure_chart(props: &Props) -> Html {
    let measures = use_measures(props.query.clone());

    if measures.loading && measures.data.is_none() {
        return html! { <div class="chart-placeholder">{"Loading..."}</div> };
    }
    if let Some(e) = &measures.error {
        return html! { <div class="chart-placeholder text-danger">{e.to_string()}</div> };
    }
    let series = match &measures.data {
        Some(data) if !data.is_empty() => chronological(data.clone(), props.query.order),
        _ => return html! { <div class="chart-placeholder">{"No Data"}</div> },
    };

    let id = format!(
        "chart-{}-{}-{}",
        props.query.sensor_id, props.query.name, props.query.date
    )
    .replace(|c: char| !c.is_ascii_alphanumeric() && c != '-', "_");

    if props.scroll {
        let style = format!("width: {}px", scroll_width_px(series.len()));
        html! {
            <div class="chart-scroll">
                <div {style}>
                    <ChartPlotly {id} meta={props.meta.clone()} measures={series} />
                </div>
            </div>
        }
    } else {
        html! { <ChartPlotly {id} meta={props.meta.clone()} measures={series} /> }
    }
}
