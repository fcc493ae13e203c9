use common::{
    datetime::format_date_time,
    metric::{bar_height, format_value, value_range},
    req::{Measure, MetricMeta},
};
use plotly::{
    common::Mode,
    layout::{Axis, HoverMode, Margin},
    Bar, Configuration, Layout, Plot, Scatter,
};
use yew::prelude::*;

use crate::utils;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: String,
    pub meta: MetricMeta,
    /// Oldest first.
    pub measures: Vec<Measure>,
}

fn build_plot(meta: &MetricMeta, measures: &[Measure]) -> Plot {
    let times: Vec<String> = measures
        .iter()
        .map(|m| format_date_time(Some(&utils::local(&m.time))))
        .collect();
    let labels: Vec<String> = measures.iter().map(|m| format_value(&m.value, meta)).collect();

    let mut plot = Plot::new();
    let mut layout = Layout::default()
        .hover_mode(HoverMode::XUnified)
        .auto_size(true)
        .margin(Margin::default().top(20).bottom(40).left(40).right(20));

    if meta.is_boolean {
        let heights = measures.iter().map(|m| bar_height(&m.value)).collect();
        plot.add_trace(Bar::new(times, heights).name(meta.label()).text_array(labels));
        // yes/no bars have no meaningful scale
        layout = layout.y_axis(Axis::new().range(vec![0.0, 1.0]).visible(false));
    } else {
        let values = measures.iter().map(|m| m.value.as_f64()).collect();
        plot.add_trace(
            Scatter::new(times, values)
                .mode(Mode::LinesMarkers)
                .name(meta.label())
                .text_array(labels),
        );
        let mut y_axis = Axis::new();
        if let Some((lo, hi)) = value_range(measures) {
            y_axis = y_axis.range(vec![lo, hi]);
        }
        if let Some(unit) = meta.unit.as_deref() {
            y_axis = y_axis.title(unit.into());
        }
        layout = layout.y_axis(y_axis);
    }

    plot.set_configuration(
        Configuration::default()
            .display_logo(false)
            .editable(false)
            .display_mode_bar(plotly::configuration::DisplayModeBar::Hover),
    );
    plot.set_layout(layout);
    plot
}

#[function_component(ChartPlotly)]
pub fn chart_plotly(props: &Props) -> Html {
    let id = props.id.clone();
    let p = yew_hooks::use_async::<_, _, ()>({
        let plot = build_plot(&props.meta, &props.measures);
        async move {
            plotly::bindings::new_plot(&id, &plot).await;
            Ok(())
        }
    });

    use_effect_with(
        // replot whenever the series changes
        (props.measures.clone(), props.meta.clone()),
        move |_| {
            p.run();
            || ()
        },
    );

    html! {
        <div class="chart" id={props.id.clone()}></div>
    }
}
