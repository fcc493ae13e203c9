pub mod chart_plotly;
pub mod delete_device;
pub mod device_form;
pub mod device_map;
pub mod device_table;
pub mod export;
pub mod measure_chart;
pub mod modal;
