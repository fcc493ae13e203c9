use yew::prelude::*;

use crate::components::device_table::DeviceTable;

#[function_component(PageDevices)]
pub fn page_devices() -> Html {
    html! {
        <section>
            <h2 class="sub-header">{"Devices"}</h2>
            <DeviceTable />
        </section>
    }
}
