use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub title: AttrValue,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub wide: bool,
    pub children: Children,
}

#[function_component(Modal)]
pub fn modal(props: &Props) -> Html {
    let close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <div class="modal-backdrop-custom">
            <div class={classes!("modal-dialog", props.wide.then_some("modal-lg"))} role="dialog">
                <div class="modal-content">
                    <div class="modal-header">
                        <button type="button" class="close" onclick={close}>{"×"}</button>
                        <h4 class="modal-title">{props.title.clone()}</h4>
                    </div>
                    { props.children.clone() }
                </div>
            </div>
        </div>
    }
}
