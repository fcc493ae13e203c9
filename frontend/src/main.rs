mod auth;
mod components;
mod config;
mod hooks;
mod pages;
mod utils;

use std::rc::Rc;

use common::ApiClient;
use log::{error, info};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    auth::{use_auth, AuthProvider},
    config::{AppConfig, SITE},
    pages::{dashboard::PageDashboard, device::PageDevice, devices::PageDevices},
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/devices")]
    Devices,
    #[at("/devices/:id")]
    Device { id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
    pub client: ApiClient,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    html! {
        <ContextProvider<Rc<AppConfig>> context={props.config.clone()}>
            <AuthProvider config={props.config.clone()} client={props.client.clone()}>
                <BrowserRouter>
                    <div class="container-fluid">
                        <div class="row">
                            <Sidebar />
                            <div class="col-sm-9 col-sm-offset-3 col-md-10 col-md-offset-2 main">
                                <Switch<Route> render={switch} />
                            </div>
                        </div>
                    </div>
                </BrowserRouter>
            </AuthProvider>
        </ContextProvider<Rc<AppConfig>>>
    }
}

#[function_component(Sidebar)]
fn sidebar() -> Html {
    let auth = use_auth();
    let current = use_route::<Route>().unwrap_or(Route::NotFound);
    let class_active = |r: &Route| match (&current, r) {
        (Route::Device { .. }, Route::Devices) => "active",
        (cur, r) if cur == r => "active",
        _ => "",
    };

    let on_login = {
        let auth = auth.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            if let Err(e) = auth.login() {
                error!("sign-in failed: {e:#}");
            }
        })
    };
    let on_logout = {
        let auth = auth.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            if let Err(e) = auth.logout() {
                error!("sign-out failed: {e:#}");
            }
        })
    };

    html! {
        <div class="col-sm-3 col-md-2 sidebar">
            <ul class="nav nav-sidebar">
                <li class="brand">
                    <strong>{SITE.name}</strong>
                    <p class="text-muted small">{SITE.description}</p>
                </li>
                { for SITE.nav_items.iter().filter_map(|item| {
                    let route = Route::recognize(item.href)?;
                    Some(html! {
                        <li class={class_active(&route)}>
                            <Link<Route> to={route}>{item.label}</Link<Route>>
                        </li>
                    })
                }) }
                <li/>
            </ul>

            <ul class="nav nav-sidebar">
                if auth.is_authenticated() {
                    <li><a href="#" onclick={on_logout}>{"Sign out"}</a></li>
                } else if auth.can_sign_in() {
                    <li><a href="#" onclick={on_login}>{"Sign in"}</a></li>
                }
            </ul>

            <ul class="nav nav-sidebar fix-bottom">
                <a href={SITE.github}>{format!("v{}", env!("CARGO_PKG_VERSION"))}</a>
            </ul>
        </div>
    }
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Dashboard => html! { <PageDashboard /> },
        Route::Devices => html! { <PageDevices /> },
        Route::Device { id } => html! { <PageDevice {id} /> },
        Route::NotFound => html! { <h1>{ "404" }</h1> },
    }
}

fn main() {
    let config = AppConfig::from_env();
    wasm_logger::init(wasm_logger::Config::new(config.log_level));
    info!("{} v{} ({})", SITE.name, env!("CARGO_PKG_VERSION"), config.api_base_url);

    match ApiClient::new(&config.api_base_url) {
        Ok(client) => {
            yew::Renderer::<App>::with_props(AppProps {
                config: Rc::new(config),
                client,
            })
            .render();
        }
        Err(e) => {
            error!("{e}");
        }
    }
}
