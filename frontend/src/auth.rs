//! Sign-in state. The access token lives in session storage so a reload keeps
//! the user signed in until the tab is closed.

use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::Utc;
use common::{
    auth::{parse_token_fragment, AccessToken, AuthSettings},
    ApiClient,
};
use log::{debug, error, info, warn};
use yew::prelude::*;

use crate::{config::AppConfig, utils};

const TOKEN_KEY: &str = "openaurae.access_token";
const STATE_KEY: &str = "openaurae.auth_state";

#[derive(Clone, PartialEq)]
pub struct Auth {
    /// Client carrying the current token.
    pub client: ApiClient,
    pub token: Option<AccessToken>,
    settings: Option<AuthSettings>,
    set_token: Callback<Option<AccessToken>>,
}

impl Auth {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn can_sign_in(&self) -> bool {
        self.settings.is_some()
    }

    pub fn login(&self) -> Result<()> {
        let settings = self.settings.as_ref().context("sign-in is not configured")?;
        let state = utils::random_state();
        utils::session_set(STATE_KEY, &state)?;
        let redirect = format!("{}/", utils::origin()?);
        utils::navigate_to(&settings.authorize_url(&redirect, &state)?)
    }

    pub fn logout(&self) -> Result<()> {
        utils::session_remove(TOKEN_KEY)?;
        self.set_token.emit(None);
        match &self.settings {
            Some(settings) => utils::navigate_to(&settings.logout_url(&utils::origin()?)?),
            None => Ok(()),
        }
    }
}

fn token_from_redirect() -> Result<Option<AccessToken>> {
    let fragment = utils::take_fragment()?;
    if !fragment.contains("access_token") {
        return Ok(None);
    }
    let expected = utils::session_get(STATE_KEY)?.unwrap_or_default();
    utils::session_remove(STATE_KEY)?;
    let token = parse_token_fragment(&fragment, &expected, Utc::now());
    if let Some(token) = &token {
        utils::session_set(TOKEN_KEY, &serde_json::to_string(token)?)?;
        info!("signed in");
    }
    Ok(token)
}

fn stored_token() -> Result<Option<AccessToken>> {
    let Some(raw) = utils::session_get(TOKEN_KEY)? else {
        return Ok(None);
    };
    let token: AccessToken = serde_json::from_str(&raw)?;
    if token.is_expired(Utc::now()) {
        debug!("stored token expired");
        utils::session_remove(TOKEN_KEY)?;
        return Ok(None);
    }
    Ok(Some(token))
}

fn restore_token(config: &AppConfig) -> Option<AccessToken> {
    if let Some(token) = &config.dev_token {
        warn!("using the development access token");
        return Some(AccessToken {
            token: token.clone(),
            expires_at: None,
        });
    }
    match token_from_redirect().and_then(|t| t.map_or_else(stored_token, |t| Ok(Some(t)))) {
        Ok(token) => token,
        Err(e) => {
            error!("cannot restore sign-in: {e:#}");
            None
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub config: Rc<AppConfig>,
    pub client: ApiClient,
    pub children: Children,
}

#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let token = use_state({
        let config = props.config.clone();
        move || restore_token(&config)
    });

    let set_token = {
        let token = token.clone();
        Callback::from(move |next: Option<AccessToken>| token.set(next))
    };

    let auth = Auth {
        client: props
            .client
            .clone()
            .with_token((*token).as_ref().map(|t| t.token.clone())),
        token: (*token).clone(),
        settings: props.config.auth.clone(),
        set_token,
    };

    html! {
        <ContextProvider<Auth> context={auth}>
            { props.children.clone() }
        </ContextProvider<Auth>>
    }
}

#[hook]
pub fn use_auth() -> Auth {
    use_context::<Auth>().expect("use_auth outside of AuthProvider")
}
