use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use web_sys::{HtmlInputElement, HtmlSelectElement, Storage, Window};
use yew::prelude::{Event, InputEvent, TargetCast};

pub fn window() -> Result<Window> {
    web_sys::window().context("no global window")
}

pub fn origin() -> Result<String> {
    window()?
        .location()
        .origin()
        .map_err(|e| anyhow!("cannot read origin: {e:?}"))
}

pub fn navigate_to(url: &str) -> Result<()> {
    window()?
        .location()
        .set_href(url)
        .map_err(|e| anyhow!("cannot navigate to {url}: {e:?}"))
}

fn session_storage() -> Result<Storage> {
    window()?
        .session_storage()
        .map_err(|e| anyhow!("session storage denied: {e:?}"))?
        .context("no session storage")
}

pub fn session_get(key: &str) -> Result<Option<String>> {
    session_storage()?
        .get_item(key)
        .map_err(|e| anyhow!("cannot read {key}: {e:?}"))
}

pub fn session_set(key: &str, value: &str) -> Result<()> {
    session_storage()?
        .set_item(key, value)
        .map_err(|e| anyhow!("cannot write {key}: {e:?}"))
}

pub fn session_remove(key: &str) -> Result<()> {
    session_storage()?
        .remove_item(key)
        .map_err(|e| anyhow!("cannot remove {key}: {e:?}"))
}

/// Takes the URL fragment and drops it from the address bar.
pub fn take_fragment() -> Result<String> {
    let window = window()?;
    let hash = window
        .location()
        .hash()
        .map_err(|e| anyhow!("cannot read hash: {e:?}"))?;
    if hash.is_empty() {
        return Ok(hash);
    }
    let path = window
        .location()
        .pathname()
        .map_err(|e| anyhow!("cannot read path: {e:?}"))?;
    window
        .history()
        .and_then(|history| history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path)))
        .map_err(|e| anyhow!("cannot reset URL: {e:?}"))?;
    Ok(hash)
}

pub fn random_state() -> String {
    format!("{:016x}", (js_sys::Math::random() * u64::MAX as f64) as u64)
}

pub fn input_value(e: InputEvent) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

pub fn select_value(e: Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

pub fn local(ts: &DateTime<Utc>) -> DateTime<Local> {
    DateTime::<Local>::from(*ts)
}

pub fn local_date(ts: &DateTime<Utc>) -> NaiveDate {
    local(ts).date_naive()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// "3h 12m" since `ts`, at minute resolution.
pub fn ago(ts: &DateTime<Utc>) -> String {
    let secs = (Utc::now() - *ts).num_seconds().max(0) as u64;
    if secs < 60 {
        return "just now".to_owned();
    }
    format!("{} ago", humantime::format_duration(Duration::from_secs(secs - secs % 60)))
}
