//! Build-time configuration. Values come from the environment of the `trunk
//! build` invocation, so a deployment is configured by rebuilding.

use common::{auth::AuthSettings, StringOrder};
use log::Level;

use crate::utils;

pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

pub struct SiteConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub nav_items: &'static [NavItem],
    pub github: &'static str,
}

pub const SITE: SiteConfig = SiteConfig {
    name: "OpenAurae",
    description: "Manage your IoT devices and view real-time sensor metrics.",
    nav_items: &[
        NavItem {
            label: "Dashboard",
            href: "/",
        },
        NavItem {
            label: "Devices",
            href: "/devices",
        },
    ],
    github: "https://github.com/openaurae",
};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub auth: Option<AuthSettings>,
    /// Fixed token for local backends without an identity provider.
    pub dev_token: Option<String>,
    pub string_order: StringOrder,
    pub log_level: Level,
}

fn non_empty(value: Option<&'static str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_base_url = non_empty(option_env!("API_BASE_URL"))
            .or_else(|| utils::origin().ok())
            .unwrap_or_else(|| "http://127.0.0.1:8081".to_owned());

        let auth = match (
            non_empty(option_env!("AUTH_DOMAIN")),
            non_empty(option_env!("AUTH_CLIENT_ID")),
        ) {
            (Some(domain), Some(client_id)) => Some(AuthSettings {
                domain,
                client_id,
                audience: non_empty(option_env!("AUTH_AUDIENCE")),
            }),
            _ => None,
        };

        let string_order: StringOrder = option_env!("STRING_SORT")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();

        let log_level = option_env!("DASHBOARD_LOG")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(Level::Info);

        Self {
            api_base_url,
            auth,
            dev_token: non_empty(option_env!("DEV_ACCESS_TOKEN")),
            string_order,
            log_level,
        }
    }
}
