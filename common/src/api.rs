//! Async client of the device service REST API.
//!
//! Every request carries the bearer token. There is no retry and no timeout:
//! a failure is reported once to the caller, who decides whether to refetch.

use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::{
    header::{ACCEPT, AUTHORIZATION},
    Client, RequestBuilder, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::{ApiError, Result},
    req::{Device, DeviceWithSensors, Measure, MeasureMetadata, MeasureQuery, MetricQuery, Sensor},
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    access_token: Option<String>,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url && self.access_token == other.access_token
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ApiError::InvalidUrl("URL cannot be empty".into()));
        }
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url}: URL must start with http:// or https://"
            )));
        }

        Ok(Self {
            http: Client::new(),
            base_url: base_url.to_owned(),
            access_token: None,
        })
    }

    pub fn with_token(self, access_token: Option<String>) -> Self {
        Self {
            access_token: access_token.filter(|t| !t.is_empty()),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn endpoint_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        endpoint_url(&self.base_url, segments)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token.as_deref().ok_or(ApiError::Unauthenticated)?;
        Ok(request
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, "application/json"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request)?.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let message = response.text().await.unwrap_or_default();
        warn!("{url} answered {status}");
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound(url),
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn get_json<'a, T: DeserializeOwned>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
        query: Option<&impl serde::Serialize>,
    ) -> Result<T> {
        let url = self.endpoint_url(segments)?;
        debug!("GET {url}");

        let mut request = self.http.get(url.clone());
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(format!("{url}: {e}")))
    }

    pub async fn devices(&self) -> Result<Vec<Device>> {
        self.get_json(["devices"], None::<&()>).await
    }

    pub async fn device(&self, device_id: &str) -> Result<DeviceWithSensors> {
        self.get_json(["devices", device_id], None::<&()>).await
    }

    pub async fn sensor(&self, device_id: &str, sensor_id: &str) -> Result<Sensor> {
        self.get_json(["devices", device_id, "sensors", sensor_id], None::<&()>)
            .await
    }

    pub async fn add_device(&self, device: &Device) -> Result<()> {
        let url = self.endpoint_url(["devices"])?;
        debug!("POST {url} ({})", device.id);
        self.send(self.http.post(url).json(device)).await?;
        Ok(())
    }

    pub async fn update_device(&self, device: &Device) -> Result<()> {
        let url = self.endpoint_url(["devices", device.id.as_str()])?;
        debug!("PUT {url}");
        self.send(self.http.put(url).json(device)).await?;
        Ok(())
    }

    pub async fn remove_device(&self, device_id: &str) -> Result<()> {
        let url = self.endpoint_url(["devices", device_id])?;
        debug!("DELETE {url}");
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    pub async fn measures(&self, query: &MeasureQuery) -> Result<Vec<Measure>> {
        self.get_json(["measures"], Some(query)).await
    }

    pub async fn metrics(&self, query: &MetricQuery) -> Result<Vec<Measure>> {
        self.get_json(["metrics"], Some(query)).await
    }

    pub async fn measure_metadata(&self) -> Result<Vec<MeasureMetadata>> {
        self.get_json(["metadata", "measures"], None::<&()>).await
    }
}

/// Download link of a device's readings as CSV. The browser follows it
/// directly, so the token travels in the query string.
pub fn csv_export_url(
    base_url: &str,
    device_id: &str,
    access_token: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<String> {
    let mut url = endpoint_url(base_url, ["devices", device_id, "readings", "csv"])?;
    url.query_pairs_mut()
        .append_pair("accessToken", access_token)
        .append_pair("start", &start.format("%Y-%m-%d").to_string())
        .append_pair("end", &end.format("%Y-%m-%d").to_string());
    Ok(url.into())
}

/// Appends path segments to the base URL, percent-encoding each one.
fn endpoint_url<'a>(base_url: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(format!("{base_url}: URL cannot have a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(ApiClient::new(""), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(ApiClient::new("ftp://example.com"), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(ApiClient::new("example.com"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn normalizes_trailing_slash() {
        let client = ApiClient::new("https://api.example.com/v1/").unwrap();

        assert_eq!(client.base_url(), "https://api.example.com/v1");
        assert_eq!(
            client.endpoint_url(["devices"]).unwrap().as_str(),
            "https://api.example.com/v1/devices"
        );
    }

    #[test]
    fn ids_are_encoded_as_path_segments() {
        let client = ApiClient::new("https://api.example.com").unwrap();
        let url = client.endpoint_url(["devices", "a b+c", "sensors", "x/y%"]).unwrap();

        assert_eq!(url.as_str(), "https://api.example.com/devices/a%20b+c/sensors/x%2Fy%25");
        assert_eq!(
            url.path_segments().unwrap().collect::<Vec<_>>(),
            ["devices", "a%20b+c", "sensors", "x%2Fy%25"]
        );
    }

    #[test]
    fn empty_token_is_no_token() {
        let client = ApiClient::new("https://api.example.com").unwrap().with_token(Some(String::new()));

        assert!(!client.is_authenticated());
    }

    #[test]
    fn export_url_carries_token_and_range() {
        let url = csv_export_url(
            "https://api.example.com/",
            "zb:01",
            "tok en",
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        )
        .unwrap();

        assert_eq!(
            url,
            "https://api.example.com/devices/zb:01/readings/csv?accessToken=tok+en&start=2024-01-02&end=2024-01-05"
        );
    }

    #[test]
    fn export_url_keeps_spaces_out_of_the_path() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let url = csv_export_url("https://api.example.com/v1/", "lab 1", "t", day, day).unwrap();

        assert!(url.starts_with("https://api.example.com/v1/devices/lab%201/readings/csv?"));
    }

    #[test]
    fn export_needs_a_token() {
        let client = ApiClient::new("https://api.example.com").unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        assert!(matches!(client.csv_export_url("a1", day, day), Err(ApiError::Unauthenticated)));
    }
}
