// keep in sync with the device service payloads
use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};

use crate::{datetime::lenient_timestamp, error::UnknownDeviceType};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    AirQuality,
    Zigbee,
    NemoCloud,
}

impl DeviceType {
    pub const ALL: [DeviceType; 3] = [Self::AirQuality, Self::Zigbee, Self::NemoCloud];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AirQuality => "air_quality",
            Self::Zigbee => "zigbee",
            Self::NemoCloud => "nemo_cloud",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AirQuality => "Air Quality",
            Self::Zigbee => "Zigbee",
            Self::NemoCloud => "Nemo Cloud",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = UnknownDeviceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownDeviceType(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Device {
    pub id: String, // unique, key
    pub name: String,
    #[serde(alias = "type")]
    pub device_type: DeviceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_record: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_types: Option<Vec<String>>,
}

impl Device {
    /// Devices that can be pinned on the map.
    pub fn is_mappable(&self) -> bool {
        self.last_record.is_some() && self.latitude.is_some() && self.longitude.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MetricMeta {
    pub name: String,
    #[serde(default, alias = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, alias = "isBoolean", alias = "is_bool")]
    pub is_boolean: bool,
}

impl MetricMeta {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Sensor {
    pub id: String,
    pub device: String, // device id
    #[serde(rename = "type")]
    pub sensor_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_record: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "metricsMetadata",
        alias = "measureMetadata",
        alias = "metrics_metadata"
    )]
    pub metrics: Vec<MetricMeta>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DeviceWithSensors {
    #[serde(flatten)]
    pub device: Device,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Number(f64),
}

impl MetricValue {
    pub fn is_truthy(&self) -> bool {
        match *self {
            Self::Bool(b) => b,
            Self::Number(n) => n != 0.0 && !n.is_nan(),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
            Self::Number(n) => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Measure {
    #[serde(with = "crate::datetime::lenient_required")]
    pub time: DateTime<Utc>,
    pub value: MetricValue,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MeasureMetadata {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, alias = "isBoolean")]
    pub is_bool: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// Query of `/measures`: one metric of one sensor on one day.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureQuery {
    pub device_id: String,
    pub sensor_id: String,
    pub sensor_type: String,
    pub name: String,
    pub date: NaiveDate,
    pub processed: bool,
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl MeasureQuery {
    pub fn new(sensor: &Sensor, metric: &str, date: NaiveDate) -> Self {
        Self {
            device_id: sensor.device.clone(),
            sensor_id: sensor.id.clone(),
            sensor_type: sensor.sensor_type.clone(),
            name: metric.to_owned(),
            date,
            processed: true,
            order: Order::Asc,
            page: None,
            count: None,
        }
    }
}

/// Query of `/metrics`, the older sibling of [`MeasureQuery`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricQuery {
    pub device_id: String,
    pub sensor_id: String,
    pub sensor_type: String,
    pub metric: String,
    pub date: NaiveDate,
    pub processed: bool,
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl From<&MeasureQuery> for MetricQuery {
    fn from(q: &MeasureQuery) -> Self {
        Self {
            device_id: q.device_id.clone(),
            sensor_id: q.sensor_id.clone(),
            sensor_type: q.sensor_type.clone(),
            metric: q.name.clone(),
            date: q.date,
            processed: q.processed,
            order: q.order,
            limit: q.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn device_type_tags_parse_or_name_the_unknown_tag() {
        assert_eq!("nemo_cloud".parse::<DeviceType>(), Ok(DeviceType::NemoCloud));

        let err = "bogus".parse::<DeviceType>().unwrap_err();
        assert_eq!(err, UnknownDeviceType("bogus".into()));
        assert_eq!(err.to_string(), "unknown device type: bogus");
    }

    #[test]
    fn device_accepts_type_alias_and_missing_optionals() {
        let dev: Device =
            serde_json::from_str(r#"{"id":"aq:01","name":"Lab","type":"air_quality"}"#).unwrap();

        assert_eq!(dev.device_type, DeviceType::AirQuality);
        assert!(dev.latitude.is_none());
        assert!(dev.last_record.is_none());
        assert!(!dev.is_mappable());
    }

    #[test]
    fn device_parses_date_only_last_record() {
        let dev: Device = serde_json::from_str(
            r#"{"id":"a1","name":"Alpha","device_type":"zigbee","last_record":"2024-01-03"}"#,
        )
        .unwrap();

        assert_eq!(
            dev.last_record,
            Some(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn device_serialization_skips_absent_fields() {
        let dev = Device {
            id: "a1".into(),
            name: "Alpha".into(),
            device_type: DeviceType::NemoCloud,
            latitude: None,
            longitude: Some(145.1),
            room: None,
            last_record: None,
            sensor_types: None,
        };
        let json = serde_json::to_value(&dev).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "a1",
                "name": "Alpha",
                "device_type": "nemo_cloud",
                "longitude": 145.1
            })
        );
    }

    #[test]
    fn sensor_metadata_aliases() {
        let sensor: Sensor = serde_json::from_str(
            r#"{
                "id": "s1",
                "device": "a1",
                "type": "zigbee_contact",
                "metricsMetadata": [
                    {"name": "contact", "displayName": "Contact", "isBoolean": true},
                    {"name": "battery", "unit": "%"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(sensor.metrics.len(), 2);
        assert!(sensor.metrics[0].is_boolean);
        assert_eq!(sensor.metrics[0].label(), "Contact");
        assert_eq!(sensor.metrics[1].label(), "battery");
        assert!(!sensor.metrics[1].is_boolean);
    }

    #[test]
    fn device_with_sensors_flattens_device() {
        let dev: DeviceWithSensors = serde_json::from_str(
            r#"{"id":"a1","name":"Alpha","device_type":"zigbee","sensors":[]}"#,
        )
        .unwrap();

        assert_eq!(dev.device.id, "a1");
        assert!(dev.sensors.is_empty());
    }

    #[test]
    fn measure_values_are_numbers_or_booleans() {
        let measures: Vec<Measure> = serde_json::from_str(
            r#"[
                {"time": "2024-01-01T10:00:00Z", "value": 21.5},
                {"time": "2024-01-01T10:05:00Z", "value": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(measures[0].value, MetricValue::Number(21.5));
        assert_eq!(measures[1].value, MetricValue::Bool(true));
        assert!(measures[1].value.is_truthy());
        assert!(!MetricValue::Number(0.0).is_truthy());
    }

    #[test]
    fn device_type_from_str() {
        assert_eq!("zigbee".parse::<DeviceType>(), Ok(DeviceType::Zigbee));
        assert!("thermostat".parse::<DeviceType>().is_err());
    }
}
