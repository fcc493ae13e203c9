//! Client-side checks of the add/update device forms. Nothing that fails
//! here is ever sent to the device service.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    error::ValidationErrors,
    req::{Device, DeviceType},
};

const MAX_ID_LEN: usize = 50;
const MAX_NAME_LEN: usize = 50;

fn device_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_:]{1,50}$").expect("static pattern"))
}

/// Raw text of the device form inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceForm {
    pub id: String,
    pub name: String,
    pub device_type: Option<DeviceType>,
    pub latitude: String,
    pub longitude: String,
}

impl DeviceForm {
    /// Prefills the form from an existing device.
    pub fn from_device(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            device_type: Some(device.device_type),
            latitude: device.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: device.longitude.map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

fn check_id(id: &str, errors: &mut ValidationErrors) {
    if id.is_empty() {
        errors.add("id", "device id cannot be empty");
    } else if id.chars().count() > MAX_ID_LEN {
        errors.add("id", "device id cannot have more than 50 characters");
    } else if !device_id_pattern().is_match(id) {
        errors.add("id", "device id should contain only letters, digits and semicolons");
    }
}

fn check_name(name: &str, errors: &mut ValidationErrors) {
    if name.is_empty() {
        errors.add("name", "device name cannot be empty");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.add("name", "device name cannot have more than 50 characters");
    }
}

/// Parses an optional coordinate in `[-bound, bound]`. Blank input is absent.
fn check_coordinate(
    field: &'static str,
    raw: &str,
    bound: f64,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(v) if !v.is_finite() => {
            errors.add(field, format!("{field} must be a number"));
            None
        }
        Ok(v) if v > bound => {
            errors.add(field, format!("{field} must <= {bound}"));
            None
        }
        Ok(v) if v < -bound => {
            errors.add(field, format!("{field} must >= -{bound}"));
            None
        }
        Ok(v) => Some(v),
        Err(_) => {
            errors.add(field, format!("{field} must be a number"));
            None
        }
    }
}

/// Validates the add form and builds the device to submit.
pub fn validate_new_device(form: &DeviceForm) -> Result<Device, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_id(&form.id, &mut errors);
    check_name(&form.name, &mut errors);
    let latitude = check_coordinate("latitude", &form.latitude, 90.0, &mut errors);
    let longitude = check_coordinate("longitude", &form.longitude, 180.0, &mut errors);
    if form.device_type.is_none() {
        errors.add("device_type", "device type must be selected");
    }

    match form.device_type {
        Some(device_type) if errors.is_empty() => Ok(Device {
            id: form.id.clone(),
            name: form.name.clone(),
            device_type,
            latitude,
            longitude,
            room: None,
            last_record: None,
            sensor_types: None,
        }),
        _ => Err(errors),
    }
}

/// Validates the edit form and merges its fields into `device`. The id is not
/// editable.
pub fn validate_update(device: &Device, form: &DeviceForm) -> Result<Device, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_name(&form.name, &mut errors);
    let latitude = check_coordinate("latitude", &form.latitude, 90.0, &mut errors);
    let longitude = check_coordinate("longitude", &form.longitude, 180.0, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(Device {
        name: form.name.clone(),
        latitude,
        longitude,
        ..device.clone()
    })
}
