use std::collections::BTreeSet;

use crate::req::{Device, DeviceType};

/// Device-type filter of the table. `Only` always holds at least one type:
/// an empty set has no URL form and reads back as `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeSelection {
    #[default]
    All,
    Only(BTreeSet<DeviceType>),
}

impl TypeSelection {
    pub fn contains(&self, ty: DeviceType) -> bool {
        match self {
            Self::All => true,
            Self::Only(types) => types.contains(&ty),
        }
    }

    /// Flips one type in or out. The selection never becomes empty.
    pub fn toggle(self, ty: DeviceType) -> Self {
        let mut types = match self {
            Self::All => DeviceType::ALL.into_iter().collect(),
            Self::Only(types) => types,
        };
        if !types.remove(&ty) {
            types.insert(ty);
        } else if types.is_empty() {
            types.insert(ty);
        }
        Self::Only(types)
    }
}

/// Case-insensitive match of `criteria` against id or name. Empty criteria
/// keeps everything.
pub fn search_id_or_name<'a>(devices: &'a [Device], criteria: &str) -> Vec<&'a Device> {
    if criteria.is_empty() {
        return devices.iter().collect();
    }
    let target = criteria.to_lowercase();
    devices
        .iter()
        .filter(|dev| {
            dev.id.to_lowercase().contains(&target) || dev.name.to_lowercase().contains(&target)
        })
        .collect()
}

pub fn filter_devices<'a>(
    devices: &'a [Device],
    criteria: &str,
    selection: &TypeSelection,
) -> Vec<&'a Device> {
    let mut filtered = search_id_or_name(devices, criteria);
    if let TypeSelection::Only(_) = selection {
        filtered.retain(|dev| selection.contains(dev.device_type));
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, name: &str, device_type: DeviceType) -> Device {
        Device {
            id: id.into(),
            name: name.into(),
            device_type,
            latitude: None,
            longitude: None,
            room: None,
            last_record: None,
            sensor_types: None,
        }
    }

    fn fleet() -> Vec<Device> {
        vec![
            device("aq:01", "Kitchen", DeviceType::AirQuality),
            device("zb:01", "Front Door", DeviceType::Zigbee),
            device("nc:01", "Office AIR", DeviceType::NemoCloud),
            device("zb:02", "Garage", DeviceType::Zigbee),
        ]
    }

    fn ids(devices: &[&Device]) -> Vec<String> {
        devices.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn no_filters_is_identity() {
        let devices = fleet();
        let filtered = filter_devices(&devices, "", &TypeSelection::All);

        assert_eq!(filtered.len(), devices.len());
        assert!(filtered.iter().zip(&devices).all(|(a, b)| *a == b));
    }

    #[test]
    fn search_matches_id_or_name_ignoring_case() {
        let devices = fleet();

        assert_eq!(ids(&search_id_or_name(&devices, "AQ")), vec!["aq:01"]);
        assert_eq!(ids(&search_id_or_name(&devices, "air")), vec!["nc:01"]);
        assert_eq!(ids(&search_id_or_name(&devices, "zb:")), vec!["zb:01", "zb:02"]);
        assert!(search_id_or_name(&devices, "cellar").is_empty());
    }

    #[test]
    fn type_selection_keeps_relative_order() {
        let devices = fleet();
        let selection = TypeSelection::Only([DeviceType::Zigbee].into());

        assert_eq!(ids(&filter_devices(&devices, "", &selection)), vec!["zb:01", "zb:02"]);
    }

    #[test]
    fn search_and_type_combine() {
        let devices = fleet();
        let selection = TypeSelection::Only([DeviceType::Zigbee, DeviceType::NemoCloud].into());

        assert_eq!(ids(&filter_devices(&devices, "o", &selection)), vec!["zb:01", "nc:01"]);
    }

    #[test]
    fn toggle_from_all_drops_one_type() {
        let selection = TypeSelection::All.toggle(DeviceType::Zigbee);

        assert_eq!(
            selection,
            TypeSelection::Only([DeviceType::AirQuality, DeviceType::NemoCloud].into())
        );
        assert_eq!(
            selection.toggle(DeviceType::Zigbee),
            TypeSelection::Only(DeviceType::ALL.into())
        );
    }

    #[test]
    fn toggle_never_empties_selection() {
        let selection = TypeSelection::Only([DeviceType::Zigbee].into());

        assert_eq!(selection.clone().toggle(DeviceType::Zigbee), selection);
    }
}
