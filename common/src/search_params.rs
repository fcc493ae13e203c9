//! Device table state mirrored into the URL query string.
//!
//! The URL is the source of truth: components decode it on every render and
//! push a re-encoded query after each transition.

use std::{collections::BTreeSet, fmt};

use log::debug;
use url::form_urlencoded;

use crate::{filter::TypeSelection, req::DeviceType};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_ORDER_BY: &str = "last_record";
pub const PAGE_SIZES: [usize; 3] = [10, 20, 50];

const ALL_TYPES: &str = "all";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ascending" => Some(Self::Ascending),
            "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn is_desc(&self) -> bool {
        *self == Self::Descending
    }

    pub fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableParams {
    pub page: usize,
    pub size: usize,
    pub q: String,
    /// Column key, checked by the pipeline.
    pub order_by: String,
    pub order: SortDirection,
    pub types: TypeSelection,
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            q: String::new(),
            order_by: DEFAULT_ORDER_BY.to_owned(),
            order: SortDirection::default(),
            types: TypeSelection::All,
        }
    }
}

fn positive(raw: Option<&str>, default: usize) -> usize {
    match raw.map(str::trim).map(str::parse::<usize>) {
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            debug!("ignoring invalid count {raw:?}, using {default}");
            default
        }
        None => default,
    }
}

fn decode_types(raw: &str) -> TypeSelection {
    if raw == ALL_TYPES {
        return TypeSelection::All;
    }
    let types: BTreeSet<DeviceType> = raw
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .filter_map(|tag| match tag.parse() {
            Ok(ty) => Some(ty),
            Err(err) => {
                debug!("{err}");
                None
            }
        })
        .collect();
    if types.is_empty() {
        TypeSelection::All
    } else {
        TypeSelection::Only(types)
    }
}

fn encode_types(types: &TypeSelection) -> String {
    match types {
        TypeSelection::All => ALL_TYPES.to_owned(),
        TypeSelection::Only(types) => types
            .iter()
            .map(DeviceType::as_str)
            .collect::<Vec<_>>()
            .join(","),
    }
}

impl TableParams {
    /// Reads table state from a query string, with or without the leading `?`.
    /// Absent or malformed fields fall back to their defaults.
    pub fn decode(query: &str) -> Self {
        let mut page = None;
        let mut size = None;
        let mut q = None;
        let mut order_by = None;
        let mut order = None;
        let mut types = None;

        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "page" => &mut page,
                "size" => &mut size,
                "q" => &mut q,
                "orderBy" => &mut order_by,
                "order" => &mut order,
                "types" => &mut types,
                _ => continue,
            };
            // first occurrence wins
            slot.get_or_insert_with(|| value.into_owned());
        }

        let defaults = Self::default();
        Self {
            page: positive(page.as_deref(), defaults.page),
            size: positive(size.as_deref(), defaults.size),
            q: q.unwrap_or(defaults.q),
            order_by: order_by.filter(|s| !s.is_empty()).unwrap_or(defaults.order_by),
            order: order
                .as_deref()
                .and_then(SortDirection::parse)
                .unwrap_or(defaults.order),
            types: types.as_deref().map_or(defaults.types, decode_types),
        }
    }

    /// Key/value pairs of the non-empty fields, in a fixed order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let pairs = [
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("q", self.q.clone()),
            ("orderBy", self.order_by.clone()),
            ("order", self.order.as_str().to_owned()),
            ("types", encode_types(&self.types)),
        ];
        // zero counts are as falsy as empty strings
        pairs
            .into_iter()
            .filter(|(key, value)| match *key {
                "page" | "size" => value != "0",
                _ => !value.is_empty(),
            })
            .collect()
    }

    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }

    /// Applies a transition to the previous state.
    pub fn update(self, transition: impl FnOnce(Self) -> Self) -> Self {
        transition(self)
    }

    pub fn with_page(self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    pub fn with_size(self, size: usize) -> Self {
        Self {
            page: 1,
            size: size.max(1),
            ..self
        }
    }

    pub fn with_search(self, q: impl Into<String>) -> Self {
        Self {
            page: 1,
            q: q.into(),
            ..self
        }
    }

    pub fn with_types(self, types: TypeSelection) -> Self {
        Self {
            page: 1,
            types,
            ..self
        }
    }

    pub fn with_sort(self, order_by: impl Into<String>, order: SortDirection) -> Self {
        let order_by = order_by.into();
        Self {
            page: 1,
            order_by: if order_by.is_empty() {
                DEFAULT_ORDER_BY.to_owned()
            } else {
                order_by
            },
            order,
            ..self
        }
    }

    /// Sort transition of a clicked column header: the active column flips
    /// direction, another column starts ascending.
    pub fn with_sort_toggled(self, column: &str) -> Self {
        let order = if self.order_by == column {
            self.order.flip()
        } else {
            SortDirection::Ascending
        };
        self.with_sort(column, order)
    }
}

/// Decodes `query`, applies `transition` and returns the query to write back.
pub fn update_query(query: &str, transition: impl FnOnce(TableParams) -> TableParams) -> String {
    TableParams::decode(query).update(transition).encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_decodes_to_defaults() {
        let params = TableParams::decode("");

        assert_eq!(params, TableParams::default());
        assert_eq!(params.page, 1);
        assert_eq!(params.size, 10);
        assert_eq!(params.q, "");
        assert_eq!(params.order_by, "last_record");
        assert_eq!(params.order, SortDirection::Descending);
        assert_eq!(params.types, TypeSelection::All);
    }

    #[test]
    fn partial_query_fills_defaults() {
        let params = TableParams::decode("page=2&size=5&q=air");

        assert_eq!(
            params,
            TableParams {
                page: 2,
                size: 5,
                q: "air".into(),
                order_by: "last_record".into(),
                order: SortDirection::Descending,
                types: TypeSelection::All,
            }
        );
    }

    #[test]
    fn leading_question_mark_is_ignored() {
        assert_eq!(TableParams::decode("?page=3").page, 3);
    }

    #[test]
    fn invalid_values_fall_back() {
        let params = TableParams::decode("page=0&size=-4&order=sideways&orderBy=&types=");

        assert_eq!(params, TableParams::default());
        assert_eq!(TableParams::decode("page=abc&size=2.5").page, 1);
        assert_eq!(TableParams::decode("page=abc&size=2.5").size, 10);
    }

    #[test]
    fn types_decode_as_set() {
        let params = TableParams::decode("types=zigbee%2Cair_quality");

        assert_eq!(
            params.types,
            TypeSelection::Only([DeviceType::Zigbee, DeviceType::AirQuality].into())
        );
        assert_eq!(TableParams::decode("types=all").types, TypeSelection::All);
        assert_eq!(
            TableParams::decode("types=zigbee,thermostat").types,
            TypeSelection::Only([DeviceType::Zigbee].into())
        );
        assert_eq!(TableParams::decode("types=thermostat").types, TypeSelection::All);
    }

    #[test]
    fn encode_omits_empty_search() {
        let encoded = TableParams::default().encode();

        assert_eq!(encoded, "page=1&size=10&orderBy=last_record&order=descending&types=all");
        assert!(!encoded.contains("q="));
    }

    #[test]
    fn round_trip() {
        let states = [
            TableParams::default(),
            TableParams {
                page: 7,
                size: 50,
                q: "front door & co, 50%".into(),
                order_by: "name".into(),
                order: SortDirection::Ascending,
                types: TypeSelection::Only([DeviceType::NemoCloud, DeviceType::Zigbee].into()),
            },
            TableParams {
                page: 1,
                size: 20,
                q: "zb:01".into(),
                order_by: "latitude".into(),
                order: SortDirection::Descending,
                types: TypeSelection::Only(DeviceType::ALL.into()),
            },
            TableParams {
                q: "a+b=c&d=e".into(),
                ..TableParams::default()
            },
            TableParams {
                q: "100% #1 ?x".into(),
                ..TableParams::default()
            },
            TableParams {
                q: "Küche 温度 ☀".into(),
                ..TableParams::default()
            },
            TableParams {
                q: "  padded  ".into(),
                ..TableParams::default()
            },
        ];

        for state in states {
            assert_eq!(TableParams::decode(&state.encode()), state);
        }
    }

    #[test]
    fn empty_type_selection_reads_back_as_all() {
        let params = TableParams {
            types: TypeSelection::Only(Default::default()),
            ..TableParams::default()
        };

        assert!(!params.encode().contains("types="));
        assert_eq!(TableParams::decode(&params.encode()).types, TypeSelection::All);
    }

    #[test]
    fn transitions_reset_page() {
        let params = TableParams::default().with_page(4);
        assert_eq!(params.page, 4);

        assert_eq!(params.clone().with_size(20).page, 1);
        assert_eq!(params.clone().with_search("kitchen").page, 1);
        assert_eq!(params.clone().with_types(TypeSelection::All).page, 1);
        assert_eq!(params.clone().with_sort("id", SortDirection::Ascending).page, 1);
    }

    #[test]
    fn sort_toggle_flips_active_column() {
        let params = TableParams::default().with_sort_toggled("last_record");
        assert_eq!(params.order, SortDirection::Ascending);

        let params = params.with_sort_toggled("name");
        assert_eq!(params.order_by, "name");
        assert_eq!(params.order, SortDirection::Ascending);

        assert_eq!(params.with_sort_toggled("name").order, SortDirection::Descending);
    }

    #[test]
    fn empty_sort_column_falls_back() {
        let params = TableParams::default().with_sort("", SortDirection::Ascending);

        assert_eq!(params.order_by, "last_record");
    }

    #[test]
    fn update_query_rewrites_state() {
        let query = update_query("?page=3&q=kit", |prev| prev.with_size(50));

        assert_eq!(
            TableParams::decode(&query),
            TableParams {
                size: 50,
                q: "kit".into(),
                ..TableParams::default()
            }
        );
    }
}
