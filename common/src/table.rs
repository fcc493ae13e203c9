//! Device table pipeline: filter, sort, then slice out one page.

use std::{fmt::Display, str::FromStr};

use chrono::TimeZone;
use log::debug;

use crate::{
    datetime::format_date_time,
    error::TableError,
    filter::filter_devices,
    req::Device,
    search_params::TableParams,
    sort::{sort_by_numeric_field, sort_by_string_field, StringOrder},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Name,
    Room,
    Latitude,
    Longitude,
    LastRecord,
}

impl SortColumn {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Room => "room",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::LastRecord => "last_record",
        }
    }
}

impl FromStr for SortColumn {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "id" => Self::Id,
            "name" => Self::Name,
            "room" => Self::Room,
            "latitude" => Self::Latitude,
            "longitude" => Self::Longitude,
            "last_record" => Self::LastRecord,
            other => return Err(TableError::UnsupportedSortColumn(other.to_owned())),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub allows_sorting: bool,
}

pub const COLUMNS: [TableColumn; 7] = [
    TableColumn { key: "id", label: "ID", allows_sorting: true },
    TableColumn { key: "name", label: "NAME", allows_sorting: true },
    TableColumn { key: "latitude", label: "LATITUDE", allows_sorting: true },
    TableColumn { key: "longitude", label: "LONGITUDE", allows_sorting: true },
    TableColumn { key: "room", label: "ROOM", allows_sorting: false },
    TableColumn { key: "last_record", label: "LAST RECORD", allows_sorting: true },
    TableColumn { key: "actions", label: "ACTIONS", allows_sorting: false },
];

pub fn sort_by_column<'a>(
    devices: Vec<&'a Device>,
    column: SortColumn,
    desc: bool,
    order: StringOrder,
) -> Vec<&'a Device> {
    match column {
        SortColumn::Id => sort_by_string_field(devices, |d| Some(d.id.as_str()), desc, order),
        SortColumn::Name => sort_by_string_field(devices, |d| Some(d.name.as_str()), desc, order),
        SortColumn::Room => sort_by_string_field(devices, |d| d.room.as_deref(), desc, order),
        SortColumn::Latitude => sort_by_numeric_field(devices, |d| d.latitude, desc),
        SortColumn::Longitude => sort_by_numeric_field(devices, |d| d.longitude, desc),
        SortColumn::LastRecord => {
            sort_by_numeric_field(devices, |d| d.last_record.map(|ts| ts.timestamp_millis()), desc)
        }
    }
}

/// One rendered page of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub items: Vec<Device>,
    pub total_pages: usize,
    /// Devices left after filtering, across all pages.
    pub filtered_count: usize,
}

pub fn paginate(
    devices: &[Device],
    params: &TableParams,
    order: StringOrder,
) -> Result<TablePage, TableError> {
    let column: SortColumn = params.order_by.parse()?;
    let size = params.size.max(1);

    let filtered = filter_devices(devices, &params.q, &params.types);
    let filtered_count = filtered.len();
    let total_pages = filtered_count.div_ceil(size);

    let start = (params.page.max(1) - 1).saturating_mul(size);
    let items = sort_by_column(filtered, column, params.order.is_desc(), order)
        .into_iter()
        .skip(start)
        .take(size)
        .cloned()
        .collect::<Vec<_>>();

    debug!(
        "table page {}/{} ({} of {} devices)",
        params.page,
        total_pages,
        items.len(),
        filtered_count
    );

    Ok(TablePage {
        items,
        total_pages,
        filtered_count,
    })
}

/// Text of a data cell; coordinates to 6 decimals, timestamps in `tz`.
/// Absent values and non-data columns render empty.
pub fn cell_text<Tz>(device: &Device, key: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let coordinate = |v: Option<f64>| v.map(|v| format!("{v:.6}")).unwrap_or_default();
    match key {
        "id" => device.id.clone(),
        "name" => device.name.clone(),
        "room" => device.room.clone().unwrap_or_default(),
        "latitude" => coordinate(device.latitude),
        "longitude" => coordinate(device.longitude),
        "last_record" => format_date_time(device.last_record.map(|ts| ts.with_timezone(tz)).as_ref()),
        _ => String::new(),
    }
}

/// Entry of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Gap,
}

/// First and last page, the current one and `siblings` on each side of it,
/// with gaps in between.
pub fn page_items(current: usize, total_pages: usize, siblings: usize) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let from = current.saturating_sub(siblings).max(1);
    let to = (current + siblings).min(total_pages);

    let mut items = Vec::new();
    if from > 1 {
        items.push(PageItem::Page(1));
        if from > 2 {
            items.push(PageItem::Gap);
        }
    }
    items.extend((from..=to).map(PageItem::Page));
    if to < total_pages {
        if to + 1 < total_pages {
            items.push(PageItem::Gap);
        }
        items.push(PageItem::Page(total_pages));
    }
    items
}
