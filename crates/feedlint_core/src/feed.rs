//! Loaded tables and the feed container. Tables are immutable after
//! construction and shared read-only between validators.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use feedlint_model::{GtfsColor, GtfsDate, GtfsDecimal, GtfsTime};

use crate::notice::{NoticeContainer, NoticeSeverity, ValidationNotice};
use crate::schema::{TableSpec, UNKNOWN_TABLE};

pub const AGENCY_FILE: &str = "agency.txt";
pub const STOPS_FILE: &str = "stops.txt";
pub const ROUTES_FILE: &str = "routes.txt";
pub const TRIPS_FILE: &str = "trips.txt";
pub const STOP_TIMES_FILE: &str = "stop_times.txt";
pub const CALENDAR_FILE: &str = "calendar.txt";
pub const CALENDAR_DATES_FILE: &str = "calendar_dates.txt";
pub const FARE_ATTRIBUTES_FILE: &str = "fare_attributes.txt";
pub const FARE_RULES_FILE: &str = "fare_rules.txt";
pub const FARE_MEDIA_FILE: &str = "fare_media.txt";
pub const FARE_PRODUCTS_FILE: &str = "fare_products.txt";
pub const FARE_LEG_RULES_FILE: &str = "fare_leg_rules.txt";
pub const FARE_TRANSFER_RULES_FILE: &str = "fare_transfer_rules.txt";
pub const FARE_LEG_JOIN_RULES_FILE: &str = "fare_leg_join_rules.txt";
pub const AREAS_FILE: &str = "areas.txt";
pub const STOP_AREAS_FILE: &str = "stop_areas.txt";
pub const TIMEFRAMES_FILE: &str = "timeframes.txt";
pub const RIDER_CATEGORIES_FILE: &str = "rider_categories.txt";
pub const SHAPES_FILE: &str = "shapes.txt";
pub const FREQUENCIES_FILE: &str = "frequencies.txt";
pub const TRANSFERS_FILE: &str = "transfers.txt";
pub const LOCATION_GROUPS_FILE: &str = "location_groups.txt";
pub const LOCATION_GROUP_STOPS_FILE: &str = "location_group_stops.txt";
pub const BOOKING_RULES_FILE: &str = "booking_rules.txt";
pub const NETWORKS_FILE: &str = "networks.txt";
pub const ROUTE_NETWORKS_FILE: &str = "route_networks.txt";
pub const FEED_INFO_FILE: &str = "feed_info.txt";
pub const ATTRIBUTIONS_FILE: &str = "attributions.txt";
pub const LEVELS_FILE: &str = "levels.txt";
pub const PATHWAYS_FILE: &str = "pathways.txt";
pub const TRANSLATIONS_FILE: &str = "translations.txt";

/// One parsed cell. Which variant a column produces is fixed by its
/// descriptor entry.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Float(f64),
    Integer(i64),
    Decimal(GtfsDecimal),
    Date(GtfsDate),
    Time(GtfsTime),
    Color(GtfsColor),
    Enum(i16),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&GtfsDecimal> {
        match self {
            CellValue::Decimal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<GtfsDate> {
        match self {
            CellValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<GtfsTime> {
        match self {
            CellValue::Time(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<GtfsColor> {
        match self {
            CellValue::Color(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i16> {
        match self {
            CellValue::Enum(value) => Some(*value),
            _ => None,
        }
    }

    /// Canonical textual form, used to build index keys.
    fn render(&self) -> String {
        match self {
            CellValue::Text(value) => value.clone(),
            CellValue::Float(value) => value.to_string(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Decimal(value) => value.to_string(),
            CellValue::Date(value) => value.to_string(),
            CellValue::Time(value) => value.to_string(),
            CellValue::Color(value) => value.to_string(),
            CellValue::Enum(value) => value.to_string(),
        }
    }
}

/// An immutable row entity. Cells are aligned with the descriptor's
/// column order; a cell is `None` when missing or unparseable.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Box<[Option<CellValue>]>,
}

impl Row {
    pub fn new(cells: Vec<Option<CellValue>>) -> Self {
        Self {
            cells: cells.into_boxed_slice(),
        }
    }

    pub fn cell(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index).and_then(|cell| cell.as_ref())
    }
}

/// A loaded table: ordered rows plus the primary-key and secondary
/// indices declared by the descriptor.
#[derive(Debug, Clone, Default)]
pub struct GtfsTable {
    file_name: String,
    spec: &'static TableSpec,
    headers: Vec<String>,
    rows: Vec<Row>,
    row_numbers: Vec<u64>,
    primary_index: BTreeMap<Vec<String>, usize>,
    secondary_indices: BTreeMap<&'static str, BTreeMap<String, Vec<usize>>>,
}

impl Default for &'static TableSpec {
    fn default() -> Self {
        &UNKNOWN_TABLE
    }
}

impl GtfsTable {
    /// Assembles the table and its indices, reporting duplicate primary
    /// keys. Every row is retained; the first occurrence keeps the index
    /// slot.
    pub fn build(
        file_name: impl Into<String>,
        spec: &'static TableSpec,
        headers: Vec<String>,
        rows: Vec<Row>,
        row_numbers: Vec<u64>,
        notices: &mut NoticeContainer,
    ) -> Self {
        let file_name = file_name.into();
        let mut table = Self {
            file_name,
            spec,
            headers,
            rows,
            row_numbers,
            primary_index: BTreeMap::new(),
            secondary_indices: BTreeMap::new(),
        };
        table.build_primary_index(notices);
        table.build_secondary_indices();
        table
    }

    pub fn empty(file_name: impl Into<String>, spec: &'static TableSpec) -> Self {
        Self {
            file_name: file_name.into(),
            spec,
            headers: Vec::new(),
            rows: Vec::new(),
            row_numbers: Vec::new(),
            primary_index: BTreeMap::new(),
            secondary_indices: BTreeMap::new(),
        }
    }

    fn build_primary_index(&mut self, notices: &mut NoticeContainer) {
        let spec = self.spec;
        let key_columns: Vec<(usize, &'static str)> = spec
            .primary_key()
            .filter_map(|field| spec.column_index(field.name).map(|index| (index, field.name)))
            .collect();
        if key_columns.is_empty() {
            return;
        }

        for (position, row) in self.rows.iter().enumerate() {
            let mut key = Vec::with_capacity(key_columns.len());
            for (index, _) in &key_columns {
                match row.cell(*index) {
                    Some(value) => key.push(value.render()),
                    None => break,
                }
            }
            if key.len() != key_columns.len() {
                continue;
            }

            if let Some(&first_position) = self.primary_index.get(&key) {
                notices.push(duplicate_key_notice(
                    &self.file_name,
                    self.row_numbers[position],
                    self.row_numbers[first_position],
                    &key_columns,
                    &key,
                ));
            } else {
                self.primary_index.insert(key, position);
            }
        }
    }

    fn build_secondary_indices(&mut self) {
        let spec = self.spec;
        for field in spec.indexed_fields() {
            let Some(index) = spec.column_index(field.name) else {
                continue;
            };
            let mut by_value: BTreeMap<String, Vec<usize>> = BTreeMap::new();
            for (position, row) in self.rows.iter().enumerate() {
                if let Some(value) = row.cell(index) {
                    by_value.entry(value.render()).or_default().push(position);
                }
            }
            self.secondary_indices.insert(field.name, by_value);
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn spec(&self) -> &'static TableSpec {
        self.spec
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    /// 1-based CSV row number of the row at `position`.
    pub fn row_number(&self, position: usize) -> u64 {
        self.row_numbers.get(position).copied().unwrap_or_default()
    }

    pub fn cell(&self, position: usize, field_name: &str) -> Option<&CellValue> {
        let index = self.spec.column_index(field_name)?;
        self.rows.get(position)?.cell(index)
    }

    pub fn text(&self, position: usize, field_name: &str) -> Option<&str> {
        self.cell(position, field_name)?.as_text()
    }

    /// Row position for a primary-key tuple, if unique and present.
    pub fn position_by_key(&self, key: &[&str]) -> Option<usize> {
        let key: Vec<String> = key.iter().map(|part| part.to_string()).collect();
        self.primary_index.get(&key).copied()
    }

    pub fn row_by_key(&self, key: &[&str]) -> Option<&Row> {
        self.position_by_key(key).and_then(|position| self.rows.get(position))
    }

    /// Positions of all rows sharing `value` in an indexed field, in
    /// insertion order. Empty when the field is not indexed.
    pub fn positions_with(&self, field_name: &str, value: &str) -> &[usize] {
        self.secondary_indices
            .get(field_name)
            .and_then(|by_value| by_value.get(value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct values present in an indexed column.
    pub fn indexed_values(&self, field_name: &str) -> impl Iterator<Item = &str> {
        self.secondary_indices
            .get(field_name)
            .into_iter()
            .flat_map(|by_value| by_value.keys().map(String::as_str))
    }
}

fn duplicate_key_notice(
    file_name: &str,
    row_number: u64,
    first_row_number: u64,
    key_columns: &[(usize, &'static str)],
    key: &[String],
) -> ValidationNotice {
    let mut notice = ValidationNotice::new(
        "duplicate_key",
        NoticeSeverity::Error,
        "duplicate primary key value",
    )
    .with_location(file_name, row_number, key_columns[0].1)
    .with_context_field("prevCsvRowNumber", first_row_number);
    for (position, ((_, name), value)) in key_columns.iter().zip(key).enumerate() {
        notice.insert_context_field(format!("fieldName{}", position + 1), name);
        notice.insert_context_field(format!("fieldValue{}", position + 1), value);
    }
    notice
}

/// Immutable view onto the loaded tables, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct GtfsFeed {
    tables: BTreeMap<String, GtfsTable>,
}

impl GtfsFeed {
    pub fn new(tables: impl IntoIterator<Item = GtfsTable>) -> Self {
        Self {
            tables: tables
                .into_iter()
                .map(|table| (table.file_name().to_string(), table))
                .collect(),
        }
    }

    /// The table for `file_name`; files that were never loaded behave as
    /// empty tables.
    pub fn table(&self, file_name: &str) -> &GtfsTable {
        static EMPTY: OnceLock<GtfsTable> = OnceLock::new();
        self.tables
            .get(file_name)
            .unwrap_or_else(|| EMPTY.get_or_init(|| GtfsTable::empty("", &UNKNOWN_TABLE)))
    }

    pub fn row_by_key(&self, file_name: &str, key: &[&str]) -> Option<&Row> {
        self.table(file_name).row_by_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GtfsTable> {
        self.tables.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::schema_for_file;

    fn stops_rows(ids: &[&str]) -> (Vec<Row>, Vec<u64>) {
        let spec = schema_for_file(STOPS_FILE).unwrap();
        let stop_id = spec.column_index("stop_id").unwrap();
        let rows = ids
            .iter()
            .map(|id| {
                let mut cells = vec![None; spec.column_count()];
                cells[stop_id] = Some(CellValue::Text(id.to_string()));
                Row::new(cells)
            })
            .collect();
        let row_numbers = (0..ids.len() as u64).map(|index| index + 2).collect();
        (rows, row_numbers)
    }

    #[test]
    fn duplicate_keys_are_reported_and_all_rows_kept() {
        let spec = schema_for_file(STOPS_FILE).unwrap();
        let (rows, row_numbers) = stops_rows(&["S1", "S1"]);
        let mut notices = NoticeContainer::new();
        let table = GtfsTable::build(STOPS_FILE, spec, Vec::new(), rows, row_numbers, &mut notices);

        assert_eq!(table.row_count(), 2);
        assert_eq!(notices.len(), 1);
        let notice = notices.iter().next().unwrap();
        assert_eq!(notice.code, "duplicate_key");
        assert_eq!(notice.field.as_deref(), Some("stop_id"));
        assert_eq!(notice.row, Some(3));
        assert_eq!(notice.context.get("prevCsvRowNumber").unwrap().as_u64(), Some(2));
        assert_eq!(
            notice.context.get("fieldValue1").unwrap().as_str(),
            Some("S1")
        );
    }

    #[test]
    fn primary_key_lookup_finds_first_occurrence() {
        let spec = schema_for_file(STOPS_FILE).unwrap();
        let (rows, row_numbers) = stops_rows(&["S1", "S2"]);
        let mut notices = NoticeContainer::new();
        let table = GtfsTable::build(STOPS_FILE, spec, Vec::new(), rows, row_numbers, &mut notices);

        assert_eq!(table.position_by_key(&["S2"]), Some(1));
        assert_eq!(table.text(1, "stop_id"), Some("S2"));
        assert!(table.position_by_key(&["S3"]).is_none());
    }

    #[test]
    fn composite_keys_use_every_column() {
        let spec = schema_for_file(STOP_TIMES_FILE).unwrap();
        let trip_id = spec.column_index("trip_id").unwrap();
        let stop_sequence = spec.column_index("stop_sequence").unwrap();
        let mut rows = Vec::new();
        for sequence in [1_i64, 2, 1] {
            let mut cells = vec![None; spec.column_count()];
            cells[trip_id] = Some(CellValue::Text("T1".to_string()));
            cells[stop_sequence] = Some(CellValue::Integer(sequence));
            rows.push(Row::new(cells));
        }
        let mut notices = NoticeContainer::new();
        let table = GtfsTable::build(
            STOP_TIMES_FILE,
            spec,
            Vec::new(),
            rows,
            vec![2, 3, 4],
            &mut notices,
        );

        assert_eq!(notices.len(), 1);
        assert_eq!(table.position_by_key(&["T1", "2"]), Some(1));
    }

    #[test]
    fn secondary_index_preserves_insertion_order() {
        let spec = schema_for_file(TRIPS_FILE).unwrap();
        let block_id = spec.column_index("block_id").unwrap();
        let trip_id = spec.column_index("trip_id").unwrap();
        let mut rows = Vec::new();
        for (trip, block) in [("T1", "B1"), ("T2", "B2"), ("T3", "B1")] {
            let mut cells = vec![None; spec.column_count()];
            cells[trip_id] = Some(CellValue::Text(trip.to_string()));
            cells[block_id] = Some(CellValue::Text(block.to_string()));
            rows.push(Row::new(cells));
        }
        let mut notices = NoticeContainer::new();
        let table = GtfsTable::build(
            TRIPS_FILE,
            spec,
            Vec::new(),
            rows,
            vec![2, 3, 4],
            &mut notices,
        );

        assert_eq!(table.positions_with("block_id", "B1"), &[0, 2]);
        assert_eq!(table.positions_with("block_id", "B3"), &[] as &[usize]);
    }

    #[test]
    fn absent_table_behaves_as_empty() {
        let feed = GtfsFeed::default();
        assert!(feed.table(STOPS_FILE).is_empty());
        assert!(feed.row_by_key(STOPS_FILE, &["S1"]).is_none());
    }
}
