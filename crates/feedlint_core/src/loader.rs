//! Drives the CSV reader and the row parser for one table: header
//! cross-referencing, per-row typed parsing, structural notices and index
//! construction.

use std::collections::HashMap;

use tracing::debug;

use crate::csv_reader::{CsvHeader, CsvReader};
use crate::feed::{CellValue, GtfsTable, Row};
use crate::field_validator::{CellContext, FieldValidator};
use crate::notice::{NoticeContainer, NoticeSeverity, ValidationNotice};
use crate::row_parser::{empty_row_notice, RowParser};
use crate::schema::{FieldType, FileLevel, TableSpec};

/// Loads one table from raw bytes. Never fails: every problem becomes a
/// notice and the returned table holds whatever rows could be assembled.
pub fn load_table(
    file_name: &str,
    data: &[u8],
    field_validator: &FieldValidator,
    spec: &'static TableSpec,
    notices: &mut NoticeContainer,
) -> GtfsTable {
    let Some(mut reader) = CsvReader::open(data) else {
        notices.push(
            ValidationNotice::new("empty_file", NoticeSeverity::Error, "file is empty")
                .with_file(file_name),
        );
        return GtfsTable::empty(file_name, spec);
    };

    let header = reader.header().clone();
    validate_header(file_name, spec, &header, notices);
    let column_map = map_columns(spec, &header);

    let mut parser = RowParser::new(file_name, &header, field_validator);
    let mut rows = Vec::new();
    let mut row_numbers = Vec::new();
    let mut last_row_number = 1;
    let mut truncated = false;

    for row in reader.by_ref() {
        let row_number = row.row_number();
        // Blank lines are skipped by the reader; reconstruct them from
        // the gap in row numbers.
        for skipped in (last_row_number + 1)..row_number {
            notices.push(empty_row_notice(file_name, skipped));
        }
        last_row_number = row_number;

        parser.bind(row);
        if !parser.check_row_number(notices) {
            truncated = true;
            break;
        }
        if !parser.check_row_length(notices) {
            continue;
        }

        rows.push(Row::new(parse_cells(
            &parser,
            file_name,
            spec,
            &header,
            &column_map,
            field_validator,
            notices,
        )));
        row_numbers.push(row_number);
    }

    if !truncated {
        for skipped in (last_row_number + 1)..=trailing_line_count(data) {
            notices.push(empty_row_notice(file_name, skipped));
        }
    }

    debug!(file = file_name, rows = rows.len(), "table loaded");
    GtfsTable::build(file_name, spec, header.columns().to_vec(), rows, row_numbers, notices)
}

/// Produces the empty stand-in for a table absent from the input, with
/// the notice its file level calls for.
pub fn missing_table(spec: &'static TableSpec, notices: &mut NoticeContainer) -> GtfsTable {
    match spec.level {
        FileLevel::Required => notices.push(
            ValidationNotice::new(
                "missing_required_file",
                NoticeSeverity::Error,
                "missing required GTFS file",
            )
            .with_file(spec.file_name),
        ),
        FileLevel::Recommended => notices.push(
            ValidationNotice::new(
                "missing_recommended_file",
                NoticeSeverity::Warning,
                "missing recommended GTFS file",
            )
            .with_file(spec.file_name),
        ),
        FileLevel::Optional => {}
    }
    GtfsTable::empty(spec.file_name, spec)
}

pub fn unknown_file_notice(file_name: &str) -> ValidationNotice {
    ValidationNotice::new("unknown_file", NoticeSeverity::Info, "unknown file in input")
        .with_file(file_name)
}

fn validate_header(
    file_name: &str,
    spec: &TableSpec,
    header: &CsvHeader,
    notices: &mut NoticeContainer,
) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (index, column) in header.columns().iter().enumerate() {
        if column.is_empty() {
            notices.push(
                ValidationNotice::new(
                    "empty_column_name",
                    NoticeSeverity::Error,
                    "column name is empty",
                )
                .with_file(file_name)
                .with_context_field("index", index),
            );
            continue;
        }
        let normalized = column.to_ascii_lowercase();
        if let Some(&first_index) = seen.get(&normalized) {
            notices.push(
                ValidationNotice::new(
                    "duplicated_column",
                    NoticeSeverity::Error,
                    "duplicated column name",
                )
                .with_file(file_name)
                .with_context_field("fieldName", column)
                .with_context_field("firstIndex", first_index)
                .with_context_field("secondIndex", index),
            );
        } else {
            seen.insert(normalized, index);
        }
        if spec.column_index(column).is_none() {
            notices.push(
                ValidationNotice::new("unknown_column", NoticeSeverity::Info, "unknown column")
                    .with_file(file_name)
                    .with_context_field("fieldName", column)
                    .with_context_field("index", index),
            );
        }
    }

    for field in spec.fields {
        if header.column_index(field.name).is_some() {
            continue;
        }
        match field.level {
            crate::schema::FieldLevel::Required => notices.push(
                ValidationNotice::new(
                    "missing_required_column",
                    NoticeSeverity::Error,
                    "required column is missing",
                )
                .with_file(file_name)
                .with_context_field("fieldName", field.name),
            ),
            crate::schema::FieldLevel::Recommended => notices.push(
                ValidationNotice::new(
                    "missing_recommended_column",
                    NoticeSeverity::Warning,
                    "recommended column is missing",
                )
                .with_file(file_name)
                .with_context_field("fieldName", field.name),
            ),
            _ => {}
        }
    }
}

/// Descriptor column position -> CSV column position, `None` for columns
/// absent from the file.
fn map_columns(spec: &TableSpec, header: &CsvHeader) -> Vec<Option<usize>> {
    spec.fields
        .iter()
        .map(|field| header.column_index(field.name))
        .collect()
}

fn parse_cells(
    parser: &RowParser<'_>,
    file_name: &str,
    spec: &TableSpec,
    header: &CsvHeader,
    column_map: &[Option<usize>],
    field_validator: &FieldValidator,
    notices: &mut NoticeContainer,
) -> Vec<Option<CellValue>> {
    spec.fields
        .iter()
        .zip(column_map)
        .map(|(field, mapped)| {
            let Some(column) = *mapped else {
                return None;
            };
            match field.field_type {
                FieldType::Text => {
                    let value = parser.as_text(column, field.level, notices)?;
                    if field.mixed_case {
                        let context =
                            CellContext::new(file_name, parser.row_number(), header.column_name(column));
                        field_validator.validate_mixed_case(&value, context, notices);
                    }
                    Some(CellValue::Text(value))
                }
                FieldType::Id => parser.as_id(column, field.level, notices).map(CellValue::Text),
                FieldType::Url => parser.as_url(column, field.level, notices).map(CellValue::Text),
                FieldType::Email => parser
                    .as_email(column, field.level, notices)
                    .map(CellValue::Text),
                FieldType::PhoneNumber => parser
                    .as_phone_number(column, field.level, notices)
                    .map(CellValue::Text),
                FieldType::LanguageCode => parser
                    .as_language_code(column, field.level, notices)
                    .map(CellValue::Text),
                FieldType::Timezone => parser
                    .as_timezone(column, field.level, notices)
                    .map(CellValue::Text),
                FieldType::CurrencyCode => parser
                    .as_currency_code(column, field.level, notices)
                    .map(CellValue::Text),
                FieldType::Float => match field.bounds {
                    Some(bounds) => parser
                        .as_float_bounded(column, field.level, bounds, notices)
                        .map(CellValue::Float),
                    None => parser.as_float(column, field.level, notices).map(CellValue::Float),
                },
                FieldType::Integer => match field.bounds {
                    Some(bounds) => parser
                        .as_integer_bounded(column, field.level, bounds, notices)
                        .map(CellValue::Integer),
                    None => parser
                        .as_integer(column, field.level, notices)
                        .map(CellValue::Integer),
                },
                FieldType::Decimal => match field.bounds {
                    Some(bounds) => parser
                        .as_decimal_bounded(column, field.level, bounds, notices)
                        .map(CellValue::Decimal),
                    None => parser
                        .as_decimal(column, field.level, notices)
                        .map(CellValue::Decimal),
                },
                FieldType::Latitude => parser
                    .as_latitude(column, field.level, notices)
                    .map(CellValue::Float),
                FieldType::Longitude => parser
                    .as_longitude(column, field.level, notices)
                    .map(CellValue::Float),
                FieldType::Color => parser
                    .as_color(column, field.level, notices)
                    .map(CellValue::Color),
                FieldType::Time => parser.as_time(column, field.level, notices).map(CellValue::Time),
                FieldType::Date => parser.as_date(column, field.level, notices).map(CellValue::Date),
                FieldType::Enum(kind) => parser
                    .as_enum(column, field.level, kind, notices)
                    .map(CellValue::Enum),
            }
        })
        .collect()
}

/// Number of physical lines, not counting the trailing terminator.
fn trailing_line_count(data: &[u8]) -> u64 {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(data);
    let mut count = data.split(|&byte| byte == b'\n').count() as u64;
    if data.ends_with(b"\n") || data.is_empty() {
        count = count.saturating_sub(1);
    }
    count
}
