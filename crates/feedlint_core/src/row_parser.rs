//! Parses cells of a CSV row as values of the requested semantic types.
//!
//! Accessors never abort the row: a cell that cannot be parsed adds
//! exactly one notice to the container and yields `None`.

use feedlint_model::{GtfsColor, GtfsDate, GtfsDecimal, GtfsTime};

use crate::csv_reader::{CsvHeader, CsvRow};
use crate::field_validator::{CellContext, FieldValidator};
use crate::notice::{NoticeContainer, NoticeSeverity, ValidationNotice};
use crate::schema::{EnumKind, FieldLevel, NumberBounds, UNRECOGNIZED_ENUM_VALUE};

/// The largest observed feeds stay around 100 M rows; cap at one billion.
pub const MAX_ROW_NUMBER: u64 = 1_000_000_000;

pub struct RowParser<'a> {
    file_name: &'a str,
    header: &'a CsvHeader,
    field_validator: &'a FieldValidator,
    row: CsvRow,
}

impl<'a> RowParser<'a> {
    pub fn new(
        file_name: &'a str,
        header: &'a CsvHeader,
        field_validator: &'a FieldValidator,
    ) -> Self {
        Self {
            file_name,
            header,
            field_validator,
            row: CsvRow::new(0, Vec::new()),
        }
    }

    /// Binds the parser to the next data row.
    pub fn bind(&mut self, row: CsvRow) {
        self.row = row;
    }

    pub fn row_number(&self) -> u64 {
        self.row.row_number()
    }

    fn context(&self, column: usize) -> CellContext<'_> {
        CellContext::new(
            self.file_name,
            self.row.row_number(),
            self.header.column_name(column),
        )
    }

    /// Rejects rows past the hard cap; the caller stops reading after the
    /// first failure.
    pub fn check_row_number(&self, notices: &mut NoticeContainer) -> bool {
        if self.row.row_number() > MAX_ROW_NUMBER {
            notices.push(
                ValidationNotice::new(
                    "too_many_rows",
                    NoticeSeverity::Error,
                    "csv file has too many rows",
                )
                .with_file(self.file_name)
                .with_context_field("rowNumber", self.row.row_number()),
            );
            return false;
        }
        true
    }

    /// Checks the cell count against the header before typed parsing.
    ///
    /// A single-cell null row is how an all-whitespace trailing line
    /// without terminator surfaces; it is an empty row, not a length
    /// mismatch.
    pub fn check_row_length(&self, notices: &mut NoticeContainer) -> bool {
        let column_count = self.row.column_count();
        if column_count == 0 {
            return false;
        }

        if column_count == 1 && self.row.cell(0).is_none() {
            notices.push(empty_row_notice(self.file_name, self.row.row_number()));
            return false;
        }

        if column_count != self.header.column_count() {
            notices.push(
                ValidationNotice::new(
                    "invalid_row_length",
                    NoticeSeverity::Error,
                    "row length does not match header length",
                )
                .with_file(self.file_name)
                .with_context_field("csvRowNumber", self.row.row_number())
                .with_context_field("rowLength", column_count)
                .with_context_field("headerCount", self.header.column_count()),
            );
            return false;
        }
        true
    }

    pub fn as_string(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<String> {
        match self.row.cell(column) {
            None => {
                match level {
                    FieldLevel::Required => notices.push(missing_field_notice(
                        "missing_required_field",
                        NoticeSeverity::Error,
                        "required field is missing",
                        self.context(column),
                    )),
                    FieldLevel::Recommended => notices.push(missing_field_notice(
                        "missing_recommended_field",
                        NoticeSeverity::Warning,
                        "recommended field is missing",
                        self.context(column),
                    )),
                    FieldLevel::Optional | FieldLevel::ConditionallyRequired => {}
                }
                None
            }
            Some(raw) => {
                Some(
                    self.field_validator
                        .validate_field(raw, self.context(column), notices),
                )
            }
        }
    }

    pub fn as_text(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<String> {
        self.as_string(column, level, notices)
    }

    pub fn as_id(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<String> {
        let value = self.as_string(column, level, notices)?;
        self.field_validator
            .validate_id(&value, self.context(column), notices)
            .then_some(value)
    }

    pub fn as_url(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<String> {
        let value = self.as_string(column, level, notices)?;
        self.field_validator
            .validate_url(&value, self.context(column), notices)
            .then_some(value)
    }

    pub fn as_email(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<String> {
        let value = self.as_string(column, level, notices)?;
        self.field_validator
            .validate_email(&value, self.context(column), notices)
            .then_some(value)
    }

    pub fn as_phone_number(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<String> {
        let value = self.as_string(column, level, notices)?;
        self.field_validator
            .validate_phone_number(&value, self.context(column), notices)
            .then_some(value)
    }

    pub fn as_language_code(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<String> {
        let value = self.as_string(column, level, notices)?;
        self.field_validator
            .validate_language_code(&value, self.context(column), notices)
            .then_some(value)
    }

    pub fn as_timezone(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<String> {
        let value = self.as_string(column, level, notices)?;
        self.field_validator
            .validate_timezone(&value, self.context(column), notices)
            .then_some(value)
    }

    pub fn as_currency_code(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<String> {
        let value = self.as_string(column, level, notices)?;
        self.field_validator
            .validate_currency_code(&value, self.context(column), notices)
            .then_some(value)
    }

    pub fn as_float(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<f64> {
        self.parse_as_type(
            column,
            level,
            notices,
            |value| value.parse::<f64>().ok(),
            "invalid_float",
            "field cannot be parsed as float",
        )
    }

    pub fn as_float_bounded(
        &self,
        column: usize,
        level: FieldLevel,
        bounds: NumberBounds,
        notices: &mut NoticeContainer,
    ) -> Option<f64> {
        let value = self.as_float(column, level, notices)?;
        self.check_bounds(value.partial_cmp(&0.0), bounds, "float", column, value, notices);
        Some(value)
    }

    pub fn as_integer(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<i64> {
        self.parse_as_type(
            column,
            level,
            notices,
            |value| value.parse::<i64>().ok(),
            "invalid_integer",
            "field cannot be parsed as integer",
        )
    }

    pub fn as_integer_bounded(
        &self,
        column: usize,
        level: FieldLevel,
        bounds: NumberBounds,
        notices: &mut NoticeContainer,
    ) -> Option<i64> {
        let value = self.as_integer(column, level, notices)?;
        self.check_bounds(Some(value.cmp(&0)), bounds, "integer", column, value, notices);
        Some(value)
    }

    pub fn as_decimal(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<GtfsDecimal> {
        self.parse_as_type(
            column,
            level,
            notices,
            |value| GtfsDecimal::parse(value).ok(),
            "invalid_float",
            "field cannot be parsed as decimal",
        )
    }

    pub fn as_decimal_bounded(
        &self,
        column: usize,
        level: FieldLevel,
        bounds: NumberBounds,
        notices: &mut NoticeContainer,
    ) -> Option<GtfsDecimal> {
        let value = self.as_decimal(column, level, notices)?;
        let rendered = value.to_string();
        self.check_bounds(
            Some(value.cmp_zero()),
            bounds,
            "decimal",
            column,
            rendered,
            notices,
        );
        Some(value)
    }

    pub fn as_latitude(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<f64> {
        let value = self.as_float(column, level, notices)?;
        if !(-90.0..=90.0).contains(&value) {
            notices.push(self.out_of_range_notice(column, "latitude within [-90, 90]", value));
        }
        Some(value)
    }

    pub fn as_longitude(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<f64> {
        let value = self.as_float(column, level, notices)?;
        if !(-180.0..=180.0).contains(&value) {
            notices.push(self.out_of_range_notice(column, "longitude within [-180, 180]", value));
        }
        Some(value)
    }

    pub fn as_color(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<GtfsColor> {
        self.parse_as_type(
            column,
            level,
            notices,
            |value| GtfsColor::parse(value).ok(),
            "invalid_color",
            "field cannot be parsed as color",
        )
    }

    pub fn as_time(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<GtfsTime> {
        self.parse_as_type(
            column,
            level,
            notices,
            |value| GtfsTime::parse(value).ok(),
            "invalid_time",
            "field cannot be parsed as time",
        )
    }

    pub fn as_date(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
    ) -> Option<GtfsDate> {
        self.parse_as_type(
            column,
            level,
            notices,
            |value| GtfsDate::parse(value).ok(),
            "invalid_date",
            "field cannot be parsed as date",
        )
    }

    /// Integer-coded enums. An out-of-codec value is reported and mapped
    /// to the unrecognized sentinel so downstream rules can still see it.
    pub fn as_enum(
        &self,
        column: usize,
        level: FieldLevel,
        kind: EnumKind,
        notices: &mut NoticeContainer,
    ) -> Option<i16> {
        let value = self.as_integer(column, level, notices)?;
        if kind.allows(value) {
            Some(value as i16)
        } else {
            notices.push(
                ValidationNotice::new(
                    "unexpected_enum_value",
                    NoticeSeverity::Error,
                    "unexpected enum value",
                )
                .with_location(
                    self.file_name,
                    self.row.row_number(),
                    self.header.column_name(column),
                )
                .with_context_field("fieldValue", value),
            );
            Some(UNRECOGNIZED_ENUM_VALUE)
        }
    }

    fn parse_as_type<T>(
        &self,
        column: usize,
        level: FieldLevel,
        notices: &mut NoticeContainer,
        parse: impl FnOnce(&str) -> Option<T>,
        code: &str,
        message: &str,
    ) -> Option<T> {
        let value = self.as_string(column, level, notices)?;
        match parse(&value) {
            Some(parsed) => Some(parsed),
            None => {
                notices.push(
                    ValidationNotice::new(code, NoticeSeverity::Error, message)
                        .with_location(
                            self.file_name,
                            self.row.row_number(),
                            self.header.column_name(column),
                        )
                        .with_context_field("fieldValue", value),
                );
                None
            }
        }
    }

    fn check_bounds<V: serde::Serialize>(
        &self,
        compare_to_zero: Option<std::cmp::Ordering>,
        bounds: NumberBounds,
        type_name: &str,
        column: usize,
        value: V,
        notices: &mut NoticeContainer,
    ) {
        use std::cmp::Ordering;

        let Some(ordering) = compare_to_zero else {
            return;
        };
        let violated = match bounds {
            NumberBounds::Positive => ordering != Ordering::Greater,
            NumberBounds::NonNegative => ordering == Ordering::Less,
            NumberBounds::NonZero => ordering == Ordering::Equal,
        };
        if violated {
            notices.push(self.out_of_range_notice(column, &bounds.describe(type_name), value));
        }
    }

    fn out_of_range_notice<V: serde::Serialize>(
        &self,
        column: usize,
        bound_description: &str,
        value: V,
    ) -> ValidationNotice {
        ValidationNotice::new(
            "number_out_of_range",
            NoticeSeverity::Error,
            "number is out of range",
        )
        .with_location(
            self.file_name,
            self.row.row_number(),
            self.header.column_name(column),
        )
        .with_context_field("bounds", bound_description)
        .with_context_field("fieldValue", value)
    }
}

pub(crate) fn empty_row_notice(file_name: &str, row_number: u64) -> ValidationNotice {
    ValidationNotice::new("empty_row", NoticeSeverity::Warning, "row is empty")
        .with_file(file_name)
        .with_context_field("csvRowNumber", row_number)
}

fn missing_field_notice(
    code: &str,
    severity: NoticeSeverity,
    message: &str,
    context: CellContext<'_>,
) -> ValidationNotice {
    ValidationNotice::new(code, severity, message).with_location(
        context.file_name,
        context.row_number,
        context.field_name,
    )
}
