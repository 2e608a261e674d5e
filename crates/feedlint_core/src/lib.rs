//! Core pipeline of the feedlint GTFS Schedule validator.
//!
//! Raw bytes flow through the CSV reader and the schema-driven row parser
//! into immutable, indexed tables; registered single-file and cross-file
//! validators then run over the loaded feed, and every finding lands in a
//! [`NoticeContainer`] for deterministic reporting.

pub mod csv_reader;
pub mod feed;
pub mod field_validator;
pub mod input;
pub mod loader;
pub mod notice;
pub mod options;
pub mod row_parser;
pub mod rules;
pub mod schema;
pub mod scheduler;
pub mod validator;

pub use csv_reader::{CsvHeader, CsvReader, CsvRow};
pub use feed::{CellValue, GtfsFeed, GtfsTable, Row};
pub use field_validator::{CellContext, FieldValidator};
pub use input::{GtfsInput, GtfsInputError};
pub use loader::{load_table, missing_table};
pub use notice::{
    NoticeContainer, NoticeGroup, NoticeSeverity, SystemError, ValidationNotice,
    DEFAULT_MAX_NOTICES_PER_CODE,
};
pub use options::{CountryCode, ValidationOptions};
pub use row_parser::{RowParser, MAX_ROW_NUMBER};
pub use rules::default_registry;
pub use schema::{
    schema_for_file, EnumKind, FieldLevel, FieldSpec, FieldType, FileLevel, ForeignKeyRef,
    NumberBounds, TableSpec, GTFS_TABLES, UNRECOGNIZED_ENUM_VALUE,
};
pub use scheduler::{validate_input, ValidationOutcome};
pub use validator::{CrossFileValidator, FileValidator, ValidatorRegistry};
