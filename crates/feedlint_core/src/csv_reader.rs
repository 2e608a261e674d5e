//! Streaming CSV access for a single GTFS table: a header plus data rows
//! tagged with their 1-based CSV row number (the header is row 1).

use csv::{ReaderBuilder, StringRecordsIntoIter};

/// The parsed header row. Column names are stored trimmed.
#[derive(Debug, Clone, Default)]
pub struct CsvHeader {
    columns: Vec<String>,
}

impl CsvHeader {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_name(&self, index: usize) -> &str {
        self.columns.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// A data row. A cell is `None` when it is empty after trimming; the
/// stored string keeps the original surrounding whitespace so the field
/// validator can flag it.
#[derive(Debug, Clone)]
pub struct CsvRow {
    row_number: u64,
    cells: Vec<Option<String>>,
}

impl CsvRow {
    pub fn new(row_number: u64, cells: Vec<Option<String>>) -> Self {
        Self { row_number, cells }
    }

    /// 1-based CSV row number; the first data row is 2.
    pub fn row_number(&self) -> u64 {
        self.row_number
    }

    pub fn column_count(&self) -> usize {
        self.cells.len()
    }

    /// Raw cell value, `None` for empty cells.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|cell| cell.as_deref())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }
}

/// Lazy reader over one table's bytes. Restart by calling
/// [`CsvReader::open`] on the same bytes again.
pub struct CsvReader<'d> {
    header: CsvHeader,
    records: StringRecordsIntoIter<&'d [u8]>,
    next_index: u64,
}

impl<'d> CsvReader<'d> {
    /// Opens the table, consuming the header row. Returns `None` when the
    /// file holds no header at all.
    pub fn open(data: &'d [u8]) -> Option<Self> {
        let data = strip_utf8_bom(data);
        if data.iter().all(|byte| byte.is_ascii_whitespace()) {
            return None;
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);
        let columns: Vec<String> = match reader.headers() {
            Ok(record) => record.iter().map(|value| value.trim().to_string()).collect(),
            Err(_) => return None,
        };

        Some(Self {
            header: CsvHeader::new(columns),
            records: reader.into_records(),
            next_index: 0,
        })
    }

    pub fn header(&self) -> &CsvHeader {
        &self.header
    }
}

impl Iterator for CsvReader<'_> {
    type Item = CsvRow;

    fn next(&mut self) -> Option<CsvRow> {
        loop {
            let result = self.records.next()?;
            let index = self.next_index;
            self.next_index += 1;
            let record = match result {
                Ok(record) => record,
                // Malformed records are surfaced by the loader through the
                // row-length checks on neighbouring rows; skip here.
                Err(_) => continue,
            };

            let row_number = record
                .position()
                .map(|position| position.line())
                .unwrap_or(index + 2);
            let cells = record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    }
                })
                .collect();
            return Some(CsvRow::new(row_number, cells));
        }
    }
}

fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(data)
}
