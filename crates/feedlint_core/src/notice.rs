use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default cap on stored notices per code. Surplus occurrences only bump
/// the per-code total.
pub const DEFAULT_MAX_NOTICES_PER_CODE: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoticeSeverity {
    Error,
    Warning,
    Info,
}

/// A single validation finding with its cell context and typed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationNotice {
    pub code: String,
    pub severity: NoticeSeverity,
    pub message: String,
    pub file: Option<String>,
    pub row: Option<u64>,
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, Value>,
}

impl ValidationNotice {
    pub fn new(
        code: impl Into<String>,
        severity: NoticeSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            file: None,
            row: None,
            field: None,
            context: BTreeMap::new(),
        }
    }

    pub fn insert_context_field<V: Serialize>(&mut self, name: impl Into<String>, value: V) {
        let serialized = serde_json::to_value(value).unwrap_or(Value::Null);
        self.context.insert(name.into(), serialized);
    }

    pub fn with_context_field<V: Serialize>(mut self, name: impl Into<String>, value: V) -> Self {
        self.insert_context_field(name, value);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        let file = file.into();
        self.insert_context_field("filename", file.clone());
        self.file = Some(file);
        self
    }

    pub fn with_location(
        mut self,
        file: impl Into<String>,
        row: u64,
        field: impl Into<String>,
    ) -> Self {
        let file = file.into();
        let field = field.into();
        self.insert_context_field("filename", file.clone());
        self.insert_context_field("csvRowNumber", row);
        self.insert_context_field("fieldName", field.clone());
        self.file = Some(file);
        self.row = Some(row);
        self.field = Some(field);
        self
    }

    /// Sort key for deterministic report emission.
    fn sort_key(&self) -> (&str, Option<&str>, Option<u64>, Option<&str>) {
        (
            self.code.as_str(),
            self.file.as_deref(),
            self.row,
            self.field.as_deref(),
        )
    }
}

/// An exception captured inside a validator, kept apart from validation
/// notices and reported through `system_errors.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemError {
    pub validator: String,
    pub exception: String,
    pub message: String,
}

impl SystemError {
    pub fn new(
        validator: impl Into<String>,
        exception: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            validator: validator.into(),
            exception: exception.into(),
            message: message.into(),
        }
    }
}

/// A per-code group of notices, the unit of the JSON report.
#[derive(Debug)]
pub struct NoticeGroup<'a> {
    pub code: &'a str,
    pub severity: NoticeSeverity,
    pub total_notices: u64,
    pub samples: Vec<&'a ValidationNotice>,
}

/// Aggregation point for validation notices and system errors.
///
/// Containers are worker-local during parallel stages and merged at job
/// end; `merge` is associative and commutative up to the final sort, so
/// the exported report does not depend on scheduling order.
#[derive(Debug)]
pub struct NoticeContainer {
    notices: Vec<ValidationNotice>,
    system_errors: Vec<SystemError>,
    total_per_code: BTreeMap<String, u64>,
    stored_per_code: BTreeMap<String, usize>,
    max_per_code: usize,
}

impl Default for NoticeContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeContainer {
    pub fn new() -> Self {
        Self::with_max_per_code(DEFAULT_MAX_NOTICES_PER_CODE)
    }

    pub fn with_max_per_code(max_per_code: usize) -> Self {
        Self {
            notices: Vec::new(),
            system_errors: Vec::new(),
            total_per_code: BTreeMap::new(),
            stored_per_code: BTreeMap::new(),
            max_per_code,
        }
    }

    pub fn push(&mut self, notice: ValidationNotice) {
        *self
            .total_per_code
            .entry(notice.code.clone())
            .or_insert(0) += 1;
        let stored = self.stored_per_code.entry(notice.code.clone()).or_insert(0);
        if *stored < self.max_per_code {
            *stored += 1;
            self.notices.push(notice);
        }
    }

    pub fn push_system_error(&mut self, error: SystemError) {
        self.system_errors.push(error);
    }

    pub fn merge(&mut self, other: NoticeContainer) {
        for (code, total) in other.total_per_code {
            let stored_in_other = other
                .stored_per_code
                .get(&code)
                .copied()
                .unwrap_or_default();
            *self.total_per_code.entry(code.clone()).or_insert(0) +=
                total - stored_in_other as u64;
        }
        for notice in other.notices {
            self.push(notice);
        }
        self.system_errors.extend(other.system_errors);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationNotice> {
        self.notices.iter()
    }

    pub fn system_errors(&self) -> &[SystemError] {
        &self.system_errors
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// True count of notices added under `code`, including dropped ones.
    pub fn total_for_code(&self, code: &str) -> u64 {
        self.total_per_code.get(code).copied().unwrap_or_default()
    }

    pub fn count_by_severity(&self, severity: NoticeSeverity) -> u64 {
        self.grouped()
            .iter()
            .filter(|group| group.severity == severity)
            .map(|group| group.total_notices)
            .sum()
    }

    pub fn has_errors(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| notice.severity == NoticeSeverity::Error)
    }

    /// Notices ordered by `(code, file, row, field)`. Ties beyond the key
    /// keep insertion order.
    pub fn export_sorted(&self) -> Vec<&ValidationNotice> {
        let mut sorted: Vec<&ValidationNotice> = self.notices.iter().collect();
        sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        sorted
    }

    /// Per-code groups in code order, samples sorted like `export_sorted`.
    pub fn grouped(&self) -> Vec<NoticeGroup<'_>> {
        let mut by_code: BTreeMap<&str, Vec<&ValidationNotice>> = BTreeMap::new();
        for notice in &self.notices {
            by_code.entry(notice.code.as_str()).or_default().push(notice);
        }
        by_code
            .into_iter()
            .map(|(code, mut samples)| {
                samples.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
                NoticeGroup {
                    code,
                    severity: samples[0].severity,
                    total_notices: self.total_for_code(code),
                    samples,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(code: &str, severity: NoticeSeverity, file: &str, row: u64) -> ValidationNotice {
        ValidationNotice::new(code, severity, "test").with_location(file, row, "field")
    }

    #[test]
    fn quota_caps_storage_but_counts_all() {
        let mut container = NoticeContainer::with_max_per_code(3);
        for row in 0..10 {
            container.push(notice("invalid_date", NoticeSeverity::Error, "a.txt", row));
        }

        assert_eq!(container.len(), 3);
        assert_eq!(container.total_for_code("invalid_date"), 10);
        let groups = container.grouped();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_notices, 10);
        assert_eq!(groups[0].samples.len(), 3);
    }

    #[test]
    fn merge_combines_totals_across_quota() {
        let mut left = NoticeContainer::with_max_per_code(2);
        let mut right = NoticeContainer::with_max_per_code(2);
        for row in 0..3 {
            left.push(notice("empty_row", NoticeSeverity::Warning, "a.txt", row));
            right.push(notice("empty_row", NoticeSeverity::Warning, "b.txt", row));
        }

        left.merge(right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.total_for_code("empty_row"), 6);
    }

    #[test]
    fn merge_is_associative_up_to_sort() {
        let build = |file: &str| {
            let mut container = NoticeContainer::new();
            container.push(notice("b_code", NoticeSeverity::Error, file, 2));
            container.push(notice("a_code", NoticeSeverity::Warning, file, 3));
            container
        };

        let mut left_first = build("x.txt");
        left_first.merge(build("y.txt"));
        left_first.merge(build("z.txt"));

        let mut right_first = build("z.txt");
        right_first.merge(build("y.txt"));
        right_first.merge(build("x.txt"));

        let keys = |container: &NoticeContainer| {
            container
                .export_sorted()
                .iter()
                .map(|n| (n.code.clone(), n.file.clone(), n.row))
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(&left_first), keys(&right_first));
    }

    #[test]
    fn export_sorts_by_code_file_row() {
        let mut container = NoticeContainer::new();
        container.push(notice("z_code", NoticeSeverity::Error, "a.txt", 2));
        container.push(notice("a_code", NoticeSeverity::Error, "b.txt", 9));
        container.push(notice("a_code", NoticeSeverity::Error, "a.txt", 5));

        let sorted = container.export_sorted();
        assert_eq!(sorted[0].code, "a_code");
        assert_eq!(sorted[0].file.as_deref(), Some("a.txt"));
        assert_eq!(sorted[1].file.as_deref(), Some("b.txt"));
        assert_eq!(sorted[2].code, "z_code");
    }

    #[test]
    fn system_errors_stay_separate() {
        let mut container = NoticeContainer::new();
        container.push_system_error(SystemError::new("broken_rule", "panic", "boom"));

        assert!(container.is_empty());
        assert_eq!(container.system_errors().len(), 1);
        assert!(!container.has_errors());
    }
}
