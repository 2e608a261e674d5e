//! Renders a [`NoticeContainer`] into the JSON report files and a small
//! HTML summary page.

mod html;

pub use html::write_html_report;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use feedlint_core::{NoticeContainer, NoticeSeverity};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report")]
    Json(#[from] serde_json::Error),
}

/// One per-code group in the report, ordered by code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeGroupRecord {
    pub code: String,
    pub severity: NoticeSeverity,
    #[serde(rename = "totalNotices")]
    pub total_notices: u64,
    #[serde(rename = "sampleNotices")]
    pub sample_notices: Vec<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub notices: Vec<NoticeGroupRecord>,
}

impl ValidationReport {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validation notices grouped per code, samples in the container's
    /// deterministic export order.
    pub fn from_container(container: &NoticeContainer) -> Self {
        let notices = container
            .grouped()
            .into_iter()
            .map(|group| NoticeGroupRecord {
                code: group.code.to_string(),
                severity: group.severity,
                total_notices: group.total_notices,
                sample_notices: group
                    .samples
                    .iter()
                    .map(|notice| notice.context.clone())
                    .collect(),
            })
            .collect();
        Self { notices }
    }

    /// System errors rendered in the same group shape, for
    /// `system_errors.json`.
    pub fn from_system_errors(container: &NoticeContainer) -> Self {
        let errors = container.system_errors();
        if errors.is_empty() {
            return Self::empty();
        }
        let sample_notices = errors
            .iter()
            .map(|error| {
                let mut fields = BTreeMap::new();
                fields.insert("validator".to_string(), Value::String(error.validator.clone()));
                fields.insert("exception".to_string(), Value::String(error.exception.clone()));
                fields.insert("message".to_string(), Value::String(error.message.clone()));
                fields
            })
            .collect();
        Self {
            notices: vec![NoticeGroupRecord {
                code: "runtime_exception_in_validator_error".to_string(),
                severity: NoticeSeverity::Error,
                total_notices: errors.len() as u64,
                sample_notices,
            }],
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>, pretty: bool) -> Result<(), ReportError> {
        let path = path.as_ref();
        let body = if pretty {
            serde_json::to_vec_pretty(self)?
        } else {
            serde_json::to_vec(self)?
        };
        std::fs::write(path, body).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn count_by_severity(&self, severity: NoticeSeverity) -> u64 {
        self.notices
            .iter()
            .filter(|group| group.severity == severity)
            .map(|group| group.total_notices)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedlint_core::{SystemError, ValidationNotice};

    fn container_with_notices() -> NoticeContainer {
        let mut container = NoticeContainer::new();
        container.push(
            ValidationNotice::new("invalid_date", NoticeSeverity::Error, "bad date")
                .with_location("calendar.txt", 2, "start_date")
                .with_context_field("fieldValue", "2018-09-13"),
        );
        container.push(
            ValidationNotice::new("empty_row", NoticeSeverity::Warning, "empty")
                .with_file("stops.txt")
                .with_context_field("csvRowNumber", 5),
        );
        container.push(
            ValidationNotice::new("invalid_date", NoticeSeverity::Error, "bad date")
                .with_location("calendar.txt", 7, "end_date")
                .with_context_field("fieldValue", "13/09/2018"),
        );
        container
    }

    #[test]
    fn groups_notices_by_code_in_order() {
        let report = ValidationReport::from_container(&container_with_notices());

        assert_eq!(report.notices.len(), 2);
        assert_eq!(report.notices[0].code, "empty_row");
        assert_eq!(report.notices[1].code, "invalid_date");
        assert_eq!(report.notices[1].total_notices, 2);
        assert_eq!(report.notices[1].sample_notices.len(), 2);
        assert_eq!(
            report.notices[1].sample_notices[0]
                .get("filename")
                .and_then(Value::as_str),
            Some("calendar.txt")
        );
    }

    #[test]
    fn totals_exceed_samples_past_the_quota() {
        let mut container = NoticeContainer::with_max_per_code(2);
        for row in 0..5 {
            container.push(
                ValidationNotice::new("invalid_url", NoticeSeverity::Error, "bad url")
                    .with_location("agency.txt", row, "agency_url"),
            );
        }

        let report = ValidationReport::from_container(&container);
        assert_eq!(report.notices[0].total_notices, 5);
        assert_eq!(report.notices[0].sample_notices.len(), 2);
    }

    #[test]
    fn system_errors_render_in_group_shape() {
        let mut container = NoticeContainer::new();
        container.push_system_error(SystemError::new("broken_rule", "panic", "boom"));

        let report = ValidationReport::from_system_errors(&container);
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].code, "runtime_exception_in_validator_error");
        assert_eq!(
            report.notices[0].sample_notices[0]
                .get("validator")
                .and_then(Value::as_str),
            Some("broken_rule")
        );

        let empty = ValidationReport::from_system_errors(&NoticeContainer::new());
        assert!(empty.notices.is_empty());
    }

    #[test]
    fn json_round_trips() {
        let report = ValidationReport::from_container(&container_with_notices());
        let body = serde_json::to_string(&report).unwrap();
        let parsed: ValidationReport = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.notices.len(), report.notices.len());
        assert!(body.contains("\"totalNotices\""));
        assert!(body.contains("\"sampleNotices\""));
    }
}
