use std::collections::{HashMap, HashSet};

use crate::feed::{
    GtfsFeed, ATTRIBUTIONS_FILE, FARE_ATTRIBUTES_FILE, FARE_LEG_JOIN_RULES_FILE,
    FARE_LEG_RULES_FILE, FARE_PRODUCTS_FILE, FARE_RULES_FILE, FARE_TRANSFER_RULES_FILE,
    FREQUENCIES_FILE, LOCATION_GROUP_STOPS_FILE, PATHWAYS_FILE, ROUTES_FILE, ROUTE_NETWORKS_FILE,
    STOPS_FILE, STOP_AREAS_FILE, STOP_TIMES_FILE, TRANSFERS_FILE, TRIPS_FILE,
};
use crate::notice::{NoticeContainer, NoticeSeverity, ValidationNotice};
use crate::schema::GTFS_TABLES;
use crate::validator::CrossFileValidator;

const CODE_FOREIGN_KEY_VIOLATION: &str = "foreign_key_violation";

/// Descriptor-driven referential integrity: every declared foreign-key
/// value must appear in the referenced table's column.
#[derive(Debug, Default)]
pub struct ForeignKeyValidator;

impl CrossFileValidator for ForeignKeyValidator {
    fn name(&self) -> &'static str {
        "foreign_key"
    }

    fn files(&self) -> &'static [&'static str] {
        &[
            STOPS_FILE,
            ROUTES_FILE,
            TRIPS_FILE,
            STOP_TIMES_FILE,
            FARE_ATTRIBUTES_FILE,
            FARE_RULES_FILE,
            FARE_PRODUCTS_FILE,
            FARE_LEG_RULES_FILE,
            FARE_TRANSFER_RULES_FILE,
            FARE_LEG_JOIN_RULES_FILE,
            STOP_AREAS_FILE,
            FREQUENCIES_FILE,
            TRANSFERS_FILE,
            PATHWAYS_FILE,
            LOCATION_GROUP_STOPS_FILE,
            ROUTE_NETWORKS_FILE,
            ATTRIBUTIONS_FILE,
        ]
    }

    fn validate(&self, feed: &GtfsFeed, notices: &mut NoticeContainer) {
        // Parent value sets, built once per (table, column) pair.
        let mut parent_values: HashMap<(&str, &str), HashSet<String>> = HashMap::new();

        for spec in GTFS_TABLES {
            let table = feed.table(spec.file_name);
            for (field, reference) in spec.foreign_keys() {
                let values = parent_values
                    .entry((reference.table, reference.field))
                    .or_insert_with(|| collect_column_values(feed, reference.table, reference.field));

                for position in 0..table.row_count() {
                    let Some(value) = table.text(position, field.name) else {
                        continue;
                    };
                    if !values.contains(value) {
                        notices.push(
                            ValidationNotice::new(
                                CODE_FOREIGN_KEY_VIOLATION,
                                NoticeSeverity::Error,
                                "value does not exist in the referenced table",
                            )
                            .with_location(spec.file_name, table.row_number(position), field.name)
                            .with_context_field("fieldValue", value)
                            .with_context_field("referencedFilename", reference.table)
                            .with_context_field("referencedFieldName", reference.field),
                        );
                    }
                }
            }
        }
    }
}

fn collect_column_values(feed: &GtfsFeed, file_name: &str, field_name: &str) -> HashSet<String> {
    let table = feed.table(file_name);
    (0..table.row_count())
        .filter_map(|position| table.text(position, field_name).map(str::to_string))
        .collect()
}
