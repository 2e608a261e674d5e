use crate::feed::{GtfsTable, STOP_TIMES_FILE};
use crate::notice::{NoticeContainer, NoticeSeverity, ValidationNotice};
use crate::validator::FileValidator;

const CODE_ONLY_ARRIVAL_OR_DEPARTURE: &str = "stop_time_with_only_arrival_or_departure_time";
const CODE_ARRIVAL_BEFORE_PREVIOUS_DEPARTURE: &str =
    "stop_time_with_arrival_before_previous_departure_time";

/// Within a trip, arrival and departure times must come in pairs and may
/// never run backwards along the stop sequence.
#[derive(Debug, Default)]
pub struct StopTimeTimesValidator;

impl FileValidator for StopTimeTimesValidator {
    fn name(&self) -> &'static str {
        "stop_time_times"
    }

    fn file(&self) -> &'static str {
        STOP_TIMES_FILE
    }

    fn validate(&self, table: &GtfsTable, notices: &mut NoticeContainer) {
        let trip_ids: Vec<String> = table
            .indexed_values("trip_id")
            .map(str::to_string)
            .collect();
        for trip_id in trip_ids {
            let mut stop_times: Vec<usize> = table.positions_with("trip_id", &trip_id).to_vec();
            stop_times.sort_by_key(|&position| {
                table
                    .cell(position, "stop_sequence")
                    .and_then(|cell| cell.as_integer())
                    .unwrap_or(i64::MAX)
            });

            let mut previous_departure: Option<(feedlint_model::GtfsTime, u64)> = None;
            for position in stop_times {
                let row_number = table.row_number(position);
                let arrival = table
                    .cell(position, "arrival_time")
                    .and_then(|cell| cell.as_time());
                let departure = table
                    .cell(position, "departure_time")
                    .and_then(|cell| cell.as_time());

                if arrival.is_some() != departure.is_some() {
                    let specified_field = if arrival.is_some() {
                        "arrival_time"
                    } else {
                        "departure_time"
                    };
                    notices.push(
                        ValidationNotice::new(
                            CODE_ONLY_ARRIVAL_OR_DEPARTURE,
                            NoticeSeverity::Error,
                            "arrival_time and departure_time must both be set or both empty",
                        )
                        .with_location(table.file_name(), row_number, specified_field)
                        .with_context_field("tripId", trip_id.as_str()),
                    );
                }

                if let (Some(arrival), Some((prev_departure, prev_row_number))) =
                    (arrival, previous_departure)
                {
                    if arrival < prev_departure {
                        notices.push(
                            ValidationNotice::new(
                                CODE_ARRIVAL_BEFORE_PREVIOUS_DEPARTURE,
                                NoticeSeverity::Error,
                                "arrival_time is before the previous stop's departure_time",
                            )
                            .with_location(table.file_name(), row_number, "arrival_time")
                            .with_context_field("arrivalTime", arrival)
                            .with_context_field("departureTime", prev_departure)
                            .with_context_field("prevCsvRowNumber", prev_row_number)
                            .with_context_field("tripId", trip_id.as_str()),
                        );
                    }
                }

                if let Some(departure) = departure {
                    previous_departure = Some((departure, row_number));
                }
            }
        }
    }
}
