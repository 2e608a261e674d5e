use crate::feed::{GtfsTable, ROUTES_FILE};
use crate::notice::{NoticeContainer, NoticeSeverity, ValidationNotice};
use crate::validator::FileValidator;

const CODE_ROUTE_COLOR_CONTRAST: &str = "route_color_contrast";
const MIN_ROUTE_COLOR_LUMA_DIFFERENCE: i32 = 72;

/// Route text must stay readable on the route color: flags pairs whose
/// Rec. 601 luma difference is too small.
#[derive(Debug, Default)]
pub struct RouteColorContrastValidator;

impl FileValidator for RouteColorContrastValidator {
    fn name(&self) -> &'static str {
        "route_color_contrast"
    }

    fn file(&self) -> &'static str {
        ROUTES_FILE
    }

    fn validate(&self, table: &GtfsTable, notices: &mut NoticeContainer) {
        for position in 0..table.row_count() {
            let (Some(route_color), Some(route_text_color)) = (
                table.cell(position, "route_color").and_then(|cell| cell.as_color()),
                table
                    .cell(position, "route_text_color")
                    .and_then(|cell| cell.as_color()),
            ) else {
                continue;
            };

            let difference = (route_color.rec601_luma() - route_text_color.rec601_luma()).abs();
            if difference < MIN_ROUTE_COLOR_LUMA_DIFFERENCE {
                notices.push(
                    ValidationNotice::new(
                        CODE_ROUTE_COLOR_CONTRAST,
                        NoticeSeverity::Warning,
                        "route_color and route_text_color have insufficient contrast",
                    )
                    .with_location(
                        table.file_name(),
                        table.row_number(position),
                        "route_color",
                    )
                    .with_context_field(
                        "routeId",
                        table.text(position, "route_id").unwrap_or_default(),
                    )
                    .with_context_field("routeColor", route_color)
                    .with_context_field("routeTextColor", route_text_color),
                );
            }
        }
    }
}
