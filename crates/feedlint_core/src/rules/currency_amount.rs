use crate::feed::{GtfsTable, FARE_PRODUCTS_FILE};
use crate::field_validator::currency_fraction_digits;
use crate::notice::{NoticeContainer, NoticeSeverity, ValidationNotice};
use crate::validator::FileValidator;

const CODE_INVALID_CURRENCY_AMOUNT: &str = "invalid_currency_amount";

/// Fare amounts must be written with the fraction digits their currency
/// mandates (`1.50` EUR, `150` JPY).
#[derive(Debug, Default)]
pub struct CurrencyAmountValidator;

impl FileValidator for CurrencyAmountValidator {
    fn name(&self) -> &'static str {
        "currency_amount"
    }

    fn file(&self) -> &'static str {
        FARE_PRODUCTS_FILE
    }

    fn validate(&self, table: &GtfsTable, notices: &mut NoticeContainer) {
        for position in 0..table.row_count() {
            let Some(amount) = table.cell(position, "amount").and_then(|cell| cell.as_decimal())
            else {
                continue;
            };
            let Some(currency) = table.text(position, "currency") else {
                continue;
            };
            let Some(expected_scale) = currency_fraction_digits(currency) else {
                continue;
            };

            if amount.scale() != expected_scale {
                notices.push(
                    ValidationNotice::new(
                        CODE_INVALID_CURRENCY_AMOUNT,
                        NoticeSeverity::Error,
                        "currency amount does not match currency code",
                    )
                    .with_location(table.file_name(), table.row_number(position), "amount")
                    .with_context_field("currencyCode", currency)
                    .with_context_field("fieldValue", amount.to_string()),
                );
            }
        }
    }
}
