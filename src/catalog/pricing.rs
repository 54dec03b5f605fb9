//! Display price calculation and number formatting.
//!
//! Sheet prices already include the item's standard margin. Requesting another
//! margin strips the standard one back out and applies the requested one:
//!
//! ```text
//! adjusted = base / (1 + standard/100) * (1 + override/100)
//! ```
use crate::errors::PricingError;

/// Compute the price shown to a user for `quantity` units of an item.
///
/// Without an override the stored price is used as-is. A standard margin of
/// exactly -100% cannot be stripped and is rejected when an override is given.
pub fn compute_display_price(
    base_price: f64,
    standard_margin_percent: f64,
    override_margin_percent: Option<f64>,
    quantity: u32,
) -> Result<f64, PricingError> {
    if quantity == 0 {
        return Err(PricingError::InvalidQuantity);
    }
    let unit = match override_margin_percent {
        None => base_price,
        Some(margin) => {
            let divisor = 1.0 + standard_margin_percent / 100.0;
            if divisor == 0.0 {
                return Err(PricingError::DegenerateMargin(standard_margin_percent));
            }
            base_price / divisor * (1.0 + margin / 100.0)
        }
    };
    Ok(unit * f64::from(quantity))
}

/// Whole numbers without decimals, everything else with exactly two.
pub fn format_number(value: f64) -> String {
    if value.fract() != 0.0 {
        format!("{:.2}", value)
    } else {
        // adding 0.0 turns -0.0 into 0.0
        format!("{:.0}", value + 0.0)
    }
}

/// Margins print as integers when whole, otherwise in their natural form (`7.5`).
pub fn format_margin(margin: f64) -> String {
    if margin.fract() == 0.0 {
        format!("{:.0}", margin + 0.0)
    } else {
        format!("{}", margin)
    }
}
