//! Best-effort parsing of spreadsheet cells written in German number format.
//!
//! Cells arrive as display strings such as `"1.234,50 €"` or `"15%"`. The parser
//! strips decoration, drops `.` thousands separators and turns the decimal comma
//! into a point. Anything that still fails to parse becomes `0.0`.

const DECORATIONS: [char; 4] = ['€', '$', '£', '%'];

/// Parse a cell into a number, returning `0.0` for blank or malformed input.
pub fn parse_number(raw: &str) -> f64 {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !DECORATIONS.contains(c) && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// True when a cell holds nothing but whitespace.
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}
