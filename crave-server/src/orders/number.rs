//! Order number formatting
//!
//! `ORD` + the 1-based sequence, zero-padded to four digits. Sequences past
//! 9999 keep growing in width instead of wrapping.

pub const ORDER_NUMBER_PREFIX: &str = "ORD";
const ORDER_NUMBER_WIDTH: usize = 4;

/// Order number for the order created after `count` existing ones
pub fn format_order_number(count: u64) -> String {
    format!(
        "{ORDER_NUMBER_PREFIX}{:0width$}",
        count + 1,
        width = ORDER_NUMBER_WIDTH
    )
}

/// Sequence encoded in an order number, if it has the expected shape
pub fn parse_order_sequence(number: &str) -> Option<u64> {
    let digits = number.strip_prefix(ORDER_NUMBER_PREFIX)?;
    if digits.len() < ORDER_NUMBER_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
