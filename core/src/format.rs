//! Number presentation helpers.

/// Format `number` with a comma between each group of three digits.
///
/// ```
/// assert_eq!(tourist_core::format_number(1234567), "1,234,567");
/// ```
pub fn format_number(number: i64) -> String {
    let digits = number.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if number < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Round `number` to the closest multiple of `nearest`, ties to even.
///
/// Returns `None` when `nearest` is zero or the result does not fit in an
/// `i64`.
pub fn round_to_nearest(number: i64, nearest: i64) -> Option<i64> {
    if nearest == 0 {
        return None;
    }
    let step = i128::from(nearest).abs();
    let n = i128::from(number);
    let quotient = n.div_euclid(step);
    let twice_remainder = 2 * n.rem_euclid(step);
    let rounded = if twice_remainder > step || (twice_remainder == step && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    };
    i64::try_from(rounded * step).ok()
}
