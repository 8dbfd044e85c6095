//! Display formatting for durations and distances.
//!
//! Rounding works on the exact binary value of the `f64`, and exact ties
//! round half away from zero. So 15 seconds (exactly 0.25 minutes) shows as
//! `0.3`, while 9 seconds (0.1499999... in binary) shows as `0.1`.

/// Enough fractional digits to print any `f64` without rounding.
const EXACT_DIGITS: usize = 1074;

/// Round to `places` decimals and format with exactly that many digits
/// after the point.
fn fixed(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return format!("{:.*}", places, value);
    }

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac.bytes().chain(std::iter::repeat(b'0')).take(places))
        .collect();

    if frac.as_bytes().get(places).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let (whole, decimals) = digits.split_at(digits.len() - places);
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(whole.iter().map(|&d| d as char));
    if places > 0 {
        out.push('.');
        out.extend(decimals.iter().map(|&d| d as char));
    }
    out
}

/// Seconds → minutes with one decimal place.
///
/// ```
/// assert_eq!(citybike_client::domain::format_minutes(90), "1.5");
/// ```
pub fn format_minutes(seconds: u64) -> String {
    fixed(seconds as f64 / 60.0, 1)
}

/// Meters → kilometers with two decimal places.
///
/// ```
/// assert_eq!(citybike_client::domain::format_kilometers(2500.0), "2.50");
/// ```
pub fn format_kilometers(meters: f64) -> String {
    fixed(meters / 1000.0, 2)
}

/// Average distances arrive from the backend already in kilometers.
pub fn format_average_km(km: f64) -> String {
    fixed(km, 2)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn kilometers_shape(meters in 0u32..10_000_000) {
            let shown = format_kilometers(meters as f64);
            let (_, decimals) = shown.split_once('.').unwrap();
            prop_assert_eq!(decimals.len(), 2);

            let parsed: f64 = shown.parse().unwrap();
            prop_assert!((parsed - meters as f64 / 1000.0).abs() <= 0.005 + 1e-9);
        }

        #[test]
        fn whole_minutes_are_exact(minutes in 0u64..100_000) {
            prop_assert_eq!(format_minutes(minutes * 60), format!("{}.0", minutes));
        }
    }
}
