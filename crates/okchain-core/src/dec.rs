//! Decimal strings as carried by on-chain `Dec` values.
//!
//! The signing document carries amounts verbatim. The binary envelope
//! carries the integer scaled by 10^precision. Conversion is exact: a value
//! with more fractional digits than the chain supports is rejected, never
//! rounded.

use crate::error::OkchainError;

/// Convert `"1.5"` at precision 8 into `"150000000"`.
///
/// `field` names the value in the error returned for malformed input.
pub fn to_amino_integer(value: &str, field: &str, precision: usize) -> Result<String, OkchainError> {
    if value.is_empty() {
        return Err(OkchainError::missing(field));
    }
    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, f),
        None => (value, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(OkchainError::invalid(field, "no digits"));
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(OkchainError::invalid(
            field,
            format!("`{value}` is not a non-negative decimal"),
        ));
    }
    if frac_part.len() > precision {
        return Err(OkchainError::invalid(
            field,
            format!("`{value}` has more than {precision} fractional digits"),
        ));
    }

    let mut digits = String::with_capacity(int_part.len() + precision);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    digits.extend(std::iter::repeat_n('0', precision - frac_part.len()));

    let trimmed = digits.trim_start_matches('0');
    Ok(if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DEC_PRECISION as P;

    #[test]
    fn scales_fractional_value() {
        assert_eq!(to_amino_integer("1.00000000", "amount", P).unwrap(), "100000000");
        assert_eq!(to_amino_integer("5.555", "amount", P).unwrap(), "555500000");
    }

    #[test]
    fn integer_without_point() {
        assert_eq!(to_amino_integer("10", "amount", P).unwrap(), "1000000000");
    }

    #[test]
    fn leading_point_and_zero() {
        assert_eq!(to_amino_integer(".5", "amount", P).unwrap(), "50000000");
        assert_eq!(to_amino_integer("0.000", "amount", P).unwrap(), "0");
    }

    #[test]
    fn full_precision_accepted() {
        assert_eq!(to_amino_integer("0.00000001", "price", P).unwrap(), "1");
    }

    #[test]
    fn excess_precision_rejected_not_rounded() {
        let err = to_amino_integer("0.000000001", "price", P).unwrap_err();
        assert_eq!(err.field(), Some("price"));
    }

    #[test]
    fn precision_is_the_callers_choice() {
        assert_eq!(
            to_amino_integer("0.000000001", "price", 18).unwrap(),
            "1000000000"
        );
        assert_eq!(to_amino_integer("7", "price", 0).unwrap(), "7");
        assert!(to_amino_integer("7.5", "price", 0).is_err());
    }

    #[test]
    fn malformed_rejected() {
        for bad in ["-1", "1.2.3", "abc", "1e5", ".", " 1"] {
            let err = to_amino_integer(bad, "quantity", P).unwrap_err();
            assert_eq!(err.field(), Some("quantity"), "accepted {bad:?}");
        }
    }

    #[test]
    fn empty_is_missing() {
        let err = to_amino_integer("", "amount", P).unwrap_err();
        assert_eq!(err, OkchainError::missing("amount"));
    }
}
