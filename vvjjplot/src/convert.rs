//! Conversions between bin indices and coordinates that keep clippy's cast lints quiet.

/// Truncates `x` towards zero. Negative values and NaN map to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn usize_from_f64(x: f64) -> usize {
    if x > 0.0 { x.trunc() as usize } else { 0 }
}

/// Converts a bin index or count. Values beyond `u32::MAX` saturate.
pub fn f64_from_usize(x: usize) -> f64 {
    f64::from(u32::try_from(x).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn index_truncation() {
        assert_eq!(usize_from_f64(3.99), 3);
        assert_eq!(usize_from_f64(-0.5), 0);
        assert_eq!(usize_from_f64(f64::NAN), 0);
        assert_eq!(f64_from_usize(40), 40.0);
    }
}
