/// Writes an `f64` the way `JSON.stringify` does: integral values below 1e21
/// without a fractional part, non-finite values as `null`.
pub mod serde_js_number {
    use serde::{ser::Error, Serializer};

    // 2^53, the largest range in which every integer is exactly representable
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;
    // From here on JavaScript switches to exponent notation
    const EXPONENT_THRESHOLD: f64 = 1e21;

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if !value.is_finite() {
            serializer.serialize_none()
        } else if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(*value as i64)
        } else if value.fract() == 0.0 && value.abs() < EXPONENT_THRESHOLD {
            // Shortest round-trip digits padded with zeros
            let magnitude: u128 = format!("{}", value.abs()).parse().map_err(S::Error::custom)?;
            if value.is_sign_negative() {
                let signed = -(magnitude as i128);
                match i64::try_from(signed) {
                    Ok(small) => serializer.serialize_i64(small),
                    Err(_) => serializer.serialize_i128(signed),
                }
            } else {
                match u64::try_from(magnitude) {
                    Ok(small) => serializer.serialize_u64(small),
                    Err(_) => serializer.serialize_u128(magnitude),
                }
            }
        } else {
            serializer.serialize_f64(*value)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Amount {
        #[serde(with = "super::serde_js_number")]
        value: f64,
    }

    fn render(value: f64) -> String {
        serde_json::to_string(&Amount { value }).unwrap()
    }

    #[test]
    fn test_integral_values_have_no_fraction() {
        assert_eq!(render(1_000_000_000.0), r#"{"value":1000000000}"#);
        assert_eq!(render(-5.0), r#"{"value":-5}"#);
        assert_eq!(render(0.0), r#"{"value":0}"#);
    }

    #[test]
    fn test_fractional_values_are_kept() {
        assert_eq!(render(0.25), r#"{"value":0.25}"#);
    }

    #[test]
    fn test_non_finite_values_become_null() {
        assert_eq!(render(f64::NAN), r#"{"value":null}"#);
        assert_eq!(render(f64::INFINITY), r#"{"value":null}"#);
    }

    #[test]
    fn test_large_integers_print_like_javascript() {
        assert_eq!(render(12_345_678_901_234_567_890.0), r#"{"value":12345678901234567000}"#);
        assert_eq!(render(-1_152_921_504_606_846_976.0), r#"{"value":-1152921504606847000}"#);
        assert_eq!(render(1e20), r#"{"value":100000000000000000000}"#);
    }

    #[test]
    fn test_huge_values_stay_floating() {
        assert_eq!(render(1e300), r#"{"value":1e+300}"#);
    }
}
