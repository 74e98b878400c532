use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

/// Field names under which an obligation lists its deposits, in probing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum DepositField {
    Deposits,
    DepositBalances,
    Collaterals,
}

/// Field names under which an obligation lists its borrows, in probing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum BorrowField {
    Borrows,
    BorrowBalances,
}

/// Which known layout an obligation record matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObligationShape {
    pub deposits: Option<DepositField>,
    pub borrows: Option<BorrowField>,
}

impl ObligationShape {
    pub fn detect(raw: &Value) -> Self {
        Self { deposits: find_array_field(raw), borrows: find_array_field(raw) }
    }

    /// True when at least one position list was found
    pub fn is_recognized(&self) -> bool {
        self.deposits.is_some() || self.borrows.is_some()
    }

    pub fn deposits<'v>(&self, raw: &'v Value) -> &'v [Value] {
        array_at(raw, self.deposits.as_ref().map(|field| field.as_ref()))
    }

    pub fn borrows<'v>(&self, raw: &'v Value) -> &'v [Value] {
        array_at(raw, self.borrows.as_ref().map(|field| field.as_ref()))
    }
}

// First variant whose field holds an array
fn find_array_field<F>(raw: &Value) -> Option<F>
where
    F: IntoEnumIterator + AsRef<str>,
{
    F::iter().find(|field| raw.get(field.as_ref()).is_some_and(Value::is_array))
}

fn array_at<'v>(raw: &'v Value, field: Option<&str>) -> &'v [Value] {
    field
        .and_then(|name| raw.get(name))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_names() {
        let names: Vec<String> = DepositField::iter().map(|f| f.to_string()).collect();
        assert_eq!(names, ["deposits", "depositBalances", "collaterals"]);

        let names: Vec<String> = BorrowField::iter().map(|f| f.to_string()).collect();
        assert_eq!(names, ["borrows", "borrowBalances"]);
    }

    #[test]
    fn test_detect_takes_first_array_field() {
        let raw = json!({ "deposits": "not a list", "depositBalances": [1], "collaterals": [2, 3] });
        let shape = ObligationShape::detect(&raw);

        assert_eq!(shape.deposits, Some(DepositField::DepositBalances));
        assert_eq!(shape.deposits(&raw), &[json!(1)]);
        assert_eq!(shape.borrows, None);
        assert!(shape.borrows(&raw).is_empty());
        assert!(shape.is_recognized());
    }

    #[test]
    fn test_detect_unrecognized() {
        let shape = ObligationShape::detect(&json!({ "positions": [] }));
        assert!(!shape.is_recognized());

        let shape = ObligationShape::detect(&json!("not an object"));
        assert!(!shape.is_recognized());
    }
}
