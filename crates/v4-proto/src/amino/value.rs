use std::collections::BTreeMap;

use base64::{
    engine::general_purpose::STANDARD,
    Engine as _,
};
use bytes::Bytes;
use serde_json::{
    Map,
    Value,
};

use super::{
    AminoError,
    AminoOptions,
};

/// A value that can appear as a field of an Amino JSON object.
pub trait AminoValue: Sized {
    /// Whether the upstream signing encoders drop this kind of field when it holds
    /// its canonical zero.
    const OMITTED_BY_UPSTREAM: bool = false;

    fn is_canonical_zero(&self) -> bool;

    fn to_amino_json(&self, options: &AminoOptions) -> Value;

    /// # Errors
    /// Returns an error if `value` has the wrong JSON type or does not fit `Self`.
    fn from_amino_json(value: &Value) -> Result<Self, AminoError>;
}

/// Reads an integer given either as a JSON number or as a decimal string.
fn integer<T: TryFrom<i128>>(value: &Value, target: &'static str) -> Result<T, AminoError> {
    let wide = match value {
        Value::Number(number) => number
            .as_u64()
            .map(i128::from)
            .or_else(|| number.as_i64().map(i128::from))
            .ok_or_else(|| AminoError::invalid_integer(number.to_string()))?,
        Value::String(text) => text
            .parse::<i128>()
            .map_err(|_| AminoError::invalid_integer(text.as_str()))?,
        other => return Err(AminoError::expected_type("an integer", other)),
    };
    T::try_from(wide).map_err(|_| AminoError::integer_out_of_range(wide, target))
}

macro_rules! impl_narrow_integer {
    ($($ty:ty),*) => {
        $(
            impl AminoValue for $ty {
                fn is_canonical_zero(&self) -> bool {
                    *self == 0
                }

                fn to_amino_json(&self, _options: &AminoOptions) -> Value {
                    Value::from(*self)
                }

                fn from_amino_json(value: &Value) -> Result<Self, AminoError> {
                    integer(value, stringify!($ty))
                }
            }
        )*
    };
}
impl_narrow_integer!(u32, i32);

// 64-bit integers travel as decimal strings.
macro_rules! impl_wide_integer {
    ($($ty:ty),*) => {
        $(
            impl AminoValue for $ty {
                const OMITTED_BY_UPSTREAM: bool = true;

                fn is_canonical_zero(&self) -> bool {
                    *self == 0
                }

                fn to_amino_json(&self, _options: &AminoOptions) -> Value {
                    Value::String(self.to_string())
                }

                fn from_amino_json(value: &Value) -> Result<Self, AminoError> {
                    integer(value, stringify!($ty))
                }
            }
        )*
    };
}
impl_wide_integer!(u64, i64);

impl AminoValue for bool {
    fn is_canonical_zero(&self) -> bool {
        !*self
    }

    fn to_amino_json(&self, _options: &AminoOptions) -> Value {
        Value::Bool(*self)
    }

    fn from_amino_json(value: &Value) -> Result<Self, AminoError> {
        value
            .as_bool()
            .ok_or_else(|| AminoError::expected_type("a boolean", value))
    }
}

impl AminoValue for String {
    fn is_canonical_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_amino_json(&self, _options: &AminoOptions) -> Value {
        Value::String(self.clone())
    }

    fn from_amino_json(value: &Value) -> Result<Self, AminoError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AminoError::expected_type("a string", value))
    }
}

impl AminoValue for Bytes {
    const OMITTED_BY_UPSTREAM: bool = true;

    fn is_canonical_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_amino_json(&self, _options: &AminoOptions) -> Value {
        Value::String(STANDARD.encode(self))
    }

    fn from_amino_json(value: &Value) -> Result<Self, AminoError> {
        let text = value
            .as_str()
            .ok_or_else(|| AminoError::expected_type("a base64 string", value))?;
        STANDARD
            .decode(text)
            .map(Bytes::from)
            .map_err(AminoError::invalid_base64)
    }
}

impl<T: AminoValue> AminoValue for Vec<T> {
    fn is_canonical_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_amino_json(&self, options: &AminoOptions) -> Value {
        Value::Array(
            self.iter()
                .map(|element| element.to_amino_json(options))
                .collect(),
        )
    }

    fn from_amino_json(value: &Value) -> Result<Self, AminoError> {
        let elements = value
            .as_array()
            .ok_or_else(|| AminoError::expected_type("an array", value))?;
        elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                T::from_amino_json(element).map_err(|err| err.push(index.to_string()))
            })
            .collect()
    }
}

/// A map key, rendered as a JSON object key.
pub trait AminoKey: Ord + Sized {
    fn to_key(&self) -> String;

    /// # Errors
    /// Returns an error if `key` is not a valid rendering of `Self`.
    fn from_key(key: &str) -> Result<Self, AminoError>;
}

impl AminoKey for u32 {
    fn to_key(&self) -> String {
        self.to_string()
    }

    fn from_key(key: &str) -> Result<Self, AminoError> {
        key.parse().map_err(|_| AminoError::invalid_map_key(key))
    }
}

impl AminoKey for String {
    fn to_key(&self) -> String {
        self.clone()
    }

    fn from_key(key: &str) -> Result<Self, AminoError> {
        Ok(key.to_string())
    }
}

impl<K: AminoKey, V: AminoValue> AminoValue for BTreeMap<K, V> {
    fn is_canonical_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_amino_json(&self, options: &AminoOptions) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, value)| (key.to_key(), value.to_amino_json(options)))
                .collect::<Map<_, _>>(),
        )
    }

    fn from_amino_json(value: &Value) -> Result<Self, AminoError> {
        let object = value
            .as_object()
            .ok_or_else(|| AminoError::expected_type("an object", value))?;
        object
            .iter()
            .map(|(key, value)| -> Result<(K, V), AminoError> {
                let parsed = K::from_key(key)?;
                let value = V::from_amino_json(value).map_err(|err| err.push(key.as_str()))?;
                Ok((parsed, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::amino::AminoErrorKind;

    #[test]
    fn wide_integers_are_rendered_as_strings() {
        let options = AminoOptions::default();
        assert_eq!(json!("18446744073709551615"), u64::MAX.to_amino_json(&options));
        assert_eq!(json!("-9223372036854775808"), i64::MIN.to_amino_json(&options));
        assert_eq!(json!(4_294_967_295u32), u32::MAX.to_amino_json(&options));
    }

    #[test]
    fn integers_are_accepted_as_numbers_or_strings() {
        assert_eq!(7u64, u64::from_amino_json(&json!(7)).unwrap());
        assert_eq!(7u64, u64::from_amino_json(&json!("7")).unwrap());
        assert_eq!(-7i32, i32::from_amino_json(&json!("-7")).unwrap());
        assert_eq!(u64::MAX, u64::from_amino_json(&json!("18446744073709551615")).unwrap());
    }

    #[test]
    fn out_of_range_integers_are_rejected() {
        let err = u32::from_amino_json(&json!("4294967296")).unwrap_err();
        assert!(matches!(
            err.kind(),
            AminoErrorKind::IntegerOutOfRange {
                target: "u32",
                ..
            }
        ));
        let err = u64::from_amino_json(&json!(-1)).unwrap_err();
        assert!(matches!(err.kind(), AminoErrorKind::IntegerOutOfRange { .. }));
    }

    #[test]
    fn fractional_and_garbage_integers_are_rejected() {
        assert!(matches!(
            u32::from_amino_json(&json!(1.5)).unwrap_err().kind(),
            AminoErrorKind::InvalidInteger { .. }
        ));
        assert!(matches!(
            u64::from_amino_json(&json!("0x10")).unwrap_err().kind(),
            AminoErrorKind::InvalidInteger { .. }
        ));
        assert!(matches!(
            u64::from_amino_json(&json!(true)).unwrap_err().kind(),
            AminoErrorKind::ExpectedType { .. }
        ));
    }

    #[test]
    fn bytes_use_standard_base64() {
        let options = AminoOptions::default();
        let value = Bytes::from_static(&[0xfb, 0xff, 0x01]);
        assert_eq!(json!("+/8B"), value.to_amino_json(&options));
        assert_eq!(value, Bytes::from_amino_json(&json!("+/8B")).unwrap());
        assert!(matches!(
            Bytes::from_amino_json(&json!("-_8B")).unwrap_err().kind(),
            AminoErrorKind::InvalidBase64 { .. }
        ));
    }

    #[test]
    fn array_errors_name_the_index() {
        let err = Vec::<u32>::from_amino_json(&json!([1, 2, "x"])).unwrap_err();
        assert_eq!(vec!["2"], err.path().collect::<Vec<_>>());
    }

    #[test]
    fn map_keys_are_parsed() {
        let options = AminoOptions::default();
        let map = BTreeMap::from([(2u32, 20u64), (10, 100)]);
        let rendered = map.to_amino_json(&options);
        assert_eq!(json!({"2": "20", "10": "100"}), rendered);
        assert_eq!(map, BTreeMap::from_amino_json(&rendered).unwrap());
        assert!(matches!(
            BTreeMap::<u32, u64>::from_amino_json(&json!({"x": "1"}))
                .unwrap_err()
                .kind(),
            AminoErrorKind::InvalidMapKey { .. }
        ));
    }
}
