use std::fmt::{
    self,
    Display,
    Formatter,
};

use serde_json::Value;

/// An error converting between a message and its Amino JSON form.
#[derive(Debug, thiserror::Error)]
#[error("failed to convert amino json{}", Path(.path))]
pub struct AminoError {
    #[source]
    kind: AminoErrorKind,
    path: Vec<String>,
}

impl AminoError {
    #[must_use]
    pub fn kind(&self) -> &AminoErrorKind {
        &self.kind
    }

    /// The field names and array indices leading to the offending value, outermost
    /// first.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.path.iter().rev().map(String::as_str)
    }

    /// Records that the error happened below `segment`.
    #[must_use]
    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }

    pub(crate) fn expected_type(expected: &'static str, found: &Value) -> Self {
        Self::from(AminoErrorKind::ExpectedType {
            expected,
            found: json_type(found),
        })
    }

    pub(crate) fn invalid_integer(value: impl Into<String>) -> Self {
        Self::from(AminoErrorKind::InvalidInteger {
            value: value.into(),
        })
    }

    pub(crate) fn integer_out_of_range(value: i128, target: &'static str) -> Self {
        Self::from(AminoErrorKind::IntegerOutOfRange {
            value,
            target,
        })
    }

    pub(crate) fn invalid_base64(source: base64::DecodeError) -> Self {
        Self::from(AminoErrorKind::InvalidBase64 {
            source,
        })
    }

    pub(crate) fn invalid_map_key(key: &str) -> Self {
        Self::from(AminoErrorKind::InvalidMapKey {
            key: key.to_string(),
        })
    }

    pub(crate) fn type_mismatch(expected: String, actual: String) -> Self {
        Self::from(AminoErrorKind::TypeMismatch {
            expected,
            actual,
        })
    }
}

impl From<AminoErrorKind> for AminoError {
    fn from(kind: AminoErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AminoErrorKind {
    #[error("expected {expected}, found {found}")]
    ExpectedType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("`{value}` is not a decimal integer")]
    InvalidInteger { value: String },
    #[error("`{value}` does not fit into {target}")]
    IntegerOutOfRange { value: i128, target: &'static str },
    #[error("value is not valid standard base64")]
    InvalidBase64 { source: base64::DecodeError },
    #[error("`{key}` is not a valid map key")]
    InvalidMapKey { key: String },
    #[error("expected amino message of type `{expected}`, got `{actual}`")]
    TypeMismatch { expected: String, actual: String },
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

struct Path<'a>(&'a [String]);

impl Display for Path<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut segments = self.0.iter().rev();
        if let Some(first) = segments.next() {
            write!(f, " at `{first}")?;
            for segment in segments {
                write!(f, ".{segment}")?;
            }
            f.write_str("`")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_rendered_outermost_first() {
        let err = AminoError::invalid_integer("1.5")
            .push("number")
            .push("subaccount_id")
            .push("order_id");
        assert_eq!(
            "failed to convert amino json at `order_id.subaccount_id.number`",
            err.to_string()
        );
        assert_eq!(
            vec!["order_id", "subaccount_id", "number"],
            err.path().collect::<Vec<_>>()
        );
    }

    #[test]
    fn error_without_path_has_no_suffix() {
        let err = AminoError::expected_type("an object", &Value::Null);
        assert_eq!("failed to convert amino json", err.to_string());
        assert!(matches!(
            err.kind(),
            AminoErrorKind::ExpectedType {
                expected: "an object",
                found: "null",
            }
        ));
    }
}
