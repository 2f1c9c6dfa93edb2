use std::fmt::{
    self,
    Display,
    Formatter,
};

use crate::WireType;

/// An error that occurred while decoding a message from its wire representation.
///
/// Besides the [`DecodeErrorKind`] describing what went wrong, the error records
/// the path of `(message, field)` pairs that were being decoded when it happened,
/// outermost first.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to decode protobuf message{}", Path(.stack))]
pub struct DecodeError {
    #[source]
    kind: DecodeErrorKind,
    stack: Vec<(&'static str, &'static str)>,
}

impl DecodeError {
    #[must_use]
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            stack: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// The `(message, field)` pairs that were being decoded, outermost first.
    pub fn path(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.stack.iter().rev().copied()
    }

    /// Records that the error happened while decoding `field` of `message`.
    ///
    /// Called while the error unwinds, so the innermost field is pushed first.
    #[must_use]
    pub fn push(mut self, message: &'static str, field: &'static str) -> Self {
        self.stack.push((message, field));
        self
    }

    /// Returns whether the input was cut short or its length framing was inconsistent.
    #[must_use]
    pub fn is_framing(&self) -> bool {
        matches!(
            self.kind,
            DecodeErrorKind::Truncated { .. }
                | DecodeErrorKind::LengthOverrun { .. }
                | DecodeErrorKind::EndMismatch { .. }
        )
    }

    pub(crate) fn truncated(needed: usize, remaining: usize) -> Self {
        Self::new(DecodeErrorKind::Truncated {
            needed,
            remaining,
        })
    }

    pub(crate) fn malformed_varint(position: usize) -> Self {
        Self::new(DecodeErrorKind::MalformedVarint {
            position,
        })
    }

    pub(crate) fn invalid_wire_type(value: u64) -> Self {
        Self::new(DecodeErrorKind::InvalidWireType {
            value,
        })
    }

    pub(crate) fn invalid_field_number(value: u64) -> Self {
        Self::new(DecodeErrorKind::InvalidFieldNumber {
            value,
        })
    }

    pub(crate) fn unexpected_wire_type(expected: WireType, actual: WireType) -> Self {
        Self::new(DecodeErrorKind::UnexpectedWireType {
            expected,
            actual,
        })
    }

    pub(crate) fn unexpected_end_group(field_number: u32) -> Self {
        Self::new(DecodeErrorKind::UnexpectedEndGroup {
            field_number,
        })
    }

    pub(crate) fn invalid_utf8(source: std::str::Utf8Error) -> Self {
        Self::new(DecodeErrorKind::InvalidUtf8 {
            source,
        })
    }

    pub(crate) fn recursion_limit_reached(limit: u32) -> Self {
        Self::new(DecodeErrorKind::RecursionLimitReached {
            limit,
        })
    }

    pub(crate) fn length_overrun(position: usize, length: u64, end: usize) -> Self {
        Self::new(DecodeErrorKind::LengthOverrun {
            position,
            length,
            end,
        })
    }

    pub(crate) fn end_mismatch(position: usize, end: usize) -> Self {
        Self::new(DecodeErrorKind::EndMismatch {
            position,
            end,
        })
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        Self::new(kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    #[error("buffer underflow: needed {needed} bytes but only {remaining} remain")]
    Truncated { needed: usize, remaining: usize },
    #[error("varint starting near position {position} is longer than 10 bytes or overflows 64 bits")]
    MalformedVarint { position: usize },
    #[error("`{value}` is not a valid wire type")]
    InvalidWireType { value: u64 },
    #[error("`{value}` is not a valid field number")]
    InvalidFieldNumber { value: u64 },
    #[error("expected wire type `{expected}`, got `{actual}`")]
    UnexpectedWireType {
        expected: WireType,
        actual: WireType,
    },
    #[error("encountered end-group for field `{field_number}` without a matching start-group")]
    UnexpectedEndGroup { field_number: u32 },
    #[error("string field is not valid utf8")]
    InvalidUtf8 { source: std::str::Utf8Error },
    #[error("message nesting exceeded the recursion limit of {limit}")]
    RecursionLimitReached { limit: u32 },
    #[error(
        "length-delimited value of {length} bytes at position {position} overruns the buffer end \
         at {end}"
    )]
    LengthOverrun {
        position: usize,
        length: u64,
        end: usize,
    },
    #[error("message ended at position {position} but its declared end was {end}")]
    EndMismatch { position: usize, end: usize },
}

/// An error that occurred while encoding a message into its wire representation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error(transparent)]
pub struct EncodeError(EncodeErrorKind);

impl EncodeError {
    #[must_use]
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.0
    }

    pub(crate) fn field_number_out_of_range(field_number: u32) -> Self {
        Self(EncodeErrorKind::FieldNumberOutOfRange {
            field_number,
        })
    }

    pub(crate) fn length_out_of_range(length: usize) -> Self {
        Self(EncodeErrorKind::LengthOutOfRange {
            length,
        })
    }

    pub(crate) fn no_open_fork() -> Self {
        Self(EncodeErrorKind::NoOpenFork)
    }

    pub(crate) fn unclosed_forks(count: usize) -> Self {
        Self(EncodeErrorKind::UnclosedForks {
            count,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeErrorKind {
    #[error("field value out of range: field number `{field_number}` is outside 1..=2^29-1")]
    FieldNumberOutOfRange { field_number: u32 },
    #[error("field value out of range: length {length} exceeds the maximum of 2^31-1 bytes")]
    LengthOutOfRange { length: usize },
    #[error("length-delimited block closed without a matching fork")]
    NoOpenFork,
    #[error("writer finished with {count} length-delimited blocks still open")]
    UnclosedForks { count: usize },
}

struct Path<'a>(&'a [(&'static str, &'static str)]);

impl Display for Path<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut entries = self.0.iter().rev();
        if let Some((message, field)) = entries.next() {
            write!(f, " at `{message}.{field}`")?;
        }
        for (message, field) in entries {
            write!(f, ", `{message}.{field}`")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_rendered_outermost_first() {
        let err = DecodeError::truncated(4, 1)
            .push("SubaccountId", "number")
            .push("OrderId", "subaccount_id")
            .push("Order", "order_id");
        assert_eq!(
            "failed to decode protobuf message at `Order.order_id`, `OrderId.subaccount_id`, \
             `SubaccountId.number`",
            err.to_string(),
        );
        assert_eq!(
            vec![
                ("Order", "order_id"),
                ("OrderId", "subaccount_id"),
                ("SubaccountId", "number"),
            ],
            err.path().collect::<Vec<_>>(),
        );
    }

    #[test]
    fn error_without_path_has_plain_message() {
        let err = DecodeError::end_mismatch(5, 4);
        assert_eq!("failed to decode protobuf message", err.to_string());
        assert!(err.is_framing());
    }

    #[test]
    fn source_is_the_kind() {
        use std::error::Error as _;
        let err = DecodeError::malformed_varint(0);
        assert_eq!(
            err.kind().to_string(),
            err.source().unwrap().to_string(),
        );
    }
}
