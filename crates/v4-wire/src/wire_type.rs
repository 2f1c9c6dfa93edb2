use std::fmt::{
    self,
    Display,
    Formatter,
};

use crate::DecodeError;

/// The smallest field number a message may declare.
pub const MIN_FIELD_NUMBER: u32 = 1;
/// The largest field number a message may declare (`2^29 - 1`).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// The framing of a field on the wire, carried in the low three bits of every tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    SixtyFourBit = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    ThirtyTwoBit = 5,
}

impl WireType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Varint => "varint",
            Self::SixtyFourBit => "64-bit",
            Self::LengthDelimited => "length-delimited",
            Self::StartGroup => "start-group",
            Self::EndGroup => "end-group",
            Self::ThirtyTwoBit => "32-bit",
        }
    }
}

impl Display for WireType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u64> for WireType {
    type Error = DecodeError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Varint),
            1 => Ok(Self::SixtyFourBit),
            2 => Ok(Self::LengthDelimited),
            3 => Ok(Self::StartGroup),
            4 => Ok(Self::EndGroup),
            5 => Ok(Self::ThirtyTwoBit),
            other => Err(DecodeError::invalid_wire_type(other)),
        }
    }
}

/// A decoded field key: the field number and the wire type its value is framed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    field_number: u32,
    wire_type: WireType,
}

impl Tag {
    /// Splits a raw key read off the wire into its field number and wire type.
    ///
    /// # Errors
    /// Returns an error if the low three bits are not a known wire type, or if
    /// the field number is zero or exceeds [`MAX_FIELD_NUMBER`].
    pub fn from_key(key: u64) -> Result<Self, DecodeError> {
        let wire_type = WireType::try_from(key & 0x07)?;
        let field_number = key >> 3;
        match u32::try_from(field_number) {
            Ok(field_number @ MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER) => Ok(Self {
                field_number,
                wire_type,
            }),
            _ => Err(DecodeError::invalid_field_number(field_number)),
        }
    }

    #[must_use]
    pub const fn field_number(self) -> u32 {
        self.field_number
    }

    #[must_use]
    pub const fn wire_type(self) -> WireType {
        self.wire_type
    }

    /// Checks that this tag carries `expected` as its wire type.
    ///
    /// # Errors
    /// Returns an error naming both wire types if they differ.
    pub fn expect_wire_type(self, expected: WireType) -> Result<(), DecodeError> {
        if self.wire_type == expected {
            Ok(())
        } else {
            Err(DecodeError::unexpected_wire_type(expected, self.wire_type))
        }
    }
}

/// Combines a field number and a wire type into the key that prefixes every field.
#[must_use]
pub const fn key(field_number: u32, wire_type: WireType) -> u64 {
    ((field_number as u64) << 3) | wire_type as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeErrorKind;

    #[test]
    fn key_packs_field_number_and_wire_type() {
        assert_eq!(0x08, key(1, WireType::Varint));
        assert_eq!(0x12, key(2, WireType::LengthDelimited));
        assert_eq!(0x25, key(4, WireType::ThirtyTwoBit));
        assert_eq!(0xffff_fff9, key(MAX_FIELD_NUMBER, WireType::SixtyFourBit));
    }

    #[test]
    fn tag_roundtrips_through_key() {
        let tag = Tag::from_key(key(11, WireType::Varint)).unwrap();
        assert_eq!(11, tag.field_number());
        assert_eq!(WireType::Varint, tag.wire_type());
    }

    #[test]
    fn field_number_zero_is_rejected() {
        let err = Tag::from_key(0x02).unwrap_err();
        assert!(matches!(
            err.kind(),
            DecodeErrorKind::InvalidFieldNumber {
                value: 0
            }
        ));
    }

    #[test]
    fn field_number_above_max_is_rejected() {
        let err = Tag::from_key(u64::from(MAX_FIELD_NUMBER + 1) << 3).unwrap_err();
        assert!(matches!(
            err.kind(),
            DecodeErrorKind::InvalidFieldNumber {
                ..
            }
        ));
    }

    #[test]
    fn wire_types_six_and_seven_are_rejected() {
        for raw in [6, 7] {
            let err = Tag::from_key((1 << 3) | raw).unwrap_err();
            assert_eq!(
                &DecodeErrorKind::InvalidWireType {
                    value: raw
                },
                err.kind()
            );
        }
    }
}
