//! Declarative generators for the schema's messages and enums.
//!
//! `message!` expands a field table into the struct, its [`v4_wire::Message`]
//! implementation, its [`crate::Name`] and its Amino bridge. Each row reads
//! `<field number> <cardinality> <kind> <name>: <type>` where the cardinality is
//! `singular`, `optional` or `repeated` and the kind names a module under
//! [`v4_wire::field`].
//!
//! `proto_enum!` expands an open protobuf enum with its symbolic names.

macro_rules! message {
    (@encode singular $kind:ident, $($args:tt)*) => {
        ::v4_wire::field::$kind::encode($($args)*)
    };
    (@encode optional $kind:ident, $($args:tt)*) => {
        ::v4_wire::field::$kind::encode_optional($($args)*)
    };
    (@encode repeated $kind:ident, $($args:tt)*) => {
        ::v4_wire::field::$kind::encode_repeated($($args)*)
    };

    (@merge singular $kind:ident, $($args:tt)*) => {
        ::v4_wire::field::$kind::merge($($args)*)
    };
    (@merge optional $kind:ident, $($args:tt)*) => {
        ::v4_wire::field::$kind::merge_optional($($args)*)
    };
    (@merge repeated $kind:ident, $($args:tt)*) => {
        ::v4_wire::field::$kind::merge_repeated($($args)*)
    };

    (@to_amino optional, $object:ident, $name:expr, $value:expr) => {
        $object.optional($name, $value);
    };
    (@to_amino $card:ident, $object:ident, $name:expr, $value:expr) => {
        $object.field($name, $value);
    };

    (@from_amino optional, $reader:ident, $name:expr) => {
        $reader.optional($name)?
    };
    (@from_amino $card:ident, $reader:ident, $name:expr) => {
        $reader.field($name)?
    };

    (@name $name:ident) => {
        stringify!($name)
    };
    (@name $name:ident $proto_name:literal) => {
        $proto_name
    };

    (
        $(#[$meta:meta])*
        pub struct $name:ident in $package:literal $(as $proto_name:literal)? {}
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name {}

        impl ::v4_wire::Message for $name {
            fn encode_raw(
                &self,
                _writer: &mut ::v4_wire::Writer,
            ) -> Result<(), ::v4_wire::EncodeError> {
                Ok(())
            }

            fn merge_field(
                &mut self,
                tag: ::v4_wire::Tag,
                reader: &mut ::v4_wire::Reader<'_>,
            ) -> Result<(), ::v4_wire::DecodeError> {
                reader.skip(tag)
            }
        }

        impl $crate::Name for $name {
            const NAME: &'static str = message!(@name $name $($proto_name)?);
            const PACKAGE: &'static str = $package;
        }

        impl $crate::amino::Amino for $name {
            fn to_amino(
                &self,
                options: &$crate::amino::AminoOptions,
            ) -> ::serde_json::Map<String, ::serde_json::Value> {
                $crate::amino::ObjectWriter::new(options).finish()
            }

            fn from_amino(
                _object: &::serde_json::Map<String, ::serde_json::Value>,
            ) -> Result<Self, $crate::amino::AminoError> {
                Ok(Self {})
            }
        }

        amino_value_for_message!($name);
    };

    (
        $(#[$meta:meta])*
        pub struct $name:ident in $package:literal $(as $proto_name:literal)? {
            $(
                $(#[$field_meta:meta])*
                $number:literal $card:ident $kind:ident $field:ident: $ty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )+
        }

        impl ::v4_wire::Message for $name {
            fn encode_raw(
                &self,
                writer: &mut ::v4_wire::Writer,
            ) -> Result<(), ::v4_wire::EncodeError> {
                $(
                    message!(@encode $card $kind, $number, &self.$field, writer)?;
                )+
                Ok(())
            }

            fn merge_field(
                &mut self,
                tag: ::v4_wire::Tag,
                reader: &mut ::v4_wire::Reader<'_>,
            ) -> Result<(), ::v4_wire::DecodeError> {
                match tag.field_number() {
                    $(
                        $number => message!(@merge $card $kind, tag, &mut self.$field, reader)
                            .map_err(|err| err.push(stringify!($name), stringify!($field))),
                    )+
                    _ => reader.skip(tag),
                }
            }
        }

        impl $crate::Name for $name {
            const NAME: &'static str = message!(@name $name $($proto_name)?);
            const PACKAGE: &'static str = $package;
        }

        impl $crate::amino::Amino for $name {
            fn to_amino(
                &self,
                options: &$crate::amino::AminoOptions,
            ) -> ::serde_json::Map<String, ::serde_json::Value> {
                let mut object = $crate::amino::ObjectWriter::new(options);
                $(
                    message!(@to_amino $card, object, stringify!($field), &self.$field);
                )+
                object.finish()
            }

            fn from_amino(
                object: &::serde_json::Map<String, ::serde_json::Value>,
            ) -> Result<Self, $crate::amino::AminoError> {
                let reader = $crate::amino::ObjectReader::new(object);
                Ok(Self {
                    $(
                        $field: message!(@from_amino $card, reader, stringify!($field)),
                    )+
                })
            }
        }

        amino_value_for_message!($name);
    };
}

/// Lets a message appear as a field of another message on the Amino side.
macro_rules! amino_value_for_message {
    ($name:ty) => {
        impl $crate::amino::AminoValue for $name {
            fn is_canonical_zero(&self) -> bool {
                *self == Self::default()
            }

            fn to_amino_json(&self, options: &$crate::amino::AminoOptions) -> ::serde_json::Value {
                ::serde_json::Value::Object($crate::amino::Amino::to_amino(self, options))
            }

            fn from_amino_json(
                value: &::serde_json::Value,
            ) -> Result<Self, $crate::amino::AminoError> {
                $crate::amino::Amino::from_amino_value(value)
            }
        }
    };
}

macro_rules! proto_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(#[$first_meta:meta])*
            $first:ident = 0 => $first_name:literal,
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal => $variant_name:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            $(#[$first_meta])*
            #[default]
            $first,
            $(
                $(#[$variant_meta])*
                $variant,
            )+
            /// An ordinal not known to this build. Kept as read so that it survives a
            /// decode/encode round trip; `-1` when the symbolic name was unknown.
            ///
            /// The Amino form of every such value is `"UNRECOGNIZED"`, so the
            /// ordinal is lost when converting through Amino and reads back as
            /// `Unrecognized(-1)`.
            Unrecognized(i32),
        }

        impl $name {
            /// The symbolic name used in the schema and on the Amino side.
            #[must_use]
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    Self::$first => $first_name,
                    $(Self::$variant => $variant_name,)+
                    Self::Unrecognized(_) => "UNRECOGNIZED",
                }
            }

            #[must_use]
            pub fn from_str_name(name: &str) -> Option<Self> {
                match name {
                    $first_name => Some(Self::$first),
                    $($variant_name => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::v4_wire::Enumeration for $name {
            fn from_i32(value: i32) -> Self {
                match value {
                    0 => Self::$first,
                    $($value => Self::$variant,)+
                    other => Self::Unrecognized(other),
                }
            }

            fn to_i32(self) -> i32 {
                match self {
                    Self::$first => 0,
                    $(Self::$variant => $value,)+
                    Self::Unrecognized(value) => value,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str_name())
            }
        }

        impl $crate::amino::AminoValue for $name {
            fn is_canonical_zero(&self) -> bool {
                ::v4_wire::Enumeration::to_i32(*self) == 0
            }

            fn to_amino_json(&self, _options: &$crate::amino::AminoOptions) -> ::serde_json::Value {
                ::serde_json::Value::String(self.as_str_name().to_string())
            }

            fn from_amino_json(
                value: &::serde_json::Value,
            ) -> Result<Self, $crate::amino::AminoError> {
                if let ::serde_json::Value::String(name) = value {
                    return Ok(Self::from_str_name(name).unwrap_or(Self::Unrecognized(-1)));
                }
                let ordinal: i32 = $crate::amino::AminoValue::from_amino_json(value)?;
                Ok(<Self as ::v4_wire::Enumeration>::from_i32(ordinal))
            }
        }
    };
}
