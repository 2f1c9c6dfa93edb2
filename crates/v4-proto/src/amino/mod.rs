//! The Amino JSON bridge used for signing and display.
//!
//! Every message converts to and from a JSON object keyed by its snake_case
//! field names. 64-bit integers are decimal strings, byte blobs are standard
//! base64 and enums are their symbolic names. Which zero-valued fields are left
//! out of the produced object is governed by [`Omission`]; on input a field may
//! always be absent, `null` or present.

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use crate::Name;

mod error;
mod value;

pub use error::{
    AminoError,
    AminoErrorKind,
};
pub use value::{
    AminoKey,
    AminoValue,
};

/// Which fields holding their canonical zero are left out of produced objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Omission {
    /// The upstream signing encoders' rule: 64-bit integers are omitted when zero
    /// and byte blobs when empty, every other field is emitted.
    #[default]
    Upstream,
    /// Every field at its canonical zero is omitted.
    Defaults,
    /// Nothing is omitted; unset explicit-presence fields are rendered as `null`.
    Nothing,
}

impl std::str::FromStr for Omission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upstream" => Ok(Self::Upstream),
            "defaults" => Ok(Self::Defaults),
            "nothing" => Ok(Self::Nothing),
            other => Err(format!(
                "unknown omission `{other}`; expected one of `upstream`, `defaults`, `nothing`"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AminoOptions {
    pub omit: Omission,
}

impl AminoOptions {
    #[must_use]
    pub fn with_omission(omit: Omission) -> Self {
        Self {
            omit,
        }
    }

    fn omits<T: AminoValue>(&self, value: &T) -> bool {
        match self.omit {
            Omission::Upstream => T::OMITTED_BY_UPSTREAM && value.is_canonical_zero(),
            Omission::Defaults => value.is_canonical_zero(),
            Omission::Nothing => false,
        }
    }
}

/// Builds the Amino object of one message, field by field.
pub struct ObjectWriter<'a> {
    options: &'a AminoOptions,
    object: Map<String, Value>,
}

impl<'a> ObjectWriter<'a> {
    #[must_use]
    pub fn new(options: &'a AminoOptions) -> Self {
        Self {
            options,
            object: Map::new(),
        }
    }

    /// Adds a field without explicit presence, unless the omission rule drops it.
    pub fn field<T: AminoValue>(&mut self, name: &str, value: &T) -> &mut Self {
        if !self.options.omits(value) {
            self.object
                .insert(name.to_string(), value.to_amino_json(self.options));
        }
        self
    }

    /// Adds a field with explicit presence. A set value is always emitted.
    pub fn optional<T: AminoValue>(&mut self, name: &str, value: &Option<T>) -> &mut Self {
        match value {
            Some(value) => self.present(name, value),
            None => self.absent(name),
        }
    }

    /// Adds a set member of a oneof or an explicit-presence field.
    pub fn present<T: AminoValue>(&mut self, name: &str, value: &T) -> &mut Self {
        self.object
            .insert(name.to_string(), value.to_amino_json(self.options));
        self
    }

    /// Records an unset explicit-presence field; only rendered, as `null`, when
    /// nothing is omitted.
    pub fn absent(&mut self, name: &str) -> &mut Self {
        if self.options.omit == Omission::Nothing {
            self.object.insert(name.to_string(), Value::Null);
        }
        self
    }

    #[must_use]
    pub fn finish(self) -> Map<String, Value> {
        self.object
    }
}

/// Reads the fields of one message's Amino object.
pub struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> ObjectReader<'a> {
    #[must_use]
    pub fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
        }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.object.get(name).filter(|value| !value.is_null())
    }

    /// Reads a field without explicit presence; absent or `null` is the default.
    ///
    /// # Errors
    /// Returns an error naming `name` if the value does not convert.
    pub fn field<T: AminoValue + Default>(&self, name: &'static str) -> Result<T, AminoError> {
        self.optional(name).map(Option::unwrap_or_default)
    }

    /// Reads a field with explicit presence; absent or `null` is `None`.
    ///
    /// # Errors
    /// Returns an error naming `name` if the value does not convert.
    pub fn optional<T: AminoValue>(&self, name: &'static str) -> Result<Option<T>, AminoError> {
        self.get(name)
            .map(|value| T::from_amino_json(value).map_err(|err| err.push(name)))
            .transpose()
    }
}

/// A message with an Amino JSON form.
pub trait Amino: Sized {
    fn to_amino(&self, options: &AminoOptions) -> Map<String, Value>;

    /// # Errors
    /// Returns an error if a field of `object` does not convert.
    fn from_amino(object: &Map<String, Value>) -> Result<Self, AminoError>;

    fn to_amino_value(&self, options: &AminoOptions) -> Value {
        Value::Object(self.to_amino(options))
    }

    /// # Errors
    /// Returns an error if `value` is not an object or one of its fields does not
    /// convert.
    fn from_amino_value(value: &Value) -> Result<Self, AminoError> {
        value
            .as_object()
            .ok_or_else(|| AminoError::expected_type("an object", value))
            .and_then(Self::from_amino)
    }

    /// Wraps the Amino object in its `{"type": .., "value": ..}` envelope.
    fn to_amino_msg(&self, options: &AminoOptions) -> AminoMsg
    where
        Self: Name,
    {
        AminoMsg {
            type_url: Self::type_url(),
            value: self.to_amino_value(options),
        }
    }

    /// # Errors
    /// Returns an error if the envelope is for another type or its value does not
    /// convert.
    fn from_amino_msg(msg: &AminoMsg) -> Result<Self, AminoError>
    where
        Self: Name,
    {
        let expected = Self::type_url();
        if msg.type_url != expected {
            return Err(AminoError::type_mismatch(expected, msg.type_url.clone()));
        }
        Self::from_amino_value(&msg.value)
    }
}

/// A message's Amino object tagged with its type URL.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AminoMsg {
    #[serde(rename = "type")]
    pub type_url: String,
    pub value: Value,
}
