use v4_wire::Message;

/// Associates a message with its fully qualified protobuf name.
pub trait Name: Message {
    /// The message name without its package, e.g. `Order`.
    const NAME: &'static str;

    /// The protobuf package, e.g. `dydxprotocol.clob`.
    const PACKAGE: &'static str;

    /// The dotted name, e.g. `dydxprotocol.clob.Order`.
    #[must_use]
    fn full_name() -> String {
        format!("{}.{}", Self::PACKAGE, Self::NAME)
    }

    /// The discriminator used when the message is carried in an [`crate::Any`] or
    /// an Amino envelope, e.g. `/dydxprotocol.clob.Order`.
    #[must_use]
    fn type_url() -> String {
        format!("/{}", Self::full_name())
    }
}
