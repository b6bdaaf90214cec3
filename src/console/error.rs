//! Error type shared by the registries, parser and dispatcher

/// Everything that can go wrong inside the console.
///
/// `RegistryFull`, `DuplicateName` and `InvalidName` only occur while
/// registering commands and variables at start-up. The remaining variants
/// are dispatch-time outcomes: they are reported back over the transport and
/// never stop the control loop.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The registry has no free slot left.
    RegistryFull,
    /// An entry with the same name is already registered.
    DuplicateName,
    /// The name is empty, too long, or contains whitespace or `=`.
    InvalidName,
    /// No command or variable is registered under the name.
    UnknownName,
    /// The value text does not parse into the expected type.
    InvalidValue,
    /// The variable cannot be written.
    ReadOnly,
    /// The record did not fit into the receive buffer and was dropped.
    BufferOverflow,
    /// The record is not valid UTF-8 text.
    Malformed,
    /// A handler's reply did not fit into the response sink. The record was
    /// executed; only part of its output was delivered.
    ResponseTooLong,
}

impl Error {
    /// Short reason used in error replies sent back to the host.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::RegistryFull => "registry full",
            Error::DuplicateName => "duplicate name",
            Error::InvalidName => "invalid name",
            Error::UnknownName => "unknown name",
            Error::InvalidValue => "invalid value",
            Error::ReadOnly => "read only",
            Error::BufferOverflow => "buffer overflow",
            Error::Malformed => "malformed record",
            Error::ResponseTooLong => "response too long",
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.reason())
    }
}

impl core::error::Error for Error {}

/// Lets handlers propagate `write!` failures with `?`.
impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::ResponseTooLong
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::RegistryFull => defmt::write!(f, "RegistryFull"),
            Error::DuplicateName => defmt::write!(f, "DuplicateName"),
            Error::InvalidName => defmt::write!(f, "InvalidName"),
            Error::UnknownName => defmt::write!(f, "UnknownName"),
            Error::InvalidValue => defmt::write!(f, "InvalidValue"),
            Error::ReadOnly => defmt::write!(f, "ReadOnly"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::Malformed => defmt::write!(f, "Malformed"),
            Error::ResponseTooLong => defmt::write!(f, "ResponseTooLong"),
        }
    }
}
