//! Common error types for transport operations

/// A common error type for datagram transports.
///
/// Socket implementations are free to use their own error type; this one
/// is provided for drivers that only need to report the usual failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The socket is not bound.
    NotBound,
    /// An error occurred while sending a datagram.
    SendError,
    /// An error occurred while receiving a datagram.
    ReceiveError,
    /// A timeout occurred.
    Timeout,
    /// An invalid address was provided.
    InvalidAddress,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Error::NotBound => "socket not bound",
            Error::SendError => "send failed",
            Error::ReceiveError => "receive failed",
            Error::Timeout => "timed out",
            Error::InvalidAddress => "invalid address",
        })
    }
}

impl core::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotBound => defmt::write!(f, "NotBound"),
            Error::SendError => defmt::write!(f, "SendError"),
            Error::ReceiveError => defmt::write!(f, "ReceiveError"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
        }
    }
}
