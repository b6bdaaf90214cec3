//! Datagram transport abstraction for the console.
//!
//! The console never owns a network stack. It talks to whatever the
//! firmware provides through the [`UdpSocket`] trait (or [`AsyncUdpSocket`]
//! with the `async` feature): receive one datagram together with its
//! sender, send bytes back to an address.
//!
//! Implementations must not block indefinitely. A socket with nothing to
//! deliver returns `Ok(None)` from [`UdpSocket::recv_from`], which makes the
//! console's poll step a no-op.
//!
//! ```rust
//! use fwconsole::network::{UdpSocket, error::Error};
//!
//! struct Loopback {
//!     pending: Option<([u8; 16], usize)>,
//! }
//!
//! impl UdpSocket for Loopback {
//!     type Address = u16;
//!     type Error = Error;
//!
//!     fn recv_from(&mut self, buf: &mut [u8]) -> Result<Option<(usize, u16)>, Error> {
//!         match self.pending.take() {
//!             Some((data, len)) => {
//!                 let n = len.min(buf.len());
//!                 buf[..n].copy_from_slice(&data[..n]);
//!                 Ok(Some((len, 4000)))
//!             }
//!             None => Ok(None),
//!         }
//!     }
//!
//!     fn send_to(&mut self, _remote: &u16, buf: &[u8]) -> Result<usize, Error> {
//!         Ok(buf.len())
//!     }
//! }
//! ```

#![allow(async_fn_in_trait)]
#![deny(unsafe_code)]

/// Common error types for transport operations
pub mod error;

/// Re-exports of the transport traits
pub mod prelude {
    #[cfg(feature = "async")]
    pub use super::AsyncUdpSocket;
    pub use super::UdpSocket;
}

/// A non-blocking datagram endpoint.
pub trait UdpSocket {
    /// Peer address type, copied out of each received datagram so a reply
    /// can be sent after the socket has been borrowed again.
    type Address: Clone;
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Receive one datagram into `buf`.
    ///
    /// Returns `Ok(None)` when nothing is pending. Otherwise returns the
    /// datagram's full length and its sender. The length may exceed
    /// `buf.len()`, in which case only the first `buf.len()` bytes were
    /// copied and the rest of the datagram is lost.
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<Option<(usize, Self::Address)>, Self::Error>;

    /// Send `buf` as one datagram to `remote`.
    fn send_to(&mut self, remote: &Self::Address, buf: &[u8]) -> Result<usize, Self::Error>;
}

/// Async counterpart of [`UdpSocket`].
#[cfg(feature = "async")]
pub trait AsyncUdpSocket {
    /// Peer address type
    type Address: Clone;
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Receive one datagram into `buf`, see [`UdpSocket::recv_from`].
    async fn recv_from(
        &mut self,
        buf: &mut [u8],
    ) -> Result<Option<(usize, Self::Address)>, Self::Error>;

    /// Send `buf` as one datagram to `remote`.
    async fn send_to(&mut self, remote: &Self::Address, buf: &[u8]) -> Result<usize, Self::Error>;
}
