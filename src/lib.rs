//! Zero-copy MQTT v3.1.1 codec plus the timeout clock and socket transport an
//! embedded client drives it with.
//!
//! Decoders borrow from the caller's receive buffer and encoders write into
//! the caller's send buffer; nothing in the codec allocates.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

mod common;
pub mod timer;
pub mod transport;
pub mod v3;

pub(crate) use common::{
    read_raw_bytes, read_string, read_u16, read_u8, write_string, write_u16, write_u8,
};
pub use common::{
    decode_var_int, encode_packet, total_len, var_int_len, write_var_int, Encodable,
    Error, IoErrorKind, LenString, QoS, QosPid, ToError, MAX_REMAINING_LEN,
};
pub use timer::{Clock, Timer};
pub use transport::{read_packet, Transport};

#[cfg(feature = "std")]
pub use timer::SystemClock;
#[cfg(feature = "std")]
pub use transport::{ConnectOptions, TcpTransport};
#[cfg(feature = "embedded-io")]
pub use transport::EmbeddedTransport;
