mod error;
mod types;
mod utils;

#[cfg(test)]
mod tests;

pub(crate) use utils::{
    read_raw_bytes, read_string, read_u16, read_u8, write_string, write_u16, write_u8,
};

pub use error::{Error, IoErrorKind, ToError};
pub use types::{Encodable, LenString, QoS, QosPid};
pub use utils::{
    decode_var_int, encode_packet, total_len, var_int_len, write_var_int, MAX_REMAINING_LEN,
};
