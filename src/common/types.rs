use core::fmt;

use bytes::BufMut;
use simdutf8::basic::from_utf8;

use super::{encode_packet, total_len};
use crate::Error;

/// The ability of writing a packet into a caller buffer, and calculating the
/// encoded size.
pub trait Encodable {
    /// First byte of the fixed header.
    fn control_byte(&self) -> u8;

    /// Write variable header and payload. The writer always has room for
    /// [`body_len`](Encodable::body_len) bytes.
    fn encode_body<B: BufMut>(&self, writer: &mut B);

    /// Length of variable header and payload, the remaining length.
    fn body_len(&self) -> usize;

    /// Total encoded length including the fixed header.
    fn encode_len(&self) -> Result<usize, Error> {
        total_len(self.body_len())
    }

    /// Encode the whole packet into `buf`, returning the number of bytes
    /// written. Nothing is written when `buf` is too short.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, Error> {
        encode_packet(self, buf)
    }
}

/// Packet delivery [Quality of Service] level.
///
/// [Quality of Service]: http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718099
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum QoS {
    /// `QoS 0`. At most once. No ack needed.
    #[default]
    Level0 = 0,
    /// `QoS 1`. At least once. One ack needed.
    Level1 = 1,
    /// `QoS 2`. Exactly once. Two acks needed.
    Level2 = 2,
}

impl QoS {
    pub fn from_u8(byte: u8) -> Result<QoS, Error> {
        match byte {
            0 => Ok(QoS::Level0),
            1 => Ok(QoS::Level1),
            2 => Ok(QoS::Level2),
            n => Err(Error::InvalidQos(n)),
        }
    }
}

/// Combined [`QoS`] and packet identifier.
///
/// Used only in [`Publish`] packets, where the identifier is on the wire only
/// for QoS 1 and 2.
///
/// [`Publish`]: crate::v3::Publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum QosPid {
    Level0,
    Level1(u16),
    Level2(u16),
}

impl QosPid {
    pub fn new(qos: QoS, pid: u16) -> Self {
        match qos {
            QoS::Level0 => QosPid::Level0,
            QoS::Level1 => QosPid::Level1(pid),
            QoS::Level2 => QosPid::Level2(pid),
        }
    }

    /// Get the packet identifier, `None` for QoS 0.
    pub fn pid(self) -> Option<u16> {
        match self {
            QosPid::Level0 => None,
            QosPid::Level1(pid) | QosPid::Level2(pid) => Some(pid),
        }
    }

    /// Get the QoS level.
    pub fn qos(self) -> QoS {
        match self {
            QosPid::Level0 => QoS::Level0,
            QosPid::Level1(_) => QoS::Level1,
            QosPid::Level2(_) => QoS::Level2,
        }
    }
}

/// A length-prefixed string field borrowed from a packet buffer.
///
/// The content is neither copied nor validated as UTF-8; use
/// [`as_str`](LenString::as_str) when text is needed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LenString<'a>(&'a [u8]);

impl<'a> LenString<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, Error> {
        if bytes.len() > u16::MAX as usize {
            return Err(Error::StringTooLong(bytes.len()));
        }
        Ok(LenString(bytes))
    }

    /// Bytes read from the wire, the length already fits the prefix.
    #[inline]
    pub(crate) fn from_wire(bytes: &'a [u8]) -> Self {
        debug_assert!(bytes.len() <= u16::MAX as usize);
        LenString(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    pub fn as_str(&self) -> Result<&'a str, Error> {
        from_utf8(self.0).map_err(|_| Error::InvalidString)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Size on the wire, including the 2-byte prefix.
    #[inline]
    pub fn encode_len(&self) -> usize {
        2 + self.0.len()
    }
}

impl<'a> TryFrom<&'a str> for LenString<'a> {
    type Error = Error;
    fn try_from(value: &'a str) -> Result<Self, Error> {
        LenString::new(value.as_bytes())
    }
}

impl<'a> TryFrom<&'a [u8]> for LenString<'a> {
    type Error = Error;
    fn try_from(value: &'a [u8]) -> Result<Self, Error> {
        LenString::new(value)
    }
}

impl PartialEq<&str> for LenString<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Debug for LenString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match from_utf8(self.0) {
            Ok(s) => write!(f, "{:?}", s),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for LenString<'a> {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let bytes: &'a [u8] = u.arbitrary()?;
        Ok(LenString(&bytes[..bytes.len().min(u16::MAX as usize)]))
    }
}
