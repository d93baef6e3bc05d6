use bytes::BufMut;

use super::packet::decode_frame;
use super::{Header, PacketType};
use crate::{read_u16, write_u16, Encodable, Error};

/// Acknowledgement made of a fixed header and a packet identifier: PUBACK,
/// PUBREC, PUBREL, PUBCOMP and UNSUBACK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Ack {
    pub typ: PacketType,
    pub dup: bool,
    pub pid: u16,
}

impl Ack {
    pub fn new(typ: PacketType, pid: u16) -> Self {
        Ack {
            typ,
            dup: false,
            pid,
        }
    }

    pub fn puback(pid: u16) -> Self {
        Ack::new(PacketType::Puback, pid)
    }

    pub fn pubrec(pid: u16) -> Self {
        Ack::new(PacketType::Pubrec, pid)
    }

    pub fn pubrel(pid: u16) -> Self {
        Ack::new(PacketType::Pubrel, pid)
    }

    pub fn pubcomp(pid: u16) -> Self {
        Ack::new(PacketType::Pubcomp, pid)
    }

    pub fn unsuback(pid: u16) -> Self {
        Ack::new(PacketType::Unsuback, pid)
    }

    /// Decode an acknowledgement of type `expected`. Any other packet type is
    /// a `MalformedHeader`, so a PUBREC can never be taken for a PUBACK.
    ///
    /// Only the leading packet identifier is read, which also makes this
    /// usable to peek at the identifier of a SUBACK.
    pub fn decode(data: &[u8], expected: PacketType) -> Result<Self, Error> {
        let (header, body) = decode_frame(data, Some(expected))?;
        Self::decode_body(header, body)
    }

    pub(crate) fn decode_body(header: Header, body: &[u8]) -> Result<Self, Error> {
        let pid = read_u16(body, &mut 0)?;
        Ok(Ack {
            typ: header.typ,
            dup: header.dup,
            pid,
        })
    }
}

impl Encodable for Ack {
    fn control_byte(&self) -> u8 {
        let mut header = Header::for_type(self.typ);
        header.dup = self.dup;
        header.to_byte()
    }

    fn encode_body<B: BufMut>(&self, writer: &mut B) {
        write_u16(writer, self.pid);
    }

    fn body_len(&self) -> usize {
        2
    }
}
