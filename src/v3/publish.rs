use bytes::BufMut;

use super::packet::decode_frame;
use super::{Header, PacketType};
use crate::{
    read_string, read_u16, write_string, write_u16, Encodable, Error, LenString, QoS, QosPid,
};

/// Publish packet body type.
///
/// Topic and payload are views into the decoded buffer, nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Publish<'a> {
    pub dup: bool,
    pub retain: bool,
    pub qos_pid: QosPid,
    pub topic_name: LenString<'a>,
    pub payload: &'a [u8],
}

impl<'a> Publish<'a> {
    pub fn new(qos_pid: QosPid, topic_name: LenString<'a>, payload: &'a [u8]) -> Self {
        Publish {
            dup: false,
            retain: false,
            qos_pid,
            topic_name,
            payload,
        }
    }

    /// Decode a complete PUBLISH packet.
    pub fn decode(data: &'a [u8]) -> Result<Self, Error> {
        let (header, body) = decode_frame(data, Some(PacketType::Publish))?;
        Self::decode_body(header, body)
    }

    pub(crate) fn decode_body(header: Header, body: &'a [u8]) -> Result<Self, Error> {
        let mut offset = 0;
        let topic_name = read_string(body, &mut offset)?;
        let qos_pid = match header.qos {
            QoS::Level0 => QosPid::Level0,
            QoS::Level1 => QosPid::Level1(read_u16(body, &mut offset)?),
            QoS::Level2 => QosPid::Level2(read_u16(body, &mut offset)?),
        };
        Ok(Publish {
            dup: header.dup,
            retain: header.retain,
            qos_pid,
            topic_name,
            payload: &body[offset..],
        })
    }

    /// Packet identifier, only present for QoS 1 and 2.
    pub fn pid(&self) -> Option<u16> {
        self.qos_pid.pid()
    }

    pub fn qos(&self) -> QoS {
        self.qos_pid.qos()
    }
}

impl Encodable for Publish<'_> {
    fn control_byte(&self) -> u8 {
        Header::new(PacketType::Publish, self.dup, self.qos(), self.retain).to_byte()
    }

    fn encode_body<B: BufMut>(&self, writer: &mut B) {
        write_string(writer, self.topic_name);
        if let Some(pid) = self.pid() {
            write_u16(writer, pid);
        }
        writer.put_slice(self.payload);
    }

    fn body_len(&self) -> usize {
        let mut length = self.topic_name.encode_len();
        if self.pid().is_some() {
            length += 2;
        }
        length + self.payload.len()
    }
}
