use bytes::BufMut;

use super::{Ack, Connack, Connect, Publish, Suback, Subscribe, Unsubscribe};
use crate::{decode_var_int, read_raw_bytes, read_u8, write_u16, Encodable, Error, QoS};

/// MQTT v3.1.1 packet types.
///
/// `N` bounds the number of topic filters (or return codes) a decoded
/// subscribe, suback or unsubscribe may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet<'a, const N: usize> {
    /// [MQTT 3.1](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718028)
    Connect(Connect<'a>),
    /// [MQTT 3.2](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718033)
    Connack(Connack),
    /// [MQTT 3.3](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718037)
    Publish(Publish<'a>),
    /// [MQTT 3.4](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718043)
    Puback(u16),
    /// [MQTT 3.5](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718048)
    Pubrec(u16),
    /// [MQTT 3.6](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718053)
    Pubrel(u16),
    /// [MQTT 3.7](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718058)
    Pubcomp(u16),
    /// [MQTT 3.8](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718063)
    Subscribe(Subscribe<'a, N>),
    /// [MQTT 3.9](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718068)
    Suback(Suback<N>),
    /// [MQTT 3.10](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718072)
    Unsubscribe(Unsubscribe<'a, N>),
    /// [MQTT 3.11](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718077)
    Unsuback(u16),
    /// [MQTT 3.12](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718081)
    Pingreq,
    /// [MQTT 3.13](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718086)
    Pingresp,
    /// [MQTT 3.14](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718090)
    Disconnect,
}

impl<'a, const N: usize> Packet<'a, N> {
    /// Return the packet type variant.
    ///
    /// This can be used for matching, categorising, debuging, etc. Most users
    /// will match directly on `Packet` instead.
    pub fn get_type(&self) -> PacketType {
        match self {
            Packet::Pingreq => PacketType::Pingreq,
            Packet::Pingresp => PacketType::Pingresp,
            Packet::Connect(_) => PacketType::Connect,
            Packet::Connack(_) => PacketType::Connack,
            Packet::Publish(_) => PacketType::Publish,
            Packet::Puback(_) => PacketType::Puback,
            Packet::Pubrec(_) => PacketType::Pubrec,
            Packet::Pubrel(_) => PacketType::Pubrel,
            Packet::Pubcomp(_) => PacketType::Pubcomp,
            Packet::Subscribe(_) => PacketType::Subscribe,
            Packet::Suback(_) => PacketType::Suback,
            Packet::Unsubscribe(_) => PacketType::Unsubscribe,
            Packet::Unsuback(_) => PacketType::Unsuback,
            Packet::Disconnect => PacketType::Disconnect,
        }
    }

    /// Decode whatever packet starts at `data[0]`. String fields and payloads
    /// borrow from `data`.
    pub fn decode(data: &'a [u8]) -> Result<Self, Error> {
        let (header, body) = decode_frame(data, None)?;
        Ok(match header.typ {
            PacketType::Pingreq => Packet::Pingreq,
            PacketType::Pingresp => Packet::Pingresp,
            PacketType::Disconnect => Packet::Disconnect,

            PacketType::Connect => Packet::Connect(Connect::decode_body(body)?),
            PacketType::Connack => Packet::Connack(Connack::decode_body(body)?),
            PacketType::Publish => Packet::Publish(Publish::decode_body(header, body)?),
            PacketType::Puback => Packet::Puback(Ack::decode_body(header, body)?.pid),
            PacketType::Pubrec => Packet::Pubrec(Ack::decode_body(header, body)?.pid),
            PacketType::Pubrel => Packet::Pubrel(Ack::decode_body(header, body)?.pid),
            PacketType::Pubcomp => Packet::Pubcomp(Ack::decode_body(header, body)?.pid),
            PacketType::Subscribe => Packet::Subscribe(Subscribe::decode_body(header, body)?),
            PacketType::Suback => Packet::Suback(Suback::decode_body(body)?),
            PacketType::Unsubscribe => {
                Packet::Unsubscribe(Unsubscribe::decode_body(header, body)?)
            }
            PacketType::Unsuback => Packet::Unsuback(Ack::decode_body(header, body)?.pid),
        })
    }
}

impl<const N: usize> Encodable for Packet<'_, N> {
    fn control_byte(&self) -> u8 {
        match self {
            Packet::Connect(inner) => inner.control_byte(),
            Packet::Connack(inner) => inner.control_byte(),
            Packet::Publish(inner) => inner.control_byte(),
            Packet::Subscribe(inner) => inner.control_byte(),
            Packet::Suback(inner) => inner.control_byte(),
            Packet::Unsubscribe(inner) => inner.control_byte(),
            Packet::Puback(_)
            | Packet::Pubrec(_)
            | Packet::Pubrel(_)
            | Packet::Pubcomp(_)
            | Packet::Unsuback(_)
            | Packet::Pingreq
            | Packet::Pingresp
            | Packet::Disconnect => Header::for_type(self.get_type()).to_byte(),
        }
    }

    fn encode_body<B: BufMut>(&self, writer: &mut B) {
        match self {
            Packet::Connect(inner) => inner.encode_body(writer),
            Packet::Connack(inner) => inner.encode_body(writer),
            Packet::Publish(inner) => inner.encode_body(writer),
            Packet::Subscribe(inner) => inner.encode_body(writer),
            Packet::Suback(inner) => inner.encode_body(writer),
            Packet::Unsubscribe(inner) => inner.encode_body(writer),
            Packet::Puback(pid)
            | Packet::Pubrec(pid)
            | Packet::Pubrel(pid)
            | Packet::Pubcomp(pid)
            | Packet::Unsuback(pid) => write_u16(writer, *pid),
            Packet::Pingreq | Packet::Pingresp | Packet::Disconnect => {}
        }
    }

    fn body_len(&self) -> usize {
        match self {
            Packet::Connect(inner) => inner.body_len(),
            Packet::Connack(inner) => inner.body_len(),
            Packet::Publish(inner) => inner.body_len(),
            Packet::Subscribe(inner) => inner.body_len(),
            Packet::Suback(inner) => inner.body_len(),
            Packet::Unsubscribe(inner) => inner.body_len(),
            Packet::Pingreq | Packet::Pingresp | Packet::Disconnect => 0,
            Packet::Puback(_)
            | Packet::Pubrec(_)
            | Packet::Pubrel(_)
            | Packet::Pubcomp(_)
            | Packet::Unsuback(_) => 2,
        }
    }
}

/// MQTT v3.x packet type variant, without the associated data.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum PacketType {
    Connect = 1,
    Connack = 2,
    Publish = 3,
    Puback = 4,
    Pubrec = 5,
    Pubrel = 6,
    Pubcomp = 7,
    Subscribe = 8,
    Suback = 9,
    Unsubscribe = 10,
    Unsuback = 11,
    Pingreq = 12,
    Pingresp = 13,
    Disconnect = 14,
}

impl PacketType {
    /// Map the high nibble of a control byte, 0 and 15 are reserved.
    pub fn from_u8(value: u8) -> Result<PacketType, Error> {
        let typ = match value {
            1 => PacketType::Connect,
            2 => PacketType::Connack,
            3 => PacketType::Publish,
            4 => PacketType::Puback,
            5 => PacketType::Pubrec,
            6 => PacketType::Pubrel,
            7 => PacketType::Pubcomp,
            8 => PacketType::Subscribe,
            9 => PacketType::Suback,
            10 => PacketType::Unsubscribe,
            11 => PacketType::Unsuback,
            12 => PacketType::Pingreq,
            13 => PacketType::Pingresp,
            14 => PacketType::Disconnect,
            _ => return Err(Error::MalformedHeader),
        };
        Ok(typ)
    }
}

/// Fixed header type, the first byte of every packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    pub typ: PacketType,
    pub dup: bool,
    pub qos: QoS,
    pub retain: bool,
}

impl Header {
    pub fn new(typ: PacketType, dup: bool, qos: QoS, retain: bool) -> Self {
        Self {
            typ,
            dup,
            qos,
            retain,
        }
    }

    /// The header a packet of this type is sent with. PUBREL, SUBSCRIBE and
    /// UNSUBSCRIBE carry the reserved `0b0010` flags.
    pub fn for_type(typ: PacketType) -> Self {
        let qos = match typ {
            PacketType::Pubrel | PacketType::Subscribe | PacketType::Unsubscribe => QoS::Level1,
            _ => QoS::Level0,
        };
        Header::new(typ, false, qos, false)
    }

    pub fn from_byte(hd: u8) -> Result<Header, Error> {
        let typ = PacketType::from_u8(hd >> 4)?;
        let qos = QoS::from_u8((hd & 0b110) >> 1).map_err(|_| Error::MalformedHeader)?;
        Ok(Header {
            typ,
            dup: hd & 0b1000 != 0,
            qos,
            retain: hd & 1 == 1,
        })
    }

    pub fn to_byte(self) -> u8 {
        let mut byte = (self.typ as u8) << 4;
        if self.dup {
            byte |= 0b1000;
        }
        byte |= (self.qos as u8) << 1;
        if self.retain {
            byte |= 0b0001;
        }
        byte
    }

    /// Decode the fixed header and return it with the packet body, the
    /// `remaining length` bytes after it.
    pub fn decode(data: &[u8]) -> Result<(Header, &[u8]), Error> {
        decode_frame(data, None)
    }
}

/// Read the fixed header, check the packet type against `expected` and bound
/// the body by the remaining length. Bytes after the body are ignored.
pub(crate) fn decode_frame(
    data: &[u8],
    expected: Option<PacketType>,
) -> Result<(Header, &[u8]), Error> {
    let mut offset = 0;
    let header = Header::from_byte(read_u8(data, &mut offset)?)?;
    if expected.is_some_and(|typ| typ != header.typ) {
        return Err(Error::MalformedHeader);
    }
    let (remaining_len, _) = decode_var_int(data, &mut offset)?;
    let body = read_raw_bytes(data, &mut offset, remaining_len as usize)?;
    Ok((header, body))
}

macro_rules! empty_packet {
    ($($t:ident),+) => {
        $(
            #[doc = concat!("Header-only `", stringify!($t), "` packet.")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            pub struct $t;

            impl $t {
                pub fn decode(data: &[u8]) -> Result<Self, Error> {
                    decode_frame(data, Some(PacketType::$t))?;
                    Ok($t)
                }
            }

            impl Encodable for $t {
                fn control_byte(&self) -> u8 {
                    Header::for_type(PacketType::$t).to_byte()
                }

                fn encode_body<B: BufMut>(&self, _writer: &mut B) {}

                fn body_len(&self) -> usize {
                    0
                }
            }
        )+
    }
}

empty_packet!(Pingreq, Pingresp, Disconnect);

macro_rules! packet_from {
    ($($t:ident => $ty:ty),+) => {
        $(
            impl<'a, const N: usize> From<$ty> for Packet<'a, N> {
                fn from(p: $ty) -> Self {
                    Packet::$t(p)
                }
            }
        )+
    }
}

packet_from!(
    Connect => Connect<'a>,
    Connack => Connack,
    Publish => Publish<'a>,
    Subscribe => Subscribe<'a, N>,
    Suback => Suback<N>,
    Unsubscribe => Unsubscribe<'a, N>
);
