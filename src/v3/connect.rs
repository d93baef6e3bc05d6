use core::fmt;

use bytes::BufMut;

use super::packet::decode_frame;
use super::{Header, PacketType};
use crate::{
    read_string, read_u16, read_u8, write_string, write_u16, write_u8, Encodable, Error,
    LenString, QoS,
};

const MQISDP: &[u8] = b"MQIsdp";
const MQTT: &[u8] = b"MQTT";

/// Protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Protocol {
    /// [MQTT 3.1]
    ///
    /// [MQTT 3.1]: https://public.dhe.ibm.com/software/dw/webservices/ws-mqtt/mqtt-v3r1.html
    V31 = 3,

    /// [MQTT 3.1.1] is the most commonly implemented version.
    ///
    /// [MQTT 3.1.1]: https://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html
    #[default]
    V311 = 4,
}

impl Protocol {
    pub fn new(name: &[u8], level: u8) -> Result<Protocol, Error> {
        match (name, level) {
            (MQISDP, 3) => Ok(Protocol::V31),
            (MQTT, 4) => Ok(Protocol::V311),
            _ => Err(Error::InvalidProtocol(level)),
        }
    }

    pub fn to_pair(self) -> (&'static [u8], u8) {
        match self {
            Self::V31 => (MQISDP, 3),
            Self::V311 => (MQTT, 4),
        }
    }

    fn encode_len(self) -> usize {
        let (name, _) = self.to_pair();
        2 + name.len() + 1
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = match self {
            Self::V31 => "v3.1",
            Self::V311 => "v3.1.1",
        };
        write!(f, "{}", output)
    }
}

/// Connect packet body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Connect<'a> {
    pub protocol: Protocol,
    pub clean_session: bool,
    pub keep_alive: u16,
    pub client_id: LenString<'a>,
    pub last_will: Option<LastWill<'a>>,
    pub username: Option<LenString<'a>>,
    pub password: Option<LenString<'a>>,
}

impl<'a> Connect<'a> {
    pub fn new(client_id: LenString<'a>, keep_alive: u16) -> Self {
        Connect {
            protocol: Protocol::V311,
            clean_session: true,
            keep_alive,
            client_id,
            last_will: None,
            username: None,
            password: None,
        }
    }

    pub fn decode(data: &'a [u8]) -> Result<Self, Error> {
        let (_, body) = decode_frame(data, Some(PacketType::Connect))?;
        Self::decode_body(body)
    }

    pub(crate) fn decode_body(body: &'a [u8]) -> Result<Self, Error> {
        let mut offset = 0;
        let name = read_string(body, &mut offset)?;
        let level = read_u8(body, &mut offset)?;
        let protocol = Protocol::new(name.as_bytes(), level)?;

        let connect_flags = read_u8(body, &mut offset)?;
        if connect_flags & 1 != 0 {
            return Err(Error::InvalidConnectFlags(connect_flags));
        }
        let keep_alive = read_u16(body, &mut offset)?;
        let client_id = read_string(body, &mut offset)?;
        let last_will = if connect_flags & 0b100 != 0 {
            let topic_name = read_string(body, &mut offset)?;
            let message = read_string(body, &mut offset)?;
            let qos = QoS::from_u8((connect_flags & 0b11000) >> 3)?;
            let retain = (connect_flags & 0b00100000) != 0;
            Some(LastWill {
                qos,
                retain,
                topic_name,
                message,
            })
        } else if connect_flags & 0b00111000 != 0 {
            return Err(Error::InvalidConnectFlags(connect_flags));
        } else {
            None
        };
        let username = if connect_flags & 0b10000000 != 0 {
            Some(read_string(body, &mut offset)?)
        } else {
            None
        };
        let password = if connect_flags & 0b01000000 != 0 {
            Some(read_string(body, &mut offset)?)
        } else {
            None
        };
        Ok(Connect {
            protocol,
            clean_session: (connect_flags & 0b10) != 0,
            keep_alive,
            client_id,
            last_will,
            username,
            password,
        })
    }

    fn connect_flags(&self) -> u8 {
        let mut connect_flags: u8 = 0b00000000;
        if self.clean_session {
            connect_flags |= 0b10;
        }
        if self.username.is_some() {
            connect_flags |= 0b10000000;
        }
        if self.password.is_some() {
            connect_flags |= 0b01000000;
        }
        if let Some(last_will) = self.last_will.as_ref() {
            connect_flags |= 0b00000100;
            connect_flags |= (last_will.qos as u8) << 3;
            if last_will.retain {
                connect_flags |= 0b00100000;
            }
        }
        connect_flags
    }
}

impl Encodable for Connect<'_> {
    fn control_byte(&self) -> u8 {
        Header::for_type(PacketType::Connect).to_byte()
    }

    fn encode_body<B: BufMut>(&self, writer: &mut B) {
        let (name, level) = self.protocol.to_pair();
        write_string(writer, LenString::from_wire(name));
        write_u8(writer, level);
        write_u8(writer, self.connect_flags());
        write_u16(writer, self.keep_alive);
        write_string(writer, self.client_id);
        if let Some(last_will) = self.last_will.as_ref() {
            write_string(writer, last_will.topic_name);
            write_string(writer, last_will.message);
        }
        if let Some(username) = self.username {
            write_string(writer, username);
        }
        if let Some(password) = self.password {
            write_string(writer, password);
        }
    }

    fn body_len(&self) -> usize {
        let mut length = self.protocol.encode_len();
        // flags + keep-alive
        length += 1 + 2;
        length += self.client_id.encode_len();
        if let Some(last_will) = self.last_will.as_ref() {
            length += last_will.topic_name.encode_len() + last_will.message.encode_len();
        }
        if let Some(username) = self.username.as_ref() {
            length += username.encode_len();
        }
        if let Some(password) = self.password.as_ref() {
            length += password.encode_len();
        }
        length
    }
}

/// Message that the server should publish when the client disconnects.
///
/// Sent by the client in the [Connect] packet. [MQTT 3.1.3.3].
///
/// [MQTT 3.1.3.3]: http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718031
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct LastWill<'a> {
    pub qos: QoS,
    pub retain: bool,
    pub topic_name: LenString<'a>,
    pub message: LenString<'a>,
}

impl<'a> LastWill<'a> {
    pub fn new(qos: QoS, topic_name: LenString<'a>, message: LenString<'a>) -> Self {
        LastWill {
            qos,
            retain: false,
            topic_name,
            message,
        }
    }
}

/// Connack packet body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Connack {
    pub session_present: bool,
    pub code: ConnectReturnCode,
}

impl Connack {
    pub fn new(session_present: bool, code: ConnectReturnCode) -> Self {
        Connack {
            session_present,
            code,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let (_, body) = decode_frame(data, Some(PacketType::Connack))?;
        Self::decode_body(body)
    }

    pub(crate) fn decode_body(body: &[u8]) -> Result<Self, Error> {
        let mut offset = 0;
        let flags = read_u8(body, &mut offset)?;
        let code = read_u8(body, &mut offset)?;
        let session_present = match flags {
            0 => false,
            1 => true,
            _ => return Err(Error::InvalidConnackFlags(flags)),
        };
        Ok(Connack {
            session_present,
            code: ConnectReturnCode::from_u8(code)?,
        })
    }
}

impl Encodable for Connack {
    fn control_byte(&self) -> u8 {
        Header::for_type(PacketType::Connack).to_byte()
    }

    fn encode_body<B: BufMut>(&self, writer: &mut B) {
        write_u8(writer, self.session_present.into());
        write_u8(writer, self.code as u8);
    }

    fn body_len(&self) -> usize {
        2
    }
}

/// Return code of a [Connack] packet.
///
/// See [MQTT 3.2.2.3] for interpretations.
///
/// [MQTT 3.2.2.3]: http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html#_Toc398718035
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum ConnectReturnCode {
    Accepted = 0,
    UnacceptableProtocolVersion = 1,
    IdentifierRejected = 2,
    ServerUnavailable = 3,
    BadUserNameOrPassword = 4,
    NotAuthorized = 5,
}

impl ConnectReturnCode {
    pub fn from_u8(byte: u8) -> Result<ConnectReturnCode, Error> {
        match byte {
            0 => Ok(ConnectReturnCode::Accepted),
            1 => Ok(ConnectReturnCode::UnacceptableProtocolVersion),
            2 => Ok(ConnectReturnCode::IdentifierRejected),
            3 => Ok(ConnectReturnCode::ServerUnavailable),
            4 => Ok(ConnectReturnCode::BadUserNameOrPassword),
            5 => Ok(ConnectReturnCode::NotAuthorized),
            n => Err(Error::InvalidConnectReturnCode(n)),
        }
    }
}
