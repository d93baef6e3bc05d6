use bytes::BufMut;
use heapless::Vec;

use super::packet::decode_frame;
use super::{Header, PacketType};
use crate::{
    read_string, read_u16, read_u8, write_string, write_u16, write_u8, Encodable, Error,
    LenString, QoS,
};

/// Subscribe packet body type, holding at most `N` topic filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribe<'a, const N: usize> {
    pub dup: bool,
    pub pid: u16,
    pub topics: Vec<(LenString<'a>, QoS), N>,
}

/// Suback packet body type, holding at most `N` return codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suback<const N: usize> {
    pub pid: u16,
    pub topics: Vec<SubscribeReturnCode, N>,
}

/// Unsubscribe packet body type, holding at most `N` topic filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsubscribe<'a, const N: usize> {
    pub dup: bool,
    pub pid: u16,
    pub topics: Vec<LenString<'a>, N>,
}

impl<'a, const N: usize> Subscribe<'a, N> {
    pub fn new(pid: u16) -> Self {
        Subscribe {
            dup: false,
            pid,
            topics: Vec::new(),
        }
    }

    /// Append a topic filter, `TooManyFilters` once `N` are held.
    pub fn push(&mut self, topic_filter: LenString<'a>, max_qos: QoS) -> Result<(), Error> {
        self.topics
            .push((topic_filter, max_qos))
            .map_err(|_| Error::TooManyFilters)
    }

    pub fn decode(data: &'a [u8]) -> Result<Self, Error> {
        let (header, body) = decode_frame(data, Some(PacketType::Subscribe))?;
        Self::decode_body(header, body)
    }

    pub(crate) fn decode_body(header: Header, body: &'a [u8]) -> Result<Self, Error> {
        let mut offset = 0;
        let mut subscribe = Subscribe::new(read_u16(body, &mut offset)?);
        subscribe.dup = header.dup;
        while offset < body.len() {
            if subscribe.topics.is_full() {
                return Err(Error::TooManyFilters);
            }
            let topic_filter = read_string(body, &mut offset)?;
            let max_qos = QoS::from_u8(read_u8(body, &mut offset)?)?;
            subscribe.push(topic_filter, max_qos)?;
        }
        Ok(subscribe)
    }
}

impl<const N: usize> Encodable for Subscribe<'_, N> {
    fn control_byte(&self) -> u8 {
        Header::new(PacketType::Subscribe, self.dup, QoS::Level1, false).to_byte()
    }

    fn encode_body<B: BufMut>(&self, writer: &mut B) {
        write_u16(writer, self.pid);
        for (topic_filter, max_qos) in &self.topics {
            write_string(writer, *topic_filter);
            write_u8(writer, *max_qos as u8);
        }
    }

    fn body_len(&self) -> usize {
        2 + self
            .topics
            .iter()
            .map(|(filter, _)| filter.encode_len() + 1)
            .sum::<usize>()
    }
}

impl<const N: usize> Suback<N> {
    pub fn new(pid: u16) -> Self {
        Suback {
            pid,
            topics: Vec::new(),
        }
    }

    pub fn push(&mut self, code: SubscribeReturnCode) -> Result<(), Error> {
        self.topics.push(code).map_err(|_| Error::TooManyFilters)
    }

    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let (_, body) = decode_frame(data, Some(PacketType::Suback))?;
        Self::decode_body(body)
    }

    pub(crate) fn decode_body(body: &[u8]) -> Result<Self, Error> {
        let mut offset = 0;
        let mut suback = Suback::new(read_u16(body, &mut offset)?);
        while offset < body.len() {
            let code = SubscribeReturnCode::from_u8(read_u8(body, &mut offset)?)?;
            suback.push(code)?;
        }
        Ok(suback)
    }
}

impl<const N: usize> Encodable for Suback<N> {
    fn control_byte(&self) -> u8 {
        Header::for_type(PacketType::Suback).to_byte()
    }

    fn encode_body<B: BufMut>(&self, writer: &mut B) {
        write_u16(writer, self.pid);
        for code in &self.topics {
            write_u8(writer, *code as u8);
        }
    }

    fn body_len(&self) -> usize {
        2 + self.topics.len()
    }
}

impl<'a, const N: usize> Unsubscribe<'a, N> {
    pub fn new(pid: u16) -> Self {
        Unsubscribe {
            dup: false,
            pid,
            topics: Vec::new(),
        }
    }

    pub fn push(&mut self, topic_filter: LenString<'a>) -> Result<(), Error> {
        self.topics
            .push(topic_filter)
            .map_err(|_| Error::TooManyFilters)
    }

    /// Decode an UNSUBSCRIBE packet. Filters are read until the end of the
    /// packet; a packet with more than `N` filters fails with
    /// `TooManyFilters` and never grows past `N`.
    pub fn decode(data: &'a [u8]) -> Result<Self, Error> {
        let (header, body) = decode_frame(data, Some(PacketType::Unsubscribe))?;
        Self::decode_body(header, body)
    }

    pub(crate) fn decode_body(header: Header, body: &'a [u8]) -> Result<Self, Error> {
        let mut offset = 0;
        let mut unsubscribe = Unsubscribe::new(read_u16(body, &mut offset)?);
        unsubscribe.dup = header.dup;
        while offset < body.len() {
            if unsubscribe.topics.is_full() {
                return Err(Error::TooManyFilters);
            }
            unsubscribe.push(read_string(body, &mut offset)?)?;
        }
        Ok(unsubscribe)
    }
}

impl<const N: usize> Encodable for Unsubscribe<'_, N> {
    fn control_byte(&self) -> u8 {
        Header::new(PacketType::Unsubscribe, self.dup, QoS::Level1, false).to_byte()
    }

    fn encode_body<B: BufMut>(&self, writer: &mut B) {
        write_u16(writer, self.pid);
        for topic_filter in &self.topics {
            write_string(writer, *topic_filter);
        }
    }

    fn body_len(&self) -> usize {
        2 + self
            .topics
            .iter()
            .map(LenString::encode_len)
            .sum::<usize>()
    }
}

/// Subscribe return code type.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum SubscribeReturnCode {
    MaxLevel0 = 0,
    MaxLevel1 = 1,
    MaxLevel2 = 2,
    Failure = 0x80,
}

impl SubscribeReturnCode {
    pub fn from_u8(value: u8) -> Result<SubscribeReturnCode, Error> {
        match value {
            0x80 => Ok(SubscribeReturnCode::Failure),
            0 => Ok(SubscribeReturnCode::MaxLevel0),
            1 => Ok(SubscribeReturnCode::MaxLevel1),
            2 => Ok(SubscribeReturnCode::MaxLevel2),
            _ => Err(Error::InvalidQos(value)),
        }
    }
}

impl From<QoS> for SubscribeReturnCode {
    fn from(qos: QoS) -> SubscribeReturnCode {
        match qos {
            QoS::Level0 => SubscribeReturnCode::MaxLevel0,
            QoS::Level1 => SubscribeReturnCode::MaxLevel1,
            QoS::Level2 => SubscribeReturnCode::MaxLevel2,
        }
    }
}
