use bytes::BufMut;

use crate::{Encodable, Error, LenString};

/// Largest value a 4-byte remaining length can carry.
pub const MAX_REMAINING_LEN: usize = 268_435_455;

#[inline]
pub(crate) fn read_string<'a>(data: &'a [u8], offset: &mut usize) -> Result<LenString<'a>, Error> {
    let len = read_u16(data, offset)? as usize;
    read_raw_bytes(data, offset, len).map(LenString::from_wire)
}

#[inline]
pub(crate) fn read_raw_bytes<'a>(
    data: &'a [u8],
    offset: &mut usize,
    len: usize,
) -> Result<&'a [u8], Error> {
    let result = data
        .get(*offset..)
        .and_then(|rest| rest.get(..len))
        .ok_or(Error::TruncatedBuffer)?;
    *offset += len;
    Ok(result)
}

#[inline]
pub(crate) fn read_u16(data: &[u8], offset: &mut usize) -> Result<u16, Error> {
    let bytes = read_raw_bytes(data, offset, 2)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

#[inline]
pub(crate) fn read_u8(data: &[u8], offset: &mut usize) -> Result<u8, Error> {
    let value = *data.get(*offset).ok_or(Error::TruncatedBuffer)?;
    *offset += 1;
    Ok(value)
}

#[inline]
pub(crate) fn write_string<B: BufMut>(writer: &mut B, value: LenString<'_>) {
    write_u16(writer, value.len() as u16);
    writer.put_slice(value.as_bytes());
}

#[inline]
pub(crate) fn write_u16<B: BufMut>(writer: &mut B, value: u16) {
    writer.put_u16(value);
}

#[inline]
pub(crate) fn write_u8<B: BufMut>(writer: &mut B, value: u8) {
    writer.put_u8(value);
}

/// Write a variable byte integer in its minimal form, returning the number of
/// bytes written.
pub fn write_var_int<B: BufMut>(writer: &mut B, mut value: usize) -> Result<usize, Error> {
    let len = var_int_len(value)?;
    if writer.remaining_mut() < len {
        return Err(Error::BufferTooShort);
    }
    loop {
        let mut byte = (value % 128) as u8;
        value /= 128;
        if value > 0 {
            byte |= 128;
        }
        writer.put_u8(byte);
        if value == 0 {
            break;
        }
    }
    Ok(len)
}

/// Decode a variable byte integer (4 bytes max), advancing `offset` past it.
#[inline]
pub fn decode_var_int(data: &[u8], offset: &mut usize) -> Result<(u32, usize), Error> {
    let start_offset = *offset;
    let mut var_int: u32 = 0;
    let mut i = 0;
    loop {
        let byte = read_u8(data, offset)?;
        var_int |= (u32::from(byte) & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            break;
        } else if i < 3 {
            i += 1;
        } else {
            return Err(Error::MalformedRemainingLength);
        }
    }
    Ok((var_int, *offset - start_offset))
}

/// Return the encoded size of the variable byte integer.
#[inline]
pub fn var_int_len(value: usize) -> Result<usize, Error> {
    let len = if value < 128 {
        1
    } else if value < 16384 {
        2
    } else if value < 2097152 {
        3
    } else if value <= MAX_REMAINING_LEN {
        4
    } else {
        return Err(Error::MalformedRemainingLength);
    };
    Ok(len)
}

/// Return the packet total encoded length by a given remaining length.
#[inline]
pub fn total_len(remaining_len: usize) -> Result<usize, Error> {
    Ok(1 + var_int_len(remaining_len)? + remaining_len)
}

/// Encode a packet into `buf`, checking the full size before the first byte
/// is written.
pub fn encode_packet<E: Encodable + ?Sized>(packet: &E, buf: &mut [u8]) -> Result<usize, Error> {
    let remaining_len = packet.body_len();
    let total = total_len(remaining_len)?;
    if buf.len() < total {
        return Err(Error::BufferTooShort);
    }

    let mut writer = &mut buf[..total];
    writer.put_u8(packet.control_byte());
    write_var_int(&mut writer, remaining_len)?;
    packet.encode_body(&mut writer);
    debug_assert!(writer.is_empty());
    Ok(total)
}
