use proptest::prelude::*;

use crate::*;

#[test]
fn test_var_int_boundaries() {
    for (value, len) in [
        (0, 1),
        (1, 1),
        (127, 1),
        (128, 2),
        (16_383, 2),
        (16_384, 3),
        (2_097_151, 3),
        (2_097_152, 4),
        (268_435_455, 4),
    ] {
        let mut buf = [0u8; 4];
        let mut writer = &mut buf[..];
        assert_eq!(write_var_int(&mut writer, value), Ok(len), "{}", value);
        assert_eq!(var_int_len(value), Ok(len));

        let mut offset = 0;
        assert_eq!(
            decode_var_int(&buf[..len], &mut offset),
            Ok((value as u32, len))
        );
        assert_eq!(offset, len);
    }
}

#[test]
fn test_var_int_wire_bytes() {
    let mut buf = [0u8; 4];
    let mut writer = &mut buf[..];
    assert_eq!(write_var_int(&mut writer, 321), Ok(2));
    assert_eq!(buf[..2], [0xC1, 0x02]);

    let mut buf = [0u8; 4];
    let mut writer = &mut buf[..];
    assert_eq!(write_var_int(&mut writer, MAX_REMAINING_LEN), Ok(4));
    assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0x7F]);
}

#[test]
fn test_var_int_too_large() {
    let mut buf = [0u8; 8];
    let mut writer = &mut buf[..];
    assert_eq!(
        write_var_int(&mut writer, 268_435_456),
        Err(Error::MalformedRemainingLength)
    );
    assert_eq!(buf, [0u8; 8]);
    assert_eq!(
        var_int_len(268_435_456),
        Err(Error::MalformedRemainingLength)
    );
    assert_eq!(total_len(268_435_456), Err(Error::MalformedRemainingLength));
}

#[test]
fn test_var_int_writer_too_short() {
    let mut buf = [0u8; 1];
    let mut writer = &mut buf[..];
    assert_eq!(write_var_int(&mut writer, 128), Err(Error::BufferTooShort));
}

#[test]
fn test_var_int_decode_errors() {
    let mut offset = 0;
    assert_eq!(
        decode_var_int(&[0x80, 0x80, 0x80, 0x80, 0x01], &mut offset),
        Err(Error::MalformedRemainingLength)
    );

    let mut offset = 0;
    assert_eq!(
        decode_var_int(&[0x80, 0x80], &mut offset),
        Err(Error::TruncatedBuffer)
    );

    let mut offset = 0;
    assert_eq!(decode_var_int(&[], &mut offset), Err(Error::TruncatedBuffer));
}

#[test]
fn test_var_int_non_minimal_accepted() {
    let mut offset = 0;
    assert_eq!(decode_var_int(&[0x80, 0x00], &mut offset), Ok((0, 2)));
}

#[test]
fn test_read_string() {
    let data = [0x00, 0x03, b'a', b'/', b'b', 0xFF];
    let mut offset = 0;
    let s = read_string(&data, &mut offset).unwrap();
    assert_eq!(s, "a/b");
    assert_eq!(s.as_str(), Ok("a/b"));
    assert_eq!(offset, 5);

    let mut offset = 0;
    assert_eq!(
        read_string(&data[..4], &mut offset),
        Err(Error::TruncatedBuffer)
    );
    let mut offset = 0;
    assert_eq!(read_string(&data[..1], &mut offset), Err(Error::TruncatedBuffer));
}

#[test]
fn test_write_string() {
    let mut buf = [0u8; 8];
    let mut writer = &mut buf[..];
    write_string(&mut writer, LenString::try_from("mqtt").unwrap());
    assert_eq!(writer.len(), 2);
    assert_eq!(buf[..6], [0x00, 0x04, b'm', b'q', b't', b't']);
}

#[test]
fn test_len_string() {
    let long = [b'x'; 65_536];
    assert_eq!(LenString::new(&long), Err(Error::StringTooLong(65_536)));
    assert_eq!(LenString::new(&long[..65_535]).map(|s| s.len()), Ok(65_535));

    let invalid = LenString::new(&[b'a', 0xC0]).unwrap();
    assert_eq!(invalid.as_str(), Err(Error::InvalidString));
    assert_eq!(invalid.encode_len(), 4);
    assert!(LenString::default().is_empty());
}

#[test]
fn test_qos() {
    assert_eq!(QoS::from_u8(2), Ok(QoS::Level2));
    assert_eq!(QoS::from_u8(3), Err(Error::InvalidQos(3)));
    assert_eq!(QosPid::new(QoS::Level0, 7).pid(), None);
    assert_eq!(QosPid::new(QoS::Level1, 7).pid(), Some(7));
    assert_eq!(QosPid::Level2(9).qos(), QoS::Level2);
}

#[test]
fn test_error_kinds() {
    assert!(Error::IoFailure(IoErrorKind::TimedOut).is_timeout());
    assert!(Error::ConnectFailure(IoErrorKind::TimedOut).is_timeout());
    assert!(!Error::BufferTooShort.is_timeout());
    assert!(Error::IoFailure(IoErrorKind::UnexpectedEof).is_eof());
}

#[cfg(feature = "std")]
#[test]
fn test_std_io_error() {
    let err = std::io::Error::from(std::io::ErrorKind::BrokenPipe);
    assert_eq!(err.to_error(), Error::IoFailure(IoErrorKind::ConnectionReset));
    assert_eq!(
        Error::StringTooLong(70_000).to_string(),
        "string too long: 70000 bytes"
    );
}

proptest! {
    #[test]
    fn var_int_round_trip(value in 0usize..=MAX_REMAINING_LEN) {
        let mut buf = [0u8; 4];
        let mut writer = &mut buf[..];
        let len = write_var_int(&mut writer, value).unwrap();
        prop_assert_eq!(len, var_int_len(value).unwrap());

        let mut offset = 0;
        prop_assert_eq!(decode_var_int(&buf[..len], &mut offset), Ok((value as u32, len)));
    }

    #[test]
    fn read_raw_bytes_never_overruns(data in prop::collection::vec(any::<u8>(), 0..32),
                                     start in 0usize..40, len in 0usize..40) {
        let mut offset = start;
        match read_raw_bytes(&data, &mut offset, len) {
            Ok(bytes) => {
                prop_assert_eq!(bytes.len(), len);
                prop_assert_eq!(offset, start + len);
                prop_assert!(offset <= data.len());
            }
            Err(err) => {
                prop_assert_eq!(err, Error::TruncatedBuffer);
                prop_assert_eq!(offset, start);
            }
        }
    }
}
