use proptest::prelude::*;

use crate::v3::*;
use crate::*;

fn assert_encode<const N: usize>(pkt: Packet<'_, N>, len: usize) {
    let mut data = vec![0u8; len + 8];
    assert_eq!(pkt.encode_len(), Ok(len));
    assert_eq!(pkt.encode(&mut data), Ok(len));

    let mut short = vec![0u8; len - 1];
    assert_eq!(pkt.encode(&mut short), Err(Error::BufferTooShort));
    assert!(short.iter().all(|b| *b == 0));

    let decoded_pkt = Packet::<N>::decode(&data[..len]).unwrap();
    assert_eq!(pkt, decoded_pkt);

    let (_, body) = Header::decode(&data).unwrap();
    assert_eq!(total_len(body.len()), Ok(len));
}

fn s(value: &str) -> LenString<'_> {
    LenString::try_from(value).unwrap()
}

#[test]
fn test_encode_connect() {
    let packet = Connect::new(s("sample"), 120);
    assert_encode::<1>(packet.into(), 20);

    let packet = Connect {
        protocol: Protocol::V311,
        keep_alive: 120,
        client_id: s("sample"),
        clean_session: true,
        last_will: Some(LastWill {
            qos: QoS::Level1,
            retain: true,
            topic_name: s("abc"),
            message: s("msg-content"),
        }),
        username: Some(s("username")),
        password: Some(s("password")),
    };
    assert_encode::<1>(Packet::Connect(packet), 58);

    let packet = Connect {
        protocol: Protocol::V31,
        keep_alive: 0,
        client_id: s(""),
        clean_session: false,
        last_will: None,
        username: None,
        password: Some(s("pw")),
    };
    assert_encode::<1>(Packet::Connect(packet), 20);
}

#[test]
fn test_encode_connect_bytes() {
    let mut connect = Connect::new(s("id"), 10);
    connect.last_will = Some(LastWill::new(QoS::Level2, s("w"), s("x")));
    let mut buf = [0u8; 32];
    let len = connect.encode(&mut buf).unwrap();
    assert_eq!(
        buf[..len],
        [
            0b00010000, 20, 0x00, 0x04, b'M', b'Q', b'T', b'T', 0x04,
            0b00010110, // will qos=2, +last_will, +clean_session
            0x00, 0x0a, // 10 sec
            0x00, 0x02, b'i', b'd', // client_id
            0x00, 0x01, b'w', // will topic
            0x00, 0x01, b'x', // will message
        ]
    );
}

#[test]
fn test_encode_connack() {
    let packet = Connack::new(true, ConnectReturnCode::Accepted);
    assert_encode::<1>(packet.into(), 4);

    let mut buf = [0u8; 4];
    Connack::new(false, ConnectReturnCode::BadUserNameOrPassword)
        .encode(&mut buf)
        .unwrap();
    assert_eq!(buf, [0b00100000, 2, 0x00, 0x04]);
}

#[test]
fn test_encode_publish() {
    let payload = [1, 2, 3];
    let packet = Publish::new(QosPid::Level0, s("a/b"), &payload);
    assert_encode::<1>(Packet::Publish(packet), 10);

    let mut buf = [0u8; 10];
    assert_eq!(packet.encode(&mut buf), Ok(10));
    assert_eq!(buf, [0b00110000, 8, 0x00, 0x03, b'a', b'/', b'b', 1, 2, 3]);

    let mut packet = Publish::new(QosPid::Level2(10), s("a/b"), b"hi");
    packet.dup = true;
    packet.retain = true;
    assert_encode::<1>(Packet::Publish(packet), 11);
    let mut buf = [0u8; 11];
    packet.encode(&mut buf).unwrap();
    assert_eq!(buf[..2], [0b00111101, 9]);
    assert_eq!(buf[7..9], [0x00, 0x0a]);
}

#[test]
fn test_encode_publish_two_byte_length() {
    let payload = [0xAB; 200];
    let packet = Publish::new(QosPid::Level0, s("a/b"), &payload);
    assert_encode::<1>(Packet::Publish(packet), 208);

    let mut buf = [0u8; 208];
    packet.encode(&mut buf).unwrap();
    assert_eq!(buf[..3], [0b00110000, 0xCD, 0x01]);
}

#[test]
fn test_encode_acks() {
    assert_encode::<1>(Packet::Puback(1), 4);
    assert_encode::<1>(Packet::Pubrec(2), 4);
    assert_encode::<1>(Packet::Pubrel(3), 4);
    assert_encode::<1>(Packet::Pubcomp(4), 4);
    assert_encode::<1>(Packet::Unsuback(5), 4);

    for (ack, first) in [
        (Ack::puback(7), 0b01000000),
        (Ack::pubrec(7), 0b01010000),
        (Ack::pubrel(7), 0b01100010),
        (Ack::pubcomp(7), 0b01110000),
        (Ack::unsuback(7), 0b10110000),
    ] {
        let mut buf = [0u8; 4];
        assert_eq!(ack.encode(&mut buf), Ok(4));
        assert_eq!(buf, [first, 2, 0x00, 0x07]);
    }
}

#[test]
fn test_encode_unsuback() {
    let ack = Ack::unsuback(42);

    let mut buf = [0u8; 1];
    assert_eq!(ack.encode(&mut buf), Err(Error::BufferTooShort));
    assert_eq!(buf, [0]);

    let mut buf = [0u8; 4];
    assert_eq!(ack.encode(&mut buf), Ok(4));
    assert_eq!(buf, [0xB0, 0x02, 0x00, 0x2A]);
}

#[test]
fn test_encode_subscribe() {
    let mut packet = Subscribe::<2>::new(10);
    packet.push(s("a/b"), QoS::Level1).unwrap();
    packet.push(s("c"), QoS::Level0).unwrap();
    assert_eq!(packet.push(s("d"), QoS::Level0), Err(Error::TooManyFilters));
    assert_encode(Packet::Subscribe(packet.clone()), 14);

    let mut buf = [0u8; 14];
    packet.encode(&mut buf).unwrap();
    assert_eq!(
        buf,
        [
            0b10000010, 12, 0x00, 0x0a, // pid = 10
            0x00, 0x03, b'a', b'/', b'b', 0x01, // a/b at qos 1
            0x00, 0x01, b'c', 0x00, // c at qos 0
        ]
    );
}

#[test]
fn test_encode_suback() {
    let mut packet = Suback::<4>::new(10);
    packet.push(SubscribeReturnCode::MaxLevel1).unwrap();
    packet.push(QoS::Level2.into()).unwrap();
    packet.push(SubscribeReturnCode::Failure).unwrap();
    assert_encode(Packet::Suback(packet.clone()), 7);

    let mut buf = [0u8; 7];
    packet.encode(&mut buf).unwrap();
    assert_eq!(buf, [0b10010000, 5, 0x00, 0x0a, 0x01, 0x02, 0x80]);
}

#[test]
fn test_encode_unsubscribe() {
    let mut packet = Unsubscribe::<2>::new(11);
    packet.push(s("a")).unwrap();
    packet.push(s("b")).unwrap();
    assert_eq!(packet.push(s("c")), Err(Error::TooManyFilters));
    assert_encode(Packet::Unsubscribe(packet.clone()), 10);

    let mut buf = [0u8; 10];
    packet.encode(&mut buf).unwrap();
    assert_eq!(
        buf,
        [0b10100010, 8, 0x00, 0x0b, 0x00, 0x01, b'a', 0x00, 0x01, b'b']
    );
}

#[test]
fn test_encode_empty_packets() {
    assert_encode::<1>(Packet::Pingreq, 2);
    assert_encode::<1>(Packet::Pingresp, 2);
    assert_encode::<1>(Packet::Disconnect, 2);

    let mut buf = [0u8; 2];
    Pingreq.encode(&mut buf).unwrap();
    assert_eq!(buf, [0b11000000, 0]);
    Pingresp.encode(&mut buf).unwrap();
    assert_eq!(buf, [0b11010000, 0]);
    Disconnect.encode(&mut buf).unwrap();
    assert_eq!(buf, [0b11100000, 0]);

    let mut buf = [0u8; 1];
    assert_eq!(Pingreq.encode(&mut buf), Err(Error::BufferTooShort));
}

proptest! {
    #[test]
    fn ack_round_trip(pid in any::<u16>(), which in 0usize..5) {
        let typ = [
            PacketType::Puback,
            PacketType::Pubrec,
            PacketType::Pubrel,
            PacketType::Pubcomp,
            PacketType::Unsuback,
        ][which];
        let ack = Ack::new(typ, pid);
        let mut buf = [0u8; 4];
        prop_assert_eq!(ack.encode(&mut buf), Ok(4));
        prop_assert_eq!(Ack::decode(&buf, typ), Ok(ack));
    }

    #[test]
    fn publish_round_trip(
        topic in "[a-z/]{0,16}",
        payload in prop::collection::vec(any::<u8>(), 0..300),
        qos in 0u8..3,
        pid in any::<u16>(),
        retain in any::<bool>(),
    ) {
        let mut packet = Publish::new(
            QosPid::new(QoS::from_u8(qos).unwrap(), pid),
            s(&topic),
            &payload,
        );
        packet.retain = retain;
        let mut buf = [0u8; 512];
        let len = packet.encode(&mut buf).unwrap();
        prop_assert_eq!(Ok(len), packet.encode_len());
        prop_assert_eq!(Publish::decode(&buf[..len]), Ok(packet));
    }
}
