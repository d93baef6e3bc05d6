#![no_main]

use libfuzzer_sys::fuzz_target;

use mqtt_wire::v3::Publish;
use mqtt_wire::{Encodable, Error};

fuzz_target!(|pkt: Publish| {
    let mut data = vec![0u8; pkt.encode_len().unwrap()];
    let len = pkt.encode(&mut data).unwrap();
    assert_eq!(len, data.len());
    assert_eq!(Publish::decode(&data), Ok(pkt));

    if len > 0 {
        assert_eq!(pkt.encode(&mut data[..len - 1]), Err(Error::BufferTooShort));
    }
});
