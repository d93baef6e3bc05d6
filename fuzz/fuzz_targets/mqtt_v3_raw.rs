#![no_main]

use libfuzzer_sys::fuzz_target;

use mqtt_wire::v3::Packet;
use mqtt_wire::Encodable;

fuzz_target!(|data: &[u8]| {
    if let Ok(pkt) = Packet::<8>::decode(data) {
        // whatever decodes must encode to no more than it consumed
        let mut buf = vec![0u8; data.len()];
        let len = pkt.encode(&mut buf).unwrap();
        assert_eq!(Packet::<8>::decode(&buf[..len]).unwrap(), pkt);
    }
});
