//! Codec for MQTT [v3.1.1] and [v3.1]
//!
//! [v3.1.1]: http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html
//! [v3.1]: https://public.dhe.ibm.com/software/dw/webservices/ws-mqtt/mqtt-v3r1.html

mod ack;
mod connect;
mod packet;
mod publish;
mod subscribe;

#[cfg(test)]
mod tests;

pub use ack::Ack;
pub use connect::{Connack, Connect, ConnectReturnCode, LastWill, Protocol};
pub use packet::{Disconnect, Header, Packet, PacketType, Pingreq, Pingresp};
pub use publish::Publish;
pub use subscribe::{Suback, Subscribe, SubscribeReturnCode, Unsubscribe};
