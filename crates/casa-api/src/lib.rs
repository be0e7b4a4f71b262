// casa-api: Socket.IO wire client for the smart home remote-control server

pub mod error;
pub mod event;
pub mod protocol;
pub mod socket;

pub use error::Error;
pub use event::{ClientEvent, DeviceChange, ServerEvent};
pub use socket::{Emitter, ReconnectConfig, SocketEvent, SocketHandle, engine_url};
