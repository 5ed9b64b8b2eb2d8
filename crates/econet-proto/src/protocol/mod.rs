//! Protocol module containing message types, settings resources and the JSON codec.

pub mod codec;
pub mod messages;
pub mod sequence;
pub mod settings;
pub mod stats;

pub use codec::{decode_request, decode_server_message, encode_message, ProtocolError};
pub use messages::*;
pub use sequence::RequestIdCounter;
pub use settings::*;
pub use stats::*;
