//! Protocol module containing message types, the binary codec, and the
//! custom-command JSON types.

pub mod codec;
pub mod custom;
pub mod messages;

pub use codec::{
    decode_config, decode_scan, decode_session, encode_config, encode_scan, encode_session,
    ProtocolError,
};
pub use custom::{CustomCommand, CustomCommandRequest, CustomCommandResponse, CustomStatus};
pub use messages::*;
