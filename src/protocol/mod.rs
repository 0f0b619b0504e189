//! Protocol Module
//!
//! Defines the boundary between this layer and the engine.
//!
//! ## Outbound Requests
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Type (1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Request Types
//! - 0x01: SET_OPTION      - scope, option code, optional option bytes
//! - 0x02: ATOMIC_OP       - opcode, key, optional versionstamp offset, param
//! - 0x03: CONFLICT_RANGE  - kind, begin, end
//! - 0x04: RANGE_READ      - streaming mode, limit, flags, begin, end
//! - 0x05: COMMIT          - empty
//!
//! ### Inbound Replies
//! - 0x00: OK    - presence byte, then the result bytes
//! - 0x01: ERROR - 4-byte engine error code

mod codec;
mod reply;
mod request;

pub use codec::{
    check_request_size, decode_reply, decode_request, encode_reply, encode_request, read_reply,
    read_request, write_reply, write_request, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use reply::{Reply, Status};
pub use request::{Request, RequestType};
