//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Length-Prefixed JSON)
//!
//! ### Frame Format
//! ```text
//! ┌──────────┬─────────────────────────────────────────┐
//! │ Len (4)  │         Payload (UTF-8 JSON)            │
//! └──────────┴─────────────────────────────────────────┘
//! ```
//! `Len` is big-endian and counts payload bytes only.
//!
//! ### Requests
//! A JSON object tagged by `"op"`:
//! - `list`   - `{namespace?, keyword?}`
//! - `query`  - `{namespace?, key?, keys?}`
//! - `create` - `{namespace?, key?, value?, type?, description?, parameters?}`
//! - `update` - `{namespace?, key?, value?, description?, parameters?}`
//! - `delete` - `{namespace?, key?, keys?, parameters?}`
//! - `batch`  - `{operations: [{action, namespace?, key?, value?, type?, description?}]}`
//! - `stats`, `ping`
//!
//! ### Response
//! One envelope for every request:
//! `{success, message?, data?, dataList, total, limit?, failures?}`

mod request;
mod response;
mod codec;

pub use request::{OperationItem, ParameterItem, Request};
pub use response::Response;
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, read_request,
    read_response, write_request, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
