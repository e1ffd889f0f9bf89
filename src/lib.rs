//! OBD-II diagnostic schema compiler, expression engine, and CAN codec.
//!
//! Load a schema with [`Context::compile`], then use the returned, frozen
//! `Context` to build query/response frames and decode payloads into SI
//! values. See [`frame`] for the stateless `_noctx` variants, used when no
//! schema is loaded.

pub mod config;
pub mod context;
pub mod error;
pub mod expr;
pub mod frame;
pub mod schema;
pub mod types;
pub mod units;

pub use context::{Context, PidDescriptor, PidEval, PidRecord};
pub use error::{CodecError, Error, ErrorCode, SchemaError};
pub use frame::Frame;
pub use types::{Mode, Pid};
