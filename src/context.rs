//! Owner of the compiled (mode, PID) table (§4.6) and the public handle
//! most callers use.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::Path;

use log::{debug, trace};

use crate::error::{CodecError, Error};
use crate::expr::{eval, Expression};
use crate::frame::{self, Frame};
use crate::schema;
use crate::types::{Mode, Pid, PidDataType, UnitId};

/// How a PID's raw value is produced from its payload bytes.
#[derive(Debug, Clone)]
pub enum PidEval {
    Expression(Expression),
    Passthrough,
}

/// Everything the context knows about one (mode, PID) pair.
#[derive(Debug, Clone)]
pub struct PidRecord {
    pub name: String,
    pub can_bytes: u8,
    pub pid_data_type: PidDataType,
    pub unit_id: UnitId,
    pub convert: fn(f32) -> f32,
    pub eval: PidEval,
}

/// Public, read-only view of a compiled PID. An alias rather than a
/// separate type: callers only ever see `&PidDescriptor` borrowed from a
/// `Context`, never an owned copy.
pub type PidDescriptor = PidRecord;

fn key(mode: Mode, pid: Pid) -> u32 {
    (u32::from(mode) << 16) | u32::from(pid)
}

/// The compiled, immutable (mode, PID) → descriptor table. Built once by
/// [`Context::compile`], then frozen: every field is read-only afterward, so
/// a `Context` is `Send + Sync` and safe to share behind an `Arc` across
/// threads.
#[derive(Debug)]
pub struct Context {
    big_endian: bool,
    pids: HashMap<u32, PidRecord>,
    unit_names: Vec<String>,
}

impl Context {
    pub(crate) fn from_parts(
        big_endian: bool,
        pids: HashMap<u32, PidRecord>,
        unit_names: Vec<String>,
    ) -> Self {
        Self {
            big_endian,
            pids,
            unit_names,
        }
    }

    /// Compiles a schema file into a `Context`. `path` is used as-is if it
    /// contains a path separator; otherwise it is resolved against
    /// [`crate::config::DEFAULT_SCHEMA_DIR`].
    pub fn compile<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        debug!("compiling schema {}", path.as_ref().display());
        let ctx = schema::compile(path.as_ref())?;
        debug!("compiled schema with {} pids", ctx.pid_count());
        Ok(ctx)
    }

    /// `true` if multi-byte PIDs and payloads are big-endian on the wire.
    #[must_use]
    pub fn big_endian(&self) -> bool {
        self.big_endian
    }

    /// Number of distinct (mode, PID) pairs in this context.
    #[must_use]
    pub fn pid_count(&self) -> usize {
        self.pids.len()
    }

    /// Name interned for a unit id, if any.
    #[must_use]
    pub fn unit_name(&self, unit_id: UnitId) -> Option<&str> {
        self.unit_names.get(unit_id as usize).map(String::as_str)
    }

    /// Looks up the descriptor for `(mode, pid)`.
    pub fn descriptor(&self, mode: Mode, pid: Pid) -> Result<&PidDescriptor, Error> {
        self.pids
            .get(&key(mode, pid))
            .ok_or_else(|| CodecError::UnknownModePid { mode, pid: u32::from(pid) }.into())
    }

    /// Visits every (mode, PID, descriptor) triple in unspecified order.
    /// Returning `ControlFlow::Break(())` from `f` stops iteration early.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Mode, Pid, &PidDescriptor) -> ControlFlow<()>,
    {
        for (&packed, record) in &self.pids {
            let mode = (packed >> 16) as Mode;
            let pid = packed as Pid;
            if f(mode, pid, record).is_break() {
                break;
            }
        }
    }

    /// Builds a query frame for `(mode, pid)`.
    pub fn make_query(&self, mode: Mode, pid: Pid) -> Result<Frame, Error> {
        Ok(frame::make_query_noctx(self.big_endian, mode, pid)?)
    }

    /// Builds a response frame for `(mode, pid)` carrying `payload`.
    pub fn make_response(&self, mode: Mode, pid: Pid, payload: &[u8]) -> Result<Frame, Error> {
        Ok(frame::make_response_noctx(self.big_endian, mode, pid, payload)?)
    }

    /// Parses and validates a frame's header, returning its `(mode, pid)`.
    pub fn parse_headers(&self, frame: &Frame) -> Result<(Mode, Pid), Error> {
        Ok(frame::parse_headers_noctx(frame, self.big_endian)?)
    }

    /// Parses a response frame end to end: validates the header, looks up
    /// the PID descriptor, evaluates its expression (or passthrough) over
    /// the payload, and converts the result to SI units.
    pub fn parse_response(&self, frame: &Frame) -> Result<f32, Error> {
        trace!("parse_response(id=0x{:x})", frame.id);
        let (mode, pid) = self.parse_headers(frame)?;
        let record = self.descriptor(mode, pid)?;

        let expected = frame::expected_pci_len(mode, record.can_bytes);
        if frame.data[0] != expected {
            return Err(CodecError::InvalidDataBytes {
                expected,
                found: frame.data[0],
            }
            .into());
        }

        let payload = frame::response_payload(frame, mode);
        let raw = match &record.eval {
            PidEval::Expression(expr) => eval::evaluate(expr, payload)?,
            PidEval::Passthrough => eval::evaluate_passthrough(
                payload,
                record.can_bytes,
                record.pid_data_type,
                self.big_endian,
            )?,
        };

        Ok((record.convert)(raw))
    }
}
