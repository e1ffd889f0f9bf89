//! Shared scalar types used across the schema compiler, expression engine,
//! and CAN codec.

/// OBD-II service identifier. Modes `<= 0x0A` are SAE-standard and always
/// carry a one-byte PID; all other modes are extended and carry a two-byte
/// PID.
pub type Mode = u8;

/// OBD-II parameter identifier.
pub type Pid = u16;

/// Interned index into a [`crate::context::Context`]'s SI-unit name table.
pub type UnitId = u16;

/// Largest mode value that still uses SAE-standard (one-byte PID) addressing.
pub const SAE_STANDARD_MAX_MODE: Mode = 0x0A;

/// Returns `true` if `mode` uses one-byte SAE-standard PID addressing.
#[must_use]
pub const fn is_sae_standard(mode: Mode) -> bool {
    mode <= SAE_STANDARD_MAX_MODE
}

/// One of the four byte variables an expression may reference, corresponding
/// to `data[0..4]` of the payload window handed to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteVar {
    A,
    B,
    C,
    D,
}

impl ByteVar {
    /// Index of this variable into the payload window.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            ByteVar::A => 0,
            ByteVar::B => 1,
            ByteVar::C => 2,
            ByteVar::D => 3,
        }
    }
}

/// Arithmetic operator recognized by the expression compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// `true` for `Mul`/`Div`, the higher-precedence class.
    #[must_use]
    pub const fn is_high_precedence(self) -> bool {
        matches!(self, Operator::Mul | Operator::Div)
    }
}

/// Numeric domain an expression's tokens live in. A single expression never
/// mixes the two: the schema compiler picks one domain from the PID's
/// declared `expr.type` and every literal it emits shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericDomain {
    Int,
    Float,
}

/// The numeric representation of a PID's raw (pre-unit-conversion) value, as
/// declared by the schema's `expr.type` field (or implied by `bytes` when no
/// `expr` is given, in which case it is always interpreted as unsigned).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidDataType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    Float,
}

impl PidDataType {
    /// The numeric domain used by a compiled expression of this type.
    #[must_use]
    pub const fn domain(self) -> NumericDomain {
        match self {
            PidDataType::Float => NumericDomain::Float,
            _ => NumericDomain::Int,
        }
    }

    /// Byte widths this data type accepts for `bytes` in the schema, per the
    /// cross-field validation rules.
    #[must_use]
    pub const fn allowed_can_bytes(self) -> &'static [u8] {
        match self {
            PidDataType::U8 | PidDataType::I8 => &[1],
            PidDataType::U16 | PidDataType::I16 => &[1, 2],
            PidDataType::U32 | PidDataType::I32 => &[1, 2, 3, 4],
            PidDataType::Float => &[4],
        }
    }

    /// Parses the `expr.type` schema string.
    #[must_use]
    pub fn from_schema_name(name: &str) -> Option<Self> {
        Some(match name {
            "uint8" => PidDataType::U8,
            "int8" => PidDataType::I8,
            "uint16" => PidDataType::U16,
            "int16" => PidDataType::I16,
            "uint32" => PidDataType::U32,
            "int32" => PidDataType::I32,
            "float" => PidDataType::Float,
            _ => return None,
        })
    }
}
