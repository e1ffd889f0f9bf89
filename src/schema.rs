//! Schema compiler (§4.4): turns a YAML document tree into a [`Context`].
//!
//! The document is walked as a raw [`serde_yaml::Value`] rather than
//! deserialized directly into one big struct, because mode and PID keys can
//! be written as either YAML integers or `0x`-prefixed strings and need
//! `strtol`-style parsing either way.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;
use serde_yaml::Value;

use crate::config::DEFAULT_SCHEMA_DIR;
use crate::context::{Context, PidEval, PidRecord};
use crate::error::{Error, SchemaError};
use crate::expr::compile::compile as compile_expr;
use crate::types::{is_sae_standard, Mode, Pid, PidDataType};
use crate::units;

#[derive(Debug, Deserialize)]
struct ExprBlock {
    #[serde(rename = "type")]
    ty: String,
    val: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PidBlock {
    name: String,
    bytes: u8,
    #[serde(rename = "raw-unit")]
    raw_unit: String,
    #[serde(rename = "si-unit")]
    si_unit: String,
    #[serde(default)]
    expr: Option<ExprBlock>,
}

/// Resolves a caller-supplied schema path: used as-is if it contains a path
/// separator, otherwise joined onto [`DEFAULT_SCHEMA_DIR`].
fn resolve_path(path: &Path) -> Result<PathBuf, SchemaError> {
    if path.as_os_str().is_empty() {
        return Err(SchemaError::InvalidPath);
    }
    let has_sep = path
        .to_str()
        .is_some_and(|s| s.contains('/') || s.contains('\\'));
    if has_sep {
        Ok(path.to_path_buf())
    } else {
        Ok(Path::new(DEFAULT_SCHEMA_DIR).join(path))
    }
}

/// Parses a mode/PID key the way the original schema format does:
/// `strtol(val, NULL, 0)` semantics, accepting a bare decimal number or a
/// YAML integer, or a string carrying a `0x`/`0X` prefix for hex.
fn parse_numeric_key(value: &Value, what: &str) -> Result<u32, SchemaError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|v| v as u32)
            .ok_or_else(|| SchemaError::InvalidParameter(format!("{what} out of range"))),
        Value::String(s) => {
            let trimmed = s.trim();
            let hex = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"));
            let parsed = match hex {
                Some(digits) => u32::from_str_radix(digits, 16),
                None => trimmed.parse::<u32>(),
            };
            parsed.map_err(|_| SchemaError::InvalidParameter(format!("invalid {what} `{s}`")))
        }
        other => Err(SchemaError::InvalidParameter(format!(
            "{what} must be a number or string, got {other:?}"
        ))),
    }
}

fn data_type_for_block(block: &PidBlock) -> Result<PidDataType, SchemaError> {
    match &block.expr {
        Some(expr_block) => PidDataType::from_schema_name(&expr_block.ty)
            .ok_or_else(|| SchemaError::ParseFail(format!("unknown expr type `{}`", expr_block.ty))),
        None => match block.bytes {
            1 => Ok(PidDataType::U8),
            2 => Ok(PidDataType::U16),
            3 | 4 => Ok(PidDataType::U32),
            other => Err(SchemaError::InvalidParameter(format!(
                "bytes must be 1..=4, got {other}"
            ))),
        },
    }
}

/// Compiles the schema file at `path` into a [`Context`].
pub(crate) fn compile(path: &Path) -> Result<Context, Error> {
    let resolved = resolve_path(path)?;
    let text = fs::read_to_string(&resolved)
        .map_err(|_| SchemaError::CannotOpenFile(resolved.display().to_string()))?;

    let doc: Value = serde_yaml::from_str(&text).map_err(|e| SchemaError::ParseFail(e.to_string()))?;
    let mapping = doc
        .as_mapping()
        .ok_or_else(|| SchemaError::ParseFail("schema root must be a mapping".to_string()))?;

    let endian_str = mapping
        .get("endian")
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::ParseFail("missing or non-string `endian` key".to_string()))?;
    let big_endian = match endian_str {
        "big" => true,
        "little" => false,
        other => return Err(SchemaError::ParseFail(format!("unknown endian `{other}`")).into()),
    };

    let modepid = mapping
        .get("modepid")
        .and_then(Value::as_mapping)
        .ok_or_else(|| SchemaError::ParseFail("missing `modepid` mapping".to_string()))?;

    let mut pids: HashMap<u32, PidRecord> = HashMap::new();
    let mut unit_names: Vec<String> = Vec::new();
    let mut unit_ids: HashMap<String, u16> = HashMap::new();

    for (mode_key, pid_map_value) in modepid {
        let mode_num = parse_numeric_key(mode_key, "mode")?;
        let mode: Mode = mode_num as Mode;

        let pid_map = pid_map_value
            .as_mapping()
            .ok_or_else(|| SchemaError::ParseFail(format!("mode 0x{mode_num:x} must map to a mapping")))?;

        for (pid_key, pid_block_value) in pid_map {
            let pid_num = parse_numeric_key(pid_key, "pid")?;

            if is_sae_standard(mode) && pid_num > 0xFF {
                warn!("rejecting pid 0x{pid_num:x} for sae-standard mode 0x{mode:x}");
                return Err(SchemaError::InvalidPid { mode, pid: pid_num }.into());
            }
            let pid: Pid = pid_num as Pid;

            let block: PidBlock = serde_yaml::from_value(pid_block_value.clone()).map_err(|e| {
                SchemaError::ParseFail(format!("pid (0x{mode:x}, 0x{pid_num:x}): {e}"))
            })?;

            let pid_data_type = data_type_for_block(&block)?;
            if !pid_data_type.allowed_can_bytes().contains(&block.bytes) {
                warn!(
                    "rejecting pid (0x{mode:x}, 0x{pid_num:x}): {pid_data_type:?} does not accept bytes={}",
                    block.bytes
                );
                return Err(SchemaError::InvalidParameter(format!(
                    "{pid_data_type:?} does not accept bytes={}",
                    block.bytes
                ))
                .into());
            }

            let convert = units::lookup(&block.raw_unit)
                .ok_or_else(|| SchemaError::UnknownUnit(block.raw_unit.clone()))?;

            let unit_id = *unit_ids.entry(block.si_unit.clone()).or_insert_with(|| {
                unit_names.push(block.si_unit.clone());
                (unit_names.len() - 1) as u16
            });

            let eval = match &block.expr {
                Some(expr_block) => {
                    PidEval::Expression(compile_expr(&expr_block.val, pid_data_type.domain())?)
                }
                None => PidEval::Passthrough,
            };

            let record = PidRecord {
                name: block.name,
                can_bytes: block.bytes,
                pid_data_type,
                unit_id,
                convert,
                eval,
            };

            pids.insert((u32::from(mode) << 16) | u32::from(pid), record);
        }
    }

    pids.shrink_to_fit();
    unit_names.shrink_to_fit();

    Ok(Context::from_parts(big_endian, pids, unit_names))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_str(yaml: &str) -> Result<Context, Error> {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "obdcodec-schema-test-{}-{}.yaml",
            std::process::id(),
            yaml.len()
        ));
        fs::write(&path, yaml).unwrap();
        let result = compile(&path);
        let _ = fs::remove_file(&path);
        result
    }

    #[test]
    fn rejects_unknown_key() {
        let yaml = r#"
endian: little
modepid:
  0x01:
    0x0d:
      name: Vehicle Speed
      bytes: 1
      raw-unit: km/h
      si-unit: m/s
      bogus: true
"#;
        assert!(compile_str(yaml).is_err());
    }

    #[test]
    fn rejects_unknown_unit() {
        let yaml = r#"
endian: little
modepid:
  0x01:
    0x0d:
      name: Vehicle Speed
      bytes: 1
      raw-unit: furlongs-per-fortnight
      si-unit: m/s
"#;
        assert!(compile_str(yaml).is_err());
    }

    #[test]
    fn rejects_byte_domain_mismatch() {
        let yaml = r#"
endian: little
modepid:
  0x01:
    0x0c:
      name: Engine RPM
      bytes: 2
      raw-unit: rpm
      si-unit: rad/s
      expr: { type: uint8, val: "A" }
"#;
        assert!(compile_str(yaml).is_err());
    }

    #[test]
    fn rejects_standard_mode_pid_out_of_range() {
        let yaml = r#"
endian: little
modepid:
  0x01:
    0x100:
      name: Bogus
      bytes: 1
      raw-unit: percent
      si-unit: percent
"#;
        assert!(compile_str(yaml).is_err());
    }

    #[test]
    fn passthrough_when_no_expr() {
        let yaml = r#"
endian: little
modepid:
  0x01:
    0x0d:
      name: Vehicle Speed
      bytes: 1
      raw-unit: km/h
      si-unit: m/s
"#;
        let ctx = compile_str(yaml).unwrap();
        assert_eq!(ctx.pid_count(), 1);
    }

    #[test]
    fn hex_and_decimal_keys_both_accepted() {
        let yaml = r#"
endian: little
modepid:
  1:
    "0x0d":
      name: Vehicle Speed
      bytes: 1
      raw-unit: km/h
      si-unit: m/s
"#;
        let ctx = compile_str(yaml).unwrap();
        assert!(ctx.descriptor(1, 0x0d).is_ok());
    }
}
