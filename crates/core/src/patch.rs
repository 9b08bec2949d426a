//! Partial-update engine for [`VillaDto`].
//!
//! A patch is an ordered list of JSON-Patch shaped records
//! (`{ "op", "path", "value", "from" }`). Only the flat top-level fields of
//! the DTO are addressable; array indices and nested pointers are rejected.
//! Paths are matched case-insensitively and `/sqft` is accepted for
//! `/squareFootage`.
//!
//! Every operation is attempted even after an earlier one fails, so the
//! caller gets the full list of problems in one response.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::villa::VillaDto;

/* --------------------------------------------------------------------------
   Wire types
   -------------------------------------------------------------------------- */

/// One field-level mutation instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Operation kind: `add`, `remove`, `replace`, `move`, `copy` or `test`.
    pub op: String,
    /// JSON pointer to the target field, e.g. `/occupancy`.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Source pointer for `move` and `copy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl PatchOperation {
    /// `replace` operation shorthand.
    pub fn replace(path: &str, value: Value) -> Self {
        Self {
            op: "replace".to_string(),
            path: path.to_string(),
            value: Some(value),
            from: None,
        }
    }
}

/// Recognised operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl PatchOpKind {
    fn parse(op: &str) -> Result<Self, String> {
        match op.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "replace" => Ok(Self::Replace),
            "move" => Ok(Self::Move),
            "copy" => Ok(Self::Copy),
            "test" => Ok(Self::Test),
            _ => Err(format!("unsupported operation '{op}'")),
        }
    }
}

/// A single failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchError {
    /// Zero-based position of the operation in the submitted list.
    pub index: usize,
    pub op: String,
    pub path: String,
    pub message: String,
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation {} ({} {}): {}",
            self.index, self.op, self.path, self.message
        )
    }
}

/* --------------------------------------------------------------------------
   Addressable fields
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Name,
    Occupancy,
    SquareFootage,
}

impl Field {
    fn parse(pointer: &str) -> Result<Self, String> {
        let Some(segment) = pointer.strip_prefix('/') else {
            return Err(format!("path '{pointer}' must start with '/'"));
        };
        if segment.is_empty() {
            return Err("whole-document operations are not supported".to_string());
        }
        if segment.contains('/') {
            return Err(format!("nested path '{pointer}' is not supported"));
        }

        match segment.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "occupancy" => Ok(Self::Occupancy),
            "squarefootage" | "sqft" => Ok(Self::SquareFootage),
            _ => Err(format!("unknown field '{segment}'")),
        }
    }

    fn get(self, dto: &VillaDto) -> Value {
        match self {
            Self::Id => Value::from(dto.id),
            Self::Name => Value::from(dto.name.clone()),
            Self::Occupancy => Value::from(dto.occupancy),
            Self::SquareFootage => Value::from(dto.square_footage),
        }
    }

    fn set(self, dto: &mut VillaDto, value: &Value) -> Result<(), String> {
        match self {
            Self::Id => {
                dto.id = value
                    .as_i64()
                    .ok_or_else(|| type_mismatch("id", "an integer", value))?;
            }
            Self::Name => {
                dto.name = value
                    .as_str()
                    .ok_or_else(|| type_mismatch("name", "a string", value))?
                    .to_string();
            }
            Self::Occupancy => dto.occupancy = as_i32("occupancy", value)?,
            Self::SquareFootage => dto.square_footage = as_i32("squareFootage", value)?,
        }
        Ok(())
    }

    /// Every DTO field is required, so removal resets to the type default.
    fn reset(self, dto: &mut VillaDto) {
        match self {
            Self::Id => dto.id = 0,
            Self::Name => dto.name.clear(),
            Self::Occupancy => dto.occupancy = 0,
            Self::SquareFootage => dto.square_footage = 0,
        }
    }
}

fn type_mismatch(field: &str, expected: &str, value: &Value) -> String {
    format!("field '{field}' expects {expected}, got {value}")
}

fn as_i32(field: &str, value: &Value) -> Result<i32, String> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| type_mismatch(field, "a 32-bit integer", value))
}

/* --------------------------------------------------------------------------
   Engine
   -------------------------------------------------------------------------- */

/// Apply `operations` in order to a copy of `dto`.
///
/// Returns the patched copy only if every operation succeeded; otherwise
/// returns one [`PatchError`] per failed operation. `dto` itself is never
/// touched.
pub fn apply_patch(
    dto: &VillaDto,
    operations: &[PatchOperation],
) -> Result<VillaDto, Vec<PatchError>> {
    let mut staged = dto.clone();
    let mut errors = Vec::new();

    for (index, operation) in operations.iter().enumerate() {
        if let Err(message) = apply_one(&mut staged, operation) {
            errors.push(PatchError {
                index,
                op: operation.op.clone(),
                path: operation.path.clone(),
                message,
            });
        }
    }

    if errors.is_empty() {
        Ok(staged)
    } else {
        Err(errors)
    }
}

fn apply_one(dto: &mut VillaDto, operation: &PatchOperation) -> Result<(), String> {
    let kind = PatchOpKind::parse(&operation.op)?;
    let target = Field::parse(&operation.path)?;

    match kind {
        PatchOpKind::Add | PatchOpKind::Replace => {
            let value = required_value(operation)?;
            target.set(dto, value)
        }
        PatchOpKind::Remove => {
            target.reset(dto);
            Ok(())
        }
        PatchOpKind::Copy | PatchOpKind::Move => {
            let source = Field::parse(required_from(operation)?)?;
            if source == target {
                return Ok(());
            }
            let value = source.get(dto);
            target.set(dto, &value)?;
            if kind == PatchOpKind::Move {
                source.reset(dto);
            }
            Ok(())
        }
        PatchOpKind::Test => {
            let expected = required_value(operation)?;
            let actual = target.get(dto);
            if &actual == expected {
                Ok(())
            } else {
                Err(format!("test failed: expected {expected}, found {actual}"))
            }
        }
    }
}

fn required_value(operation: &PatchOperation) -> Result<&Value, String> {
    operation
        .value
        .as_ref()
        .ok_or_else(|| format!("'{}' requires a value", operation.op))
}

fn required_from(operation: &PatchOperation) -> Result<&str, String> {
    operation
        .from
        .as_deref()
        .ok_or_else(|| format!("'{}' requires a 'from' path", operation.op))
}
