//! Partial updates of a book through JSON-Patch style operations.
//!
//! Operations are applied one after another to a [`BookPatch`]. A failing
//! operation is recorded and skipped so the caller gets every problem at once.
//! The patched document is validated exactly once, after the last operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{field_errors, FieldError},
    models::BookPatch,
};

/// One step of a patch document (RFC 6902 operation set)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add {
        path: String,
        #[schema(value_type = Object)]
        value: Value,
    },
    Remove {
        path: String,
    },
    Replace {
        path: String,
        #[schema(value_type = Object)]
        value: Value,
    },
    Move {
        from: String,
        path: String,
    },
    Copy {
        from: String,
        path: String,
    },
    Test {
        path: String,
        #[schema(value_type = Object)]
        value: Value,
    },
}

/// Addressable members of [`BookPatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatchField {
    Title,
    PublicationDate,
}

impl PatchField {
    fn parse(path: &str) -> Result<Self, FieldError> {
        let segment = path.strip_prefix('/').unwrap_or(path);
        match segment.to_ascii_lowercase().as_str() {
            "title" => Ok(PatchField::Title),
            "publication_date" | "publicationdate" => Ok(PatchField::PublicationDate),
            _ => Err(FieldError::new(
                path,
                format!("The target location specified by path segment '{}' was not found", segment),
            )),
        }
    }

    fn name(self) -> &'static str {
        match self {
            PatchField::Title => "title",
            PatchField::PublicationDate => "publication_date",
        }
    }
}

impl BookPatch {
    fn get(&self, field: PatchField) -> Value {
        match field {
            PatchField::Title => serde_json::to_value(&self.title),
            PatchField::PublicationDate => serde_json::to_value(self.publication_date),
        }
        .unwrap_or(Value::Null)
    }

    fn set(&mut self, field: PatchField, value: Value) -> Result<(), FieldError> {
        let invalid = |e: serde_json::Error| {
            FieldError::new(field.name(), format!("The value is not valid for this field: {}", e))
        };
        match field {
            PatchField::Title => self.title = serde_json::from_value(value).map_err(invalid)?,
            PatchField::PublicationDate => {
                self.publication_date = serde_json::from_value(value).map_err(invalid)?
            }
        }
        Ok(())
    }
}

/// Apply `ops` in sequence, then validate the resulting document.
///
/// The title is trimmed before validation, so a blank title is rejected.
/// Returns every operation failure followed by every validation failure;
/// an empty list means `doc` is ready to be written back.
pub fn apply(doc: &mut BookPatch, ops: &[PatchOperation]) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = ops
        .iter()
        .filter_map(|op| apply_one(doc, op).err())
        .collect();

    if let Some(title) = doc.title.as_mut() {
        *title = title.trim().to_string();
    }
    if let Err(e) = doc.validate() {
        errors.extend(field_errors(&e));
    }
    errors
}

fn apply_one(doc: &mut BookPatch, op: &PatchOperation) -> Result<(), FieldError> {
    match op {
        PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
            doc.set(PatchField::parse(path)?, value.clone())
        }
        PatchOperation::Remove { path } => doc.set(PatchField::parse(path)?, Value::Null),
        PatchOperation::Move { from, path } => {
            let (src, dst) = (PatchField::parse(from)?, PatchField::parse(path)?);
            if src == dst {
                return Ok(());
            }
            let value = doc.get(src);
            doc.set(dst, value)?;
            doc.set(src, Value::Null)
        }
        PatchOperation::Copy { from, path } => {
            let (src, dst) = (PatchField::parse(from)?, PatchField::parse(path)?);
            let value = doc.get(src);
            doc.set(dst, value)
        }
        PatchOperation::Test { path, value } => {
            let field = PatchField::parse(path)?;
            if doc.get(field) == *value {
                Ok(())
            } else {
                Err(FieldError::new(
                    field.name(),
                    format!("The current value does not match the test value {}", value),
                ))
            }
        }
    }
}
