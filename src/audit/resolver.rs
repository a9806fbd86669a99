use serde_json::Value;

use crate::audit::entity::Model;
use crate::audit::error::ResolutionError;
use crate::audit::options::AuditOptions;

/// Resolves audited values and labels through a type's "columns mean" and
/// "columns formatted" mappings. Read-only over every model it touches.
pub struct ValueResolver<'a> {
    options: &'a AuditOptions,
}

impl<'a> ValueResolver<'a> {
    pub fn new(options: &'a AuditOptions) -> Self {
        Self { options }
    }

    /// Human label for `column`, or the column key itself.
    pub fn label<'c>(&'c self, column: &'c str) -> &'c str {
        self.options
            .formatted
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }

    /// The value `raw` means for `column` on `owner`.
    ///
    /// Without a means path the raw value is returned unchanged. With one,
    /// every segment but the last follows a relation; the last segment is
    /// run through the target's display transform if it declares one,
    /// otherwise the target's own attribute is returned.
    pub fn resolve(
        &self,
        column: &str,
        owner: &dyn Model,
        raw: Value,
    ) -> Result<Value, ResolutionError> {
        match self.options.means.get(column) {
            Some(path) => follow_path(column, path, owner, raw),
            None => Ok(raw),
        }
    }
}

fn follow_path(
    column: &str,
    path: &str,
    owner: &dyn Model,
    raw: Value,
) -> Result<Value, ResolutionError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ResolutionError::InvalidPath {
            column: column.to_string(),
            path: path.to_string(),
        });
    }

    let Some((last, relations)) = segments.split_last() else {
        return Err(ResolutionError::InvalidPath {
            column: column.to_string(),
            path: path.to_string(),
        });
    };

    let mut target = owner;
    for segment in relations {
        target = target
            .relation(segment)
            .ok_or_else(|| ResolutionError::MissingRelation {
                path: path.to_string(),
                segment: (*segment).to_string(),
            })?;
    }

    if let Some(transform) = target.display_transform(last) {
        return Ok(transform.apply(&raw));
    }

    target
        .attribute(last)
        .ok_or_else(|| ResolutionError::MissingAttribute {
            path: path.to_string(),
            segment: (*last).to_string(),
        })
}
