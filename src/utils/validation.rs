use crate::domain::model::{Adjuster, Adjustments};
use crate::utils::error::{FixerError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FixerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FixerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(FixerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FixerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// A node is a single directory name under the user preference root.
pub fn validate_node_name(field_name: &str, node: &str) -> Result<()> {
    validate_non_empty_string(field_name, node)?;
    if node.contains(['/', '\\', '\0']) || node == "." || node == ".." {
        return Err(FixerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: node.to_string(),
            reason: "Node name must be a single path component".to_string(),
        });
    }
    Ok(())
}

fn validate_adjuster(list: &str, index: usize, adjuster: &Adjuster) -> Result<()> {
    if adjuster.id.trim().is_empty() {
        return Err(FixerError::ValidationError {
            message: format!("{}[{}] has an empty id", list, index),
        });
    }

    if let Some(allowed) = adjuster.allowed_error {
        if !allowed.is_finite() || allowed < 0.0 {
            return Err(FixerError::ValidationError {
                message: format!(
                    "{}[{}] ('{}') has allowedError {}, expected a finite value >= 0",
                    list, index, adjuster.id, allowed
                ),
            });
        }
    }
    Ok(())
}

fn validate_list(list: &str, adjusters: &[Adjuster]) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, adjuster) in adjusters.iter().enumerate() {
        validate_adjuster(list, index, adjuster)?;
        if !seen.insert(adjuster.id.as_str()) {
            tracing::warn!("⚠️ '{}' appears more than once in {}", adjuster.id, list);
        }
    }
    Ok(())
}

impl Validate for Adjustments {
    fn validate(&self) -> Result<()> {
        validate_list("breaking", &self.breaking)?;
        validate_list("recommend", &self.recommend)?;
        Ok(())
    }
}
