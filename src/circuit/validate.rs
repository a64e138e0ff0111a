//! Circuit validation.

use std::collections::HashSet;

use crate::components::{Component, ComponentKind};
use crate::error::{ResistoError, Result};

/// Validate a component list before it enters a session.
///
/// Checks:
/// - No duplicate component ids
/// - Every value is a positive, finite number
/// - Every position is finite
///
/// Topology problems (multiple sources, unwired resistors, ...) are not
/// checked here; the classifier reports them as circuit states.
pub fn validate_components(components: &[Component]) -> Result<()> {
    let mut seen = HashSet::with_capacity(components.len());

    for component in components {
        if !seen.insert(&component.id) {
            return Err(ResistoError::DuplicateComponent {
                id: component.id.to_string(),
            });
        }

        validate_value(component, component.value)?;

        let position = component.position;
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(ResistoError::InvalidPosition {
                id: component.id.to_string(),
                x: position.x,
                y: position.y,
            });
        }
    }

    Ok(())
}

fn is_valid_value(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Check that `value` is acceptable for `component`'s kind.
pub fn validate_value(component: &Component, value: f64) -> Result<()> {
    if !is_valid_value(value) {
        return Err(ResistoError::invalid_value(
            component.id.as_str(),
            value,
            format!("{} must be positive and finite", component.kind.label().to_lowercase()),
        ));
    }
    Ok(())
}

/// Check a value for a component of `kind` before it has an id.
pub fn validate_kind_value(kind: ComponentKind, value: f64) -> Result<()> {
    if !is_valid_value(value) {
        return Err(ResistoError::InvalidKindValue {
            kind: kind.label(),
            value,
        });
    }
    Ok(())
}
