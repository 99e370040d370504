//! Action validation.
//!
//! [`validate_action`] checks an operator request against the current
//! state and the policy definition without touching either. A successful
//! check yields an [`ActionRequest`] with the normalised magnitude, the
//! resolved target and the immediate cost; a failed one yields an
//! [`ActionError`] whose text starts with `INVALID PARAM`.

use shinon_types::{GameState, PolicyId, TargetType};
use shinon_world::{Catalog, PolicyDefinition};

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    /// The save has no seed.
    #[error("INVALID PARAM missing seed in save")]
    MissingSeed,

    /// No such policy in the catalog.
    #[error("INVALID PARAM unknown policy {0}")]
    UnknownPolicy(String),

    /// The policy is not enactable right now.
    #[error("INVALID PARAM policy is locked")]
    PolicyLocked,

    /// The policy is still active or cooling down.
    #[error("INVALID PARAM policy currently active or cooling down")]
    OnCooldown,

    /// A target is required but none was given.
    #[error("INVALID PARAM missing target")]
    MissingTarget,

    /// The sector target is not in the catalog.
    #[error("INVALID PARAM unknown sector target {0}")]
    UnknownSector(String),

    /// The good target is not in the catalog.
    #[error("INVALID PARAM unknown good target {0}")]
    UnknownGood(String),

    /// The magnitude is NaN or infinite.
    #[error("INVALID PARAM magnitude is not numeric")]
    NonFiniteMagnitude,

    /// The magnitude is outside the policy's bounds.
    #[error("INVALID PARAM magnitude out of range [{min}, {max}]")]
    MagnitudeOutOfRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// The magnitude is off the step grid.
    #[error("INVALID PARAM magnitude must follow step {step}")]
    MagnitudeStep {
        /// Grid step.
        step: f64,
    },

    /// The treasury cannot cover the immediate cost.
    #[error("INVALID PARAM insufficient treasury (cost {cost}, treasury {treasury})")]
    InsufficientTreasury {
        /// Immediate cost of the action.
        cost: i64,
        /// Treasury at validation time.
        treasury: i64,
    },

    /// The treasury is below the policy's minimum.
    #[error("INVALID PARAM insufficient treasury (minimum {min})")]
    BelowMinimumTreasury {
        /// Required minimum.
        min: i64,
    },
}

/// A validated action, ready for the turn engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    /// Policy to enact.
    pub policy_id: PolicyId,
    /// Normalised magnitude.
    pub magnitude: f64,
    /// Resolved, lower-cased target id.
    pub target: Option<String>,
    /// Treasury debit at enactment.
    pub immediate_cost: i64,
}

/// Validate an enactment of `policy` against `state`.
///
/// Checks run in a fixed order: runtime still active or cooling down,
/// target, magnitude, then treasury. The policy's `min_treasury` is
/// checked first; the immediate cost must then be covered by the treasury,
/// so even a zero-cost action is refused while the treasury is negative.
pub fn validate_action(
    state: &GameState,
    catalog: &Catalog,
    policy: &PolicyDefinition,
    raw_magnitude: Option<f64>,
    target: Option<&str>,
) -> Result<ActionRequest, ActionError> {
    if let Some(runtime) = state.active_policies.get(&policy.id) {
        if runtime.remaining_ticks > 0 || runtime.cooldown_ticks > 0 {
            return Err(ActionError::OnCooldown);
        }
    }

    let target = resolve_target(catalog, policy, target)?;
    let magnitude = normalize_magnitude(policy, raw_magnitude)?;

    let treasury = state.world.treasury;
    let min = policy.constraints.min_treasury;
    if treasury < min {
        return Err(ActionError::BelowMinimumTreasury { min });
    }
    let cost = policy.immediate_cost(magnitude);
    if treasury < cost {
        return Err(ActionError::InsufficientTreasury { cost, treasury });
    }

    Ok(ActionRequest {
        policy_id: policy.id.clone(),
        magnitude,
        target,
        immediate_cost: cost,
    })
}

fn resolve_target(
    catalog: &Catalog,
    policy: &PolicyDefinition,
    target: Option<&str>,
) -> Result<Option<String>, ActionError> {
    let normalized = target
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());
    match policy.target_type {
        TargetType::None => Ok(None),
        TargetType::Sector => {
            let id = normalized.ok_or(ActionError::MissingTarget)?;
            if catalog.has_sector(&id) {
                Ok(Some(id))
            } else {
                Err(ActionError::UnknownSector(id))
            }
        }
        TargetType::Good => {
            let id = normalized.ok_or(ActionError::MissingTarget)?;
            if catalog.has_good(&id) {
                Ok(Some(id))
            } else {
                Err(ActionError::UnknownGood(id))
            }
        }
    }
}

fn normalize_magnitude(policy: &PolicyDefinition, raw: Option<f64>) -> Result<f64, ActionError> {
    let bounds = &policy.magnitude;
    let value = raw.unwrap_or(bounds.default);
    if !value.is_finite() {
        return Err(ActionError::NonFiniteMagnitude);
    }
    if !bounds.contains(value) {
        return Err(ActionError::MagnitudeOutOfRange {
            min: bounds.min,
            max: bounds.max,
        });
    }
    if !bounds.is_aligned(value) {
        return Err(ActionError::MagnitudeStep { step: bounds.step });
    }
    Ok(value)
}
