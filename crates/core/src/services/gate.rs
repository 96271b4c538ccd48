//! Per-action authorization checks.
//!
//! Every mutating service operation runs its check before touching the
//! store; a failed check aborts with `Forbidden` and nothing is written.
//! Caller identity is always an explicit parameter, never ambient state.

use alumnet_common::{AppError, AppResult};
use alumnet_db::entities::user;

/// Require that the actor is an admin.
pub fn ensure_admin(actor: &user::Model) -> AppResult<()> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "This action requires an administrator".to_string(),
        ))
    }
}

/// Require that the actor owns the resource or is an admin.
pub fn ensure_owner_or_admin(actor: &user::Model, owner_id: &str) -> AppResult<()> {
    if actor.id == owner_id || actor.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to modify this resource".to_string(),
        ))
    }
}
