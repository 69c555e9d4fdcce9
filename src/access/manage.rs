use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::entity::{Board, Invitation, Permission, Role};
use crate::error::{CausewayError, Result};

/// Grant an explicit role on a board. The owner's role is implicit and
/// cannot be granted; a second grant for the same (board, user) pair is
/// rejected rather than silently replaced, unlike the idempotent
/// duplicate-edge policy in the graph model.
pub fn grant(
    board: &Board,
    grants: &mut Vec<Permission>,
    user_id: Uuid,
    role: Role,
    granted_by: Uuid,
) -> Result<Permission> {
    if user_id == board.owner {
        return Err(CausewayError::Invalid(
            "the board owner already has an implicit owner role".to_string(),
        ));
    }
    if grants
        .iter()
        .any(|p| p.board_id == board.id && p.user_id == user_id)
    {
        return Err(CausewayError::Invalid(format!(
            "user {} already has a permission on this board",
            user_id
        )));
    }

    let permission = Permission::new(board.id, user_id, role, Some(granted_by));
    grants.push(permission.clone());
    debug!(board = %board.id, user = %user_id, role = %role, "permission granted");
    Ok(permission)
}

/// Remove a user's explicit grant. The owner's implicit role cannot be
/// revoked.
pub fn revoke(board: &Board, grants: &mut Vec<Permission>, user_id: Uuid) -> Result<Permission> {
    if user_id == board.owner {
        return Err(CausewayError::Invalid(
            "the board owner's role cannot be revoked".to_string(),
        ));
    }
    let pos = grants
        .iter()
        .position(|p| p.board_id == board.id && p.user_id == user_id)
        .ok_or_else(|| CausewayError::NotFound(format!("permission for user {}", user_id)))?;

    Ok(grants.remove(pos))
}

/// Change the role on an existing grant.
pub fn change_role(
    board: &Board,
    grants: &mut [Permission],
    user_id: Uuid,
    role: Role,
) -> Result<()> {
    if user_id == board.owner {
        return Err(CausewayError::Invalid(
            "the board owner's role cannot be changed".to_string(),
        ));
    }
    let grant = grants
        .iter_mut()
        .find(|p| p.board_id == board.id && p.user_id == user_id)
        .ok_or_else(|| CausewayError::NotFound(format!("permission for user {}", user_id)))?;

    grant.role = role;
    Ok(())
}

/// Create a pending invitation. Only one pending invitation per
/// (board, email) at a time.
pub fn invite(
    board: &Board,
    invitations: &mut Vec<Invitation>,
    email: String,
    role: Role,
    token: String,
    invited_by: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<Invitation> {
    if email.trim().is_empty() {
        return Err(CausewayError::Invalid("email must not be empty".to_string()));
    }
    if invitations
        .iter()
        .any(|i| i.board_id == board.id && i.email == email && i.is_pending())
    {
        return Err(CausewayError::Invalid(format!(
            "a pending invitation for {} already exists",
            email
        )));
    }

    let invitation = Invitation::new(board.id, email, role, token, invited_by, expires_at);
    invitations.push(invitation.clone());
    Ok(invitation)
}

/// Accept an invitation, turning it into a permission for the accepting
/// user. The surrounding layer is responsible for matching the token to
/// the invitation and authenticating the user.
pub fn accept_invitation(
    board: &Board,
    invitation: &mut Invitation,
    grants: &mut Vec<Permission>,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Permission> {
    if !invitation.is_pending() {
        return Err(CausewayError::Conflict(
            "invitation has already been accepted".to_string(),
        ));
    }
    if invitation.is_expired(now) {
        return Err(CausewayError::Invalid("invitation has expired".to_string()));
    }

    let permission = grant(board, grants, user_id, invitation.role, invitation.invited_by)?;
    invitation.accepted_at = Some(now);
    Ok(permission)
}
