use tracing::warn;
use uuid::Uuid;

use crate::entity::{Board, Permission, Role};
use crate::error::{CausewayError, Result};

use super::resolve_role;

/// Operation classes and the minimum role each one requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Board delete, permission grant/revoke, role change, invitations.
    ManageBoard,
    /// List/node/edge create, update, delete, reorder, move; board field
    /// updates.
    EditStructure,
    /// Comment and assumption creation, comment status toggles.
    Review,
    /// Board data, permission lists, comments, assumptions.
    Read,
}

impl Action {
    pub fn required_role(self) -> Role {
        match self {
            Action::ManageBoard => Role::Owner,
            Action::EditStructure => Role::Editor,
            Action::Review => Role::Reviewer,
            Action::Read => Role::Viewer,
        }
    }
}

/// The single decision function every caller funnels through: does the
/// resolved role (if any) satisfy the requirement?
pub fn authorize(role: Option<Role>, required: Role) -> Result<Role> {
    match role {
        Some(r) if r.satisfies(required) => Ok(r),
        Some(r) => {
            warn!(role = %r, required = %required, "authorization denied");
            Err(CausewayError::Forbidden(format!(
                "role {} does not satisfy required role {}",
                r, required
            )))
        }
        None => Err(CausewayError::Forbidden(
            "no access to this board".to_string(),
        )),
    }
}

/// Authorization context for one caller against one board. Resolve once,
/// then check each operation before executing it; a failed check never
/// reaches the graph model.
#[derive(Debug, Clone)]
pub struct Gate {
    board_owner: Uuid,
    user_id: Option<Uuid>,
    role: Option<Role>,
}

impl Gate {
    pub fn new(board: &Board, grants: &[Permission], user_id: Option<Uuid>) -> Self {
        Self {
            board_owner: board.owner,
            user_id,
            role: resolve_role(board, grants, user_id),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Check that the caller may perform the given class of operation.
    pub fn require(&self, action: Action) -> Result<Role> {
        authorize(self.role, action.required_role())
    }

    /// Self-scoped check for status toggles: the caller must be the
    /// author of the comment/assumption or the board owner, on top of
    /// the role rank required by the action. Anonymous callers author
    /// nothing and always fail.
    pub fn require_author(&self, author: Uuid) -> Result<()> {
        match self.user_id {
            Some(uid) if uid == author || uid == self.board_owner => Ok(()),
            _ => Err(CausewayError::Forbidden(
                "only the author or the board owner may do this".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_grant(role: Role) -> (Board, Vec<Permission>, Uuid) {
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let board = Board::new("Plan".to_string(), owner);
        let grants = vec![Permission::new(board.id, user, role, Some(owner))];
        (board, grants, user)
    }

    #[test]
    fn test_reviewer_cannot_edit_structure() {
        let (board, grants, user) = board_with_grant(Role::Reviewer);
        let gate = Gate::new(&board, &grants, Some(user));

        assert!(matches!(
            gate.require(Action::EditStructure),
            Err(CausewayError::Forbidden(_))
        ));
        assert!(gate.require(Action::Review).is_ok());
    }

    #[test]
    fn test_owner_passes_every_check_a_viewer_passes() {
        let owner = Uuid::new_v4();
        let board = Board::new("Plan".to_string(), owner);
        let gate = Gate::new(&board, &[], Some(owner));

        for action in [
            Action::Read,
            Action::Review,
            Action::EditStructure,
            Action::ManageBoard,
        ] {
            assert!(gate.require(action).is_ok());
        }
    }

    #[test]
    fn test_anonymous_viewer_on_public_board() {
        let mut board = Board::new("Plan".to_string(), Uuid::new_v4());
        board.is_public = true;
        let gate = Gate::new(&board, &[], None);

        assert_eq!(gate.require(Action::Read).unwrap(), Role::Viewer);
        assert!(matches!(
            gate.require(Action::EditStructure),
            Err(CausewayError::Forbidden(_))
        ));
    }

    #[test]
    fn test_author_check_allows_author_and_owner_only() {
        let (board, grants, user) = board_with_grant(Role::Reviewer);
        let author = user;

        let gate = Gate::new(&board, &grants, Some(user));
        assert!(gate.require_author(author).is_ok());

        let owner_gate = Gate::new(&board, &grants, Some(board.owner));
        assert!(owner_gate.require_author(author).is_ok());

        let other = Uuid::new_v4();
        let other_grants = vec![Permission::new(board.id, other, Role::Editor, None)];
        let other_gate = Gate::new(&board, &other_grants, Some(other));
        assert!(other_gate.require_author(author).is_err());

        let anon_gate = Gate::new(&board, &grants, None);
        assert!(anon_gate.require_author(author).is_err());
    }
}
