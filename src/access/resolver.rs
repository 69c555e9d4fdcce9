use uuid::Uuid;

use crate::entity::{Board, Permission, Role};

/// Resolve a user's effective role on a board.
///
/// Exactly one source wins: board ownership, an explicit grant, or the
/// implicit `viewer` that public boards give everyone (including
/// anonymous callers, `user_id = None`). Absent all three, the user has
/// no access at all.
pub fn resolve_role(board: &Board, grants: &[Permission], user_id: Option<Uuid>) -> Option<Role> {
    if let Some(uid) = user_id {
        if uid == board.owner {
            return Some(Role::Owner);
        }
        if let Some(grant) = grants
            .iter()
            .find(|p| p.board_id == board.id && p.user_id == uid)
        {
            return Some(grant.role);
        }
    }

    if board.is_public {
        Some(Role::Viewer)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_resolves_without_grant() {
        let owner = Uuid::new_v4();
        let board = Board::new("Plan".to_string(), owner);

        assert_eq!(resolve_role(&board, &[], Some(owner)), Some(Role::Owner));
    }

    #[test]
    fn test_explicit_grant_wins_over_public_viewer() {
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let mut board = Board::new("Plan".to_string(), owner);
        board.is_public = true;

        let grants = vec![Permission::new(board.id, user, Role::Editor, Some(owner))];

        assert_eq!(resolve_role(&board, &grants, Some(user)), Some(Role::Editor));
    }

    #[test]
    fn test_anonymous_on_public_board_is_viewer() {
        let mut board = Board::new("Plan".to_string(), Uuid::new_v4());
        board.is_public = true;

        assert_eq!(resolve_role(&board, &[], None), Some(Role::Viewer));
    }

    #[test]
    fn test_no_access_on_private_board() {
        let board = Board::new("Plan".to_string(), Uuid::new_v4());

        assert_eq!(resolve_role(&board, &[], None), None);
        assert_eq!(resolve_role(&board, &[], Some(Uuid::new_v4())), None);
    }

    #[test]
    fn test_grant_on_other_board_is_ignored() {
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let board = Board::new("Plan".to_string(), owner);

        let grants = vec![Permission::new(Uuid::new_v4(), user, Role::Editor, None)];

        assert_eq!(resolve_role(&board, &grants, Some(user)), None);
    }
}
