mod gate;
mod manage;
mod resolver;

pub use gate::{authorize, Action, Gate};
pub use manage::{accept_invitation, change_role, grant, invite, revoke};
pub use resolver::resolve_role;
