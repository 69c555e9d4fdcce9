mod assumption;
mod board;
mod comment;
mod edge;
mod invitation;
mod list;
mod node;
mod permission;

pub use assumption::{Assumption, AssumptionStrength};
pub use board::Board;
pub use comment::{Comment, CommentAnchor, CommentStatus};
pub use edge::{Edge, EdgeKind};
pub use invitation::Invitation;
pub use list::{List, ListKind};
pub use node::{Node, NodeKind};
pub use permission::{Permission, Role};
