//! Ownership predicate shared by every scoped operation.
//!
//! Administrators get [`OwnerScope::Any`]; everyone else is confined to
//! resources whose owning user matches their own id. Repositories receive the
//! scope and push it into their queries, so a check and the mutation it guards
//! run as one statement.

use crate::middleware::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerScope {
    Any,
    Owner(i32),
}

impl OwnerScope {
    pub fn for_caller(caller: &AuthUser) -> Self {
        if caller.is_admin() {
            OwnerScope::Any
        } else {
            OwnerScope::Owner(caller.user_id)
        }
    }

    /// Owner id to bind into a query, `None` when unrestricted
    pub fn owner_id(&self) -> Option<i32> {
        match self {
            OwnerScope::Any => None,
            OwnerScope::Owner(id) => Some(*id),
        }
    }

    pub fn permits(&self, owner_id: i32) -> bool {
        match self {
            OwnerScope::Any => true,
            OwnerScope::Owner(id) => *id == owner_id,
        }
    }
}
