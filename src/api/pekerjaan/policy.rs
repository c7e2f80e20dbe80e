use crate::api::auth::CallerIdentity;

/// Lifecycle transitions gated on ownership
///
/// Reads, creates and updates only need an authenticated caller and never
/// reach [`authorize`]; creation is scoped by [`effective_alumni_id`] and
/// trash listing by [`ownership_scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SoftDelete,
    Restore,
    HardDelete,
}

/// Decide whether `caller` may perform `op` on a record attributed to `created_by`.
/// Admins may always; everyone else only on records they created.
pub fn authorize(op: Operation, caller: &CallerIdentity, created_by: Option<&str>) -> bool {
    match op {
        Operation::SoftDelete | Operation::Restore | Operation::HardDelete => {
            caller.is_admin() || created_by == Some(caller.username.as_str())
        }
    }
}

/// Restriction handed to the store for owner-scoped writes and trash listing.
/// `None` lifts the restriction.
pub fn ownership_scope(caller: &CallerIdentity) -> Option<&str> {
    if caller.is_admin() {
        None
    } else {
        Some(caller.username.as_str())
    }
}

/// Alumni a new record is attributed to. Ordinary callers always get their own id.
pub fn effective_alumni_id(caller: &CallerIdentity, requested: Option<i32>) -> Option<i32> {
    if caller.is_admin() {
        requested
    } else {
        Some(caller.user_id)
    }
}
