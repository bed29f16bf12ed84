// resolver.rs — the access-list computation.
//
// Direct department members come first, then users holding an explicit
// permission grant, deduplicated by user id keeping the first occurrence.
// This is the fallback for agreements that have no persisted identity yet;
// the backend's users-with-access list replaces it after the first save.

use std::collections::HashSet;

use crate::roster::AccessUser;

/// Compute the deduplicated access list for a department.
///
/// Never fails: an unset department or an empty roster yields an empty
/// list.
pub fn resolve(department_id: Option<i64>, roster: &[AccessUser]) -> Vec<AccessUser> {
    let Some(department_id) = department_id else {
        return Vec::new();
    };

    let direct = roster.iter().filter(|u| u.belongs_to(department_id));
    let granted = roster.iter().filter(|u| u.has_grant_for(department_id));

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for user in direct.chain(granted) {
        if seen.insert(user.id) {
            out.push(user.clone());
        }
    }

    tracing::debug!(
        department_id,
        resolved = out.len(),
        roster = roster.len(),
        "resolved access list"
    );
    out
}
