//! Set of user ids checked for export.
//!
//! Membership does not depend on which tab or page is displayed, so checking
//! rows on several pages accumulates into one selection.

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::users::types::UserId;

/// Selected ids, kept in the order they were first checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    members: IndexSet<UserId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` when `included`, removes it otherwise.
    pub fn toggle(&mut self, id: UserId, included: bool) {
        if included {
            self.members.insert(id);
        } else {
            self.members.shift_remove(&id);
        }
    }

    /// Applies [`toggle`](Self::toggle) to every id in `ids`.
    pub fn select_all_on_page(&mut self, ids: impl IntoIterator<Item = UserId>, included: bool) {
        if included {
            self.members.extend(ids);
        } else {
            // One pass over the set instead of a shift per removed id.
            let removed: HashSet<UserId> = ids.into_iter().collect();
            self.members.retain(|id| !removed.contains(id));
        }
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.members.contains(&id)
    }

    /// True when `ids` is non-empty and every id in it is selected.
    pub fn all_selected(&self, ids: impl IntoIterator<Item = UserId>) -> bool {
        let mut any = false;
        for id in ids {
            if !self.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Selected ids in the order they were first checked.
    pub fn to_vec(&self) -> Vec<UserId> {
        self.members.iter().copied().collect()
    }
}
