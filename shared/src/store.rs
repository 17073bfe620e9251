//! Followers/followings pages for the signed-in user.
//!
//! Every state change goes through [`reduce`], a pure `(view, event) -> view`
//! function. [`FollowListStore`] only decides which event to apply and keeps
//! the receipts the mutation engine needs to undo its own deltas.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dedup;
use crate::model::{Address, FollowGraphView, FollowKind, Identity, Page};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphEvent {
    /// A page fetched with the stored cursor. Items are merged, page info replaced.
    PageLoaded { kind: FollowKind, page: Page },
    Followed { identity: Identity },
    Unfollowed { address: Address },
    /// Undo of a `Followed`. `was_listed` keeps an entry that predates the follow.
    FollowReverted { address: Address, was_listed: bool },
    /// Undo of an `Unfollowed`, reinserting at the entry's old position.
    UnfollowReverted {
        identity: Identity,
        index: Option<usize>,
    },
}

#[must_use]
pub fn reduce(mut view: FollowGraphView, event: GraphEvent) -> FollowGraphView {
    match event {
        GraphEvent::PageLoaded { kind, page } => {
            let target = view.page_mut(kind);
            target.items = dedup::merge(&target.items, &page.items);
            target.page_info = page.page_info;
        }
        GraphEvent::Followed { identity } => {
            view.followings.items =
                dedup::merge(&view.followings.items, std::slice::from_ref(&identity));
            view.following_count += 1;
        }
        GraphEvent::Unfollowed { address } => {
            view.followings.items.retain(|i| i.address != address);
            view.following_count -= 1;
        }
        GraphEvent::FollowReverted {
            address,
            was_listed,
        } => {
            if !was_listed {
                view.followings.items.retain(|i| i.address != address);
            }
            view.following_count -= 1;
        }
        GraphEvent::UnfollowReverted { identity, index } => {
            if let Some(index) = index.filter(|_| !view.followings.contains(&identity.address)) {
                let at = index.min(view.followings.items.len());
                view.followings.items.insert(at, identity);
            }
            view.following_count += 1;
        }
    }
    view
}

/// What a follow delta changed, enough to put it back exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaReceipt {
    pub identity: Identity,
    pub following: bool,
    /// Position of the address in `followings` before the delta, if listed.
    pub prior_index: Option<usize>,
}

impl DeltaReceipt {
    #[must_use]
    pub fn inverse(&self) -> GraphEvent {
        if self.following {
            GraphEvent::FollowReverted {
                address: self.identity.address.clone(),
                was_listed: self.prior_index.is_some(),
            }
        } else {
            GraphEvent::UnfollowReverted {
                identity: self.identity.clone(),
                index: self.prior_index,
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct FollowListStore {
    view: Option<FollowGraphView>,
}

impl FollowListStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn view(&self) -> Option<&FollowGraphView> {
        self.view.as_ref()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.view.is_some()
    }

    /// Installs the first pages of a session, replacing any previous view.
    pub fn install(&mut self, mut view: FollowGraphView) -> &FollowGraphView {
        view.followers.items = dedup::dedup(&view.followers.items);
        view.followings.items = dedup::dedup(&view.followings.items);
        debug!(
            followers = view.followers.len(),
            followings = view.followings.len(),
            "follow lists installed"
        );
        self.view.insert(view)
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    /// Cursor for the next page of `kind`, or `None` when there is nothing to load.
    #[must_use]
    pub fn next_cursor(&self, kind: FollowKind) -> Option<String> {
        let page = self.view.as_ref()?.page(kind);
        if page.can_load_more() {
            page.cursor().map(str::to_string)
        } else {
            None
        }
    }

    /// Returns `false` when there is no view to merge into.
    pub fn merge_page(&mut self, kind: FollowKind, page: Page) -> bool {
        self.apply(GraphEvent::PageLoaded { kind, page })
    }

    /// Adds or removes `identity` in `followings` and moves the count by one.
    /// Returns `None` without touching anything when there is no view.
    pub fn apply_follow_delta(&mut self, identity: &Identity, following: bool) -> Option<DeltaReceipt> {
        let prior_index = self.view.as_ref()?.followings.position(&identity.address);
        let event = if following {
            GraphEvent::Followed {
                identity: identity.clone(),
            }
        } else {
            GraphEvent::Unfollowed {
                address: identity.address.clone(),
            }
        };
        self.apply(event);
        Some(DeltaReceipt {
            identity: identity.clone(),
            following,
            prior_index,
        })
    }

    pub fn revert(&mut self, receipt: &DeltaReceipt) -> bool {
        self.apply(receipt.inverse())
    }

    fn apply(&mut self, event: GraphEvent) -> bool {
        match self.view.take() {
            Some(view) => {
                self.view = Some(reduce(view, event));
                true
            }
            None => false,
        }
    }
}
