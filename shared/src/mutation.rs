//! Optimistic follow/unfollow.
//!
//! `begin` flips the search result and the follow lists together before the
//! remote call is issued; `commit` forgets the bookkeeping; `rollback` undoes
//! both sides exactly. One mutation per target may be pending at a time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SyncError;
use crate::model::{Address, Identity};
use crate::search::SearchResolver;
use crate::session::SessionEpoch;
use crate::store::{DeltaReceipt, FollowListStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowIntent {
    Follow,
    Unfollow,
}

impl FollowIntent {
    /// Following already means the toggle unfollows, and vice versa.
    #[must_use]
    pub const fn toggle_from(is_following: bool) -> Self {
        if is_following {
            Self::Unfollow
        } else {
            Self::Follow
        }
    }

    /// `isFollowing` once the mutation has gone through.
    #[must_use]
    pub const fn resulting_status(self) -> bool {
        matches!(self, Self::Follow)
    }

    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Follow => "Follow Success!",
            Self::Unfollow => "Unfollow Success!",
        }
    }

    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Follow => "Follow Failed!",
            Self::Unfollow => "Unfollow Failed!",
        }
    }
}

impl fmt::Display for FollowIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationState {
    Idle,
    Pending,
    Committed,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowMutation {
    pub mutation_id: Uuid,
    pub target: Address,
    pub identity: Identity,
    pub intent: FollowIntent,
    pub state: MutationState,
    /// `isFollowing` on the search result before the optimistic flip.
    pub prior_following: bool,
    /// `None` when no follow lists were loaded at the time.
    pub receipt: Option<DeltaReceipt>,
    pub epoch: SessionEpoch,
}

#[derive(Debug, Default)]
pub struct MutationEngine {
    pending: HashMap<Address, FollowMutation>,
}

impl MutationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, target: &Address) -> MutationState {
        if self.pending.contains_key(target) {
            MutationState::Pending
        } else {
            MutationState::Idle
        }
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The value `isFollowing` will have if the pending mutation on `target` succeeds.
    #[must_use]
    pub fn optimistic_status(&self, target: &Address) -> Option<bool> {
        self.pending
            .get(target)
            .map(|m| m.intent.resulting_status())
    }

    /// Idle → Pending on the live search result. Both the search result and
    /// the follow lists are updated before this returns.
    pub fn begin(
        &mut self,
        search: &mut SearchResolver,
        store: &mut FollowListStore,
        epoch: SessionEpoch,
    ) -> Result<FollowMutation, SyncError> {
        let result = search.result().ok_or(SyncError::NoSearchResult)?;
        let target = result.address().clone();
        if self.pending.contains_key(&target) {
            return Err(SyncError::MutationInProgress(target));
        }

        let identity = result.identity.clone();
        let prior_following = result.is_following();
        let intent = FollowIntent::toggle_from(prior_following);
        let next = intent.resulting_status();

        search.set_following(&target, next);
        let receipt = store.apply_follow_delta(&identity, next);

        let mutation = FollowMutation {
            mutation_id: Uuid::new_v4(),
            target: target.clone(),
            identity,
            intent,
            state: MutationState::Pending,
            prior_following,
            receipt,
            epoch,
        };
        info!(
            mutation_id = %mutation.mutation_id,
            target = %target,
            intent = %intent,
            "optimistic mutation applied"
        );
        self.pending.insert(target, mutation.clone());
        Ok(mutation)
    }

    /// Pending → Committed. The optimistic state is already correct.
    pub fn commit(&mut self, target: &Address) -> Option<FollowMutation> {
        let mut mutation = self.pending.remove(target)?;
        mutation.state = MutationState::Committed;
        debug!(mutation_id = %mutation.mutation_id, "mutation committed");
        Some(mutation)
    }

    /// Pending → Failed, restoring the search flag and the follow lists.
    pub fn rollback(
        &mut self,
        target: &Address,
        search: &mut SearchResolver,
        store: &mut FollowListStore,
    ) -> Option<FollowMutation> {
        let mut mutation = self.pending.remove(target)?;
        search.set_following(target, mutation.prior_following);
        if let Some(receipt) = &mutation.receipt {
            store.revert(receipt);
        }
        mutation.state = MutationState::Failed;
        info!(mutation_id = %mutation.mutation_id, target = %target, "mutation rolled back");
        Some(mutation)
    }

    /// Re-applies every pending delta to a view that was just installed and
    /// did not contain them, so rollback and commit act on what is shown.
    pub fn rebase(&mut self, store: &mut FollowListStore) {
        for mutation in self.pending.values_mut() {
            mutation.receipt =
                store.apply_follow_delta(&mutation.identity, mutation.intent.resulting_status());
            debug!(mutation_id = %mutation.mutation_id, "pending delta rebased");
        }
    }

    /// Forgets pending mutations without touching state; used when the
    /// session they belong to is discarded.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
