//! Read side of the remote social graph.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::config::{Network, SyncConfig};
use crate::error::QueryError;
use crate::model::{Address, FollowKind, FollowListInfo, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryOperation {
    /// Identity of `to` and whether `from` follows it.
    SearchUserInfo {
        from: Address,
        to: Address,
        network: Network,
    },
    /// Counts plus one page of followers and/or followings. A list whose
    /// `*_first` is `None` comes back empty.
    FollowListInfo(FollowListRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryOutput {
    SearchUserInfo(Result<SearchResult, QueryError>),
    FollowListInfo(Result<FollowListInfo, QueryError>),
}

impl Operation for QueryOperation {
    type Output = QueryOutput;
}

pub struct Query<Ev> {
    context: CapabilityContext<QueryOperation, Ev>,
}

impl<Ev> Capability<Ev> for Query<Ev> {
    type Operation = QueryOperation;
    type MappedSelf<MappedEv> = Query<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Query::new(self.context.map_event(f))
    }
}

impl<Ev> Query<Ev> {
    pub fn new(context: CapabilityContext<QueryOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Query<Ev>
where
    Ev: Send + 'static,
{
    pub fn search_user_info<F>(&self, from: Address, to: Address, network: Network, make_event: F)
    where
        F: FnOnce(Result<SearchResult, QueryError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let output = context
                .request_from_shell(QueryOperation::SearchUserInfo { from, to, network })
                .await;
            let result = match output {
                QueryOutput::SearchUserInfo(result) => result,
                QueryOutput::FollowListInfo(_) => Err(unexpected("follow list")),
            };
            context.update_app(make_event(result));
        });
    }

    pub fn follow_list_info<F>(&self, request: FollowListRequest, make_event: F)
    where
        F: FnOnce(Result<FollowListInfo, QueryError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let output = context
                .request_from_shell(QueryOperation::FollowListInfo(request))
                .await;
            let result = match output {
                QueryOutput::FollowListInfo(result) => result,
                QueryOutput::SearchUserInfo(_) => Err(unexpected("search")),
            };
            context.update_app(make_event(result));
        });
    }
}

fn unexpected(got: &str) -> QueryError {
    QueryError::Malformed(format!("shell answered with a {got} response"))
}

/// Parameters of a follow-list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowListRequest {
    pub address: Address,
    pub namespace: String,
    pub network: Network,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following_first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_first: Option<u32>,
    /// Cursor for the followings list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following_after: Option<String>,
    /// Cursor for the followers list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_after: Option<String>,
}

impl FollowListRequest {
    /// No pages requested yet; add them with [`Self::with_first`].
    #[must_use]
    pub fn new(address: Address, config: &SyncConfig) -> Self {
        Self {
            address,
            namespace: config.namespace.clone(),
            network: config.network,
            following_first: None,
            follower_first: None,
            following_after: None,
            follower_after: None,
        }
    }

    /// First page of both lists, as issued when a session starts.
    #[must_use]
    pub fn first_pages(address: Address, config: &SyncConfig) -> Self {
        Self::new(address, config)
            .with_first(FollowKind::Followers, config.page_size)
            .with_first(FollowKind::Followings, config.page_size)
    }

    /// The page after `cursor` for one list only.
    #[must_use]
    pub fn next_page(address: Address, config: &SyncConfig, kind: FollowKind, cursor: String) -> Self {
        Self::new(address, config)
            .with_first(kind, config.page_size)
            .with_cursor(kind, cursor)
    }

    #[must_use]
    pub fn with_first(mut self, kind: FollowKind, first: u32) -> Self {
        match kind {
            FollowKind::Followers => self.follower_first = Some(first),
            FollowKind::Followings => self.following_first = Some(first),
        }
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, kind: FollowKind, cursor: String) -> Self {
        match kind {
            FollowKind::Followers => self.follower_after = Some(cursor),
            FollowKind::Followings => self.following_after = Some(cursor),
        }
        self
    }

    #[must_use]
    pub const fn first(&self, kind: FollowKind) -> Option<u32> {
        match kind {
            FollowKind::Followers => self.follower_first,
            FollowKind::Followings => self.following_first,
        }
    }

    #[must_use]
    pub fn after(&self, kind: FollowKind) -> Option<&str> {
        match kind {
            FollowKind::Followers => self.follower_after.as_deref(),
            FollowKind::Followings => self.following_after.as_deref(),
        }
    }
}
