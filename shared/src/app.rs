//! The follow-graph core as a Crux app.
//!
//! Every remote call leaves through a capability and comes back as an
//! `Event` carrying the session epoch it was issued under (and, for lookups,
//! its search ticket). `update` checks those tags before applying anything,
//! so answers for a previous wallet or a superseded input are dropped.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

use crate::capabilities::{Capabilities, FollowListRequest};
use crate::config::SyncConfig;
use crate::error::{MutationError, QueryError, SyncError};
use crate::model::{Address, FollowGraphView, FollowKind, FollowListInfo, SearchResult};
use crate::mutation::MutationEngine;
use crate::notify::Notification;
use crate::search::{SearchResolver, SearchTicket};
use crate::session::{Session, SessionEpoch};
use crate::store::FollowListStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // --- From the shell ---
    Configure(SyncConfig),
    /// Wallet connected, switched or disconnected.
    SessionChanged(Option<Address>),
    /// Reload the first pages for the current session.
    Initialize,
    LoadMore(FollowKind),
    Search(String),
    ToggleFollow,
    DismissError,

    // --- Capability callbacks ---
    #[serde(skip)]
    FollowListLoaded {
        epoch: SessionEpoch,
        result: Result<FollowListInfo, QueryError>,
    },
    #[serde(skip)]
    PageLoaded {
        epoch: SessionEpoch,
        kind: FollowKind,
        result: Result<FollowListInfo, QueryError>,
    },
    #[serde(skip)]
    SearchResolved {
        epoch: SessionEpoch,
        ticket: SearchTicket,
        result: Result<SearchResult, QueryError>,
    },
    #[serde(skip)]
    MutationSettled {
        epoch: SessionEpoch,
        target: Address,
        result: Result<(), MutationError>,
    },
}

#[derive(Debug, Default)]
pub struct Model {
    config: SyncConfig,
    session: Session,
    store: FollowListStore,
    search: SearchResolver,
    engine: MutationEngine,
    initializing: bool,
    loading: HashSet<FollowKind>,
    last_error: Option<SyncError>,
}

impl Model {
    /// Drops everything that belonged to the previous session.
    fn discard_session_state(&mut self) {
        self.store.clear();
        self.search.reset();
        self.engine.clear();
        self.initializing = false;
        self.loading.clear();
        self.last_error = None;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorView {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl From<&SyncError> for ErrorView {
    fn from(e: &SyncError) -> Self {
        Self {
            code: e.code().to_string(),
            message: e.to_string(),
            retryable: e.is_retryable(),
        }
    }
}

/// Everything the shell renders from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub address: Option<Address>,
    pub follow_graph: Option<FollowGraphView>,
    pub credit_score: Option<i64>,
    pub search_input: String,
    pub search_result: Option<SearchResult>,
    pub is_searching: bool,
    pub is_follow_pending: bool,
    pub is_initializing: bool,
    pub is_loading_followers: bool,
    pub is_loading_followings: bool,
    pub error: Option<ErrorView>,
}

#[derive(Default)]
pub struct App;

impl App {
    fn initialize(model: &mut Model, caps: &Capabilities) {
        let Some(address) = model.session.address().cloned() else {
            debug!("no session, skipping follow list load");
            return;
        };
        let epoch = model.session.epoch();
        model.initializing = true;
        caps.query.follow_list_info(
            FollowListRequest::first_pages(address, &model.config),
            move |result| Event::FollowListLoaded { epoch, result },
        );
    }

    fn load_more(kind: FollowKind, model: &mut Model, caps: &Capabilities) {
        let Some(address) = model.session.address().cloned() else {
            return;
        };
        if model.loading.contains(&kind) {
            debug!(%kind, "load already in flight");
            return;
        }
        let Some(cursor) = model.store.next_cursor(kind) else {
            debug!(%kind, "nothing more to load");
            return;
        };
        let epoch = model.session.epoch();
        model.loading.insert(kind);
        caps.query.follow_list_info(
            FollowListRequest::next_page(address, &model.config, kind, cursor),
            move |result| Event::PageLoaded {
                epoch,
                kind,
                result,
            },
        );
    }

    fn search(input: &str, model: &mut Model, caps: &Capabilities) {
        let from = model.session.address().cloned();
        let ticket = match model.search.begin(from.as_ref(), input) {
            Ok(ticket) => ticket,
            Err(reason) => {
                debug!(?reason, "lookup suppressed");
                return;
            }
        };
        let Some(from) = from else {
            return;
        };
        let epoch = model.session.epoch();
        let to = ticket.target().clone();
        caps.query
            .search_user_info(from, to, model.config.network, move |result| {
                Event::SearchResolved {
                    epoch,
                    ticket,
                    result,
                }
            });
    }

    fn toggle_follow(model: &mut Model, caps: &Capabilities) {
        if model.session.address().is_none() {
            model.last_error = Some(SyncError::NoSession);
            return;
        }
        let epoch = model.session.epoch();
        let mutation = match model
            .engine
            .begin(&mut model.search, &mut model.store, epoch)
        {
            Ok(mutation) => mutation,
            Err(e) => {
                debug!(error = %e, "toggle refused");
                model.last_error = Some(e);
                return;
            }
        };
        let target = mutation.target.clone();
        caps.social.apply(
            mutation.intent,
            mutation.target,
            &model.config,
            move |result| Event::MutationSettled {
                epoch,
                target,
                result,
            },
        );
    }

    fn settle_mutation(
        target: &Address,
        result: Result<(), MutationError>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        match result {
            Ok(()) => {
                let Some(committed) = model.engine.commit(target) else {
                    debug!(%target, "no pending mutation to commit");
                    return;
                };
                info!(mutation_id = %committed.mutation_id, "mutation confirmed");
                caps.notify
                    .emit(Notification::success(committed.intent.success_message()));
            }
            Err(e) => {
                let Some(failed) = model
                    .engine
                    .rollback(target, &mut model.search, &mut model.store)
                else {
                    debug!(%target, "no pending mutation to roll back");
                    return;
                };
                error!(mutation_id = %failed.mutation_id, error = %e, "mutation failed");
                caps.notify.emit(Notification::error(format!(
                    "{} {e}",
                    failed.intent.failure_message()
                )));
                model.last_error = Some(e.into());
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::Configure(config) => match config.validate() {
                Ok(()) => model.config = config,
                Err(e) => {
                    warn!(error = %e, "config rejected");
                    model.last_error = Some(e.into());
                }
            },

            Event::SessionChanged(address) => {
                if !model.session.switch(address) {
                    return;
                }
                model.discard_session_state();
                info!(address = ?model.session.address(), "session changed");
                Self::initialize(model, caps);
            }

            Event::Initialize => Self::initialize(model, caps),

            Event::FollowListLoaded { epoch, result } => {
                if !model.session.is_current(epoch) {
                    debug!("discarding follow lists of a previous session");
                    return;
                }
                model.initializing = false;
                match result {
                    Ok(info) => {
                        info!(
                            followers = info.follower_count,
                            followings = info.following_count,
                            "follow lists loaded"
                        );
                        model.store.install(info);
                        model.engine.rebase(&mut model.store);
                    }
                    Err(e) => {
                        warn!(error = %e, "follow list load failed");
                        model.last_error = Some(e.into());
                    }
                }
            }

            Event::LoadMore(kind) => Self::load_more(kind, model, caps),

            Event::PageLoaded {
                epoch,
                kind,
                result,
            } => {
                if !model.session.is_current(epoch) {
                    debug!(%kind, "discarding page of a previous session");
                    return;
                }
                model.loading.remove(&kind);
                match result {
                    Ok(info) => {
                        let page = match kind {
                            FollowKind::Followers => info.followers,
                            FollowKind::Followings => info.followings,
                        };
                        debug!(%kind, items = page.len(), has_more = page.has_more(), "page loaded");
                        model.store.merge_page(kind, page);
                    }
                    Err(e) => {
                        warn!(%kind, error = %e, "page load failed");
                        model.last_error = Some(e.into());
                    }
                }
            }

            Event::Search(input) => Self::search(&input, model, caps),

            Event::SearchResolved {
                epoch,
                ticket,
                result,
            } => {
                if !model.session.is_current(epoch) {
                    debug!("discarding lookup of a previous session");
                    return;
                }
                match result {
                    Ok(mut result) => {
                        if let Some(optimistic) = model.engine.optimistic_status(result.address())
                        {
                            result.follow_status.is_following = optimistic;
                        }
                        model.search.complete(&ticket, result);
                    }
                    Err(e) => {
                        if model.search.fail(&ticket) {
                            warn!(error = %e, target = %ticket.target(), "lookup failed");
                            model.last_error = Some(e.into());
                        }
                    }
                }
            }

            Event::ToggleFollow => Self::toggle_follow(model, caps),

            Event::MutationSettled {
                epoch,
                target,
                result,
            } => {
                if !model.session.is_current(epoch) {
                    debug!(%target, "discarding mutation outcome of a previous session");
                    return;
                }
                Self::settle_mutation(&target, result, model, caps);
            }

            Event::DismissError => model.last_error = None,
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        let follow_graph = model.store.view().cloned();
        ViewModel {
            address: model.session.address().cloned(),
            credit_score: follow_graph.as_ref().map(FollowGraphView::credit_score),
            follow_graph,
            search_input: model.search.input().to_string(),
            search_result: model.search.result().cloned(),
            is_searching: model.search.is_searching(),
            is_follow_pending: model.engine.has_pending(),
            is_initializing: model.initializing,
            is_loading_followers: model.loading.contains(&FollowKind::Followers),
            is_loading_followings: model.loading.contains(&FollowKind::Followings),
            error: model.last_error.as_ref().map(ErrorView::from),
        }
    }
}
