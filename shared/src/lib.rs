//! Client-side core for a wallet's social graph.
//!
//! Keeps paginated follower/following lists without duplicates, resolves
//! typed addresses against the graph while dropping responses that arrive
//! out of order, and applies follow/unfollow optimistically with an exact
//! rollback when the remote call fails. Everything is scoped to a session;
//! switching wallets discards in-flight work of the old one.
//!
//! The core is a Crux app: the shell sends [`Event`]s, performs the
//! [`Effect`]s it gets back and renders the [`ViewModel`].

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod dedup;
pub mod error;
pub mod model;
pub mod mutation;
pub mod notify;
pub mod search;
pub mod session;
pub mod store;

pub use app::{App, ErrorView, Event, Model, ViewModel};
pub use capabilities::{
    Capabilities, Effect, FollowListRequest, QueryOperation, QueryOutput, SocialOperation,
    SocialOutput,
};
pub use config::{Network, SyncConfig};
pub use error::{ErrorKind, ErrorSeverity, MutationError, QueryError, SyncError};
pub use model::{
    Address, FollowGraphView, FollowKind, FollowListInfo, FollowStatus, Identity, Page, PageInfo,
    SearchResult,
};
pub use mutation::{FollowIntent, FollowMutation, MutationState};
pub use notify::{Notification, NotificationKind, NotifyOperation};
pub use session::{Session, SessionEpoch};
