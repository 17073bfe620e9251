//! Collaborators the core talks to but does not own. Each is a Crux
//! capability: the core describes the request, the shell performs it and the
//! answer comes back as an `Event`.

mod query;
mod social;

pub use crux_core::render::Render;

pub use self::query::{FollowListRequest, Query, QueryOperation, QueryOutput};
pub use self::social::{Social, SocialOperation, SocialOutput};
pub use crate::notify::{Notify, NotifyOperation};

use crate::app::{App, Event};

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub query: Query<Event>,
    pub social: Social<Event>,
    pub notify: Notify<Event>,
}
