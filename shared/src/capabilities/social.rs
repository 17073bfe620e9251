//! Write side of the social graph: follow and unfollow, signed by the
//! shell's wallet.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::config::{Network, SyncConfig};
use crate::error::MutationError;
use crate::model::Address;
use crate::mutation::FollowIntent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocialOperation {
    Follow {
        target: Address,
        namespace: String,
        network: Network,
    },
    Unfollow {
        target: Address,
        namespace: String,
        network: Network,
    },
}

impl SocialOperation {
    #[must_use]
    pub fn new(intent: FollowIntent, target: Address, config: &SyncConfig) -> Self {
        let namespace = config.namespace.clone();
        let network = config.network;
        match intent {
            FollowIntent::Follow => Self::Follow {
                target,
                namespace,
                network,
            },
            FollowIntent::Unfollow => Self::Unfollow {
                target,
                namespace,
                network,
            },
        }
    }

    #[must_use]
    pub fn target(&self) -> &Address {
        match self {
            Self::Follow { target, .. } | Self::Unfollow { target, .. } => target,
        }
    }
}

pub type SocialOutput = Result<(), MutationError>;

impl Operation for SocialOperation {
    type Output = SocialOutput;
}

pub struct Social<Ev> {
    context: CapabilityContext<SocialOperation, Ev>,
}

impl<Ev> Capability<Ev> for Social<Ev> {
    type Operation = SocialOperation;
    type MappedSelf<MappedEv> = Social<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Social::new(self.context.map_event(f))
    }
}

impl<Ev> Social<Ev> {
    pub fn new(context: CapabilityContext<SocialOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Social<Ev>
where
    Ev: Send + 'static,
{
    /// Issues `follow` or `unfollow` of `target` as decided by `intent`.
    pub fn apply<F>(&self, intent: FollowIntent, target: Address, config: &SyncConfig, make_event: F)
    where
        F: FnOnce(SocialOutput) -> Ev + Send + 'static,
    {
        let operation = SocialOperation::new(intent, target, config);
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}
