//! Terminal outcomes for the user, delivered to the shell as a
//! fire-and-forget effect. The shell decides how to show them.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// How long a banner of this kind stays up.
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Success => 6000,
            Self::Error => 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub duration_ms: u64,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            duration_ms: kind.default_duration_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyOperation {
    Show(Notification),
}

impl Operation for NotifyOperation {
    type Output = ();
}

pub struct Notify<Ev> {
    context: CapabilityContext<NotifyOperation, Ev>,
}

impl<Ev> Capability<Ev> for Notify<Ev> {
    type Operation = NotifyOperation;
    type MappedSelf<MappedEv> = Notify<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Notify::new(self.context.map_event(f))
    }
}

impl<Ev> Notify<Ev> {
    pub fn new(context: CapabilityContext<NotifyOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Notify<Ev>
where
    Ev: Send + 'static,
{
    pub fn emit(&self, notification: Notification) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context
                .notify_shell(NotifyOperation::Show(notification))
                .await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_carry_their_duration() {
        let ok = Notification::success("Follow Success!");
        assert_eq!(ok.kind, NotificationKind::Success);
        assert_eq!(ok.duration_ms, 6000);

        let failed = Notification::error("Unfollow Failed!");
        assert_eq!(failed.kind, NotificationKind::Error);
        assert_eq!(failed.duration_ms, 8000);
    }

    #[test]
    fn test_operation_serializes_for_the_shell() {
        let op = NotifyOperation::Show(Notification::success("Follow Success!"));
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["Show"]["message"], "Follow Success!");
        assert_eq!(json["Show"]["kind"], "success");
    }
}
