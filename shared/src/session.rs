//! The connected wallet as an explicit value instead of ambient context.

use serde::{Deserialize, Serialize};

use crate::model::Address;

/// The connected wallet, made explicit.
///
/// `epoch` increases on every change so work issued under an older session
/// can tell it has been superseded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    address: Option<Address>,
    epoch: u64,
}

/// Captured at issue time and checked when an async response lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEpoch(u64);

impl Session {
    #[must_use]
    pub fn new(address: Option<Address>) -> Self {
        Self { address, epoch: 0 }
    }

    #[must_use]
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    #[must_use]
    pub const fn epoch(&self) -> SessionEpoch {
        SessionEpoch(self.epoch)
    }

    #[must_use]
    pub fn is_current(&self, epoch: SessionEpoch) -> bool {
        self.epoch == epoch.0
    }

    /// Returns `true` if the address actually changed. Reconnecting the same
    /// address keeps the epoch and everything in flight.
    pub fn switch(&mut self, address: Option<Address>) -> bool {
        if self.address == address {
            return false;
        }
        self.address = address;
        self.epoch = self.epoch.wrapping_add(1);
        true
    }
}
