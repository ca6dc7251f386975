//! Visibility trigger for the loading row at the end of the list.
//!
//! The observer holds at most one subscription. Attaching a new one always
//! disconnects the previous, so two observers never watch the list at once.

use tracing::trace;

use crate::viewport::VirtualRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Subscription {
    index: usize,
    /// `None` until the first notification after attaching.
    intersecting: Option<bool>,
}

#[derive(Debug, Default)]
pub struct SentinelObserver {
    slot: Option<Subscription>,
}

impl SentinelObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch the row at `index`, replacing any previous subscription.
    pub fn observe(&mut self, index: usize) {
        if let Some(previous) = self.slot.take() {
            trace!(index = previous.index, "Sentinel observer disconnected");
        }
        trace!(index, "Sentinel observer attached");
        self.slot = Some(Subscription {
            index,
            intersecting: None,
        });
    }

    pub fn disconnect(&mut self) {
        self.slot = None;
    }

    #[cfg(test)]
    pub fn observed(&self) -> Option<usize> {
        self.slot.map(|s| s.index)
    }

    /// Feed the current visible range. Returns true when the watched row has
    /// just come into view. A fresh subscription whose row is already visible
    /// reports true on its first notification.
    pub fn notify(&mut self, visible: VirtualRange) -> bool {
        let Some(subscription) = self.slot.as_mut() else {
            return false;
        };

        let now = (visible.start_index..visible.end_index).contains(&subscription.index);
        let entered = now && subscription.intersecting != Some(true);
        subscription.intersecting = Some(now);
        entered
    }
}
