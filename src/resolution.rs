use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// A one-shot gate holding back the responses of a mock mounted with
/// [`Mock::mount_with_controlled_resolution`].
///
/// It starts *pending* and becomes *released* at most once.
///
/// [`Mock::mount_with_controlled_resolution`]: crate::Mock::mount_with_controlled_resolution
#[derive(Debug, Default)]
pub(crate) struct ResolutionSignal {
    notify: Notify,
    released: AtomicBool,
}

impl ResolutionSignal {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn release(&self) {
        // Always set the flag **before** raising the event.
        if !self.released.swap(true, Ordering::AcqRel) {
            self.notify.notify_waiters();
        }
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Wait until the signal has been released. Returns immediately if it already was.
    pub(crate) async fn released(&self) {
        loop {
            // `notified` must be created before checking the flag, otherwise a release
            // happening in between would be missed.
            let notified = self.notify.notified();
            if self.is_released() {
                return;
            }
            notified.await;
        }
    }
}

/// Returned by [`Mock::mount_with_controlled_resolution`]: call [`release`] to let the
/// responses of the mock through.
///
/// `release` can be called before or after the request is sent, the outcome is the same.
/// Calling it more than once has no further effect.
///
/// [`Mock::mount_with_controlled_resolution`]: crate::Mock::mount_with_controlled_resolution
/// [`release`]: ReleaseHandle::release
#[derive(Debug, Clone)]
pub struct ReleaseHandle {
    signal: Arc<ResolutionSignal>,
}

impl ReleaseHandle {
    pub(crate) fn new(signal: Arc<ResolutionSignal>) -> Self {
        Self { signal }
    }

    /// Let the held back responses through.
    pub fn release(&self) {
        self.signal.release();
    }

    /// Whether [`release`](ReleaseHandle::release) has already been called.
    pub fn is_released(&self) -> bool {
        self.signal.is_released()
    }
}
