//! The capture backend seam.
//!
//! A backend is one known shape of host capture API. Some hosts hand back an
//! image immediately, others only a pending value; [`HostReply`] carries
//! either and the adapter awaits both the same way.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use super::host_image::SharedImage;

/// Future resolved by an asynchronous host
pub type PendingImage = Pin<Box<dyn Future<Output = anyhow::Result<Option<SharedImage>>> + Send>>;

/// What a host capture call returns
pub enum HostReply {
    /// The host answered synchronously. `None` means it produced no image.
    Ready(Option<SharedImage>),
    /// The host will answer later
    Pending(PendingImage),
}

impl HostReply {
    pub fn image(image: SharedImage) -> Self {
        Self::Ready(Some(image))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<Option<SharedImage>>> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }
}

impl fmt::Debug for HostReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(image) => f.debug_tuple("Ready").field(image).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// One host capture entry point
pub trait CaptureBackend: Send + Sync {
    /// Stable identifier used in logs and status text
    fn name(&self) -> &'static str;

    /// Whether this entry point exists in the current environment
    fn is_present(&self) -> bool;

    /// Issue a capture. An `Err` is a host call that failed outright.
    fn capture(&self) -> anyhow::Result<HostReply>;
}
