//! Capture flow controller.
//!
//! The flow is an explicit state object: the UI owns a [`CaptureFlow`],
//! calls its transition methods in response to user input and capture
//! results, and renders from [`CaptureFlow::controls`] and the returned
//! [`Status`] values. Nothing here touches the UI or the capture host.

mod controller;
mod status;

pub use controller::{CaptureFlow, CaptureStep, CaptureTicket, FlowRejection, FlowState, FlowUpdate};
pub use status::{Controls, Status, StatusLevel};
