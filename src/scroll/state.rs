//! Sampled scroll state.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// One sample of the page scroll, as read by the frame scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub offset_px: f32,
    /// `offset_px / scrollable height`, in [0, 1]
    pub progress: f32,
    /// `None` until the offset first changes
    pub direction: Option<ScrollDirection>,
    pub is_active: bool,
}
