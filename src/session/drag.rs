//! Transient state for one drag gesture.
//!
//! Created on press, updated on every motion event, dropped on release.

use crate::watermark::position::PixelPoint;

/// Pointer and watermark center while a drag is in progress.
///
/// The center lives in surface coordinates and follows the pointer freely;
/// only the anchor derived from it is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    last_pointer: PixelPoint,
    center: PixelPoint,
}

impl DragState {
    pub fn begin(pointer: PixelPoint, center: PixelPoint) -> Self {
        Self {
            last_pointer: pointer,
            center,
        }
    }

    /// Move by the pointer delta since the last event and return the new
    /// watermark center.
    pub fn update(&mut self, pointer: PixelPoint) -> PixelPoint {
        let dx = pointer.x - self.last_pointer.x;
        let dy = pointer.y - self.last_pointer.y;
        self.last_pointer = pointer;
        self.center = PixelPoint::new(self.center.x + dx, self.center.y + dy);
        self.center
    }

    pub fn center(&self) -> PixelPoint {
        self.center
    }
}
