// SPDX-License-Identifier: MIT OR Apache-2.0

use arrayvec::ArrayVec;

use crate::types::{ColorRange, PixelFormat, MAX_PLANES};

/// One plane of a software-decoded frame.
///
/// `data` covers the whole strided plane (`stride * rows` bytes), so every
/// copy out of it is bounds-checked against the slice, not against metadata.
#[derive(Debug, Clone, Copy)]
pub struct SourcePlane<'a> {
    pub data: &'a [u8],
    /// Bytes from the start of one row to the start of the next.
    pub stride: usize,
}

/// Backing storage of a decoded frame.
pub enum FramePayload<'a, B> {
    /// CPU memory, one entry per plane. The length is the plane count.
    Planes(ArrayVec<SourcePlane<'a>, MAX_PLANES>),
    /// A native buffer handle produced by a hardware decoder.
    Hardware(B),
}

/// A decoded video frame, read-only and valid for one conversion call.
///
/// `B` is the native pixel buffer handle type of the target platform; it only
/// appears in the [`FramePayload::Hardware`] case.
pub struct DecodedFrame<'a, B> {
    pub format: PixelFormat,
    /// `None` means the decoder did not set a range; treated as limited.
    pub color_range: Option<ColorRange>,
    pub width: u32,
    pub height: u32,
    pub payload: FramePayload<'a, B>,
}

impl<'a, B> DecodedFrame<'a, B> {
    /// The frame's CPU planes, or `None` for hardware-opaque frames.
    pub fn planes(&self) -> Option<&[SourcePlane<'a>]> {
        match &self.payload {
            FramePayload::Planes(planes) => Some(planes.as_slice()),
            FramePayload::Hardware(_) => None,
        }
    }
}
