// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::buffer::{PixelBuffer, PixelBufferAllocator};
use crate::frame::{DecodedFrame, FramePayload, SourcePlane};
use crate::layout::{plan_layout, FrameLayout};
use crate::types::{ColorRange, ConvertError, NativeFormat, PixelFormat};

/// Map a decoded pixel format + color range to the native allocator's code.
///
/// An unset color range is treated as limited range; that is the decoder
/// contract, not a fallback.
pub fn map_format(
    format: PixelFormat,
    color_range: Option<ColorRange>,
) -> Result<NativeFormat, ConvertError> {
    let full = color_range == Some(ColorRange::Full);
    match format {
        PixelFormat::Nv12 => Ok(if full { NativeFormat::Nv12FullRange } else { NativeFormat::Nv12VideoRange }),
        PixelFormat::Yuv420p => Ok(if full { NativeFormat::Yuv420pFullRange } else { NativeFormat::Yuv420pVideoRange }),
        PixelFormat::P010Le => {
            // The 10-bit output always uses the video range code, even for
            // full range input; the range selection is overridden here.
            let _ = if full { NativeFormat::P010FullRange } else { NativeFormat::P010VideoRange };
            Ok(NativeFormat::P010VideoRange)
        }
        PixelFormat::HardwareOpaque => {
            Err(ConvertError::UnsupportedFormat { format, color_range })
        }
    }
}

/// Result of a successful [`copy_planes`] call.
#[derive(Debug, Clone, Copy)]
pub struct CopyOutcome {
    /// Raw status the native lock primitive returned, zero on success. The
    /// copy is attempted even when this is nonzero; callers decide whether
    /// that makes the frame unusable.
    pub lock_status: i32,
}

/// Unlocks the buffer on every exit path. The success path calls `finish` to
/// surface the native unlock status; early error returns unlock on drop.
struct LockGuard<'a, B: PixelBuffer> {
    buffer: &'a mut B,
    armed: bool,
}

impl<'a, B: PixelBuffer> LockGuard<'a, B> {
    fn lock(buffer: &'a mut B) -> (Self, i32) {
        let status = buffer.lock();
        (Self { buffer, armed: true }, status)
    }

    fn finish(mut self) -> Result<(), ConvertError> {
        self.armed = false;
        let status = self.buffer.unlock();
        if status != 0 {
            return Err(ConvertError::UnlockFailed(status));
        }
        Ok(())
    }
}

impl<B: PixelBuffer> Drop for LockGuard<'_, B> {
    fn drop(&mut self) {
        if self.armed {
            let status = self.buffer.unlock();
            if status != 0 {
                log::error!("Could not unlock pixel buffer base address: {status}");
            }
        }
    }
}

fn copy_plane(src: &[u8], src_stride: usize, rows: usize, dst: &mut [u8], dst_stride: usize) {
    if dst_stride == src_stride {
        let len = (src_stride * rows).min(src.len()).min(dst.len());
        dst[..len].copy_from_slice(&src[..len]);
    } else {
        // Never read or write past the narrower of the two rows.
        let bytes_per_row = dst_stride.min(src_stride);
        if bytes_per_row == 0 {
            return;
        }
        for (dst_row, src_row) in dst.chunks_mut(dst_stride).zip(src.chunks(src_stride)).take(rows) {
            let n = bytes_per_row.min(dst_row.len()).min(src_row.len());
            dst_row[..n].copy_from_slice(&src_row[..n]);
        }
    }
}

/// Copy every source plane into `target`, row geometry taken from `layout`.
///
/// The target is locked for CPU access around the copy and unlocked on every
/// return path. A nonzero lock status does not abort the copy; it is logged
/// and reported in [`CopyOutcome::lock_status`].
pub fn copy_planes<B: PixelBuffer>(
    planes: &[SourcePlane<'_>],
    target: &mut B,
    layout: &FrameLayout,
) -> Result<CopyOutcome, ConvertError> {
    let (mut guard, lock_status) = LockGuard::lock(target);
    if lock_status != 0 {
        log::error!("Could not lock pixel buffer base address: {lock_status}");
    }

    if guard.buffer.is_planar() {
        let target_planes = guard.buffer.plane_count();
        if planes.len() > target_planes {
            return Err(ConvertError::PlaneCountMismatch {
                source: planes.len(),
                target: target_planes,
            });
        }
        for (i, (src, plane)) in planes.iter().zip(layout.planes.iter()).enumerate() {
            let dst_stride = guard.buffer.plane_stride(i);
            let dst = guard.buffer.plane_mut(i);
            copy_plane(src.data, plane.stride, plane.height, dst, dst_stride);
        }
    } else {
        if planes.len() > 1 {
            return Err(ConvertError::PlaneCountMismatch { source: planes.len(), target: 1 });
        }
        if let (Some(src), Some(plane)) = (planes.first(), layout.planes.first()) {
            let dst_stride = guard.buffer.plane_stride(0);
            let dst = guard.buffer.plane_mut(0);
            copy_plane(src.data, plane.stride, plane.height, dst, dst_stride);
        }
    }

    guard.finish()?;
    Ok(CopyOutcome { lock_status })
}

/// Turn a decoded frame into a native pixel buffer.
///
/// Hardware-opaque frames already live in a native buffer; that handle is
/// returned as-is, with no allocation, no lock and no copy. Software frames
/// get a freshly allocated buffer of the mapped format, populated plane by
/// plane. Ownership of the returned buffer transfers to the caller.
pub fn materialize<A>(
    frame: &DecodedFrame<'_, A::Buffer>,
    allocator: &mut A,
) -> Result<A::Buffer, ConvertError>
where
    A: PixelBufferAllocator,
    A::Buffer: Clone,
{
    if frame.format == PixelFormat::HardwareOpaque {
        return match &frame.payload {
            FramePayload::Hardware(buffer) => Ok(buffer.clone()),
            FramePayload::Planes(_) => {
                log::error!("Hardware-opaque frame carries CPU planes instead of a native buffer");
                Err(ConvertError::UnsupportedFormat {
                    format: frame.format,
                    color_range: frame.color_range,
                })
            }
        };
    }

    let planes = match frame.planes() {
        Some(planes) => planes,
        None => {
            log::error!("Software frame {:?} has no CPU planes", frame.format);
            return Err(ConvertError::UnsupportedFormat {
                format: frame.format,
                color_range: frame.color_range,
            });
        }
    };

    let native = map_format(frame.format, frame.color_range)
        .inspect_err(|e| log::error!("Could not map frame format: {e}"))?;
    let layout = plan_layout(frame.format, frame.width, frame.height, Some(planes))
        .inspect_err(|e| log::error!("Could not plan frame layout: {e}"))?;

    let mut buffer = allocator
        .allocate(native, frame.width, frame.height)
        .ok_or_else(|| {
            log::error!("Failed to allocate a {native:?} buffer of {}x{}", frame.width, frame.height);
            ConvertError::AllocationFailed
        })?;

    let outcome = copy_planes(planes, &mut buffer, &layout)
        .inspect_err(|e| log::error!("Could not copy frame into pixel buffer: {e}"))?;
    if outcome.lock_status != 0 {
        log::warn!(
            "Pixel buffer populated despite lock status {}; contents may race with a reader",
            outcome.lock_status
        );
    }

    Ok(buffer)
}
