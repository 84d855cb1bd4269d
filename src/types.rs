// SPDX-License-Identifier: MIT OR Apache-2.0

/// Maximum number of planes any supported pixel format can have.
pub const MAX_PLANES: usize = 3;

/// Pixel layout of a decoded frame, as reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit bi-planar 4:2:0: full-res luma plane + interleaved half-res chroma plane.
    Nv12,
    /// 8-bit tri-planar 4:2:0: full-res luma plane + two half-res chroma planes.
    Yuv420p,
    /// 10-bit little-endian bi-planar 4:2:0, samples in the MSBs of 16 bits.
    P010Le,
    /// Frame data already lives in a platform-managed native buffer.
    HardwareOpaque,
}

/// Whether sample values span the full numeric range or the broadcast-legal subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRange {
    Limited,
    Full,
}

/// Pixel format codes understood by the native buffer allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeFormat {
    Nv12VideoRange,
    Nv12FullRange,
    Yuv420pVideoRange,
    Yuv420pFullRange,
    P010VideoRange,
    P010FullRange,
}

impl NativeFormat {
    /// The four-character code the native allocator uses for this format.
    pub fn fourcc(&self) -> [u8; 4] {
        match self {
            NativeFormat::Nv12VideoRange    => *b"420v",
            NativeFormat::Nv12FullRange     => *b"420f",
            NativeFormat::Yuv420pVideoRange => *b"y420",
            NativeFormat::Yuv420pFullRange  => *b"f420",
            NativeFormat::P010VideoRange    => *b"x420",
            NativeFormat::P010FullRange     => *b"xf20",
        }
    }

    pub fn is_full_range(&self) -> bool {
        matches!(
            self,
            NativeFormat::Nv12FullRange | NativeFormat::Yuv420pFullRange | NativeFormat::P010FullRange
        )
    }
}

// Not derived via `thiserror` because the `source` field of `PlaneCountMismatch`
// would be treated as the error's cause, which requires it to implement `Error`.
#[derive(Debug)]
pub enum ConvertError {
    /// Pixel format with color range is not supported.
    UnsupportedFormat { format: PixelFormat, color_range: Option<ColorRange> },
    /// Source frame and target buffer disagree on plane count.
    PlaneCountMismatch { source: usize, target: usize },
    /// Could not lock pixel buffer base address.
    LockFailed(i32),
    /// Could not unlock pixel buffer base address.
    UnlockFailed(i32),
    /// Native pixel buffer allocation failed.
    AllocationFailed,
}

impl core::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConvertError::UnsupportedFormat { format, color_range } => write!(
                f,
                "Pixel format {format:?} with color range {color_range:?} is not supported"
            ),
            ConvertError::PlaneCountMismatch { source, target } => write!(
                f,
                "Source frame has {source} planes but the target buffer has {target}"
            ),
            ConvertError::LockFailed(status) => {
                write!(f, "Could not lock pixel buffer base address: {status}")
            }
            ConvertError::UnlockFailed(status) => {
                write!(f, "Could not unlock pixel buffer base address: {status}")
            }
            ConvertError::AllocationFailed => {
                write!(f, "Native pixel buffer allocation failed")
            }
        }
    }
}

impl std::error::Error for ConvertError {}
