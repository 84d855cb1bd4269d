use crate::types::NativeFormat;

/// A platform-native pixel buffer.
///
/// The buffer owns its backing memory and chooses its own internal strides,
/// which may differ from the strides of the frame being copied into it.
/// `plane_mut` and `plane_stride` results are only meaningful between a
/// successful `lock` and the matching `unlock`.
///
/// Packed (non-planar) buffers report a single plane: `plane_mut(0)` is the
/// whole buffer and `plane_stride(0)` its bytes per row.
pub trait PixelBuffer {
    fn is_planar(&self) -> bool;
    fn plane_count(&self) -> usize;

    /// Lock the buffer for CPU access. Returns the native status code, zero on success.
    fn lock(&mut self) -> i32;

    /// Release the CPU-access lock. Returns the native status code, zero on success.
    fn unlock(&mut self) -> i32;

    /// Bytes from the start of one row of `plane` to the start of the next.
    fn plane_stride(&self, plane: usize) -> usize;

    /// Writable bytes of `plane`, covering `plane_stride(plane) * rows`.
    fn plane_mut(&mut self, plane: usize) -> &mut [u8];
}

/// Allocates native pixel buffers by format and dimensions.
pub trait PixelBufferAllocator {
    type Buffer: PixelBuffer;

    /// Allocate a buffer, or `None` when the native allocator reports failure.
    fn allocate(&mut self, format: NativeFormat, width: u32, height: u32) -> Option<Self::Buffer>;
}
