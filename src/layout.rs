// SPDX-License-Identifier: MIT OR Apache-2.0

use arrayvec::ArrayVec;

use crate::frame::SourcePlane;
use crate::types::{ConvertError, PixelFormat, MAX_PLANES};

/// Geometry of one plane of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Width in samples.
    pub width: usize,
    /// Height in rows.
    pub height: usize,
    /// Bytes per row.
    pub stride: usize,
}

/// Per-plane geometry of a whole frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    pub planes: ArrayVec<PlaneLayout, MAX_PLANES>,
    /// Total byte size when all planes share one backing allocation, laid out
    /// back to back. Zero when any adjacent-plane gap was detected. This is a
    /// hint for a potential single-pass copy, never required for correctness.
    pub contiguous_size: usize,
}

/// Compute per-plane width/height/stride for `format` at `width` x `height`.
///
/// With `source` planes given, their strides are used verbatim and plane
/// contiguity is checked against the actual plane addresses. Without them
/// (geometry-only path, e.g. for size estimates) default strides are
/// synthesized: luma rows are `width` bytes, 8-bit chroma rows are even-aligned
/// and 10-bit rows are aligned to a 64 byte boundary.
pub fn plan_layout(
    format: PixelFormat,
    width: u32,
    height: u32,
    source: Option<&[SourcePlane<'_>]>,
) -> Result<FrameLayout, ConvertError> {
    let w = width as usize;
    let h = height as usize;
    // 4:2:0 chroma planes cover the image with half-res samples, rounded up.
    let cw = (w + 1) / 2;
    let ch = (h + 1) / 2;

    let stride_of = |plane: usize, default: usize| {
        source
            .and_then(|planes| planes.get(plane))
            .map(|p| p.stride)
            .unwrap_or(default)
    };

    let mut planes: ArrayVec<PlaneLayout, MAX_PLANES> = ArrayVec::new();
    match format {
        PixelFormat::Nv12 => {
            planes.push(PlaneLayout { width: w, height: h, stride: stride_of(0, w) });
            planes.push(PlaneLayout { width: cw, height: ch, stride: stride_of(1, (w + 1) & !1) });
        }
        PixelFormat::Yuv420p => {
            planes.push(PlaneLayout { width: w, height: h, stride: stride_of(0, w) });
            planes.push(PlaneLayout { width: cw, height: ch, stride: stride_of(1, cw) });
            planes.push(PlaneLayout { width: cw, height: ch, stride: stride_of(2, cw) });
        }
        PixelFormat::P010Le => {
            planes.push(PlaneLayout { width: w, height: h, stride: stride_of(0, (w * 2 + 63) & !63) });
            planes.push(PlaneLayout { width: cw, height: ch, stride: stride_of(1, (cw + 63) & !63) });
        }
        PixelFormat::HardwareOpaque => {
            return Err(ConvertError::UnsupportedFormat { format, color_range: None });
        }
    }

    let mut contiguous_size = 0usize;
    for (i, plane) in planes.iter().enumerate() {
        if let Some(src) = source {
            if i + 1 < planes.len() {
                let gap = match (src.get(i), src.get(i + 1)) {
                    (Some(cur), Some(next)) => {
                        cur.data.as_ptr() as usize + plane.stride * plane.height
                            != next.data.as_ptr() as usize
                    }
                    _ => true,
                };
                if gap {
                    contiguous_size = 0;
                    break;
                }
            }
        }
        contiguous_size += plane.stride * plane.height;
    }

    Ok(FrameLayout { planes, contiguous_size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chroma_planes_round_up() {
        let layout = plan_layout(PixelFormat::Yuv420p, 3, 3, None).unwrap();
        assert_eq!(layout.planes.len(), 3);
        assert_eq!(layout.planes[0].width, 3);
        assert_eq!(layout.planes[0].height, 3);
        // Odd dimensions round up, so 3x3 chroma is 2x2, not 1x1.
        assert_eq!(layout.planes[1].width, 2);
        assert_eq!(layout.planes[1].height, 2);
        assert_eq!(layout.planes[2].width, 2);
        assert_eq!(layout.planes[2].height, 2);
    }

    #[test]
    fn chroma_dims_for_all_formats() {
        for format in [PixelFormat::Nv12, PixelFormat::Yuv420p, PixelFormat::P010Le] {
            let layout = plan_layout(format, 1920, 1080, None).unwrap();
            for chroma in &layout.planes[1..] {
                assert_eq!(chroma.width, 960, "{format:?}");
                assert_eq!(chroma.height, 540, "{format:?}");
            }
        }
    }

    #[test]
    fn plane_counts() {
        assert_eq!(plan_layout(PixelFormat::Nv12, 64, 64, None).unwrap().planes.len(), 2);
        assert_eq!(plan_layout(PixelFormat::Yuv420p, 64, 64, None).unwrap().planes.len(), 3);
        assert_eq!(plan_layout(PixelFormat::P010Le, 64, 64, None).unwrap().planes.len(), 2);
    }

    #[test]
    fn default_strides_nv12_odd_width() {
        let layout = plan_layout(PixelFormat::Nv12, 33, 33, None).unwrap();
        assert_eq!(layout.planes[0].stride, 33);
        // Chroma rows are even-aligned.
        assert_eq!(layout.planes[1].stride, 34);
    }

    #[test]
    fn default_strides_p010_are_64_byte_aligned() {
        let layout = plan_layout(PixelFormat::P010Le, 100, 100, None).unwrap();
        assert_eq!(layout.planes[0].stride, 256); // 100 * 2 rounded up
        assert_eq!(layout.planes[1].stride, 64);
        assert_eq!(layout.planes[0].stride % 64, 0);
        assert_eq!(layout.planes[1].stride % 64, 0);
    }

    #[test]
    fn source_strides_used_verbatim() {
        let luma = vec![0u8; 2048 * 4];
        let chroma = vec![0u8; 2048 * 2];
        let planes = [
            SourcePlane { data: &luma, stride: 2048 },
            SourcePlane { data: &chroma, stride: 2048 },
        ];
        let layout = plan_layout(PixelFormat::Nv12, 4, 4, Some(&planes)).unwrap();
        assert_eq!(layout.planes[0].stride, 2048);
        assert_eq!(layout.planes[1].stride, 2048);
    }

    #[test]
    fn contiguous_size_of_adjacent_planes() {
        // One backing allocation, chroma plane starting right after the luma plane.
        let backing = vec![0u8; 4 * 4 + 4 * 2];
        let (luma, chroma) = backing.split_at(4 * 4);
        let planes = [
            SourcePlane { data: luma, stride: 4 },
            SourcePlane { data: chroma, stride: 4 },
        ];
        let layout = plan_layout(PixelFormat::Nv12, 4, 4, Some(&planes)).unwrap();
        assert_eq!(layout.contiguous_size, 4 * 4 + 4 * 2);
    }

    #[test]
    fn gap_between_planes_resets_contiguous_size() {
        let backing = vec![0u8; 1024];
        let planes = [
            SourcePlane { data: &backing[0..16], stride: 4 },
            // Not where the first plane ends.
            SourcePlane { data: &backing[128..136], stride: 4 },
        ];
        let layout = plan_layout(PixelFormat::Nv12, 4, 4, Some(&planes)).unwrap();
        assert_eq!(layout.contiguous_size, 0);
    }

    #[test]
    fn geometry_only_path_reports_plain_sum() {
        let layout = plan_layout(PixelFormat::Nv12, 4, 4, None).unwrap();
        assert_eq!(layout.contiguous_size, 4 * 4 + 4 * 2);
    }

    #[test]
    fn hardware_opaque_has_no_layout() {
        assert!(matches!(
            plan_layout(PixelFormat::HardwareOpaque, 64, 64, None),
            Err(ConvertError::UnsupportedFormat { .. })
        ));
    }
}
