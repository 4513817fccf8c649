//! Pure placement calculations for a strip of images.
//!
//! All functions here are pure and testable without any I/O or pixel data:
//! they only see intrinsic sizes, the layout mode and the cross-axis size.

use crate::types::{LayoutMode, Size};
use serde::Serialize;

/// Draw rectangle for one image in one render pass, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Position of the image in the rendered sequence.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer pixel rectangle a placement covers once rasterised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Extent along the packing direction.
    pub fn main_extent(&self, mode: LayoutMode) -> f64 {
        match mode {
            LayoutMode::Horizontal => self.width,
            LayoutMode::Vertical => self.height,
        }
    }

    /// Offset along the packing direction.
    pub fn main_offset(&self, mode: LayoutMode) -> f64 {
        match mode {
            LayoutMode::Horizontal => self.x,
            LayoutMode::Vertical => self.y,
        }
    }

    /// Snap to whole pixels.
    ///
    /// Both edges are rounded independently, so two placements that share an
    /// edge in `f64` also share it in pixels: no gap and no overlap.
    pub fn pixel_rect(&self) -> PixelRect {
        let x0 = self.x.round() as u32;
        let y0 = self.y.round() as u32;
        let x1 = (self.x + self.width).round() as u32;
        let y1 = (self.y + self.height).round() as u32;
        PixelRect {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

/// Result of laying out one image sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub mode: LayoutMode,
    /// Shared cross-axis size every image was scaled to.
    pub cross_axis: u32,
    /// One entry per image that contributed, in sequence order.
    pub placements: Vec<Placement>,
    /// Sum of all placements' main-axis extents.
    pub main_extent: f64,
}

impl Layout {
    /// Surface dimensions needed to hold every placement without clipping.
    ///
    /// The main axis is rounded up so a fractional last image is never cut off.
    /// Returns `None` when that does not fit in a `u32`.
    pub fn surface_size(&self) -> Option<Size> {
        let main = self.main_extent.ceil();
        if !(0.0..=f64::from(u32::MAX)).contains(&main) {
            return None;
        }
        Some(Size::from_axes(self.mode, self.cross_axis, main as u32))
    }
}

/// Main-axis extent of an image scaled so its cross axis equals `cross_axis`.
///
/// Returns `None` for images with a zero intrinsic dimension; those cannot be
/// scaled proportionally.
pub fn scaled_main_extent(intrinsic: Size, mode: LayoutMode, cross_axis: u32) -> Option<f64> {
    if intrinsic.is_degenerate() {
        return None;
    }
    let main = intrinsic.main_axis(mode) as f64;
    let cross = intrinsic.cross_axis(mode) as f64;
    Some(main * cross_axis as f64 / cross)
}

/// Lay out images as one contiguous row (horizontal) or column (vertical).
///
/// Each image is scaled proportionally so its cross axis equals `cross_axis`.
/// Images are packed from offset 0 with no gaps; the cross-axis position is
/// always 0. Images with a zero intrinsic dimension are skipped and add
/// nothing to [`Layout::main_extent`].
///
/// # Examples
/// ```
/// # use stitchstrip::compositing::compute_layout;
/// # use stitchstrip::{LayoutMode, Size};
/// let layout = compute_layout(
///     [Size::new(800, 600), Size::new(400, 200)],
///     LayoutMode::Horizontal,
///     300,
/// );
/// assert_eq!(layout.main_extent, 1000.0);
/// assert_eq!(layout.placements[1].x, 400.0);
/// assert_eq!(layout.surface_size(), Some(Size::new(1000, 300)));
/// ```
pub fn compute_layout<I>(intrinsics: I, mode: LayoutMode, cross_axis: u32) -> Layout
where
    I: IntoIterator<Item = Size>,
{
    let cross = cross_axis as f64;
    let mut offset = 0.0;
    let mut placements = Vec::new();

    for (index, intrinsic) in intrinsics.into_iter().enumerate() {
        let Some(extent) = scaled_main_extent(intrinsic, mode, cross_axis) else {
            continue;
        };
        let placement = match mode {
            LayoutMode::Horizontal => Placement {
                index,
                x: offset,
                y: 0.0,
                width: extent,
                height: cross,
            },
            LayoutMode::Vertical => Placement {
                index,
                x: 0.0,
                y: offset,
                width: cross,
                height: extent,
            },
        };
        placements.push(placement);
        offset += extent;
    }

    Layout {
        mode,
        cross_axis,
        placements,
        main_extent: offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn two_images() -> [Size; 2] {
        [Size::new(800, 600), Size::new(400, 200)]
    }

    // =========================================================================
    // scaled_main_extent tests
    // =========================================================================

    #[test]
    fn extent_scales_width_to_height() {
        // 800x600 at height 300 → 400 wide
        let extent = scaled_main_extent(Size::new(800, 600), LayoutMode::Horizontal, 300);
        assert_eq!(extent, Some(400.0));
    }

    #[test]
    fn extent_scales_height_to_width() {
        // 400x200 at width 400 → 200 tall
        let extent = scaled_main_extent(Size::new(400, 200), LayoutMode::Vertical, 400);
        assert_eq!(extent, Some(200.0));
    }

    #[test]
    fn extent_rejects_zero_dimensions() {
        assert_eq!(scaled_main_extent(Size::new(0, 600), LayoutMode::Horizontal, 300), None);
        assert_eq!(scaled_main_extent(Size::new(800, 0), LayoutMode::Vertical, 300), None);
    }

    // =========================================================================
    // compute_layout tests
    // =========================================================================

    #[test]
    fn horizontal_scenario() {
        let layout = compute_layout(two_images(), LayoutMode::Horizontal, 300);

        assert_eq!(layout.cross_axis, 300);
        assert_eq!(layout.main_extent, 1000.0);
        assert_eq!(layout.surface_size(), Some(Size::new(1000, 300)));
        assert_eq!(
            layout.placements,
            vec![
                Placement { index: 0, x: 0.0, y: 0.0, width: 400.0, height: 300.0 },
                Placement { index: 1, x: 400.0, y: 0.0, width: 600.0, height: 300.0 },
            ]
        );
    }

    #[test]
    fn vertical_scenario() {
        let layout = compute_layout(two_images(), LayoutMode::Vertical, 400);

        assert_eq!(layout.surface_size(), Some(Size::new(400, 500)));
        assert_eq!(
            layout.placements,
            vec![
                Placement { index: 0, x: 0.0, y: 0.0, width: 400.0, height: 300.0 },
                Placement { index: 1, x: 0.0, y: 300.0, width: 400.0, height: 200.0 },
            ]
        );
    }

    #[test]
    fn empty_input_has_no_extent() {
        let layout = compute_layout([], LayoutMode::Horizontal, 300);
        assert!(layout.placements.is_empty());
        assert_eq!(layout.main_extent, 0.0);
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        let sizes = [Size::new(1234, 567), Size::new(3, 7), Size::new(640, 480)];
        for mode in [LayoutMode::Horizontal, LayoutMode::Vertical] {
            let layout = compute_layout(sizes, mode, 333);
            for p in &layout.placements {
                let intrinsic = sizes[p.index];
                let placed = p.width / p.height;
                let original = intrinsic.width as f64 / intrinsic.height as f64;
                assert!((placed - original).abs() < EPS, "{mode}: {placed} vs {original}");
            }
        }
    }

    #[test]
    fn placements_are_packed_contiguously() {
        let sizes = [Size::new(10, 30), Size::new(25, 7), Size::new(99, 13), Size::new(1, 1)];
        let layout = compute_layout(sizes, LayoutMode::Horizontal, 120);

        let mut running = 0.0;
        for p in &layout.placements {
            assert!((p.x - running).abs() < EPS);
            assert_eq!(p.y, 0.0);
            running += p.width;
        }
        assert!((layout.main_extent - running).abs() < EPS);
    }

    #[test]
    fn degenerate_image_is_skipped() {
        let sizes = [Size::new(800, 600), Size::new(0, 0), Size::new(400, 200)];
        let layout = compute_layout(sizes, LayoutMode::Horizontal, 300);

        let indices: Vec<usize> = layout.placements.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(layout.placements[1].x, 400.0);
        assert_eq!(layout.main_extent, 1000.0);
    }

    #[test]
    fn fractional_extent_rounds_surface_up() {
        // 100x300 at height 100 → 33.33 wide
        let layout = compute_layout([Size::new(100, 300)], LayoutMode::Horizontal, 100);
        assert_eq!(layout.surface_size(), Some(Size::new(34, 100)));
    }

    #[test]
    fn main_axis_beyond_u32_has_no_surface_size() {
        // 70000x1 at height 70000 → 4.9e9 wide
        let layout = compute_layout([Size::new(70_000, 1)], LayoutMode::Horizontal, 70_000);
        assert_eq!(layout.main_extent, 4_900_000_000.0);
        assert_eq!(layout.surface_size(), None);
    }

    #[test]
    fn main_axis_at_u32_max_still_fits() {
        let layout = compute_layout([Size::new(u32::MAX, 1)], LayoutMode::Horizontal, 1);
        assert_eq!(layout.surface_size(), Some(Size::new(u32::MAX, 1)));
    }

    // =========================================================================
    // pixel_rect tests
    // =========================================================================

    #[test]
    fn adjacent_pixel_rects_share_edges() {
        let sizes = [Size::new(100, 300), Size::new(100, 300), Size::new(100, 300)];
        let layout = compute_layout(sizes, LayoutMode::Horizontal, 100);
        let rects: Vec<PixelRect> = layout.placements.iter().map(|p| p.pixel_rect()).collect();

        for pair in rects.windows(2) {
            assert_eq!(pair[0].x + pair[0].width, pair[1].x);
        }
        let last = rects.last().unwrap();
        assert_eq!(last.x + last.width, 100);
    }

    #[test]
    fn pixel_rect_of_whole_numbers_is_exact() {
        let p = Placement { index: 0, x: 400.0, y: 0.0, width: 600.0, height: 300.0 };
        assert_eq!(p.pixel_rect(), PixelRect { x: 400, y: 0, width: 600, height: 300 });
    }
}
