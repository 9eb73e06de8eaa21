//! Finished drawing: visible segments mapped onto an output page.

use crate::math::Point2;

/// One visible line segment in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnEdge {
    pub start: Point2,
    pub end: Point2,
}

/// Output page geometry and plotting limits.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    /// Blank border kept around the drawing on every side.
    pub margin: f64,
    /// Maximum segments per emitted path chunk.
    pub max_path_segments: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            margin: 50.0,
            max_path_segments: 1500,
        }
    }
}

impl PageLayout {
    /// Mapper from the view window `[-aspect, aspect] x [-1, 1]` onto the
    /// page, centered and uniformly scaled to preserve aspect ratio.
    pub(crate) fn mapper(&self, aspect: f64) -> PageMapper {
        let usable_w = (self.width - 2.0 * self.margin).max(0.0);
        let usable_h = (self.height - 2.0 * self.margin).max(0.0);
        let half_w = if aspect > 0.0 { aspect } else { 1.0 };
        let scale = (usable_w / (2.0 * half_w)).min(usable_h / 2.0);
        PageMapper {
            scale,
            center: Point2::new(self.width / 2.0, self.height / 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PageMapper {
    scale: f64,
    center: Point2,
}

impl PageMapper {
    pub(crate) fn map(&self, p: Point2) -> Point2 {
        Point2::new(
            self.center.x + p.x * self.scale,
            self.center.y + p.y * self.scale,
        )
    }
}

/// The visible segments of one rendered scene.
#[derive(Debug, Clone)]
pub struct Drawing {
    edges: Vec<DrawnEdge>,
}

impl Drawing {
    pub(crate) fn new(edges: Vec<DrawnEdge>) -> Self {
        Self { edges }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All visible segments, in emission order.
    #[must_use]
    pub fn edges(&self) -> &[DrawnEdge] {
        &self.edges
    }

    /// Segments chunked into plotter paths of at most `limit` segments,
    /// restarting the path once the page limit is reached.
    pub fn paths(&self, limit: usize) -> impl Iterator<Item = &[DrawnEdge]> {
        self.edges.chunks(limit.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_corners_map_inside_the_margin() {
        let layout = PageLayout::default();
        let mapper = layout.mapper(2.0);
        let corner = mapper.map(Point2::new(2.0, 1.0));
        assert!(corner.x <= layout.width - layout.margin + 1e-9);
        assert!(corner.y <= layout.height - layout.margin + 1e-9);
        let center = mapper.map(Point2::new(0.0, 0.0));
        assert!((center.x - 500.0).abs() < 1e-12);
        assert!((center.y - 500.0).abs() < 1e-12);
    }

    #[test]
    fn mapping_is_uniform_in_x_and_y() {
        let mapper = PageLayout::default().mapper(2.0);
        let a = mapper.map(Point2::new(1.0, 0.0));
        let b = mapper.map(Point2::new(0.0, 1.0));
        assert!((a.x - 500.0 - (b.y - 500.0)).abs() < 1e-12);
    }

    #[test]
    fn paths_chunk_at_the_limit() {
        let edge = DrawnEdge {
            start: Point2::new(0.0, 0.0),
            end: Point2::new(1.0, 1.0),
        };
        let drawing = Drawing::new(vec![edge; 7]);
        let sizes: Vec<usize> = drawing.paths(3).map(<[DrawnEdge]>::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }
}
