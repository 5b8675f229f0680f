use image::GrayImage;
use imageproc::contours::{find_contours, Contour};
use imageproc::point::Point;

use crate::config::ExtractionConfig;
use crate::models::BoundingBox;

/// Find photo-sized regions in a binary mask.
///
/// Only outermost contours are considered (contours nested inside another
/// blob are skipped), each reduced to its axis-aligned bounding rectangle.
/// Rectangles outside the configured area or aspect-ratio bounds are
/// rejected. Survivors come back sorted by `(y, x)` for a stable reading
/// order. An all-black or all-white mask yields an empty list, not an error.
pub fn filter_photo_regions(mask: &GrayImage, config: &ExtractionConfig) -> Vec<BoundingBox> {
    let contours: Vec<Contour<i32>> = find_contours(mask);

    let mut boxes: Vec<BoundingBox> = contours
        .iter()
        .filter(|c| c.parent.is_none())
        .filter_map(|c| bounding_box(&c.points))
        .filter(|b| accepts(b, config))
        .collect();

    boxes.sort_by_key(|b| (b.y, b.x));
    boxes
}

/// Acceptance test for one rectangle. Both area bounds and both aspect-ratio
/// bounds are exclusive; a rectangle sitting exactly on a limit is rejected.
pub fn accepts(rect: &BoundingBox, config: &ExtractionConfig) -> bool {
    if rect.h == 0 {
        return false;
    }
    let area = rect.area();
    let aspect = rect.aspect_ratio();
    area > config.min_area
        && area < config.max_area
        && aspect > config.min_aspect_ratio
        && aspect < config.max_aspect_ratio
}

/// Axis-aligned bounding box of a contour's point set.
fn bounding_box(points: &[Point<i32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BoundingBox::new(
        min_x as u32,
        min_y as u32,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    ))
}
