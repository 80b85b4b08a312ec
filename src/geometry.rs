/// Viewport geometry for the scrolling grid
///
/// Pure math module: the difference between two successive viewport
/// rectangles tells the cache exactly which bands of the grid were newly
/// exposed and newly hidden, so caching decisions never have to be recomputed
/// from scratch. No shared state, safe to call from any thread.

/// Axis-aligned rectangle in UI-space units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    /// The empty rectangle, used as the "no previous viewport" baseline
    pub const EMPTY: ViewportRect = ViewportRect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a rectangle. Negative dimensions are a caller bug and panic.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        if width < 0.0 || height < 0.0 || !width.is_finite() || !height.is_finite() {
            panic!("malformed rectangle: {}x{}", width, height);
        }
        ViewportRect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// A rectangle with no area; intersects nothing, covers no cells
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn intersects(&self, other: &ViewportRect) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// Grow vertically by `dy` on each side, keeping x and width.
    /// This is the pre-heat margin: the cache works on a taller rectangle
    /// than what is actually on screen.
    pub fn inflated_vertically(&self, dy: f32) -> Self {
        ViewportRect {
            x: self.x,
            y: self.y - dy,
            width: self.width,
            height: self.height + 2.0 * dy,
        }
    }
}

/// Regions newly exposed and newly hidden by a viewport move; transient,
/// consumed immediately by the prefetcher
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionDelta {
    pub exposed: Vec<ViewportRect>,
    pub hidden: Vec<ViewportRect>,
}

/// Difference between the previous and current viewport.
///
/// When the rectangles do not intersect there is no overlap to exploit and the
/// swap is total: the whole current rect is exposed, the whole previous rect
/// is hidden. Otherwise only the vertical extents are compared (scrolling is
/// vertical); the four checks are independent, so zero, one, or two bands can
/// land in each set. Bands take the current rect's x and width.
pub fn diff(previous: ViewportRect, current: ViewportRect) -> RegionDelta {
    if !current.intersects(&previous) {
        return RegionDelta {
            exposed: vec![current],
            hidden: vec![previous],
        };
    }

    let old_min_y = previous.min_y();
    let old_max_y = previous.max_y();
    let new_min_y = current.min_y();
    let new_max_y = current.max_y();

    let mut delta = RegionDelta::default();

    if new_max_y > old_max_y {
        delta.exposed.push(ViewportRect::new(
            current.x,
            old_max_y,
            current.width,
            new_max_y - old_max_y,
        ));
    }
    if old_min_y > new_min_y {
        delta.exposed.push(ViewportRect::new(
            current.x,
            new_min_y,
            current.width,
            old_min_y - new_min_y,
        ));
    }
    if new_max_y < old_max_y {
        delta.hidden.push(ViewportRect::new(
            current.x,
            new_max_y,
            current.width,
            old_max_y - new_max_y,
        ));
    }
    if old_min_y < new_min_y {
        delta.hidden.push(ViewportRect::new(
            current.x,
            old_min_y,
            current.width,
            new_min_y - old_min_y,
        ));
    }

    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_rects_swap_wholesale() {
        let a = ViewportRect::new(0.0, 0.0, 100.0, 200.0);
        let b = ViewportRect::new(0.0, 1000.0, 100.0, 200.0);

        let delta = diff(a, b);
        assert_eq!(delta.exposed, vec![b]);
        assert_eq!(delta.hidden, vec![a]);
    }

    #[test]
    fn test_empty_previous_swaps_wholesale() {
        let current = ViewportRect::new(0.0, 0.0, 100.0, 200.0);

        let delta = diff(ViewportRect::EMPTY, current);
        assert_eq!(delta.exposed, vec![current]);
        assert_eq!(delta.hidden, vec![ViewportRect::EMPTY]);
    }

    #[test]
    fn test_scroll_down_exposes_bottom_band_hides_top_band() {
        let previous = ViewportRect::new(0.0, 0.0, 100.0, 200.0);
        let current = ViewportRect::new(0.0, 50.0, 100.0, 200.0);

        let delta = diff(previous, current);
        assert_eq!(
            delta.exposed,
            vec![ViewportRect::new(0.0, 200.0, 100.0, 50.0)]
        );
        assert_eq!(delta.hidden, vec![ViewportRect::new(0.0, 0.0, 100.0, 50.0)]);
    }

    #[test]
    fn test_growing_rect_exposes_both_bands() {
        let previous = ViewportRect::new(0.0, 100.0, 100.0, 100.0);
        let current = ViewportRect::new(0.0, 50.0, 100.0, 200.0);

        let delta = diff(previous, current);
        assert_eq!(delta.hidden, vec![]);
        assert_eq!(
            delta.exposed,
            vec![
                ViewportRect::new(0.0, 200.0, 100.0, 50.0),
                ViewportRect::new(0.0, 50.0, 100.0, 50.0),
            ]
        );

        let exposed_area: f32 = delta.exposed.iter().map(|r| r.width * r.height).sum();
        let area = |r: &ViewportRect| r.width * r.height;
        assert_eq!(exposed_area, area(&current) - area(&previous));
    }

    #[test]
    fn test_identical_rects_produce_nothing() {
        let rect = ViewportRect::new(0.0, 40.0, 100.0, 300.0);

        let delta = diff(rect, rect);
        assert!(delta.exposed.is_empty());
        assert!(delta.hidden.is_empty());
    }

    #[test]
    fn test_inflation_keeps_midpoint() {
        let rect = ViewportRect::new(0.0, 100.0, 100.0, 200.0);
        let inflated = rect.inflated_vertically(100.0);

        assert_eq!(inflated.mid_y(), rect.mid_y());
        assert_eq!(inflated.min_y(), 0.0);
        assert_eq!(inflated.max_y(), 400.0);
        assert_eq!(inflated.x, rect.x);
        assert_eq!(inflated.width, rect.width);
    }

    #[test]
    #[should_panic(expected = "malformed rectangle")]
    fn test_negative_dimensions_panic() {
        ViewportRect::new(0.0, 0.0, -1.0, 10.0);
    }
}
