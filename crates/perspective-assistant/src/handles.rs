use nalgebra::Point2;
use perspective_core::{bounds, midpoint, segments_cross, Homography};

/// Which handle (by index) sits at each corner of the quad on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerRoles {
    pub top_left: usize,
    pub top_right: usize,
    pub bottom_left: usize,
    pub bottom_right: usize,
}

impl CornerRoles {
    fn diagonal(&self, a: usize, b: usize) -> bool {
        let pair = |x: usize, y: usize| (x == a && y == b) || (x == b && y == a);
        pair(self.top_left, self.bottom_right) || pair(self.top_right, self.bottom_left)
    }

    /// Indices in `[top_left, top_right, bottom_left, bottom_right]` order.
    pub fn as_array(&self) -> [usize; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }
}

/// Midpoints of the four sides, derived from [`CornerRoles`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SideHandles {
    pub top: Point2<f64>,
    pub bottom: Point2<f64>,
    pub left: Point2<f64>,
    pub right: Point2<f64>,
}

/// Index of the handle diagonally opposite handle 0.
///
/// The diagonals of a quad are the one pairing whose segments cross.
fn opposite_of_first(h: &[Point2<f64>; 4]) -> usize {
    if segments_cross(h[0], h[1], h[2], h[3]) {
        1
    } else if segments_cross(h[0], h[2], h[1], h[3]) {
        2
    } else {
        3
    }
}

/// Sort four handles into screen corners.
///
/// Rows first: the two highest handles form the top edge, each row ordered
/// by x. If that places handle 0 and its true opposite on the same side,
/// the quad is leaning too far for rows; columns by x, each ordered by y,
/// are used instead.
pub fn corner_roles(h: &[Point2<f64>; 4]) -> CornerRoles {
    let opposite = opposite_of_first(h);

    let mut by_y = [0, 1, 2, 3];
    by_y.sort_by(|&a, &b| h[a].y.total_cmp(&h[b].y));
    let mut by_x = [0, 1, 2, 3];
    by_x.sort_by(|&a, &b| h[a].x.total_cmp(&h[b].x));

    let ordered_x = |a: usize, b: usize| if h[a].x > h[b].x { (b, a) } else { (a, b) };
    let (top_left, top_right) = ordered_x(by_y[0], by_y[1]);
    let (bottom_left, bottom_right) = ordered_x(by_y[2], by_y[3]);
    let rows = CornerRoles {
        top_left,
        top_right,
        bottom_left,
        bottom_right,
    };
    if rows.diagonal(0, opposite) {
        return rows;
    }

    let ordered_y = |a: usize, b: usize| if h[a].y > h[b].y { (b, a) } else { (a, b) };
    let (top_left, bottom_left) = ordered_y(by_x[0], by_x[1]);
    let (top_right, bottom_right) = ordered_y(by_x[2], by_x[3]);
    CornerRoles {
        top_left,
        top_right,
        bottom_left,
        bottom_right,
    }
}

pub fn side_handles(h: &[Point2<f64>; 4], roles: &CornerRoles) -> SideHandles {
    let [tl, tr, bl, br] = roles.as_array().map(|i| h[i]);
    SideHandles {
        top: midpoint(tl, tr),
        bottom: midpoint(bl, br),
        left: midpoint(tl, bl),
        right: midpoint(tr, br),
    }
}

/// First corner (top-left, top-right, bottom-left, bottom-right) whose
/// `handle_size` square, in widget space, contains `widget_point`.
pub fn closest_corner_handle(
    h: &[Point2<f64>; 4],
    widget_point: Point2<f64>,
    to_widget: &Homography,
    handle_size: f64,
) -> Option<usize> {
    let half = handle_size * 0.5;
    corner_roles(h).as_array().into_iter().find(|&i| {
        let p = to_widget.apply(h[i]);
        (widget_point.x - p.x).abs() <= half && (widget_point.y - p.y).abs() <= half
    })
}

/// Handles' bounding box grown by 2 units on every side.
pub fn bounding_rect(handles: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let (lo, hi) = bounds(handles)?;
    Some((
        Point2::new(lo.x - 2.0, lo.y - 2.0),
        Point2::new(hi.x + 2.0, hi.y + 2.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: [(f64, f64); 4]) -> [Point2<f64>; 4] {
        raw.map(|(x, y)| Point2::new(x, y))
    }

    #[test]
    fn roles_of_a_shuffled_square() {
        let h = pts([(100.0, 100.0), (0.0, 0.0), (0.0, 100.0), (100.0, 0.0)]);
        let roles = corner_roles(&h);
        assert_eq!(
            roles,
            CornerRoles {
                top_left: 1,
                top_right: 3,
                bottom_left: 2,
                bottom_right: 0,
            }
        );
    }

    #[test]
    fn steep_quad_falls_back_to_columns() {
        // Thin strip along the anti-diagonal: rows put handles 0 and 2 both
        // on the left.
        let h = pts([(100.0, 0.0), (110.0, 10.0), (0.0, 100.0), (5.0, 80.0)]);
        let roles = corner_roles(&h);
        assert!(roles.diagonal(0, 2));
        assert_eq!(
            roles,
            CornerRoles {
                top_left: 3,
                top_right: 0,
                bottom_left: 2,
                bottom_right: 1,
            }
        );
    }

    #[test]
    fn side_midpoints() {
        let h = pts([(0.0, 0.0), (10.0, 0.0), (10.0, 20.0), (0.0, 20.0)]);
        let sides = side_handles(&h, &corner_roles(&h));
        assert_eq!(sides.top, Point2::new(5.0, 0.0));
        assert_eq!(sides.bottom, Point2::new(5.0, 20.0));
        assert_eq!(sides.left, Point2::new(0.0, 10.0));
        assert_eq!(sides.right, Point2::new(10.0, 10.0));
    }

    #[test]
    fn picks_corner_in_widget_space() {
        let h = pts([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let to_widget = Homography::scale_translate(4.0, 0.0, 0.0);
        assert_eq!(
            closest_corner_handle(&h, Point2::new(43.0, 37.0), &to_widget, 16.0),
            Some(2)
        );
        assert_eq!(
            closest_corner_handle(&h, Point2::new(20.0, 20.0), &to_widget, 16.0),
            None
        );
    }

    #[test]
    fn bounding_rect_is_padded() {
        let h = pts([(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0)]);
        let (lo, hi) = bounding_rect(&h).expect("bounds");
        assert_eq!(lo, Point2::new(-2.0, -2.0));
        assert_eq!(hi, Point2::new(12.0, 7.0));
    }
}
