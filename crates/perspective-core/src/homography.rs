use nalgebra::{Matrix2, Matrix3, Point2, SMatrix, SVector, Vector3};

/// Corners of the unit square in the order the assistants walk a quad:
/// `(0,0) -> (1,0) -> (1,1) -> (0,1)`.
pub const UNIT_SQUARE: [Point2<f64>; 4] = [
    Point2::new(0.0, 0.0),
    Point2::new(1.0, 0.0),
    Point2::new(1.0, 1.0),
    Point2::new(0.0, 1.0),
];

/// Planar projective transform, `p' ~ H * p` with column vectors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    /// Affine map `p' = s * p + t`, the usual shape of a device-to-widget transform.
    pub fn scale_translate(scale: f64, tx: f64, ty: f64) -> Self {
        Self::new(Matrix3::new(
            scale, 0.0, tx, //
            0.0, scale, ty, //
            0.0, 0.0, 1.0,
        ))
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    /// Homogeneous `w` of `p`; zero means `p` maps to the line at infinity.
    #[inline]
    pub fn denominator(&self, p: Point2<f64>) -> f64 {
        self.h[(2, 0)] * p.x + self.h[(2, 1)] * p.y + self.h[(2, 2)]
    }

    #[inline]
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        Point2::new(v[0] / w, v[1] / w)
    }

    /// Partial derivatives of the map at `p`, columns `d/dx` and `d/dy`.
    ///
    /// With `(X, Y, W) = H * (x, y, 1)`:
    /// `dX'/dx = (h00 * W - h20 * X) / W^2`, and likewise for the others.
    pub fn jacobian(&self, p: Point2<f64>) -> Matrix2<f64> {
        let h = &self.h;
        let v = h * Vector3::new(p.x, p.y, 1.0);
        let (x, y, w) = (v[0], v[1], v[2]);
        let w2 = w * w;
        Matrix2::new(
            (h[(0, 0)] * w - h[(2, 0)] * x) / w2,
            (h[(0, 1)] * w - h[(2, 1)] * x) / w2,
            (h[(1, 0)] * w - h[(2, 0)] * y) / w2,
            (h[(1, 1)] * w - h[(2, 1)] * y) / w2,
        )
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }

    /// `other` applied after `self`.
    pub fn then(&self, other: &Homography) -> Self {
        Self::new(other.h * self.h)
    }

    pub fn is_finite(&self) -> bool {
        self.h.iter().all(|v| v.is_finite())
    }
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > 1e-12 {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

/// Translate the centroid to the origin and scale the mean distance to sqrt(2).
fn normalize_points4(pts: &[Point2<f64>; 4]) -> ([Point2<f64>; 4], Matrix3<f64>) {
    let cx = pts.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = pts.iter().map(|p| p.y).sum::<f64>() / 4.0;
    let mean_dist = pts
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / 4.0;

    let t = hartley_normalization(cx, cy, mean_dist);
    let out = pts.map(|p| {
        let v = t * Vector3::new(p.x, p.y, 1.0);
        Point2::new(v[0], v[1])
    });
    (out, t)
}

/// Any three of four normalised points (nearly) on one line.
fn has_collinear_triple(pts: &[Point2<f64>; 4]) -> bool {
    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    TRIPLES.iter().any(|&[i, j, k]| {
        let area = (pts[j] - pts[i]).perp(&(pts[k] - pts[i]));
        area.abs() < 1e-10
    })
}

fn normalize_homography(h: Matrix3<f64>) -> Option<Matrix3<f64>> {
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(h / s)
}

/// Compute H such that `dst ~ H * src`, from exactly four correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Returns `None`
/// when the system is singular (three collinear points, repeated points)
/// or the solution is not finite.
pub fn homography_from_4pt(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> Option<Homography> {
    // Unknowns: [h11 h12 h13 h21 h22 h23 h31 h32], with h33 = 1
    // h11 x + h12 y + h13 - u h31 x - u h32 y = u
    // h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let (src_n, t_src) = normalize_points4(src);
    let (dst_n, t_dst) = normalize_points4(dst);
    if has_collinear_triple(&src_n) || has_collinear_triple(&dst_n) {
        return None;
    }

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let (x, y) = (src_n[k].x, src_n[k].y);
        let (u, v) = (dst_n[k].x, dst_n[k].y);

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b)?;

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    // H = T_dst^-1 * Hn * T_src
    let h = t_dst.try_inverse()? * hn * t_src;
    let h = Homography::new(normalize_homography(h)?);
    h.is_finite().then_some(h)
}

/// Transform taking [`UNIT_SQUARE`] onto `quad`, corner by corner.
pub fn square_to_quad(quad: &[Point2<f64>; 4]) -> Option<Homography> {
    homography_from_4pt(&UNIT_SQUARE, quad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point2<f64>, b: Point2<f64>, tol: f64) {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.6},{:.6}) ~ ({:.6},{:.6}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn inverse_round_trips_points() {
        let h = Homography::new(Matrix3::new(
            1.2, 0.1, 5.0, //
            -0.05, 0.9, 3.0, //
            0.001, 0.0005, 1.0,
        ));
        let inv = h.inverse().expect("invertible");

        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(50.0, -20.0),
            Point2::new(320.0, 200.0),
        ] {
            assert_close(inv.apply(h.apply(p)), p, 1e-9);
        }
    }

    #[test]
    fn square_to_quad_hits_every_corner() {
        let quad = [
            Point2::new(10.0, 20.0),
            Point2::new(210.0, 40.0),
            Point2::new(190.0, 180.0),
            Point2::new(30.0, 150.0),
        ];
        let h = square_to_quad(&quad).expect("fit");
        for (s, q) in UNIT_SQUARE.iter().zip(quad.iter()) {
            assert_close(h.apply(*s), *q, 1e-9);
        }

        let inv = h.inverse().expect("invertible");
        let c = Point2::new(0.5, 0.5);
        assert_close(inv.apply(h.apply(c)), c, 1e-12);
    }

    #[test]
    fn collinear_corners_do_not_fit() {
        let quad = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
        ];
        assert!(square_to_quad(&quad).is_none());
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let h = Homography::new(Matrix3::new(
            80.0, 5.0, 10.0, //
            -3.0, 95.0, 20.0, //
            0.3, -0.2, 1.0,
        ));
        let p = Point2::new(0.3, 0.6);
        let j = h.jacobian(p);
        let eps = 1e-6;
        let dx = (h.apply(Point2::new(p.x + eps, p.y)) - h.apply(p)) / eps;
        let dy = (h.apply(Point2::new(p.x, p.y + eps)) - h.apply(p)) / eps;
        assert!((j[(0, 0)] - dx.x).abs() < 1e-3);
        assert!((j[(1, 0)] - dx.y).abs() < 1e-3);
        assert!((j[(0, 1)] - dy.x).abs() < 1e-3);
        assert!((j[(1, 1)] - dy.y).abs() < 1e-3);
    }

    #[test]
    fn composition_applies_in_order() {
        let a = Homography::scale_translate(2.0, 1.0, 0.0);
        let b = Homography::scale_translate(1.0, 0.0, 5.0);
        let p = Point2::new(3.0, 4.0);
        assert_close(a.then(&b).apply(p), b.apply(a.apply(p)), 1e-12);
    }
}
