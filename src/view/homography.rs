//! Planar projective transform fitted from four point correspondences.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::error::{Error, Result};
use crate::tracks::Point;

/// Minimum |w| of a projected homogeneous point.
const MIN_SCALE: f64 = 1e-12;

/// 3x3 projective transform, normalized so that `h[(2, 2)] == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    matrix: Matrix3<f64>,
}

impl Homography {
    /// Fit the transform mapping each `src[i]` onto `dst[i]`.
    ///
    /// Fails when either quadrilateral has three collinear vertices or a
    /// non-finite coordinate, since no unique transform exists then.
    pub fn from_correspondences(src: &[Point; 4], dst: &[Point; 4]) -> Result<Self> {
        check_quad("pixel", src)?;
        check_quad("court", dst)?;

        // Direct linear transform with h33 fixed to 1: two rows per pair.
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();
        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            let (x, y, u, v) = (s.x, s.y, d.x, d.y);
            let r = 2 * i;
            let rows = [
                [x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y],
                [0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y],
            ];
            for (k, row) in rows.iter().enumerate() {
                for (j, &coef) in row.iter().enumerate() {
                    a[(r + k, j)] = coef;
                }
            }
            b[r] = u;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b).ok_or_else(|| {
            Error::InvalidCalibration("perspective system is singular".to_string())
        })?;
        if h.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidCalibration(
                "perspective system produced non-finite coefficients".to_string(),
            ));
        }

        let matrix = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
        Ok(Self { matrix })
    }

    /// Project a point. Returns `None` when the point maps to infinity.
    pub fn apply(&self, point: &Point) -> Option<Point> {
        let p = self.matrix * Vector3::new(point.x, point.y, 1.0);
        if p.z.abs() < MIN_SCALE {
            return None;
        }
        Some(Point::new(p.x / p.z, p.y / p.z))
    }
}

fn check_quad(name: &str, quad: &[Point; 4]) -> Result<()> {
    if quad.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(Error::InvalidCalibration(format!(
            "{name} vertices contain non-finite coordinates"
        )));
    }

    let extent = quad
        .iter()
        .flat_map(|p| quad.iter().map(move |q| (p - q).norm()))
        .fold(0.0_f64, f64::max);
    let tolerance = 1e-9 * extent * extent;

    for skip in 0..4 {
        let tri: Vec<&Point> = quad
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, p)| p)
            .collect();
        let (u, v) = (tri[1] - tri[0], tri[2] - tri[0]);
        if (u.x * v.y - u.y * v.x).abs() <= tolerance {
            return Err(Error::InvalidCalibration(format!(
                "{name} vertices contain three collinear points"
            )));
        }
    }
    Ok(())
}
