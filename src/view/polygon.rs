use crate::tracks::Point;

/// Distance below which a point counts as lying on a polygon edge.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Point-in-polygon test with the boundary counted as inside.
///
/// Uses crossing-number ray casting; vertices may be in either winding order.
pub fn polygon_contains(poly: &[Point], p: &Point) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    for i in 0..n {
        let a = &poly[i];
        let b = &poly[(i + 1) % n];

        if on_segment(a, b, p) {
            return true;
        }

        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }

    inside
}

fn on_segment(a: &Point, b: &Point, p: &Point) -> bool {
    let ab = b - a;
    let ap = p - a;
    let len = ab.norm();
    if len == 0.0 {
        return ap.norm() <= EDGE_TOLERANCE;
    }

    let cross = ab.x * ap.y - ab.y * ap.x;
    if cross.abs() > EDGE_TOLERANCE * len {
        return false;
    }
    let dot = ab.dot(&ap);
    dot >= -EDGE_TOLERANCE * len && dot <= len * len + EDGE_TOLERANCE * len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trapezoid() -> Vec<Point> {
        vec![
            Point::new(0.0, 100.0),
            Point::new(40.0, 0.0),
            Point::new(160.0, 0.0),
            Point::new(200.0, 100.0),
        ]
    }

    #[test]
    fn test_inside_and_outside() {
        let poly = trapezoid();
        assert!(polygon_contains(&poly, &Point::new(100.0, 50.0)));
        assert!(polygon_contains(&poly, &Point::new(25.5, 60.0)));
        assert!(!polygon_contains(&poly, &Point::new(10.0, 10.0)));
        assert!(!polygon_contains(&poly, &Point::new(100.0, 101.0)));
        assert!(!polygon_contains(&poly, &Point::new(-5.0, 50.0)));
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let poly = trapezoid();
        // Vertices
        for v in &poly {
            assert!(polygon_contains(&poly, v));
        }
        // Edge midpoints
        assert!(polygon_contains(&poly, &Point::new(100.0, 0.0)));
        assert!(polygon_contains(&poly, &Point::new(100.0, 100.0)));
        assert!(polygon_contains(&poly, &Point::new(20.0, 50.0)));
    }

    #[test]
    fn test_winding_order_irrelevant() {
        let mut poly = trapezoid();
        poly.reverse();
        assert!(polygon_contains(&poly, &Point::new(100.0, 50.0)));
        assert!(!polygon_contains(&poly, &Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_degenerate_polygon() {
        assert!(!polygon_contains(&trapezoid()[..2], &Point::new(20.0, 50.0)));
    }
}
