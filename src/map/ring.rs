use glam::IVec2;

/// Pixels on the boundary of the (2r+1)x(2r+1) square centred on `center`,
/// i.e. at Chebyshev distance exactly `radius`. This stands in for a true
/// circle of that radius.
///
/// Order matters, it decides ties in the country vote:
/// first the top and bottom rows, column by column from left to right
/// (top sample before bottom sample), then the left and right columns
/// without their corners, row by row from top to bottom (left before right).
///
/// Coordinates are not wrapped; that is the grid sampler's job.
pub fn ring(center: IVec2, radius: i32) -> RingIter {
    RingIter {
        center,
        radius,
        step: 0,
    }
}

/// Iterator over the pixels of one ring, see [`ring`].
#[derive(Debug, Clone)]
pub struct RingIter {
    center: IVec2,
    radius: i32,
    step: u64,
}

impl RingIter {
    /// Number of samples in a ring: 2 per column for 2r+1 columns, 2 per row for 2r-1 rows
    #[inline(always)]
    fn total(&self) -> u64 {
        if self.radius <= 0 {
            0
        } else {
            8 * self.radius as u64
        }
    }
}

impl Iterator for RingIter {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        let r = self.radius;
        if self.step >= self.total() {
            return None;
        }

        let horizontal = 2 * (2 * r as u64 + 1);
        let (dx, dy) = if self.step < horizontal {
            // Horizontal parts: (x, top) then (x, bottom)
            let col = (self.step / 2) as i64;
            let dy = if self.step % 2 == 0 { -r } else { r };
            ((col - r as i64) as i32, dy)
        } else {
            // Vertical parts excluding corners: (left, y) then (right, y)
            let s = self.step - horizontal;
            let row = (s / 2) as i64;
            let dx = if s % 2 == 0 { -r } else { r };
            (dx, (row - r as i64 + 1) as i32)
        };

        self.step += 1;
        Some(self.center + IVec2::new(dx, dy))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total().saturating_sub(self.step) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for RingIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn collect(radius: i32) -> Vec<(i32, i32)> {
        ring(IVec2::ZERO, radius).map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_radius_one_order() {
        assert_eq!(
            collect(1),
            vec![
                (-1, -1),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 1),
                (-1, 0),
                (1, 0),
            ]
        );
    }

    #[test]
    fn test_ring_is_exact_chebyshev_boundary() {
        for r in 1..6 {
            let pts = collect(r);
            assert_eq!(pts.len(), 8 * r as usize);

            let unique: HashSet<_> = pts.iter().copied().collect();
            assert_eq!(unique.len(), pts.len(), "duplicate sample at radius {}", r);

            for (x, y) in pts {
                assert_eq!(x.abs().max(y.abs()), r);
            }
        }
    }

    #[test]
    fn test_vertical_edges_come_after_rows() {
        let pts = collect(2);
        // 10 row samples first, all on y = +-2
        assert!(pts[..10].iter().all(|&(_, y)| y.abs() == 2));
        // Then the side columns top to bottom
        assert_eq!(&pts[10..], &[(-2, -1), (2, -1), (-2, 0), (2, 0), (-2, 1), (2, 1)]);
    }

    #[test]
    fn test_ring_is_offset_by_center() {
        let first = ring(IVec2::new(10, 20), 3).next();
        assert_eq!(first, Some(IVec2::new(7, 17)));
    }

    #[test]
    fn test_large_radius_does_not_overflow() {
        let r = i32::MAX;
        let mut it = ring(IVec2::ZERO, r);
        assert_eq!(it.len() as u64, 8 * r as u64);
        assert_eq!(it.next(), Some(IVec2::new(-r, -r)));
        assert_eq!(it.next(), Some(IVec2::new(-r, r)));
    }

    #[test]
    fn test_zero_radius_is_empty() {
        assert_eq!(ring(IVec2::ZERO, 0).len(), 0);
    }
}
