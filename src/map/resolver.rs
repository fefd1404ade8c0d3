use glam::IVec2;
use tracing::trace;

use crate::data::{CountryRecord, CountryTable, IntensityGrid};
use crate::error::ResolveError;
use crate::map::ring::ring;

/// How the country of a ring is chosen when several are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VotePolicy {
    /// Most samples wins; ties go to the country sampled first
    #[default]
    Majority,
    /// The first country sampled wins regardless of counts
    FirstSeen,
}

/// Finds the country under a pixel, searching outwards when the pixel itself
/// is sea, border or off the canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    pub vote: VotePolicy,
    /// Largest ring radius tried before giving up; `None` derives it from the grid
    pub max_radius: Option<u32>,
}

impl Resolver {
    pub fn new(vote: VotePolicy, max_radius: Option<u32>) -> Self {
        Self { vote, max_radius }
    }

    /// Country at exactly this pixel. x wraps around the grid, y does not.
    #[inline]
    pub fn lookup<'t, G>(&self, pixel: IVec2, grid: &G, table: &'t CountryTable) -> Option<&'t CountryRecord>
    where
        G: IntensityGrid + ?Sized,
    {
        let x = pixel.x.rem_euclid(grid.width() as i32);
        grid.sample(x, pixel.y).and_then(|shade| table.get(shade))
    }

    /// Country at the pixel, or the dominant country of the nearest ring that has one.
    pub fn resolve<'t, G>(&self, pixel: IVec2, grid: &G, table: &'t CountryTable) -> Result<&'t CountryRecord, ResolveError>
    where
        G: IntensityGrid + ?Sized,
    {
        if let Some(record) = self.lookup(pixel, grid, table) {
            return Ok(record);
        }

        let max_radius = self.radius_bound(grid);
        for radius in 1..=max_radius as i32 {
            if let Some(record) = self.country_at_distance(pixel, radius, grid, table) {
                return Ok(record);
            }
        }

        Err(ResolveError::SearchExhausted {
            x: pixel.x,
            y: pixel.y,
            max_radius,
        })
    }

    /// Dominant country among the pixels at Chebyshev distance `radius`, if any is mapped
    pub fn country_at_distance<'t, G>(
        &self,
        center: IVec2,
        radius: i32,
        grid: &G,
        table: &'t CountryTable,
    ) -> Option<&'t CountryRecord>
    where
        G: IntensityGrid + ?Sized,
    {
        // Insertion-ordered so that ties are decided by sampling order
        let mut tally: Vec<(&CountryRecord, u32)> = Vec::new();

        for pixel in ring(center, radius) {
            let Some(record) = self.lookup(pixel, grid, table) else {
                continue;
            };
            match tally.iter_mut().find(|(seen, _)| *seen == record) {
                Some((_, count)) => *count += 1,
                None => tally.push((record, 1)),
            }
        }

        trace!(radius, candidates = tally.len(), "ring search");

        match self.vote {
            VotePolicy::FirstSeen => tally.first().map(|(record, _)| *record),
            VotePolicy::Majority => {
                let mut best: Option<(&CountryRecord, u32)> = None;
                for (record, count) in tally {
                    if best.map_or(true, |(_, top)| count > top) {
                        best = Some((record, count));
                    }
                }
                best.map(|(record, _)| record)
            }
        }
    }

    /// Radius at which the rings have covered every column and row of the grid.
    /// A configured bound is capped at the grid's larger side, past which rings find nothing new.
    fn radius_bound<G: IntensityGrid + ?Sized>(&self, grid: &G) -> u32 {
        let cap = grid.width().max(grid.height()).min(i32::MAX as u32);
        self.max_radius
            .unwrap_or_else(|| (grid.width() / 2).max(grid.height()))
            .min(cap)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GrayRaster;

    const SEA: u8 = 0;
    const A: u8 = 10;
    const B: u8 = 20;
    const C: u8 = 30;

    fn table() -> CountryTable {
        CountryTable::from_records([
            (A, CountryRecord::new("Alpha", "1")),
            (B, CountryRecord::new("Bravo", "2")),
            (C, CountryRecord::new("Charlie", "3")),
        ])
    }

    fn name(record: Option<&CountryRecord>) -> Option<&str> {
        record.map(|r| r.name.as_str())
    }

    #[test]
    fn test_direct_hit() {
        let mut grid = GrayRaster::filled(20, 20, SEA);
        grid.set(5, 5, A);
        let table = table();

        let resolver = Resolver::default();
        assert_eq!(resolver.resolve(IVec2::new(5, 5), &grid, &table).unwrap().name, "Alpha");
    }

    #[test]
    fn test_lookup_wraps_x_but_not_y() {
        let mut grid = GrayRaster::filled(10, 10, SEA);
        grid.set(0, 3, A);
        grid.set(9, 0, B);
        let table = table();
        let resolver = Resolver::default();

        assert_eq!(name(resolver.lookup(IVec2::new(10, 3), &grid, &table)), Some("Alpha"));
        assert_eq!(name(resolver.lookup(IVec2::new(-1, 0), &grid, &table)), Some("Bravo"));
        assert_eq!(resolver.lookup(IVec2::new(0, 13), &grid, &table), None);
        assert_eq!(resolver.lookup(IVec2::new(9, -10), &grid, &table), None);
    }

    #[test]
    fn test_unmapped_shade_triggers_search() {
        // 99 is not in the table, like a black pixel on the reference map
        let mut grid = GrayRaster::filled(20, 20, SEA);
        grid.set(10, 10, 99);
        grid.set(11, 10, B);
        let table = table();

        let record = Resolver::default().resolve(IVec2::new(10, 10), &grid, &table).unwrap();
        assert_eq!(record.name, "Bravo");
    }

    #[test]
    fn test_search_stops_at_first_ring_with_land() {
        let mut grid = GrayRaster::filled(40, 40, SEA);
        // One Alpha pixel at distance 3, a block of Bravo at distance 4
        grid.set(23, 20, A);
        grid.fill_rect(14, 16, 16, 24, B);
        let table = table();

        let record = Resolver::default().resolve(IVec2::new(20, 20), &grid, &table).unwrap();
        assert_eq!(record.name, "Alpha");
    }

    #[test]
    fn test_majority_vote() {
        let mut grid = GrayRaster::filled(20, 20, SEA);
        let c = IVec2::new(10, 10);
        // Radius 1 ring: Alpha sampled first once, Bravo twice later
        grid.set(9, 9, A);
        grid.set(9, 10, B);
        grid.set(11, 10, B);
        let table = table();

        let majority = Resolver::new(VotePolicy::Majority, None);
        assert_eq!(name(majority.country_at_distance(c, 1, &grid, &table)), Some("Bravo"));

        let first_seen = Resolver::new(VotePolicy::FirstSeen, None);
        assert_eq!(name(first_seen.country_at_distance(c, 1, &grid, &table)), Some("Alpha"));
    }

    #[test]
    fn test_tie_goes_to_first_sampled() {
        let mut grid = GrayRaster::filled(20, 20, SEA);
        let c = IVec2::new(10, 10);
        // Bottom-left corner is sampled before the top-right corner
        grid.set(9, 11, C);
        grid.set(11, 9, A);
        let table = table();

        let record = Resolver::default().country_at_distance(c, 1, &grid, &table);
        assert_eq!(name(record), Some("Charlie"));
    }

    #[test]
    fn test_shades_with_same_country_are_counted_together() {
        let mut grid = GrayRaster::filled(20, 20, SEA);
        let c = IVec2::new(10, 10);
        grid.set(9, 9, A);
        grid.set(10, 9, 40);
        grid.set(10, 11, 41);
        let mut table = table();
        table.insert(40, CountryRecord::new("Bravo", "2"));
        table.insert(41, CountryRecord::new("Bravo", "2"));

        let record = Resolver::default().country_at_distance(c, 1, &grid, &table);
        assert_eq!(name(record), Some("Bravo"));
    }

    #[test]
    fn test_empty_ring() {
        let grid = GrayRaster::filled(20, 20, SEA);
        let table = table();
        assert_eq!(Resolver::default().country_at_distance(IVec2::new(5, 5), 2, &grid, &table), None);
    }

    #[test]
    fn test_search_crosses_antimeridian() {
        let mut grid = GrayRaster::filled(50, 20, SEA);
        grid.set(48, 10, A);
        let table = table();

        let record = Resolver::default().resolve(IVec2::new(1, 10), &grid, &table).unwrap();
        assert_eq!(record.name, "Alpha");
    }

    #[test]
    fn test_search_from_off_canvas_row() {
        let mut grid = GrayRaster::filled(20, 10, SEA);
        grid.set(5, 0, A);
        let table = table();

        // Three rows above the canvas, like the northern edge of the band
        let record = Resolver::default().resolve(IVec2::new(5, -3), &grid, &table).unwrap();
        assert_eq!(record.name, "Alpha");
    }

    #[test]
    fn test_far_corner_found_within_default_bound() {
        let mut grid = GrayRaster::filled(30, 12, SEA);
        grid.set(15, 11, C);
        let table = table();

        let record = Resolver::default().resolve(IVec2::new(0, 0), &grid, &table).unwrap();
        assert_eq!(record.name, "Charlie");
    }

    #[test]
    fn test_huge_radius_bound_is_capped() {
        let mut grid = GrayRaster::filled(20, 10, SEA);
        grid.set(12, 8, B);
        let table = table();
        let resolver = Resolver::new(VotePolicy::Majority, Some(u32::MAX));

        let record = resolver.resolve(IVec2::new(3, 3), &grid, &table).unwrap();
        assert_eq!(record.name, "Bravo");

        let empty = GrayRaster::filled(20, 10, SEA);
        let err = resolver.resolve(IVec2::new(3, 3), &empty, &table).unwrap_err();
        assert!(matches!(err, ResolveError::SearchExhausted { max_radius: 20, .. }));
    }

    #[test]
    fn test_search_exhausted() {
        let grid = GrayRaster::filled(20, 10, SEA);
        let table = table();

        let err = Resolver::default().resolve(IVec2::new(3, 3), &grid, &table).unwrap_err();
        assert!(matches!(err, ResolveError::SearchExhausted { x: 3, y: 3, max_radius: 10 }));

        let err = Resolver::new(VotePolicy::Majority, Some(4))
            .resolve(IVec2::new(3, 3), &grid, &table)
            .unwrap_err();
        assert!(matches!(err, ResolveError::SearchExhausted { max_radius: 4, .. }));
    }
}
