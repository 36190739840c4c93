//! Fixed grid of movers advanced together once per tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::mover::{Mover, MoverId};
use crate::error::SimError;
use crate::noise::{NoiseSource, PerlinNoise};
use crate::params::MotionParams;

/// Motion field owning every mover, stored column-major
#[derive(Debug)]
pub struct MotionField {
    movers: Vec<Mover>,
    columns: usize,
    rows: usize,
}

impl MotionField {
    /// Build the grid with one independently seeded Perlin sampler per mover
    ///
    /// Seeds are drawn from `params.seed`, so the whole field is reproducible.
    pub fn new(params: &MotionParams) -> Result<Self, SimError> {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let shared = params.shared_noise_seed;

        Self::with_noise(params, |_| {
            let seed = shared.unwrap_or_else(|| rng.gen::<u32>());
            Box::new(PerlinNoise::new(seed))
        })
    }

    /// Build the grid with a caller-supplied noise source per mover
    pub fn with_noise<F>(params: &MotionParams, mut make_noise: F) -> Result<Self, SimError>
    where
        F: FnMut(MoverId) -> Box<dyn NoiseSource>,
    {
        params.validate()?;

        let mut movers = Vec::with_capacity(params.mover_count());
        for column in 0..params.columns {
            for row in 0..params.rows {
                let id = MoverId { column, row };
                movers.push(Mover::new(id, params, make_noise(id)));
            }
        }

        log::debug!(
            "Motion field: {} columns x {} rows = {} movers",
            params.columns,
            params.rows,
            movers.len()
        );

        Ok(Self {
            movers,
            columns: params.columns,
            rows: params.rows,
        })
    }

    /// Advance every mover by one tick
    pub fn update(&mut self) {
        for mover in &mut self.movers {
            mover.update();
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.movers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }

    pub fn get(&self, id: MoverId) -> Option<&Mover> {
        if id.column >= self.columns || id.row >= self.rows {
            return None;
        }
        self.movers.get(id.column * self.rows + id.row)
    }

    /// All movers sharing a column index, ordered by row
    pub fn column(&self, column: usize) -> &[Mover] {
        if column >= self.columns {
            return &[];
        }
        let start = column * self.rows;
        &self.movers[start..start + self.rows]
    }

    /// The row-0 mover, the only one sampled for a column's audio
    pub fn representative(&self, column: usize) -> Option<&Mover> {
        self.column(column).first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mover> {
        self.movers.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use glam::DVec3;

    use super::*;

    struct ConstantNoise(f32);

    impl NoiseSource for ConstantNoise {
        fn sample_2d(&self, _x: f64, _y: f64) -> f32 {
            self.0
        }
    }

    #[test]
    fn test_motion_field_creation() {
        let params = MotionParams::default();
        let field = MotionField::new(&params).unwrap();

        assert_eq!(field.len(), 648);
        assert_eq!(field.columns(), 36);
        assert_eq!(field.rows(), 18);

        let ids: HashSet<MoverId> = field.iter().map(|m| m.id()).collect();
        assert_eq!(ids.len(), 648);

        for mover in field.iter() {
            let id = mover.id();
            let pos = mover.position();
            assert_eq!(pos.x, id.column as f32 - 10.0);
            assert_eq!(pos.z, id.row as f32 - 5.0);
        }
    }

    #[test]
    fn test_invalid_grid_fails_fast() {
        let params = MotionParams {
            columns: 0,
            ..Default::default()
        };
        assert!(matches!(
            MotionField::new(&params),
            Err(SimError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn test_representative_is_row_zero() {
        let field = MotionField::new(&MotionParams::default()).unwrap();
        for column in 0..field.columns() {
            let mover = field.representative(column).unwrap();
            assert_eq!(mover.id(), MoverId { column, row: 0 });
        }
        assert!(field.representative(field.columns()).is_none());
    }

    #[test]
    fn test_get_matches_column_slice() {
        let field = MotionField::new(&MotionParams::default()).unwrap();
        let id = MoverId { column: 9, row: 4 };
        assert_eq!(field.get(id).unwrap().id(), id);
        assert_eq!(field.column(9)[4].id(), id);
        assert!(field.get(MoverId { column: 0, row: 18 }).is_none());
    }

    #[test]
    fn test_same_seed_reproduces_field() {
        let params = MotionParams::default();
        let mut a = MotionField::new(&params).unwrap();
        let mut b = MotionField::new(&params).unwrap();

        for _ in 0..20 {
            a.update();
            b.update();
        }
        for (ma, mb) in a.iter().zip(b.iter()) {
            assert_eq!(ma.height(), mb.height());
        }
    }

    #[test]
    fn test_update_advances_every_mover() {
        let params = MotionParams {
            columns: 3,
            rows: 2,
            ..Default::default()
        };
        let mut field = MotionField::with_noise(&params, |_| Box::new(ConstantNoise(0.1))).unwrap();
        field.update();

        for mover in field.iter() {
            let start_phase = mover.id().column as f64 * params.phase_offset_per_column;
            let expected = DVec3::new(0.1, start_phase + 0.01, 0.01);
            assert!((mover.phase() - expected).length() < 1e-9);
        }
    }

    #[test]
    fn test_shared_seed_correlates_columns() {
        let params = MotionParams {
            columns: 1,
            rows: 4,
            shared_noise_seed: Some(11),
            ..Default::default()
        };
        let mut field = MotionField::new(&params).unwrap();
        field.update();

        // Same column, same phase, same seed: identical heights
        let first = field.column(0)[0].height();
        assert!(field.column(0).iter().all(|m| m.height() == first));
    }
}
