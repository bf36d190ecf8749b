//! V_max resampling of a catalogue's comoving distances.
//!
//! Each object is visible within a redshift window `[z_lo, z_hi]` (its
//! V_max volume). Drawing a volume uniformly in `[0, V(z_lo, z_hi)]` and
//! inverting it with [`CosmologicalModel::max_redshift`] places a random
//! copy of the object uniformly in comoving volume inside its window; the
//! comoving distances of the copies that survive the sample's redshift cut
//! are then binned linearly.

use cosmo_core::{ensure, Distance, Real, Redshift, Result, Size};
use rand::Rng;
use rand_mt::Mt64;
use tracing::debug;

use crate::model::CosmologicalModel;

/// Settings of a V_max resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct VmaxSampling {
    /// Lower redshift cut of the sample (exclusive).
    pub z_min: Redshift,
    /// Upper redshift cut of the sample (exclusive).
    pub z_max: Redshift,
    /// Redshift at the lower edge of the histogram.
    pub bin_z_min: Redshift,
    /// Redshift at the upper edge of the histogram.
    pub bin_z_max: Redshift,
    /// Target bin width, in comoving distance.
    pub bin_width: Distance,
    /// Survey area in square degrees.
    pub area: Real,
    /// Random copies drawn per object.
    pub draws_per_object: Size,
    /// Seed of the MT19937-64 generator.
    pub seed: u64,
    /// Scale the histogram to the number of objects instead of to unity.
    pub per_object: bool,
}

/// Linear histogram of resampled comoving distances.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceHistogram {
    /// Bin centres.
    pub centres: Vec<Distance>,
    /// Normalised counts per bin.
    pub values: Vec<Real>,
    /// Random copies that passed the redshift cut.
    pub samples: Size,
}

impl CosmologicalModel {
    /// Comoving-distance distribution of a catalogue resampled within the
    /// V_max windows `windows` (one `(z_lo, z_hi)` pair per object).
    ///
    /// The histogram spans `[D_C(bin_z_min), D_C(bin_z_max)]` with
    /// `⌊round(ΔD_C) / bin_width⌋` equal bins. Counts are divided by the
    /// number of surviving copies, or by that number over the number of
    /// objects when `per_object` is set, so that they sum to one (or to the
    /// number of objects) when every copy falls inside the histogram.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty catalogue, an empty window, no draws,
    /// a non-positive area, or a histogram range holding no bin; any error
    /// of [`max_redshift`](Self::max_redshift), e.g. a window reaching
    /// beyond `z = 10`.
    pub fn vmax_dc_distribution(
        &self,
        windows: &[(Redshift, Redshift)],
        sampling: &VmaxSampling,
    ) -> Result<DistanceHistogram> {
        ensure!(
            !windows.is_empty(),
            InvalidArgument,
            "V_max resampling needs at least one object"
        );
        ensure!(
            sampling.draws_per_object > 0,
            InvalidArgument,
            "need at least one draw per object"
        );
        ensure!(
            sampling.area > 0.0,
            InvalidArgument,
            "survey area must be > 0, got {}",
            sampling.area
        );
        ensure!(
            sampling.bin_width > 0.0,
            InvalidArgument,
            "bin width must be > 0, got {}",
            sampling.bin_width
        );

        let dc_lo = self.comoving_distance(sampling.bin_z_min)?;
        let dc_hi = self.comoving_distance(sampling.bin_z_max)?;
        let bins = ((dc_hi - dc_lo).round() / sampling.bin_width).floor();
        ensure!(
            bins >= 1.0,
            InvalidArgument,
            "no bin of width {} fits in [{dc_lo}, {dc_hi}]",
            sampling.bin_width
        );
        let bins = bins as usize;

        let mut rng = Mt64::new(sampling.seed);
        let mut distances = Vec::with_capacity(windows.len() * sampling.draws_per_object);
        for &(z_lo, z_hi) in windows {
            ensure!(z_hi > z_lo, InvalidArgument, "empty V_max window [{z_lo}, {z_hi}]");
            let v_max = self.comoving_volume_shell(z_lo, z_hi, sampling.area)?;
            for _ in 0..sampling.draws_per_object {
                let volume = rng.gen::<Real>() * v_max;
                let z = self.max_redshift(volume, sampling.area, z_lo)?;
                if sampling.z_min < z && z < sampling.z_max {
                    distances.push(self.comoving_distance(z)?);
                }
            }
        }

        let samples = distances.len();
        let norm = if sampling.per_object {
            samples as Real / windows.len() as Real
        } else {
            samples as Real
        };
        let width = (dc_hi - dc_lo) / bins as Real;
        let mut values = vec![0.0; bins];
        if samples > 0 {
            for d in distances.into_iter().filter(|&d| d >= dc_lo && d <= dc_hi) {
                let k = (((d - dc_lo) / width) as usize).min(bins - 1);
                values[k] += 1.0 / norm;
            }
        }
        debug!(objects = windows.len(), samples, bins, "resampled V_max distances");

        let centres = (0..bins).map(|k| dc_lo + (k as Real + 0.5) * width).collect();
        Ok(DistanceHistogram { centres, values, samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use cosmo_core::Error;

    fn sampling() -> VmaxSampling {
        VmaxSampling {
            z_min: 0.05,
            z_max: 0.6,
            bin_z_min: 0.05,
            bin_z_max: 0.6,
            bin_width: 100.0,
            area: 1000.0,
            draws_per_object: 120,
            seed: 4357,
            per_object: false,
        }
    }

    const WINDOWS: [(Redshift, Redshift); 2] = [(0.1, 0.4), (0.2, 0.5)];

    #[test]
    fn histogram_layout() {
        let m = CosmologicalModel::default();
        let h = m.vmax_dc_distribution(&WINDOWS, &sampling()).unwrap();
        let dc_lo = m.comoving_distance(0.05).unwrap();
        let dc_hi = m.comoving_distance(0.6).unwrap();
        let bins = ((dc_hi - dc_lo).round() / 100.0).floor() as usize;
        assert_eq!(h.centres.len(), bins);
        assert_eq!(h.values.len(), bins);
        let width = (dc_hi - dc_lo) / bins as Real;
        assert_relative_eq!(h.centres[0], dc_lo + 0.5 * width, max_relative = 1e-12);
        assert_relative_eq!(h.centres[bins - 1], dc_hi - 0.5 * width, max_relative = 1e-12);
    }

    #[test]
    fn normalisation() {
        let m = CosmologicalModel::default();
        // Every window lies inside the cut, so every copy is kept and binned.
        let unit = m.vmax_dc_distribution(&WINDOWS, &sampling()).unwrap();
        assert_eq!(unit.samples, 240);
        assert_abs_diff_eq!(unit.values.iter().sum::<Real>(), 1.0, epsilon = 1e-12);

        let scaled = m
            .vmax_dc_distribution(&WINDOWS, &VmaxSampling { per_object: true, ..sampling() })
            .unwrap();
        assert_abs_diff_eq!(scaled.values.iter().sum::<Real>(), 2.0, epsilon = 1e-12);
        for (u, s) in unit.values.iter().zip(&scaled.values) {
            assert_relative_eq!(*s, 2.0 * u, max_relative = 1e-12);
        }
    }

    #[test]
    fn copies_stay_inside_their_windows() {
        let m = CosmologicalModel::default();
        let h = m.vmax_dc_distribution(&WINDOWS, &sampling()).unwrap();
        let d_lo = m.comoving_distance(0.1).unwrap();
        let d_hi = m.comoving_distance(0.5).unwrap();
        let width = h.centres[1] - h.centres[0];
        for (c, v) in h.centres.iter().zip(&h.values) {
            if c + 0.5 * width < d_lo || c - 0.5 * width > d_hi {
                assert_eq!(*v, 0.0, "bin at {c} should be empty");
            }
        }
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let m = CosmologicalModel::default();
        let a = m.vmax_dc_distribution(&WINDOWS, &sampling()).unwrap();
        let b = m.vmax_dc_distribution(&WINDOWS, &sampling()).unwrap();
        assert_eq!(a, b);
        let c = m.vmax_dc_distribution(&WINDOWS, &VmaxSampling { seed: 1, ..sampling() }).unwrap();
        assert_ne!(a.values, c.values);
    }

    #[test]
    fn copies_are_uniform_in_volume() {
        let m = CosmologicalModel::default();
        let draws = 600;
        let settings = VmaxSampling { z_max: 0.3, draws_per_object: draws, ..sampling() };
        let h = m.vmax_dc_distribution(&[(0.1, 0.5)], &settings).unwrap();
        let cube = |z: Redshift| m.comoving_distance(z).unwrap().powi(3);
        let expected = (cube(0.3) - cube(0.1)) / (cube(0.5) - cube(0.1));
        // Binomial σ ≈ 0.018.
        assert_abs_diff_eq!(h.samples as Real / draws as Real, expected, epsilon = 0.08);
    }

    #[test]
    fn invalid_settings() {
        let m = CosmologicalModel::default();
        assert!(matches!(
            m.vmax_dc_distribution(&[], &sampling()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            m.vmax_dc_distribution(&WINDOWS, &VmaxSampling { bin_width: 1e5, ..sampling() }),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            m.vmax_dc_distribution(&[(0.3, 0.3)], &sampling()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
