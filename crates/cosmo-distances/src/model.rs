//! `CosmologicalModel`: the immutable parameter set every distance query
//! reads from.
//!
//! A model is built once from a [`CosmologyParameters`] value (either the
//! built-in defaults or an explicit set) plus an [`EngineConfig`]. Derived
//! constants (`Ω_k`, `Ω_CDM`, `H0`, `t_H`, `D_H`) are fixed at construction
//! and the model is never mutated afterwards.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use cosmo_core::{constants::SPEED_OF_LIGHT, ensure, EngineConfig, Error, Real, Result};

use crate::table::TabulatedDistanceTable;

// ── Unit convention ──────────────────────────────────────────────────────────

/// Unit convention for distances and the Hubble constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnits {
    /// `H0 = 100 km/s/Mpc`; distances in Mpc/h.
    #[default]
    MpcOverH,
    /// `H0 = 100·h km/s/Mpc`; distances in Mpc.
    Mpc,
}

// ── Model tags ───────────────────────────────────────────────────────────────

/// Named cosmologies whose comoving distance is read from a precomputed
/// table instead of being integrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabulatedModel {
    /// ΛCDM reference run, WMAP7 parameters.
    LcdmBaldiWmap7,
    /// Coupled dark energy, exponential potential, β = 0.05 (WMAP7).
    Exp005BaldiWmap7,
    /// Coupled dark energy, exponential potential, varying coupling (WMAP7).
    Exp010e2BaldiWmap7,
    /// ΛCDM reference run of the CoDECS suite.
    LcdmBaldiCodecs,
    /// CoDECS EXP001.
    Exp001BaldiCodecs,
    /// CoDECS EXP002.
    Exp002BaldiCodecs,
    /// CoDECS EXP003.
    Exp003BaldiCodecs,
    /// CoDECS EXP008e3.
    Exp008e3BaldiCodecs,
    /// CoDECS EXP010e2.
    Exp010e2BaldiCodecs,
    /// CoDECS SUGRA003.
    Sugra003BaldiCodecs,
}

impl TabulatedModel {
    /// Every tabulated model, in declaration order.
    pub const ALL: [TabulatedModel; 10] = [
        TabulatedModel::LcdmBaldiWmap7,
        TabulatedModel::Exp005BaldiWmap7,
        TabulatedModel::Exp010e2BaldiWmap7,
        TabulatedModel::LcdmBaldiCodecs,
        TabulatedModel::Exp001BaldiCodecs,
        TabulatedModel::Exp002BaldiCodecs,
        TabulatedModel::Exp003BaldiCodecs,
        TabulatedModel::Exp008e3BaldiCodecs,
        TabulatedModel::Exp010e2BaldiCodecs,
        TabulatedModel::Sugra003BaldiCodecs,
    ];

    /// The model tag, e.g. `"EXP005_Baldi_wmap7"`.
    pub fn name(self) -> &'static str {
        match self {
            TabulatedModel::LcdmBaldiWmap7 => "LCDM_Baldi_wmap7",
            TabulatedModel::Exp005BaldiWmap7 => "EXP005_Baldi_wmap7",
            TabulatedModel::Exp010e2BaldiWmap7 => "EXP010e2_Baldi_wmap7",
            TabulatedModel::LcdmBaldiCodecs => "LCDM_Baldi_CoDECS",
            TabulatedModel::Exp001BaldiCodecs => "EXP001_Baldi_CoDECS",
            TabulatedModel::Exp002BaldiCodecs => "EXP002_Baldi_CoDECS",
            TabulatedModel::Exp003BaldiCodecs => "EXP003_Baldi_CoDECS",
            TabulatedModel::Exp008e3BaldiCodecs => "EXP008e3_Baldi_CoDECS",
            TabulatedModel::Exp010e2BaldiCodecs => "EXP010e2_Baldi_CoDECS",
            TabulatedModel::Sugra003BaldiCodecs => "SUGRA003_Baldi_CoDECS",
        }
    }

    /// File name of the comoving-distance table inside the table store.
    pub fn file_name(self) -> &'static str {
        match self {
            TabulatedModel::LcdmBaldiWmap7 => "LCDM-wmap7-comovingdist.dat",
            TabulatedModel::Exp005BaldiWmap7 => "EXP005-wmap7-comovingdist.dat",
            TabulatedModel::Exp010e2BaldiWmap7 => "EXP010e2-wmap7-comovingdist.dat",
            TabulatedModel::LcdmBaldiCodecs => "LCDM_CoDECS-comovingdist.dat",
            TabulatedModel::Exp001BaldiCodecs => "EXP001_CoDECS-comovingdist.dat",
            TabulatedModel::Exp002BaldiCodecs => "EXP002_CoDECS-comovingdist.dat",
            TabulatedModel::Exp003BaldiCodecs => "EXP003_CoDECS-comovingdist.dat",
            TabulatedModel::Exp008e3BaldiCodecs => "EXP008e3_CoDECS-comovingdist.dat",
            TabulatedModel::Exp010e2BaldiCodecs => "EXP010e2_CoDECS-comovingdist.dat",
            TabulatedModel::Sugra003BaldiCodecs => "SUGRA003_CoDECS-comovingdist.dat",
        }
    }
}

/// Which engine computes the comoving distance of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelKind {
    /// Friedmann-equation models (ΛCDM, curved, CPL dark energy): distances
    /// are integrated.
    #[default]
    Lcdm,
    /// A named model read from the table store.
    Tabulated(TabulatedModel),
}

impl ModelKind {
    /// The model tag as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Lcdm => "LCDM",
            ModelKind::Tabulated(t) => t.name(),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "LCDM" {
            return Ok(ModelKind::Lcdm);
        }
        TabulatedModel::ALL
            .iter()
            .find(|t| t.name() == s)
            .map(|&t| ModelKind::Tabulated(t))
            .ok_or_else(|| Error::UnsupportedModel(format!("unknown model tag `{s}`")))
    }
}

// ── Parameters ───────────────────────────────────────────────────────────────

/// Input parameters of a cosmological model.
///
/// `Default` gives the built-in parameter set (WMAP-like flat ΛCDM,
/// native units).
#[derive(Debug, Clone, PartialEq)]
pub struct CosmologyParameters {
    /// Ω_matter at z = 0.
    pub omega_matter: Real,
    /// Ω_baryon at z = 0.
    pub omega_baryon: Real,
    /// Ω_neutrinos at z = 0.
    pub omega_neutrinos: Real,
    /// Effective number of massless neutrinos.
    pub massless_neutrinos: Real,
    /// Number of massive neutrinos.
    pub massive_neutrinos: u32,
    /// Ω_darkenergy at z = 0.
    pub omega_de: Real,
    /// Ω_radiation at z = 0.
    pub omega_radiation: Real,
    /// Reduced Hubble parameter `h = H0 / 100 km/s/Mpc`.
    pub hh: Real,
    /// Amplitude of the primordial scalar spectrum.
    pub scalar_amp: Real,
    /// Primordial spectral index.
    pub n_spec: Real,
    /// σ8, when known.
    pub sigma8: Option<Real>,
    /// CPL dark-energy parameter w0.
    pub w0: Real,
    /// CPL dark-energy parameter wa.
    pub wa: Real,
    /// Primordial non-Gaussianity amplitude f_NL.
    pub f_nl: Real,
    /// Primordial non-Gaussianity shape (0 = local).
    pub non_gaussian_type: u32,
    /// Distance engine.
    pub model: ModelKind,
    /// Unit convention.
    pub units: DistanceUnits,
}

impl Default for CosmologyParameters {
    fn default() -> Self {
        Self {
            omega_matter: 0.27,
            omega_baryon: 0.046,
            omega_neutrinos: 0.0,
            massless_neutrinos: 3.04,
            massive_neutrinos: 0,
            omega_de: 0.73,
            omega_radiation: 0.0,
            hh: 0.7,
            scalar_amp: 2.46e-9,
            n_spec: 0.96,
            sigma8: None,
            w0: -1.0,
            wa: 0.0,
            f_nl: 0.0,
            non_gaussian_type: 0,
            model: ModelKind::Lcdm,
            units: DistanceUnits::MpcOverH,
        }
    }
}

impl CosmologyParameters {
    /// Flat ΛCDM with the given Ω_matter (Ω_DE = 1 − Ω_matter, Ω_r = 0),
    /// other parameters at their defaults.
    pub fn flat_lcdm(omega_matter: Real) -> Self {
        Self {
            omega_matter,
            omega_de: 1.0 - omega_matter,
            omega_radiation: 0.0,
            ..Self::default()
        }
    }

    /// Set Ω_matter, Ω_darkenergy and Ω_radiation; curvature follows from
    /// closure.
    pub fn with_densities(
        mut self,
        omega_matter: Real,
        omega_de: Real,
        omega_radiation: Real,
    ) -> Self {
        self.omega_matter = omega_matter;
        self.omega_de = omega_de;
        self.omega_radiation = omega_radiation;
        self
    }

    /// Set Ω_baryon.
    pub fn with_baryons(mut self, omega_baryon: Real) -> Self {
        self.omega_baryon = omega_baryon;
        self
    }

    /// Set Ω_neutrinos and the neutrino counts.
    pub fn with_neutrinos(mut self, omega_neutrinos: Real, massless: Real, massive: u32) -> Self {
        self.omega_neutrinos = omega_neutrinos;
        self.massless_neutrinos = massless;
        self.massive_neutrinos = massive;
        self
    }

    /// Set the reduced Hubble parameter.
    pub fn with_hubble(mut self, hh: Real) -> Self {
        self.hh = hh;
        self
    }

    /// Set the CPL equation-of-state parameters.
    pub fn with_dark_energy_eos(mut self, w0: Real, wa: Real) -> Self {
        self.w0 = w0;
        self.wa = wa;
        self
    }

    /// Set the primordial spectrum parameters.
    pub fn with_primordial_spectrum(mut self, scalar_amp: Real, n_spec: Real) -> Self {
        self.scalar_amp = scalar_amp;
        self.n_spec = n_spec;
        self
    }

    /// Set the distance engine.
    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    /// Set the unit convention.
    pub fn with_units(mut self, units: DistanceUnits) -> Self {
        self.units = units;
        self
    }
}

// ── Model ────────────────────────────────────────────────────────────────────

/// An immutable cosmological model.
///
/// All distance, time and volume queries are methods taking `&self` and a
/// redshift; none of them mutate the model, so a model can be shared freely
/// between threads.
#[derive(Debug, Clone)]
pub struct CosmologicalModel {
    params: CosmologyParameters,
    omega_k: Real,
    omega_cdm: Real,
    h0: Real,
    hubble_time: Real,
    hubble_distance: Real,
    config: EngineConfig,
    table: OnceLock<TabulatedDistanceTable>,
}

impl CosmologicalModel {
    /// Build a model with the default [`EngineConfig`].
    ///
    /// # Errors
    /// `InvalidParameter` if `Ω_matter = 0` or `h` is not a positive finite
    /// number.
    pub fn new(params: CosmologyParameters) -> Result<Self> {
        Self::with_config(params, EngineConfig::default())
    }

    /// Build a model reading its tables through `config`.
    pub fn with_config(params: CosmologyParameters, config: EngineConfig) -> Result<Self> {
        ensure!(
            params.omega_matter != 0.0,
            InvalidParameter,
            "Omega_matter must be non-zero"
        );
        ensure!(
            params.hh.is_finite() && params.hh > 0.0,
            InvalidParameter,
            "h must be a positive finite number, got {}",
            params.hh
        );
        Ok(Self::build(params, config))
    }

    /// Build a model whose tag is given by name (e.g. `"LCDM"`,
    /// `"EXP005_Baldi_wmap7"`).
    ///
    /// # Errors
    /// `UnsupportedModel` for an unrecognised tag.
    pub fn with_model_name(
        params: CosmologyParameters,
        name: &str,
        config: EngineConfig,
    ) -> Result<Self> {
        let model = name.parse::<ModelKind>()?;
        Self::with_config(params.with_model(model), config)
    }

    fn build(params: CosmologyParameters, config: EngineConfig) -> Self {
        let omega_k = 1.0 - params.omega_matter - params.omega_radiation - params.omega_de;
        let omega_cdm = params.omega_matter - params.omega_baryon - params.omega_neutrinos;
        let h0 = match params.units {
            DistanceUnits::MpcOverH => 100.0,
            DistanceUnits::Mpc => 100.0 * params.hh,
        };
        let hubble_time = 1.0 / h0;
        Self {
            params,
            omega_k,
            omega_cdm,
            h0,
            hubble_time,
            hubble_distance: SPEED_OF_LIGHT * hubble_time,
            config,
            table: OnceLock::new(),
        }
    }

    /// The parameters the model was built from.
    pub fn parameters(&self) -> &CosmologyParameters {
        &self.params
    }

    /// The configuration the model was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ω_matter.
    pub fn omega_matter(&self) -> Real {
        self.params.omega_matter
    }

    /// Ω_baryon.
    pub fn omega_baryon(&self) -> Real {
        self.params.omega_baryon
    }

    /// Ω_neutrinos.
    pub fn omega_neutrinos(&self) -> Real {
        self.params.omega_neutrinos
    }

    /// Effective number of massless neutrinos.
    pub fn massless_neutrinos(&self) -> Real {
        self.params.massless_neutrinos
    }

    /// Number of massive neutrinos.
    pub fn massive_neutrinos(&self) -> u32 {
        self.params.massive_neutrinos
    }

    /// Ω_darkenergy.
    pub fn omega_de(&self) -> Real {
        self.params.omega_de
    }

    /// Ω_radiation.
    pub fn omega_radiation(&self) -> Real {
        self.params.omega_radiation
    }

    /// Ω_curvature = 1 − Ω_matter − Ω_radiation − Ω_darkenergy.
    pub fn omega_k(&self) -> Real {
        self.omega_k
    }

    /// Ω_CDM = Ω_matter − Ω_baryon − Ω_neutrinos.
    pub fn omega_cdm(&self) -> Real {
        self.omega_cdm
    }

    /// Reduced Hubble parameter h.
    pub fn hh(&self) -> Real {
        self.params.hh
    }

    /// Hubble constant H0 in km/s/Mpc (100 in native units).
    pub fn h0(&self) -> Real {
        self.h0
    }

    /// Hubble time `1/H0`.
    pub fn hubble_time(&self) -> Real {
        self.hubble_time
    }

    /// Hubble distance `c/H0`.
    pub fn hubble_distance(&self) -> Real {
        self.hubble_distance
    }

    /// CPL w0.
    pub fn w0(&self) -> Real {
        self.params.w0
    }

    /// CPL wa.
    pub fn wa(&self) -> Real {
        self.params.wa
    }

    /// Primordial scalar amplitude.
    pub fn scalar_amp(&self) -> Real {
        self.params.scalar_amp
    }

    /// Primordial spectral index.
    pub fn n_spec(&self) -> Real {
        self.params.n_spec
    }

    /// σ8, if set.
    pub fn sigma8(&self) -> Option<Real> {
        self.params.sigma8
    }

    /// f_NL.
    pub fn f_nl(&self) -> Real {
        self.params.f_nl
    }

    /// Non-Gaussianity shape.
    pub fn non_gaussian_type(&self) -> u32 {
        self.params.non_gaussian_type
    }

    /// The distance engine tag.
    pub fn model(&self) -> ModelKind {
        self.params.model
    }

    /// The unit convention.
    pub fn units(&self) -> DistanceUnits {
        self.params.units
    }

    /// Path of the distance table backing a tabulated model.
    pub(crate) fn table_path(&self, model: TabulatedModel) -> PathBuf {
        self.config.comoving_table_path(model.file_name())
    }

    /// The distance table of a tabulated model, read on first use.
    pub(crate) fn tabulated_table(&self, model: TabulatedModel) -> Result<&TabulatedDistanceTable> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }
        let table = TabulatedDistanceTable::read(self.table_path(model))?;
        Ok(self.table.get_or_init(|| table))
    }
}

impl Default for CosmologicalModel {
    /// The built-in parameter set with the default [`EngineConfig`].
    fn default() -> Self {
        Self::build(CosmologyParameters::default(), EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_model_derived_constants() {
        let m = CosmologicalModel::default();
        assert_eq!(m.h0(), 100.0);
        assert_abs_diff_eq!(m.hubble_distance(), 2997.92458, epsilon = 1e-9);
        assert_abs_diff_eq!(m.hubble_time(), 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(m.omega_k(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m.omega_cdm(), 0.27 - 0.046, epsilon = 1e-15);
    }

    #[test]
    fn physical_units_scale_h0() {
        let m = CosmologicalModel::new(
            CosmologyParameters::default()
                .with_hubble(0.7)
                .with_units(DistanceUnits::Mpc),
        )
        .unwrap();
        assert_abs_diff_eq!(m.h0(), 70.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.hubble_distance(), 299_792.458 / 70.0, epsilon = 1e-9);
    }

    #[test]
    fn curvature_from_closure() {
        let m = CosmologicalModel::new(
            CosmologyParameters::default().with_densities(0.3, 0.6, 1e-4),
        )
        .unwrap();
        assert_abs_diff_eq!(m.omega_k(), 1.0 - 0.3 - 0.6 - 1e-4, epsilon = 1e-15);
        let total = m.omega_k() + m.omega_matter() + m.omega_radiation() + m.omega_de();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn zero_matter_is_rejected() {
        let err =
            CosmologicalModel::new(CosmologyParameters::default().with_densities(0.0, 0.7, 0.0));
        assert!(matches!(err, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn non_positive_h_is_rejected() {
        let err = CosmologicalModel::new(CosmologyParameters::default().with_hubble(0.0));
        assert!(matches!(err, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn model_tags_round_trip() {
        assert_eq!("LCDM".parse::<ModelKind>().unwrap(), ModelKind::Lcdm);
        for t in TabulatedModel::ALL {
            assert_eq!(t.name().parse::<ModelKind>().unwrap(), ModelKind::Tabulated(t));
        }
        assert!(matches!(
            "wCDM_unknown".parse::<ModelKind>(),
            Err(Error::UnsupportedModel(_))
        ));
    }

    #[test]
    fn unknown_model_name_fails_construction() {
        let err = CosmologicalModel::with_model_name(
            CosmologyParameters::default(),
            "not-a-model",
            EngineConfig::new("tables"),
        );
        assert!(matches!(err, Err(Error::UnsupportedModel(_))));
    }
}
