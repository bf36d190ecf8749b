//! End-to-end checks of the distance engine against reference values and
//! between its evaluation strategies.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use cosmo_core::{EngineConfig, Error};
use cosmo_distances::{
    CosmologicalModel, CosmologyParameters, DistanceKind, DistanceUnits, EllipticEvaluator,
    ModelKind, QuadratureEvaluator, TabulatedModel,
};

fn physical_flat(omega_matter: f64) -> CosmologicalModel {
    CosmologicalModel::new(
        CosmologyParameters::flat_lcdm(omega_matter)
            .with_hubble(0.7)
            .with_units(DistanceUnits::Mpc),
    )
    .unwrap()
}

// ─── Reference values ─────────────────────────────────────────────────────────

#[test]
fn test_default_model_reference_values() {
    let m = CosmologicalModel::default();
    assert_abs_diff_eq!(m.hubble_distance(), 2997.92458, epsilon = 1e-9);
    assert_relative_eq!(m.comoving_distance(1.0).unwrap(), 2355.359_099, max_relative = 1e-6);
    assert_relative_eq!(
        m.comoving_distance_elliptic(1.0).unwrap(),
        2355.359_099,
        max_relative = 1e-6
    );
}

#[test]
fn test_physical_units_reference_values() {
    let m = physical_flat(0.3);
    assert_relative_eq!(m.comoving_distance(1.0).unwrap(), 3303.8288, max_relative = 1e-6);
    assert_relative_eq!(m.comoving_distance_elliptic(1.0).unwrap(), 3303.8288, max_relative = 1e-6);
}

#[test]
fn test_elliptic_agrees_with_quadrature() {
    for om in [0.2, 0.27, 0.3, 0.5] {
        let m = CosmologicalModel::new(CosmologyParameters::flat_lcdm(om)).unwrap();
        for i in 0..=20 {
            let z = 0.25 * i as f64;
            let fast = m.comoving_distance_elliptic(z).unwrap();
            let slow = m.comoving_distance_quadrature(z).unwrap();
            if z == 0.0 {
                assert_eq!(fast, 0.0);
                assert_eq!(slow, 0.0);
            } else {
                assert_relative_eq!(fast, slow, max_relative = 1e-6);
            }
        }
    }
}

#[test]
fn test_distance_kinds_by_name() {
    let m = CosmologicalModel::default();
    let z = 0.6;
    let by_name = |name: &str| m.distance(z, name.parse::<DistanceKind>().unwrap()).unwrap();
    assert_eq!(by_name("DC"), m.comoving_distance(z).unwrap());
    assert_eq!(by_name("DA"), m.angular_diameter_distance(z).unwrap());
    assert_eq!(by_name("DL"), m.luminosity_distance(z).unwrap());
    assert_eq!(by_name("Dv"), m.volume_averaged_distance(z).unwrap());
    assert!(matches!("Dz".parse::<DistanceKind>(), Err(Error::UnsupportedModel(_))));
}

#[test]
fn test_construction_errors() {
    assert!(matches!(
        CosmologicalModel::new(CosmologyParameters::default().with_densities(0.0, 1.0, 0.0)),
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(
        CosmologicalModel::with_model_name(
            CosmologyParameters::default(),
            "EXP999",
            EngineConfig::new(".")
        ),
        Err(Error::UnsupportedModel(_))
    ));
    let cpl =
        CosmologicalModel::new(CosmologyParameters::default().with_dark_energy_eos(-0.9, 0.1))
            .unwrap();
    assert!(matches!(cpl.z_acceleration(), Err(Error::UnsupportedModel(_))));
}

// ─── Inversion ────────────────────────────────────────────────────────────────

#[test]
fn test_round_trip_in_physical_units() {
    let m = physical_flat(0.3);
    for z in [0.1, 0.5, 1.0, 2.0] {
        let d_c = m.comoving_distance(z).unwrap();
        let fast = m.redshift_lcdm(d_c, 0.0, 10.0, &EllipticEvaluator, 1e-9).unwrap();
        let slow = m.redshift_lcdm(d_c, 0.0, 10.0, &QuadratureEvaluator, 1e-9).unwrap();
        let brent = m.redshift(d_c, 0.0, 10.0, 1e-9).unwrap();
        assert_abs_diff_eq!(fast, z, epsilon = 1e-5);
        assert_abs_diff_eq!(slow, z, epsilon = 1e-5);
        assert_abs_diff_eq!(brent, z, epsilon = 1e-5);
    }
}

#[test]
fn test_cosmic_time_round_trip() {
    let m = physical_flat(0.3);
    let age = m.cosmic_time(0.0).unwrap();
    assert_relative_eq!(age, 13.466_983, max_relative = 1e-6);
    for z in [0.5, 3.0] {
        let t = m.cosmic_time(z).unwrap();
        assert_relative_eq!(t + m.lookback_time(z).unwrap(), age, max_relative = 1e-6);
        assert_abs_diff_eq!(m.redshift_from_time(t, 0.0, 20.0).unwrap(), z, epsilon = 1e-4);
    }
}

// ─── Tabulated models ─────────────────────────────────────────────────────────

/// Writes a table of `D_C / D_H` for flat ΛCDM with Ω_m = 0.27 where a
/// tabulated model expects it, and returns the configuration pointing at it.
fn write_reference_table(dir: &std::path::Path, model: TabulatedModel) -> EngineConfig {
    let config = EngineConfig::new(dir);
    let reference = CosmologicalModel::default();
    let rows: String = (0..=60)
        .map(|i| {
            let z = 0.05 * i as f64;
            let d = reference.comoving_distance(z).unwrap() / reference.hubble_distance();
            format!("{z}   {d}\n")
        })
        .collect();
    let path = config.comoving_table_path(model.file_name());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, rows).unwrap();
    config
}

#[test]
fn test_tabulated_model_lookup_and_inverse() {
    let dir = tempfile::tempdir().unwrap();
    let tag = TabulatedModel::LcdmBaldiWmap7;
    let config = write_reference_table(dir.path(), tag);
    let m = CosmologicalModel::with_config(
        CosmologyParameters::default().with_model(ModelKind::Tabulated(tag)),
        config,
    )
    .unwrap();
    let reference = CosmologicalModel::default();

    for z in [0.37, 2.43] {
        let d_c = m.comoving_distance(z).unwrap();
        assert_relative_eq!(d_c, reference.comoving_distance(z).unwrap(), max_relative = 1e-6);
        assert_abs_diff_eq!(m.redshift(d_c, 0.0, 5.0, 1e-5).unwrap(), z, epsilon = 1e-6);
    }
    assert!(matches!(
        m.redshift_lcdm(1000.0, 0.0, 5.0, &QuadratureEvaluator, 1e-5),
        Err(Error::UnsupportedModel(_))
    ));
}

#[test]
fn test_tabulated_model_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_reference_table(dir.path(), TabulatedModel::Sugra003BaldiCodecs);
    let m = CosmologicalModel::with_model_name(
        CosmologyParameters::default(),
        "SUGRA003_Baldi_CoDECS",
        config,
    )
    .unwrap();
    assert_eq!(m.model(), ModelKind::Tabulated(TabulatedModel::Sugra003BaldiCodecs));
    assert!(m.comoving_distance(1.2).unwrap() > 0.0);
}

#[test]
fn test_missing_table_is_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let m = CosmologicalModel::with_config(
        CosmologyParameters::default()
            .with_model(ModelKind::Tabulated(TabulatedModel::Exp003BaldiCodecs)),
        EngineConfig::new(dir.path()),
    )
    .unwrap();
    match m.comoving_distance(1.0) {
        Err(Error::IoFailure { path, .. }) => {
            assert!(path.ends_with("table_dc/EXP003_CoDECS-comovingdist.dat"));
        }
        other => panic!("expected IoFailure, got {other:?}"),
    }
}

#[test]
fn test_tabulated_model_rejects_unreliable_lookups() {
    let dir = tempfile::tempdir().unwrap();
    let tag = TabulatedModel::Exp008e3BaldiCodecs;
    let config = EngineConfig::new(dir.path());
    let path = config.comoving_table_path(tag.file_name());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    // D_C / D_H jumps between z = 1 and z = 1.5.
    std::fs::write(&path, "0 0\n0.5 0.01\n1 0.02\n1.5 1\n2 1.01\n2.5 1.02\n3 1.03\n").unwrap();
    let m = CosmologicalModel::with_config(
        CosmologyParameters::default().with_model(ModelKind::Tabulated(tag)),
        config,
    )
    .unwrap();

    assert!(matches!(m.comoving_distance(0.15), Err(Error::NumericalFailure(_))));
    let d_c = 0.5 * m.hubble_distance();
    assert!(matches!(m.redshift(d_c, 0.0, 3.0, 1e-5), Err(Error::NumericalFailure(_))));
    assert_relative_eq!(
        m.comoving_distance(2.0).unwrap(),
        1.01 * m.hubble_distance(),
        max_relative = 1e-12
    );
}

#[test]
fn test_generated_table_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let m = CosmologicalModel::with_config(
        CosmologyParameters::default(),
        EngineConfig::new(dir.path()),
    )
    .unwrap();
    let written = m.comoving_distance_table("LCDM-generated.dat", 0.0, 3.0, 30).unwrap();
    let reread = m.comoving_distance_table("LCDM-generated.dat", 0.0, 3.0, 30).unwrap();
    assert_eq!(written, reread);
    for (z, d) in written.redshifts().iter().zip(written.distances()) {
        assert_eq!(*d, m.comoving_distance(*z).unwrap());
    }
    // Generated tables hold distances in model units.
    let z = 1.234;
    assert_relative_eq!(
        written.comoving_distance_at(z, 1.0).unwrap(),
        m.comoving_distance(z).unwrap(),
        max_relative = 1e-6
    );
}
