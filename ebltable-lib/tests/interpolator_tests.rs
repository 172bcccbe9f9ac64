mod common;

use approx::assert_relative_eq;
use ebltable::{EblError, EblGrid, EblInterpolator, GridAxis, IntegralRange};
use ndarray::Array2;
use std::f64::consts::LN_10;

fn synthetic() -> EblInterpolator {
    EblInterpolator::new(common::synthetic_grid()).unwrap()
}

#[test]
fn test_reproduces_tabulated_values() {
    let ebl = synthetic();
    let z = common::synthetic_redshifts();
    let l = common::synthetic_wavelengths();
    let out = ebl.intensity_at(&z, &l).unwrap();
    for (i, &zi) in z.iter().enumerate() {
        for (j, &lj) in l.iter().enumerate() {
            assert_relative_eq!(
                out[[i, j]],
                common::synthetic_nuinu(lj, zi),
                max_relative = 1e-9
            );
        }
    }
}

#[test]
fn test_interpolates_between_nodes() {
    let ebl = synthetic();
    for &(z, l) in &[(0.1, 1.3), (0.75, 0.42), (1.7, 95.0), (2.5, 300.0)] {
        let v = ebl.intensity_one(z, l).unwrap();
        assert_relative_eq!(v, common::synthetic_nuinu(l, z), max_relative = 0.02);
    }
}

#[test]
fn test_permutation_invariance() {
    let ebl = synthetic();
    let z = vec![0.3, 2.2, 0.0, 1.1, 0.7];
    let l = vec![50.0, 0.2, 3.0, 0.9, 700.0, 12.0];
    let base = ebl.intensity_at(&z, &l).unwrap();

    let pz = [4, 2, 0, 3, 1];
    let pl = [5, 1, 3, 0, 2, 4];
    let z_perm: Vec<f64> = pz.iter().map(|&i| z[i]).collect();
    let l_perm: Vec<f64> = pl.iter().map(|&j| l[j]).collect();
    let permuted = ebl.intensity_at(&z_perm, &l_perm).unwrap();

    for (a, &i) in pz.iter().enumerate() {
        for (b, &j) in pl.iter().enumerate() {
            assert_eq!(permuted[[a, b]], base[[i, j]]);
        }
    }
}

#[test]
fn test_unsorted_query_matches_pointwise() {
    let ebl = synthetic();
    let z = [1.5, 0.1];
    let l = [10.0, 0.5, 2.0];
    let grid = ebl.intensity_at(&z, &l).unwrap();
    for (i, &zi) in z.iter().enumerate() {
        for (j, &lj) in l.iter().enumerate() {
            assert_eq!(grid[[i, j]], ebl.intensity_one(zi, lj).unwrap());
        }
    }
}

#[test]
fn test_positivity() {
    let ebl = synthetic();
    let z: Vec<f64> = (0..31).map(|i| i as f64 * 0.1).collect();
    let l: Vec<f64> = (0..81).map(|i| 10f64.powf(-1.0 + i as f64 * 0.05)).collect();
    let nuinu = ebl.intensity_at(&z, &l).unwrap();
    assert!(nuinu.iter().all(|&v| v > 0.0 && v.is_finite()));

    let e: Vec<f64> = (0..50).map(|i| 10f64.powf(-3.0 + i as f64 * 0.08)).collect();
    let n = ebl.density_at(&z, &e).unwrap();
    assert_eq!(n.dim(), (31, 50));
    assert!(n.iter().all(|&v| v > 0.0 && v.is_finite()));
}

#[test]
fn test_irreparable_tie_rejected() {
    let z = vec![0.0, 0.5, 1.0];
    let l = vec![0.1, 1.0, 10.0, 10.0];
    let result = EblInterpolator::new(EblGrid::new(z, l, Array2::ones((4, 3))).unwrap());
    assert!(matches!(
        result,
        Err(EblError::NonMonotonicAxis {
            axis: GridAxis::Wavelength,
            ..
        })
    ));
}

#[test]
fn test_interior_tie_averaged() {
    let z = vec![0.0, 0.5, 1.0];
    let l = vec![0.1, 1.0, 1.0, 100.0, 1000.0];
    let ebl = EblInterpolator::new(EblGrid::new(z, l, Array2::ones((5, 3))).unwrap()).unwrap();
    assert_eq!(ebl.wavelength_um(), &[0.1, 1.0, 50.5, 100.0, 1000.0]);
}

#[test]
fn test_repeated_redshift_rejected() {
    let z = vec![0.0, 0.5, 0.5];
    let l = vec![0.1, 1.0, 10.0];
    let result = EblInterpolator::new(EblGrid::new(z, l, Array2::ones((3, 3))).unwrap());
    assert!(matches!(
        result,
        Err(EblError::NonMonotonicAxis {
            axis: GridAxis::Redshift,
            ..
        })
    ));
}

#[test]
fn test_non_positive_intensity_rejected() {
    let mut grid = common::synthetic_grid();
    grid.intensity[[3, 2]] = 0.0;
    assert!(matches!(
        EblInterpolator::new(grid),
        Err(EblError::NonPositiveIntensity { row: 3, col: 2, .. })
    ));
}

#[test]
fn test_warning_below_range() {
    common::capture_warnings();
    let ebl = synthetic()
        .with_redshifts(vec![0.5, 0.7, 1.0, 1.5, 2.0, 2.5, 3.5])
        .unwrap();
    assert!(common::take_warnings().is_empty());

    let out = ebl.intensity_at(&[0.1, 0.2, 1.0], &[1.0, 10.0]).unwrap();
    assert!(out.iter().all(|v| v.is_finite()));
    let warnings = common::take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("zmin = 0.50"), "{}", warnings[0]);

    // below-range values are evaluated at zmin
    assert_eq!(out[[0, 0]], ebl.intensity_one(0.5, 1.0).unwrap());
    common::take_warnings();

    ebl.density_at(&[0.0], &[0.1, 1.0]).unwrap();
    assert_eq!(common::take_warnings().len(), 1);

    ebl.integral_at(0.0, &IntegralRange::default()).unwrap();
    assert_eq!(common::take_warnings().len(), 1);

    ebl.intensity_at(&[0.5, 3.0], &[1.0]).unwrap();
    assert!(common::take_warnings().is_empty());
}

#[test]
fn test_density_of_flat_spectrum() {
    let z = vec![0.0, 1.0, 2.0];
    let l = vec![0.01, 0.1, 1.0, 10.0, 100.0];
    let ebl =
        EblInterpolator::new(EblGrid::new(z, l, Array2::from_elem((5, 3), 10.0)).unwrap()).unwrap();

    // 4π νIν / (c E²) in cm^-3 eV^-1 for νIν = 10 nW m^-2 sr^-1 at 1 eV
    assert_relative_eq!(
        ebl.density_one(0.5, 1.0).unwrap(),
        0.002_616_247,
        max_relative = 1e-6
    );

    let n = ebl.density_at(&[0.0, 1.0], &[0.5, 2.0]).unwrap();
    assert_relative_eq!(n[[1, 0]] / n[[0, 1]], 16.0, max_relative = 1e-10);
}

#[test]
fn test_density_uses_matching_wavelength() {
    let ebl = synthetic();
    // E = hc / λ: 1 eV <-> 1.2398419843 um
    let n = ebl.density_one(0.3, 1.0).unwrap();
    let nuinu = ebl.intensity_one(0.3, 1.239_841_984_332).unwrap();
    let expected = 4.0 * std::f64::consts::PI * nuinu * 1e-15
        / (299_792_458.0 * 1.602_176_634e-19);
    assert_relative_eq!(n, expected, max_relative = 1e-9);
}

#[test]
fn test_integral_matches_fine_quadrature() {
    let ebl = synthetic();
    let range = IntegralRange {
        lmin_um: 0.1,
        lmax_um: 100.0,
        steps: 100,
    };
    let simpson = ebl.integral_at(0.0, &range).unwrap();

    // trapezoid of ln(10) νIν over ln λ on a fine grid
    let n = 20_001;
    let ln_l: Vec<f64> = (0..n)
        .map(|i| 0.1f64.ln() + (100f64.ln() - 0.1f64.ln()) * i as f64 / (n - 1) as f64)
        .collect();
    let l: Vec<f64> = ln_l.iter().map(|x| x.exp()).collect();
    let nuinu = ebl.intensity_at(&[0.0], &l).unwrap();
    let reference: f64 = (1..n)
        .map(|i| 0.5 * (ln_l[i] - ln_l[i - 1]) * (nuinu[[0, i]] + nuinu[[0, i - 1]]))
        .sum::<f64>()
        * LN_10;

    assert_relative_eq!(simpson, reference, max_relative = 0.01);
}

#[test]
fn test_integral_grows_with_range() {
    let ebl = synthetic();
    let narrow = ebl
        .integral_at(
            0.5,
            &IntegralRange {
                lmin_um: 0.5,
                lmax_um: 5.0,
                steps: 51,
            },
        )
        .unwrap();
    let wide = ebl.integral_at(0.5, &IntegralRange::default()).unwrap();
    assert!(narrow > 0.0);
    assert!(wide > narrow);
}

#[test]
fn test_rebuild_on_wavelength_replacement() {
    let ebl = synthetic();
    let shifted: Vec<f64> = ebl.wavelength_um().iter().map(|l| l * 2.0).collect();
    let rebuilt = ebl.with_wavelengths(shifted).unwrap();
    assert_eq!(rebuilt.degrees(), ebl.degrees());
    assert_relative_eq!(
        rebuilt.intensity_one(0.5, 2.0).unwrap(),
        ebl.intensity_one(0.5, 1.0).unwrap(),
        max_relative = 1e-9
    );
    assert!(ebl.with_wavelengths(vec![1.0, 2.0]).is_err());
}

#[test]
fn test_higher_degree_fit() {
    let cubic = synthetic().with_degrees(3, 3).unwrap();
    assert_eq!(cubic.degrees(), (3, 3));
    let v = cubic.intensity_one(0.75, 0.42).unwrap();
    assert_relative_eq!(v, common::synthetic_nuinu(0.42, 0.75), max_relative = 0.02);
    assert!(matches!(
        synthetic().with_degrees(2, 7),
        Err(EblError::InvalidDegree { .. })
    ));
}
