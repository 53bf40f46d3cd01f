//! Topological and entanglement post-processing: Zak phases accumulated
//! over a closed momentum mesh, and bipartite entanglement entropies of
//! eigenstates across an external parameter scan.

use std::f64::consts::PI;
use ndarray::{ self as nd, s };
use num_complex::Complex64 as C64;
use num_traits::One;
use crate::{
    error::{ Error, Result },
    hilbert::{ self, SpaceDims, Subsystem },
};

/// Default half-width of the branch-cut window around +π; phases inside it
/// are wrapped to exactly −π.
pub const DEF_BRANCH_WINDOW: f64 = 1e-10;

/// Compute the Zak phase of each requested band from a set of eigenvectors
/// on a momentum mesh, with the result lying in `[-π, π)`.
///
/// `avec` is indexed by (momentum index, Hilbert-space component, band). For
/// each band, the phase is extracted from the product of inner products of
/// eigenvectors at adjacent mesh points; phases within `window` (defaulting
/// to [`DEF_BRANCH_WINDOW`], in units of π) of +π are wrapped to exactly −π.
///
/// The mesh must be closed (the final point equal to or wrapped onto the
/// first) for the result to be gauge-invariant; this is the caller's
/// responsibility (see [`k_mesh`][crate::dynamics::k_mesh]).
pub fn zak_phases(
    avec: &nd::Array3<C64>,
    nbands: Option<usize>,
    window: Option<f64>,
) -> Result<nd::Array1<f64>>
{
    let (nk, _, nbands_all) = avec.dim();
    if nk < 2 {
        return Err(Error::InvalidParams(
            "momentum mesh must contain at least two points".into()));
    }
    let nbands = nbands.unwrap_or(nbands_all);
    if nbands > nbands_all {
        return Err(Error::DimensionMismatch {
            expected: nbands_all,
            got: nbands,
        });
    }
    let window = window.unwrap_or(DEF_BRANCH_WINDOW);
    let mut phases: nd::Array1<f64> = nd::Array1::zeros(nbands);
    for (j, ph) in phases.iter_mut().enumerate() {
        let mut prod = C64::one();
        for k in 0..nk - 1 {
            let a = avec.slice(s![k, .., j]);
            let b = avec.slice(s![k + 1, .., j]);
            prod *= a.iter().zip(&b)
                .map(|(ai, bi)| ai.conj() * bi)
                .sum::<C64>();
        }
        let mut phase = -prod.arg();
        if PI * (1.0 - window) < phase && phase < PI * (1.0 + window) {
            phase = -PI;
        }
        *ph = phase;
    }
    Ok(phases)
}

/// Compute the bipartite entanglement entropies of the `index`-th
/// eigenvector across an external parameter scan.
///
/// Each element of `eigvecs` holds one diagonalization's eigenvector matrix,
/// columns being eigenvectors over the composite space described by `dims`.
/// Returns one (photonic, lattice) entropy pair per scan value, as two
/// ordered arrays.
pub fn entropy_scan(
    eigvecs: &[nd::Array2<C64>],
    index: usize,
    dims: SpaceDims,
) -> Result<(nd::Array1<f64>, nd::Array1<f64>)>
{
    let mut s_phot: Vec<f64> = Vec::with_capacity(eigvecs.len());
    let mut s_latt: Vec<f64> = Vec::with_capacity(eigvecs.len());
    for V in eigvecs.iter() {
        dims.check(V.nrows())?;
        if index >= V.ncols() {
            return Err(Error::DimensionMismatch {
                expected: V.ncols(),
                got: index,
            });
        }
        let psi: nd::Array1<C64> = V.slice(s![.., index]).to_owned();
        let rho_phot
            = hilbert::reduced_density(&psi, dims, Subsystem::Cavity)?;
        let rho_latt
            = hilbert::reduced_density(&psi, dims, Subsystem::Lattice)?;
        s_phot.push(hilbert::vn_entropy(&rho_phot)?);
        s_latt.push(hilbert::vn_entropy(&rho_latt)?);
    }
    Ok((nd::Array1::from_vec(s_phot), nd::Array1::from_vec(s_latt)))
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray_linalg::{ Eigh, UPLO };
    use crate::dynamics::{ bloch_ssh, k_mesh, BzConvention };

    fn band_eigenvectors(hop: [f64; 2], nk: usize) -> nd::Array3<C64> {
        let mesh = k_mesh(nk, BzConvention::PositiveBranch);
        let mut avec: nd::Array3<C64> = nd::Array3::zeros((nk, 2, 2));
        for (k, &kval) in mesh.iter().enumerate() {
            let (_, mut V) = bloch_ssh(hop, kval).eigh(UPLO::Lower).unwrap();
            // fix the eigenvector gauge so the mesh endpoints coincide
            for mut col in V.columns_mut() {
                let phase = col[0] / col[0].norm();
                col.mapv_inplace(|a| a / phase);
            }
            avec.slice_mut(s![k, .., ..]).assign(&V);
        }
        avec
    }

    #[test]
    fn trivial_phase_is_zero() {
        let avec = band_eigenvectors([1.0, 0.4], 201);
        let phases = zak_phases(&avec, None, None).unwrap();
        assert!(phases[0].abs() < 1e-8);
        assert!(phases[1].abs() < 1e-8);
    }

    #[test]
    fn topological_phase_is_minus_pi() {
        let avec = band_eigenvectors([0.4, 1.0], 201);
        let phases = zak_phases(&avec, Some(1), None).unwrap();
        assert!((phases[0] + PI).abs() < 1e-8);
    }

    #[test]
    fn product_eigenstate_has_no_entanglement() {
        let dims = SpaceDims::new(2, 2).unwrap();
        // columns: |0>x|0>, |0>x|1>, |1>x|0>, |1>x|1>
        let V: nd::Array2<C64> = nd::Array2::eye(4);
        let (s_phot, s_latt) = entropy_scan(&[V], 0, dims).unwrap();
        assert!(s_phot[0].abs() < 1e-12);
        assert!(s_latt[0].abs() < 1e-12);
    }

    #[test]
    fn bell_eigenstate_has_maximal_entanglement() {
        let dims = SpaceDims::new(2, 2).unwrap();
        let r = C64::from(0.5_f64.sqrt());
        let mut V: nd::Array2<C64> = nd::Array2::eye(4);
        V[[0, 0]] = r;
        V[[3, 0]] = r;
        let scan = vec![V.clone(), V];
        let (s_phot, s_latt) = entropy_scan(&scan, 0, dims).unwrap();
        assert_eq!(s_phot.len(), 2);
        for s in s_phot.iter().chain(s_latt.iter()) {
            assert!((s - 2.0_f64.ln()).abs() < 1e-12);
        }
    }

    #[test]
    fn out_of_range_band_rejected() {
        let avec = band_eigenvectors([1.0, 0.4], 11);
        assert!(zak_phases(&avec, Some(3), None).is_err());
    }
}
