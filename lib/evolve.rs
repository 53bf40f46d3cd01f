//! Time-evolution engine: exact single-step propagator built by Hermitian
//! eigendecomposition, applied iteratively with per-step subsystem
//! reductions.
//!
//! The propagator `U = exp(-i H dt)` is computed once per run and reused for
//! every step, which assumes a uniform time grid; non-uniform grids are
//! rejected up front.

use ndarray::{ self as nd, s };
use ndarray_linalg::{ Eigh, UPLO };
use num_complex::Complex64 as C64;
use crate::{
    dynamics::hamiltonians::ssh_cavity::{ HBuilderSshCavity, SshCavityParams },
    error::{ Error, Result },
    hilbert::{ self, SpaceDims, Subsystem },
};

/// Tolerance on per-step probability normalization before a step is recorded
/// as drifting.
pub const NORM_TOL: f64 = 1e-9;

/// Hard bound on normalization drift; exceeding it aborts the run.
pub const NORM_ABORT: f64 = 1e-6;

/// Relative tolerance on time-grid uniformity.
const GRID_TOL: f64 = 1e-9;

/// Normalization drift recorded at a single propagation step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NormDrift {
    pub step: usize,
    pub subsystem: Subsystem,
    pub deviation: f64,
}

/// Occupation-probability trajectories of both subsystems, one row per time
/// point, plus any sub-fatal normalization drift recorded along the way.
#[derive(Clone, Debug)]
pub struct Propagation {
    /// Photon-number occupation distribution over time.
    pub prob_photon: nd::Array2<f64>,
    /// Site occupation distribution over time.
    pub prob_lattice: nd::Array2<f64>,
    /// Sub-fatal normalization drift records, in step order.
    pub drift: Vec<NormDrift>,
}

/// Check that `time` is uniformly spaced and strictly increasing, returning
/// the step size; a single-point grid gives zero.
pub(crate) fn uniform_dt(time: &nd::Array1<f64>) -> Result<f64> {
    if time.is_empty() { return Err(Error::EmptyGrid); }
    if time.len() == 1 { return Ok(0.0); }
    let dt = time[1] - time[0];
    if dt <= 0.0 {
        return Err(Error::InvalidParams(
            "time grid must be strictly increasing".into()));
    }
    let iter = time.iter().zip(time.iter().skip(1)).enumerate();
    for (step, (tk, tkp1)) in iter {
        let deviation = ((tkp1 - tk) - dt).abs();
        if deviation > GRID_TOL * dt {
            return Err(Error::NonUniformGrid { step, deviation });
        }
    }
    Ok(dt)
}

/// Compute the single-step evolution operator `U = exp(-i H dt)` by Hermitian
/// eigendecomposition.
///
/// With `H = V E V†`, the exponential is `V exp(-i E dt) V†` exactly; no
/// series truncation is involved and `U` is unitary to within floating-point
/// tolerance.
pub fn evolution_operator(h: &nd::Array2<C64>, dt: f64)
    -> Result<nd::Array2<C64>>
{
    let (E, V): (nd::Array1<f64>, nd::Array2<C64>) = h.eigh(UPLO::Lower)?;
    let phases: nd::Array1<C64>
        = E.mapv(|e| (-C64::i() * e * dt).exp());
    let vdag: nd::Array2<C64> = V.t().mapv(|a| a.conj());
    Ok(V.dot(&nd::Array2::from_diag(&phases).dot(&vdag)))
}

/// Compute the coherent evolution of the initial state `psi0` under a
/// time-independent Hamiltonian `h` over the whole grid `t`, one column per
/// time point, via a single diagonalization.
///
/// Note: `psi0` should be the initial state at time `t = 0`, not necessarily
/// any of the elements of `t`.
pub fn eigen_evolve(
    psi0: &nd::Array1<C64>,
    h: &nd::Array2<C64>,
    t: &nd::Array1<f64>,
) -> Result<nd::Array2<C64>>
{
    let (E, V): (nd::Array1<f64>, nd::Array2<C64>) = h.eigh(UPLO::Lower)?;
    let c: nd::Array1<C64> = V.t().mapv(|a| a.conj()).dot(psi0);
    let mut psi: nd::Array2<C64> = nd::Array::zeros((psi0.len(), t.len()));
    let iter = t.iter().zip(psi.axis_iter_mut(nd::Axis(1)));
    for (&tk, psik) in iter {
        V.dot(&(&c * &E.mapv(|e| (-C64::i() * e * tk).exp())))
            .move_into(psik);
    }
    Ok(psi)
}

/// Propagate an initial product state (cavity factor first) over a uniform
/// time grid, recording the reduced occupation distributions of both
/// subsystems at every time point.
///
/// Fails before any propagation step if either input state does not match
/// the composite space implied by `params`, or if the grid is empty or
/// non-uniform.
pub fn propagate(
    psi0_phot: &nd::Array1<C64>,
    psi0_elec: &nd::Array1<C64>,
    time: &nd::Array1<f64>,
    params: SshCavityParams,
) -> Result<Propagation>
{
    propagate_with(psi0_phot, psi0_elec, time, params, |_, _| ())
}

/// Like [`propagate`], reporting progress after each step through a callback
/// receiving `(completed steps, total steps)`.
///
/// The callback observes the loop only; it cannot alter numerical results.
pub fn propagate_with<F>(
    psi0_phot: &nd::Array1<C64>,
    psi0_elec: &nd::Array1<C64>,
    time: &nd::Array1<f64>,
    params: SshCavityParams,
    mut progress: F,
) -> Result<Propagation>
where F: FnMut(usize, usize)
{
    let builder = HBuilderSshCavity::new(params)?;
    let space = builder.space();
    if psi0_phot.len() != space.cavity {
        return Err(Error::DimensionMismatch {
            expected: space.cavity,
            got: psi0_phot.len(),
        });
    }
    if psi0_elec.len() != space.lattice {
        return Err(Error::DimensionMismatch {
            expected: space.lattice,
            got: psi0_elec.len(),
        });
    }
    let dt = uniform_dt(time)?;
    let nt = time.len();

    let mut prob_photon: nd::Array2<f64>
        = nd::Array2::zeros((nt, space.cavity));
    let mut prob_lattice: nd::Array2<f64>
        = nd::Array2::zeros((nt, space.lattice));
    prob_photon.slice_mut(s![0, ..])
        .assign(&psi0_phot.mapv(|a| a.norm_sqr()));
    prob_lattice.slice_mut(s![0, ..])
        .assign(&psi0_elec.mapv(|a| a.norm_sqr()));
    if nt == 1 {
        return Ok(Propagation { prob_photon, prob_lattice, drift: Vec::new() });
    }

    let U = evolution_operator(&builder.gen_static(), dt)?;
    let mut drift: Vec<NormDrift> = Vec::new();
    let mut psi: nd::Array1<C64> = hilbert::kron_state(psi0_phot, psi0_elec);
    for k in 1..nt {
        psi = U.dot(&psi);
        let p_phot = subsystem_occupations(
            &psi, space, Subsystem::Cavity, k, &mut drift)?;
        let p_latt = subsystem_occupations(
            &psi, space, Subsystem::Lattice, k, &mut drift)?;
        prob_photon.slice_mut(s![k, ..]).assign(&p_phot);
        prob_lattice.slice_mut(s![k, ..]).assign(&p_latt);
        progress(k, nt - 1);
    }
    Ok(Propagation { prob_photon, prob_lattice, drift })
}

/// Reduce the composite state to one subsystem and return the real diagonal
/// of the reduced density matrix, checking the normalization contract.
///
/// Round-off negativity within tolerance is clamped to zero; deviations past
/// [`NORM_TOL`] are recorded and deviations past [`NORM_ABORT`] abort.
fn subsystem_occupations(
    psi: &nd::Array1<C64>,
    space: SpaceDims,
    subsystem: Subsystem,
    step: usize,
    drift: &mut Vec<NormDrift>,
) -> Result<nd::Array1<f64>>
{
    let rho = hilbert::reduced_density(psi, space, subsystem)?;
    let p: nd::Array1<f64> = rho.diag().mapv(|a| a.re);
    let negativity
        = p.iter().fold(0.0_f64, |acc, pk| acc.max(-pk));
    let deviation = (p.sum() - 1.0).abs().max(negativity);
    if deviation > NORM_ABORT {
        return Err(Error::NormDrift { step, deviation });
    }
    if deviation > NORM_TOL {
        drift.push(NormDrift { step, subsystem, deviation });
    }
    Ok(p.mapv(|pk| pk.max(0.0)))
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_params() -> SshCavityParams {
        SshCavityParams {
            hop: [1.0, 0.5], ncells: 2, nmax: 1, g: 0.3, omega: 1.0 }
    }

    fn grid(t_max: f64, nt: usize) -> nd::Array1<f64> {
        nd::Array1::linspace(0.0, t_max, nt)
    }

    #[test]
    fn propagator_is_unitary() {
        let builder = HBuilderSshCavity::new(test_params()).unwrap();
        let U = evolution_operator(&builder.gen_static(), 0.05).unwrap();
        let udag = U.t().mapv(|a| a.conj());
        let prod = U.dot(&udag);
        let eye: nd::Array2<C64> = nd::Array2::eye(prod.nrows());
        let defect = (&prod - &eye).mapv(|a| a.norm())
            .iter().fold(0.0_f64, |acc, d| acc.max(*d));
        assert!(defect < 1e-9);
    }

    #[test]
    fn rows_sum_to_one() {
        let params = test_params();
        let space = params.space();
        let phot = hilbert::fock_state(space.cavity, 0).unwrap();
        let elec = hilbert::fock_state(space.lattice, 0).unwrap();
        let out
            = propagate(&phot, &elec, &grid(5.0, 101), params).unwrap();
        for row in out.prob_photon.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-8);
        }
        for row in out.prob_lattice.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-8);
            assert!(row.iter().all(|p| *p >= 0.0));
        }
        assert!(out.drift.is_empty());
    }

    #[test]
    fn zero_steps_returns_inputs() {
        let params = test_params();
        let space = params.space();
        let phot: nd::Array1<C64>
            = nd::array![C64::from(0.6), C64::from(0.8)];
        let elec = hilbert::fock_state(space.lattice, 2).unwrap();
        let out
            = propagate(&phot, &elec, &nd::array![0.0], params).unwrap();
        assert_eq!(out.prob_photon.dim(), (1, space.cavity));
        assert_eq!(out.prob_photon[[0, 0]], 0.6_f64 * 0.6);
        assert_eq!(out.prob_photon[[0, 1]], 0.8_f64 * 0.8);
        assert_eq!(out.prob_lattice[[0, 2]], 1.0);
    }

    #[test]
    fn rerun_is_identical() {
        let params = test_params();
        let space = params.space();
        let phot = hilbert::fock_state(space.cavity, 1).unwrap();
        let elec = hilbert::fock_state(space.lattice, 1).unwrap();
        let t = grid(2.0, 41);
        let a = propagate(&phot, &elec, &t, params).unwrap();
        let b = propagate(&phot, &elec, &t, params).unwrap();
        assert_eq!(a.prob_photon, b.prob_photon);
        assert_eq!(a.prob_lattice, b.prob_lattice);
    }

    #[test]
    fn uncoupled_cavity_stays_in_vacuum() {
        let params = SshCavityParams {
            hop: [1.0, 0.5], ncells: 2, nmax: 1, g: 0.0, omega: 1.0 };
        let space = params.space();
        let phot = hilbert::fock_state(space.cavity, 0).unwrap();
        let elec = hilbert::fock_state(space.lattice, 0).unwrap();
        let out
            = propagate(&phot, &elec, &nd::array![0.0, 0.1, 0.2], params)
            .unwrap();
        for k in 0..3 {
            assert!((out.prob_photon[[k, 0]] - 1.0).abs() < 1e-12);
            assert!(out.prob_photon[[k, 1]].abs() < 1e-12);
        }
        // the lattice still hops
        assert!(out.prob_lattice[[1, 0]] < 1.0 - 1e-4);
    }

    #[test]
    fn frozen_cavity_at_zero_cutoff() {
        let params = SshCavityParams {
            hop: [1.0, 0.5], ncells: 2, nmax: 0, g: 0.7, omega: 1.0 };
        let space = params.space();
        let phot = hilbert::fock_state(space.cavity, 0).unwrap();
        let elec = hilbert::fock_state(space.lattice, 1).unwrap();
        let out
            = propagate(&phot, &elec, &grid(3.0, 61), params).unwrap();
        for row in out.prob_photon.rows() {
            assert!((row[0] - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn dimension_mismatch_fails_fast() {
        let params = test_params();
        let phot = hilbert::fock_state(3, 0).unwrap();
        let elec = hilbert::fock_state(params.space().lattice, 0).unwrap();
        let res = propagate(&phot, &elec, &grid(1.0, 11), params);
        assert!(matches!(res, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn nonuniform_grid_rejected() {
        let params = test_params();
        let space = params.space();
        let phot = hilbert::fock_state(space.cavity, 0).unwrap();
        let elec = hilbert::fock_state(space.lattice, 0).unwrap();
        let t: nd::Array1<f64> = nd::array![0.0, 0.1, 0.3];
        let res = propagate(&phot, &elec, &t, params);
        assert!(matches!(res, Err(Error::NonUniformGrid { .. })));
    }

    #[test]
    fn stepwise_matches_closed_form() {
        let params = test_params();
        let space = params.space();
        let builder = HBuilderSshCavity::new(params).unwrap();
        let phot = hilbert::fock_state(space.cavity, 0).unwrap();
        let elec = hilbert::fock_state(space.lattice, 0).unwrap();
        let t = grid(1.0, 21);
        let out = propagate(&phot, &elec, &t, params).unwrap();

        let psi0 = hilbert::kron_state(&phot, &elec);
        let psi = eigen_evolve(&psi0, &builder.gen_static(), &t).unwrap();
        for k in 0..t.len() {
            let psik: nd::Array1<C64> = psi.slice(s![.., k]).to_owned();
            let rho = hilbert::reduced_density(
                &psik, space, Subsystem::Lattice).unwrap();
            let diff: f64
                = rho.diag().iter()
                .zip(out.prob_lattice.slice(s![k, ..]))
                .map(|(a, b)| (a.re - b).abs())
                .fold(0.0, f64::max);
            assert!(diff < 1e-9);
        }
    }
}
