//! Definitions to describe states, bases, composite spaces, and reductions
//! thereof.
//!
//! The composite Hilbert space used throughout this crate is ordered with the
//! cavity (photonic) factor first and the lattice (electronic) factor second;
//! [`SpaceDims`] carries that ordering explicitly and every tensor-product or
//! partial-trace operation validates against it.

use std::{ hash::Hash, ops::{ Deref, DerefMut } };
use indexmap::IndexMap;
use itertools::Itertools;
use ndarray as nd;
use ndarray_linalg::{ EigValsh, UPLO };
use num_complex::Complex64 as C64;
use num_traits::{ One, Zero };
use crate::error::{ Error, Result };

/* States *********************************************************************/

/// A single basis state of the composite cavity ⊗ lattice space: cavity Fock
/// index first, chain site index second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhotonSite(pub usize, pub usize);

impl PhotonSite {
    /// Return the cavity Fock index.
    pub fn photons(&self) -> usize { self.0 }

    /// Return the chain site index.
    pub fn site(&self) -> usize { self.1 }

    /// Return the unit-cell index of the site.
    pub fn cell(&self) -> usize { self.1 / 2 }

    /// Return the sublattice index of the site (0 for A, 1 for B).
    pub fn sublattice(&self) -> usize { self.1 % 2 }

    /// Return `true` if two states carry the same photon number.
    pub fn same_photons(&self, other: &Self) -> bool { self.0 == other.0 }
}

impl From<(usize, usize)> for PhotonSite {
    fn from(ns: (usize, usize)) -> Self {
        let (n, s) = ns;
        Self(n, s)
    }
}

/// Names one factor of the composite space.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Subsystem {
    /// The cavity (photonic) factor.
    Cavity,
    /// The lattice (electronic) factor.
    Lattice,
}

/// Ordered subsystem dimensions of the composite Hilbert space, cavity factor
/// first.
///
/// Composite basis index `q` decomposes as `q = n * lattice + s` with `n` the
/// cavity Fock index and `s` the site index; see [`Self::split`] and
/// [`Self::join`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpaceDims {
    /// Dimension of the cavity factor (`nmax + 1`).
    pub cavity: usize,
    /// Dimension of the lattice factor (`2 * ncells`).
    pub lattice: usize,
}

impl SpaceDims {
    /// Create a new `SpaceDims`, requiring both factors to be non-empty.
    pub fn new(cavity: usize, lattice: usize) -> Result<Self> {
        if cavity == 0 || lattice == 0 {
            return Err(Error::InvalidParams(
                "subsystem dimensions must be non-zero".into()));
        }
        Ok(Self { cavity, lattice })
    }

    /// Return the total composite dimension.
    pub fn total(&self) -> usize { self.cavity * self.lattice }

    /// Verify that `dim` equals the total composite dimension.
    pub fn check(&self, dim: usize) -> Result<()> {
        if dim != self.total() {
            return Err(Error::DimensionMismatch {
                expected: self.total(),
                got: dim,
            });
        }
        Ok(())
    }

    /// Decompose a composite basis index into (Fock index, site index).
    pub fn split(&self, index: usize) -> (usize, usize) {
        (index / self.lattice, index % self.lattice)
    }

    /// Compose a composite basis index from (Fock index, site index).
    pub fn join(&self, n: usize, s: usize) -> usize {
        n * self.lattice + s
    }

    /// Return the dimension of one factor.
    pub fn dim_of(&self, subsystem: Subsystem) -> usize {
        match subsystem {
            Subsystem::Cavity => self.cavity,
            Subsystem::Lattice => self.lattice,
        }
    }
}

/* Operators ******************************************************************/

/// Bosonic creation operator a† on a Fock space truncated at occupation
/// `nmax`.
pub fn create(nmax: usize) -> nd::Array2<C64> {
    let dim = nmax + 1;
    let mut op: nd::Array2<C64> = nd::Array2::zeros((dim, dim));
    for n in 0..nmax {
        op[[n + 1, n]] = C64::from(((n + 1) as f64).sqrt());
    }
    op
}

/// Bosonic annihilation operator a on a Fock space truncated at occupation
/// `nmax`.
pub fn destroy(nmax: usize) -> nd::Array2<C64> {
    let dim = nmax + 1;
    let mut op: nd::Array2<C64> = nd::Array2::zeros((dim, dim));
    for n in 0..nmax {
        op[[n, n + 1]] = C64::from(((n + 1) as f64).sqrt());
    }
    op
}

/// Photon number operator a†a on a Fock space truncated at occupation `nmax`.
pub fn number(nmax: usize) -> nd::Array2<C64> {
    let diag: nd::Array1<C64>
        = (0..=nmax).map(|n| C64::from(n as f64)).collect();
    nd::Array2::from_diag(&diag)
}

/// Total photon-number operator on the composite space.
pub fn nphotons_op(dims: SpaceDims) -> nd::Array2<C64> {
    let d = dims.total();
    let mut op: nd::Array2<C64> = nd::Array2::zeros((d, d));
    for q in 0..d {
        let (n, _) = dims.split(q);
        op[[q, q]] = C64::from(n as f64);
    }
    op
}

/// Compute the outer product |a⟩⟨b| of two state vectors.
pub fn outer_prod(a: &nd::Array1<C64>, b: &nd::Array1<C64>)
    -> nd::Array2<C64>
{
    nd::Array2::from_shape_fn(
        (a.len(), b.len()),
        |(i, j)| a[i] * b[j].conj(),
    )
}

/// Compute the tensor product of two state vectors, left factor first.
pub fn kron_state(a: &nd::Array1<C64>, b: &nd::Array1<C64>)
    -> nd::Array1<C64>
{
    a.iter().cartesian_product(b)
        .map(|(ai, bj)| ai * bj)
        .collect()
}

/// Get the array representation of the `n`-th basis state of a
/// `dim`-dimensional space.
pub fn fock_state(dim: usize, n: usize) -> Option<nd::Array1<C64>> {
    (n < dim).then(|| {
        (0..dim).map(|j| if j == n { C64::one() } else { C64::zero() })
            .collect()
    })
}

/// Expectation value ⟨ψ|O|ψ⟩ of an operator in a pure state.
pub fn expval(psi: &nd::Array1<C64>, op: &nd::Array2<C64>) -> C64 {
    psi.mapv(|a| a.conj()).dot(&op.dot(psi))
}

/* Reductions *****************************************************************/

/// Reduce a composite density matrix to one subsystem by tracing out the
/// complementary one.
///
/// Fails if `rho` does not match the composite dimension of `dims`.
pub fn partial_trace(
    rho: &nd::Array2<C64>,
    dims: SpaceDims,
    keep: Subsystem,
) -> Result<nd::Array2<C64>>
{
    dims.check(rho.nrows())?;
    dims.check(rho.ncols())?;
    let dl = dims.lattice;
    match keep {
        Subsystem::Cavity => {
            let dc = dims.cavity;
            let red: nd::Array2<C64>
                = nd::Array2::from_shape_fn(
                    (dc, dc),
                    |(m, n)| {
                        (0..dl).map(|s| rho[[m * dl + s, n * dl + s]]).sum()
                    },
                );
            Ok(red)
        },
        Subsystem::Lattice => {
            let dc = dims.cavity;
            let red: nd::Array2<C64>
                = nd::Array2::from_shape_fn(
                    (dl, dl),
                    |(i, j)| {
                        (0..dc).map(|n| rho[[n * dl + i, n * dl + j]]).sum()
                    },
                );
            Ok(red)
        },
    }
}

/// Compute the reduced density matrix of one subsystem directly from a pure
/// composite state, without materializing the full density matrix.
///
/// Equivalent to `partial_trace(&outer_prod(psi, psi), dims, keep)`.
pub fn reduced_density(
    psi: &nd::Array1<C64>,
    dims: SpaceDims,
    keep: Subsystem,
) -> Result<nd::Array2<C64>>
{
    dims.check(psi.len())?;
    let dl = dims.lattice;
    let dc = dims.cavity;
    match keep {
        Subsystem::Cavity => {
            let red: nd::Array2<C64>
                = nd::Array2::from_shape_fn(
                    (dc, dc),
                    |(m, n)| {
                        (0..dl)
                            .map(|s| psi[m * dl + s] * psi[n * dl + s].conj())
                            .sum()
                    },
                );
            Ok(red)
        },
        Subsystem::Lattice => {
            let red: nd::Array2<C64>
                = nd::Array2::from_shape_fn(
                    (dl, dl),
                    |(i, j)| {
                        (0..dc)
                            .map(|n| psi[n * dl + i] * psi[n * dl + j].conj())
                            .sum()
                    },
                );
            Ok(red)
        },
    }
}

/// Von Neumann entropy −Tr(ρ ln ρ) of a density matrix.
///
/// Eigenvalues at or below zero (possible through floating-point round-off
/// in a partial trace) contribute nothing.
pub fn vn_entropy(rho: &nd::Array2<C64>) -> Result<f64> {
    let ev: nd::Array1<f64> = rho.eigvalsh(UPLO::Lower)?;
    Ok(
        ev.iter()
            .filter(|l| **l > 0.0)
            .map(|l| -l * l.ln())
            .sum()
    )
}

/* Bases **********************************************************************/

/// A collection of unique basis states with associated energies in units of
/// angular frequency.
///
/// This collection is backed by a single [`IndexMap`], which can be accessed
/// via [`AsRef`], [`AsMut`], [`Deref`] and [`DerefMut`]; the map's insertion
/// order fixes the basis ordering of all array representations.
#[derive(Clone, Debug, PartialEq)]
pub struct Basis<S>
where S: Clone + Eq + Hash
{
    energies: IndexMap<S, f64>,
}

impl<S> AsRef<IndexMap<S, f64>> for Basis<S>
where S: Clone + Eq + Hash
{
    fn as_ref(&self) -> &IndexMap<S, f64> { &self.energies }
}

impl<S> AsMut<IndexMap<S, f64>> for Basis<S>
where S: Clone + Eq + Hash
{
    fn as_mut(&mut self) -> &mut IndexMap<S, f64> { &mut self.energies }
}

impl<S> Deref for Basis<S>
where S: Clone + Eq + Hash
{
    type Target = IndexMap<S, f64>;

    fn deref(&self) -> &Self::Target { &self.energies }
}

impl<S> DerefMut for Basis<S>
where S: Clone + Eq + Hash
{
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.energies }
}

impl<S> Default for Basis<S>
where S: Clone + Eq + Hash
{
    fn default() -> Self { Self { energies: IndexMap::default() } }
}

impl<S> FromIterator<(S, f64)> for Basis<S>
where S: Clone + Eq + Hash
{
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = (S, f64)>
    {
        Self { energies: iter.into_iter().collect() }
    }
}

impl<S> Basis<S>
where S: Clone + Eq + Hash
{
    /// Create a new, empty basis.
    pub fn new() -> Self { Self::default() }

    /// Return the number of states in the basis.
    pub fn num_states(&self) -> usize { self.energies.len() }

    /// Get the energy in units of angular frequency of a particular basis
    /// state.
    pub fn get_energy(&self, state: &S) -> Option<f64> {
        self.energies.get(state).copied()
    }

    /// Get an array representation of a particular basis state.
    ///
    /// The array is sized to match the number of states currently in `self`.
    pub fn get_vector(&self, state: &S) -> Option<nd::Array1<C64>> {
        self.energies.get_index_of(state)
            .map(|k| {
                let n = self.energies.len();
                (0..n).map(|j| if j == k { C64::one() } else { C64::zero() })
                    .collect()
            })
    }

    /// Get an array representation of a particular basis state by index.
    ///
    /// The array is sized to match the number of states currently in `self`.
    pub fn get_vector_index(&self, index: usize) -> Option<nd::Array1<C64>> {
        let n = self.energies.len();
        (index < n).then(|| {
            (0..n).map(|j| if j == index { C64::one() } else { C64::zero() })
                .collect()
        })
    }

    /// Get an array representation of a linear combination of basis states,
    /// with weights determined by a weighting function.
    ///
    /// The weighting function will be passed a state, its index, and its
    /// energy. The array is sized to match the number of states currently in
    /// `self` and is not renormalized.
    pub fn get_vector_weighted<F>(&self, weights: F) -> nd::Array1<C64>
    where F: Fn(&S, usize, f64) -> C64
    {
        self.energies.iter().enumerate()
            .map(|(index, (state, energy))| weights(state, index, *energy))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::c;

    fn approx(a: f64, b: f64, tol: f64) -> bool { (a - b).abs() < tol }

    #[test]
    fn ladder_algebra() {
        let nmax = 4;
        let n_op = create(nmax).dot(&destroy(nmax));
        let diff = (&n_op - &number(nmax)).mapv(|a| a.norm());
        assert!(diff.iter().all(|d| *d < 1e-15));
    }

    #[test]
    fn destroy_annihilates_vacuum() {
        let vac = fock_state(4, 0).unwrap();
        let out = destroy(3).dot(&vac);
        assert!(out.iter().all(|a| a.norm() < 1e-15));
    }

    #[test]
    fn reductions_agree() {
        let dims = SpaceDims::new(2, 3).unwrap();
        // arbitrary normalized composite state
        let mut psi: nd::Array1<C64>
            = nd::array![
                c!(0.5), c!(i 0.25), c!(-0.3),
                c!(0.1, i 0.4), c!(0.2), c!(i -0.6),
            ];
        let norm: C64 = psi.iter().map(|a| a * a.conj()).sum::<C64>().sqrt();
        psi /= norm;
        let rho = outer_prod(&psi, &psi);
        for keep in [Subsystem::Cavity, Subsystem::Lattice] {
            let from_rho = partial_trace(&rho, dims, keep).unwrap();
            let from_psi = reduced_density(&psi, dims, keep).unwrap();
            let diff = (&from_rho - &from_psi).mapv(|a| a.norm());
            assert!(diff.iter().all(|d| *d < 1e-12));
            let tr: C64 = from_psi.diag().iter().sum();
            assert!(approx(tr.re, 1.0, 1e-12));
        }
    }

    #[test]
    fn entropy_of_product_state_vanishes() {
        let dims = SpaceDims::new(2, 2).unwrap();
        let a = fock_state(2, 1).unwrap();
        let b = fock_state(2, 0).unwrap();
        let psi = kron_state(&a, &b);
        let rho = reduced_density(&psi, dims, Subsystem::Cavity).unwrap();
        assert!(vn_entropy(&rho).unwrap().abs() < 1e-12);
    }

    #[test]
    fn entropy_of_bell_state() {
        let dims = SpaceDims::new(2, 2).unwrap();
        let r = C64::from(0.5_f64.sqrt());
        let psi: nd::Array1<C64>
            = nd::array![r, C64::zero(), C64::zero(), r];
        let s_c
            = vn_entropy(
                &reduced_density(&psi, dims, Subsystem::Cavity).unwrap()
            ).unwrap();
        let s_l
            = vn_entropy(
                &reduced_density(&psi, dims, Subsystem::Lattice).unwrap()
            ).unwrap();
        assert!(approx(s_c, 2.0_f64.ln(), 1e-12));
        assert!(approx(s_l, 2.0_f64.ln(), 1e-12));
    }

    #[test]
    fn nphotons_expectation() {
        let dims = SpaceDims::new(3, 2).unwrap();
        let phot = fock_state(3, 2).unwrap();
        let site = fock_state(2, 1).unwrap();
        let psi = kron_state(&phot, &site);
        let n = expval(&psi, &nphotons_op(dims));
        assert!(approx(n.re, 2.0, 1e-12));
        assert!(n.im.abs() < 1e-12);
    }

    #[test]
    fn basis_vectors() {
        let basis: Basis<PhotonSite>
            = [(PhotonSite(0, 0), 0.0), (PhotonSite(0, 1), 0.0),
               (PhotonSite(1, 0), 1.0), (PhotonSite(1, 1), 1.0)]
            .into_iter()
            .collect();
        assert_eq!(basis.num_states(), 4);
        let v = basis.get_vector(&PhotonSite(1, 0)).unwrap();
        assert_eq!(v.len(), 4);
        assert!(approx(v[2].re, 1.0, 1e-15));
        assert_eq!(basis.get_energy(&PhotonSite(1, 1)), Some(1.0));
        let w = basis.get_vector_weighted(|s, _, _| {
            if s.photons() == 0 { C64::from(0.5_f64.sqrt()) }
            else { C64::zero() }
        });
        let norm: f64 = w.iter().map(|a| a.norm_sqr()).sum();
        assert!(approx(norm, 1.0, 1e-12));
    }
}
