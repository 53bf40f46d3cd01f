//! An open-boundary Su-Schrieffer-Heeger chain coupled to a single cavity
//! mode through its bond-alternation pattern.

use itertools::Itertools;
use ndarray::{ self as nd, s, linalg::kron };
use ndarray_linalg::{ EighInto, UPLO };
use num_complex::Complex64 as C64;
use crate::{
    error::{ Error, Result },
    hilbert::{ self, Basis, PhotonSite, SpaceDims },
};

/// Model parameters for the photon-coupled SSH chain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SshCavityParams {
    /// Intracell and intercell hopping amplitudes.
    pub hop: [f64; 2],
    /// Number of unit cells; the chain has `2 * ncells` sites.
    pub ncells: usize,
    /// Maximum photon occupation of the cavity mode; the cavity space has
    /// dimension `nmax + 1`.
    pub nmax: usize,
    /// Photon-lattice coupling strength.
    pub g: f64,
    /// Cavity mode frequency.
    pub omega: f64,
}

impl SshCavityParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.ncells == 0 {
            return Err(Error::InvalidParams(
                "chain must have at least one unit cell".into()));
        }
        if !self.hop.iter().all(|t| t.is_finite()) {
            return Err(Error::InvalidParams(
                "hopping amplitudes must be finite".into()));
        }
        if !self.g.is_finite() || !self.omega.is_finite() {
            return Err(Error::InvalidParams(
                "coupling and cavity frequency must be finite".into()));
        }
        Ok(())
    }

    /// Subsystem dimensions of the composite cavity ⊗ lattice space.
    pub fn space(&self) -> SpaceDims {
        SpaceDims { cavity: self.nmax + 1, lattice: 2 * self.ncells }
    }
}

/// Hamiltonian builder for an SSH chain of `2 * ncells` sites coupled to a
/// single cavity mode.
///
/// The model Hamiltonian is
/// ```math
/// \begin{align*}
///     H
///         &= \sum_i t_i (c_i^\dagger c_{i + 1} + \text{h.c.})
///         \\
///         &+ \Omega a^\dagger a
///         \\
///         &+ g (a + a^\dagger) \sum_i (-1)^i
///             (c_i^\dagger c_{i + 1} + \text{h.c.})
/// \end{align*}
/// ```
/// where `t_i` alternates between the intracell and intercell hopping
/// amplitudes along the open chain, and the composite space is ordered with
/// the cavity factor first.
#[derive(Clone, Debug)]
pub struct HBuilderSshCavity {
    pub(crate) basis: Basis<PhotonSite>,
    pub(crate) params: SshCavityParams,
    pub(crate) space: SpaceDims,
}

impl HBuilderSshCavity {
    /// Create a new `HBuilderSshCavity`, validating parameters first.
    pub fn new(params: SshCavityParams) -> Result<Self> {
        params.validate()?;
        let space = params.space();
        let basis: Basis<PhotonSite>
            = (0..space.cavity)
            .cartesian_product(0..space.lattice)
            .map(|(n, s)| (PhotonSite(n, s), (n as f64) * params.omega))
            .collect();
        Ok(Self { basis, params, space })
    }

    /// Return a reference to the full photon-site basis.
    pub fn basis(&self) -> &Basis<PhotonSite> { &self.basis }

    /// Return all model parameters.
    pub fn params(&self) -> SshCavityParams { self.params }

    /// Return the composite-space descriptor.
    pub fn space(&self) -> SpaceDims { self.space }

    /// Bare SSH hopping matrix on the chain alone, open boundaries.
    pub fn gen_chain(&self) -> nd::Array2<C64> {
        let nsites = self.space.lattice;
        let mut h: nd::Array2<C64> = nd::Array2::zeros((nsites, nsites));
        for b in 0..nsites - 1 {
            let t
                = if b % 2 == 0 { self.params.hop[0] }
                else { self.params.hop[1] };
            h[[b, b + 1]] = t.into();
            h[[b + 1, b]] = t.into();
        }
        h
    }

    /// Alternating-sign bond operator entering the cavity coupling: same
    /// bond structure as the hopping term, unit magnitude, opposite sign
    /// parity.
    pub(crate) fn gen_bond_parity(&self) -> nd::Array2<C64> {
        let nsites = self.space.lattice;
        let mut v: nd::Array2<C64> = nd::Array2::zeros((nsites, nsites));
        for b in 0..nsites - 1 {
            let sign = if b % 2 == 0 { 1.0 } else { -1.0 };
            v[[b, b + 1]] = sign.into();
            v[[b + 1, b]] = sign.into();
        }
        v
    }

    /// Lattice term 1<sub>cav</sub> ⊗ H<sub>SSH</sub>.
    pub fn gen_lattice(&self) -> nd::Array2<C64> {
        kron(&nd::Array2::eye(self.space.cavity), &self.gen_chain())
    }

    /// Cavity term Ω a†a ⊗ 1<sub>lat</sub>, taken from the basis state
    /// energies.
    pub fn gen_cavity(&self) -> nd::Array2<C64> {
        nd::Array2::from_diag(
            &self.basis.values().map(|e| C64::from(*e))
                .collect::<nd::Array1<C64>>()
        )
    }

    /// Interaction term g (a + a†) ⊗ V, with V the alternating ±1 bond
    /// operator.
    pub fn gen_interaction(&self) -> nd::Array2<C64> {
        let nmax = self.params.nmax;
        let quad: nd::Array2<C64>
            = (hilbert::create(nmax) + hilbert::destroy(nmax))
            .mapv(|a| self.params.g * a);
        kron(&quad, &self.gen_bond_parity())
    }

    /// Compute the time-independent total Hamiltonian: lattice + cavity +
    /// interaction.
    pub fn gen_static(&self) -> nd::Array2<C64> {
        self.gen_lattice() + self.gen_cavity() + self.gen_interaction()
    }

    /// Diagonalize the [total Hamiltonian][Self::gen_static].
    pub fn diagonalize(&self) -> Result<(nd::Array1<f64>, nd::Array2<C64>)> {
        self.gen_static().eigh_into(UPLO::Lower).map_err(Error::from)
    }

    /// Diagonalize the [total Hamiltonian][Self::gen_static] and return a
    /// ground state of the system.
    ///
    /// Note that, in general, there may be more than one state that minimizes
    /// the energy of the system; this method offers no guarantees about which
    /// ground state is returned.
    pub fn ground_state(&self) -> Result<(f64, nd::Array1<C64>)> {
        let (E, V) = self.diagonalize()?;
        Ok((E[0], V.slice(s![.., 0]).to_owned()))
    }
}
