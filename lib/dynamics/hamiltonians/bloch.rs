//! Momentum-space (Bloch) representation of the photon-coupled SSH chain.
//!
//! Each momentum `k` carries a 2×2 sublattice block; the full Bloch-sector
//! Hamiltonian is that block tensored against the cavity space with the same
//! ordering conventions as the real-space builder (cavity factor first).

use std::f64::consts::{ PI, TAU };
use ndarray::{ self as nd, linalg::kron };
use ndarray_linalg::{ EighInto, UPLO };
use num_complex::Complex64 as C64;
use num_traits::{ One, Zero };
use crate::{
    dynamics::hamiltonians::ssh_cavity::SshCavityParams,
    error::{ Error, Result },
    hilbert::{ self, SpaceDims },
};

/// Endpoint convention for the one-dimensional Brillouin zone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BzConvention {
    /// Momenta in `[0, 2π]`.
    PositiveBranch,
    /// Momenta in `[-π, π]`.
    Centered,
}

/// Generate a closed, uniform momentum mesh with `nk` points.
///
/// Both endpoints are included, so the final point wraps back onto the first;
/// gauge-invariant Zak phases require a closed mesh.
pub fn k_mesh(nk: usize, convention: BzConvention) -> nd::Array1<f64> {
    match convention {
        BzConvention::PositiveBranch => nd::Array1::linspace(0.0, TAU, nk),
        BzConvention::Centered => nd::Array1::linspace(-PI, PI, nk),
    }
}

/// Bare 2×2 Bloch Hamiltonian of the SSH chain at momentum `k`.
pub fn bloch_ssh(hop: [f64; 2], k: f64) -> nd::Array2<C64> {
    let offd = C64::from(hop[0]) + hop[1] * C64::cis(k);
    nd::array![
        [C64::zero(), offd],
        [offd.conj(), C64::zero()],
    ]
}

/// 2×2 momentum-space counterpart of the alternating ±1 real-space bond
/// operator.
pub(crate) fn bloch_bond_parity(k: f64) -> nd::Array2<C64> {
    let offd = C64::one() - C64::cis(k);
    nd::array![
        [C64::zero(), offd],
        [offd.conj(), C64::zero()],
    ]
}

/// Hamiltonian builder for a single Bloch sector of the photon-coupled SSH
/// chain.
///
/// The sublattice block replaces the real-space chain; all cavity and
/// interaction conventions match [`HBuilderSshCavity`][super::ssh_cavity::HBuilderSshCavity].
#[derive(Clone, Debug)]
pub struct HBuilderBloch {
    pub(crate) params: SshCavityParams,
    pub(crate) k: f64,
    pub(crate) space: SpaceDims,
}

impl HBuilderBloch {
    /// Create a new `HBuilderBloch` for momentum `k`, validating parameters
    /// first.
    pub fn new(params: SshCavityParams, k: f64) -> Result<Self> {
        params.validate()?;
        if !k.is_finite() {
            return Err(Error::InvalidParams("momentum must be finite".into()));
        }
        let space = SpaceDims { cavity: params.nmax + 1, lattice: 2 };
        Ok(Self { params, k, space })
    }

    /// Return all model parameters.
    pub fn params(&self) -> SshCavityParams { self.params }

    /// Return the momentum of this Bloch sector.
    pub fn k(&self) -> f64 { self.k }

    /// Return the composite-space descriptor (cavity ⊗ sublattice).
    pub fn space(&self) -> SpaceDims { self.space }

    /// Lattice term 1<sub>cav</sub> ⊗ H<sub>SSH</sub>(k).
    pub fn gen_lattice(&self) -> nd::Array2<C64> {
        kron(
            &nd::Array2::eye(self.space.cavity),
            &bloch_ssh(self.params.hop, self.k),
        )
    }

    /// Cavity term Ω a†a ⊗ 1₂.
    pub fn gen_cavity(&self) -> nd::Array2<C64> {
        let n_op: nd::Array2<C64>
            = hilbert::number(self.params.nmax)
            .mapv(|a| self.params.omega * a);
        kron(&n_op, &nd::Array2::eye(2))
    }

    /// Interaction term g (a + a†) ⊗ V(k).
    pub fn gen_interaction(&self) -> nd::Array2<C64> {
        let nmax = self.params.nmax;
        let quad: nd::Array2<C64>
            = (hilbert::create(nmax) + hilbert::destroy(nmax))
            .mapv(|a| self.params.g * a);
        kron(&quad, &bloch_bond_parity(self.k))
    }

    /// Compute the time-independent Bloch-sector Hamiltonian: lattice +
    /// cavity + interaction.
    pub fn gen_static(&self) -> nd::Array2<C64> {
        self.gen_lattice() + self.gen_cavity() + self.gen_interaction()
    }

    /// Diagonalize the [Bloch-sector Hamiltonian][Self::gen_static].
    pub fn diagonalize(&self) -> Result<(nd::Array1<f64>, nd::Array2<C64>)> {
        self.gen_static().eigh_into(UPLO::Lower).map_err(Error::from)
    }
}
