//! Builders for the three additive terms of the model Hamiltonian: SSH
//! hopping on the chain, the cavity mode energy, and the bond-alternating
//! photon-lattice coupling.

pub mod ssh_cavity;
pub mod bloch;
