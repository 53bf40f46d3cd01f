//! Hamiltonian builders for the photon-coupled SSH chain, in real-space and
//! momentum-space (Bloch) representations.

pub mod hamiltonians;
pub use hamiltonians::{
    ssh_cavity::{ HBuilderSshCavity, SshCavityParams },
    bloch::{ HBuilderBloch, BzConvention, bloch_ssh, k_mesh },
};
