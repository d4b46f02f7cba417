//! Classical spin systems: networks of interacting sites and the ising model on periodic
//! hypercubic lattices.

/// Networks of nodes carrying states, with energies from a local hamiltonian.
pub mod graph;
/// Local energy functions and state transforms.
pub mod hamiltonian;
pub mod hypercubic;
/// Ising models on periodic hypercubic lattices.
pub mod lattice;

pub use graph::*;
pub use hamiltonian::*;
pub use lattice::*;
