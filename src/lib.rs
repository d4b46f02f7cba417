#![deny(
    missing_docs,
    unreachable_pub,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

//! `spin_network` models classical spin systems as undirected networks for monte carlo
//! simulations.
//!
//! A [`classical::Network`] holds one state per node and evaluates energies through a pluggable
//! [`classical::Hamiltonian`]. On top of it, [`classical::LatticeModel`] builds an ising model on
//! a periodic hypercubic lattice. Acceptance rules and random site selection are left to the
//! caller, which only needs `delta_energy`, `propose_state` and `set_state`.
//!
//! It also offers a few feature gated extras:
//! - serialization of lattice configurations using serde with the `serialize` feature.
//!
//! # Basic Ising Example
//! ```
//! use spin_network::classical::*;
//! use rand::prelude::*;
//!
//! let config = LatticeConfig::new(8).with_dimension(2).with_external_field(0.1);
//! let mut rng = rand::thread_rng();
//! let mut lattice = LatticeModel::new_with_rng(config, &mut rng).unwrap();
//! let beta = 0.5;
//!
//! // A single metropolis sweep driven from outside the library.
//! for _ in 0..lattice.num_nodes() {
//!     let node = rng.gen_range(0..lattice.num_nodes());
//!     let proposal = lattice.propose_state(node).unwrap();
//!     let delta_e = lattice.delta_energy(node, &proposal).unwrap();
//!     if delta_e <= 0.0 || rng.gen::<f64>() < (-beta * delta_e).exp() {
//!         lattice.set_state(node, proposal).unwrap();
//!     }
//! }
//! let energy = lattice.get_energy().unwrap();
//! ```
//!
//! # Custom Hamiltonians
//! ```
//! use spin_network::classical::*;
//!
//! // A path of three nodes with real valued states.
//! let mut network = Network::from_edges(vec![0.5f64, -0.5, 1.0], &[(0, 1), (1, 2)]).unwrap();
//! network.set_hamiltonian(|c: &f64, ns: &[f64]| -> f64 { ns.iter().map(|n| c * n).sum::<f64>() / 2.0 });
//! network.set_transform_state(|s: &f64| -s);
//! assert!((network.get_energy().unwrap() - (-0.75)).abs() < 1e-12);
//! ```

/// Classical networks and lattice models.
pub mod classical;
/// Error types.
pub mod errors;

pub use errors::{NetworkError, Result};
