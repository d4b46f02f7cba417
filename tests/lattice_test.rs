extern crate rand;
extern crate spin_network;
use rand::prelude::SmallRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spin_network::classical::*;
use spin_network::NetworkError;

fn make_lattice<R: Rng>(
    size: usize,
    dimension: usize,
    init: StateInitialization,
    field: f64,
    rng: &mut R,
) -> LatticeModel {
    let config = LatticeConfig::new(size)
        .with_dimension(dimension)
        .with_state_initialization(init)
        .with_external_field(field);
    LatticeModel::new_with_rng(config, rng).unwrap()
}

#[test]
fn adjacency_symmetric_zero_diagonal() {
    let mut rng = SmallRng::seed_from_u64(1234);
    for (size, dimension) in [(1, 1), (2, 2), (3, 1), (3, 3), (4, 2), (5, 2)] {
        let lattice = make_lattice(size, dimension, StateInitialization::Random, 0.0, &mut rng);
        let mat = lattice.adjacency_matrix();
        let n = lattice.num_nodes();
        for i in 0..n {
            assert_eq!(mat[i][i], 0);
            for j in 0..n {
                assert_eq!(mat[i][j], mat[j][i]);
            }
        }
    }
}

#[test]
fn degree_is_twice_dimension() {
    let mut rng = SmallRng::seed_from_u64(1234);
    for (size, dimension) in [(3, 1), (3, 2), (4, 2), (3, 3), (4, 4)] {
        let lattice = make_lattice(size, dimension, StateInitialization::Plus, 0.0, &mut rng);
        for node in 0..lattice.num_nodes() {
            assert_eq!(lattice.neighbors(node).unwrap().len(), 2 * dimension);
        }
        assert_eq!(lattice.num_edges(), lattice.num_nodes() * dimension);
    }
}

#[test]
fn size_one_has_no_neighbors() {
    let mut rng = SmallRng::seed_from_u64(1234);
    let lattice = make_lattice(1, 3, StateInitialization::Plus, 0.5, &mut rng);
    assert_eq!(lattice.num_nodes(), 1);
    assert!(lattice.neighbors(0).unwrap().is_empty());
    assert_eq!(lattice.num_edges(), 0);
    // Only the field term is left.
    assert_eq!(lattice.get_energy().unwrap(), 0.5);
}

#[test]
fn size_two_has_no_duplicate_edges() {
    let mut rng = SmallRng::seed_from_u64(1234);
    let lattice = make_lattice(2, 2, StateInitialization::Minus, 0.0, &mut rng);
    assert_eq!(lattice.num_nodes(), 4);
    assert_eq!(lattice.edges(), vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
    for node in 0..4 {
        assert_eq!(lattice.neighbors(node).unwrap().len(), 2);
    }
    assert_eq!(lattice.get_energy().unwrap(), 4.0);
}

#[test]
fn one_d_ring_energy() {
    let mut rng = SmallRng::seed_from_u64(1234);
    let lattice = make_lattice(4, 1, StateInitialization::Plus, 0.0, &mut rng);
    assert_eq!(lattice.edges(), vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
    assert_eq!(lattice.get_energy().unwrap(), 4.0);
}

#[test]
fn invalid_initialization() {
    let err = LatticeModel::from_keyword(4, 2, "invalid", 0.0).unwrap_err();
    assert!(matches!(err, NetworkError::InvalidInitialization(_)));
    let msg = err.to_string();
    for name in ["random", "plus", "minus"] {
        assert!(msg.contains(name), "{} missing from {}", name, msg);
    }
}

#[test]
fn not_configured_after_clear() {
    let mut rng = SmallRng::seed_from_u64(1234);
    let mut lattice = make_lattice(3, 2, StateInitialization::Random, 0.0, &mut rng);
    lattice.clear_hamiltonian();
    assert_eq!(
        lattice.get_energy(),
        Err(NetworkError::NotConfigured("hamiltonian"))
    );
    assert_eq!(
        lattice.delta_energy(0, &1),
        Err(NetworkError::NotConfigured("hamiltonian"))
    );
    lattice.set_hamiltonian(IsingHamiltonian::new(0.0));
    assert!(lattice.get_energy().is_ok());
}

#[test]
fn incremental_energy_tracks_full_recompute() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut lattice = make_lattice(6, 2, StateInitialization::Random, 0.3, &mut rng);
    let mut energy = lattice.get_energy().unwrap();
    let beta = 0.7;
    for _ in 0..2000 {
        let node = rng.gen_range(0..lattice.num_nodes());
        let proposal = lattice.propose_state(node).unwrap();
        let delta_e = lattice.delta_energy(node, &proposal).unwrap();
        if delta_e <= 0.0 || rng.gen::<f64>() < (-beta * delta_e).exp() {
            lattice.set_state(node, proposal).unwrap();
            energy += delta_e;
        }
    }
    assert!((energy - lattice.get_energy().unwrap()).abs() < 1e-9);
}

#[test]
fn flip_delta_is_antisymmetric() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut lattice = make_lattice(4, 3, StateInitialization::Random, -0.4, &mut rng);
    for node in 0..lattice.num_nodes() {
        let original = *lattice.state(node).unwrap();
        let flipped = lattice.propose_state(node).unwrap();
        assert_eq!(flipped, -original);
        let forward = lattice.delta_energy(node, &flipped).unwrap();
        lattice.set_state(node, flipped).unwrap();
        let backward = lattice.delta_energy(node, &original).unwrap();
        assert!((forward + backward).abs() < 1e-12);
    }
}

#[test]
fn ising_delta_closed_form() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let field = 0.25;
    let lattice = make_lattice(5, 2, StateInitialization::Random, field, &mut rng);
    for node in 0..lattice.num_nodes() {
        let s = f64::from(*lattice.state(node).unwrap());
        let sum: f64 = lattice
            .neighbors(node)
            .unwrap()
            .iter()
            .map(|j| f64::from(lattice.states()[*j]))
            .sum();
        let expected = -2.0 * s * (sum + field);
        let flipped = lattice.propose_state(node).unwrap();
        assert!((lattice.delta_energy(node, &flipped).unwrap() - expected).abs() < 1e-12);
    }
}

#[test]
fn positions_match_coordinates() {
    let mut rng = SmallRng::seed_from_u64(1234);
    let lattice = make_lattice(3, 3, StateInitialization::Plus, 0.0, &mut rng);
    for (i, p) in lattice.positions().iter().enumerate() {
        assert_eq!(&lattice.coordinates(i).unwrap(), p);
        assert_eq!(lattice.index_of(p).unwrap(), i);
    }
}

#[cfg(feature = "serialize")]
#[test]
fn config_roundtrip_json() {
    let config = LatticeConfig::new(5)
        .with_dimension(3)
        .with_state_initialization(StateInitialization::Minus)
        .with_external_field(1.5);
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"minus\""));
    let back: LatticeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
