use crate::classical::graph::Network;
use crate::classical::hamiltonian::{Flip, IsingHamiltonian, Memoized, Spin};
use crate::classical::hypercubic::{self, Coordinates};
use crate::errors::{NetworkError, Result};
use rand::prelude::*;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

/// How the spins of a new lattice are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum StateInitialization {
    /// Each spin independently `1` or `-1` with equal odds.
    #[default]
    Random,
    /// All spins `1`.
    Plus,
    /// All spins `-1`.
    Minus,
}

impl FromStr for StateInitialization {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(Self::Random),
            "plus" => Ok(Self::Plus),
            "minus" => Ok(Self::Minus),
            _ => Err(NetworkError::InvalidInitialization(s.to_string())),
        }
    }
}

impl Display for StateInitialization {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Random => "random",
            Self::Plus => "plus",
            Self::Minus => "minus",
        })
    }
}

impl StateInitialization {
    /// Build `n` spins following this policy.
    pub fn initial_states<R: Rng>(self, n: usize, rng: &mut R) -> Vec<Spin> {
        match self {
            Self::Random => make_random_spin_state(n, rng),
            Self::Plus => vec![1; n],
            Self::Minus => vec![-1; n],
        }
    }
}

/// Randomly build a spin state.
pub fn make_random_spin_state<R: Rng>(n: usize, rng: &mut R) -> Vec<Spin> {
    (0..n)
        .map(|_| -> Spin {
            if rng.gen() {
                1
            } else {
                -1
            }
        })
        .collect()
}

/// Parameters of a [`LatticeModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LatticeConfig {
    /// Sites per axis, at least 1.
    pub size: usize,
    /// Number of axes, at least 1.
    pub dimension: usize,
    /// Initial spins.
    pub state_initialization: StateInitialization,
    /// Uniform field `h` coupling to every spin.
    pub external_field: f64,
    /// Capacity of a hamiltonian evaluation cache, `None` to evaluate every time.
    pub hamiltonian_cache: Option<usize>,
}

impl LatticeConfig {
    /// A square lattice of side `size` with random spins and no field.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            dimension: 2,
            state_initialization: StateInitialization::default(),
            external_field: 0.0,
            hamiltonian_cache: None,
        }
    }

    /// Set the number of axes.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the initialization policy.
    pub fn with_state_initialization(mut self, state_initialization: StateInitialization) -> Self {
        self.state_initialization = state_initialization;
        self
    }

    /// Set the external field.
    pub fn with_external_field(mut self, external_field: f64) -> Self {
        self.external_field = external_field;
        self
    }

    /// Cache up to `capacity` hamiltonian evaluations.
    pub fn with_hamiltonian_cache(mut self, capacity: usize) -> Self {
        self.hamiltonian_cache = Some(capacity);
        self
    }
}

/// An ising model on a periodic hypercubic lattice with nearest neighbor bonds.
///
/// Derefs to the underlying [`Network`], which comes with an [`IsingHamiltonian`] and a [`Flip`]
/// transform already installed.
///
/// ```
/// use spin_network::classical::*;
///
/// let config = LatticeConfig::new(4)
///     .with_dimension(1)
///     .with_state_initialization(StateInitialization::Plus);
/// let mut lattice = LatticeModel::new(config).unwrap();
/// assert_eq!(lattice.get_energy().unwrap(), 4.0);
///
/// let flipped = lattice.propose_state(0).unwrap();
/// let delta_e = lattice.delta_energy(0, &flipped).unwrap();
/// lattice.set_state(0, flipped).unwrap();
/// assert_eq!(lattice.get_energy().unwrap(), 4.0 + delta_e);
/// ```
#[derive(Debug)]
pub struct LatticeModel {
    network: Network<Spin>,
    size: usize,
    dimension: usize,
    external_field: f64,
}

impl LatticeModel {
    /// Make a new lattice, drawing random spins from the thread rng.
    pub fn new(config: LatticeConfig) -> Result<Self> {
        let mut rng = thread_rng();
        Self::new_with_rng(config, &mut rng)
    }

    /// Make a new lattice, drawing random spins from `rng`.
    pub fn new_with_rng<R: Rng>(config: LatticeConfig, rng: &mut R) -> Result<Self> {
        let LatticeConfig {
            size,
            dimension,
            state_initialization,
            external_field,
            hamiltonian_cache,
        } = config;
        let edges = hypercubic::nearest_neighbor_edges(size, dimension)?;
        let n = hypercubic::num_sites(size, dimension)?;
        let states = state_initialization.initial_states(n, rng);

        let mut network = Network::from_edges(states, &edges)?;
        let hamiltonian = IsingHamiltonian::new(external_field);
        match hamiltonian_cache {
            Some(capacity) => {
                network.set_hamiltonian(Memoized::<Spin, _>::new(hamiltonian, capacity))
            }
            None => network.set_hamiltonian(hamiltonian),
        }
        network.set_transform_state(Flip);

        Ok(Self {
            network,
            size,
            dimension,
            external_field,
        })
    }

    /// Make a new lattice with the initialization given by keyword: `"random"`, `"plus"` or
    /// `"minus"`.
    pub fn from_keyword(
        size: usize,
        dimension: usize,
        state_initialization: &str,
        external_field: f64,
    ) -> Result<Self> {
        let config = LatticeConfig::new(size)
            .with_dimension(dimension)
            .with_state_initialization(state_initialization.parse()?)
            .with_external_field(external_field);
        Self::new(config)
    }

    /// Sites per axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of axes.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The external field the lattice was built with.
    ///
    /// This is a construction parameter: installing another hamiltonian through
    /// [`Network::set_hamiltonian`] does not change it.
    pub fn external_field(&self) -> f64 {
        self.external_field
    }

    /// Coordinates of a site.
    pub fn coordinates(&self, node: usize) -> Result<Coordinates> {
        self.network.state(node)?;
        Ok(hypercubic::coordinates(node, self.size, self.dimension))
    }

    /// Site at the given coordinates, wrapped periodically.
    pub fn index_of(&self, coords: &[usize]) -> Result<usize> {
        if coords.len() != self.dimension {
            return Err(NetworkError::Configuration(format!(
                "expected {} coordinates, got {}",
                self.dimension,
                coords.len()
            )));
        }
        let wrapped: Coordinates = coords.iter().map(|c| c % self.size).collect();
        Ok(hypercubic::index_of(&wrapped, self.size))
    }

    /// Coordinates of every site in index order.
    pub fn positions(&self) -> Vec<Coordinates> {
        hypercubic::positions(self.size, self.dimension)
    }

    /// Sum of all spins.
    pub fn magnetization(&self) -> f64 {
        self.network.states().iter().map(|s| f64::from(*s)).sum()
    }

    /// Mean spin.
    pub fn magnetization_per_site(&self) -> f64 {
        self.magnetization() / self.network.num_nodes() as f64
    }

    /// Release the underlying network.
    pub fn into_network(self) -> Network<Spin> {
        self.network
    }
}

impl Deref for LatticeModel {
    type Target = Network<Spin>;

    fn deref(&self) -> &Self::Target {
        &self.network
    }
}

impl DerefMut for LatticeModel {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.network
    }
}
