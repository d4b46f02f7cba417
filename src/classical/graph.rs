use crate::classical::hamiltonian::{Hamiltonian, StateTransform};
use crate::errors::{NetworkError, Result};
use smallvec::SmallVec;
use std::fmt::{Debug, Formatter};
use tracing::{debug, trace};

/// An edge between two nodes.
pub type Edge = (usize, usize);
/// Neighbor ids of a node, sorted ascending.
pub type Neighbors = SmallVec<[usize; 6]>;
/// States of the neighbors of a node, in the same order as its [`Neighbors`].
pub type NeighborStates<S> = SmallVec<[S; 6]>;
/// A hamiltonian owned by a network.
pub type BoxedHamiltonian<S> = Box<dyn Hamiltonian<S> + Send>;
/// A state transform owned by a network.
pub type BoxedTransform<S> = Box<dyn StateTransform<S> + Send>;

/// An undirected network of interacting nodes, each carrying a state of type `S`.
///
/// The topology is fixed at construction; only the node states change afterwards.
pub struct Network<S> {
    pub(crate) neighbors: Vec<Neighbors>,
    pub(crate) states: Vec<S>,
    num_edges: usize,
    hamiltonian: Option<BoxedHamiltonian<S>>,
    transform: Option<BoxedTransform<S>>,
}

impl<S> Debug for Network<S>
where
    S: Clone + Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = self
            .states
            .iter()
            .map(|s| format!("{:?}", s))
            .collect::<Vec<_>>()
            .join(" ");
        match self.get_energy() {
            Ok(e) => f.write_str(&format!("{}\t{}", s, e)),
            Err(_) => f.write_str(&format!("{}\t<no hamiltonian>", s)),
        }
    }
}

impl<S> Network<S>
where
    S: Clone,
{
    /// Make a new network from the initial node states and a symmetric 0/1 adjacency matrix with
    /// an empty diagonal. Node `i` receives `states[i]`.
    pub fn from_adjacency<A>(states: Vec<S>, adjacency: &[A]) -> Result<Self>
    where
        A: AsRef<[u8]>,
    {
        let n = states.len();
        if adjacency.len() != n {
            return Err(NetworkError::Configuration(format!(
                "{} state values given for a {} row adjacency matrix",
                n,
                adjacency.len()
            )));
        }
        for (i, row) in adjacency.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(NetworkError::Configuration(format!(
                    "adjacency matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
        }

        let mut edges = vec![];
        for (i, row) in adjacency.iter().enumerate() {
            for (j, a) in row.as_ref().iter().cloned().enumerate() {
                if a > 1 {
                    return Err(NetworkError::Configuration(format!(
                        "adjacency entry ({}, {}) is {}, expected 0 or 1",
                        i, j, a
                    )));
                }
                if i == j && a != 0 {
                    return Err(NetworkError::Configuration(format!(
                        "self loop on node {}",
                        i
                    )));
                }
                if a != adjacency[j].as_ref()[i] {
                    return Err(NetworkError::Configuration(format!(
                        "adjacency matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
                if i < j && a == 1 {
                    edges.push((i, j));
                }
            }
        }
        Self::from_edges(states, &edges)
    }

    /// Make a new network from the initial node states and a list of undirected edges.
    pub fn from_edges(states: Vec<S>, edges: &[Edge]) -> Result<Self> {
        let n = states.len();
        let mut neighbors: Vec<Neighbors> = vec![Neighbors::new(); n];

        for (va, vb) in edges.iter().cloned() {
            if va >= n || vb >= n {
                return Err(NetworkError::Configuration(format!(
                    "edge ({}, {}) references a node outside of a {} node network",
                    va, vb, n
                )));
            }
            if va == vb {
                return Err(NetworkError::Configuration(format!(
                    "self loop on node {}",
                    va
                )));
            }
            neighbors[va].push(vb);
            neighbors[vb].push(va);
        }
        // Hamiltonians see neighbor states in ascending id order.
        for (i, vs) in neighbors.iter_mut().enumerate() {
            vs.sort_unstable();
            if let Some(w) = vs.windows(2).find(|w| w[0] == w[1]) {
                return Err(NetworkError::Configuration(format!(
                    "duplicate edge ({}, {})",
                    i.min(w[0]),
                    i.max(w[0])
                )));
            }
        }

        debug!(nodes = n, edges = edges.len(), "built network");
        Ok(Network {
            neighbors,
            states,
            num_edges: edges.len(),
            hamiltonian: None,
            transform: None,
        })
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.states.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Every edge once, as `(i, j)` with `i < j`, sorted.
    pub fn edges(&self) -> Vec<Edge> {
        self.neighbors
            .iter()
            .enumerate()
            .flat_map(|(i, vs)| vs.iter().filter(move |j| i < **j).map(move |j| (i, *j)))
            .collect()
    }

    /// Dense 0/1 adjacency matrix.
    pub fn adjacency_matrix(&self) -> Vec<Vec<u8>> {
        let n = self.num_nodes();
        let mut mat = vec![vec![0u8; n]; n];
        self.neighbors.iter().enumerate().for_each(|(i, vs)| {
            vs.iter().for_each(|j| mat[i][*j] = 1);
        });
        mat
    }

    /// Neighbors of a node, ascending.
    pub fn neighbors(&self, node: usize) -> Result<&[usize]> {
        self.check_node(node)?;
        Ok(&self.neighbors[node])
    }

    /// State of a node.
    pub fn state(&self, node: usize) -> Result<&S> {
        self.check_node(node)?;
        Ok(&self.states[node])
    }

    /// Get a ref of all node states.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Overwrite the state of a single node.
    pub fn set_state(&mut self, node: usize, value: S) -> Result<()> {
        self.check_node(node)?;
        self.states[node] = value;
        Ok(())
    }

    /// The hamiltonian, if one is set.
    pub fn hamiltonian(&self) -> Option<&(dyn Hamiltonian<S> + Send)> {
        self.hamiltonian.as_deref()
    }

    /// Set the hamiltonian used for all energy queries.
    pub fn set_hamiltonian<H>(&mut self, hamiltonian: H)
    where
        H: Hamiltonian<S> + Send + 'static,
    {
        trace!("hamiltonian set");
        self.hamiltonian = Some(Box::new(hamiltonian));
    }

    /// Remove the hamiltonian, returning it.
    pub fn clear_hamiltonian(&mut self) -> Option<BoxedHamiltonian<S>> {
        trace!("hamiltonian cleared");
        self.hamiltonian.take()
    }

    /// The state transform, if one is set.
    pub fn transform_state(&self) -> Option<&(dyn StateTransform<S> + Send)> {
        self.transform.as_deref()
    }

    /// Set the transform used to propose new states.
    pub fn set_transform_state<T>(&mut self, transform: T)
    where
        T: StateTransform<S> + Send + 'static,
    {
        trace!("state transform set");
        self.transform = Some(Box::new(transform));
    }

    /// Remove the state transform, returning it.
    pub fn clear_transform_state(&mut self) -> Option<BoxedTransform<S>> {
        trace!("state transform cleared");
        self.transform.take()
    }

    /// Apply the state transform to the current state of `node`.
    pub fn propose_state(&self, node: usize) -> Result<S> {
        self.check_node(node)?;
        let transform = self
            .transform
            .as_ref()
            .ok_or(NetworkError::NotConfigured("state transform"))?;
        Ok(transform.transform(&self.states[node]))
    }

    /// Get the energy of the system: the sum of every node's local energy.
    ///
    /// Nothing is divided out for bonds seen from both ends, pairwise hamiltonians carry that
    /// weight themselves.
    pub fn get_energy(&self) -> Result<f64> {
        let hamiltonian = self.hamiltonian_ref()?;
        Ok((0..self.num_nodes()).fold(0.0, |acc, i| {
            acc + hamiltonian.local_energy(&self.states[i], &self.neighbor_states(i))
        }))
    }

    /// Local energy contribution of a single node.
    pub fn local_energy(&self, node: usize) -> Result<f64> {
        self.check_node(node)?;
        let hamiltonian = self.hamiltonian_ref()?;
        Ok(hamiltonian.local_energy(&self.states[node], &self.neighbor_states(node)))
    }

    /// Change in [`get_energy`](Self::get_energy) if `node` were set to `new_state`. The network
    /// is left untouched.
    ///
    /// Both the local term of `node` and the terms of its neighbors (which see `node` among their
    /// own neighbors) are reevaluated, so summing committed deltas tracks the total energy for any
    /// hamiltonian.
    pub fn delta_energy(&self, node: usize, new_state: &S) -> Result<f64> {
        self.check_node(node)?;
        let hamiltonian = self.hamiltonian_ref()?;

        // new - old
        let own = self.neighbor_states(node);
        let delta_e = hamiltonian.local_energy(new_state, &own)
            - hamiltonian.local_energy(&self.states[node], &own);

        let delta_e = self.neighbors[node].iter().fold(delta_e, |acc, &j| {
            let mut around_j = self.neighbor_states(j);
            match self.neighbors[j].binary_search(&node) {
                Ok(slot) => {
                    let old_e = hamiltonian.local_energy(&self.states[j], &around_j);
                    around_j[slot] = new_state.clone();
                    let new_e = hamiltonian.local_energy(&self.states[j], &around_j);
                    acc + (new_e - old_e)
                }
                // Adjacency is symmetric, `node` is always found.
                Err(_) => acc,
            }
        });
        Ok(delta_e)
    }

    fn neighbor_states(&self, node: usize) -> NeighborStates<S> {
        self.neighbors[node]
            .iter()
            .map(|j| self.states[*j].clone())
            .collect()
    }

    fn hamiltonian_ref(&self) -> Result<&(dyn Hamiltonian<S> + Send)> {
        self.hamiltonian
            .as_deref()
            .ok_or(NetworkError::NotConfigured("hamiltonian"))
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node < self.num_nodes() {
            Ok(())
        } else {
            Err(NetworkError::UnknownNode {
                node,
                num_nodes: self.num_nodes(),
            })
        }
    }
}
