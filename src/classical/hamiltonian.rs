use smallvec::SmallVec;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;
use std::ops::Neg;
use tracing::trace;

/// The state of a single ising site, either `1` or `-1`.
pub type Spin = i8;

/// A local energy function: the contribution of one node given its state and the states of its
/// neighbors. Neighbor states are always handed over in ascending order of neighbor id.
///
/// Implementations must be deterministic and free of side effects.
pub trait Hamiltonian<S> {
    /// Energy contribution of a node in state `center` surrounded by `neighbors`.
    fn local_energy(&self, center: &S, neighbors: &[S]) -> f64;
}

impl<S, F> Hamiltonian<S> for F
where
    F: Fn(&S, &[S]) -> f64,
{
    fn local_energy(&self, center: &S, neighbors: &[S]) -> f64 {
        self(center, neighbors)
    }
}

/// Proposes a candidate state for a node given its current one.
pub trait StateTransform<S> {
    /// The proposed new state.
    fn transform(&self, state: &S) -> S;
}

impl<S, F> StateTransform<S> for F
where
    F: Fn(&S) -> S,
{
    fn transform(&self, state: &S) -> S {
        self(state)
    }
}

/// Nearest neighbor ising coupling plus a uniform field:
/// `H(c, ns) = 0.5 * sum(c * n) + c * h`
///
/// Each bond is seen once from either end, hence the half weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsingHamiltonian {
    external_field: f64,
}

impl IsingHamiltonian {
    /// Make a new hamiltonian with a fixed external field.
    pub fn new(external_field: f64) -> Self {
        Self { external_field }
    }

    /// The external field `h`.
    pub fn external_field(&self) -> f64 {
        self.external_field
    }

    /// Evaluate the local energy of `center` given its neighbors.
    pub fn evaluate(&self, center: Spin, neighbors: &[Spin]) -> f64 {
        let c = f64::from(center);
        let coupling: f64 = neighbors.iter().map(|n| c * f64::from(*n)).sum();
        0.5 * coupling + c * self.external_field
    }
}

impl Hamiltonian<Spin> for IsingHamiltonian {
    fn local_energy(&self, center: &Spin, neighbors: &[Spin]) -> f64 {
        self.evaluate(*center, neighbors)
    }
}

/// Negates a state: `flip(s) = -s`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flip;

impl<S> StateTransform<S> for Flip
where
    S: Clone + Neg<Output = S>,
{
    fn transform(&self, state: &S) -> S {
        -state.clone()
    }
}

type CacheKey<S> = (S, SmallVec<[S; 8]>);

/// Wraps a hamiltonian with a bounded cache keyed by `(center, neighbors)`.
///
/// The cache is flushed whenever it reaches `capacity` entries. It belongs to this value only,
/// so swapping the hamiltonian on a network also drops every cached energy.
pub struct Memoized<S, H> {
    inner: H,
    capacity: usize,
    cache: RefCell<HashMap<CacheKey<S>, f64>>,
}

impl<S, H> Debug for Memoized<S, H>
where
    H: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("inner", &self.inner)
            .field("capacity", &self.capacity)
            .field("cached", &self.cache.borrow().len())
            .finish()
    }
}

impl<S, H> Memoized<S, H>
where
    S: Clone + Eq + Hash,
    H: Hamiltonian<S>,
{
    /// Cache up to `capacity` evaluations of `inner`. The cache grows on demand, `capacity` only
    /// sets when it is flushed.
    pub fn new(inner: H, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The wrapped hamiltonian.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Number of cached evaluations.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Drop all cached evaluations.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().clear()
    }
}

impl<S, H> Hamiltonian<S> for Memoized<S, H>
where
    S: Clone + Eq + Hash,
    H: Hamiltonian<S>,
{
    fn local_energy(&self, center: &S, neighbors: &[S]) -> f64 {
        if self.capacity == 0 {
            return self.inner.local_energy(center, neighbors);
        }
        let key: CacheKey<S> = (center.clone(), neighbors.iter().cloned().collect());
        let cached = self.cache.borrow().get(&key).copied();
        if let Some(energy) = cached {
            return energy;
        }
        let energy = self.inner.local_energy(center, neighbors);
        let mut cache = self.cache.borrow_mut();
        if cache.len() >= self.capacity {
            trace!(capacity = self.capacity, "flushing hamiltonian cache");
            cache.clear();
        }
        cache.insert(key, energy);
        energy
    }
}
