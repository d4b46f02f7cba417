//! Geometry of a periodic hypercubic lattice with side `size` in `dimension` dimensions.
//!
//! Sites are indexed in row-major order: the last axis varies fastest, so site `i` has
//! coordinate `(i / size^(D-1-d)) % size` on axis `d`.

use crate::classical::graph::Edge;
use crate::errors::{NetworkError, Result};
use itertools::Itertools;
use smallvec::SmallVec;
use tracing::debug;

/// Coordinates of a site, one entry per axis.
pub type Coordinates = SmallVec<[usize; 4]>;

/// Number of sites `size^dimension`, checking both are at least one and the count fits in memory.
pub fn num_sites(size: usize, dimension: usize) -> Result<usize> {
    if size < 1 {
        return Err(NetworkError::Configuration(format!(
            "lattice size must be at least 1, got {}",
            size
        )));
    }
    if dimension < 1 {
        return Err(NetworkError::Configuration(format!(
            "lattice dimension must be at least 1, got {}",
            dimension
        )));
    }
    u32::try_from(dimension)
        .ok()
        .and_then(|d| size.checked_pow(d))
        .ok_or_else(|| {
            NetworkError::Configuration(format!(
                "a lattice of size {} in {} dimensions has too many sites",
                size, dimension
            ))
        })
}

/// Row-major strides: `strides[d] = size^(dimension - 1 - d)`.
pub fn strides(size: usize, dimension: usize) -> Vec<usize> {
    let mut strides = vec![1usize; dimension];
    for d in (0..dimension.saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * size;
    }
    strides
}

/// Coordinates of site `index`. Indices past the last site wrap around the first axis.
///
/// # Panics
/// If `size` is zero.
pub fn coordinates(index: usize, size: usize, dimension: usize) -> Coordinates {
    strides(size, dimension)
        .into_iter()
        .map(|stride| (index / stride) % size)
        .collect()
}

/// Site index of `coords`, inverse of [`coordinates`].
pub fn index_of(coords: &[usize], size: usize) -> usize {
    coords.iter().fold(0, |acc, c| acc * size + c)
}

/// All site coordinates in index order.
pub fn positions(size: usize, dimension: usize) -> Vec<Coordinates> {
    (0..dimension)
        .map(|_| 0..size)
        .multi_cartesian_product()
        .map(Coordinates::from_vec)
        .collect()
}

/// Periodic distance between two positions on one axis, the shorter of the direct and the
/// wrapped path. Positions are taken modulo `size`.
///
/// # Panics
/// If `size` is zero.
pub fn minimum_image(a: usize, b: usize, size: usize) -> usize {
    let (a, b) = (a % size, b % size);
    let direct = if a > b { a - b } else { b - a };
    direct.min(size - direct)
}

/// True iff `a` and `b` differ on exactly one axis, by a minimum image displacement of one.
///
/// # Panics
/// If `size` is zero.
pub fn are_nearest_neighbors(a: &[usize], b: &[usize], size: usize) -> bool {
    let mut displaced = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| minimum_image(*x, *y, size))
        .filter(|d| *d != 0);
    matches!((displaced.next(), displaced.next()), (Some(1), None))
}

/// Nearest neighbor bonds of the periodic lattice, each once as `(i, j)` with `i < j`, sorted.
///
/// With `size == 1` there are no bonds. With `size == 2` the forward and backward neighbor on
/// an axis are the same site and share a single bond, giving `dimension` neighbors per site
/// instead of `2 * dimension`.
pub fn nearest_neighbor_edges(size: usize, dimension: usize) -> Result<Vec<Edge>> {
    let n = num_sites(size, dimension)?;
    let strides = strides(size, dimension);

    let mut edges: Vec<Edge> = (0..n)
        .flat_map(|i| {
            strides.iter().filter_map(move |stride| {
                let c = (i / stride) % size;
                let j = i - c * stride + ((c + 1) % size) * stride;
                if i == j {
                    None
                } else {
                    Some((i.min(j), i.max(j)))
                }
            })
        })
        .collect();
    // Sort just in case, and merge the coinciding bonds of size 2 lattices.
    edges.sort_unstable();
    edges.dedup();

    debug!(size, dimension, sites = n, bonds = edges.len(), "built hypercubic lattice");
    Ok(edges)
}
