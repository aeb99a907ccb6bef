//! Symmetric candidate relation produced by the banding index.

/// Symmetric adjacency from a sketch id to the ids sharing at least one band with it.
///
/// Every adjacency list is sorted and duplicate-free, and never contains the id itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateRelation {
    adjacency: Vec<Vec<usize>>,
}

impl CandidateRelation {
    /// Merges lists of undirected edges over `num_sketches` sketches.
    pub(crate) fn from_edges<I>(num_sketches: usize, edge_lists: I) -> Self
    where
        I: IntoIterator<Item = Vec<(usize, usize)>>,
    {
        let mut adjacency = vec![vec![]; num_sketches];
        for edges in edge_lists {
            for (i, j) in edges {
                debug_assert_ne!(i, j);
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }
        for candidates in adjacency.iter_mut() {
            candidates.sort_unstable();
            candidates.dedup();
            candidates.shrink_to_fit();
        }
        Self { adjacency }
    }

    /// Gets the candidates of sketch `id` in ascending order.
    /// An isolated or unknown id has no candidates.
    pub fn candidates(&self, id: usize) -> &[usize] {
        self.adjacency
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Checks if sketches `i` and `j` are candidates of each other.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.candidates(i).binary_search(&j).is_ok()
    }

    /// Enumerates all candidate pairs `(i, j)` with `i < j` in lexicographic order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, candidates)| {
            let from = candidates.partition_point(|&j| j <= i);
            candidates[from..].iter().map(move |&j| (i, j))
        })
    }

    /// Gets the number of sketches covered by the relation.
    pub fn num_sketches(&self) -> usize {
        self.adjacency.len()
    }

    /// Gets the number of undirected candidate pairs.
    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Gets the memory usage in bytes.
    pub fn memory_in_bytes(&self) -> usize {
        self.adjacency.len() * std::mem::size_of::<Vec<usize>>()
            + self.num_edges() * 2 * std::mem::size_of::<usize>()
    }
}
