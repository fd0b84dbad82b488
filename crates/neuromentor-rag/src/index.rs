//! Exact nearest-neighbour search over a flat buffer of vectors.
//!
//! Every search scans all stored vectors and ranks them by squared Euclidean
//! distance. Cost is linear in the number of vectors, which is fine for the
//! few dozen chunks of a single uploaded document.

use crate::error::{RagError, Result};

/// One search hit: the insertion position of the vector and its squared L2 distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    dimension: usize,
    len: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build an index over `embeddings`, taking the dimension from the first vector.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if the vectors differ in length.
    pub fn build(embeddings: &[Vec<f32>]) -> Result<Self> {
        let dimension = embeddings.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(dimension * embeddings.len());
        for vector in embeddings {
            if vector.len() != dimension {
                return Err(RagError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }
        Ok(Self {
            dimension,
            len: embeddings.len(),
            data,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn vector(&self, position: usize) -> &[f32] {
        let start = position * self.dimension;
        &self.data[start..start + self.dimension]
    }

    /// Return the `k` nearest vectors to `query`, nearest first.
    ///
    /// Equal distances keep insertion order. Asking for more neighbours than
    /// stored returns all of them; an empty index returns nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if `query` has the wrong length.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<Neighbor> = (0..self.len)
            .map(|position| Neighbor {
                position,
                distance: squared_l2(query, self.vector(position)),
            })
            .collect();

        // stable sort: ties stay in insertion order
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }
}

/// Squared Euclidean distance between two equal-length vectors.
#[must_use]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlatIndex {
        FlatIndex::build(&[
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 3.0],
            vec![5.0, 5.0],
        ])
        .unwrap()
    }

    #[test]
    fn squared_l2_basic() {
        assert!((squared_l2(&[0.0, 0.0], &[3.0, 4.0]) - 25.0).abs() < f32::EPSILON);
        assert!(squared_l2(&[1.5, -2.0], &[1.5, -2.0]).abs() < f32::EPSILON);
    }

    #[test]
    fn build_records_shape() {
        let index = sample();
        assert_eq!(index.len(), 4);
        assert_eq!(index.dimension(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn build_rejects_mixed_dimensions() {
        let err = FlatIndex::build(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn exact_match_comes_first_with_zero_distance() {
        let hits = sample().search(&[0.0, 3.0], 2).unwrap();
        assert_eq!(hits[0].position, 2);
        assert!(hits[0].distance.abs() < f32::EPSILON);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn results_are_ascending() {
        let hits = sample().search(&[0.9, 0.1], 4).unwrap();
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![1, 0, 2, 3]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let index = FlatIndex::build(&[vec![1.0], vec![-1.0], vec![1.0]]).unwrap();
        let hits = index.search(&[0.0], 3).unwrap();
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn k_larger_than_index_returns_all() {
        assert_eq!(sample().search(&[0.0, 0.0], 10).unwrap().len(), 4);
    }

    #[test]
    fn zero_k_returns_nothing() {
        assert!(sample().search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn empty_index_search_is_empty() {
        let index = FlatIndex::build(&[]).unwrap();
        assert!(index.is_empty());
        assert!(index.search(&[1.0, 2.0, 3.0], 3).unwrap().is_empty());
    }

    #[test]
    fn query_dimension_is_checked() {
        let err = sample().search(&[1.0], 1).unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { .. }));
    }

    mod proptest_index {
        use super::*;
        use proptest::prelude::*;

        fn vectors() -> impl Strategy<Value = Vec<Vec<f32>>> {
            (1usize..8).prop_flat_map(|dim| {
                prop::collection::vec(prop::collection::vec(-100.0f32..100.0, dim), 1..40)
            })
        }

        proptest! {
            #[test]
            fn stored_vector_is_its_own_nearest(data in vectors(), pick in any::<prop::sample::Index>()) {
                let index = FlatIndex::build(&data).unwrap();
                let target = pick.index(data.len());
                let hits = index.search(&data[target], 1).unwrap();
                prop_assert_eq!(hits[0].distance, 0.0);
                // a duplicate inserted earlier wins the tie
                let first_equal = data.iter().position(|v| v == &data[target]).unwrap();
                prop_assert_eq!(hits[0].position, first_equal);
            }

            #[test]
            fn search_returns_min_k_len_sorted_unique(data in vectors(), k in 0usize..50) {
                let index = FlatIndex::build(&data).unwrap();
                let query = data[0].clone();
                let hits = index.search(&query, k).unwrap();
                prop_assert_eq!(hits.len(), k.min(data.len()));
                prop_assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
                let mut positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
                positions.sort_unstable();
                positions.dedup();
                prop_assert_eq!(positions.len(), hits.len());
            }
        }
    }
}
