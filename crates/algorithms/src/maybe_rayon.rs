//! Row iteration that is parallel with the `parallel` feature and
//! sequential without it.
//!
//! Conversion and inversion only ever iterate `0..rows`, so the sequential
//! side only has to provide `into_par_iter` on ranges and other
//! `IntoIterator`s; everything after it in the chain is plain `Iterator`.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

/// Number of threads rows are spread over
#[cfg(feature = "parallel")]
pub fn workers() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "parallel"))]
pub fn workers() -> usize {
    1
}

#[cfg(not(feature = "parallel"))]
pub use sequential::IntoParallelIterator;

#[cfg(not(feature = "parallel"))]
mod sequential {
    pub trait IntoParallelIterator: IntoIterator + Sized {
        fn into_par_iter(self) -> Self::IntoIter {
            self.into_iter()
        }
    }

    impl<I: IntoIterator> IntoParallelIterator for I {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_keep_order() {
        let squares: Vec<usize> = (0..8usize).into_par_iter().map(|r| r * r).collect();
        assert_eq!(squares, vec![0, 1, 4, 9, 16, 25, 36, 49]);
        assert!(workers() >= 1);
    }
}
