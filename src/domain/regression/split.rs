//! Seeded train/test split of row indices

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::DomainError;

/// Row indices for each side of a split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with a seeded RNG and carve off `ceil(test_size * n)`
/// rows for testing. The same seed always yields the same split.
pub fn train_test_split(
    n_rows: usize,
    test_size: f64,
    random_state: u64,
) -> Result<TrainTestSplit, DomainError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DomainError::validation(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (test_size * n_rows as f64).ceil() as usize;
    let n_train = n_rows.saturating_sub(n_test);

    if n_test == 0 || n_train == 0 {
        return Err(DomainError::training(format!(
            "Cannot split {} rows with test_size {}: both splits need at least one row",
            n_rows, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(random_state);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);

    Ok(TrainTestSplit {
        train,
        test: indices,
    })
}
