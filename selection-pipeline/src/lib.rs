pub mod scoring;

use std::collections::HashSet;

use common::{catalog::Catalog, error::AppError};
use rand::Rng;
use tracing::debug;

use scoring::cosine_similarity;

/// A candidate is rejected when its question embedding is more similar than
/// this to the previous question's.
pub const SIMILARITY_THRESHOLD: f32 = 0.7;

/// Rejection sampling gives up after this many attempts per question in the
/// category, converting a would-be infinite loop into an explicit error.
pub const MAX_ATTEMPTS_PER_QUESTION: usize = 10;

/// Pick the next question index for a category.
///
/// Samples uniformly from the category's index list, rejecting the previous
/// index, anything already asked this session, and (when embeddings are
/// available) anything too similar to the previous question. The accepted
/// index is inserted into `asked` so the caller can persist the updated
/// session state.
pub fn select_next(
    catalog: &Catalog,
    category: &str,
    previous_index: Option<usize>,
    asked: &mut HashSet<usize>,
    question_embeddings: Option<&[Vec<f32>]>,
) -> Result<usize, AppError> {
    select_next_with_rng(
        &mut rand::thread_rng(),
        catalog,
        category,
        previous_index,
        asked,
        question_embeddings,
    )
}

/// [`select_next`] with an injectable RNG, for deterministic tests.
pub fn select_next_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &Catalog,
    category: &str,
    previous_index: Option<usize>,
    asked: &mut HashSet<usize>,
    question_embeddings: Option<&[Vec<f32>]>,
) -> Result<usize, AppError> {
    let indices = catalog
        .category_indices(category)
        .ok_or_else(|| AppError::UnknownCategory(category.to_owned()))?;

    if indices.is_empty() {
        return Err(AppError::ExhaustedCategory {
            category: category.to_owned(),
            attempts: 0,
        });
    }

    let max_attempts = indices.len() * MAX_ATTEMPTS_PER_QUESTION;

    for attempt in 0..max_attempts {
        let candidate = indices[rng.gen_range(0..indices.len())];

        if Some(candidate) == previous_index || asked.contains(&candidate) {
            continue;
        }

        if let (Some(previous), Some(embeddings)) = (previous_index, question_embeddings) {
            if let (Some(a), Some(b)) = (embeddings.get(previous), embeddings.get(candidate)) {
                let similarity = cosine_similarity(a, b);
                if similarity > SIMILARITY_THRESHOLD {
                    debug!(
                        candidate,
                        previous, similarity, "Rejected candidate as too similar"
                    );
                    continue;
                }
            }
        }

        debug!(category, candidate, attempt, "Selected next question");
        asked.insert(candidate);
        return Ok(candidate);
    }

    Err(AppError::ExhaustedCategory {
        category: category.to_owned(),
        attempts: max_attempts,
    })
}
