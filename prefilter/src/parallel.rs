//! Parallel processing utilities.

/// Multiplier for number of chunks relative to CPU threads.
/// Using 2x threads provides good load balancing when some chunks finish faster.
const CHUNKS_PER_THREAD: usize = 2;

/// Minimum number of rows handed to one rayon task.
///
/// Splits `height` rows into roughly `num_threads * 2` chunks. Minimum of 1.
#[inline]
pub fn rows_per_chunk(height: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (height / num_chunks).max(1)
}
