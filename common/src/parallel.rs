//! Parallel processing utilities.
//!
//! Work is split into disjoint output chunks handed to rayon workers; no
//! chunk observes another chunk's output.

use rayon::prelude::*;

/// Multiplier for number of chunks relative to CPU threads.
/// Using 2x threads provides good load balancing when some chunks finish faster.
const CHUNKS_PER_THREAD: usize = 2;

/// Smallest number of elements worth handing to a worker.
const MIN_CHUNK_LEN: usize = 1024;

/// Compute rows per chunk for parallel image processing.
///
/// Divides the image height into roughly `num_threads * 2` chunks.
/// Minimum of 1 row per chunk.
#[inline]
pub fn rows_per_chunk(height: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (height / num_chunks).max(1)
}

/// Compute the element count per chunk for flat batch kernels.
#[inline]
pub fn chunk_len(len: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (len / num_chunks).max(MIN_CHUNK_LEN)
}

/// Apply a function to each index in parallel, writing into the slice.
///
/// # Arguments
/// * `data` - Mutable slice to fill with values
/// * `f` - Function that takes an index and returns a value
pub fn parallel_chunked<T, F>(data: &mut [T], f: F)
where
    T: Send + Sync,
    F: Fn(usize) -> T + Sync + Send,
{
    if data.is_empty() {
        return;
    }

    let chunk_size = chunk_len(data.len());

    data.par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let start_idx = chunk_idx * chunk_size;
            for (i, val) in chunk.iter_mut().enumerate() {
                *val = f(start_idx + i);
            }
        });
}

/// Process an image-shaped slice in parallel bands of whole rows.
///
/// `f` receives the index of the first row of the band and the band itself
/// (`rows * width` elements).
pub fn for_each_row_band<T, F>(data: &mut [T], width: usize, height: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    debug_assert_eq!(data.len(), width * height);
    if width == 0 || height == 0 {
        return;
    }

    let rows = rows_per_chunk(height);
    data.par_chunks_mut(width * rows)
        .enumerate()
        .for_each(|(band_idx, band)| f(band_idx * rows, band));
}
