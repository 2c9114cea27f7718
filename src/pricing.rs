//! Concurrent decklist pricing.
//!
//! A decklist is split into `concurrency` contiguous, balanced partitions.
//! Each non-empty partition is priced by its own scoped worker thread with a
//! single batch request, and the partial sums are added once every worker has
//! finished. A failing partition contributes zero; it never aborts its
//! siblings or the aggregation as a whole.

use std::thread;

use tracing::{debug, info, warn};

use crate::models::sum_prices;
use crate::sources::PriceSource;

/// Split `items` into exactly `n` contiguous slices whose sizes differ by at most one.
///
/// Slice `i` spans `i*len/n .. (i+1)*len/n`. When there are more slices than
/// items, the first `len` slices hold one item each and the rest are empty.
/// Returns no slices at all for empty input or `n == 0`.
///
/// ```rust
/// use command_tower::pricing::split_into_chunks;
///
/// let chunks = split_into_chunks(&[1, 2, 3, 4, 5], 2);
/// assert_eq!(chunks, vec![&[1, 2][..], &[3, 4, 5][..]]);
/// ```
pub fn split_into_chunks<T>(items: &[T], n: usize) -> Vec<&[T]> {
    let len = items.len();
    if len == 0 || n == 0 {
        return Vec::new();
    }
    if n > len {
        return (0..n)
            .map(|i| if i < len { &items[i..i + 1] } else { &items[len..] })
            .collect();
    }
    (0..n)
        .map(|i| &items[i * len / n..(i + 1) * len / n])
        .collect()
}

/// Card name of a `"<quantity> <name>"` line: everything after the first space.
///
/// A line without a space is taken whole.
pub fn card_name(line: &str) -> &str {
    let line = line.trim();
    match line.split_once(' ') {
        Some((_, name)) => name.trim(),
        None => line,
    }
}

/// Total price of a decklist, priced in `concurrency` parallel batches.
///
/// Blank lines are ignored. Returns `0.0` without contacting `source` when
/// there is nothing to price or `concurrency` is zero.
pub fn aggregate_price<S: AsRef<str>>(
    lines: &[S],
    concurrency: usize,
    source: &dyn PriceSource,
) -> f64 {
    let lines: Vec<&str> = lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .collect();

    let chunks = split_into_chunks(&lines, concurrency);
    if chunks.is_empty() {
        return 0.0;
    }

    let total: f64 = thread::scope(|scope| {
        let workers: Vec<_> = chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(idx, chunk)| scope.spawn(move || price_chunk(idx, chunk, source)))
            .collect();

        workers
            .into_iter()
            .map(|worker| {
                worker.join().unwrap_or_else(|_| {
                    warn!("Pricing worker panicked; counting its partition as 0");
                    0.0
                })
            })
            .sum()
    });

    info!(cards = lines.len(), partitions = chunks.len(), total, "priced decklist");
    total
}

/// [`aggregate_price`] over newline-separated decklist text.
pub fn aggregate_decklist_price(decklist: &str, concurrency: usize, source: &dyn PriceSource) -> f64 {
    let lines: Vec<&str> = decklist.lines().collect();
    aggregate_price(&lines, concurrency, source)
}

fn price_chunk(idx: usize, chunk: &[&str], source: &dyn PriceSource) -> f64 {
    let names: Vec<String> = chunk.iter().map(|line| card_name(line).to_string()).collect();
    match source.fetch_prices(&names) {
        Ok(prices) => {
            let partial = sum_prices(&prices);
            debug!(partition = idx, cards = names.len(), partial, "priced partition");
            partial
        }
        Err(e) => {
            warn!(partition = idx, "Failed to price partition: {}", e);
            0.0
        }
    }
}
