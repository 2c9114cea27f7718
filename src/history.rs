//! Navigation history of fetched commanders.
//!
//! [`History`] is an append-only list of [`Visit`]s plus a cursor counted in
//! steps behind the newest entry. Moving forward from the newest entry is the
//! only way the list grows; moving forward anywhere else replays an existing
//! entry without touching the network.
//!
//! The lazy-fill helpers populate a visit's decklist and price on first use
//! and return the stored value on every later call.

use tracing::{debug, info, warn};

use crate::models::{ColorFilter, Visit};
use crate::pricing;
use crate::sources::{CommanderCatalog, DecklistSource, ImageResolver, PriceSource};

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Append-only visit list with a backward cursor.
///
/// Invariant: when non-empty, `back_steps <= len - 1` and the current visit
/// is `entries[len - 1 - back_steps]`.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<Visit>,
    back_steps: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the newest visit, `-1` when empty.
    pub fn count(&self) -> isize {
        self.entries.len() as isize - 1
    }

    /// Index of the newest visit.
    pub fn newest_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    /// How many steps the cursor sits behind the newest visit.
    pub fn back_steps(&self) -> usize {
        self.back_steps
    }

    /// Index of the current visit.
    pub fn cursor(&self) -> Option<usize> {
        self.newest_index().map(|newest| newest - self.back_steps)
    }

    /// True when the cursor is on the newest visit (or the history is empty).
    pub fn at_frontier(&self) -> bool {
        self.back_steps == 0
    }

    pub fn can_step_back(&self) -> bool {
        self.newest_index()
            .is_some_and(|newest| self.back_steps < newest)
    }

    pub fn entries(&self) -> &[Visit] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Visit> {
        self.entries.get(index)
    }

    pub fn current(&self) -> Option<&Visit> {
        self.cursor().map(|idx| &self.entries[idx])
    }

    pub fn current_mut(&mut self) -> Option<&mut Visit> {
        let idx = self.cursor()?;
        self.entries.get_mut(idx)
    }

    /// Move the cursor one visit back.
    ///
    /// Returns `None` without moving when already on the oldest visit.
    pub fn step_back(&mut self) -> Option<&Visit> {
        if !self.can_step_back() {
            return None;
        }
        self.back_steps += 1;
        self.current()
    }

    /// Move forward: replay the next visit, or append a fresh one at the frontier.
    ///
    /// `fetch` is only called when the cursor is on the newest visit (or the
    /// history is empty).
    pub fn advance<F>(&mut self, fetch: F) -> &Visit
    where
        F: FnOnce() -> Visit,
    {
        if self.back_steps > 0 {
            self.back_steps -= 1;
            let idx = self.entries.len() - 1 - self.back_steps;
            return &self.entries[idx];
        }
        self.entries.push(fetch());
        let newest = self.entries.len() - 1;
        &self.entries[newest]
    }
}

// ---------------------------------------------------------------------------
// Frontier fetch
// ---------------------------------------------------------------------------

/// Look up a new commander and resolve its image into a fresh [`Visit`].
///
/// A failed catalog lookup yields a placeholder visit carrying the
/// placeholder image, so the history always gains exactly one entry.
pub fn fetch_visit(
    catalog: &dyn CommanderCatalog,
    images: &dyn ImageResolver,
    filter: &ColorFilter,
    query: &str,
) -> Visit {
    match catalog.find_commander(filter, query) {
        Ok(commander) => {
            let image = images.resolve(&commander.image_uri);
            Visit::new(commander.name, image)
        }
        Err(e) => {
            warn!(filter = %filter, query, "Failed to find a commander: {}", e);
            Visit::placeholder(images.resolve(""))
        }
    }
}

// ---------------------------------------------------------------------------
// Lazy fills
// ---------------------------------------------------------------------------

/// Decklist of `visit`, fetched on first call.
///
/// A failed fetch returns an empty string and leaves the visit untouched so
/// the next call retries. Placeholder visits have no decklist.
pub fn lazy_decklist(visit: &mut Visit, source: &dyn DecklistSource) -> String {
    if let Some(decklist) = visit.decklist() {
        return decklist.to_string();
    }
    if visit.is_placeholder() {
        return String::new();
    }
    match source.fetch_average_decklist(visit.name()) {
        Ok(decklist) if !decklist.trim().is_empty() => {
            debug!(commander = visit.name(), "cached decklist");
            visit.fill_decklist(decklist).to_string()
        }
        Ok(_) => {
            warn!(commander = visit.name(), "Decklist source returned an empty deck");
            String::new()
        }
        Err(e) => {
            warn!(commander = visit.name(), "Failed to fetch decklist: {}", e);
            String::new()
        }
    }
}

/// Price of `visit`'s decklist, computed on first call.
///
/// Returns `0.0` without caching anything when no decklist is available or
/// `concurrency` is zero.
pub fn lazy_price(
    visit: &mut Visit,
    decklists: &dyn DecklistSource,
    prices: &dyn PriceSource,
    concurrency: usize,
) -> f64 {
    if let Some(price) = visit.price() {
        return price;
    }
    if concurrency == 0 {
        return 0.0;
    }
    let decklist = lazy_decklist(visit, decklists);
    if decklist.is_empty() {
        return 0.0;
    }
    let total = pricing::aggregate_decklist_price(&decklist, concurrency, prices);
    info!(commander = visit.name(), total, "cached deck price");
    visit.fill_price(total)
}
