//! Paged fetch controller for the user list.
//!
//! [`FeedQuery`] owns the accumulated pages and the in-flight guard. It never
//! talks to the network itself: every fetch starts as a [`PageRequest`]
//! ticket, the caller performs it against a [`PageSource`], and the outcome
//! comes back through [`FeedQuery::receive`]. A ticket from an older
//! generation (issued before a [`FeedQuery::refetch`]) is dropped on arrival.

use tracing::{debug, info, warn};

use crate::error::NetworkError;
use crate::responses::Page;
use crate::types::User;

/// Number of users requested per fetch.
pub const PAGE_SIZE: usize = 10;

/// Anything that can serve a slice of the user list.
pub trait PageSource {
    async fn fetch_page(&self, skip: usize, take: usize) -> Result<Page, NetworkError>;
}

/// A fetch the query has committed to. Only one exists at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub offset: usize,
    pub take: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing loaded yet and no error held.
    Pending,
    /// The first page failed.
    Error,
    Success,
}

#[derive(Debug)]
pub struct FeedQuery {
    pages: Vec<Page>,
    loaded: usize,
    in_flight: Option<PageRequest>,
    error: Option<NetworkError>,
    generation: u64,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedQuery {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            loaded: 0,
            in_flight: None,
            error: None,
            generation: 0,
        }
    }

    #[cfg(test)]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.pages.iter().flat_map(|page| page.users.iter())
    }

    pub fn user(&self, index: usize) -> Option<&User> {
        let mut remaining = index;
        for page in &self.pages {
            if remaining < page.users.len() {
                return page.users.get(remaining);
            }
            remaining -= page.users.len();
        }
        None
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// Server-reported total from the latest page, 0 before anything arrived.
    pub fn total(&self) -> usize {
        self.pages.last().map_or(0, |page| page.total)
    }

    /// True while fewer users are loaded than the server reports.
    ///
    /// An empty page also ends pagination, otherwise a server whose total
    /// overstates its data would be polled forever.
    pub fn has_next_page(&self) -> bool {
        match self.pages.last() {
            Some(last) => self.loaded < last.total && !last.users.is_empty(),
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.status() == QueryStatus::Pending
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.in_flight.is_some() && !self.pages.is_empty()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&NetworkError> {
        self.error.as_ref()
    }

    pub fn status(&self) -> QueryStatus {
        match (&self.error, self.pages.is_empty()) {
            (Some(_), true) => QueryStatus::Error,
            (None, true) => QueryStatus::Pending,
            (_, false) => QueryStatus::Success,
        }
    }

    /// Issue the first fetch if nothing has been loaded or attempted yet.
    pub fn start(&mut self) -> Option<PageRequest> {
        if !self.pages.is_empty() || self.in_flight.is_some() || self.error.is_some() {
            return None;
        }
        Some(self.issue(0))
    }

    pub fn fetch_next_page(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            debug!("Next page requested while a fetch is in flight");
            return None;
        }
        if !self.has_next_page() {
            return None;
        }
        Some(self.issue(self.loaded))
    }

    /// Drop every page and start over from offset 0.
    pub fn refetch(&mut self) -> PageRequest {
        info!(discarded = self.loaded, "Resetting user list");
        self.pages.clear();
        self.loaded = 0;
        self.error = None;
        self.in_flight = None;
        self.generation += 1;
        self.issue(0)
    }

    /// Clear a later-page failure and ask for the same page again.
    pub fn retry_next_page(&mut self) -> Option<PageRequest> {
        if self.pages.is_empty() || self.error.is_none() {
            return None;
        }
        self.error = None;
        self.fetch_next_page()
    }

    /// Apply the outcome of a ticket. Returns false for stale tickets.
    pub fn receive(&mut self, request: PageRequest, result: Result<Page, NetworkError>) -> bool {
        if request.generation != self.generation || self.in_flight != Some(request) {
            warn!(
                offset = request.offset,
                generation = request.generation,
                current = self.generation,
                "Ignoring stale users response"
            );
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.loaded += page.users.len();
                info!(
                    offset = request.offset,
                    received = page.users.len(),
                    loaded = self.loaded,
                    total = page.total,
                    "Users page loaded"
                );
                self.pages.push(page);
                self.error = None;
            }
            Err(err) => {
                warn!(offset = request.offset, error = %err, "Users page failed");
                self.error = Some(err);
            }
        }
        true
    }

    /// Perform a ticket against `source` and apply the result.
    pub async fn perform<S: PageSource>(
        &mut self,
        source: &S,
        request: PageRequest,
    ) -> Result<(), NetworkError> {
        let result = source.fetch_page(request.offset, request.take).await;
        let outcome = match &result {
            Ok(_) => Ok(()),
            Err(err) => Err(err.clone()),
        };
        self.receive(request, result);
        outcome
    }

    /// Load the first page, or the next one. Returns false when nothing was
    /// left to fetch.
    pub async fn load_next<S: PageSource>(&mut self, source: &S) -> Result<bool, NetworkError> {
        let request = if self.pages.is_empty() {
            self.start()
        } else {
            self.fetch_next_page()
        };

        match request {
            Some(request) => {
                self.perform(source, request).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Keep loading pages until `limit` users are loaded or the list ends.
    pub async fn load_until<S: PageSource>(
        &mut self,
        source: &S,
        limit: Option<usize>,
    ) -> Result<(), NetworkError> {
        while limit.map_or(true, |limit| self.loaded < limit) {
            if !self.load_next(source).await? {
                break;
            }
        }
        Ok(())
    }

    fn issue(&mut self, offset: usize) -> PageRequest {
        let request = PageRequest {
            generation: self.generation,
            offset,
            take: PAGE_SIZE,
        };
        debug!(offset, generation = self.generation, "Issuing users fetch");
        self.in_flight = Some(request);
        request
    }
}
