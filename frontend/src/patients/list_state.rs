//! Paginated patient list controller.
//!
//! Pure state: every query change returns a [`FetchTicket`] that the page
//! executes against the API and feeds back through [`PatientListState::apply`].
//! Tickets carry a sequence number so a late response can never overwrite a
//! newer one.

use std::collections::HashSet;

use genesis_shared::pagination::{clamp_page, page_count, page_window, visible_range};
use genesis_shared::{PageRequest, PageResult, Patient};

use crate::error::ApiError;

pub const LIST_ERROR: &str = "Erro ao carregar pacientes";
pub const DELETE_ERROR: &str = "Erro ao excluir paciente";
/// Direct page buttons shown at once.
pub const PAGE_BUTTONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub request: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued after this one; the response was dropped.
    Stale,
    /// The requested page no longer exists; fetch the last valid one.
    Refetch(FetchTicket),
    Failed,
}

#[derive(Debug, Clone)]
pub struct PatientListState {
    /// Last requested query
    query: PageRequest,
    /// Last successfully applied page; what the table shows
    page: Option<PageResult<Patient>>,
    loading: bool,
    /// Fetch failure, shown with a retry button
    error: Option<String>,
    /// Dismissible delete failure
    notice: Option<String>,
    /// Sequence number of the newest issued fetch
    latest_seq: u64,
    /// Ids with a delete in flight
    deleting: HashSet<String>,
}

impl PatientListState {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: PageRequest::new(1, page_size, None),
            page: None,
            loading: false,
            error: None,
            notice: None,
            latest_seq: 0,
            deleting: HashSet::new(),
        }
    }

    /// The last requested query; a retry re-issues it.
    pub fn query(&self) -> &PageRequest {
        &self.query
    }

    /// Page of the rows on screen, which lags `query` until a fetch succeeds.
    pub fn current_page(&self) -> u32 {
        self.page.as_ref().map_or(self.query.page, |p| p.page)
    }

    /// Page size of the rows on screen.
    pub fn page_size(&self) -> u32 {
        self.page.as_ref().map_or(self.query.page_size, |p| p.page_size)
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ---------------------------------------------------------
    // Query changes
    // ---------------------------------------------------------

    /// Issues a fetch for the current query.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.loading = true;
        FetchTicket {
            seq: self.latest_seq,
            request: self.query.clone(),
        }
    }

    pub fn reload(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    /// New search term; returns to page 1. `None` if the term is unchanged.
    pub fn set_search(&mut self, term: &str) -> Option<FetchTicket> {
        let next = PageRequest::new(1, self.query.page_size, Some(term.to_string()));
        if next.search == self.query.search {
            return None;
        }
        tracing::debug!(search = ?next.search, "search changed");
        self.query = next;
        Some(self.begin_fetch())
    }

    /// New page size; returns to page 1. `None` if the size is unchanged.
    pub fn set_page_size(&mut self, page_size: u32) -> Option<FetchTicket> {
        let page_size = page_size.max(1);
        if page_size == self.query.page_size && (self.loading || page_size == self.page_size()) {
            return None;
        }
        self.query.page_size = page_size;
        self.query.page = 1;
        Some(self.begin_fetch())
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<FetchTicket> {
        let page = clamp_page(page, self.total(), self.page_size());
        // same target: skip while in flight or already shown, retry after a failure
        if page == self.query.page && (self.loading || page == self.current_page()) {
            return None;
        }
        self.query.page = page;
        Some(self.begin_fetch())
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if !self.can_next() {
            return None;
        }
        self.go_to_page(self.current_page() + 1)
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        if !self.can_prev() {
            return None;
        }
        self.go_to_page(self.current_page() - 1)
    }

    // ---------------------------------------------------------
    // Responses
    // ---------------------------------------------------------

    /// Feeds a response back into the list.
    ///
    /// # Arguments
    /// * `ticket` - the fetch this response answers
    /// * `result` - the API outcome
    ///
    /// # Returns
    /// `Refetch` when the requested page lay past the last one; the caller
    /// must run the returned ticket.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: Result<PageResult<Patient>, ApiError>,
    ) -> FetchOutcome {
        if ticket.seq != self.latest_seq {
            tracing::debug!(seq = ticket.seq, latest = self.latest_seq, "stale page dropped");
            return FetchOutcome::Stale;
        }

        let mut result = match result {
            Ok(result) => result,
            Err(err) => {
                self.loading = false;
                // 401 is handled by the session; keep it out of the list
                if !err.is_unauthorized() {
                    tracing::warn!(error = %err, "page fetch failed");
                    self.error = Some(err.user_message(LIST_ERROR));
                }
                return FetchOutcome::Failed;
            }
        };

        let page_size = ticket.request.page_size;
        result.items.truncate(page_size as usize);
        result.page_size = page_size;

        if result.total == 0 {
            self.query.page = 1;
            self.page = Some(PageResult::empty(page_size));
            self.loading = false;
            self.error = None;
            return FetchOutcome::Applied;
        }

        let last_page = page_count(result.total, page_size);
        let server_clamped =
            result.page != ticket.request.page && (1..=last_page).contains(&result.page);
        if ticket.request.page > last_page && !server_clamped {
            tracing::debug!(requested = ticket.request.page, last_page, "page out of range");
            self.query.page = last_page;
            return FetchOutcome::Refetch(self.begin_fetch());
        }

        let page = if server_clamped {
            result.page
        } else {
            clamp_page(ticket.request.page, result.total, page_size)
        };
        self.query.page = page;
        result.page = page;

        self.page = Some(result);
        self.loading = false;
        self.error = None;
        FetchOutcome::Applied
    }

    // ---------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------

    /// Marks `id` as being deleted; `false` if a delete is already in flight.
    pub fn begin_delete(&mut self, id: &str) -> bool {
        self.deleting.insert(id.to_string())
    }

    /// Clears the in-flight marker; on success returns the reload fetch.
    pub fn finish_delete(&mut self, id: &str, result: Result<(), ApiError>) -> Option<FetchTicket> {
        self.deleting.remove(id);
        match result {
            Ok(()) => Some(self.reload()),
            Err(err) => {
                if !err.is_unauthorized() {
                    tracing::warn!(error = %err, id, "delete failed");
                    self.notice = Some(err.user_message(DELETE_ERROR));
                }
                None
            }
        }
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// A create or update went through.
    pub fn on_saved(&mut self) -> FetchTicket {
        self.reload()
    }

    // ---------------------------------------------------------
    // View helpers
    // ---------------------------------------------------------

    pub fn items(&self) -> &[Patient] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    pub fn total(&self) -> u64 {
        self.page.as_ref().map(|p| p.total).unwrap_or(0)
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total(), self.page_size())
    }

    pub fn visible_range(&self) -> (u64, u64) {
        visible_range(self.current_page(), self.page_size(), self.total())
    }

    /// Direct page buttons; none when there are no records.
    pub fn page_buttons(&self) -> Vec<u32> {
        page_window(self.current_page(), self.page_size(), self.total(), PAGE_BUTTONS)
    }

    pub fn can_prev(&self) -> bool {
        self.current_page() > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page() < self.page_count()
    }

    /// Loaded and nothing matched.
    pub fn is_empty_state(&self) -> bool {
        self.page.as_ref().is_some_and(|p| p.items.is_empty())
    }
}

#[cfg(test)]
mod tests;
