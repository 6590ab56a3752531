use crate::error::ApiError;
use crate::search::api::SearchOutcome;
use crate::search::results::ResultSetController;
use std::cell::Cell;
use std::rc::Rc;

/// Identifies one submitted search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Hands out increasing tickets; only the newest one may update the results.
#[derive(Debug, Clone, Default)]
pub struct SearchSequencer {
    latest: Rc<Cell<u64>>,
}

impl SearchSequencer {
    pub fn issue(&self) -> SearchTicket {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        SearchTicket(next)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.get() == ticket.0
    }
}

/// What the page should show after a search response arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchDisposition {
    /// Results were loaded; carries the backend's reported count.
    Loaded { count: usize },
    /// A newer search was issued in the meantime; nothing changed.
    Stale,
    QuotaExceeded(String),
    Failed(String),
}

/// Feeds a response into the controller unless it is stale or an error.
pub fn apply_response(
    controller: &mut ResultSetController,
    sequencer: &SearchSequencer,
    ticket: SearchTicket,
    response: Result<SearchOutcome, ApiError>,
) -> SearchDisposition {
    if !sequencer.is_current(ticket) {
        log::debug!("Dropping stale search response {:?}", ticket);
        return SearchDisposition::Stale;
    }

    match response {
        Ok(SearchOutcome { count, results }) => {
            controller.load(results);
            SearchDisposition::Loaded { count }
        }
        Err(ApiError::QuotaExceeded(message)) => SearchDisposition::QuotaExceeded(message),
        Err(e) => SearchDisposition::Failed(e.to_string()),
    }
}
