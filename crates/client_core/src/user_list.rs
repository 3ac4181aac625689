//! Paginated user listing with id-based de-duplication.
//!
//! Every fetch is tagged with a sequence number when it starts. A result is
//! applied only while its sequence number is still the latest one issued, so a
//! slow response for an older request can never overwrite a newer one.

use std::collections::{hash_map::Entry, HashMap};

use anyhow::Result;
use shared::{
    domain::UserId,
    protocol::{User, UsersPage},
};
use tracing::{debug, error, info, warn};

use crate::{tooltip::TooltipState, RegistryApi, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: u64,
    pub page: u32,
    pub reset: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { received: usize, total: usize },
    /// A newer request was issued before this one resolved.
    Stale,
    Failed,
    /// `show_more` was called with no next page or while a fetch was running.
    Skipped,
}

/// Concatenates `existing` and `incoming`, collapsing duplicates by id.
///
/// The last value seen for an id wins, but it stays at the position where the
/// id first appeared.
pub fn merge_users(existing: Vec<User>, incoming: Vec<User>) -> Vec<User> {
    let capacity = existing.len() + incoming.len();
    let mut slots: HashMap<UserId, usize> = HashMap::with_capacity(capacity);
    let mut merged: Vec<User> = Vec::with_capacity(capacity);
    for user in existing.into_iter().chain(incoming) {
        match slots.entry(user.id) {
            Entry::Occupied(slot) => merged[*slot.get()] = user,
            Entry::Vacant(slot) => {
                slot.insert(merged.len());
                merged.push(user);
            }
        }
    }
    merged
}

pub struct UserListController {
    users: Vec<User>,
    page: u32,
    committed_page: u32,
    next_url: Option<String>,
    page_size: u32,
    latest_seq: u64,
    in_flight: Option<u64>,
    tooltip: TooltipState,
}

impl Default for UserListController {
    fn default() -> Self {
        Self::new()
    }
}

impl UserListController {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            users: Vec::new(),
            page: 1,
            committed_page: 1,
            next_url: None,
            page_size: page_size.max(1),
            latest_seq: 0,
            in_flight: None,
            tooltip: TooltipState::default(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn next_page_available(&self) -> bool {
        self.next_url.is_some()
    }

    pub fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    pub async fn load(&mut self, api: &dyn RegistryApi, page: u32, reset: bool) -> LoadOutcome {
        let request = self.begin_load(page, reset);
        self.fetch(api, request).await
    }

    /// First fetch after mount. Uses additive merge; on an empty list that is
    /// the same as a replace.
    pub async fn initial_load(&mut self, api: &dyn RegistryApi) -> LoadOutcome {
        self.load(api, 1, false).await
    }

    pub async fn show_more(&mut self, api: &dyn RegistryApi) -> LoadOutcome {
        match self.show_more_request() {
            Some(request) => self.fetch(api, request).await,
            None => LoadOutcome::Skipped,
        }
    }

    pub async fn reload(&mut self, api: &dyn RegistryApi) -> LoadOutcome {
        let request = self.reload_request();
        self.fetch(api, request).await
    }

    /// Registers a new fetch and makes it the only one whose result counts.
    pub fn begin_load(&mut self, page: u32, reset: bool) -> PageRequest {
        self.latest_seq += 1;
        self.in_flight = Some(self.latest_seq);
        let request = PageRequest {
            seq: self.latest_seq,
            page: page.max(1),
            reset,
        };
        debug!(
            seq = request.seq,
            page = request.page,
            reset,
            "user page requested"
        );
        request
    }

    pub fn show_more_request(&mut self) -> Option<PageRequest> {
        if !self.next_page_available() {
            debug!(page = self.page, "no next page; show more ignored");
            return None;
        }
        if self.is_loading() {
            debug!(page = self.page, "fetch in flight; show more ignored");
            return None;
        }
        self.page += 1;
        Some(self.begin_load(self.page, false))
    }

    pub fn reload_request(&mut self) -> PageRequest {
        self.page = 1;
        self.begin_load(1, true)
    }

    pub fn apply_page(&mut self, request: PageRequest, result: Result<UsersPage>) -> LoadOutcome {
        if request.seq != self.latest_seq {
            debug!(
                seq = request.seq,
                latest = self.latest_seq,
                page = request.page,
                "discarding stale user page"
            );
            return LoadOutcome::Stale;
        }
        self.in_flight = None;

        let body = match result {
            Ok(body) if body.success => body,
            Ok(body) => {
                warn!(
                    page = request.page,
                    message = ?body.message,
                    "user listing reported failure"
                );
                self.rewind_cursor(request);
                return LoadOutcome::Failed;
            }
            Err(err) => {
                error!(page = request.page, "failed to load users: {err:#}");
                self.rewind_cursor(request);
                return LoadOutcome::Failed;
            }
        };

        let received = body.users.len();
        let base = if request.reset {
            Vec::new()
        } else {
            std::mem::take(&mut self.users)
        };
        self.users = merge_users(base, body.users);
        self.next_url = body.links.next_url;
        self.page = request.page;
        self.committed_page = request.page;
        info!(
            page = request.page,
            received,
            total = self.users.len(),
            has_next = self.next_url.is_some(),
            "user page applied"
        );
        LoadOutcome::Applied {
            received,
            total: self.users.len(),
        }
    }

    /// Shows the shared tooltip for the hovered user's email.
    pub fn hover_email(&mut self, user_id: UserId, pointer_x: f32, pointer_y: f32) {
        let Some(user) = self.users.iter().find(|user| user.id == user_id) else {
            return;
        };
        self.tooltip.pointer_moved(user.email.clone(), pointer_x, pointer_y);
    }

    pub fn leave_email(&mut self) {
        self.tooltip.pointer_left();
    }

    /// Releases a fetch whose result will never arrive, as if it had failed.
    pub fn abandon(&mut self, request: PageRequest) {
        if request.seq != self.latest_seq {
            return;
        }
        debug!(seq = request.seq, page = request.page, "user page fetch abandoned");
        self.in_flight = None;
        self.rewind_cursor(request);
    }

    /// A failed reload still leaves the cursor on page one; any other failed
    /// fetch returns it to the last page that was applied.
    fn rewind_cursor(&mut self, request: PageRequest) {
        if request.reset {
            self.page = 1;
            self.committed_page = 1;
        } else {
            self.page = self.committed_page;
        }
    }

    async fn fetch(&mut self, api: &dyn RegistryApi, request: PageRequest) -> LoadOutcome {
        let page_size = self.page_size;
        let pending = PendingFetch {
            list: self,
            request: Some(request),
        };
        let result = api.fetch_users(request.page, page_size).await;
        pending.finish(result)
    }
}

/// Abandons its request on drop unless the result was applied, so a caller
/// that cancels `load` or `show_more` does not leave the list gated.
struct PendingFetch<'a> {
    list: &'a mut UserListController,
    request: Option<PageRequest>,
}

impl PendingFetch<'_> {
    fn finish(mut self, result: Result<UsersPage>) -> LoadOutcome {
        match self.request.take() {
            Some(request) => self.list.apply_page(request, result),
            None => LoadOutcome::Stale,
        }
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if let Some(request) = self.request.take() {
            self.list.abandon(request);
        }
    }
}

#[cfg(test)]
#[path = "tests/user_list_tests.rs"]
mod tests;
