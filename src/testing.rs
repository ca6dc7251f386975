//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::ops::Range;

use crate::error::NetworkError;
use crate::query::PageSource;
use crate::responses::Page;
use crate::types::{Company, User};

pub fn user(id: usize) -> User {
    User {
        id: id as i64,
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        email: format!("user{id}@example.com"),
        phone: format!("+1 555-{id:04}"),
        image: format!("https://example.com/avatar/{id}.png"),
        university: "State University".to_string(),
        company: Company {
            title: "Engineer".to_string(),
        },
    }
}

pub fn page(ids: Range<usize>, total: usize) -> Page {
    Page {
        users: ids.map(user).collect(),
        total,
    }
}

/// In-memory page source that records every call.
pub struct FakeSource {
    total: usize,
    failing: HashSet<usize>,
    calls: RefCell<Vec<(usize, usize)>>,
}

impl FakeSource {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            failing: HashSet::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_at(mut self, skip: usize) -> Self {
        self.failing.insert(skip);
        self
    }

    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.borrow().clone()
    }
}

impl PageSource for FakeSource {
    async fn fetch_page(&self, skip: usize, take: usize) -> Result<Page, NetworkError> {
        self.calls.borrow_mut().push((skip, take));
        if self.failing.contains(&skip) {
            return Err(NetworkError::status(500, ""));
        }
        let end = (skip + take).min(self.total);
        Ok(page(skip.min(end)..end, self.total))
    }
}
