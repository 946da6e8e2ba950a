//! In-memory menu and order storage for tests, with failure injection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::StorageError;
use super::commit::{OrderStore, OrderUnit};
use super::pricing::MenuLookup;
use crate::models::menu::MenuSnapshot;
use crate::models::order::{OrderDetail, OrderHeader};

/// Where a unit of work should fail. `after` counts successful calls first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    Header,
    Detail { after: usize },
    Decrement { after: usize },
    Commit,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    menus: HashMap<String, MenuSnapshot>,
    headers: Vec<OrderHeader>,
    details: Vec<OrderDetail>,
}

pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_at: Option<FailPoint>,
    failing_lookups: bool,
    write_delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            fail_at: None,
            failing_lookups: false,
            write_delay: None,
        }
    }

    pub fn with_menu(self, id: &str, unit_price: i64, available_stock: i64) -> Self {
        self.state.lock().unwrap().menus.insert(
            id.to_string(),
            MenuSnapshot {
                unit_price,
                available_stock,
            },
        );
        self
    }

    pub fn fail_at(mut self, point: FailPoint) -> Self {
        self.fail_at = Some(point);
        self
    }

    pub fn failing_lookups(mut self) -> Self {
        self.failing_lookups = true;
        self
    }

    /// Every stock decrement sleeps this long before applying.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn headers(&self) -> Vec<OrderHeader> {
        self.state.lock().unwrap().headers.clone()
    }

    pub fn details(&self) -> Vec<OrderDetail> {
        self.state.lock().unwrap().details.clone()
    }

    pub fn stock(&self, id: &str) -> Option<i64> {
        self.state
            .lock()
            .unwrap()
            .menus
            .get(id)
            .map(|m| m.available_stock)
    }
}

#[async_trait]
impl MenuLookup for MemoryStore {
    async fn find_menu(&self, menu_id: &str) -> Result<Option<MenuSnapshot>, StorageError> {
        if self.failing_lookups {
            return Err(StorageError::Internal("injected lookup failure".into()));
        }
        Ok(self.state.lock().unwrap().menus.get(menu_id).copied())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn OrderUnit>, StorageError> {
        if self.fail_at == Some(FailPoint::Begin) {
            return Err(StorageError::Internal("injected begin failure".into()));
        }
        let staged = self.state.lock().unwrap().clone();
        Ok(Box::new(MemoryUnit {
            shared: Arc::clone(&self.state),
            staged,
            fail_at: self.fail_at,
            write_delay: self.write_delay,
            detail_calls: 0,
            decrement_calls: 0,
        }))
    }
}

/// Works on a private copy; only `commit` publishes it.
struct MemoryUnit {
    shared: Arc<Mutex<MemoryState>>,
    staged: MemoryState,
    fail_at: Option<FailPoint>,
    write_delay: Option<Duration>,
    detail_calls: usize,
    decrement_calls: usize,
}

#[async_trait]
impl OrderUnit for MemoryUnit {
    async fn insert_header(&mut self, header: &OrderHeader) -> Result<(), StorageError> {
        if self.fail_at == Some(FailPoint::Header) {
            return Err(StorageError::Internal("injected header failure".into()));
        }
        self.staged.headers.push(header.clone());
        Ok(())
    }

    async fn insert_detail(
        &mut self,
        _line_no: usize,
        detail: &OrderDetail,
    ) -> Result<(), StorageError> {
        if self.fail_at == Some(FailPoint::Detail { after: self.detail_calls }) {
            return Err(StorageError::Internal("injected detail failure".into()));
        }
        self.detail_calls += 1;
        self.staged.details.push(detail.clone());
        Ok(())
    }

    async fn decrement_stock(&mut self, menu_id: &str, quantity: i64) -> Result<(), StorageError> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_at
            == Some(FailPoint::Decrement {
                after: self.decrement_calls,
            })
        {
            return Err(StorageError::Internal("injected decrement failure".into()));
        }
        self.decrement_calls += 1;

        match self.staged.menus.get_mut(menu_id) {
            Some(menu) if menu.available_stock >= quantity => {
                menu.available_stock -= quantity;
                Ok(())
            }
            _ => Err(StorageError::StockUnavailable {
                menu_id: menu_id.to_string(),
            }),
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        if self.fail_at == Some(FailPoint::Commit) {
            return Err(StorageError::Internal("injected commit failure".into()));
        }
        let MemoryUnit { shared, staged, .. } = *self;
        *shared.lock().unwrap() = staged;
        Ok(())
    }
}
