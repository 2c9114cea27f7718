//! Async wrapper around [`CommandTower`] for use in async runtimes (Tokio, etc.).
//!
//! Every session operation blocks on HTTP, so each one is dispatched to the
//! blocking thread pool via [`tokio::task::spawn_blocking`], keeping the async
//! event loop free. The session sits behind a [`Mutex`], which also gives the
//! single-caller serialization the history expects.
//!
//! # Example
//!
//! ```no_run
//! use command_tower::AsyncCommandTower;
//! use command_tower::models::ColorFilter;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let tower = AsyncCommandTower::new(command_tower::CommandTower::builder())
//!         .await
//!         .unwrap();
//!
//!     let visit = tower.advance(ColorFilter::default(), String::new()).await.unwrap();
//!     let price = tower.price().await.unwrap();
//!     println!("{}: {:.2}", visit.name(), price);
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{Result, TowerError};
use crate::models::{ColorFilter, Visit};
use crate::{CommandTower, CommandTowerBuilder};

/// Async wrapper around [`CommandTower`].
///
/// Cloning is cheap; clones share the same session.
#[derive(Clone)]
pub struct AsyncCommandTower {
    inner: Arc<Mutex<CommandTower>>,
}

impl AsyncCommandTower {
    /// Build the session on the blocking thread pool.
    ///
    /// The blocking HTTP client must not be created on an async worker
    /// thread, so construction is moved off the event loop as well.
    pub async fn new(builder: CommandTowerBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || {
            let tower = builder.build()?;
            Ok(Self::from_tower(tower))
        })
        .await
        .map_err(|e| TowerError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Wrap an already built session.
    pub fn from_tower(tower: CommandTower) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tower)),
        }
    }

    /// Run a sync session operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CommandTower) -> T + Send + 'static,
        T: Send + 'static,
    {
        let tower = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = tower
                .lock()
                .map_err(|_| TowerError::InvalidArgument("Session lock poisoned".into()))?;
            Ok(f(&mut guard))
        })
        .await
        .map_err(|e| TowerError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Move forward; see [`CommandTower::advance`].
    pub async fn advance(&self, filter: ColorFilter, query: String) -> Result<Visit> {
        self.run(move |t| t.advance(&filter, &query).clone()).await
    }

    /// Move back; see [`CommandTower::step_back`].
    pub async fn step_back(&self) -> Result<Option<Visit>> {
        self.run(|t| t.step_back().cloned()).await
    }

    pub async fn current(&self) -> Result<Option<Visit>> {
        self.run(|t| t.current().cloned()).await
    }

    pub async fn decklist(&self) -> Result<String> {
        self.run(|t| t.decklist()).await
    }

    pub async fn price(&self) -> Result<f64> {
        self.run(|t| t.price()).await
    }
}
