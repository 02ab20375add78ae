// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Two-task worker group scoped to a single orchestration call

use std::future::Future;

use tokio::task::{JoinError, JoinHandle};

/// Both tasks are spawned before either is awaited. Joining waits for both;
/// a failure in one never cancels the other.
pub struct TaskPair<T> {
    a: JoinHandle<T>,
    b: JoinHandle<T>,
}

impl<T: Send + 'static> TaskPair<T> {
    pub fn spawn<FA, FB>(a: FA, b: FB) -> Self
    where
        FA: Future<Output = T> + Send + 'static,
        FB: Future<Output = T> + Send + 'static,
    {
        Self {
            a: tokio::spawn(a),
            b: tokio::spawn(b),
        }
    }

    /// Wait for both tasks. Results stay in their slots (A, B).
    pub async fn join(self) -> (Result<T, JoinError>, Result<T, JoinError>) {
        tokio::join!(self.a, self.b)
    }
}
