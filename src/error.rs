// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Persisted collection could not be read back. Loaders recover from this.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Validation(String),

    /// One record in a collection is unusable; the rest of the collection is fine.
    #[error("Record #{index} is invalid: {reason}")]
    DataIntegrity { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
