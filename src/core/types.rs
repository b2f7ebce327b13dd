//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Quantity of merchandise. One unit of quantity weighs one ton.
pub type Quantity = u32;

/// Average per-unit price.
pub type Price = u32;

/// Health points. Damage is not clamped, so a car's health may go
/// arbitrarily far below zero.
pub type Health = i32;

/// Weight in tons.
pub type Weight = f32;

/// Health points of a freshly built or fully repaired car.
pub const MAX_HEALTH: Health = 100;

/// Unique identifier for a kind of merchandise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MerchId(pub u32);

/// Unique identifier for cars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarId(pub u32);

static NEXT_CAR_ID: AtomicU32 = AtomicU32::new(1);

impl CarId {
    /// Mint a fresh process-unique id
    pub fn next() -> Self {
        Self(NEXT_CAR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for CarId {
    fn default() -> Self {
        Self::next()
    }
}
