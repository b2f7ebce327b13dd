//! Merchandise identity and load accounting
//!
//! A `Merch` is an immutable catalog entry for a kind of goods. A
//! `MerchLoad` is the mutable quantity/price record that actually moves
//! between the market and the cars.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TrainError};
use crate::core::types::{MerchId, Price, Quantity};

/// Type of merchandise, used to match goods against compatible cars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MerchType {
    /// Solid goods, shipped in crates
    Box,
    /// Drinkable liquid
    Drinkable,
    /// Toxic liquid
    Toxic,
    /// Living vegetal
    Vegetal,
}

/// Immutable catalog identity for a kind of goods
///
/// Catalogs hand these out as shared `Arc<Merch>` handles; loads and cars
/// never copy them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Merch {
    id: MerchId,
    name: String,
    merch_type: MerchType,
}

impl Merch {
    pub fn new(id: MerchId, name: impl Into<String>, merch_type: MerchType) -> Self {
        Self {
            id,
            name: name.into(),
            merch_type,
        }
    }

    pub fn id(&self) -> MerchId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn merch_type(&self) -> MerchType {
        self.merch_type
    }
}

/// Equality is by id only; name and type are derived attributes.
impl PartialEq for Merch {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Merch {}

/// A quantity of one merchandise with its average per-unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchLoad {
    merch: Arc<Merch>,
    quantity: Quantity,
    price: Price,
}

impl MerchLoad {
    pub fn new(merch: Arc<Merch>, quantity: Quantity, price: Price) -> Self {
        Self {
            merch,
            quantity,
            price,
        }
    }

    pub fn merch(&self) -> &Arc<Merch> {
        &self.merch
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Average per-unit price. Immaterial when the load is empty.
    pub fn price(&self) -> Price {
        self.price
    }

    /// True if the other load carries the same merchandise
    pub fn has_same_merch(&self, other: &MerchLoad) -> bool {
        self.is_merch(&other.merch)
    }

    /// True if this load carries the given merchandise
    pub fn is_merch(&self, merch: &Merch) -> bool {
        self.merch.id() == merch.id()
    }

    /// Merge a raw quantity at the given price into this load.
    ///
    /// The new price is the weighted average of the two prices. No
    /// merchandise identity is involved when adding raw quantity.
    pub fn add(&mut self, quantity: Quantity, price: Price) {
        let total = self.quantity as u64 + quantity as u64;
        if total == 0 {
            return;
        }
        let value =
            self.quantity as u64 * self.price as u64 + quantity as u64 * price as u64;
        self.price = (value / total) as Price;
        // the sum of two quantities can exceed the quantity range
        self.quantity = total.min(Quantity::MAX as u64) as Quantity;
    }

    /// Merge another load into this one. Fails if the merchandises differ.
    pub fn merge(&mut self, other: &MerchLoad) -> Result<()> {
        if !self.has_same_merch(other) {
            return Err(TrainError::IncompatibleMerchandise);
        }
        self.add(other.quantity, other.price);
        Ok(())
    }

    /// Split off a piece of the given quantity.
    ///
    /// The piece keeps the current per-unit price, and the quantities of
    /// the two resulting loads always sum to the pre-split quantity.
    pub fn split(&mut self, quantity: Quantity) -> Result<MerchLoad> {
        if quantity > self.quantity {
            return Err(TrainError::InsufficientLoad {
                requested: quantity,
                available: self.quantity,
            });
        }
        self.quantity -= quantity;
        Ok(MerchLoad {
            merch: Arc::clone(&self.merch),
            quantity,
            price: self.price,
        })
    }

    /// Split off a piece matching the other load's quantity. Fails if the
    /// merchandises differ.
    pub fn split_load(&mut self, other: &MerchLoad) -> Result<MerchLoad> {
        if !self.has_same_merch(other) {
            return Err(TrainError::IncompatibleMerchandise);
        }
        self.split(other.quantity)
    }

    /// Remove the given quantity, discarding it.
    ///
    /// Built on `split` so the two can never diverge in validation.
    pub fn subtract(&mut self, quantity: Quantity) -> Result<()> {
        self.split(quantity).map(|_| ())
    }

    /// Remove the other load's quantity, discarding it. Fails if the
    /// merchandises differ.
    pub fn subtract_load(&mut self, other: &MerchLoad) -> Result<()> {
        self.split_load(other).map(|_| ())
    }
}
