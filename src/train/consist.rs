//! Train consist management
//!
//! A train is an ordered, owning collection of cars. Position in the
//! sequence is coupling order; lookup and mutation are by car id.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TrainError};
use crate::core::types::{CarId, Weight};
use crate::train::car::Car;
use crate::train::merchandise::MerchLoad;

/// An ordered, owning collection of cars
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Train {
    cars: Vec<Car>,
}

impl Train {
    pub fn new() -> Self {
        Self::default()
    }

    /// Couple a car at the tail of the train
    pub fn add_car(&mut self, car: impl Into<Car>) {
        let car = car.into();
        tracing::debug!(
            "Coupled car {:?} ({}) at position {}",
            car.id(),
            car.name(),
            self.cars.len()
        );
        self.cars.push(car);
    }

    fn position_of(&self, id: CarId) -> Result<usize> {
        self.cars
            .iter()
            .position(|car| car.id() == id)
            .ok_or(TrainError::CarNotFound(id))
    }

    /// Find a car by id
    pub fn car(&self, id: CarId) -> Result<&Car> {
        let position = self.position_of(id)?;
        Ok(&self.cars[position])
    }

    /// Find a car by id for mutation
    pub fn car_mut(&mut self, id: CarId) -> Result<&mut Car> {
        let position = self.position_of(id)?;
        Ok(&mut self.cars[position])
    }

    /// Uncouple a car and hand ownership back to the caller.
    ///
    /// Special cars cannot leave the train.
    pub fn remove_car(&mut self, id: CarId) -> Result<Car> {
        let position = self.position_of(id)?;
        if !self.cars[position].is_removable() {
            return Err(TrainError::SpecialCarRemove);
        }
        let car = self.cars.remove(position);
        tracing::debug!("Uncoupled car {:?} ({})", id, car.name());
        Ok(car)
    }

    /// Move a car to the given position, shifting the cars behind it.
    ///
    /// Implemented as uncouple-then-reinsert, so special cars cannot be
    /// moved either.
    pub fn move_car(&mut self, id: CarId, position: usize) -> Result<()> {
        if position >= self.cars.len() {
            return Err(TrainError::CarInvalidPosition {
                position,
                len: self.cars.len(),
            });
        }
        let car = self.remove_car(id)?;
        self.cars.insert(position, car);
        Ok(())
    }

    /// Cars in coupling order
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Loads currently carried across all intact, non-empty load cars
    pub fn merch_loads(&self) -> Vec<&MerchLoad> {
        self.cars
            .iter()
            .filter_map(|car| car.as_load_car())
            .filter_map(|car| car.merch_load().ok())
            .collect()
    }

    /// Total weight of the train, cargo included
    pub fn total_weight(&self) -> Weight {
        self.cars.iter().map(|car| car.weight()).sum()
    }
}
