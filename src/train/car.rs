//! Rolling stock
//!
//! Every car shares a `Chassis` (identity, health, base weight). A
//! `LoadCar` adds a single-merchandise capacity slot on top of it; a
//! `SpecialCar` is ordinary rolling stock that can never leave the train.
//! Trains own their cars through the `Car` enum.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TrainError};
use crate::core::types::{CarId, Health, Quantity, Weight, MAX_HEALTH};
use crate::train::merchandise::{MerchLoad, MerchType};

/// Common concrete state shared by every kind of car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chassis {
    id: CarId,
    name: String,
    health: Health,
    base_weight: Weight,
}

impl Chassis {
    pub fn new(name: impl Into<String>, health: Health, base_weight: Weight) -> Self {
        Self {
            id: CarId::next(),
            name: name.into(),
            health,
            base_weight,
        }
    }

    pub fn with_full_health(name: impl Into<String>, base_weight: Weight) -> Self {
        Self::new(name, MAX_HEALTH, base_weight)
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn max_health(&self) -> Health {
        MAX_HEALTH
    }

    pub fn base_weight(&self) -> Weight {
        self.base_weight
    }

    /// A car is destroyed once its health reaches zero or below
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage. Health is not clamped; a destroyed car takes no
    /// further damage.
    pub fn take_damage(&mut self, attack: Health) {
        if self.is_destroyed() {
            return;
        }
        self.health -= attack;
    }

    /// Restore full health. A destroyed car cannot be field-repaired.
    pub fn repair(&mut self) -> Result<()> {
        if self.is_destroyed() {
            return Err(TrainError::DestroyedCar);
        }
        self.health = MAX_HEALTH;
        Ok(())
    }
}

/// A plain car with no cargo capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalCar {
    chassis: Chassis,
}

impl NormalCar {
    pub fn new(name: impl Into<String>, health: Health, base_weight: Weight) -> Self {
        Self {
            chassis: Chassis::new(name, health, base_weight),
        }
    }

    pub fn with_full_health(name: impl Into<String>, base_weight: Weight) -> Self {
        Self {
            chassis: Chassis::with_full_health(name, base_weight),
        }
    }

    pub fn chassis(&self) -> &Chassis {
        &self.chassis
    }

    pub fn chassis_mut(&mut self) -> &mut Chassis {
        &mut self.chassis
    }

    pub fn weight(&self) -> Weight {
        self.chassis.base_weight()
    }

    pub fn is_removable(&self) -> bool {
        true
    }
}

/// A car the train cannot run without (locomotive, tender)
///
/// Behaves like a `NormalCar` except it can never be uncoupled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialCar {
    chassis: Chassis,
}

impl SpecialCar {
    pub fn new(name: impl Into<String>, health: Health, base_weight: Weight) -> Self {
        Self {
            chassis: Chassis::new(name, health, base_weight),
        }
    }

    pub fn with_full_health(name: impl Into<String>, base_weight: Weight) -> Self {
        Self {
            chassis: Chassis::with_full_health(name, base_weight),
        }
    }

    pub fn chassis(&self) -> &Chassis {
        &self.chassis
    }

    pub fn chassis_mut(&mut self) -> &mut Chassis {
        &mut self.chassis
    }

    pub fn weight(&self) -> Weight {
        self.chassis.base_weight()
    }

    pub fn is_removable(&self) -> bool {
        false
    }
}

/// A car with a single-merchandise capacity slot
///
/// Holds at most one merchandise load at a time, of the accepted type
/// fixed at construction. Emptiness is defined by quantity, not by slot
/// presence: a zero-quantity slot counts as empty, and the slot is cleared
/// whenever its quantity reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCar {
    chassis: Chassis,
    max_quantity: Quantity,
    accepted: MerchType,
    slot: Option<MerchLoad>,
}

impl LoadCar {
    pub fn new(
        name: impl Into<String>,
        health: Health,
        base_weight: Weight,
        max_quantity: Quantity,
        accepted: MerchType,
    ) -> Self {
        Self {
            chassis: Chassis::new(name, health, base_weight),
            max_quantity,
            accepted,
            slot: None,
        }
    }

    pub fn with_full_health(
        name: impl Into<String>,
        base_weight: Weight,
        max_quantity: Quantity,
        accepted: MerchType,
    ) -> Self {
        Self::new(name, MAX_HEALTH, base_weight, max_quantity, accepted)
    }

    /// Construct a car already holding a load.
    ///
    /// A zero-quantity seed load is the same as no load at all. Fails if
    /// the seed exceeds capacity or is of the wrong type.
    pub fn with_load(
        name: impl Into<String>,
        health: Health,
        base_weight: Weight,
        max_quantity: Quantity,
        accepted: MerchType,
        load: MerchLoad,
    ) -> Result<Self> {
        let mut car = Self::new(name, health, base_weight, max_quantity, accepted);
        if load.quantity() == 0 {
            return Ok(car);
        }
        if load.merch().merch_type() != accepted {
            return Err(TrainError::CannotLoad);
        }
        if load.quantity() > max_quantity {
            return Err(TrainError::InsufficientSpace {
                requested: load.quantity(),
                remaining: max_quantity,
            });
        }
        car.slot = Some(load);
        Ok(car)
    }

    pub fn chassis(&self) -> &Chassis {
        &self.chassis
    }

    pub fn chassis_mut(&mut self) -> &mut Chassis {
        &mut self.chassis
    }

    pub fn is_removable(&self) -> bool {
        true
    }

    fn ensure_intact(&self) -> Result<()> {
        if self.chassis.is_destroyed() {
            return Err(TrainError::DestroyedCar);
        }
        Ok(())
    }

    fn current_quantity(&self) -> Quantity {
        self.slot.as_ref().map_or(0, |load| load.quantity())
    }

    fn occupied_slot(&self) -> Option<&MerchLoad> {
        self.slot.as_ref().filter(|load| load.quantity() > 0)
    }

    /// Total weight: base weight plus one ton per unit of load.
    /// A destroyed car counts only its base weight.
    pub fn weight(&self) -> Weight {
        if self.chassis.is_destroyed() {
            return self.chassis.base_weight();
        }
        self.chassis.base_weight() + self.current_quantity() as Weight
    }

    pub fn max_quantity(&self) -> Result<Quantity> {
        self.ensure_intact()?;
        Ok(self.max_quantity)
    }

    pub fn quantity(&self) -> Result<Quantity> {
        self.ensure_intact()?;
        Ok(self.current_quantity())
    }

    pub fn remaining_quantity(&self) -> Result<Quantity> {
        self.ensure_intact()?;
        Ok(self.max_quantity - self.current_quantity())
    }

    pub fn merch_type(&self) -> Result<MerchType> {
        self.ensure_intact()?;
        Ok(self.accepted)
    }

    /// The load currently on board
    pub fn merch_load(&self) -> Result<&MerchLoad> {
        self.ensure_intact()?;
        self.occupied_slot().ok_or(TrainError::IsEmpty)
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.ensure_intact()?;
        Ok(self.current_quantity() == 0)
    }

    pub fn is_full(&self) -> Result<bool> {
        self.ensure_intact()?;
        let quantity = self.current_quantity();
        Ok(quantity > 0 && quantity == self.max_quantity)
    }

    /// Whether the given load could start or keep filling this car
    pub fn can_load(&self, load: &MerchLoad) -> bool {
        if self.chassis.is_destroyed() {
            return false;
        }
        if load.merch().merch_type() != self.accepted {
            return false;
        }
        let Some(slot) = self.occupied_slot() else {
            // any type-compatible load may start filling an empty car
            return true;
        };
        if slot.quantity() == self.max_quantity {
            return false;
        }
        // a partially filled car only takes more of the same merchandise
        slot.has_same_merch(load)
    }

    /// Move `quantity` units out of `load` into the car.
    ///
    /// Everything is validated before either side is mutated. On success
    /// the caller's load shrinks by `quantity` and the car absorbs it,
    /// averaging prices if the car already held some of the merchandise.
    pub fn load(&mut self, load: &mut MerchLoad, quantity: Quantity) -> Result<()> {
        self.ensure_intact()?;
        if !self.can_load(load) {
            return Err(TrainError::CannotLoad);
        }
        let remaining = self.max_quantity - self.current_quantity();
        if quantity > remaining {
            return Err(TrainError::InsufficientSpace {
                requested: quantity,
                remaining,
            });
        }
        // a zero-quantity load leaves both sides untouched; storing an
        // empty piece would make the slot distinguishable from "no slot"
        if quantity == 0 {
            return Ok(());
        }
        let piece = load.split(quantity)?;
        tracing::debug!(
            "Loaded {} of {} into car {:?}",
            quantity,
            piece.merch().name(),
            self.chassis.id()
        );
        match self.slot.as_mut().filter(|slot| slot.quantity() > 0) {
            Some(slot) => slot.merge(&piece)?,
            None => self.slot = Some(piece),
        }
        Ok(())
    }

    /// Load the whole source load into the car
    pub fn load_all(&mut self, load: &mut MerchLoad) -> Result<()> {
        let quantity = load.quantity();
        self.load(load, quantity)
    }

    /// Take `quantity` units out of the car, returned as a new load at the
    /// on-board price. The slot is cleared when it runs out.
    pub fn unload(&mut self, quantity: Quantity) -> Result<MerchLoad> {
        self.ensure_intact()?;
        let available = self.current_quantity();
        if quantity > available {
            return Err(TrainError::InsufficientLoad {
                requested: quantity,
                available,
            });
        }
        let slot = self.slot.as_mut().ok_or(TrainError::IsEmpty)?;
        let piece = slot.split(quantity)?;
        if slot.quantity() == 0 {
            self.slot = None;
        }
        tracing::debug!(
            "Unloaded {} of {} from car {:?}",
            quantity,
            piece.merch().name(),
            self.chassis.id()
        );
        Ok(piece)
    }
}

/// A unit of rolling stock, as owned by a train
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Car {
    Normal(NormalCar),
    Special(SpecialCar),
    Load(LoadCar),
}

impl Car {
    fn chassis(&self) -> &Chassis {
        match self {
            Car::Normal(car) => car.chassis(),
            Car::Special(car) => car.chassis(),
            Car::Load(car) => car.chassis(),
        }
    }

    fn chassis_mut(&mut self) -> &mut Chassis {
        match self {
            Car::Normal(car) => car.chassis_mut(),
            Car::Special(car) => car.chassis_mut(),
            Car::Load(car) => car.chassis_mut(),
        }
    }

    pub fn id(&self) -> CarId {
        self.chassis().id()
    }

    pub fn name(&self) -> &str {
        self.chassis().name()
    }

    pub fn health(&self) -> Health {
        self.chassis().health()
    }

    pub fn is_destroyed(&self) -> bool {
        self.chassis().is_destroyed()
    }

    pub fn take_damage(&mut self, attack: Health) {
        self.chassis_mut().take_damage(attack);
    }

    pub fn repair(&mut self) -> Result<()> {
        self.chassis_mut().repair()
    }

    /// Total weight including any cargo
    pub fn weight(&self) -> Weight {
        match self {
            Car::Normal(car) => car.weight(),
            Car::Special(car) => car.weight(),
            Car::Load(car) => car.weight(),
        }
    }

    /// Whether this car may be uncoupled from or reordered within a train
    pub fn is_removable(&self) -> bool {
        match self {
            Car::Normal(car) => car.is_removable(),
            Car::Special(car) => car.is_removable(),
            Car::Load(car) => car.is_removable(),
        }
    }

    pub fn as_load_car(&self) -> Option<&LoadCar> {
        match self {
            Car::Load(car) => Some(car),
            _ => None,
        }
    }

    pub fn as_load_car_mut(&mut self) -> Option<&mut LoadCar> {
        match self {
            Car::Load(car) => Some(car),
            _ => None,
        }
    }
}

impl From<NormalCar> for Car {
    fn from(car: NormalCar) -> Self {
        Car::Normal(car)
    }
}

impl From<SpecialCar> for Car {
    fn from(car: SpecialCar) -> Self {
        Car::Special(car)
    }
}

impl From<LoadCar> for Car {
    fn from(car: LoadCar) -> Self {
        Car::Load(car)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MerchId;
    use crate::train::merchandise::Merch;
    use std::sync::Arc;

    fn wood() -> Arc<Merch> {
        Arc::new(Merch::new(MerchId(16), "wood", MerchType::Box))
    }

    fn salt() -> Arc<Merch> {
        Arc::new(Merch::new(MerchId(14), "salt", MerchType::Box))
    }

    fn oil() -> Arc<Merch> {
        Arc::new(Merch::new(MerchId(11), "oil", MerchType::Toxic))
    }

    fn box_car() -> LoadCar {
        LoadCar::with_full_health("merchandise", 45.0, 20, MerchType::Box)
    }

    #[test]
    fn test_take_damage_until_destroyed() {
        let mut car = NormalCar::new("caboose", 10, 12.0);
        car.chassis_mut().take_damage(60);
        assert_eq!(car.chassis().health(), -50);
        assert!(car.chassis().is_destroyed());

        // further damage is a no-op
        car.chassis_mut().take_damage(100);
        assert_eq!(car.chassis().health(), -50);

        assert_eq!(car.chassis_mut().repair(), Err(TrainError::DestroyedCar));
    }

    #[test]
    fn test_repair_restores_full_health() {
        let mut car = NormalCar::new("caboose", 1, 12.0);
        car.chassis_mut().repair().unwrap();
        assert_eq!(car.chassis().health(), MAX_HEALTH);
    }

    #[test]
    fn test_new_load_car_is_empty() {
        let car = box_car();
        assert!(car.is_empty().unwrap());
        assert!(!car.is_full().unwrap());
        assert_eq!(car.quantity().unwrap(), 0);
        assert_eq!(car.remaining_quantity().unwrap(), 20);
        assert_eq!(car.merch_load(), Err(TrainError::IsEmpty));
    }

    #[test]
    fn test_with_load_rejects_wrong_type_and_overflow() {
        let too_much = MerchLoad::new(wood(), 30, 10);
        assert_eq!(
            LoadCar::with_load("merchandise", MAX_HEALTH, 45.0, 20, MerchType::Box, too_much),
            Err(TrainError::InsufficientSpace {
                requested: 30,
                remaining: 20,
            })
        );

        let wrong_type = MerchLoad::new(oil(), 5, 10);
        assert_eq!(
            LoadCar::with_load("merchandise", MAX_HEALTH, 45.0, 20, MerchType::Box, wrong_type),
            Err(TrainError::CannotLoad)
        );
    }

    #[test]
    fn test_zero_quantity_load_leaves_car_empty() {
        let mut car = box_car();
        let mut source = MerchLoad::new(wood(), 5, 10);

        car.load(&mut source, 0).unwrap();
        assert!(car.is_empty().unwrap());
        assert_eq!(source.quantity(), 5);

        // the car behaves exactly like one that was never loaded
        assert_eq!(car.unload(0), Err(TrainError::IsEmpty));
        assert_eq!(car.merch_load(), Err(TrainError::IsEmpty));
    }

    #[test]
    fn test_zero_quantity_seed_counts_as_empty() {
        let empty = MerchLoad::new(wood(), 0, 10);
        let car =
            LoadCar::with_load("merchandise", MAX_HEALTH, 45.0, 20, MerchType::Box, empty)
                .unwrap();
        assert!(car.is_empty().unwrap());
    }

    #[test]
    fn test_can_load_rules() {
        let mut car = box_car();
        let wood_load = MerchLoad::new(wood(), 5, 10);
        let salt_load = MerchLoad::new(salt(), 5, 10);
        let oil_load = MerchLoad::new(oil(), 5, 10);

        // empty car takes any load of the accepted type
        assert!(car.can_load(&wood_load));
        assert!(car.can_load(&salt_load));
        assert!(!car.can_load(&oil_load));

        // partially filled car only takes the same merchandise
        let mut source = MerchLoad::new(wood(), 10, 10);
        car.load(&mut source, 10).unwrap();
        assert!(car.can_load(&wood_load));
        assert!(!car.can_load(&salt_load));

        // full car takes nothing
        let mut more = MerchLoad::new(wood(), 10, 10);
        car.load_all(&mut more).unwrap();
        assert!(car.is_full().unwrap());
        assert!(!car.can_load(&wood_load));
    }

    #[test]
    fn test_destroyed_car_refuses_loads() {
        let mut car = box_car();
        car.chassis_mut().take_damage(200);
        let wood_load = MerchLoad::new(wood(), 5, 10);
        assert!(!car.can_load(&wood_load));
    }

    #[test]
    fn test_load_mutates_source_and_merges_price() {
        let mut car = box_car();
        let mut source = MerchLoad::new(wood(), 30, 100);

        car.load(&mut source, 10).unwrap();
        assert_eq!(source.quantity(), 20);
        assert_eq!(car.quantity().unwrap(), 10);
        assert_eq!(car.merch_load().unwrap().price(), 100);

        // loading cheaper wood averages the on-board price
        let mut cheap = MerchLoad::new(wood(), 10, 50);
        car.load_all(&mut cheap).unwrap();
        assert_eq!(cheap.quantity(), 0);
        assert_eq!(car.quantity().unwrap(), 20);
        assert_eq!(car.merch_load().unwrap().price(), 75);
    }

    #[test]
    fn test_load_insufficient_space() {
        let mut car = box_car();
        let mut source = MerchLoad::new(wood(), 30, 100);
        assert_eq!(
            car.load(&mut source, 25),
            Err(TrainError::InsufficientSpace {
                requested: 25,
                remaining: 20,
            })
        );
        // nothing moved
        assert_eq!(source.quantity(), 30);
        assert!(car.is_empty().unwrap());
    }

    #[test]
    fn test_load_more_than_source_has() {
        let mut car = box_car();
        let mut source = MerchLoad::new(wood(), 5, 100);
        assert_eq!(
            car.load(&mut source, 10),
            Err(TrainError::InsufficientLoad {
                requested: 10,
                available: 5,
            })
        );
        assert!(car.is_empty().unwrap());
    }

    #[test]
    fn test_unload_returns_piece_and_clears_slot() {
        let mut car = box_car();
        let mut source = MerchLoad::new(wood(), 20, 100);
        car.load_all(&mut source).unwrap();

        let piece = car.unload(15).unwrap();
        assert_eq!(piece.quantity(), 15);
        assert_eq!(piece.price(), 100);
        assert_eq!(car.quantity().unwrap(), 5);

        car.unload(5).unwrap();
        assert!(car.is_empty().unwrap());
        assert_eq!(car.merch_load(), Err(TrainError::IsEmpty));
    }

    #[test]
    fn test_unload_insufficient_load() {
        let mut car = box_car();
        let mut source = MerchLoad::new(wood(), 5, 100);
        car.load_all(&mut source).unwrap();
        assert_eq!(
            car.unload(6),
            Err(TrainError::InsufficientLoad {
                requested: 6,
                available: 5,
            })
        );
        assert_eq!(car.quantity().unwrap(), 5);
    }

    #[test]
    fn test_weight_follows_cargo() {
        let mut car = box_car();
        assert_eq!(car.weight(), 45.0);

        let mut source = MerchLoad::new(wood(), 12, 100);
        car.load_all(&mut source).unwrap();
        assert_eq!(car.weight(), 57.0);

        // a destroyed car counts only its base weight
        car.chassis_mut().take_damage(200);
        assert_eq!(car.weight(), 45.0);
    }

    #[test]
    fn test_destroyed_car_answers_no_capacity_questions() {
        let mut car = box_car();
        car.chassis_mut().take_damage(MAX_HEALTH);
        assert_eq!(car.max_quantity(), Err(TrainError::DestroyedCar));
        assert_eq!(car.quantity(), Err(TrainError::DestroyedCar));
        assert_eq!(car.remaining_quantity(), Err(TrainError::DestroyedCar));
        assert_eq!(car.merch_type(), Err(TrainError::DestroyedCar));
        assert_eq!(car.is_empty(), Err(TrainError::DestroyedCar));
        assert_eq!(car.is_full(), Err(TrainError::DestroyedCar));
        assert_eq!(car.merch_load(), Err(TrainError::DestroyedCar));
        assert_eq!(car.unload(0), Err(TrainError::DestroyedCar));

        let mut source = MerchLoad::new(wood(), 5, 10);
        assert_eq!(car.load(&mut source, 5), Err(TrainError::DestroyedCar));
    }

    #[test]
    fn test_car_enum_delegates() {
        let mut car: Car = box_car().into();
        assert!(car.is_removable());
        assert!(!car.is_destroyed());
        assert!(car.as_load_car().is_some());

        car.take_damage(40);
        assert_eq!(car.health(), 60);
        car.repair().unwrap();
        assert_eq!(car.health(), MAX_HEALTH);

        let engine: Car = SpecialCar::with_full_health("locomotive", 120.0).into();
        assert!(!engine.is_removable());
        assert!(engine.as_load_car().is_none());
    }
}
