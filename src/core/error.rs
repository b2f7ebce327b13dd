use thiserror::Error;

use crate::core::types::{CarId, Quantity};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrainError {
    #[error("Car is destroyed")]
    DestroyedCar,

    #[error("Car cannot take this merchandise")]
    CannotLoad,

    #[error("Not enough space in car: requested {requested}, remaining {remaining}")]
    InsufficientSpace {
        requested: Quantity,
        remaining: Quantity,
    },

    #[error("Not enough load: requested {requested}, available {available}")]
    InsufficientLoad {
        requested: Quantity,
        available: Quantity,
    },

    #[error("Car is empty")]
    IsEmpty,

    #[error("Merchandises are different")]
    IncompatibleMerchandise,

    #[error("Car not found: {0:?}")]
    CarNotFound(CarId),

    #[error("Invalid position {position} for a train of {len} cars")]
    CarInvalidPosition { position: usize, len: usize },

    #[error("This car cannot leave the train")]
    SpecialCarRemove,
}

pub type Result<T> = std::result::Result<T, TrainError>;
