//! Train layer - rolling stock, merchandise loads, and consist management

pub mod car;
pub mod catalog;
pub mod consist;
pub mod merchandise;

pub use car::{Car, Chassis, LoadCar, NormalCar, SpecialCar};
pub use catalog::{CarModelCatalog, CatalogError, LoadCarModel, MerchCatalog};
pub use consist::Train;
pub use merchandise::{Merch, MerchLoad, MerchType};
