// Hotel room inventory and guest reservations with flat-file persistence

pub mod config;
pub mod inventory;
pub mod ledger;
pub mod manager;
pub mod payment;
pub mod persistence;
pub mod shell;

// Re-export key types for convenience
pub use config::{ConfigError, HotelConfig};
pub use inventory::{InventoryStore, Room, RoomCategory};
pub use ledger::{Reservation, ReservationLedger, ReservationStatus};
pub use manager::{BookingConfirmation, BookingDetail, ReservationError, ReservationManager};
pub use payment::{PaymentError, PaymentGateway, PaymentReceipt, SimulatedPaymentGateway};
pub use persistence::{
    FlatFileStore, InMemoryStore, LoadedState, PersistenceError, ReservationStore,
    RoomAvailability,
};
pub use shell::{MenuChoice, Shell};
