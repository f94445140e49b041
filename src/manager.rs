// Reservation manager: the booking facade over inventory and ledger
//
// Every mutation is written through to the injected store. A failed save is
// logged and otherwise ignored, so memory may run ahead of disk.

use crate::config::HotelConfig;
use crate::inventory::{InventoryStore, Room, RoomCategory};
use crate::ledger::{Reservation, ReservationLedger};
use crate::payment::{PaymentError, PaymentGateway, PaymentReceipt, SimulatedPaymentGateway};
use crate::persistence::{FlatFileStore, PersistenceError, ReservationStore};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum ReservationError {
    #[error("Room {0} does not exist")]
    RoomNotFound(u32),

    #[error("Room {0} is not available")]
    RoomUnavailable(u32),

    #[error("No active reservation for {guest_name} in room {room_number}")]
    ReservationNotFound {
        guest_name: String,
        room_number: u32,
    },

    #[error("Invalid number of nights: {0}")]
    InvalidNights(i32),

    #[error("Payment failed: {0}")]
    Payment(#[from] PaymentError),
}

#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub reservation: Reservation,
    pub receipt: PaymentReceipt,
}

/// A ledger record paired with the category of its room, resolved at lookup time.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetail<'a> {
    pub reservation: &'a Reservation,
    pub category: Option<RoomCategory>,
}

impl BookingDetail<'_> {
    pub fn category_label(&self) -> &'static str {
        self.category.map_or("Unknown", |c| c.as_str())
    }
}

pub struct ReservationManager {
    inventory: InventoryStore,
    ledger: ReservationLedger,
    store: Box<dyn ReservationStore>,
    payments: Box<dyn PaymentGateway>,
    strict_nights: bool,
}

impl ReservationManager {
    /// Seeds the rooms and applies whatever the store has saved.
    ///
    /// Missing data is not an error; a store that cannot be read or parsed is.
    pub fn open(
        store: Box<dyn ReservationStore>,
        payments: Box<dyn PaymentGateway>,
    ) -> Result<Self, PersistenceError> {
        let mut inventory = InventoryStore::seeded();
        let mut ledger = ReservationLedger::new();
        let state = store.load()?;

        match state.room_availability {
            Some(flags) => {
                for flag in flags {
                    if !inventory.set_availability(flag.number, flag.available) {
                        warn!(room = flag.number, "saved state mentions unknown room, skipping");
                    }
                }
            }
            None => info!("No room data found. Using defaults."),
        }

        match state.reservations {
            Some(reservations) => reservations.into_iter().for_each(|r| ledger.add(r)),
            None => info!("No reservation data found."),
        }

        let manager = Self {
            inventory,
            ledger,
            store,
            payments,
            strict_nights: false,
        };
        manager.warn_on_inconsistent_state();
        Ok(manager)
    }

    pub fn from_config(config: &HotelConfig) -> Result<Self, PersistenceError> {
        let store = FlatFileStore::new(&config.rooms_file, &config.reservations_file);
        let manager = Self::open(Box::new(store), Box::new(SimulatedPaymentGateway))?;
        Ok(manager.with_strict_nights(config.strict_nights))
    }

    pub fn with_strict_nights(mut self, strict_nights: bool) -> Self {
        self.strict_nights = strict_nights;
        self
    }

    pub fn inventory(&self) -> &InventoryStore {
        &self.inventory
    }

    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    pub fn display_available_rooms(&self) -> Vec<&Room> {
        self.inventory.list_available()
    }

    pub fn make_reservation(
        &mut self,
        guest_name: &str,
        room_number: u32,
        nights: i32,
    ) -> Result<BookingConfirmation, ReservationError> {
        let room = self
            .inventory
            .find_room(room_number)
            .ok_or(ReservationError::RoomNotFound(room_number))?;
        if !room.available {
            return Err(ReservationError::RoomUnavailable(room_number));
        }

        if nights <= 0 {
            if self.strict_nights {
                return Err(ReservationError::InvalidNights(nights));
            }
            warn!(
                guest = guest_name,
                room = room_number,
                nights,
                "booking with non-positive nights"
            );
        }

        let total_cost = room.price_per_night * f64::from(nights);
        let receipt = self.payments.charge(guest_name, total_cost)?;

        let reservation = Reservation::confirmed(guest_name, room_number, nights, total_cost);
        self.inventory.set_availability(room_number, false);
        self.ledger.add(reservation.clone());
        self.persist();

        info!(
            guest = guest_name,
            room = room_number,
            nights,
            total_cost,
            payment = %receipt.reference,
            "reservation confirmed"
        );

        Ok(BookingConfirmation {
            reservation,
            receipt,
        })
    }

    pub fn cancel_reservation(
        &mut self,
        guest_name: &str,
        room_number: u32,
    ) -> Result<Reservation, ReservationError> {
        let reservation = self
            .ledger
            .find_active_for_mut(guest_name, room_number)
            .ok_or_else(|| ReservationError::ReservationNotFound {
                guest_name: guest_name.to_string(),
                room_number,
            })?;

        reservation.cancel();
        let cancelled = reservation.clone();
        self.inventory.set_availability(room_number, true);
        self.persist();

        info!(guest = guest_name, room = room_number, "reservation cancelled");
        Ok(cancelled)
    }

    // Empty result means the guest has no bookings
    pub fn view_booking_details(&self, guest_name: &str) -> Vec<BookingDetail<'_>> {
        self.ledger
            .list_for(guest_name)
            .into_iter()
            .map(|reservation| BookingDetail {
                reservation,
                category: self
                    .inventory
                    .find_room(reservation.room_number)
                    .map(|room| room.category),
            })
            .collect()
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(self.inventory.rooms(), self.ledger.records()) {
            error!(error = %e, "failed to save reservation data, continuing with in-memory state");
        }
    }

    fn warn_on_inconsistent_state(&self) {
        for room in self.inventory.rooms() {
            let booked = self
                .ledger
                .confirmed()
                .any(|r| r.room_number == room.number);
            if room.available == booked {
                warn!(
                    room = room.number,
                    available = room.available,
                    booked,
                    "room availability does not match saved reservations"
                );
            }
        }
    }
}
