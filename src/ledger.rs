// Reservation ledger: append-only history of every booking made in this session

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Confirmed => f.write_str("Confirmed"),
            ReservationStatus::Cancelled => f.write_str("Cancelled"),
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("unknown reservation status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub guest_name: String,
    pub room_number: u32,
    pub nights: i32,
    // Fixed at booking time, never recomputed
    pub total_cost: f64,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn confirmed(
        guest_name: impl Into<String>,
        room_number: u32,
        nights: i32,
        total_cost: f64,
    ) -> Self {
        Self {
            guest_name: guest_name.into(),
            room_number,
            nights,
            total_cost,
            status: ReservationStatus::Confirmed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    pub fn belongs_to(&self, guest_name: &str) -> bool {
        self.guest_name.to_lowercase() == guest_name.to_lowercase()
    }

    /// Moves the reservation to Cancelled. Returns false if it already was.
    pub fn cancel(&mut self) -> bool {
        if self.is_active() {
            self.status = ReservationStatus::Cancelled;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReservationLedger {
    records: Vec<Reservation>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reservation: Reservation) {
        self.records.push(reservation);
    }

    pub fn records(&self) -> &[Reservation] {
        &self.records
    }

    pub fn confirmed(&self) -> impl Iterator<Item = &Reservation> {
        self.records.iter().filter(|r| r.is_active())
    }

    // First confirmed match in insertion order
    pub fn find_active_for(&self, guest_name: &str, room_number: u32) -> Option<&Reservation> {
        self.records
            .iter()
            .find(|r| r.is_active() && r.room_number == room_number && r.belongs_to(guest_name))
    }

    pub fn find_active_for_mut(
        &mut self,
        guest_name: &str,
        room_number: u32,
    ) -> Option<&mut Reservation> {
        self.records
            .iter_mut()
            .find(|r| r.is_active() && r.room_number == room_number && r.belongs_to(guest_name))
    }

    pub fn list_for(&self, guest_name: &str) -> Vec<&Reservation> {
        self.records
            .iter()
            .filter(|r| r.belongs_to(guest_name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
