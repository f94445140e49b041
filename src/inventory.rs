// Room inventory: the fixed set of rooms and their availability flags

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomCategory {
    Standard,
    Deluxe,
    Suite,
}

impl RoomCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomCategory::Standard => "Standard",
            RoomCategory::Deluxe => "Deluxe",
            RoomCategory::Suite => "Suite",
        }
    }
}

impl fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(RoomCategory::Standard),
            "deluxe" => Ok(RoomCategory::Deluxe),
            "suite" => Ok(RoomCategory::Suite),
            other => Err(format!("unknown room category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub number: u32,
    pub category: RoomCategory,
    pub price_per_night: f64,
    pub available: bool,
}

impl Room {
    pub fn new(number: u32, category: RoomCategory, price_per_night: f64) -> Self {
        Self {
            number,
            category,
            price_per_night,
            available: true,
        }
    }
}

/// The hotel's rooms in definition order.
///
/// Rooms are created once and never removed; only the availability flag changes.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    rooms: Vec<Room>,
}

impl InventoryStore {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    // 101, 102, 201, 202, 301 - all available
    pub fn seeded() -> Self {
        Self::new(vec![
            Room::new(101, RoomCategory::Standard, 100.0),
            Room::new(102, RoomCategory::Standard, 100.0),
            Room::new(201, RoomCategory::Deluxe, 200.0),
            Room::new(202, RoomCategory::Deluxe, 200.0),
            Room::new(301, RoomCategory::Suite, 350.0),
        ])
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn list_available(&self) -> Vec<&Room> {
        self.rooms.iter().filter(|room| room.available).collect()
    }

    pub fn find_room(&self, number: u32) -> Option<&Room> {
        self.rooms.iter().find(|room| room.number == number)
    }

    /// Sets the availability flag of a room. Returns false if no such room exists.
    pub fn set_availability(&mut self, number: u32, available: bool) -> bool {
        match self.rooms.iter_mut().find(|room| room.number == number) {
            Some(room) => {
                room.available = available;
                true
            }
            None => false,
        }
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}
