// Persistence adapter: loads and saves rooms and reservations
//
// Flat-file format, one record per line, comma separated, no header:
//   rooms file:        number,category,available
//   reservations file: guest,room,nights,total_cost   (confirmed only)

use crate::inventory::Room;
use crate::ledger::Reservation;
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record in {} at line {line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to save rooms ({rooms}) and reservations ({reservations})")]
    SaveFailed {
        rooms: Box<PersistenceError>,
        reservations: Box<PersistenceError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomAvailability {
    pub number: u32,
    pub available: bool,
}

// `None` means nothing was stored yet, which is not an error
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadedState {
    pub room_availability: Option<Vec<RoomAvailability>>,
    pub reservations: Option<Vec<Reservation>>,
}

pub trait ReservationStore {
    fn load(&self) -> Result<LoadedState, PersistenceError>;

    // Implementations persist only confirmed reservations
    fn save(&self, rooms: &[Room], reservations: &[Reservation]) -> Result<(), PersistenceError>;
}

/// Stores state in two plain-text files, fully rewritten on every save.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    rooms_file: PathBuf,
    reservations_file: PathBuf,
}

impl FlatFileStore {
    pub fn new(rooms_file: impl AsRef<Path>, reservations_file: impl AsRef<Path>) -> Self {
        Self {
            rooms_file: rooms_file.as_ref().to_path_buf(),
            reservations_file: reservations_file.as_ref().to_path_buf(),
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_all(path: &Path, content: String) -> Result<(), PersistenceError> {
    fs::write(path, content).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl ReservationStore for FlatFileStore {
    fn load(&self) -> Result<LoadedState, PersistenceError> {
        let room_availability = read_optional(&self.rooms_file)?
            .map(|content| decode_rooms(&self.rooms_file, &content))
            .transpose()?;
        let reservations = read_optional(&self.reservations_file)?
            .map(|content| decode_reservations(&self.reservations_file, &content))
            .transpose()?;

        debug!(
            rooms_file = %self.rooms_file.display(),
            reservations_file = %self.reservations_file.display(),
            rooms_loaded = room_availability.as_ref().map(Vec::len),
            reservations_loaded = reservations.as_ref().map(Vec::len),
            "loaded flat-file state"
        );

        Ok(LoadedState {
            room_availability,
            reservations,
        })
    }

    fn save(&self, rooms: &[Room], reservations: &[Reservation]) -> Result<(), PersistenceError> {
        // Both files are always attempted; one failing does not skip the other
        let rooms = write_all(&self.rooms_file, encode_rooms(rooms));
        let reservations = write_all(&self.reservations_file, encode_reservations(reservations));

        match (rooms, reservations) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Err(rooms), Err(reservations)) => Err(PersistenceError::SaveFailed {
                rooms: Box::new(rooms),
                reservations: Box::new(reservations),
            }),
        }
    }
}

pub fn encode_rooms(rooms: &[Room]) -> String {
    rooms
        .iter()
        .map(|room| format!("{},{},{}\n", room.number, room.category, room.available))
        .collect()
}

pub fn encode_reservations(reservations: &[Reservation]) -> String {
    reservations
        .iter()
        .filter(|r| r.is_active())
        .map(|r| {
            // `{:?}` keeps the decimal point: 350.0, not 350
            format!(
                "{},{},{},{:?}\n",
                r.guest_name, r.room_number, r.nights, r.total_cost
            )
        })
        .collect()
}

fn records<'a>(content: &'a str) -> impl Iterator<Item = (usize, &'a str)> + 'a {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

pub fn decode_rooms(
    path: &Path,
    content: &str,
) -> Result<Vec<RoomAvailability>, PersistenceError> {
    let malformed = |line: usize, reason: String| PersistenceError::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    records(content)
        .map(|(line, record)| {
            let parts: Vec<&str> = record.split(',').collect();
            if parts.len() < 3 {
                return Err(malformed(line, format!("expected 3 fields, got {}", parts.len())));
            }

            let number = parts[0]
                .trim()
                .parse::<u32>()
                .map_err(|e| malformed(line, format!("bad room number '{}': {}", parts[0], e)))?;
            // Anything but "true" reads as booked
            let flag = parts[2].trim();
            let available = flag.eq_ignore_ascii_case("true");
            if !available && !flag.eq_ignore_ascii_case("false") {
                warn!(
                    path = %path.display(),
                    line,
                    flag,
                    "unrecognised availability flag, treating room as unavailable"
                );
            }

            Ok(RoomAvailability { number, available })
        })
        .collect()
}

pub fn decode_reservations(
    path: &Path,
    content: &str,
) -> Result<Vec<Reservation>, PersistenceError> {
    let malformed = |line: usize, reason: String| PersistenceError::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    records(content)
        .map(|(line, record)| {
            // Split from the right so commas in the guest name survive
            let mut fields = record.rsplitn(4, ',');
            let (Some(total), Some(nights), Some(room), Some(guest)) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(malformed(line, "expected 4 fields".to_string()));
            };

            let room_number = room
                .trim()
                .parse::<u32>()
                .map_err(|e| malformed(line, format!("bad room number '{}': {}", room, e)))?;
            let nights = nights
                .trim()
                .parse::<i32>()
                .map_err(|e| malformed(line, format!("bad nights '{}': {}", nights, e)))?;
            let total_cost = total
                .trim()
                .parse::<f64>()
                .map_err(|e| malformed(line, format!("bad total cost '{}': {}", total, e)))?;

            Ok(Reservation::confirmed(guest, room_number, nights, total_cost))
        })
        .collect()
}

#[derive(Debug, Default)]
struct Snapshot {
    rooms: Option<Vec<Room>>,
    reservations: Option<Vec<Reservation>>,
    saves: usize,
}

/// Keeps the last saved state in memory. Clones share the same snapshot.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    inner: Rc<RefCell<Snapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved_reservations(&self) -> Option<Vec<Reservation>> {
        self.inner.borrow().reservations.clone()
    }

    pub fn save_count(&self) -> usize {
        self.inner.borrow().saves
    }
}

impl ReservationStore for InMemoryStore {
    fn load(&self) -> Result<LoadedState, PersistenceError> {
        let snapshot = self.inner.borrow();
        Ok(LoadedState {
            room_availability: snapshot.rooms.as_ref().map(|rooms| {
                rooms
                    .iter()
                    .map(|room| RoomAvailability {
                        number: room.number,
                        available: room.available,
                    })
                    .collect()
            }),
            reservations: snapshot.reservations.clone(),
        })
    }

    fn save(&self, rooms: &[Room], reservations: &[Reservation]) -> Result<(), PersistenceError> {
        let mut snapshot = self.inner.borrow_mut();
        snapshot.rooms = Some(rooms.to_vec());
        snapshot.reservations = Some(
            reservations
                .iter()
                .filter(|r| r.is_active())
                .cloned()
                .collect(),
        );
        snapshot.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::inventory::InventoryStore;
    use crate::ledger::ReservationStatus;

    // Unique scratch directory per test, removed on drop
    pub(crate) struct ScratchDir(pub PathBuf);

    impl ScratchDir {
        pub(crate) fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "hotel_reservations_{}_{}_{:08x}",
                tag,
                std::process::id(),
                rand::random::<u32>()
            ));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        pub(crate) fn store(&self) -> FlatFileStore {
            FlatFileStore::new(self.0.join("rooms.txt"), self.0.join("reservations.txt"))
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_missing_files_load_as_no_data() {
        let dir = ScratchDir::new("missing");
        let state = dir.store().load().unwrap();
        assert_eq!(state, LoadedState::default());
    }

    #[test]
    fn test_rooms_file_format() {
        let mut inventory = InventoryStore::seeded();
        inventory.set_availability(102, false);

        assert_eq!(
            encode_rooms(inventory.rooms()),
            "101,Standard,true\n102,Standard,false\n201,Deluxe,true\n202,Deluxe,true\n301,Suite,true\n"
        );
    }

    #[test]
    fn test_reservations_file_drops_cancelled() {
        let mut cancelled = Reservation::confirmed("Alice", 101, 2, 200.0);
        cancelled.cancel();
        let kept = Reservation::confirmed("Bob", 301, 1, 350.0);

        assert_eq!(encode_reservations(&[cancelled, kept]), "Bob,301,1,350.0\n");
    }

    #[test]
    fn test_save_then_load_preserves_availability_and_confirmed_bookings() {
        let dir = ScratchDir::new("roundtrip");
        let store = dir.store();

        let mut inventory = InventoryStore::seeded();
        inventory.set_availability(201, false);
        inventory.set_availability(301, false);

        let mut cancelled = Reservation::confirmed("Alice", 101, 2, 200.0);
        cancelled.cancel();
        let reservations = vec![
            cancelled,
            Reservation::confirmed("Bob", 201, 3, 600.0),
            Reservation::confirmed("Carol", 301, 1, 350.0),
        ];

        store.save(inventory.rooms(), &reservations).unwrap();
        let state = store.load().unwrap();

        let flags: Vec<(u32, bool)> = state
            .room_availability
            .unwrap()
            .iter()
            .map(|r| (r.number, r.available))
            .collect();
        assert_eq!(
            flags,
            vec![(101, true), (102, true), (201, false), (202, true), (301, false)]
        );

        let loaded = state.reservations.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], Reservation::confirmed("Bob", 201, 3, 600.0));
        assert_eq!(loaded[1].guest_name, "Carol");
        assert!(loaded.iter().all(|r| r.status == ReservationStatus::Confirmed));
    }

    #[test]
    fn test_decode_reservations_accepts_decimal_totals() {
        let path = Path::new("reservations.txt");
        let content = "Alice,101,2,200\r\n\nBob,202,1,199.99\n";
        let loaded = decode_reservations(path, content).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].total_cost, 200.0);
        assert_eq!(loaded[1].total_cost, 199.99);
    }

    #[test]
    fn test_guest_name_with_comma_round_trips() {
        let encoded = encode_reservations(&[Reservation::confirmed("Smith, John", 102, 1, 100.0)]);
        let loaded = decode_reservations(Path::new("r.txt"), &encoded).unwrap();
        assert_eq!(loaded[0].guest_name, "Smith, John");
        assert_eq!(loaded[0].room_number, 102);
    }

    #[test]
    fn test_malformed_room_line_reports_position() {
        let err = decode_rooms(Path::new("rooms.txt"), "101,Standard,true\nabc,Deluxe,true\n")
            .unwrap_err();
        match err {
            PersistenceError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_reservation_line_is_rejected() {
        let result = decode_reservations(Path::new("r.txt"), "Alice,101,two,200\n");
        assert!(matches!(result, Err(PersistenceError::Malformed { line: 1, .. })));

        let result = decode_reservations(Path::new("r.txt"), "Alice,101\n");
        assert!(matches!(result, Err(PersistenceError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_availability_flag_reads_as_unavailable() {
        let flags = decode_rooms(Path::new("rooms.txt"), "101,Standard,TRUE\n102,Standard,yes\n")
            .unwrap();
        assert_eq!(
            flags,
            vec![
                RoomAvailability { number: 101, available: true },
                RoomAvailability { number: 102, available: false },
            ]
        );
    }

    #[test]
    fn test_total_cost_keeps_decimal_point() {
        let encoded = encode_reservations(&[
            Reservation::confirmed("Alice", 101, 2, 200.0),
            Reservation::confirmed("Bob", 202, 1, 199.99),
        ]);
        assert_eq!(encoded, "Alice,101,2,200.0\nBob,202,1,199.99\n");
    }

    #[test]
    fn test_reservations_saved_when_rooms_file_fails() {
        let dir = ScratchDir::new("rooms_fail");
        let rooms_path = dir.0.join("nope").join("rooms.txt");
        let reservations_path = dir.0.join("reservations.txt");
        let store = FlatFileStore::new(&rooms_path, &reservations_path);

        let result = store.save(
            InventoryStore::seeded().rooms(),
            &[Reservation::confirmed("Alice", 101, 2, 200.0)],
        );

        match result {
            Err(PersistenceError::Io { path, .. }) => assert_eq!(path, rooms_path),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            fs::read_to_string(&reservations_path).unwrap(),
            "Alice,101,2,200.0\n"
        );
    }

    #[test]
    fn test_both_files_failing_reports_both() {
        let dir = ScratchDir::new("io");
        let store = FlatFileStore::new(
            dir.0.join("nope").join("rooms.txt"),
            dir.0.join("nope").join("reservations.txt"),
        );

        let result = store.save(InventoryStore::seeded().rooms(), &[]);
        match result {
            Err(PersistenceError::SaveFailed { rooms, reservations }) => {
                assert!(matches!(*rooms, PersistenceError::Io { .. }));
                assert!(matches!(*reservations, PersistenceError::Io { .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_in_memory_store_shares_snapshot_between_clones() {
        let store = InMemoryStore::new();
        let handle = store.clone();
        assert_eq!(store.load().unwrap(), LoadedState::default());

        let mut cancelled = Reservation::confirmed("Alice", 101, 2, 200.0);
        cancelled.cancel();
        store
            .save(InventoryStore::seeded().rooms(), &[cancelled])
            .unwrap();

        assert_eq!(handle.save_count(), 1);
        assert_eq!(handle.saved_reservations(), Some(vec![]));
        assert_eq!(handle.load().unwrap().room_availability.unwrap().len(), 5);
    }
}
