// Interactive menu loop over any line-based input and output

use crate::manager::{ReservationError, ReservationManager};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ViewAvailableRooms,
    MakeReservation,
    CancelReservation,
    ViewBookingDetails,
    Exit,
}

impl MenuChoice {
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::ViewAvailableRooms),
            "2" => Some(MenuChoice::MakeReservation),
            "3" => Some(MenuChoice::CancelReservation),
            "4" => Some(MenuChoice::ViewBookingDetails),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "\n=== Hotel Reservation System ===
1. View Available Rooms
2. Make Reservation
3. Cancel Reservation
4. View Booking Details
5. Exit
Choose an option: ";

pub struct Shell<'m, R, W> {
    manager: &'m mut ReservationManager,
    input: R,
    output: W,
}

impl<'m, R: BufRead, W: Write> Shell<'m, R, W> {
    pub fn new(manager: &'m mut ReservationManager, input: R, output: W) -> Self {
        Self {
            manager,
            input,
            output,
        }
    }

    /// Runs until the user picks Exit or the input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(());
            };

            match MenuChoice::from_input(&line) {
                Some(MenuChoice::ViewAvailableRooms) => self.show_available_rooms()?,
                Some(MenuChoice::MakeReservation) => {
                    if self.make_reservation()?.is_none() {
                        return Ok(());
                    }
                }
                Some(MenuChoice::CancelReservation) => {
                    if self.cancel_reservation()?.is_none() {
                        return Ok(());
                    }
                }
                Some(MenuChoice::ViewBookingDetails) => {
                    if self.show_booking_details()?.is_none() {
                        return Ok(());
                    }
                }
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(());
                }
                None => writeln!(self.output, "Invalid option. Try again.")?,
            }
        }
    }

    fn show_available_rooms(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Available Rooms ===")?;
        let rooms = self.manager.display_available_rooms();
        if rooms.is_empty() {
            writeln!(self.output, "No rooms available.")?;
        }
        for room in rooms {
            writeln!(
                self.output,
                "Room {} ({}): ${:.2}/night",
                room.number, room.category, room.price_per_night
            )?;
        }
        Ok(())
    }

    // `None` from the handlers below means the input ran out mid-prompt
    fn make_reservation(&mut self) -> io::Result<Option<()>> {
        let Some(guest_name) = self.prompt_line("Enter guest name: ")? else {
            return Ok(None);
        };
        let Some(room_number) = self.prompt_number::<i64>("Enter room number: ")? else {
            return Ok(None);
        };
        let Some(nights) = self.prompt_number::<i32>("Enter number of nights: ")? else {
            return Ok(None);
        };

        // Numbers outside the room range cannot match any room
        let Ok(room_number) = u32::try_from(room_number) else {
            writeln!(self.output, "Room unavailable or invalid.")?;
            return Ok(Some(()));
        };

        match self.manager.make_reservation(&guest_name, room_number, nights) {
            Ok(booking) => {
                writeln!(
                    self.output,
                    "Processing payment of ${:.2}...",
                    booking.receipt.amount
                )?;
                writeln!(
                    self.output,
                    "Payment successful! (ref {}, {})",
                    booking.receipt.reference,
                    booking.receipt.processed_at.format("%Y-%m-%d %H:%M:%S UTC")
                )?;
                writeln!(self.output, "Reservation successful!")?;
            }
            Err(ReservationError::InvalidNights(_)) => {
                writeln!(self.output, "Invalid number of nights.")?;
            }
            Err(ReservationError::Payment(e)) => {
                writeln!(self.output, "{}", e)?;
            }
            Err(_) => writeln!(self.output, "Room unavailable or invalid.")?,
        }
        Ok(Some(()))
    }

    fn cancel_reservation(&mut self) -> io::Result<Option<()>> {
        let Some(guest_name) = self.prompt_line("Enter guest name: ")? else {
            return Ok(None);
        };
        let Some(room_number) = self.prompt_number::<i64>("Enter room number: ")? else {
            return Ok(None);
        };
        let Ok(room_number) = u32::try_from(room_number) else {
            writeln!(self.output, "Reservation not found.")?;
            return Ok(Some(()));
        };

        match self.manager.cancel_reservation(&guest_name, room_number) {
            Ok(_) => writeln!(self.output, "Reservation cancelled!")?,
            Err(_) => writeln!(self.output, "Reservation not found.")?,
        }
        Ok(Some(()))
    }

    fn show_booking_details(&mut self) -> io::Result<Option<()>> {
        let Some(guest_name) = self.prompt_line("Enter guest name: ")? else {
            return Ok(None);
        };

        writeln!(self.output, "\n=== Booking Details ===")?;
        let details = self.manager.view_booking_details(&guest_name);
        if details.is_empty() {
            writeln!(self.output, "No bookings found for {}", guest_name)?;
        }
        for detail in details {
            let r = detail.reservation;
            writeln!(
                self.output,
                "Guest: {}, Room: {} ({}), Nights: {}, Total: ${:.2}, Status: {}",
                r.guest_name,
                r.room_number,
                detail.category_label(),
                r.nights,
                r.total_cost,
                r.status
            )?;
        }
        Ok(Some(()))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.read_line()
    }

    fn prompt_number<T: FromStr>(&mut self, prompt: &str) -> io::Result<Option<T>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match line.trim().parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }
}
