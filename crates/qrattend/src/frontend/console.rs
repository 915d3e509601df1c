//! Console menu front-end.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::storage::AttendanceStore;

use super::{Action, Controller, Outcome};

const BANNER: &str = "\
=== QR Attendance System (Prototype) ===
1. Connect to Database
2. Simulate QR Scan
3. View Attendance Records
4. Exit";

const PROMPT: &str = "\nSelect an option: ";

/// Numbered menu read line by line from `input`.
///
/// End of input is treated like choosing "Exit".
#[derive(Debug)]
pub struct ConsoleMenu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleMenu<R, W> {
    /// Create a menu reading choices from `input` and writing to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the menu, returning its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu until the user exits or input ends.
    ///
    /// Action failures are printed and the menu keeps going.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run<S: AttendanceStore>(&mut self, controller: &mut Controller<S>) -> Result<()> {
        writeln!(self.output, "{BANNER}")?;

        while !controller.state().is_terminal() {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                self.render(controller.dispatch(Action::Exit))?;
                break;
            }

            match Action::from_menu_choice(&line) {
                Some(action) => self.render(controller.dispatch(action))?,
                None => writeln!(self.output, "Invalid choice.")?,
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn render(&mut self, result: Result<Outcome>) -> Result<()> {
        match result {
            Ok(Outcome::Connected(message)) => writeln!(self.output, "{message}")?,
            Ok(Outcome::Logged(record)) => writeln!(self.output, "Logged: {record}")?,
            Ok(Outcome::Records(records)) => {
                writeln!(self.output, "\n--- Attendance Records ---")?;
                for record in &records {
                    writeln!(self.output, "{record}")?;
                }
            }
            Ok(Outcome::Exited(_)) => writeln!(self.output, "Goodbye!")?,
            Ok(Outcome::Ignored) => {}
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }
}
