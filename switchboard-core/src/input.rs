//! Digital input sources
//!
//! This module abstracts "report the current logic level of a named digital
//! line" behind the [`InputSource`] trait so the scheduler never touches
//! hardware directly. Concrete sources exist per platform: Raspberry Pi GPIO
//! behind the `rpi` feature, and an in-memory simulated source that is always
//! available for tests and dry runs.

use crate::types::{Result, SwitchSnapshot, SwitchboardError};
use std::cell::RefCell;

/// Capability to read configured digital lines
///
/// A read must be O(1) and non-suspending; the scheduler budgets strict
/// wall-clock time per cycle and never tolerates blocking I/O here.
pub trait InputSource {
    /// Read the current level of a named line (true = asserted/closed)
    ///
    /// Fails with [`SwitchboardError::UnknownLine`] if the line is not part
    /// of the configured set.
    fn read_level(&self, line: &str) -> Result<bool>;

    /// Configured line names in stable order
    ///
    /// This order defines the byte order of the encoded frame.
    fn lines(&self) -> &[String];

    /// Capture one atomic logical snapshot of all configured lines
    ///
    /// Lines are read sequentially in configuration order. Any read failure
    /// discards the snapshot in full; a partially populated snapshot never
    /// escapes this method.
    fn capture_snapshot(&self) -> Result<SwitchSnapshot> {
        let mut levels = Vec::with_capacity(self.lines().len());
        for line in self.lines() {
            levels.push(self.read_level(line)?);
        }
        SwitchSnapshot::new(levels)
    }
}

/// In-memory input source for tests and dry runs
///
/// Levels start low and can be toggled with [`SimulatedInput::set_level`].
/// Single-threaded by design, matching the scheduler's concurrency model.
pub struct SimulatedInput {
    names: Vec<String>,
    levels: RefCell<Vec<bool>>,
}

impl SimulatedInput {
    /// Create a simulated source with all lines low
    pub fn new(names: Vec<String>) -> Self {
        let levels = RefCell::new(vec![false; names.len()]);
        Self { names, levels }
    }

    /// Create a simulated source with explicit initial levels
    pub fn with_levels(names: Vec<String>, levels: Vec<bool>) -> Result<Self> {
        if names.len() != levels.len() {
            return Err(SwitchboardError::InvalidConfig(format!(
                "{} names but {} levels",
                names.len(),
                levels.len()
            )));
        }
        Ok(Self {
            names,
            levels: RefCell::new(levels),
        })
    }

    /// Set the level of a named line
    pub fn set_level(&self, line: &str, level: bool) -> Result<()> {
        let index = self
            .names
            .iter()
            .position(|name| name == line)
            .ok_or_else(|| SwitchboardError::UnknownLine(line.to_string()))?;
        self.levels.borrow_mut()[index] = level;
        Ok(())
    }
}

impl InputSource for SimulatedInput {
    fn read_level(&self, line: &str) -> Result<bool> {
        let index = self
            .names
            .iter()
            .position(|name| name == line)
            .ok_or_else(|| SwitchboardError::UnknownLine(line.to_string()))?;
        Ok(self.levels.borrow()[index])
    }

    fn lines(&self) -> &[String] {
        &self.names
    }
}

#[cfg(feature = "rpi")]
pub use gpio::GpioInput;

#[cfg(feature = "rpi")]
mod gpio {
    use super::InputSource;
    use crate::config::SwitchLine;
    use crate::types::{Result, SwitchboardError};
    use rppal::gpio::{Gpio, InputPin};

    /// Raspberry Pi GPIO input source
    ///
    /// Each switch is wired between its pin and ground with the internal
    /// pull-up enabled, so a closed switch reads low. Pin reads are plain
    /// register reads and never block.
    pub struct GpioInput {
        names: Vec<String>,
        pins: Vec<InputPin>,
    }

    impl GpioInput {
        /// Claim the configured pins and build the source
        pub fn new(switches: &[SwitchLine]) -> Result<Self> {
            let gpio = Gpio::new().map_err(|e| {
                SwitchboardError::InvalidConfig(format!("GPIO unavailable: {}", e))
            })?;

            let mut names = Vec::with_capacity(switches.len());
            let mut pins = Vec::with_capacity(switches.len());
            for switch in switches {
                let pin = gpio
                    .get(switch.pin)
                    .map_err(|e| {
                        SwitchboardError::InvalidConfig(format!(
                            "GPIO pin {} for '{}' unavailable: {}",
                            switch.pin, switch.name, e
                        ))
                    })?
                    .into_input_pullup();
                log::debug!("claimed GPIO pin {} for '{}'", switch.pin, switch.name);
                names.push(switch.name.clone());
                pins.push(pin);
            }
            Ok(Self { names, pins })
        }
    }

    impl InputSource for GpioInput {
        fn read_level(&self, line: &str) -> Result<bool> {
            let index = self
                .names
                .iter()
                .position(|name| name == line)
                .ok_or_else(|| SwitchboardError::UnknownLine(line.to_string()))?;
            // Pull-up wiring: switch closed to ground reads low
            Ok(self.pins[index].is_low())
        }

        fn lines(&self) -> &[String] {
            &self.names
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unknown_line_rejected() {
        let input = SimulatedInput::new(names(&["switch_a", "switch_b"]));
        assert!(matches!(
            input.read_level("switch_z"),
            Err(SwitchboardError::UnknownLine(_))
        ));
        assert!(input.set_level("switch_z", true).is_err());
    }

    #[test]
    fn test_snapshot_follows_configuration_order() {
        let input = SimulatedInput::new(names(&["switch_a", "switch_b", "switch_c"]));
        input.set_level("switch_a", true).unwrap();
        input.set_level("switch_c", true).unwrap();

        let snapshot = input.capture_snapshot().unwrap();
        assert_eq!(snapshot.levels(), &[true, false, true]);
    }

    #[test]
    fn test_with_levels_validates_arity() {
        assert!(SimulatedInput::with_levels(names(&["switch_a"]), vec![true, false]).is_err());
        let input =
            SimulatedInput::with_levels(names(&["switch_a", "switch_b"]), vec![true, false])
                .unwrap();
        assert_eq!(input.read_level("switch_a").unwrap(), true);
        assert_eq!(input.read_level("switch_b").unwrap(), false);
    }
}
