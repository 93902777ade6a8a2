//! Bridge configuration types
//!
//! The configuration is owned by the process's top-level assembly point and
//! passed into the components at construction. There is no global device
//! table; the switch set lives here.

use crate::types::{Result, SwitchboardError, MAX_LINES};
use serde::{Deserialize, Serialize};

/// A single configured switch line: stable name plus GPIO pin (BCM numbering)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchLine {
    pub name: String,
    pub pin: u8,
}

impl SwitchLine {
    pub fn new(name: impl Into<String>, pin: u8) -> Self {
        Self {
            name: name.into(),
            pin,
        }
    }
}

/// Configuration for the switchboard bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// CAN interface to transmit on
    #[serde(default = "default_interface")]
    pub interface: String,

    /// CAN bit rate applied during bring-up
    #[serde(default = "default_bitrate")]
    pub bitrate: u32,

    /// Outbound queue depth applied during bring-up
    #[serde(default = "default_tx_queue_len")]
    pub tx_queue_len: u32,

    /// Nominal cycle interval in milliseconds
    #[serde(default = "default_cycle_interval_ms")]
    pub cycle_interval_ms: u64,

    /// Whether frames are transmitted at all (false = dry-run mode)
    #[serde(default = "default_true")]
    pub tx_enabled: bool,

    /// Configured switch lines; order defines the frame byte order
    #[serde(default = "default_switches")]
    pub switches: Vec<SwitchLine>,
}

fn default_interface() -> String {
    "can0".to_string()
}

fn default_bitrate() -> u32 {
    1_000_000
}

fn default_tx_queue_len() -> u32 {
    100_000
}

fn default_cycle_interval_ms() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_switches() -> Vec<SwitchLine> {
    vec![
        SwitchLine::new("switch_a", 14),
        SwitchLine::new("switch_b", 18),
        SwitchLine::new("switch_c", 12),
    ]
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            bitrate: default_bitrate(),
            tx_queue_len: default_tx_queue_len(),
            cycle_interval_ms: default_cycle_interval_ms(),
            tx_enabled: default_true(),
            switches: default_switches(),
        }
    }
}

impl BridgeConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the CAN interface name
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = interface.into();
        self
    }

    /// Builder method: set the CAN bit rate
    pub fn with_bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = bitrate;
        self
    }

    /// Builder method: set the cycle interval in milliseconds
    pub fn with_cycle_interval_ms(mut self, interval_ms: u64) -> Self {
        self.cycle_interval_ms = interval_ms;
        self
    }

    /// Builder method: enable or disable transmission
    pub fn with_tx_enabled(mut self, enabled: bool) -> Self {
        self.tx_enabled = enabled;
        self
    }

    /// Builder method: replace the switch set
    pub fn with_switches(mut self, switches: Vec<SwitchLine>) -> Self {
        self.switches = switches;
        self
    }

    /// Validate the configuration before the bridge is assembled
    ///
    /// The switch count is bounded by the frame width; names and pins must
    /// be unique so a snapshot position maps to exactly one line.
    pub fn validate(&self) -> Result<()> {
        if self.switches.is_empty() || self.switches.len() > MAX_LINES {
            return Err(SwitchboardError::InvalidConfig(format!(
                "expected 1 to {} switches, got {}",
                MAX_LINES,
                self.switches.len()
            )));
        }
        for (i, switch) in self.switches.iter().enumerate() {
            for other in &self.switches[i + 1..] {
                if switch.name == other.name {
                    return Err(SwitchboardError::InvalidConfig(format!(
                        "duplicate switch name: {}",
                        switch.name
                    )));
                }
                if switch.pin == other.pin {
                    return Err(SwitchboardError::InvalidConfig(format!(
                        "pin {} assigned to both '{}' and '{}'",
                        switch.pin, switch.name, other.name
                    )));
                }
            }
        }
        if self.cycle_interval_ms == 0 {
            return Err(SwitchboardError::InvalidConfig(
                "cycle interval must be at least 1 ms".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_wiring() {
        let config = BridgeConfig::new();
        assert_eq!(config.interface, "can0");
        assert_eq!(config.bitrate, 1_000_000);
        assert_eq!(config.tx_queue_len, 100_000);
        assert_eq!(config.cycle_interval_ms, 10);
        assert!(config.tx_enabled);
        assert_eq!(config.switches.len(), 3);
        assert_eq!(config.switches[0], SwitchLine::new("switch_a", 14));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BridgeConfig::new()
            .with_interface("can1")
            .with_bitrate(500_000)
            .with_cycle_interval_ms(20)
            .with_tx_enabled(false)
            .with_switches(vec![SwitchLine::new("limit", 4)]);

        assert_eq!(config.interface, "can1");
        assert_eq!(config.bitrate, 500_000);
        assert_eq!(config.cycle_interval_ms, 20);
        assert!(!config.tx_enabled);
        assert_eq!(config.switches.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let dup_name = BridgeConfig::new().with_switches(vec![
            SwitchLine::new("switch_a", 14),
            SwitchLine::new("switch_a", 18),
        ]);
        assert!(dup_name.validate().is_err());

        let dup_pin = BridgeConfig::new().with_switches(vec![
            SwitchLine::new("switch_a", 14),
            SwitchLine::new("switch_b", 14),
        ]);
        assert!(dup_pin.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_arity() {
        let empty = BridgeConfig::new().with_switches(vec![]);
        assert!(empty.validate().is_err());

        let too_many: Vec<SwitchLine> = (0..9)
            .map(|i| SwitchLine::new(format!("switch_{}", i), i as u8))
            .collect();
        let config = BridgeConfig::new().with_switches(too_many);
        assert!(config.validate().is_err());
    }
}
