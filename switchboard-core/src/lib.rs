//! Switchboard Bridge Library
//!
//! A realtime bridge that samples a fixed set of digital switch inputs and
//! republishes their combined state as a periodic frame on a CAN bus.
//!
//! # Architecture
//!
//! Control flow is strictly linear and single-threaded. Each cycle fully
//! completes sampling, encoding, and transmission before the next begins:
//!
//! - [`input`] - digital line abstraction (GPIO or simulated)
//! - [`frame`] - pure snapshot-to-frame encoder
//! - [`transport`] - CAN link lifecycle (bring-up, send, teardown)
//! - [`bridge`] - the fixed-rate scheduling loop with timing statistics
//! - [`config`] - configuration owned by the assembly point
//!
//! The library does NOT handle bus error frames, debounce inputs, or fan
//! out to multiple bus segments; it assumes one upstream segment and a
//! small fixed number of lines.
//!
//! # Example Usage
//!
//! ```no_run
//! use switchboard_core::{Bridge, BridgeConfig, SimulatedInput, SocketCanTransport};
//! use switchboard_core::transport::CanTransport;
//! use std::time::Duration;
//!
//! let config = BridgeConfig::new();
//! let source = SimulatedInput::new(
//!     config.switches.iter().map(|s| s.name.clone()).collect(),
//! );
//! let transport = SocketCanTransport::new(
//!     config.interface.clone(),
//!     config.bitrate,
//!     config.tx_queue_len,
//! );
//!
//! let mut bridge = Bridge::new(
//!     Box::new(source),
//!     Some(Box::new(transport) as Box<dyn CanTransport>),
//!     Duration::from_millis(config.cycle_interval_ms),
//! );
//! bridge.run(None).unwrap();
//! ```

// Public modules
pub mod bridge;
pub mod config;
pub mod frame;
pub mod input;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use bridge::{Bridge, CycleStats};
pub use config::{BridgeConfig, SwitchLine};
pub use frame::{encode, FILLER_BYTE, SWITCH_FRAME_ID};
pub use input::{InputSource, SimulatedInput};
pub use transport::{CanTransport, SocketCanTransport};
pub use types::{CanFrame, Result, SwitchSnapshot, SwitchboardError};

#[cfg(feature = "rpi")]
pub use input::GpioInput;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: default configuration validates and encodes
        let config = BridgeConfig::new();
        assert!(config.validate().is_ok());

        let snapshot = SwitchSnapshot::new(vec![false; config.switches.len()]).unwrap();
        let frame = encode(&snapshot);
        assert_eq!(frame.can_id, SWITCH_FRAME_ID);
    }
}
