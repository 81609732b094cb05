//! Device-gated crew runner
//!
//! Registers a device with the MachineID control plane, validates it, and
//! only then kicks off a single sequential agent crew.

pub mod config;
pub mod crew;
pub mod error;
pub mod gate;
pub mod machineid;
pub mod types;

pub use config::{Cli, Config, ValidateMethod};
pub use error::{Error, Result};
pub use gate::{run, Outcome};
pub use machineid::MachineIdClient;
