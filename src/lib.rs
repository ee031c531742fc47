// Internal Modules
pub mod config;
pub mod consistency;
pub mod dynamics;
pub mod error;
pub mod errors_model;
pub mod events;
pub mod keyboard;
pub mod profile;
pub mod sampling;
pub mod session;
pub mod words;

pub use config::SimulationConfig;
pub use consistency::ConsistencyReport;
pub use dynamics::DynamicsEngine;
pub use error::{KeyGhostError, KgResult};
pub use errors_model::{ErrorEngine, ErrorPolicy, TypoKind};
pub use profile::Profile;
pub use session::{Collaborator, Typist};

/// Install a default stderr subscriber. Embedders with their own tracing
/// setup should skip this.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();
}
