//! Remote launch gateway.
//!
//! The emulator runs on a separate game server driven by a small set of
//! shell scripts (`launch.sh`, `stopall.sh`, `query.sh`, `set_volume.sh`).
//! After a launch, display clients (marquee panels and the like) are told
//! to reconnect to the game server.

mod error;
mod ssh;
mod traits;
mod types;

pub use error::GatewayError;
pub use ssh::SshGateway;
pub use traits::LaunchGateway;
pub use types::{parse_volume, ClientLaunchResult, LaunchOutcome, ServerStatus, MAX_VOLUME};
