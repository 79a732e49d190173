//! Types exchanged with the remote launch gateway.

use serde::{Deserialize, Serialize};

/// Highest volume accepted by `set_volume.sh`.
pub const MAX_VOLUME: u8 = 100;

/// Result of running the launch script on the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchOutcome {
    pub exit_code: i32,
    /// Captured standard output of the launch script.
    pub stdout: String,
}

impl LaunchOutcome {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
        }
    }

    pub fn failure(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// What the game server reports through `query.sh`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Catalog id of the running game, if any.
    pub entry_id: Option<String>,
    pub volume: Option<u8>,
}

impl ServerStatus {
    /// Parse `query.sh` output: `<state> <entry id> <volume>`.
    ///
    /// Missing trailing fields are absent; a volume that is not a number is
    /// dropped.
    pub fn parse(output: &str) -> Self {
        let mut fields = output.split_whitespace().skip(1);
        let entry_id = fields.next().map(str::to_string);
        let volume = fields.next().and_then(parse_volume);
        Self { entry_id, volume }
    }

    pub fn is_running(&self) -> bool {
        self.entry_id.is_some()
    }
}

/// Parse a volume reported by a script; only plain digits within range count.
pub fn parse_volume(text: &str) -> Option<u8> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u8>().ok().filter(|v| *v <= MAX_VOLUME)
}

/// Outcome of starting the display client on one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientLaunchResult {
    pub host: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
