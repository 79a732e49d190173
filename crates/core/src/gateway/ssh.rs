//! Gateway that drives the game server's shell scripts over ssh.

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use super::error::GatewayError;
use super::traits::LaunchGateway;
use super::types::{parse_volume, ClientLaunchResult, LaunchOutcome, ServerStatus, MAX_VOLUME};
use crate::catalog::GameEntry;
use crate::config::{GameClientConfig, GameServerConfig};
use crate::metrics::{CLIENT_LAUNCHES_TOTAL, GAME_LAUNCHES_TOTAL, GATEWAY_COMMAND_DURATION};

/// Runs `<ssh_command> <host> <remote command>` for every operation.
pub struct SshGateway {
    server: GameServerConfig,
    clients: Vec<GameClientConfig>,
}

impl SshGateway {
    pub fn new(server: GameServerConfig, clients: Vec<GameClientConfig>) -> Self {
        Self { server, clients }
    }

    /// `<path>/launch.sh <app_id> <title_id> [extra args]`.
    ///
    /// Extra args are the common platform args, then the app's platform
    /// args, then the entry's own.
    pub fn launch_command(&self, entry: &GameEntry) -> String {
        let mut parts = vec![
            format!("{}/launch.sh", self.server.path),
            entry.app_id().to_string(),
            entry.title_id().to_string(),
        ];
        parts.extend(
            self.server
                .platform_args(entry.app_id())
                .into_iter()
                .map(str::to_string),
        );
        if !entry.extra_args().trim().is_empty() {
            parts.push(entry.extra_args().trim().to_string());
        }
        parts.join(" ")
    }

    fn script(&self, name: &str) -> String {
        format!("{}/{}", self.server.path, name)
    }

    /// Restart the client binary in the background so ssh returns at once.
    pub fn client_command(client: &GameClientConfig) -> String {
        let mut args = client.server_ip.clone();
        if !client.extra_args.trim().is_empty() {
            args.push(' ');
            args.push_str(client.extra_args.trim());
        }
        format!(
            "sudo killall {exe} 2> /dev/null; cd {path}; sudo nohup ./{exe} {args} > log.txt 2>&1 &",
            exe = client.exe,
            path = client.path,
            args = args,
        )
    }

    /// Run one remote command and collect its output.
    async fn run(
        &self,
        host: &str,
        remote: &str,
        label: &'static str,
    ) -> Result<std::process::Output, GatewayError> {
        debug!(host = %host, command = %remote, "Running remote command");
        let start = Instant::now();

        let child = Command::new(&self.server.ssh_command)
            .arg(host)
            .arg(remote)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GatewayError::ShellNotFound {
                        command: self.server.ssh_command.clone(),
                    }
                } else {
                    GatewayError::Io(e)
                }
            })?;

        let result = match timeout(
            Duration::from_secs(self.server.timeout_secs),
            child.wait_with_output(),
        )
        .await
        {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(GatewayError::Io(e)),
            // dropping the future kills the child
            Err(_) => Err(GatewayError::Timeout {
                timeout_secs: self.server.timeout_secs,
            }),
        };

        let outcome = match &result {
            Ok(output) if output.status.success() => "success",
            Ok(_) => "failed",
            Err(_) => "error",
        };
        GATEWAY_COMMAND_DURATION
            .with_label_values(&[label, outcome])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    /// Like [`run`](Self::run) but a non-zero exit is an error.
    async fn run_checked(
        &self,
        remote: &str,
        label: &'static str,
    ) -> Result<String, GatewayError> {
        let output = self.run(&self.server.host, remote, label).await?;
        if !output.status.success() {
            return Err(GatewayError::CommandFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn launch_client(&self, client: &GameClientConfig) -> ClientLaunchResult {
        let command = Self::client_command(client);
        let result = match self.run(&client.host, &command, "client").await {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(format!(
                "exit code {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => {
                CLIENT_LAUNCHES_TOTAL.with_label_values(&["success"]).inc();
                debug!(host = %client.host, "Display client started");
                ClientLaunchResult {
                    host: client.host.clone(),
                    success: true,
                    error: None,
                }
            }
            Err(error) => {
                CLIENT_LAUNCHES_TOTAL.with_label_values(&["failed"]).inc();
                warn!(host = %client.host, error = %error, "Failed to start display client");
                ClientLaunchResult {
                    host: client.host.clone(),
                    success: false,
                    error: Some(error),
                }
            }
        }
    }
}

#[async_trait]
impl LaunchGateway for SshGateway {
    fn name(&self) -> &str {
        "ssh"
    }

    async fn launch(&self, entry: &GameEntry) -> Result<LaunchOutcome, GatewayError> {
        let command = self.launch_command(entry);
        info!(id = %entry.id(), host = %self.server.host, "Launching game");

        let output = match self.run(&self.server.host, &command, "launch").await {
            Ok(output) => output,
            Err(e) => {
                GAME_LAUNCHES_TOTAL.with_label_values(&["error"]).inc();
                return Err(e);
            }
        };

        // killed by a signal reports no code
        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if exit_code == 0 {
            GAME_LAUNCHES_TOTAL.with_label_values(&["success"]).inc();
        } else {
            GAME_LAUNCHES_TOTAL.with_label_values(&["failed"]).inc();
            warn!(id = %entry.id(), exit_code, "Launch script failed");
        }

        Ok(LaunchOutcome { exit_code, stdout })
    }

    async fn stop(&self) -> Result<(), GatewayError> {
        info!(host = %self.server.host, "Stopping all games");
        self.run_checked(&self.script("stopall.sh"), "stop")
            .await
            .map(|_| ())
    }

    async fn status(&self) -> Result<ServerStatus, GatewayError> {
        let output = self.run_checked(&self.script("query.sh"), "query").await?;
        Ok(ServerStatus::parse(&output))
    }

    async fn set_volume(&self, volume: u8) -> Result<Option<u8>, GatewayError> {
        if volume > MAX_VOLUME {
            return Err(GatewayError::InvalidVolume(volume));
        }
        let command = format!("{} {}", self.script("set_volume.sh"), volume);
        let output = self.run_checked(&command, "volume").await?;
        debug!(requested = volume, reported = %output.trim(), "Volume set");
        Ok(parse_volume(&output))
    }

    async fn launch_clients(&self) -> Vec<ClientLaunchResult> {
        join_all(self.clients.iter().map(|c| self.launch_client(c))).await
    }
}
