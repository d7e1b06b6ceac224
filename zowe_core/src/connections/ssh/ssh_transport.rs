use crate::connections::{
    errors::ZoweError,
    session::Session,
    transport::{CommandResponse, CommandTransport},
};
use async_trait::async_trait;
use log::{debug, info};
use ssh2::{ExtendedData, Session as SshSession};

use std::{
    io::Read,
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

/// Runs commands in the remote shell of an `ssh` profile.
///
/// libssh2 is blocking, so every command opens its own TCP connection on a
/// blocking worker and tears it down afterwards.
pub struct SshTransport {
    connect_timeout: Duration,
}

impl Default for SshTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl SshTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

/// Socket-level failures reach the user as the bare transport message.
fn transport_io(err: std::io::Error) -> ZoweError {
    ZoweError::Transport(err.to_string())
}

/// Connect, authenticate, exec, collect output. Runs on a blocking thread.
fn run_blocking(
    address: String,
    user: String,
    password: String,
    command: String,
    connect_timeout: Duration,
) -> Result<CommandResponse, ZoweError> {
    // ---- establish session & channel ----------------------------------
    let socket = address
        .to_socket_addrs()
        .map_err(transport_io)?
        .next()
        .ok_or_else(|| ZoweError::Transport(format!("Cannot resolve {}", address)))?;
    let tcp = TcpStream::connect_timeout(&socket, connect_timeout).map_err(transport_io)?;

    let mut session = SshSession::new()?;
    session.set_tcp_stream(tcp);
    session.handshake()?;
    session.userauth_password(&user, &password)?;
    if !session.authenticated() {
        return Err(ZoweError::Transport("SSH authentication failed".into()));
    }
    info!("SSH connection to {} established", address);

    // ---- exec & collect -----------------------------------------------
    let mut channel = session.channel_session()?;
    // stderr shares the stdout stream, so a chatty stderr cannot fill the
    // window while we wait for stdout EOF.
    channel.handle_extended_data(ExtendedData::Merge)?;
    channel.exec(&command)?;

    let mut output = String::new();
    channel.read_to_string(&mut output).map_err(transport_io)?;
    channel.wait_close()?;
    let status = channel.exit_status()?;
    debug!("'{}' exited with {} on {}", command, status, address);

    Ok(CommandResponse {
        success: status == 0,
        command_response: output.trim_end().to_string(),
    })
}

#[async_trait]
impl CommandTransport for SshTransport {
    fn profile_type_name(&self) -> &str {
        "ssh"
    }

    async fn execute(&self, session: &Session, command: &str) -> Result<CommandResponse, ZoweError> {
        let address = session.address();
        let user = session.user().to_string();
        let password = session.password().to_string();
        let command = command.to_string();
        let timeout = self.connect_timeout;

        tokio::task::spawn_blocking(move || run_blocking(address, user, password, command, timeout))
            .await
            .map_err(|e| ZoweError::Transport(format!("SSH worker failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn refused_connection_is_a_transport_error() {
        // Grab a free port, then close it so nothing is listening there.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let err = run_blocking(
            format!("127.0.0.1:{port}"),
            "ibmuser".into(),
            "sys1".into(),
            "echo hi".into(),
            Duration::from_secs(2),
        )
        .unwrap_err();

        match err {
            ZoweError::Transport(msg) => assert!(!msg.starts_with("IO error"), "{msg}"),
            other => panic!("expected a transport error, got {other:?}"),
        }
    }
}
