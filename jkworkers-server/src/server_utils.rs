//! Process signals that stop the supervisor.

use std::fmt;
use std::io;
use tokio::signal;

/// Which signal asked the daemon to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("Ctrl+C"),
            Self::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Wait for Ctrl+C or, on unix, SIGTERM.
///
/// Fails only if a handler cannot be installed.
pub async fn stop_signal() -> io::Result<StopSignal> {
    #[cfg(unix)]
    let terminated = {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        async move {
            terminate.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminated = std::future::pending::<()>();

    tokio::select! {
        res = signal::ctrl_c() => res.map(|()| StopSignal::Interrupt),
        () = terminated => Ok(StopSignal::Terminate),
    }
}
