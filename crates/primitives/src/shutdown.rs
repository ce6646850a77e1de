use std::io;

use tokio::signal::ctrl_c;
use tracing::info;

/// Resolves when the process receives SIGINT or, on unix, SIGTERM.
pub async fn wait_for_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = ctrl_c() => res,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await
    }
}

/// Runs `fut` until it completes or a shutdown signal is received, whichever comes first.
/// `on_shutdown` is called in both cases before returning.
pub async fn run_until_shutdown<F, E>(fut: F, on_shutdown: impl FnOnce()) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: From<io::Error>,
{
    let res = tokio::select! {
        res = fut => res,
        res = wait_for_signal() => {
            info!("Received shutdown signal");
            res.map_err(E::from)
        }
    };

    on_shutdown();
    res
}
