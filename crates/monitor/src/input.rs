//! Keyboard input for the dashboard.
//!
//! Lines are read on a dedicated OS thread and forwarded over an unbounded
//! channel. A blocking read cannot be cancelled, so it must not live on the
//! tokio blocking pool: the runtime would wait for it on shutdown and the
//! process would hang until the next line or EOF. A detached thread ends
//! with the process instead.

use std::io::BufRead;

use tokio::sync::mpsc;

/// Forward every line of `reader` to the returned receiver.
///
/// The channel closes at EOF, on a read error (logged), or when the
/// receiver is dropped and the next line arrives.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    let spawned = std::thread::Builder::new()
        .name("rulwatch-stdin".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Stdin read failed, manual refresh disabled");
                        break;
                    }
                }
            }
        });

    if let Err(e) = spawned {
        // The sender was moved into the failed closure and dropped, so the
        // receiver reports a closed channel right away.
        tracing::warn!(error = %e, "Failed to start stdin reader, manual refresh disabled");
    }

    rx
}
