//! External filter commands.
//!
//! A filter block is piped through `<shell> -c <command>`; stdout followed
//! by stderr replaces the block.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::ExpandError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run `command` with `input` on stdin and return its combined output.
///
/// The command runs in `work_dir` when given. A non-zero exit status is
/// logged and the output kept. Failing to start the shell, or running past
/// `timeout`, is an error; so is output left open past `timeout` by a
/// process the command started in the background.
pub(crate) fn run_filter(
    shell: &str,
    command: &str,
    input: &str,
    work_dir: Option<&Path>,
    timeout: Duration,
) -> Result<String, ExpandError> {
    let fail = |message: String| ExpandError::Filter {
        command: command.to_owned(),
        message,
    };

    tracing::debug!(command, ?work_dir, "Running filter");
    let mut cmd = Command::new(shell);
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = work_dir {
        cmd.current_dir(dir);
    }
    let mut child = cmd
        .spawn()
        .map_err(|e| fail(format!("cannot start `{shell}`: {e}")))?;

    // The writer is never joined: a background process may hold stdin open.
    let stdin = child.stdin.take();
    let input = input.to_owned();
    thread::spawn(move || {
        if let Some(mut stdin) = stdin {
            // A filter may exit without reading its input.
            let _ = stdin.write_all(input.as_bytes());
        }
    });
    let stdout = collect(child.stdout.take());
    let stderr = collect(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(fail(format!("timed out after {timeout:?}")));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(fail(e.to_string())),
        }
    };

    let mut output = drain(&stdout, deadline)
        .ok_or_else(|| fail(format!("output still open after {timeout:?}")))?;
    output.extend(
        drain(&stderr, deadline)
            .ok_or_else(|| fail(format!("output still open after {timeout:?}")))?,
    );

    if !status.success() {
        tracing::warn!(command, %status, "Filter exited with non-zero status");
    }

    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Read `pipe` to the end on its own thread and send the bytes back.
fn collect<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });
    rx
}

/// Wait for a reader until `deadline`, with one poll interval of grace.
fn drain(reader: &Receiver<Vec<u8>>, deadline: Instant) -> Option<Vec<u8>> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    reader.recv_timeout(remaining.max(POLL_INTERVAL)).ok()
}
