//! Blocks the calling thread on "socket readable OR timeout elapsed".
//!
//! The logger interleaves reading the socket with tracking the ping
//! liveness deadline; this is the primitive that lets it do both without
//! a task scheduler. Rather than a raw `poll(2)` on the file descriptor,
//! this uses the socket's own read-timeout knob — the same observable
//! contract ("did data become available before the deadline, or not")
//! with far less unsafe surface.

use std::io;
use std::net::TcpStream;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    FdReady,
    Timeout,
}

/// Wait for `socket` to have data ready, or for `timeout` to elapse.
///
/// `already_buffered` should be true when the caller's read buffer (e.g.
/// a `BufReader`) already holds unconsumed bytes from a previous read —
/// in that case there is nothing to wait for, the data is already here.
pub fn wait_for_read_or_timeout(
    socket: &TcpStream,
    already_buffered: bool,
    timeout: Duration,
) -> io::Result<ScheduleOutcome> {
    if already_buffered {
        return Ok(ScheduleOutcome::FdReady);
    }
    socket.set_read_timeout(Some(timeout))?;
    let mut probe = [0u8; 1];
    match socket.peek(&mut probe) {
        Ok(_) => Ok(ScheduleOutcome::FdReady),
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
            Ok(ScheduleOutcome::Timeout)
        }
        Err(e) => Err(e),
    }
}
