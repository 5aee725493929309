//! IRC channel logger: maintains a TLS connection to a single IRC server,
//! joins a single channel, and spools every channel message to disk as
//! one file per message.

pub mod cli;
pub mod clock;
pub mod error;
pub mod scheduler;
pub mod spool_writer;
pub mod state_machine;
pub mod tls;

use std::io::{BufRead, BufReader, Write};
use std::time::Duration;

use clock::Clock;
use error::{LoggerError, Result};
use scheduler::ScheduleOutcome;
use state_machine::{Action, LoggerState, PingState};

pub use cli::Cli;

const MAX_LINE_BYTES: usize = 65534;

pub fn run(cli: &Cli) -> Result<()> {
    if !cli.dir.is_dir() {
        return Err(LoggerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("--dir {} is not a directory", cli.dir.display()),
        )));
    }

    let mut spool = spool_writer::SpoolWriter::recover(cli.dir.clone())?;
    let clock = clock::SystemClock;

    let conn = tls::IrcConnection::connect(&cli.server)?;
    let socket = conn.raw_socket().try_clone()?;
    let mut reader = BufReader::new(conn.tls);

    let mut sm = LoggerState::new(cli.user.clone(), cli.channel.clone(), cli.password.clone(), clock.now());
    for action in sm.initial_handshake() {
        send(reader.get_mut(), action)?;
    }

    loop {
        let now = clock.now();
        let deadline = match sm.ping_state() {
            PingState::Normal { silence_deadline } => silence_deadline,
            PingState::Sent { giveup_deadline } => giveup_deadline,
        };
        let timeout = Duration::from_secs(deadline.saturating_sub(now).max(1));
        let already_buffered = !reader.buffer().is_empty();

        match scheduler::wait_for_read_or_timeout(&socket, already_buffered, timeout)? {
            ScheduleOutcome::Timeout => {
                let now = clock.now();
                for action in sm.on_timeout(now)? {
                    send(reader.get_mut(), action)?;
                }
            }
            ScheduleOutcome::FdReady => {
                let mut line = String::new();
                let n = reader.read_line(&mut line)?;
                if n == 0 {
                    return Err(LoggerError::Io(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "server closed the connection",
                    )));
                }
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                if line.len() >= MAX_LINE_BYTES {
                    return Err(LoggerError::MsgTooBig(line.len()));
                }

                let now = clock.now();
                sm.on_read(now);

                let msg = irc_proto::parse_line(&line)?;
                for action in sm.on_message(&msg, &line, now)? {
                    match action {
                        Action::Send(line) => send(reader.get_mut(), Action::Send(line))?,
                        Action::Spool {
                            timestamp,
                            sender,
                            body,
                        } => {
                            spool.write(timestamp, &sender, &body)?;
                        }
                    }
                }
            }
        }
    }
}

fn send<W: Write>(w: &mut W, action: Action) -> Result<()> {
    if let Action::Send(line) = action {
        tracing::debug!(%line, "send");
        w.write_all(line.as_bytes())?;
        w.write_all(b"\r\n")?;
        w.flush()?;
    }
    Ok(())
}
