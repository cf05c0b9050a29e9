use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use super::error::ProbeError;
use super::types::{SmtpReply, Stage};

/// Point in time after which no socket operation is started.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline(Instant);

impl Deadline {
    pub(crate) fn after(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    pub(crate) fn remaining(&self, stage: Stage) -> Result<Duration, ProbeError> {
        let left = self.0.saturating_duration_since(Instant::now());
        if left.is_zero() {
            Err(ProbeError::Deadline { stage })
        } else {
            Ok(left)
        }
    }
}

/// One SMTP connection. `QUIT` is sent by [`SmtpSession::close`] or, failing
/// that, when the session is dropped.
pub(crate) struct SmtpSession {
    host: String,
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    deadline: Deadline,
    transcript: Vec<String>,
    closed: bool,
}

impl SmtpSession {
    pub(crate) fn connect(
        host: &str,
        addrs: &[SocketAddr],
        deadline: Deadline,
    ) -> Result<Self, ProbeError> {
        let mut last_err = None;
        for addr in addrs {
            let budget = deadline.remaining(Stage::Connect)?;
            match TcpStream::connect_timeout(addr, budget) {
                Ok(stream) => {
                    let reader = BufReader::new(
                        stream
                            .try_clone()
                            .map_err(|err| ProbeError::io(Stage::Connect, err))?,
                    );
                    tracing::debug!(host, %addr, "SMTP connection established");
                    return Ok(Self {
                        host: host.to_string(),
                        stream,
                        reader,
                        deadline,
                        transcript: Vec::new(),
                        closed: false,
                    });
                }
                Err(err) => {
                    tracing::debug!(host, %addr, error = %err, "SMTP connect attempt failed");
                    last_err = Some(ProbeError::Connect {
                        addr: addr.to_string(),
                        source: err,
                    });
                }
            }
        }
        Err(last_err.unwrap_or_else(|| ProbeError::NoAddress {
            host: host.to_string(),
        }))
    }

    /// Sends `command` and waits for the full reply.
    pub(crate) fn command(&mut self, command: &str, stage: Stage) -> Result<SmtpReply, ProbeError> {
        self.record("C", command);
        let budget = self.deadline.remaining(stage)?;
        self.stream
            .set_write_timeout(Some(budget))
            .map_err(|err| ProbeError::io(stage, err))?;
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.stream
            .write_all(&line)
            .and_then(|()| self.stream.flush())
            .map_err(|err| ProbeError::io(stage, err))?;
        self.read_reply(stage)
    }

    pub(crate) fn read_reply(&mut self, stage: Stage) -> Result<SmtpReply, ProbeError> {
        let mut code = None;
        let mut message_lines = Vec::new();
        loop {
            let budget = self.deadline.remaining(stage)?;
            self.stream
                .set_read_timeout(Some(budget))
                .map_err(|err| ProbeError::io(stage, err))?;

            let mut raw = String::new();
            let bytes = self
                .reader
                .read_line(&mut raw)
                .map_err(|err| ProbeError::io(stage, err))?;
            if bytes == 0 {
                return Err(ProbeError::io(
                    stage,
                    io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed while reading reply",
                    ),
                ));
            }
            if raw.ends_with('\n') {
                raw.pop();
                if raw.ends_with('\r') {
                    raw.pop();
                }
            }

            let parsed_code = raw
                .get(..3)
                .and_then(|part| part.parse::<u16>().ok())
                .ok_or_else(|| ProbeError::protocol(stage, format!("invalid SMTP reply: '{raw}'")))?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(ProbeError::protocol(
                        stage,
                        format!("inconsistent SMTP reply codes: {existing} vs {parsed_code}"),
                    ));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }

            let continuation = raw.as_bytes().get(3).copied() == Some(b'-');
            message_lines.push(raw.get(4..).unwrap_or_default().to_string());
            if !continuation {
                break;
            }
        }

        let reply = SmtpReply {
            code: code.ok_or_else(|| ProbeError::protocol(stage, "SMTP reply missing status code"))?,
            message: message_lines.join("\n"),
        };
        self.record_reply(&reply);
        Ok(reply)
    }

    /// Sends `QUIT` once. Errors are reported to the caller, who is free to ignore them.
    pub(crate) fn close(&mut self) -> Result<(), ProbeError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.command("QUIT", Stage::Quit).map(|_| ())
    }

    pub(crate) fn take_transcript(&mut self) -> Vec<String> {
        std::mem::take(&mut self.transcript)
    }

    fn record(&mut self, direction: &str, message: &str) {
        self.transcript
            .push(format!("[{}] {direction}: {message}", self.host));
    }

    fn record_reply(&mut self, reply: &SmtpReply) {
        if reply.message.is_empty() {
            self.record("S", &reply.code.to_string());
        } else {
            let lines: Vec<String> = reply
                .message
                .lines()
                .map(|line| format!("{} {line}", reply.code))
                .collect();
            for line in lines {
                self.record("S", &line);
            }
        }
    }
}

impl Drop for SmtpSession {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::debug!(host = %self.host, error = %err, "QUIT on drop failed");
        }
    }
}
