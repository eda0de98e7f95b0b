//! Line protocol spoken by the sand plotter.
//!
//! ```text
//! m <x> <y>        move to cartesian position
//! p <r> <theta>    move to polar position
//! s <speed>        set speed
//! 0                zero the carriage
//! ```
//!
//! Every command is one newline-terminated line with integer arguments
//! and is answered by `OK`. The device may interleave `LOG ...` lines,
//! which are drained before reading the reply.

use std::io::{self, BufRead, Write};

use log::debug;

use crate::compute::EvaluationError;

/// Plotter communication failures.
#[derive(Debug, thiserror::Error)]
pub enum PlotterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Got unexpected response '{0}'")]
    UnexpectedResponse(String),
    #[error("Curve evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
}

/// Client for a plotter attached to a bidirectional byte stream (usually
/// a serial port).
pub struct SandPlotter<S> {
    stream: S,
    trace: bool,
}

impl<S: BufRead + Write> SandPlotter<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            trace: false,
        }
    }

    /// Log every line sent and received.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    pub fn move_xy(&mut self, x: i64, y: i64) -> Result<(), PlotterError> {
        self.command(&format!("m {} {}", x, y))
    }

    pub fn move_polar(&mut self, r: i64, theta: i64) -> Result<(), PlotterError> {
        self.command(&format!("p {} {}", r, theta))
    }

    pub fn set_speed(&mut self, speed: u32) -> Result<(), PlotterError> {
        self.command(&format!("s {}", speed))
    }

    pub fn zero(&mut self) -> Result<(), PlotterError> {
        self.command("0")
    }

    fn command(&mut self, line: &str) -> Result<(), PlotterError> {
        if self.trace {
            debug!("> {:?}", line);
        }
        writeln!(self.stream, "{}", line)?;
        self.stream.flush()?;
        self.read_ok()
    }

    fn read_ok(&mut self) -> Result<(), PlotterError> {
        let response = self.read_line()?;
        let response = response.trim();
        if response == "OK" {
            Ok(())
        } else {
            Err(PlotterError::UnexpectedResponse(response.to_string()))
        }
    }

    fn read_line(&mut self) -> Result<String, PlotterError> {
        loop {
            let mut line = String::new();
            if self.stream.read_line(&mut line)? == 0 {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            if let Some(message) = line.strip_prefix("LOG ") {
                debug!("plotter: {}", message.trim_end());
                continue;
            }
            if self.trace {
                debug!("< {:?}", line);
            }
            return Ok(line);
        }
    }
}
