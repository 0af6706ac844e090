//! Transport seam between the channel logic and the hardware
//!
//! The channel state machine is written against the [`Transport`] trait
//! so the driver can run against a real serial port, a no-hardware
//! simulation, or a scripted mock in tests.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use serialport::SerialPort;

/// Byte-stream transport carrying newline-terminated lines
pub trait Transport: Send {
    /// Open or re-open the underlying device
    fn open(&mut self) -> io::Result<()>;

    /// Write one command line; the newline terminator is appended here
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Read one response line, stripped of its terminator
    ///
    /// Returns `Ok(None)` when no complete line arrives within `timeout`.
    fn read_line(&mut self, timeout: Duration) -> io::Result<Option<String>>;

    /// Discard any buffered input
    fn discard_input(&mut self) -> io::Result<()>;

    /// True for transports that fake the hardware
    fn is_simulated(&self) -> bool {
        false
    }
}

/// Real serial-port transport
pub struct SerialTransport {
    path: String,
    baud: u32,
    port: Option<Box<dyn SerialPort>>,
    buffer: Vec<u8>,
}

impl SerialTransport {
    /// Create a transport for a serial device; the port opens on
    /// [`Transport::open`], not here
    pub fn new(path: &str, baud: u32) -> Self {
        Self {
            path: path.to_owned(),
            baud,
            port: None,
            buffer: Vec::new(),
        }
    }

    fn port(&mut self) -> io::Result<&mut Box<dyn SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port not open"))
    }
}

impl Transport for SerialTransport {
    fn open(&mut self) -> io::Result<()> {
        self.port = None;
        self.buffer.clear();
        let port = serialport::new(&self.path, self.baud)
            .timeout(Duration::from_millis(100))
            .open()
            .map_err(io::Error::from)?;
        self.port = Some(port);
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let port = self.port()?;
        port.write_all(line.as_bytes())?;
        port.write_all(b"\n")?;
        port.flush()
    }

    fn read_line(&mut self, timeout: Duration) -> io::Result<Option<String>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&raw).trim_end().to_owned();
                return Ok(Some(line));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let remaining = deadline - now;
            let port = self.port()?;
            port.set_timeout(remaining).map_err(io::Error::from)?;

            let mut chunk = [0u8; 128];
            match port.read(&mut chunk) {
                Ok(0) => return Ok(None),
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(None),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                Err(e) => return Err(e),
            }
        }
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.buffer.clear();
        let port = self.port()?;
        port.clear(serialport::ClearBuffer::Input)
            .map_err(io::Error::from)
    }
}

/// No-hardware transport for UI testing
///
/// Accepts every line and answers it the way an idle controller would,
/// after a fixed artificial delay.
pub struct SimulatedTransport {
    delay: Duration,
    responses: VecDeque<String>,
}

impl SimulatedTransport {
    /// Create a simulated transport with the given per-line delay
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            responses: VecDeque::new(),
        }
    }
}

impl Transport for SimulatedTransport {
    fn open(&mut self) -> io::Result<()> {
        self.responses.clear();
        self.responses.push_back("Grbl 1.1h ['$' for help]".to_owned());
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        std::thread::sleep(self.delay);
        let reply = if line == caissa_protocol::CMD_STATUS_QUERY {
            "<Idle|MPos:0.000,0.000,0.000|FS:0,0>".to_owned()
        } else {
            "ok".to_owned()
        };
        self.responses.push_back(reply);
        Ok(())
    }

    fn read_line(&mut self, _timeout: Duration) -> io::Result<Option<String>> {
        Ok(self.responses.pop_front())
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.responses.clear();
        Ok(())
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
