//! Byte links to the panel: real serial ports and an in-memory stand-in.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use serialport::SerialPort;
use tracing::{debug, trace};

use crate::{PanelSettings, Result};

/// A half-duplex byte stream to the panel.
pub trait PanelLink: Send {
    /// Writes one command line. The link appends the `\n` terminator.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Returns every byte currently buffered from the panel without blocking
    /// for more. An empty vector means nothing is pending.
    fn read_available(&mut self) -> io::Result<Vec<u8>>;
}

/// List the serial ports present on this machine.
pub fn available_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports()?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

// ==================== Serial ====================

/// Serial port link to the panel microcontroller.
pub struct SerialLink {
    port_name: String,
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Open a serial port with the given settings.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::Serial` if the port cannot be opened.
    pub fn open(port_name: &str, settings: &PanelSettings) -> Result<Self> {
        debug!(port = %port_name, baud = settings.baud_rate, "opening panel serial port");
        let port = serialport::new(port_name, settings.baud_rate)
            .timeout(settings.read_timeout)
            .open()?;
        Ok(Self {
            port_name: port_name.to_string(),
            port,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("port_name", &self.port_name)
            .finish()
    }
}

impl PanelLink for SerialLink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.port.write_all(format!("{}\n", line).as_bytes())?;
        self.port.flush()
    }

    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        let pending = self.port.bytes_to_read()? as usize;
        if pending == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; pending];
        match self.port.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                trace!(bytes = n, "read from panel");
                Ok(buf)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

// ==================== Memory ====================

#[derive(Debug, Default)]
struct MemoryState {
    written: Vec<String>,
    inbound: VecDeque<u8>,
}

/// In-memory link that records written lines and serves scripted responses.
///
/// Clones share the same buffers, so a caller can keep one handle for
/// inspection after boxing another into a [`crate::PanelSession`]. Also used
/// for dry runs without hardware.
#[derive(Debug, Clone, Default)]
pub struct MemoryLink {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue bytes as if the panel had printed them.
    pub fn push_inbound(&self, text: &str) {
        self.lock().inbound.extend(text.as_bytes());
    }

    /// Every line written so far, without terminators.
    pub fn written(&self) -> Vec<String> {
        self.lock().written.clone()
    }

    /// Returns and clears the written lines.
    pub fn take_written(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().written)
    }
}

impl PanelLink for MemoryLink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lock().written.push(line.to_string());
        Ok(())
    }

    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.lock().inbound.drain(..).collect())
    }
}
