use std::time::Duration;

use bon::Builder;
use clap::Parser;
use serialport::SerialPort;

use crate::error::OpenError;

#[cfg(unix)]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM3";

/// The test stand firmware prints at this rate.
pub const DEFAULT_BAUD: u32 = 115_200;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);

/// Print thrust readings streamed by the test stand.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Serial device the test stand is connected to
    #[arg(short, long, default_value = DEFAULT_PORT)]
    pub port: String,

    /// Baud rate of the serial link
    #[arg(short, long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// How long a single read may block, in milliseconds
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: u64,

    /// List the available serial ports and exit
    #[arg(long)]
    pub list_ports: bool,
}

impl Args {
    pub fn port_config(&self) -> PortConfig {
        PortConfig::builder()
            .path(self.port.clone())
            .baud(self.baud)
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()
    }
}

/// Settings for the serial link to the test stand.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct PortConfig {
    #[builder(into)]
    pub path: String,

    #[builder(default = DEFAULT_BAUD)]
    pub baud: u32,

    /// Upper bound on a single blocking read.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

/// Open the serial port, 8N1.
pub fn open_port(config: &PortConfig) -> Result<Box<dyn SerialPort>, OpenError> {
    serialport::new(&config.path, config.baud)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .data_bits(serialport::DataBits::Eight)
        .timeout(config.timeout)
        .open()
        .map_err(|source| OpenError {
            path: config.path.clone(),
            source,
        })
}
