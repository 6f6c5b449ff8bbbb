//! Linux GPIO debug pins
//!
//! This module provides the `LinuxGpioPins` struct that implements the
//! `DebugPins` trait using Linux's GPIO character device interface
//! (gpiocdev). RST and DC are plain outputs while a session is active; DD is
//! turned around between output and input as the protocol requires.

use std::time::{Duration, Instant};

use crate::error::{LinuxGpioError, Result};

use gpiocdev::line::{Offset, Value};
use gpiocdev::request::{Config, Request};

use ccdebug_core::pins::{DebugPins, Direction, Level, Pin};

/// Default calibration unit in nanoseconds
const DEFAULT_UNIT_NS: u64 = 1000;

/// Delays shorter than this spin on the monotonic clock instead of sleeping
const SPIN_LIMIT: Duration = Duration::from_micros(100);

/// Configuration for opening the debug lines
#[derive(Debug, Clone)]
pub struct LinuxGpioConfig {
    /// Device path (e.g., "/dev/gpiochip0")
    pub device: String,
    /// RST (reset) GPIO line offset
    pub rst: Offset,
    /// DC (debug clock) GPIO line offset
    pub dc: Offset,
    /// DD (debug data) GPIO line offset
    pub dd: Offset,
    /// Length of one calibration delay unit in nanoseconds
    pub unit_ns: u64,
}

impl Default for LinuxGpioConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            rst: 0,
            dc: 0,
            dd: 0,
            unit_ns: DEFAULT_UNIT_NS,
        }
    }
}

impl LinuxGpioConfig {
    /// Create a new configuration with the given device path and lines
    pub fn new(device: impl Into<String>, rst: Offset, dc: Offset, dd: Offset) -> Self {
        Self {
            device: device.into(),
            rst,
            dc,
            dd,
            ..Default::default()
        }
    }

    /// Set the calibration unit in nanoseconds
    pub fn with_unit_ns(mut self, ns: u64) -> Self {
        self.unit_ns = ns;
        self
    }

    fn offset(&self, pin: Pin) -> Offset {
        match pin {
            Pin::Reset => self.rst,
            Pin::Clock => self.dc,
            Pin::Data => self.dd,
        }
    }

    fn check_lines(&self) -> Result<()> {
        let pairs = [
            (Pin::Reset, Pin::Clock),
            (Pin::Reset, Pin::Data),
            (Pin::Clock, Pin::Data),
        ];
        for (first, second) in pairs {
            if self.offset(first) == self.offset(second) {
                return Err(LinuxGpioError::SharedLine {
                    first: first.name(),
                    second: second.name(),
                    offset: self.offset(first),
                });
            }
        }
        Ok(())
    }
}

fn to_value(level: Level) -> Value {
    match level {
        Level::High => Value::Active,
        Level::Low => Value::Inactive,
    }
}

/// CC Debug pins on a Linux GPIO chip
///
/// Line state (direction and last written level) is mirrored locally so a
/// direction change can be applied as one full reconfiguration of the
/// request. Levels written to an input are remembered and take effect when
/// the line becomes an output.
pub struct LinuxGpioPins {
    /// GPIO line request handle
    request: Request,
    /// GPIO line offsets indexed by `Pin::index`
    offsets: [Offset; 3],
    directions: [Direction; 3],
    levels: [Level; 3],
    unit: Duration,
}

impl LinuxGpioPins {
    /// Request the debug lines with the given configuration
    ///
    /// All three lines start as inputs so opening the device leaves the
    /// target alone until a session takes over.
    pub fn open(config: &LinuxGpioConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }
        config.check_lines()?;

        log::debug!("linux_gpio: Opening device {}", config.device);

        let mut offsets = [0; 3];
        let mut req_config = Config::default();
        for pin in Pin::ALL {
            offsets[pin.index()] = config.offset(pin);
            req_config.with_line(config.offset(pin)).as_input();
        }

        let request = Request::from_config(req_config)
            .on_chip(&config.device)
            .with_consumer("ccdebugger")
            .request()
            .map_err(|source| LinuxGpioError::LineRequestFailed {
                path: config.device.clone(),
                source,
            })?;

        log::info!(
            "linux_gpio: Opened {} (rst={}, dc={}, dd={}, unit={}ns)",
            config.device,
            config.rst,
            config.dc,
            config.dd,
            config.unit_ns
        );

        Ok(Self {
            request,
            offsets,
            directions: [Direction::Input; 3],
            levels: [Level::Low; 3],
            unit: Duration::from_nanos(config.unit_ns),
        })
    }

    /// Length of one calibration unit
    pub fn unit(&self) -> Duration {
        self.unit
    }

    fn reconfigure(&mut self) {
        let mut cfg = Config::default();
        for pin in Pin::ALL {
            let line = cfg.with_line(self.offsets[pin.index()]);
            match self.directions[pin.index()] {
                Direction::Output => line.as_output(to_value(self.levels[pin.index()])),
                Direction::Input => line.as_input(),
            };
        }

        if let Err(e) = self.request.reconfigure(&cfg) {
            log::error!("Failed to reconfigure GPIO lines: {}", e);
        }
    }
}

impl DebugPins for LinuxGpioPins {
    fn configure_pin(&mut self, pin: Pin, direction: Direction) {
        if self.directions[pin.index()] == direction {
            return;
        }
        self.directions[pin.index()] = direction;
        self.reconfigure();
    }

    fn write_pin(&mut self, pin: Pin, level: Level) {
        self.levels[pin.index()] = level;
        if self.directions[pin.index()] != Direction::Output {
            return;
        }
        if let Err(e) = self
            .request
            .set_value(self.offsets[pin.index()], to_value(level))
        {
            log::error!("Failed to set {}: {}", pin.name(), e);
        }
    }

    fn read_pin(&mut self, pin: Pin) -> Level {
        match self.request.value(self.offsets[pin.index()]) {
            Ok(Value::Active) => Level::High,
            Ok(Value::Inactive) => Level::Low,
            Err(e) => {
                log::error!("Failed to get {}: {}", pin.name(), e);
                Level::Low
            }
        }
    }

    fn delay(&mut self, units: u32) {
        let total = self.unit.saturating_mul(units);
        if total.is_zero() {
            return;
        }
        if total >= SPIN_LIMIT {
            std::thread::sleep(total);
            return;
        }
        let start = Instant::now();
        while start.elapsed() < total {
            std::hint::spin_loop();
        }
    }
}

/// Parse programmer options from a list of key-value pairs
///
/// # Supported Options
///
/// - `dev=/dev/gpiochipN` - GPIO chip device path (required, or use gpiochip)
/// - `gpiochip=N` - GPIO chip number (alternative to dev)
/// - `rst=N` - RST (reset) GPIO line offset (required)
/// - `dc=N` - DC (debug clock) GPIO line offset (required)
/// - `dd=N` - DD (debug data) GPIO line offset (required)
/// - `unit_ns=N` - calibration delay unit in nanoseconds (optional, default 1000)
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<LinuxGpioConfig, String> {
    let mut config = LinuxGpioConfig::default();
    let mut have_rst = false;
    let mut have_dc = false;
    let mut have_dd = false;
    let mut gpiochip: Option<u32> = None;

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "gpiochip" => {
                gpiochip = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid gpiochip value: {}", value))?,
                );
            }
            "rst" => {
                config.rst = value
                    .parse()
                    .map_err(|_| format!("Invalid rst value: {}", value))?;
                have_rst = true;
            }
            "dc" => {
                config.dc = value
                    .parse()
                    .map_err(|_| format!("Invalid dc value: {}", value))?;
                have_dc = true;
            }
            "dd" => {
                config.dd = value
                    .parse()
                    .map_err(|_| format!("Invalid dd value: {}", value))?;
                have_dd = true;
            }
            "unit_ns" => {
                let ns: u64 = value
                    .parse()
                    .map_err(|_| format!("Invalid unit_ns value: {}", value))?;
                config = config.with_unit_ns(ns);
            }
            _ => {
                log::warn!("linux_gpio: Unknown option: {}={}", key, value);
            }
        }
    }

    // Handle dev vs gpiochip
    if config.device.is_empty() {
        if let Some(n) = gpiochip {
            config.device = format!("/dev/gpiochip{}", n);
        } else {
            return Err("Either 'dev' or 'gpiochip' must be specified.\n\
                 e.g. linux_gpio:dev=/dev/gpiochip0,rst=24,dc=23,dd=22"
                .to_string());
        }
    } else if gpiochip.is_some() {
        return Err("Only one of 'dev' or 'gpiochip' can be specified".to_string());
    }

    if !have_rst {
        return Err("Missing required parameter: rst".to_string());
    }
    if !have_dc {
        return Err("Missing required parameter: dc".to_string());
    }
    if !have_dd {
        return Err("Missing required parameter: dd".to_string());
    }

    config.check_lines().map_err(|e| e.to_string())?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_dev() {
        let config = parse_options(&[
            ("dev", "/dev/gpiochip1"),
            ("rst", "24"),
            ("dc", "23"),
            ("dd", "22"),
        ])
        .unwrap();
        assert_eq!(config.device, "/dev/gpiochip1");
        assert_eq!((config.rst, config.dc, config.dd), (24, 23, 22));
        assert_eq!(config.unit_ns, DEFAULT_UNIT_NS);
    }

    #[test]
    fn test_parse_options_gpiochip_and_unit() {
        let config = parse_options(&[
            ("gpiochip", "0"),
            ("rst", "5"),
            ("dc", "6"),
            ("dd", "13"),
            ("unit_ns", "250"),
        ])
        .unwrap();
        assert_eq!(config.device, "/dev/gpiochip0");
        assert_eq!(config.unit_ns, 250);
    }

    #[test]
    fn test_parse_options_requires_device() {
        let err = parse_options(&[("rst", "1"), ("dc", "2"), ("dd", "3")]).unwrap_err();
        assert!(err.contains("dev"));
    }

    #[test]
    fn test_parse_options_rejects_dev_and_gpiochip() {
        let result = parse_options(&[
            ("dev", "/dev/gpiochip0"),
            ("gpiochip", "0"),
            ("rst", "1"),
            ("dc", "2"),
            ("dd", "3"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_options_missing_line() {
        let err = parse_options(&[("gpiochip", "0"), ("rst", "1"), ("dc", "2")]).unwrap_err();
        assert_eq!(err, "Missing required parameter: dd");
    }

    #[test]
    fn test_parse_options_invalid_number() {
        let err = parse_options(&[("gpiochip", "0"), ("rst", "x")]).unwrap_err();
        assert_eq!(err, "Invalid rst value: x");
    }

    #[test]
    fn test_parse_options_shared_line() {
        let err = parse_options(&[("gpiochip", "0"), ("rst", "4"), ("dc", "7"), ("dd", "7")])
            .unwrap_err();
        assert!(err.contains("GPIO line 7"));
    }

    #[test]
    fn test_open_without_device() {
        let config = LinuxGpioConfig::default();
        assert!(matches!(
            LinuxGpioPins::open(&config),
            Err(LinuxGpioError::NoDevice)
        ));
    }
}
