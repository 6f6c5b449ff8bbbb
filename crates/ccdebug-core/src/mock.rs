//! Recording pin backend for unit tests

use std::collections::VecDeque;
use std::vec::Vec;

use crate::pins::{DebugPins, Direction, Level, Pin};

/// One call into the pin backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Configure(Pin, Direction),
    Write(Pin, Level),
    Read(Pin),
    Delay(u32),
}

/// Pin backend that records traffic and plays back scripted DD levels
#[derive(Debug, Default)]
pub struct MockPins {
    pub events: Vec<Event>,
    levels: [Level; 3],
    directions: [Direction; 3],
    /// DD level at every DC rising edge while DD was driven by the debugger
    sampled: Vec<bool>,
    /// Levels returned when DD is read as an input
    queue: VecDeque<Level>,
    stuck_high: bool,
    loopback: bool,
    rising_edges: usize,
}

impl MockPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// DD never goes low, as with nothing connected and a pull-up
    pub fn stuck_high() -> Self {
        Self {
            stuck_high: true,
            ..Self::default()
        }
    }

    /// Bits clocked out are queued back for reading
    pub fn loopback() -> Self {
        Self {
            loopback: true,
            ..Self::default()
        }
    }

    /// Queue raw bits of `bytes` for reading, MSB first
    pub fn queue_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            for bit in (0..8).rev() {
                self.queue.push_back(Level::from_bit(byte, bit));
            }
        }
    }

    /// Queue a command response: DD low (ready) for the first poll, then
    /// the response bytes
    pub fn respond(&mut self, bytes: &[u8]) {
        self.queue.push_back(Level::Low);
        self.queue_bytes(bytes);
    }

    /// Byte `index` of everything the debugger clocked out on DD
    pub fn sampled_byte(&self, index: usize) -> Option<u8> {
        let bits = self.sampled.get(index * 8..index * 8 + 8)?;
        Some(bits.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8))
    }

    /// Everything the debugger clocked out on DD
    pub fn sampled_bytes(&self) -> Vec<u8> {
        (0..self.sampled.len() / 8)
            .filter_map(|i| self.sampled_byte(i))
            .collect()
    }

    pub fn clock_rising_edges(&self) -> usize {
        self.rising_edges
    }

    /// Number of configure or write calls
    pub fn pin_activity(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Configure(..) | Event::Write(..)))
            .count()
    }

    pub fn direction(&self, pin: Pin) -> Direction {
        self.directions[pin.index()]
    }

    pub fn reset_log(&mut self) {
        self.events.clear();
        self.sampled.clear();
        self.rising_edges = 0;
    }
}

impl DebugPins for MockPins {
    fn configure_pin(&mut self, pin: Pin, direction: Direction) {
        self.events.push(Event::Configure(pin, direction));
        self.directions[pin.index()] = direction;
    }

    fn write_pin(&mut self, pin: Pin, level: Level) {
        self.events.push(Event::Write(pin, level));
        let previous = self.levels[pin.index()];
        self.levels[pin.index()] = level;

        if pin == Pin::Clock && previous == Level::Low && level == Level::High {
            self.rising_edges += 1;
            if self.directions[Pin::Data.index()] == Direction::Output {
                let bit = self.levels[Pin::Data.index()];
                self.sampled.push(bit.is_high());
                if self.loopback {
                    self.queue.push_back(bit);
                }
            }
        }
    }

    fn read_pin(&mut self, pin: Pin) -> Level {
        self.events.push(Event::Read(pin));
        if pin != Pin::Data {
            return self.levels[pin.index()];
        }
        if self.stuck_high {
            return Level::High;
        }
        if self.directions[pin.index()] == Direction::Output {
            return self.levels[pin.index()];
        }
        self.queue.pop_front().unwrap_or(Level::Low)
    }

    fn delay(&mut self, units: u32) {
        self.events.push(Event::Delay(units));
    }
}
