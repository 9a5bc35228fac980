//! In-memory register bus for tests

use crate::bus::RegisterBus;
use crate::errors::{BusError, BusResult};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCall {
    ReadWord { address: u8, register: u8 },
    WriteByte { address: u8, register: u8, value: u8 },
}

/// Register file keyed by register address, holding words in transport byte order.
/// Byte writes land in the low (first transmitted) byte of the word.
#[derive(Debug, Default)]
pub struct MockBus {
    words: HashMap<u8, u16>,
    pub calls: Vec<BusCall>,
    pub fail: bool,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word(mut self, register: u8, word: u16) -> Self {
        self.words.insert(register, word);
        self
    }

    pub fn word(&self, register: u8) -> u16 {
        self.words.get(&register).copied().unwrap_or(0)
    }

    pub fn set_word(&mut self, register: u8, word: u16) {
        self.words.insert(register, word);
    }

    pub fn writes(&self) -> Vec<BusCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, BusCall::WriteByte { .. }))
            .copied()
            .collect()
    }
}

#[async_trait]
impl RegisterBus for MockBus {
    async fn read_word(&mut self, address: u8, register: u8) -> BusResult<u16> {
        self.calls.push(BusCall::ReadWord { address, register });
        if self.fail {
            return Err(BusError::NoResponse { address, register });
        }
        Ok(self.word(register))
    }

    async fn write_byte(&mut self, address: u8, register: u8, value: u8) -> BusResult<()> {
        self.calls.push(BusCall::WriteByte { address, register, value });
        if self.fail {
            return Err(BusError::NoResponse { address, register });
        }
        let word = self.word(register);
        self.words.insert(register, (word & 0xFF00) | value as u16);
        Ok(())
    }
}
