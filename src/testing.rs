//! An in-memory stand-in for the heat pump controller.

use crate::connection::{Error, Transport};
use crate::modbus::{Operation, Response, ResponseKind};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Default)]
pub struct FakeDevice {
    pub words: BTreeMap<u16, u16>,
    /// Reads touching these addresses are answered with exception code 2.
    pub rejected: BTreeSet<u16>,
    /// Requests touching these addresses are never answered.
    pub silent: BTreeSet<u16>,
    /// Writes are answered with this exception code.
    pub write_exception: Option<u8>,
    /// Write echoes carry this value instead of the written one.
    pub write_echo: Option<u16>,
    /// The connection breaks when this many requests have been served.
    pub disconnect_after: Option<usize>,
    pub requests: Vec<Operation>,
}

impl FakeDevice {
    pub fn with_words(words: impl IntoIterator<Item = (u16, u16)>) -> Self {
        Self { words: words.into_iter().collect(), ..Self::default() }
    }

    pub fn writes(&self) -> Vec<(u16, u16)> {
        self.requests
            .iter()
            .filter_map(|op| match *op {
                Operation::SetHolding { address, value } => Some((address, value)),
                Operation::GetHoldings { .. } => None,
            })
            .collect()
    }

    fn respond(&mut self, operation: Operation) -> Option<ResponseKind> {
        match operation {
            Operation::GetHoldings { address, count } => {
                let addresses = address..address + count;
                if addresses.clone().any(|a| self.silent.contains(&a)) {
                    return None;
                }
                let touches_single_only = addresses.clone().any(|a| (200..=290).contains(&a));
                if (count > 1 && touches_single_only)
                    || addresses.clone().any(|a| self.rejected.contains(&a))
                {
                    return Some(ResponseKind::ErrorCode(2));
                }
                let values = addresses.map(|a| self.words.get(&a).copied().unwrap_or(0)).collect();
                Some(ResponseKind::GetHoldings { values })
            }
            Operation::SetHolding { address, value } => {
                if self.silent.contains(&address) {
                    return None;
                }
                if let Some(code) = self.write_exception {
                    return Some(ResponseKind::ErrorCode(code));
                }
                self.words.insert(address, value);
                let value = self.write_echo.unwrap_or(value);
                Some(ResponseKind::SetHolding { address, value })
            }
        }
    }
}

impl Transport for FakeDevice {
    async fn send(&mut self, operation: Operation) -> Result<Option<Response>, Error> {
        if self.disconnect_after.is_some_and(|n| self.requests.len() >= n) {
            return Err(Error::Disconnected);
        }
        self.requests.push(operation);
        let transaction_id = self.requests.len() as u16;
        Ok(self.respond(operation).map(|kind| Response { device_id: 1, transaction_id, kind }))
    }
}
