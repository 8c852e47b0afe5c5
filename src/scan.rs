use crate::codec::{self, Value};
use crate::connection::{Error, Transport};
use crate::modbus::ResponseKind;
use crate::read_plan::{self, ReadRequest};
use crate::registers::{self, ENERGY_TOTALS, EnergyPair, RegisterIndex};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Raw words read from the device, by address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Readings(BTreeMap<u16, u16>);

impl Readings {
    pub fn get(&self, address: u16) -> Option<u16> {
        self.0.get(&address).copied()
    }

    pub fn insert(&mut self, address: u16, raw: u16) {
        self.0.insert(address, raw);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.0.iter().map(|(a, r)| (*a, *r))
    }

    /// The combined value of an energy counter, if both of its halves were read.
    pub fn energy_total(&self, pair: &EnergyPair) -> Option<f64> {
        Some(codec::combine_energy(self.get(pair.high)?, self.get(pair.low)?))
    }
}

impl FromIterator<(u16, u16)> for Readings {
    fn from_iter<I: IntoIterator<Item = (u16, u16)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Execute the read requests, skipping those the device rejects or does not answer.
///
/// Only transport failures abort the read-out.
pub async fn read<T: Transport>(
    transport: &mut T,
    requests: &[ReadRequest],
) -> Result<Readings, Error> {
    let mut readings = Readings::default();
    for request in requests {
        let Some(response) = transport.send(request.operation()).await? else {
            debug!(
                message = "no response, skipping",
                address = request.address,
                count = request.count
            );
            continue;
        };
        match response.kind {
            ResponseKind::ErrorCode(code) => {
                debug!(message = "exception, skipping", address = request.address, code);
            }
            ResponseKind::GetHoldings { values } => {
                if values.len() != usize::from(request.count) {
                    warn!(
                        message = "response has an unexpected number of registers",
                        address = request.address,
                        requested = request.count,
                        received = values.len()
                    );
                }
                for (address, raw) in request.addresses().zip(values) {
                    readings.insert(address, raw);
                }
            }
            ResponseKind::SetHolding { .. } => {
                warn!(message = "write echo in response to a read", address = request.address);
            }
        }
    }
    Ok(readings)
}

/// Read every register the device is known to answer for.
pub async fn scan<T: Transport>(transport: &mut T) -> Result<Readings, Error> {
    read(transport, &read_plan::full_scan()).await
}

/// Values undocumented registers commonly hold without meaning anything.
pub const NOISE: [u16; 5] = [0, 0x7F, 0xFF, 0x7FFF, 0xFFFF];

/// A decoded reading.
#[derive(Clone, Copy, Debug)]
pub struct Line {
    pub address: u16,
    pub register: Option<RegisterIndex>,
    pub value: Value,
}

impl Line {
    pub fn new(address: u16, raw: u16) -> Self {
        Self { address, register: registers::lookup(address), value: codec::decode(address, raw) }
    }

    pub fn name(&self) -> &'static str {
        self.register.map_or("(unknown)", |r| r.name())
    }

    pub fn summary(&self) -> &'static str {
        self.register.map_or("", |r| r.summary())
    }

    /// An undocumented register holding one of the [`NOISE`] values.
    pub fn is_noise(&self) -> bool {
        self.register.is_none() && NOISE.contains(&self.value.raw())
    }
}

/// Every reading, decoded.
pub fn lines(readings: &Readings) -> impl Iterator<Item = Line> + '_ {
    readings.iter().map(|(address, raw)| Line::new(address, raw))
}

/// Readings worth showing after a full scan.
pub fn report(readings: &Readings) -> impl Iterator<Item = Line> + '_ {
    lines(readings).filter(|line| !line.is_noise())
}

/// A 32-bit energy counter both halves of which were read.
#[derive(Clone, Copy, Debug)]
pub struct Total {
    pub pair: &'static EnergyPair,
    pub kwh: f64,
}

pub fn totals(readings: &Readings) -> impl Iterator<Item = Total> + '_ {
    ENERGY_TOTALS
        .iter()
        .filter_map(|pair| Some(Total { pair, kwh: readings.energy_total(pair)? }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modbus::Operation;
    use crate::testing::FakeDevice;

    #[tokio::test]
    async fn scan_honours_read_policy() {
        let mut device = FakeDevice::with_words([(2, 7708), (104, 35), (216, 65526)]);
        let readings = scan(&mut device).await.unwrap();
        assert_eq!(readings.get(2), Some(7708));
        assert_eq!(readings.get(104), Some(35));
        assert_eq!(readings.get(216), Some(65526));
        assert_eq!(readings.len(), 23 + 100 + 91);
        for request in &device.requests {
            let Operation::GetHoldings { address, count } = *request else { panic!() };
            assert!(count == 1 || address + count <= 200, "{request:?}");
        }
    }

    #[tokio::test]
    async fn scan_skips_failed_registers() {
        let mut device = FakeDevice::with_words([(210, 5), (211, 6), (212, 7)]);
        device.rejected.insert(211);
        device.silent.insert(212);
        device.silent.insert(5);
        let readings = scan(&mut device).await.unwrap();
        assert_eq!(readings.get(210), Some(5));
        assert_eq!(readings.get(211), None);
        assert_eq!(readings.get(212), None);
        // The whole first block went unanswered.
        assert_eq!(readings.get(0), None);
        assert_eq!(readings.get(100), Some(0));
        assert_eq!(readings.get(290), Some(0));
    }

    #[tokio::test]
    async fn scan_aborts_on_transport_failure() {
        let mut device = FakeDevice::default();
        device.disconnect_after = Some(5);
        assert!(matches!(scan(&mut device).await, Err(Error::Disconnected)));
        assert_eq!(device.requests.len(), 5);
    }

    #[test]
    fn report_hides_undocumented_noise() {
        let readings: Readings =
            [(2, 7708), (23, 0), (24, 0x7FFF), (25, 0xFF), (26, 1234), (99, 0xFFFF), (104, 0)]
                .into_iter()
                .collect();
        let shown = report(&readings).map(|l| l.address).collect::<Vec<_>>();
        assert_eq!(shown, [2, 26, 104]);
        let unknown = report(&readings).find(|l| l.address == 26).unwrap();
        assert_eq!(unknown.name(), "(unknown)");
        assert_eq!(unknown.value, Value::Plain { raw: 1234, unit: "" });
        assert_eq!(lines(&readings).count(), 7);
    }

    #[test]
    fn reserved_registers_are_always_shown() {
        let readings: Readings =
            [(22, 0), (125, 0), (126, 0x7F), (127, 0xFF), (147, 0xFFFF)].into_iter().collect();
        let shown = report(&readings).collect::<Vec<_>>();
        assert_eq!(shown.iter().map(|l| l.address).collect::<Vec<_>>(), [22, 125, 126, 127, 147]);
        assert!(shown.iter().all(|l| l.name() == "Reserved"));
    }

    #[test]
    fn totals_need_both_halves() {
        let readings: Readings = [(143, 2), (144, 50), (145, 1)].into_iter().collect();
        let totals = totals(&readings).collect::<Vec<_>>();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].pair.high, 143);
        assert_eq!(totals[0].kwh, 1311.22);
    }

    #[test]
    fn sentinel_readings_are_unavailable() {
        let line = Line::new(106, 0xFFFF);
        assert!(line.value.is_unavailable());
        assert!(!line.is_noise());
    }
}
