//! Which addresses may be fetched together.
//!
//! The controller answers multi-register reads in the `0..=22` and `100..=199` blocks, but
//! rejects any multi-register read touching `200..=290` with exception code 2. Registers there
//! have to be fetched one request per address.

use crate::modbus::{MAX_SAFE_READ_COUNT, Operation};
use crate::registers::ADDRESSES;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum Strategy {
    Bulk,
    Individual,
}

#[derive(Clone, Copy, Debug)]
pub struct Zone {
    pub first: u16,
    pub last: u16,
    pub strategy: Strategy,
}

impl Zone {
    pub const fn contains(&self, address: u16) -> bool {
        self.first <= address && address <= self.last
    }

    pub fn addresses(&self) -> RangeInclusive<u16> {
        self.first..=self.last
    }
}

pub static ZONES: [Zone; 3] = [
    Zone { first: 0, last: 22, strategy: Strategy::Bulk },
    Zone { first: 100, last: 199, strategy: Strategy::Bulk },
    Zone { first: 200, last: 290, strategy: Strategy::Individual },
];

const fn zone_of(address: u16) -> Option<usize> {
    let mut idx = 0;
    while idx < ZONES.len() {
        if ZONES[idx].contains(address) {
            return Some(idx);
        }
        idx += 1;
    }
    None
}

const _ASSERT_ALL_REGISTERS_COVERED: () = const {
    let mut idx = 0;
    while idx < ADDRESSES.len() {
        if zone_of(ADDRESSES[idx]).is_none() {
            panic!("a catalog register lies outside of every read zone");
        }
        idx += 1;
    }
    let mut idx = 0;
    while idx < ZONES.len() {
        let zone = ZONES[idx];
        assert!(zone.first <= zone.last);
        if idx > 0 {
            assert!(ZONES[idx - 1].last < zone.first, "zones must be sorted and disjoint");
        }
        idx += 1;
    }
};

/// How `address` has to be read. Addresses outside of every zone are read individually.
pub fn strategy_for(address: u16) -> Strategy {
    match zone_of(address) {
        Some(zone) => ZONES[zone].strategy,
        None => Strategy::Individual,
    }
}

/// One read request: `count` consecutive registers starting at `address`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadRequest {
    pub address: u16,
    pub count: u16,
}

impl ReadRequest {
    pub fn addresses(&self) -> RangeInclusive<u16> {
        self.address..=self.address + (self.count - 1)
    }

    pub fn operation(&self) -> Operation {
        Operation::GetHoldings { address: self.address, count: self.count }
    }
}

/// Requests that read exactly the given addresses, each of them once.
///
/// Consecutive addresses within one bulk zone are merged into a single request of at most
/// [`MAX_SAFE_READ_COUNT`] registers. Everything else becomes a single-register request.
pub fn plan(addresses: impl IntoIterator<Item = u16>) -> Vec<ReadRequest> {
    let addresses = addresses.into_iter().collect::<BTreeSet<u16>>();
    let mut result: Vec<ReadRequest> = Vec::new();
    for address in addresses {
        let bulk_zone = zone_of(address).filter(|z| ZONES[*z].strategy == Strategy::Bulk);
        if let (Some(zone), Some(last)) = (bulk_zone, result.last_mut()) {
            let extends = last.address + last.count == address
                && last.count < MAX_SAFE_READ_COUNT
                && zone_of(last.address) == Some(zone);
            if extends {
                last.count += 1;
                continue;
            }
        }
        result.push(ReadRequest { address, count: 1 });
    }
    result
}

/// Requests covering every address of every zone.
pub fn full_scan() -> Vec<ReadRequest> {
    plan(ZONES.iter().flat_map(Zone::addresses))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDIVIDUAL: RangeInclusive<u16> = 200..=290;

    #[test]
    fn strategies() {
        assert_eq!(strategy_for(0), Strategy::Bulk);
        assert_eq!(strategy_for(22), Strategy::Bulk);
        assert_eq!(strategy_for(150), Strategy::Bulk);
        assert_eq!(strategy_for(200), Strategy::Individual);
        assert_eq!(strategy_for(290), Strategy::Individual);
        assert_eq!(strategy_for(50), Strategy::Individual);
        assert_eq!(strategy_for(1000), Strategy::Individual);
    }

    #[test]
    fn full_scan_layout() {
        let requests = full_scan();
        assert_eq!(requests[0], ReadRequest { address: 0, count: 23 });
        assert_eq!(requests[1], ReadRequest { address: 100, count: 100 });
        assert_eq!(requests.len(), 2 + INDIVIDUAL.len());
        for (request, address) in requests[2..].iter().zip(INDIVIDUAL) {
            assert_eq!(*request, ReadRequest { address, count: 1 });
        }
    }

    #[test]
    fn bulk_reads_never_touch_individual_zone() {
        for first in 0..=300u16 {
            for last in first..=300 {
                let requests = plan(first..=last);
                let mut covered = Vec::new();
                for request in &requests {
                    assert!(request.count >= 1 && request.count <= MAX_SAFE_READ_COUNT);
                    if request.count > 1 {
                        assert!(
                            !request.addresses().any(|a| INDIVIDUAL.contains(&a)),
                            "{request:?} planned for {first}..={last}"
                        );
                    }
                    covered.extend(request.addresses());
                }
                assert!(covered.iter().copied().eq(first..=last), "{first}..={last}");
            }
        }
    }

    #[test]
    fn bulk_runs_stop_at_zone_edges() {
        assert_eq!(
            plan(20..=24),
            [
                ReadRequest { address: 20, count: 3 },
                ReadRequest { address: 23, count: 1 },
                ReadRequest { address: 24, count: 1 },
            ]
        );
        assert_eq!(
            plan([198, 199, 200, 201]),
            [
                ReadRequest { address: 198, count: 2 },
                ReadRequest { address: 200, count: 1 },
                ReadRequest { address: 201, count: 1 },
            ]
        );
    }

    #[test]
    fn gaps_split_requests() {
        assert_eq!(
            plan([3, 1, 2, 7, 3]),
            [ReadRequest { address: 1, count: 3 }, ReadRequest { address: 7, count: 1 }]
        );
    }
}
