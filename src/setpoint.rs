//! Writing holding registers, including one byte of a packed register.
//!
//! Packed registers hold two independent settings, so changing one of them requires knowing the
//! current value of the other:
//!
//! ```ignore
//! let snapshot = Snapshot::read(transport, address).await?;
//! setpoint::write(transport, address, snapshot.replace(Byte::Low, 35)).await?;
//! ```
//!
//! A [`Snapshot`] can only be obtained by a successful read, so a failed read can never turn
//! into a write that clobbers the other byte.

use crate::codec::{self, Byte};
use crate::connection::{self, Transport};
use crate::modbus::{Operation, ResponseKind};
use tracing::{debug, info};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("communicating with the device failed")]
    Transport(#[from] connection::Error),
    #[error("device rejected the read of register {0} with exception code {1}")]
    ReadException(u16, u8),
    #[error("reading register {0} timed out")]
    ReadTimedOut(u16),
    #[error("device rejected the write of register {0} with exception code {1}")]
    WriteException(u16, u8),
    #[error("writing register {0} timed out")]
    WriteTimedOut(u16),
    #[error("device acknowledged {2} instead of {1} for register {0}")]
    EchoMismatch(u16, u16, u16),
    #[error("device responded to a request for register {0} with an unrelated response")]
    UnexpectedResponse(u16),
}

/// The value of a register as just read from the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    address: u16,
    raw: u16,
}

impl Snapshot {
    pub async fn read<T: Transport>(transport: &mut T, address: u16) -> Result<Self, Error> {
        let operation = Operation::GetHoldings { address, count: 1 };
        let Some(response) = transport.send(operation).await? else {
            return Err(Error::ReadTimedOut(address));
        };
        match response.kind {
            ResponseKind::ErrorCode(code) => Err(Error::ReadException(address, code)),
            ResponseKind::GetHoldings { values } => match values[..] {
                [raw] => {
                    debug!(message = "read current value", address, raw);
                    Ok(Self { address, raw })
                }
                _ => Err(Error::UnexpectedResponse(address)),
            },
            ResponseKind::SetHolding { .. } => Err(Error::UnexpectedResponse(address)),
        }
    }

    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// The word with `byte` replaced by `target` and the other byte kept as read.
    pub fn replace(&self, byte: Byte, target: u8) -> u16 {
        let (low, high) = codec::split_pair(self.raw);
        debug!(message = "replacing byte", address = self.address, %byte, target);
        match byte {
            Byte::Low => codec::compose_pair(target, high),
            Byte::High => codec::compose_pair(low, target),
        }
    }
}

/// Write `raw` to `address` and check that the device echoes it back.
pub async fn write<T: Transport>(transport: &mut T, address: u16, raw: u16) -> Result<(), Error> {
    let operation = Operation::SetHolding { address, value: raw };
    let Some(response) = transport.send(operation).await? else {
        return Err(Error::WriteTimedOut(address));
    };
    match response.kind {
        ResponseKind::ErrorCode(code) => Err(Error::WriteException(address, code)),
        ResponseKind::SetHolding { address: echoed, value } if echoed == address => {
            if value != raw {
                return Err(Error::EchoMismatch(address, raw, value));
            }
            info!(message = "register written", address, raw);
            Ok(())
        }
        _ => Err(Error::UnexpectedResponse(address)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDevice;

    async fn set_byte(device: &mut FakeDevice, byte: Byte, target: u8) -> Result<(), Error> {
        let snapshot = Snapshot::read(device, 2).await?;
        write(device, 2, snapshot.replace(byte, target)).await
    }

    #[test]
    fn replace_keeps_sibling_byte() {
        let snapshot = Snapshot { address: 2, raw: 7708 };
        assert_eq!(snapshot.replace(Byte::Low, 35), 0x1E23);
        assert_eq!(snapshot.replace(Byte::High, 25), 0x191C);
        for raw in [0, 0x00FF, 0xFF00, 0xFFFF, 0x1234] {
            let snapshot = Snapshot { address: 2, raw };
            for target in [0, 1, 127, 255] {
                assert_eq!(snapshot.replace(Byte::Low, target) >> 8, raw >> 8);
                assert_eq!(snapshot.replace(Byte::Low, target) & 0xFF, u16::from(target));
                assert_eq!(snapshot.replace(Byte::High, target) & 0xFF, raw & 0xFF);
                assert_eq!(snapshot.replace(Byte::High, target) >> 8, u16::from(target));
            }
        }
    }

    #[tokio::test]
    async fn writes_low_byte_preserving_high() {
        let mut device = FakeDevice::with_words([(2, 7708)]);
        set_byte(&mut device, Byte::Low, 35).await.unwrap();
        assert_eq!(device.writes(), [(2, 0x1E23)]);
        assert_eq!(device.words[&2], 0x1E23);
        assert_eq!(
            device.requests[0],
            Operation::GetHoldings { address: 2, count: 1 },
            "the current value must be read first"
        );
    }

    #[tokio::test]
    async fn failed_read_prevents_write() {
        let mut device = FakeDevice::with_words([(2, 7708)]);
        device.rejected.insert(2);
        let result = set_byte(&mut device, Byte::High, 25).await;
        assert!(matches!(result, Err(Error::ReadException(2, 2))));
        assert!(device.writes().is_empty());

        device.rejected.clear();
        device.silent.insert(2);
        let result = set_byte(&mut device, Byte::High, 25).await;
        assert!(matches!(result, Err(Error::ReadTimedOut(2))));
        assert!(device.writes().is_empty());

        device.silent.clear();
        device.disconnect_after = Some(device.requests.len());
        let result = set_byte(&mut device, Byte::High, 25).await;
        assert!(matches!(result, Err(Error::Transport(connection::Error::Disconnected))));
        assert!(device.writes().is_empty());
        assert_eq!(device.words[&2], 7708);
    }

    #[tokio::test]
    async fn write_reports_device_refusal() {
        let mut device = FakeDevice::default();
        device.write_exception = Some(4);
        let result = write(&mut device, 4, 50).await;
        assert!(matches!(result, Err(Error::WriteException(4, 4))));
    }

    #[tokio::test]
    async fn write_checks_echo() {
        let mut device = FakeDevice::default();
        device.write_echo = Some(49);
        let result = write(&mut device, 4, 50).await;
        assert!(matches!(result, Err(Error::EchoMismatch(4, 50, 49))));
    }

    #[tokio::test]
    async fn write_times_out() {
        let mut device = FakeDevice::default();
        device.silent.insert(4);
        assert!(matches!(write(&mut device, 4, 50).await, Err(Error::WriteTimedOut(4))));
    }
}
