use tokio_util::bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

/// Largest register count we ask for in one read.
pub const MAX_SAFE_READ_COUNT: u16 = 123;

const READ_HOLDINGS: u8 = 0x03;
const WRITE_HOLDING: u8 = 0x06;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub device_id: u8,
    pub transaction_id: u16,
    pub operation: Operation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetHoldings { address: u16, count: u16 },
    SetHolding { address: u16, value: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub device_id: u8,
    pub transaction_id: u16,
    pub kind: ResponseKind,
}

impl Response {
    pub fn exception_code(&self) -> Option<u8> {
        match &self.kind {
            ResponseKind::ErrorCode(c) => Some(*c),
            ResponseKind::GetHoldings { values: _ } => None,
            ResponseKind::SetHolding { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    ErrorCode(u8),
    GetHoldings { values: Vec<u16> },
    SetHolding { address: u16, value: u16 },
}

/// Modbus TCP (MBAP) framing of the two functions the heat pump controller needs.
///
/// Register addresses go on the wire as-is: the controller documents its registers 0-based.
pub struct ModbusTCPCodec {}

impl Encoder<Request> for ModbusTCPCodec {
    type Error = std::io::Error;
    fn encode(&mut self, req: Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        // Unit id, function code and two words follow the length field.
        const PDU_LENGTH: u16 = 6;
        dst.extend(req.transaction_id.to_be_bytes());
        dst.extend([0, 0]);
        dst.extend(PDU_LENGTH.to_be_bytes());
        match req.operation {
            Operation::GetHoldings { address, count } => {
                dst.extend([req.device_id, READ_HOLDINGS]);
                dst.extend(address.to_be_bytes());
                dst.extend(count.to_be_bytes());
            }
            Operation::SetHolding { address, value } => {
                dst.extend([req.device_id, WRITE_HOLDING]);
                dst.extend(address.to_be_bytes());
                dst.extend(value.to_be_bytes());
            }
        };
        trace!(message = "sending encoded", buffer = ?dst);
        Ok(())
    }
}

impl Decoder for ModbusTCPCodec {
    type Item = Response;
    type Error = std::io::Error;
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            trace!(message = "attempt at decoding", buffer = ?src);
            if src.len() < 8 {
                return Ok(None);
            }
            let Some((tr_id_buffer, remainder)) = src.split_first_chunk::<2>() else {
                return Ok(None);
            };
            let transaction_id = u16::from_be_bytes(*tr_id_buffer);
            let Some((proto_buffer, remainder)) = remainder.split_first_chunk::<2>() else {
                return Ok(None);
            };
            if u16::from_be_bytes(*proto_buffer) != 0 {
                // Not a frame boundary; resynchronise.
                src.advance(1);
                continue;
            }
            let Some((length_buffer, remainder)) = remainder.split_first_chunk::<2>() else {
                return Ok(None);
            };
            let required_length = u16::from_be_bytes(*length_buffer);
            let Some((data, _)) = remainder.split_at_checked(required_length.into()) else {
                return Ok(None);
            };
            let frame_length = usize::from(required_length) + 6;
            let [device_id, function_code, code, ..] = *data else {
                src.advance(1);
                continue;
            };
            let kind = if function_code & 0x80 != 0 {
                ResponseKind::ErrorCode(code)
            } else {
                match (function_code, &data[2..]) {
                    (READ_HOLDINGS, [_byte_count, values @ ..]) if values.len() % 2 == 0 => {
                        let values = values
                            .chunks_exact(2)
                            .map(|w| u16::from_be_bytes([w[0], w[1]]))
                            .collect();
                        ResponseKind::GetHoldings { values }
                    }
                    (WRITE_HOLDING, &[a0, a1, v0, v1]) => ResponseKind::SetHolding {
                        address: u16::from_be_bytes([a0, a1]),
                        value: u16::from_be_bytes([v0, v1]),
                    },
                    _ => {
                        trace!(message = "skipping an unrecognised frame", function_code);
                        src.advance(frame_length);
                        continue;
                    }
                }
            };
            src.advance(frame_length);
            return Ok(Some(Response { device_id, transaction_id, kind }));
        }
    }
}
