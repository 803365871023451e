// tagbridge/src/protocol/responses.rs

use crate::constants::{
    CMD_GET_FIRMWARE_VERSION, CMD_IN_DATA_EXCHANGE, CMD_IN_LIST_PASSIVE_TARGET,
    CMD_RF_CONFIGURATION, CMD_SAM_CONFIGURATION,
};
use crate::protocol::parser;
use crate::types::{CardKind, Uid};
use crate::{Error, Result};

/// One passive target reported by InListPassiveTarget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub number: u8,
    pub sens_res: [u8; 2],
    pub sel_res: u8,
    pub uid: Uid,
}

impl Target {
    pub fn kind(&self) -> CardKind {
        CardKind::from_sel_res(self.sel_res)
    }
}

/// High-level response enum, decoded from a reader -> host frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    FirmwareVersion {
        ic: u8,
        version: u8,
        revision: u8,
        support: u8,
    },
    SamConfigured,
    RfConfigured,
    /// Targets in the order the chip listed them. The bridge only supports
    /// single-card workflows; callers take the first entry (first-listed
    /// wins) when more than one card answers the poll.
    TargetList { targets: Vec<Target> },
    DataExchange { data: Vec<u8> },
}

impl Response {
    /// Decode a response payload (including the response code byte) for the
    /// given expected command code. The response code must be command + 1;
    /// a non-zero InDataExchange status byte is surfaced as `ExchangeStatus`.
    pub fn decode(expected_cmd: u8, data: &[u8]) -> Result<Self> {
        parser::ensure_len(data, 1)?;
        let expected_response = expected_cmd.wrapping_add(1);
        parser::expect_response_code(data, expected_response)?;

        match expected_cmd {
            CMD_GET_FIRMWARE_VERSION => {
                parser::ensure_len(data, 5)?;
                Ok(Self::FirmwareVersion {
                    ic: data[1],
                    version: data[2],
                    revision: data[3],
                    support: data[4],
                })
            }
            CMD_SAM_CONFIGURATION => Ok(Self::SamConfigured),
            CMD_RF_CONFIGURATION => Ok(Self::RfConfigured),
            CMD_IN_LIST_PASSIVE_TARGET => {
                let count = parser::byte_at(data, 1)? as usize;
                let mut targets = Vec::with_capacity(count);
                let mut idx = 2;
                for _ in 0..count {
                    let number = parser::byte_at(data, idx)?;
                    let sens = parser::slice_at(data, idx + 1, 2)?;
                    let sel_res = parser::byte_at(data, idx + 3)?;
                    let (uid, next) = parser::uid_at(data, idx + 4)?;
                    targets.push(Target {
                        number,
                        sens_res: [sens[0], sens[1]],
                        sel_res,
                        uid,
                    });
                    idx = next;
                }
                Ok(Self::TargetList { targets })
            }
            CMD_IN_DATA_EXCHANGE => {
                let status = parser::byte_at(data, 1)? & 0x3F;
                if status != 0 {
                    return Err(Error::ExchangeStatus { code: status });
                }
                Ok(Self::DataExchange {
                    data: data[2..].to_vec(),
                })
            }
            _ => Err(Error::UnexpectedResponse {
                expected: expected_response,
                actual: data[0],
            }),
        }
    }
}
