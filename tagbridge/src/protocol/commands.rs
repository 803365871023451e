// tagbridge/src/protocol/commands.rs

use crate::constants::{
    BAUD_106_TYPE_A, CMD_GET_FIRMWARE_VERSION, CMD_IN_DATA_EXCHANGE, CMD_IN_LIST_PASSIVE_TARGET,
    CMD_RF_CONFIGURATION, CMD_SAM_CONFIGURATION, MIFARE_CMD_READ, RF_CFG_MAX_RETRIES,
};

/// High-level command enum for the PN532 host protocol. Payload encoding is
/// command code + parameters; the direction byte is added by the frame layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Query chip/firmware identification bytes.
    GetFirmwareVersion,
    /// Configure the secure access module. Normal mode disables the SAM and
    /// is the only mode this bridge uses.
    SamConfiguration { mode: u8, timeout: u8, use_irq: bool },
    /// Program one RFConfiguration item.
    RfConfiguration { item: u8, data: Vec<u8> },
    /// Scan for passive targets at the given baud/modulation.
    InListPassiveTarget { max_targets: u8, baud_modulation: u8 },
    /// Relay an ISO14443-A exchange to an activated target.
    InDataExchange { target: u8, data: Vec<u8> },
}

impl Command {
    /// SAMConfiguration in normal mode with the timeout byte the chip
    /// documentation recommends for host-serial use.
    pub fn sam_normal() -> Self {
        Self::SamConfiguration {
            mode: 0x01,
            timeout: 0x14,
            use_irq: true,
        }
    }

    /// MaxRetries configuration that makes passive polls answer promptly
    /// with zero targets instead of retrying until a card arrives.
    pub fn rf_max_retries_single_shot() -> Self {
        Self::RfConfiguration {
            item: RF_CFG_MAX_RETRIES,
            data: vec![0xFF, 0x01, 0x00],
        }
    }

    /// Single-target 106 kbps Type A scan used by every presence poll.
    pub fn list_one_type_a() -> Self {
        Self::InListPassiveTarget {
            max_targets: 1,
            baud_modulation: BAUD_106_TYPE_A,
        }
    }

    /// MIFARE Ultralight READ of 4 pages starting at `block`, relayed
    /// through InDataExchange to target 1.
    pub fn read_block(block: u8) -> Self {
        Self::InDataExchange {
            target: 1,
            data: vec![MIFARE_CMD_READ, block],
        }
    }

    /// Return the command code byte.
    pub fn command_code(&self) -> u8 {
        match self {
            Self::GetFirmwareVersion => CMD_GET_FIRMWARE_VERSION,
            Self::SamConfiguration { .. } => CMD_SAM_CONFIGURATION,
            Self::RfConfiguration { .. } => CMD_RF_CONFIGURATION,
            Self::InListPassiveTarget { .. } => CMD_IN_LIST_PASSIVE_TARGET,
            Self::InDataExchange { .. } => CMD_IN_DATA_EXCHANGE,
        }
    }

    /// Encode the command into the raw frame payload (command code + params).
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::GetFirmwareVersion => vec![CMD_GET_FIRMWARE_VERSION],
            Self::SamConfiguration { mode, timeout, use_irq } => vec![
                CMD_SAM_CONFIGURATION,
                *mode,
                *timeout,
                if *use_irq { 0x01 } else { 0x00 },
            ],
            Self::RfConfiguration { item, data } => {
                let mut out = Vec::with_capacity(2 + data.len());
                out.push(CMD_RF_CONFIGURATION);
                out.push(*item);
                out.extend_from_slice(data);
                out
            }
            Self::InListPassiveTarget { max_targets, baud_modulation } => vec![
                CMD_IN_LIST_PASSIVE_TARGET,
                *max_targets,
                *baud_modulation,
            ],
            Self::InDataExchange { target, data } => {
                let mut out = Vec::with_capacity(2 + data.len());
                out.push(CMD_IN_DATA_EXCHANGE);
                out.push(*target);
                out.extend_from_slice(data);
                out
            }
        }
    }
}
