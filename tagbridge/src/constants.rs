// tagbridge/src/constants.rs
//! Wire-level constants for the PN532 host protocol.

/// Frame preamble: 0x00 0x00 0xFF
pub const PREAMBLE: [u8; 3] = [0x00, 0x00, 0xFF];

/// Frame postamble: 0x00
pub const POSTAMBLE: u8 = 0x00;

/// Direction byte (TFI) for host -> reader frames
pub const TFI_HOST_TO_READER: u8 = 0xD4;
/// Direction byte (TFI) for reader -> host frames
pub const TFI_READER_TO_HOST: u8 = 0xD5;

/// The fixed 6-byte acknowledgement frame the chip sends after every command
pub const ACK_FRAME: [u8; 6] = [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00];

/// Minimal wire frame length: preamble(3) + len(1) + lcs(1) + tfi(1) + dcs(1) + postamble(1)
pub const MIN_FRAME_LEN: usize = 8;

/// Maximum application payload per frame. The single LEN byte counts the
/// direction byte plus the payload, so 255 - 1.
pub const MAX_PAYLOAD_LEN: usize = 254;

/// HSU wakeup preamble written before the first command after power-up or
/// reconnect: 0x55 0x55 followed by fourteen zero bytes.
pub const WAKEUP_PREAMBLE: [u8; 16] = [
    0x55, 0x55, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// GetFirmwareVersion command code
pub const CMD_GET_FIRMWARE_VERSION: u8 = 0x02;
/// SAMConfiguration command code
pub const CMD_SAM_CONFIGURATION: u8 = 0x14;
/// RFConfiguration command code
pub const CMD_RF_CONFIGURATION: u8 = 0x32;
/// InListPassiveTarget command code
pub const CMD_IN_LIST_PASSIVE_TARGET: u8 = 0x4A;
/// InDataExchange command code
pub const CMD_IN_DATA_EXCHANGE: u8 = 0x40;

/// RFConfiguration item selecting the MaxRetries table. Programming it makes
/// InListPassiveTarget answer with zero targets instead of retrying forever.
pub const RF_CFG_MAX_RETRIES: u8 = 0x05;

/// InListPassiveTarget baud/modulation selector: 106 kbps ISO14443 Type A
pub const BAUD_106_TYPE_A: u8 = 0x00;

/// MIFARE Ultralight READ command (returns 4 pages / 16 bytes)
pub const MIFARE_CMD_READ: u8 = 0x30;

/// First tag memory block read during an NDEF dump (capability container)
pub const TAG_CC_BLOCK: u8 = 3;
/// First data block of the NDEF area on MIFARE Ultralight family tags
pub const TAG_DATA_BLOCK_START: u8 = 4;
/// One-past-last block of the bulk dump (blocks 4..48, 176 bytes)
pub const TAG_DATA_BLOCK_END: u8 = 48;
/// Blocks covered by one MIFARE READ
pub const TAG_BLOCKS_PER_READ: u8 = 4;
