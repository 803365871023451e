// Wire bytes of the command set, checked against the values the chip
// documentation gives for each exchange.

use tagbridge::protocol::{Command, Frame};

fn wire(cmd: &Command) -> String {
    hex::encode(Frame::host(cmd.encode()).encode().unwrap())
}

#[test]
fn sam_configuration_normal_mode() {
    // mode 01 (normal), timeout 0x14, IRQ on
    assert_eq!(wire(&Command::sam_normal()), "0000ff05fbd4140114010200");
}

#[test]
fn get_firmware_version() {
    assert_eq!(wire(&Command::GetFirmwareVersion), "0000ff02fed4022a00");
}

#[test]
fn rf_configuration_single_shot_retries() {
    // item 0x05 (MaxRetries), MxRtyATR FF, MxRtyPSL 01, MxRtyPassiveActivation 00
    assert_eq!(
        wire(&Command::rf_max_retries_single_shot()),
        "0000ff06fad43205ff0100f500"
    );
}

#[test]
fn list_one_type_a_target() {
    // one target max, 106 kbps Type A
    assert_eq!(wire(&Command::list_one_type_a()), "0000ff04fcd44a0100e100");
}

#[test]
fn data_exchange_wraps_mifare_read() {
    // target 1, MIFARE READ of block 4
    assert_eq!(wire(&Command::read_block(0x04)), "0000ff05fbd440013004b700");
}
