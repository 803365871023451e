// One-shot scan example: find the reader, poll until a card shows up, and
// print its identifier and NDEF content. Useful for checking wiring and
// tag formatting before running the bridge service.

use anyhow::Result;
use std::time::Duration;
use tagbridge::ndef;
use tagbridge::prelude::{default_read_timeout, PollResult, SerialTransport, Session};
use tagbridge::transport::detect_reader;

fn main() -> Result<()> {
    env_logger::init();

    let timeout = default_read_timeout();
    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            println!("No port given, probing USB serial ports...");
            detect_reader(115_200, timeout)?
        }
    };

    println!("Opening {}...", path);
    let transport = SerialTransport::open(&path, 115_200)?;
    let mut session = Session::new(Box::new(transport), timeout);
    session.initialize()?;

    println!("Hold a tag against the reader.");
    loop {
        match session.poll_presence()? {
            PollResult::Absent => std::thread::sleep(Duration::from_millis(250)),
            PollResult::Present(uid) => {
                println!("Card detected: uid = {}", uid);
                match session.read_tag_memory()? {
                    None => println!("Tag did not answer memory reads (blank or foreign format)"),
                    Some(memory) => match ndef::extract_tag_content(&memory) {
                        Some(content) => println!("NDEF content: {}", content),
                        None => println!("No usable NDEF record found"),
                    },
                }
                return Ok(());
            }
        }
    }
}
