//! Prints the oscillator state driven by any connected MIDI keyboard.
//!
//! Usage: `monokey [config.toml]`

use monokey::prelude::*;
use monokey::MidiHardware;
use std::env;
use std::thread;
use std::time::Duration;

fn main() -> monokey::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match env::args().nth(1) {
        Some(path) => ControllerConfig::load(path)?,
        None => ControllerConfig::default(),
    };

    println!("=== MIDI Input Devices ===");
    let devices = MidiHardware::list_devices();
    if devices.is_empty() {
        println!("  (none found, waiting for one to be plugged in)");
    }
    for dev in &devices {
        println!("  [{}] {}", dev.index, dev.name);
    }

    let oscillator = SharedOscillator::default();
    let mut hub = DeviceHub::new();
    let mut controller = MidiController::builder()
        .config(config)
        .oscillator(oscillator.clone())
        .build()?;
    controller.start(&hub);

    let _hardware = MidiHardware::start(hub.sender())?;

    let mut last = oscillator.snapshot();
    loop {
        hub.update();

        let state = oscillator.snapshot();
        if state != last {
            let (frequency, playing) = state;
            if playing {
                println!("playing {:.2} Hz", frequency);
            } else {
                println!("stopped");
            }
            last = state;
        }

        thread::sleep(Duration::from_millis(5));
    }
}
