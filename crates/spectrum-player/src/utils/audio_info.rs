//! Output device diagnostics.
//!
//! Prints every output device cpal can see together with its default stream
//! configuration, so `output_device` in the config can be chosen.

use cpal::traits::{DeviceTrait, HostTrait};

/// Logs the available output devices to stdout
pub fn log_audio_info() {
    let host = cpal::default_host();
    println!("\n=== Audio Host: {} ===\n", host.id().name());

    let default_name = host.default_output_device().and_then(|d| d.name().ok());

    println!("--- Output Devices ---");
    match host.output_devices() {
        Ok(devices) => {
            let mut idx = 0;
            for device in devices {
                let name = match device.name() {
                    Ok(name) => name,
                    Err(_) => continue,
                };
                let marker = if default_name.as_deref() == Some(name.as_str()) {
                    " (default)"
                } else {
                    ""
                };
                match device.default_output_config() {
                    Ok(config) => println!(
                        "  [{}] {}{}: {} ch, {} Hz, {:?}",
                        idx,
                        name,
                        marker,
                        config.channels(),
                        config.sample_rate().0,
                        config.sample_format()
                    ),
                    Err(e) => println!("  [{}] {}{}: ({})", idx, name, marker, e),
                }
                idx += 1;
            }
            if idx == 0 {
                println!("  (none found)");
            }
        }
        Err(e) => println!("  (failed to enumerate: {})", e),
    }

    println!("\nSet output_device in ~/.spectrum-player.toml to pick one.\n");
}
