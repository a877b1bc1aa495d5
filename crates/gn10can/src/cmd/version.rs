use gn10can_bus::DEFAULT_CAPACITY;
use gn10can_frame::DeviceType;
use gn10can_transceiver::DEFAULT_RX_QUEUE_DEPTH;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("gn10can {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    for (field, value) in provenance() {
        println!("{field}: {value}");
    }
    Ok(SUCCESS)
}

fn backends() -> &'static str {
    if cfg!(target_os = "linux") {
        "virtual, socketcan"
    } else {
        "virtual"
    }
}

fn provenance() -> Vec<(&'static str, String)> {
    let device_types: Vec<&str> = DeviceType::ALL.iter().map(|ty| ty.name()).collect();
    vec![
        ("name", "gn10can".to_string()),
        ("version", env!("CARGO_PKG_VERSION").to_string()),
        (
            "target",
            option_env!("GN10CAN_BUILD_TARGET")
                .unwrap_or("unknown")
                .to_string(),
        ),
        ("backends", backends().to_string()),
        ("registry_capacity", DEFAULT_CAPACITY.to_string()),
        ("rx_queue_depth", DEFAULT_RX_QUEUE_DEPTH.to_string()),
        ("device_types", device_types.join(", ")),
        (
            "features",
            format!("devices={}, cli=true", cfg!(feature = "devices")),
        ),
    ]
}
