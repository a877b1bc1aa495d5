use gn10can_frame::Frame;

use crate::cmd::{parse_command, parse_device_id, parse_device_type, parse_payload, SendArgs};
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let device_type = parse_device_type(&args.device_type)?;
    let device_id = parse_device_id(args.id)?;
    let command = parse_command(device_type, &args.command)?;
    let payload = parse_payload(args.data.as_deref())?;

    let frame = Frame::make(device_type, device_id, command, &payload);
    transmit(&args.interface, &frame, format)
}

#[cfg(target_os = "linux")]
fn transmit(interface: &str, frame: &Frame, format: OutputFormat) -> CliResult<i32> {
    use gn10can_transceiver::{SocketCanTransceiver, Transceiver};

    use crate::exit::{transceiver_error, CliError, FAILURE, SUCCESS};
    use crate::output::print_frame;

    let mut transceiver = SocketCanTransceiver::open(interface)
        .map_err(|err| transceiver_error("open failed", err))?;
    if !transceiver.send(frame) {
        return Err(CliError::new(
            FAILURE,
            format!("{interface}: frame 0x{:03X} was not accepted", frame.id),
        ));
    }
    tracing::debug!(interface, id = frame.id, dlc = frame.dlc, "frame sent");
    print_frame(frame, format);
    Ok(SUCCESS)
}

#[cfg(not(target_os = "linux"))]
fn transmit(interface: &str, _frame: &Frame, _format: OutputFormat) -> CliResult<i32> {
    Err(crate::exit::CliError::new(
        crate::exit::USAGE,
        format!("{interface}: SocketCAN is only available on Linux"),
    ))
}
