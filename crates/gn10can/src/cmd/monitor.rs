use gn10can_frame::{DeviceType, Frame};

use crate::cmd::{parse_device_id, parse_device_type, MonitorArgs};
use crate::exit::CliResult;
use crate::output::OutputFormat;

/// Frame filter built from `--type` and `--id`.
#[derive(Debug, Default, Clone, Copy)]
struct Filter {
    device_type: Option<DeviceType>,
    device_id: Option<u8>,
}

impl Filter {
    fn from_args(args: &MonitorArgs) -> CliResult<Self> {
        Ok(Self {
            device_type: args
                .device_type
                .as_deref()
                .map(parse_device_type)
                .transpose()?,
            device_id: args.id.map(parse_device_id).transpose()?,
        })
    }

    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    fn matches(&self, frame: &Frame) -> bool {
        if self.device_type.is_none() && self.device_id.is_none() {
            return true;
        }
        if frame.is_extended || frame.is_error {
            return false;
        }
        let fields = frame.id_fields();
        self.device_type
            .is_none_or(|ty| fields.device_type() == Some(ty))
            && self.device_id.is_none_or(|id| fields.device_id == id)
    }
}

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let filter = Filter::from_args(&args)?;
    listen(&args, filter, format)
}

#[cfg(target_os = "linux")]
fn listen(args: &MonitorArgs, filter: Filter, format: OutputFormat) -> CliResult<i32> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use gn10can_transceiver::{SocketCanTransceiver, Transceiver};

    use crate::exit::{transceiver_error, SUCCESS};
    use crate::output::print_frame;

    let mut transceiver = SocketCanTransceiver::open(&args.interface)
        .map_err(|err| transceiver_error("open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;
    tracing::info!(interface = %args.interface, "monitoring");

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let Some(frame) = transceiver.receive() else {
            std::thread::sleep(Duration::from_millis(1));
            continue;
        };
        if !filter.matches(&frame) {
            continue;
        }

        print_frame(&frame, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}

#[cfg(target_os = "linux")]
fn install_ctrlc_handler(
    running: std::sync::Arc<std::sync::atomic::AtomicBool>,
) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, std::sync::atomic::Ordering::SeqCst);
    })
    .map_err(|err| {
        crate::exit::CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

#[cfg(not(target_os = "linux"))]
fn listen(args: &MonitorArgs, _filter: Filter, _format: OutputFormat) -> CliResult<i32> {
    Err(crate::exit::CliError::new(
        crate::exit::USAGE,
        format!("{}: SocketCAN is only available on Linux", args.interface),
    ))
}
