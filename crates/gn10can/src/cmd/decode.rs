use gn10can_frame::STANDARD_ID_MASK;

use crate::cmd::{parse_identifier, DecodeArgs};
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_id, IdReport, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let identifier = parse_identifier(&args.identifier)?;
    if identifier > STANDARD_ID_MASK {
        return Err(CliError::new(
            DATA_INVALID,
            format!("identifier 0x{identifier:X} does not fit in 11 bits"),
        ));
    }

    let report = IdReport::new(identifier);
    if report.device_type.is_none() {
        tracing::debug!(raw = report.device_type_raw, "unknown device type");
    }
    print_id(&report, format);
    Ok(SUCCESS)
}
