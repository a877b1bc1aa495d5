use crate::cmd::{parse_command, parse_device_id, parse_device_type, EncodeArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_id, IdReport, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let device_type = parse_device_type(&args.device_type)?;
    let device_id = parse_device_id(args.id)?;
    let command = parse_command(device_type, &args.command)?;

    let identifier = gn10can_frame::pack(device_type, device_id, command);
    print_id(&IdReport::new(identifier), format);
    Ok(SUCCESS)
}
