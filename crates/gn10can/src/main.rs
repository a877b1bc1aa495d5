mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "gn10can", version, about = "Robot CAN bus identifier and frame tool")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "gn10can",
            "encode",
            "--type",
            "motor-driver",
            "--id",
            "1",
            "--command",
            "target",
        ])
        .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.device_type, "motor-driver");
                assert_eq!(args.id, 1);
                assert_eq!(args.command, "target");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_monitor_filters() {
        let cli = Cli::try_parse_from([
            "gn10can", "monitor", "vcan0", "--count", "3", "-t", "servo-driver", "-i", "2",
        ])
        .expect("monitor args should parse");

        match cli.command {
            Command::Monitor(args) => {
                assert_eq!(args.interface, "vcan0");
                assert_eq!(args.count, Some(3));
                assert_eq!(args.device_type.as_deref(), Some("servo-driver"));
                assert_eq!(args.id, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["gn10can", "decode", "0x89", "--format", "json"])
            .expect("decode args should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Decode(_)));
    }

    #[test]
    fn send_requires_type() {
        let err = Cli::try_parse_from(["gn10can", "send", "can0", "--id", "1", "--command", "1"])
            .expect_err("missing --type should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
