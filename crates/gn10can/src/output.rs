use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use gn10can_frame::{Frame, IdFields};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Decoded view of an identifier.
#[derive(Debug, Serialize)]
pub struct IdReport {
    pub identifier: u32,
    pub identifier_hex: String,
    pub routing_key: String,
    pub device_type: Option<&'static str>,
    pub device_type_raw: u8,
    pub device_id: u8,
    pub command: u8,
    pub command_name: Option<&'static str>,
}

impl IdReport {
    pub fn new(identifier: u32) -> Self {
        let fields: IdFields = gn10can_frame::unpack(identifier);
        let device_type = fields.device_type();
        Self {
            identifier,
            identifier_hex: format!("0x{identifier:03X}"),
            routing_key: fields.routing_key().to_string(),
            device_type: device_type.map(|ty| ty.name()),
            device_type_raw: fields.raw_device_type,
            device_id: fields.device_id,
            command: fields.command,
            command_name: device_type.and_then(|ty| ty.command_name(fields.command)),
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    #[serde(flatten)]
    id: &'a IdReport,
    extended: bool,
    remote: bool,
    error: bool,
    dlc: u8,
    data: String,
}

pub fn print_id(report: &IdReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "KEY", "TYPE", "DEV", "COMMAND"])
                .add_row(vec![
                    report.identifier_hex.clone(),
                    report.routing_key.clone(),
                    type_label(report),
                    report.device_id.to_string(),
                    command_label(report),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "id={} key={} type={} dev={} command={}",
                report.identifier_hex,
                report.routing_key,
                type_label(report),
                report.device_id,
                command_label(report)
            );
        }
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub fn print_frame(frame: &Frame, format: OutputFormat) {
    let report = IdReport::new(frame.id);
    let data = hex(frame.data());
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                id: &report,
                extended: frame.is_extended,
                remote: frame.is_rtr,
                error: frame.is_error,
                dlc: frame.dlc,
                data,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "TYPE", "DEV", "COMMAND", "DLC", "DATA"])
                .add_row(vec![
                    report.identifier_hex.clone(),
                    type_label(&report),
                    report.device_id.to_string(),
                    command_label(&report),
                    frame.dlc.to_string(),
                    data,
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "id={} type={} dev={} command={} dlc={} data={}{}",
                report.identifier_hex,
                type_label(&report),
                report.device_id,
                command_label(&report),
                frame.dlc,
                data,
                flags(frame)
            );
        }
    }
}

/// Lowercase hex without separators.
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn type_label(report: &IdReport) -> String {
    match report.device_type {
        Some(name) => name.to_string(),
        None => format!("unknown({})", report.device_type_raw),
    }
}

fn command_label(report: &IdReport) -> String {
    match report.command_name {
        Some(name) => format!("{name} ({})", report.command),
        None => report.command.to_string(),
    }
}

fn flags(frame: &Frame) -> String {
    let mut out = String::new();
    if frame.is_extended {
        out.push_str(" ext");
    }
    if frame.is_rtr {
        out.push_str(" rtr");
    }
    if frame.is_error {
        out.push_str(" err");
    }
    out
}
