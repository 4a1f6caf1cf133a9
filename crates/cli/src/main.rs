mod connect;
mod output;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use escpos_link_client::codes::printer::{self, Align, CutMode};
use escpos_link_client::codes::{
    NamedCommand, PAPER_STATUS_CODES, PRINTER_LINE_WIDTH, StatusRequest, find_command, vfd,
};
use escpos_link_client::{CustomerDisplay, ReceiptPrinter, StatusEncoding, list_serial_ports};
use serde_json::json;

use crate::connect::{ConnectArgs, SentLog, Session};
use crate::output::{Format, print_json, report_error, report_sent, spaced_hex};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "escpos",
    version,
    about = "Drive ESC/POS receipt printers and customer displays over serial or TCP"
)]
struct Cli {
    /// Output mode: "pretty" for human-readable output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG
    /// overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    connect: ConnectArgs,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Printer ──────────────────────────────────────────────────────
    /// Print lines of text on a receipt printer.
    Print {
        /// Lines to print. Read from --file or stdin when none are given.
        lines: Vec<String>,
        /// Read lines from a file ("-" for stdin).
        #[arg(long, conflicts_with = "lines")]
        file: Option<PathBuf>,
        /// Center each line.
        #[arg(long)]
        center: bool,
        /// Line width in columns for --center.
        #[arg(long, default_value_t = PRINTER_LINE_WIDTH, requires = "center")]
        width: usize,
        /// Justification applied before printing.
        #[arg(long, value_enum)]
        align: Option<AlignArg>,
        /// Print emphasized.
        #[arg(long)]
        bold: bool,
        /// Cut the paper afterwards.
        #[arg(long, value_enum)]
        cut: Option<CutArg>,
        /// Show the bytes instead of connecting to a device.
        #[arg(long)]
        dry_run: bool,
    },

    /// Cut the paper.
    Cut {
        /// Partial cut (default: full).
        #[arg(long)]
        partial: bool,
        /// Show the bytes instead of connecting to a device.
        #[arg(long)]
        dry_run: bool,
    },

    /// Send named commands (see `escpos codes`) or raw hex bytes, in order.
    Send {
        /// Command names (e.g. paper-full-cut) or hex strings (e.g. 1b40).
        #[arg(required = true)]
        items: Vec<String>,
        /// Show the bytes instead of connecting to a device.
        #[arg(long)]
        dry_run: bool,
    },

    /// Query a real-time status and print the reply.
    Status {
        /// Which status to request.
        #[arg(long, value_enum, default_value_t = RequestArg::Paper)]
        request: RequestArg,
        /// How to render the reply bytes (hex, utf8, latin1).
        #[arg(long, default_value_t = StatusEncoding::Hex)]
        encoding: StatusEncoding,
    },

    // ── Customer display ────────────────────────────────────────────
    /// Drive a 2×20 customer display.
    Display {
        /// Clear the screen first.
        #[arg(long)]
        clear: bool,
        /// Show or hide the cursor.
        #[arg(long, value_enum)]
        cursor: Option<CursorArg>,
        /// Brightness level, 1-4.
        #[arg(long)]
        brightness: Option<u8>,
        /// Centered text for the top line.
        #[arg(long)]
        top: Option<String>,
        /// Centered text for the bottom line.
        #[arg(long)]
        bottom: Option<String>,
        /// Show the bytes instead of connecting to a device.
        #[arg(long)]
        dry_run: bool,
    },

    // ── Reference / informational ───────────────────────────────────
    /// List the command tables, or show one command by name.
    Codes { name: Option<String> },

    /// List serial ports found on this system.
    Ports,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlignArg {
    Left,
    Center,
    Right,
}

impl From<AlignArg> for Align {
    fn from(a: AlignArg) -> Self {
        match a {
            AlignArg::Left => Align::Left,
            AlignArg::Center => Align::Center,
            AlignArg::Right => Align::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CutArg {
    Full,
    Partial,
}

impl From<CutArg> for CutMode {
    fn from(c: CutArg) -> Self {
        match c {
            CutArg::Full => CutMode::Full,
            CutArg::Partial => CutMode::Partial,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RequestArg {
    /// DLE EOT 1
    Printer,
    /// DLE EOT 2
    Offline,
    /// DLE EOT 3
    Error,
    /// DLE EOT 4
    Paper,
}

impl From<RequestArg> for StatusRequest {
    fn from(r: RequestArg) -> Self {
        match r {
            RequestArg::Printer => StatusRequest::Printer,
            RequestArg::Offline => StatusRequest::Offline,
            RequestArg::Error => StatusRequest::Error,
            RequestArg::Paper => StatusRequest::PaperSensor,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CursorArg {
    Show,
    Hide,
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(err) = run(cli, format) {
        report_error(format, &err);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli, format: Format) -> Result<()> {
    let connect = &cli.connect;
    match cli.cmd {
        Cmd::Print {
            lines,
            file,
            center,
            width,
            align,
            bold,
            cut,
            dry_run,
        } => {
            let lines = match file {
                Some(path) => read_lines(Some(path))?,
                None if lines.is_empty() => read_lines(None)?,
                None => lines,
            };
            let job = PrintJob {
                lines,
                center: center.then_some(width),
                align: align.map(Align::from),
                bold,
                cut: cut.map(CutMode::from),
            };
            cmd_print(connect, &job, dry_run, format)
        }
        Cmd::Cut { partial, dry_run } => {
            let mode = if partial {
                CutMode::Partial
            } else {
                CutMode::Full
            };
            let session = Session::open(connect, dry_run)?;
            ReceiptPrinter::new(session.device)
                .cut(mode)
                .context("failed to send cut")?;
            finish(&session.peer, session.dry_run, &session.sent, format)
        }
        Cmd::Send { items, dry_run } => cmd_send(connect, &items, dry_run, format),
        Cmd::Status { request, encoding } => cmd_status(connect, request.into(), encoding, format),
        Cmd::Display {
            clear,
            cursor,
            brightness,
            top,
            bottom,
            dry_run,
        } => {
            let session = Session::open(connect, dry_run)?;
            let mut display = CustomerDisplay::new(session.device);
            if clear {
                display.clear_screen()?;
            }
            if let Some(cursor) = cursor {
                display.show_cursor(matches!(cursor, CursorArg::Show))?;
            }
            if let Some(level) = brightness {
                display.brightness(level)?;
            }
            if let Some(text) = top {
                display.centered_top_line(&text)?;
            }
            if let Some(text) = bottom {
                display.centered_bottom_line(&text)?;
            }
            display.close().context("failed to close device")?;
            finish(&session.peer, session.dry_run, &session.sent, format)
        }
        Cmd::Codes { name } => cmd_codes(name.as_deref(), format),
        Cmd::Ports => cmd_ports(format),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

struct PrintJob {
    lines: Vec<String>,
    /// Center at this width.
    center: Option<usize>,
    align: Option<Align>,
    bold: bool,
    cut: Option<CutMode>,
}

fn cmd_print(connect: &ConnectArgs, job: &PrintJob, dry_run: bool, format: Format) -> Result<()> {
    let session = Session::open(connect, dry_run)?;
    let mut printer = ReceiptPrinter::new(session.device);

    if let Some(align) = job.align {
        printer.set_align(align)?;
    }
    if job.bold {
        printer.set_bold(true)?;
    }
    for line in &job.lines {
        match job.center {
            Some(width) => printer.print_centered_width(line, width)?,
            None => printer.print_line(line)?,
        }
    }
    if job.bold {
        printer.set_bold(false)?;
    }
    if let Some(mode) = job.cut {
        printer.cut(mode)?;
    }
    printer.close().context("failed to close device")?;

    finish(&session.peer, session.dry_run, &session.sent, format)
}

fn cmd_send(connect: &ConnectArgs, items: &[String], dry_run: bool, format: Format) -> Result<()> {
    // Resolve everything before opening the device so a typo sends nothing.
    let mut payload = Vec::new();
    for item in items {
        payload.extend_from_slice(&resolve_item(item)?);
    }

    let mut session = Session::open(connect, dry_run)?;
    session
        .device
        .send_raw(&payload)
        .context("failed to send bytes")?;
    session.device.close().context("failed to close device")?;
    finish(&session.peer, session.dry_run, &session.sent, format)
}

fn resolve_item(item: &str) -> Result<Vec<u8>> {
    if let Some(cmd) = find_command(item) {
        return Ok(cmd.bytes.to_vec());
    }
    let digits: String = item
        .trim_start_matches("0x")
        .chars()
        .filter(|c| !matches!(c, ' ' | ':' | '_'))
        .collect();
    hex::decode(&digits).with_context(|| {
        format!("'{item}' is neither a command name (see `escpos codes`) nor hex bytes")
    })
}

fn cmd_status(
    connect: &ConnectArgs,
    request: StatusRequest,
    encoding: StatusEncoding,
    format: Format,
) -> Result<()> {
    let mut session = Session::open(connect, false)?;
    let peer = session.peer.clone();
    let reply = session
        .device
        .query_status_blocking(request)
        .with_context(|| format!("status query to {peer} failed"))?;
    session.device.close().context("failed to close device")?;

    let rendered = reply.render(encoding);
    let paper = match request {
        StatusRequest::PaperSensor => reply.paper_status(),
        _ => None,
    };

    match format {
        Format::Json => print_json(&json!({
            "success": true,
            "target": peer,
            "request": request,
            "encoding": encoding,
            "reply": rendered,
            "raw": hex::encode(&reply.raw),
            "paper_status": paper,
        })),
        Format::Pretty => {
            match paper {
                Some(status) => println!("{rendered} ({})", status.name()),
                None => println!("{rendered}"),
            }
            Ok(())
        }
    }
}

fn cmd_codes(name: Option<&str>, format: Format) -> Result<()> {
    let groups: [(&str, &[NamedCommand]); 2] =
        [("printer", printer::COMMANDS), ("display", vfd::COMMANDS)];

    if let Some(name) = name {
        let Some(cmd) = find_command(name) else {
            bail!("unknown command '{name}'; run `escpos codes` for the list");
        };
        return match format {
            Format::Json => print_json(&command_json(cmd)),
            Format::Pretty => {
                println!("{}: {}", cmd.name, cmd.description);
                println!("  {}", spaced_hex(cmd.bytes));
                Ok(())
            }
        };
    }

    match format {
        Format::Json => {
            let mut out = serde_json::Map::new();
            for (group, commands) in groups {
                out.insert(
                    group.to_string(),
                    commands.iter().map(command_json).collect(),
                );
            }
            let codes: serde_json::Map<_, _> = PAPER_STATUS_CODES
                .iter()
                .map(|(name, code)| (name.to_string(), json!(code)))
                .collect();
            out.insert("paper_status".to_string(), codes.into());
            print_json(&out.into())
        }
        Format::Pretty => {
            for (group, commands) in groups {
                println!("{group}:");
                for cmd in commands {
                    println!(
                        "  {:<22} {:<18} {}",
                        cmd.name,
                        spaced_hex(cmd.bytes),
                        cmd.description
                    );
                }
            }
            println!("paper status replies (hex):");
            for (name, code) in PAPER_STATUS_CODES {
                println!("  {name:<22} {code}");
            }
            Ok(())
        }
    }
}

fn command_json(cmd: &NamedCommand) -> serde_json::Value {
    json!({
        "name": cmd.name,
        "description": cmd.description,
        "hex": hex::encode(cmd.bytes),
    })
}

fn cmd_ports(format: Format) -> Result<()> {
    let ports = list_serial_ports();
    match format {
        Format::Json => print_json(&json!({ "ports": ports })),
        Format::Pretty => {
            if ports.is_empty() {
                eprintln!("no serial ports found");
            }
            for port in ports {
                println!("{port}");
            }
            Ok(())
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Report what a device command wrote.
fn finish(peer: &str, dry_run: bool, sent: &SentLog, format: Format) -> Result<()> {
    report_sent(format, peer, dry_run, &sent.bytes())
}

/// Read lines from a file, or from stdin for `None` / `-`.
fn read_lines(path: Option<PathBuf>) -> Result<Vec<String>> {
    let text = match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
            .with_context(|| format!("failed to read '{}'", path.display()))?,
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };
    Ok(text.lines().map(str::to_string).collect())
}
