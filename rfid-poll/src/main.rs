// rfid-poll -- command-line UHF RFID inventory poller.
//
// Sends the multi-poll inventory command once per cycle, reads the
// reader's answer, and prints the unique EPCs seen in that cycle.
//
// Usage:
//   rfid-poll --port /dev/ttyUSB0
//   rfid-poll --port COM4 --baud 115200 --interval-ms 500
//   rfid-poll --port /dev/ttyUSB0 --cycles 10
//   rfid-poll --mock --cycles 3
//
// Logging goes to stderr; set RUST_LOG=debug (or trace) for per-poll detail.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use rfidlib_core::EpcId;
use rfidlib_test_harness::MockTransport;
use rfidlib_uhf::commands::INVENTORY_COMMAND;
use rfidlib_uhf::frame::FRAME_HEADER;
use rfidlib_uhf::{EpcAccumulator, InventoryReader, ReaderBuilder};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Poll a UHF RFID reader and print the unique tags seen each cycle.
#[derive(Parser, Debug)]
#[command(name = "rfid-poll", version, about)]
struct Cli {
    /// Serial port path (e.g. /dev/ttyUSB0, COM4).
    /// Required unless --mock is used.
    #[arg(long)]
    port: Option<String>,

    /// Serial baud rate.
    #[arg(long, default_value_t = rfidlib_uhf::builder::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// How long to wait for the reader's answer each cycle, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Pause between cycles, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Number of cycles to run (0 = run until Ctrl-C).
    #[arg(long, default_value_t = 0)]
    cycles: u64,

    /// Use a scripted mock reader instead of a real serial port.
    /// Requires a non-zero --cycles.
    #[arg(long)]
    mock: bool,
}

fn validate_options(cli: &Cli) -> Result<()> {
    if cli.mock {
        if cli.port.is_some() {
            bail!("--port cannot be combined with --mock");
        }
        if cli.cycles == 0 {
            bail!("--mock needs a non-zero --cycles");
        }
    } else if cli.port.is_none() {
        bail!("--port is required when not using --mock");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reader construction
// ---------------------------------------------------------------------------

/// Sample EPCs answered by the mock reader.
const DEMO_TAGS: [[u8; 12]; 3] = [
    [0xE2, 0x80, 0x68, 0x94, 0x00, 0x00, 0x50, 0x1D, 0x6F, 0xBB, 0xC4, 0xE1],
    [0xE2, 0x00, 0x00, 0x17, 0x22, 0x11, 0x01, 0x44, 0x18, 0x90, 0x5B, 0x2C],
    [0x30, 0x08, 0x33, 0xB2, 0xDD, 0xD9, 0x01, 0x40, 0x00, 0x00, 0x00, 0x00],
];

/// Mock reader response for one cycle: a few tag reports with repeats and a
/// truncated trailing frame, as a real reader produces mid-inventory.
fn demo_response(cycle: u64) -> Vec<u8> {
    let mut out = Vec::new();
    let first = cycle as usize % DEMO_TAGS.len();
    for i in [first, (first + 1) % DEMO_TAGS.len(), first] {
        out.extend_from_slice(&FRAME_HEADER);
        out.extend_from_slice(&[0xC9, 0x34, 0x00]);
        out.extend_from_slice(&DEMO_TAGS[i]);
        out.extend_from_slice(&[0x2D, 0x8F, 0x4C, 0x7E]);
    }
    out.extend_from_slice(&FRAME_HEADER);
    out.extend_from_slice(&[0xC9, 0x34, 0x00, 0xE2, 0x80]);
    out
}

async fn create_reader(cli: &Cli) -> Result<InventoryReader> {
    let builder = ReaderBuilder::new()
        .baud_rate(cli.baud)
        .read_timeout(Duration::from_millis(cli.timeout_ms));

    if cli.mock {
        let mut mock = MockTransport::new();
        for cycle in 0..cli.cycles {
            mock.expect(&INVENTORY_COMMAND, &demo_response(cycle));
        }
        let reader = builder
            .build_with_transport(Box::new(mock))
            .await
            .context("failed to build reader with mock transport")?;
        info!("Connected (mock transport)");
        Ok(reader)
    } else {
        let port = cli
            .port
            .as_deref()
            .context("--port is required when not using --mock")?;
        let reader = builder
            .serial_port(port)
            .build()
            .await
            .with_context(|| format!("failed to open reader on {port}"))?;
        info!(port = %port, baud = cli.baud, "Port is open");
        Ok(reader)
    }
}

// ---------------------------------------------------------------------------
// Polling loop
// ---------------------------------------------------------------------------

/// Print one cycle's EPCs.
fn print_cycle(out: &mut impl Write, epcs: &[EpcId]) -> io::Result<()> {
    writeln!(out, "Unique EPC Data:")?;
    for epc in epcs {
        writeln!(out, "{epc}")?;
    }
    writeln!(out)?;
    out.flush()
}

/// Run polling cycles until `cycles` have completed (0 = forever).
async fn run(
    reader: &mut InventoryReader,
    out: &mut impl Write,
    interval: Duration,
    cycles: u64,
) -> Result<()> {
    let mut acc = EpcAccumulator::new();
    let mut completed = 0u64;

    loop {
        let added = reader
            .poll_once(&mut acc)
            .await
            .context("inventory poll failed")?;
        debug!(
            cycle = completed + 1,
            new_tags = added,
            "Command sent to read tags"
        );

        if !acc.is_empty() {
            print_cycle(out, &acc.drain()).context("failed to write EPC output")?;
        }

        completed += 1;
        if cycles != 0 && completed >= cycles {
            return Ok(());
        }

        tokio::time::sleep(interval).await;
    }
}

/// Close the reader and hand back the loop's outcome.
///
/// A failed close is logged, never allowed to mask `result`.
async fn shutdown(reader: &mut InventoryReader, result: Result<()>) -> Result<()> {
    info!("Closing connection...");
    if let Err(e) = reader.close().await {
        warn!(error = %e, "Failed to close reader");
    }
    result
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let cli = Cli::parse();
    validate_options(&cli)?;

    let mut reader = create_reader(&cli).await?;
    let interval = Duration::from_millis(cli.interval_ms);

    let mut stdout = io::stdout();
    let result = tokio::select! {
        result = run(&mut reader, &mut stdout, interval, cli.cycles) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            Ok(())
        }
    };

    shutdown(&mut reader, result).await
}
