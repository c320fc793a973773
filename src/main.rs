use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use mbus_telegram::util::hex::{decode_hex, format_hex_compact};
use mbus_telegram::{init_logger_with_level, pack_read_data_frame, pack_select_frame, parse_frames};

#[derive(Parser)]
#[command(name = "mbus-decode")]
#[command(about = "Decode wired M-Bus telegrams and build request frames")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a hex telegram given as argument or on stdin
    Decode {
        telegram: Option<String>,
        /// Print the decoded telegram as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the select frame for a secondary address
    ConnectFrame { secondary_address: String },
    /// Print the REQ_UD2 frame
    ReadFrame,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    init_logger_with_level(level);

    match cli.command {
        Commands::Decode { telegram, json } => {
            let text = match telegram {
                Some(text) => text,
                None => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .context("reading telegram from stdin")?;
                    text
                }
            };
            let bytes = decode_hex(&text)?;
            let decoded = parse_frames(&bytes)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&decoded)?);
                return Ok(());
            }

            match decoded.slave_information() {
                Some(header) => println!(
                    "id={} manufacturer={} version={:?} medium={} access={} status=0x{:02X}",
                    header.id(),
                    header.manufacturer(),
                    header.version(),
                    header.medium(),
                    header.access_number(),
                    header.status()
                ),
                None => println!("header: <invalid identification number>"),
            }
            for record in decoded.records() {
                println!("{record}");
            }
        }
        Commands::ConnectFrame { secondary_address } => {
            let frame = pack_select_frame(&secondary_address)
                .with_context(|| format!("building select frame for {secondary_address}"))?;
            println!("{}", format_hex_compact(&frame));
        }
        Commands::ReadFrame => {
            println!("{}", format_hex_compact(&pack_read_data_frame()));
        }
    }

    Ok(())
}
