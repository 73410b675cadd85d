//! Puestos CLI - Summarize Excel workforce rosters
//!
//! # Main Commands
//!
//! ```bash
//! puestos serve                      # Start HTTP server (port 3000)
//! puestos process plantilla.xlsx    # Group a roster and print the summary
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! puestos parse plantilla.xlsx      # Dump headered records as JSON
//! puestos locate plantilla.xlsx     # Print the located header row index
//! puestos export summary.json -o out.xlsx   # Re-export an edited table
//! ```

use clap::{Parser, Subcommand};
use puestos::{
    parse_bytes, process_bytes, read_raw, write_table_file, Engine, ExportRequest,
    SheetError,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "puestos")]
#[command(about = "Group Excel workforce rosters and suggest job-title merges", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: locate header, group, suggest merges
    Process {
        /// Input workbook (.xls or .xlsx)
        input: PathBuf,

        /// Output file for the summary as JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also export the summary as an xlsx workbook
        #[arg(long)]
        summary_out: Option<PathBuf>,

        /// Also export the passthrough original table as an xlsx workbook
        #[arg(long)]
        original_out: Option<PathBuf>,
    },

    /// Parse a workbook and output the headered records as JSON
    Parse {
        /// Input workbook (.xls or .xlsx)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Locate the header row and print its zero-based index
    Locate {
        /// Input workbook (.xls or .xlsx)
        input: PathBuf,
    },

    /// Export a table JSON file ({"columns": [...], "rows": [...]}) as xlsx
    Export {
        /// Input table JSON file
        input: PathBuf,

        /// Output xlsx file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            input,
            output,
            summary_out,
            original_out,
        } => cmd_process(
            &input,
            output.as_deref(),
            summary_out.as_deref(),
            original_out.as_deref(),
        ),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Locate { input } => cmd_locate(&input),

        Commands::Export { input, output } => cmd_export(&input, &output),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_process(
    input: &Path,
    output: Option<&Path>,
    summary_out: Option<&Path>,
    original_out: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let engine = Engine::from_path(input)?;
    let bytes = fs::read(input)?;
    let processed = process_bytes(&bytes, engine)?;

    eprintln!("   Engine:     {}", processed.sheet_info.engine);
    eprintln!("   Header row: {}", processed.sheet_info.header_row);
    eprintln!("   Rows:       {}", processed.sheet_info.row_count);
    eprintln!("   Columns:    {}", processed.sheet_info.column_count);

    eprintln!(
        "\n📦 {} groups, total headcount {}",
        processed.summary.groups.len(),
        processed.summary.total
    );
    if processed.summary.flagged_count() > 0 {
        eprintln!("   ⚠️  {} flagged as low headcount", processed.summary.flagged_count());
    }

    if let Some(path) = summary_out {
        write_table_file(path, &processed.summary.columns(), &processed.summary.to_rows())?;
        eprintln!("   💾 Summary exported to: {}", path.display());
    }

    if let Some(path) = original_out {
        write_table_file(path, &processed.original.headers, &processed.original.records)?;
        eprintln!("   💾 Original table exported to: {}", path.display());
    }

    let json = serde_json::to_string_pretty(&processed.summary.to_rows())?;
    write_output(&json, output)?;

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing: {}", input.display());

    let engine = Engine::from_path(input)?;
    let bytes = fs::read(input)?;
    let parsed = parse_bytes(&bytes, engine)?;

    eprintln!("   Header row: {}", parsed.header_row);
    eprintln!("   Columns: {}", parsed.headers.join(", "));
    eprintln!("✅ Parsed {} records", parsed.records.len());

    let json = serde_json::to_string_pretty(&parsed.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_locate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let engine = Engine::from_path(input)?;
    let bytes = fs::read(input)?;
    let range = read_raw(&bytes, engine)?;

    match puestos::find_header_row(&range) {
        Some(index) => {
            println!("{}", index);
            Ok(())
        }
        None => Err(SheetError::HeaderNotFound.into()),
    }
}

fn cmd_export(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Exporting: {}", input.display());

    let content = fs::read_to_string(input)?;
    let table: ExportRequest = serde_json::from_str(&content)?;

    write_table_file(output, &table.columns, &table.rows)?;
    eprintln!("💾 Workbook written to: {}", output.display());

    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    puestos::server::start_server(port).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
