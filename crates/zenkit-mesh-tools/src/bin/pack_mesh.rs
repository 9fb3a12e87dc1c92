//! Pack a JSON mesh fixture and print or save the result.
//!
//! Run: `cargo run -p zenkit-mesh-tools --features cli --bin pack_mesh -- <fixture.json> [-o packed.json] [--report]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use zenkit_mesh::pack_mesh_with_report;
use zenkit_mesh_tools::{init_logging, load_fixture, save_packed};

#[derive(Parser, Debug)]
#[command(about = "Pack a decoded mesh fixture into welded render buffers")]
struct Args {
    /// Mesh fixture to pack.
    fixture: PathBuf,

    /// Where to write the packed mesh as JSON.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print and save the repair counters.
    #[arg(long)]
    report: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> zenkit_mesh_tools::Result<()> {
    let fixture = load_fixture(&args.fixture)?;
    let (packed, report) = pack_mesh_with_report(&fixture.as_raw());

    println!("Mesh: {}", args.fixture.display());
    println!("  - Vertices: {}", packed.vertex_count());
    println!("  - Indices: {}", packed.indices.len());
    println!("  - Triangles: {}", packed.triangle_count());
    println!(
        "  - Materials: {} (from {})",
        packed.materials.len(),
        fixture.materials.len()
    );
    println!("  - Draw ranges: {}", packed.draw_ranges.len());
    if let Some((min, max)) = packed.bounds() {
        println!("  - Bounds: {min} .. {max}");
    }

    if args.report {
        println!("Report:");
        println!("  - Merged materials: {}", report.merged_materials);
        println!("  - Dropped triangles: {}", report.dropped_triangles);
        println!("  - Skipped corners: {}", report.skipped_corners);
        println!("  - Corrected attributes: {}", report.corrected_attributes);
        println!("  - Fallback corners: {}", report.fallback_corners);
        println!("  - Welded corners: {}", report.welded_corners);
    }

    if let Some(output) = &args.output {
        save_packed(output, &packed, args.report.then_some(&report))?;
    }

    Ok(())
}
