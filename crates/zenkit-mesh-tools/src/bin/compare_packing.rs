//! Pack a mesh fixture and compare the result against reference output.
//!
//! The reference is a JSON file in the layout written by `pack_mesh -o`,
//! typically produced by another implementation of the packer.
//!
//! Run: `cargo run -p zenkit-mesh-tools --features cli --bin compare_packing -- <fixture.json> <reference.json>`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use zenkit_mesh::pack_mesh;
use zenkit_mesh_tools::compare::VERTEX_TOLERANCE;
use zenkit_mesh_tools::{
    compare_packed, init_logging, load_fixture, load_packed_json, packed_to_json,
};

#[derive(Parser, Debug)]
#[command(about = "Compare packed output against a reference JSON file")]
struct Args {
    /// Mesh fixture to pack.
    fixture: PathBuf,

    /// Reference packed mesh.
    reference: PathBuf,

    /// Allowed absolute difference for vertex floats.
    #[arg(long, default_value_t = VERTEX_TOLERANCE)]
    tolerance: f64,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    println!("=== Comparing {} ===\n", args.fixture.display());
    match run(&args) {
        Ok(()) => {
            println!("All comparisons PASSED!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("FAILED: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> zenkit_mesh_tools::Result<()> {
    let fixture = load_fixture(&args.fixture)?;
    let actual = packed_to_json(&pack_mesh(&fixture.as_raw()), None)?;
    let expected = load_packed_json(&args.reference)?;
    compare_packed(&actual, &expected, args.tolerance)
}
