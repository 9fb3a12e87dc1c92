//! Developer tooling around [`zenkit_mesh`].
//!
//! Meshes are exchanged as JSON fixtures: an owned [`MeshFixture`] stands in
//! for the decoder output, and packed results are written in the same shape
//! as [`PackedMesh`](zenkit_mesh::PackedMesh) so that they can be diffed
//! against reference output with [`compare_packed`].

mod error;

pub mod compare;
pub mod fixture;

pub use compare::compare_packed;
pub use error::{Error, Result};
pub use fixture::{
    MeshFixture, load_fixture, load_packed_json, packed_to_json, parse_fixture, save_packed,
};

/// Install a stderr `tracing` subscriber: info by default, `-v` debug,
/// `-vv` trace.
#[cfg(feature = "cli")]
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
