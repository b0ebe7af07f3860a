//! Descriptor comparison walkthrough
//!
//! Builds a synthetic point cloud with a couple of descriptor arrays, selects a
//! reference point the way a ctrl+click would, compares its descriptor against
//! every point and prints the resulting difference overlay.
//!
//! Run with `RUST_LOG=debug` to see the session's diagnostics.

use anyhow::{Context, Result};
use clap::Parser;
use pointdesc_algorithms::SpacingNormalization;
use pointdesc_core::{DescriptorArray, DescriptorCloud, Point3f, PointCloud, ScalarOverlay, ScalarRange};
use pointdesc_session::{CompareSession, PickEvent, SessionConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compare_descriptors", about = "Compare per-point descriptors against a selected point")]
struct Args {
    /// Number of points in the synthetic cloud
    #[arg(long, default_value_t = 2000)]
    points: usize,

    /// Number of components of the synthetic descriptor
    #[arg(long, default_value_t = 8)]
    components: usize,

    /// Index of the reference point
    #[arg(long, default_value_t = 0)]
    reference: usize,

    /// Array to compare (defaults to the first array)
    #[arg(long)]
    array: Option<String>,

    /// Number of points sampled for the spacing estimate (0 = all)
    #[arg(long)]
    sample_limit: Option<usize>,

    /// Divide the spacing sum by the total point count
    #[arg(long)]
    legacy_spacing: bool,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Session configuration as JSON
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Prints a text histogram instead of coloring a render view
struct HistogramOverlay {
    bins: usize,
}

impl ScalarOverlay for HistogramOverlay {
    fn show_scalars(&mut self, name: &str, values: &[f32], range: ScalarRange) {
        println!("{}: {} values in [{:.4}, {:.4}]", name, values.len(), range.min, range.max);

        let mut counts = vec![0usize; self.bins];
        let span = range.span();
        for value in values {
            let bin = if span > 0.0 {
                (((value - range.min) / span) * self.bins as f32) as usize
            } else {
                0
            };
            counts[bin.min(self.bins - 1)] += 1;
        }

        let widest = counts.iter().copied().max().unwrap_or(0).max(1);
        for (i, count) in counts.iter().enumerate() {
            let lower = range.min + span * i as f32 / self.bins as f32;
            let bar = "#".repeat(count * 50 / widest);
            println!("  {:>10.4} | {:<50} {}", lower, bar, count);
        }
    }
}

/// Points scattered over a wavy sheet, with a descriptor derived from position
/// plus noise and a scalar "height" array
fn synthetic_cloud(count: usize, components: usize, rng: &mut StdRng) -> Result<DescriptorCloud> {
    let mut cloud = PointCloud::with_capacity(count);
    let mut features = Vec::with_capacity(count * components);
    let mut heights = Vec::with_capacity(count);

    for _ in 0..count {
        let x: f32 = rng.gen_range(-5.0..5.0);
        let y: f32 = rng.gen_range(-5.0..5.0);
        let z = (x * 0.8).sin() * (y * 0.6).cos();
        cloud.push(Point3f::new(x, y, z));
        heights.push(z);

        for c in 0..components {
            let frequency = 0.5 + c as f32 * 0.25;
            features.push((x * frequency).cos() + (y * frequency).sin() + rng.gen_range(-0.05..0.05));
        }
    }

    let cloud = DescriptorCloud::new(cloud)
        .with_array(DescriptorArray::new("Features", components, features)?)?
        .with_array(DescriptorArray::scalars("Height", heights))?;
    Ok(cloud)
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(limit) = args.sample_limit {
        config.spacing.sample_limit = limit;
    }
    if args.legacy_spacing {
        config.spacing.normalization = SpacingNormalization::TotalPoints;
    }
    // Demo selections always come from ctrl+click.
    config.require_control_for_selection = true;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let mut session = CompareSession::new(config)?;
    println!("{}", session.help_text());

    let mut rng = StdRng::seed_from_u64(args.seed);
    let cloud = synthetic_cloud(args.points, args.components.max(1), &mut rng)?;
    let names = session.load(cloud);
    println!("Loaded {} points with arrays: {}", session.cloud().len(), names.join(", "));

    if let Some(name) = &args.array {
        session.set_array_to_compare(name)?;
    }

    let spacing = session.average_spacing()?;
    println!("Average point spacing: {:.5}", spacing);
    session.set_marker_radius(spacing * 0.5)?;

    session.handle_pick(PickEvent {
        point_id: Some(args.reference),
        control: true,
        shift: false,
    })?;
    let marker = session.marker();
    println!(
        "Selected point {} at ({:.3}, {:.3}, {:.3}), marker radius {:.4}",
        args.reference, marker.center.x, marker.center.y, marker.center.z, marker.radius
    );

    let report = session.compute_differences()?;
    println!("Compared array '{}'", report.descriptor_name);

    let mut overlay = HistogramOverlay { bins: 10 };
    session.present(&report, &mut overlay);

    Ok(())
}
