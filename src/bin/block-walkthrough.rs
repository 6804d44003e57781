//! A binary that walks a block through a realistic interactive session and
//! prints the resulting geometry at each step.
//!
//! ```shell
//! cargo run --bin=block-walkthrough --features=binaries -- "chr17:7,668,402-7,687,550"
//! ```
//!
//! The walkthrough builds a small hg38-like reference, initializes a block
//! with the ruler plus two template tracks on a recording surface, then
//! navigates, zooms in, pans, and zooms back out, printing the visible
//! ranges after every gesture. It doubles as a smoke test of the public
//! API surface and as a demonstration of what a UI adapter would wire up.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use anyhow::bail;
use blockview::Block;
use blockview::Config;
use blockview::Genome;
use blockview::block::Navigate;
use blockview::surface::Recording;
use blockview::surface::SharedSurface;
use blockview::track::Kind;
use blockview::track::Template;
use blockview::view::RegionSpec;
use blockview::view::ViewSpec;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use futures::executor::block_on;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// A position string to navigate to after initialization (e.g.,
    /// `chr17:7,668,402-7,687,550`, `chr17.7674220.C.T`, or a bare
    /// chromosome name).
    position: Option<String>,

    /// The holder width, in pixels.
    #[arg(short, long, default_value_t = 1_280.0)]
    width: f64,

    /// The zoom fold used for the zoom gestures.
    #[arg(short, long, default_value_t = 2)]
    fold: u32,

    #[command(flatten)]
    verbose: Verbosity,
}

/// Builds the small hg38-like reference the walkthrough runs against.
fn reference() -> Result<Genome> {
    let genome = Genome::builder()
        .name("hg38")
        .chromosome("chr1", 248_956_422)
        .chromosome("chr2", 242_193_529)
        .chromosome("chr17", 83_257_441)
        .chromosome("chrX", 156_040_895)
        .chromosome("chrM", 16_569)
        .default_coord("chr17", 7_668_402, 7_687_550)
        .try_build()?;

    Ok(genome)
}

/// Prints the visible ranges of every view under a step heading.
fn report(step: &str, block: &Block) {
    println!("== {step}");

    for range in block.view_ranges() {
        for region in &range.regions {
            println!(
                "   {} {}:{}-{} ({:.0} px at {:.3} bp/px)",
                range.view,
                region.chrom,
                region.start,
                region.stop,
                region.pixel_width,
                range.bp_per_px,
            );
        }
    }

    for index in 0..block.tracks().len() {
        let frame = block.tracks().frame(index);
        println!(
            "   track {:<10} y={:<6} height={}{}",
            block.tracks().track(index).name(),
            frame.y(),
            frame.metrics().height,
            match frame.error() {
                Some(err) => format!(" (error: {err})"),
                None => String::new(),
            }
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    let genome = reference()?;
    let default = genome.default_coord().clone();

    let recording = Rc::new(RefCell::new(Recording::new()));
    let surface: SharedSurface = recording.clone();

    let config = Config::new(args.width)
        .view(ViewSpec::new(vec![RegionSpec::new(
            default.chrom(),
            default.start(),
            default.stop(),
        )]))
        .track(Box::new(Template::new("coverage", Kind::Signal, 40.0)))
        .track(Box::new(Template::new("genes", Kind::Feature, 60.0)));

    block_on(async {
        let mut block = Block::try_new(surface, genome, config).await?;
        let view = block.viewport().first_view();

        report("initialized", &block);

        if let Some(position) = &args.position {
            match block.navigate(position).await? {
                Navigate::Jumped => report(&format!("navigated to {position}"), &block),
                Navigate::NotFound => {
                    bail!("{position} is not a position string; a real UI would fall back to search")
                }
            }
        }

        block.zoom_in(view, args.fold).await?;
        report(&format!("zoomed in {}x", args.fold), &block);

        block.pan_by(view, -120.0).await?;
        report("panned 120 px", &block);

        block.zoom_out(view, args.fold).await?;
        report(&format!("zoomed out {}x", args.fold), &block);

        // Drag the first data track below the second.
        let dragged_past = block.tracks().frame(2).metrics().height + 1.0;
        block.begin_drag(1)?;
        block.drag_by(dragged_past)?;
        block.release_drag()?;
        report("reordered tracks", &block);

        info!(
            layers = recording.borrow().layer_count(),
            size = ?recording.borrow().size(),
            "walkthrough finished"
        );

        Ok(())
    })
}
