//! Demo binary: runs a detection session against the built-in synthetic
//! capture source and passthrough detector, draining rendered frames on the
//! main thread the way a real UI would.

use anyhow::Result;
use clap::Parser;
use lookout::{
    render_channel, AnnotatedFrame, AppConfig, PassthroughFactory, RenderSurface,
    SessionController, SyntheticOpener,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target framerate override
    #[arg(long)]
    framerate: Option<u32>,

    /// Confidence threshold override (0.0 to 1.0)
    #[arg(long)]
    confidence: Option<f32>,

    /// NMS threshold override (0.0 to 1.0)
    #[arg(long)]
    nms: Option<f32>,

    /// How long to run the session, in seconds
    #[arg(long, default_value_t = 5)]
    duration: u64,
}

/// Stand-in for the video widget: counts the frames it is asked to show
struct ConsoleSurface {
    frames_shown: usize,
}

impl RenderSurface for ConsoleSurface {
    fn show_frame(&mut self, frame: AnnotatedFrame) {
        self.frames_shown += 1;
        if !frame.labels.is_empty() {
            println!("frame {}: {}", self.frames_shown, frame.labels.join(", "));
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(framerate) = args.framerate {
        config.session.framerate = framerate;
    }
    if let Some(confidence) = args.confidence {
        config.detector.confidence_threshold = confidence;
    }
    if let Some(nms) = args.nms {
        config.detector.nms_threshold = nms;
    }
    config.validate().map_err(lookout::LookoutError::from)?;

    let (sink, receiver) = render_channel(config.session.render_queue_depth);
    let mut controller = SessionController::new(config.clone(), sink);

    let opener = SyntheticOpener {
        width: config.detector.input_size[0],
        height: config.detector.input_size[1],
    };
    let factory = PassthroughFactory;

    controller.start(&opener, &factory)?;

    let mut surface = ConsoleSurface { frames_shown: 0 };
    let deadline = Instant::now() + Duration::from_secs(args.duration);
    while Instant::now() < deadline {
        if let Some(frame) = receiver.recv_timeout(Duration::from_millis(50)) {
            surface.show_frame(frame);
        }
        receiver.drain_into(&mut surface);
    }

    let summary = controller.stop();
    receiver.drain_into(&mut surface);

    if let Some(summary) = summary {
        println!(
            "session finished: {} ticks, {} frames forwarded, {} skipped, {} dropped, ~{:.1} fps",
            summary.ticks,
            summary.frames_forwarded,
            summary.frames_skipped,
            summary.frames_dropped,
            summary.fps_estimate
        );
    }
    println!("frames shown: {}", surface.frames_shown);

    Ok(())
}
