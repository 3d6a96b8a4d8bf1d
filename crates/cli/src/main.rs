use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Serialize;

use facetrack_core::pipeline::track_face_use_case::{
    FaceObservation, ProgressFn, TrackFaceUseCase,
};
use facetrack_core::shared::constants::{
    DEFAULT_LEARNING_RATE, DEFAULT_MIN_SCORE, DEFAULT_SEARCH_MARGIN,
};
use facetrack_core::shared::rect::FrameRect;
use facetrack_core::tracking::domain::placement::Placement;
use facetrack_core::tracking::domain::tracked_face::TrackedFace;
use facetrack_core::tracking::domain::tracking_state::TrackingState;
use facetrack_core::tracking::infrastructure::template_tracker::{
    TemplateTracker, TemplateTrackerConfig,
};
use facetrack_core::video::domain::frame_source::FrameSource;
use facetrack_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;

/// Track one face through a sequence of images.
///
/// Prints one JSON object per frame with the face box in source-image pixels.
#[derive(Parser)]
#[command(name = "facetrack")]
struct Cli {
    /// Image files in playback order, or a single directory of images.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Face box on the first frame, in source pixels: left,top,right,bottom.
    #[arg(long, value_delimiter = ',', required = true)]
    bounds: Vec<i64>,

    /// Downscale factor between the source frames and the tracker's working image.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Origin of the working image inside the downscaled frame: x,y.
    #[arg(long, value_delimiter = ',')]
    offset: Option<Vec<i32>>,

    /// Size of the working image: width,height (default: rest of the frame).
    #[arg(long, value_delimiter = ',')]
    working_size: Option<Vec<u32>>,

    /// Search radius around the last position, as a fraction of the box size.
    #[arg(long, default_value_t = DEFAULT_SEARCH_MARGIN)]
    search_margin: f64,

    /// Minimum match score (-1.0 to 1.0) to accept a new position.
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    min_score: f32,

    /// Template adaptation rate (0.0 = fixed template, 1.0 = replace each frame).
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
    learning_rate: f32,

    /// Print frame progress to stderr.
    #[arg(long)]
    progress: bool,
}

#[derive(Serialize)]
struct FrameRecord {
    frame: usize,
    state: &'static str,
    tracked: bool,
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl From<&FaceObservation> for FrameRecord {
    fn from(obs: &FaceObservation) -> Self {
        Self {
            frame: obs.frame_index,
            state: obs.state.as_str(),
            tracked: obs.state == TrackingState::Tracking,
            left: obs.frame_bounds.left,
            top: obs.frame_bounds.top,
            right: obs.frame_bounds.right,
            bottom: obs.frame_bounds.bottom,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let source = build_source(&cli)?;
    let face = build_face(&cli)?;
    let working_size = cli.working_size.as_deref().map(|s| (s[0], s[1]));

    let total = source.len();
    let progress: Option<ProgressFn> = if cli.progress {
        Some(Box::new(move |current: usize, _total: usize| {
            eprint!("\rTracking frame {current}/{total}");
            true
        }))
    } else {
        None
    };

    let mut use_case = TrackFaceUseCase::new(source, face, working_size, progress);
    let observations = use_case.execute()?;
    if cli.progress {
        eprintln!();
    }

    for obs in &observations {
        println!("{}", serde_json::to_string(&FrameRecord::from(obs))?);
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.bounds.len() != 4 {
        return Err("--bounds takes exactly four values: left,top,right,bottom".into());
    }
    if cli.bounds[0] >= cli.bounds[2] || cli.bounds[1] >= cli.bounds[3] {
        return Err("--bounds must have left < right and top < bottom".into());
    }
    if cli.offset.as_ref().is_some_and(|o| o.len() != 2) {
        return Err("--offset takes exactly two values: x,y".into());
    }
    if cli.working_size.as_ref().is_some_and(|s| s.len() != 2) {
        return Err("--working-size takes exactly two values: width,height".into());
    }
    if !(0.0..=1.0).contains(&cli.learning_rate) {
        return Err("--learning-rate must be between 0.0 and 1.0".into());
    }
    if !(cli.search_margin.is_finite() && cli.search_margin >= 0.0) {
        return Err("--search-margin must be a finite, non-negative number".into());
    }
    if cli.min_score.is_nan() {
        return Err("--min-score must be a number".into());
    }
    Ok(())
}

fn build_source(cli: &Cli) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    let reader = match cli.inputs.as_slice() {
        [dir] if dir.is_dir() => ImageSequenceReader::from_directory(dir)?,
        paths => ImageSequenceReader::new(paths.to_vec()),
    };
    if reader.is_empty() {
        return Err("no input images found".into());
    }
    log::info!("Tracking through {} frames", reader.len());
    Ok(Box::new(reader))
}

fn build_face(cli: &Cli) -> Result<TrackedFace, Box<dyn std::error::Error>> {
    let (ox, oy) = cli.offset.as_deref().map_or((0, 0), |o| (o[0], o[1]));
    let placement = Placement::new(ox, oy, cli.scale)?;
    let frame_rect = FrameRect::new(cli.bounds[0], cli.bounds[1], cli.bounds[2], cli.bounds[3]);
    let bounds = placement.to_tracker_space(&frame_rect);
    log::debug!("Initial box {frame_rect} maps to {bounds} in the working image");

    let tracker = TemplateTracker::new(TemplateTrackerConfig {
        search_margin: cli.search_margin,
        min_score: cli.min_score,
        learning_rate: cli.learning_rate,
    });
    Ok(TrackedFace::with_region(Box::new(tracker), bounds, placement))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("facetrack").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--bounds", "1,2,3,4", "a.png"]);
        assert_eq!(cli.bounds, vec![1, 2, 3, 4]);
        assert_eq!(cli.scale, 1.0);
        assert!(cli.offset.is_none());
        assert_eq!(cli.min_score, DEFAULT_MIN_SCORE);
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_bounds_require_four_values() {
        let cli = parse(&["--bounds", "1,2,3", "a.png"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let cli = parse(&["--bounds", "10,2,3,4", "a.png"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_offset_requires_two_values() {
        let cli = parse(&["--bounds", "1,2,3,4", "--offset", "1", "a.png"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_search_margin_must_be_finite() {
        for margin in ["inf", "1e400", "NaN", "-0.5"] {
            let arg = format!("--search-margin={margin}");
            let cli = parse(&["--bounds", "1,2,3,4", &arg, "a.png"]);
            assert!(validate(&cli).is_err(), "margin {margin}");
        }
        let cli = parse(&["--bounds", "1,2,3,4", "--search-margin", "1e30", "a.png"]);
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_nan_min_score_rejected() {
        let cli = parse(&["--bounds", "1,2,3,4", "--min-score=NaN", "a.png"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_inputs_required() {
        assert!(Cli::try_parse_from(["facetrack", "--bounds", "1,2,3,4"]).is_err());
    }

    #[test]
    fn test_build_face_maps_bounds_into_working_image() {
        let cli = parse(&[
            "--bounds", "30,50,230,450", "--scale", "2", "--offset", "5,5", "a.png",
        ]);
        let face = build_face(&cli).unwrap();
        assert_eq!(face.bounds().left, 10);
        assert_eq!(face.bounds().bottom, 220);
        assert_eq!(face.frame_bounds(), FrameRect::new(30, 50, 230, 450));
    }

    #[test]
    fn test_build_face_rejects_zero_scale() {
        let cli = parse(&["--bounds", "1,2,3,4", "--scale", "0", "a.png"]);
        assert!(build_face(&cli).is_err());
    }

    #[test]
    fn test_record_from_observation() {
        let obs = FaceObservation {
            frame_index: 3,
            state: TrackingState::Lost,
            tracker_bounds: Default::default(),
            frame_bounds: FrameRect::new(1, 2, 3, 4),
        };
        let json = serde_json::to_string(&FrameRecord::from(&obs)).unwrap();
        assert_eq!(
            json,
            r#"{"frame":3,"state":"lost","tracked":false,"left":1,"top":2,"right":3,"bottom":4}"#
        );
    }
}
