use clap::Parser;
use pixelops::io::{load_image, OutputDir};
use pixelops::{
    blur, crop, gradient_edges, hue_shift, manual_copy, match_template_with, multi_stage_edges,
    pad, pyramid_scale, resize, rotate, to_grayscale, to_hsv, ImageInfo, MatchConfig,
    OwnedImage, ScaleDirection,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "pixelops CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Print the input image information report before processing.
    #[arg(long)]
    info: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

fn default_threshold() -> f32 {
    MatchConfig::default().threshold
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Operation {
    Pad {
        #[serde(default)]
        border: usize,
    },
    Crop {
        #[serde(default)]
        x0: usize,
        #[serde(default)]
        x1: usize,
        #[serde(default)]
        y0: usize,
        #[serde(default)]
        y1: usize,
    },
    Resize {
        width: usize,
        height: usize,
    },
    ManualCopy,
    Grayscale,
    Hsv,
    HueShift {
        #[serde(default)]
        delta: i32,
    },
    Blur,
    Rotate {
        angle_deg: i32,
    },
    GradientEdges,
    MultiStageEdges {
        #[serde(default = "default_low")]
        low: f32,
        #[serde(default = "default_high")]
        high: f32,
    },
    Pyramid {
        #[serde(default = "default_factor")]
        factor: usize,
        direction: String,
    },
    MatchTemplate {
        #[serde(default = "default_threshold")]
        threshold: f32,
    },
}

fn default_low() -> f32 {
    50.0
}

fn default_high() -> f32 {
    50.0
}

fn default_factor() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    template_path: Option<String>,
    output_dir: String,
    operations: Vec<Operation>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            template_path: None,
            output_dir: "output".to_string(),
            operations: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct InfoRecord {
    height: usize,
    width: usize,
    channels: usize,
    size: usize,
    dtype: &'static str,
}

impl From<ImageInfo> for InfoRecord {
    fn from(value: ImageInfo) -> Self {
        Self {
            height: value.height,
            width: value.width,
            channels: value.channels,
            size: value.size,
            dtype: value.dtype,
        }
    }
}

#[derive(Debug, Serialize)]
struct OutputRecord {
    path: String,
    info: InfoRecord,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    score: f32,
}

#[derive(Debug, Serialize)]
struct Report {
    input: InfoRecord,
    outputs: Vec<OutputRecord>,
    matches: Vec<MatchRecord>,
}

/// Runs one operation and returns the file name and image to write.
fn run_operation(
    op: &Operation,
    image: &OwnedImage,
    template: Option<&OwnedImage>,
    matches: &mut Vec<MatchRecord>,
) -> Result<(String, OwnedImage), Box<dyn std::error::Error>> {
    let result = match op {
        Operation::Pad { border } => (format!("padded_{border}.png"), pad(image, *border)?),
        Operation::Crop { x0, x1, y0, y1 } => (
            format!("cropped_{x0}_{x1}_{y0}_{y1}.png"),
            crop(image, *x0, *x1, *y0, *y1)?,
        ),
        Operation::Resize { width, height } => (
            format!("resized_{width}x{height}.png"),
            resize(image, *width, *height)?,
        ),
        Operation::ManualCopy => {
            let mut dst = OwnedImage::zeros(image.width(), image.height(), image.layout())?;
            manual_copy(image, &mut dst)?;
            ("copied.png".to_string(), dst)
        }
        Operation::Grayscale => ("grayscale.png".to_string(), to_grayscale(image)?),
        Operation::Hsv => ("hsv.png".to_string(), to_hsv(image)?),
        Operation::HueShift { delta } => {
            let mut dst = OwnedImage::zeros(image.width(), image.height(), image.layout())?;
            hue_shift(image, &mut dst, *delta)?;
            (format!("hue_shifted_{delta}.png"), dst)
        }
        Operation::Blur => ("smoothed.png".to_string(), blur(image)?),
        Operation::Rotate { angle_deg } => {
            (format!("rotated_{angle_deg}.png"), rotate(image, *angle_deg)?)
        }
        Operation::GradientEdges => ("gradient_edges.png".to_string(), gradient_edges(image)?),
        Operation::MultiStageEdges { low, high } => (
            format!("multi_stage_edges_{low}_{high}.png"),
            multi_stage_edges(image, *low, *high)?,
        ),
        Operation::Pyramid { factor, direction } => {
            let direction: ScaleDirection = direction.parse()?;
            (
                format!("pyramid_{direction}_{factor}.png"),
                pyramid_scale(image, *factor, direction)?,
            )
        }
        Operation::MatchTemplate { threshold } => {
            let template = template.ok_or("match_template requires template_path")?;
            let cfg = MatchConfig {
                threshold: *threshold,
                ..MatchConfig::default()
            };
            let found = match_template_with(image, template, &cfg)?;
            matches.extend(found.matches.iter().map(|m| MatchRecord {
                x: m.x,
                y: m.y,
                width: m.width,
                height: m.height,
                score: m.score,
            }));
            ("template_match.png".to_string(), found.rendered)
        }
    };
    Ok(result)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("pixelops=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }

    let image = load_image(&config.image_path)?;
    if cli.info {
        println!("{}", image.info());
    }
    let template = config.template_path.as_deref().map(load_image).transpose()?;
    let output_dir = OutputDir::create(&config.output_dir)?;

    let mut outputs = Vec::with_capacity(config.operations.len());
    let mut matches = Vec::new();
    for op in &config.operations {
        let (name, result) = run_operation(op, &image, template.as_ref(), &mut matches)?;
        let path = output_dir.save(&result, &name)?;
        info!(path = %path.display(), "wrote result");
        outputs.push(OutputRecord {
            path: path.display().to_string(),
            info: result.info().into(),
        });
    }

    let report = Report {
        input: image.info().into(),
        outputs,
        matches,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
