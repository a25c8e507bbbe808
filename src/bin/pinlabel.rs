use clap::Parser;
use std::path::PathBuf;

use bytesize::ByteSize;
use pin_label::io::{load_rgba, save_png};
use pin_label::sample_map::generate_sample_map;
use pin_label::{AnnotateConfig, Error, LabelRequest, Point, RouteMode, annotate};

#[derive(Parser, Debug)]
#[command(
    name = "pinlabel",
    about = "Label a map screenshot and connect the label to its red pin",
    version
)]
struct Cli {
    /// Map image to annotate
    #[arg(short = 'i', long = "input", required_unless_present = "sample")]
    input: Option<PathBuf>,

    /// Where to write the annotated PNG
    #[arg(short = 'o', long = "output", default_value = "processed_map_auto.png")]
    output: PathBuf,

    /// Label text
    #[arg(short = 't', long = "text", default_value = "建築現場")]
    text: String,

    /// Label center x (pixels); needs --y
    #[arg(long = "x", requires = "y", allow_negative_numbers = true)]
    x: Option<i32>,

    /// Label center y (pixels); needs --x
    #[arg(long = "y", requires = "x", allow_negative_numbers = true)]
    y: Option<i32>,

    /// Connector routing
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = RouteMode::Auto)]
    mode: RouteMode,

    /// Preferred font file; the bundled font is used if it cannot be read
    #[arg(long = "font")]
    font: Option<PathBuf>,

    /// JSON config overriding marker, scoring and label defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write a synthetic sample map to this path and exit
    #[arg(long = "sample", conflicts_with = "input")]
    sample: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Some(path) = &cli.sample {
        let (map, tip) = generate_sample_map(640, 480);
        let written = save_png(&map, path)?;
        println!(
            "wrote {} ({}, pin tip at {tip})",
            path.display(),
            ByteSize::b(written as u64)
        );
        return Ok(());
    }

    let Some(input) = &cli.input else {
        return Err(Error::InvalidArgument("--input is required".to_string()).into());
    };

    let mut config = match &cli.config {
        Some(path) => AnnotateConfig::from_path(path)?,
        None => AnnotateConfig::default(),
    };
    if let Some(font) = &cli.font {
        config.label.font_path = Some(font.clone());
    }

    let mut image = load_rgba(input)?;
    let target = cli.x.zip(cli.y).map(|(x, y)| Point::new(x, y));
    let request = LabelRequest::new(target, cli.text.clone(), cli.mode);
    let annotation = annotate(&mut image, &request, &config);

    for scored in &annotation.scores {
        eprintln!("  {:<16} score {:.3}", scored.route.kind, scored.score);
    }
    eprintln!(
        "pin {} -> {} route from label at ({}, {})",
        annotation.pin,
        annotation.route.kind,
        annotation.label_box.left,
        annotation.label_box.top
    );

    let written = save_png(&image, &cli.output)?;
    println!(
        "wrote {} ({})",
        cli.output.display(),
        ByteSize::b(written as u64)
    );
    Ok(())
}
