use std::path::{Path, PathBuf};

use canvas::transform::{TiltPreset, TransformOp};
use clap::{Args, Parser, Subcommand};
use diary::config::{ClientConfig, ConfigError};
use diary::date_cursor::DateCursor;
use diary::gateway::{DiaryApi, GatewayError, HttpGateway, ImageUpload, image_url};
use diary::{DateKey, DiaryEntry, ImageRecord};
use serde_json::{Value, json};
use tracing::info;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("request failed [{code}]: {0}", code = .0.error_code())]
    Gateway(#[from] GatewayError),
    #[error("cannot read `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("no image `{filename}` on {date}")]
    ImageNotFound { filename: String, date: DateKey },
    #[error("unknown tilt preset `{0}`; expected flat, lean-left, lean-right, tip-forward or tip-back")]
    UnknownPreset(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "diary-cli", about = "Diary API command-line client")]
struct Cli {
    /// Server origin; overrides `DIARY_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Raw `Cookie` header; overrides `DIARY_SESSION_COOKIE`.
    #[arg(long)]
    session_cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Entry(EntryCommand),
    Image(ImageCommand),
}

#[derive(Args, Debug)]
struct EntryCommand {
    #[command(subcommand)]
    command: EntrySubcommand,
}

#[derive(Subcommand, Debug)]
enum EntrySubcommand {
    /// Print one day's text and images. Defaults to today.
    Show { date: Option<DateKey> },
    /// Overwrite one day's text.
    Save {
        date: DateKey,
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        #[arg(long, help = "Read the text from this file")]
        file: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ImageCommand {
    #[command(subcommand)]
    command: ImageSubcommand,
}

#[derive(Subcommand, Debug)]
enum ImageSubcommand {
    /// Attach a photo to a day.
    Upload {
        date: DateKey,
        path: PathBuf,
        #[arg(long, default_value = "")]
        caption: String,
    },
    /// Edit an image's placement and push the full record.
    Transform(TransformArgs),
    /// Remove an image. Already-deleted images succeed.
    Delete { filename: String },
}

#[derive(Args, Debug)]
struct TransformArgs {
    date: DateKey,
    filename: String,

    #[arg(long, help = "Return to rotation 0, scale 1, no tilt (applied first)")]
    reset: bool,

    #[arg(long, help = "Zero both tilt axes")]
    reset_tilt: bool,

    #[arg(long, help = "flat, lean-left, lean-right, tip-forward or tip-back")]
    preset: Option<String>,

    #[arg(long, allow_hyphen_values = true, help = "Rotate by degrees")]
    rotate: Option<f64>,

    #[arg(long, help = "Multiply the scale by this factor")]
    scale: Option<f64>,

    #[arg(long, allow_hyphen_values = true, help = "Add horizontal tilt in degrees")]
    tilt_x: Option<f64>,

    #[arg(long, allow_hyphen_values = true, help = "Add vertical tilt in degrees")]
    tilt_y: Option<f64>,

    #[arg(long, allow_hyphen_values = true, help = "Absolute left offset in pixels")]
    x: Option<f64>,

    #[arg(long, allow_hyphen_values = true, help = "Absolute top offset in pixels")]
    y: Option<f64>,

    #[arg(long)]
    caption: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url)?;
    }
    if cli.session_cookie.is_some() {
        config.session_cookie = cli.session_cookie;
    }
    let gateway = HttpGateway::from_config(&config)?;

    match cli.command {
        Command::Entry(entry) => run_entry(&gateway, entry).await,
        Command::Image(image) => run_image(&gateway, image).await,
    }
}

async fn run_entry(gw: &HttpGateway, entry: EntryCommand) -> Result<(), CliError> {
    match entry.command {
        EntrySubcommand::Show { date } => {
            let date = date.unwrap_or_else(|| DateCursor::today().current());
            let entry = gw.fetch_entry(date).await?;
            print_json(&entry_json(gw.base_url(), &entry))
        }
        EntrySubcommand::Save { date, text, file } => {
            let content = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_text(&path)?,
                (None, None) => String::new(),
            };
            gw.save_text(date, &content).await?;
            info!(%date, "entry saved");
            print_json(&json!({ "date": date, "saved": true }))
        }
    }
}

async fn run_image(gw: &HttpGateway, image: ImageCommand) -> Result<(), CliError> {
    match image.command {
        ImageSubcommand::Upload { date, path, caption } => {
            let bytes = std::fs::read(&path).map_err(|source| CliError::Io { path: path.clone(), source })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let record = gw.upload_image(date, ImageUpload::new(file_name, bytes), &caption).await?;
            print_json(&image_json(gw.base_url(), &record))
        }
        ImageSubcommand::Transform(args) => {
            let record = transform_image(gw, args).await?;
            print_json(&image_json(gw.base_url(), &record))
        }
        ImageSubcommand::Delete { filename } => {
            gw.delete_image(&filename).await?;
            print_json(&json!({ "filename": filename, "deleted": true }))
        }
    }
}

async fn transform_image(gw: &HttpGateway, args: TransformArgs) -> Result<ImageRecord, CliError> {
    let ops = transform_ops(&args)?;
    let entry = gw.fetch_entry(args.date).await?;
    let Some(mut record) = entry.images.into_iter().find(|img| img.filename == args.filename) else {
        return Err(CliError::ImageNotFound { filename: args.filename, date: args.date });
    };

    record.normalize();
    let mut t = record.transform();
    for op in ops {
        t.apply(op);
    }
    record.set_transform(t);
    if let Some(x) = args.x {
        record.position_x = x;
    }
    if let Some(y) = args.y {
        record.position_y = y;
    }
    if let Some(caption) = args.caption {
        record.caption = caption;
    }

    gw.update_image(&record.to_update()).await?;
    info!(date = %args.date, filename = %record.filename, "image updated");
    Ok(record)
}

/// Flags in a fixed order: resets, preset, then relative edits.
fn transform_ops(args: &TransformArgs) -> Result<Vec<TransformOp>, CliError> {
    let mut ops = Vec::new();
    if args.reset {
        ops.push(TransformOp::ResetAll);
    }
    if args.reset_tilt {
        ops.push(TransformOp::ResetTilt);
    }
    if let Some(name) = &args.preset {
        let preset = TiltPreset::from_name(name).ok_or_else(|| CliError::UnknownPreset(name.clone()))?;
        ops.push(TransformOp::Preset(preset));
    }
    if let Some(deg) = args.rotate {
        ops.push(TransformOp::RotateBy(deg));
    }
    if let Some(factor) = args.scale {
        ops.push(TransformOp::ScaleBy(factor));
    }
    if args.tilt_x.is_some() || args.tilt_y.is_some() {
        ops.push(TransformOp::TiltBy { dx: args.tilt_x.unwrap_or(0.0), dy: args.tilt_y.unwrap_or(0.0) });
    }
    Ok(ops)
}

fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_owned(), source })
}

fn entry_json(base_url: &str, entry: &DiaryEntry) -> Value {
    let images: Vec<Value> = entry.images.iter().map(|img| image_json(base_url, img)).collect();
    json!({
        "date": entry.date,
        "label": entry.date.label(),
        "content": entry.content,
        "images": images,
    })
}

fn image_json(base_url: &str, record: &ImageRecord) -> Value {
    json!({
        "filename": record.filename,
        "url": image_url(base_url, &record.filename),
        "caption": record.caption,
        "position_x": record.position_x,
        "position_y": record.position_y,
        "rotation": record.rotation,
        "scale": record.scale,
        "tilt_x": record.tilt_x,
        "tilt_y": record.tilt_y,
        "z_index": record.z_index,
        "css_transform": record.transform().css(),
    })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
