use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use healthdash_core::ai::{self, ImageSize, VideoAspect};
use healthdash_core::{AppState, DataUrl};
use tracing::info;

use super::ai::client;
use super::{block_on, CliResult};

#[derive(Subcommand)]
pub enum ImageAction {
    /// Generate a square image from a prompt
    Generate {
        prompt: String,
        /// 1K, 2K or 4K
        #[arg(long, default_value = "1K")]
        size: ImageSize,
        /// Write the decoded image here instead of printing a data URL
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Edit an existing image
    Edit {
        /// Source image (png, jpg, webp or gif)
        input: PathBuf,
        prompt: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Aspect {
    /// 16:9
    Landscape,
    /// 9:16
    Portrait,
}

impl From<Aspect> for VideoAspect {
    fn from(aspect: Aspect) -> Self {
        match aspect {
            Aspect::Landscape => VideoAspect::Landscape,
            Aspect::Portrait => VideoAspect::Portrait,
        }
    }
}

#[derive(Args)]
pub struct VideoArgs {
    pub prompt: String,
    #[arg(long, value_enum, default_value = "landscape")]
    pub aspect: Aspect,
    /// Optional first frame
    #[arg(long)]
    pub start_frame: Option<PathBuf>,
    /// Output file
    #[arg(long, default_value = "healthdash-video.mp4")]
    pub out: PathBuf,
}

fn write_image(image: Option<&Option<DataUrl>>, out: Option<PathBuf>, missing: &str) -> CliResult {
    let Some(Some(image)) = image else {
        return Err(missing.into());
    };
    match out {
        Some(path) => {
            std::fs::write(&path, image.decode()?)?;
            println!("{}", path.display());
        }
        None => println!("{image}"),
    }
    Ok(())
}

pub fn image(action: ImageAction) -> CliResult {
    let (config, client) = client()?;
    let mut app = AppState::new(&config);
    match action {
        ImageAction::Generate { prompt, size, out } => {
            let outcome = block_on(ai::generate_image(&client, &config.ai, &prompt, size))?;
            let ticket = app.views.image.begin();
            app.views.image.resolve(ticket, outcome);
            if let Some(message) = app.views.image.error() {
                return Err(message.to_string().into());
            }
            write_image(app.views.image.data(), out, "Failed to generate image.")
        }
        ImageAction::Edit { input, prompt, out } => {
            let source = DataUrl::from_file(&input, config.media.max_upload_bytes)?;
            let outcome = block_on(ai::edit_image(&client, &config.ai, &prompt, &source))?;
            let ticket = app.views.image.begin();
            app.views.image.resolve(ticket, outcome);
            if app.views.image.error().is_some() {
                return Err("Error editing image.".into());
            }
            write_image(app.views.image.data(), out, "Failed to edit image.")
        }
    }
}

pub fn video(args: VideoArgs) -> CliResult {
    let (config, client) = client()?;
    let start_frame = args
        .start_frame
        .as_deref()
        .map(|path| DataUrl::from_file(path, config.media.max_upload_bytes))
        .transpose()?;
    info!(aspect = ?args.aspect, "generating video, this can take a few minutes");
    let outcome = block_on(ai::generate_video(
        &client,
        &config.ai,
        &args.prompt,
        args.aspect.into(),
        start_frame.as_ref(),
    ))?;

    let mut app = AppState::new(&config);
    let ticket = app.views.video.begin();
    app.views.video.resolve(ticket, outcome);
    if let Some(message) = app.views.video.error() {
        return Err(message.to_string().into());
    }
    if let Some(clip) = app.views.video.data() {
        std::fs::write(&args.out, &clip.bytes)?;
        println!("{} ({}, {} bytes)", args.out.display(), clip.mime_type, clip.bytes.len());
    }
    Ok(())
}
