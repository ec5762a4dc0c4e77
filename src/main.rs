//! # Placa CLI
//!
//! Command-line interface for the nameplate label designer.
//!
//! ## Usage
//!
//! ```bash
//! # Render a quick preview with two lines
//! placa preview --line "JOHN DOE" --line "SITE MANAGER" --out plate.png
//!
//! # Render a saved template file
//! placa preview --template nameplate.json --out plate.png
//!
//! # Render a submission file to a summary PDF
//! placa summary submission.json --out summary.pdf
//!
//! # Run the HTTP API
//! placa serve --listen 0.0.0.0:8080 --webhook-url https://hooks.example.com/labels
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use placa::{
    preview::{render_plate_png, PreviewOptions, Typeface},
    server::{self, ServerConfig},
    submission::{render_submission_summary, SubmissionRequest},
    template::{CornerStyle, LabelTemplate, LineSpec, DEFAULT_SIZE_PT},
    PlacaError,
};

/// Placa - Nameplate label designer utility
#[derive(Parser, Debug)]
#[command(name = "placa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one template as a PNG preview
    Preview {
        /// Template JSON file (flags below are ignored when given)
        #[arg(long, value_name = "FILE")]
        template: Option<PathBuf>,

        /// Line of plate text (repeat for multiple lines)
        #[arg(long = "line", value_name = "TEXT")]
        lines: Vec<String>,

        /// Plate width in inches
        #[arg(long, default_value = "5.0")]
        width: f32,

        /// Plate height in inches
        #[arg(long, default_value = "1.5")]
        height: f32,

        /// Palette name, e.g. "Green/White"
        #[arg(long, default_value = "Green/White")]
        colors: String,

        /// Round the plate corners
        #[arg(long)]
        rounded: bool,

        /// Available width in px the preview fits into
        #[arg(long, default_value = "576")]
        avail_width: f32,

        /// Device pixel ratio
        #[arg(long, default_value = "1")]
        dpr: f32,

        /// TTF font for the preview (built-in bitmap faces by default)
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Output PNG file
        #[arg(long, default_value = "preview.png")]
        out: PathBuf,
    },

    /// Render a submission file as a summary PDF
    Summary {
        /// Submission JSON file ({referenceId, contact, savedTemplates})
        file: PathBuf,

        /// TTF font for the thumbnails (built-in bitmap faces by default)
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Output PDF file
        #[arg(long, default_value = "summary.pdf")]
        out: PathBuf,
    },

    /// Run the HTTP API server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Webhook URL submissions are forwarded to
        #[arg(long, value_name = "URL")]
        webhook_url: Option<String>,

        /// Directory where summary PDFs are stored
        #[arg(long, default_value = "./storage", value_name = "DIR")]
        storage_dir: PathBuf,

        /// Public base URL under which stored summaries are served
        #[arg(long, default_value = "http://localhost:8080/files", value_name = "URL")]
        public_base_url: String,

        /// Allowed CORS origin (repeat for multiple; none allows any)
        #[arg(long = "allow-origin", value_name = "ORIGIN")]
        allowed_origins: Vec<String>,

        /// TTF font for previews (built-in bitmap faces by default)
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PlacaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            template,
            lines,
            width,
            height,
            colors,
            rounded,
            avail_width,
            dpr,
            font,
            out,
        } => {
            let template = load_template(template.as_deref(), &lines, width, height, &colors, rounded)?;
            template.validate()?;

            let typeface = load_typeface(font.as_deref())?;
            let options = PreviewOptions {
                avail_width,
                device_pixel_ratio: dpr,
            };

            let png = render_plate_png(&template, &typeface, &options)?;
            std::fs::write(&out, &png)?;
            println!("Saved preview to {} ({} bytes)", out.display(), png.len());
        }

        Commands::Summary { file, font, out } => {
            let text = std::fs::read_to_string(&file)?;
            let request: SubmissionRequest = serde_json::from_str(&text)
                .map_err(|e| PlacaError::Validation(format!("Invalid submission JSON: {}", e)))?;

            let typeface = load_typeface(font.as_deref())?;

            println!(
                "Rendering summary for {} template(s)...",
                request.templates.len()
            );
            let pdf = render_submission_summary(&request, &typeface)?;
            std::fs::write(&out, &pdf)?;
            println!("Saved summary to {} ({} bytes)", out.display(), pdf.len());
        }

        Commands::Serve {
            listen,
            webhook_url,
            storage_dir,
            public_base_url,
            allowed_origins,
            font,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                webhook_url,
                storage_dir,
                public_base_url,
                allowed_origins,
                font_path: font,
            };

            let runtime = tokio::runtime::Runtime::new()
                .map_err(|e| PlacaError::Server(format!("Failed to start runtime: {}", e)))?;
            runtime.block_on(server::serve(config))?;
        }
    }

    Ok(())
}

/// Build the template to preview, from a file or from the line flags.
fn load_template(
    path: Option<&Path>,
    lines: &[String],
    width: f32,
    height: f32,
    colors: &str,
    rounded: bool,
) -> Result<LabelTemplate, PlacaError> {
    if let Some(path) = path {
        let text = std::fs::read_to_string(path)?;
        let template: LabelTemplate = serde_json::from_str(&text)
            .map_err(|e| PlacaError::Validation(format!("Invalid template JSON: {}", e)))?;
        return Ok(template.clamped());
    }

    let line_specs = if lines.is_empty() {
        vec![LineSpec::new("YOUR NAME", DEFAULT_SIZE_PT)]
    } else {
        lines
            .iter()
            .map(|text| LineSpec::new(text.clone(), DEFAULT_SIZE_PT))
            .collect()
    };

    let template = LabelTemplate {
        height_in: height,
        width_in: width,
        color_name: Some(colors.to_string()),
        bg: None,
        fg: None,
        corners: if rounded {
            CornerStyle::Rounded
        } else {
            CornerStyle::Squared
        },
        lines: line_specs,
        ..LabelTemplate::default()
    };
    Ok(template.clamped())
}

fn load_typeface(font: Option<&Path>) -> Result<Typeface, PlacaError> {
    match font {
        Some(path) => Typeface::load_ttf(path),
        None => Ok(Typeface::builtin()),
    }
}
