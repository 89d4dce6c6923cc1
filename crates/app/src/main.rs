use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use msds_export::SheetFormat;
use msds_ocr::{backend_from_config, SdsPipeline};
use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt as _, EnvFilter, Layer as _,
};

mod capture;
mod commands;
mod config;
mod notify;

use capture::{CaptureSource, FileCapture, StdinCapture};
use commands::{handle_paste, ExportTarget};
use config::AppConfig;
use notify::{ConsoleNotifier, Notice, Notifier};

/// Turn a captured Safety Data Sheet image into an ingredient sheet.
#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    after_help = r#"
Paste from the clipboard by piping image bytes on stdin:
  wl-paste -t image/png | msds-capture
  xclip -selection clipboard -t image/png -o | msds-capture

Exit status: 0 sheet written, 1 no image or failure, 3 no ingredient rows found.
Set RUST_LOG to change log verbosity.
"#
)]
struct Opts {
    /// Captured image file. Reads image bytes from stdin when omitted or `-`.
    image: Option<PathBuf>,

    /// TOML configuration file.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Path to the tesseract executable.
    #[clap(long)]
    tesseract: Option<PathBuf>,

    /// OCR language(s), e.g. `eng` or `eng+kor`.
    #[clap(long)]
    lang: Option<String>,

    /// Tesseract page segmentation mode.
    #[clap(long)]
    psm: Option<u8>,

    /// Sheet format: xlsx (default), csv or json.
    #[clap(long)]
    format: Option<SheetFormat>,

    /// Write the sheet here instead of the content-addressed default.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Directory for content-addressed sheets.
    #[clap(long)]
    output_dir: Option<PathBuf>,

    /// Print the recognized text to stderr.
    #[clap(long)]
    dump_text: bool,

    /// Read the image straight from the system clipboard.
    #[cfg(feature = "clipboard")]
    #[clap(long, conflicts_with = "image")]
    clipboard: bool,
}

impl Opts {
    /// Command-line values take precedence over the config file.
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(binary) = &self.tesseract {
            config.ocr.binary = binary.clone();
        }
        if let Some(lang) = &self.lang {
            config.ocr.lang = lang.clone();
        }
        if self.psm.is_some() {
            config.ocr.psm = self.psm;
        }
        if let Some(format) = self.format {
            config.export.format = format;
        }
        if let Some(dir) = &self.output_dir {
            config.export.output_dir = Some(dir.clone());
        }
    }

    fn capture_source(&self) -> Box<dyn CaptureSource> {
        #[cfg(feature = "clipboard")]
        if self.clipboard {
            return Box::new(capture::ClipboardCapture);
        }
        match &self.image {
            Some(path) if path.as_os_str() != "-" => Box::new(FileCapture::new(path)),
            _ => Box::new(StdinCapture),
        }
    }
}

fn main() -> ExitCode {
    let directive = Directive::from_str("info").expect("built-in directive should be valid");
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);
    tracing_subscriber::registry().with(subscriber).init();

    let opts = Opts::parse();
    tracing::debug!("Parsed options: {:?}", opts);

    match real_main(&opts) {
        Ok(notice) => exit_code(&notice),
        Err(e) => {
            ConsoleNotifier.notify(&Notice::Failed { message: format!("{e:#}") });
            ExitCode::FAILURE
        }
    }
}

fn real_main(opts: &Opts) -> anyhow::Result<Notice> {
    let mut config = AppConfig::load(opts.config.as_deref())?;
    opts.apply_to(&mut config);

    let pipeline = SdsPipeline::new(backend_from_config(&config.ocr)?);
    let target = ExportTarget {
        format: config.export.format,
        output: opts.output.clone(),
        output_dir: config.output_dir(),
    };

    let mut source = opts.capture_source();
    Ok(handle_paste(
        source.as_mut(),
        &pipeline,
        &target,
        opts.dump_text,
        &ConsoleNotifier,
    ))
}

fn exit_code(notice: &Notice) -> ExitCode {
    match notice {
        Notice::NoData { .. } => ExitCode::from(3),
        n if n.is_error() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
