use msds_core::ProductIdentifier;
use std::fmt;
use std::path::PathBuf;

/// A user-facing message produced by one paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoImage,
    NoData { product: ProductIdentifier },
    Saved { product: ProductIdentifier, path: PathBuf, rows: usize },
    Failed { message: String },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::NoImage => "Error",
            Notice::NoData { .. } => "No results",
            Notice::Saved { .. } => "Done",
            Notice::Failed { .. } => "Error occurred",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::NoImage | Notice::Failed { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoImage => write!(f, "No image was found to process."),
            Notice::NoData { product } => {
                write!(f, "No chemical ingredient data found (product: {product}).")
            }
            Notice::Saved { product, path, rows } => write!(
                f,
                "Product: {product}\n{rows} ingredient row(s) saved to:\n{}",
                path.display()
            ),
            Notice::Failed { message } => write!(f, "{message}"),
        }
    }
}

/// Shows notices to the user.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Confirmation on stdout, warnings and errors on stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Saved { .. } => println!("{}: {notice}", notice.title()),
            _ => eprintln!("{}: {notice}", notice.title()),
        }
    }
}
