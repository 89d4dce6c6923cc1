use msds_core::ProductIdentifier;
use msds_export::{export_to_path, ExportError, SheetFormat};
use msds_ocr::{export_path, OcrBackend, PipelineError, SdsPipeline};
use std::path::PathBuf;
use thiserror::Error;

use crate::capture::{CaptureError, CaptureSource};
use crate::notify::{Notice, Notifier};

#[derive(Debug, Error)]
pub enum PasteError {
    #[error("No image available")]
    NoImage,
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Failed to write sheet: {0}")]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    Saved { product: ProductIdentifier, path: PathBuf, rows: usize },
    NoData { product: ProductIdentifier },
}

/// Where and how the sheet is written.
#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub format: SheetFormat,
    /// Explicit output file. When unset the file is named after the capture digest.
    pub output: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl ExportTarget {
    fn path_for(&self, hash_hex: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| export_path(&self.output_dir, hash_hex, self.format.extension()))
    }
}

/// One paste: capture → pipeline → sheet.
pub fn paste<R: OcrBackend>(
    source: &mut dyn CaptureSource,
    pipeline: &SdsPipeline<R>,
    target: &ExportTarget,
    dump_text: bool,
) -> Result<PasteOutcome, PasteError> {
    let bytes = source.capture()?.ok_or(PasteError::NoImage)?;

    let result = pipeline.process_bytes(&bytes)?;
    if dump_text {
        eprintln!("{}", result.ocr_text.as_str());
    }

    let records = result.records;
    if records.is_empty() {
        tracing::warn!(product = %records.product, "no ingredient rows recognized");
        return Ok(PasteOutcome::NoData { product: records.product });
    }

    let path = target.path_for(&result.hash_hex);
    export_to_path(&records, &path, target.format)?;

    Ok(PasteOutcome::Saved {
        rows: records.len(),
        product: records.product,
        path,
    })
}

/// Runs [`paste`] and turns whatever it returns into exactly one notice.
/// Nothing below this point renders errors to the user.
pub fn handle_paste<R: OcrBackend>(
    source: &mut dyn CaptureSource,
    pipeline: &SdsPipeline<R>,
    target: &ExportTarget,
    dump_text: bool,
    notifier: &dyn Notifier,
) -> Notice {
    let notice = match paste(source, pipeline, target, dump_text) {
        Ok(PasteOutcome::Saved { product, path, rows }) => Notice::Saved { product, path, rows },
        Ok(PasteOutcome::NoData { product }) => Notice::NoData { product },
        Err(PasteError::NoImage) => Notice::NoImage,
        Err(e) => {
            tracing::warn!("paste failed: {e}");
            Notice::Failed { message: e.to_string() }
        }
    };
    notifier.notify(&notice);
    notice
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use msds_core::IngredientRow;
    use msds_ocr::{MockRecognizer, OcrError, RawDocumentText};
    use std::cell::RefCell;
    use std::io::Cursor;

    const ACETONE_SDS: &str = "SAFETY DATA SHEET\n\
                               Product identifier    : Acetone Cleaner\n\
                               Acetone        64-17-5        95%\n";

    struct StaticCapture(Option<Vec<u8>>);

    impl CaptureSource for StaticCapture {
        fn capture(&mut self) -> Result<Option<Vec<u8>>, CaptureError> {
            Ok(self.0.take())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        seen: RefCell<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: &Notice) {
            self.seen.borrow_mut().push(notice.clone());
        }
    }

    struct FailingRecognizer;

    impl OcrBackend for FailingRecognizer {
        fn recognize(&self, _image_bytes: &[u8]) -> Result<RawDocumentText, OcrError> {
            Err(OcrError::Engine("tesseract exited with status 1".into()))
        }
    }

    fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(8, 8, |x, _| Luma([(x * 30) as u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn target_in(dir: &std::path::Path) -> ExportTarget {
        ExportTarget {
            format: SheetFormat::Csv,
            output: None,
            output_dir: dir.to_path_buf(),
        }
    }

    // ── paste ─────────────────────────────────────────────────────────────────

    #[test]
    fn paste_writes_sheet_named_after_capture() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(MockRecognizer::new(ACETONE_SDS));
        let mut source = StaticCapture(Some(tiny_png()));

        let outcome = paste(&mut source, &pipeline, &target_in(dir.path()), false).unwrap();

        let PasteOutcome::Saved { product, path, rows } = outcome else {
            panic!("expected a saved sheet");
        };
        assert_eq!(product.as_str(), "Acetone Cleaner");
        assert_eq!(rows, 1);
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().unwrap(), "csv");

        let sheet = std::fs::read_to_string(&path).unwrap();
        assert!(sheet.contains("Acetone Cleaner,Acetone,None,64-17-5,95%"));
    }

    #[test]
    fn default_format_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(MockRecognizer::new(ACETONE_SDS));
        let target = ExportTarget { format: SheetFormat::default(), ..target_in(dir.path()) };

        let outcome = paste(&mut StaticCapture(Some(tiny_png())), &pipeline, &target, false).unwrap();

        let PasteOutcome::Saved { path, .. } = outcome else {
            panic!("expected a saved sheet");
        };
        assert_eq!(path.extension().unwrap(), "xlsx");
        assert_eq!(&std::fs::read(&path).unwrap()[..2], b"PK");
    }

    #[test]
    fn same_capture_reuses_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(MockRecognizer::new(ACETONE_SDS));
        let target = target_in(dir.path());

        let first = paste(&mut StaticCapture(Some(tiny_png())), &pipeline, &target, false).unwrap();
        let second = paste(&mut StaticCapture(Some(tiny_png())), &pipeline, &target, false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn explicit_output_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("sheet.json");
        let pipeline = SdsPipeline::new(MockRecognizer::new(ACETONE_SDS));
        let target = ExportTarget {
            format: SheetFormat::Json,
            output: Some(out.clone()),
            output_dir: dir.path().join("unused"),
        };

        let outcome = paste(&mut StaticCapture(Some(tiny_png())), &pipeline, &target, false).unwrap();
        assert!(matches!(outcome, PasteOutcome::Saved { ref path, .. } if *path == out));
        assert!(std::fs::read_to_string(&out).unwrap().contains("\"64-17-5\""));
        assert!(!dir.path().join("unused").exists());
    }

    #[test]
    fn paste_without_rows_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(MockRecognizer::new(
            "Product identifier: Plain Soap\nWater   7732-18-5\n",
        ));

        let outcome =
            paste(&mut StaticCapture(Some(tiny_png())), &pipeline, &target_in(dir.path()), false)
                .unwrap();

        assert_eq!(
            outcome,
            PasteOutcome::NoData { product: ProductIdentifier::new("Plain Soap") }
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_image_stops_before_recognition() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(FailingRecognizer);
        let err = paste(&mut StaticCapture(None), &pipeline, &target_in(dir.path()), false)
            .unwrap_err();
        assert!(matches!(err, PasteError::NoImage));
    }

    // ── handle_paste (error boundary) ─────────────────────────────────────────

    #[test]
    fn boundary_reports_success_once() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(MockRecognizer::new(ACETONE_SDS));
        let notifier = RecordingNotifier::default();

        let notice = handle_paste(
            &mut StaticCapture(Some(tiny_png())),
            &pipeline,
            &target_in(dir.path()),
            false,
            &notifier,
        );

        assert!(matches!(notice, Notice::Saved { rows: 1, .. }));
        assert_eq!(notifier.seen.borrow().as_slice(), &[notice]);
    }

    #[test]
    fn boundary_reports_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(MockRecognizer::new(ACETONE_SDS));
        let notifier = RecordingNotifier::default();

        let notice =
            handle_paste(&mut StaticCapture(None), &pipeline, &target_in(dir.path()), false, &notifier);

        assert_eq!(notice, Notice::NoImage);
        assert_eq!(notifier.seen.borrow().len(), 1);
    }

    #[test]
    fn boundary_reports_no_data_warning() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(MockRecognizer::new("Nothing tabular here"));
        let notifier = RecordingNotifier::default();

        let notice = handle_paste(
            &mut StaticCapture(Some(tiny_png())),
            &pipeline,
            &target_in(dir.path()),
            false,
            &notifier,
        );

        assert_eq!(notice, Notice::NoData { product: ProductIdentifier::unknown() });
    }

    #[test]
    fn boundary_renders_engine_failure_message() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(FailingRecognizer);
        let notifier = RecordingNotifier::default();

        let notice = handle_paste(
            &mut StaticCapture(Some(tiny_png())),
            &pipeline,
            &target_in(dir.path()),
            false,
            &notifier,
        );

        let Notice::Failed { message } = &notice else {
            panic!("expected failure, got {notice:?}");
        };
        assert!(message.contains("tesseract exited with status 1"));
    }

    #[test]
    fn boundary_renders_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(MockRecognizer::new(ACETONE_SDS));
        let notifier = RecordingNotifier::default();

        let notice = handle_paste(
            &mut StaticCapture(Some(b"clipboard text, not an image".to_vec())),
            &pipeline,
            &target_in(dir.path()),
            false,
            &notifier,
        );

        assert!(matches!(notice, Notice::Failed { .. }));
    }

    #[test]
    fn rows_survive_into_notice() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SdsPipeline::new(MockRecognizer::new(
            "Product identifier: Mix\n\
             A    a    50-00-0    1%\n\
             B    64-17-5    2%\n",
        ));
        let outcome =
            paste(&mut StaticCapture(Some(tiny_png())), &pipeline, &target_in(dir.path()), false)
                .unwrap();
        let PasteOutcome::Saved { path, rows, .. } = outcome else {
            panic!("expected a saved sheet");
        };
        assert_eq!(rows, 2);
        let sheet = std::fs::read_to_string(path).unwrap();
        let expected = [
            IngredientRow::new("A", "a", "50-00-0", "1%"),
            IngredientRow::without_synonym("B", "64-17-5", "2%"),
        ];
        for row in expected {
            assert!(sheet.contains(&format!("Mix,{}", row.fields().join(","))));
        }
    }
}
