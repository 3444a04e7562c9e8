mod common;

use std::fs;
use std::sync::Arc;

use image::GenericImageView;
use image_transcoder_lib::{
    BatchRequest, BatchRunner, CancelToken, EventSink, ImageFormat, JobConfig, Outcome,
    TranscodeError, convert_folder, start_batch_with_codec,
};
use tempfile::TempDir;

use common::{BrokenWebpCodec, CancellingCodec, CountingCodec, write_rgba_png};

fn photos_dir() -> (TempDir, std::path::PathBuf) {
    let root = TempDir::new().unwrap();
    let folder = root.path().join("Photos");
    fs::create_dir(&folder).unwrap();
    (root, folder)
}

#[tokio::test]
async fn converts_to_lossless_webp_and_backs_up_original() {
    let (root, folder) = photos_dir();
    let source = folder.join("a.png");
    write_rgba_png(&source, 100, 100);
    let original_bytes = fs::read(&source).unwrap();

    let report = convert_folder(JobConfig::new(&folder)).await.unwrap();

    assert_eq!(report.converted, 1);
    assert_eq!(report.failed, 0);
    assert!(!source.exists());

    let backup = root.path().join("Photos_PNG").join("a.png");
    assert_eq!(fs::read(&backup).unwrap(), original_bytes);

    let output = image::open(folder.join("a.webp")).unwrap();
    assert_eq!(output.dimensions(), (100, 100));
    assert!(output.color().has_alpha());
    let original = image::open(&backup).unwrap();
    assert_eq!(output.to_rgba8(), original.to_rgba8());
}

#[tokio::test]
async fn rerun_skips_existing_output_without_decoding() {
    let (_root, folder) = photos_dir();
    let source = folder.join("a.png");
    write_rgba_png(&source, 100, 100);
    convert_folder(JobConfig::new(&folder)).await.unwrap();

    // The original comes back, the output is still there.
    write_rgba_png(&source, 100, 100);
    let codec = CountingCodec::shared();
    let runner = BatchRunner::new(codec.clone());
    let report = runner
        .run_in_place(&JobConfig::new(&folder), &EventSink::disconnected(), &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(report.converted, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.items[0].outcome, Outcome::skipped("already exists"));
    assert!(report.items[0].outcome.is_skipped());
    assert_eq!(report.items[0].output, folder.join("a.webp"));
    assert_eq!(codec.decode_count(), 0);
    assert!(source.exists());
}

#[tokio::test]
async fn overwrite_reencodes_existing_output() {
    let (_root, folder) = photos_dir();
    write_rgba_png(&folder.join("a.png"), 8, 8);
    fs::write(folder.join("a.webp"), b"stale").unwrap();

    let config = JobConfig { overwrite: true, ..JobConfig::new(&folder) };
    let report = convert_folder(config).await.unwrap();

    assert_eq!(report.converted, 1);
    assert!(image::open(folder.join("a.webp")).is_ok());
}

#[tokio::test]
async fn failed_encode_keeps_original_in_backup() {
    let (root, folder) = photos_dir();
    let source = folder.join("a.png");
    write_rgba_png(&source, 16, 16);
    let original_bytes = fs::read(&source).unwrap();

    let runner = BatchRunner::new(Arc::new(BrokenWebpCodec));
    let report = runner
        .run_in_place(&JobConfig::new(&folder), &EventSink::disconnected(), &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert!(!folder.join("a.webp").exists());
    let backup = root.path().join("Photos_PNG").join("a.png");
    assert_eq!(fs::read(backup).unwrap(), original_bytes);
}

#[tokio::test]
async fn failed_encode_without_backup_leaves_original() {
    let (root, folder) = photos_dir();
    let source = folder.join("a.png");
    write_rgba_png(&source, 16, 16);
    let original_bytes = fs::read(&source).unwrap();

    let config = JobConfig { keep_backup: false, ..JobConfig::new(&folder) };
    let runner = BatchRunner::new(Arc::new(BrokenWebpCodec));
    let report = runner
        .run_in_place(&config, &EventSink::disconnected(), &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(fs::read(&source).unwrap(), original_bytes);
    assert!(!folder.join("a.webp").exists());
    assert!(!root.path().join("Photos_PNG").exists());
}

#[tokio::test]
async fn without_backup_deletes_original_after_success() {
    let (root, folder) = photos_dir();
    write_rgba_png(&folder.join("a.png"), 12, 12);
    write_rgba_png(&folder.join("b.PNG"), 12, 12);

    let config = JobConfig { keep_backup: false, ..JobConfig::new(&folder) };
    let report = convert_folder(config).await.unwrap();

    assert_eq!(report.converted, 2);
    assert!(!folder.join("a.png").exists());
    assert!(!folder.join("b.PNG").exists());
    assert!(folder.join("a.webp").exists());
    assert!(folder.join("b.webp").exists());
    assert!(!root.path().join("Photos_PNG").exists());
}

#[tokio::test]
async fn existing_backup_is_never_replaced() {
    let (root, folder) = photos_dir();
    let backup_dir = root.path().join("Photos_PNG");
    fs::create_dir(&backup_dir).unwrap();
    fs::write(backup_dir.join("a.png"), b"earlier backup").unwrap();
    write_rgba_png(&folder.join("a.png"), 10, 10);

    let report = convert_folder(JobConfig::new(&folder)).await.unwrap();

    assert_eq!(report.converted, 1);
    assert_eq!(fs::read(backup_dir.join("a.png")).unwrap(), b"earlier backup");
    assert!(folder.join("a.png").exists());
    assert!(folder.join("a.webp").exists());
}

#[tokio::test]
async fn no_alpha_produces_opaque_lossy_webp() {
    let (_root, folder) = photos_dir();
    write_rgba_png(&folder.join("a.png"), 32, 32);

    let config = JobConfig { no_alpha: true, ..JobConfig::new(&folder) };
    let report = convert_folder(config).await.unwrap();

    assert_eq!(report.converted, 1);
    let output = image::open(folder.join("a.webp")).unwrap();
    assert!(!output.color().has_alpha());
    assert_eq!(output.dimensions(), (32, 32));
}

#[tokio::test]
async fn converts_jpegs_in_place_to_png() {
    let (root, folder) = photos_dir();
    let source = folder.join("shot.jpg");
    image::DynamicImage::ImageRgb8(image::RgbImage::new(20, 10))
        .save(&source)
        .unwrap();

    let config = JobConfig {
        source_extension: "jpg".to_string(),
        target: ImageFormat::PNG,
        ..JobConfig::new(&folder)
    };
    let report = convert_folder(config).await.unwrap();

    assert_eq!(report.converted, 1);
    assert!(root.path().join("Photos_JPG").join("shot.jpg").exists());
    assert_eq!(image::open(folder.join("shot.png")).unwrap().dimensions(), (20, 10));
}

#[tokio::test]
async fn empty_folder_yields_empty_report() {
    let (_root, folder) = photos_dir();
    fs::write(folder.join("notes.txt"), b"not an image").unwrap();

    let report = convert_folder(JobConfig::new(&folder)).await.unwrap();

    assert_eq!(report.attempted, 0);
    assert!(!report.cancelled);
}

#[tokio::test]
async fn missing_folder_is_fatal_before_start() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nope");

    let result = start_batch_with_codec(
        BatchRequest::InPlace(JobConfig::new(&missing)),
        CountingCodec::shared(),
    );

    assert!(matches!(result, Err(TranscodeError::SourceDirectory(ref path)) if path == &missing));
}

#[tokio::test]
async fn same_format_without_backup_is_rejected() {
    let (_root, folder) = photos_dir();
    let config = JobConfig {
        keep_backup: false,
        target: ImageFormat::PNG,
        ..JobConfig::new(&folder)
    };

    let result = convert_folder(config).await;

    assert!(matches!(result, Err(TranscodeError::Validation(_))));
}

#[tokio::test]
async fn cancelled_before_start_converts_nothing() {
    let (_root, folder) = photos_dir();
    write_rgba_png(&folder.join("a.png"), 4, 4);
    write_rgba_png(&folder.join("b.png"), 4, 4);

    let cancel = CancelToken::new();
    cancel.cancel();
    let report = BatchRunner::default()
        .run_in_place(&JobConfig::new(&folder), &EventSink::disconnected(), &cancel)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.attempted, 0);
    assert!(folder.join("a.png").exists());
    assert!(!folder.join("a.webp").exists());
}

#[tokio::test]
async fn cancel_during_a_job_leaves_remaining_originals_in_place() {
    let (root, folder) = photos_dir();
    for name in ["a.png", "b.png", "c.png"] {
        write_rgba_png(&folder.join(name), 6, 6);
    }

    let cancel = CancelToken::new();
    let runner = BatchRunner::new(Arc::new(CancellingCodec { cancel: cancel.clone() }));
    let report = runner
        .run_in_place(&JobConfig::new(&folder), &EventSink::disconnected(), &cancel)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.converted, 1);
    assert!(folder.join("a.webp").exists());
    assert!(root.path().join("Photos_PNG").join("a.png").exists());
    assert!(folder.join("b.png").exists());
    assert!(folder.join("c.png").exists());
    assert!(!folder.join("b.webp").exists());
    assert!(!folder.join("c.webp").exists());
}
