mod helpers;

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use helpers::{candidate, CountingBlobStore, CountingRecordStore, FailingProbe, FixedDurationProbe};
use waveshelf_client::{UploadObserver, UploadPipeline};
use waveshelf_core::{AppError, AudioFileRecord, MAX_AUDIO_FILE_SIZE};

fn pipeline_with(
    blobs: &Arc<CountingBlobStore>,
    records: &Arc<CountingRecordStore>,
    probed: f64,
) -> UploadPipeline {
    UploadPipeline::new(blobs.clone(), records.clone())
        .with_probe(Arc::new(FixedDurationProbe(probed)))
}

#[tokio::test]
async fn test_disallowed_mime_type_makes_no_backend_calls() {
    let blobs = Arc::new(CountingBlobStore::new());
    let records = Arc::new(CountingRecordStore::new());
    let pipeline = pipeline_with(&blobs, &records, 1.0);

    let err = pipeline
        .upload(Uuid::new_v4(), candidate("movie.mp4", "video/mp4", 1024))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(blobs.puts.load(Ordering::SeqCst), 0);
    assert_eq!(records.inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_oversized_file_makes_no_backend_calls() {
    let blobs = Arc::new(CountingBlobStore::new());
    let records = Arc::new(CountingRecordStore::new());
    let pipeline = pipeline_with(&blobs, &records, 1.0);

    let err = pipeline
        .upload(
            Uuid::new_v4(),
            candidate("big.mp3", "audio/mpeg", MAX_AUDIO_FILE_SIZE + 1),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(blobs.puts.load(Ordering::SeqCst), 0);
    assert_eq!(records.inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_successful_upload_writes_blob_and_record() {
    let blobs = Arc::new(CountingBlobStore::new());
    let records = Arc::new(CountingRecordStore::new());
    let pipeline = pipeline_with(&blobs, &records, 184.5);
    let user = Uuid::new_v4();

    let record = pipeline
        .upload(user, candidate("song.mp3", "audio/mpeg", 2_000_000))
        .await
        .unwrap();

    assert_eq!(record.file_name, "song.mp3");
    assert_eq!(record.file_size, 2_000_000);
    assert_eq!(record.mime_type, "audio/mpeg");
    assert_eq!(record.duration, 184.5);
    assert!(record.file_path.starts_with(&format!("{}/", user)));
    assert!(record.file_path.ends_with(".mp3"));

    assert_eq!(blobs.blob_count(), 1);
    assert!(blobs.contains(&record.file_path));
    assert_eq!(records.record_count(), 1);
}

#[tokio::test]
async fn test_insert_failure_removes_blob_and_reports_insert_error() {
    let blobs = Arc::new(CountingBlobStore::new());
    let records = Arc::new(CountingRecordStore::new());
    records.set_fail_inserts(true);
    let pipeline = pipeline_with(&blobs, &records, 1.0);

    let err = pipeline
        .upload(Uuid::new_v4(), candidate("song.mp3", "audio/mpeg", 1024))
        .await
        .unwrap_err();

    // The blob was written, then compensated away.
    assert_eq!(blobs.puts.load(Ordering::SeqCst), 1);
    assert_eq!(blobs.removes.load(Ordering::SeqCst), 1);
    assert_eq!(blobs.blob_count(), 0);
    assert_eq!(records.record_count(), 0);

    match err {
        AppError::PartialWrite { source, .. } => {
            assert!(matches!(*source, AppError::Database(_)));
        }
        other => panic!("expected PartialWrite, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_compensation_still_reports_insert_error() {
    let blobs = Arc::new(CountingBlobStore::new());
    let records = Arc::new(CountingRecordStore::new());
    records.set_fail_inserts(true);
    blobs.set_fail_removes(true);
    let pipeline = pipeline_with(&blobs, &records, 1.0);

    let err = pipeline
        .upload(Uuid::new_v4(), candidate("song.mp3", "audio/mpeg", 1024))
        .await
        .unwrap_err();

    // Cleanup was attempted and failed; the blob is orphaned but the
    // reported error is still the insert error.
    assert_eq!(blobs.removes.load(Ordering::SeqCst), 1);
    assert_eq!(blobs.blob_count(), 1);
    match err {
        AppError::PartialWrite { source, .. } => {
            assert!(matches!(*source, AppError::Database(_)));
        }
        other => panic!("expected PartialWrite, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_failure_records_zero_duration() {
    let blobs = Arc::new(CountingBlobStore::new());
    let records = Arc::new(CountingRecordStore::new());
    let pipeline =
        UploadPipeline::new(blobs.clone(), records.clone()).with_probe(Arc::new(FailingProbe));

    let record = pipeline
        .upload(Uuid::new_v4(), candidate("song.mp3", "audio/mpeg", 1024))
        .await
        .unwrap();

    assert_eq!(record.duration, 0.0);
    assert_eq!(blobs.blob_count(), 1);
}

#[tokio::test]
async fn test_duplicate_upload_produces_independent_records() {
    let blobs = Arc::new(CountingBlobStore::new());
    let records = Arc::new(CountingRecordStore::new());
    let pipeline = pipeline_with(&blobs, &records, 1.0);
    let user = Uuid::new_v4();

    let first = pipeline
        .upload(user, candidate("song.mp3", "audio/mpeg", 1024))
        .await
        .unwrap();
    let second = pipeline
        .upload(user, candidate("song.mp3", "audio/mpeg", 1024))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_ne!(first.file_path, second.file_path);
    assert_eq!(blobs.blob_count(), 2);
    assert_eq!(records.record_count(), 2);
}

#[tokio::test]
async fn test_concurrent_uploads_are_independent() {
    let blobs = Arc::new(CountingBlobStore::new());
    let records = Arc::new(CountingRecordStore::new());
    let pipeline = Arc::new(pipeline_with(&blobs, &records, 1.0));
    let user = Uuid::new_v4();

    let mut handles = Vec::new();
    for i in 0..4 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            pipeline
                .upload(user, candidate(&format!("song-{i}.mp3"), "audio/mpeg", 1024))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(blobs.blob_count(), 4);
    assert_eq!(records.record_count(), 4);
}

#[tokio::test]
async fn test_observer_sees_progress_milestones_and_completion() {
    #[derive(Default)]
    struct CollectingObserver {
        progress: Mutex<Vec<u8>>,
        completed: Mutex<Vec<AudioFileRecord>>,
    }

    impl UploadObserver for CollectingObserver {
        fn on_progress(&self, _file_name: &str, percent: u8) {
            self.progress.lock().unwrap().push(percent);
        }
        fn on_completed(&self, record: &AudioFileRecord) {
            self.completed.lock().unwrap().push(record.clone());
        }
    }

    let blobs = Arc::new(CountingBlobStore::new());
    let records = Arc::new(CountingRecordStore::new());
    let observer = Arc::new(CollectingObserver::default());
    let pipeline = pipeline_with(&blobs, &records, 1.0).with_observer(observer.clone());

    let record = pipeline
        .upload(Uuid::new_v4(), candidate("song.mp3", "audio/mpeg", 1024))
        .await
        .unwrap();

    assert_eq!(*observer.progress.lock().unwrap(), vec![0, 50, 100]);
    let completed = observer.completed.lock().unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, record.id);
}
