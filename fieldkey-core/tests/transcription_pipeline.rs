use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fieldkey_core::audio::{AudioConverter, Conversion};
use fieldkey_core::{
    FieldkeyError, ModelHandle, ModelSlot, SpeechModel, Transcriber, TranscriberConfig,
    TranscriptionOutcome,
};
use parking_lot::Mutex;

#[derive(Default)]
struct Tracker {
    active: AtomicUsize,
    max_active: AtomicUsize,
    calls: AtomicUsize,
    missed_reset: AtomicBool,
    paths: Mutex<Vec<PathBuf>>,
}

/// Sleeps inside `transcribe` and records what it observed.
struct DelayModel {
    delay: Duration,
    tracker: Arc<Tracker>,
    fresh: bool,
    fail: bool,
}

impl DelayModel {
    fn new(delay: Duration, tracker: Arc<Tracker>) -> Self {
        Self {
            delay,
            tracker,
            fresh: false,
            fail: false,
        }
    }

    fn failing(tracker: Arc<Tracker>) -> Self {
        Self {
            fail: true,
            ..Self::new(Duration::ZERO, tracker)
        }
    }
}

impl SpeechModel for DelayModel {
    fn warm_up(&mut self) -> Result<(), FieldkeyError> {
        Ok(())
    }

    fn transcribe(&mut self, audio: &Path) -> Result<String, FieldkeyError> {
        let now = self.tracker.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.tracker.max_active.fetch_max(now, Ordering::SeqCst);
        if !std::mem::take(&mut self.fresh) {
            self.tracker.missed_reset.store(true, Ordering::SeqCst);
        }
        self.tracker.paths.lock().push(audio.to_path_buf());
        assert!(audio.exists(), "upload must exist during inference");

        thread::sleep(self.delay);
        self.tracker.calls.fetch_add(1, Ordering::SeqCst);
        self.tracker.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(FieldkeyError::Inference("decoder crashed".into()));
        }
        Ok(" ok ".into())
    }

    fn reset(&mut self) {
        self.fresh = true;
    }
}

/// Always declines, remembering the paths it was handed.
#[derive(Default)]
struct FailingConverter {
    seen: Mutex<Vec<PathBuf>>,
}

impl AudioConverter for FailingConverter {
    fn name(&self) -> &str {
        "failing"
    }

    fn convert(&self, input: &Path, output: &Path, _target_rate: u32) -> Result<Conversion, FieldkeyError> {
        self.seen.lock().push(input.to_path_buf());
        self.seen.lock().push(output.to_path_buf());
        Err(FieldkeyError::Conversion("unsupported container".into()))
    }
}

fn transcriber(model: impl SpeechModel) -> Transcriber {
    let slot = Arc::new(ModelSlot::ready(ModelHandle::new(model)));
    Transcriber::new(slot, TranscriberConfig::default()).with_converters(Vec::new())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_never_overlap_in_the_model() {
    let tracker = Arc::new(Tracker::default());
    let transcriber = Arc::new(transcriber(DelayModel::new(
        Duration::from_millis(15),
        Arc::clone(&tracker),
    )));

    let started = Instant::now();
    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let transcriber = Arc::clone(&transcriber);
            tokio::spawn(async move { transcriber.transcribe(vec![i; 64], "clip.wav").await })
        })
        .collect();
    for task in tasks {
        let out = task.await.expect("request task panicked");
        assert_eq!(out.text(), "ok");
    }

    assert_eq!(tracker.calls.load(Ordering::SeqCst), 8);
    assert_eq!(tracker.max_active.load(Ordering::SeqCst), 1);
    assert!(!tracker.missed_reset.load(Ordering::SeqCst), "reset must precede every transcribe");
    assert!(
        started.elapsed() >= Duration::from_millis(8 * 15),
        "requests were not serialised: {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn temp_files_removed_after_success() {
    let tracker = Arc::new(Tracker::default());
    let transcriber = transcriber(DelayModel::new(Duration::ZERO, Arc::clone(&tracker)));

    let out = transcriber.transcribe(b"fake audio".to_vec(), "note.m4a").await;
    assert!(matches!(out, TranscriptionOutcome::Transcribed { .. }));

    let paths = tracker.paths.lock();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].extension().and_then(|e| e.to_str()), Some("m4a"));
    assert!(!paths[0].exists());
}

#[tokio::test]
async fn temp_files_removed_after_inference_failure() {
    let tracker = Arc::new(Tracker::default());
    let transcriber = transcriber(DelayModel::failing(Arc::clone(&tracker)));

    let out = transcriber.transcribe(b"fake audio".to_vec(), "note.wav").await;
    match out {
        TranscriptionOutcome::Failed { error } => assert!(error.contains("decoder crashed")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(tracker.paths.lock().iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn conversion_failure_falls_back_to_upload_and_cleans_up() {
    let tracker = Arc::new(Tracker::default());
    let converter = Arc::new(FailingConverter::default());
    let slot = Arc::new(ModelSlot::ready(ModelHandle::new(DelayModel::new(
        Duration::ZERO,
        Arc::clone(&tracker),
    ))));
    let transcriber = Transcriber::new(slot, TranscriberConfig::default())
        .with_converters(vec![converter.clone() as Arc<dyn AudioConverter>]);

    let out = transcriber.transcribe(b"not really audio".to_vec(), "memo.ogg").await;
    assert_eq!(out.text(), "ok");

    let seen = converter.seen.lock();
    assert_eq!(seen.len(), 2);
    assert_eq!(tracker.paths.lock()[0], seen[0], "model reads the original upload");
    assert!(seen.iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn unavailable_model_is_retried_on_next_request() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let tracker = Arc::new(Tracker::default());
    let slot = {
        let attempts = Arc::clone(&attempts);
        let tracker = Arc::clone(&tracker);
        Arc::new(ModelSlot::new(move || {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(FieldkeyError::ModelNotFound {
                    path: PathBuf::from("models/missing.bin"),
                })
            } else {
                Ok(ModelHandle::new(DelayModel::new(Duration::ZERO, Arc::clone(&tracker))))
            }
        }))
    };
    let transcriber =
        Transcriber::new(Arc::clone(&slot), TranscriberConfig::default()).with_converters(Vec::new());

    let first = transcriber.transcribe(b"a".to_vec(), "a.wav").await;
    assert_eq!(first, TranscriptionOutcome::Unavailable);
    assert_eq!(first.text(), "");
    assert!(!slot.is_loaded());

    let second = transcriber.transcribe(b"a".to_vec(), "a.wav").await;
    assert_eq!(second.text(), "ok");
    assert!(slot.is_loaded());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);

    transcriber.transcribe(b"a".to_vec(), "a.wav").await;
    assert_eq!(attempts.load(Ordering::SeqCst), 2, "a loaded model is reused");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cold_slot_is_constructed_once_under_concurrent_requests() {
    let loads = Arc::new(AtomicUsize::new(0));
    let tracker = Arc::new(Tracker::default());
    let slot = {
        let loads = Arc::clone(&loads);
        let tracker = Arc::clone(&tracker);
        Arc::new(ModelSlot::new(move || {
            loads.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(40));
            Ok(ModelHandle::new(DelayModel::new(Duration::ZERO, Arc::clone(&tracker))))
        }))
    };
    let transcriber = Arc::new(
        Transcriber::new(Arc::clone(&slot), TranscriberConfig::default()).with_converters(Vec::new()),
    );

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let transcriber = Arc::clone(&transcriber);
            tokio::spawn(async move { transcriber.transcribe(b"a".to_vec(), "a.wav").await })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.expect("request task panicked").text(), "ok");
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1, "loader ran more than once");
    assert_eq!(tracker.calls.load(Ordering::SeqCst), 8);
    assert!(slot.is_loaded());
}
