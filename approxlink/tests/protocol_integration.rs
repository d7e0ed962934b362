//! Integration tests for the exchange protocol.
//!
//! These tests drive client and server through a real exchange directory:
//! - The request/response happy path and the flag states it leaves behind
//! - Server behaviour on a missing request and on stale output
//! - A server loop on another thread, with and without a shared notifier
//! - Client wait budgets running out

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use approxlink::client::{ApproximationClient, ExternalServer};
use approxlink::context::ExchangeContext;
use approxlink::exchange::{
    ExchangeDirectory, ExchangeError, ExchangeFiles, Flag, FlagNotifier, WaitPolicy,
};
use approxlink::log::{LogLevel, MemoryLogger};
use approxlink::model::{
    ApproximationModel, IdentityModel, LinearModel, ModelError, SharedModelLoader,
};
use approxlink::server::ApproximationServer;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

fn identity_context(root: &Path, notifier: Arc<FlagNotifier>) -> ExchangeContext {
    let dir = ExchangeDirectory::open(root, ExchangeFiles::default()).unwrap();
    ExchangeContext::builder(dir)
        .models(Arc::new(SharedModelLoader::new(Arc::new(IdentityModel))))
        .notifier(notifier)
        .build()
}

fn file_names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// In-process protocol
// =============================================================================

#[test]
fn test_happy_path_with_identity_model() {
    let temp = TempDir::new().unwrap();
    let logger = Arc::new(MemoryLogger::new());
    let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
    let ctx = ExchangeContext::builder(dir)
        .models(Arc::new(SharedModelLoader::new(Arc::new(IdentityModel))))
        .logger(logger.clone())
        .build();
    let server = Arc::new(ApproximationServer::new(&ctx));
    let client = ApproximationClient::new(&ctx, server, WaitPolicy::new().with_max_attempts(10));

    let output = client.request(&[1.0, 2.0]).unwrap();

    assert_eq!(output, vec![1.0, 2.0]);
    let flags = ctx.flags().snapshot();
    assert!(flags.busy, "busy stays set until the client releases");
    assert!(!flags.input_ready);
    assert!(!flags.output_ready);
    assert!(logger.contains(LogLevel::Info, "served request"));

    client.release().unwrap();
    assert!(ctx.flags().snapshot().is_idle());
}

#[test]
fn test_serve_once_without_request_mutates_nothing() {
    let temp = TempDir::new().unwrap();
    let ctx = identity_context(temp.path(), Arc::new(FlagNotifier::new()));
    ctx.vectors().write_output(&[42.0]).unwrap();
    let before = file_names(temp.path());

    let result = ApproximationServer::new(&ctx).serve_once();

    assert!(matches!(result, Err(ExchangeError::NotReady)));
    assert_eq!(file_names(temp.path()), before);
    assert_eq!(ctx.vectors().read_output().unwrap(), vec![42.0]);
}

#[test]
fn test_stale_output_is_replaced() {
    let temp = TempDir::new().unwrap();
    let ctx = identity_context(temp.path(), Arc::new(FlagNotifier::new()));
    let flags = ctx.flags();
    // Leftovers of an earlier run that was never consumed
    ctx.vectors().write_output(&[-1.0, -1.0, -1.0]).unwrap();
    flags.set(Flag::OutputReady).unwrap();
    // New request
    ctx.vectors().write_input(&[7.0]).unwrap();
    flags.set(Flag::InputReady).unwrap();

    ApproximationServer::new(&ctx).serve_once().unwrap();

    assert!(flags.is_set(Flag::OutputReady));
    assert_eq!(ctx.vectors().read_output().unwrap(), vec![7.0]);
}

/// Identity model that records whether output-ready was visible while it ran.
struct FlagWatchingModel {
    flag_path: PathBuf,
    seen: Mutex<Option<bool>>,
}

impl ApproximationModel for FlagWatchingModel {
    fn compute(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        *self.seen.lock().unwrap() = Some(self.flag_path.exists());
        Ok(input.to_vec())
    }
}

#[test]
fn test_stale_output_ready_is_cleared_before_compute() {
    let temp = TempDir::new().unwrap();
    let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
    let model = Arc::new(FlagWatchingModel {
        flag_path: dir.flag_path(Flag::OutputReady),
        seen: Mutex::new(None),
    });
    let ctx = ExchangeContext::builder(dir)
        .models(Arc::new(SharedModelLoader::new(model.clone())))
        .build();
    let flags = ctx.flags();
    ctx.vectors().write_output(&[-1.0]).unwrap();
    flags.set(Flag::OutputReady).unwrap();
    ctx.vectors().write_input(&[3.0]).unwrap();
    flags.set(Flag::InputReady).unwrap();

    ApproximationServer::new(&ctx).serve_once().unwrap();

    assert_eq!(*model.seen.lock().unwrap(), Some(false));
    assert!(flags.is_set(Flag::OutputReady));
    assert_eq!(ctx.vectors().read_output().unwrap(), vec![3.0]);
}

#[test]
fn test_server_reads_model_artifact_per_request() {
    let temp = TempDir::new().unwrap();
    let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
    let ctx = ExchangeContext::builder(dir).build();
    let server = Arc::new(ApproximationServer::new(&ctx));
    let client = ApproximationClient::new(&ctx, server, WaitPolicy::new().with_max_attempts(10));
    let model_path = temp.path().join("neural_network");

    LinearModel::new(vec![vec![1.0, 1.0]], vec![0.0])
        .unwrap()
        .save(&model_path)
        .unwrap();
    assert_eq!(client.request(&[2.0, 3.0]).unwrap(), vec![5.0]);
    client.release().unwrap();

    // Retrained model, no restart
    LinearModel::new(vec![vec![1.0, -1.0]], vec![10.0])
        .unwrap()
        .save(&model_path)
        .unwrap();
    assert_eq!(client.request(&[2.0, 3.0]).unwrap(), vec![9.0]);
}

#[test]
fn test_custom_file_names_are_used() {
    let temp = TempDir::new().unwrap();
    let files = ExchangeFiles {
        input: "in.vec".to_string(),
        output: "out.vec".to_string(),
        output_ready_flag: "done".to_string(),
        ..ExchangeFiles::default()
    };
    let dir = ExchangeDirectory::open(temp.path(), files).unwrap();
    let ctx = ExchangeContext::builder(dir)
        .models(Arc::new(SharedModelLoader::new(Arc::new(IdentityModel))))
        .build();
    ctx.vectors().write_input(&[1.0]).unwrap();
    ctx.flags().set(Flag::InputReady).unwrap();

    ApproximationServer::new(&ctx).serve_once().unwrap();

    assert!(temp.path().join("in.vec").exists());
    assert!(temp.path().join("out.vec").exists());
    assert!(temp.path().join("done").exists());
    assert!(!temp.path().join("neural_output").exists());
}

// =============================================================================
// Server loop on another thread
// =============================================================================

#[test]
fn test_server_loop_with_shared_notifier() {
    let temp = TempDir::new().unwrap();
    let notifier = Arc::new(FlagNotifier::new());
    let server_ctx = identity_context(temp.path(), Arc::clone(&notifier));
    let client_ctx = identity_context(temp.path(), notifier);
    let shutdown = Arc::new(AtomicBool::new(false));

    let server = ApproximationServer::new(&server_ctx);
    let stop = Arc::clone(&shutdown);
    // Long poll interval: requests are picked up through the notifier
    let handle = thread::spawn(move || server.run(Duration::from_secs(2), &stop));

    let client = ApproximationClient::new(
        &client_ctx,
        Arc::new(ExternalServer),
        WaitPolicy::new().with_poll_interval(Duration::from_secs(2)),
    );
    for i in 0..3 {
        let value = f64::from(i);
        assert_eq!(client.request(&[value, -value]).unwrap(), vec![value, -value]);
        client.release().unwrap();
    }

    shutdown.store(true, Ordering::SeqCst);
    client_ctx.flags().clear(Flag::Busy).unwrap(); // wakes the idle server
    let stats = handle.join().unwrap();
    assert_eq!(stats.served, 3);
    assert_eq!(stats.failed, 0);
}

#[test]
fn test_server_loop_sees_other_process_by_polling() {
    let temp = TempDir::new().unwrap();
    // Separate notifiers: the two sides only share the directory
    let server_ctx = identity_context(temp.path(), Arc::new(FlagNotifier::new()));
    let client_ctx = identity_context(temp.path(), Arc::new(FlagNotifier::new()));
    let shutdown = Arc::new(AtomicBool::new(false));

    let server = ApproximationServer::new(&server_ctx);
    let stop = Arc::clone(&shutdown);
    let handle = thread::spawn(move || server.run(Duration::from_millis(5), &stop));

    let client = ApproximationClient::new(
        &client_ctx,
        Arc::new(ExternalServer),
        WaitPolicy::new()
            .with_poll_interval(Duration::from_millis(5))
            .with_max_attempts(2000),
    );
    assert_eq!(client.request(&[0.25]).unwrap(), vec![0.25]);
    client.release().unwrap();

    shutdown.store(true, Ordering::SeqCst);
    let stats = handle.join().unwrap();
    assert_eq!(stats.served, 1);
}

#[test]
fn test_server_loop_counts_failures_and_continues() {
    let temp = TempDir::new().unwrap();
    let notifier = Arc::new(FlagNotifier::new());
    let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
    // Default loader reads the artifact, which does not exist yet
    let server_ctx = ExchangeContext::builder(dir)
        .notifier(Arc::clone(&notifier))
        .build();
    let client_ctx = identity_context(temp.path(), notifier);
    let shutdown = Arc::new(AtomicBool::new(false));

    let server = ApproximationServer::new(&server_ctx);
    let stop = Arc::clone(&shutdown);
    let handle = thread::spawn(move || server.run(Duration::from_millis(5), &stop));

    let client = ApproximationClient::new(
        &client_ctx,
        Arc::new(ExternalServer),
        WaitPolicy::new()
            .with_poll_interval(Duration::from_millis(5))
            .with_max_attempts(200),
    );
    let err = client.request(&[1.0]).unwrap_err();
    assert!(matches!(err, ExchangeError::Protocol { .. }));

    LinearModel::identity(1)
        .save(&temp.path().join("neural_network"))
        .unwrap();
    let client = ApproximationClient::new(
        &client_ctx,
        Arc::new(ExternalServer),
        WaitPolicy::new()
            .with_poll_interval(Duration::from_millis(5))
            .with_max_attempts(2000),
    );
    assert_eq!(client.request(&[4.0]).unwrap(), vec![4.0]);

    shutdown.store(true, Ordering::SeqCst);
    let stats = handle.join().unwrap();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.served, 1);
}

// =============================================================================
// Wait budgets
// =============================================================================

#[test]
fn test_request_times_out_without_server() {
    let temp = TempDir::new().unwrap();
    let logger = Arc::new(MemoryLogger::new());
    let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
    let ctx = ExchangeContext::builder(dir).logger(logger.clone()).build();
    let client = ApproximationClient::new(
        &ctx,
        Arc::new(ExternalServer),
        WaitPolicy::new()
            .with_poll_interval(Duration::from_millis(1))
            .with_max_attempts(4),
    );

    let err = client.request(&[1.0]).unwrap_err();

    assert!(matches!(
        err,
        ExchangeError::Protocol {
            flag: Flag::OutputReady,
            attempts: 4
        }
    ));
    assert!(logger.contains(LogLevel::Warn, "gave up waiting for output-ready"));
    // Caller obligation after giving up
    assert!(client.is_busy());
    client.release().unwrap();
    assert!(!client.is_busy());
}
