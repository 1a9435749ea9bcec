//! Batch conversion driver.
//!
//! Items are independent, so with `parallelism > 1` they run on a bounded
//! rayon pool. Progress is then reported in completion order, not input
//! order. With `ignore_errors` off the first failure stops scheduling and is
//! returned; with it on every item is attempted and failures are collected.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use rayon::prelude::*;

use crate::convert::{convert_file, ConvertOptions};
use crate::error::{ConvertError, ConvertResult, ErrorKind};
use crate::options::{ErrorCallback, ProgressCallback};

/// Cooperative cancellation shared between a caller and a running batch.
///
/// Cancelling stops new items from starting; items already running finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct BatchOptions {
    /// Worker count; 1 runs sequentially in input order
    pub parallelism: usize,
    pub ignore_errors: bool,
    pub on_error: Option<ErrorCallback>,
    pub progress: Option<ProgressCallback>,
    pub cancel: CancelToken,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            parallelism: 1,
            ignore_errors: true,
            on_error: None,
            progress: None,
            cancel: CancelToken::new(),
        }
    }
}

impl fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchOptions")
            .field("parallelism", &self.parallelism)
            .field("ignore_errors", &self.ignore_errors)
            .field("on_error", &self.on_error.is_some())
            .field("progress", &self.progress.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

/// A failed item, by input index.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub error: ConvertError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Outcome {
    Done,
    Failed(ConvertError),
    Skipped,
}

/// Run `job` over every item.
///
/// Returns the first error when `ignore_errors` is off, a
/// [`ErrorKind::Cancelled`] error when the caller's token stopped the batch,
/// and a report otherwise.
pub fn run_batch<T, F>(items: &[T], job: F, options: &BatchOptions) -> ConvertResult<BatchReport>
where
    T: Sync,
    F: Fn(&T) -> ConvertResult<()> + Send + Sync,
{
    let total = items.len();
    let completed = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);
    let first_error: Mutex<Option<ConvertError>> = Mutex::new(None);

    let process = |item: &T| -> Outcome {
        if options.cancel.is_cancelled() || stop.load(Ordering::SeqCst) {
            return Outcome::Skipped;
        }
        let outcome = match job(item) {
            Ok(()) => Outcome::Done,
            Err(err) => {
                if let Some(callback) = &options.on_error {
                    callback(&err);
                }
                if options.ignore_errors {
                    warn!("batch item failed: {err}");
                    Outcome::Failed(err)
                } else {
                    stop.store(true, Ordering::SeqCst);
                    if let Ok(mut slot) = first_error.lock() {
                        slot.get_or_insert(err);
                    }
                    Outcome::Skipped
                }
            }
        };
        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(progress) = &options.progress {
            progress(done, total);
        }
        outcome
    };

    let outcomes: Vec<Outcome> = if options.parallelism > 1 {
        debug!("running {total} item(s) on {} workers", options.parallelism);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.parallelism)
            .build()
            .map_err(|err| {
                ConvertError::new(ErrorKind::Config, format!("cannot start worker pool: {err}"))
                    .with_source(err)
            })?;
        pool.install(|| items.par_iter().map(&process).collect())
    } else {
        debug!("running {total} item(s) sequentially");
        let mut outcomes = Vec::with_capacity(total);
        for item in items {
            let outcome = process(item);
            let halt = stop.load(Ordering::SeqCst);
            outcomes.push(outcome);
            if halt {
                break;
            }
        }
        outcomes
    };

    let first_error = first_error
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(err) = first_error {
        return Err(err);
    }

    let mut report = BatchReport {
        total,
        ..Default::default()
    };
    let mut skipped = total - outcomes.len();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Outcome::Done => report.succeeded += 1,
            Outcome::Failed(error) => report.failures.push(BatchFailure { index, error }),
            Outcome::Skipped => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("batch cancelled with {skipped} item(s) not started");
        return Err(ConvertError::cancelled());
    }
    Ok(report)
}

/// Convert each `(input, output)` pair with [`convert_file`].
pub fn convert_files(
    pairs: &[(PathBuf, PathBuf)],
    convert: &ConvertOptions,
    options: &BatchOptions,
) -> ConvertResult<BatchReport> {
    run_batch(
        pairs,
        |(input, output)| convert_file(input, output, convert),
        options,
    )
}

/// `out_dir/<input stem>.<extension>`
pub fn output_path(input: &Path, out_dir: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    out_dir.join(format!("{stem}.{extension}"))
}
