//! Path sequencer
//!
//! Drives a batch of source files through the stream converter strictly one
//! at a time, in the order given. A failed file never stops the batch; its
//! error is recorded in the [`ErrorLog`] returned at the end.
//!
//! After each file the sequencer starts a cleanup deletion and moves on
//! without waiting for it:
//!
//! - success: the source file is removed, the converted sibling stays
//! - failure: the output file is removed, the source stays
//!
//! A job that fails before its output file was created leaves the output path
//! alone, so an unrelated file already sitting there survives. Deletion
//! failures are ignored. Outstanding deletions are drained once the last file
//! has been converted.

use std::fmt;
use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::BufReader;
use tokio::task::JoinSet;

use crate::converter::convert_stream;
use crate::error::Error;
use crate::paths::PathJob;
use crate::transforms::TransformChain;

/// A file that failed to convert
#[derive(Debug)]
pub struct JobFailure {
    /// The job that failed
    pub job: PathJob,

    /// Why it failed
    pub error: Error,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.job.source_path.display(), self.error)
    }
}

/// Failures collected over a batch, in processing order
#[derive(Debug, Default)]
pub struct ErrorLog {
    failures: Vec<JobFailure>,
}

impl ErrorLog {
    fn push(&mut self, failure: JobFailure) {
        self.failures.push(failure);
    }

    /// True when every file converted
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of failed files
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Iterate over failures in processing order
    pub fn iter(&self) -> std::slice::Iter<'_, JobFailure> {
        self.failures.iter()
    }
}

impl IntoIterator for ErrorLog {
    type Item = JobFailure;
    type IntoIter = std::vec::IntoIter<JobFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorLog {
    type Item = &'a JobFailure;
    type IntoIter = std::slice::Iter<'a, JobFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

/// Converts files in place, one after another
#[derive(Debug)]
pub struct PathSequencer {
    chain: TransformChain,
}

impl PathSequencer {
    /// Create a sequencer that converts with `chain`
    pub fn new(chain: TransformChain) -> Self {
        Self { chain }
    }

    /// Convert every path in order and return the failures.
    ///
    /// An empty batch returns an empty log without touching the filesystem.
    pub async fn run<I, P>(&self, paths: I) -> ErrorLog
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut cleanup = JoinSet::new();
        let mut log = ErrorLog::default();

        for (index, path) in paths.into_iter().enumerate() {
            let job = PathJob::new(index, path);
            println!();
            println!("{}", job.source_path.display());
            tracing::debug!(
                "Converting {} -> {}",
                job.source_path.display(),
                job.output_path.display()
            );

            let outcome = self.convert(&job).await;
            log = settle(job, outcome, log, &mut cleanup);

            // Reap deletions that already finished; the rest keep running.
            while let Some(joined) = cleanup.try_join_next() {
                if let Err(e) = joined {
                    tracing::debug!("Cleanup task did not finish: {}", e);
                }
            }
        }

        while let Some(joined) = cleanup.join_next().await {
            if let Err(e) = joined {
                tracing::debug!("Cleanup task did not finish: {}", e);
            }
        }

        tracing::debug!("Batch finished with {} failure(s)", log.len());
        log
    }

    async fn convert(&self, job: &PathJob) -> Outcome {
        if job.output_path == job.source_path {
            return Outcome::untouched(Error::OutputIsSource {
                path: job.source_path.clone(),
            });
        }

        // The output is only created once the source is known to be readable.
        let input = match File::open(&job.source_path).await {
            Ok(input) => input,
            Err(e) => return Outcome::untouched(Error::InputStream(e)),
        };
        let output = match File::create(&job.output_path).await {
            Ok(output) => output,
            Err(e) => return Outcome::untouched(Error::OutputStream(e)),
        };

        match convert_stream(BufReader::new(input), output, &self.chain).await {
            Ok(()) => Outcome::Converted,
            Err(error) => Outcome::Failed {
                error,
                output_created: true,
            },
        }
    }
}

/// How a single job ended
enum Outcome {
    /// The output holds the converted text
    Converted,

    /// The job failed; the output file exists only if `output_created`
    Failed { error: Error, output_created: bool },
}

impl Outcome {
    fn untouched(error: Error) -> Self {
        Self::Failed {
            error,
            output_created: false,
        }
    }
}

/// Record the outcome and start the matching cleanup deletion
fn settle(
    job: PathJob,
    outcome: Outcome,
    mut log: ErrorLog,
    cleanup: &mut JoinSet<()>,
) -> ErrorLog {
    match outcome {
        Outcome::Converted => {
            cleanup.spawn(remove(job.source_path));
        }
        Outcome::Failed {
            error,
            output_created,
        } => {
            tracing::debug!("{} failed: {}", job.source_path.display(), error);
            if output_created {
                cleanup.spawn(remove(job.output_path.clone()));
            }
            log.push(JobFailure { job, error });
        }
    }
    log
}

async fn remove(path: PathBuf) {
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::debug!("Ignoring failure to remove {}: {}", path.display(), e);
    }
    println!("Removing {}", path.display());
}
