use crate::error::{BoxError, StoreError};
use crate::feed::{CachedFeed, LocalFeedItem, Timestamp};
use crate::store::{
    DeletionCompletion, DeletionResult, FeedStore, InsertionCompletion, InsertionResult,
    RetrievalCompletion, RetrievalResult,
};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Persists the cached feed as a single file.
///
/// Every operation is queued to one worker thread owned by the store, so operations run strictly
/// in the order they were issued no matter which thread issued them. Completions are invoked on
/// that worker thread.
///
/// Inserts write to a sibling `.tmp` file and rename it over the store file, so a reader never sees
/// a half-written feed.
///
/// A completion that panics is caught on the worker and logged. The panicking operation's effect on
/// disk stands, and every later operation still runs and completes.
pub struct FileFeedStore<Format>
where
    Format: FeedFileFormat,
{
    path: PathBuf,
    jobs: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    phantom_format: PhantomData<Format>,
}

enum Job {
    Delete(DeletionCompletion),
    Insert(CachedFeed, InsertionCompletion),
    Retrieve(RetrievalCompletion),
}

impl<Format> FileFeedStore<Format>
where
    Format: FeedFileFormat,
{
    /// Opens a store at `path`. The file is not touched until the first operation runs.
    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let (jobs, queue) = mpsc::channel::<Job>();

        let worker_path = path.clone();
        let worker = thread::Builder::new()
            .name("feed-store".to_string())
            .spawn(move || {
                for job in queue {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        run::<Format>(&worker_path, job)
                    }));
                    if outcome.is_err() {
                        warn!(path = %worker_path.display(), "feed store completion panicked");
                    }
                }
            })?;

        Ok(Self {
            path,
            jobs: Some(jobs),
            worker: Some(worker),
            phantom_format: Default::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn enqueue(&self, job: Job) {
        // The worker only exits once the queue is closed, so a failed send means it died abnormally.
        if let Some(jobs) = &self.jobs {
            if jobs.send(job).is_err() {
                warn!(path = %self.path.display(), "feed store worker has stopped, dropping operation");
            }
        }
    }
}

impl<Format> FeedStore for FileFeedStore<Format>
where
    Format: FeedFileFormat,
{
    fn delete_cached_feed(&self, completion: DeletionCompletion) {
        self.enqueue(Job::Delete(completion));
    }

    fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: Timestamp, completion: InsertionCompletion) {
        self.enqueue(Job::Insert(CachedFeed::new(feed, timestamp), completion));
    }

    fn retrieve(&self, completion: RetrievalCompletion) {
        self.enqueue(Job::Retrieve(completion));
    }
}

impl<Format> Drop for FileFeedStore<Format>
where
    Format: FeedFileFormat,
{
    fn drop(&mut self) {
        // Closing the queue lets the worker drain what is already queued and exit.
        self.jobs.take();

        if let Some(worker) = self.worker.take() {
            // The last handle may be released from inside a completion running on the worker.
            if worker.thread().id() != thread::current().id() && worker.join().is_err() {
                warn!(path = %self.path.display(), "feed store worker panicked");
            }
        }
    }
}

fn run<Format: FeedFileFormat>(path: &Path, job: Job) {
    match job {
        Job::Delete(completion) => completion(delete(path)),
        Job::Insert(cached, completion) => completion(insert::<Format>(path, &cached)),
        Job::Retrieve(completion) => completion(retrieve::<Format>(path)),
    }
}

fn delete(path: &Path) -> DeletionResult {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "deleted cached feed");
            Ok(())
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to delete cached feed");
            Err(StoreError::deletion(error))
        }
    }
}

fn insert<Format: FeedFileFormat>(path: &Path, cached: &CachedFeed) -> InsertionResult {
    write::<Format>(path, cached).map_err(|error| {
        warn!(path = %path.display(), %error, "failed to write cached feed");
        StoreError::Insertion(error)
    })?;

    debug!(
        path = %path.display(),
        items = cached.feed.len(),
        timestamp = %cached.timestamp,
        "wrote cached feed"
    );
    Ok(())
}

fn write<Format: FeedFileFormat>(path: &Path, cached: &CachedFeed) -> Result<(), BoxError> {
    let staging = staging_path(path);

    let file = File::create(&staging)?;
    Format::serialize(BufWriter::new(file), cached)
        .and_then(|()| Ok(fs::rename(&staging, path)?))
        .map_err(|error| {
            let _ = fs::remove_file(&staging);
            error
        })
}

fn retrieve<Format: FeedFileFormat>(path: &Path) -> RetrievalResult {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to open cached feed");
            return Err(StoreError::retrieval(error));
        }
    };

    match Format::deserialize(BufReader::new(file)) {
        Ok(cached) => Ok(Some(cached)),
        Err(error) => {
            warn!(path = %path.display(), %error, "cached feed is unreadable");
            Err(StoreError::Retrieval(error))
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    PathBuf::from(staging)
}

/// Encoding used for the store file.
pub trait FeedFileFormat: Send + Sync + 'static {
    fn serialize(buffered_writer: BufWriter<File>, cached: &CachedFeed) -> Result<(), BoxError>;

    fn deserialize(buffered_reader: BufReader<File>) -> Result<CachedFeed, BoxError>;
}

pub struct JsonFormat;

impl FeedFileFormat for JsonFormat {
    fn serialize(mut buffered_writer: BufWriter<File>, cached: &CachedFeed) -> Result<(), BoxError> {
        serde_json::to_writer(&mut buffered_writer, cached)?;
        buffered_writer.flush()?;
        Ok(())
    }

    fn deserialize(buffered_reader: BufReader<File>) -> Result<CachedFeed, BoxError> {
        Ok(serde_json::from_reader(buffered_reader)?)
    }
}

pub struct BincodeFormat;

impl FeedFileFormat for BincodeFormat {
    fn serialize(mut buffered_writer: BufWriter<File>, cached: &CachedFeed) -> Result<(), BoxError> {
        bincode::serialize_into(&mut buffered_writer, cached)?;
        buffered_writer.flush()?;
        Ok(())
    }

    fn deserialize(buffered_reader: BufReader<File>) -> Result<CachedFeed, BoxError> {
        Ok(bincode::deserialize_from(buffered_reader)?)
    }
}

pub type JsonFileFeedStore = FileFeedStore<JsonFormat>;
pub type BincodeFileFeedStore = FileFeedStore<BincodeFormat>;
