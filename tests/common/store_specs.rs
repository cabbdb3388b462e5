//! Behaviour every [`FeedStore`] backend has to show. Each backend's test file calls these
//! against a fresh store.

use super::unique_image_feed;
use chrono::Utc;
use feed_cache::store::{DeletionResult, FeedStore, InsertionResult, RetrievalResult};
use feed_cache::{CachedFeed, LocalFeedItem, StoreError, Timestamp};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a retrieve with the error reduced to its stage, so results can be compared.
#[derive(Debug, PartialEq)]
pub enum Retrieved {
    Empty,
    Found(CachedFeed),
    Failed,
}

pub fn retrieve(store: &dyn FeedStore) -> RetrievalResult {
    let (sender, receiver) = mpsc::channel();
    store.retrieve(Box::new(move |result| {
        let _ = sender.send(result);
    }));
    receiver.recv_timeout(TIMEOUT).expect("retrieve did not complete")
}

pub fn retrieved(store: &dyn FeedStore) -> Retrieved {
    match retrieve(store) {
        Ok(None) => Retrieved::Empty,
        Ok(Some(cached)) => Retrieved::Found(cached),
        Err(StoreError::Retrieval(_)) => Retrieved::Failed,
        Err(other) => panic!("retrieve reported a {other:?}"),
    }
}

pub fn insert(store: &dyn FeedStore, feed: Vec<LocalFeedItem>, timestamp: Timestamp) -> InsertionResult {
    let (sender, receiver) = mpsc::channel();
    store.insert(
        feed,
        timestamp,
        Box::new(move |result| {
            let _ = sender.send(result);
        }),
    );
    receiver.recv_timeout(TIMEOUT).expect("insert did not complete")
}

pub fn delete(store: &dyn FeedStore) -> DeletionResult {
    let (sender, receiver) = mpsc::channel();
    store.delete_cached_feed(Box::new(move |result| {
        let _ = sender.send(result);
    }));
    receiver.recv_timeout(TIMEOUT).expect("delete did not complete")
}

pub fn assert_that_retrieve_delivers_empty_on_empty_cache(store: &dyn FeedStore) {
    assert_eq!(retrieved(store), Retrieved::Empty);
}

pub fn assert_that_retrieve_has_no_side_effects_on_empty_cache(store: &dyn FeedStore) {
    assert_eq!(retrieved(store), Retrieved::Empty);
    assert_eq!(retrieved(store), Retrieved::Empty);
}

pub fn assert_that_retrieve_delivers_found_values_on_non_empty_cache(store: &dyn FeedStore) {
    let feed = unique_image_feed();
    let timestamp = Utc::now();

    insert(store, feed.clone(), timestamp).unwrap();

    assert_eq!(retrieved(store), Retrieved::Found(CachedFeed::new(feed, timestamp)));
}

pub fn assert_that_retrieve_has_no_side_effects_on_non_empty_cache(store: &dyn FeedStore) {
    let feed = unique_image_feed();
    let timestamp = Utc::now();

    insert(store, feed.clone(), timestamp).unwrap();

    let expected = Retrieved::Found(CachedFeed::new(feed, timestamp));
    assert_eq!(retrieved(store), expected);
    assert_eq!(retrieved(store), expected);
}

pub fn assert_that_insert_delivers_no_error_on_empty_cache(store: &dyn FeedStore) {
    assert!(insert(store, unique_image_feed(), Utc::now()).is_ok());
}

pub fn assert_that_insert_delivers_no_error_on_non_empty_cache(store: &dyn FeedStore) {
    insert(store, unique_image_feed(), Utc::now()).unwrap();

    assert!(insert(store, unique_image_feed(), Utc::now()).is_ok());
}

pub fn assert_that_insert_overrides_previously_inserted_cache_values(store: &dyn FeedStore) {
    insert(store, unique_image_feed(), Utc::now()).unwrap();

    let latest_feed = unique_image_feed();
    let latest_timestamp = Utc::now();
    insert(store, latest_feed.clone(), latest_timestamp).unwrap();

    assert_eq!(
        retrieved(store),
        Retrieved::Found(CachedFeed::new(latest_feed, latest_timestamp))
    );
}

pub fn assert_that_delete_delivers_no_error_on_empty_cache(store: &dyn FeedStore) {
    assert!(delete(store).is_ok());
}

pub fn assert_that_delete_has_no_side_effects_on_empty_cache(store: &dyn FeedStore) {
    delete(store).unwrap();

    assert_eq!(retrieved(store), Retrieved::Empty);
}

pub fn assert_that_delete_delivers_no_error_on_non_empty_cache(store: &dyn FeedStore) {
    insert(store, unique_image_feed(), Utc::now()).unwrap();

    assert!(delete(store).is_ok());
}

pub fn assert_that_delete_empties_previously_inserted_cache(store: &dyn FeedStore) {
    insert(store, unique_image_feed(), Utc::now()).unwrap();

    delete(store).unwrap();

    assert_eq!(retrieved(store), Retrieved::Empty);
}

/// Issues insert, delete, insert back to back without waiting and checks the completions
/// arrive in issue order and the final state is the last insert.
pub fn assert_that_side_effects_run_serially(store: &dyn FeedStore) {
    let completed = Arc::new(Mutex::new(Vec::new()));
    let (sender, receiver) = mpsc::channel();

    let (order, done) = (completed.clone(), sender.clone());
    store.insert(
        unique_image_feed(),
        Utc::now(),
        Box::new(move |_| {
            order.lock().unwrap().push("first insert");
            let _ = done.send(());
        }),
    );

    let (order, done) = (completed.clone(), sender.clone());
    store.delete_cached_feed(Box::new(move |_| {
        order.lock().unwrap().push("delete");
        let _ = done.send(());
    }));

    let last_feed = unique_image_feed();
    let last_timestamp = Utc::now();
    let (order, done) = (completed.clone(), sender);
    store.insert(
        last_feed.clone(),
        last_timestamp,
        Box::new(move |_| {
            order.lock().unwrap().push("second insert");
            let _ = done.send(());
        }),
    );

    for _ in 0..3 {
        receiver.recv_timeout(TIMEOUT).expect("operation did not complete");
    }

    assert_eq!(
        *completed.lock().unwrap(),
        vec!["first insert", "delete", "second insert"]
    );
    assert_eq!(
        retrieved(store),
        Retrieved::Found(CachedFeed::new(last_feed, last_timestamp))
    );
}

/// Issues insert, delete, insert from three different threads, each joined before the next
/// starts, and checks the completions arrive in issue order.
pub fn assert_that_side_effects_run_serially_across_threads(store: &dyn FeedStore) {
    let completed = Arc::new(Mutex::new(Vec::new()));
    let (sender, receiver) = mpsc::channel();
    let last_feed = unique_image_feed();
    let last_timestamp = Utc::now();

    thread::scope(|scope| {
        let (order, done) = (completed.clone(), sender.clone());
        scope
            .spawn(move || {
                store.insert(
                    unique_image_feed(),
                    Utc::now(),
                    Box::new(move |_| {
                        order.lock().unwrap().push("first insert");
                        let _ = done.send(());
                    }),
                );
            })
            .join()
            .unwrap();

        let (order, done) = (completed.clone(), sender.clone());
        scope
            .spawn(move || {
                store.delete_cached_feed(Box::new(move |_| {
                    order.lock().unwrap().push("delete");
                    let _ = done.send(());
                }));
            })
            .join()
            .unwrap();

        let (order, done, feed) = (completed.clone(), sender, last_feed.clone());
        scope
            .spawn(move || {
                store.insert(
                    feed,
                    last_timestamp,
                    Box::new(move |_| {
                        order.lock().unwrap().push("second insert");
                        let _ = done.send(());
                    }),
                );
            })
            .join()
            .unwrap();
    });

    for _ in 0..3 {
        receiver.recv_timeout(TIMEOUT).expect("operation did not complete");
    }

    assert_eq!(
        *completed.lock().unwrap(),
        vec!["first insert", "delete", "second insert"]
    );
    assert_eq!(
        retrieved(store),
        Retrieved::Found(CachedFeed::new(last_feed, last_timestamp))
    );
}

/// Expects the store to already hold data it cannot read.
pub fn assert_that_retrieve_delivers_failure_on_retrieval_error(store: &dyn FeedStore) {
    assert_eq!(retrieved(store), Retrieved::Failed);
}

pub fn assert_that_retrieve_has_no_side_effects_on_failure(store: &dyn FeedStore) {
    assert_eq!(retrieved(store), Retrieved::Failed);
    assert_eq!(retrieved(store), Retrieved::Failed);
}

/// Expects a store that cannot be written to.
pub fn assert_that_insert_delivers_error_on_insertion_error(store: &dyn FeedStore) {
    let result = insert(store, unique_image_feed(), Utc::now());

    assert!(matches!(result, Err(StoreError::Insertion(_))), "got {result:?}");
}

pub fn assert_that_insert_has_no_side_effects_on_insertion_error(store: &dyn FeedStore) {
    let _ = insert(store, unique_image_feed(), Utc::now());

    assert_eq!(retrieved(store), Retrieved::Empty);
}

/// Expects a store whose cached data cannot be removed.
pub fn assert_that_delete_delivers_error_on_deletion_error(store: &dyn FeedStore) {
    let result = delete(store);

    assert!(matches!(result, Err(StoreError::Deletion(_))), "got {result:?}");
}

pub fn assert_that_delete_has_no_side_effects_on_deletion_error(store: &dyn FeedStore) {
    let before = retrieved(store);

    let _ = delete(store);

    assert_eq!(retrieved(store), before);
}
