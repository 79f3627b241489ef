// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the offline queue module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::descriptor::Method;
use chrono::{TimeZone, Utc};
use serde_json::json;
use tempfile::tempdir;

fn move_stock(n: u32) -> MutationDescriptor {
    MutationDescriptor::new(
        Method::Post,
        "/inventory/move",
        json!({"sku": format!("SKU-{n}"), "qty": n}),
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, n).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_append_preserves_order_and_fields() {
    let mut queue = OfflineQueue::in_memory();
    let issued: Vec<_> = (0..5).map(move_stock).collect();

    for d in &issued {
        queue.append(d.clone()).unwrap();
    }

    assert_eq!(queue.len(), 5);
    assert_eq!(queue.drain_all(), issued);
}

#[test]
fn test_duplicates_are_distinct_entries() {
    let mut queue = OfflineQueue::in_memory();
    queue.append(move_stock(1)).unwrap();
    queue.append(move_stock(1)).unwrap();

    assert_eq!(queue.len(), 2);
}

#[test]
fn test_drain_all_does_not_remove() {
    let mut queue = OfflineQueue::in_memory();
    queue.append(move_stock(1)).unwrap();

    let first = queue.drain_all();
    let second = queue.drain_all();

    assert_eq!(first, second);
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_clear() {
    let mut queue = OfflineQueue::in_memory();
    queue.append(move_stock(1)).unwrap();
    queue.append(move_stock(2)).unwrap();

    queue.clear().unwrap();

    assert!(queue.is_empty());
    assert!(queue.drain_all().is_empty());
}

#[test]
fn test_remove_first() {
    let mut queue = OfflineQueue::in_memory();
    for n in 1..=3 {
        queue.append(move_stock(n)).unwrap();
    }

    queue.remove_first(1).unwrap();

    let left = queue.drain_all();
    assert_eq!(left, vec![move_stock(2), move_stock(3)]);
}

#[test]
fn test_remove_first_beyond_len_clears() {
    let mut queue = OfflineQueue::in_memory();
    queue.append(move_stock(1)).unwrap();

    queue.remove_first(10).unwrap();

    assert!(queue.is_empty());
}

#[test]
fn test_journal_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");

    {
        let mut queue = OfflineQueue::open(&path).unwrap();
        queue.append(move_stock(1)).unwrap();
        queue.append(move_stock(2)).unwrap();
    }

    let queue = OfflineQueue::open(&path).unwrap();
    assert_eq!(queue.drain_all(), vec![move_stock(1), move_stock(2)]);
    assert_eq!(queue.journal(), Some(path.as_path()));
}

#[test]
fn test_journal_clear_and_remove_first_persist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");

    let mut queue = OfflineQueue::open(&path).unwrap();
    for n in 1..=3 {
        queue.append(move_stock(n)).unwrap();
    }
    queue.remove_first(2).unwrap();
    assert_eq!(OfflineQueue::open(&path).unwrap().drain_all(), vec![move_stock(3)]);

    queue.clear().unwrap();
    assert!(OfflineQueue::open(&path).unwrap().is_empty());
}

#[test]
fn test_journal_with_blank_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");

    let mut queue = OfflineQueue::open(&path).unwrap();
    queue.append(move_stock(1)).unwrap();

    use std::io::Write;
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file).unwrap();
    writeln!(file, "   ").unwrap();

    queue.append(move_stock(2)).unwrap();

    assert_eq!(OfflineQueue::open(&path).unwrap().len(), 2);
}

#[test]
fn test_replace_prefix_keeps_retained_ahead_of_newer_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");

    let mut queue = OfflineQueue::open(&path).unwrap();
    for n in 1..=4 {
        queue.append(move_stock(n)).unwrap();
    }

    // 1..=3 were replayed; 2 failed; 4 arrived afterwards
    queue.replace_prefix(3, vec![move_stock(2)]).unwrap();

    assert_eq!(queue.drain_all(), vec![move_stock(2), move_stock(4)]);
    assert_eq!(
        OfflineQueue::open(&path).unwrap().drain_all(),
        vec![move_stock(2), move_stock(4)]
    );
}

#[test]
fn test_replace_prefix_with_nothing_retained_removes_prefix() {
    let mut queue = OfflineQueue::in_memory();
    for n in 1..=3 {
        queue.append(move_stock(n)).unwrap();
    }

    queue.replace_prefix(2, Vec::new()).unwrap();

    assert_eq!(queue.drain_all(), vec![move_stock(3)]);
}

#[test]
fn test_torn_tail_is_dropped_and_journal_repaired() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    {
        let mut queue = OfflineQueue::open(&path).unwrap();
        queue.append(move_stock(1)).unwrap();
    }
    // an append interrupted mid-write
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    std::io::Write::write_all(&mut file, br#"{"method":"POST","tar"#).unwrap();
    drop(file);

    let mut queue = OfflineQueue::open(&path).unwrap();
    assert_eq!(queue.drain_all(), vec![move_stock(1)]);

    queue.append(move_stock(2)).unwrap();
    assert_eq!(
        OfflineQueue::open(&path).unwrap().drain_all(),
        vec![move_stock(1), move_stock(2)]
    );
}

#[test]
fn test_corrupt_record_before_the_end_fails_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    {
        let mut queue = OfflineQueue::open(&path).unwrap();
        queue.append(move_stock(1)).unwrap();
    }
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    let valid = serde_json::to_string(&move_stock(2)).unwrap();
    std::io::Write::write_all(&mut file, format!("{{garbage\n{valid}\n").as_bytes()).unwrap();
    drop(file);

    assert!(matches!(OfflineQueue::open(&path), Err(crate::Error::CorruptedData { .. })));
}
