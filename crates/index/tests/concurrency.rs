// Path: crates/index/tests/concurrency.rs

//! Concurrent inserts and searches against a shared index.

use anyhow::Result;
use nrepo_index::{ContentIndex, MemoryContentStore};
use nrepo_types::{ChildSelector, ContentObject, Interest, Name, PublisherDigest, Timestamp};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

const WRITERS: usize = 4;
const PER_WRITER: usize = 200;

fn object(uri: &str) -> Result<ContentObject> {
    Ok(ContentObject::new(
        Name::parse(uri)?,
        PublisherDigest::of_key(b"writer"),
        Timestamp::from_ticks(1),
        uri.as_bytes().to_vec(),
    ))
}

#[test]
fn concurrent_writers_and_readers() -> Result<()> {
    let index = ContentIndex::new();
    let store = MemoryContentStore::new();
    let shared_inserted = AtomicUsize::new(0);

    thread::scope(|scope| -> Result<()> {
        let mut writers = Vec::new();
        for w in 0..WRITERS {
            let (index, store, shared_inserted) = (&index, &store, &shared_inserted);
            writers.push(scope.spawn(move || -> Result<()> {
                for i in 0..PER_WRITER {
                    let obj = object(&format!("/t/w{w}/n{i:04}"))?;
                    let slot = store.put(obj.clone());
                    let ts = Timestamp::from_ticks((w * PER_WRITER + i) as u64);
                    assert!(index.insert(&obj, slot, ts, store).inserted);

                    // Every writer also races to store the same object.
                    if i % 50 == 0 {
                        let shared = object("/t/shared")?;
                        let slot = store.put(shared.clone());
                        if index.insert(&shared, slot, ts, store).inserted {
                            shared_inserted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                }
                Ok(())
            }));
        }

        let readers: Vec<_> = [ChildSelector::Leftmost, ChildSelector::Rightmost]
            .into_iter()
            .map(|selector| {
                let (index, store) = (&index, &store);
                scope.spawn(move || -> Result<usize> {
                    let interest = Interest::new(Name::parse("/t")?)
                        .with_min_suffix_components(2)
                        .with_child_selector(selector);
                    let mut hits = 0;
                    for _ in 0..200 {
                        if let Some(found) = index.get(&interest, store) {
                            assert_eq!(found.object.name.count(), 3);
                            hits += 1;
                        }
                    }
                    Ok(hits)
                })
            })
            .collect();

        for writer in writers {
            writer
                .join()
                .map_err(|_| anyhow::anyhow!("writer panicked"))??;
        }
        for reader in readers {
            reader
                .join()
                .map_err(|_| anyhow::anyhow!("reader panicked"))??;
        }
        Ok(())
    })?;

    assert_eq!(shared_inserted.load(Ordering::SeqCst), 1);
    assert_eq!(index.len(), WRITERS * PER_WRITER + 1);
    for w in 0..WRITERS {
        for i in 0..PER_WRITER {
            let name = Name::parse(&format!("/t/w{w}/n{i:04}"))?;
            assert_eq!(index.lookup(&name).map(|refs| refs.len()), Some(1));
        }
    }

    // Children stay sorted no matter which writer added them.
    let t = index
        .lookup_node(&Name::parse("/t")?, 1)
        .ok_or_else(|| anyhow::anyhow!("missing /t"))?;
    let children = t.child_components();
    let mut sorted = children.clone();
    sorted.sort();
    assert_eq!(children, sorted);
    assert_eq!(children.len(), WRITERS + 1);

    let leftmost = Interest::new(Name::parse("/t")?).with_min_suffix_components(2);
    let found = index
        .get(&leftmost, &store)
        .ok_or_else(|| anyhow::anyhow!("no match"))?;
    assert_eq!(found.object.name, Name::parse("/t/w0/n0000")?);
    let rightmost = leftmost.with_child_selector(ChildSelector::Rightmost);
    let found = index
        .get(&rightmost, &store)
        .ok_or_else(|| anyhow::anyhow!("no match"))?;
    assert_eq!(
        found.object.name,
        Name::parse(&format!("/t/w{}/n{:04}", WRITERS - 1, PER_WRITER - 1))?
    );
    Ok(())
}
