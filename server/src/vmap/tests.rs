/*
 * Created on Thu Feb 06 2025
 *
 * This file is a part of LexiDB
 * LexiDB is a free and open-source in-memory key/value database that
 * aims to deliver predictable performance through a compact typed object
 * model and a vectorized keyspace engine
 *
 * Copyright (c) 2025, the LexiDB authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

use super::imp::Group;
use super::{capacity_to_growth, control_bytes, h2, num_cloned_bytes, Vmap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn key(n: u32) -> Vec<u8> {
    format!("key-{}", n).into_bytes()
}

/// Walks the raw control array and asserts the metadata invariants: every
/// full byte carries its key's H2, every mirrored byte agrees with its
/// canonical, and live + dead stays within the 7/8 load bound
fn assert_table_invariants(map: &Vmap<Vec<u8>, u32>) {
    let table = &map.table;
    let capacity = table.capacity;
    if capacity == 0 {
        return;
    }
    unsafe {
        for i in 0..capacity {
            let ctrl = *table.ctrl_ptr(i);
            if control_bytes::is_full(ctrl) {
                let entry = &*table.slot_ptr(i);
                assert_eq!(
                    ctrl,
                    h2(map.hash_key(&entry.0)),
                    "control byte at {} does not match its key's tag",
                    i
                );
            }
            let mirror = (i.wrapping_sub(num_cloned_bytes()) & capacity)
                + (num_cloned_bytes() & capacity);
            assert_eq!(
                *table.ctrl_ptr(mirror),
                ctrl,
                "mirror of control byte {} went stale",
                i
            );
        }
        assert_eq!(*table.ctrl_ptr(capacity), control_bytes::SENTINEL);
    }
    assert!(
        table.items + table.tombstones <= capacity_to_growth(capacity),
        "load factor bound broken: {} live + {} dead on capacity {}",
        table.items,
        table.tombstones,
        capacity
    );
}

#[test]
fn empty_map() {
    let map: Vmap<Vec<u8>, u32> = Vmap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.capacity(), 0);
    assert_eq!(map.get(&key(1)[..]), None);
    assert!(!map.contains_key(&key(1)[..]));
    assert_eq!(map.iter().count(), 0);
}

#[test]
fn insert_with_zero_capacity_allocates() {
    let mut map = Vmap::new();
    assert_eq!(map.capacity(), 0);
    assert_eq!(map.insert(key(1), 10).unwrap(), None);
    assert!(map.capacity() >= 1);
    assert_eq!(map.get(&key(1)[..]), Some(&10));
    assert_table_invariants(&map);
}

#[test]
fn double_insert_is_idempotent() {
    let mut map = Vmap::new();
    assert_eq!(map.insert(key(7), 1).unwrap(), None);
    assert_eq!(map.insert(key(7), 1).unwrap(), Some(1));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&key(7)[..]), Some(&1));
    // the replacement value wins
    assert_eq!(map.insert(key(7), 2).unwrap(), Some(1));
    assert_eq!(map.get(&key(7)[..]), Some(&2));
    assert_eq!(map.len(), 1);
}

#[test]
fn delete_then_find_is_absent() {
    let mut map = Vmap::new();
    for n in 0..64 {
        map.insert(key(n), n).unwrap();
    }
    assert_eq!(map.remove(&key(13)[..]), Some(13));
    assert_eq!(map.get(&key(13)[..]), None);
    assert_eq!(map.remove(&key(13)[..]), None);
    assert_eq!(map.len(), 63);
    assert_table_invariants(&map);
}

#[test]
fn growth_keeps_every_entry_reachable() {
    let mut map = Vmap::new();
    for n in 0..10_000u32 {
        map.insert(key(n), n).unwrap();
        assert_eq!(map.len() as u32, n + 1);
    }
    for n in 0..10_000u32 {
        assert_eq!(map.get(&key(n)[..]), Some(&n), "lost key {}", n);
    }
    assert_table_invariants(&map);
}

#[test]
fn randomized_against_reference() {
    let mut rng = StdRng::seed_from_u64(0xBADC_0FFE);
    let mut map = Vmap::new();
    let mut reference: HashMap<Vec<u8>, u32> = HashMap::new();
    for _ in 0..50_000 {
        // a narrow keyspace so inserts, hits and deletes all happen often
        let k = key(rng.gen_range(0..700));
        match rng.gen_range(0..3) {
            0 => {
                let v: u32 = rng.gen();
                assert_eq!(map.insert(k.clone(), v).unwrap(), reference.insert(k, v));
            }
            1 => {
                assert_eq!(map.remove(&k[..]), reference.remove(&k));
            }
            _ => {
                assert_eq!(map.get(&k[..]), reference.get(&k));
            }
        }
        assert_eq!(map.len(), reference.len());
    }
    assert_table_invariants(&map);
    // logical contents must be identical in both directions
    for (k, v) in map.iter() {
        assert_eq!(reference.get(k), Some(v));
    }
    for (k, v) in &reference {
        assert_eq!(map.get(&k[..]), Some(v));
    }
}

#[test]
fn iteration_yields_each_live_entry_exactly_once() {
    let mut map = Vmap::new();
    for n in 0..500u32 {
        map.insert(key(n), n).unwrap();
    }
    for n in (0..500u32).step_by(3) {
        map.remove(&key(n)[..]);
    }
    let mut seen: HashMap<Vec<u8>, u32> = HashMap::new();
    for (k, v) in map.iter() {
        assert!(seen.insert(k.clone(), *v).is_none(), "duplicate entry {:?}", k);
    }
    assert_eq!(seen.len(), map.len());
    for (k, v) in &seen {
        assert_eq!(map.get(&k[..]), Some(v));
    }
}

#[test]
fn tombstone_heavy_workload_reclaims() {
    let mut map = Vmap::new();
    let mut reference: HashMap<Vec<u8>, u32> = HashMap::new();
    // churn the same narrow range so tombstones pile up and the in-place
    // rehash path runs
    for round in 0..200u32 {
        for n in 0..300u32 {
            let k = key(n);
            if round % 2 == 0 {
                map.insert(k.clone(), round).unwrap();
                reference.insert(k, round);
            } else {
                map.remove(&k[..]);
                reference.remove(&k);
            }
        }
        assert_eq!(map.len(), reference.len());
    }
    assert_table_invariants(&map);
    for (k, v) in &reference {
        assert_eq!(map.get(&k[..]), Some(v));
    }
}

#[test]
fn clear_keeps_small_allocations() {
    let mut map = Vmap::new();
    for n in 0..50u32 {
        map.insert(key(n), n).unwrap();
    }
    let capacity = map.capacity();
    assert!(capacity <= 127);
    map.clear();
    assert_eq!(map.len(), 0);
    assert_eq!(map.capacity(), capacity);
    assert_eq!(map.iter().count(), 0);
    // and the table is fully usable afterwards
    map.insert(key(1), 1).unwrap();
    assert_eq!(map.get(&key(1)[..]), Some(&1));
}

#[test]
fn clear_releases_large_allocations() {
    let mut map = Vmap::new();
    for n in 0..2_000u32 {
        map.insert(key(n), n).unwrap();
    }
    assert!(map.capacity() > 127);
    map.clear();
    assert_eq!(map.len(), 0);
    assert_eq!(map.capacity(), 0);
}

#[test]
fn rehash_zero_deallocates_when_empty() {
    let mut map = Vmap::new();
    for n in 0..32u32 {
        map.insert(key(n), n).unwrap();
    }
    for n in 0..32u32 {
        map.remove(&key(n)[..]);
    }
    assert_eq!(map.len(), 0);
    map.rehash(0).unwrap();
    assert_eq!(map.capacity(), 0);
}

#[test]
fn reserve_prevents_reallocation() {
    let mut map = Vmap::new();
    map.reserve(1_000).unwrap();
    let capacity = map.capacity();
    assert!(capacity_to_growth(capacity) >= 1_000);
    for n in 0..1_000u32 {
        map.insert(key(n), n).unwrap();
    }
    assert_eq!(map.capacity(), capacity);
    assert_table_invariants(&map);
}

#[test]
fn group_matchers() {
    let mut bytes = [control_bytes::EMPTY; Group::WIDTH];
    bytes[0] = 0x12;
    bytes[1] = control_bytes::DELETED;
    bytes[2] = control_bytes::SENTINEL;
    bytes[3] = 0x12;
    let group = unsafe { Group::load_unaligned(bytes.as_ptr()) };

    let tagged: Vec<usize> = group.match_byte(0x12).into_iter().collect();
    assert_eq!(tagged, vec![0, 3]);

    let full: Vec<usize> = group.match_full().into_iter().collect();
    assert_eq!(full, vec![0, 3]);

    let empty: Vec<usize> = group.match_empty().into_iter().collect();
    assert!(!empty.contains(&0));
    assert!(!empty.contains(&1));
    assert!(!empty.contains(&2));
    assert!(!empty.contains(&3));
    assert!(empty.contains(&4));

    let dead: Vec<usize> = group.match_empty_or_deleted().into_iter().collect();
    assert!(dead.contains(&1));
    assert!(!dead.contains(&2));
    assert!(dead.contains(&4));

    assert_eq!(group.count_leading_empty_or_deleted(), 0);
    let all_empty = [control_bytes::EMPTY; Group::WIDTH];
    let all_empty = unsafe { Group::load_unaligned(all_empty.as_ptr()) };
    assert_eq!(all_empty.count_leading_empty_or_deleted(), Group::WIDTH);
}

#[test]
fn values_are_dropped_exactly_once() {
    use std::rc::Rc;
    let token = Rc::new(());
    let mut map = Vmap::new();
    for n in 0..600u32 {
        map.insert(key(n), Rc::clone(&token)).unwrap();
    }
    // replacement drops the old value
    map.insert(key(0), Rc::clone(&token)).unwrap();
    assert_eq!(Rc::strong_count(&token), 601);
    for n in 0..300u32 {
        map.remove(&key(n)[..]);
    }
    assert_eq!(Rc::strong_count(&token), 301);
    drop(map);
    assert_eq!(Rc::strong_count(&token), 1);
}
