use crate::utils::FreeList;

#[test]
fn test_insert_returns_sequential_handles() {
    let mut pool: FreeList<u32> = FreeList::new();
    assert_eq!(pool.insert(10), 0);
    assert_eq!(pool.insert(20), 1);
    assert_eq!(pool.insert(30), 2);
    assert_eq!(pool.len(), 3);
    assert_eq!(pool[1], 20);
}

#[test]
fn test_erase_and_reuse_lifo() {
    let mut pool: FreeList<u32> = FreeList::new();
    let a = pool.insert(10);
    let b = pool.insert(20);
    let c = pool.insert(30);

    pool.erase(b);
    pool.erase(a);
    assert_eq!(pool.len(), 1);

    // Most recently freed slot comes back first.
    assert_eq!(pool.insert(40), a);
    assert_eq!(pool.insert(50), b);
    assert_eq!(pool[c], 30);
    assert_eq!(pool[a], 40);
    assert_eq!(pool[b], 50);
}

#[test]
fn test_handles_stable_until_erased() {
    let mut pool: FreeList<String> = FreeList::new();
    let a = pool.insert("alpha".to_string());
    let b = pool.insert("beta".to_string());
    pool.erase(a);
    pool.insert("gamma".to_string());
    assert_eq!(pool[b], "beta");
}

#[test]
fn test_clear_drops_slots_and_free_chain() {
    let mut pool: FreeList<u32> = FreeList::new();
    let a = pool.insert(10);
    pool.insert(20);
    pool.erase(a);

    pool.clear();
    assert!(pool.is_empty());

    // After a clear, handles start from zero again with no stale free chain.
    assert_eq!(pool.insert(99), 0);
    assert_eq!(pool[0], 99);
}

#[test]
#[should_panic(expected = "vacant free-list handle")]
fn test_index_of_vacant_slot_panics() {
    let mut pool: FreeList<u32> = FreeList::new();
    let a = pool.insert(10);
    pool.erase(a);
    let _ = pool[a];
}
