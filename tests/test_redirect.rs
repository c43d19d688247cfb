use gatehouse::server::redirect::RedirectTable;

#[test]
fn test_lookup_missing_entry() {
    let table = RedirectTable::new();
    assert_eq!(table.lookup("/anywhere"), None);
}

#[test]
fn test_add_and_lookup() {
    let table = RedirectTable::new();
    table.add("/old", "/new");

    assert_eq!(table.lookup("/old").as_deref(), Some("/new"));
    assert_eq!(table.lookup("/new"), None);
}

#[test]
fn test_trailing_slashes_normalised_on_both_sides() {
    let table = RedirectTable::new();
    table.add("/old/", "/new/");

    assert_eq!(table.lookup("/old").as_deref(), Some("/new"));
    assert_eq!(table.lookup("/old/").as_deref(), Some("/new"));
}

#[test]
fn test_add_replaces_existing_target() {
    let table = RedirectTable::new();
    table.add("/x", "/first");
    table.add("/x", "/second");

    assert_eq!(table.lookup("/x").as_deref(), Some("/second"));
}

#[test]
fn test_cycles_are_representable() {
    // the table itself allows cycles; the dispatcher bounds resolution
    let table = RedirectTable::new();
    table.add("/x", "/y");
    table.add("/y", "/x");

    assert_eq!(table.lookup("/x").as_deref(), Some("/y"));
    assert_eq!(table.lookup("/y").as_deref(), Some("/x"));
}
