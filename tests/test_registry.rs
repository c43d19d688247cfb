use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gatehouse::server::registry::{RequestHandler, ResourceRegistry};

fn marker_handler(marker: &'static str) -> RequestHandler {
    Arc::new(move |_request, writer| {
        writer.write(marker.as_bytes());
        Ok(())
    })
}

fn counting_handler(counter: Arc<AtomicUsize>) -> RequestHandler {
    Arc::new(move |_request, _writer| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

#[test]
fn test_find_exact_match() {
    let registry = ResourceRegistry::new();
    registry.add("/echo", marker_handler("echo"));

    assert!(registry.find("/echo").is_some());
    assert!(registry.find("/other").is_none());
}

#[test]
fn test_find_prefix_match_on_segment_boundary() {
    let registry = ResourceRegistry::new();
    registry.add("/a", marker_handler("a"));
    registry.add("/a/b", marker_handler("ab"));

    // deeper resources resolve to the longest registered prefix
    assert!(registry.find("/a/b/c").is_some());
    assert!(registry.find("/a/x").is_some());
    // a prefix that does not end on a '/' boundary is rejected
    assert!(registry.find("/ax").is_none());
}

#[test]
fn test_find_longest_prefix_wins() {
    let registry = ResourceRegistry::new();
    let hits_a = Arc::new(AtomicUsize::new(0));
    let hits_ab = Arc::new(AtomicUsize::new(0));
    registry.add("/a", counting_handler(hits_a.clone()));
    registry.add("/a/b", counting_handler(hits_ab.clone()));

    let request = gatehouse::http::request::RequestBuilder::new()
        .method(gatehouse::http::request::Method::GET)
        .resource("/a/b/c")
        .build()
        .unwrap();
    let mut writer = gatehouse::http::writer::ResponseWriter::new();

    let handler = registry.find("/a/b/c").expect("handler for /a/b/c");
    handler(&request, &mut writer).unwrap();
    assert_eq!(hits_ab.load(Ordering::SeqCst), 1);
    assert_eq!(hits_a.load(Ordering::SeqCst), 0);

    // /a/bb starts with /a/b byte-wise but not on a segment boundary
    let handler = registry.find("/a/bb").expect("handler for /a/bb");
    handler(&request, &mut writer).unwrap();
    assert_eq!(hits_a.load(Ordering::SeqCst), 1);
    assert_eq!(hits_ab.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_prefix_is_catch_all() {
    let registry = ResourceRegistry::new();
    let hits_root = Arc::new(AtomicUsize::new(0));
    registry.add("", counting_handler(hits_root.clone()));
    registry.add("/a", marker_handler("a"));

    let request = gatehouse::http::request::RequestBuilder::new()
        .method(gatehouse::http::request::Method::GET)
        .resource("/zzz")
        .build()
        .unwrap();
    let mut writer = gatehouse::http::writer::ResponseWriter::new();

    let handler = registry.find("/zzz").expect("catch-all handler");
    handler(&request, &mut writer).unwrap();
    assert_eq!(hits_root.load(Ordering::SeqCst), 1);
}

#[test]
fn test_trailing_slash_is_normalised() {
    let registry = ResourceRegistry::new();
    registry.add("/api/", marker_handler("api"));

    assert!(registry.find("/api").is_some());
    assert!(registry.find("/api/").is_some());
    assert!(registry.find("/api/users").is_some());
}

#[test]
fn test_add_replaces_existing_handler() {
    let registry = ResourceRegistry::new();
    let hits_old = Arc::new(AtomicUsize::new(0));
    let hits_new = Arc::new(AtomicUsize::new(0));

    registry.add("/x", counting_handler(hits_old.clone()));
    registry.add("/x", counting_handler(hits_new.clone()));

    let request = gatehouse::http::request::RequestBuilder::new()
        .method(gatehouse::http::request::Method::GET)
        .resource("/x")
        .build()
        .unwrap();
    let mut writer = gatehouse::http::writer::ResponseWriter::new();

    let handler = registry.find("/x").expect("replacement handler");
    handler(&request, &mut writer).unwrap();
    assert_eq!(hits_old.load(Ordering::SeqCst), 0);
    assert_eq!(hits_new.load(Ordering::SeqCst), 1);
}

#[test]
fn test_remove_twice_is_noop() {
    let registry = ResourceRegistry::new();
    registry.add("/x", marker_handler("x"));

    registry.remove("/x");
    assert!(registry.find("/x").is_none());

    registry.remove("/x");
    assert!(registry.find("/x").is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_find_on_empty_registry() {
    let registry = ResourceRegistry::new();
    assert!(registry.find("/anything").is_none());
    assert!(registry.find("").is_none());
}
