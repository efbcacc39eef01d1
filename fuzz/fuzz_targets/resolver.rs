//! Fuzz target for descriptor resolution over arbitrary profile graphs.
//!
//! Profiles referencing each other in arbitrary ways must always resolve or
//! fail; cycles must be reported, never loop.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_resolver
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tether_config::{ConfigurationRegistry, raw_config};
use tether_connect::{AdapterLoader, Descriptor, Resolver};

/// A structured profile graph for fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzGraph {
    /// Per profile: `None` is a configuration, `Some(i)` references profile `i`.
    edges: Vec<Option<u8>>,
    start: u8,
    url: String,
}

fuzz_target!(|graph: FuzzGraph| {
    if graph.edges.is_empty() {
        return;
    }

    let name = |i: usize| format!("p{}", i % graph.edges.len());
    let mut registry = ConfigurationRegistry::new();
    for (i, edge) in graph.edges.iter().enumerate() {
        match edge {
            Some(target) => registry.insert(name(i), name(*target as usize)),
            None => registry.insert(name(i), raw_config! { "adapter" => "sqlite", "database" => name(i) }),
        };
    }

    let loader = AdapterLoader::new();
    let resolver = Resolver::new(&registry, &loader);

    let _ = resolver.resolve(name(graph.start as usize));
    let _ = resolver.resolve(graph.url.as_str());
    let _ = resolver.resolve(Descriptor::url(graph.url.as_str()));
});
