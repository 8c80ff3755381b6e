//! Exact-match next-hop table built from a handful of host routes.

use lc_trie::{BuildConfig, LcTrie};
use std::net::Ipv4Addr;

fn main() {
    example_host_routes();
    example_config();
}

fn example_host_routes() {
    println!("=== Host routes ===\n");

    let routes = [
        (Ipv4Addr::new(0, 183, 74, 3), "eth0"),
        (Ipv4Addr::new(0, 192, 3, 0), "eth2"),
        (Ipv4Addr::new(192, 37, 74, 0), "eth1"),
        (Ipv4Addr::new(192, 51, 65, 0), "eth2"),
    ];

    let pairs = routes.iter().map(|&(ip, hop)| (u32::from(ip), hop));
    let trie: LcTrie<u32, &str> = match LcTrie::build(pairs) {
        Ok(trie) => trie,
        Err(e) => {
            eprintln!("failed to build routing table: {e}");
            return;
        }
    };

    for ip in [
        Ipv4Addr::new(0, 183, 74, 3),
        Ipv4Addr::new(192, 51, 65, 0),
        Ipv4Addr::new(18, 52, 86, 120),
    ] {
        println!("{ip} -> {:?}", trie.lookup(u32::from(ip)));
    }

    println!("\nNext hops: {:?}", trie.values());
    let stats = trie.stats();
    println!("Nodes: {}, max depth: {}", stats.nodes, stats.max_depth);
    println!("Bytes: {}\n", stats.bytes);
}

fn example_config() {
    println!("=== Sparse fill factor ===\n");

    let pairs: Vec<(u32, u8)> = (0..10_000u32)
        .map(|i| (i.wrapping_mul(0x9e37_79b9), (i % 16) as u8))
        .collect();

    for fill_factor in [1.0, 0.5, 0.25] {
        let config = BuildConfig {
            fill_factor,
            ..BuildConfig::default()
        };
        match LcTrie::build_with_config(pairs.iter().copied(), &config) {
            Ok(trie) => {
                let stats = trie.stats();
                println!(
                    "fill_factor={fill_factor}: {} nodes ({} empty), avg depth {:.2}",
                    stats.nodes, stats.empty_leaves, stats.avg_depth
                );
            }
            Err(e) => eprintln!("fill_factor={fill_factor}: {e}"),
        }
    }
}
