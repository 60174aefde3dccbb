//! Tests for the in-memory topology builder.

use crate::config::TopologyConfig;
use crate::serialization::JsonSerde;
use crate::state_store::{key_value_store, windowed_store};
use crate::topic;
use crate::topology::{Topology, TopologyBuilder};
use crate::window::TimeWindows;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

fn set(items: &[&str]) -> BTreeSet<String> {
  items.iter().map(|s| s.to_string()).collect()
}

fn counts_store(name: &str) -> crate::stores::StoreDescriptor<String, u64> {
  key_value_store(
    Arc::new(JsonSerde::<String>::new()),
    Arc::new(JsonSerde::<u64>::new()),
    Some(name),
  )
  .unwrap()
}

// ============================================================================
// Name Generation
// ============================================================================

#[test]
fn test_generated_names_are_unique_and_legal() {
  let topology = TopologyBuilder::new();
  let mut seen = HashSet::new();
  for _ in 0..50 {
    let name = topology.new_name("KSTREAM-MAP-");
    let store = topology.new_store_name("KSTREAM-JOIN-");
    assert!(topic::is_valid(&name));
    assert!(topic::is_valid(&store));
    assert!(seen.insert(name));
    assert!(seen.insert(store));
  }
}

#[test]
fn test_generated_name_format() {
  let topology = TopologyBuilder::new();
  assert_eq!(topology.new_name("KSTREAM-SOURCE-"), "KSTREAM-SOURCE-0000000000");
  assert_eq!(
    topology.new_store_name("KTABLE-AGGREGATE-"),
    "KTABLE-AGGREGATE-STATE-STORE-0000000001"
  );
}

#[test]
fn test_name_generation_across_threads() {
  let topology = Arc::new(TopologyBuilder::new());
  let handles: Vec<_> = (0..4)
    .map(|_| {
      let topology = Arc::clone(&topology);
      std::thread::spawn(move || (0..25).map(|_| topology.new_name("P-")).collect::<Vec<_>>())
    })
    .collect();

  let names: HashSet<String> = handles
    .into_iter()
    .flat_map(|h| h.join().unwrap())
    .collect();
  assert_eq!(names.len(), 100);
}

// ============================================================================
// Sources and Co-partitioning
// ============================================================================

#[test]
fn test_add_source_validation() {
  let topology = TopologyBuilder::new();
  topology.add_source("src", ["orders"]).unwrap();
  assert_eq!(topology.source_topics("src"), Some(vec!["orders".to_string()]));

  assert!(topology.add_source("src", ["other"]).unwrap_err().is_invalid_argument());
  assert!(topology
    .add_source("empty", Vec::<String>::new())
    .unwrap_err()
    .is_invalid_argument());
  assert!(topology.add_source("bad", ["bad topic"]).unwrap_err().is_name_invalid());
  assert_eq!(topology.source_topics("missing"), None);
}

#[test]
fn test_copartition_registration_is_idempotent() {
  let topology = TopologyBuilder::new();
  topology.copartition_sources(&set(&["A", "B"]));
  topology.copartition_sources(&set(&["B", "A"]));

  assert_eq!(topology.copartition_source_groups(), vec![set(&["A", "B"])]);
}

#[test]
fn test_copartition_groups_map_sources_to_topics() {
  let topology = TopologyBuilder::new();
  topology.add_source("A", ["orders"]).unwrap();
  topology.add_source("B", ["payments", "refunds"]).unwrap();
  topology.add_source("C", ["clicks"]).unwrap();

  topology.copartition_sources(&set(&["A", "B"]));

  assert_eq!(
    topology.copartition_groups(),
    vec![set(&["orders", "payments", "refunds"])]
  );
}

#[test]
fn test_overlapping_copartition_groups_merge() {
  let topology = TopologyBuilder::new();
  for (node, topic_name) in [("A", "a"), ("B", "b"), ("C", "c"), ("D", "d"), ("E", "e")] {
    topology.add_source(node, [topic_name]).unwrap();
  }

  topology.copartition_sources(&set(&["A", "B"]));
  topology.copartition_sources(&set(&["D", "E"]));
  topology.copartition_sources(&set(&["B", "C"]));

  assert_eq!(
    topology.copartition_groups(),
    vec![set(&["a", "b", "c"]), set(&["d", "e"])]
  );

  // Bridging the two groups merges everything.
  topology.copartition_sources(&set(&["C", "D"]));
  assert_eq!(
    topology.copartition_groups(),
    vec![set(&["a", "b", "c", "d", "e"])]
  );
}

// ============================================================================
// State Stores
// ============================================================================

#[test]
fn test_add_state_store_once() {
  let topology = TopologyBuilder::new();
  let descriptor = counts_store("counts");

  topology.add_state_store(&descriptor, &["KSTREAM-AGGREGATE-0000000001"]).unwrap();
  assert_eq!(topology.state_store("counts"), Some(descriptor.spec().clone()));
  assert_eq!(
    topology.store_processors("counts"),
    set(&["KSTREAM-AGGREGATE-0000000001"])
  );

  let err = topology.add_state_store(&descriptor, &[]).unwrap_err();
  assert!(err.is_invalid_argument());
}

#[test]
fn test_connect_processors_to_store() {
  let topology = TopologyBuilder::new();
  assert!(topology
    .connect_processors_to_store("counts", &["p1"])
    .unwrap_err()
    .is_invalid_argument());

  topology.add_state_store(&counts_store("counts"), &["p1"]).unwrap();
  topology.connect_processors_to_store("counts", &["p2"]).unwrap();
  assert_eq!(topology.store_processors("counts"), set(&["p1", "p2"]));
}

#[test]
fn test_changelog_topic_uses_application_id() {
  let config = TopologyConfig::new().with_application_id("billing");
  let topology = TopologyBuilder::with_config(config).unwrap();
  topology.add_state_store(&counts_store("counts"), &[]).unwrap();

  assert_eq!(
    topology.changelog_topic("counts"),
    Some("billing-counts-changelog".to_string())
  );
  assert_eq!(topology.changelog_topic("missing"), None);
}

#[test]
fn test_add_state_store_rejects_overlong_changelog_topic() {
  let topology = TopologyBuilder::new();
  let name = "s".repeat(topic::MAX_NAME_LENGTH);
  let descriptor = counts_store(&name);

  let err = topology.add_state_store(&descriptor, &["p1"]).unwrap_err();
  assert!(err.is_name_invalid());
  assert_eq!(topology.state_store(&name), None);

  // Without a changelog the same name is accepted.
  let unlogged = crate::state_store::store_factory(
    Arc::new(JsonSerde::<String>::new()),
    Arc::new(JsonSerde::<u64>::new()),
    &name,
  )
  .disable_logging()
  .build();
  topology.add_state_store(&unlogged, &["p1"]).unwrap();
  assert_eq!(topology.changelog_topic(&name), None);
}

#[test]
fn test_with_config_rejects_illegal_application_id() {
  let config = TopologyConfig::new().with_application_id("bad id");
  assert!(TopologyBuilder::with_config(config).unwrap_err().is_name_invalid());
}

#[test]
fn test_describe_serializes() {
  let topology = TopologyBuilder::with_config(TopologyConfig::new().with_application_id("app")).unwrap();
  topology.add_source("A", ["left"]).unwrap();
  topology.add_source("B", ["right"]).unwrap();
  topology.copartition_sources(&set(&["A", "B"]));

  let windows = TimeWindows::of(Duration::from_secs(60)).unwrap();
  let descriptor = windowed_store(
    Arc::new(JsonSerde::<String>::new()),
    Arc::new(JsonSerde::<String>::new()),
    &windows,
    Some("join-this"),
  )
  .unwrap();
  topology.add_state_store(&descriptor, &["join"]).unwrap();

  let description = topology.describe();
  assert_eq!(description.copartition_groups, vec![set(&["left", "right"])]);
  assert_eq!(
    description.changelog_topics.get("join-this").map(String::as_str),
    Some("app-join-this-changelog")
  );

  let json = serde_json::to_value(&description).unwrap();
  assert_eq!(json["application_id"], "app");
  assert_eq!(json["state_stores"][0]["name"], "join-this");
  assert_eq!(json["state_stores"][0]["kind"]["Windowed"]["retain_duplicates"], false);
}
