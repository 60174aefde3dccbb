//! End-to-end wiring of join and aggregation operators on top of stream nodes.

use std::collections::BTreeSet;
use std::sync::{Arc, Once};
use std::time::Duration;
use streamweave_kstream::error::TopologyResult;
use streamweave_kstream::functions::{
  InitializerWithKey, ReducerWithKey, ValueJoiner, ValueJoinerWithKey,
};
use streamweave_kstream::key_adapter::{
  KeyIgnoringJoiner, initializer_with_key, joiner_with_key, reducer_with_key,
  reverse_joiner_with_key,
};
use streamweave_kstream::serialization::JsonSerde;
use streamweave_kstream::state_store::{key_value_store, windowed_store};
use streamweave_kstream::stores::StoreKind;
use streamweave_kstream::stream_node::StreamNode;
use streamweave_kstream::topology::{Topology, TopologyBuilder};
use streamweave_kstream::window::{JoinWindows, Windows};

static TRACING: Once = Once::new();

fn init_tracing() {
  TRACING.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_max_level(tracing::Level::TRACE)
      .with_test_writer()
      .try_init();
  });
}

/// Minimal stream operator built on a shared stream node.
struct KStream {
  node: StreamNode<String>,
}

/// Everything a stream-stream join hands to the execution engine.
struct JoinPlan<J> {
  output: KStream,
  this_store: String,
  other_store: String,
  joiner: J,
}

impl KStream {
  fn from_node(node: &StreamNode<String>) -> Self {
    Self {
      node: StreamNode::from(node),
    }
  }

  fn join<J>(
    &self,
    other: &KStream,
    joiner: Option<J>,
    windows: &JoinWindows,
    builder: &TopologyBuilder,
  ) -> TopologyResult<JoinPlan<KeyIgnoringJoiner<J>>>
  where
    J: ValueJoiner<String, String, String>,
  {
    let joiner = joiner_with_key(joiner)?;
    let sources = self.node.ensure_joinable_with(&other.node);

    let this_store = self.node.get_or_create_name(None, "KSTREAM-JOINTHIS-")?;
    let other_store = self.node.get_or_create_name(None, "KSTREAM-JOINOTHER-")?;
    let join_name = self.node.topology().new_name("KSTREAM-JOIN-");

    for store_name in [&this_store, &other_store] {
      let descriptor = windowed_store(
        Arc::new(JsonSerde::<String>::new()),
        Arc::new(JsonSerde::<String>::new()),
        windows,
        Some(store_name.as_str()),
      )?;
      builder.add_state_store(&descriptor, &[join_name.as_str()])?;
    }

    let output = KStream {
      node: self.node.derive(join_name, sources)?,
    };
    Ok(JoinPlan {
      output,
      this_store,
      other_store,
      joiner,
    })
  }
}

fn set(items: &[&str]) -> BTreeSet<String> {
  items.iter().map(|s| s.to_string()).collect()
}

fn topology_with_sources() -> Arc<TopologyBuilder> {
  let builder = Arc::new(TopologyBuilder::new());
  builder.add_source("orders-source", ["orders"]).unwrap();
  builder.add_source("payments-source", ["payments"]).unwrap();
  builder.add_source("shipments-source", ["shipments"]).unwrap();
  builder
}

fn stream(builder: &Arc<TopologyBuilder>, name: &str, source: &str) -> KStream {
  let topology: Arc<dyn Topology> = builder.clone();
  let node = StreamNode::new(topology, name, set(&[source])).unwrap();
  KStream::from_node(&node)
}

#[test]
fn test_stream_stream_join_wiring() {
  init_tracing();
  let builder = topology_with_sources();
  let orders = stream(&builder, "orders", "orders-source");
  let payments = stream(&builder, "payments", "payments-source");
  let windows = JoinWindows::of(Duration::from_secs(30));

  let plan = orders
    .join(
      &payments,
      Some(|order: String, payment: String| format!("{}+{}", order, payment)),
      &windows,
      &builder,
    )
    .unwrap();

  assert_eq!(
    plan.output.node.source_nodes(),
    &set(&["orders-source", "payments-source"])
  );
  assert_eq!(builder.copartition_groups(), vec![set(&["orders", "payments"])]);
  assert_ne!(plan.this_store, plan.other_store);

  for store in [&plan.this_store, &plan.other_store] {
    let spec = builder.state_store(store).unwrap();
    assert!(spec.persistent && spec.caching);
    match spec.kind {
      StoreKind::Windowed(windowed) => {
        assert_eq!(windowed.window_size, windows.size());
        assert!(!windowed.retain_duplicates);
      }
      StoreKind::KeyValue => panic!("join stores must be windowed"),
    }
    assert_eq!(
      builder.store_processors(store),
      set(&[plan.output.node.name()])
    );
  }

  let key = "order-1".to_string();
  assert_eq!(
    ValueJoinerWithKey::apply(&plan.joiner, &key, "o".to_string(), "p".to_string()),
    "o+p"
  );

  // The other side of the join evaluates with the arguments reversed.
  let reversed = reverse_joiner_with_key(plan.joiner);
  assert_eq!(
    ValueJoinerWithKey::apply(&reversed, &key, "p".to_string(), "o".to_string()),
    "o+p"
  );
}

#[test]
fn test_join_without_joiner_fails_before_registering() {
  init_tracing();
  let builder = topology_with_sources();
  let orders = stream(&builder, "orders", "orders-source");
  let payments = stream(&builder, "payments", "payments-source");

  let result = orders.join(
    &payments,
    None::<fn(String, String) -> String>,
    &JoinWindows::of(Duration::from_secs(30)),
    &builder,
  );

  assert!(result.err().unwrap().is_invalid_argument());
  assert!(builder.copartition_source_groups().is_empty());
  assert!(builder.describe().state_stores.is_empty());
}

#[test]
fn test_chained_joins_merge_copartition_groups() {
  init_tracing();
  let builder = topology_with_sources();
  let orders = stream(&builder, "orders", "orders-source");
  let payments = stream(&builder, "payments", "payments-source");
  let shipments = stream(&builder, "shipments", "shipments-source");
  let windows = JoinWindows::of(Duration::from_secs(10));
  let concat = |a: String, b: String| a + &b;

  let first = orders.join(&payments, Some(concat), &windows, &builder).unwrap();
  let second = first
    .output
    .join(&shipments, Some(concat), &windows, &builder)
    .unwrap();

  assert_eq!(second.output.node.source_nodes().len(), 3);
  assert_eq!(
    builder.copartition_groups(),
    vec![set(&["orders", "payments", "shipments"])]
  );
  assert_eq!(builder.describe().state_stores.len(), 4);
}

#[test]
fn test_aggregation_wiring() {
  init_tracing();
  let builder = topology_with_sources();
  let orders = stream(&builder, "orders", "orders-source");

  let store_name = orders.node.get_or_create_name(Some("order-totals"), "KSTREAM-AGGREGATE-").unwrap();
  let descriptor = key_value_store(
    Arc::new(JsonSerde::<String>::new()),
    Arc::new(JsonSerde::<i64>::new()),
    Some(store_name.as_str()),
  )
  .unwrap();
  builder.add_state_store(&descriptor, &["KSTREAM-AGGREGATE-0000000007"]).unwrap();

  let initializer = initializer_with_key(Some(|| 0i64)).unwrap();
  let reducer = reducer_with_key(Some(|a: i64, b: i64| a + b)).unwrap();

  let key = "customer-9".to_string();
  let total = [5, 7, 11]
    .into_iter()
    .fold(initializer.apply(&key), |acc, amount| reducer.apply(&key, acc, amount));
  assert_eq!(total, 23);

  assert_eq!(
    builder.changelog_topic("order-totals"),
    Some("streamweave-app-order-totals-changelog".to_string())
  );
}

#[test]
fn test_illegal_store_name_aborts_construction() {
  init_tracing();
  let builder = topology_with_sources();
  let orders = stream(&builder, "orders", "orders-source");

  let err = orders
    .node
    .get_or_create_name(Some("order totals"), "KSTREAM-AGGREGATE-")
    .unwrap_err();
  assert!(err.is_name_invalid());

  let err = key_value_store(
    Arc::new(JsonSerde::<String>::new()),
    Arc::new(JsonSerde::<i64>::new()),
    None,
  )
  .unwrap_err();
  assert!(err.is_null_required());
}
