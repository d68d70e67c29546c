//! Counter History
//!
//! This example demonstrates history tracking on a small counter store.
//!
//! Key concepts:
//! - Installing the tracker in front of a store
//! - Transitions that change nothing leave no entry
//! - Opting a debug action out of tracking
//! - Checkpointing the state and resuming from it
//!
//! Run with: RUST_LOG=state_trail=trace cargo run --example counter_history

use state_trail::checkpoint::Checkpoint;
use state_trail::core::{Action, Tracked};
use state_trail::store::{install, BasicStoreFactory};
use state_trail::tracked_state;
use std::convert::Infallible;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

tracked_state! {
    #[derive(Default)]
    struct Counter {
        value: i64,
    }
}

fn reducer(state: &Arc<Counter>, action: &Action) -> Result<Arc<Counter>, Infallible> {
    let with_value = |value: i64| {
        Arc::new(Counter {
            value,
            ..Counter::clone(state)
        })
    };
    Ok(match action.kind.as_str() {
        "INC" => with_value(state.value + 1),
        "DEC" => with_value(state.value - 1),
        "DEBUG_SET" => with_value(action.payload.as_i64().unwrap_or(state.value)),
        _ => Arc::clone(state),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counter History Example ===\n");

    let mut store = install::<Counter>(None)
        .enhance(BasicStoreFactory)
        .create(reducer, None)?;

    store.dispatch(&Action::new("INC"))?;
    store.dispatch(&Action::new("INC"))?;
    store.dispatch(&Action::new("NOOP"))?;
    store.dispatch(&Action::new("DEC"))?;
    store.dispatch(
        &Action::new("DEBUG_SET")
            .with_payload(serde_json::json!(42))
            .untracked(),
    )?;

    let state = store.state();
    println!("Current value: {}", state.value);
    println!("Recorded entries: {}", state.history().len());
    for entry in state.history().iter() {
        println!("  #{} {} -> {}", entry.index, entry.label, entry.delta.as_value());
    }

    println!("\n=== Checkpoint ===\n");
    let json = Checkpoint::capture(state.as_ref()).to_json_pretty()?;
    println!("{json}");

    let hydrated = Checkpoint::<Counter>::from_json(&json)?.into_state();
    let mut resumed = install(Some(hydrated))
        .enhance(BasicStoreFactory)
        .create(reducer, None)?;
    resumed.dispatch(&Action::new("INC"))?;
    println!(
        "Resumed store has {} entries, cursor {}",
        resumed.state().history().len(),
        resumed.state().history().cursor()
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
