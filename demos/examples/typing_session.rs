// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typing presence from a stream of keystrokes.
//!
//! Replays a scripted burst of keystrokes into a message composer on a virtual clock and prints
//! the `start_typing` / `end_typing` notifications the server would receive.
//!
//! Run:
//! - `cargo run -p understory_demos --example typing_session`
//! - `RUST_LOG=trace cargo run -p understory_demos --example typing_session` to watch timers

use tracing_subscriber::EnvFilter;
use understory_hooks::memory::{MemoryNode, Page};
use understory_hooks::{HooksConfig, MessageInputConfig};
use understory_timing::Timestamp;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() {
    init_tracing();

    let config = HooksConfig {
        message_input: MessageInputConfig::default().with_typing_window(1000),
        ..HooksConfig::default()
    };
    let mut page = Page::new(&config).expect("valid configuration");
    let field = page.dom_mut().insert(MemoryNode::new());
    let composer = page.mount("MessageInput", field).expect("hook registered");

    // Two bursts: a long sentence, a pause, then a short reply.
    let keystrokes = (0..=2600)
        .step_by(130)
        .chain((6000..=6400).step_by(100));
    for at in keystrokes {
        page.advance_to(Timestamp::from_millis(at));
        page.keyup(composer).expect("composer mounted");
    }
    page.advance_to(Timestamp::from_millis(10_000));

    for sent in page.channel().sent() {
        println!("{:>6} ms  {}", sent.at.as_millis(), sent.event);
    }
    tracing::info!(
        notifications = page.channel().sent().len(),
        "typing session replayed"
    );
}
