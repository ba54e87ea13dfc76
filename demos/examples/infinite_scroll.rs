// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paginating a feed with a sentinel element.
//!
//! A list of rows ends in a 10px sentinel. Each time the sentinel comes within the root margin
//! of the viewport the hook asks the server for more rows; the "server" here appends rows,
//! pushes the sentinel down, and re-renders.
//!
//! Run:
//! - `RUST_LOG=understory_hooks=debug cargo run -p understory_demos --example infinite_scroll`

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_hooks::memory::{MemoryNode, Page};
use understory_hooks::{HooksConfig, InfiniteScrollConfig, LOAD_MORE};

const ROW_HEIGHT: f64 = 40.0;
const PAGE_ROWS: usize = 25;
const VIEWPORT_HEIGHT: f64 = 600.0;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn sentinel_bounds(rows: usize) -> Rect {
    let top = rows as f64 * ROW_HEIGHT;
    Rect::new(0.0, top, 320.0, top + 10.0)
}

fn main() {
    init_tracing();

    let config = HooksConfig {
        infinite_scroll: InfiniteScrollConfig {
            root_margin: "200px 0px".into(),
            skeleton_id: Some("feed-skeleton".into()),
            ..InfiniteScrollConfig::default()
        },
        ..HooksConfig::default()
    };
    let mut page = Page::new(&config).expect("valid configuration");
    page.dom_mut()
        .insert(MemoryNode::new().with_id("feed-skeleton").with_class("skeleton"));

    let mut rows = PAGE_ROWS;
    let sentinel = page
        .dom_mut()
        .insert(MemoryNode::new().with_bounds(sentinel_bounds(rows)));
    let feed = page.mount("InfiniteScroll", sentinel).expect("hook registered");

    let mut seen = 0;
    for step in 0..60 {
        let top = f64::from(step) * 80.0;
        page.scroll_to(Rect::new(0.0, top, 320.0, top + VIEWPORT_HEIGHT));

        let requested = page.channel().count(LOAD_MORE);
        if requested > seen {
            seen = requested;
            rows += PAGE_ROWS;
            page.dom_mut()
                .set_bounds(sentinel, Some(sentinel_bounds(rows)));
            page.update(feed).expect("feed mounted");
            println!("scroll {top:>6.0}px: load-more #{requested}, feed now {rows} rows");
        }
    }

    page.destroy(feed).expect("feed mounted");
    println!("{} pages requested", page.channel().count(LOAD_MORE));
}
