// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click versus drag in a scrollable list of buttons.
//!
//! Every row is a button and the list scrolls when dragged. Both see the
//! press. Once the pointer travels past a small slop, the list records itself
//! with `GRAB` and the row under the pointer gets a Cancel instead of a click.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p hitstack_demos --example scrollable_list`

use hitstack_router::{Deliveries, PointerEvent, PointerKind, Priority, Router};
use hitstack_tree::{Attach, HandlerFlags, OpLog};
use kurbo::{Affine, Point, Rect, Vec2};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Tag {
    List,
    Row(usize),
}

const ROWS: usize = 20;
const ROW_HEIGHT: f64 = 30.0;
const VIEWPORT: Rect = Rect::new(0.0, 0.0, 200.0, 150.0);
const SLOP: f64 = 8.0;

#[derive(Default)]
struct Row {
    down: bool,
}

#[derive(Default)]
struct List {
    offset: f64,
    anchor: Option<Point>,
    dragging: bool,
    rows: Vec<Row>,
}

impl List {
    fn new() -> Self {
        Self {
            rows: (0..ROWS).map(|_| Row::default()).collect(),
            ..Self::default()
        }
    }

    /// Record the frame, reacting to the events handed out since the last one.
    fn record(&mut self, input: &Deliveries<Tag>) -> OpLog<Tag> {
        for e in input.for_tag(Tag::List) {
            match e.kind {
                PointerKind::Press => self.anchor = Some(e.position),
                PointerKind::Move => {
                    if let Some(anchor) = self.anchor {
                        let dy = e.position.y - anchor.y;
                        if self.dragging || dy.abs() > SLOP {
                            self.dragging = true;
                            self.offset = (self.offset - dy).clamp(0.0, self.max_offset());
                            self.anchor = Some(e.position);
                        }
                    }
                }
                PointerKind::Release | PointerKind::Cancel => {
                    self.anchor = None;
                    self.dragging = false;
                }
                _ => {}
            }
        }
        for (i, row) in self.rows.iter_mut().enumerate() {
            for d in input.iter().filter(|d| d.tag == Tag::Row(i)) {
                match d.event.kind {
                    PointerKind::Press => row.down = true,
                    PointerKind::Release if row.down => {
                        row.down = false;
                        tracing::info!(row = i, priority = ?d.priority, "clicked");
                    }
                    PointerKind::Cancel => {
                        row.down = false;
                        tracing::info!(row = i, "press cancelled");
                    }
                    _ => {}
                }
            }
        }

        let mut ops = OpLog::new();
        ops.push_area(VIEWPORT);
        let flags = if self.dragging {
            HandlerFlags::GRAB
        } else {
            HandlerFlags::empty()
        };
        ops.attach_with(Attach::new(Tag::List).with_flags(flags));
        ops.push_transform(Affine::translate(Vec2::new(0.0, -self.offset)));
        for i in 0..ROWS {
            let y = i as f64 * ROW_HEIGHT;
            ops.push_area(Rect::new(0.0, y, VIEWPORT.width(), y + ROW_HEIGHT));
            ops.attach(Tag::Row(i));
            ops.pop_area();
        }
        ops.pop_transform();
        ops.pop_area();
        ops
    }

    fn max_offset(&self) -> f64 {
        (ROWS as f64 * ROW_HEIGHT - VIEWPORT.height()).max(0.0)
    }
}

fn run(router: &mut Router<Tag>, list: &mut List, batches: &[&[PointerEvent]]) {
    let mut pending = Deliveries::new();
    for batch in batches {
        let ops = list.record(&pending);
        let cancels = match router.frame(&ops) {
            Ok(d) => d,
            Err(err) => {
                tracing::error!(%err, "rejected frame");
                return;
            }
        };
        // Cancels from the frame come before anything routed after it.
        let mut next = cancels;
        next.append(router.queue(batch.iter().copied()));
        for d in &next {
            let grabbed = if d.priority == Priority::Grabbed { " (grabbed)" } else { "" };
            println!("  {:?} <- {:?} at {:?}{grabbed}", d.tag, d.event.kind, d.event.position);
        }
        pending = next;
    }
    list.record(&pending);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut router = Router::new();
    let mut list = List::new();

    println!("tap on row 1:");
    run(
        &mut router,
        &mut list,
        &[
            &[PointerEvent::press((50.0, 40.0)).at(1)],
            &[PointerEvent::release((51.0, 41.0)).at(2)],
        ],
    );

    println!("drag starting on row 2:");
    run(
        &mut router,
        &mut list,
        &[
            &[PointerEvent::press((50.0, 70.0)).at(3)],
            &[PointerEvent::moved((50.0, 60.0)).at(4)],
            &[PointerEvent::moved((50.0, 30.0)).at(5)],
            &[PointerEvent::release((50.0, 20.0)).at(6)],
        ],
    );
    println!("list offset after drag: {}", list.offset);
}
