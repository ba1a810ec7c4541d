//! numbox example application
//!
//! Drives one widget through a scripted session: configure it through the
//! attribute store, drag it, type an exact value, then print what the host
//! would receive back.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use web_time::Instant;

    use numbox::prelude::*;
    use numbox::{ATTR_JUSTIFICATION, ATTR_RANGE, ATTR_UNIT_STYLE};

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let mut store = MemoryStore::new();
    store.set(ATTR_RANGE, AttrValue::FloatList(vec![0.0, 1000.0]));
    store.set(ATTR_UNIT_STYLE, AttrValue::Text("hertz".to_string()));
    store.set(ATTR_JUSTIFICATION, AttrValue::Text("left".to_string()));

    let mut nb = NumBox::new();
    nb.set_bounds(Rectangle::new(10.0, 10.0, 120.0, 18.0));
    nb.sync_from_store(&store);
    log::info!("Widget configured with range {:?}", store.get(ATTR_RANGE));

    let mut cursor = NullCursor;
    let mut now = Instant::now();

    // Drag: press in the middle and pull upward, far enough to trip one
    // pointer recenter along the way
    let center = nb.bounds().center();
    nb.handle_event(
        &Event::MousePressed {
            button: MouseButton::Left,
            position: center,
            modifiers: Modifiers::default(),
        },
        now,
        &store,
        &mut cursor,
    );
    for i in 1..=4 {
        let position = Point::new(center.x, center.y - (i as f32) * 10.0);
        nb.handle_event(
            &Event::MouseMoved {
                position,
                modifiers: Modifiers::default(),
            },
            now,
            &store,
            &mut cursor,
        );
    }
    nb.handle_event(
        &Event::MouseReleased {
            button: MouseButton::Left,
            position: center,
        },
        now,
        &store,
        &mut cursor,
    );
    report("after drag", &mut nb);

    // Type an exact value and commit it
    for c in "440".chars() {
        nb.handle_event(
            &Event::KeyPressed {
                key: Key::Char(c),
                modifiers: Modifiers::default(),
            },
            now,
            &store,
            &mut cursor,
        );
    }
    nb.handle_event(
        &Event::KeyPressed {
            key: Key::Enter,
            modifiers: Modifiers::default(),
        },
        now,
        &store,
        &mut cursor,
    );
    report("after edit", &mut nb);

    // One frame of draw commands
    let mut renderer = Renderer::new();
    nb.draw(&mut renderer);
    println!("draw commands:");
    for command in renderer.take_commands() {
        println!("  {:?}", command);
    }

    // Snapshot, reload into a fresh widget, and let it republish its
    // attributes to the store
    let record = nb.save();
    match record.to_json() {
        Ok(json) => println!("saved record:\n{}", json),
        Err(e) => eprintln!("save failed: {}", e),
    }

    let mut restored = NumBox::new();
    restored.restore(record, now);
    while let Some(due) = restored.next_wakeup() {
        now = due;
        restored.tick(now, &mut store);
    }
    println!(
        "restored widget shows {} with range re-published as {:?}",
        restored.display_text(),
        store.get(ATTR_RANGE)
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn report(label: &str, nb: &mut numbox::NumBox) {
    println!("{}: value {} shown as \"{}\"", label, nb.value(), nb.display_text());
    for output in nb.take_outputs() {
        println!("  {:?}", output);
    }
}

// WASM hosts embed the library directly; there is no demo entry point
#[cfg(target_arch = "wasm32")]
fn main() {}
