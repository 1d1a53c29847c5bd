//! Simulates a UI adapter driving the engine: items get "rendered" (measured)
//! as they enter the window, and the user scrolls through a long list.

use virtual_window::{Engine, EngineParams, ParamUpdate};

fn main() {
    let total = 10_000usize;
    let params = EngineParams::new((0..total as u64).collect(), 30).with_estimate_size(48.0);

    let mut engine = Engine::new(params, |range| {
        println!(
            "window [{:>4}, {:>4}]  pad_front {:>9.1}  pad_behind {:>9.1}",
            range.start, range.end, range.pad_front, range.pad_behind
        );
    });

    // A pretend renderer: every item in the window reports its real size the
    // first time it is mounted. Sizes vary a little, like real content does.
    let measure = |index: u64| 40.0 + (index % 5) as f64 * 8.0;
    let mount_window = |engine: &mut Engine| {
        let range = engine.get_range();
        for index in range.start..=range.end {
            let id = index as u64;
            if engine.size_of(&id).is_none() {
                engine.record(id, measure(id));
            }
        }
    };
    mount_window(&mut engine);

    // Scroll down in uneven steps, then flick back up.
    let mut offset = 0.0;
    for step in 1..=40 {
        offset += 37.0 * step as f64;
        engine.handle_scroll(offset);
        mount_window(&mut engine);
    }
    for _ in 0..10 {
        offset -= 400.0;
        engine.handle_scroll(offset.max(0.0));
        mount_window(&mut engine);
    }

    // The data source grows while we are mid-list.
    engine.update_param(ParamUpdate::UniqueIds((0..(total as u64) + 500).collect()));
    engine.handle_data_sources_change();
    mount_window(&mut engine);

    println!(
        "measured {} of {} items, estimate {:.1}px",
        engine.recorded_count(),
        engine.params().total(),
        engine.estimated_size()
    );
}
