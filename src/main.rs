//! Ten Laws headless runner
//!
//! `ten-laws [level.json] [tuning.json]` loads a level (the built-in demo by
//! default), drops each toolbar law in turn just ahead of the balloon and
//! reports whether it reaches the goal. The browser build enters through
//! `platform::wasm` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;
    use std::fs;

    use ten_laws::audio::SoundCue;
    use ten_laws::consts::FRAME_DT;
    use ten_laws::sim::Phase;
    use ten_laws::{Level, SimEvent, Simulation, Tuning};

    /// Seconds between scripted drops
    const DROP_INTERVAL: f32 = 1.5;
    /// Distance ahead of the balloon (toward the goal) to drop at
    const DROP_LEAD: f32 = 80.0;
    /// Give up after this much simulated time
    const TIME_LIMIT: f32 = 30.0;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let level = match args.next() {
            Some(path) => Level::from_json(&fs::read_to_string(&path)?)?,
            None => Level::demo(),
        };
        let tuning = match args.next() {
            Some(path) => Tuning::from_json(&fs::read_to_string(&path)?)?,
            None => Tuning::default(),
        };

        let mut sim = Simulation::new(level, tuning);
        let script: Vec<_> = sim.inventory().slots().map(|s| s.kind).collect();
        let mut next_drop = 0.0;
        let mut script_pos = 0;

        while sim.phase() == Phase::Playing && sim.time() < TIME_LIMIT {
            if sim.time() >= next_drop && script_pos < script.len() {
                let kind = script[script_pos];
                script_pos += 1;
                next_drop += DROP_INTERVAL;

                let body = sim.body().pos;
                let heading = (sim.level().goal.center() - body).normalize_or_zero();
                let at = body + heading * DROP_LEAD;
                if let Err(err) = sim.place_effect(kind, at, f64::from(sim.time())) {
                    log::info!("{} refused: {err}", kind.name());
                }
            }

            sim.update(FRAME_DT);
            report(sim.drain_events());
        }

        let body = sim.body();
        match sim.phase() {
            Phase::Won => log::info!("'{}' solved in {:.2}s", sim.level().name, sim.time()),
            Phase::Playing => log::info!(
                "'{}' unsolved after {:.0}s, balloon at ({:.0}, {:.0})",
                sim.level().name,
                sim.time(),
                body.pos.x,
                body.pos.y
            ),
        }
        Ok(())
    }

    fn report(events: Vec<SimEvent>) {
        for event in events {
            match event {
                SimEvent::EffectPlaced { id, kind } => {
                    let sound = SoundCue::for_event(&event).map(|c| c.path);
                    log::info!("placed {} #{id} (sound: {sound:?})", kind.name());
                }
                SimEvent::EffectExpired { id, kind } => log::debug!("{} #{id} expired", kind.name()),
                SimEvent::EffectRemoved { id, kind } => log::debug!("{} #{id} removed", kind.name()),
                SimEvent::GoalReached { .. } => {}
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ten Laws (headless) starting...");
    if let Err(err) = headless::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::wasm::start, this is just to satisfy the compiler
}
