//! Headless demo: run the simulation for a few seconds with scripted
//! interaction events, then write one frame through each render path.

use kaleida::prelude::*;

const WIDTH: u32 = 960;
const HEIGHT: u32 = 540;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), RenderError> {
    let mut sim = Simulation::from_config(SimConfig::bloom())
        .with_resolution(WIDTH, HEIGHT)
        .with_symmetry(8)
        .with_complexity(0.7);

    let signals = sim.signals();
    let mut clock = FrameClock::fixed(1.0 / 60.0);

    // Six simulated seconds with a tap on the first beat and a swipe plus a
    // shake partway through
    for frame in 0..360u32 {
        let (elapsed, delta) = clock.update();
        if frame == 60 {
            signals.bump_tap(1.0);
        }
        if frame == 180 {
            signals.bump_swipe(0.6);
            signals.bump_motion(0.4);
        }

        sim.set_breathing_phase(elapsed * 0.8);
        sim.step(delta);

        if frame % 120 == 0 {
            log::info!(
                "t={:.2}s active={} tap={:.2}",
                sim.time(),
                sim.active_particle_count(),
                sim.params().tap_intensity
            );
        }
    }

    let frame = sim.composite();
    frame.save_png("kaleida_cpu.png")?;
    log::info!("wrote kaleida_cpu.png ({}x{})", frame.width(), frame.height());

    // Same frame through the GPU when an adapter exists
    match HeadlessRenderer::new_blocking(WIDTH, HEIGHT, sim.config().capacity as u32) {
        Ok(renderer) => {
            let image = renderer.render(sim.params(), &sim.instances())?;
            image.save("kaleida_gpu.png")?;
            log::info!("wrote kaleida_gpu.png");
        }
        Err(RenderError::NoAdapter) => {
            log::warn!("no GPU adapter found, skipping GPU output");
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
