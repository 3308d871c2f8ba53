use raxel::window::{FpsCounter, FrameLimiter, Window, WindowEvent, WINDOW_HEIGHT, WINDOW_WIDTH};
use raxel::Engine;

fn main() -> Result<(), String> {
    let mut window = Window::new("russsty", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut engine = Engine::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    if let Ok(obj_path) = std::env::var("RUSSSTY_OBJ") {
        engine.load_mesh(&obj_path).map_err(|e| e.to_string())?;
    }

    let mut limiter = FrameLimiter::new(&window);
    let mut fps_counter = FpsCounter::new();

    'running: loop {
        loop {
            match window.poll_events() {
                WindowEvent::None => break,
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(w, h) => {
                    window.resize(w, h)?;
                    engine.resize(w, h);
                }
                WindowEvent::KeyPress(_) => {}
            }
        }

        engine.mesh_mut().rotation_mut().y += 0.01;

        engine.update();
        engine.render();
        window.present(engine.frame_buffer())?;

        if let Some(fps) = fps_counter.tick() {
            window.set_title(&format!("russsty — {fps:.0} fps"));
        }

        limiter.wait_and_get_delta(&window);
    }

    Ok(())
}
