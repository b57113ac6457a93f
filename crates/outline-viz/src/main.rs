use bsp_solid::{Contour, OutlineExtractor};
use macroquad::prelude::*;
use outline_viz::{OrbitCamera, TreeNavigator, draw_outline, sample_solids};

const TOLERANCE: f64 = 1e-10;

#[macroquad::main("Outline Viewer")]
async fn main() {
    let solids = match sample_solids(TOLERANCE) {
        Ok(solids) => solids,
        Err(e) => {
            eprintln!("Failed to build sample solids: {e}");
            return;
        }
    };
    for (name, solid, _) in &solids {
        println!(
            "{name}: {} boundary facets, tree depth {}",
            solid.tree().facet_count(),
            solid.tree().depth()
        );
    }

    let mut current = 0;
    let mut camera = OrbitCamera::new(5.0, 0.6, 0.4).with_target(solids[current].2);
    let mut navigator = TreeNavigator::new();

    loop {
        if is_key_pressed(KeyCode::Tab) {
            current = (current + 1) % solids.len();
            camera.target = solids[current].2;
            navigator.go_root();
        }
        let (name, solid, _) = &solids[current];

        camera.update();
        navigator.update(solid.tree());

        let (u, v) = camera.view_axes();
        let loops = OutlineExtractor::new(u, v)
            .map(|extractor| extractor.outline_of(solid))
            .unwrap_or_default();

        clear_background(Color::from_rgba(15, 15, 25, 255));
        set_camera(&camera.to_camera3d());

        navigator.render(solid.tree());

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(1.5, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.5, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.5), BLUE);

        set_default_camera();

        let size = screen_width().min(screen_height()) * 0.35;
        let panel = Rect::new(screen_width() - size - 10.0, 10.0, size, size);
        draw_outline(&loops, panel, ORANGE);

        let vertices: usize = loops.iter().map(Contour::len).sum();
        draw_text(&format!("Solid: {name} ([Tab] next)"), 10.0, 25.0, 20.0, WHITE);
        draw_text(
            &format!("Outline: {} loops, {vertices} vertices", loops.len()),
            10.0,
            45.0,
            18.0,
            ORANGE,
        );

        navigator.draw_ui(solid.tree(), 70.0);

        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 155.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 175.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
