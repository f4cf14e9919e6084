use fractview_core::{
    evaluate, Complex, EscapeResult, PixelPoint, PointerEvent, Tool, Viewport,
};

/// Evaluate every pixel of a viewport and collect results row-major.
fn evaluate_grid(viewport: &Viewport, max_iterations: u32) -> Vec<EscapeResult> {
    let size = viewport.size();
    let mut results = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            let c = viewport.screen_to_complex(x as f64, y as f64);
            results.push(evaluate(c, max_iterations));
        }
    }
    results
}

#[test]
fn default_view_has_inside_and_outside_points() {
    let viewport = Viewport::default_view(100).unwrap();
    let results = evaluate_grid(&viewport, 200);

    assert_eq!(results.len(), 100 * 100);
    let escaped = results.iter().filter(|r| r.diverged).count();
    let bounded = results.len() - escaped;
    assert!(escaped > 0, "should have some escaped points");
    assert!(bounded > 0, "should have some bounded points");
    assert!(results
        .iter()
        .all(|r| r.iteration_count <= 200 && (r.diverged || r.iteration_count == 200)));
}

#[test]
fn grid_evaluation_is_deterministic() {
    let viewport = Viewport::new(64, Complex::new(-0.75, 0.1), 0.5).unwrap();
    assert_eq!(evaluate_grid(&viewport, 300), evaluate_grid(&viewport, 300));
}

#[test]
fn grid_is_mirror_symmetric_about_real_axis() {
    // Centred on the real axis, rows y and size - y map to conjugate points.
    let viewport = Viewport::new(40, Complex::new(-0.5, 0.0), 3.0).unwrap();
    let size = viewport.size() as usize;
    let grid = evaluate_grid(&viewport, 100);
    for y in 1..size {
        for x in 0..size {
            let a = grid[y * size + x];
            let b = grid[(size - y) * size + x];
            assert_eq!(a.diverged, b.diverged);
            assert_eq!(a.iteration_count, b.iteration_count);
        }
    }
}

#[test]
fn tool_session_zooms_into_selection() {
    let mut viewport = Viewport::default_view(600).unwrap();
    let mut tool = Tool::zoom_window();

    let events = [
        PointerEvent::Down(PixelPoint::new(300.0, 300.0)),
        PointerEvent::Move(PixelPoint::new(350.0, 300.0)),
        PointerEvent::Move(PixelPoint::new(450.0, 300.0)),
        PointerEvent::Up(PixelPoint::new(450.0, 300.0)),
    ];
    for ev in events {
        if let Some(v) = tool.handle_pointer_event(&viewport, ev).unwrap().viewport {
            viewport = v;
        }
    }
    assert_eq!(viewport.center(), Complex::ZERO);
    assert!((viewport.zoom() - 2.0).abs() < 1e-12);

    tool = Tool::zoom_in(4.0).unwrap();
    let out = tool
        .handle_pointer_event(&viewport, PointerEvent::Click(PixelPoint::new(300.0, 300.0)))
        .unwrap();
    assert!((out.viewport.unwrap().zoom() - 0.5).abs() < 1e-12);
}
