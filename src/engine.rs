use crate::demo::DemoState;

/// One simulation step: animate, resolve world transforms, then pick with
/// the fresh matrices.
pub fn update(state: &mut DemoState, dt: f32) {
    state.animate(dt);
    state.scene.late_update();
    state.evaluate_hover();
}
