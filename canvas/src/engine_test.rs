#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::{MAX_SCALE, MIN_SCALE};
use crate::transform::TiltPreset;

// =============================================================
// Helpers
// =============================================================

fn image_at(filename: &str, x: f64, y: f64) -> ImageRecord {
    let mut rec = ImageRecord::uploaded(filename, "");
    rec.position_x = x;
    rec.position_y = y;
    rec
}

fn controller_with(images: Vec<ImageRecord>) -> CanvasController {
    let mut c = CanvasController::new();
    c.set_container_size(Size::new(800.0, 600.0));
    c.set_viewport_size(Size::new(1280.0, 800.0));
    c.load_images(images);
    c
}

fn img(name: &str) -> Target {
    Target::Image(name.to_owned())
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn persisted(actions: &[Action]) -> Option<&ImageUpdate> {
    actions.iter().find_map(|a| match a {
        Action::PersistImage(update) => Some(update),
        _ => None,
    })
}

fn has_action(actions: &[Action], wanted: &Action) -> bool {
    actions.iter().any(|a| a == wanted)
}

// =============================================================
// Construction and loading
// =============================================================

#[test]
fn new_controller_has_no_selection() {
    let c = CanvasController::new();
    assert!(c.selection().is_none());
    assert!(c.images.is_empty());
    assert!(matches!(c.input, InputState::Idle));
}

#[test]
fn load_images_normalizes_records() {
    let mut wild = image_at("a.png", 0.0, 0.0);
    wild.scale = 12.0;
    wild.tilt_x = 70.0;
    let c = controller_with(vec![wild]);
    let rec = c.image("a.png").unwrap();
    assert_eq!(rec.scale, MAX_SCALE);
    assert_eq!(rec.tilt_x, 45.0);
}

#[test]
fn load_images_drops_previous_day_state() {
    let mut c = controller_with(vec![image_at("a.png", 10.0, 10.0)]);
    c.on_context_menu(&img("a.png"), pt(5.0, 5.0));
    c.request_delete("a.png");
    c.load_images(vec![image_at("b.png", 0.0, 0.0)]);
    assert!(c.selection().is_none());
    assert!(c.ui.controls_at.is_none());
    assert!(c.ui.pending_delete.is_none());
    assert!(c.image("a.png").is_none());
}

#[test]
fn clear_empties_canvas() {
    let mut c = controller_with(vec![image_at("a.png", 10.0, 10.0)]);
    c.clear();
    assert!(c.images.is_empty());
}

#[test]
fn add_image_inserts_normalized_record() {
    let mut c = controller_with(vec![]);
    let mut rec = ImageRecord::uploaded("a.png", "Beach");
    rec.scale = 0.01;
    let actions = c.add_image(rec);
    assert!(has_action(&actions, &Action::RenderNeeded));
    assert_eq!(c.image("a.png").unwrap().scale, MIN_SCALE);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selecting_b_while_a_selected_leaves_only_b() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0), image_at("b.png", 300.0, 0.0)]);
    c.on_click(&img("a.png"));
    assert_eq!(c.selection(), Some("a.png"));
    c.on_click(&img("b.png"));
    assert_eq!(c.selection(), Some("b.png"));
    assert_eq!(c.phase("a.png"), ImagePhase::Idle);
    assert_eq!(c.phase("b.png"), ImagePhase::Selected);
    let selected = ["a.png", "b.png"].iter().filter(|f| c.phase(f) != ImagePhase::Idle).count();
    assert_eq!(selected, 1);
}

#[test]
fn clicking_unknown_image_does_not_select() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    assert!(c.on_click(&img("ghost.png")).is_empty());
    assert!(c.selection().is_none());
}

#[test]
fn click_background_deselects_and_hides_controls() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.on_context_menu(&img("a.png"), pt(100.0, 100.0));
    let actions = c.on_click(&Target::Background);
    assert!(has_action(&actions, &Action::HideControls));
    assert!(c.selection().is_none());
    assert!(c.ui.controls_at.is_none());
}

#[test]
fn click_controls_keeps_selection() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.on_context_menu(&img("a.png"), pt(100.0, 100.0));
    assert!(c.on_click(&Target::Controls).is_empty());
    assert_eq!(c.selection(), Some("a.png"));
    assert!(c.ui.controls_at.is_some());
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn primary_press_selects_and_starts_drag() {
    let mut c = controller_with(vec![image_at("a.png", 100.0, 100.0)]);
    c.on_pointer_down(&img("a.png"), pt(110.0, 120.0), Button::Primary);
    assert_eq!(c.phase("a.png"), ImagePhase::Dragging);
    match &c.input {
        InputState::Dragging { filename, offset } => {
            assert_eq!(filename, "a.png");
            assert_eq!(*offset, pt(10.0, 20.0));
        }
        InputState::Idle => panic!("expected drag"),
    }
}

#[test]
fn secondary_press_does_not_drag() {
    let mut c = controller_with(vec![image_at("a.png", 100.0, 100.0)]);
    assert!(c.on_pointer_down(&img("a.png"), pt(110.0, 120.0), Button::Secondary).is_empty());
    assert!(matches!(c.input, InputState::Idle));
}

#[test]
fn press_on_background_does_nothing() {
    let mut c = controller_with(vec![image_at("a.png", 100.0, 100.0)]);
    assert!(c.on_pointer_down(&Target::Background, pt(1.0, 1.0), Button::Primary).is_empty());
    assert!(matches!(c.input, InputState::Idle));
}

#[test]
fn drag_moves_image_by_pointer_delta() {
    let mut c = controller_with(vec![image_at("a.png", 100.0, 100.0)]);
    c.on_pointer_down(&img("a.png"), pt(110.0, 120.0), Button::Primary);
    c.on_pointer_move(pt(160.0, 170.0));
    let rec = c.image("a.png").unwrap();
    assert_eq!((rec.position_x, rec.position_y), (150.0, 150.0));
}

#[test]
fn release_persists_final_position() {
    let mut c = controller_with(vec![image_at("a.png", 100.0, 100.0)]);
    c.on_pointer_down(&img("a.png"), pt(110.0, 120.0), Button::Primary);
    let actions = c.on_pointer_up(pt(210.0, 220.0));
    let update = persisted(&actions).unwrap();
    assert_eq!(update.filename, "a.png");
    assert_eq!((update.position_x, update.position_y), (200.0, 200.0));
    assert_eq!(c.phase("a.png"), ImagePhase::Selected);
}

#[test]
fn drag_past_right_edge_clamps_to_container_minus_width() {
    let mut c = controller_with(vec![image_at("a.png", 100.0, 100.0)]);
    c.set_image_size("a.png", Size::new(240.0, 180.0));
    c.on_pointer_down(&img("a.png"), pt(100.0, 100.0), Button::Primary);
    let actions = c.on_pointer_up(pt(5000.0, 100.0));
    let update = persisted(&actions).unwrap();
    assert_eq!(update.position_x, 800.0 - 240.0);
    assert_eq!(update.position_y, 100.0);
}

#[test]
fn click_before_container_is_measured_keeps_position() {
    let mut c = CanvasController::new();
    c.load_images(vec![image_at("a.png", 300.0, 200.0)]);
    c.on_pointer_down(&img("a.png"), pt(320.0, 210.0), Button::Primary);
    let actions = c.on_pointer_up(pt(320.0, 210.0));
    let update = persisted(&actions).unwrap();
    assert_eq!((update.position_x, update.position_y), (300.0, 200.0));
}

#[test]
fn drag_before_container_is_measured_is_unclamped() {
    let mut c = CanvasController::new();
    c.load_images(vec![image_at("a.png", 300.0, 200.0)]);
    c.on_pointer_down(&img("a.png"), pt(300.0, 200.0), Button::Primary);
    c.on_pointer_move(pt(340.0, 260.0));
    let rec = c.image("a.png").unwrap();
    assert_eq!((rec.position_x, rec.position_y), (340.0, 260.0));

    c.set_container_size(Size::new(320.0, 240.0));
    c.on_pointer_move(pt(340.0, 260.0));
    let rec = c.image("a.png").unwrap();
    assert_eq!((rec.position_x, rec.position_y), (120.0, 40.0));
}

#[test]
fn drag_past_top_left_clamps_to_zero() {
    let mut c = controller_with(vec![image_at("a.png", 100.0, 100.0)]);
    c.on_pointer_down(&img("a.png"), pt(150.0, 150.0), Button::Primary);
    c.on_pointer_move(pt(-400.0, -10.0));
    let rec = c.image("a.png").unwrap();
    assert_eq!((rec.position_x, rec.position_y), (0.0, 0.0));
}

#[test]
fn unmeasured_image_clamps_with_default_size() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.on_pointer_down(&img("a.png"), pt(0.0, 0.0), Button::Primary);
    let actions = c.on_pointer_up(pt(900.0, 900.0));
    let update = persisted(&actions).unwrap();
    assert_eq!(update.position_x, 800.0 - DEFAULT_IMAGE_SIZE_PX);
    assert_eq!(update.position_y, 600.0 - DEFAULT_IMAGE_SIZE_PX);
}

#[test]
fn release_without_drag_is_noop() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    assert!(c.on_pointer_up(pt(10.0, 10.0)).is_empty());
    assert!(c.on_pointer_move(pt(10.0, 10.0)).is_empty());
}

#[test]
fn size_for_unknown_image_is_not_recorded() {
    let mut c = controller_with(vec![]);
    c.set_image_size("ghost.png", Size::new(10.0, 10.0));
    assert_eq!(c.image_size("ghost.png"), Size::new(DEFAULT_IMAGE_SIZE_PX, DEFAULT_IMAGE_SIZE_PX));
}

// =============================================================
// Controls panel
// =============================================================

#[test]
fn context_menu_selects_and_opens_panel_at_pointer() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0), image_at("b.png", 0.0, 0.0)]);
    c.on_click(&img("b.png"));
    let actions = c.on_context_menu(&img("a.png"), pt(300.0, 200.0));
    assert!(has_action(&actions, &Action::ShowControls { at: pt(300.0, 200.0) }));
    assert_eq!(c.selection(), Some("a.png"));
}

#[test]
fn context_menu_panel_clamped_to_viewport() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.on_context_menu(&img("a.png"), pt(1270.0, 790.0));
    assert_eq!(c.ui.controls_at, Some(pt(1030.0, 400.0)));
}

#[test]
fn context_menu_on_background_is_ignored() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    assert!(c.on_context_menu(&Target::Background, pt(1.0, 1.0)).is_empty());
    assert!(c.ui.controls_at.is_none());
}

#[test]
fn escape_hides_panel_but_keeps_selection() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.on_context_menu(&img("a.png"), pt(1.0, 1.0));
    let actions = c.on_key_down(&Key::named("Escape"));
    assert_eq!(actions, vec![Action::HideControls]);
    assert_eq!(c.selection(), Some("a.png"));
    assert!(c.on_key_down(&Key::named("Escape")).is_empty());
}

// =============================================================
// Transforms
// =============================================================

#[test]
fn transform_is_applied_then_persisted() {
    let mut c = controller_with(vec![image_at("a.png", 40.0, 60.0)]);
    c.apply_transform("a.png", TransformOp::RotateBy(15.0));
    let actions = c.apply_transform("a.png", TransformOp::RotateBy(15.0));
    let update = persisted(&actions).unwrap();
    assert_eq!(update.rotation, 30.0);
    assert_eq!((update.position_x, update.position_y), (40.0, 60.0));
    assert_eq!(c.image("a.png").unwrap().rotation, 30.0);
}

#[test]
fn transform_targets_named_image_not_selection() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0), image_at("b.png", 0.0, 0.0)]);
    c.on_click(&img("a.png"));
    c.apply_transform("b.png", TransformOp::ScaleBy(2.0));
    assert_eq!(c.image("a.png").unwrap().scale, 1.0);
    assert_eq!(c.image("b.png").unwrap().scale, 2.0);
}

#[test]
fn scale_and_tilt_clamped_through_controller() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.apply_transform("a.png", TransformOp::ScaleBy(-5.0));
    c.apply_transform("a.png", TransformOp::TiltBy { dx: 100.0, dy: 0.0 });
    let rec = c.image("a.png").unwrap();
    assert_eq!(rec.scale, MIN_SCALE);
    assert_eq!(rec.tilt_x, 45.0);
}

#[test]
fn reset_all_through_controller() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.apply_transform("a.png", TransformOp::RotateBy(33.0));
    c.apply_transform("a.png", TransformOp::Preset(TiltPreset::LeanLeft));
    let actions = c.apply_transform("a.png", TransformOp::ResetAll);
    let update = persisted(&actions).unwrap();
    assert_eq!((update.rotation, update.scale, update.tilt_x, update.tilt_y), (0.0, 1.0, 0.0, 0.0));
}

#[test]
fn transform_on_unknown_image_emits_nothing() {
    let mut c = controller_with(vec![]);
    assert!(c.apply_transform("ghost.png", TransformOp::RotateBy(1.0)).is_empty());
}

#[test]
fn caption_change_persists_full_record() {
    let mut c = controller_with(vec![image_at("a.png", 5.0, 6.0)]);
    let actions = c.set_caption("a.png", "Sunset");
    let update = persisted(&actions).unwrap();
    assert_eq!(update.caption, "Sunset");
    assert_eq!((update.position_x, update.position_y), (5.0, 6.0));
}

// =============================================================
// Deletion
// =============================================================

#[test]
fn delete_key_requests_confirmation_for_selection() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.on_click(&img("a.png"));
    let actions = c.on_key_down(&Key::named("Delete"));
    assert_eq!(actions, vec![Action::ConfirmDelete { filename: "a.png".into() }]);
}

#[test]
fn delete_key_without_selection_does_nothing() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    assert!(c.on_key_down(&Key::named("Delete")).is_empty());
}

#[test]
fn confirmed_delete_emits_delete_action() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.request_delete("a.png");
    let actions = c.confirm_delete(true);
    assert_eq!(actions, vec![Action::DeleteImage { filename: "a.png".into() }]);
    assert!(c.ui.pending_delete.is_none());
    // The image stays until the server confirms.
    assert!(c.image("a.png").is_some());
}

#[test]
fn declined_delete_emits_nothing() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.request_delete("a.png");
    assert!(c.confirm_delete(false).is_empty());
    assert!(c.confirm_delete(true).is_empty());
}

#[test]
fn apply_delete_clears_selection_and_panel() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.on_context_menu(&img("a.png"), pt(1.0, 1.0));
    let actions = c.apply_delete("a.png");
    assert!(has_action(&actions, &Action::HideControls));
    assert!(c.selection().is_none());
    assert!(c.image("a.png").is_none());
}

#[test]
fn apply_delete_twice_is_harmless() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    assert!(!c.apply_delete("a.png").is_empty());
    assert!(c.apply_delete("a.png").is_empty());
}

#[test]
fn apply_delete_of_other_image_keeps_selection() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0), image_at("b.png", 0.0, 0.0)]);
    c.on_click(&img("a.png"));
    c.apply_delete("b.png");
    assert_eq!(c.selection(), Some("a.png"));
}

#[test]
fn apply_delete_mid_drag_ends_gesture() {
    let mut c = controller_with(vec![image_at("a.png", 0.0, 0.0)]);
    c.on_pointer_down(&img("a.png"), pt(1.0, 1.0), Button::Primary);
    c.apply_delete("a.png");
    assert!(matches!(c.input, InputState::Idle));
    assert!(c.on_pointer_up(pt(5.0, 5.0)).is_empty());
}

