// Copyright 2026 the Viva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-level tests: arena lifecycle, parenting, surface membership, and
//! the two-pass draw builder.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use crate::backend::Retired;
use crate::scene::draw::{DrawItem, RenderPlan};
use crate::scene::{Action, SceneError};

use super::testutil::test_store;

#[test]
fn create_and_destroy_drawable() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let id = store.add_fill_rectangle(surface);
    assert!(store.is_alive(id));
    store.destroy_drawable(id);
    assert!(!store.is_alive(id));
}

#[test]
fn generation_prevents_stale_access() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let id1 = store.add_fill_rectangle(surface);
    store.destroy_drawable(id1);
    let id2 = store.add_fill_rectangle(surface);
    // id2 reuses the slot but carries a new generation.
    assert_eq!(id1.index(), id2.index());
    assert!(!store.is_alive(id1));
    assert!(store.is_alive(id2));
}

#[test]
#[should_panic(expected = "stale DrawableId")]
fn destroyed_handle_panics_on_transform() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let id = store.add_fill_rectangle(surface);
    store.destroy_drawable(id);
    let _ = store.transform(id);
}

#[test]
fn second_set_parent_fails_and_keeps_relation() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let parent_a = store.add_fill_rectangle(surface);
    let parent_b = store.add_fill_rectangle(surface);
    let child = store.add_fill_rectangle(surface);

    store.set_parent(child, parent_a).unwrap();
    let err = store.set_parent(child, parent_b).unwrap_err();
    assert_eq!(err, SceneError::AlreadyParented);

    assert_eq!(store.parent_of(child), Some(parent_a));
    assert_eq!(store.children_of(parent_a), alloc::vec![child]);
    assert!(store.children_of(parent_b).is_empty());
}

#[test]
fn detach_clears_both_sides() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let parent = store.add_fill_rectangle(surface);
    let child = store.add_fill_rectangle(surface);

    store.set_parent(child, parent).unwrap();
    store.detach_from_parent(child);

    assert_eq!(store.parent_of(child), None);
    assert!(store.children_of(parent).is_empty());
    // Re-parenting works after a detach.
    store.set_parent(child, parent).unwrap();
}

#[test]
fn child_removal_swaps_last_sibling_into_place() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let parent = store.add_fill_rectangle(surface);
    let a = store.add_fill_rectangle(surface);
    let b = store.add_fill_rectangle(surface);
    let c = store.add_fill_rectangle(surface);
    store.set_parent(a, parent).unwrap();
    store.set_parent(b, parent).unwrap();
    store.set_parent(c, parent).unwrap();

    store.detach_from_parent(a);
    // c was last and takes a's slot; detaching c afterwards must still work.
    assert_eq!(store.children_of(parent), alloc::vec![c, b]);
    store.detach_from_parent(c);
    assert_eq!(store.children_of(parent), alloc::vec![b]);
}

#[test]
fn destroying_parent_orphans_children() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let parent = store.add_fill_rectangle(surface);
    let child = store.add_fill_rectangle(surface);
    store.set_parent(child, parent).unwrap();

    store.destroy_drawable(parent);
    assert_eq!(store.parent_of(child), None);
    // The orphan can be adopted again.
    let adopter = store.add_fill_rectangle(surface);
    store.set_parent(child, adopter).unwrap();
}

#[test]
fn surface_removal_swaps_last_into_slot() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let a = store.add_fill_rectangle(surface);
    let b = store.add_fill_rectangle(surface);
    let c = store.add_fill_rectangle(surface);
    assert_eq!(store.surface_len(surface), 3);
    assert_eq!(store.surface_index(b), Some(1));

    store.remove_from_surface(b);

    assert_eq!(store.surface_len(surface), 2);
    // c (previously last) occupies b's former slot with its index updated.
    assert_eq!(store.surface_drawables(surface), alloc::vec![a, c]);
    assert_eq!(store.surface_index(c), Some(1));
    assert_eq!(store.surface_index(b), None);
    assert_eq!(store.surface_of(b), None);
}

#[test]
fn remove_all_detaches_without_destroying() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let a = store.add_fill_rectangle(surface);
    let b = store.add_fill_rectangle(surface);

    store.remove_all(surface);
    assert_eq!(store.surface_len(surface), 0);
    assert!(store.is_alive(a));
    assert!(store.is_alive(b));
}

#[test]
fn clear_surface_destroys_contents() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let a = store.add_fill_rectangle(surface);

    store.clear_surface(surface);
    assert!(!store.is_alive(a));
}

#[test]
fn store_clear_preserves_default_surface_only() {
    let (mut store, mut factory, _) = test_store();
    let default = store.default_surface();
    let extra_surface = store.create_surface(&mut factory).unwrap();
    let on_default = store.add_fill_rectangle(default);
    let on_extra = store.add_fill_rectangle(extra_surface);

    store.clear();

    assert!(store.is_surface_alive(default));
    assert!(!store.is_surface_alive(extra_surface));
    assert!(!store.is_alive(on_default));
    assert!(!store.is_alive(on_extra));
    assert_eq!(store.surface_stack(), alloc::vec![default]);
}

#[test]
fn destroying_default_surface_is_ignored() {
    let (mut store, _, _) = test_store();
    let default = store.default_surface();
    store.destroy_surface(default);
    assert!(store.is_surface_alive(default));
}

#[test]
fn destroyed_surface_retires_its_target() {
    let (mut store, mut factory, _) = test_store();
    let surface = store.create_surface(&mut factory).unwrap();
    store.destroy_surface(surface);
    let retired = store.take_retired();
    assert!(
        retired.iter().any(|r| matches!(r, Retired::Target(_))),
        "surface target should be retired, got {retired:?}"
    );
}

#[test]
fn owned_polygon_buffer_is_retired_shared_is_not() {
    let (mut store, mut factory, _) = test_store();
    let surface = store.default_surface();
    let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
    let owned = store.add_polygon(&mut factory, &points, surface).unwrap();
    let shared = store.add_rectangle(surface);

    store.destroy_drawable(owned);
    let retired = store.take_retired();
    assert_eq!(retired.len(), 1);
    assert!(matches!(retired[0], Retired::Buffer(_)));

    store.destroy_drawable(shared);
    assert!(store.take_retired().is_empty());
}

#[test]
fn surface_reorder_boundary_is_noop() {
    let (mut store, mut factory, _) = test_store();
    let default = store.default_surface();
    let back = store.create_surface(&mut factory).unwrap();

    // Default is frontmost, `back` is backmost.
    store.move_surface_up(default);
    store.move_surface_down(back);
    assert_eq!(store.surface_stack(), alloc::vec![default, back]);
}

#[test]
fn surface_reorder_moves() {
    let (mut store, mut factory, _) = test_store();
    let a = store.default_surface();
    let b = store.create_surface(&mut factory).unwrap();
    let c = store.create_surface(&mut factory).unwrap();
    assert_eq!(store.surface_stack(), alloc::vec![a, b, c]);

    store.move_surface_up(c);
    assert_eq!(store.surface_stack(), alloc::vec![a, c, b]);

    store.move_surface_top(b);
    assert_eq!(store.surface_stack(), alloc::vec![b, a, c]);

    store.move_surface_bottom(b);
    assert_eq!(store.surface_stack(), alloc::vec![a, c, b]);

    store.move_surface_down(a);
    assert_eq!(store.surface_stack(), alloc::vec![c, a, b]);
}

#[test]
fn sprite_ops_rejected_for_text_and_polygon() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let font = store.default_font();
    let text = store.add_text("hi", font, surface);
    let outline = store.add_rectangle(surface);

    let uv = Rect::new(0.0, 0.0, 0.5, 0.5);
    assert_eq!(store.set_uv(text, uv), Err(SceneError::Unsupported));
    assert_eq!(store.set_flip_h(text, true), Err(SceneError::Unsupported));
    assert_eq!(store.uv(outline), Err(SceneError::Unsupported));
    assert_eq!(
        store.add_action(text, Action::from_grid(1.0, 2, 2, 0, 3)),
        Err(SceneError::Unsupported)
    );
}

#[test]
fn text_ops_rejected_for_sprites() {
    let (mut store, _, _) = test_store();
    let surface = store.default_surface();
    let sprite = store.add_fill_rectangle(surface);
    assert_eq!(store.set_text(sprite, "nope"), Err(SceneError::Unsupported));
}

#[test]
fn scale_to_texture_size_uses_camera_ratio() {
    let (mut store, _, camera) = test_store();
    let surface = store.default_surface();
    let sprite = store.add_sprite(
        crate::scene::Texture {
            id: store.white_pixel().id,
            size: kurbo::Size::new(64.0, 32.0),
        },
        surface,
    );
    store.set_scale_to_texture_size(sprite, &camera).unwrap();
    assert_eq!(store.transform(sprite).scale, Vec2::new(2.0, 1.0));
}

#[test]
fn build_frame_has_one_pass_and_composite_per_surface() {
    let (mut store, mut factory, camera) = test_store();
    let second = store.create_surface(&mut factory).unwrap();
    let _sprite = store.add_fill_rectangle(store.default_surface());

    let mut plan = RenderPlan::new();
    store.build_frame(&camera, 0.016, &mut plan);

    assert_eq!(plan.passes.len(), 2);
    assert_eq!(plan.composites.len(), 2);
    // Back to front: the second surface (backmost) comes first, the
    // default surface (frontmost) last — carrying the sprite.
    assert!(plan.passes[0].items.is_empty());
    assert_eq!(plan.passes[1].items.len(), 1);
    for (pass, composite) in plan.passes.iter().zip(&plan.composites) {
        assert_eq!(pass.target, composite.source);
    }
    let _ = second;
}

#[test]
fn invisible_drawables_integrate_but_do_not_draw() {
    let (mut store, _, camera) = test_store();
    let surface = store.default_surface();
    let sprite = store.add_fill_rectangle(surface);
    store.set_visible(sprite, false);
    store.transform_mut(sprite).velocity = Vec2::new(1.0, 0.0);

    let mut plan = RenderPlan::new();
    store.build_frame(&camera, 2.0, &mut plan);

    assert_eq!(plan.item_count(), 0);
    assert_eq!(store.transform(sprite).position, Vec2::new(2.0, 0.0));
}

#[test]
fn child_reads_parent_absolutes_from_draw_order() {
    let (mut store, _, camera) = test_store();
    let surface = store.default_surface();
    let parent = store.add_fill_rectangle(surface);
    let child = store.add_fill_rectangle(surface);
    store.set_parent(child, parent).unwrap();
    store.transform_mut(parent).position = Vec2::new(5.0, 0.0);
    store.transform_mut(child).position = Vec2::new(1.0, 0.0);

    let mut plan = RenderPlan::new();
    store.build_frame(&camera, 0.0, &mut plan);

    // Parent sits earlier in the surface, so the child's absolutes are
    // valid this frame.
    assert_eq!(
        store.transform(child).absolute_position(),
        Vec2::new(6.0, 0.0)
    );
}

#[test]
fn text_emits_one_quad_per_glyph_and_restores_position() {
    let (mut store, _, camera) = test_store();
    let surface = store.default_surface();
    let font = store.default_font();
    let text = store.add_text("AB\nC", font, surface);
    store.transform_mut(text).position = Vec2::new(2.0, 3.0);

    let mut plan = RenderPlan::new();
    store.build_frame(&camera, 0.0, &mut plan);

    // Three glyphs; the newline consumes no quad.
    assert_eq!(plan.item_count(), 3);
    assert_eq!(store.transform(text).position, Vec2::new(2.0, 3.0));
}

#[test]
fn text_skips_uncovered_codepoints() {
    let (mut store, _, camera) = test_store();
    let surface = store.default_surface();
    let font = store.default_font();
    // The builtin font stops at ASCII 126.
    let text = store.add_text("A\u{1F600}B", font, surface);
    let _ = text;

    let mut plan = RenderPlan::new();
    store.build_frame(&camera, 0.0, &mut plan);
    assert_eq!(plan.item_count(), 2);
}

#[test]
fn animation_without_action_draws_nothing() {
    let (mut store, _, camera) = test_store();
    let surface = store.default_surface();
    let white = store.white_pixel();
    let _anim = store.add_animation(white, surface);

    let mut plan = RenderPlan::new();
    store.build_frame(&camera, 0.016, &mut plan);
    assert_eq!(plan.item_count(), 0);
}

#[test]
fn animation_advances_during_build() {
    let (mut store, _, camera) = test_store();
    let surface = store.default_surface();
    let white = store.white_pixel();
    let anim = store.add_animation(white, surface);
    let action = store.add_action(anim, Action::from_grid(10.0, 4, 1, 0, 3)).unwrap();
    store.with_animation(anim, |s| s.set_action(action)).unwrap();

    let mut plan = RenderPlan::new();
    store.build_frame(&camera, 0.11, &mut plan);

    assert_eq!(plan.item_count(), 1);
    assert_eq!(store.with_animation(anim, |s| s.frame()).unwrap(), 1);
}

#[test]
fn sprite_quads_carry_flip_adjusted_uv() {
    let (mut store, _, camera) = test_store();
    let surface = store.default_surface();
    let sprite = store.add_fill_rectangle(surface);
    store.set_uv(sprite, Rect::new(0.0, 0.0, 0.5, 1.0)).unwrap();
    store.set_flip_h(sprite, true).unwrap();

    let mut plan = RenderPlan::new();
    store.build_frame(&camera, 0.0, &mut plan);

    let quads: Vec<_> = plan
        .passes
        .iter()
        .flat_map(|p| &p.items)
        .filter_map(|i| match i {
            DrawItem::Quad(q) => Some(q),
            DrawItem::Lines(_) => None,
        })
        .collect();
    assert_eq!(quads.len(), 1);
    // Stored UV is [0, 0.5] horizontally; flipped, left edge exceeds right.
    assert_eq!(quads[0].uv[0], 0.5);
    assert_eq!(quads[0].uv[2], 0.0);
    // Stored UV itself is untouched.
    assert_eq!(store.uv(sprite).unwrap().x0, 0.0);
}

#[test]
fn polygons_emit_line_items() {
    let (mut store, _, camera) = test_store();
    let surface = store.default_surface();
    let outline = store.add_rectangle(surface);
    store.set_color(outline, crate::color::Color::new(255, 0, 0, 255));

    let mut plan = RenderPlan::new();
    store.build_frame(&camera, 0.0, &mut plan);

    let lines: Vec<_> = plan
        .passes
        .iter()
        .flat_map(|p| &p.items)
        .filter_map(|i| match i {
            DrawItem::Lines(l) => Some(l),
            DrawItem::Quad(_) => None,
        })
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].vertex_count, 5);
    assert_eq!(lines[0].color, [1.0, 0.0, 0.0, 1.0]);
}
