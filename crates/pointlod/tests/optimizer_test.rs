//! Integration tests for building, selecting and querying optimized point clouds.

use pointlod::{
    presort, Camera, HeadlessRenderer, Mat4, OptimizedPointMesh, OptimizerConfig,
    PointCloudOptimizer, PointLodError, Ray, Segment, Vec2, Vec3, Viewport,
};
use proptest::prelude::*;

/// `n` x `n` grid points spanning a `size` x `size` square in the z = 0 plane,
/// row by row.
fn grid(n: usize, size: f32) -> Vec<Vec3> {
    let step = size / (n - 1) as f32;
    (0..n * n)
        .map(|i| Vec3::new((i % n) as f32 * step, (i / n) as f32 * step, 0.0))
        .collect()
}

fn camera_above(center: Vec3, height: f32) -> Camera {
    let mut camera = Camera::new(1.0);
    camera.position = center + Vec3::new(0.0, 0.0, height);
    camera.target = center;
    camera.near = 0.5;
    camera.far = height * 10.0;
    camera
}

#[test]
fn test_grid_splits_into_equal_segments() {
    let optimizer = PointCloudOptimizer::optimize(grid(100, 10.0), OptimizerConfig::new(4)).unwrap();
    let ranges: Vec<_> = optimizer
        .segments()
        .unwrap()
        .iter()
        .map(Segment::range)
        .collect();
    assert_eq!(ranges, vec![0..2500, 2500..5000, 5000..7500, 7500..10_000]);
}

#[test]
fn test_full_view_covers_segment() {
    let optimizer = PointCloudOptimizer::optimize(grid(100, 10.0), OptimizerConfig::new(4)).unwrap();
    for segment in optimizer.segments().unwrap() {
        let mut indices: Vec<usize> = segment
            .full_view()
            .indices()
            .iter()
            .map(|&i| i as usize)
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, segment.range().collect::<Vec<_>>());
    }
}

#[test]
fn test_threshold_above_segment_size_keeps_only_full_view() {
    let config = OptimizerConfig::new(1).with_indices_number_threshold(100_000);
    let positions: Vec<Vec3> = (0..50_000)
        .map(|i| Vec3::new((i % 250) as f32 * 0.04, (i / 250) as f32 * 0.04, 0.0))
        .collect();
    let optimizer = PointCloudOptimizer::optimize(positions, config).unwrap();
    let segments = optimizer.segments().unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].views().len(), 1);
    assert_eq!(segments[0].full_view().len(), 50_000);
}

#[test]
fn test_far_camera_selects_coarsest_views() {
    let optimizer = PointCloudOptimizer::optimize(grid(100, 10.0), OptimizerConfig::new(4)).unwrap();
    let camera = camera_above(Vec3::new(5.0, 5.0, 0.0), 100_000.0);
    let selection = optimizer
        .select_visible_views(camera.view_projection_matrix(), Viewport::new(1000, 1000), 1.0)
        .unwrap();

    assert_eq!(selection.len(), 4);
    for selected in selection.iter() {
        assert!(selected.segment.coarsest_level() >= 1);
        assert_eq!(selected.level, selected.segment.coarsest_level());
    }
}

#[test]
fn test_close_camera_selects_finer_views() {
    let optimizer = PointCloudOptimizer::optimize(
        grid(100, 10.0),
        OptimizerConfig::new(4).with_indices_number_threshold(0),
    )
    .unwrap();
    let viewport = Viewport::new(1000, 1000);
    let center = Vec3::new(5.0, 5.0, 0.0);

    let far = optimizer
        .select_visible_views(camera_above(center, 200.0).view_projection_matrix(), viewport, 1.0)
        .unwrap()
        .levels();
    let near = optimizer
        .select_visible_views(camera_above(center, 12.0).view_projection_matrix(), viewport, 1.0)
        .unwrap()
        .levels();

    assert_eq!(far.len(), near.len());
    for ((_, far_level), (_, near_level)) in far.iter().zip(&near) {
        assert!(near_level <= far_level);
    }
    assert!(near.iter().zip(&far).any(|((_, n), (_, f))| n < f));
}

#[test]
fn test_larger_target_size_never_selects_finer_views() {
    let optimizer = PointCloudOptimizer::optimize(
        grid(100, 10.0),
        OptimizerConfig::new(8).with_indices_number_threshold(0),
    )
    .unwrap();
    let vp = camera_above(Vec3::new(5.0, 5.0, 0.0), 30.0).view_projection_matrix();
    let viewport = Viewport::new(800, 800);

    let small = optimizer.select_visible_views(vp, viewport, 1.0).unwrap().levels();
    let large = optimizer.select_visible_views(vp, viewport, 8.0).unwrap().levels();
    for ((_, s), (_, l)) in small.iter().zip(&large) {
        assert!(l >= s);
    }
}

#[test]
fn test_selection_is_idempotent() {
    let optimizer = PointCloudOptimizer::optimize(grid(100, 10.0), OptimizerConfig::new(16)).unwrap();
    let mut camera = camera_above(Vec3::new(2.0, 3.0, 0.0), 6.0);
    camera.position.x += 1.5;
    let vp = camera.view_projection_matrix();
    let viewport = Viewport::new(640, 480);

    let first = optimizer.select_visible_views(vp, viewport, 2.0).unwrap();
    let second = optimizer.select_visible_views(vp, viewport, 2.0).unwrap();
    assert_eq!(first.levels(), second.levels());
    assert_eq!(first.stats(), second.stats());
    for (a, b) in first.iter().zip(second.iter()) {
        assert!(std::ptr::eq(a.segment, b.segment));
        assert!(std::ptr::eq(a.view, b.view));
    }
}

#[test]
fn test_closest_index_exact_hit() {
    let positions = grid(100, 10.0);
    let target = positions[4242];
    let optimizer = PointCloudOptimizer::optimize(positions, OptimizerConfig::new(4)).unwrap();

    let ray = Ray::new(target + Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
    let hit = optimizer.closest_index(&ray, 0.0).unwrap().unwrap();
    assert_eq!(hit.index, 4242);
    assert_eq!(hit.position, target);
}

#[test]
fn test_closest_index_oblique_hit() {
    let positions = grid(100, 10.0);
    let optimizer = PointCloudOptimizer::optimize(positions.clone(), OptimizerConfig::new(4)).unwrap();
    let eye = Vec3::new(-3.1, 2.7, 9.3);

    for index in [0, 17, 4242, 5050, 7391, 9999] {
        let hit = optimizer
            .closest_index(&Ray::through(eye, positions[index]), 0.0)
            .unwrap()
            .unwrap();
        assert_eq!(hit.index, index);
    }
}

#[test]
fn test_closest_index_miss() {
    let optimizer = PointCloudOptimizer::optimize(grid(100, 10.0), OptimizerConfig::new(4)).unwrap();
    let ray = Ray::new(Vec3::new(-5.0, 5.0, 1.0), Vec3::X);
    assert!(optimizer.closest_index(&ray, 0.5).unwrap().is_none());
}

#[test]
fn test_use_before_build() {
    let optimizer = PointCloudOptimizer::new();
    assert!(matches!(
        optimizer.select_visible_views(Mat4::IDENTITY, Viewport::new(10, 10), 1.0),
        Err(PointLodError::NotInitialized)
    ));
    assert!(matches!(
        optimizer.closest_index(&Ray::new(Vec3::ZERO, Vec3::X), 1.0),
        Err(PointLodError::NotInitialized)
    ));
}

#[test]
fn test_presort_tightens_segments() {
    let ordered = grid(64, 10.0);
    let n = ordered.len();
    // Scatter the grid with a fixed stride permutation
    let scattered: Vec<Vec3> = (0..n).map(|i| ordered[i * 2579 % n]).collect();
    let (sorted, _) = presort::sort_by_morton(&scattered);

    let area = |positions: Vec<Vec3>| -> f32 {
        let optimizer = PointCloudOptimizer::optimize(positions, OptimizerConfig::new(16)).unwrap();
        optimizer
            .segments()
            .unwrap()
            .iter()
            .map(|s| {
                let e = s.bounds().extents();
                e.x * e.y
            })
            .sum()
    };

    assert!(area(sorted) * 4.0 < area(scattered));
}

#[test]
fn test_headless_frame_matches_selection() {
    let mut mesh =
        OptimizedPointMesh::from_positions(grid(100, 10.0), OptimizerConfig::new(4)).unwrap();
    mesh.set_target_pixel_size(1.5);
    let camera = camera_above(Vec3::new(5.0, 5.0, 0.0), 40.0);
    let viewport = Viewport::new(512, 512);
    let mut renderer = HeadlessRenderer::new();

    let stats = mesh.render_camera(&mut renderer, &camera, viewport).unwrap();
    let frame = renderer.last_frame().unwrap();
    assert_eq!(renderer.vertex_count(), 10_000);
    assert_eq!(frame.viewport, Some(viewport));
    assert_eq!(frame.draws.len(), stats.draw_calls);
    assert_eq!(frame.rendered_points(), stats.rendered_points);
    assert_eq!(mesh.last_frame_stats(), stats);

    let selection = mesh
        .optimizer()
        .select_visible_views(camera.view_projection_matrix(), viewport, 1.5)
        .unwrap();
    let recorded: Vec<(usize, usize)> = frame.draws.iter().map(|d| (d.segment_id, d.level)).collect();
    assert_eq!(recorded, selection.levels());
}

#[test]
fn test_pick_through_mesh() {
    let positions = grid(11, 10.0);
    let mesh = OptimizedPointMesh::from_positions(positions, OptimizerConfig::new(2)).unwrap();
    let camera = camera_above(Vec3::new(5.0, 5.0, 0.0), 20.0);
    let viewport = Viewport::new(400, 400);

    // The viewport center looks straight down at the grid center (5, 5)
    let hit = mesh
        .pick(&camera, viewport, Vec2::new(200.0, 200.0), 0.1)
        .unwrap()
        .unwrap();
    assert_eq!(hit.index, 5 * 11 + 5);
    assert!(hit.distance < 0.1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn culled_segments_have_no_visible_points(
        cam_x in -20.0f32..30.0,
        cam_y in -20.0f32..30.0,
        cam_z in 1.0f32..40.0,
        look_x in -10.0f32..20.0,
        look_y in -10.0f32..20.0,
    ) {
        let positions = grid(40, 10.0);
        let optimizer = PointCloudOptimizer::optimize(
            positions.clone(),
            OptimizerConfig::new(16).with_parallel_build(false),
        ).unwrap();

        let mut camera = Camera::new(1.0);
        camera.position = Vec3::new(cam_x, cam_y, cam_z);
        camera.target = Vec3::new(look_x, look_y, 0.0);
        camera.near = 0.1;
        camera.far = 200.0;
        let vp = camera.view_projection_matrix();

        let selection = optimizer.select_visible_views(vp, Viewport::new(320, 240), 1.0).unwrap();
        let drawn: Vec<usize> = selection.iter().map(|s| s.segment.id()).collect();

        for segment in optimizer.segments().unwrap() {
            if drawn.contains(&segment.id()) {
                prop_assert!(!segment.bounds().is_outside_clip_volume(&vp));
                continue;
            }
            for i in segment.range() {
                let clip = vp * positions[i].extend(1.0);
                let inside = clip.w > 0.0
                    && clip.x.abs() <= clip.w
                    && clip.y.abs() <= clip.w
                    && clip.z.abs() <= clip.w;
                prop_assert!(!inside, "culled segment {} has visible point {}", segment.id(), i);
            }
        }
    }
}
