//! Real-world scenario tests
//!
//! Expected results for small scenes, including a fixed regression
//! fixture of both probability fields.

use image::{GrayImage, Luma};
use randomwalk_seg::{
    Coord, DiffusionSolver, Matrix, Params, RandomWalkSegment, SeedSet, MASK_BACKGROUND,
    MASK_FOREGROUND,
};
use std::time::{Duration, Instant};

const FIELD_TOLERANCE: f64 = 1e-12;

#[rustfmt::skip]
const EXPECTED_FOREGROUND: [[f64; 4]; 4] = [
    [0.12756026217404226, 0.36863106988837313, 0.02034458701964621, 0.017076115088899793],
    [0.3686310698882982, 0.9112808018952062, 0.04654665478556092, 0.020344587019424053],
    [0.020344587019424053, 0.04654665478556092, -0.002635436690369595, 0.08982335790532985],
    [0.01707611508889979, 0.02034458701964621, 0.08982335790622485, -0.005711004670606536],
];

#[rustfmt::skip]
const EXPECTED_BACKGROUND: [[f64; 4]; 4] = [
    [-0.005711004669871707, 0.08982335790697368, 0.020344587019646202, 0.017076115088899786],
    [0.08982335790689869, -0.00263543668978059, 0.04654665478556092, 0.02034458701942405],
    [0.020344587019424053, 0.04654665478556092, 0.86635343809436, 0.3686310698867292],
    [0.01707611508889979, 0.020344587019646202, 0.3686310698876243, 0.1275602621733074],
];

fn regression_solver() -> DiffusionSolver {
    let params = Params {
        iterations: 50,
        ..Params::default()
    };
    DiffusionSolver::new(Matrix::filled(4, 4, 100.0), params).unwrap()
}

fn regression_seeds() -> SeedSet {
    SeedSet::new(vec![Coord::new(1, 1)], vec![Coord::new(2, 2)])
}

fn assert_field(actual: &Matrix, expected: &[[f64; 4]; 4], name: &str) {
    for (y, row) in expected.iter().enumerate() {
        for (x, &want) in row.iter().enumerate() {
            let got = actual.get(x as u32, y as u32);
            assert!(
                (got - want).abs() <= FIELD_TOLERANCE,
                "{name} at ({x}, {y}): expected {want}, got {got}"
            );
        }
    }
}

#[test]
fn test_flat_image_regression_fixture() {
    let fields = regression_solver().solve(&regression_seeds()).unwrap();

    assert_field(fields.foreground(), &EXPECTED_FOREGROUND, "foreground");
    assert_field(fields.background(), &EXPECTED_BACKGROUND, "background");
}

#[test]
fn test_flat_image_regression_mask() {
    let mask = regression_solver().run(&regression_seeds()).unwrap();

    // cells whose fields differ clearly; the rest are ties up to rounding
    for (y, (fg_row, bg_row)) in EXPECTED_FOREGROUND
        .iter()
        .zip(&EXPECTED_BACKGROUND)
        .enumerate()
    {
        for (x, (&fg, &bg)) in fg_row.iter().zip(bg_row).enumerate() {
            if (fg - bg).abs() < 1e-9 {
                continue;
            }
            let want = if fg > bg {
                MASK_FOREGROUND
            } else {
                MASK_BACKGROUND
            };
            assert_eq!(mask.get_pixel(x as u32, y as u32)[0], want, "at ({x}, {y})");
        }
    }
    assert_eq!(mask.get_pixel(1, 1)[0], MASK_FOREGROUND);
    assert_eq!(mask.get_pixel(2, 2)[0], MASK_BACKGROUND);
}

#[test]
fn test_flat_image_regression_is_reproducible() {
    let solver = regression_solver();
    let first = solver.solve(&regression_seeds()).unwrap();
    let second = solver.solve(&regression_seeds()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_two_region_image_splits_at_the_edge() {
    let image = GrayImage::from_fn(12, 8, |x, _| if x < 6 { Luma([50]) } else { Luma([200]) });
    let seeds = SeedSet::new(
        vec![Coord::new(2, 3), Coord::new(2, 5)],
        vec![Coord::new(9, 3), Coord::new(9, 5)],
    );
    let params = Params {
        iterations: 300,
        ..Params::default()
    };

    let mask = image.random_walk_segment(&seeds, &params).unwrap();
    for (x, _, p) in mask.enumerate_pixels() {
        let want = if x < 6 {
            MASK_FOREGROUND
        } else {
            MASK_BACKGROUND
        };
        assert_eq!(p[0], want);
    }
}

#[test]
fn test_dark_disc_is_recovered_exactly() {
    let inside = |x: u32, y: u32| {
        let (dx, dy) = (i64::from(x) - 5, i64::from(y) - 5);
        dx * dx + dy * dy <= 9
    };
    let image = GrayImage::from_fn(11, 11, |x, y| {
        if inside(x, y) {
            Luma([60])
        } else {
            Luma([180])
        }
    });
    let seeds = SeedSet::new(vec![Coord::new(5, 5)], vec![Coord::new(0, 0)]);
    let params = Params {
        iterations: 500,
        ..Params::default()
    };

    let mask = image.random_walk_segment(&seeds, &params).unwrap();
    for (x, y, p) in mask.enumerate_pixels() {
        let want = if inside(x, y) {
            MASK_FOREGROUND
        } else {
            MASK_BACKGROUND
        };
        assert_eq!(p[0], want, "at ({x}, {y})");
    }
}

#[test]
fn test_sixteen_bit_input_matches_eight_bit() {
    let image = image::ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(12, 8, |x, _| {
        if x < 6 {
            Luma([50])
        } else {
            Luma([200])
        }
    });
    let seeds = SeedSet::new(
        vec![Coord::new(2, 3), Coord::new(2, 5)],
        vec![Coord::new(9, 3), Coord::new(9, 5)],
    );
    let params = Params {
        iterations: 300,
        ..Params::default()
    };

    let wide = image.random_walk_segment(&seeds, &params).unwrap();
    let narrow = GrayImage::from_fn(12, 8, |x, _| if x < 6 { Luma([50]) } else { Luma([200]) })
        .random_walk_segment(&seeds, &params)
        .unwrap();
    assert_eq!(wide, narrow);
}

fn fastest_run(solver: &DiffusionSolver, seeds: &SeedSet) -> Duration {
    (0..3)
        .map(|_| {
            let start = Instant::now();
            solver.solve(seeds).unwrap();
            start.elapsed()
        })
        .min()
        .unwrap()
}

/// Doubling the iteration count must cost materially more time.
///
/// The bound is coarse (more than 1.2x) and each timing is the fastest of
/// three runs. `gamma0` is lowered to 5 so that the fields stay finite over
/// both runs on a flat image.
#[test]
fn test_run_time_grows_with_iteration_count() {
    let image = Matrix::filled(64, 64, 128.0);
    let seeds = SeedSet::new(vec![Coord::new(10, 10)], vec![Coord::new(50, 50)]);
    let params = |iterations| Params {
        iterations,
        gamma0: 5.0,
        ..Params::default()
    };

    let short = DiffusionSolver::new(image.clone(), params(200)).unwrap();
    let long = DiffusionSolver::new(image, params(400)).unwrap();

    let ratio = fastest_run(&long, &seeds).as_secs_f64() / fastest_run(&short, &seeds).as_secs_f64();
    assert!(ratio > 1.2, "ratio {ratio}");
}
