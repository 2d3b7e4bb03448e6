/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! End-to-end properties of the public metric API.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ganmetrics::{
    FrechetInceptionDistance, InceptionScore, KnnScoresModule, MetricErrorKind, ModeScore,
    config::{Builder, KnnParams, ScoreParams},
    frechet_inception_distance, inception_score, knn_scores, mode_score,
};
use ganmetrics_utils::{
    TensorView,
    views::{Matrix, MatrixView},
};
use rand::{Rng, SeedableRng, distr::Distribution, rngs::StdRng};
use rand_distr::StandardNormal;
use rstest::rstest;

fn view<T>(data: &[T], nrows: usize, ncols: usize) -> MatrixView<'_, T> {
    MatrixView::try_from(data, nrows, ncols).unwrap()
}

/// Random class-probability rows from a softmax over Gaussian logits.
fn probabilities(nrows: usize, nclasses: usize, rng: &mut StdRng) -> Matrix<f64> {
    let mut m = Matrix::new(0.0, nrows, nclasses);
    for row in m.row_iter_mut() {
        row.iter_mut().for_each(|x| {
            let z: f64 = StandardNormal.sample(rng);
            *x = (2.0 * z).exp();
        });
        let total: f64 = row.iter().sum();
        row.iter_mut().for_each(|x| *x /= total);
    }
    m
}

fn gaussian(nrows: usize, ncols: usize, mean: f64, rng: &mut StdRng) -> Matrix<f64> {
    let mut m = Matrix::new(0.0, nrows, ncols);
    m.as_mut_slice().iter_mut().for_each(|x| {
        let z: f64 = StandardNormal.sample(rng);
        *x = mean + z;
    });
    m
}

fn distances(a: &Matrix<f64>, b: &Matrix<f64>) -> Matrix<f64> {
    let mut out = Matrix::new(0.0, a.nrows(), b.nrows());
    for (i, x) in a.row_iter().enumerate() {
        for (j, y) in b.row_iter().enumerate() {
            let d: f64 = std::iter::zip(x, y).map(|(p, q)| (p - q) * (p - q)).sum();
            out[(i, j)] = d.sqrt();
        }
    }
    out
}

/////////////////////
// Inception Score //
/////////////////////

#[rstest]
#[case(2)]
#[case(10)]
#[case(1000)]
fn inception_single_row_is_one(#[case] nclasses: usize) {
    let mut rng = StdRng::seed_from_u64(0x1001 + nclasses as u64);
    let x = probabilities(1, nclasses, &mut rng);
    assert_relative_eq!(inception_score(x.as_view(), 1e-20), 1.0, epsilon = 1e-12);
}

#[rstest]
#[case(1e-20)]
#[case(1e-6)]
fn inception_identical_rows_is_one(#[case] eps: f64) {
    let mut rng = StdRng::seed_from_u64(0x1002);
    let row = probabilities(1, 7, &mut rng);

    let mut x = Matrix::new(0.0, 25, 7);
    x.row_iter_mut()
        .for_each(|r| r.copy_from_slice(row.as_slice()));
    assert_relative_eq!(inception_score(x.as_view(), eps), 1.0, epsilon = 1e-12);
}

#[test]
fn inception_is_bounded_by_class_count() {
    let mut rng = StdRng::seed_from_u64(0x1003);
    let x = probabilities(200, 10, &mut rng);
    let score = inception_score(x.as_view(), 1e-20);
    assert!((1.0..=10.0).contains(&score), "score = {}", score);
}

#[test]
fn mode_equals_inception_when_marginals_match() {
    let mut rng = StdRng::seed_from_u64(0x1004);
    let x = probabilities(50, 6, &mut rng);

    // The real set is the generated set in reverse order, so the marginals agree.
    let mut reversed = Vec::with_capacity(x.as_slice().len());
    (0..x.nrows())
        .rev()
        .for_each(|i| reversed.extend_from_slice(x.row(i)));
    let y = view(&reversed, x.nrows(), x.ncols());

    let mode = mode_score(x.as_view(), y.as_view(), 1e-20).unwrap();
    let inception = inception_score(x.as_view(), 1e-20);
    assert_relative_eq!(mode, inception, max_relative = 1e-10);
}

//////////////////////
// Fréchet Distance //
//////////////////////

#[rstest]
#[case(8, 3)]
#[case(100, 16)]
fn frechet_self_distance_is_zero(#[case] nrows: usize, #[case] ncols: usize) {
    let mut rng = StdRng::seed_from_u64(0x2001);
    let a = gaussian(nrows, ncols, 0.3, &mut rng);
    let distance = frechet_inception_distance(&a, &a).unwrap();
    assert_abs_diff_eq!(distance, 0.0, epsilon = 1e-8);
}

#[test]
fn frechet_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(0x2002);
    let a = gaussian(80, 12, 0.0, &mut rng);
    let b = gaussian(60, 12, 1.0, &mut rng);

    let ab = frechet_inception_distance(&a, &b).unwrap();
    let ba = frechet_inception_distance(&b, &a).unwrap();
    assert_relative_eq!(ab, ba, max_relative = 1e-9);
}

#[test]
fn frechet_grows_with_separation() {
    let mut rng = StdRng::seed_from_u64(0x2003);
    let a = gaussian(200, 4, 0.0, &mut rng);
    let near = gaussian(200, 4, 0.5, &mut rng);
    let far = gaussian(200, 4, 3.0, &mut rng);

    let d_near = frechet_inception_distance(&a, &near).unwrap();
    let d_far = frechet_inception_distance(&a, &far).unwrap();
    assert!(d_near < d_far, "{} >= {}", d_near, d_far);
    // Squared mean gap is 4 * 3^2 = 36.
    assert_relative_eq!(d_far, 36.0, max_relative = 0.25);
}

#[test]
fn frechet_accepts_image_shaped_tensors() {
    let mut rng = StdRng::seed_from_u64(0x2004);
    let a = gaussian(20, 12, 0.0, &mut rng);
    let b = gaussian(20, 12, 0.5, &mut rng);

    let shape = [20, 3, 2, 2];
    let ta = TensorView::try_new(a.as_slice(), &shape).unwrap();
    let tb = TensorView::try_new(b.as_slice(), &shape).unwrap();

    assert_eq!(
        frechet_inception_distance(&ta, &tb).unwrap(),
        frechet_inception_distance(&a, &b).unwrap()
    );
}

#[test]
fn frechet_errors() {
    let a = Matrix::new(0.0f32, 4, 3);
    let b = Matrix::new(0.0f32, 4, 2);
    let err = frechet_inception_distance(&a, &b).unwrap_err();
    assert_eq!(err.kind(), MetricErrorKind::Shape);

    let single = Matrix::new(1.0f32, 1, 3);
    let err = frechet_inception_distance(&single, &a).unwrap_err();
    assert_eq!(err.kind(), MetricErrorKind::Linalg);
}

/////////
// KNN //
/////////

#[test]
fn knn_coincident_clusters() {
    let d_xx = [0.0f64; 4];
    let d_yy = [0.0f64; 4];
    let d_xy = [100.0f64; 4];

    let scores = knn_scores(view(&d_xx, 2, 2), view(&d_xy, 2, 2), view(&d_yy, 2, 2), 1).unwrap();
    assert_eq!(scores.as_tuple(), (1.0, 1.0, 1.0));
}

#[rstest]
#[case(1)]
#[case(5)]
fn knn_separated_clouds(#[case] k: usize) {
    let mut rng = StdRng::seed_from_u64(0x3001);
    let real = gaussian(30, 8, 0.0, &mut rng);
    let fake = gaussian(40, 8, 50.0, &mut rng);

    let scores = knn_scores(
        distances(&real, &real).as_view(),
        distances(&real, &fake).as_view(),
        distances(&fake, &fake).as_view(),
        k,
    )
    .unwrap();
    assert_eq!(scores.as_tuple(), (1.0, 1.0, 1.0));
    assert_eq!(scores.confusion.total(), 70);
}

#[test]
fn knn_same_distribution_is_near_chance() {
    let mut rng = StdRng::seed_from_u64(0x3002);
    let real = gaussian(200, 4, 0.0, &mut rng);
    let fake = gaussian(200, 4, 0.0, &mut rng);

    let scores = knn_scores(
        distances(&real, &real).as_view(),
        distances(&real, &fake).as_view(),
        distances(&fake, &fake).as_view(),
        1,
    )
    .unwrap();
    assert!(
        (0.35..=0.65).contains(&scores.accuracy),
        "accuracy = {}",
        scores.accuracy
    );
}

#[test]
fn knn_is_deterministic_and_leaves_inputs_untouched() {
    let mut rng = StdRng::seed_from_u64(0x3003);
    let n = 12;
    let mut d = vec![0.0f64; n * n];
    for i in 0..n {
        for j in 0..i {
            let v: f64 = rng.random_range(0.0..4.0);
            d[i * n + j] = v;
            d[j * n + i] = v;
        }
    }
    let before = d.clone();
    let d_xy = vec![2.0f64; n * n];

    let first = knn_scores(view(&d, n, n), view(&d_xy, n, n), view(&d, n, n), 3).unwrap();
    let second = knn_scores(view(&d, n, n), view(&d_xy, n, n), view(&d, n, n), 3).unwrap();
    assert_eq!(first, second);
    assert_eq!(d, before);
}

/////////////
// Modules //
/////////////

#[test]
fn wrappers_match_direct_calls() {
    let mut rng = StdRng::seed_from_u64(0x4001);
    let x = probabilities(30, 5, &mut rng);
    let y = probabilities(20, 5, &mut rng);
    let params = ScoreParams::new(1e-6).unwrap();

    let inception = InceptionScore::new(params);
    assert_eq!(
        inception.call(x.as_view()).unwrap(),
        inception_score(x.as_view(), 1e-6)
    );

    let mode = ModeScore::new(params);
    assert_eq!(
        mode.call((x.as_view(), y.as_view())).unwrap(),
        mode_score(x.as_view(), y.as_view(), 1e-6).unwrap()
    );

    let a = gaussian(10, 3, 0.0, &mut rng);
    let b = gaussian(10, 3, 1.0, &mut rng);
    let fid = FrechetInceptionDistance::new();
    assert_eq!(
        fid.call((&a, &b)).unwrap(),
        frechet_inception_distance(&a, &b).unwrap()
    );

    let d_xx = distances(&a, &a);
    let d_xy = distances(&a, &b);
    let d_yy = distances(&b, &b);
    let knn = KnnScoresModule::new(KnnParams::new(3).unwrap());
    assert_eq!(
        knn.call((d_xx.as_view(), d_xy.as_view(), d_yy.as_view()))
            .unwrap(),
        knn_scores(d_xx.as_view(), d_xy.as_view(), d_yy.as_view(), 3).unwrap()
    );
}

#[test]
fn wrappers_from_harness_json() {
    let builder: Builder = serde_json::from_str(r#"{ "eps": 1e-6, "k": 1 }"#).unwrap();
    let config = builder.build().unwrap();

    let x = [0.6f32, 0.4, 0.1, 0.9];
    let module = InceptionScore::from_config(&config);
    assert_eq!(
        module.call(view(&x, 2, 2)).unwrap(),
        inception_score(view(&x, 2, 2), 1e-6)
    );

    let knn = KnnScoresModule::from_config(&config);
    assert_eq!(knn.params().k().get(), 1);
}
