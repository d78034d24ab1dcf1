use super::*;
use crate::error::ConversionError;
use crate::kernel::{Exact, Float};
use crate::verify::{check_sign_convention, same_rows};
use nalgebra::{dmatrix, dvector};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn float_ctx() -> NumericContext<Float> {
    NumericContext::new(Float::default())
}

fn rep(kind: RepKind, rows: Vec<Vec<f64>>) -> RepMatrix<f64> {
    RepMatrix::from_rows(kind, rows).unwrap()
}

fn square_vertices() -> DMatrix<f64> {
    dmatrix![
        1.0, 1.0;
        -1.0, 1.0;
        -1.0, -1.0;
        1.0, -1.0
    ]
}

fn square_facets() -> RepMatrix<f64> {
    rep(
        RepKind::H,
        vec![
            vec![1.0, -1.0, 0.0],
            vec![1.0, 1.0, 0.0],
            vec![1.0, 0.0, -1.0],
            vec![1.0, 0.0, 1.0],
        ],
    )
}

#[test]
fn reads_before_conversion_are_empty() {
    let ctx = float_ctx();
    let p = Polyhedron::new(&ctx);
    assert!(!p.is_converted());
    assert_eq!(p.hrep().shape(), (0, 0));
    assert_eq!(p.vrep().shape(), (0, 0));
    let (a, b) = p.hrep_split();
    assert_eq!((a.shape(), b.len()), ((0, 0), 0));
    assert!(p.dual().is_none() && p.last_error().is_none());
}

#[test]
fn square_vertices_to_facets() {
    let ctx = float_ctx();
    let p = Polyhedron::from_vertices(&ctx, &square_vertices()).unwrap();
    let h = p.representation(RepKind::H).unwrap();
    assert!(same_rows(&h, &square_facets()));
    let (a, b) = p.hrep_split();
    assert_eq!(a.nrows(), 4);
    assert!(b.iter().all(|x| (x - 1.0).abs() < 1e-9));
    // vrep of a V-input polyhedron is the input of record
    assert_eq!(p.vrep().column(0), dvector![1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn square_facets_to_vertices_with_incidence() {
    let ctx = float_ctx();
    let mut p = Polyhedron::new(&ctx);
    p.set(&square_facets()).unwrap();
    let v = p.representation(RepKind::V).unwrap();
    let expected = RepMatrix::from_vertices(&square_vertices()).unwrap();
    assert!(same_rows(&v, &expected));
    let dual = p.dual().unwrap();
    assert_eq!(dual.rank(), 3);
    assert_eq!(dual.lineality(), 0);
    assert!(!dual.is_homogeneous() && !dual.is_empty_polyhedron());
    // every vertex of the square is tight on exactly two facets
    assert!(dual.incidence().iter().all(|z| z.len() == 2));
}

#[test]
fn tiny_row_scale_stays_affine() {
    let ctx = float_ctx();
    let scaled = square_facets().to_dmatrix() * 1e-10;
    let mut p = Polyhedron::new(&ctx);
    p.set_hrep(&scaled).unwrap();
    let dual = p.dual().unwrap();
    assert!(!dual.is_homogeneous() && !dual.is_empty_polyhedron());
    let expected = RepMatrix::from_vertices(&square_vertices()).unwrap();
    assert!(same_rows(&p.representation(RepKind::V).unwrap(), &expected));

    let mut q = Polyhedron::new(&ctx);
    q.set(&square_facets()).unwrap();
    assert!(same_rows(
        &p.representation(RepKind::V).unwrap(),
        &q.representation(RepKind::V).unwrap()
    ));
}

#[test]
fn exact_lowering_keeps_subnormal_coordinates() {
    let ctx = NumericContext::new(Exact);
    // 0 <= x <= 1e-310, 0 <= y <= 1
    let h = dmatrix![
        1e-310, -1.0, 0.0;
        0.0, 1.0, 0.0;
        1.0, 0.0, -1.0;
        0.0, 0.0, 1.0
    ];
    let p = Polyhedron::with_rep(&ctx, &h, RepKind::H).unwrap();
    let (v, t) = p.vrep_split();
    assert_eq!(v.nrows(), 4);
    assert!(t.iter().all(|&x| x == 1.0));
    assert!(v.iter().all(|x| x.is_finite()));
    assert_eq!(v.column(0).iter().filter(|&&x| x == 1e-310).count(), 2);
    assert_eq!(v.column(1).iter().filter(|&&y| y == 1.0).count(), 2);
}

#[test]
fn split_forms_apply_and_undo_the_sign_flip() {
    let ctx = float_ctx();
    let mut p = Polyhedron::new(&ctx);
    // x <= 1, y <= 1, -x <= 0, -y <= 0
    let a = dmatrix![1.0, 0.0; 0.0, 1.0; -1.0, 0.0; 0.0, -1.0];
    let b = dvector![1.0, 1.0, 0.0, 0.0];
    p.set_hrep_split(&a, &b).unwrap();
    assert_eq!(p.hrep().row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, -1.0, 0.0]);
    let (a2, b2) = p.hrep_split();
    assert_eq!((a2, b2), (a, b));
    let (v, t) = p.vrep_split();
    assert_eq!(v.nrows(), 4);
    assert!(t.iter().all(|&x| x == 1.0));
    assert!(v.iter().all(|&x| x.abs() < 1e-12 || (x - 1.0).abs() < 1e-12));
}

#[test]
fn homogeneous_cone_round_trip() {
    let ctx = float_ctx();
    let rays = dmatrix![
        1.0, 1.0, 2.0;
        -1.0, 1.0, 2.0;
        -1.0, -1.0, 2.0;
        1.0, -1.0, 2.0
    ];
    let p = Polyhedron::from_rays(&ctx, &rays).unwrap();
    let expected = rep(
        RepKind::H,
        vec![
            vec![0.0, 2.0, 0.0, 1.0],
            vec![0.0, 0.0, 2.0, 1.0],
            vec![0.0, -2.0, 0.0, 1.0],
            vec![0.0, 0.0, -2.0, 1.0],
        ],
    );
    assert!(same_rows(&p.representation(RepKind::H).unwrap(), &expected));
    assert!(p.dual().unwrap().is_homogeneous());

    let back = Polyhedron::with_rep(&ctx, &expected.to_dmatrix(), RepKind::H).unwrap();
    let v = back.representation(RepKind::V).unwrap();
    assert!(same_rows(&v, &RepMatrix::from_rays(&rays).unwrap()));
}

#[test]
fn cone_with_apex_vertex_keeps_trivial_row() {
    let ctx = float_ctx();
    let vrep = dmatrix![
        0.0, 0.5, 0.5, 1.0;
        0.0, -0.5, 0.5, 1.0;
        0.0, -0.5, -0.5, 1.0;
        0.0, 0.5, -0.5, 1.0;
        1.0, 0.0, 0.0, 0.0
    ];
    let hrep = rep(
        RepKind::H,
        vec![
            vec![0.0, 2.0, 0.0, 1.0],
            vec![0.0, 0.0, 2.0, 1.0],
            vec![0.0, -2.0, 0.0, 1.0],
            vec![0.0, 0.0, -2.0, 1.0],
            vec![1.0, 0.0, 0.0, 0.0],
        ],
    );
    let p = Polyhedron::with_rep(&ctx, &vrep, RepKind::V).unwrap();
    assert!(same_rows(&p.representation(RepKind::H).unwrap(), &hrep));

    let q = Polyhedron::with_rep(&ctx, &hrep.to_dmatrix(), RepKind::H).unwrap();
    let v = q.representation(RepKind::V).unwrap();
    assert!(same_rows(&v, &RepMatrix::from_dmatrix(&vrep, RepKind::V).unwrap()));
}

#[test]
fn infeasible_system_is_empty_not_an_error() {
    let ctx = float_ctx();
    let mut p = Polyhedron::new(&ctx);
    // 0·x <= -1
    p.set_hrep(&dmatrix![-1.0, 0.0, 0.0]).unwrap();
    assert!(p.dual().unwrap().is_empty_polyhedron());
    assert_eq!(p.vrep().nrows(), 0);
    assert!(p.last_error().is_none());

    // x <= 0 and x >= 1
    p.set_hrep(&dmatrix![0.0, -1.0; -1.0, 1.0]).unwrap();
    assert!(p.dual().unwrap().is_empty_polyhedron());
}

#[test]
fn single_point_round_trip() {
    let ctx = float_ctx();
    let p = Polyhedron::from_vertices(&ctx, &dmatrix![0.0, 0.0, 0.0]).unwrap();
    let h = p.representation(RepKind::H).unwrap();
    let mut rows = vec![vec![1.0, 0.0, 0.0, 0.0]];
    for i in 1..4 {
        for s in [1.0, -1.0] {
            let mut r = vec![0.0; 4];
            r[i] = s;
            rows.push(r);
        }
    }
    assert!(same_rows(&h, &rep(RepKind::H, rows)));
    assert_eq!(p.dual().unwrap().lineality(), 3);

    let q = Polyhedron::with_rep(&ctx, &h.to_dmatrix(), RepKind::H).unwrap();
    assert!(same_rows(
        &q.representation(RepKind::V).unwrap(),
        &rep(RepKind::V, vec![vec![1.0, 0.0, 0.0, 0.0]])
    ));
}

#[test]
fn hexagon_ignores_interior_points() {
    let ctx = float_ctx();
    let hexagon = dmatrix![
        2.0, 0.0;
        1.0, 2.0;
        -1.0, 2.0;
        -2.0, 0.0;
        -1.0, -2.0;
        1.0, -2.0
    ];
    let mut points = hexagon.clone().insert_rows(6, 2, 0.0);
    points.set_row(6, &nalgebra::RowDVector::from_row_slice(&[1.99, 0.01]));
    points.set_row(7, &nalgebra::RowDVector::from_row_slice(&[0.99, 1.99]));
    let p = Polyhedron::from_vertices(&ctx, &points).unwrap();
    let expected = rep(
        RepKind::H,
        vec![
            vec![4.0, -2.0, -1.0],
            vec![2.0, 0.0, -1.0],
            vec![4.0, 2.0, -1.0],
            vec![4.0, 2.0, 1.0],
            vec![2.0, 0.0, 1.0],
            vec![4.0, -2.0, 1.0],
        ],
    );
    let h = p.representation(RepKind::H).unwrap();
    assert!(same_rows(&h, &expected));
    check_sign_convention(&h, p.input().unwrap(), 1e-9).unwrap();

    let q = Polyhedron::with_rep(&ctx, &h.to_dmatrix(), RepKind::H).unwrap();
    let v = q.representation(RepKind::V).unwrap();
    assert!(same_rows(&v, &RepMatrix::from_vertices(&hexagon).unwrap()));
}

#[test]
fn repeated_vertices_do_not_change_facets() {
    let ctx = NumericContext::new(Exact);
    let pts = dmatrix![
        1.0, 1.0;
        -1.0, 1.0;
        1.0, 1.0;
        -1.0, -1.0;
        1.0, -1.0;
        -1.0, -1.0
    ];
    let p = Polyhedron::from_vertices(&ctx, &pts).unwrap();
    assert!(same_rows(&p.representation(RepKind::H).unwrap(), &square_facets()));
}

#[test]
fn unit_cube_both_directions() {
    let ctx = float_ctx();
    let mut a = DMatrix::zeros(6, 3);
    let mut b = DVector::zeros(6);
    for i in 0..3 {
        a[(2 * i, i)] = 1.0;
        b[2 * i] = 1.0;
        a[(2 * i + 1, i)] = -1.0;
    }
    let mut p = Polyhedron::new(&ctx);
    p.set_hrep_split(&a, &b).unwrap();
    let v = p.representation(RepKind::V).unwrap();
    assert_eq!(v.nrows(), 8);
    let mut q = Polyhedron::new(&ctx);
    q.set(&v).unwrap();
    assert!(same_rows(
        &q.representation(RepKind::H).unwrap(),
        p.input().unwrap()
    ));
}

#[test]
fn structural_failure_keeps_previous_state() {
    let ctx = float_ctx();
    let mut p = Polyhedron::from_vertices(&ctx, &square_vertices()).unwrap();
    let before = p.hrep();

    let err = p.set_hrep(&dmatrix![1.0, f64::NAN, 0.0]).unwrap_err();
    assert!(err.is_structural());
    assert_eq!(p.hrep(), before);
    assert!(p.last_error().unwrap().contains("not finite"));

    let err = p.set_vrep(&dmatrix![0.5, 1.0, 1.0]).unwrap_err();
    assert_eq!(
        err,
        DdError::Structural(StructuralError::BadIndicator { row: 0, value: 0.5 })
    );
    let err = p.set_hrep(&DMatrix::zeros(0, 3)).unwrap_err();
    assert_eq!(err, DdError::Structural(StructuralError::NoRows));
    assert_eq!(p.hrep(), before);

    // the next successful attempt clears the message
    p.set_vrep(&RepMatrix::from_vertices(&square_vertices()).unwrap().to_dmatrix())
        .unwrap();
    assert!(p.last_error().is_none());
}

#[test]
fn conversion_failure_keeps_previous_state() {
    let ctx = float_ctx();
    let mut p = Polyhedron::from_vertices(&ctx, &square_vertices()).unwrap();
    let before = p.vrep();
    p.set_cfg(DdCfg {
        max_rays: Some(2),
        ..DdCfg::default()
    });
    let err = p.set(&square_facets()).unwrap_err();
    assert!(err.is_conversion());
    assert!(matches!(
        err,
        DdError::Conversion(ConversionError::RayLimit { limit: 2, .. })
    ));
    assert!(p.last_error().unwrap().contains("limit 2"));
    assert_eq!(p.vrep(), before);
    assert_eq!(p.input().unwrap().kind(), RepKind::V);
}

#[test]
fn row_orders_agree_on_the_result() {
    let ctx = NumericContext::new(Exact);
    let mut rng = StdRng::seed_from_u64(3);
    let pts = DMatrix::from_fn(10, 3, |_, _| rng.gen_range(-1.0..1.0));
    let reference = Polyhedron::from_vertices(&ctx, &pts).unwrap();
    let href = reference.representation(RepKind::H).unwrap();
    for order in [
        crate::dd::RowOrder::MaxIndex,
        crate::dd::RowOrder::LexMin,
        crate::dd::RowOrder::LexMax,
        crate::dd::RowOrder::Random { seed: 99 },
    ] {
        let mut p = Polyhedron::with_cfg(
            &ctx,
            DdCfg {
                row_order: order,
                ..DdCfg::default()
            },
        );
        p.set_vrep(&reference.vrep()).unwrap();
        assert!(same_rows(&p.representation(RepKind::H).unwrap(), &href), "{order:?}");
    }
}

#[test]
fn float_and_exact_agree_on_sphere_points() {
    let mut rng = StdRng::seed_from_u64(42);
    let pts = DMatrix::from_fn(12, 3, |_, _| rng.gen_range(-1.0..1.0));
    let pts = DMatrix::from_rows(
        &pts.row_iter()
            .map(|r| r.normalize())
            .collect::<Vec<_>>(),
    );
    let pf = Polyhedron::from_vertices(&float_ctx(), &pts).unwrap();
    let pe = Polyhedron::from_vertices(&NumericContext::new(Exact), &pts).unwrap();
    let hf = pf.representation(RepKind::H).unwrap();
    let he = pe.representation(RepKind::H).unwrap();
    // simplicial polytope with 12 vertices: 2·12 − 4 facets
    assert_eq!(he.nrows(), 20);
    assert!(same_rows(&hf, &he));
}

#[test]
fn polyhedra_share_one_context() {
    let ctx = float_ctx();
    let a = Polyhedron::new(&ctx);
    let b = Polyhedron::from_vertices(&ctx, &square_vertices()).unwrap();
    assert_eq!(ctx.users(), 2);
    drop(a);
    drop(b);
    assert_eq!(ctx.users(), 0);
    assert!(!ctx.is_initialized());
}

fn polygon(n: usize, radius: f64, phase: f64, cx: f64, cy: f64) -> DMatrix<f64> {
    DMatrix::from_fn(n, 2, |k, j| {
        let t = phase + std::f64::consts::TAU * k as f64 / n as f64;
        if j == 0 {
            cx + radius * t.cos()
        } else {
            cy + radius * t.sin()
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn polygon_round_trip(
        n in 3usize..12,
        radius in 0.5f64..5.0,
        phase in 0.0f64..6.28,
        cx in -3.0f64..3.0,
        cy in -3.0f64..3.0,
    ) {
        let ctx = float_ctx();
        let pts = polygon(n, radius, phase, cx, cy);
        let p = Polyhedron::from_vertices(&ctx, &pts).unwrap();
        let h = p.representation(RepKind::H).unwrap();
        prop_assert_eq!(h.nrows(), n);
        prop_assert!(check_sign_convention(&h, p.input().unwrap(), 1e-9).is_ok());

        let q = Polyhedron::with_rep(&ctx, &h.to_dmatrix(), RepKind::H).unwrap();
        let v = q.representation(RepKind::V).unwrap();
        prop_assert!(same_rows(&v, p.input().unwrap()));
    }
}
