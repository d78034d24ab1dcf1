//! Convert a square between representations and print both forms.
//!
//! Usage:
//!   cargo run -p polydd --example square_roundtrip
//!   cargo run -p polydd --example square_roundtrip -- exact

use polydd::prelude::*;

fn main() {
    let exact = std::env::args().nth(1).as_deref() == Some("exact");
    let vertices = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0]);
    if exact {
        show(&NumericContext::new(Exact), &vertices);
    } else {
        show(&NumericContext::new(Float::default()), &vertices);
    }
}

fn show<K: Kernel>(ctx: &NumericContext<K>, vertices: &DMatrix<f64>) {
    let p = match Polyhedron::from_vertices(ctx, vertices) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("conversion failed: {e}");
            return;
        }
    };
    let (a, b) = p.hrep_split();
    println!("kernel: {}", ctx.kernel().name());
    for i in 0..a.nrows() {
        println!("  {:>6.3} x + {:>6.3} y <= {:.3}", a[(i, 0)], a[(i, 1)], b[i]);
    }
    let mut back = Polyhedron::new(ctx);
    if let Err(e) = back.set_hrep_split(&a, &b) {
        eprintln!("back-conversion failed: {e}");
        return;
    }
    let (v, t) = back.vrep_split();
    for i in 0..v.nrows() {
        let what = if t[i] == 1.0 { "point" } else { "ray" };
        println!("  {what} ({:.3}, {:.3})", v[(i, 0)], v[(i, 1)]);
    }
}
