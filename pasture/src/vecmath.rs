/// contains some very simple helpers for moving around the pasture

pub type Vector = [f64; 2];

/// calculates the length of a vector
pub fn len(inp: Vector) -> f64 {
    ((inp[0] * inp[0]) + (inp[1] * inp[1])).sqrt()
}

/// turns the input into a vector that has length 1.
/// the zero vector has no direction, it stays zero
pub fn norm(mut inp: Vector) -> Vector {
    let len = len(inp);
    if len == 0. {
        return inp;
    }
    inp[0] /= len;
    inp[1] /= len;
    inp
}

/// componet-wise addition
pub fn add(mut a: Vector, b: Vector) -> Vector {
    a[0] += b[0];
    a[1] += b[1];
    a
}

/// componet-wise subtraction, a - b
pub fn sub(mut a: Vector, b: Vector) -> Vector {
    a[0] -= b[0];
    a[1] -= b[1];
    a
}

/// scales a vector by a scalar
pub fn scale(mut a: Vector, scalar: f64) -> Vector {
    a[0] *= scalar;
    a[1] *= scalar;
    a
}

/// distance between two points
pub fn dist(a: Vector, b: Vector) -> f64 {
    len(sub(a, b))
}

/// halfway between two points
pub fn midpoint(a: Vector, b: Vector) -> Vector {
    add(a, scale(sub(b, a), 0.5))
}

/// keeps a corner inside `[0, bounds - edge]` on both axes
pub fn clamp_corner(p: Vector, edge: f64, bounds: Vector) -> Vector {
    [
        p[0].clamp(0., (bounds[0] - edge).max(0.)),
        p[1].clamp(0., (bounds[1] - edge).max(0.)),
    ]
}

#[test]
fn norm_keeps_direction() {
    let n = norm([3., 4.]);
    assert!((n[0] - 0.6).abs() < 1e-12);
    assert!((n[1] - 0.8).abs() < 1e-12);
    assert_eq!(norm([0., 0.]), [0., 0.]);
}

#[test]
fn clamping_keeps_the_square_inside() {
    assert_eq!(clamp_corner([-3., 700.], 30., [600., 600.]), [0., 570.]);
    assert_eq!(clamp_corner([12., 40.], 30., [600., 600.]), [12., 40.]);
}
