//! Visiting one or several containers at once.
//!
//! This example demonstrates:
//! 1. Writing a visitor that handles every alternative
//! 2. Visiting two containers together: the visitor receives both live
//!    alternatives, resolved with one jump per container
//! 3. Mixing shared and mutable containers in one visit

use oneof::prelude::*;

type Shape = Variant<(Circle, Rect)>;
type Scale = Variant<(u32, f64)>;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Circle {
    radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Rect {
    width: f64,
    height: f64,
}

trivial_alternative!(Circle, Rect);

trait Area {
    fn area(&self) -> f64;
}

impl Area for Circle {
    fn area(&self) -> f64 {
        core::f64::consts::PI * self.radius * self.radius
    }
}

impl Area for Rect {
    fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Example 1: one visitor impl, generic over the alternative.
struct AreaOf;

impl<S: Area> Visitor<(&S,)> for AreaOf {
    type Output = f64;

    fn visit(self, (shape,): (&S,)) -> f64 {
        shape.area()
    }
}

/// Example 2: the visitor sees the alternatives of both containers.
struct ScaledArea;

impl<S: Area, F: Copy + Into<f64>> Visitor<(&S, &F)> for ScaledArea {
    type Output = f64;

    fn visit(self, (shape, factor): (&S, &F)) -> f64 {
        let factor: f64 = (*factor).into();
        shape.area() * factor * factor
    }
}

/// Example 3: grow the shape in place, reading the factor from another
/// container.
struct Grow;

impl<F: Copy + Into<f64>> Visitor<(&mut Circle, &F)> for Grow {
    type Output = ();

    fn visit(self, (circle, factor): (&mut Circle, &F)) {
        circle.radius *= (*factor).into();
    }
}

impl<F: Copy + Into<f64>> Visitor<(&mut Rect, &F)> for Grow {
    type Output = ();

    fn visit(self, (rect, factor): (&mut Rect, &F)) {
        let factor: f64 = (*factor).into();
        rect.width *= factor;
        rect.height *= factor;
    }
}

fn main() -> Result<(), ValuelessVisit> {
    println!("=== Visiting ===\n");

    let mut shapes = [
        Shape::new(Circle { radius: 1.0 }),
        Shape::new(Rect {
            width: 2.0,
            height: 3.0,
        }),
    ];
    let scales = [Scale::new(2_u32), Scale::new(0.5_f64)];

    for shape in &shapes {
        println!("area of {shape:?}: {:.2}", shape.visit(AreaOf)?);
    }
    println!();

    for shape in &shapes {
        for scale in &scales {
            let area = visit(ScaledArea, (shape, scale))?;
            println!("{shape:?} scaled by {scale:?}: {area:.2}");
        }
    }
    println!();

    for shape in &mut shapes {
        visit(Grow, (shape, &scales[0]))?;
    }
    println!("grown: {shapes:?}");
    Ok(())
}
