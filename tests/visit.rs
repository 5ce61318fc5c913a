use std::cell::RefCell;

use oneof::{error::ValuelessVisit, prelude::*};

trait Name {
    const NAME: &'static str;
}

impl Name for u8 {
    const NAME: &'static str = "u8";
}

impl Name for char {
    const NAME: &'static str = "char";
}

impl Name for String {
    const NAME: &'static str = "String";
}

impl Name for bool {
    const NAME: &'static str = "bool";
}

impl Name for f64 {
    const NAME: &'static str = "f64";
}

/// Records the alternatives it was called with.
struct Record<'a>(&'a RefCell<Vec<(&'static str, &'static str)>>);

impl<A: Name, B: Name> Visitor<(&A, &B)> for Record<'_> {
    type Output = ();

    fn visit(self, _: (&A, &B)) {
        self.0.borrow_mut().push((A::NAME, B::NAME));
    }
}

type Three = Variant<(u8, char, String)>;
type Two = Variant<(bool, f64)>;

fn threes() -> [Three; 3] {
    [
        Variant::new(1_u8),
        Variant::new('c'),
        Variant::new(String::from("s")),
    ]
}

fn twos() -> [Two; 2] {
    [Variant::new(true), Variant::new(0.5_f64)]
}

#[test]
fn test_two_containers_reach_every_combination_once() {
    let calls = RefCell::new(Vec::new());
    for a in &threes() {
        for b in &twos() {
            visit(Record(&calls), (a, b)).unwrap();
        }
    }
    let calls = calls.into_inner();
    assert_eq!(calls.len(), 6);
    let mut distinct = calls.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(distinct.len(), 6);
}

#[test]
fn test_fixed_discriminants_select_exact_pair() {
    let calls = RefCell::new(Vec::new());
    let a: Three = Variant::new('x');
    let b: Two = Variant::new(false);
    assert_eq!((a.index(), b.index()), (1, 0));
    visit(Record(&calls), (&a, &b)).unwrap();
    assert_eq!(calls.into_inner(), [("char", "bool")]);
}

struct Describe;

impl Visitor<()> for Describe {
    type Output = String;

    fn visit(self, (): ()) -> String {
        String::from("nothing")
    }
}

impl<A: Name, B: Name, C: Name, D: Name> Visitor<(&A, &mut B, &C, &D)> for Describe {
    type Output = String;

    fn visit(self, _: (&A, &mut B, &C, &D)) -> String {
        [A::NAME, B::NAME, C::NAME, D::NAME].join(",")
    }
}

#[test]
fn test_zero_and_four_containers() {
    assert_eq!(visit(Describe, ()), Ok(String::from("nothing")));

    let a: Three = Variant::new(String::new());
    let mut b: Two = Variant::new(1.0_f64);
    let c: Two = Variant::new(true);
    let d: Three = Variant::new(0_u8);
    assert_eq!(
        visit(Describe, (&a, &mut b, &c, &d)),
        Ok(String::from("String,f64,bool,u8"))
    );
}

/// Copies the first value into the second when both have the same type.
struct Assign;

impl<T: Clone> Visitor<(&T, &mut T)> for Assign {
    type Output = bool;

    fn visit(self, (source, target): (&T, &mut T)) -> bool {
        target.clone_from(source);
        true
    }
}

#[test]
fn test_mixed_shared_and_mutable_with_repeated_types() {
    let source: Variant<(String, String)> = Variant::from_index::<1>(String::from("new"));
    let mut target: Variant<(String, String)> = Variant::from_index::<0>(String::from("old"));

    assert_eq!(visit(Assign, (&source, &mut target)), Ok(true));
    assert_eq!(target.index(), 0);
    assert_eq!(target.get_at::<0>().map(String::as_str), Ok("new"));
}

struct Double;

impl Visitor<(&mut u8,)> for Double {
    type Output = ();

    fn visit(self, (value,): (&mut u8,)) {
        *value *= 2;
    }
}

impl Visitor<(&mut char,)> for Double {
    type Output = ();

    fn visit(self, (value,): (&mut char,)) {
        *value = value.to_ascii_uppercase();
    }
}

impl Visitor<(&mut String,)> for Double {
    type Output = ();

    fn visit(self, (value,): (&mut String,)) {
        *value = value.repeat(2);
    }
}

#[test]
fn test_visit_mut_modifies_live_alternative() {
    let mut values = threes();
    for value in &mut values {
        value.visit_mut(Double).unwrap();
    }
    assert_eq!(values[0].get::<u8, _>(), Ok(&2));
    assert_eq!(values[1].get::<char, _>(), Ok(&'C'));
    assert_eq!(values[2].get::<String, _>().map(String::as_str), Ok("ss"));
}

#[test]
fn test_valueless_container_is_not_visited() {
    let calls = RefCell::new(Vec::new());
    let a: Three = Variant::new(1_u8);
    let mut b: Two = Variant::new(true);
    let _ = b.try_emplace_with::<f64, _, _, _>(|| Err("no value"));

    let error = visit(Record(&calls), (&a, &b)).unwrap_err();
    assert_eq!(error.position(), 1);
    assert_eq!(
        error.to_string(),
        "cannot visit: the variant at position 1 is valueless"
    );
    assert!(calls.into_inner().is_empty());

    let error: ValuelessVisit = visit(Record(&RefCell::new(Vec::new())), (&b, &a)).unwrap_err();
    assert_eq!(error.position(), 0);
}
