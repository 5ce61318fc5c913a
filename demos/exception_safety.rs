//! How containers behave when an alternative fails to copy.
//!
//! This example demonstrates:
//! 1. Declaring the lifecycle policies of a type with `Alternative`
//! 2. A failed copy into a container that held another alternative
//! 3. The temporary copy that keeps the old value when the move cannot fail
//! 4. Observing valueless transitions through hooks

use oneof::{
    Alternative, ConstructionError, Operation, Policy,
    hooks::{Hooks, ValuelessEvent},
    prelude::*,
};

/// A buffer whose copy can fail, like a copy that needs to allocate from a
/// bounded pool.
#[derive(Debug)]
struct Buffer {
    bytes: Vec<u8>,
    pool_exhausted: bool,
}

// SAFETY: No operation is declared trivial.
unsafe impl Alternative for Buffer {
    const COPY_CONSTRUCT: Policy = Policy::NonTrivial;
    const MOVE_CONSTRUCT: Policy = Policy::NonTrivial;
    const COPY_ASSIGN: Policy = Policy::NonTrivial;
    const MOVE_ASSIGN: Policy = Policy::NonTrivial;
    const MOVE_CONSTRUCT_NOFAIL: bool = true;

    fn copy_construct(&self) -> Result<Self, ConstructionError> {
        if self.pool_exhausted {
            return Err(ConstructionError::new::<Self>(Operation::CopyConstruct)
                .with_reason("buffer pool exhausted"));
        }
        Ok(Self {
            bytes: self.bytes.clone(),
            pool_exhausted: false,
        })
    }

    fn move_construct(&mut self) -> Result<Self, ConstructionError> {
        Ok(Self {
            bytes: core::mem::take(&mut self.bytes),
            pool_exhausted: self.pool_exhausted,
        })
    }

    fn copy_assign(&mut self, source: &Self) -> Result<(), ConstructionError> {
        self.bytes.clone_from(&source.bytes);
        Ok(())
    }

    fn move_assign(&mut self, source: &mut Self) -> Result<(), ConstructionError> {
        self.bytes = core::mem::take(&mut source.bytes);
        Ok(())
    }
}

/// Like `Buffer`, but without a move: moving copies, so it can fail too.
#[derive(Clone, Debug)]
struct Frame(Vec<u8>);

// SAFETY: No operation is declared trivial.
unsafe impl Alternative for Frame {
    const COPY_CONSTRUCT: Policy = Policy::NonTrivial;
    const COPY_ASSIGN: Policy = Policy::NonTrivial;

    fn copy_construct(&self) -> Result<Self, ConstructionError> {
        Err(ConstructionError::new::<Self>(Operation::CopyConstruct).with_reason("frame is pinned"))
    }

    fn copy_assign(&mut self, source: &Self) -> Result<(), ConstructionError> {
        self.0.clone_from(&source.0);
        Ok(())
    }
}

type Payload = Variant<(u16, Buffer, Frame)>;

fn main() {
    println!("=== Exception Safety ===\n");

    Hooks::new()
        .valueless_hook(|event: &ValuelessEvent<'_>| println!("  [hook] {event}"))
        .install()
        .expect("failed to install hooks");

    println!("capabilities: {:?}\n", Payload::CAPABILITIES);

    // Example 1: `Buffer` moves without failing, so the copy is made into a
    // temporary first; a failure leaves the target untouched.
    let exhausted = Payload::new(Buffer {
        bytes: vec![1, 2, 3],
        pool_exhausted: true,
    });
    let mut target = Payload::new(7_u16);
    let result = target.try_clone_from(&exhausted);
    println!("copying an exhausted buffer: {result:?}");
    println!("target afterwards: {target:?}\n");

    // Example 2: `Frame` cannot be moved without copying, so the old value is
    // dropped first; a failure leaves the target valueless.
    let pinned = Payload::new(Frame(vec![9]));
    let result = target.try_clone_from(&pinned);
    println!("copying a pinned frame: {result:?}");
    println!(
        "target afterwards: {target:?} (valueless: {})\n",
        target.valueless_by_exception()
    );

    // Example 3: visiting a valueless container is an error, not a crash.
    struct Show;
    impl<T: core::fmt::Debug> Visitor<(&T,)> for Show {
        type Output = String;

        fn visit(self, (value,): (&T,)) -> String {
            format!("{value:?}")
        }
    }
    println!("visiting it: {:?}", target.visit(Show));

    // Recover by emplacing a new value.
    target.emplace(1_u16);
    println!("after emplace: {:?}", target.visit(Show));
}
