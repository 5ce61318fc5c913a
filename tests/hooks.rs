use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use oneof::{
    Alternative, ConstructionError, Operation, Policy, Variant,
    hooks::{Hooks, ValuelessEvent},
};

#[derive(Clone)]
struct Flaky {
    fail: bool,
}

// SAFETY: No operation is declared trivial.
unsafe impl Alternative for Flaky {
    const COPY_CONSTRUCT: Policy = Policy::NonTrivial;
    const COPY_ASSIGN: Policy = Policy::NonTrivial;

    fn copy_construct(&self) -> Result<Self, ConstructionError> {
        if self.fail {
            Err(ConstructionError::new::<Self>(Operation::CopyConstruct).with_reason("flaky"))
        } else {
            Ok(self.clone())
        }
    }

    fn copy_assign(&mut self, source: &Self) -> Result<(), ConstructionError> {
        self.fail = source.fail;
        Ok(())
    }
}

#[derive(Default)]
struct Collect {
    count: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl Collect {
    fn record(&self, event: &ValuelessEvent<'_>) {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(event.to_string());
    }
}

// Hooks are process-global, so everything runs in a single test.
#[test]
fn test_hooks_observe_valueless_transitions() {
    let collect = Arc::new(Collect::default());
    let hook = collect.clone();
    Hooks::new()
        .valueless_hook(move |event: &ValuelessEvent<'_>| hook.record(event))
        .install()
        .unwrap();

    let error = Hooks::new().install().unwrap_err();
    assert_eq!(error.to_string(), "hooks are already installed globally");
    assert!(error.0.is_empty());

    // Failed emplace.
    let mut value: Variant<(u8, Flaky)> = Variant::new(1_u8);
    let _ = value.try_emplace_with::<Flaky, _, _, _>(|| Err("refused"));
    assert_eq!(collect.count.load(Ordering::SeqCst), 1);

    // Failed copy in `Clone::clone`, which cannot report it otherwise.
    let source: Variant<(u8, Flaky)> = Variant::new(Flaky { fail: true });
    let copy = source.clone();
    assert!(copy.valueless_by_exception());
    assert_eq!(collect.count.load(Ordering::SeqCst), 2);

    // Failed copy assignment into a different alternative.
    let mut target: Variant<(u8, Flaky)> = Variant::new(2_u8);
    target.clone_from(&source);
    assert!(target.valueless_by_exception());
    assert_eq!(collect.count.load(Ordering::SeqCst), 3);

    // Successful operations are not reported.
    let healthy: Variant<(u8, Flaky)> = Variant::new(Flaky { fail: false });
    target.clone_from(&healthy);
    let _ = healthy.clone();
    assert_eq!(collect.count.load(Ordering::SeqCst), 3);

    {
        let messages = collect.messages.lock().unwrap();
        assert_eq!(
            messages[0],
            format!(
                "in-place construction of alternative 1 (`{}`) failed: refused",
                core::any::type_name::<Flaky>()
            )
        );
        assert!(messages[1].starts_with("copy construction of alternative 1"));
        assert!(messages[1].ends_with(": flaky"));
    }

    let previous = Hooks::new().replace();
    assert_eq!(previous.map(|hooks| hooks.len()), Some(1));
    let _ = source.clone();
    assert_eq!(collect.count.load(Ordering::SeqCst), 3);

    assert!(Hooks::uninstall().is_some_and(|hooks| hooks.is_empty()));
    assert!(Hooks::uninstall().is_none());
}
