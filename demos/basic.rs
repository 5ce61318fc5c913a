//! Basic introduction to the `oneof` container.
//!
//! This example demonstrates the fundamental concepts:
//! 1. Creating a `Variant` from one of its alternatives
//! 2. Inspecting and accessing the live alternative, by type and by index
//! 3. Replacing it with `emplace`, `set` and `set_converted`
//! 4. Comparing and formatting whole containers

use oneof::prelude::*;

/// A configuration value: unset, a number, or some text.
type Setting = Variant<(Monostate, i64, String)>;

fn describe(setting: &Setting) -> String {
    // `get_if` never fails: it returns `None` when another alternative is live.
    if let Some(number) = setting.get_if::<i64, _>() {
        return format!("number {number}");
    }
    match setting.get::<String, _>() {
        Ok(text) => format!("text {text:?}"),
        Err(error) => format!("not text ({error})"),
    }
}

fn main() {
    println!("=== Basic Usage ===\n");

    // Example 1: The default holds the default of the first alternative.
    let mut setting = Setting::default();
    println!("default: {setting:?}, index {}", setting.index());
    println!("{}", describe(&setting));
    println!();

    // Example 2: Replacing the live alternative.
    setting.emplace(42_i64);
    println!("after emplace: {setting:?} -> {}", describe(&setting));

    // `set` assigns in place when the same alternative is already live.
    setting.set(43_i64);
    println!("after set: {setting:?}");

    // `set_converted` picks the unique alternative with a `From` impl.
    setting.set_converted("verbose");
    println!("after set_converted: {setting:?} -> {}", describe(&setting));
    println!();

    // Example 3: Access by index always works, even for repeated types.
    let span: Variant<(u32, u32)> = Variant::from_index::<1>(80);
    println!("span holds alternative {} = {:?}", span.index(), span.get_at::<1>());
    println!();

    // Example 4: Comparisons order by index first, then by value.
    let mut settings = vec![
        Setting::new(String::from("b")),
        Setting::new(3_i64),
        Setting::default(),
        Setting::new(String::from("a")),
    ];
    settings.sort();
    println!("sorted: {settings:?}");
}
