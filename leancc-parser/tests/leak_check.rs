//! Every abandoned parse must release all of its partially built nodes.
//!
//! This file is its own test binary so the counting allocator only sees this test.

use leancc_parser::lexer::Lexer;
use leancc_parser::parser::Parser;
use leancc_source::Source;
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

struct CountingAlloc;

thread_local! {
    /// Live allocations made by the current thread.
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let _ = LIVE.try_with(|live| live.set(live.get() + 1));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        let _ = LIVE.try_with(|live| live.set(live.get() - 1));
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn live() -> isize {
    LIVE.with(Cell::get)
}

const PROGRAM: &str = "int limit = 100;
int step(int x, int k) { return x + k; }
int main(int n) {
    int a = 1;
    while (a < n) {
        a = step(a, 2 * (n - 1)) + limit / 3;
        if (a >= 50) { int b = a; a = b - 1; } else { a = a + 1; }
    }
    if (a == 3) { return a; } else { return 0; }
}";

/// Parses `text` and drops everything, returning whether the parse succeeded and how many allocations leaked.
fn parse_and_drop(text: &str) -> (bool, isize) {
    let before = live();
    let ok = {
        let source = Source::new(text);
        let result = Parser::new(&source).parse_program();
        result.is_ok()
    };
    (ok, live() - before)
}

#[test]
fn truncated_programs_fail_without_leaking() {
    // warm up lazily initialized runtime state
    assert!(parse_and_drop(PROGRAM).0);

    let (ok, leaked) = parse_and_drop(PROGRAM);
    assert!(ok);
    assert_eq!(leaked, 0);

    let boundaries: Vec<usize> = Lexer::new(PROGRAM).map(|lexeme| lexeme.span.end).collect();
    assert!(boundaries.len() > 100);

    // The first two declarations are complete on their own, so only prefixes ending inside `main` must fail.
    let main_start = PROGRAM.find("int main").unwrap();
    for &end in boundaries.iter().filter(|&&end| end > main_start) {
        let text = &PROGRAM[..end];
        let (ok, leaked) = parse_and_drop(text);
        if end < PROGRAM.len() {
            assert!(!ok, "prefix parsed successfully: {:?}", text);
        }
        assert_eq!(leaked, 0, "leaked {} allocations parsing {:?}", leaked, text);
    }

    for &end in boundaries.iter().filter(|&&end| end <= main_start) {
        let (_, leaked) = parse_and_drop(&PROGRAM[..end]);
        assert_eq!(leaked, 0);
    }

    // errors raised deep inside nested constructs
    for text in &[
        "int main() { while (1) { if (1) { return f(1, 2, undeclared); } } }",
        "int main() { int a = 1; if (a) { int a; int a; } }",
        "int f(int a) { return a; } int f(int b) { return b; }",
        "int main() { return (1 + (2 * (3 - @))); }",
        "int main() { int x = 1 + 2 * 3 = 4; }",
        "int main() { return 99999999999999999999; }",
    ] {
        let (ok, leaked) = parse_and_drop(text);
        assert!(!ok, "{}", text);
        assert_eq!(leaked, 0, "leaked {} allocations parsing {:?}", leaked, text);
    }
}
