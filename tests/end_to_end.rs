//! End-to-end scenarios against the public `cminor::run` entry point.
//!
//! Table-driven: one macro expands a list of `name: source, expected;`
//! entries into individually-named `#[test]` functions via `paste`.

use cminor::CError;
use pretty_assertions::assert_eq;

macro_rules! run_ok_tests {
    ($($name:ident: $code:expr, $expected:expr;)*) => {
        $(
            paste::paste! {
                #[test]
                fn [< $name _returns_expected_status >]() {
                    match cminor::run($code) {
                        Ok(status) => assert_eq!(status, $expected),
                        Err(err) => panic!("expected successful run, got error: {err}"),
                    }
                }
            }
        )*
    }
}

run_ok_tests! {
    factorial_recursion: r"
        int fact(int n) { if (n <= 1) return 1; return n * fact(n - 1); }
        int main() { return fact(5); }
    ", 120;

    pointer_update_through_dereference: r"
        int main() { int x = 3; int* p = &x; *p = *p + 4; return x; }
    ", 7;

    struct_field_access_via_dot_and_arrow: r"
        struct S { int a; };
        int main() {
            struct S z;
            z.a = 2;
            struct S* p = &z;
            p->a = p->a + 40;
            return z.a;
        }
    ", 42;

    switch_falls_through_without_break: r"
        int main() {
            int i = 1, s = 0;
            switch (i) {
                case 1: s += 1;
                case 2: s += 10; break;
                case 3: s += 100;
            }
            return s;
        }
    ", 11;

    for_loop_break_stops_before_increment_side_effect: r"
        int main() {
            int i, s = 0;
            for (i = 0; i < 10; i++) {
                if (i == 5) break;
                s += i;
            }
            return s;
        }
    ", 10;

    nested_scope_does_not_leak_a_shadowed_binding: r"
        int main() {
            int x = 1;
            { int x = 2; }
            return x;
        }
    ", 1;

    address_of_then_dereference_round_trips: r"
        int main() {
            int x = 17;
            int* p = &x;
            return (*p == x);
        }
    ", 1;

    self_assignment_is_a_no_op: r"
        int main() {
            int x = 9;
            x = x;
            return x;
        }
    ", 9;

    pre_increment_then_pre_decrement_restores_value: r"
        int main() {
            int x = 5;
            ++x;
            --x;
            return x;
        }
    ", 5;

    do_while_runs_body_exactly_once_when_condition_is_false: r"
        int main() {
            int count = 0;
            do { count++; } while (0);
            return count;
        }
    ", 1;

    call_arguments_evaluate_left_to_right: r"
        int order;
        int mark(int which) { order = order * 10 + which; return which; }
        int main() {
            order = 0;
            int total = mark(1) + mark(2);
            return order;
        }
    ", 12;

    logical_and_short_circuits_the_right_operand: r"
        int touched;
        int mark_touched() { touched = 1; return 1; }
        int main() {
            touched = 0;
            int x = 0;
            int result = (x != 0) && (mark_touched() != 0);
            return touched;
        }
    ", 0;

    malloc_returns_contiguous_addresses_reachable_by_pointer_arithmetic: r"
        #include <stdlib.h>
        int main() {
            int* p = malloc(3);
            *p = 10;
            *(p + 1) = 20;
            *(p + 2) = 30;
            return *p + *(p + 1) + *(p + 2);
        }
    ", 60;

    math_library_functions_are_callable: r"
        #include <math.h>
        int main() { return (int) sqrt(144.0); }
    ", 12;
}

#[test]
fn printf_formats_and_returns_printed_character_count() {
    let source = r#"
        #include <stdio.h>
        int main() { return printf("%d-%d", 4, 2); }
    "#;
    match cminor::run(source) {
        Ok(status) => assert_eq!(status, 3),
        Err(err) => panic!("expected successful run, got error: {err}"),
    }
}

macro_rules! run_fault_tests {
    ($($name:ident: $code:expr;)*) => {
        $(
            paste::paste! {
                #[test]
                fn [< $name _faults >]() {
                    match cminor::run($code) {
                        Err(CError::Runtime { .. }) => {}
                        other => panic!("expected a runtime fault, got {other:?}"),
                    }
                }
            }
        )*
    }
}

run_fault_tests! {
    division_by_zero: r"
        int main() { int x = 1; int y = 0; return x / y; }
    ";
    missing_main: "int helper() { return 1; }";
}
