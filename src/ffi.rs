use std::ffi::{c_char, c_double, c_int, CStr};
use std::panic::catch_unwind;

use tracing::debug;

use crate::equation::{Equation, Side};
use crate::operator::Operator;

/// Shorthand for reading an operator from a C `char *`
unsafe fn operator_from_ptr(op: *const c_char) -> Option<Operator>
{
    if op.is_null()
    {
        return None;
    }
    let c_str = CStr::from_ptr(op);
    String::from_utf8_lossy(c_str.to_bytes()).parse().ok()
}

/// Evaluates `a op b` for an operator given as a nul-terminated C `char *`,
/// writing the result to `out`. The returned C `int` value indicates the following:
///
/// - `1`: The result was written to `out`
/// - `-1`: The operator was not recognised, the division was by zero, or a pointer was `NULL`
///
/// # Safety
/// `op` must be `NULL` or point to a nul-terminated string, and `out` must be
/// `NULL` or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn searchcalc_evaluate(op: *const c_char, a: c_double, b: c_double, out: *mut c_double) -> c_int
{
    let res = catch_unwind(|| {
        if out.is_null()
        {
            return -1;
        }
        let Some(op) = (unsafe { operator_from_ptr(op) }) else { return -1 };

        match op.apply(a, b)
        {
            Ok(val) => {
                unsafe { *out = val };
                1
            },
            Err(e) => {
                debug!(error = %e, "evaluation failed across ffi");
                -1
            },
        }
    });

    res.unwrap_or(-1)
}

/// Solves `x op known = target` (`side == 0`) or `known op x = target`
/// (`side == 1`) over the default search domain, writing the unknown to `out`.
/// The returned C `int` value indicates the following:
///
/// - `1`: A value was written to `out`
/// - `0`: The equation was undefined everywhere in the domain; `out` is untouched
/// - `-1`: The operator or side was not recognised, or a pointer was `NULL`
///
/// # Safety
/// `op` must be `NULL` or point to a nul-terminated string, and `out` must be
/// `NULL` or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn searchcalc_solve(target: c_double, op: *const c_char, known: c_double, side: c_int, out: *mut c_double) -> c_int
{
    let res = catch_unwind(|| {
        if out.is_null()
        {
            return -1;
        }
        let Some(op) = (unsafe { operator_from_ptr(op) }) else { return -1 };
        let side = match side
        {
            0 => Side::Left,
            1 => Side::Right,
            _ => return -1,
        };

        match Equation::new(target, op, known, side).solve()
        {
            Some(x) => {
                unsafe { *out = x };
                1
            },
            None => 0,
        }
    });

    res.unwrap_or(-1)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::ffi::CString;
    use std::ptr::{null, null_mut};

    #[test]
    fn evaluates_through_c_strings()
    {
        let op = CString::new("^").unwrap();
        let mut out = 0.0;

        let status = unsafe { searchcalc_evaluate(op.as_ptr(), 2.0, 3.0, &mut out) };

        assert_eq!(status, 1);
        assert_eq!(out, 8.0);
    }

    #[test]
    fn evaluate_signals_failures()
    {
        let mut out = 0.0;
        let div = CString::new("/").unwrap();
        let bad = CString::new("%").unwrap();

        assert_eq!(unsafe { searchcalc_evaluate(div.as_ptr(), 1.0, 0.0, &mut out) }, -1);
        assert_eq!(unsafe { searchcalc_evaluate(bad.as_ptr(), 1.0, 2.0, &mut out) }, -1);
        assert_eq!(unsafe { searchcalc_evaluate(null(), 1.0, 2.0, &mut out) }, -1);
        assert_eq!(unsafe { searchcalc_evaluate(div.as_ptr(), 1.0, 2.0, null_mut()) }, -1);
        assert_eq!(out, 0.0);
    }

    #[test]
    fn solves_through_c_strings()
    {
        let op = CString::new("/").unwrap();
        let mut out = 0.0;

        assert_eq!(unsafe { searchcalc_solve(4.0, op.as_ptr(), 20.0, 1, &mut out) }, 1);
        assert_eq!(out, 5.0);

        out = -1.0;
        assert_eq!(unsafe { searchcalc_solve(1.0, op.as_ptr(), 0.0, 0, &mut out) }, 0);
        assert_eq!(out, -1.0);

        assert_eq!(unsafe { searchcalc_solve(1.0, op.as_ptr(), 0.0, 2, &mut out) }, -1);
    }
}
