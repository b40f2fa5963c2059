//! Assertion macros.
//!
//! Every macro reports against [`Session::global`](crate::Session::global)
//! unless it is given a session first: `mu_assert_int_eq!(in &session; a, b)`.
//! Operands are evaluated exactly once. Fatal (`mu_fassert*`) forms finalize
//! the run and exit the current process on failure.

#[doc(hidden)]
#[macro_export]
macro_rules! __mu_site {
    () => {
        $crate::Site::new(file!(), line!())
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mu_op {
    (==) => {
        $crate::CmpOp::Eq
    };
    (!=) => {
        $crate::CmpOp::Ne
    };
    (<) => {
        $crate::CmpOp::Lt
    };
    (<=) => {
        $crate::CmpOp::Le
    };
    (>) => {
        $crate::CmpOp::Gt
    };
    (>=) => {
        $crate::CmpOp::Ge
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mu_ptr_op {
    (==) => {
        $crate::CmpOp::Eq
    };
    (!=) => {
        $crate::CmpOp::Ne
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mu_exprs {
    ($a:expr, $b:expr) => {
        $crate::Exprs {
            lhs: stringify!($a),
            rhs: stringify!($b),
        }
    };
}

/// Start a named run on the process-wide session.
#[macro_export]
macro_rules! mu_init {
    ($name:expr) => {
        $crate::Session::global().begin($name)
    };
}

/// Finalize the process-wide run and return its [`RunStatus`](crate::RunStatus).
#[macro_export]
macro_rules! mu_final {
    () => {
        $crate::Session::global().finalize()
    };
}

/// Finalize the process-wide run and exit with its status.
#[macro_export]
macro_rules! mu_exit {
    () => {
        $crate::Session::global().terminate()
    };
}

/// Run a block in an isolated worker of the process-wide session.
#[macro_export]
macro_rules! mu_run {
    ($body:block) => {
        $crate::Session::global().run_isolated(|| $body)
    };
    ($body:expr) => {
        $crate::Session::global().run_isolated($body)
    };
}

#[macro_export]
macro_rules! mu_assert_msg {
    (in $session:expr; $cond:expr, $($fmt:tt)+) => {
        ($session).check(
            $cond,
            $crate::__mu_site!(),
            $crate::Severity::Continue,
            format_args!($($fmt)+),
        )
    };
    ($cond:expr, $($fmt:tt)+) => {
        $crate::mu_assert_msg!(in $crate::Session::global(); $cond, $($fmt)+)
    };
}

#[macro_export]
macro_rules! mu_fassert_msg {
    (in $session:expr; $cond:expr, $($fmt:tt)+) => {
        ($session).check(
            $cond,
            $crate::__mu_site!(),
            $crate::Severity::Fatal,
            format_args!($($fmt)+),
        )
    };
    ($cond:expr, $($fmt:tt)+) => {
        $crate::mu_fassert_msg!(in $crate::Session::global(); $cond, $($fmt)+)
    };
}

/// `'<expr>' failed` on a false condition.
#[macro_export]
macro_rules! mu_assert {
    (in $session:expr; $cond:expr) => {
        $crate::mu_assert_msg!(in $session; $cond, "'{}' failed", stringify!($cond))
    };
    ($cond:expr) => {
        $crate::mu_assert_msg!($cond, "'{}' failed", stringify!($cond))
    };
}

#[macro_export]
macro_rules! mu_fassert {
    (in $session:expr; $cond:expr) => {
        $crate::mu_fassert_msg!(in $session; $cond, "'{}' failed", stringify!($cond))
    };
    ($cond:expr) => {
        $crate::mu_fassert_msg!($cond, "'{}' failed", stringify!($cond))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mu_ord {
    ($ty:ty, $severity:ident, $session:expr, $a:expr, $op:tt, $b:expr) => {
        $crate::compare::check_ord::<$ty>(
            $session,
            $crate::__mu_site!(),
            $crate::Severity::$severity,
            $crate::__mu_op!($op),
            $crate::__mu_exprs!($a, $b),
            ($a) as $ty,
            ($b) as $ty,
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mu_str {
    ($severity:ident, $session:expr, $a:expr, $op:tt, $b:expr) => {
        $crate::compare::check_str(
            $session,
            $crate::__mu_site!(),
            $crate::Severity::$severity,
            $crate::__mu_op!($op),
            $crate::__mu_exprs!($a, $b),
            $crate::compare::text($a),
            $crate::compare::text($b),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mu_ptr {
    ($severity:ident, $session:expr, $a:expr, $op:tt, $b:expr) => {
        $crate::compare::check_ptr(
            $session,
            $crate::__mu_site!(),
            $crate::Severity::$severity,
            $crate::__mu_ptr_op!($op),
            $crate::__mu_exprs!($a, $b),
            $crate::compare::address($a),
            $crate::compare::address($b),
        )
    };
}

/// Signed comparison: `mu_assert_int!(a, <, b)`. Operands are cast to `i64`.
#[macro_export]
macro_rules! mu_assert_int {
    (in $session:expr; $a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ord!(i64, Continue, $session, $a, $op, $b)
    };
    ($a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ord!(i64, Continue, $crate::Session::global(), $a, $op, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_int {
    (in $session:expr; $a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ord!(i64, Fatal, $session, $a, $op, $b)
    };
    ($a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ord!(i64, Fatal, $crate::Session::global(), $a, $op, $b)
    };
}

/// Unsigned comparison. Operands are cast to `u64`.
#[macro_export]
macro_rules! mu_assert_uint {
    (in $session:expr; $a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ord!(u64, Continue, $session, $a, $op, $b)
    };
    ($a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ord!(u64, Continue, $crate::Session::global(), $a, $op, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_uint {
    (in $session:expr; $a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ord!(u64, Fatal, $session, $a, $op, $b)
    };
    ($a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ord!(u64, Fatal, $crate::Session::global(), $a, $op, $b)
    };
}

/// String comparison over `&str`, `&String` or `Option<&str>` (`None` is null).
#[macro_export]
macro_rules! mu_assert_str {
    (in $session:expr; $a:expr, $op:tt, $b:expr) => {
        $crate::__mu_str!(Continue, $session, $a, $op, $b)
    };
    ($a:expr, $op:tt, $b:expr) => {
        $crate::__mu_str!(Continue, $crate::Session::global(), $a, $op, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_str {
    (in $session:expr; $a:expr, $op:tt, $b:expr) => {
        $crate::__mu_str!(Fatal, $session, $a, $op, $b)
    };
    ($a:expr, $op:tt, $b:expr) => {
        $crate::__mu_str!(Fatal, $crate::Session::global(), $a, $op, $b)
    };
}

/// Pointer identity, `==` or `!=` only.
#[macro_export]
macro_rules! mu_assert_ptr {
    (in $session:expr; $a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ptr!(Continue, $session, $a, $op, $b)
    };
    ($a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ptr!(Continue, $crate::Session::global(), $a, $op, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_ptr {
    (in $session:expr; $a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ptr!(Fatal, $session, $a, $op, $b)
    };
    ($a:expr, $op:tt, $b:expr) => {
        $crate::__mu_ptr!(Fatal, $crate::Session::global(), $a, $op, $b)
    };
}

// Operator shorthands.

#[macro_export]
macro_rules! mu_assert_int_eq {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_int!(in $session; $a, ==, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_int!($a, ==, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_int_ne {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_int!(in $session; $a, !=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_int!($a, !=, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_int_lt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_int!(in $session; $a, <, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_int!($a, <, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_int_le {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_int!(in $session; $a, <=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_int!($a, <=, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_int_gt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_int!(in $session; $a, >, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_int!($a, >, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_int_ge {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_int!(in $session; $a, >=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_int!($a, >=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_int_eq {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_int!(in $session; $a, ==, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_int!($a, ==, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_int_ne {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_int!(in $session; $a, !=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_int!($a, !=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_int_lt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_int!(in $session; $a, <, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_int!($a, <, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_int_le {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_int!(in $session; $a, <=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_int!($a, <=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_int_gt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_int!(in $session; $a, >, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_int!($a, >, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_int_ge {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_int!(in $session; $a, >=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_int!($a, >=, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_uint_eq {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_uint!(in $session; $a, ==, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_uint!($a, ==, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_uint_ne {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_uint!(in $session; $a, !=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_uint!($a, !=, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_uint_lt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_uint!(in $session; $a, <, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_uint!($a, <, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_uint_le {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_uint!(in $session; $a, <=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_uint!($a, <=, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_uint_gt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_uint!(in $session; $a, >, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_uint!($a, >, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_uint_ge {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_uint!(in $session; $a, >=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_uint!($a, >=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_uint_eq {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_uint!(in $session; $a, ==, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_uint!($a, ==, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_uint_ne {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_uint!(in $session; $a, !=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_uint!($a, !=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_uint_lt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_uint!(in $session; $a, <, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_uint!($a, <, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_uint_le {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_uint!(in $session; $a, <=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_uint!($a, <=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_uint_gt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_uint!(in $session; $a, >, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_uint!($a, >, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_uint_ge {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_uint!(in $session; $a, >=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_uint!($a, >=, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_str_eq {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_str!(in $session; $a, ==, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_str!($a, ==, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_str_ne {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_str!(in $session; $a, !=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_str!($a, !=, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_str_lt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_str!(in $session; $a, <, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_str!($a, <, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_str_le {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_str!(in $session; $a, <=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_str!($a, <=, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_str_gt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_str!(in $session; $a, >, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_str!($a, >, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_str_ge {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_str!(in $session; $a, >=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_str!($a, >=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_str_eq {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_str!(in $session; $a, ==, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_str!($a, ==, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_str_ne {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_str!(in $session; $a, !=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_str!($a, !=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_str_lt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_str!(in $session; $a, <, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_str!($a, <, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_str_le {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_str!(in $session; $a, <=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_str!($a, <=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_str_gt {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_str!(in $session; $a, >, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_str!($a, >, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_str_ge {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_str!(in $session; $a, >=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_str!($a, >=, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_ptr_eq {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_ptr!(in $session; $a, ==, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_ptr!($a, ==, $b)
    };
}

#[macro_export]
macro_rules! mu_assert_ptr_ne {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_assert_ptr!(in $session; $a, !=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_assert_ptr!($a, !=, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_ptr_eq {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_ptr!(in $session; $a, ==, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_ptr!($a, ==, $b)
    };
}

#[macro_export]
macro_rules! mu_fassert_ptr_ne {
    (in $session:expr; $a:expr, $b:expr) => {
        $crate::mu_fassert_ptr!(in $session; $a, !=, $b)
    };
    ($a:expr, $b:expr) => {
        $crate::mu_fassert_ptr!($a, !=, $b)
    };
}
