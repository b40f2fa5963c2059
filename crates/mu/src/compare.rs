//! Typed comparisons.
//!
//! Every typed assertion macro lands in [`check`]: operands are evaluated once
//! by the macro, compared with an [`Operand`] impl, and rendered into
//! `'<a><op><b>' failed: <a>=<value>, <b>=<value>` on failure.

use std::cmp::Ordering;
use std::fmt;

use crate::assert::{Severity, Site};
use crate::session::Session;

/// Relational operator of a typed assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Whether the operator holds for an ordering. `None` means the operands
    /// are incomparable, which satisfies no operator.
    #[must_use]
    pub const fn holds(self, ord: Option<Ordering>) -> bool {
        let Some(ord) = ord else {
            return false;
        };
        match self {
            Self::Eq => ord.is_eq(),
            Self::Ne => ord.is_ne(),
            Self::Lt => ord.is_lt(),
            Self::Le => ord.is_le(),
            Self::Gt => ord.is_gt(),
            Self::Ge => ord.is_ge(),
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A value a typed assertion can compare and print.
pub trait Operand {
    /// Operands that pass every operator without being compared.
    fn identical(&self, _other: &Self) -> bool {
        false
    }
    fn compare(&self, other: &Self) -> Option<Ordering>;
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl Operand for i64 {
    fn compare(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Operand for u64 {
    fn compare(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Two nulls pass any operator; a null against a string fails every
/// operator; two strings compare bytewise.
impl Operand for Option<&str> {
    fn identical(&self, other: &Self) -> bool {
        self.is_none() && other.is_none()
    }

    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Some(a), Some(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            _ => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.unwrap_or("(null)"))
    }
}

impl Operand for *const () {
    fn compare(&self, other: &Self) -> Option<Ordering> {
        Some(self.addr().cmp(&other.addr()))
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", *self)
    }
}

struct Rendered<'a, T>(&'a T);

impl<T: Operand> fmt::Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f)
    }
}

/// Source text of a comparison, as produced by `stringify!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exprs {
    pub lhs: &'static str,
    pub rhs: &'static str,
}

/// Compare `lhs op rhs` and report through [`Session::check`].
pub fn check<T: Operand>(
    session: &Session,
    site: Site,
    severity: Severity,
    op: CmpOp,
    exprs: Exprs,
    lhs: T,
    rhs: T,
) -> bool {
    let passed = lhs.identical(&rhs) || op.holds(lhs.compare(&rhs));
    session.check(
        passed,
        site,
        severity,
        format_args!(
            "'{}{op}{}' failed: {}={}, {}={}",
            exprs.lhs,
            exprs.rhs,
            exprs.lhs,
            Rendered(&lhs),
            exprs.rhs,
            Rendered(&rhs),
        ),
    )
}

/// Signed or unsigned integer comparison.
pub fn check_ord<T: Operand + Ord>(
    session: &Session,
    site: Site,
    severity: Severity,
    op: CmpOp,
    exprs: Exprs,
    lhs: T,
    rhs: T,
) -> bool {
    check(session, site, severity, op, exprs, lhs, rhs)
}

/// String comparison; `None` stands for a null string and is never read.
pub fn check_str(
    session: &Session,
    site: Site,
    severity: Severity,
    op: CmpOp,
    exprs: Exprs,
    lhs: Option<&str>,
    rhs: Option<&str>,
) -> bool {
    check(session, site, severity, op, exprs, lhs, rhs)
}

/// Pointer identity. Only `==` and `!=` are meaningful here.
pub fn check_ptr(
    session: &Session,
    site: Site,
    severity: Severity,
    op: CmpOp,
    exprs: Exprs,
    lhs: *const (),
    rhs: *const (),
) -> bool {
    debug_assert!(matches!(op, CmpOp::Eq | CmpOp::Ne));
    check(session, site, severity, op, exprs, lhs, rhs)
}

/// Conversion of string-like assertion operands.
pub trait TextOperand<'a> {
    fn as_text(self) -> Option<&'a str>;
}

impl<'a> TextOperand<'a> for &'a str {
    fn as_text(self) -> Option<&'a str> {
        Some(self)
    }
}

impl<'a> TextOperand<'a> for &'a String {
    fn as_text(self) -> Option<&'a str> {
        Some(self.as_str())
    }
}

impl<'a> TextOperand<'a> for Option<&'a str> {
    fn as_text(self) -> Option<&'a str> {
        self
    }
}

#[doc(hidden)]
pub fn text<'a, T: TextOperand<'a>>(value: T) -> Option<&'a str> {
    value.as_text()
}

/// Conversion of pointer-like assertion operands to a thin address.
pub trait Address {
    fn address(self) -> *const ();
}

impl<T: ?Sized> Address for *const T {
    fn address(self) -> *const () {
        self.cast::<()>()
    }
}

impl<T: ?Sized> Address for *mut T {
    fn address(self) -> *const () {
        self.cast_const().cast::<()>()
    }
}

impl<T: ?Sized> Address for &T {
    fn address(self) -> *const () {
        std::ptr::from_ref(self).cast::<()>()
    }
}

impl<T: ?Sized> Address for &mut T {
    fn address(self) -> *const () {
        std::ptr::from_mut(self).cast_const().cast::<()>()
    }
}

impl<T: ?Sized> Address for Option<&T> {
    fn address(self) -> *const () {
        self.map_or(std::ptr::null(), |r| std::ptr::from_ref(r).cast::<()>())
    }
}

#[doc(hidden)]
pub fn address<P: Address>(value: P) -> *const () {
    value.address()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: Site = Site::new("cmp.rs", 10);

    fn run<T: Operand>(op: CmpOp, lhs: T, rhs: T) -> (bool, String) {
        let session = Session::buffered();
        let exprs = Exprs { lhs: "a", rhs: "b" };
        let passed = check(&session, SITE, Severity::Continue, op, exprs, lhs, rhs);
        (passed, session.take_output())
    }

    #[test]
    fn operator_table() {
        use CmpOp::*;
        let cases = [
            (Eq, [false, true, false]),
            (Ne, [true, false, true]),
            (Lt, [true, false, false]),
            (Le, [true, true, false]),
            (Gt, [false, false, true]),
            (Ge, [false, true, true]),
        ];
        let ords = [Ordering::Less, Ordering::Equal, Ordering::Greater];
        for (op, expect) in cases {
            for (ord, want) in ords.iter().zip(expect) {
                assert_eq!(op.holds(Some(*ord)), want, "{op} {ord:?}");
            }
            assert!(!op.holds(None), "{op} incomparable");
        }
    }

    #[test]
    fn signed_failure_message() {
        let (passed, out) = run(CmpOp::Eq, 2_i64, -3_i64);
        assert!(!passed);
        assert_eq!(out, "cmp.rs:10: 'a==b' failed: a=2, b=-3\n");
    }

    #[test]
    fn unsigned_uses_full_range() {
        let (passed, out) = run(CmpOp::Lt, u64::MAX, 1_u64);
        assert!(!passed);
        assert_eq!(
            out,
            format!("cmp.rs:10: 'a<b' failed: a={}, b=1\n", u64::MAX)
        );
        assert!(run(CmpOp::Gt, u64::MAX, 1_u64).0);
    }

    #[test]
    fn string_equality_and_ordering() {
        assert!(run(CmpOp::Eq, Some("ab"), Some("ab")).0);
        assert!(run(CmpOp::Lt, Some("ab"), Some("abc")).0);
        assert!(run(CmpOp::Gt, Some("b"), Some("abc")).0);
        let (passed, out) = run(CmpOp::Ne, Some("x"), Some("x"));
        assert!(!passed);
        assert_eq!(out, "cmp.rs:10: 'a!=b' failed: a=\"x\", b=\"x\"\n");
    }

    #[test]
    fn null_strings() {
        for op in [CmpOp::Eq, CmpOp::Ne, CmpOp::Lt, CmpOp::Le, CmpOp::Gt, CmpOp::Ge] {
            assert!(run(op, None::<&str>, None).0, "null {op} null");
        }

        let (passed, out) = run(CmpOp::Eq, Some("ab"), None);
        assert!(!passed);
        assert_eq!(out, "cmp.rs:10: 'a==b' failed: a=\"ab\", b=\"(null)\"\n");
        for op in [CmpOp::Eq, CmpOp::Ne, CmpOp::Lt, CmpOp::Le, CmpOp::Gt, CmpOp::Ge] {
            assert!(!run(op, None, Some("ab")).0, "null {op} string");
            assert!(!run(op, Some("ab"), None).0, "string {op} null");
        }
    }

    #[test]
    fn pointers_compare_by_address() {
        let values = [1_u8, 2];
        let first = address(&values[0]);
        let second = address(&values[1]);
        assert!(run(CmpOp::Eq, first, address(&values[0])).0);
        assert!(run(CmpOp::Ne, first, second).0);
        let (passed, out) = run(CmpOp::Eq, first, std::ptr::null());
        assert!(!passed);
        assert!(out.starts_with(&format!("cmp.rs:10: 'a==b' failed: a={first:p}, b=0x0")));
    }

    #[test]
    fn address_conversions_agree() {
        let mut value = 5_u32;
        let raw: *const u32 = &value;
        assert_eq!(address(raw), address(&value));
        assert_eq!(address(Some(&value)), raw.cast::<()>());
        assert!(address(None::<&u32>).is_null());
        let mut_raw: *mut u32 = &mut value;
        assert_eq!(address(mut_raw), raw.cast::<()>());
        let slice: &[u8] = &[1, 2, 3];
        assert_eq!(address(slice), slice.as_ptr().cast::<()>());
    }

    #[test]
    fn text_conversions() {
        let owned = String::from("owned");
        assert_eq!(text("lit"), Some("lit"));
        assert_eq!(text(&owned), Some("owned"));
        assert_eq!(text(None::<&str>), None);
    }
}
