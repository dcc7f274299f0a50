//! Combining policies for range trees.

use std::marker::PhantomData;
use std::ops::Add;

/// An associative binary operation over `Value`.
///
/// Implementations must satisfy `combine(a, combine(b, c)) == combine(combine(a, b), c)`.
/// Commutativity is not required: trees always pass the left operand first.
/// No neutral element is needed because absent operands are skipped, never substituted.
pub trait Combine {
    type Value: Clone;

    fn combine(left: &Self::Value, right: &Self::Value) -> Self::Value;
}

/// Sum of elements via `Add`.
#[derive(Clone, Copy, Debug)]
pub struct Sum<T>(PhantomData<fn() -> T>);

impl<T> Combine for Sum<T>
where
    T: Clone + Add<Output = T>,
{
    type Value = T;

    #[inline(always)]
    fn combine(left: &T, right: &T) -> T {
        left.clone() + right.clone()
    }
}

/// Minimum; ties keep the left operand.
#[derive(Clone, Copy, Debug)]
pub struct Min<T>(PhantomData<fn() -> T>);

impl<T> Combine for Min<T>
where
    T: Clone + PartialOrd,
{
    type Value = T;

    #[inline(always)]
    fn combine(left: &T, right: &T) -> T {
        if right < left { right.clone() } else { left.clone() }
    }
}

/// Maximum; ties keep the left operand.
#[derive(Clone, Copy, Debug)]
pub struct Max<T>(PhantomData<fn() -> T>);

impl<T> Combine for Max<T>
where
    T: Clone + PartialOrd,
{
    type Value = T;

    #[inline(always)]
    fn combine(left: &T, right: &T) -> T {
        if right > left { right.clone() } else { left.clone() }
    }
}

/// Ordered string concatenation.
#[derive(Clone, Copy, Debug)]
pub enum Concat {}

impl Combine for Concat {
    type Value = String;

    fn combine(left: &String, right: &String) -> String {
        let mut out = String::with_capacity(left.len() + right.len());
        out.push_str(left);
        out.push_str(right);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_preserves_operand_order() {
        let ab = Concat::combine(&"a".to_string(), &"b".to_string());
        assert_eq!(ab, "ab");
        assert_eq!(Concat::combine(&"b".to_string(), &"a".to_string()), "ba");
    }

    #[derive(Clone, Debug)]
    struct Tagged(i32, &'static str);

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            self.0.partial_cmp(&other.0)
        }
    }

    #[test]
    fn min_and_max_keep_left_on_ties() {
        let left = Tagged(3, "left");
        let right = Tagged(3, "right");
        assert_eq!(Min::<Tagged>::combine(&left, &right).1, "left");
        assert_eq!(Max::<Tagged>::combine(&left, &right).1, "left");

        assert_eq!(Min::<i32>::combine(&7, &-2), -2);
        assert_eq!(Max::<i32>::combine(&7, &-2), 7);
    }

    #[test]
    fn sum_adds() {
        assert_eq!(Sum::<i64>::combine(&40, &2), 42);
        assert_eq!(Sum::<f64>::combine(&0.5, &0.25), 0.75);
    }
}
