pub use similar_asserts;

/// A position where two buffers disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mismatch<T> {
    pub index: usize,
    pub have: T,
    pub want: T,
}

impl<T> std::fmt::Display for Mismatch<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: have {} want {}", self.index, self.have, self.want)
    }
}

/// Element-wise comparison of two equally long buffers.
///
/// Trailing elements of the longer buffer are not compared.
pub fn mismatches<'a, T>(have: &'a [T], want: &'a [T]) -> impl Iterator<Item = Mismatch<T>> + 'a
where
    T: PartialEq + Copy,
{
    have.iter()
        .zip(want.iter())
        .enumerate()
        .filter(|(_, (have, want))| have != want)
        .map(|(index, (&have, &want))| Mismatch { index, have, want })
}

/// Labeled equality assertion printing a colored diff on failure.
///
/// ```
/// utils::diff::assert_eq!(have: vec![0, 1, 1], want: vec![0, 1, 1]);
/// ```
#[macro_export]
macro_rules! assert_eq {
    (
        $left_label:ident:
        $left:expr,
        $right_label:ident:
        $right:expr $(,)?
    ) => {{
        $crate::diff::similar_asserts::assert_eq!($left_label: $left, $right_label: $right);
    }};
    (
        $left_label:ident:
        $left:expr,
        $right_label:ident:
        $right:expr,
        $($arg:tt)*
    ) => {{
        $crate::diff::similar_asserts::assert_eq!(
            $left_label: $left, $right_label: $right, $($arg)*);
    }};
}

pub use assert_eq;

#[cfg(test)]
mod tests {
    #[test]
    fn reports_only_differing_positions() {
        let have = [0u32, 1, 2, 2, u32::MAX];
        let want = [0u32, 1, 1, 2, 3];
        let found: Vec<_> = super::mismatches(&have, &want).collect();
        crate::diff::assert_eq!(
            have: found,
            want: vec![
                super::Mismatch { index: 2, have: 2, want: 1 },
                super::Mismatch { index: 4, have: u32::MAX, want: 3 },
            ]
        );
        std::assert_eq!(found[0].to_string(), "[2]: have 2 want 1");
    }
}
