//! Out-of-range index mapping for border extrapolation.

/// Border extrapolation scheme for filters and padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Border {
    /// Mirror including the edge pixel: `fedcba|abcdefgh|hgfedcb`.
    Reflect,
    /// Mirror excluding the edge pixel: `gfedcb|abcdefgh|gfedcba`.
    Reflect101,
}

impl Border {
    /// Maps a possibly out-of-range coordinate onto `0..len`.
    ///
    /// Both schemes are periodic, so offsets wider than `len` keep mirroring.
    /// `len` must be non-zero.
    #[inline]
    pub(crate) fn map(self, i: isize, len: usize) -> usize {
        debug_assert!(len > 0);
        let n = len as isize;
        match self {
            Border::Reflect => {
                let period = 2 * n;
                let m = i.rem_euclid(period);
                if m < n {
                    m as usize
                } else {
                    (period - 1 - m) as usize
                }
            }
            Border::Reflect101 => {
                if n == 1 {
                    return 0;
                }
                let period = 2 * n - 2;
                let m = i.rem_euclid(period);
                if m < n {
                    m as usize
                } else {
                    (period - m) as usize
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Border;

    fn mapped(border: Border, range: std::ops::Range<isize>, len: usize) -> Vec<usize> {
        range.map(|i| border.map(i, len)).collect()
    }

    #[test]
    fn reflect_repeats_edge_pixel() {
        assert_eq!(mapped(Border::Reflect, -3..7, 4), vec![2, 1, 0, 0, 1, 2, 3, 3, 2, 1]);
    }

    #[test]
    fn reflect101_skips_edge_pixel() {
        assert_eq!(
            mapped(Border::Reflect101, -3..7, 4),
            vec![3, 2, 1, 0, 1, 2, 3, 2, 1, 0]
        );
    }

    #[test]
    fn reflect_keeps_mirroring_past_the_image() {
        // len 2: ... 1 0 | 0 1 | 1 0 0 1 ...
        assert_eq!(mapped(Border::Reflect, -4..6, 2), vec![0, 1, 1, 0, 0, 1, 1, 0, 0, 1]);
    }

    #[test]
    fn single_pixel_axis_maps_to_zero() {
        for i in -5..5 {
            assert_eq!(Border::Reflect.map(i, 1), 0);
            assert_eq!(Border::Reflect101.map(i, 1), 0);
        }
    }
}
