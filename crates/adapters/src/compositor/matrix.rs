use super::parse::FilterOp;

/// Affine RGB transform: three rows of `[r, g, b, offset]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [[f32; 4]; 3]);

const IDENTITY: ColorMatrix = ColorMatrix([
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
]);

impl ColorMatrix {
    /// Matrix for a colour function; `None` for blur.
    pub fn for_op(op: FilterOp) -> Option<Self> {
        let matrix = match op {
            FilterOp::Grayscale(amount) => grayscale(amount),
            FilterOp::Sepia(amount) => sepia(amount),
            FilterOp::Saturate(amount) => saturate(amount),
            FilterOp::HueRotate(degrees) => hue_rotate(degrees),
            FilterOp::Brightness(amount) => linear(amount, 0.0),
            FilterOp::Contrast(amount) => linear(amount, 0.5 - 0.5 * amount),
            FilterOp::Blur(_) => return None,
        };
        Some(matrix)
    }

    pub fn is_identity(&self) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(IDENTITY.0.iter().flatten())
            .all(|(value, expected)| (value - expected).abs() < 1e-6)
    }

    /// Applies the transform to a normalised colour and clamps to `[0, 1]`.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let [r, g, b] = rgb;
        self.0
            .map(|row| (row[0] * r + row[1] * g + row[2] * b + row[3]).clamp(0.0, 1.0))
    }

    pub fn flattened(&self) -> [f32; 12] {
        let mut out = [0.0; 12];
        for (index, value) in self.0.iter().flatten().enumerate() {
            out[index] = *value;
        }
        out
    }
}

fn linear(slope: f32, intercept: f32) -> ColorMatrix {
    ColorMatrix([
        [slope, 0.0, 0.0, intercept],
        [0.0, slope, 0.0, intercept],
        [0.0, 0.0, slope, intercept],
    ])
}

fn grayscale(amount: f32) -> ColorMatrix {
    let inv = 1.0 - amount.clamp(0.0, 1.0);
    ColorMatrix([
        [0.2126 + 0.7874 * inv, 0.7152 - 0.7152 * inv, 0.0722 - 0.0722 * inv, 0.0],
        [0.2126 - 0.2126 * inv, 0.7152 + 0.2848 * inv, 0.0722 - 0.0722 * inv, 0.0],
        [0.2126 - 0.2126 * inv, 0.7152 - 0.7152 * inv, 0.0722 + 0.9278 * inv, 0.0],
    ])
}

fn sepia(amount: f32) -> ColorMatrix {
    let inv = 1.0 - amount.clamp(0.0, 1.0);
    ColorMatrix([
        [0.393 + 0.607 * inv, 0.769 - 0.769 * inv, 0.189 - 0.189 * inv, 0.0],
        [0.349 - 0.349 * inv, 0.686 + 0.314 * inv, 0.168 - 0.168 * inv, 0.0],
        [0.272 - 0.272 * inv, 0.534 - 0.534 * inv, 0.131 + 0.869 * inv, 0.0],
    ])
}

fn saturate(amount: f32) -> ColorMatrix {
    let s = amount.max(0.0);
    ColorMatrix([
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s, 0.0],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s, 0.0],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s, 0.0],
    ])
}

fn hue_rotate(degrees: f32) -> ColorMatrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    ColorMatrix([
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
            0.0,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
            0.0,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
            0.0,
        ],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(left: [f32; 3], right: [f32; 3]) -> bool {
        left.iter()
            .zip(right.iter())
            .all(|(a, b)| (a - b).abs() < 1e-3)
    }

    #[test]
    fn neutral_amounts_are_identity() {
        for op in [
            FilterOp::Brightness(1.0),
            FilterOp::Contrast(1.0),
            FilterOp::Saturate(1.0),
            FilterOp::Grayscale(0.0),
            FilterOp::Sepia(0.0),
            FilterOp::HueRotate(0.0),
        ] {
            let matrix = ColorMatrix::for_op(op).expect("colour op");
            assert!(matrix.is_identity(), "{op:?} should be identity");
        }
        assert!(ColorMatrix::for_op(FilterOp::Blur(2.0)).is_none());
    }

    #[test]
    fn full_grayscale_equalises_channels() {
        let matrix = ColorMatrix::for_op(FilterOp::Grayscale(1.0)).expect("colour op");
        let [r, g, b] = matrix.apply([0.9, 0.2, 0.4]);
        assert!((r - g).abs() < 1e-5 && (g - b).abs() < 1e-5);
    }

    #[test]
    fn zero_contrast_is_mid_grey() {
        let matrix = ColorMatrix::for_op(FilterOp::Contrast(0.0)).expect("colour op");
        assert!(close(matrix.apply([0.1, 0.8, 1.0]), [0.5, 0.5, 0.5]));
    }

    #[test]
    fn brightness_scales_and_clamps() {
        let matrix = ColorMatrix::for_op(FilterOp::Brightness(1.5)).expect("colour op");
        assert!(close(matrix.apply([0.2, 0.5, 0.9]), [0.3, 0.75, 1.0]));
    }

    #[test]
    fn zero_saturation_keeps_luminance() {
        let matrix = ColorMatrix::for_op(FilterOp::Saturate(0.0)).expect("colour op");
        let [r, g, b] = matrix.apply([1.0, 0.0, 0.0]);
        assert!(close([r, g, b], [0.213, 0.213, 0.213]));
    }

    #[test]
    fn full_turn_hue_rotation_is_identity() {
        let matrix = ColorMatrix::for_op(FilterOp::HueRotate(360.0)).expect("colour op");
        assert!(close(matrix.apply([0.3, 0.6, 0.1]), [0.3, 0.6, 0.1]));
    }
}
