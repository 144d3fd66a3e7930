//! Cross-module properties of the geometry kernel

#[cfg(test)]
mod inverse_tests {
    use crate::affine::{AffineTransform, inverse_affine};
    use crate::error::GeometryError;
    use crate::matrix::{Matrix, mat_mult};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TOLERANCE: f64 = 1e-4;

    fn random_affine(rng: &mut StdRng) -> [f64; 16] {
        let mut m = [0.0; 16];
        for idx in [0, 1, 2, 4, 5, 6, 8, 9, 10] {
            m[idx] = rng.gen_range(-10.0..10.0);
        }
        for idx in [3, 7, 11] {
            m[idx] = rng.gen_range(-1000.0..1000.0);
        }
        m[15] = 1.0;
        m
    }

    fn assert_identity(product: &[f64]) {
        let id = Matrix::identity(4);
        for (idx, (actual, want)) in product.iter().zip(id.as_slice()).enumerate() {
            assert!(
                (actual - want).abs() < TOLERANCE,
                "entry {idx}: expected {want}, got {actual}"
            );
        }
    }

    #[test]
    fn test_inverse_round_trip_random() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut checked = 0;

        while checked < 500 {
            let a = random_affine(&mut rng);
            let inv = match inverse_affine(&a) {
                Ok(inv) => inv,
                Err(GeometryError::SingularMatrix { .. }) => continue,
                Err(e) => panic!("unexpected error: {e}"),
            };

            // Ill-conditioned draws amplify rounding far beyond the tolerance.
            let det = AffineTransform::new(a).determinant();
            if det.abs() < 0.1 {
                continue;
            }

            assert_identity(&mat_mult(&a, 4, &inv, 4).unwrap());
            assert_identity(&mat_mult(&inv, 4, &a, 4).unwrap());
            checked += 1;
        }
    }

    #[test]
    fn test_inverse_of_inverse() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = AffineTransform::new(random_affine(&mut rng));
        let back = a.inverse().unwrap().inverse().unwrap();
        for (actual, want) in back.as_array().iter().zip(a.as_array()) {
            assert!((actual - want).abs() < TOLERANCE * want.abs().max(1.0));
        }
    }

    #[test]
    fn test_singular_never_yields_non_finite() {
        // Rank-deficient linear blocks: the third row is zeroed.
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let mut m = random_affine(&mut rng);
            m[8] = 0.0;
            m[9] = 0.0;
            m[10] = 0.0;
            match inverse_affine(&m) {
                Err(GeometryError::SingularMatrix { determinant }) => {
                    assert_eq!(determinant, 0.0)
                }
                Ok(inv) => panic!("zero row inverted to {inv:?}"),
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod ratio_tests {
    use crate::affine::AffineTransform;
    use crate::gcd::gcd;
    use crate::matrix::mat_mult;
    use crate::ratio::{ratio, reduce_ratio};

    #[test]
    fn test_ratio_through_composed_identity() {
        let id = AffineTransform::identity();
        let composed = mat_mult(id.as_array(), 4, id.as_array(), 4).unwrap();

        for (w, h, rw, rh) in [
            (1920, 1080, 16, 9),
            (1280, 720, 16, 9),
            (1024, 768, 4, 3),
            (3840, 2160, 16, 9),
        ] {
            let r = ratio(w, h, &composed).unwrap();
            assert_eq!((r.width, r.height), (rw, rh), "ratio of {w}x{h}");
            assert_eq!((r.raw_width, r.raw_height), (w, h));
        }
    }

    #[test]
    fn test_reduced_ratio_is_lowest_terms() {
        let transforms = [
            AffineTransform::identity(),
            AffineTransform::from_scale_translate(0.75, 1.25, -10.0, 33.0),
            AffineTransform::rotation(0.3),
        ];
        for transform in &transforms {
            for (w, h) in [(1, 1), (7, 3), (640, 480), (1000, 1), (4096, 2160)] {
                let r = reduce_ratio(w, h, transform).unwrap();
                if r.raw_width == 0 && r.raw_height == 0 {
                    continue;
                }
                assert_eq!(gcd(r.width, r.height), 1, "{r:?}");
                assert_eq!(r.width * r.raw_height, r.height * r.raw_width, "{r:?}");
            }
        }
    }

    #[test]
    fn test_inverse_restores_ratio() {
        let m = AffineTransform::from_scale_translate(0.5, 2.0, 960.0, -40.0);
        let round_trip = m.then(&m.inverse().unwrap()).unwrap();
        let r = reduce_ratio(1920, 1080, &round_trip).unwrap();
        assert_eq!(r.as_tuple(), (16, 9, 1920, 1080));
    }
}
