#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::ScreenShake;
    use crate::game::{PERFECT_SHAKE, SHAKE_DECAY};

    #[test]
    fn test_screen_shake_initialization() {
        let shake = ScreenShake::default();
        assert!(!shake.is_active());
        assert!(shake.magnitude.abs() < f64::EPSILON);
    }

    #[test]
    fn test_decay_is_geometric() {
        let mut shake = ScreenShake::default();
        shake.trigger(PERFECT_SHAKE);
        shake.decay();
        assert!((shake.magnitude - PERFECT_SHAKE * SHAKE_DECAY).abs() < 1e-9);
        shake.decay();
        assert!((shake.magnitude - PERFECT_SHAKE * SHAKE_DECAY * SHAKE_DECAY).abs() < 1e-9);
    }

    #[test]
    fn test_shake_comes_to_rest() {
        let mut shake = ScreenShake::default();
        shake.trigger(PERFECT_SHAKE);
        for _ in 0..100 {
            shake.decay();
        }
        assert!(!shake.is_active());
    }

    #[test]
    fn test_trigger_replaces_current_shake() {
        let mut shake = ScreenShake { magnitude: 3.0 };
        shake.trigger(PERFECT_SHAKE);
        assert!((shake.magnitude - PERFECT_SHAKE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jitter_stays_within_half_magnitude() {
        let mut rng = fastrand::Rng::with_seed(5);
        let shake = ScreenShake {
            magnitude: PERFECT_SHAKE,
        };
        for _ in 0..500 {
            let (dx, dy) = shake.jitter(&mut rng);
            assert!(dx.abs() <= PERFECT_SHAKE / 2.0);
            assert!(dy.abs() <= PERFECT_SHAKE / 2.0);
        }

        let still = ScreenShake::default();
        assert_eq!(still.jitter(&mut rng), (0.0, 0.0));
    }
}
