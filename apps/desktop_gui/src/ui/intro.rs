//! Keyframed opacity animations for the opening sequence.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// A keyframe track. Keyframes are `(offset, value)` pairs with offsets
/// ascending from 0 to 1; easing applies per segment. Outside
/// `[delay, delay + duration)` the track sits at `rest`.
#[derive(Debug, Clone, Copy)]
pub struct Animation {
    pub delay: Duration,
    pub duration: Duration,
    pub keyframes: &'static [(f32, f32)],
    pub easing: Easing,
    pub rest: f32,
}

impl Animation {
    pub fn sample(&self, elapsed: Duration) -> f32 {
        let Some(local) = elapsed.checked_sub(self.delay) else {
            return self.rest;
        };
        if local >= self.duration || self.keyframes.is_empty() {
            return self.rest;
        }
        let progress = local.as_secs_f32() / self.duration.as_secs_f32();

        let mut previous = self.keyframes[0];
        for &(offset, value) in self.keyframes {
            if progress <= offset {
                let span = offset - previous.0;
                if span <= f32::EPSILON {
                    return value;
                }
                let eased = self.easing.apply((progress - previous.0) / span);
                return previous.1 + (value - previous.1) * eased;
            }
            previous = (offset, value);
        }
        previous.1
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay + self.duration
    }
}

pub const INTRO_TEXT: Animation = Animation {
    delay: Duration::from_secs(1),
    duration: Duration::from_secs(6),
    keyframes: &[(0.0, 0.0), (0.2, 1.0), (0.9, 1.0), (1.0, 0.0)],
    easing: Easing::EaseOut,
    rest: 0.0,
};

pub const LOGO_ENTER: Animation = Animation {
    delay: Duration::ZERO,
    duration: Duration::from_secs(10),
    keyframes: &[(0.0, 0.0), (0.7, 0.0), (1.0, 1.0)],
    easing: Easing::EaseOut,
    rest: 1.0,
};

pub const SELECTOR_FADE_IN: Animation = Animation {
    delay: Duration::ZERO,
    duration: Duration::from_secs(10),
    keyframes: &[(0.0, 0.0), (0.7, 0.0), (1.0, 1.0)],
    easing: Easing::EaseOut,
    rest: 1.0,
};

pub const FADE_IN: Animation = Animation {
    delay: Duration::ZERO,
    duration: Duration::from_secs(1),
    keyframes: &[(0.0, 0.0), (1.0, 1.0)],
    easing: Easing::EaseIn,
    rest: 1.0,
};

pub const FADE_OUT: Animation = Animation {
    delay: Duration::ZERO,
    duration: Duration::from_secs(1),
    keyframes: &[(0.0, 1.0), (1.0, 0.0)],
    easing: Easing::EaseIn,
    rest: 0.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroFrame {
    pub text_opacity: f32,
    /// Drives both opacity and vertical scale of the logo.
    pub logo: f32,
    pub selector_opacity: f32,
}

pub fn frame_at(elapsed: Duration) -> IntroFrame {
    IntroFrame {
        text_opacity: INTRO_TEXT.sample(elapsed),
        logo: LOGO_ENTER.sample(elapsed),
        selector_opacity: SELECTOR_FADE_IN.sample(elapsed),
    }
}

pub fn is_settled(elapsed: Duration) -> bool {
    [INTRO_TEXT, LOGO_ENTER, SELECTOR_FADE_IN]
        .iter()
        .all(|animation| animation.is_finished(elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn intro_text_is_hidden_before_and_after() {
        assert_eq!(INTRO_TEXT.sample(Duration::ZERO), 0.0);
        assert_eq!(INTRO_TEXT.sample(secs(0.99)), 0.0);
        assert_eq!(INTRO_TEXT.sample(secs(7.0)), 0.0);
        assert_eq!(INTRO_TEXT.sample(secs(30.0)), 0.0);
    }

    #[test]
    fn intro_text_holds_between_twenty_and_ninety_percent() {
        // 1s delay + 20% of 6s
        assert!(close(INTRO_TEXT.sample(secs(2.2)), 1.0));
        assert!(close(INTRO_TEXT.sample(secs(4.0)), 1.0));
        assert!(close(INTRO_TEXT.sample(secs(6.4)), 1.0));
        let rising = INTRO_TEXT.sample(secs(1.6));
        assert!(rising > 0.0 && rising < 1.0);
        let falling = INTRO_TEXT.sample(secs(6.7));
        assert!(falling > 0.0 && falling < 1.0);
    }

    #[test]
    fn logo_and_selector_lag_until_seventy_percent() {
        assert_eq!(LOGO_ENTER.sample(secs(3.0)), 0.0);
        assert_eq!(SELECTOR_FADE_IN.sample(secs(6.9)), 0.0);
        let mid = LOGO_ENTER.sample(secs(8.5));
        assert!(mid > 0.5 && mid < 1.0, "ease-out is past halfway at the midpoint: {mid}");
        assert_eq!(LOGO_ENTER.sample(secs(10.0)), 1.0);
        assert_eq!(SELECTOR_FADE_IN.sample(secs(60.0)), 1.0);
    }

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn fades_are_one_second() {
        assert!(close(FADE_IN.sample(secs(0.5)), 0.125));
        assert!(close(FADE_OUT.sample(secs(0.5)), 0.875));
        assert_eq!(FADE_OUT.sample(secs(1.0)), 0.0);
    }

    #[test]
    fn sequence_settles_after_ten_seconds() {
        assert!(!is_settled(secs(9.9)));
        assert!(is_settled(secs(10.0)));
        let frame = frame_at(secs(12.0));
        assert_eq!(
            frame,
            IntroFrame {
                text_opacity: 0.0,
                logo: 1.0,
                selector_opacity: 1.0,
            }
        );
    }
}
