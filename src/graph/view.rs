use crate::graph::layout::Viewport;
use std::time::Duration;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 8.0;

/// Pan/zoom applied on top of simulation coordinates:
/// `screen = world * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub translate: [f32; 2],
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        translate: [0.0, 0.0],
        scale: 1.0,
    };

    pub fn world_to_screen(&self, world: [f32; 2]) -> [f32; 2] {
        [
            world[0] * self.scale + self.translate[0],
            world[1] * self.scale + self.translate[1],
        ]
    }

    pub fn screen_to_world(&self, screen: [f32; 2]) -> [f32; 2] {
        [
            (screen[0] - self.translate[0]) / self.scale,
            (screen[1] - self.translate[1]) / self.scale,
        ]
    }

    pub fn zoom_about(&mut self, pointer: [f32; 2], zoom_delta: f32) {
        let before = self.screen_to_world(pointer);
        self.scale = (self.scale * zoom_delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.world_to_screen(before);
        self.translate[0] += pointer[0] - after[0];
        self.translate[1] += pointer[1] - after[1];
    }

    pub fn pan(&mut self, delta: [f32; 2]) {
        self.translate[0] += delta[0];
        self.translate[1] += delta[1];
    }

    /// Same scale, translated so `world` sits at the viewport center.
    pub fn centered_on(&self, world: [f32; 2], viewport: Viewport) -> ViewTransform {
        let [cx, cy] = viewport.center();
        ViewTransform {
            translate: [cx - world[0] * self.scale, cy - world[1] * self.scale],
            scale: self.scale,
        }
    }

    fn lerp(&self, to: &ViewTransform, t: f32) -> ViewTransform {
        ViewTransform {
            translate: [
                self.translate[0] + (to.translate[0] - self.translate[0]) * t,
                self.translate[1] + (to.translate[1] - self.translate[1]) * t,
            ],
            scale: self.scale + (to.scale - self.scale) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    Focus,
    ResetView,
}

/// Timed interpolation between two transforms. Replacing a transition
/// simply drops the old value; nothing else refers to it.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransition {
    pub kind: TransitionKind,
    from: ViewTransform,
    to: ViewTransform,
    elapsed: Duration,
    duration: Duration,
}

impl ViewTransition {
    pub fn new(kind: TransitionKind, from: ViewTransform, to: ViewTransform, duration: Duration) -> Self {
        Self {
            kind,
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn target(&self) -> ViewTransform {
        self.to
    }

    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn current(&self) -> ViewTransform {
        self.from.lerp(&self.to, ease_cubic_in_out(self.progress()))
    }

    /// Advance and return the transform to apply this frame.
    pub fn advance(&mut self, dt: Duration) -> ViewTransform {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.current()
    }
}

fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_roundtrip_and_zoom_about_pointer() {
        let mut t = ViewTransform::default();
        let world = [8.0, -3.0];
        let screen = t.world_to_screen(world);
        assert_eq!(t.screen_to_world(screen), world);

        t.zoom_about([50.0, 50.0], 1.5);
        let screen2 = t.world_to_screen(world);
        assert!((screen2[0] - (-13.0)).abs() < 0.001);
        assert!((screen2[1] - (-29.5)).abs() < 0.001);
    }

    #[test]
    fn zoom_clamps_and_keeps_anchor() {
        let mut t = ViewTransform {
            translate: [37.0, -22.0],
            scale: 1.0,
        };
        let pointer = [211.0, 189.0];
        let anchor_world = t.screen_to_world(pointer);

        t.zoom_about(pointer, 100.0);
        assert_eq!(t.scale, MAX_ZOOM);
        let at_max = t.world_to_screen(anchor_world);
        assert!((at_max[0] - pointer[0]).abs() < 1e-3);
        assert!((at_max[1] - pointer[1]).abs() < 1e-3);

        t.zoom_about(pointer, 0.0001);
        assert_eq!(t.scale, MIN_ZOOM);
    }

    #[test]
    fn centered_on_puts_point_in_viewport_center() {
        let t = ViewTransform {
            translate: [5.0, 5.0],
            scale: 2.0,
        };
        let c = t.centered_on([100.0, 50.0], Viewport::new(400.0, 300.0));
        assert_eq!(c.world_to_screen([100.0, 50.0]), [200.0, 150.0]);
        assert_eq!(c.scale, 2.0);
    }

    #[test]
    fn transition_eases_to_target_and_finishes() {
        let to = ViewTransform {
            translate: [100.0, -40.0],
            scale: 1.0,
        };
        let mut tr = ViewTransition::new(
            TransitionKind::Focus,
            ViewTransform::IDENTITY,
            to,
            Duration::from_millis(750),
        );
        let mid = tr.advance(Duration::from_millis(375));
        assert!((mid.translate[0] - 50.0).abs() < 1e-3);
        assert!(!tr.is_finished());
        let end = tr.advance(Duration::from_millis(1_000));
        assert!(tr.is_finished());
        assert_eq!(end, to);
    }
}
