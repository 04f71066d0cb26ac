//! Pan/zoom/drag state as pure transitions.
//!
//! `InteractionState::apply` takes the old state and an input event and
//! returns the new state; the caller re-renders afterwards.

use crate::layout::Point;
use serde::Serialize;

pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom multiplier per wheel notch
pub const ZOOM_STEP: f64 = 1.1;

/// Pan offset and vertical zoom applied on top of graph-space positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    pub pan: Point,
    /// Vertical time-zoom factor; horizontal positions are never zoomed.
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            pan: Point::ORIGIN,
            zoom: 1.0,
        }
    }
}

impl ViewState {
    pub fn to_screen(&self, graph: Point) -> Point {
        Point::new(graph.x + self.pan.x, graph.y * self.zoom + self.pan.y)
    }

    pub fn to_graph(&self, screen: Point) -> Point {
        Point::new(screen.x - self.pan.x, (screen.y - self.pan.y) / self.zoom)
    }

    /// Change the zoom while keeping the graph point under `anchor_y` fixed
    /// on screen.
    pub fn zoomed_at(self, zoom: f64, anchor_y: f64) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let graph_y = (anchor_y - self.pan.y) / self.zoom;
        Self {
            pan: Point::new(self.pan.x, anchor_y - graph_y * zoom),
            zoom,
        }
    }

    pub fn panned_by(self, dx: f64, dy: f64) -> Self {
        Self {
            pan: Point::new(self.pan.x + dx, self.pan.y + dy),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Input events at the model level
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    PointerDown { button: PointerButton, position: Point },
    PointerMove { position: Point },
    PointerUp,
    PointerLeave,
    TouchStart { position: Point, touches: usize },
    TouchMove { position: Point, touches: usize },
    TouchEnd,
    /// Scroll; with `zoom_modifier` the vertical delta zooms instead of panning
    Wheel { delta: Point, cursor: Point, zoom_modifier: bool },
}

/// Gesture in progress
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging { origin: Point, start_pan: Point },
    TouchPanning { origin: Point, start_pan: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InteractionState {
    pub view: ViewState,
    pub gesture: Gesture,
}

impl InteractionState {
    pub fn apply(self, event: InteractionEvent) -> Self {
        use InteractionEvent::*;

        match (self.gesture, event) {
            (Gesture::Idle, PointerDown { button: PointerButton::Primary, position }) => Self {
                gesture: Gesture::Dragging {
                    origin: position,
                    start_pan: self.view.pan,
                },
                ..self
            },
            (Gesture::Dragging { origin, start_pan }, PointerMove { position }) => {
                self.with_pan_from(start_pan, origin, position)
            }
            (Gesture::Dragging { .. }, PointerUp | PointerLeave) => self.idle(),

            (Gesture::Idle, TouchStart { position, touches: 1 }) => Self {
                gesture: Gesture::TouchPanning {
                    origin: position,
                    start_pan: self.view.pan,
                },
                ..self
            },
            (Gesture::TouchPanning { origin, start_pan }, TouchMove { position, touches: 1 }) => {
                self.with_pan_from(start_pan, origin, position)
            }
            (Gesture::TouchPanning { .. }, TouchEnd | TouchStart { .. } | TouchMove { .. }) => {
                self.idle()
            }

            (_, Wheel { delta, cursor, zoom_modifier }) => Self {
                view: self.wheel(delta, cursor, zoom_modifier),
                ..self
            },

            _ => self,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    fn idle(self) -> Self {
        Self {
            gesture: Gesture::Idle,
            ..self
        }
    }

    fn with_pan_from(self, start_pan: Point, origin: Point, position: Point) -> Self {
        Self {
            view: ViewState {
                pan: Point::new(
                    start_pan.x + (position.x - origin.x),
                    start_pan.y + (position.y - origin.y),
                ),
                ..self.view
            },
            ..self
        }
    }

    fn wheel(&self, delta: Point, cursor: Point, zoom_modifier: bool) -> ViewState {
        if !zoom_modifier {
            return self.view.panned_by(-delta.x, -delta.y);
        }
        if delta.y == 0.0 {
            return self.view;
        }
        let zoom = if delta.y < 0.0 {
            self.view.zoom * ZOOM_STEP
        } else {
            self.view.zoom / ZOOM_STEP
        };
        self.view.zoomed_at(zoom, cursor.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn press(button: PointerButton, x: f64, y: f64) -> InteractionEvent {
        InteractionEvent::PointerDown {
            button,
            position: p(x, y),
        }
    }

    fn zoom_wheel(dy: f64, cursor: Point) -> InteractionEvent {
        InteractionEvent::Wheel {
            delta: p(0.0, dy),
            cursor,
            zoom_modifier: true,
        }
    }

    fn move_to(x: f64, y: f64) -> InteractionEvent {
        InteractionEvent::PointerMove { position: p(x, y) }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn drag_pans_by_pointer_delta() {
        let state = InteractionState::default()
            .apply(press(PointerButton::Primary, 10.0, 10.0))
            .apply(move_to(25.0, 5.0));
        assert_eq!(state.view.pan, p(15.0, -5.0));
        assert!(matches!(state.gesture, Gesture::Dragging { .. }));

        let state = state
            .apply(move_to(30.0, 30.0))
            .apply(InteractionEvent::PointerUp);
        assert_eq!(state.view.pan, p(20.0, 20.0));
        assert!(state.is_idle());

        // moving after release does nothing
        let after = state.apply(move_to(0.0, 0.0));
        assert_eq!(after, state);
    }

    #[test]
    fn secondary_button_does_not_drag() {
        let state = InteractionState::default().apply(press(PointerButton::Secondary, 0.0, 0.0));
        assert!(state.is_idle());
    }

    #[test]
    fn pointer_leave_ends_drag() {
        let state = InteractionState::default()
            .apply(press(PointerButton::Primary, 0.0, 0.0))
            .apply(InteractionEvent::PointerLeave);
        assert!(state.is_idle());
    }

    #[test]
    fn single_touch_pans_and_multi_touch_cancels() {
        let state = InteractionState::default()
            .apply(InteractionEvent::TouchStart {
                position: p(0.0, 0.0),
                touches: 1,
            })
            .apply(InteractionEvent::TouchMove {
                position: p(0.0, 40.0),
                touches: 1,
            });
        assert_eq!(state.view.pan, p(0.0, 40.0));

        let state = state.apply(InteractionEvent::TouchMove {
            position: p(5.0, 5.0),
            touches: 2,
        });
        assert!(state.is_idle());
        assert_eq!(state.view.pan, p(0.0, 40.0));

        let ignored = InteractionState::default().apply(InteractionEvent::TouchStart {
            position: p(0.0, 0.0),
            touches: 2,
        });
        assert!(ignored.is_idle());
    }

    #[test]
    fn wheel_without_modifier_pans() {
        let state = InteractionState::default().apply(InteractionEvent::Wheel {
            delta: p(3.0, 50.0),
            cursor: p(0.0, 0.0),
            zoom_modifier: false,
        });
        assert_eq!(state.view.pan, p(-3.0, -50.0));
        assert_eq!(state.view.zoom, 1.0);
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let start = InteractionState {
            view: ViewState {
                pan: p(12.0, -80.0),
                zoom: 1.3,
            },
            gesture: Gesture::Idle,
        };
        let cursor = p(200.0, 310.0);
        let before = start.view.to_graph(cursor);

        let zoomed = start.apply(zoom_wheel(-1.0, cursor));
        assert_close(zoomed.view.zoom, 1.3 * ZOOM_STEP);
        assert_close(zoomed.view.to_screen(before).y, cursor.y);
        // horizontal pan is untouched by zoom
        assert_eq!(zoomed.view.pan.x, 12.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut state = InteractionState::default();
        for _ in 0..200 {
            state = state.apply(zoom_wheel(1.0, p(0.0, 100.0)));
        }
        assert_close(state.view.zoom, MIN_ZOOM);
        for _ in 0..200 {
            state = state.apply(zoom_wheel(-1.0, p(0.0, 100.0)));
        }
        assert_close(state.view.zoom, MAX_ZOOM);
    }

    #[test]
    fn screen_and_graph_round_trip() {
        let view = ViewState {
            pan: p(5.0, 7.0),
            zoom: 2.0,
        };
        let g = p(100.0, 40.0);
        assert_eq!(view.to_screen(g), p(105.0, 87.0));
        assert_eq!(view.to_graph(view.to_screen(g)), g);
    }
}
