//! Pointer interaction for the horizontal timeline: drag to scroll, momentum
//! after a flick, and telling a drag apart from a click.
//!
//! Everything here is pure state; callers feed in pointer positions, the
//! current scroll offset and timestamps (milliseconds) and apply the offsets
//! that come back.

use crate::core::config::TimelineConfig;
use crate::core::model::{Episode, TimelineCharacter};

pub const PRIMARY_BUTTON: i16 = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start_x: f64,
    pub origin_scroll: f64,
    pub last_x: f64,
    pub last_move_at: f64,
    pub velocity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coast {
    pub velocity: f64,
    pub last_frame_at: f64,
    pub frames: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
    Coasting(Coast),
}

#[derive(Debug, Clone)]
pub struct TimelineScroller {
    config: TimelineConfig,
    state: DragState,
    press_x: Option<f64>,
}

impl TimelineScroller {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
            press_x: None,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn is_coasting(&self) -> bool {
        matches!(self.state, DragState::Coasting(_))
    }

    /// Starts a drag on a primary-button press. A press while coasting stops
    /// the coast. Returns whether a drag started.
    pub fn press(&mut self, button: i16, x: f64, scroll_left: f64, now: f64) -> bool {
        if button != PRIMARY_BUTTON {
            return false;
        }
        self.press_x = Some(x);
        self.state = DragState::Dragging(DragSession {
            start_x: x,
            origin_scroll: scroll_left,
            last_x: x,
            last_move_at: now,
            velocity: 0.0,
        });
        true
    }

    /// Returns the scroll offset to apply while dragging.
    pub fn pointer_move(&mut self, x: f64, now: f64) -> Option<f64> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };

        let delta_x = x - session.last_x;
        if now - session.last_move_at > 0.0 {
            session.velocity = delta_x * self.config.velocity_scale;
        }
        session.last_x = x;
        session.last_move_at = now;

        Some(session.origin_scroll + (session.start_x - x))
    }

    /// Ends a drag. Returns true when the release was quick and fast enough
    /// to coast; the caller should then start requesting frames.
    pub fn release(&mut self, now: f64) -> bool {
        let DragState::Dragging(session) = self.state else {
            return false;
        };

        let quick_release = now - session.last_move_at < self.config.quick_release_ms;
        if quick_release && session.velocity.abs() > self.config.min_release_velocity {
            self.state = DragState::Coasting(Coast {
                velocity: session.velocity,
                last_frame_at: now,
                frames: 0,
            });
            true
        } else {
            self.state = DragState::Idle;
            false
        }
    }

    /// Pointer left the surface mid-drag: stop without momentum.
    pub fn leave(&mut self) {
        if self.is_dragging() {
            self.state = DragState::Idle;
        }
    }

    /// Advances the coast by one animation frame. Returns the scroll offset
    /// change to apply, or `None` once the coast is over.
    pub fn frame(&mut self, timestamp: f64) -> Option<f64> {
        let DragState::Coasting(coast) = &mut self.state else {
            return None;
        };

        let elapsed = timestamp - coast.last_frame_at;
        coast.last_frame_at = timestamp;
        coast.frames += 1;

        if coast.velocity.abs() > self.config.stop_velocity && coast.frames < self.config.max_frames {
            let offset = -(coast.velocity * elapsed * self.config.frame_time_scale);
            coast.velocity *= self.config.decay;
            Some(offset)
        } else {
            self.state = DragState::Idle;
            None
        }
    }

    /// True when a click at `x` ends a drag that moved past the click threshold.
    pub fn should_suppress_click(&self, x: f64) -> bool {
        self.press_x
            .map_or(false, |start| (x - start).abs() > self.config.click_threshold_px)
    }

    /// Horizontal offset for a vertical wheel delta.
    pub fn wheel_offset(&self, delta_y: f64) -> f64 {
        delta_y * self.config.wheel_multiplier
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

impl Default for TimelineScroller {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

/// Which card is expanded and whose episode panel is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineSelection {
    pub selected: Option<u32>,
    pub episodes_for: Option<u32>,
}

impl TimelineSelection {
    pub fn select(&mut self, character_id: u32) {
        self.selected = if self.selected == Some(character_id) {
            None
        } else {
            Some(character_id)
        };
    }

    /// Click on a card at `client_x`. Ignored when it ends a real drag.
    /// Returns whether the selection changed.
    pub fn click(&mut self, scroller: &TimelineScroller, character_id: u32, client_x: f64) -> bool {
        if scroller.should_suppress_click(client_x) {
            return false;
        }
        self.select(character_id);
        true
    }

    pub fn toggle_episodes(&mut self, character_id: u32) {
        self.episodes_for = if self.episodes_for == Some(character_id) {
            None
        } else {
            Some(character_id)
        };
    }

    pub fn is_selected(&self, character_id: u32) -> bool {
        self.selected == Some(character_id)
    }

    pub fn shows_episodes(&self, character_id: u32) -> bool {
        self.is_selected(character_id) && self.episodes_for == Some(character_id)
    }
}

pub fn episodes_of<'a>(character: &TimelineCharacter, episodes: &'a [Episode]) -> Vec<&'a Episode> {
    episodes
        .iter()
        .filter(|e| character.appears_in(e.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::fixtures::{character, episode};
    use crate::core::model::Status;

    fn drag(scroller: &mut TimelineScroller, from: f64, to: f64) {
        scroller.press(PRIMARY_BUTTON, from, 500.0, 0.0);
        scroller.pointer_move(to, 16.0);
        scroller.release(400.0);
    }

    #[test]
    fn test_drag_scrolls_inverse_to_pointer() {
        let mut scroller = TimelineScroller::default();
        assert!(scroller.press(PRIMARY_BUTTON, 300.0, 1000.0, 0.0));
        assert!(scroller.is_dragging());

        assert_eq!(scroller.pointer_move(280.0, 16.0), Some(1020.0));
        assert_eq!(scroller.pointer_move(350.0, 32.0), Some(950.0));
    }

    #[test]
    fn test_non_primary_button_is_ignored() {
        let mut scroller = TimelineScroller::default();
        assert!(!scroller.press(2, 300.0, 0.0, 0.0));
        assert_eq!(scroller.state(), DragState::Idle);
        assert_eq!(scroller.pointer_move(100.0, 10.0), None);
    }

    #[test]
    fn test_click_suppressed_after_real_drag() {
        let mut scroller = TimelineScroller::default();
        drag(&mut scroller, 100.0, 110.0);
        assert!(scroller.should_suppress_click(110.0));

        let mut scroller = TimelineScroller::default();
        drag(&mut scroller, 100.0, 102.0);
        assert!(!scroller.should_suppress_click(102.0));
    }

    #[test]
    fn test_drag_then_click_does_not_select() {
        let mut scroller = TimelineScroller::default();
        let mut selection = TimelineSelection::default();
        drag(&mut scroller, 100.0, 110.0);

        assert!(!selection.click(&scroller, 7, 110.0));
        assert_eq!(selection.selected, None);
    }

    #[test]
    fn test_small_wobble_still_selects() {
        let mut scroller = TimelineScroller::default();
        let mut selection = TimelineSelection::default();
        drag(&mut scroller, 100.0, 102.0);

        assert!(selection.click(&scroller, 7, 102.0));
        assert_eq!(selection.selected, Some(7));
    }

    #[test]
    fn test_click_without_press_is_not_suppressed() {
        let scroller = TimelineScroller::default();
        assert!(!scroller.should_suppress_click(500.0));
    }

    #[test]
    fn test_quick_flick_coasts_and_terminates() {
        let config = TimelineConfig::default();
        let mut scroller = TimelineScroller::new(config.clone());
        scroller.press(PRIMARY_BUTTON, 400.0, 1000.0, 0.0);
        scroller.pointer_move(380.0, 16.0);
        scroller.pointer_move(340.0, 32.0);

        assert!(scroller.release(50.0));
        assert!(scroller.is_coasting());

        // velocity = -40 * 0.3 = -12; first frame of 16ms moves right by 12 * 16 * 0.2
        let first = scroller.frame(66.0).unwrap();
        assert!((first - 38.4).abs() < 1e-9);

        let mut frames = 1;
        let mut t = 66.0;
        while scroller.frame(t + 16.0).is_some() {
            t += 16.0;
            frames += 1;
        }
        assert!(frames < config.max_frames);
        assert_eq!(scroller.state(), DragState::Idle);
    }

    #[test]
    fn test_frame_cap_bounds_coast() {
        let config = TimelineConfig {
            decay: 1.0,
            ..TimelineConfig::default()
        };
        let mut scroller = TimelineScroller::new(config);
        scroller.press(PRIMARY_BUTTON, 400.0, 0.0, 0.0);
        scroller.pointer_move(300.0, 16.0);
        assert!(scroller.release(20.0));

        let mut steps = 0;
        let mut t = 20.0;
        while scroller.frame(t).is_some() {
            t += 16.0;
            steps += 1;
        }
        assert_eq!(steps, 59);
    }

    #[test]
    fn test_slow_release_does_not_coast() {
        let mut scroller = TimelineScroller::default();
        scroller.press(PRIMARY_BUTTON, 400.0, 0.0, 0.0);
        scroller.pointer_move(300.0, 16.0);

        assert!(!scroller.release(500.0));
        assert_eq!(scroller.state(), DragState::Idle);
        assert_eq!(scroller.frame(516.0), None);
    }

    #[test]
    fn test_gentle_release_does_not_coast() {
        let mut scroller = TimelineScroller::default();
        scroller.press(PRIMARY_BUTTON, 400.0, 0.0, 0.0);
        scroller.pointer_move(398.0, 16.0);

        assert!(!scroller.release(20.0));
    }

    #[test]
    fn test_leave_stops_without_momentum() {
        let mut scroller = TimelineScroller::default();
        scroller.press(PRIMARY_BUTTON, 400.0, 0.0, 0.0);
        scroller.pointer_move(300.0, 16.0);
        scroller.leave();

        assert_eq!(scroller.state(), DragState::Idle);
        assert!(!scroller.release(20.0));
    }

    #[test]
    fn test_press_interrupts_coast() {
        let mut scroller = TimelineScroller::default();
        scroller.press(PRIMARY_BUTTON, 400.0, 0.0, 0.0);
        scroller.pointer_move(300.0, 16.0);
        assert!(scroller.release(20.0));

        scroller.press(PRIMARY_BUTTON, 200.0, 700.0, 40.0);
        assert!(scroller.is_dragging());
        assert_eq!(scroller.frame(56.0), None);
    }

    #[test]
    fn test_cancel_and_wheel() {
        let mut scroller = TimelineScroller::default();
        scroller.press(PRIMARY_BUTTON, 400.0, 0.0, 0.0);
        scroller.cancel();
        assert_eq!(scroller.state(), DragState::Idle);

        assert_eq!(scroller.wheel_offset(-50.0), -100.0);
    }

    #[test]
    fn test_selection_toggles() {
        let mut selection = TimelineSelection::default();
        selection.select(1);
        assert!(selection.is_selected(1));

        selection.toggle_episodes(1);
        assert!(selection.shows_episodes(1));

        selection.select(2);
        assert!(!selection.shows_episodes(1));
        assert!(!selection.shows_episodes(2));

        selection.select(2);
        assert_eq!(selection.selected, None);

        selection.toggle_episodes(1);
        assert_eq!(selection.episodes_for, None);
    }

    #[test]
    fn test_episodes_of_character() {
        let rick = TimelineCharacter::from(character(1, "Rick Sanchez", Status::Alive, &[1, 3]));
        let episodes = vec![episode(1, "S01E01"), episode(2, "S01E02"), episode(3, "S01E03")];

        let ids: Vec<u32> = episodes_of(&rick, &episodes).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
