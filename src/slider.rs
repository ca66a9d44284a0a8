use std::sync::mpsc::{self, Receiver, Sender};

use crate::data::model::YearExtent;
use crate::scale::{LinearScale, PlotGeometry};

/// Sent to subscribers whenever the selected year changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineYearChanged {
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

// ---------------------------------------------------------------------------
// SliderControl – 1-D drag input over the year domain
// ---------------------------------------------------------------------------

/// Converts pointer positions on the track into baseline years.
///
/// Pixel coordinates are in the slider's plot space, the same space as
/// [`PlotGeometry::x_range`].
#[derive(Debug)]
pub struct SliderControl {
    scale: LinearScale,
    extent: YearExtent,
    state: DragState,
    year: i32,
    handle_x: f64,
    subscribers: Vec<Sender<BaselineYearChanged>>,
}

impl SliderControl {
    pub fn new(geometry: &PlotGeometry, extent: YearExtent, initial_year: i32) -> Self {
        let scale = LinearScale::new((extent.min as f64, extent.max as f64), geometry.x_range())
            .with_clamp(true);
        let year = extent.clamp(initial_year);
        SliderControl {
            scale,
            extent,
            state: DragState::Idle,
            year,
            handle_x: scale.map(year as f64),
            subscribers: Vec::new(),
        }
    }

    /// Register a listener. Events are delivered synchronously, in the call
    /// that caused them.
    pub fn subscribe(&mut self) -> Receiver<BaselineYearChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Last emitted year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Handle position; follows the pointer without rounding.
    pub fn handle_x(&self) -> f64 {
        self.handle_x
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    /// Start a drag at `px`. The press itself is handled like a move, so a
    /// click on the track jumps there.
    pub fn pointer_down(&mut self, px: f64) -> Option<i32> {
        self.state = DragState::Dragging;
        self.pointer_move(px)
    }

    /// Returns the new year when this move changed it.
    pub fn pointer_move(&mut self, px: f64) -> Option<i32> {
        if self.state != DragState::Dragging {
            return None;
        }
        let position = self.scale.invert(px);
        self.handle_x = self.scale.map(position);
        let year = self.extent.clamp(position.round() as i32);
        self.emit(year)
    }

    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
        self.handle_x = self.scale.map(self.year as f64);
    }

    /// Move to `year` programmatically, clamped to the domain.
    pub fn set_year(&mut self, year: i32) -> Option<i32> {
        let year = self.extent.clamp(year);
        self.handle_x = self.scale.map(year as f64);
        self.emit(year)
    }

    fn emit(&mut self, year: i32) -> Option<i32> {
        if year == self.year {
            return None;
        }
        self.year = year;
        let event = BaselineYearChanged { year };
        self.subscribers.retain(|tx| tx.send(event).is_ok());
        Some(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    fn slider(min: i32, max: i32) -> SliderControl {
        let geometry = PlotGeometry::new(&Layout::default().slider);
        SliderControl::new(&geometry, YearExtent { min, max }, min)
    }

    fn drain(rx: &Receiver<BaselineYearChanged>) -> Vec<i32> {
        rx.try_iter().map(|e| e.year).collect()
    }

    #[test]
    fn drag_to_1975_emits_once() {
        let mut s = slider(1960, 1980);
        let rx = s.subscribe();
        let px = s.scale().map(1975.0);

        assert_eq!(s.pointer_down(s.scale().map(1960.0)), None);
        assert_eq!(s.state(), DragState::Dragging);
        assert_eq!(s.pointer_move(px), Some(1975));
        s.pointer_up();

        assert_eq!(drain(&rx), [1975]);
        assert_eq!(s.year(), 1975);
        assert_eq!(s.state(), DragState::Idle);
    }

    #[test]
    fn sub_year_moves_round_to_nearest() {
        let mut s = slider(1960, 1980);
        let rx = s.subscribe();
        s.pointer_down(s.scale().map(1970.4));
        s.pointer_move(s.scale().map(1970.2));
        s.pointer_move(s.scale().map(1970.6));
        assert_eq!(drain(&rx), [1970, 1971]);
        assert!((s.handle_x() - s.scale().map(1970.6)).abs() < 1e-9);
    }

    #[test]
    fn dragging_past_the_ends_clamps() {
        let mut s = slider(1960, 1980);
        let rx = s.subscribe();
        s.pointer_down(10_000.0);
        assert_eq!(s.year(), 1980);
        s.pointer_move(-10_000.0);
        assert_eq!(s.year(), 1960);
        assert_eq!(drain(&rx), [1980, 1960]);
        assert_eq!(s.handle_x(), s.scale().range.0);
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut s = slider(1960, 1980);
        let rx = s.subscribe();
        assert_eq!(s.pointer_move(s.scale().map(1975.0)), None);
        assert!(drain(&rx).is_empty());
        assert_eq!(s.year(), 1960);
    }

    #[test]
    fn release_snaps_handle_to_year() {
        let mut s = slider(1960, 1980);
        s.pointer_down(s.scale().map(1966.3));
        s.pointer_up();
        assert_eq!(s.handle_x(), s.scale().map(1966.0));
    }

    #[test]
    fn press_on_the_track_jumps_to_that_year() {
        let mut s = slider(1960, 1980);
        let rx = s.subscribe();
        assert_eq!(s.pointer_down(s.scale().map(1972.0)), Some(1972));
        assert_eq!(s.state(), DragState::Dragging);
        assert_eq!(drain(&rx), [1972]);
        assert_eq!(s.handle_x(), s.scale().map(1972.0));
    }

    #[test]
    fn set_year_clamps_and_notifies_every_subscriber() {
        let mut s = slider(1960, 1980);
        let a = s.subscribe();
        let b = s.subscribe();
        assert_eq!(s.set_year(1999), Some(1980));
        assert_eq!(s.set_year(1980), None);
        assert_eq!(drain(&a), [1980]);
        assert_eq!(drain(&b), [1980]);
    }

    #[test]
    fn dropped_subscriber_is_forgotten() {
        let mut s = slider(1960, 1980);
        drop(s.subscribe());
        let rx = s.subscribe();
        s.set_year(1970);
        assert_eq!(drain(&rx), [1970]);
        assert_eq!(s.subscribers.len(), 1);
    }
}
