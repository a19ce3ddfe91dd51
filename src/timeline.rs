// Deferred story steps, fired in order by a single driver.

use std::time::Duration;

use bevy::prelude::*;
use strum::Display;

use crate::scenes::StorySet;
use crate::sequencer::story_enabled;

pub struct TimelinePlugin;

impl Plugin for TimelinePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Timeline>()
            .add_message::<CueFired>()
            .add_systems(
                Update,
                drive_timeline
                    .in_set(StorySet::Timeline)
                    .run_if(story_enabled),
            );
    }
}

/// A named deferred action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Cue {
    ReleasePhone,
    EnterVideoReveal,
    ShowRevelation,
    EnterFinalReveal,
    StartProximity,
    EndJumpPulse,
    StartAmbientDrift,
}

/// Written once for every cue that comes due.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueFired(pub Cue);

#[derive(Debug, Clone, Copy)]
struct Step {
    due: Duration,
    seq: u64,
    cue: Cue,
}

/// Pending cues on a virtual clock that only moves when [`Timeline::advance`] is called.
#[derive(Resource, Debug, Default)]
pub struct Timeline {
    now: Duration,
    next_seq: u64,
    steps: Vec<Step>,
}

impl Timeline {
    /// Schedules `cue` to fire `delay` from now.
    pub fn after(&mut self, delay: Duration, cue: Cue) {
        let step = Step {
            due: self.now + delay,
            seq: self.next_seq,
            cue,
        };
        self.next_seq += 1;
        self.steps.push(step);
    }

    /// Schedules a chain where each delay counts from the step before it.
    pub fn chain(&mut self, steps: &[(Duration, Cue)]) {
        let mut offset = Duration::ZERO;
        for &(delay, cue) in steps {
            offset += delay;
            self.after(offset, cue);
        }
    }

    /// Moves the clock forward and returns the cues that came due, earliest first.
    pub fn advance(&mut self, delta: Duration) -> Vec<Cue> {
        self.now += delta;
        let now = self.now;

        let (mut due, pending): (Vec<Step>, Vec<Step>) =
            self.steps.drain(..).partition(|step| step.due <= now);
        self.steps = pending;

        due.sort_by_key(|step| (step.due, step.seq));
        due.into_iter().map(|step| step.cue).collect()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.steps.len()
    }
}

fn drive_timeline(time: Res<Time>, mut timeline: ResMut<Timeline>, mut fired: MessageWriter<CueFired>) {
    for cue in timeline.advance(time.delta()) {
        debug!("Cue {cue} at {:?}, {} pending", timeline.now(), timeline.pending());
        fired.write(CueFired(cue));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn nothing_fires_early() {
        let mut timeline = Timeline::default();
        timeline.after(ms(800), Cue::EnterVideoReveal);

        assert!(timeline.advance(ms(799)).is_empty());
        assert_eq!(timeline.pending(), 1);
        assert_eq!(timeline.advance(ms(1)), vec![Cue::EnterVideoReveal]);
        assert_eq!(timeline.pending(), 0);
    }

    #[test]
    fn chained_delays_accumulate() {
        let mut timeline = Timeline::default();
        timeline.chain(&[(ms(800), Cue::EnterVideoReveal), (ms(500), Cue::ShowRevelation)]);

        assert_eq!(timeline.advance(ms(800)), vec![Cue::EnterVideoReveal]);
        assert!(timeline.advance(ms(499)).is_empty());
        assert_eq!(timeline.advance(ms(1)), vec![Cue::ShowRevelation]);
    }

    #[test]
    fn one_large_step_fires_everything_in_due_order() {
        let mut timeline = Timeline::default();
        timeline.chain(&[(ms(800), Cue::EnterVideoReveal), (ms(500), Cue::ShowRevelation)]);
        timeline.after(ms(150), Cue::ReleasePhone);

        assert_eq!(
            timeline.advance(ms(5000)),
            vec![Cue::ReleasePhone, Cue::EnterVideoReveal, Cue::ShowRevelation]
        );
    }

    #[test]
    fn equal_due_times_keep_insertion_order() {
        let mut timeline = Timeline::default();
        timeline.after(ms(500), Cue::EndJumpPulse);
        timeline.after(ms(500), Cue::EnterFinalReveal);

        assert_eq!(
            timeline.advance(ms(500)),
            vec![Cue::EndJumpPulse, Cue::EnterFinalReveal]
        );
    }

    #[test]
    fn delays_count_from_the_current_clock() {
        let mut timeline = Timeline::default();
        timeline.advance(ms(1000));
        timeline.after(ms(500), Cue::EndJumpPulse);

        assert!(timeline.advance(ms(400)).is_empty());
        assert_eq!(timeline.advance(ms(100)), vec![Cue::EndJumpPulse]);
        assert_eq!(timeline.now(), ms(1500));
    }
}
