//! Charge domain entity and its period timeline
//!
//! A charge owns an ordered list of [`ChargePeriod`]s. Periods never overlap,
//! and from the earliest start they cover time without gaps until either a
//! stop date or the open end sentinel. The timeline is only changed through
//! [`Charge::update`], [`Charge::stop`] and [`Charge::cancel_stop`]; a failed
//! call leaves it untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identifier::ChargeIdentifier;
use super::period::ChargePeriod;
use super::price::Resolution;

/// Invalid operation on a charge timeline.
///
/// Business validation is expected to rule these out before the timeline is
/// touched, so seeing one during bundle processing indicates a bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("charge has no periods")]
    NoPeriods,

    #[error("update period must be open-ended, got end {end}")]
    BoundedUpdatePeriod { end: DateTime<Utc> },

    #[error("update starting {start} is not before stop date {stop}")]
    UpdateAfterStop {
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    },

    #[error("stop date {stop} precedes charge start {start}")]
    StopBeforeStart {
        stop: DateTime<Utc>,
        start: DateTime<Utc>,
    },

    #[error("charge already stopped at {existing}, cannot stop at later {requested}")]
    AlreadyStoppedEarlier {
        existing: DateTime<Utc>,
        requested: DateTime<Utc>,
    },

    #[error("charge is not stopped")]
    NotStopped,

    #[error("cancel-stop period starting {start} does not follow latest period starting {latest_start}")]
    CancelStopOverlaps {
        start: DateTime<Utc>,
        latest_start: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    identifier: ChargeIdentifier,
    resolution: Resolution,
    periods: Vec<ChargePeriod>,
    /// Optimistic concurrency token, bumped by repositories on every write.
    version: u64,
}

impl Charge {
    /// New charge whose timeline holds `period` only.
    pub fn create(
        identifier: ChargeIdentifier,
        resolution: Resolution,
        period: ChargePeriod,
    ) -> Result<Self, TimelineError> {
        let mut charge = Self {
            identifier,
            resolution,
            periods: Vec::new(),
            version: 0,
        };
        charge.update(period)?;
        Ok(charge)
    }

    /// Start a new timeline on a charge whose periods were all stopped away.
    ///
    /// The version is kept so the stored row can still be updated.
    pub fn restart(&mut self, resolution: Resolution, period: ChargePeriod) -> Result<(), TimelineError> {
        let mut restarted = Self::create(self.identifier.clone(), resolution, period)?;
        restarted.version = self.version;
        *self = restarted;
        Ok(())
    }

    pub fn identifier(&self) -> &ChargeIdentifier {
        &self.identifier
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn periods(&self) -> &[ChargePeriod] {
        &self.periods
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Called by repositories after a successful write.
    pub fn increment_version(&mut self) {
        self.version += 1;
    }

    /// Same timeline, rebased on `version`. Used to write back an earlier
    /// state over a newer row.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn has_periods(&self) -> bool {
        !self.periods.is_empty()
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.periods.first().map(|p| p.start_date_time)
    }

    pub fn latest_period(&self) -> Option<&ChargePeriod> {
        self.periods.last()
    }

    pub fn period_at(&self, instant: DateTime<Utc>) -> Option<&ChargePeriod> {
        self.periods.iter().find(|p| p.contains(instant))
    }

    /// End of the timeline when it has been stopped.
    pub fn stop_date(&self) -> Option<DateTime<Utc>> {
        self.periods
            .last()
            .filter(|p| !p.is_open_ended())
            .map(|p| p.end_date_time)
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_date().is_some()
    }

    /// Replace everything from `new_period.start_date_time` onwards.
    ///
    /// The period containing the new start keeps its head (or disappears if it
    /// starts at the same instant) and every later period is superseded. On a
    /// stopped charge the new period inherits the stop date as its end.
    pub fn update(&mut self, mut new_period: ChargePeriod) -> Result<(), TimelineError> {
        if !new_period.is_open_ended() {
            return Err(TimelineError::BoundedUpdatePeriod {
                end: new_period.end_date_time,
            });
        }

        let start = new_period.start_date_time;
        let stop_date = self.stop_date();
        if let Some(stop) = stop_date {
            if start >= stop {
                return Err(TimelineError::UpdateAfterStop { start, stop });
            }
        }

        if let Some(index) = self.periods.iter().position(|p| p.contains(start)) {
            if self.periods[index].start_date_time == start {
                self.periods.remove(index);
            } else {
                self.periods[index].end_date_time = start;
            }
        }

        let end = new_period.end_date_time;
        self.periods
            .retain(|p| !(p.start_date_time >= start && p.start_date_time < end));

        if let Some(stop) = stop_date {
            new_period.end_date_time = stop;
        }
        self.periods.push(new_period);
        self.periods.sort_by_key(|p| p.start_date_time);
        Ok(())
    }

    /// End the timeline at `stop_date`.
    ///
    /// Periods starting at or after the stop date are dropped, which leaves an
    /// empty timeline when the charge is stopped at its own start. An existing
    /// stop may be moved earlier but never later.
    pub fn stop(&mut self, stop_date: DateTime<Utc>) -> Result<(), TimelineError> {
        let start = self.start_date().ok_or(TimelineError::NoPeriods)?;
        if stop_date < start {
            return Err(TimelineError::StopBeforeStart {
                stop: stop_date,
                start,
            });
        }
        if let Some(existing) = self.stop_date() {
            if existing < stop_date {
                return Err(TimelineError::AlreadyStoppedEarlier {
                    existing,
                    requested: stop_date,
                });
            }
        }

        self.periods.retain(|p| p.start_date_time < stop_date);
        if let Some(last) = self.periods.last_mut() {
            last.end_date_time = stop_date;
        }
        Ok(())
    }

    /// Reopen a stopped charge by appending `new_period`.
    pub fn cancel_stop(&mut self, new_period: ChargePeriod) -> Result<(), TimelineError> {
        let latest = self.periods.last_mut().ok_or(TimelineError::NoPeriods)?;
        if latest.is_open_ended() {
            return Err(TimelineError::NotStopped);
        }
        if new_period.start_date_time <= latest.start_date_time {
            return Err(TimelineError::CancelStopOverlaps {
                start: new_period.start_date_time,
                latest_start: latest.start_date_time,
            });
        }

        latest.end_date_time = new_period.start_date_time;
        self.periods.push(new_period);
        Ok(())
    }

    /// Every period has positive length and consecutive periods meet exactly.
    pub fn is_consistent(&self) -> bool {
        self.periods
            .iter()
            .all(|p| p.start_date_time < p.end_date_time)
            && self
                .periods
                .windows(2)
                .all(|w| w[0].end_date_time == w[1].start_date_time)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charge::period::{open_end, VatClassification};
    use crate::domain::charge::ChargeType;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn period(name: &str, start: DateTime<Utc>) -> ChargePeriod {
        ChargePeriod::new(name, "", VatClassification::Vat25, false, false, start)
    }

    fn charge_from(start: DateTime<Utc>) -> Charge {
        Charge::create(
            ChargeIdentifier::new(ChargeType::Tariff, "5790000000001", "T-1"),
            Resolution::Hourly,
            period("initial", start),
        )
        .unwrap()
    }

    fn spans(charge: &Charge) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        charge
            .periods()
            .iter()
            .map(|p| (p.start_date_time, p.end_date_time))
            .collect()
    }

    #[test]
    fn create_holds_single_open_period() {
        let charge = charge_from(day(0));
        assert_eq!(spans(&charge), vec![(day(0), open_end())]);
        assert!(!charge.is_stopped());
        assert_eq!(charge.version(), 0);
    }

    #[test]
    fn create_rejects_bounded_period() {
        let err = Charge::create(
            ChargeIdentifier::new(ChargeType::Fee, "5790000000001", "F-1"),
            Resolution::Monthly,
            period("x", day(0)).with_end(day(5)),
        )
        .unwrap_err();
        assert_eq!(err, TimelineError::BoundedUpdatePeriod { end: day(5) });
    }

    #[test]
    fn restart_keeps_version_of_emptied_charge() {
        let mut charge = charge_from(day(0));
        charge.increment_version();
        charge.stop(day(0)).unwrap();
        assert!(!charge.has_periods());

        charge.restart(Resolution::Daily, period("again", day(3))).unwrap();
        assert_eq!(spans(&charge), vec![(day(3), open_end())]);
        assert_eq!(charge.resolution(), Resolution::Daily);
        assert_eq!(charge.version(), 1);
    }

    #[test]
    fn update_truncates_containing_period() {
        let mut charge = charge_from(day(0));
        charge.update(period("new", day(10))).unwrap();

        assert_eq!(spans(&charge), vec![(day(0), day(10)), (day(10), open_end())]);
        assert_eq!(charge.periods()[1].name, "new");
    }

    #[test]
    fn update_at_same_start_replaces_period() {
        let mut charge = charge_from(day(0));
        charge.update(period("replacement", day(0))).unwrap();

        assert_eq!(spans(&charge), vec![(day(0), open_end())]);
        assert_eq!(charge.periods()[0].name, "replacement");
    }

    #[test]
    fn update_supersedes_later_periods() {
        let mut charge = charge_from(day(0));
        charge.update(period("b", day(10))).unwrap();
        charge.update(period("c", day(20))).unwrap();
        charge.update(period("d", day(5))).unwrap();

        assert_eq!(spans(&charge), vec![(day(0), day(5)), (day(5), open_end())]);
        assert_eq!(charge.periods()[1].name, "d");
    }

    #[test]
    fn update_before_start_supersedes_everything() {
        let mut charge = charge_from(day(10));
        charge.update(period("b", day(20))).unwrap();
        charge.update(period("early", day(1))).unwrap();

        assert_eq!(spans(&charge), vec![(day(1), open_end())]);
    }

    #[test]
    fn update_is_idempotent_at_identical_span() {
        let mut once = charge_from(day(0));
        once.update(period("new", day(10))).unwrap();

        let mut twice = once.clone();
        twice.update(period("new", day(10))).unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.periods().len(), 2);
    }

    #[test]
    fn update_rejects_bounded_period() {
        let mut charge = charge_from(day(0));
        let err = charge.update(period("x", day(5)).with_end(day(8))).unwrap_err();

        assert_eq!(err, TimelineError::BoundedUpdatePeriod { end: day(8) });
        assert_eq!(spans(&charge), vec![(day(0), open_end())]);
    }

    #[test]
    fn update_on_stopped_charge_keeps_stop_date() {
        let mut charge = charge_from(day(0));
        charge.stop(day(30)).unwrap();
        charge.update(period("new", day(10))).unwrap();

        assert_eq!(spans(&charge), vec![(day(0), day(10)), (day(10), day(30))]);
        assert!(charge.is_stopped());
    }

    #[test]
    fn update_after_stop_date_fails() {
        let mut charge = charge_from(day(0));
        charge.stop(day(30)).unwrap();

        let err = charge.update(period("late", day(30))).unwrap_err();
        assert_eq!(
            err,
            TimelineError::UpdateAfterStop {
                start: day(30),
                stop: day(30)
            }
        );
    }

    #[test]
    fn stop_at_start_of_single_period_removes_all_periods() {
        let mut charge = charge_from(day(0));
        charge.stop(day(0)).unwrap();

        assert!(charge.periods().is_empty());
        assert!(!charge.has_periods());
    }

    #[test]
    fn stop_inside_period_sets_its_end() {
        let mut charge = charge_from(day(0));
        charge.stop(day(7)).unwrap();

        assert_eq!(spans(&charge), vec![(day(0), day(7))]);
        assert_eq!(charge.stop_date(), Some(day(7)));
    }

    #[test]
    fn stop_drops_periods_starting_at_or_after_stop() {
        let mut charge = charge_from(day(0));
        charge.update(period("b", day(10))).unwrap();
        charge.update(period("c", day(20))).unwrap();
        charge.stop(day(10)).unwrap();

        assert_eq!(spans(&charge), vec![(day(0), day(10))]);
    }

    #[test]
    fn stop_without_periods_fails() {
        let mut charge = charge_from(day(0));
        charge.stop(day(0)).unwrap();

        assert_eq!(charge.stop(day(0)).unwrap_err(), TimelineError::NoPeriods);
    }

    #[test]
    fn stop_before_start_fails() {
        let mut charge = charge_from(day(10));
        let err = charge.stop(day(3)).unwrap_err();

        assert_eq!(
            err,
            TimelineError::StopBeforeStart {
                stop: day(3),
                start: day(10)
            }
        );
    }

    #[test]
    fn stop_later_than_existing_stop_fails() {
        let mut charge = charge_from(day(0));
        charge.stop(day(10)).unwrap();

        let err = charge.stop(day(20)).unwrap_err();
        assert_eq!(
            err,
            TimelineError::AlreadyStoppedEarlier {
                existing: day(10),
                requested: day(20)
            }
        );
        assert_eq!(spans(&charge), vec![(day(0), day(10))]);
    }

    #[test]
    fn stop_may_move_existing_stop_earlier() {
        let mut charge = charge_from(day(0));
        charge.stop(day(20)).unwrap();
        charge.stop(day(10)).unwrap();

        assert_eq!(spans(&charge), vec![(day(0), day(10))]);
    }

    #[test]
    fn cancel_stop_reopens_with_new_final_period() {
        let mut charge = charge_from(day(0));
        charge.stop(day(10)).unwrap();
        charge.cancel_stop(period("reopened", day(10))).unwrap();

        assert_eq!(spans(&charge), vec![(day(0), day(10)), (day(10), open_end())]);
        assert_eq!(charge.periods()[1].name, "reopened");
        assert!(!charge.is_stopped());
    }

    #[test]
    fn cancel_stop_on_running_charge_fails() {
        let mut charge = charge_from(day(0));
        let err = charge.cancel_stop(period("x", day(5))).unwrap_err();
        assert_eq!(err, TimelineError::NotStopped);
    }

    #[test]
    fn cancel_stop_without_periods_fails() {
        let mut charge = charge_from(day(0));
        charge.stop(day(0)).unwrap();

        let err = charge.cancel_stop(period("x", day(0))).unwrap_err();
        assert_eq!(err, TimelineError::NoPeriods);
    }

    #[test]
    fn cancel_stop_overlapping_latest_period_fails() {
        let mut charge = charge_from(day(5));
        charge.stop(day(10)).unwrap();

        let err = charge.cancel_stop(period("x", day(5))).unwrap_err();
        assert!(matches!(err, TimelineError::CancelStopOverlaps { .. }));
        assert_eq!(spans(&charge), vec![(day(5), day(10))]);
    }

    #[test]
    fn period_at_finds_containing_period() {
        let mut charge = charge_from(day(0));
        charge.update(period("b", day(10))).unwrap();

        assert_eq!(charge.period_at(day(3)).unwrap().name, "initial");
        assert_eq!(charge.period_at(day(10)).unwrap().name, "b");
        assert!(charge.period_at(day(-1)).is_none());
    }

    #[test]
    fn create_update_stop_cancel_stop_keeps_chronology() {
        let mut charge = charge_from(day(0));
        charge.update(period("updated", day(10))).unwrap();
        charge.stop(day(20)).unwrap();
        charge.cancel_stop(period("reopened", day(20))).unwrap();

        assert_eq!(
            spans(&charge),
            vec![(day(0), day(10)), (day(10), day(20)), (day(20), open_end())]
        );
        let names: Vec<_> = charge.periods().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["initial", "updated", "reopened"]);
        assert!(charge.is_consistent());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::charge::period::VatClassification;
    use crate::domain::charge::ChargeType;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Step {
        Update(i64),
        Stop(i64),
        CancelStop(i64),
    }

    fn arb_step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0i64..60).prop_map(Step::Update),
            (0i64..60).prop_map(Step::Stop),
            (0i64..60).prop_map(Step::CancelStop),
        ]
    }

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn period(start: DateTime<Utc>) -> ChargePeriod {
        ChargePeriod::new("p", "", VatClassification::NoVat, false, false, start)
    }

    proptest! {
        /// Any sequence of timeline operations keeps the periods sorted,
        /// gap-free and non-overlapping, and failed operations change nothing.
        #[test]
        fn timeline_stays_consistent(start in 0i64..30, steps in prop::collection::vec(arb_step(), 0..24)) {
            let mut charge = Charge::create(
                ChargeIdentifier::new(ChargeType::Tariff, "5790000000001", "T-1"),
                Resolution::Hourly,
                period(day(start)),
            ).unwrap();

            for step in steps {
                let before = charge.clone();
                let result = match step {
                    Step::Update(d) => charge.update(period(day(d))),
                    Step::Stop(d) => charge.stop(day(d)),
                    Step::CancelStop(d) => charge.cancel_stop(period(day(d))),
                };
                if result.is_err() {
                    prop_assert_eq!(&charge, &before);
                }
                prop_assert!(charge.is_consistent(), "inconsistent timeline: {:?}", charge.periods());
            }
        }
    }
}
