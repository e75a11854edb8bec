use crate::error::Result;
use crate::grade::Grade;
use crate::schedule::process_review;
use crate::schedule::SchedulingResult;
use crate::schedule::Topic;
use time::OffsetDateTime;

pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

pub struct UtcClock;

impl Clock for UtcClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}

/// Always reports the same instant.
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Reviews topics at the time reported by its clock.
pub struct Scheduler<C: Clock> {
    clock: C,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Scheduler { clock }
    }

    pub fn review(
        &self,
        topic: &Topic,
        grade: Grade,
        intrinsic_weight: f64,
    ) -> Result<SchedulingResult> {
        process_review(topic, grade, intrinsic_weight, self.clock.now())
    }

    pub fn is_due(&self, topic: &Topic) -> bool {
        topic.is_due(self.clock.now())
    }
}

impl Default for Scheduler<UtcClock> {
    fn default() -> Self {
        Scheduler::new(UtcClock)
    }
}
