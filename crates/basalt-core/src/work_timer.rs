use std::convert::TryInto;
use std::time::{Duration, Instant};

/// Accumulates the wall time spent on repeated items of work, like one LOD selection pass per frame.
#[derive(Clone, Debug, Default)]
pub struct WorkTimer {
    total_time: Duration,
    last_item_time: Duration,
    longest_item_time: Duration,
    items_completed: u32,
}

impl WorkTimer {
    pub fn start() -> Self {
        Self::default()
    }

    /// Runs `work` and records how long it took.
    pub fn time<R>(&mut self, work: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = work();
        self.complete_item(start.elapsed());
        result
    }

    pub fn complete_item(&mut self, d: Duration) {
        self.total_time += d;
        self.last_item_time = d;
        self.longest_item_time = self.longest_item_time.max(d);
        self.items_completed += 1;
    }

    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    pub fn last_item_time(&self) -> Duration {
        self.last_item_time
    }

    pub fn longest_item_time(&self) -> Duration {
        self.longest_item_time
    }

    pub fn items_completed(&self) -> u32 {
        self.items_completed
    }

    pub fn average_time_us(&self) -> u32 {
        let total_time_us: u32 = self.total_time.as_micros().try_into().unwrap_or(u32::MAX);

        total_time_us / self.items_completed.max(1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn average_of_no_items_is_zero() {
        assert_eq!(WorkTimer::start().average_time_us(), 0);
    }

    #[test]
    fn tracks_last_longest_and_average() {
        let mut timer = WorkTimer::start();
        timer.complete_item(Duration::from_micros(30));
        timer.complete_item(Duration::from_micros(90));
        timer.complete_item(Duration::from_micros(60));

        assert_eq!(timer.items_completed(), 3);
        assert_eq!(timer.last_item_time(), Duration::from_micros(60));
        assert_eq!(timer.longest_item_time(), Duration::from_micros(90));
        assert_eq!(timer.average_time_us(), 60);
    }

    #[test]
    fn timed_work_returns_its_result() {
        let mut timer = WorkTimer::start();
        let answer = timer.time(|| 6 * 7);
        assert_eq!(answer, 42);
        assert_eq!(timer.items_completed(), 1);
    }
}
