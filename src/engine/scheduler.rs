/// One-shot delayed events measured in simulation time.
///
/// Tasks are plain values handed back from `advance` when they come due,
/// so nothing fires into state the owner has already torn down: dropping or
/// `cancel_all`-ing the scheduler is enough to silence pending work.
use log::debug;

/// Identifies a scheduled task for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct ScheduledTask<E> {
    id: TaskId,
    due_at: f32,
    event: E,
}

/// Cancellable one-shot timer queue
#[derive(Debug)]
pub struct Scheduler<E> {
    /// Simulation time accumulated through `advance`
    now: f32,
    next_id: u64,
    tasks: Vec<ScheduledTask<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    /// Queue `event` to fire once `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, event: E) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            due_at: self.now + delay.max(0.0),
            event,
        });
        debug!("Scheduled task {:?} in {:.2}s", id, delay);
        id
    }

    /// Cancel a pending task, returns false if it already fired or never existed
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Drop every pending task
    pub fn cancel_all(&mut self) {
        if !self.tasks.is_empty() {
            debug!("Cancelling {} pending task(s)", self.tasks.len());
        }
        self.tasks.clear();
    }

    /// Whether the task is still waiting to fire
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn now(&self) -> f32 {
        self.now
    }

    /// Move the clock forward and return every event that came due,
    /// in the order they were due
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        self.now += dt.max(0.0);

        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|task| task.due_at <= now);
        self.tasks = pending;

        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at));
        due.into_iter().map(|task| task.event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, "game_over");

        assert!(scheduler.advance(0.5).is_empty());
        assert_eq!(scheduler.advance(0.5), vec!["game_over"]);
        assert!(scheduler.advance(10.0).is_empty());
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(1.0, 42);

        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.is_pending(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.advance(5.0).is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.1, 1);
        scheduler.schedule(0.2, 2);
        scheduler.cancel_all();

        assert_eq!(scheduler.pending_count(), 0);
        assert!(scheduler.advance(1.0).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.3, "late");
        scheduler.schedule(0.1, "early");

        assert_eq!(scheduler.advance(1.0), vec!["early", "late"]);
    }

    #[test]
    fn test_delay_is_relative_to_current_time() {
        let mut scheduler = Scheduler::new();
        scheduler.advance(2.0);
        scheduler.schedule(1.0, ());

        assert!(scheduler.advance(0.5).is_empty());
        assert_eq!(scheduler.advance(0.5).len(), 1);
        assert!((scheduler.now() - 3.0).abs() < 1e-5);
    }
}
