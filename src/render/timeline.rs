//! A virtual clock driving tweens, repeating jobs and one-shot timers.
//!
//! Nothing here sleeps or spawns: the owner advances time with
//! [`Timeline::tick`], which makes every schedule deterministic and testable.

use std::{collections::BTreeMap, fmt, sync::Arc, time::Duration};

use log::{trace, warn};

use super::{Ease, Element, ElementId, Scene};
use crate::layout::{CurvePath, Point};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Cancellation handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

/// How a tween moves its element.
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    Line { from: Point, to: Point },
    Along(Arc<CurvePath>),
}

impl Motion {
    fn at(&self, t: f64) -> Option<Point> {
        match self {
            Motion::Line { from, to } => Some(from.lerp(*to, t)),
            Motion::Along(path) => path.point_at(t),
        }
    }
}

/// A timed interpolation of one element's position, radius and opacity.
///
/// Before its delay elapses the element keeps whatever it was created with.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: ElementId,
    pub delay: Duration,
    pub duration: Duration,
    pub ease: Ease,
    pub motion: Option<Motion>,
    pub radius: Option<(f64, f64)>,
    pub opacity: Option<(f64, f64)>,
    /// Removes the element when the tween completes or is cancelled.
    pub ephemeral: bool,
}

impl Tween {
    pub fn new(target: ElementId, duration: Duration) -> Self {
        Self {
            target,
            delay: Duration::ZERO,
            duration,
            ease: Ease::Linear,
            motion: None,
            radius: None,
            opacity: None,
            ephemeral: false,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn move_line(mut self, from: Point, to: Point) -> Self {
        self.motion = Some(Motion::Line { from, to });
        self
    }

    pub fn move_along(mut self, path: Arc<CurvePath>) -> Self {
        self.motion = Some(Motion::Along(path));
        self
    }

    pub fn radius(mut self, from: f64, to: f64) -> Self {
        self.radius = Some((from, to));
        self
    }

    pub fn opacity(mut self, from: f64, to: f64) -> Self {
        self.opacity = Some((from, to));
        self
    }

    pub fn remove_on_end(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    fn apply(&self, element: &mut Element, t: f64) {
        if let Some(p) = self.motion.as_ref().and_then(|m| m.at(t)) {
            element.shape.set_position(p);
        }
        if let Some((a, b)) = self.radius {
            element.shape.set_radius(a + (b - a) * t);
        }
        if let Some((a, b)) = self.opacity {
            element.style.opacity = (a + (b - a) * t).clamp(0.0, 1.0);
        }
    }
}

/// Work run by a repeating schedule. Tweens it spawns belong to the schedule.
pub trait Job: Send {
    fn run(&mut self, ctx: &mut JobContext<'_>);
}

impl<F> Job for F
where
    F: FnMut(&mut JobContext<'_>) + Send,
{
    fn run(&mut self, ctx: &mut JobContext<'_>) {
        self(ctx)
    }
}

/// What a [`Job`] may touch while it runs.
pub struct JobContext<'a> {
    scene: &'a mut Scene,
    now: Duration,
    spawned: Vec<Tween>,
}

impl<'a> JobContext<'a> {
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `tween` relative to the job's firing time.
    pub fn animate(&mut self, tween: Tween) {
        self.spawned.push(tween);
    }
}

/// When a repeating schedule first fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    /// Immediately, inside the scheduling call.
    Now,
    /// One period from now.
    AfterPeriod,
}

/// What happened during one [`Timeline::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub now: Duration,
    /// Tweens that ran to completion.
    pub completed: usize,
    /// Repeating jobs that fired.
    pub cycles: usize,
    /// One-shot timers that came due.
    pub fired: Vec<TaskHandle>,
}

impl TickReport {
    pub fn has_fired(&self, timer: TaskHandle) -> bool {
        self.fired.contains(&timer)
    }
}

enum Task {
    Tween {
        tween: Tween,
        start: Duration,
        parent: Option<TaskHandle>,
    },
    Interval {
        period: Duration,
        next: Duration,
        job: Box<dyn Job>,
        children: Vec<TaskHandle>,
    },
    Timer {
        due: Duration,
    },
}

#[derive(Default)]
pub struct Timeline {
    now: Duration,
    next_handle: u64,
    tasks: BTreeMap<TaskHandle, Task>,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("now", &self.now)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of live tasks of every kind.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// No tween, repeating job or timer is outstanding.
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, handle: TaskHandle) -> bool {
        self.tasks.contains_key(&handle)
    }

    /// Live tweens spawned by a repeating job.
    pub fn children(&self, handle: TaskHandle) -> &[TaskHandle] {
        match self.tasks.get(&handle) {
            Some(Task::Interval { children, .. }) => children,
            _ => &[],
        }
    }

    /// Start time of a scheduled tween.
    pub fn start_of(&self, handle: TaskHandle) -> Option<Duration> {
        match self.tasks.get(&handle) {
            Some(Task::Tween { start, .. }) => Some(*start),
            _ => None,
        }
    }

    fn insert(&mut self, task: Task) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.insert(handle, task);
        handle
    }

    pub fn animate(&mut self, tween: Tween) -> TaskHandle {
        let start = self.now + tween.delay;
        trace!("tween on {:?} starts at {start:?}", tween.target);
        self.insert(Task::Tween {
            tween,
            start,
            parent: None,
        })
    }

    /// Runs `job` every `period`.
    ///
    /// # Args
    /// * `scene` - Passed to the job when `start` is [`Start::Now`].
    /// * `period` - Time between runs; clamped to at least 1 ms.
    /// * `job` - The work; tweens it spawns are cancelled with the schedule.
    /// * `start` - Whether the first run happens now or after one period.
    pub fn every<J>(
        &mut self,
        scene: &mut Scene,
        period: Duration,
        job: J,
        start: Start,
    ) -> TaskHandle
    where
        J: Job + 'static,
    {
        let period = if period < MIN_PERIOD {
            warn!("interval period {period:?} too short, using {MIN_PERIOD:?}");
            MIN_PERIOD
        } else {
            period
        };

        let handle = self.insert(Task::Interval {
            period,
            next: self.now + period,
            job: Box::new(job),
            children: Vec::new(),
        });
        if start == Start::Now {
            self.run_interval(scene, handle);
        }
        handle
    }

    /// Fires once, `delay` from now; reported by [`TickReport::fired`].
    pub fn after(&mut self, delay: Duration) -> TaskHandle {
        let due = self.now + delay;
        self.insert(Task::Timer { due })
    }

    /// Cancels a task. Cancelling a repeating job cancels the tweens it
    /// spawned; cancelling an ephemeral tween removes its element.
    ///
    /// Returns `false` if the task had already finished.
    pub fn cancel(&mut self, scene: &mut Scene, handle: TaskHandle) -> bool {
        let Some(task) = self.tasks.remove(&handle) else {
            return false;
        };

        match task {
            Task::Tween { tween, parent, .. } => {
                if tween.ephemeral {
                    scene.remove(tween.target);
                }
                if let Some(parent) = parent {
                    self.detach(parent, handle);
                }
            }
            Task::Interval { children, .. } => {
                for child in children {
                    self.cancel(scene, child);
                }
            }
            Task::Timer { .. } => {}
        }
        true
    }

    /// Cancels every outstanding task.
    pub fn cancel_all(&mut self, scene: &mut Scene) {
        let handles: Vec<_> = self.tasks.keys().copied().collect();
        for handle in handles {
            self.cancel(scene, handle);
        }
        debug_assert!(self.is_idle());
    }

    /// Advances the clock by `dt`, firing due jobs and timers in time order
    /// and then applying every started tween.
    pub fn tick(&mut self, scene: &mut Scene, dt: Duration) -> TickReport {
        let target = self.now + dt;
        let mut report = TickReport::default();

        while let Some((at, handle)) = self.next_due(target) {
            self.now = at;
            if matches!(self.tasks.get(&handle), Some(Task::Timer { .. })) {
                self.tasks.remove(&handle);
                report.fired.push(handle);
            } else {
                self.run_interval(scene, handle);
                report.cycles += 1;
            }
        }
        self.now = target;

        let mut finished = Vec::new();
        for (&handle, task) in &self.tasks {
            let Task::Tween { tween, start, .. } = task else {
                continue;
            };
            if self.now < *start {
                continue;
            }

            let progress = if tween.duration.is_zero() {
                1.0
            } else {
                (self.now - *start).as_secs_f64() / tween.duration.as_secs_f64()
            };
            match scene.get_mut(tween.target) {
                Some(element) => tween.apply(element, tween.ease.apply(progress)),
                // Element went away underneath us; nothing left to animate.
                None => {
                    finished.push(handle);
                    continue;
                }
            }
            if progress >= 1.0 {
                finished.push(handle);
            }
        }

        for handle in finished {
            self.finish(scene, handle);
            report.completed += 1;
        }

        report.now = self.now;
        report
    }

    fn next_due(&self, limit: Duration) -> Option<(Duration, TaskHandle)> {
        self.tasks
            .iter()
            .filter_map(|(&h, t)| match t {
                Task::Interval { next, .. } => Some((*next, h)),
                Task::Timer { due } => Some((*due, h)),
                Task::Tween { .. } => None,
            })
            .filter(|(at, _)| *at <= limit)
            .min()
    }

    fn run_interval(&mut self, scene: &mut Scene, handle: TaskHandle) {
        let now = self.now;
        let spawned = match self.tasks.get_mut(&handle) {
            Some(Task::Interval { period, next, job, .. }) => {
                *next = now + *period;
                let mut ctx = JobContext {
                    scene,
                    now,
                    spawned: Vec::new(),
                };
                job.run(&mut ctx);
                ctx.spawned
            }
            _ => return,
        };

        let mut adopted = Vec::with_capacity(spawned.len());
        for tween in spawned {
            let start = now + tween.delay;
            adopted.push(self.insert(Task::Tween {
                tween,
                start,
                parent: Some(handle),
            }));
        }
        if let Some(Task::Interval { children, .. }) = self.tasks.get_mut(&handle) {
            children.extend(adopted);
        }
    }

    fn finish(&mut self, scene: &mut Scene, handle: TaskHandle) {
        if let Some(Task::Tween { tween, parent, .. }) = self.tasks.remove(&handle) {
            if tween.ephemeral {
                scene.remove(tween.target);
            }
            if let Some(parent) = parent {
                self.detach(parent, handle);
            }
        }
    }

    fn detach(&mut self, parent: TaskHandle, child: TaskHandle) {
        if let Some(Task::Interval { children, .. }) = self.tasks.get_mut(&parent) {
            children.retain(|&c| c != child);
        }
    }
}
