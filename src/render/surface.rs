use std::time::Duration;

use log::trace;

use super::{
    svg, ElementId, Job, Layer, Resource, Scene, Shape, Start, Style, TaskHandle, TickReport,
    Timeline, Tween,
};
use crate::config::Rgb;

/// A drawing surface: a retained scene plus the clock that animates it.
///
/// Views own exactly one surface; animators only ever go through its methods.
#[derive(Debug)]
pub struct Surface {
    scene: Scene,
    timeline: Timeline,
}

impl Surface {
    pub fn new(width: f64, height: f64, background: Rgb) -> Self {
        Self {
            scene: Scene::new(width, height, background),
            timeline: Timeline::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn width(&self) -> f64 {
        self.scene.width()
    }

    pub fn height(&self) -> f64 {
        self.scene.height()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.scene.resize(width, height);
    }

    pub fn add(&mut self, layer: Layer, shape: Shape, style: Style) -> ElementId {
        self.scene.add(layer, shape, style)
    }

    pub fn define(&mut self, id: impl Into<String>, resource: Resource) {
        self.scene.define(id, resource);
    }

    pub fn animate(&mut self, tween: Tween) -> TaskHandle {
        self.timeline.animate(tween)
    }

    pub fn every<J>(&mut self, period: Duration, job: J, start: Start) -> TaskHandle
    where
        J: Job + 'static,
    {
        self.timeline.every(&mut self.scene, period, job, start)
    }

    pub fn after(&mut self, delay: Duration) -> TaskHandle {
        self.timeline.after(delay)
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.timeline.cancel(&mut self.scene, handle)
    }

    /// Cancels every handle in `handles` and empties it.
    pub fn cancel_each(&mut self, handles: &mut Vec<TaskHandle>) {
        for handle in handles.drain(..) {
            self.timeline.cancel(&mut self.scene, handle);
        }
    }

    /// Cancels everything still scheduled, whoever scheduled it.
    pub fn cancel_all(&mut self) {
        trace!("cancelling {} task(s)", self.timeline.len());
        self.timeline.cancel_all(&mut self.scene);
    }

    /// Drops every element and resource. Scheduled work is untouched.
    pub fn clear(&mut self) {
        self.scene.clear();
    }

    /// Drops every element except in-flight particles, plus all resources.
    pub fn clear_static(&mut self) {
        self.scene.clear_except(Layer::Particles);
    }

    pub fn tick(&mut self, dt: Duration) -> TickReport {
        self.timeline.tick(&mut self.scene, dt)
    }

    pub fn is_idle(&self) -> bool {
        self.timeline.is_idle()
    }

    pub fn svg(&self) -> String {
        svg::to_svg(&self.scene)
    }
}
