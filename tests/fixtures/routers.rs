//! Routing providers for tests.

use std::cell::{Cell, RefCell};

use ev_route_planner::haversine::HaversineRouter;
use ev_route_planner::traits::{RouteLeg, RoutingProvider};
use ev_route_planner::{Coordinate, Error, Result};

/// Straight-line router that remembers every request.
#[derive(Debug, Default)]
pub struct RecordingRouter {
    inner: HaversineRouter,
    calls: RefCell<Vec<(Coordinate, Coordinate)>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self {
            inner: HaversineRouter::new(5.0),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Coordinate, Coordinate)> {
        self.calls.borrow().clone()
    }
}

impl RoutingProvider for RecordingRouter {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteLeg> {
        self.calls.borrow_mut().push((origin, destination));
        self.inner.route(origin, destination)
    }
}

/// Straight-line router whose n-th call (1-based) fails.
#[derive(Debug)]
pub struct FailingRouter {
    inner: HaversineRouter,
    fail_on_call: usize,
    calls: Cell<usize>,
}

impl FailingRouter {
    pub fn failing_on(fail_on_call: usize) -> Self {
        Self {
            inner: HaversineRouter::new(5.0),
            fail_on_call,
            calls: Cell::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.get()
    }
}

impl RoutingProvider for FailingRouter {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteLeg> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_on_call {
            return Err(Error::ProviderUnavailable {
                message: format!("simulated outage on call {}", call),
            });
        }
        self.inner.route(origin, destination)
    }
}

/// Router that never finds a road.
#[derive(Debug, Default)]
pub struct NoRoadRouter;

impl RoutingProvider for NoRoadRouter {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteLeg> {
        Err(Error::NoRouteFound { origin, destination })
    }
}
