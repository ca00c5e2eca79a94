//! Per-unit outcomes

use crate::route::RouteUnit;

use super::errors::ExecutionError;

/// Result of running one execute unit, keyed by its route unit.
///
/// A failed unit keeps its place in the outcome list with the cause
/// attached, so "the shard returned nothing" and "the shard failed" stay
/// distinguishable.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOutcome<T> {
    route_unit: RouteUnit,
    result: Result<T, ExecutionError>,
}

impl<T> UnitOutcome<T> {
    /// Outcome of a unit whose physical call succeeded
    pub fn succeeded(route_unit: RouteUnit, value: T) -> Self {
        Self {
            route_unit,
            result: Ok(value),
        }
    }

    /// Outcome of a unit whose physical call failed
    pub fn failed(route_unit: RouteUnit, cause: ExecutionError) -> Self {
        Self {
            route_unit,
            result: Err(cause),
        }
    }

    pub fn route_unit(&self) -> &RouteUnit {
        &self.route_unit
    }

    pub fn is_failed(&self) -> bool {
        self.result.is_err()
    }

    /// The value, if the unit succeeded
    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    /// The failure cause, if the unit failed
    pub fn cause(&self) -> Option<&ExecutionError> {
        self.result.as_ref().err()
    }

    pub fn result(&self) -> &Result<T, ExecutionError> {
        &self.result
    }

    /// The value, or `default` if the unit failed
    pub fn value_or(self, default: T) -> T {
        self.result.unwrap_or(default)
    }

    pub fn into_result(self) -> Result<T, ExecutionError> {
        self.result
    }
}
