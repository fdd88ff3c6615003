//! Typed request surface for the planning core.
//!
//! These services are what an HTTP layer calls: they validate requests, load
//! the catalog snapshot, dispatch the synchronous engine, and run the
//! reservation state machine.

pub mod plan_service;
pub mod reservation_service;

pub use plan_service::PlanService;
pub use reservation_service::ReservationService;
