// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ob-agentic: the domain-agnostic OBSERVE/THINK/PLAN/ACT/REFLECT tick
//! engine. Domain content plugs in through an [`Observer`], a set of
//! [`ActionHandler`]s, and a [`PlannerConfig`].

mod engine;
mod error;
mod executor;
mod goal_tracker;
mod observer;
mod planner;
mod reflection;

pub use engine::{AgenticLoop, ExtraContext};
pub use error::ObserveError;
pub use executor::{ActionHandler, Executor, DEFAULT_MAX_ACTIONS_PER_TICK};
pub use goal_tracker::{format_goals, GoalTracker};
pub use observer::{count_observations, Observer};
pub use planner::{ActionPlan, PlanContext, Planner, PlannerConfig};
pub use reflection::Reflection;
