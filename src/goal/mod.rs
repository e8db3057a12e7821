//! Savings goals: targets with independently tracked progress.

mod core;
mod endpoints;

pub use core::{
    DEFAULT_GOAL_ICON, Goal, GoalUpdate, GoalWithProgress, NewGoal, create_goal,
    create_goal_table, delete_goal, get_goal, list_goals, map_goal_row, update_goal,
};
pub use endpoints::{
    create_goal_endpoint, delete_goal_endpoint, list_goals_endpoint, update_goal_endpoint,
};
