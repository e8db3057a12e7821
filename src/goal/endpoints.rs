//! JSON route handlers for savings goals.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::GoalId,
    goal::{
        GoalUpdate, GoalWithProgress, NewGoal, create_goal, delete_goal, list_goals, update_goal,
    },
};

/// The state needed by the goal route handlers.
#[derive(Debug, Clone)]
pub struct GoalState {
    /// The database connection for managing goals.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl GoalState {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// List all goals with their derived progress, most recently created first.
pub async fn list_goals_endpoint(State(state): State<GoalState>) -> Result<Response, Error> {
    let connection = state.lock()?;
    let goals: Vec<GoalWithProgress> = list_goals(&connection)?
        .into_iter()
        .map(GoalWithProgress::from)
        .collect();

    Ok(Json(goals).into_response())
}

/// Create a goal from a JSON body, responding with 201 and the created
/// record.
pub async fn create_goal_endpoint(
    State(state): State<GoalState>,
    Json(new_goal): Json<NewGoal>,
) -> Result<Response, Error> {
    let connection = state.lock()?;
    let goal = create_goal(new_goal, &connection)?;

    Ok((StatusCode::CREATED, Json(goal)).into_response())
}

/// Apply a partial update to a goal, responding with the updated record.
pub async fn update_goal_endpoint(
    State(state): State<GoalState>,
    Path(goal_id): Path<GoalId>,
    Json(update): Json<GoalUpdate>,
) -> Result<Response, Error> {
    let connection = state.lock()?;
    let goal = update_goal(goal_id, update, &connection)?;

    Ok(Json(goal).into_response())
}

/// Delete a goal, responding with 204 on success.
pub async fn delete_goal_endpoint(
    State(state): State<GoalState>,
    Path(goal_id): Path<GoalId>,
) -> Result<Response, Error> {
    let connection = state.lock()?;
    delete_goal(goal_id, &connection)?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post, put},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        goal::{create_goal_endpoint, list_goals_endpoint, update_goal_endpoint},
        initialize_db,
    };

    use super::GoalState;

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize database");

        let state = GoalState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(endpoints::GOALS, get(list_goals_endpoint))
            .route(endpoints::GOALS, post(create_goal_endpoint))
            .route(endpoints::GOAL, put(update_goal_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn create_goal_applies_defaults() {
        let server = get_test_server();

        let response = server
            .post(endpoints::GOALS)
            .json(&json!({
                "name": "Emergency fund",
                "targetAmount": "5000"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let goal: Value = response.json();
        assert_eq!(goal["currentAmount"], "0");
        assert_eq!(goal["icon"], "fas fa-bullseye");
    }

    #[tokio::test]
    async fn create_goal_rejects_empty_name() {
        let server = get_test_server();

        let response = server
            .post(endpoints::GOALS)
            .json(&json!({
                "name": "   ",
                "targetAmount": "5000"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_goals_includes_derived_progress() {
        let server = get_test_server();
        server
            .post(endpoints::GOALS)
            .json(&json!({
                "name": "Emergency fund",
                "targetAmount": "500",
                "currentAmount": "600"
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get(endpoints::GOALS).await;

        response.assert_status_ok();
        let goals: Vec<Value> = response.json();
        assert_eq!(goals.len(), 1);
        // Over-saved goals report completed with progress clamped to 100.
        assert_eq!(goals[0]["progress"], "100");
        assert_eq!(goals[0]["isCompleted"], true);
    }

    #[tokio::test]
    async fn update_missing_goal_returns_not_found() {
        let server = get_test_server();

        let response = server
            .put(&endpoints::format_endpoint(endpoints::GOAL, 42))
            .json(&json!({ "currentAmount": "10" }))
            .await;

        response.assert_status_not_found();
    }
}
