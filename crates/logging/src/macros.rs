//! # Logging Macros
//!
//! Directory events with a fixed target and field set, so they can be
//! filtered by target (`membership`, `database`, `security`) and queried by
//! field in JSON output.

/// Log a membership change on a team or department.
///
/// # Example
///
/// ```rust
/// use logging::log_membership_event;
///
/// let employee_ids = vec![1, 2];
/// log_membership_event!("team", 7, "added", &employee_ids);
/// ```
#[macro_export]
macro_rules! log_membership_event {
    ($scope:expr, $group_id:expr, $event:expr, $employee_ids:expr) => {
        $crate::tracing::info!(
            target: "membership",
            scope = %$scope,
            group_id = %$group_id,
            event = %$event,
            employee_ids = ?$employee_ids,
            "Membership changed"
        )
    };
}

/// Log a database query with the table it read and its duration in milliseconds.
#[macro_export]
macro_rules! log_db_query {
    ($query:expr, $table:expr, $elapsed_ms:expr) => {
        $crate::tracing::debug!(
            target: "database",
            query = %$query,
            table = %$table,
            elapsed_ms = $elapsed_ms,
            "Database query"
        )
    };
}

/// Log a security event (unknown caller, failed login, password reset).
#[macro_export]
macro_rules! log_security_event {
    ($event:expr, $caller_id:expr, $details:expr) => {
        $crate::tracing::warn!(
            target: "security",
            event = %$event,
            caller_id = %$caller_id,
            details = %$details,
            "Security event"
        )
    };
}

/// Evaluate a block and log its duration at debug level.
///
/// `$target` must be a string literal. The block is inlined, so it may
/// `.await` inside an async fn.
///
/// ```rust
/// use logging::measure_duration;
///
/// let total = measure_duration!("outbox", "dispatch", { 40 + 2 });
/// assert_eq!(total, 42);
/// ```
#[macro_export]
macro_rules! measure_duration {
    ($target:expr, $operation:expr, $block:block) => {{
        let started = std::time::Instant::now();
        let value = $block;
        $crate::tracing::debug!(
            target: $target,
            operation = %$operation,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Timed operation finished"
        );
        value
    }};
}

/// Info-level span around a long-running operation such as a migration run.
///
/// ```rust
/// use logging::operation_span;
///
/// let span = operation_span!("migrate", "down", steps = 1);
/// let _entered = span.enter();
/// ```
#[macro_export]
macro_rules! operation_span {
    ($name:expr, $operation:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::tracing::info_span!($name, operation = %$operation $(, $key = $value)*)
    };
}
