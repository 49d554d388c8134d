/// Create an [`EventLog`] from a list of traces.
///
/// Each trace is a bracketed, comma-separated list of activity labels.
/// Panics if the log or one of its traces is empty.
///
/// # Examples
///
/// ```rust
/// use alpha_mining::event_log;
///
/// let log = event_log![["a", "b", "c"], ["a", "c", "b"]];
/// assert_eq!(log.traces().len(), 2);
/// ```
///
/// [`EventLog`]: crate::event_log::EventLog
#[macro_export]
macro_rules! event_log {
    ($([$($act:expr),* $(,)?]),* $(,)?) => {
        $crate::event_log::EventLog::from_sequences(vec![
            $(
                vec![$($act.to_string()),*]
            ),*
        ])
        .expect("event_log! requires at least one non-empty trace")
    };
}
